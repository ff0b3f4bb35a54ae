//! # churnlens-git
//!
//! **Tier 2 (VCS History Source)**
//!
//! Subprocess adapter over the `git` binary. Produces changed-file lists,
//! file contents at arbitrary refs and numstat commit history, and never
//! mutates the repository.
//!
//! ## What belongs here
//! * Git invocation with environment isolation and cancellation
//! * Parsing of name-status, numstat, log and shortlog output
//! * Ref resolution for analysis scopes
//!
//! ## What does NOT belong here
//! * Churn aggregation or scoring (use churnlens-frequency)
//! * Path exclusion policy (use churnlens-exclude)
//! * Repository modification

#![forbid(unsafe_code)]

mod cancel;
mod command;
mod error;
mod history;
pub mod parse;
mod provider;

pub use cancel::CancelToken;
pub use command::git_available;
pub use error::{GitError, Result};
pub use provider::{EMPTY_TREE_HASH, GitProvider, INDEX_REF, STAGED_REF, WORKING_REF};
