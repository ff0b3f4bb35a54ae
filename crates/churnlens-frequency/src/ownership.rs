use std::collections::BTreeMap;

use churnlens_module_key::module_key;
use churnlens_types::{ContributorActivity, ModuleOwnership};

use crate::aggregate::{FileStats, assign_shares};

/// Minimum share for a non-primary contributor to be listed as a secondary owner.
pub const SECONDARY_OWNER_SHARE: f64 = 0.1;

#[derive(Default)]
struct ModuleAcc {
    file_count: usize,
    total_changes: u64,
    contributors: BTreeMap<String, ContributorActivity>,
}

/// Group files into modules (first two directory segments, root files
/// under `.`) and pick owners by change count.
///
/// Modules come back with the most changed first.
#[must_use]
pub fn calculate_ownership(stats: &FileStats) -> Vec<ModuleOwnership> {
    let mut modules: BTreeMap<String, ModuleAcc> = BTreeMap::new();

    for freq in stats.values() {
        let acc = modules.entry(module_key(&freq.file_path)).or_default();
        acc.file_count += 1;
        acc.total_changes += freq.primary_metrics().map_or(0, |m| m.change_count);

        for c in &freq.contributors {
            acc.contributors
                .entry(c.author_email.clone())
                .and_modify(|e| {
                    e.change_count += c.change_count;
                    e.lines_added += c.lines_added;
                    e.lines_deleted += c.lines_deleted;
                    e.last_change_at = e.last_change_at.max(c.last_change_at);
                })
                .or_insert_with(|| c.clone());
        }
    }

    let mut ownership: Vec<ModuleOwnership> = modules
        .into_iter()
        .map(|(module_path, acc)| {
            let mut contributors: Vec<ContributorActivity> = acc.contributors.into_values().collect();
            assign_shares(&mut contributors, acc.total_changes);
            let mut ranked = contributors.into_iter();
            let primary_owner = ranked.next();
            let secondary_owners = ranked
                .filter(|c| c.ownership_share >= SECONDARY_OWNER_SHARE)
                .collect();
            ModuleOwnership {
                module_path,
                primary_owner,
                secondary_owners,
                total_changes: acc.total_changes,
                file_count: acc.file_count,
            }
        })
        .collect();
    ownership.sort_by(|a, b| b.total_changes.cmp(&a.total_changes));
    ownership
}
