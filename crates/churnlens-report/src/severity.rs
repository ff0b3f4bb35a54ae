use churnlens_types::{FindingSeverity, NamingIssueType};

/// Severity of a duplicate from its similarity and the new symbol's size.
///
/// Critical needs both near-identity (`>= 0.95`) and at least 20 lines;
/// either `>= 0.90` similarity or 30+ lines is a warning.
#[must_use]
pub fn duplicate_severity(similarity: f64, line_count: u32) -> FindingSeverity {
    if similarity >= 0.95 && line_count >= 20 {
        FindingSeverity::Critical
    } else if similarity >= 0.90 || line_count >= 30 {
        FindingSeverity::Warning
    } else {
        FindingSeverity::Info
    }
}

/// Case mismatches warn; a near-identical existing name (`>= 0.9`) warns;
/// everything else is informational.
#[must_use]
pub fn naming_severity(issue: NamingIssueType, similarity: f64) -> FindingSeverity {
    match issue {
        NamingIssueType::CaseMismatch => FindingSeverity::Warning,
        NamingIssueType::SimilarExists if similarity >= 0.9 => FindingSeverity::Warning,
        NamingIssueType::SimilarExists | NamingIssueType::Abbreviation => FindingSeverity::Info,
    }
}
