//! Function metric thresholds and regressions.

use churnlens_types::{FindingSeverity, MetricsFinding, MetricsIssueType, SideEffect, SymbolInfo, SymbolMetrics};
use serde::{Deserialize, Serialize};

/// Limits a changed function is held to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsThresholds {
    pub max_complexity: u32,
    pub max_lines: u32,
    pub max_nesting: u32,
    /// Growth over the previous version, in percent, that counts as a regression.
    pub complexity_increase_pct: f64,
}

impl Default for MetricsThresholds {
    fn default() -> Self {
        Self {
            max_complexity: 10,
            max_lines: 50,
            max_nesting: 4,
            complexity_increase_pct: 50.0,
        }
    }
}

/// Severity of a metrics issue.
///
/// Complexity at twice the limit is critical, length at twice the limit
/// is a warning. Purity loss warns; a new impure function is informational.
#[must_use]
pub fn metrics_severity(issue: MetricsIssueType, metrics: &SymbolMetrics, thresholds: &MetricsThresholds) -> FindingSeverity {
    match issue {
        MetricsIssueType::HighComplexity
            if metrics.complexity >= thresholds.max_complexity.saturating_mul(2) =>
        {
            FindingSeverity::Critical
        }
        MetricsIssueType::LongFunction
            if metrics.lines_of_code < thresholds.max_lines.saturating_mul(2) =>
        {
            FindingSeverity::Info
        }
        MetricsIssueType::ImpureFunction => FindingSeverity::Info,
        MetricsIssueType::HighComplexity
        | MetricsIssueType::LongFunction
        | MetricsIssueType::DeepNesting
        | MetricsIssueType::ComplexityIncrease
        | MetricsIssueType::PurityLost => FindingSeverity::Warning,
    }
}

/// Check each new function or method.
///
/// Absolute limits apply to every callable. A counterpart with the same name
/// in the same file is the previous version: complexity growth and purity
/// loss are judged against it. Without one, only significant side effects
/// (I/O, network, database, global writes) are flagged.
#[must_use]
pub fn check_metrics(new: &[SymbolInfo], existing: &[SymbolInfo], thresholds: &MetricsThresholds) -> Vec<MetricsFinding> {
    let mut findings = Vec::new();
    for symbol in new.iter().filter(|s| s.is_callable()) {
        let mut now = SymbolMetrics::of(symbol);
        if now.lines_of_code == 0 {
            now.lines_of_code = symbol.span_lines();
        }
        let previous = existing
            .iter()
            .find(|e| e.name == symbol.name && e.file_path == symbol.file_path)
            .map(SymbolMetrics::of);
        let mut push = |issue, text: String, suggestion: String| {
            findings.push(MetricsFinding {
                severity: metrics_severity(issue, &now, thresholds),
                description: format!("{}: {}", symbol.name, text),
                symbol: symbol.clone(),
                issue_type: issue,
                issue: text,
                suggestion,
                old_metrics: previous.clone(),
                new_metrics: Some(now.clone()),
            });
        };

        if now.complexity > thresholds.max_complexity {
            push(
                MetricsIssueType::HighComplexity,
                format!(
                    "Cyclomatic complexity {} exceeds threshold {}",
                    now.complexity, thresholds.max_complexity
                ),
                format!("Consider breaking {} into smaller functions", symbol.name),
            );
        }
        if now.lines_of_code > thresholds.max_lines {
            push(
                MetricsIssueType::LongFunction,
                format!("Function has {} lines (threshold {})", now.lines_of_code, thresholds.max_lines),
                format!("Consider extracting parts of {} into helper functions", symbol.name),
            );
        }
        if now.nesting_depth > thresholds.max_nesting {
            push(
                MetricsIssueType::DeepNesting,
                format!(
                    "Nesting depth {} exceeds threshold {}",
                    now.nesting_depth, thresholds.max_nesting
                ),
                "Consider early returns or extracting nested blocks".to_string(),
            );
        }

        match &previous {
            Some(old) => {
                if let Some(pct) = growth_pct(old.complexity, now.complexity)
                    && pct >= thresholds.complexity_increase_pct
                {
                    push(
                        MetricsIssueType::ComplexityIncrease,
                        format!(
                            "Complexity increased from {} to {} (+{pct:.0}%)",
                            old.complexity, now.complexity
                        ),
                        format!("Review whether the new branches in {} can be simplified", symbol.name),
                    );
                }
                if old.is_pure && !now.is_pure {
                    push(
                        MetricsIssueType::PurityLost,
                        format!("Function was pure but now has side effects: {}", list(&now.side_effects)),
                        format!("Consider isolating the side effects of {} from its computation", symbol.name),
                    );
                }
            }
            None => {
                if !now.is_pure && now.side_effects.iter().any(|e| e.is_significant()) {
                    push(
                        MetricsIssueType::ImpureFunction,
                        format!("New function has side effects: {}", list(&now.side_effects)),
                        format!("Consider separating I/O from logic in {}", symbol.name),
                    );
                }
            }
        }
    }
    findings
}

/// Percent growth from `old` to `new`; `None` when `old` is unknown or
/// nothing grew.
fn growth_pct(old: u32, new: u32) -> Option<f64> {
    (old > 0 && new > old).then(|| f64::from(new - old) / f64::from(old) * 100.0)
}

fn list(effects: &[SideEffect]) -> String {
    if effects.is_empty() {
        return "unknown".to_string();
    }
    effects.iter().map(|e| e.as_str()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(name: &str, file: &str) -> SymbolInfo {
        SymbolInfo {
            name: name.into(),
            symbol_type: "function".into(),
            file_path: file.into(),
            line: 10,
            complexity: 5,
            lines_of_code: 20,
            ..SymbolInfo::default()
        }
    }

    fn issues(findings: &[MetricsFinding]) -> Vec<MetricsIssueType> {
        findings.iter().map(|f| f.issue_type).collect()
    }

    #[test]
    fn purity_loss_keeps_both_snapshots() {
        let old = SymbolInfo { is_pure: true, ..func("processData", "handler.go") };
        let new = SymbolInfo {
            complexity: 6,
            lines_of_code: 25,
            side_effects: vec![SideEffect::Io, SideEffect::Network],
            ..func("processData", "handler.go")
        };
        let found = check_metrics(&[new], &[old], &MetricsThresholds::default());
        assert_eq!(issues(&found), [MetricsIssueType::PurityLost]);
        let f = &found[0];
        assert_eq!(f.severity, FindingSeverity::Warning);
        assert!(f.old_metrics.as_ref().unwrap().is_pure);
        let now = f.new_metrics.as_ref().unwrap();
        assert!(!now.is_pure);
        assert_eq!(now.side_effects.len(), 2);
    }

    #[test]
    fn new_network_function_is_informational() {
        let new = SymbolInfo {
            side_effects: vec![SideEffect::Network, SideEffect::ExternalCall],
            ..func("fetchFromAPI", "api.go")
        };
        let found = check_metrics(&[new], &[], &MetricsThresholds::default());
        assert_eq!(issues(&found), [MetricsIssueType::ImpureFunction]);
        assert_eq!(found[0].severity, FindingSeverity::Info);
        assert!(found[0].old_metrics.is_none());
    }

    #[test]
    fn receiver_write_alone_is_not_flagged_when_new() {
        let new = SymbolInfo {
            symbol_type: "method".into(),
            side_effects: vec![SideEffect::ReceiverWrite],
            ..func("SetValue", "state.go")
        };
        assert!(check_metrics(&[new], &[], &MetricsThresholds::default()).is_empty());
    }

    #[test]
    fn pure_method_gaining_receiver_write_loses_purity() {
        let old = SymbolInfo { is_pure: true, ..func("calculate", "calc.go") };
        let new = SymbolInfo {
            side_effects: vec![SideEffect::ReceiverWrite],
            ..func("calculate", "calc.go")
        };
        let found = check_metrics(&[new], &[old], &MetricsThresholds::default());
        assert_eq!(issues(&found), [MetricsIssueType::PurityLost]);
    }

    #[test]
    fn counterpart_must_share_the_file() {
        let old = SymbolInfo { is_pure: true, ..func("calculate", "other.go") };
        let new = func("calculate", "calc.go");
        assert!(check_metrics(&[new], &[old], &MetricsThresholds::default()).is_empty());
    }

    #[test]
    fn absolute_limits_and_growth() {
        let old = func("route", "r.go");
        let new = SymbolInfo {
            complexity: 22,
            lines_of_code: 80,
            nesting_depth: 5,
            ..func("route", "r.go")
        };
        let found = check_metrics(&[new], &[old], &MetricsThresholds::default());
        assert_eq!(
            issues(&found),
            [
                MetricsIssueType::HighComplexity,
                MetricsIssueType::LongFunction,
                MetricsIssueType::DeepNesting,
                MetricsIssueType::ComplexityIncrease,
            ]
        );
        assert_eq!(found[0].severity, FindingSeverity::Critical);
        assert_eq!(found[1].severity, FindingSeverity::Info);
        assert_eq!(found[3].issue, "Complexity increased from 5 to 22 (+340%)");
    }

    #[test]
    fn small_growth_is_tolerated() {
        let old = func("route", "r.go");
        let new = SymbolInfo { complexity: 7, ..func("route", "r.go") };
        assert!(check_metrics(&[new], &[old], &MetricsThresholds::default()).is_empty());
    }

    #[test]
    fn purity_severities() {
        let t = MetricsThresholds::default();
        let m = SymbolMetrics::default();
        assert_eq!(metrics_severity(MetricsIssueType::PurityLost, &m, &t), FindingSeverity::Warning);
        assert_eq!(metrics_severity(MetricsIssueType::ImpureFunction, &m, &t), FindingSeverity::Info);
    }

    #[test]
    fn non_callables_are_ignored() {
        let new = SymbolInfo {
            symbol_type: "struct".into(),
            complexity: 99,
            ..func("Config", "c.go")
        };
        assert!(check_metrics(&[new], &[], &MetricsThresholds::default()).is_empty());
    }
}
