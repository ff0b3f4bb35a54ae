use churnlens_near_dup::{BodyIndex, PreparedBody};
use churnlens_path::base_name;
use churnlens_report::duplicate_severity;
use churnlens_types::{DuplicateFinding, DuplicateKind, SymbolInfo};

/// Compare each new function or method against the existing symbols.
///
/// A pair whose normalized bodies are equal is reported once as
/// [`DuplicateKind::Exact`]; any other pair at or above `threshold` Jaccard
/// similarity is reported as [`DuplicateKind::Structural`]. Symbols without
/// content and a symbol matched against itself (same file and start line)
/// are skipped. Findings come back in discovery order; ranking and capping
/// happen at report assembly.
#[must_use]
pub fn find_duplicates(new: &[SymbolInfo], existing: &[SymbolInfo], threshold: f64) -> Vec<DuplicateFinding> {
    let index = BodyIndex::build(existing.iter().map(|s| s.content.as_str()));
    let mut findings = Vec::new();

    for symbol in new.iter().filter(|s| s.is_callable() && !s.content.is_empty()) {
        let body = PreparedBody::new(&symbol.content);
        let lines = symbol.span_lines();

        for i in index.exact_matches(&body) {
            let other = &existing[i];
            if is_self(symbol, other) {
                continue;
            }
            findings.push(DuplicateFinding {
                severity: duplicate_severity(1.0, lines),
                description: format!(
                    "Exact duplicate of {} in {}",
                    other.name,
                    base_name(&other.file_path)
                ),
                new_code: symbol.location(),
                existing_code: other.location(),
                similarity: 1.0,
                kind: DuplicateKind::Exact,
                suggestion: format!(
                    "Extract common code into a shared function, used by both {} and {}",
                    symbol.name, other.name
                ),
            });
        }

        for (i, other_body) in index.iter() {
            let other = &existing[i];
            if is_self(symbol, other) || body.is_exact(other_body) {
                continue;
            }
            let similarity = body.similarity(other_body);
            if similarity < threshold {
                continue;
            }
            findings.push(DuplicateFinding {
                severity: duplicate_severity(similarity, lines),
                description: format!(
                    "Structurally similar to {} in {} ({:.0}% similar)",
                    other.name,
                    base_name(&other.file_path),
                    similarity * 100.0
                ),
                new_code: symbol.location(),
                existing_code: other.location(),
                similarity,
                kind: DuplicateKind::Structural,
                suggestion: "Consider parameterizing the common structure to reduce duplication"
                    .to_string(),
            });
        }
    }
    findings
}

fn is_self(a: &SymbolInfo, b: &SymbolInfo) -> bool {
    a.file_path == b.file_path && a.line == b.line
}

#[cfg(test)]
mod tests {
    use churnlens_types::FindingSeverity;

    use super::*;

    fn func(name: &str, file: &str, line: u32, body: &str) -> SymbolInfo {
        SymbolInfo {
            name: name.into(),
            symbol_type: "function".into(),
            file_path: file.into(),
            line,
            end_line: line + body.lines().count() as u32,
            content: body.into(),
            ..SymbolInfo::default()
        }
    }

    const BODY: &str = "func sum(xs []int) int {\n\ttotal := 0\n\tfor _, x := range xs {\n\t\ttotal += x\n\t}\n\treturn total\n}";

    #[test]
    fn comments_and_blank_lines_do_not_hide_an_exact_copy() {
        let existing = [func("sum", "math.go", 3, BODY)];
        let commented = format!("// adds up\n{BODY}\n\n# trailing");
        let new = [func("total", "calc.go", 10, &commented)];
        let found = find_duplicates(&new, &existing, 0.8);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, DuplicateKind::Exact);
        assert_eq!(found[0].similarity, 1.0);
        assert_eq!(found[0].description, "Exact duplicate of sum in math.go");
    }

    #[test]
    fn renamed_copy_is_structural_once() {
        let existing = [func("a", "x.go", 1, "foo ( bar ) { baz }")];
        let new = [func("b", "y.go", 1, "foo(bar){baz}")];
        let found = find_duplicates(&new, &existing, 0.8);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, DuplicateKind::Structural);
        assert_eq!(found[0].similarity, 1.0);
    }

    #[test]
    fn self_match_is_skipped() {
        let existing = [func("sum", "math.go", 3, BODY)];
        let new = [func("sum", "math.go", 3, BODY)];
        assert!(find_duplicates(&new, &existing, 0.8).is_empty());
    }

    #[test]
    fn only_callables_are_compared() {
        let existing = [func("sum", "math.go", 3, BODY)];
        let mut new = func("Sum", "types.go", 1, BODY);
        new.symbol_type = "struct".into();
        assert!(find_duplicates(&[new], &existing, 0.8).is_empty());
    }

    #[test]
    fn below_threshold_is_ignored() {
        let existing = [func("a", "x.go", 1, "alpha beta gamma delta")];
        let new = [func("b", "y.go", 1, "alpha epsilon zeta eta")];
        assert!(find_duplicates(&new, &existing, 0.8).is_empty());
    }

    #[test]
    fn long_exact_copy_is_critical() {
        let long: String = (0..25).map(|i| format!("x{i} := {i}\n")).collect();
        let existing = [func("a", "x.go", 1, &long)];
        let new = [func("b", "y.go", 1, &long)];
        let found = find_duplicates(&new, &existing, 0.8);
        assert_eq!(found[0].severity, FindingSeverity::Critical);
    }
}
