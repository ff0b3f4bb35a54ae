//! Property-based tests for change analysis helpers.

use churnlens_change::{NamingChecker, extract_symbol_content, find_duplicates, is_supported_file};
use churnlens_types::{NamingIssueType, SymbolInfo};
use proptest::prelude::*;

fn arb_symbol(file: &'static str) -> impl Strategy<Value = SymbolInfo> {
    (
        "[a-z]{1,6}([A-Z][a-z]{1,6}){0,2}",
        prop::sample::select(vec!["function", "method", "struct"]),
        1u32..40,
        prop::collection::vec("[a-z]{1,5}( [a-z(){}=+]{1,5}){0,4}", 1..6),
    )
        .prop_map(move |(name, kind, line, body)| SymbolInfo {
            name,
            symbol_type: kind.to_string(),
            file_path: file.to_string(),
            line,
            end_line: line + body.len() as u32,
            content: body.join("\n"),
            ..SymbolInfo::default()
        })
}

proptest! {
    #[test]
    fn extracted_content_never_exceeds_requested_span(
        lines in prop::collection::vec("[a-z ]{0,10}", 0..30),
        start in 0u32..40,
        len in 0u32..10,
    ) {
        let content = lines.join("\n");
        let out = extract_symbol_content(content.as_bytes(), start, start + len);
        if !out.is_empty() {
            prop_assert!(out.split('\n').count() as u32 <= len + 1);
        }
    }

    #[test]
    fn supported_file_check_ignores_case(stem in "[a-z]{1,8}", ext in prop::sample::select(vec!["go", "rs", "py", "ts"])) {
        let lower = format!("{stem}.{ext}");
        prop_assert!(is_supported_file(&lower));
        prop_assert!(is_supported_file(&lower.to_uppercase()));
    }

    #[test]
    fn duplicate_similarity_is_bounded_and_never_self(
        new in prop::collection::vec(arb_symbol("new.go"), 0..6),
        existing in prop::collection::vec(arb_symbol("old.go"), 0..6),
        threshold in 0.1f64..1.0,
    ) {
        for finding in find_duplicates(&new, &existing, threshold) {
            prop_assert!(finding.similarity >= threshold);
            prop_assert!(finding.similarity <= 1.0);
            prop_assert_ne!(&finding.new_code.file_path, &finding.existing_code.file_path);
        }
    }

    #[test]
    fn similar_name_findings_list_at_most_three(
        new in prop::collection::vec(arb_symbol("new.go"), 0..4),
        existing in prop::collection::vec(arb_symbol("old.go"), 0..12),
    ) {
        let found = NamingChecker::default().check(&new, &existing, 0.7);
        for finding in found.iter().filter(|f| f.issue_type == NamingIssueType::SimilarExists) {
            prop_assert!(!finding.similar_names.is_empty());
            prop_assert!(finding.similar_names.len() <= 3);
            for other in &finding.similar_names {
                prop_assert_eq!(&other.symbol_type, &finding.new_symbol.symbol_type);
                prop_assert_ne!(&other.name, &finding.new_symbol.name);
            }
        }
    }
}
