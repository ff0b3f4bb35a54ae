//! Property tests: detectors are total over arbitrary bytes.

use churnlens_patterns::{PatternDetector, count_file_lines, determine_severity};
use churnlens_types::AntiPatternSeverity;
use proptest::prelude::*;

proptest! {
    #[test]
    fn detect_never_panics(content in proptest::collection::vec(any::<u8>(), 0..2048), path in "[a-z/]{0,20}(index.ts|config.go|mod.rs|x.go)") {
        let found = PatternDetector::default().detect_patterns(&content, &path);
        for p in found {
            prop_assert_eq!(p.file_path.as_str(), path.as_str());
        }
    }

    #[test]
    fn brace_soup_never_panics(content in "[{}case default\n]{0,400}") {
        let _ = PatternDetector::default().detect_patterns(content.as_bytes(), "switch.go");
    }

    #[test]
    fn severity_is_monotonic(threshold in 1usize..100, a in 0usize..500, b in 0usize..500) {
        let rank = |s: AntiPatternSeverity| match s {
            AntiPatternSeverity::Low => 0,
            AntiPatternSeverity::Medium => 1,
            AntiPatternSeverity::High => 2,
        };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(rank(determine_severity(lo, threshold)) <= rank(determine_severity(hi, threshold)));
    }

    #[test]
    fn line_count_matches_str_lines(text in "[a-z\n]{0,200}") {
        prop_assert_eq!(count_file_lines(text.as_bytes()), text.lines().count());
    }
}
