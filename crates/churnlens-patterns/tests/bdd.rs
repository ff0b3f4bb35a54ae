//! BDD-style scenario tests for conflict-prone pattern detection.

use chrono::Utc;
use churnlens_patterns::{PatternDetector, PatternThresholds, pattern_recommendations};
use churnlens_types::{AntiPatternSeverity, AntiPatternType, ContributorActivity};

fn detector() -> PatternDetector {
    PatternDetector::default()
}

fn contributor(name: &str) -> ContributorActivity {
    ContributorActivity {
        author_name: name.to_string(),
        author_email: format!("{name}@example.com"),
        change_count: 1,
        lines_added: 0,
        lines_deleted: 0,
        ownership_share: 0.0,
        last_change_at: Utc::now(),
    }
}

fn of_type(
    found: &[churnlens_types::AntiPattern],
    t: AntiPatternType,
) -> Vec<&churnlens_types::AntiPattern> {
    found.iter().filter(|p| p.pattern_type == t).collect()
}

// ── Registration functions ───────────────────────────────────────

mod registration {
    use super::*;

    fn routes(n: usize) -> String {
        let mut src = String::from("package api\n\nfunc registerAll(router *Router) {\n");
        for i in 0..n {
            src.push_str(&format!("\trouter.Register(handler{i})\n"));
        }
        src.push_str("}\n");
        src
    }

    #[test]
    fn given_twelve_register_calls_when_detected_then_function_named_with_line_range() {
        let found = detector().detect_patterns(routes(12).as_bytes(), "api/routes.go");
        let hits = of_type(&found, AntiPatternType::RegistrationFunction);
        assert_eq!(hits.len(), 1);
        let p = hits[0];
        assert_eq!(p.description, "Large registration function with 12 sequential registrations");
        assert_eq!(p.location, "lines 3-103");
        assert!(p.suggestion.ends_with("Function: registerAll"));
        assert_eq!(p.severity, AntiPatternSeverity::Low);
        assert_eq!(p.metrics["registration_calls"], 12);
        assert_eq!(p.file_path, "api/routes.go");
    }

    #[test]
    fn given_nine_calls_when_detected_then_below_threshold() {
        let found = detector().detect_patterns(routes(9).as_bytes(), "api/routes.go");
        assert!(of_type(&found, AntiPatternType::RegistrationFunction).is_empty());
    }

    #[test]
    fn given_twenty_calls_when_detected_then_high_severity() {
        let found = detector().detect_patterns(routes(20).as_bytes(), "api/routes.go");
        let hits = of_type(&found, AntiPatternType::RegistrationFunction);
        assert_eq!(hits[0].severity, AntiPatternSeverity::High);
    }
}

// ── Constant aggregation ─────────────────────────────────────────

mod enums {
    use super::*;

    #[test]
    fn given_ten_exported_consts_when_detected_then_enum_aggregation() {
        let src: String = (0..10).map(|i| format!("export const K{i} = {i};\n")).collect();
        let found = detector().detect_patterns(src.as_bytes(), "web/keys.ts");
        let hits = of_type(&found, AntiPatternType::EnumAggregation);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description, "File contains 10 enum/const definitions");
        assert_eq!(hits[0].location, "file-wide");
        assert_eq!(hits[0].metrics["const_definitions"], 10);
        assert_eq!(hits[0].metrics["enum_declarations"], 0);
        assert_eq!(hits[0].metrics["iota_usages"], 0);
    }

    #[test]
    fn given_few_consts_when_detected_then_nothing() {
        let found = detector().detect_patterns(b"const A = 1\nconst B = 2\n", "x.go");
        assert!(of_type(&found, AntiPatternType::EnumAggregation).is_empty());
    }
}

// ── God objects ──────────────────────────────────────────────────

mod god_object {
    use super::*;

    #[test]
    fn given_file_at_line_threshold_when_detected_then_high_with_counts() {
        let src: String = (0..1499).map(|i| format!("func f{i}() {{}}\n")).collect();
        let found = detector().detect_patterns(src.as_bytes(), "big.go");
        let hits = of_type(&found, AntiPatternType::GodObject);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description, "Large file with 1500 lines, 1499 functions/methods");
        assert_eq!(hits[0].severity, AntiPatternSeverity::High);
        assert_eq!(hits[0].metrics["line_count"], 1500);
        assert_eq!(hits[0].metrics["method_count"], 0);
    }

    #[test]
    fn given_small_file_when_quick_scanned_then_none() {
        assert!(detector().quick_scan(b"package x\n", "x.go").is_none());
    }
}

// ── Switch and select factories ──────────────────────────────────

mod switches {
    use super::*;

    fn switch_with(cases: usize) -> String {
        let mut src = String::from("package x\n\nswitch kind {\n");
        for i in 0..cases {
            src.push_str(&format!("case \"k{i}\":\n\treturn {i}\n"));
        }
        src.push_str("}\n");
        src
    }

    #[test]
    fn given_twelve_case_switch_when_detected_then_located_by_line() {
        let found = detector().detect_patterns(switch_with(12).as_bytes(), "x.go");
        let hits = of_type(&found, AntiPatternType::SwitchFactory);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description, "Large switch statement with 12 cases");
        assert_eq!(hits[0].location, "line 3");
        assert_eq!(hits[0].metrics["case_count"], 12);
    }

    #[test]
    fn given_ten_case_select_when_detected_then_select_wording() {
        let mut src = String::from("select {\n");
        for _ in 0..10 {
            src.push_str("case <-ch:\n");
        }
        src.push_str("}\n");
        let found = detector().detect_patterns(src.as_bytes(), "x.go");
        let hits = of_type(&found, AntiPatternType::SwitchFactory);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description, "Large select statement with 10 cases");
        assert_eq!(hits[0].suggestion, "Consider restructuring to reduce case complexity");
    }

    #[test]
    fn given_lower_threshold_when_detected_then_small_switch_flagged() {
        let d = PatternDetector::new(PatternThresholds {
            switch_cases: 2,
            ..PatternThresholds::default()
        });
        let found = d.detect_patterns(switch_with(4).as_bytes(), "x.go");
        assert_eq!(of_type(&found, AntiPatternType::SwitchFactory)[0].severity, AntiPatternSeverity::High);
    }
}

// ── Barrel files ─────────────────────────────────────────────────

mod barrels {
    use super::*;

    const REEXPORTS: &str = "export { a } from './a';\nexport { b } from './b';\nexport { c } from './c';\nexport { d } from './d';\n";

    #[test]
    fn given_index_of_reexports_when_detected_then_barrel() {
        let found = detector().detect_patterns(REEXPORTS.as_bytes(), "src/index.ts");
        let hits = of_type(&found, AntiPatternType::BarrelFile);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description, "Barrel/index file with 8 exports (160% of lines)");
        assert_eq!(hits[0].metrics["export_statements"], 8);
        assert_eq!(hits[0].metrics["total_lines"], 5);
        assert_eq!(hits[0].severity, AntiPatternSeverity::Low);
    }

    #[test]
    fn given_same_content_in_ordinary_file_when_detected_then_not_barrel() {
        let found = detector().detect_patterns(REEXPORTS.as_bytes(), "src/app.ts");
        assert!(of_type(&found, AntiPatternType::BarrelFile).is_empty());
    }

    #[test]
    fn given_python_package_init_when_detected_then_relative_imports_count() {
        let src = "from .a import A\nfrom .b import B\n";
        let found = detector().detect_patterns(src.as_bytes(), "pkg/__init__.py");
        let hits = of_type(&found, AntiPatternType::BarrelFile);
        assert_eq!(hits[0].metrics["export_statements"], 2);
    }
}

// ── Config aggregation and escalation ────────────────────────────

mod config {
    use super::*;

    fn config_struct(fields: usize) -> String {
        let mut src = String::from("package config\n\ntype Config struct {\n");
        for i in 0..fields {
            src.push_str(&format!("\tField{i} string `json:\"f{i}\"`\n"));
        }
        src.push_str("}\n");
        src
    }

    #[test]
    fn given_config_path_with_many_fields_when_detected_then_config_aggregation() {
        let found = detector().detect_patterns(config_struct(12).as_bytes(), "internal/config/config.go");
        let hits = of_type(&found, AntiPatternType::ConfigAggregation);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description, "Large config file with 12 fields");
        assert_eq!(hits[0].metrics["field_count"], 12);
    }

    #[test]
    fn given_non_config_path_when_detected_then_fields_ignored() {
        let found = detector().detect_patterns(config_struct(12).as_bytes(), "internal/model.go");
        assert!(of_type(&found, AntiPatternType::ConfigAggregation).is_empty());
    }

    #[test]
    fn given_three_contributors_when_analyzed_then_medium_escalates_to_high() {
        let src = config_struct(15);
        let people = [contributor("ann"), contributor("bob"), contributor("cy")];
        let found = detector().analyze_file_for_patterns(src.as_bytes(), "app/Settings.go", &people);
        let hit = &of_type(&found, AntiPatternType::ConfigAggregation)[0];
        assert_eq!(hit.severity, AntiPatternSeverity::High);
        assert_eq!(
            hit.description,
            "Large config file with 15 fields (high collision risk: 3 contributors)"
        );
    }

    #[test]
    fn given_two_contributors_when_analyzed_then_severity_kept() {
        let src = config_struct(15);
        let people = [contributor("ann"), contributor("bob")];
        let found = detector().analyze_file_for_patterns(src.as_bytes(), "app/options.go", &people);
        let hit = &of_type(&found, AntiPatternType::ConfigAggregation)[0];
        assert_eq!(hit.severity, AntiPatternSeverity::Medium);
        assert_eq!(hit.description, "Large config file with 15 fields");
    }
}

// ── Recommendations ──────────────────────────────────────────────

#[test]
fn given_switch_factory_when_recommending_then_map_dispatch_first() {
    assert_eq!(
        pattern_recommendations(AntiPatternType::SwitchFactory)[0],
        "Replace switch with map-based dispatch"
    );
}
