use churnlens_types::AntiPatternType;

/// Refactoring options for a pattern type, most actionable first.
#[must_use]
pub fn pattern_recommendations(pattern_type: AntiPatternType) -> &'static [&'static str] {
    match pattern_type {
        AntiPatternType::RegistrationFunction => &[
            "Use init() functions for self-registration in each module",
            "Implement a plugin architecture with auto-discovery",
            "Use code generation to build registration code",
            "Split registrations by feature domain into separate functions",
        ],
        AntiPatternType::EnumAggregation => &[
            "Group related constants into separate files by domain",
            "Use go:generate stringer for type-safe enum handling",
            "Consider using typed constants with string methods",
            "Move constants closer to where they are used",
        ],
        AntiPatternType::GodObject => &[
            "Extract cohesive functionality into separate packages",
            "Apply Single Responsibility Principle",
            "Use interfaces to define boundaries",
            "Consider domain-driven design for module organization",
        ],
        AntiPatternType::BarrelFile => &[
            "Use direct imports instead of barrel re-exports",
            "If barrels are needed, split by feature domain",
            "Consider tree-shaking implications for bundles",
            "Document explicit public API in a README instead",
        ],
        AntiPatternType::SwitchFactory => &[
            "Replace switch with map-based dispatch",
            "Use strategy pattern with registered handlers",
            "Consider polymorphism with interfaces",
            "Extract each case into a separate handler function",
        ],
        AntiPatternType::ConfigAggregation => &[
            "Split config by subsystem with nested structs",
            "Use separate config files per module",
            "Consider environment-based config loading",
            "Use config composition instead of single struct",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_four_recommendations() {
        for t in [
            AntiPatternType::RegistrationFunction,
            AntiPatternType::EnumAggregation,
            AntiPatternType::GodObject,
            AntiPatternType::BarrelFile,
            AntiPatternType::SwitchFactory,
            AntiPatternType::ConfigAggregation,
        ] {
            assert_eq!(pattern_recommendations(t).len(), 4, "{t}");
        }
    }
}
