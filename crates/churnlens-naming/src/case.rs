use std::fmt;

use serde::{Deserialize, Serialize};

/// Casing convention of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CaseStyle {
    #[serde(rename = "camelCase")]
    CamelCase,
    #[serde(rename = "PascalCase")]
    PascalCase,
    #[serde(rename = "snake_case")]
    SnakeCase,
    #[serde(rename = "kebab-case")]
    KebabCase,
    #[serde(rename = "unknown")]
    Unknown,
}

impl CaseStyle {
    /// The style written in itself.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CaseStyle::CamelCase => "camelCase",
            CaseStyle::PascalCase => "PascalCase",
            CaseStyle::SnakeCase => "snake_case",
            CaseStyle::KebabCase => "kebab-case",
            CaseStyle::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `name`, checking in order: any `_` is snake_case, any `-` is
/// kebab-case, an uppercase start with a case transition is PascalCase, a
/// lowercase start with a lower-to-upper transition is camelCase.
///
/// Single words, all-caps names and the empty string are
/// [`CaseStyle::Unknown`]. `SCREAMING_SNAKE` counts as snake_case.
///
/// # Examples
///
/// ```
/// use churnlens_naming::{CaseStyle, detect_case_style};
///
/// assert_eq!(detect_case_style("getUserName"), CaseStyle::CamelCase);
/// assert_eq!(detect_case_style("GetUserName"), CaseStyle::PascalCase);
/// assert_eq!(detect_case_style("get_user_name"), CaseStyle::SnakeCase);
/// assert_eq!(detect_case_style("USERNAME"), CaseStyle::Unknown);
/// ```
#[must_use]
pub fn detect_case_style(name: &str) -> CaseStyle {
    let bytes = name.as_bytes();
    let Some(&first) = bytes.first() else {
        return CaseStyle::Unknown;
    };

    let upper_start = first.is_ascii_uppercase();
    let mut underscore = false;
    let mut hyphen = false;
    let mut lower_after_upper = false;
    let mut upper_after_lower = false;

    for (i, &ch) in bytes.iter().enumerate() {
        match ch {
            b'_' => underscore = true,
            b'-' => hyphen = true,
            _ => {}
        }
        if i > 0 {
            let prev = bytes[i - 1];
            if prev.is_ascii_lowercase() && ch.is_ascii_uppercase() {
                upper_after_lower = true;
            }
            if prev.is_ascii_uppercase() && ch.is_ascii_lowercase() {
                lower_after_upper = true;
            }
        }
    }

    if underscore {
        CaseStyle::SnakeCase
    } else if hyphen {
        CaseStyle::KebabCase
    } else if upper_start && (lower_after_upper || upper_after_lower) {
        CaseStyle::PascalCase
    } else if !upper_start && upper_after_lower {
        CaseStyle::CamelCase
    } else {
        CaseStyle::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_the_four_styles() {
        assert_eq!(detect_case_style("getUserName"), CaseStyle::CamelCase);
        assert_eq!(detect_case_style("GetUserName"), CaseStyle::PascalCase);
        assert_eq!(detect_case_style("get_user_name"), CaseStyle::SnakeCase);
        assert_eq!(detect_case_style("get-user-name"), CaseStyle::KebabCase);
    }

    #[test]
    fn ambiguous_names_are_unknown() {
        for name in ["", "x", "X", "USERNAME", "username"] {
            assert_eq!(detect_case_style(name), CaseStyle::Unknown, "{name:?}");
        }
    }

    #[test]
    fn underscore_wins_over_everything() {
        assert_eq!(detect_case_style("MAX_SIZE"), CaseStyle::SnakeCase);
        assert_eq!(detect_case_style("_private"), CaseStyle::SnakeCase);
        assert_eq!(detect_case_style("get_user-name"), CaseStyle::SnakeCase);
    }

    #[test]
    fn single_capital_word_is_pascal() {
        assert_eq!(detect_case_style("User"), CaseStyle::PascalCase);
        assert_eq!(detect_case_style("HTTPServer"), CaseStyle::PascalCase);
    }

    #[test]
    fn serializes_with_display_spelling() {
        assert_eq!(serde_json::to_string(&CaseStyle::KebabCase).unwrap(), "\"kebab-case\"");
        assert_eq!(CaseStyle::PascalCase.to_string(), "PascalCase");
    }
}
