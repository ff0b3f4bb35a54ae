//! Abbreviation table for consistency checks.

/// Abbreviation and the full words it stands for, in lowercase.
pub const ABBREVIATIONS: &[(&str, &[&str])] = &[
    ("usr", &["user"]),
    ("msg", &["message"]),
    ("req", &["request"]),
    ("res", &["response", "result"]),
    ("resp", &["response"]),
    ("btn", &["button"]),
    ("img", &["image"]),
    ("err", &["error"]),
    ("ctx", &["context"]),
    ("cfg", &["config", "configuration"]),
    ("db", &["database"]),
    ("str", &["string"]),
    ("num", &["number"]),
    ("idx", &["index"]),
    ("len", &["length"]),
    ("val", &["value"]),
    ("ptr", &["pointer"]),
    ("src", &["source"]),
    ("dst", &["destination", "dest"]),
    ("tmp", &["temp", "temporary"]),
    ("auth", &["authentication", "authorization"]),
    ("info", &["information"]),
    ("init", &["initialize", "initialization"]),
    ("param", &["parameter"]),
    ("args", &["arguments"]),
];

/// Full forms of `word` when it is a known abbreviation. Case-insensitive.
#[must_use]
pub fn expansions_of(word: &str) -> Option<&'static [&'static str]> {
    let lower = word.to_lowercase();
    ABBREVIATIONS
        .iter()
        .find(|(abbrev, _)| *abbrev == lower)
        .map(|(_, full)| *full)
}

/// Abbreviations that expand to `word`, in table order. Case-insensitive.
///
/// ```
/// use churnlens_naming::abbreviations_of;
///
/// assert_eq!(abbreviations_of("Response"), vec!["res", "resp"]);
/// assert!(abbreviations_of("widget").is_empty());
/// ```
#[must_use]
pub fn abbreviations_of(word: &str) -> Vec<&'static str> {
    let lower = word.to_lowercase();
    ABBREVIATIONS
        .iter()
        .filter(|(_, full)| full.contains(&lower.as_str()))
        .map(|(abbrev, _)| *abbrev)
        .collect()
}
