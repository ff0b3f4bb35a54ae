//! Individual detectors. Each returns `None` (or an empty list) below its
//! threshold; `file_path` is filled in by the caller.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use churnlens_types::{AntiPattern, AntiPatternSeverity, AntiPatternType};
use regex::bytes::Regex;

use crate::{bytecount, determine_severity, newline_lines};

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex literal")
}

static REGISTRATION_CALLS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\.AddTool\(",
        r"\.Register\(",
        r"\.RegisterHandler\(",
        r"\.AddRoute\(",
        r"\.Handle\(",
        r"\.HandleFunc\(",
        r"\.Post\(",
        r"\.Get\(",
        r"\.Put\(",
        r"\.Delete\(",
        r"router\.",
        r"mux\.",
        r"app\.Use\(",
        r"container\.Bind\(",
        r"container\.Register",
    ]
    .into_iter()
    .map(re)
    .collect()
});

static GO_FUNC_NAME: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^func\s+(\w+)\s*\("));

static CONST_BLOCK: LazyLock<Regex> = LazyLock::new(|| re(r"const\s*\("));
static CONST_SINGLE: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^const\s+\w+"));
static IOTA: LazyLock<Regex> = LazyLock::new(|| re(r"\biota\b"));
static ENUM_MEMBER: LazyLock<Regex> =
    LazyLock::new(|| re(r#"(?m)^\s*\w+\s*=\s*(iota|\d+|"[^"]*")"#));
static ENUM_DECL: LazyLock<Regex> = LazyLock::new(|| re(r"enum\s+\w+\s*\{"));
static EXPORT_CONST: LazyLock<Regex> = LazyLock::new(|| re(r"export\s+const\s+\w+"));

static FUNC: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^func\s+"));
static METHOD: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^func\s+\([^)]+\)\s+"));
static TYPE_DECL: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?m)^(class|struct|interface|type)\s+\w+"));

static SWITCH: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)switch\s+[^{]*\{"));
static SELECT: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)select\s*\{"));

static EXPORT: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^export\s+"));
static REEXPORT: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?m)^export\s+\*?\s*\{?[^}]*\}?\s*from\s+"));
static IMPORT: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^import\s+"));
static PY_REEXPORT: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^from\s+\.\w+\s+import\s+"));

static TAGGED_FIELD: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^\s+\w+\s+\w+.*`json:"));
static BARE_FIELD: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^\s+\w+\s+\*?\w+[\[\]]*\s*$"));

const BARREL_SUFFIXES: &[&str] = &[
    "index.ts",
    "index.js",
    "__init__.py",
    "mod.rs",
    "exports.ts",
    "exports.js",
];

const CONFIG_MARKERS: &[&str] = &["config", "settings", "options"];

/// Barrels with this many exports are flagged regardless of ratio.
const BARREL_EXPORT_FLOOR: usize = 10;

fn count(re: &Regex, content: &[u8]) -> usize {
    re.find_iter(content).count()
}

fn line_of(content: &[u8], offset: usize) -> usize {
    bytecount(&content[..offset], b'\n') + 1
}

fn metrics<const N: usize>(pairs: [(&str, usize); N]) -> BTreeMap<String, u64> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v as u64))
        .collect()
}

fn pattern(
    pattern_type: AntiPatternType,
    description: String,
    location: String,
    severity: AntiPatternSeverity,
    suggestion: String,
    metrics: BTreeMap<String, u64>,
) -> AntiPattern {
    AntiPattern {
        pattern_type,
        file_path: String::new(),
        description,
        location,
        severity,
        suggestion,
        metrics,
    }
}

/// The single registration call shape with the most occurrences.
pub(crate) fn registration_function(content: &[u8], threshold: usize) -> Option<AntiPattern> {
    let mut best: Option<(&Regex, usize)> = None;
    for call in REGISTRATION_CALLS.iter() {
        let n = count(call, content);
        if n > best.map_or(0, |(_, b)| b) {
            best = Some((call, n));
        }
    }
    let (call, total) = best?;
    if total < threshold {
        return None;
    }
    let (name, range) = containing_function(content, call);
    Some(pattern(
        AntiPatternType::RegistrationFunction,
        format!("Large registration function with {total} sequential registrations"),
        range,
        determine_severity(total, threshold),
        format!(
            "Consider self-registering pattern using init() functions or a plugin architecture. Function: {name}"
        ),
        metrics([("registration_calls", total)]),
    ))
}

/// Name and rough line span of the last `func` declared before the first
/// match of `call`. The span is a fixed 100-line estimate.
fn containing_function(content: &[u8], call: &Regex) -> (String, String) {
    let Some(first) = call.find(content) else {
        return (String::new(), String::new());
    };
    let before = &content[..first.start()];
    let Some(caps) = GO_FUNC_NAME.captures_iter(before).last() else {
        return (String::new(), String::new());
    };
    let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
        return (String::new(), String::new());
    };
    let start = line_of(content, whole.start());
    (
        String::from_utf8_lossy(name.as_bytes()).into_owned(),
        format!("lines {}-{}", start, start + 100),
    )
}

pub(crate) fn enum_aggregation(content: &[u8], threshold: usize) -> Option<AntiPattern> {
    let blocks = count(&CONST_BLOCK, content);
    let singles = count(&CONST_SINGLE, content);
    let iotas = count(&IOTA, content);
    let members = count(&ENUM_MEMBER, content);
    let enums = count(&ENUM_DECL, content);
    let exported = count(&EXPORT_CONST, content);
    let total = blocks + singles + iotas + enums + exported + members;
    if total < threshold {
        return None;
    }
    Some(pattern(
        AntiPatternType::EnumAggregation,
        format!("File contains {total} enum/const definitions"),
        "file-wide".to_string(),
        determine_severity(total, threshold),
        "Consider splitting constants by domain/feature, or using code generation (go:generate stringer)"
            .to_string(),
        metrics([
            ("const_definitions", total),
            ("enum_declarations", enums),
            ("iota_usages", iotas),
        ]),
    ))
}

pub(crate) fn god_object(content: &[u8], threshold: usize) -> Option<AntiPattern> {
    let lines = newline_lines(content);
    if lines < threshold {
        return None;
    }
    let funcs = count(&FUNC, content);
    let methods = count(&METHOD, content);
    let types = count(&TYPE_DECL, content);
    Some(pattern(
        AntiPatternType::GodObject,
        format!("Large file with {lines} lines, {funcs} functions/methods"),
        "entire file".to_string(),
        AntiPatternSeverity::High,
        "Consider splitting into smaller, focused modules by responsibility".to_string(),
        metrics([
            ("line_count", lines),
            ("function_count", funcs),
            ("method_count", methods),
            ("type_count", types),
        ]),
    ))
}

/// One finding per oversized `switch`, then one per oversized `select`.
pub(crate) fn switch_factories(content: &[u8], threshold: usize) -> Vec<AntiPattern> {
    let shapes = [
        (&*SWITCH, "switch", "Consider using a map-based dispatch or strategy pattern"),
        (&*SELECT, "select", "Consider restructuring to reduce case complexity"),
    ];
    let mut found = Vec::new();
    for (re, keyword, suggestion) in shapes {
        for m in re.find_iter(content) {
            let cases = count_cases(content, m.end());
            if cases < threshold {
                continue;
            }
            found.push(pattern(
                AntiPatternType::SwitchFactory,
                format!("Large {keyword} statement with {cases} cases"),
                format!("line {}", line_of(content, m.start())),
                determine_severity(cases, threshold),
                suggestion.to_string(),
                metrics([("case_count", cases)]),
            ));
        }
    }
    found
}

/// `case` and `default` keywords between `start` and the brace that closes
/// the block opened just before it. Nested blocks are walked, not skipped.
pub(crate) fn count_cases(content: &[u8], start: usize) -> usize {
    let len = content.len();
    let mut depth = 1usize;
    let mut cases = 0;
    let mut i = start;
    while i < len && depth > 0 {
        match content[i] {
            b'{' => depth += 1,
            b'}' => depth -= 1,
            _ if i + 4 < len && &content[i..i + 4] == b"case" => {
                if is_keyword_at(content, i, 4) {
                    cases += 1;
                }
            }
            _ if i + 7 < len && &content[i..i + 7] == b"default" => {
                if is_keyword_at(content, i, 7) {
                    cases += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    cases
}

fn is_keyword_at(content: &[u8], at: usize, width: usize) -> bool {
    let before_ok = at == 0 || !is_word_byte(content[at - 1]);
    let after_ok = content.get(at + width).is_none_or(|&b| !is_word_byte(b));
    before_ok && after_ok
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

pub(crate) fn barrel_file(content: &[u8], file_path: &str, ratio_threshold: f64) -> Option<AntiPattern> {
    if !BARREL_SUFFIXES.iter().any(|s| file_path.ends_with(s)) {
        return None;
    }
    let exports = count(&EXPORT, content);
    let reexports = count(&REEXPORT, content);
    let imports = count(&IMPORT, content);
    let py = count(&PY_REEXPORT, content);

    let total = exports + reexports + py;
    let lines = newline_lines(content);
    let ratio = total as f64 / lines as f64;
    if ratio < ratio_threshold && total < BARREL_EXPORT_FLOOR {
        return None;
    }
    Some(pattern(
        AntiPatternType::BarrelFile,
        format!(
            "Barrel/index file with {total} exports ({:.0}% of lines)",
            ratio * 100.0
        ),
        "entire file".to_string(),
        determine_severity(total, BARREL_EXPORT_FLOOR),
        "Consider direct imports instead of barrel files, or split by feature domain".to_string(),
        metrics([
            ("export_statements", total),
            ("import_statements", imports),
            ("total_lines", lines),
        ]),
    ))
}

pub(crate) fn config_aggregation(content: &[u8], file_path: &str, threshold: usize) -> Option<AntiPattern> {
    let lower = file_path.to_lowercase();
    if !CONFIG_MARKERS.iter().any(|m| lower.contains(m)) {
        return None;
    }
    let mut fields = count(&TAGGED_FIELD, content);
    if fields == 0 {
        fields = count(&BARE_FIELD, content);
    }
    if fields < threshold {
        return None;
    }
    Some(pattern(
        AntiPatternType::ConfigAggregation,
        format!("Large config file with {fields} fields"),
        "file-wide".to_string(),
        determine_severity(fields, threshold),
        "Consider splitting config by module/feature with nested structs".to_string(),
        metrics([("field_count", fields)]),
    ))
}
