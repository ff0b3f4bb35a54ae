//! Per-language naming conventions.
//!
//! The table is data: adding a language means adding a row to
//! the row table below, not another branch somewhere.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use churnlens_path::extension_lower;
use serde::{Deserialize, Serialize};

use crate::case::CaseStyle;
use crate::case::CaseStyle::{CamelCase as Camel, PascalCase as Pascal, SnakeCase as Snake};
use self::SymbolKind as K;

/// Source language, resolved from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    JavaScript,
    TypeScript,
    Python,
    Rust,
    Java,
    CSharp,
    Cpp,
    C,
    Php,
    Ruby,
    Swift,
    Kotlin,
    Scala,
    Zig,
    Unknown,
}

impl Language {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Java => "java",
            Language::CSharp => "csharp",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::Scala => "scala",
            Language::Zig => "zig",
            Language::Unknown => "unknown",
        }
    }

    /// Language of `path` by extension; case-insensitive.
    ///
    /// ```
    /// use churnlens_naming::Language;
    ///
    /// assert_eq!(Language::from_path("cmd/main.go"), Language::Go);
    /// assert_eq!(Language::from_path("web/App.TSX"), Language::TypeScript);
    /// assert_eq!(Language::from_path("Makefile"), Language::Unknown);
    /// ```
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        match extension_lower(path).as_str() {
            ".go" => Language::Go,
            ".js" | ".jsx" | ".mjs" | ".cjs" => Language::JavaScript,
            ".ts" | ".tsx" | ".mts" | ".cts" => Language::TypeScript,
            ".py" | ".pyw" | ".pyi" => Language::Python,
            ".rs" => Language::Rust,
            ".java" => Language::Java,
            ".cs" => Language::CSharp,
            ".cpp" | ".cc" | ".cxx" | ".hpp" | ".hxx" | ".h++" => Language::Cpp,
            ".c" | ".h" => Language::C,
            ".php" => Language::Php,
            ".rb" => Language::Ruby,
            ".swift" => Language::Swift,
            ".kt" | ".kts" => Language::Kotlin,
            ".scala" | ".sc" => Language::Scala,
            ".zig" => Language::Zig,
            _ => Language::Unknown,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a symbol is, for convention purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Interface,
    Struct,
    Type,
    Constant,
    Variable,
    Field,
    Enum,
    EnumMember,
    Module,
    Namespace,
    Property,
    Unknown,
}

impl SymbolKind {
    /// Map an index symbol type string onto a kind.
    #[must_use]
    pub fn from_symbol_type(symbol_type: &str) -> Self {
        match symbol_type {
            "function" => SymbolKind::Function,
            "method" => SymbolKind::Method,
            "class" => SymbolKind::Class,
            "interface" => SymbolKind::Interface,
            "struct" => SymbolKind::Struct,
            "type" | "type_alias" => SymbolKind::Type,
            "constant" => SymbolKind::Constant,
            "variable" => SymbolKind::Variable,
            "field" => SymbolKind::Field,
            "enum" => SymbolKind::Enum,
            "enum_member" => SymbolKind::EnumMember,
            "module" => SymbolKind::Module,
            "namespace" => SymbolKind::Namespace,
            "property" => SymbolKind::Property,
            _ => SymbolKind::Unknown,
        }
    }
}

type Row = (Language, &'static [(SymbolKind, &'static [CaseStyle])]);

const PASCAL_OR_CAMEL: &[CaseStyle] = &[Pascal, Camel];

const CONVENTION_ROWS: &[Row] = &[
    (
        Language::Go,
        &[
            (K::Function, PASCAL_OR_CAMEL),
            (K::Method, PASCAL_OR_CAMEL),
            (K::Class, PASCAL_OR_CAMEL),
            (K::Interface, PASCAL_OR_CAMEL),
            (K::Struct, PASCAL_OR_CAMEL),
            (K::Type, PASCAL_OR_CAMEL),
            (K::Constant, PASCAL_OR_CAMEL),
            (K::Variable, PASCAL_OR_CAMEL),
            (K::Field, PASCAL_OR_CAMEL),
            (K::Enum, PASCAL_OR_CAMEL),
            (K::EnumMember, PASCAL_OR_CAMEL),
        ],
    ),
    (
        Language::JavaScript,
        &[
            (K::Function, &[Camel]),
            (K::Method, &[Camel]),
            (K::Class, &[Pascal]),
            (K::Interface, &[Pascal]),
            (K::Constant, &[Camel, Snake]),
            (K::Variable, &[Camel]),
            (K::Field, &[Camel]),
            (K::Property, &[Camel]),
        ],
    ),
    (
        Language::TypeScript,
        &[
            (K::Function, &[Camel]),
            (K::Method, &[Camel]),
            (K::Class, &[Pascal]),
            (K::Interface, &[Pascal]),
            (K::Type, &[Pascal]),
            (K::Constant, &[Camel, Snake]),
            (K::Variable, &[Camel]),
            (K::Field, &[Camel]),
            (K::Property, &[Camel]),
            (K::Enum, &[Pascal]),
            (K::EnumMember, &[Pascal, Snake]),
        ],
    ),
    (
        Language::Python,
        &[
            (K::Function, &[Snake]),
            (K::Method, &[Snake]),
            (K::Class, &[Pascal]),
            (K::Constant, &[Snake]),
            (K::Variable, &[Snake]),
            (K::Field, &[Snake]),
            (K::Property, &[Snake]),
            (K::Module, &[Snake]),
        ],
    ),
    (
        Language::Rust,
        &[
            (K::Function, &[Snake]),
            (K::Method, &[Snake]),
            (K::Class, &[Pascal]),
            (K::Interface, &[Pascal]),
            (K::Struct, &[Pascal]),
            (K::Type, &[Pascal]),
            (K::Constant, &[Snake]),
            (K::Variable, &[Snake]),
            (K::Field, &[Snake]),
            (K::Enum, &[Pascal]),
            (K::EnumMember, &[Pascal]),
            (K::Module, &[Snake]),
        ],
    ),
    (
        Language::Java,
        &[
            (K::Function, &[Camel]),
            (K::Method, &[Camel]),
            (K::Class, &[Pascal]),
            (K::Interface, &[Pascal]),
            (K::Constant, &[Snake]),
            (K::Variable, &[Camel]),
            (K::Field, &[Camel]),
            (K::Enum, &[Pascal]),
            (K::EnumMember, &[Snake]),
        ],
    ),
    (
        Language::CSharp,
        &[
            (K::Function, &[Pascal]),
            (K::Method, &[Pascal, Camel]),
            (K::Class, &[Pascal]),
            (K::Interface, &[Pascal]),
            (K::Struct, &[Pascal]),
            (K::Constant, &[Pascal]),
            (K::Variable, &[Camel]),
            (K::Field, &[Camel, Pascal]),
            (K::Property, &[Pascal]),
            (K::Enum, &[Pascal]),
            (K::EnumMember, &[Pascal]),
            (K::Namespace, &[Pascal]),
        ],
    ),
    (
        Language::Cpp,
        &[
            (K::Function, &[Snake, Camel, Pascal]),
            (K::Method, &[Snake, Camel, Pascal]),
            (K::Class, &[Pascal]),
            (K::Struct, &[Pascal, Snake]),
            (K::Constant, &[Snake]),
            (K::Variable, &[Snake, Camel]),
            (K::Field, &[Snake, Camel]),
            (K::Namespace, &[Snake, Pascal]),
        ],
    ),
    (
        Language::C,
        &[
            (K::Function, &[Snake]),
            (K::Struct, &[Snake, Pascal]),
            (K::Constant, &[Snake]),
            (K::Variable, &[Snake]),
            (K::Field, &[Snake]),
        ],
    ),
    (
        Language::Ruby,
        &[
            (K::Function, &[Snake]),
            (K::Method, &[Snake]),
            (K::Class, &[Pascal]),
            (K::Module, &[Pascal]),
            (K::Constant, &[Snake]),
            (K::Variable, &[Snake]),
            (K::Field, &[Snake]),
        ],
    ),
    (
        Language::Swift,
        &[
            (K::Function, &[Camel]),
            (K::Method, &[Camel]),
            (K::Class, &[Pascal]),
            (K::Interface, &[Pascal]),
            (K::Struct, &[Pascal]),
            (K::Type, &[Pascal]),
            (K::Constant, &[Camel]),
            (K::Variable, &[Camel]),
            (K::Property, &[Camel]),
            (K::Enum, &[Pascal]),
            (K::EnumMember, &[Camel]),
        ],
    ),
    (
        Language::Kotlin,
        &[
            (K::Function, &[Camel]),
            (K::Method, &[Camel]),
            (K::Class, &[Pascal]),
            (K::Interface, &[Pascal]),
            (K::Constant, &[Snake]),
            (K::Variable, &[Camel]),
            (K::Property, &[Camel]),
            (K::Enum, &[Pascal]),
            (K::EnumMember, &[Snake]),
        ],
    ),
    (
        Language::Scala,
        &[
            (K::Function, &[Camel]),
            (K::Method, &[Camel]),
            (K::Class, &[Pascal]),
            (K::Interface, &[Pascal]),
            (K::Type, &[Pascal]),
            (K::Constant, &[Pascal]),
            (K::Variable, &[Camel]),
        ],
    ),
    (
        Language::Zig,
        &[
            (K::Function, &[Camel]),
            (K::Struct, &[Pascal]),
            (K::Type, &[Pascal]),
            (K::Constant, &[Snake]),
            (K::Variable, &[Snake, Camel]),
        ],
    ),
];

type ConventionTable = BTreeMap<Language, BTreeMap<SymbolKind, &'static [CaseStyle]>>;

static CONVENTIONS: LazyLock<ConventionTable> = LazyLock::new(|| {
    CONVENTION_ROWS
        .iter()
        .map(|(lang, kinds)| (*lang, kinds.iter().copied().collect()))
        .collect()
});

/// Accepted styles for `kind` in `lang`, in preference order.
///
/// `None` when the language has no table or the kind has no rule; either
/// way every style is acceptable.
#[must_use]
pub fn expected_styles(lang: Language, kind: SymbolKind) -> Option<&'static [CaseStyle]> {
    CONVENTIONS.get(&lang)?.get(&kind).copied()
}

/// Whether `style` is acceptable for `kind` in `lang`.
#[must_use]
pub fn is_valid_case_style(lang: Language, kind: SymbolKind, style: CaseStyle) -> bool {
    expected_styles(lang, kind).is_none_or(|styles| styles.contains(&style))
}

/// `"a"`, `"a or b"`, `"a, b, or c"`.
#[must_use]
pub fn format_expected_styles(styles: &[CaseStyle]) -> String {
    match styles {
        [] => String::new(),
        [only] => only.as_str().to_string(),
        [a, b] => format!("{a} or {b}"),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|s| s.as_str()).collect();
            format!("{}, or {last}", head.join(", "))
        }
    }
}
