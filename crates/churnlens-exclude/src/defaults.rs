//! Built-in exclusion lists.
//!
//! These cover files that change often without representing code churn:
//! docs, lock files, build output, binaries, media, vendored trees, editor
//! and CI metadata.

/// Filenames excluded by exact, case-sensitive base-name match.
pub const EXCLUDED_EXACT_FILES: &[&str] = &[
    "CHANGELOG.md",
    "CHANGELOG",
    "HISTORY.md",
    "CHANGES.md",
    "NEWS.md",
    "RELEASES.md",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "go.sum",
    "Cargo.lock",
    "poetry.lock",
    "composer.lock",
    "Gemfile.lock",
];

/// Glob patterns checked after the exact-name set.
pub const EXCLUDED_FILE_PATTERNS: &[&str] = &[
    // docs
    "CHANGELOG*",
    "HISTORY*",
    "CHANGES*",
    "NEWS*",
    "RELEASE*",
    "*.md",
    "*.rst",
    "*.txt",
    "docs/*",
    "doc/*",
    "documentation/*",
    // generated / minified
    "*.min.js",
    "*.min.css",
    "*.bundle.js",
    "*.bundle.css",
    "*.generated.*",
    "*.g.dart",
    "*.freezed.dart",
    "*.d.ts",
    "index.d.ts",
    // lock files
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Gemfile.lock",
    "poetry.lock",
    "Cargo.lock",
    "go.sum",
    "composer.lock",
    // build output
    "dist/*",
    "build/*",
    "out/*",
    "target/*",
    ".next/*",
    "bin/*",
    "obj/*",
    "Debug/*",
    "Release/*",
    "x64/*",
    "x86/*",
    "artifacts/*",
    "output/*",
    "_build/*",
    "__pycache__/*",
    ".cache/*",
    // binaries and libraries
    "*.exe",
    "*.dll",
    "*.so",
    "*.dylib",
    "*.a",
    "*.lib",
    "*.o",
    "*.obj",
    "*.pyc",
    "*.pyo",
    "*.class",
    "*.jar",
    "*.war",
    "*.ear",
    "*.wasm",
    "*.bin",
    "*.dat",
    "*.db",
    "*.sqlite",
    "*.sqlite3",
    "*.mdb",
    "*.ldb",
    // media
    "*.png",
    "*.jpg",
    "*.jpeg",
    "*.gif",
    "*.ico",
    "*.svg",
    "*.webp",
    "*.bmp",
    "*.tiff",
    "*.mp3",
    "*.mp4",
    "*.wav",
    "*.avi",
    "*.mov",
    "*.webm",
    "*.ogg",
    "*.flac",
    "*.pdf",
    // fonts
    "*.woff",
    "*.woff2",
    "*.ttf",
    "*.otf",
    "*.eot",
    // archives and packages
    "*.zip",
    "*.tar",
    "*.gz",
    "*.tgz",
    "*.bz2",
    "*.xz",
    "*.7z",
    "*.rar",
    "*.nupkg",
    "*.gem",
    "*.egg",
    "*.whl",
    // vendored dependencies
    "vendor/*",
    "node_modules/*",
    "third_party/*",
    "packages/*",
    "bower_components/*",
    // editors
    ".idea/*",
    ".vscode/*",
    "*.iml",
    "*.suo",
    "*.user",
    "*.userosscache",
    "*.sln.docstates",
    // CI
    ".github/*",
    ".gitlab-ci.yml",
    ".travis.yml",
    "Jenkinsfile",
    // coverage and test output
    "coverage/*",
    ".nyc_output/*",
    "*.coverage",
    "*.lcov",
    "test-results/*",
    "junit.xml",
];
