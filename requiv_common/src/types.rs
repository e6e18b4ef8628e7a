use serde::{Deserialize, Serialize};

/// Default recursion limit for graph traversal
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 10;

fn default_max_recursion_depth() -> usize {
    DEFAULT_MAX_RECURSION_DEPTH
}

/// String-specific overrides. When present they replace the generic
/// normalization flags for string values instead of merging with them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringComparisonConfig {
    #[serde(default)]
    pub ignore_case: bool,

    #[serde(default)]
    pub ignore_leading_whitespace: bool,

    #[serde(default)]
    pub ignore_trailing_whitespace: bool,

    #[serde(default)]
    pub ignore_newline_style: bool,
}

/// Persisted equivalency defaults (`requiv.toml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalencyConfig {
    /// Compare strings case-insensitively
    #[serde(default)]
    pub ignore_case: bool,

    #[serde(default)]
    pub ignore_leading_whitespace: bool,

    #[serde(default)]
    pub ignore_trailing_whitespace: bool,

    /// Treat "\r\n", "\r" and "\n" as the same line ending
    #[serde(default)]
    pub ignore_newline_style: bool,

    /// Dispatch on runtime types instead of declared types
    #[serde(default)]
    pub use_runtime_types: bool,

    /// Maximum traversal depth below the root
    #[serde(default = "default_max_recursion_depth")]
    pub max_recursion_depth: usize,

    /// Disable the depth limit entirely
    #[serde(default)]
    pub allow_infinite_recursion: bool,

    /// Report revisited (cyclic) references instead of assuming equivalence
    #[serde(default)]
    pub fail_on_cyclic_references: bool,

    /// Member paths to skip (glob patterns, e.g. "*.Id")
    #[serde(default)]
    pub excluded_members: Vec<String>,

    /// Optional string-specific overrides
    #[serde(default)]
    pub strings: Option<StringComparisonConfig>,
}

impl Default for EquivalencyConfig {
    fn default() -> Self {
        Self {
            ignore_case: false,
            ignore_leading_whitespace: false,
            ignore_trailing_whitespace: false,
            ignore_newline_style: false,
            use_runtime_types: false,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            allow_infinite_recursion: false,
            fail_on_cyclic_references: false,
            excluded_members: Vec::new(),
            strings: None,
        }
    }
}
