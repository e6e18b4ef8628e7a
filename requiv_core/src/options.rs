use glob::Pattern;
use requiv_common::{
    EquivalencyConfig, EquivalencyError, StringComparisonConfig, ValueType,
    DEFAULT_MAX_RECURSION_DEPTH,
};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Normalization rules for comparing two strings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringEqualityOptions {
    pub ignore_case: bool,
    pub ignore_leading_whitespace: bool,
    pub ignore_trailing_whitespace: bool,
    pub ignore_newline_style: bool,
}

impl StringEqualityOptions {
    pub fn ignoring_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    pub fn ignoring_leading_whitespace(mut self) -> Self {
        self.ignore_leading_whitespace = true;
        self
    }

    pub fn ignoring_trailing_whitespace(mut self) -> Self {
        self.ignore_trailing_whitespace = true;
        self
    }

    pub fn ignoring_newline_style(mut self) -> Self {
        self.ignore_newline_style = true;
        self
    }
}

impl From<&StringComparisonConfig> for StringEqualityOptions {
    fn from(config: &StringComparisonConfig) -> Self {
        Self {
            ignore_case: config.ignore_case,
            ignore_leading_whitespace: config.ignore_leading_whitespace,
            ignore_trailing_whitespace: config.ignore_trailing_whitespace,
            ignore_newline_style: config.ignore_newline_style,
        }
    }
}

type Refinement = dyn Fn(EquivalencyOptions) -> EquivalencyOptions + Send + Sync;

/// Refinement registered with [`EquivalencyOptions::for_type`]. It is kept as
/// a function and applied to whatever options are in force when a node of
/// that type is reached.
#[derive(Clone)]
pub struct TypeOverride(Arc<Refinement>);

impl TypeOverride {
    fn new(refine: impl Fn(EquivalencyOptions) -> EquivalencyOptions + Send + Sync + 'static) -> Self {
        Self(Arc::new(refine))
    }

    /// Run `self` first, then `next`
    fn then(self, next: TypeOverride) -> Self {
        Self::new(move |options| (next.0)((self.0)(options)))
    }

    pub fn apply(&self, options: EquivalencyOptions) -> EquivalencyOptions {
        (self.0)(options)
    }
}

impl fmt::Debug for TypeOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeOverride(..)")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CyclicReferenceHandling {
    /// A record pair revisited on the same path is assumed equivalent
    #[default]
    Ignore,
    /// A record pair revisited on the same path is reported as a failure
    Fail,
}

#[derive(Debug, Clone)]
enum MemberExclusion {
    Path(String),
    Pattern(Pattern),
}

impl MemberExclusion {
    fn matches(&self, path: &str) -> bool {
        match self {
            MemberExclusion::Path(excluded) => excluded == path,
            MemberExclusion::Pattern(pattern) => pattern.matches(path),
        }
    }
}

/// Immutable configuration for one equivalency check.
///
/// Every refinement consumes the value and returns a new one.
#[derive(Debug, Clone)]
pub struct EquivalencyOptions {
    ignore_case: bool,
    ignore_leading_whitespace: bool,
    ignore_trailing_whitespace: bool,
    ignore_newline_style: bool,
    use_runtime_types: bool,
    max_recursion_depth: Option<usize>,
    cyclic_reference_handling: CyclicReferenceHandling,
    exclusions: Vec<MemberExclusion>,
    string_override: Option<StringEqualityOptions>,
    type_overrides: BTreeMap<ValueType, TypeOverride>,
}

impl Default for EquivalencyOptions {
    fn default() -> Self {
        Self {
            ignore_case: false,
            ignore_leading_whitespace: false,
            ignore_trailing_whitespace: false,
            ignore_newline_style: false,
            use_runtime_types: false,
            max_recursion_depth: Some(DEFAULT_MAX_RECURSION_DEPTH),
            cyclic_reference_handling: CyclicReferenceHandling::Ignore,
            exclusions: Vec::new(),
            string_override: None,
            type_overrides: BTreeMap::new(),
        }
    }
}

impl EquivalencyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EquivalencyConfig) -> Result<Self, EquivalencyError> {
        let mut options = Self {
            ignore_case: config.ignore_case,
            ignore_leading_whitespace: config.ignore_leading_whitespace,
            ignore_trailing_whitespace: config.ignore_trailing_whitespace,
            ignore_newline_style: config.ignore_newline_style,
            use_runtime_types: config.use_runtime_types,
            max_recursion_depth: if config.allow_infinite_recursion {
                None
            } else {
                Some(config.max_recursion_depth)
            },
            cyclic_reference_handling: if config.fail_on_cyclic_references {
                CyclicReferenceHandling::Fail
            } else {
                CyclicReferenceHandling::Ignore
            },
            ..Self::default()
        };

        for pattern in &config.excluded_members {
            options = options.excluding_matching(pattern)?;
        }

        if let Some(strings) = &config.strings {
            let strings = StringEqualityOptions::from(strings);
            options = options.with_string_options(|_| strings);
        }

        Ok(options)
    }

    pub fn ignoring_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    pub fn ignoring_leading_whitespace(mut self) -> Self {
        self.ignore_leading_whitespace = true;
        self
    }

    pub fn ignoring_trailing_whitespace(mut self) -> Self {
        self.ignore_trailing_whitespace = true;
        self
    }

    pub fn ignoring_newline_style(mut self) -> Self {
        self.ignore_newline_style = true;
        self
    }

    pub fn respecting_runtime_types(mut self) -> Self {
        self.use_runtime_types = true;
        self
    }

    pub fn respecting_declared_types(mut self) -> Self {
        self.use_runtime_types = false;
        self
    }

    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = Some(depth);
        self
    }

    pub fn allowing_infinite_recursion(mut self) -> Self {
        self.max_recursion_depth = None;
        self
    }

    pub fn ignoring_cyclic_references(mut self) -> Self {
        self.cyclic_reference_handling = CyclicReferenceHandling::Ignore;
        self
    }

    pub fn failing_on_cyclic_references(mut self) -> Self {
        self.cyclic_reference_handling = CyclicReferenceHandling::Fail;
        self
    }

    /// Skip the member at exactly `path` (e.g. `Address.City`)
    pub fn excluding(mut self, path: impl Into<String>) -> Self {
        self.exclusions.push(MemberExclusion::Path(path.into()));
        self
    }

    /// Skip every member whose path matches the glob `pattern` (e.g. `*.Id`).
    /// Brackets are glob character classes; escape them to match indices.
    pub fn excluding_matching(mut self, pattern: &str) -> Result<Self, EquivalencyError> {
        let pattern = Pattern::new(pattern).map_err(|e| {
            EquivalencyError::Config(format!("Invalid member pattern '{}': {}", pattern, e))
        })?;
        self.exclusions.push(MemberExclusion::Pattern(pattern));
        Ok(self)
    }

    /// Install string-specific options. They start blank rather than from
    /// the generic flags and fully replace those flags for strings.
    ///
    /// A `for_type(ValueType::String, ..)` refinement is applied on top of
    /// these rules, whichever of the two was configured first.
    pub fn with_string_options(
        mut self,
        configure: impl FnOnce(StringEqualityOptions) -> StringEqualityOptions,
    ) -> Self {
        self.string_override = Some(configure(StringEqualityOptions::default()));
        self
    }

    /// Refine the options for nodes whose expected type is `value_type` and
    /// for their descendants.
    ///
    /// `configure` runs when such a node is reached, on the options in force
    /// there, so settings made before or after this call are inherited.
    /// Repeated calls for the same type are applied in call order.
    pub fn for_type(
        mut self,
        value_type: ValueType,
        configure: impl Fn(EquivalencyOptions) -> EquivalencyOptions + Send + Sync + 'static,
    ) -> Self {
        let refinement = TypeOverride::new(configure);
        let refinement = match self.type_overrides.remove(&value_type) {
            Some(existing) => existing.then(refinement),
            None => refinement,
        };
        self.type_overrides.insert(value_type, refinement);
        self
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn ignore_leading_whitespace(&self) -> bool {
        self.ignore_leading_whitespace
    }

    pub fn ignore_trailing_whitespace(&self) -> bool {
        self.ignore_trailing_whitespace
    }

    pub fn ignore_newline_style(&self) -> bool {
        self.ignore_newline_style
    }

    pub fn use_runtime_types(&self) -> bool {
        self.use_runtime_types
    }

    pub fn max_recursion_depth(&self) -> Option<usize> {
        self.max_recursion_depth
    }

    pub fn cyclic_reference_handling(&self) -> CyclicReferenceHandling {
        self.cyclic_reference_handling
    }

    pub fn string_override(&self) -> Option<StringEqualityOptions> {
        self.string_override
    }

    pub fn has_override_for(&self, value_type: &ValueType) -> bool {
        self.type_overrides.contains_key(value_type)
    }

    /// Options that govern a node of `expected_type` and its descendants.
    ///
    /// Borrows `self` unless a refinement is registered for that type. The
    /// refinement is then applied to a copy of `self` with that entry removed,
    /// so a descendant of the same type does not apply it twice.
    pub fn resolve_for(&self, expected_type: &ValueType) -> Cow<'_, EquivalencyOptions> {
        let Some(refinement) = self.type_overrides.get(expected_type) else {
            return Cow::Borrowed(self);
        };

        let mut base = self.clone();
        base.type_overrides.remove(expected_type);

        // String refinements build on the string-specific rules in force
        if *expected_type == ValueType::String {
            if let Some(strings) = base.string_override.take() {
                base.ignore_case = strings.ignore_case;
                base.ignore_leading_whitespace = strings.ignore_leading_whitespace;
                base.ignore_trailing_whitespace = strings.ignore_trailing_whitespace;
                base.ignore_newline_style = strings.ignore_newline_style;
            }
        }

        Cow::Owned(refinement.apply(base))
    }

    /// String comparison rules: the string-specific override verbatim when
    /// present, otherwise derived from the generic flags.
    pub fn string_options(&self) -> StringEqualityOptions {
        self.string_override.unwrap_or(StringEqualityOptions {
            ignore_case: self.ignore_case,
            ignore_leading_whitespace: self.ignore_leading_whitespace,
            ignore_trailing_whitespace: self.ignore_trailing_whitespace,
            ignore_newline_style: self.ignore_newline_style,
        })
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        !path.is_empty() && self.exclusions.iter().any(|e| e.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refinement_does_not_touch_original() {
        let base = EquivalencyOptions::new();
        let refined = base.clone().ignoring_case();
        assert!(!base.ignore_case());
        assert!(refined.ignore_case());
    }

    #[test]
    fn test_string_options_synthesized_from_generic_flags() {
        let options = EquivalencyOptions::new()
            .ignoring_case()
            .ignoring_trailing_whitespace();
        let strings = options.string_options();
        assert!(strings.ignore_case);
        assert!(strings.ignore_trailing_whitespace);
        assert!(!strings.ignore_leading_whitespace);
        assert!(!strings.ignore_newline_style);
    }

    #[test]
    fn test_string_override_supersedes_generic_flags() {
        let options = EquivalencyOptions::new()
            .ignoring_case()
            .with_string_options(|s| s.ignoring_newline_style());
        let strings = options.string_options();
        assert!(!strings.ignore_case);
        assert!(strings.ignore_newline_style);
        assert_eq!(
            options.string_override(),
            Some(StringEqualityOptions::default().ignoring_newline_style())
        );
    }

    #[test]
    fn test_nested_override_resolution() {
        let address = ValueType::record("Address");
        let options = EquivalencyOptions::new().for_type(address.clone(), |o| o.ignoring_case());

        assert!(options.resolve_for(&address).ignore_case());
        assert!(matches!(options.resolve_for(&ValueType::String), Cow::Borrowed(_)));
        assert!(!options.ignore_case());
    }

    #[test]
    fn test_type_override_inherits_later_refinements() {
        let address = ValueType::record("Address");
        let options = EquivalencyOptions::new()
            .for_type(address.clone(), |o| o.ignoring_case())
            .excluding("Address.Zip")
            .allowing_infinite_recursion()
            .failing_on_cyclic_references();

        let resolved = options.resolve_for(&address);
        assert!(resolved.ignore_case());
        assert!(resolved.is_excluded("Address.Zip"));
        assert_eq!(resolved.max_recursion_depth(), None);
        assert_eq!(resolved.cyclic_reference_handling(), CyclicReferenceHandling::Fail);
        assert!(!resolved.has_override_for(&address));
    }

    #[test]
    fn test_repeated_type_overrides_compose_in_order() {
        let address = ValueType::record("Address");
        let options = EquivalencyOptions::new()
            .for_type(address.clone(), |o| o.ignoring_case().with_max_recursion_depth(3))
            .for_type(address.clone(), |o| o.with_max_recursion_depth(5));

        let resolved = options.resolve_for(&address);
        assert!(resolved.ignore_case());
        assert_eq!(resolved.max_recursion_depth(), Some(5));
    }

    #[test]
    fn test_string_override_and_string_type_override_combine() {
        let both_orders = [
            EquivalencyOptions::new()
                .for_type(ValueType::String, |o| o.ignoring_case())
                .with_string_options(|s| s.ignoring_trailing_whitespace()),
            EquivalencyOptions::new()
                .with_string_options(|s| s.ignoring_trailing_whitespace())
                .for_type(ValueType::String, |o| o.ignoring_case()),
        ];

        for options in both_orders {
            let strings = options.resolve_for(&ValueType::String).string_options();
            assert!(strings.ignore_case);
            assert!(strings.ignore_trailing_whitespace);
            assert!(!strings.ignore_leading_whitespace);
            // Outside string nodes the override alone applies
            assert!(!options.string_options().ignore_case);
        }
    }

    #[test]
    fn test_exclusions() {
        let options = EquivalencyOptions::new()
            .excluding("Address.City")
            .excluding_matching("*.Id")
            .unwrap();
        assert!(options.is_excluded("Address.City"));
        assert!(options.is_excluded("Customer.Id"));
        assert!(!options.is_excluded("Address.Street"));
        assert!(!options.is_excluded(""));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = EquivalencyOptions::new().excluding_matching("[").unwrap_err();
        assert!(matches!(err, EquivalencyError::Config(_)));
    }

    #[test]
    fn test_from_config() {
        let config = EquivalencyConfig {
            ignore_case: true,
            allow_infinite_recursion: true,
            fail_on_cyclic_references: true,
            excluded_members: vec!["Audit.*".to_string()],
            strings: Some(StringComparisonConfig {
                ignore_newline_style: true,
                ..Default::default()
            }),
            ..Default::default()
        };

        let options = EquivalencyOptions::from_config(&config).unwrap();
        assert!(options.ignore_case());
        assert_eq!(options.max_recursion_depth(), None);
        assert_eq!(options.cyclic_reference_handling(), CyclicReferenceHandling::Fail);
        assert!(options.is_excluded("Audit.CreatedBy"));
        assert!(!options.string_options().ignore_case);
        assert!(options.string_options().ignore_newline_style);
    }
}
