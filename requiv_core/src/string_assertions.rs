use crate::chain::AssertionChain;
use crate::message::escape_placeholders;
use crate::options::StringEqualityOptions;
use similar::{ChangeTag, TextDiff};

/// Characters quoted after "differs near"
const NEAR_LENGTH: usize = 3;

/// General-purpose string equality assertion.
///
/// Creating one begins a logical assertion on the chain, so a caller that
/// wants the outcome folded into its own assertion must call
/// [`AssertionChain::reuse_once`] first.
pub struct StringAssertions<'a> {
    chain: &'a mut AssertionChain,
    subject: &'a str,
    description: String,
}

impl<'a> StringAssertions<'a> {
    pub fn new(chain: &'a mut AssertionChain, subject: &'a str, description: impl Into<String>) -> Self {
        chain.begin_assertion();
        Self {
            chain,
            subject,
            description: description.into(),
        }
    }

    /// Assert the subject equals `expected` after normalizing both sides
    pub fn be_equivalent_to(self, expected: &str, options: &StringEqualityOptions) -> &'a mut AssertionChain {
        let StringAssertions {
            chain,
            subject,
            description,
        } = self;

        let expected_normalized = normalize(expected, options);
        let subject_normalized = normalize(subject, options);

        if expected_normalized == subject_normalized {
            return chain;
        }

        // Positions refer to the normalized text, the quoted values are the originals
        let index = first_difference(&expected_normalized, &subject_normalized);
        let expected_length = expected_normalized.chars().count();
        let subject_length = subject_normalized.chars().count();
        let near_source = if index < subject_length {
            &subject_normalized
        } else {
            &expected_normalized
        };
        let near = format!(
            "\"{}\"",
            near_source.chars().skip(index).take(NEAR_LENGTH).collect::<String>()
        );

        let line_diff = if expected_normalized.contains('\n') || subject_normalized.contains('\n') {
            render_line_diff(&expected_normalized, &subject_normalized)
        } else {
            String::new()
        };

        let description = escape_placeholders(&description);
        let template = if expected_length != subject_length {
            format!(
                "Expected {} to be {{0}} with a length of {{2}}{{reason}}, but {{1}} has a length of {{3}}, differs near {{4}} (index {{5}}).{{6}}",
                description
            )
        } else {
            format!(
                "Expected {} to be {{0}}{{reason}}, but {{1}} differs near {{4}} (index {{5}}).{{6}}",
                description
            )
        };

        let expected_quoted = format!("\"{}\"", expected);
        let subject_quoted = format!("\"{}\"", subject);
        chain.fail_with(
            &template,
            &[
                &expected_quoted,
                &subject_quoted,
                &expected_length,
                &subject_length,
                &near,
                &index,
                &line_diff,
            ],
        )
    }
}

/// Apply newline, whitespace and case normalization
pub fn normalize(text: &str, options: &StringEqualityOptions) -> String {
    let mut result = text.to_string();

    if options.ignore_newline_style {
        result = result.replace("\r\n", "\n").replace('\r', "\n");
    }

    if options.ignore_leading_whitespace {
        result = result.trim_start().to_string();
    }

    if options.ignore_trailing_whitespace {
        result = result.trim_end().to_string();
    }

    if options.ignore_case {
        result = result.to_lowercase();
    }

    result
}

/// Character index of the first difference
fn first_difference(expected: &str, subject: &str) -> usize {
    expected
        .chars()
        .zip(subject.chars())
        .take_while(|(e, s)| e == s)
        .count()
}

fn render_line_diff(expected: &str, subject: &str) -> String {
    let diff = TextDiff::from_lines(expected, subject);
    let mut output = String::from("\nLine differences (- expected, + subject):");

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Equal => ' ',
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
        };
        output.push('\n');
        output.push(sign);
        output.push_str(change.value().trim_end_matches('\n'));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(subject: &str, expected: &str, options: StringEqualityOptions) -> AssertionChain {
        let mut chain = AssertionChain::new();
        StringAssertions::new(&mut chain, subject, "subject").be_equivalent_to(expected, &options);
        chain
    }

    #[test]
    fn test_exact_match() {
        assert!(check("abc", "abc", StringEqualityOptions::default()).succeeded());
    }

    #[test]
    fn test_same_length_mismatch_message() {
        let chain = check("abd", "abc", StringEqualityOptions::default());
        assert_eq!(
            chain.failures(),
            vec!["Expected subject to be \"abc\", but \"abd\" differs near \"d\" (index 2).".to_string()]
        );
    }

    #[test]
    fn test_length_mismatch_message() {
        let chain = check("ab", "abc", StringEqualityOptions::default());
        assert_eq!(
            chain.failures(),
            vec!["Expected subject to be \"abc\" with a length of 3, but \"ab\" has a length of 2, differs near \"c\" (index 2).".to_string()]
        );
    }

    #[test]
    fn test_normalization_rules() {
        let options = StringEqualityOptions::default();
        assert!(check("abc", "ABC", options.ignoring_case()).succeeded());
        assert!(check("  x", "x", options.ignoring_leading_whitespace()).succeeded());
        assert!(!check("  x  ", "x", options.ignoring_leading_whitespace()).succeeded());
        assert!(check("x \t", "x", options.ignoring_trailing_whitespace()).succeeded());
        assert!(check("a\r\nb\rc", "a\nb\nc", options.ignoring_newline_style()).succeeded());
        assert!(!check("a\r\nb", "a\nb", options).succeeded());
    }

    #[test]
    fn test_multiline_mismatch_includes_line_diff() {
        let chain = check("one\ntwo\nfour", "one\ntwo\nthree", StringEqualityOptions::default());
        let failures = chain.failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("Line differences"));
        assert!(failures[0].contains("\n-three"));
        assert!(failures[0].contains("\n+four"));
        assert!(failures[0].contains("\n one"));
    }

    #[test]
    fn test_braces_in_values_and_description() {
        let mut chain = AssertionChain::new();
        StringAssertions::new(&mut chain, "{1}", "subject.{0}")
            .be_equivalent_to("{reason}", &StringEqualityOptions::default());
        let failures = chain.failures();
        assert!(failures[0].starts_with("Expected subject.{0} to be \"{reason}\""));
        assert!(failures[0].contains("but \"{1}\" has a length of 3"));
    }

    #[test]
    fn test_creating_assertion_consumes_reuse() {
        let mut chain = AssertionChain::new();
        chain.begin_assertion();
        chain.reuse_once();
        StringAssertions::new(&mut chain, "a", "subject")
            .be_equivalent_to("b", &StringEqualityOptions::default());
        assert_eq!(chain.assertion_count(), 1);
        assert_eq!(chain.failure_count(), 1);
    }
}
