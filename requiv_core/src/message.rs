//! Failure message templates.
//!
//! Templates use `{0}`, `{1}`, ... for positional arguments and `{reason}`
//! for the "because" clause. `{{` and `}}` produce literal braces. Argument
//! text is inserted verbatim and never rescanned, so only text spliced into
//! the template itself needs [`escape_placeholders`].

use std::fmt::Display;

/// Double every brace so `text` survives template expansion unchanged
pub fn escape_placeholders(text: &str) -> String {
    text.replace('{', "{{").replace('}', "}}")
}

/// Render a because-clause for `{reason}`: empty, or a leading space plus
/// the reason, with "because " prepended unless already present.
pub fn format_reason(reason: &str) -> String {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with("because") {
        format!(" {}", trimmed)
    } else {
        format!(" because {}", trimmed)
    }
}

/// Expand `template` with the formatted `reason` clause and `args`.
/// Unknown tokens are kept as written.
pub fn format_message(template: &str, reason: &str, args: &[&dyn Display]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                output.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                output.push('}');
            }
            '{' => {
                let mut token = String::new();
                let mut closed = false;
                for t in chars.by_ref() {
                    if t == '}' {
                        closed = true;
                        break;
                    }
                    token.push(t);
                }

                if !closed {
                    output.push('{');
                    output.push_str(&token);
                } else if token == "reason" {
                    output.push_str(reason);
                } else if let Some(arg) = token.parse::<usize>().ok().and_then(|i| args.get(i)) {
                    output.push_str(&arg.to_string());
                } else {
                    output.push('{');
                    output.push_str(&token);
                    output.push('}');
                }
            }
            _ => output.push(c),
        }
    }

    output
}
