//! Trimming a located line window down to the exact function
//! literal.
//!
//! The extractor is not a parser. It does just enough lexical
//! scanning to find the `fn` keyword and the brace that balances the
//! literal's opening brace, while not being fooled by braces inside
//! string literals or comments.

use amber_eval::SourceLocation;

use crate::error::{Error, Result};

/// Lexical scanning state shared by the helpers below: tracks
/// whether the scan position sits inside a string literal or a
/// comment.
#[derive(Clone, Copy, PartialEq)]
enum ScanState {
    Code,
    Str,
    StrEscape,
    Comment,
}

impl ScanState {
    fn advance(self, c: char) -> ScanState {
        match self {
            ScanState::Code => match c {
                '"' => ScanState::Str,
                '#' => ScanState::Comment,
                _ => ScanState::Code,
            },
            ScanState::Str => match c {
                '"' => ScanState::Code,
                '\\' => ScanState::StrEscape,
                _ => ScanState::Str,
            },
            ScanState::StrEscape => ScanState::Str,
            ScanState::Comment => match c {
                '\n' => ScanState::Code,
                _ => ScanState::Comment,
            },
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Byte offset of the first `fn` keyword outside strings and
/// comments, if any.
fn find_fn_keyword(window: &str) -> Option<usize> {
    let mut state = ScanState::Code;
    let mut prev: Option<char> = None;

    for (idx, c) in window.char_indices() {
        if state == ScanState::Code
            && c == 'f'
            && window[idx..].starts_with("fn")
            && !prev.map(is_ident_char).unwrap_or(false)
            && !window[idx + 2..]
                .chars()
                .next()
                .map(is_ident_char)
                .unwrap_or(false)
        {
            return Some(idx);
        }

        state = state.advance(c);
        prev = Some(c);
    }

    None
}

/// Starting from the `fn` keyword, find the end offset (exclusive)
/// of the brace balancing the literal's opening brace.
fn balance_braces(literal: &str) -> Result<usize> {
    let mut state = ScanState::Code;
    let mut depth = 0usize;
    let mut opened = false;

    for (idx, c) in literal.char_indices() {
        if state == ScanState::Code {
            match c {
                '{' => {
                    depth += 1;
                    opened = true;
                }
                '}' => {
                    depth = depth.checked_sub(1).ok_or(Error::UnbalancedBraces)?;
                    if opened && depth == 0 {
                        return Ok(idx + 1);
                    }
                }
                _ => {}
            }
        }

        state = state.advance(c);
    }

    Err(Error::UnbalancedBraces)
}

/// Read the located line range and trim it to the function literal:
/// from the first `fn` keyword to the brace balancing the one it
/// opens, nothing before and nothing after.
pub(crate) fn extract(location: &SourceLocation) -> Result<String> {
    let file = &location.file;

    // gather the inclusive 1-based line range
    let mut window = String::new();
    for line in location.start_line..=location.end_line.min(file.num_lines()) {
        if line > location.start_line {
            window.push('\n');
        }
        window.push_str(file.source_line(line - 1));
    }

    let begin = find_fn_keyword(&window).ok_or(Error::NoFunctionLiteral)?;
    let end = begin + balance_braces(&window[begin..])?;

    Ok(window[begin..end].to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(code: &str) -> SourceLocation {
        let mut codemap = codemap::CodeMap::new();
        let file = codemap.add_file("test.amb".into(), code.into());
        let end_line = file.num_lines();

        SourceLocation {
            file,
            start_line: 1,
            end_line,
        }
    }

    #[test]
    fn extracts_bare_literal() {
        let code = "fn (x) { x + 1 }";
        assert_eq!(extract(&location(code)).unwrap(), code);
    }

    #[test]
    fn strips_surrounding_binding() {
        let code = "let g = fn (x) use (a) { x + a };";
        assert_eq!(
            extract(&location(code)).unwrap(),
            "fn (x) use (a) { x + a }"
        );
    }

    #[test]
    fn keeps_nested_braces_balanced() {
        let code = "let f = fn (x) { if x < 0 { 0 - x } else { x } };";
        assert_eq!(
            extract(&location(code)).unwrap(),
            "fn (x) { if x < 0 { 0 - x } else { x } }"
        );
    }

    #[test]
    fn spans_multiple_lines() {
        let code = "let g = fn (x) use (a) {\n  x + a\n};";
        assert_eq!(
            extract(&location(code)).unwrap(),
            "fn (x) use (a) {\n  x + a\n}"
        );
    }

    #[test]
    fn ignores_braces_inside_strings() {
        let code = r#"let f = fn (x) { x + "}" };"#;
        assert_eq!(extract(&location(code)).unwrap(), r#"fn (x) { x + "}" }"#);
    }

    #[test]
    fn ignores_fn_inside_strings_and_idents() {
        let code = r#"let fnord = "fn"; let f = fn (x) { x };"#;
        assert_eq!(extract(&location(code)).unwrap(), "fn (x) { x }");
    }

    #[test]
    fn window_without_literal_is_rejected() {
        assert!(matches!(
            extract(&location("let a = 1;")),
            Err(Error::NoFunctionLiteral)
        ));
    }

    #[test]
    fn truncated_window_is_rejected() {
        // closing brace lies outside the located lines
        let code = "let g = fn (x) use (a) {\n  x + a";
        assert!(matches!(
            extract(&location(code)),
            Err(Error::UnbalancedBraces)
        ));
    }
}
