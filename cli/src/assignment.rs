/// An assignment of an identifier to an expression in the context of
/// a REPL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Assignment<'a> {
    pub(crate) ident: &'a str,
    pub(crate) value: &'a str,
}

impl<'a> Assignment<'a> {
    /// Try to parse an [`Assignment`] from the given input string.
    ///
    /// Returns [`None`] if the input does not have the shape
    /// `ident = expr`, so that the caller can fall back to treating
    /// it as a regular expression or another REPL command.
    pub fn parse(input: &'a str) -> Option<Self> {
        let trimmed = input.trim_start();

        let ident_len = trimmed
            .char_indices()
            .take_while(|(idx, c)| {
                c.is_ascii_alphabetic() || *c == '_' || (*idx > 0 && c.is_ascii_digit())
            })
            .count();
        if ident_len == 0 {
            return None;
        }

        let (ident, rest) = trimmed.split_at(ident_len);
        let rest = rest.trim_start();

        // a '=' introduces an assignment, but '==' is a comparison
        let value = rest.strip_prefix('=')?;
        if value.starts_with('=') || value.trim().is_empty() {
            return None;
        }

        Some(Self {
            ident,
            value: value.trim(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_assignments() {
        for input in ["x = 4", "x     =       \t\t4", "x=4"] {
            let res = Assignment::parse(input).unwrap();
            assert_eq!(res.ident, "x");
            assert_eq!(res.value, "4");
        }
    }

    #[test]
    fn closure_assignment() {
        let res = Assignment::parse("g = fn (x) use (a) { x + a }").unwrap();
        assert_eq!(res.ident, "g");
        assert_eq!(res.value, "fn (x) use (a) { x + a }");
    }

    #[test]
    fn not_an_assignment() {
        for input in ["1 + 2", "x == 4", "x =", "= 4"] {
            assert!(Assignment::parse(input).is_none(), "{input:?}");
        }
    }
}
