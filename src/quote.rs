//! Identifier and literal quoting for InfluxQL statements.

/// Double-quote an identifier, escaping backslashes and embedded double
/// quotes.
pub fn quote_ident(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Single-quote a string literal, escaping backslashes and embedded single
/// quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod test_quote {
    use super::{quote_ident, quote_literal};

    #[test]
    fn test_quote_ident() {
        assert_eq!("\"db1\"", quote_ident("db1"));
        assert_eq!("\"my db\"", quote_ident("my db"));
        assert_eq!("\"say \\\"hi\\\"\"", quote_ident("say \"hi\""));
        assert_eq!("\"back\\\\slash\"", quote_ident("back\\slash"));
    }

    #[test]
    fn test_quote_literal() {
        assert_eq!("'value'", quote_literal("value"));
        assert_eq!("'it\\'s'", quote_literal("it's"));
        assert_eq!("'back\\\\slash'", quote_literal("back\\slash"));
    }
}
