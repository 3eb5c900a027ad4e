//! Quoted-field tokenizer for one line of comma-delimited text
//!
//! Rules:
//! - A field starting with `"` is quoted; inside it the delimiter is literal
//!   and `""` stands for one `"`
//! - Outside quotes the delimiter is the only separator
//! - Unquoted fields keep stray quotes, with `""` still collapsed to `"`
//! - Empty and whitespace-only fields are returned verbatim
//!
//! An unterminated quote swallows the rest of the line into the open field.
//! This is reported through [`Tokenized::unterminated`] rather than as an error.

pub const DELIMITER: char = ',';
pub const QUOTE: char = '"';

/// Fields of one line plus whether quoting had to be recovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    pub fields: Vec<String>,
    pub unterminated: bool,
}

/// Split a line on commas
///
/// # Example
/// ```
/// use tabular_ingest::text::tokenize;
///
/// assert_eq!(tokenize(r#"a,"b,c",d"#), ["a", "b,c", "d"]);
/// ```
pub fn tokenize(line: &str) -> Vec<String> {
    tokenize_with(line, DELIMITER).fields
}

/// Split a line on commas, reporting unterminated quotes
pub fn tokenize_checked(line: &str) -> Tokenized {
    tokenize_with(line, DELIMITER)
}

pub fn tokenize_with(line: &str, delimiter: char) -> Tokenized {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    field.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == delimiter {
            fields.push(std::mem::take(&mut field));
            at_field_start = true;
            continue;
        } else if c == QUOTE {
            if at_field_start {
                in_quotes = true;
            } else {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                }
                field.push(QUOTE);
            }
        } else {
            field.push(c);
        }
        at_field_start = false;
    }
    fields.push(field);

    Tokenized {
        fields,
        unterminated: in_quotes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields() {
        assert_eq!(tokenize("a,b,c"), ["a", "b", "c"]);
    }

    #[test]
    fn test_quoted_delimiter() {
        assert_eq!(tokenize(r#"a,"b,c",d"#), ["a", "b,c", "d"]);
    }

    #[test]
    fn test_escaped_quote() {
        assert_eq!(tokenize(r#""a""b""#), [r#"a"b"#]);
    }

    #[test]
    fn test_empty_fields_are_empty_strings() {
        assert_eq!(tokenize("a,,b,"), ["a", "", "b", ""]);
        assert_eq!(tokenize(""), [""]);
        assert_eq!(tokenize(r#""",x"#), ["", "x"]);
    }

    #[test]
    fn test_whitespace_kept_verbatim() {
        assert_eq!(tokenize(" a ,  , b"), [" a ", "  ", " b"]);
    }

    #[test]
    fn test_unquoted_field_with_quotes() {
        assert_eq!(tokenize(r#"5'11",x""y"#), [r#"5'11""#, r#"x"y"#]);
    }

    #[test]
    fn test_text_after_closing_quote_is_kept() {
        assert_eq!(tokenize(r#""ab"cd,e"#), ["abcd", "e"]);
    }

    #[test]
    fn test_unterminated_quote_takes_rest_of_line() {
        let result = tokenize_checked(r#"a,"b,c"#);
        assert_eq!(result.fields, ["a", "b,c"]);
        assert!(result.unterminated);

        assert!(!tokenize_checked(r#"a,"b""#).unterminated);
    }

    #[test]
    fn test_custom_delimiter() {
        let result = tokenize_with(r#"a;"b;c""#, ';');
        assert_eq!(result.fields, ["a", "b;c"]);
    }
}
