//! Query text helpers.
//!
//! Query text is passed to the store verbatim apart from whitespace
//! normalization. Placeholders are `$` followed by ASCII letters:
//!
//! ```text
//! SELECT * FROM user WHERE name = $name AND age > $age
//!                                 ─┬───             ─┬──
//!                                  └── placeholder   └── placeholder
//! ```

use nom::{
    IResult,
    character::complete::{alpha1, anychar, char},
    sequence::preceded,
};

/// Collapse a possibly multi-line query onto a single line.
///
/// CRLF becomes LF, every line is trimmed, and lines are joined with a
/// single space.
pub fn prepare_query(query: &str) -> String {
    query
        .replace("\r\n", "\n")
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Parse one `$name` placeholder, returning the name.
fn placeholder(input: &str) -> IResult<&str, &str> {
    preceded(char('$'), alpha1)(input)
}

/// All placeholder names in order of appearance. Repeats are kept.
pub fn placeholders(query: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut input = query;

    while !input.is_empty() {
        if let Ok((rest, name)) = placeholder(input) {
            names.push(name);
            input = rest;
            continue;
        }
        match anychar::<_, nom::error::Error<&str>>(input) {
            Ok((rest, _)) => input = rest,
            Err(_) => break,
        }
    }

    names
}

/// Number of placeholder occurrences in the query text.
pub fn num_input(query: &str) -> usize {
    placeholders(query).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_query_multiline() {
        let query = "SELECT id, name\r\n    FROM user\n\t WHERE age > 10   \n";
        assert_eq!(
            prepare_query(query),
            "SELECT id, name FROM user WHERE age > 10"
        );
    }

    #[test]
    fn test_prepare_query_idempotent() {
        let once = prepare_query("  SELECT *\n  FROM post  ");
        assert_eq!(prepare_query(&once), once);
        assert_eq!(prepare_query("SELECT * FROM post"), "SELECT * FROM post");
    }

    #[test]
    fn test_num_input_counts_repeats() {
        assert_eq!(num_input("SELECT * FROM user"), 0);
        assert_eq!(num_input("SELECT * FROM user WHERE name = $name"), 1);
        assert_eq!(
            num_input("UPDATE user SET a = $value, b = $value WHERE id = $id"),
            3
        );
    }

    #[test]
    fn test_placeholder_letters_only() {
        // `$user_name` matches as `$user`, `$1` is not a placeholder
        assert_eq!(
            placeholders("WHERE name = $user_name AND x = $1 AND y = $$abc"),
            vec!["user", "abc"]
        );
    }

    #[test]
    fn test_placeholders_non_ascii_text() {
        assert_eq!(placeholders("SELECT 'żółw' FROM t WHERE a = $émoji"), Vec::<&str>::new());
        assert_eq!(placeholders("WHERE a = $aé"), vec!["a"]);
    }
}
