//! Rendering of name listings for stdout.

use clap::ValueEnum;
use mongols_core::{MongoLsError, Result};

/// How a listing is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One bracketed line: `['a', 'b', 'c']`
    #[default]
    List,
    /// One line JSON array
    Json,
    /// One name per line
    Lines,
}

/// Renders names in the requested format, without a trailing newline.
///
/// An empty listing renders as `[]` for `list` and `json` and as an empty
/// string for `lines`.
pub fn render(names: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::List => Ok(render_list(names)),
        OutputFormat::Json => serde_json::to_string(names)
            .map_err(|e| MongoLsError::serialization("Failed to render listing as JSON", e)),
        OutputFormat::Lines => Ok(names.join("\n")),
    }
}

fn render_list(names: &[String]) -> String {
    let items: Vec<String> = names.iter().map(|name| quote(name)).collect();
    format!("[{}]", items.join(", "))
}

/// Quotes a name the way a repr would: single quotes unless the name holds
/// a single quote and no double quote. Control, separator and format
/// characters are escaped, so the listing always fits on one line and no
/// character in a name is invisible.
fn quote(name: &str) -> String {
    let delimiter = if name.contains('\'') && !name.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut quoted = String::with_capacity(name.len().saturating_add(2));
    quoted.push(delimiter);
    for c in name.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c == delimiter => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if c.is_control() || is_invisible(c) => quoted.push_str(&escape_code_point(c)),
            c => quoted.push(c),
        }
    }
    quoted.push(delimiter);
    quoted
}

/// Separators other than the plain space, and format characters.
fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{a0}'
            | '\u{ad}'
            | '\u{600}'..='\u{605}'
            | '\u{61c}'
            | '\u{6dd}'
            | '\u{70f}'
            | '\u{1680}'
            | '\u{180e}'
            | '\u{2000}'..='\u{200f}'
            | '\u{2028}'..='\u{202f}'
            | '\u{205f}'..='\u{2064}'
            | '\u{2066}'..='\u{206f}'
            | '\u{3000}'
            | '\u{feff}'
            | '\u{fff9}'..='\u{fffb}'
            | '\u{110bd}'
            | '\u{1d173}'..='\u{1d17a}'
            | '\u{e0001}'
            | '\u{e0020}'..='\u{e007f}'
    )
}

fn escape_code_point(c: char) -> String {
    match u32::from(c) {
        code @ 0..=0xff => format!("\\x{:02x}", code),
        code @ 0x100..=0xffff => format!("\\u{:04x}", code),
        code => format!("\\U{:08x}", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_list_format() {
        let rendered = render(&names(&["a", "b", "c"]), OutputFormat::List).unwrap();
        assert_eq!(rendered, "['a', 'b', 'c']");
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(render(&[], OutputFormat::List).unwrap(), "[]");
        assert_eq!(render(&[], OutputFormat::Json).unwrap(), "[]");
        assert_eq!(render(&[], OutputFormat::Lines).unwrap(), "");
    }

    #[test]
    fn test_json_format() {
        let rendered = render(&names(&["users", "rooms"]), OutputFormat::Json).unwrap();
        assert_eq!(rendered, r#"["users","rooms"]"#);
    }

    #[test]
    fn test_lines_format() {
        let rendered = render(&names(&["users", "rooms"]), OutputFormat::Lines).unwrap();
        assert_eq!(rendered, "users\nrooms");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote("plain"), "'plain'");
        assert_eq!(quote("it's"), "\"it's\"");
        assert_eq!(quote("both'\""), "'both\\'\"'");
        assert_eq!(quote("back\\slash"), "'back\\\\slash'");
        assert_eq!(quote("two\nlines"), "'two\\nlines'");
        assert_eq!(quote("bell\u{7}"), "'bell\\x07'");
        assert_eq!(quote("部屋"), "'部屋'");
    }

    #[test]
    fn test_quoting_escapes_invisible_characters() {
        assert_eq!(quote("a\u{a0}b"), "'a\\xa0b'");
        assert_eq!(quote("x\u{2028}"), "'x\\u2028'");
        assert_eq!(quote("zero\u{200b}width"), "'zero\\u200bwidth'");
        assert_eq!(quote("\u{feff}bom"), "'\\ufeffbom'");
        assert_eq!(quote("tag\u{e0041}"), "'tag\\U000e0041'");
        assert_eq!(quote("with space"), "'with space'");
        assert_eq!(
            render(&names(&["x\u{2029}y"]), OutputFormat::List).unwrap(),
            "['x\\u2029y']"
        );
    }

    proptest! {
        #[test]
        fn prop_list_rendering_is_a_single_bracketed_line(items in proptest::collection::vec(".*", 0..8)) {
            let rendered = render(&items, OutputFormat::List).unwrap();
            prop_assert!(rendered.starts_with('['));
            prop_assert!(rendered.ends_with(']'));
            prop_assert!(!rendered.contains('\n'));
            prop_assert!(!rendered.contains('\r'));
        }

        #[test]
        fn prop_json_rendering_parses_back(items in proptest::collection::vec(".*", 0..8)) {
            let rendered = render(&items, OutputFormat::Json).unwrap();
            let parsed: Vec<String> = serde_json::from_str(&rendered).unwrap();
            prop_assert_eq!(parsed, items);
        }
    }
}
