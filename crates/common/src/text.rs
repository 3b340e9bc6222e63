use once_cell::sync::Lazy;
use regex::Regex;

macro_rules! lazy_regex {
    ($name:ident = $pattern:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($pattern).expect("invalid regex"));
    };
}

lazy_regex!(URL_RE = r"https?://\S+");
lazy_regex!(HTML_TAG_RE = r"<[^<>]*>");
lazy_regex!(HTML_ENTITY_RE = r"(?i)&(?:[a-z0-9]+|#[0-9]{1,6}|#x[0-9a-f]{1,6});");
lazy_regex!(ASIDE_RE = r"[(\[][^\n]*?[)\]]");
lazy_regex!(HEADING_RE = r"(?m)^[ \t]*#+");
lazy_regex!(QUOTE_RE = r#"['"`‘’“”]"#);

/// Collapses every whitespace run into a single space and trims the ends.
pub fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduces free-form markdown/HTML (a bio, a profile README) to lowercase
/// prose suitable for whole-word keyword matching.
///
/// URLs, tags, entities, parenthesised or bracketed asides, heading markers
/// and quotes are removed; hyphens and line breaks become spaces so that
/// `machine-learning` and `machine learning` normalize identically.
pub fn strip_markup(input: &str) -> String {
    let text = URL_RE.replace_all(input, " ");
    let text = HTML_TAG_RE.replace_all(&text, " ");
    let text = HTML_ENTITY_RE.replace_all(&text, " ");
    let text = ASIDE_RE.replace_all(&text, " ");
    let text = HEADING_RE.replace_all(&text, " ");
    let text = QUOTE_RE.replace_all(&text, "");
    let text = text.replace('-', " ");
    normalize_whitespace(&text).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_whitespace_collapses_runs() {
        assert_eq!(normalize_whitespace("  Hello   There \n"), "Hello There");
    }

    #[test]
    fn strip_markup_removes_links_tags_and_asides() {
        let input =
            "### About me\nI build <b>APIs</b> (mostly REST) in [Rust] &amp; Go, see https://example.com";
        assert_eq!(strip_markup(input), "about me i build apis in go, see");
    }

    #[test]
    fn strip_markup_turns_hyphens_into_spaces() {
        assert_eq!(strip_markup("Machine-Learning"), "machine learning");
    }

    #[test]
    fn strip_markup_drops_quotes() {
        assert_eq!(strip_markup("I'm \"into\" Python"), "im into python");
    }
}
