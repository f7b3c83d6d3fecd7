//! Text cleanup for exported documents and archive entry names.

use regex::Regex;
use std::sync::LazyLock;

static XML_PROLOG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<\?xml.*?\?>").unwrap());
static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Drop prologs and comments, collapse whitespace runs to one space, trim.
pub fn optimize_svg(text: &str) -> String {
    let text = XML_PROLOG.replace_all(text, "");
    let text = COMMENT.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Replace every character outside ASCII alphanumerics and the CJK Unified
/// Ideographs range U+4E00..=U+9FA5 with `_`, one for one.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || ('\u{4E00}'..='\u{9FA5}').contains(&c) {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("A/B Test!"), "A_B_Test_");
        assert_eq!(sanitize_file_name("图标-home"), "图标_home");
        assert_eq!(sanitize_file_name("café"), "caf_");
        assert_eq!(sanitize_file_name(""), "");
    }

    #[test]
    fn test_sanitize_keeps_char_count() {
        for name in ["a b\tc", "emoji 🙂", "ＡＢ", "x.y.z"] {
            assert_eq!(
                sanitize_file_name(name).chars().count(),
                name.chars().count()
            );
        }
    }

    #[test]
    fn test_optimize_svg() {
        let raw = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg width=\"24\">\n  <!-- generated\n by tool -->\n  <path d=\"M0 0\"/>\n</svg>\n";
        assert_eq!(optimize_svg(raw), r#"<svg width="24"> <path d="M0 0"/> </svg>"#);
    }

    #[test]
    fn test_optimize_svg_idempotent() {
        let once = optimize_svg("<svg>\n\n<g>  <!--x--> </g></svg>");
        assert_eq!(once, "<svg> <g> </g></svg>");
        assert_eq!(optimize_svg(&once), once);
    }
}
