//! Visible text extraction

use crate::MIN_REPORT_CHARS;
use scraper::{ElementRef, Html, Node};

/// Elements whose contents are never visible report text
const SKIP_TAGS: &[&str] = &["script", "style", "noscript"];

/// Collapse every whitespace run to a single space and trim the ends
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract normalized visible text from an HTML document
///
/// Script, style and noscript subtrees are dropped; all remaining text
/// nodes are joined and passed through [`clean_text`].
pub fn visible_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let mut buf = String::with_capacity(markup.len() / 2);
    collect_text(document.root_element(), &mut buf);
    clean_text(&buf)
}

/// Extract report text, or `None` when the page is too short to be a report
///
/// Pages under [`MIN_REPORT_CHARS`] normalized characters are treated as
/// redirects, error pages or stubs.
pub fn extract_text(markup: &str) -> Option<String> {
    let text = visible_text(markup);
    if text.chars().count() < MIN_REPORT_CHARS {
        return None;
    }
    Some(text)
}

fn collect_text(element: ElementRef<'_>, buf: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                buf.push(' ');
                buf.push_str(text);
            }
            Node::Element(el) => {
                if SKIP_TAGS.contains(&el.name()) {
                    continue;
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(child_ref, buf);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_body(body: &str) -> String {
        format!(
            "<!DOCTYPE html><html><head><title>T</title><style>p {{ color: red; }}</style></head><body>{}</body></html>",
            body
        )
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  hello \n\t world  "), "hello world");
        assert_eq!(clean_text("a\r\n\r\nb"), "a b");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn test_visible_text_strips_non_content() {
        let html = page_with_body(
            "<p>Before</p><script>alert('bad');</script><noscript>enable js</noscript><p>After</p>",
        );
        let text = visible_text(&html);
        assert!(text.contains("Before"));
        assert!(text.contains("After"));
        assert!(!text.contains("alert"));
        assert!(!text.contains("enable js"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn test_visible_text_separates_adjacent_nodes() {
        let text = visible_text("<div>one</div><div>two</div><span>three</span>");
        assert_eq!(text, "one two three");
    }

    #[test]
    fn test_visible_text_decodes_entities() {
        let text = visible_text("<p>Tom &amp; Jerry &lt;3</p>");
        assert_eq!(text, "Tom & Jerry <3");
    }

    #[test]
    fn test_visible_text_includes_title() {
        let text = visible_text("<html><head><title>Annual Report</title></head><body>x</body></html>");
        assert_eq!(text, "Annual Report x");
    }

    #[test]
    fn test_extract_text_has_no_whitespace_runs() {
        let body = "<p>  water \n\n management </p>\t<li>river</li>".repeat(40);
        let text = extract_text(&page_with_body(&body)).unwrap();
        assert!(!text.contains("  "));
        assert!(!text.contains('\n'));
        assert!(!text.contains('\t'));
        assert_eq!(text, text.trim());
    }

    #[test]
    fn test_extract_text_gate_boundary() {
        // "T " prefix from <title> plus body text
        let exact = "a".repeat(MIN_REPORT_CHARS - 2);
        let text = extract_text(&page_with_body(&exact)).unwrap();
        assert_eq!(text.chars().count(), MIN_REPORT_CHARS);

        let short = "a".repeat(MIN_REPORT_CHARS - 3);
        assert!(extract_text(&page_with_body(&short)).is_none());
    }

    #[test]
    fn test_extract_text_counts_characters_not_bytes() {
        // 250 Hangul syllables are 750 bytes but only 250 characters
        let body = "물".repeat(250);
        assert!(extract_text(&format!("<p>{}</p>", body)).is_none());

        let body = "물".repeat(MIN_REPORT_CHARS);
        assert!(extract_text(&format!("<p>{}</p>", body)).is_some());
    }

    #[test]
    fn test_extract_text_ignores_script_length() {
        let script = "x".repeat(2000);
        let html = page_with_body(&format!("<script>{}</script><p>short</p>", script));
        assert!(extract_text(&html).is_none());
    }

    #[test]
    fn test_extract_text_empty_markup() {
        assert!(extract_text("").is_none());
        assert_eq!(visible_text(""), "");
    }
}
