//! HTML body text extraction.
//!
//! Documents are parsed with `scraper` (html5ever), so malformed markup is
//! recovered the way browsers do and every named or numeric character
//! reference is decoded by the parser. The tree walk drops non-content
//! elements (scripts, styles, the document head), starts a new line at
//! block-level elements and separates table cells with a space. Whitespace
//! is collapsed per line.
//!
//! # Example
//!
//! ```rust
//! use blobtext::extraction::html_to_text;
//!
//! let html = "<html><head><title>x</title></head><body><h1>Title</h1><p>Fish &amp; chips</p></body></html>";
//! assert_eq!(html_to_text(html), "Title\nFish & chips");
//! ```
use scraper::{ElementRef, Html, Node};

/// Elements dropped together with their subtree.
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "br", "hr", "li", "ul", "ol", "dl", "dt", "dd", "tr", "table", "thead", "tbody", "tfoot", "h1", "h2",
    "h3", "h4", "h5", "h6", "section", "article", "aside", "header", "footer", "nav", "main", "blockquote", "pre",
    "figure", "figcaption", "form", "address", "title",
];

const CELL_ELEMENTS: &[&str] = &["td", "th"];

/// Extract the visible text of an HTML document.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut text = String::with_capacity(html.len() / 2);
    collect_text(document.root_element(), &mut text);

    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, text: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(run) => text.push_str(run),
            Node::Element(el) => {
                let name = el.name();
                if NON_CONTENT_ELEMENTS.contains(&name) {
                    continue;
                }

                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    text.push('\n');
                } else if CELL_ELEMENTS.contains(&name) {
                    text.push(' ');
                }

                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, text);
                }

                if block {
                    text.push('\n');
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_scripts_and_styles() {
        let html = r#"<body><script type="text/javascript">var x = "<p>no</p>";</script>
            <style>p { color: red; }</style><p>Visible</p><!-- hidden --></body>"#;
        assert_eq!(html_to_text(html), "Visible");
    }

    #[test]
    fn test_block_tags_break_lines() {
        let html = "<div>one</div><div>two<br>three</div><span>four</span> <b>five</b>";
        assert_eq!(html_to_text(html), "one\ntwo\nthree\nfour five");
    }

    #[test]
    fn test_table_cells_are_spaced() {
        let html = "<table><tr><td>a</td><td>b</td></tr><tr><th>c</th></tr></table>";
        assert_eq!(html_to_text(html), "a b\nc");
    }

    #[test]
    fn test_character_references() {
        assert_eq!(
            html_to_text("<p>&lt;tag&gt; &#233;t&#xE9; &amp;amp;</p>"),
            "<tag> \u{e9}t\u{e9} &amp;"
        );
    }

    #[test]
    fn test_named_entities_beyond_basic_set() {
        assert_eq!(
            html_to_text("<p>caf&eacute; &Uuml;ber &hearts; &mu;</p>"),
            "caf\u{e9} \u{dc}ber \u{2665} \u{3bc}"
        );
    }

    #[test]
    fn test_nbsp_collapses() {
        assert_eq!(html_to_text("<p>a&nbsp;&nbsp;b</p>"), "a b");
    }

    #[test]
    fn test_head_is_dropped() {
        let html = "<html><head><title>Book</title><meta charset=\"utf-8\"></head><body><p>Text</p></body></html>";
        assert_eq!(html_to_text(html), "Text");
    }

    #[test]
    fn test_fragment_without_body() {
        assert_eq!(html_to_text("<p>Hi &amp; bye</p>"), "Hi & bye");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(html_to_text("<html><body></body></html>"), "");
    }
}
