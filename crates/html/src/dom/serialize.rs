// ABOUTME: Deterministic serializer for the fragment tree.
// ABOUTME: Attribute order, quoting and escaping are fixed so re-serializing parsed output is stable.

use super::node::{Element, Fragment, Node};

/// Elements whose text children are written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

/// Elements whose first newline is dropped by the parser.
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

/// Serialize a fragment back to markup.
pub fn serialize_fragment(fragment: &Fragment) -> String {
    let mut out = String::new();
    for child in &fragment.children {
        serialize_node(child, false, &mut out);
    }
    out
}

/// Serialize a single element, including its own tags.
pub fn serialize_element(element: &Element) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

fn serialize_node(node: &Node, raw_text: bool, out: &mut String) {
    match node {
        Node::Text(text) if raw_text => out.push_str(text),
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
    }
    out.push('>');

    if element.is_void() {
        return;
    }

    if LEADING_NEWLINE_ELEMENTS.contains(&element.tag.as_str())
        && matches!(element.children.first(), Some(Node::Text(text)) if text.starts_with('\n'))
    {
        out.push('\n');
    }

    let raw_text = RAW_TEXT_ELEMENTS.contains(&element.tag.as_str());
    for child in &element.children {
        serialize_node(child, raw_text, out);
    }

    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

/// Escape text content.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse::parse_fragment;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_void_element_has_no_end_tag() {
        let img = Element::new("img")
            .with_attr("src", "test.png")
            .with_attr("alt", "Test");
        assert_eq!(serialize_element(&img), r#"<img src="test.png" alt="Test">"#);
    }

    #[test]
    fn test_empty_attribute_is_bare() {
        let input = Element::new("input").with_attr("disabled", "");
        assert_eq!(serialize_element(&input), "<input disabled>");
    }

    #[test]
    fn test_escaping() {
        let a = Element::new("a")
            .with_attr("title", r#"say "hi" & go"#)
            .with_child(Node::text("1 < 2 & 3 > 2"));
        assert_eq!(
            serialize_element(&a),
            r#"<a title="say &quot;hi&quot; &amp; go">1 &lt; 2 &amp; 3 &gt; 2</a>"#
        );
    }

    #[test]
    fn test_raw_text_elements_not_escaped() {
        let script = Element::new("script").with_child(Node::text("if (a < b && c) {}"));
        assert_eq!(serialize_element(&script), "<script>if (a < b && c) {}</script>");
    }

    #[test]
    fn test_pre_leading_newline_is_restored() {
        let pre = Element::new("pre").with_child(Node::text("\ncode"));
        assert_eq!(serialize_element(&pre), "<pre>\n\ncode</pre>");

        let plain = Element::new("pre").with_child(Node::text("code"));
        assert_eq!(serialize_element(&plain), "<pre>code</pre>");

        let once = serialize_fragment(&parse_fragment("<pre>\n\ncode</pre>"));
        assert_eq!(once, "<pre>\n\ncode</pre>");
    }

    #[test]
    fn test_reparse_is_stable() {
        let input = r#"<p class="lead">Caf&eacute; &amp; bar&nbsp;<br><a href="/x?a=1&amp;b=2">link</a></p><!-- note -->"#;
        let once = serialize_fragment(&parse_fragment(input));
        let twice = serialize_fragment(&parse_fragment(&once));
        assert_eq!(once, twice);
        assert_eq!(
            once,
            "<p class=\"lead\">Caf\u{e9} &amp; bar&nbsp;<br><a href=\"/x?a=1&amp;b=2\">link</a></p><!-- note -->"
        );
    }
}
