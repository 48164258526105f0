// ABOUTME: Typed fragment tree: Node variants, Element with ordered attributes, and the Fragment root.
// ABOUTME: Provides class-list, heading-level and text helpers used by the normalizer and the audit.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::visit::Visitor;

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^h([1-6])$").unwrap());

/// Elements that never have an end tag or children.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// A single node of a parsed fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    /// Create a comment node.
    pub fn comment(content: impl Into<String>) -> Self {
        Node::Comment(content.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Node::Comment(_))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An element with its tag name, attributes in source order, and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children. Tag names are stored lowercase.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Set an attribute. An existing attribute keeps its position; a new one is appended.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Remove an attribute, keeping the order of the remaining ones.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.shift_remove(name)
    }

    /// Iterate the whitespace-separated entries of the class attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Make sure `class` appears exactly once in the class list.
    ///
    /// Other classes keep their order. A missing class is appended at the end and
    /// duplicates collapse onto the first occurrence. Returns true if the attribute changed.
    pub fn ensure_class(&mut self, class: &str) -> bool {
        let occurrences = self.classes().filter(|c| *c == class).count();
        if occurrences == 1 {
            return false;
        }

        let mut list: Vec<String> = Vec::new();
        let mut seen = false;
        for existing in self.classes() {
            if existing == class {
                if seen {
                    continue;
                }
                seen = true;
            }
            list.push(existing.to_string());
        }
        if !seen {
            list.push(class.to_string());
        }

        self.set_attr("class", list.join(" "));
        true
    }

    /// Heading level for `h1`..`h6`, `None` for any other element.
    pub fn heading_level(&self) -> Option<u8> {
        HEADING_RE
            .captures(&self.tag)
            .and_then(|caps| caps[1].parse().ok())
    }

    /// Rename a heading to the given level, clamped to 1..=6.
    pub fn set_heading_level(&mut self, level: u8) {
        self.tag = format!("h{}", level.clamp(1, 6));
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    /// Concatenated text of all descendant text nodes. Comments are not text.
    pub fn text_content(&self) -> String {
        let mut collector = TextCollector::default();
        collector.visit_element(self);
        collector.text
    }

    /// True if any descendant (not the element itself) has one of the given tags.
    pub fn has_descendant(&self, tags: &[&str]) -> bool {
        self.children.iter().any(|child| match child {
            Node::Element(el) => tags.iter().any(|t| el.is(t)) || el.has_descendant(tags),
            _ => false,
        })
    }
}

#[derive(Default)]
struct TextCollector {
    text: String,
}

impl Visitor for TextCollector {
    fn visit_text(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

/// The top-level node list of a parsed fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub children: Vec<Node>,
}

impl Fragment {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// A fragment with no element or comment nodes is plain text.
    pub fn is_opaque(&self) -> bool {
        self.children.iter().all(|n| matches!(n, Node::Text(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_lowercases_tag() {
        let el = Element::new("DIV");
        assert_eq!(el.tag, "div");
        assert!(el.is("div"));
    }

    #[test]
    fn test_remove_attr_keeps_order() {
        let mut el = Element::new("img")
            .with_attr("src", "a.png")
            .with_attr("style", "color:red")
            .with_attr("alt", "A");
        assert_eq!(el.remove_attr("style").as_deref(), Some("color:red"));
        let names: Vec<&str> = el.attrs.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["src", "alt"]);
    }

    #[test]
    fn test_ensure_class_appends() {
        let mut el = Element::new("img").with_attr("class", "wide  rounded");
        assert!(el.ensure_class("article-image"));
        assert_eq!(el.attr("class"), Some("wide rounded article-image"));
    }

    #[test]
    fn test_ensure_class_present_is_untouched() {
        let mut el = Element::new("img").with_attr("class", "article-image  wide");
        assert!(!el.ensure_class("article-image"));
        assert_eq!(el.attr("class"), Some("article-image  wide"));
    }

    #[test]
    fn test_ensure_class_collapses_duplicates() {
        let mut el = Element::new("img").with_attr("class", "a article-image b article-image");
        assert!(el.ensure_class("article-image"));
        assert_eq!(el.attr("class"), Some("a article-image b"));
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(Element::new("h3").heading_level(), Some(3));
        assert_eq!(Element::new("h7").heading_level(), None);
        assert_eq!(Element::new("header").heading_level(), None);

        let mut h = Element::new("h4");
        h.set_heading_level(2);
        assert_eq!(h.tag, "h2");
    }

    #[test]
    fn test_text_content_skips_comments() {
        let el = Element::new("p")
            .with_child(Node::text("Hello "))
            .with_child(Node::comment("hidden"))
            .with_child(Element::new("em").with_child(Node::text("World")));
        assert_eq!(el.text_content(), "Hello World");
    }

    #[test]
    fn test_has_descendant() {
        let p = Element::new("p").with_child(Element::new("span").with_child(Element::new("img")));
        assert!(p.has_descendant(&["img", "iframe"]));
        assert!(!p.has_descendant(&["iframe"]));
    }

    #[test]
    fn test_fragment_is_opaque() {
        assert!(Fragment::new(vec![Node::text("plain")]).is_opaque());
        assert!(Fragment::default().is_opaque());
        assert!(!Fragment::new(vec![Node::comment("c")]).is_opaque());
    }
}
