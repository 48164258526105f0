// ABOUTME: Converts markup into the typed fragment tree using scraper's html5ever parser.
// ABOUTME: Parsing never fails; recovery messages from the parser are logged at debug level.

use scraper::{Html, Node as ScraperNode};

use super::node::{Element, Fragment, Node};

/// Parse an HTML fragment into a [`Fragment`].
///
/// The fragment is parsed in a `<body>` context. Doctypes and processing
/// instructions are dropped; elements, text and comments are kept in order.
pub fn parse_fragment(html: &str) -> Fragment {
    let document = Html::parse_fragment(html);
    for error in &document.errors {
        tracing::debug!(error = %error, "html parser recovered from malformed markup");
    }

    let children = document
        .root_element()
        .children()
        .filter_map(convert_node)
        .collect();

    Fragment::new(children)
}

fn convert_node(node: ego_tree::NodeRef<ScraperNode>) -> Option<Node> {
    match node.value() {
        ScraperNode::Text(text) => Some(Node::Text((**text).to_string())),
        ScraperNode::Comment(comment) => Some(Node::Comment((**comment).to_string())),
        ScraperNode::Element(el) => {
            let mut element = Element::new(el.name());
            // Foreign attributes such as `xlink:href` keep their prefix.
            for (name, value) in &el.attrs {
                let value: &str = value;
                match &name.prefix {
                    Some(prefix) => element.set_attr(format!("{}:{}", prefix, name.local), value),
                    None => element.set_attr(&*name.local, value),
                }
            }
            element.children = node.children().filter_map(convert_node).collect();
            Some(Node::Element(element))
        }
        _ => None,
    }
}
