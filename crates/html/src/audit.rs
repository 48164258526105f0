// ABOUTME: Read-only structural audit of a fragment: headings, inline styles, empty paragraphs, images, classes.
// ABOUTME: Reports what the normalizer would fix without modifying anything.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::dom::visit::{walk_element, walk_fragment, Visitor};
use crate::dom::{parse_fragment, Element, Fragment};
use crate::normalize::{collapse_src, is_empty_paragraph};
use crate::options::NormalizeOptions;

/// How many styled elements are kept as samples.
const STYLE_SAMPLE_LIMIT: usize = 3;

/// Tags the normalizer strips styles from.
const NORMALIZED_STYLE_TAGS: &[&str] = &["p", "div", "img", "iframe"];

/// One element carrying an inline style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleSample {
    pub tag: String,
    pub style: String,
}

/// Structural findings for one fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FragmentAudit {
    /// Heading tag names in document order.
    pub headings: Vec<String>,
    /// Elements of any tag with a `style` attribute.
    pub styled_elements: usize,
    /// Styled elements the normalizer would clean (`p`, `div`, `img`, `iframe`).
    pub styled_targets: usize,
    pub style_samples: Vec<StyleSample>,
    pub empty_paragraphs: usize,
    /// Image sources in document order; `None` for an image without `src`.
    pub image_sources: Vec<Option<String>>,
    pub images_missing_class: usize,
    /// Images whose `src` the normalizer would collapse.
    pub images_with_traversal: usize,
    /// Outermost author blocks; blocks nested inside one are not counted.
    pub author_blocks: usize,
    pub comments: usize,
    pub classes: BTreeSet<String>,
}

impl FragmentAudit {
    pub fn has_h1(&self) -> bool {
        self.headings.iter().any(|h| h == "h1")
    }

    /// True when the fragment already satisfies every normalization invariant.
    pub fn is_clean(&self) -> bool {
        !self.has_h1()
            && self.headings.first().map_or(true, |h| h == "h2")
            && self.styled_targets == 0
            && self.empty_paragraphs == 0
            && self.images_missing_class == 0
            && self.images_with_traversal == 0
            && self.author_blocks == 0
            && self.comments == 0
    }
}

struct AuditVisitor<'a> {
    opts: &'a NormalizeOptions,
    audit: FragmentAudit,
    author_depth: usize,
}

impl Visitor for AuditVisitor<'_> {
    fn visit_element(&mut self, element: &Element) {
        if element.heading_level().is_some() {
            self.audit.headings.push(element.tag.clone());
        }

        if let Some(style) = element.attr("style") {
            self.audit.styled_elements += 1;
            if NORMALIZED_STYLE_TAGS.iter().any(|t| element.is(t)) {
                self.audit.styled_targets += 1;
            }
            if self.audit.style_samples.len() < STYLE_SAMPLE_LIMIT {
                self.audit.style_samples.push(StyleSample {
                    tag: element.tag.clone(),
                    style: style.to_string(),
                });
            }
        }

        if is_empty_paragraph(element) {
            self.audit.empty_paragraphs += 1;
        }

        if element.is("img") {
            self.audit
                .image_sources
                .push(element.attr("src").map(str::to_string));
            if !element.has_class(&self.opts.image_class) {
                self.audit.images_missing_class += 1;
            }
            if element
                .attr("src")
                .is_some_and(|src| collapse_src(src, self.opts.src_collapse).is_some())
            {
                self.audit.images_with_traversal += 1;
            }
        }

        let author_block = element.has_class(&self.opts.author_class);
        if author_block {
            if self.author_depth == 0 {
                self.audit.author_blocks += 1;
            }
            self.author_depth += 1;
        }

        self.audit
            .classes
            .extend(element.classes().map(str::to_string));

        walk_element(self, element);

        if author_block {
            self.author_depth -= 1;
        }
    }

    fn visit_comment(&mut self, _comment: &str) {
        self.audit.comments += 1;
    }
}

/// Audit a parsed fragment.
pub fn audit_tree(fragment: &Fragment, opts: &NormalizeOptions) -> FragmentAudit {
    let mut visitor = AuditVisitor {
        opts,
        audit: FragmentAudit::default(),
        author_depth: 0,
    };
    walk_fragment(&mut visitor, fragment);
    visitor.audit
}

/// Audit a fragment given as markup.
pub fn audit_fragment(html: &str, opts: &NormalizeOptions) -> FragmentAudit {
    audit_tree(&parse_fragment(html), opts)
}
