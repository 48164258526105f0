// ABOUTME: Fragment normalizer: the ordered cleanup passes and the Normalizer entry point.
// ABOUTME: Strips comments, author blocks, empty paragraphs and inline styles, fixes images and headings.

use serde::Serialize;

use crate::dom::visit::{prune_nodes, remove_nodes, walk_element_mut, walk_fragment_mut, VisitorMut};
use crate::dom::{parse_fragment, serialize_fragment, Element, Fragment, Node};
use crate::options::{NormalizeOptions, NormalizerBuilder, SrcCollapse};

/// Marker for a path that climbs out of a directory and back down.
const TRAVERSAL: &str = "/../";

/// Tags whose inline styles are stripped (images are handled with the image pass).
const STYLE_STRIP_TAGS: &[&str] = &["p", "div", "iframe"];

/// Descendants that keep an otherwise empty paragraph alive.
const EMBED_TAGS: &[&str] = &["img", "iframe"];

/// What a normalization run did to one fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub comments_removed: usize,
    pub author_blocks_removed: usize,
    pub empty_paragraphs_removed: usize,
    pub images_normalized: usize,
    pub styles_stripped: usize,
    pub headings_renamed: usize,
    /// The input had no markup and was passed through untouched.
    pub opaque: bool,
    /// The output differs from the input.
    pub changed: bool,
}

impl NormalizeReport {
    /// Total number of structural edits.
    pub fn edits(&self) -> usize {
        self.comments_removed
            + self.author_blocks_removed
            + self.empty_paragraphs_removed
            + self.images_normalized
            + self.styles_stripped
            + self.headings_renamed
    }
}

/// Output of [`Normalizer::normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub html: String,
    pub report: NormalizeReport,
}

/// Normalizes blog post fragments for embedding in the page template.
///
/// Running the normalizer on its own output is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    opts: NormalizeOptions,
}

impl Normalizer {
    pub fn new(opts: NormalizeOptions) -> Self {
        Self { opts }
    }

    pub fn builder() -> NormalizerBuilder {
        NormalizerBuilder::new()
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.opts
    }

    /// Normalize a fragment given as markup.
    ///
    /// Never fails. Input without any element or comment node is returned unchanged.
    pub fn normalize(&self, html: &str) -> Normalized {
        let mut fragment = parse_fragment(html);
        if fragment.is_opaque() {
            return Normalized {
                html: html.to_string(),
                report: NormalizeReport {
                    opaque: true,
                    ..Default::default()
                },
            };
        }

        let mut report = self.normalize_tree(&mut fragment);
        let output = serialize_fragment(&fragment);
        report.changed = output != html;

        tracing::debug!(
            comments = report.comments_removed,
            author_blocks = report.author_blocks_removed,
            empty_paragraphs = report.empty_paragraphs_removed,
            images = report.images_normalized,
            styles = report.styles_stripped,
            headings = report.headings_renamed,
            changed = report.changed,
            "normalized fragment"
        );

        Normalized {
            html: output,
            report,
        }
    }

    /// Run every pass over an already parsed fragment, in order.
    pub fn normalize_tree(&self, fragment: &mut Fragment) -> NormalizeReport {
        let mut report = NormalizeReport {
            comments_removed: strip_comments(fragment),
            author_blocks_removed: strip_author_blocks(fragment, &self.opts.author_class),
            empty_paragraphs_removed: remove_empty_paragraphs(fragment),
            ..Default::default()
        };

        let images = normalize_images(fragment, &self.opts);
        report.images_normalized = images.images_changed;
        report.styles_stripped = images.styles_stripped + strip_inline_styles(fragment);
        report.headings_renamed = demote_headings(fragment);
        report
    }
}

/// Normalize a fragment with the default options.
pub fn normalize_fragment(html: &str) -> String {
    Normalizer::default().normalize(html).html
}

/// Remove every comment node.
pub fn strip_comments(fragment: &mut Fragment) -> usize {
    remove_nodes(&mut fragment.children, &mut Node::is_comment)
}

/// Remove every element carrying `class`, with its whole subtree.
///
/// A block nested inside another block goes with the outer one and is not counted.
pub fn strip_author_blocks(fragment: &mut Fragment, class: &str) -> usize {
    prune_nodes(&mut fragment.children, &mut |node: &Node| {
        node.as_element().is_some_and(|el| el.has_class(class))
    })
}

/// A paragraph with no visible text and no image or iframe inside.
pub fn is_empty_paragraph(element: &Element) -> bool {
    element.is("p")
        && element.text_content().trim().is_empty()
        && !element.has_descendant(EMBED_TAGS)
}

/// Remove empty paragraphs, innermost first.
pub fn remove_empty_paragraphs(fragment: &mut Fragment) -> usize {
    remove_nodes(&mut fragment.children, &mut |node: &Node| {
        node.as_element().is_some_and(is_empty_paragraph)
    })
}

/// Collapse an image path containing `/../`. Returns `None` when nothing changes.
pub fn collapse_src(src: &str, mode: SrcCollapse) -> Option<String> {
    let (_, rest) = src.rsplit_once(TRAVERSAL)?;
    let collapsed = match mode {
        SrcCollapse::FileName => rest.rsplit('/').next().unwrap_or(rest),
        SrcCollapse::Remainder => rest,
    };

    if collapsed.is_empty() || collapsed == src {
        None
    } else {
        Some(collapsed.to_string())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImageStats {
    pub images_changed: usize,
    pub styles_stripped: usize,
}

struct ImagePass<'a> {
    opts: &'a NormalizeOptions,
    stats: ImageStats,
}

impl VisitorMut for ImagePass<'_> {
    fn visit_element_mut(&mut self, element: &mut Element) {
        if element.is("img") {
            let mut changed = false;

            if element.remove_attr("style").is_some() {
                self.stats.styles_stripped += 1;
                changed = true;
            }
            if element.ensure_class(&self.opts.image_class) {
                changed = true;
            }
            let collapsed = element
                .attr("src")
                .and_then(|src| collapse_src(src, self.opts.src_collapse));
            if let Some(src) = collapsed {
                element.set_attr("src", src);
                changed = true;
            }

            if changed {
                self.stats.images_changed += 1;
            }
        }
        walk_element_mut(self, element);
    }
}

/// Drop image styles, add the image class and collapse traversing paths.
pub fn normalize_images(fragment: &mut Fragment, opts: &NormalizeOptions) -> ImageStats {
    let mut pass = ImagePass {
        opts,
        stats: ImageStats::default(),
    };
    walk_fragment_mut(&mut pass, fragment);
    pass.stats
}

#[derive(Default)]
struct StylePass {
    stripped: usize,
}

impl VisitorMut for StylePass {
    fn visit_element_mut(&mut self, element: &mut Element) {
        if STYLE_STRIP_TAGS.iter().any(|t| element.is(t)) && element.remove_attr("style").is_some() {
            self.stripped += 1;
        }
        walk_element_mut(self, element);
    }
}

/// Remove `style` from paragraphs, divs and iframes.
pub fn strip_inline_styles(fragment: &mut Fragment) -> usize {
    let mut pass = StylePass::default();
    walk_fragment_mut(&mut pass, fragment);
    pass.stripped
}

/// Renames `h1` to `h2` and remembers the first heading level seen.
#[derive(Default)]
struct DemoteTopLevel {
    first_level: Option<u8>,
    renamed: usize,
}

impl VisitorMut for DemoteTopLevel {
    fn visit_element_mut(&mut self, element: &mut Element) {
        if let Some(mut level) = element.heading_level() {
            if level == 1 {
                element.set_heading_level(2);
                self.renamed += 1;
                level = 2;
            }
            self.first_level.get_or_insert(level);
        }
        walk_element_mut(self, element);
    }
}

struct ShiftHeadings {
    offset: u8,
    renamed: usize,
}

impl VisitorMut for ShiftHeadings {
    fn visit_element_mut(&mut self, element: &mut Element) {
        if let Some(level) = element.heading_level() {
            let shifted = level.saturating_sub(self.offset).max(2);
            if shifted != level {
                element.set_heading_level(shifted);
                self.renamed += 1;
            }
        }
        walk_element_mut(self, element);
    }
}

/// Make `h2` the top heading level.
///
/// Every `h1` becomes `h2`. If the first heading is then deeper than `h2`, all
/// headings move up by the same offset, never above `h2`. Only the first
/// heading decides the offset.
pub fn demote_headings(fragment: &mut Fragment) -> usize {
    let mut demote = DemoteTopLevel::default();
    walk_fragment_mut(&mut demote, fragment);

    let offset = match demote.first_level {
        Some(level) if level > 2 => level - 2,
        _ => return demote.renamed,
    };

    let mut shift = ShiftHeadings { offset, renamed: 0 };
    walk_fragment_mut(&mut shift, fragment);
    demote.renamed + shift.renamed
}
