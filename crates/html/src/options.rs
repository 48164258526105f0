// ABOUTME: Configuration for the fragment normalizer: designated class names and image path handling.
// ABOUTME: NormalizerBuilder provides a fluent API for constructing Normalizer instances.

use std::fmt;

use crate::normalize::Normalizer;

/// Class every image must carry. Shared with the page template.
pub const ARTICLE_IMAGE_CLASS: &str = "article-image";

/// Class marking author blocks that the page template now renders itself.
pub const AUTHOR_INFO_CLASS: &str = "author-info";

/// How an image `src` containing `/../` is collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SrcCollapse {
    /// Keep only the final path segment: `a/../b/x.png` becomes `x.png`.
    #[default]
    FileName,
    /// Keep everything after the last `/../`: `posts/s/../images/x.png` becomes `images/x.png`.
    Remainder,
}

impl fmt::Display for SrcCollapse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SrcCollapse::FileName => "file-name",
            SrcCollapse::Remainder => "remainder",
        };
        write!(f, "{}", s)
    }
}

/// Configuration options for the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub image_class: String,
    pub author_class: String,
    pub src_collapse: SrcCollapse,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            image_class: ARTICLE_IMAGE_CLASS.to_string(),
            author_class: AUTHOR_INFO_CLASS.to_string(),
            src_collapse: SrcCollapse::FileName,
        }
    }
}

/// Builder for constructing Normalizer instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct NormalizerBuilder {
    opts: NormalizeOptions,
}

impl NormalizerBuilder {
    /// Create a NormalizerBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the class added to every image.
    pub fn image_class(mut self, class: impl Into<String>) -> Self {
        self.opts.image_class = class.into();
        self
    }

    /// Set the class that marks author blocks for removal.
    pub fn author_class(mut self, class: impl Into<String>) -> Self {
        self.opts.author_class = class.into();
        self
    }

    /// Set how traversing image paths are collapsed.
    pub fn src_collapse(mut self, mode: SrcCollapse) -> Self {
        self.opts.src_collapse = mode;
        self
    }

    /// Start from an existing set of options.
    pub fn options(mut self, opts: NormalizeOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Build the Normalizer with the configured options.
    pub fn build(self) -> Normalizer {
        Normalizer::new(self.opts)
    }
}
