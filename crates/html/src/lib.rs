// ABOUTME: Library entry point for the blog post fragment normalizer.
// ABOUTME: Re-exports the public API: Normalizer, NormalizeOptions, the fragment tree and the audit.

//! postkit-html - cleans blog post HTML fragments for the site's page template.
//!
//! A fragment is parsed into a typed tree, run through a fixed sequence of
//! cleanup passes, and serialized deterministically. The result is idempotent:
//! normalizing normalized output changes nothing.
//!
//! # Example
//!
//! ```
//! use postkit_html::normalize_fragment;
//!
//! let html = r#"<!--c--><p></p><h1>Title</h1><p>Body</p><img src="a/../b/x.png" style="color:red">"#;
//! assert_eq!(
//!     normalize_fragment(html),
//!     r#"<h2>Title</h2><p>Body</p><img src="x.png" class="article-image">"#
//! );
//! ```

pub mod audit;
pub mod dom;
pub mod normalize;
pub mod options;

pub use crate::audit::{audit_fragment, audit_tree, FragmentAudit, StyleSample};
pub use crate::dom::{parse_fragment, serialize_fragment, Element, Fragment, Node};
pub use crate::normalize::{normalize_fragment, NormalizeReport, Normalized, Normalizer};
pub use crate::options::{
    NormalizeOptions, NormalizerBuilder, SrcCollapse, ARTICLE_IMAGE_CLASS, AUTHOR_INFO_CLASS,
};
