// ABOUTME: Fragment tree model, scraper-backed parsing, deterministic serialization and visitors.
// ABOUTME: Everything the cleanup passes need to work on a typed tree instead of raw markup.

//! DOM utilities for blog post fragments.
//!
//! A fragment is parsed once with [`parse_fragment`] into a [`Fragment`] of typed
//! [`Node`]s, transformed in place, and written back with [`serialize_fragment`].

pub mod node;
pub mod parse;
pub mod serialize;
pub mod visit;

pub use node::{Element, Fragment, Node};
pub use parse::parse_fragment;
pub use serialize::serialize_fragment;
pub use visit::{Visitor, VisitorMut};
