// ABOUTME: Post store library: the post record model, JSON load/save and the batch entry points.
// ABOUTME: Maps the fragment normalizer and the audit over every post of the store.

pub mod batch;
pub mod error;
pub mod models;
pub mod store;

pub use batch::{
    audit_posts, audit_store, normalize_posts, normalize_store, BatchConfig, BatchSummary,
    PostAudit, PostOutcome,
};
pub use error::StoreError;
pub use models::{Post, PostId};
pub use store::{load_posts, parse_posts, save_posts, to_store_json};
