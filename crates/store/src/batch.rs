// ABOUTME: Batch entry points that map the normalizer or the audit over a whole post store.
// ABOUTME: BatchConfig carries the paths and options explicitly; a failed run writes nothing.

use std::path::{Path, PathBuf};

use postkit_html::{audit_fragment, FragmentAudit, NormalizeOptions, NormalizeReport, Normalizer};
use serde::Serialize;

use crate::error::StoreError;
use crate::models::{Post, PostId};
use crate::store::{load_posts, save_posts};

/// Configuration for one normalization run over the store.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub store_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub dry_run: bool,
    pub options: NormalizeOptions,
}

impl BatchConfig {
    /// Normalize the store in place with default options.
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            output_path: None,
            dry_run: false,
            options: NormalizeOptions::default(),
        }
    }

    /// Write the result somewhere other than the input store.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Report what would change without writing.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Where the store is written.
    pub fn target_path(&self) -> &Path {
        self.output_path.as_deref().unwrap_or(&self.store_path)
    }
}

/// Normalization result for one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostOutcome {
    pub label: String,
    pub report: NormalizeReport,
}

/// Result of a normalization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub normalized: usize,
    pub changed: usize,
    /// Posts without a body.
    pub skipped: usize,
    /// Path written, `None` for a dry run.
    pub written: Option<PathBuf>,
    pub outcomes: Vec<PostOutcome>,
}

/// Normalize every post body in place. Posts without content are skipped.
pub fn normalize_posts(posts: &mut [Post], normalizer: &Normalizer) -> Vec<PostOutcome> {
    let mut outcomes = Vec::with_capacity(posts.len());

    for post in posts.iter_mut() {
        let label = post.label();
        let Some(content) = post.content_mut() else {
            tracing::warn!(post = %label, "post has no content, skipping");
            continue;
        };

        let result = normalizer.normalize(content);
        tracing::debug!(post = %label, changed = result.report.changed, edits = result.report.edits(), "normalized post");
        *content = result.html;
        outcomes.push(PostOutcome {
            label,
            report: result.report,
        });
    }

    outcomes
}

/// Load the store, normalize every post and save the whole collection.
///
/// Load and save failures abort the run before anything is written.
pub fn normalize_store(config: &BatchConfig) -> Result<BatchSummary, StoreError> {
    let mut posts = load_posts(&config.store_path)?;
    let normalizer = Normalizer::new(config.options.clone());
    let outcomes = normalize_posts(&mut posts, &normalizer);

    let written = if config.dry_run {
        tracing::info!("dry run, store not written");
        None
    } else {
        let target = config.target_path();
        save_posts(target, &posts)?;
        Some(target.to_path_buf())
    };

    let summary = BatchSummary {
        total: posts.len(),
        normalized: outcomes.len(),
        changed: outcomes.iter().filter(|o| o.report.changed).count(),
        skipped: posts.len() - outcomes.len(),
        written,
        outcomes,
    };
    tracing::info!(
        total = summary.total,
        changed = summary.changed,
        skipped = summary.skipped,
        "normalization finished"
    );
    Ok(summary)
}

/// Audit result for one post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostAudit {
    pub label: String,
    pub id: Option<PostId>,
    pub title: Option<String>,
    /// `None` when the post has no content.
    pub audit: Option<FragmentAudit>,
}

/// Audit every post body.
pub fn audit_posts(posts: &[Post], options: &NormalizeOptions) -> Vec<PostAudit> {
    posts
        .iter()
        .map(|post| PostAudit {
            label: post.label(),
            id: post.id(),
            title: post.title().map(str::to_string),
            audit: post
                .content()
                .map(|content| audit_fragment(content, options)),
        })
        .collect()
}

/// Load the store and audit every post. Nothing is written.
pub fn audit_store(path: &Path, options: &NormalizeOptions) -> Result<Vec<PostAudit>, StoreError> {
    let posts = load_posts(path)?;
    Ok(audit_posts(&posts, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn post(slug: &str, content: Option<&str>) -> Post {
        let post = Post::new().with_field("slug", slug);
        match content {
            Some(content) => post.with_field("content", content),
            None => post,
        }
    }

    #[test]
    fn test_normalize_posts_skips_missing_content() {
        let mut posts = vec![
            post("a", Some("<h1>A</h1>")),
            post("b", None),
            post("c", Some("<h2>C</h2>")),
        ];
        let outcomes = normalize_posts(&mut posts, &Normalizer::default());

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].label, "a");
        assert!(outcomes[0].report.changed);
        assert!(!outcomes[1].report.changed);
        assert_eq!(posts[0].content(), Some("<h2>A</h2>"));
        assert_eq!(posts[1].content(), None);
    }

    #[test]
    fn test_target_path_defaults_to_store() {
        let config = BatchConfig::new("posts.json");
        assert_eq!(config.target_path(), Path::new("posts.json"));
        let config = config.output_path("out.json");
        assert_eq!(config.target_path(), Path::new("out.json"));
    }

    #[test]
    fn test_audit_posts() {
        let posts = vec![post("a", Some("<h1>A</h1><p></p>")), post("b", None)];
        let audits = audit_posts(&posts, &NormalizeOptions::default());

        let first = audits[0].audit.as_ref().unwrap();
        assert_eq!(first.headings, vec!["h1"]);
        assert_eq!(first.empty_paragraphs, 1);
        assert!(audits[1].audit.is_none());
    }
}
