// ABOUTME: Wholesale load and all-or-nothing save of the JSON post store.
// ABOUTME: Saves go through a temporary file in the same directory that is renamed over the target.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::models::Post;

/// Parse a post store document.
pub fn parse_posts(json: &str, path: &Path) -> Result<Vec<Post>, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::parse(path, e))
}

/// Encode posts the way the store is written: two-space indent, trailing newline.
pub fn to_store_json(posts: &[Post]) -> Result<String, StoreError> {
    let mut json = serde_json::to_string_pretty(posts).map_err(StoreError::Serialize)?;
    json.push('\n');
    Ok(json)
}

/// Read the whole post store.
pub fn load_posts(path: &Path) -> Result<Vec<Post>, StoreError> {
    let json = fs::read_to_string(path).map_err(|e| StoreError::read(path, e))?;
    let posts = parse_posts(&json, path)?;
    tracing::info!(path = %path.display(), posts = posts.len(), "loaded post store");
    Ok(posts)
}

/// Replace the post store with `posts`.
///
/// The file at `path` is either fully replaced or left untouched.
pub fn save_posts(path: &Path, posts: &[Post]) -> Result<(), StoreError> {
    let json = to_store_json(posts)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::write(path, e))?;
    tmp.write_all(json.as_bytes())
        .map_err(|e| StoreError::write(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::write(path, e))?;

    // Temporary files are created private; keep the store's own permissions.
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| StoreError::write(path, e))?;
    }

    tmp.persist(path).map_err(|e| StoreError::Persist {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), posts = posts.len(), "saved post store");
    Ok(())
}
