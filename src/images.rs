//! Item image handling
//!
//! Storage itself is an opaque collaborator; this module only decides which
//! images must be uploaded or deleted when an item's image set changes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;

/// Storage bucket holding item images, keyed by item ID.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Uploads a local file for the item and returns its stored name.
    async fn upload(&self, item_id: &str, path: &Path) -> Result<String>;

    /// Deletes a stored image. Deleting an absent image succeeds.
    async fn delete(&self, item_id: &str, name: &str) -> Result<()>;
}

/// One slot of an item's image set as edited by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// An image already in storage, by stored name
    Stored(String),
    /// A new image still on the device
    Local(PathBuf),
}

/// Uploads and deletes needed to go from one image set to another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDiff {
    /// Local files to upload, in display order
    pub uploads: Vec<PathBuf>,
    /// Stored names no longer referenced
    pub deletes: Vec<String>,
}

impl ImageDiff {
    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty() && self.deletes.is_empty()
    }
}

/// Diffs the previous stored names against the edited image set.
pub fn diff_images(previous: &[String], next: &[ImageRef]) -> ImageDiff {
    let kept: HashSet<&str> = next
        .iter()
        .filter_map(|image| match image {
            ImageRef::Stored(name) => Some(name.as_str()),
            ImageRef::Local(_) => None,
        })
        .collect();

    ImageDiff {
        uploads: next
            .iter()
            .filter_map(|image| match image {
                ImageRef::Local(path) => Some(path.clone()),
                ImageRef::Stored(_) => None,
            })
            .collect(),
        deletes: previous
            .iter()
            .filter(|name| !kept.contains(name.as_str()))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(name: &str) -> ImageRef {
        ImageRef::Stored(name.to_string())
    }

    #[test]
    fn test_diff_no_change() {
        let previous = vec!["0.jpg".to_string(), "1.jpg".to_string()];
        let diff = diff_images(&previous, &[stored("0.jpg"), stored("1.jpg")]);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_diff_removed_and_added() {
        let previous = vec!["0.jpg".to_string(), "1.jpg".to_string()];
        let next = vec![
            stored("1.jpg"),
            ImageRef::Local(PathBuf::from("/tmp/new.jpg")),
        ];

        let diff = diff_images(&previous, &next);

        assert_eq!(diff.uploads, vec![PathBuf::from("/tmp/new.jpg")]);
        assert_eq!(diff.deletes, vec!["0.jpg".to_string()]);
    }

    #[test]
    fn test_diff_cleared_set_deletes_everything() {
        let previous = vec!["0.jpg".to_string()];
        let diff = diff_images(&previous, &[]);
        assert_eq!(diff.deletes, previous);
        assert!(diff.uploads.is_empty());
    }
}
