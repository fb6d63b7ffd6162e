//! Collection and document references.
//!
//! Paths alternate collection and document ids the way Firestore does:
//! `users`, `users/alice`, `users/alice/friends`, `users/alice/friends/bob`.

use crate::error::StoreError;
use std::fmt;

/// A collection, either top-level or nested under a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionRef {
    path: String,
}

/// A single document inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentRef {
    path: String,
}

fn check_segment(segment: &str) -> Result<(), StoreError> {
    if segment.is_empty() || segment.contains('/') || segment == "." || segment == ".." {
        return Err(StoreError::InvalidPath(format!(
            "invalid path segment {segment:?}"
        )));
    }
    Ok(())
}

impl CollectionRef {
    /// A top-level collection.
    pub fn root(name: &str) -> Result<Self, StoreError> {
        check_segment(name)?;
        Ok(Self {
            path: name.to_string(),
        })
    }

    /// The document `id` in this collection.
    pub fn doc(&self, id: &str) -> Result<DocumentRef, StoreError> {
        check_segment(id)?;
        Ok(DocumentRef {
            path: format!("{}/{}", self.path, id),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The last path segment.
    pub fn id(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// The owning document, `None` for top-level collections.
    pub fn parent(&self) -> Option<DocumentRef> {
        self.path.rsplit_once('/').map(|(parent, _)| DocumentRef {
            path: parent.to_string(),
        })
    }
}

impl DocumentRef {
    /// A subcollection of this document.
    pub fn collection(&self, name: &str) -> Result<CollectionRef, StoreError> {
        check_segment(name)?;
        Ok(CollectionRef {
            path: format!("{}/{}", self.path, name),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn id(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn parent(&self) -> CollectionRef {
        let parent = self
            .path
            .rsplit_once('/')
            .map(|(parent, _)| parent)
            .unwrap_or_default();
        CollectionRef {
            path: parent.to_string(),
        }
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
