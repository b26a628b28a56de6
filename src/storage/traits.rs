use std::fmt;

use serde_json::Value;

/// Named group of documents; one per profile type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Individuals,
    Organizations,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Individuals, Collection::Organizations];

    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Individuals => "individuals",
            Collection::Organizations => "organizations",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a read. A missing document is a snapshot that does not exist,
/// not an error.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<T = Value> {
    pub id: String,
    data: Option<T>,
}

impl<T> Snapshot<T> {
    pub fn found(id: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            data: Some(data),
        }
    }

    pub fn missing(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: None,
        }
    }

    pub fn exists(&self) -> bool {
        self.data.is_some()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Snapshot<U>, E> {
        Ok(Snapshot {
            id: self.id,
            data: self.data.map(f).transpose()?,
        })
    }
}

pub trait DocumentStore {
    fn get(&self, collection: Collection, id: &str) -> anyhow::Result<Snapshot>;

    /// Fails if a document with `id` already exists in `collection`.
    fn insert(&self, collection: Collection, id: &str, data: &Value) -> anyhow::Result<()>;

    /// Merges the top-level keys of `data` into the stored document.
    /// Returns `false` when there is nothing to update.
    fn update(&self, collection: Collection, id: &str, data: &Value) -> anyhow::Result<bool>;

    /// Returns `false` when there was nothing to delete.
    fn delete(&self, collection: Collection, id: &str) -> anyhow::Result<bool>;
}
