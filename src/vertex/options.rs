use super::Instance;
use crate::error::{DagError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Dependency instances handed to [`VertexFactory::create`](super::VertexFactory::create),
/// keyed by the local binding names the factory declared.
#[derive(Clone, Debug, Default)]
pub struct VertexOptions {
    entries: BTreeMap<String, Instance>,
}

impl VertexOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, instance: Instance) -> Option<Instance> {
        self.entries.insert(key.into(), instance)
    }

    /// Attempts to get the dependency bound to `key` as `T`
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>> {
        let instance = self
            .entries
            .get(key)
            .ok_or_else(|| DagError::OptionNotFound {
                key: key.to_string(),
            })?;
        instance
            .downcast::<T>()
            .map_err(|actual| DagError::DowncastFailed {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
                actual,
            })
    }

    /// Untyped access to the dependency bound to `key`
    pub fn instance(&self, key: &str) -> Option<&Instance> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Instance)> for VertexOptions {
    fn from_iter<I: IntoIterator<Item = (String, Instance)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
