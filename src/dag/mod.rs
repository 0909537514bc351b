use crate::error::{DagError, Result};
use crate::vertex::Instance;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Built vertices, keyed by vertex name
///
/// Produced by [`DagMaker::create`](crate::DagMaker::create) and handed back
/// to [`DagMaker::destroy`](crate::DagMaker::destroy). The caller owns it in
/// between.
#[derive(Clone, Default)]
pub struct Dag {
    instances: BTreeMap<String, Instance>,
}

impl Dag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, instance: Instance) -> Option<Instance> {
        self.instances.insert(name.into(), instance)
    }

    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.instances.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Instance> {
        self.instances.remove(name)
    }

    /// Attempts to get the vertex `name` as `T`
    pub fn resolve<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        let instance = self
            .instances
            .get(name)
            .ok_or_else(|| DagError::VertexNotFound {
                name: name.to_string(),
            })?;
        instance
            .downcast::<T>()
            .map_err(|actual| DagError::DowncastFailed {
                key: name.to_string(),
                expected: std::any::type_name::<T>(),
                actual,
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }
}

impl Debug for Dag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("Dag");
        for (name, instance) in &self.instances {
            map.field(name, &instance.type_name());
        }
        map.finish()
    }
}
