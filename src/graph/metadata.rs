use super::Direction;
use crate::vertex::SharedFactory;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::fmt::Debug;

/// Edges of a single vertex
#[derive(Clone)]
pub struct VertexMetadata {
    factory: SharedFactory,
    dependencies: BTreeSet<String>,
    dependents: BTreeSet<String>,
}

impl VertexMetadata {
    fn new(factory: SharedFactory, dependencies: BTreeSet<String>) -> Self {
        Self {
            factory,
            dependencies,
            dependents: BTreeSet::new(),
        }
    }

    pub fn factory(&self) -> &SharedFactory {
        &self.factory
    }

    /// Names this vertex requires to be built first
    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.dependencies
    }

    /// Names that require this vertex to be built first
    pub fn dependents(&self) -> &BTreeSet<String> {
        &self.dependents
    }

    pub fn edges(&self, direction: Direction) -> &BTreeSet<String> {
        match direction {
            Direction::Dependencies => &self.dependencies,
            Direction::Dependents => &self.dependents,
        }
    }

    pub(crate) fn edges_mut(&mut self, direction: Direction) -> &mut BTreeSet<String> {
        match direction {
            Direction::Dependencies => &mut self.dependencies,
            Direction::Dependents => &mut self.dependents,
        }
    }
}

impl Debug for VertexMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexMetadata")
            .field("factory", &self.factory.name())
            .field("dependencies", &self.dependencies)
            .field("dependents", &self.dependents)
            .finish()
    }
}

/// Graph of every vertex reachable from the supplied factories
///
/// Built once from the factories and read-only afterwards. Cloning yields an
/// independent copy of every edge set, which is what the ordering passes
/// prune.
#[derive(Clone, Debug, Default)]
pub struct VertexMetadataMap {
    pub(crate) map: BTreeMap<String, VertexMetadata>,
}

impl VertexMetadataMap {
    /// Build the metadata map from the given factories
    ///
    /// Factories are deduplicated by name, first seen wins. Factories that are
    /// only referenced as dependencies are discovered breadth-first and get an
    /// entry of their own.
    pub fn from_factories<I>(factories: I) -> Self
    where
        I: IntoIterator<Item = SharedFactory>,
    {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        for factory in factories {
            if seen.insert(factory.name().to_string()) {
                queue.push_back(factory);
            }
        }

        let mut map = BTreeMap::new();
        while let Some(factory) = queue.pop_front() {
            let mut dependencies = BTreeSet::new();
            for dependency in factory.dependencies().into_values() {
                dependencies.insert(dependency.name().to_string());
                // implicit vertex
                if seen.insert(dependency.name().to_string()) {
                    queue.push_back(dependency);
                }
            }
            map.insert(
                factory.name().to_string(),
                VertexMetadata::new(factory, dependencies),
            );
        }

        let edges: Vec<(String, String)> = map
            .iter()
            .flat_map(|(name, metadata)| {
                metadata
                    .dependencies
                    .iter()
                    .map(move |dependency| (dependency.clone(), name.clone()))
            })
            .collect();
        for (dependency, dependent) in edges {
            if let Some(metadata) = map.get_mut(&dependency) {
                metadata.dependents.insert(dependent);
            }
        }

        tracing::debug!("Built vertex metadata for {} vertices", map.len());

        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&VertexMetadata> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Vertex names in lexicographic order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VertexMetadata)> {
        self.map.iter().map(|(name, metadata)| (name.as_str(), metadata))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
