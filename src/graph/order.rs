use super::VertexMetadataMap;
use crate::error::{DagError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{AsRefStr, Display, EnumString};

/// Ordered groups of vertex names; every vertex of a layer only waits on earlier layers
pub type Layers = Vec<Vec<String>>;

/// Relation used to order vertices
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Vertices without dependencies first: creation order
    Dependencies,
    /// Vertices nobody depends on first: destruction order
    Dependents,
}

impl Direction {
    /// The inverse relation
    pub fn adjacent(self) -> Direction {
        match self {
            Direction::Dependencies => Direction::Dependents,
            Direction::Dependents => Direction::Dependencies,
        }
    }
}

/// Creation and destruction order of a graph, for display or logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub creation: Layers,
    pub destruction: Layers,
}

impl VertexMetadataMap {
    /// Order vertices into layers by repeatedly pruning leaves
    ///
    /// A leaf is a vertex whose `direction` edge set is empty. Each pass works
    /// on a fresh copy of the map, so calls never affect each other. Names
    /// inside a layer are sorted lexicographically.
    ///
    /// # Errors
    /// Returns [`DagError::CircularDependency`] when vertices remain but none
    /// of them is a leaf.
    pub fn order_by(&self, direction: Direction) -> Result<Layers> {
        let adjacent_direction = direction.adjacent();
        let mut remaining = self.map.clone();
        let mut layers = Vec::new();

        while !remaining.is_empty() {
            let mut leaves = Vec::new();
            let mut adjacent = BTreeSet::new();
            for (name, metadata) in &remaining {
                if metadata.edges(direction).is_empty() {
                    leaves.push(name.clone());
                    adjacent.extend(metadata.edges(adjacent_direction).iter().cloned());
                }
            }

            if leaves.is_empty() {
                return Err(DagError::CircularDependency {
                    remaining: remaining.into_keys().collect(),
                });
            }

            leaves.sort();

            // prune leaves
            for name in &leaves {
                remaining.remove(name);
            }
            for name in &adjacent {
                if let Some(metadata) = remaining.get_mut(name) {
                    let edges = metadata.edges_mut(direction);
                    for leaf in &leaves {
                        edges.remove(leaf);
                    }
                }
            }

            tracing::debug!("Layer {} by {}: {:?}", layers.len(), direction, leaves);
            layers.push(leaves);
        }

        Ok(layers)
    }

    /// Both orders at once
    pub fn plan(&self) -> Result<Plan> {
        Ok(Plan {
            creation: self.order_by(Direction::Dependencies)?,
            destruction: self.order_by(Direction::Dependents)?,
        })
    }
}
