//! Clustering of the vertices of each layer into group vertices
//!
//! Groups partition their layer: every vertex belongs to exactly one group
//! of its own layer. Group edges mirror the vertex edges between members.

use super::graph::{VertexGraph, VertexId};
use std::collections::HashMap;
use tracing::debug;

/// Index of a group in its [`GroupMatrix`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct GroupId(usize);

#[derive(Debug, Clone, Default)]
pub(crate) struct GroupVertex {
    pub(crate) members: Vec<VertexId>,
    pub(crate) outgoing: Vec<GroupId>,
    pub(crate) incoming: Vec<GroupId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grouping {
    /// One group per vertex
    #[default]
    Simple,
    /// Vertices reached from the same set of parent groups share a group
    Associative,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct GroupMatrix {
    groups: Vec<GroupVertex>,
    /// Groups of each layer, in display order
    pub(crate) layers: Vec<Vec<GroupId>>,
}

impl GroupMatrix {
    pub(crate) fn build(
        graph: &VertexGraph,
        layers: &[Vec<VertexId>],
        grouping: Grouping,
    ) -> Self {
        let (matrix, membership) = match grouping {
            Grouping::Simple => Self::simple(graph, layers),
            Grouping::Associative => Self::associative(graph, layers),
        };
        let matrix = matrix.connect(graph, &membership, grouping == Grouping::Associative);

        debug!(
            "{grouping:?} grouping made {} groups over {} layers",
            matrix.groups.len(),
            matrix.layers.len()
        );

        matrix
    }

    pub(crate) fn group(&self, id: GroupId) -> &GroupVertex {
        &self.groups[id.0]
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.groups.len()
    }

    /// Vertices of each layer in group order, with the index at which each
    /// group starts
    pub(crate) fn flatten(&self) -> (Vec<Vec<VertexId>>, Vec<Vec<usize>>) {
        let mut vertices = Vec::with_capacity(self.layers.len());
        let mut starts = Vec::with_capacity(self.layers.len());

        for row in &self.layers {
            let mut layer = Vec::new();
            let mut layer_starts = Vec::with_capacity(row.len());
            for &group in row {
                layer_starts.push(layer.len());
                layer.extend_from_slice(&self.group(group).members);
            }
            vertices.push(layer);
            starts.push(layer_starts);
        }

        (vertices, starts)
    }

    fn add_group(&mut self) -> GroupId {
        self.groups.push(GroupVertex::default());
        GroupId(self.groups.len() - 1)
    }

    fn simple(graph: &VertexGraph, layers: &[Vec<VertexId>]) -> (Self, Vec<Option<GroupId>>) {
        let mut matrix = Self::default();
        let mut membership = vec![None; graph.len()];

        for layer in layers {
            let mut row = Vec::with_capacity(layer.len());
            for &vertex in layer {
                let group = matrix.add_group();
                matrix.groups[group.0].members.push(vertex);
                membership[vertex.index()] = Some(group);
                row.push(group);
            }
            matrix.layers.push(row);
        }

        (matrix, membership)
    }

    fn associative(graph: &VertexGraph, layers: &[Vec<VertexId>]) -> (Self, Vec<Option<GroupId>>) {
        let mut matrix = Self::default();
        let mut membership: Vec<Option<GroupId>> = vec![None; graph.len()];
        // Index of each group within its own row
        let mut slot: Vec<usize> = Vec::new();

        for (index, layer) in layers.iter().enumerate() {
            let mut row: Vec<GroupId> = Vec::new();
            let mut by_parents: HashMap<String, GroupId> = HashMap::new();

            for &vertex in layer {
                let group = if index == 0 {
                    matrix.add_group()
                } else {
                    let mut parents: Vec<usize> = graph
                        .vertex(vertex)
                        .incoming
                        .iter()
                        .filter_map(|parent| membership[parent.index()])
                        .map(|group| slot[group.0])
                        .collect();
                    parents.sort_unstable();
                    parents.dedup();
                    let key = parents
                        .iter()
                        .map(usize::to_string)
                        .collect::<Vec<_>>()
                        .join(",");

                    match by_parents.get(&key) {
                        Some(&group) => group,
                        None => {
                            let group = matrix.add_group();
                            by_parents.insert(key, group);
                            group
                        }
                    }
                };

                if !row.contains(&group) {
                    slot.push(row.len());
                    row.push(group);
                }
                matrix.groups[group.0].members.push(vertex);
                membership[vertex.index()] = Some(group);
            }

            matrix.layers.push(row);
        }

        (matrix, membership)
    }

    /// Mirror vertex edges onto groups, optionally collapsing parallel ones
    fn connect(
        mut self,
        graph: &VertexGraph,
        membership: &[Option<GroupId>],
        dedup: bool,
    ) -> Self {
        for (source, edge) in graph.edges() {
            let from = membership[source.index()];
            let to = membership[edge.target.index()];
            let (Some(from), Some(to)) = (from, to) else {
                continue;
            };
            if dedup && self.groups[from.0].outgoing.contains(&to) {
                continue;
            }
            self.groups[from.0].outgoing.push(to);
            self.groups[to.0].incoming.push(from);
        }
        self
    }
}
