//! Vertex arena the pipeline works on
//!
//! Every arrange run wraps the visible concepts into fresh [`Vertex`]
//! values stored in a [`VertexGraph`]. Concepts are mapped to vertices
//! through a lookup table local to the builder, the document model itself
//! is never decorated.

use crate::{ConceptId, ConceptMap};
use std::collections::HashMap;
use tracing::trace;

/// Index of a vertex in its [`VertexGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutEdge {
    pub target: VertexId,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Vertex {
    /// The wrapped concept, `None` for dummy vertices
    pub concept: Option<ConceptId>,
    pub outgoing: Vec<OutEdge>,
    /// Source of every incoming edge, one entry per edge
    pub incoming: Vec<VertexId>,
    pub layer: Option<usize>,
}

impl Vertex {
    fn new(concept: Option<ConceptId>) -> Self {
        Self {
            concept,
            outgoing: Vec::new(),
            incoming: Vec::new(),
            layer: None,
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.concept.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct VertexGraph {
    vertices: Vec<Vertex>,
    independent: Vec<VertexId>,
}

impl VertexGraph {
    /// Wrap the visible part of `map`
    ///
    /// Only expanded concepts contribute edges, and only towards visible
    /// children. Independent vertices are the roots without incoming edges
    /// in that subgraph, in root order, followed by any other vertex
    /// without incoming edges.
    pub fn build(map: &ConceptMap, roots: &[ConceptId]) -> Self {
        let mut graph = Self::default();
        let mut lookup: HashMap<ConceptId, VertexId> = HashMap::new();

        for concept in map.visible_concepts() {
            lookup.insert(concept, graph.add_vertex(Some(concept)));
        }

        for concept in map.visible_concepts() {
            let Some(source) = lookup.get(&concept).copied() else {
                continue;
            };
            if !map.concept(concept).is_some_and(|c| c.expanded) {
                continue;
            }
            for relationship in map.child_relationships(concept) {
                for child in &relationship.children {
                    if let Some(&target) = lookup.get(child) {
                        graph.add_edge(source, target, relationship.label);
                    }
                }
            }
        }

        let root_vertices = roots.iter().filter_map(|root| lookup.get(root).copied());
        let mut independent: Vec<VertexId> = Vec::new();
        let mut seen = vec![false; graph.len()];
        for vertex in root_vertices.chain(graph.ids()) {
            if graph.vertex(vertex).incoming.is_empty() && !seen[vertex.0] {
                seen[vertex.0] = true;
                independent.push(vertex);
            }
        }
        graph.independent = independent;

        trace!(
            "Built {} vertices, {} edges, {} independent",
            graph.len(),
            graph.edge_count(),
            graph.independent.len()
        );

        graph
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.vertices.iter().map(|v| v.outgoing.len()).sum()
    }

    pub fn ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId)
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    /// Vertices the topological sort starts from
    pub fn independent(&self) -> &[VertexId] {
        &self.independent
    }

    /// All edges as `(source, edge)` pairs
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, &OutEdge)> {
        self.vertices
            .iter()
            .enumerate()
            .flat_map(|(i, v)| v.outgoing.iter().map(move |e| (VertexId(i), e)))
    }

    pub(crate) fn layer_of(&self, id: VertexId) -> usize {
        self.vertices[id.0].layer.unwrap_or(0)
    }

    pub(crate) fn set_layer(&mut self, id: VertexId, layer: usize) {
        self.vertices[id.0].layer = Some(layer);
    }

    pub(crate) fn add_vertex(&mut self, concept: Option<ConceptId>) -> VertexId {
        self.vertices.push(Vertex::new(concept));
        VertexId(self.vertices.len() - 1)
    }

    pub(crate) fn add_dummy(&mut self, layer: usize) -> VertexId {
        let id = self.add_vertex(None);
        self.set_layer(id, layer);
        id
    }

    pub(crate) fn add_edge(&mut self, source: VertexId, target: VertexId, label: &str) {
        self.vertices[source.0].outgoing.push(OutEdge {
            target,
            label: label.to_owned(),
        });
        self.vertices[target.0].incoming.push(source);
    }

    /// Point the `edge`th outgoing edge of `source` at `target`, keeping the
    /// incoming lists of the old and new target in sync
    pub(crate) fn redirect_edge(&mut self, source: VertexId, edge: usize, target: VertexId) {
        let current = &mut self.vertices[source.0].outgoing[edge].target;
        let previous = std::mem::replace(current, target);
        let incoming = &mut self.vertices[previous.0].incoming;
        if let Some(slot) = incoming.iter().position(|&v| v == source) {
            incoming.remove(slot);
        }
        self.vertices[target.0].incoming.push(source);
    }
}
