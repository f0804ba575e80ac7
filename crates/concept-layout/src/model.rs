//! Concept map document model
//!
//! This is the long-lived node/edge structure the layout engine reads. A
//! concept is a labeled box on the canvas, a relation is a labeled
//! parent → child edge. The engine only reads this structure; positions and
//! sizes change exclusively through [`NodeMover`].

use crate::{NodeMover, NodeSizes, Point, Vec2};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

/// Identifier of a concept in a [`ConceptMap`]
pub type ConceptId = NodeIndex;

/// A node of the concept map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
    pub size: Vec2,
    pub position: Point,
    /// Collapsed concepts hide their relations from the layout
    pub expanded: bool,
    pub visible: bool,
}

impl Concept {
    pub fn new(name: impl Into<String>, size: Vec2) -> Self {
        Self {
            name: name.into(),
            size,
            position: Point::default(),
            expanded: true,
            visible: true,
        }
    }
}

/// A labeled parent → child relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub label: String,
}

/// The children a concept reaches through relations sharing one label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRelationship<'a> {
    pub label: &'a str,
    pub children: Vec<ConceptId>,
}

#[derive(Debug, Clone, Default)]
pub struct ConceptMap {
    graph: StableDiGraph<Concept, Relation>,
}

impl ConceptMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_concept(&mut self, concept: Concept) -> ConceptId {
        self.graph.add_node(concept)
    }

    /// Remove a concept together with all its relations
    pub fn remove_concept(&mut self, id: ConceptId) -> Option<Concept> {
        self.graph.remove_node(id)
    }

    /// Relate `parent` to `child` under the given category label
    pub fn relate(&mut self, parent: ConceptId, label: impl Into<String>, child: ConceptId) {
        self.graph.add_edge(
            parent,
            child,
            Relation {
                label: label.into(),
            },
        );
    }

    pub fn concept(&self, id: ConceptId) -> Option<&Concept> {
        self.graph.node_weight(id)
    }

    pub fn concept_mut(&mut self, id: ConceptId) -> Option<&mut Concept> {
        self.graph.node_weight_mut(id)
    }

    /// Find the first concept with the given name
    pub fn find(&self, name: &str) -> Option<ConceptId> {
        self.concepts()
            .find(|(_, concept)| concept.name == name)
            .map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn concepts(&self) -> impl Iterator<Item = (ConceptId, &Concept)> {
        self.graph
            .node_indices()
            .filter_map(|id| self.graph.node_weight(id).map(|c| (id, c)))
    }

    /// Visible concepts in ascending id order
    pub fn visible_concepts(&self) -> impl Iterator<Item = ConceptId> + '_ {
        self.concepts()
            .filter(|(_, concept)| concept.visible)
            .map(|(id, _)| id)
    }

    pub fn set_expanded(&mut self, id: ConceptId, expanded: bool) {
        if let Some(concept) = self.concept_mut(id) {
            concept.expanded = expanded;
        }
    }

    pub fn set_visible(&mut self, id: ConceptId, visible: bool) {
        if let Some(concept) = self.concept_mut(id) {
            concept.visible = visible;
        }
    }

    /// Outgoing relations grouped by label, in relation creation order
    pub fn child_relationships(&self, id: ConceptId) -> Vec<ChildRelationship<'_>> {
        let mut relationships: Vec<ChildRelationship<'_>> = Vec::new();
        for (_, child, relation) in self.sorted_edges(id, Direction::Outgoing) {
            let label = relation.label.as_str();
            match relationships.iter_mut().find(|r| r.label == label) {
                Some(relationship) => relationship.children.push(child),
                None => relationships.push(ChildRelationship {
                    label,
                    children: vec![child],
                }),
            }
        }
        relationships
    }

    /// Incoming relations as `(label, parent)` pairs, in relation creation order
    pub fn parents(&self, id: ConceptId) -> Vec<(&str, ConceptId)> {
        self.sorted_edges(id, Direction::Incoming)
            .into_iter()
            .map(|(parent, _, relation)| (relation.label.as_str(), parent))
            .collect()
    }

    // petgraph walks a node's edge list newest first
    fn sorted_edges(
        &self,
        id: ConceptId,
        direction: Direction,
    ) -> Vec<(ConceptId, ConceptId, &Relation)> {
        let mut edges: Vec<EdgeIndex> = self
            .graph
            .edges_directed(id, direction)
            .map(|edge| edge.id())
            .collect();
        edges.sort();
        edges
            .into_iter()
            .filter_map(|edge| {
                let (source, target) = self.graph.edge_endpoints(edge)?;
                Some((source, target, self.graph.edge_weight(edge)?))
            })
            .collect()
    }
}

impl NodeSizes<ConceptId> for ConceptMap {
    fn size(&self, node: ConceptId) -> Vec2 {
        self.concept(node).map(|c| c.size).unwrap_or(Vec2::zero())
    }
}

impl NodeMover<ConceptId> for ConceptMap {
    // Animation is left to whoever renders the map
    fn move_to(&mut self, node: ConceptId, x: f32, y: f32, _animate: bool) {
        if let Some(concept) = self.concept_mut(node) {
            concept.position = Point::new(x, y);
        }
    }

    fn resize_to(&mut self, node: ConceptId, width: f32, height: f32, _animate: bool) {
        if let Some(concept) = self.concept_mut(node) {
            concept.size = Vec2::new(width, height);
        }
    }
}
