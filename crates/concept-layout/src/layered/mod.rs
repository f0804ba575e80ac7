mod crossings;
mod graph;
mod grouping;
mod layers;
mod ordering;
mod positions;

use crate::{
    apply_placements, ConceptId, ConceptMap, LayoutContext, LayoutEngine, NodeMover, NodeSizes,
    Placement, Vec2,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use crossings::count_crossings;
pub use graph::{OutEdge, Vertex, VertexGraph, VertexId};
pub use grouping::Grouping;

use crossings::{order_groups, order_roots, order_vertices};
use grouping::GroupMatrix;
use layers::{assign_layers, insert_dummies};
use ordering::topological_order;
use positions::assign_coordinates;

/// Errors that can occur during layered layout computation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayeredLayoutError {
    /// Every vertex has a parent, so the graph is cyclic
    #[error("none of the {vertices} vertices is independent, the graph has a cycle")]
    NoIndependentVertex { vertices: usize },

    /// Some vertices sit on a cycle below the independent ones
    #[error("only {sorted} of {vertices} vertices could be ordered, the graph has a cycle")]
    Cycle { sorted: usize, vertices: usize },

    /// The arranged graph does not fit the canvas
    #[error("layout of {width}x{height} does not fit the {}x{} canvas", .canvas.x, .canvas.y)]
    TooLarge { width: f32, height: f32, canvas: Vec2 },
}

/// Configuration for the layered (Sugiyama-style) auto-arrange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredLayout {
    /// One group per vertex instead of clustering siblings by parents
    pub use_simple_grouping: bool,

    /// Height of one layer row
    pub row_height: f32,

    /// Gap between adjacent vertices, and at both ends of a layer
    pub node_spacing: f32,

    /// Extra gap between adjacent groups
    pub group_spacing: f32,

    /// Share of a layer's slack placed on its left, 0.5 centers it
    pub padding_ratio: f32,

    /// Adjacent-swap scans per layer during crossing reduction
    pub crossing_scans: usize,

    /// Horizontal room taken by a dummy vertex
    pub dummy_width: f32,

    /// Nodes taller than this are resized down to it, `row_height` caps
    /// the limit and applies when unset
    pub max_node_height: Option<f32>,

    /// Ask the receiver to animate moves and resizes
    pub animate: bool,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self {
            use_simple_grouping: true,
            row_height: 120.0,
            node_spacing: 20.0,
            group_spacing: 20.0,
            padding_ratio: 0.5,
            crossing_scans: 3,
            dummy_width: 0.0,
            max_node_height: None,
            animate: true,
        }
    }
}

impl LayeredLayout {
    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.use_simple_grouping = grouping == Grouping::Simple;
        self
    }

    pub fn grouping(&self) -> Grouping {
        if self.use_simple_grouping {
            Grouping::Simple
        } else {
            Grouping::Associative
        }
    }
}

/// Ordered layer structure, everything but the final coordinates
#[derive(Debug, Clone)]
pub struct Layers {
    /// Vertex arena, including dummies
    pub graph: VertexGraph,

    /// Vertices of each layer, in display order
    pub vertices: Vec<Vec<VertexId>>,

    /// Index at which each group of a layer starts
    pub group_starts: Vec<Vec<usize>>,

    /// Number of edge crossings (quality metric)
    pub crossings: usize,
}

impl Layers {
    /// Concepts of each layer in display order, dummies left out
    pub fn concepts(&self) -> Vec<Vec<ConceptId>> {
        self.vertices
            .iter()
            .map(|row| row.iter().filter_map(|&v| self.graph.vertex(v).concept).collect())
            .collect()
    }

    pub fn dummy_count(&self) -> usize {
        self.graph.ids().filter(|&v| self.graph.vertex(v).is_dummy()).count()
    }
}

impl LayeredLayout {
    /// Layer and order the visible part of `map`
    ///
    /// This covers every phase up to coordinate assignment: wrapping,
    /// topological sort, layering, dummy insertion, grouping and crossing
    /// reduction. It only depends on the graph structure, not on sizes.
    ///
    /// # Errors
    /// Returns an error if the visible graph contains a cycle
    pub fn compute_layers(
        &self,
        map: &ConceptMap,
        ctx: &LayoutContext<ConceptId>,
    ) -> Result<Layers, LayeredLayoutError> {
        let mut graph = VertexGraph::build(map, &ctx.roots);
        debug!(
            "Arranging {} vertices and {} edges from {} roots",
            graph.len(),
            graph.edge_count(),
            ctx.roots.len()
        );

        let order = topological_order(&graph)?;
        let mut vertices = assign_layers(&mut graph, &order);
        insert_dummies(&mut graph, &mut vertices);
        let initial = count_crossings(&graph, &vertices);

        let mut groups = GroupMatrix::build(&graph, &vertices, self.grouping());
        let roots = vertices
            .first()
            .map(|row| order_roots(&graph, row))
            .unwrap_or_default();
        order_groups(&mut groups, &roots, self.crossing_scans);
        let (vertices, group_starts) = order_vertices(&graph, &groups, self.crossing_scans);

        let crossings = count_crossings(&graph, &vertices);
        debug!("Crossings went from {initial} to {crossings}");

        Ok(Layers {
            graph,
            vertices,
            group_starts,
            crossings,
        })
    }

    /// Compute placements from already ordered layers
    ///
    /// # Errors
    /// Returns [`LayeredLayoutError::TooLarge`] if the result would not fit
    /// `canvas`
    pub fn compute_positions<S>(
        &self,
        layers: &Layers,
        sizes: &S,
        canvas: Vec2,
    ) -> Result<Vec<Placement<ConceptId>>, LayeredLayoutError>
    where
        S: NodeSizes<ConceptId>,
    {
        assign_coordinates(
            &layers.graph,
            &layers.vertices,
            &layers.group_starts,
            sizes,
            self,
            canvas,
        )
    }

    /// Auto-arrange: lay out `map` and hand the result to `mover`
    ///
    /// Either every placement is applied or, on error, none is. Returns
    /// the number of placed nodes.
    pub fn arrange<M>(
        &self,
        map: &ConceptMap,
        ctx: &LayoutContext<ConceptId>,
        mover: &mut M,
    ) -> Result<usize, LayeredLayoutError>
    where
        M: NodeMover<ConceptId> + ?Sized,
    {
        let placements = self.layout(map, ctx)?;
        apply_placements(&placements, mover, self.animate);
        Ok(placements.len())
    }

    /// Auto-arrange `map` onto itself
    pub fn arrange_in_place(
        &self,
        map: &mut ConceptMap,
        ctx: &LayoutContext<ConceptId>,
    ) -> Result<usize, LayeredLayoutError> {
        let placements = self.layout(&*map, ctx)?;
        apply_placements(&placements, map, self.animate);
        Ok(placements.len())
    }
}

impl<'a> LayoutEngine<&'a ConceptMap> for LayeredLayout {
    type NodeId = ConceptId;
    type Error = LayeredLayoutError;

    fn layout(
        &self,
        map: &'a ConceptMap,
        ctx: &LayoutContext<ConceptId>,
    ) -> Result<Vec<Placement<ConceptId>>, Self::Error> {
        let layers = self.compute_layers(map, ctx)?;
        self.compute_positions(&layers, map, ctx.canvas)
    }
}
