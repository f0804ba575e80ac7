use crate::{Point, Vec2};
use std::hash::Hash;

/// Immutable per-run inputs that are not part of the graph itself
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutContext<N> {
    /// Area the arranged nodes must fit in
    pub canvas: Vec2,

    /// Current context roots, in display order
    pub roots: Vec<N>,
}

impl<N> LayoutContext<N> {
    pub fn new(canvas: Vec2) -> Self {
        Self {
            canvas,
            roots: Vec::new(),
        }
    }

    pub fn with_roots(mut self, roots: impl IntoIterator<Item = N>) -> Self {
        self.roots = roots.into_iter().collect();
        self
    }
}

/// Where a node goes, and its new height if it had to shrink to fit its row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement<N> {
    pub node: N,
    pub position: Point,
    pub width: f32,
    pub height: Option<f32>,
}

/// Receiver of the final layout, usually the document model
pub trait NodeMover<N> {
    fn move_to(&mut self, node: N, x: f32, y: f32, animate: bool);
    fn resize_to(&mut self, node: N, width: f32, height: f32, animate: bool);
}

/// A layout engine that can compute positions for graph nodes
///
/// This trait is generic over the graph type `G`, so the same engine can
/// arrange the document model directly or any other graph representation
/// it knows how to read.
pub trait LayoutEngine<G> {
    /// The type used to identify nodes in the graph
    type NodeId: Copy + Ord + Hash;

    type Error: std::error::Error;

    /// Compute placements for the given graph without touching it
    ///
    /// # Errors
    /// Returns an error if the graph cannot be layered (it has no root or
    /// contains a cycle) or if the result does not fit `ctx.canvas`
    fn layout(
        &self,
        graph: G,
        ctx: &LayoutContext<Self::NodeId>,
    ) -> Result<Vec<Placement<Self::NodeId>>, Self::Error>;
}

/// Issue the move (and resize) requests for a finished layout
pub fn apply_placements<N, M>(placements: &[Placement<N>], mover: &mut M, animate: bool)
where
    N: Copy,
    M: NodeMover<N> + ?Sized,
{
    for placement in placements {
        mover.move_to(
            placement.node,
            placement.position.x,
            placement.position.y,
            animate,
        );
        if let Some(height) = placement.height {
            mover.resize_to(placement.node, placement.width, height, animate);
        }
    }
}
