use crate::Vec2;
use std::collections::HashMap;
use std::hash::Hash;

/// Source of node dimensions for coordinate assignment
///
/// Implemented by [`ConceptMap`](crate::ConceptMap), by any `Fn(N) -> Vec2`
/// and by size tables, so positions can be computed without a live map.
pub trait NodeSizes<N> {
    fn size(&self, node: N) -> Vec2;

    fn width(&self, node: N) -> f32 {
        self.size(node).x
    }
}

impl<N, F> NodeSizes<N> for F
where
    F: Fn(N) -> Vec2,
{
    fn size(&self, node: N) -> Vec2 {
        self(node)
    }
}

/// Unknown nodes are treated as zero sized
impl<N: Eq + Hash + Copy> NodeSizes<N> for HashMap<N, Vec2> {
    fn size(&self, node: N) -> Vec2 {
        self.get(&node).copied().unwrap_or_default()
    }
}
