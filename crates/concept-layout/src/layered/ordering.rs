use super::graph::{VertexGraph, VertexId};
use super::LayeredLayoutError;
use tracing::{trace, warn};

/// Order vertices with Kahn's algorithm
///
/// The worklist is a stack seeded with the independent vertices, so the
/// first independent vertex is popped first and its subtree tends to be
/// emitted before the next root. Edges are never detached, a separate
/// counter per vertex tracks the incoming edges not yet consumed.
pub(crate) fn topological_order(graph: &VertexGraph) -> Result<Vec<VertexId>, LayeredLayoutError> {
    if graph.is_empty() {
        return Ok(Vec::new());
    }
    if graph.independent().is_empty() {
        warn!("None of the {} vertices is independent", graph.len());
        return Err(LayeredLayoutError::NoIndependentVertex {
            vertices: graph.len(),
        });
    }

    let mut pending: Vec<usize> = graph.ids().map(|v| graph.vertex(v).incoming.len()).collect();
    let mut stack: Vec<VertexId> = graph.independent().iter().rev().copied().collect();
    let mut order = Vec::with_capacity(graph.len());

    while let Some(vertex) = stack.pop() {
        order.push(vertex);
        for edge in &graph.vertex(vertex).outgoing {
            let remaining = &mut pending[edge.target.index()];
            *remaining -= 1;
            if *remaining == 0 {
                stack.push(edge.target);
            }
        }
    }

    if order.len() != graph.len() {
        warn!("Only {} of {} vertices could be sorted", order.len(), graph.len());
        return Err(LayeredLayoutError::Cycle {
            sorted: order.len(),
            vertices: graph.len(),
        });
    }

    trace!("Topological order: {order:?}");
    Ok(order)
}
