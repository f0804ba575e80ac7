use super::graph::{VertexGraph, VertexId};
use tracing::debug;

/// Assign each vertex to the layer after its deepest parent
///
/// `order` must be topological. Rows keep the order in which their
/// vertices appear in it.
pub(crate) fn assign_layers(graph: &mut VertexGraph, order: &[VertexId]) -> Vec<Vec<VertexId>> {
    let mut layers: Vec<Vec<VertexId>> = Vec::new();

    for &vertex in order {
        let layer = graph
            .vertex(vertex)
            .incoming
            .iter()
            .map(|&parent| graph.layer_of(parent) + 1)
            .max()
            .unwrap_or(0);
        graph.set_layer(vertex, layer);

        if layers.len() <= layer {
            layers.resize_with(layer + 1, Vec::new);
        }
        layers[layer].push(vertex);
    }

    debug!(
        "Assigned {} vertices to {} layers",
        order.len(),
        layers.len()
    );

    layers
}

/// Split every edge spanning more than one layer into a chain of dummies
///
/// Edges from different sources heading to the same vertex share their
/// dummy in each layer they cross. Returns the number of dummies created.
pub(crate) fn insert_dummies(graph: &mut VertexGraph, layers: &mut [Vec<VertexId>]) -> usize {
    let mut created = 0;

    for layer in 0..layers.len() {
        let next = layer + 1;
        // Dummies created for this layer land in `next`, which is only
        // walked once this row is done
        for position in 0..layers[layer].len() {
            let source = layers[layer][position];

            for edge in 0..graph.vertex(source).outgoing.len() {
                let target = graph.vertex(source).outgoing[edge].target;
                if graph.layer_of(target) <= next {
                    continue;
                }

                let shared = layers[next].iter().copied().find(|&candidate| {
                    let candidate = graph.vertex(candidate);
                    candidate.is_dummy()
                        && candidate.outgoing.first().map(|e| e.target) == Some(target)
                });

                let dummy = match shared {
                    Some(dummy) => dummy,
                    None => {
                        let label = graph.vertex(source).outgoing[edge].label.clone();
                        let dummy = graph.add_dummy(next);
                        graph.add_edge(dummy, target, &label);
                        layers[next].push(dummy);
                        created += 1;
                        dummy
                    }
                };

                graph.redirect_edge(source, edge, dummy);
            }
        }
    }

    debug!("Inserted {created} dummy vertices");

    created
}
