use super::graph::{VertexGraph, VertexId};
use super::{LayeredLayout, LayeredLayoutError};
use crate::{ConceptId, NodeSizes, Placement, Point, Vec2};
use tracing::{debug, trace};

/// Horizontal budget of one layer
#[derive(Debug, Clone, Copy, PartialEq)]
struct LayerWidth {
    /// Sum of member widths
    content: f32,
    /// Gaps between members, group gaps and the margin on both sides
    spacing: f32,
}

impl LayerWidth {
    fn total(self) -> f32 {
        self.content + self.spacing
    }
}

fn measure<S>(
    graph: &VertexGraph,
    layer: &[VertexId],
    starts: &[usize],
    sizes: &S,
    config: &LayeredLayout,
) -> LayerWidth
where
    S: NodeSizes<ConceptId>,
{
    let content = layer
        .iter()
        .map(|&v| vertex_width(graph, v, sizes, config))
        .sum();
    let group_gaps = starts.iter().filter(|&&start| start > 0).count();
    let spacing = config.node_spacing * (layer.len() + 1) as f32
        + config.group_spacing * group_gaps as f32;

    LayerWidth { content, spacing }
}

fn vertex_width<S>(graph: &VertexGraph, vertex: VertexId, sizes: &S, config: &LayeredLayout) -> f32
where
    S: NodeSizes<ConceptId>,
{
    match graph.vertex(vertex).concept {
        Some(concept) => sizes.width(concept),
        None => config.dummy_width,
    }
}

/// Place every concept vertex on the canvas
///
/// Each layer is centered within the widest one (split by
/// `padding_ratio`), then all its gaps are stretched by the same factor so
/// the layer spans the full canvas width. Rows are `row_height` apart and
/// nodes are vertically centered in their row. Nodes taller than the row,
/// or than `max_node_height` when it is smaller, get a new height.
///
/// # Errors
/// Returns [`LayeredLayoutError::TooLarge`] if the widest layer or the
/// stacked rows exceed the canvas. Nothing is placed in that case.
pub(crate) fn assign_coordinates<S>(
    graph: &VertexGraph,
    layers: &[Vec<VertexId>],
    group_starts: &[Vec<usize>],
    sizes: &S,
    config: &LayeredLayout,
    canvas: Vec2,
) -> Result<Vec<Placement<ConceptId>>, LayeredLayoutError>
where
    S: NodeSizes<ConceptId>,
{
    let widths: Vec<LayerWidth> = layers
        .iter()
        .zip(group_starts)
        .map(|(layer, starts)| measure(graph, layer, starts, sizes, config))
        .collect();

    let max_width = widths.iter().map(|w| w.total()).fold(0.0, f32::max);
    let drawing = Vec2::new(max_width, layers.len() as f32 * config.row_height);
    if !drawing.fits_in(canvas) {
        debug!("Layout of {drawing:?} does not fit {canvas:?}");
        return Err(LayeredLayoutError::TooLarge {
            width: drawing.x,
            height: drawing.y,
            canvas,
        });
    }

    let height_limit = config
        .max_node_height
        .map_or(config.row_height, |max| max.min(config.row_height));
    let mut placements = Vec::with_capacity(graph.len());

    let rows = layers.iter().zip(group_starts).zip(&widths);
    for (index, ((layer, starts), width)) in rows.enumerate() {
        let slack = max_width - width.total();
        let stretchable = width.spacing + slack;
        let stretch = if stretchable > 0.0 {
            (canvas.x - width.content) / stretchable
        } else {
            1.0
        };
        trace!("Layer {index}: width {}, stretch {stretch}", width.total());

        let row_top = index as f32 * config.row_height;
        let mut x = (config.node_spacing + slack * config.padding_ratio) * stretch;

        for (position, &vertex) in layer.iter().enumerate() {
            if position > 0 {
                x += config.node_spacing * stretch;
                if starts.contains(&position) {
                    x += config.group_spacing * stretch;
                }
            }

            let node_width = vertex_width(graph, vertex, sizes, config);
            if let Some(concept) = graph.vertex(vertex).concept {
                let size = sizes.size(concept);
                let height = (size.y > height_limit).then_some(height_limit);
                let y = row_top + (config.row_height - height.unwrap_or(size.y)) / 2.0;

                placements.push(Placement {
                    node: concept,
                    position: Point::new(x, y),
                    width: size.x,
                    height,
                });
            }
            x += node_width;
        }
    }

    debug!(
        "Placed {} nodes, widest layer {max_width} of {}",
        placements.len(),
        canvas.x
    );

    Ok(placements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layered::graph::tests::{ids, map_of};
    use crate::ConceptMap;
    use test_log::test;

    fn config() -> LayeredLayout {
        LayeredLayout {
            node_spacing: 10.0,
            group_spacing: 5.0,
            row_height: 100.0,
            ..Default::default()
        }
    }

    fn x_of(placements: &[Placement<ConceptId>], map: &ConceptMap, name: &str) -> f32 {
        let id = map.find(name).unwrap();
        placements.iter().find(|p| p.node == id).unwrap().position.x
    }

    #[test]
    fn layers_are_centered_and_stretched() {
        let map = map_of(&[("a", "x", "b"), ("a", "x", "c")]);
        let graph = VertexGraph::build(&map, &ids(&map, &["a"]));
        let layers = vec![
            vec![graph.independent()[0]],
            graph.vertex(graph.independent()[0]).outgoing.iter().map(|e| e.target).collect(),
        ];
        let starts = vec![vec![0], vec![0, 1]];
        // a: 60, b + c: 120 + 3 gaps + 1 group gap = 155 wide
        let canvas = Vec2::new(310.0, 400.0);

        let placements =
            assign_coordinates(&graph, &layers, &starts, &map, &config(), canvas).unwrap();

        assert_eq!(placements.len(), 3);
        // Second layer: (310 - 120) / 35 stretch
        let stretch = 190.0 / 35.0;
        assert!((x_of(&placements, &map, "b") - 10.0 * stretch).abs() < 1e-3);
        let c = 10.0 * stretch + 60.0 + 15.0 * stretch;
        assert!((x_of(&placements, &map, "c") - c).abs() < 1e-3);
        // First layer is centered: the single node sits mid-canvas
        assert!((x_of(&placements, &map, "a") - 125.0).abs() < 1e-3);

        let a = placements.iter().find(|p| p.node == map.find("a").unwrap()).unwrap();
        assert_eq!(a.position.y, 40.0);
        assert_eq!(a.height, None);
    }

    #[test]
    fn too_wide_layout_is_rejected() {
        let map = map_of(&[("a", "x", "b"), ("a", "x", "c")]);
        let graph = VertexGraph::build(&map, &ids(&map, &["a"]));
        let layers = vec![graph.ids().collect::<Vec<_>>()];
        let starts = vec![vec![0, 1, 2]];

        let canvas = Vec2::new(150.0, 400.0);
        let result = assign_coordinates(&graph, &layers, &starts, &map, &config(), canvas);

        assert_eq!(
            result,
            Err(LayeredLayoutError::TooLarge {
                width: 230.0,
                height: 100.0,
                canvas: Vec2::new(150.0, 400.0),
            })
        );
    }

    #[test]
    fn too_many_rows_are_rejected() {
        let map = map_of(&[("a", "x", "b"), ("b", "x", "c")]);
        let graph = VertexGraph::build(&map, &ids(&map, &["a"]));
        let layers: Vec<Vec<VertexId>> = graph.ids().map(|v| vec![v]).collect();
        let starts = vec![vec![0]; 3];

        let canvas = Vec2::new(500.0, 250.0);
        let result = assign_coordinates(&graph, &layers, &starts, &map, &config(), canvas);

        assert!(matches!(
            result,
            Err(LayeredLayoutError::TooLarge { height, .. }) if height == 300.0
        ));
    }

    #[test]
    fn tall_nodes_are_shrunk_to_the_limit() {
        let map = map_of(&[("a", "x", "b")]);
        let graph = VertexGraph::build(&map, &ids(&map, &["a"]));
        let layers: Vec<Vec<VertexId>> = graph.ids().map(|v| vec![v]).collect();
        let starts = vec![vec![0]; 2];
        let config = LayeredLayout {
            max_node_height: Some(12.0),
            ..config()
        };

        let canvas = Vec2::new(500.0, 500.0);
        let placements =
            assign_coordinates(&graph, &layers, &starts, &map, &config, canvas).unwrap();

        assert!(placements.iter().all(|p| p.height == Some(12.0)));
        assert_eq!(placements[1].position.y, 100.0 + 44.0);
    }

    #[test]
    fn nodes_taller_than_a_row_are_clamped_to_it() {
        let mut map = map_of(&[("a", "x", "b")]);
        for id in ids(&map, &["a", "b"]) {
            map.concept_mut(id).unwrap().size = Vec2::new(80.0, 200.0);
        }
        let graph = VertexGraph::build(&map, &ids(&map, &["a"]));
        let layers: Vec<Vec<VertexId>> = graph.ids().map(|v| vec![v]).collect();
        let starts = vec![vec![0]; 2];
        let canvas = Vec2::new(500.0, 240.0);

        let placements =
            assign_coordinates(&graph, &layers, &starts, &map, &config(), canvas).unwrap();

        for (row, placement) in placements.iter().enumerate() {
            assert_eq!(placement.height, Some(100.0));
            assert_eq!(placement.position.y, row as f32 * 100.0);
            assert!(placement.position.y + 100.0 <= canvas.y);
        }
    }

    #[test]
    fn row_height_caps_a_larger_height_limit() {
        let mut map = map_of(&[("a", "x", "b")]);
        let a = map.find("a").unwrap();
        map.concept_mut(a).unwrap().size = Vec2::new(60.0, 150.0);
        let graph = VertexGraph::build(&map, &[a]);
        let layers: Vec<Vec<VertexId>> = graph.ids().map(|v| vec![v]).collect();
        let starts = vec![vec![0]; 2];
        let config = LayeredLayout {
            max_node_height: Some(400.0),
            ..config()
        };

        let placements =
            assign_coordinates(&graph, &layers, &starts, &map, &config, Vec2::new(500.0, 500.0))
                .unwrap();

        assert_eq!(placements[0].height, Some(100.0));
        assert_eq!(placements[0].position.y, 0.0);
        // b fits its row and keeps its size
        assert_eq!(placements[1].height, None);
    }
}
