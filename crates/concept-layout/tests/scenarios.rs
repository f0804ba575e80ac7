use concept_layout::{
    Concept, ConceptId, ConceptMap, Grouping, LayeredLayout, LayeredLayoutError, LayoutContext,
    LayoutEngine, Vec2,
};
use test_log::test;

fn map_with(names: &[&str], relations: &[(&str, &str, &str)]) -> ConceptMap {
    let mut map = ConceptMap::new();
    for name in names {
        map.add_concept(Concept::new(*name, Vec2::new(80.0, 30.0)));
    }
    for &(parent, label, child) in relations {
        let parent = map.find(parent).unwrap();
        let child = map.find(child).unwrap();
        map.relate(parent, label, child);
    }
    map
}

fn ids(map: &ConceptMap, names: &[&str]) -> Vec<ConceptId> {
    names.iter().map(|name| map.find(name).unwrap()).collect()
}

fn names(map: &ConceptMap, layers: &[Vec<ConceptId>]) -> Vec<Vec<String>> {
    layers
        .iter()
        .map(|row| row.iter().map(|&id| map.concept(id).unwrap().name.clone()).collect())
        .collect()
}

fn canvas() -> Vec2 {
    Vec2::new(1024.0, 768.0)
}

#[test]
fn two_parents_sharing_a_child() {
    let map = map_with(
        &["A", "B", "C", "D"],
        &[("A", "Child", "C"), ("A", "Child", "D"), ("B", "Child", "D")],
    );
    let ctx = LayoutContext::new(canvas()).with_roots(ids(&map, &["A", "B"]));

    let layers = LayeredLayout::default().compute_layers(&map, &ctx).unwrap();

    assert_eq!(layers.dummy_count(), 0);
    assert_eq!(layers.crossings, 0);
    let mut rows = names(&map, &layers.concepts());
    rows.iter_mut().for_each(|row| row.sort());
    assert_eq!(rows, [["A", "B"], ["C", "D"]]);
}

#[test]
fn skip_level_edge_goes_through_a_dummy() {
    let map = map_with(
        &["A", "B", "C"],
        &[("A", "Child", "B"), ("B", "Child", "C"), ("A", "Child", "C")],
    );
    let ctx = LayoutContext::new(canvas()).with_roots(ids(&map, &["A"]));

    let layers = LayeredLayout::default().compute_layers(&map, &ctx).unwrap();

    assert_eq!(layers.dummy_count(), 1);
    assert_eq!(names(&map, &layers.concepts()), [vec!["A"], vec!["B"], vec!["C"]]);

    let graph = &layers.graph;
    let c = layers.vertices[2][0];
    let parents = &graph.vertex(c).incoming;
    assert_eq!(parents.len(), 2);
    assert!(parents.iter().all(|&p| graph.vertex(p).layer == Some(1)));
    assert_eq!(parents.iter().filter(|&&p| graph.vertex(p).is_dummy()).count(), 1);
}

#[test]
fn placements_follow_layers() {
    let map = map_with(
        &["A", "B", "C"],
        &[("A", "Child", "B"), ("B", "Child", "C"), ("A", "Child", "C")],
    );
    let ctx = LayoutContext::new(canvas()).with_roots(ids(&map, &["A"]));
    let engine = LayeredLayout::default();

    let placements = engine.layout(&map, &ctx).unwrap();

    let y: Vec<f32> = ids(&map, &["A", "B", "C"])
        .into_iter()
        .map(|id| placements.iter().find(|p| p.node == id).unwrap().position.y)
        .collect();
    let inset = (engine.row_height - 30.0) / 2.0;
    assert_eq!(y, [inset, engine.row_height + inset, 2.0 * engine.row_height + inset]);
}

#[test]
fn associative_grouping_keeps_siblings_together() {
    let map = map_with(
        &["r1", "r2", "a", "b", "c", "d"],
        &[
            ("r1", "kind", "a"),
            ("r2", "kind", "c"),
            ("r1", "kind", "b"),
            ("r2", "kind", "d"),
        ],
    );
    let ctx = LayoutContext::new(canvas()).with_roots(ids(&map, &["r1", "r2"]));
    let engine = LayeredLayout::default().with_grouping(Grouping::Associative);

    let layers = engine.compute_layers(&map, &ctx).unwrap();

    assert_eq!(layers.group_starts[1], [0, 2]);
    let second = names(&map, &layers.concepts())[1].clone();
    let first_group: Vec<_> = second[..2].iter().map(String::as_str).collect();
    let siblings = [["a", "b"], ["b", "a"], ["c", "d"], ["d", "c"]];
    assert!(siblings.iter().any(|pair| first_group == pair), "{second:?}");
    assert_eq!(layers.crossings, 0);
}

#[test]
fn collapsing_a_concept_flattens_its_subtree() {
    let mut map = map_with(&["a", "b", "c"], &[("a", "x", "b"), ("b", "x", "c")]);
    let ctx = LayoutContext::new(canvas()).with_roots(ids(&map, &["a"]));
    let engine = LayeredLayout::default();

    assert_eq!(engine.compute_layers(&map, &ctx).unwrap().vertices.len(), 3);

    let b = map.find("b").unwrap();
    map.set_expanded(b, false);
    let c = map.find("c").unwrap();
    map.set_visible(c, false);

    let layers = engine.compute_layers(&map, &ctx).unwrap();
    assert_eq!(names(&map, &layers.concepts()), [["a"], ["b"]]);
}

#[test]
fn cyclic_maps_are_rejected() {
    let map = map_with(&["a", "b"], &[("a", "x", "b"), ("b", "x", "a")]);
    let ctx = LayoutContext::new(canvas()).with_roots(ids(&map, &["a"]));

    let result = LayeredLayout::default().layout(&map, &ctx);

    assert_eq!(result, Err(LayeredLayoutError::NoIndependentVertex { vertices: 2 }));
}

#[test]
fn empty_map_places_nothing() {
    let map = ConceptMap::new();
    let ctx = LayoutContext::new(canvas());

    assert!(LayeredLayout::default().layout(&map, &ctx).unwrap().is_empty());
}
