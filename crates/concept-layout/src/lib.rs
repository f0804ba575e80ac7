//! Hierarchical auto-arrange for concept maps
//!
//! This crate computes a layered placement for the visible part of a
//! concept map: parents above children, long relations routed through
//! dummy vertices, and edge crossings reduced by local swaps.
//!
//! # Layout Engines
//!
//! - [`LayeredLayout`]: Sugiyama-style layered layout for DAGs
//!
//! # Example
//!
//! ```
//! use concept_layout::{Concept, ConceptMap, LayeredLayout, LayoutContext, LayoutEngine, Vec2};
//!
//! // Create a map
//! let mut map = ConceptMap::new();
//! let animal = map.add_concept(Concept::new("animal", Vec2::new(100.0, 40.0)));
//! let dog = map.add_concept(Concept::new("dog", Vec2::new(80.0, 40.0)));
//! map.relate(animal, "kind", dog);
//!
//! let engine = LayeredLayout::default();
//! let ctx = LayoutContext::new(Vec2::new(800.0, 600.0)).with_roots([animal]);
//!
//! // Use the LayoutEngine trait (simple, single-phase):
//! let placements = engine.layout(&map, &ctx).unwrap();
//! assert_eq!(placements.len(), 2);
//!
//! // Or directly by calling each step for better control
//! let layers = engine.compute_layers(&map, &ctx).unwrap();
//! let placements = engine.compute_positions(&layers, &map, ctx.canvas).unwrap();
//!
//! // Or arrange the map itself
//! engine.arrange_in_place(&mut map, &ctx).unwrap();
//! ```

mod engine;
mod geometry;
mod model;
mod sizes;

pub mod layered;

pub use engine::{apply_placements, LayoutContext, LayoutEngine, NodeMover, Placement};
pub use geometry::{Point, Vec2};
pub use model::{ChildRelationship, Concept, ConceptId, ConceptMap, Relation};
pub use sizes::NodeSizes;

pub use layered::{Grouping, LayeredLayout, LayeredLayoutError, Layers};
