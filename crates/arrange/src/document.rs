use anyhow::{bail, Context, Result};
use concept_layout::{Concept, ConceptId, ConceptMap, LayoutContext, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptEntry {
    pub name: String,
    pub width: f32,
    pub height: f32,
    #[serde(default = "yes")]
    pub expanded: bool,
    #[serde(default = "yes")]
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationEntry {
    pub parent: String,
    pub label: String,
    pub children: Vec<String>,
}

/// A concept map as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub canvas: (f32, f32),
    pub concepts: Vec<ConceptEntry>,
    #[serde(default)]
    pub relations: Vec<RelationEntry>,
    #[serde(default)]
    pub roots: Vec<String>,
}

/// One arranged concept, as printed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedConcept {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub height: f32,
}

impl Document {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        ron::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Build the concept map and the layout context it is arranged in
    pub fn to_map(&self) -> Result<(ConceptMap, LayoutContext<ConceptId>)> {
        let mut map = ConceptMap::new();
        for entry in &self.concepts {
            if map.find(&entry.name).is_some() {
                bail!("Concept {:?} is declared twice", entry.name);
            }
            let size = Vec2::new(entry.width, entry.height);
            let mut concept = Concept::new(entry.name.clone(), size);
            concept.expanded = entry.expanded;
            concept.visible = entry.visible;
            map.add_concept(concept);
        }

        let lookup = |map: &ConceptMap, name: &str| {
            map.find(name)
                .with_context(|| format!("Unknown concept {name:?}"))
        };

        for relation in &self.relations {
            let parent = lookup(&map, relation.parent.as_str())?;
            for child in &relation.children {
                let child = lookup(&map, child.as_str())?;
                map.relate(parent, relation.label.clone(), child);
            }
        }

        let roots = self
            .roots
            .iter()
            .map(|name| lookup(&map, name.as_str()))
            .collect::<Result<Vec<_>>>()?;
        let ctx = LayoutContext::new(Vec2::new(self.canvas.0, self.canvas.1)).with_roots(roots);

        Ok((map, ctx))
    }
}

/// Positions of every concept of `map`, in map order
pub fn placed_concepts(map: &ConceptMap) -> Vec<PlacedConcept> {
    map.concepts()
        .filter(|(_, concept)| concept.visible)
        .map(|(_, concept)| PlacedConcept {
            name: concept.name.clone(),
            x: concept.position.x,
            y: concept.position.y,
            height: concept.size.y,
        })
        .collect()
}
