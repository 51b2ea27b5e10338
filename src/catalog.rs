//! Level catalog
//!
//! Read-only, ordered level definitions. The built-in catalog ships with the
//! game; alternative catalogs can be loaded from JSON and are validated
//! before use.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_HEARTS, DEFAULT_HINTS};

/// A hidden, tappable circle in normalized image space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Unique within its level
    pub id: String,
    /// Normalized center x in [0, 1]
    pub x: f32,
    /// Normalized center y in [0, 1]
    pub y: f32,
    /// Normalized hit radius in (0, 1]
    pub r: f32,
}

impl Target {
    pub fn new(id: impl Into<String>, x: f32, y: f32, r: f32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            r,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn in_bounds(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y) && self.r > 0.0 && self.r <= 1.0
    }
}

/// One catalog entry: a picture, its targets and the starting resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDefinition {
    pub id: u32,
    pub title: String,
    /// Asset path of the level picture
    #[serde(default)]
    pub background: String,
    pub target_count: u32,
    pub initial_hearts: u32,
    pub initial_hints: u32,
    pub targets: Vec<Target>,
}

impl LevelDefinition {
    /// Target ids in catalog order
    pub fn target_ids(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.id.clone()).collect()
    }

    pub fn target(&self, id: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.target_count as usize != self.targets.len() {
            return Err(CatalogError::TargetCountMismatch {
                level: self.id,
                declared: self.target_count,
                actual: self.targets.len(),
            });
        }

        for (i, target) in self.targets.iter().enumerate() {
            if self.targets[..i].iter().any(|t| t.id == target.id) {
                return Err(CatalogError::DuplicateTarget {
                    level: self.id,
                    target: target.id.clone(),
                });
            }
            if !target.in_bounds() {
                return Err(CatalogError::TargetOutOfBounds {
                    level: self.id,
                    target: target.id.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Catalog loading and validation failures
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Catalog has no levels")]
    Empty,
    #[error("Level {id} is out of order (follows level {previous})")]
    UnorderedIds { previous: u32, id: u32 },
    #[error("Level {level} declares {declared} targets but lists {actual}")]
    TargetCountMismatch {
        level: u32,
        declared: u32,
        actual: usize,
    },
    #[error("Level {level} lists target '{target}' more than once")]
    DuplicateTarget { level: u32, target: String },
    #[error("Level {level} target '{target}' lies outside normalized space")]
    TargetOutOfBounds { level: u32, target: String },
}

/// Ordered, immutable list of levels
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    /// Validate and wrap a list of levels
    pub fn from_levels(levels: Vec<LevelDefinition>) -> Result<Self, CatalogError> {
        if levels.is_empty() {
            return Err(CatalogError::Empty);
        }
        for pair in levels.windows(2) {
            if pair[1].id <= pair[0].id {
                return Err(CatalogError::UnorderedIds {
                    previous: pair[0].id,
                    id: pair[1].id,
                });
            }
        }
        for level in &levels {
            level.validate()?;
        }
        Ok(Self { levels })
    }

    /// Parse a JSON array of level definitions (camelCase fields)
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let levels: Vec<LevelDefinition> = serde_json::from_str(json)?;
        let catalog = Self::from_levels(levels)?;
        log::info!("Loaded catalog with {} levels", catalog.len());
        Ok(catalog)
    }

    /// The levels that ship with the game
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                builtin_level(1, "Find the Cat", 0.04, &[(0.22, 0.72), (0.78, 0.36)]),
                builtin_level(
                    2,
                    "Find the Ducks",
                    0.038,
                    &[(0.18, 0.28), (0.52, 0.62), (0.84, 0.78)],
                ),
                builtin_level(
                    3,
                    "Find the Stars",
                    0.036,
                    &[(0.15, 0.6), (0.36, 0.2), (0.64, 0.42), (0.86, 0.65)],
                ),
                builtin_level(
                    4,
                    "Find the Balloons",
                    0.034,
                    &[(0.12, 0.82), (0.32, 0.42), (0.52, 0.2), (0.7, 0.55), (0.88, 0.32)],
                ),
                builtin_level(
                    5,
                    "Find the Mushrooms",
                    0.032,
                    &[
                        (0.14, 0.66),
                        (0.28, 0.34),
                        (0.42, 0.78),
                        (0.58, 0.48),
                        (0.72, 0.22),
                        (0.88, 0.6),
                    ],
                ),
            ],
        }
    }

    pub fn get(&self, id: u32) -> Option<&LevelDefinition> {
        self.levels.iter().find(|l| l.id == id)
    }

    /// First level; a catalog is never empty
    pub fn first(&self) -> &LevelDefinition {
        &self.levels[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_level(id: u32, title: &str, radius: f32, centers: &[(f32, f32)]) -> LevelDefinition {
    let targets: Vec<Target> = centers
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| Target::new(format!("l{}-{}", id, i + 1), x, y, radius))
        .collect();

    LevelDefinition {
        id,
        title: title.to_string(),
        background: format!("res/levels/level{:02}.png", id),
        target_count: targets.len() as u32,
        initial_hearts: DEFAULT_HEARTS,
        initial_hints: DEFAULT_HINTS,
        targets,
    }
}
