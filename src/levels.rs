//! Level layouts
//!
//! Each level is a grid of brick types: 0-9 places a brick of that type,
//! any negative number leaves the cell empty. Custom sets load from JSON as
//! a list of row lists, e.g. `[[[0, -1, 0], [1, 1, 1]]]`.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// One level's brick pattern (rows of brick types)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelPattern {
    pub rows: Vec<Vec<i32>>,
}

impl LevelPattern {
    pub fn new(rows: Vec<Vec<i32>>) -> Self {
        Self { rows }
    }

    /// Number of bricks the pattern places
    pub fn brick_count(&self) -> usize {
        self.rows.iter().flatten().filter(|&&cell| cell >= 0).count()
    }
}

/// An ordered list of levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelSet {
    pub levels: Vec<LevelPattern>,
}

impl Default for LevelSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelSet {
    pub fn new(levels: Vec<LevelPattern>) -> Self {
        Self { levels }
    }

    /// The five stock levels
    pub fn builtin() -> Self {
        let levels = vec![
            // Rows
            vec![
                vec![0, 0, 0, 0, 0, 0, 0, 0, 0],
                vec![1, 1, 1, 1, 1, 1, 1, 1, 1],
                vec![2, 2, 2, 2, 2, 2, 2, 2, 2],
                vec![3, 3, 3, 3, 3, 3, 3, 3, 3],
                vec![4, 4, 4, 4, 4, 4, 4, 4, 4],
            ],
            // Checkerboard
            vec![
                vec![0, -1, 1, -1, 2, -1, 1, -1, 0],
                vec![-1, 3, -1, 4, -1, 4, -1, 3, -1],
                vec![2, -1, 5, -1, 6, -1, 5, -1, 2],
                vec![-1, 3, -1, 4, -1, 4, -1, 3, -1],
                vec![0, -1, 1, -1, 2, -1, 1, -1, 0],
            ],
            // Diamond
            vec![
                vec![-1, -1, -1, -1, 7, -1, -1, -1, -1],
                vec![-1, -1, -1, 5, 6, 5, -1, -1, -1],
                vec![-1, -1, 3, 4, 5, 4, 3, -1, -1],
                vec![-1, 1, 2, 3, 4, 3, 2, 1, -1],
                vec![0, 1, 2, 3, 4, 3, 2, 1, 0],
                vec![-1, 1, 2, 3, 4, 3, 2, 1, -1],
                vec![-1, -1, 3, 4, 5, 4, 3, -1, -1],
            ],
            // Fortress
            vec![
                vec![8, 8, 8, -1, 9, -1, 8, 8, 8],
                vec![7, -1, 7, -1, 9, -1, 7, -1, 7],
                vec![6, -1, 6, 6, 6, 6, 6, -1, 6],
                vec![5, -1, -1, -1, -1, -1, -1, -1, 5],
                vec![4, 4, 4, 4, 4, 4, 4, 4, 4],
                vec![3, 3, 3, 3, 3, 3, 3, 3, 3],
            ],
            // Final challenge
            vec![
                vec![9, 9, 9, 9, 9, 9, 9, 9, 9],
                vec![8, 8, 8, 8, 8, 8, 8, 8, 8],
                vec![7, 7, -1, 7, 7, 7, -1, 7, 7],
                vec![6, 6, -1, 6, 6, 6, -1, 6, 6],
                vec![5, 5, 5, 5, 5, 5, 5, 5, 5],
                vec![4, -1, 4, -1, 4, -1, 4, -1, 4],
                vec![3, 3, 3, 3, 3, 3, 3, 3, 3],
                vec![2, 2, 2, 2, 2, 2, 2, 2, 2],
            ],
        ];
        Self::new(levels.into_iter().map(LevelPattern::new).collect())
    }

    /// Parse a level set from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a level set from a JSON file, falling back to the stock levels
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let set = match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(set) => set,
                Err(e) => {
                    log::warn!("Invalid level file {}: {}", path.display(), e);
                    return Self::builtin();
                }
            },
            Err(e) => {
                log::warn!("Could not read level file {}: {}", path.display(), e);
                return Self::builtin();
            }
        };

        if set.levels.iter().all(|l| l.brick_count() == 0) {
            log::warn!("Level file {} has no bricks, using stock levels", path.display());
            return Self::builtin();
        }

        log::info!("Loaded {} levels from {}", set.len(), path.display());
        set
    }

    pub fn get(&self, index: usize) -> Option<&LevelPattern> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
