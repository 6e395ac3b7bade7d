//! Bricks and the grid they are laid out on

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;
use crate::levels::LevelPattern;

/// Score for a brick type, falling back for types outside the table
pub fn brick_score(kind: u8) -> u32 {
    SCORE_VALUES
        .get(kind as usize)
        .copied()
        .unwrap_or(DEFAULT_BRICK_SCORE)
}

/// A destructible brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    /// Top-left position
    pub pos: Vec2,
    pub size: Vec2,
    /// Type 0-9, selects sprite and score
    pub kind: u8,
    pub health: i32,
}

impl Brick {
    pub fn new(pos: Vec2, kind: u8) -> Self {
        Self {
            pos,
            size: Vec2::new(BRICK_WIDTH, BRICK_HEIGHT),
            kind,
            health: BRICK_HEALTH,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Take one hit. Returns true when the brick is destroyed.
    pub fn hit(&mut self) -> bool {
        self.health -= 1;
        self.health <= 0
    }

    /// Damaged but still standing
    pub fn is_cracked(&self) -> bool {
        self.health > 0 && self.health < BRICK_HEALTH
    }

    pub fn score(&self) -> u32 {
        brick_score(self.kind)
    }
}

/// Cell geometry used to place bricks from a pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub cell_width: f32,
    pub cell_height: f32,
    pub padding: f32,
    pub left: f32,
    pub top: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            cell_width: BRICK_WIDTH,
            cell_height: BRICK_HEIGHT,
            padding: BRICK_PADDING,
            left: BRICK_LEFT_OFFSET,
            top: BRICK_TOP_OFFSET,
        }
    }
}

impl GridLayout {
    /// Top-left corner of a cell
    pub fn cell_origin(&self, row: usize, col: usize) -> Vec2 {
        Vec2::new(
            self.left + col as f32 * (self.cell_width + self.padding),
            self.top + row as f32 * (self.cell_height + self.padding),
        )
    }
}

/// All bricks of the current level, in row-major pattern order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrickGrid {
    bricks: Vec<Brick>,
}

impl BrickGrid {
    /// Build the grid from a pattern; negative cells are empty
    pub fn from_pattern(pattern: &LevelPattern, layout: &GridLayout) -> Self {
        let mut bricks = Vec::new();
        for (row, cells) in pattern.rows.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                if cell < 0 {
                    continue;
                }
                let kind = u8::try_from(cell).unwrap_or(u8::MAX);
                if kind as usize >= SCORE_VALUES.len() {
                    log::warn!(
                        "Brick type {} at row {} col {} is out of range, scoring {}",
                        cell,
                        row,
                        col,
                        DEFAULT_BRICK_SCORE
                    );
                }
                bricks.push(Brick {
                    size: Vec2::new(layout.cell_width, layout.cell_height),
                    ..Brick::new(layout.cell_origin(row, col), kind)
                });
            }
        }
        Self { bricks }
    }

    pub fn from_bricks(bricks: Vec<Brick>) -> Self {
        Self { bricks }
    }

    /// Index of the first brick (in grid order) overlapping `rect`
    pub fn first_overlapping(&self, rect: &Rect) -> Option<usize> {
        self.bricks.iter().position(|b| b.rect().intersects(rect))
    }

    pub fn get(&self, idx: usize) -> Option<&Brick> {
        self.bricks.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Brick> {
        self.bricks.get_mut(idx)
    }

    /// Remove a destroyed brick, keeping the order of the rest
    pub fn remove(&mut self, idx: usize) -> Brick {
        self.bricks.remove(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }
}
