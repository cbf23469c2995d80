//! Column heightfield terrain
//!
//! The world is a row of fixed-width columns. Each column has a single ground
//! height (the top of its solid tiles); an empty column is an open pit with
//! ground at `0.0`. Steps between neighbouring columns are vertical walls.
//!
//! Column index is always `floor(x / column_width)`, clamped to the terrain:
//! queries left of `0.0` read the first column and queries at or past
//! [`Heightfield::width`] read the last one.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The terrain surface the flight engine collides against
pub trait TerrainQuery {
    /// Height of the ground surface in the column containing `x`
    fn ground_level(&self, x: f32) -> f32;

    /// X coordinate of the cliff face an actor would strike when moving right
    /// into the column containing `x`: the right edge of the nearest column to
    /// the left whose ground is strictly lower. Returns `0.0` when there is none.
    fn vertical_wall_left_of(&self, x: f32) -> f32;
}

/// Errors building a heightfield
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    #[error("terrain needs at least one column")]
    Empty,
    #[error("invalid column width: {0}")]
    InvalidColumnWidth(f32),
    #[error("invalid tile height: {0}")]
    InvalidTileHeight(f32),
    #[error("invalid ground height {height} in column {column}")]
    InvalidHeight { column: usize, height: f32 },
    #[error("terrain has no plateau with ground to stand on")]
    NoPlateau,
}

/// A static column heightfield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHeightfield")]
pub struct Heightfield {
    column_width: f32,
    heights: Vec<f32>,
}

/// Unchecked wire form, validated through [`Heightfield::new`]
#[derive(Deserialize)]
struct RawHeightfield {
    column_width: f32,
    heights: Vec<f32>,
}

impl TryFrom<RawHeightfield> for Heightfield {
    type Error = TerrainError;

    fn try_from(raw: RawHeightfield) -> Result<Self, Self::Error> {
        Heightfield::new(raw.column_width, raw.heights)
    }
}

impl Heightfield {
    pub fn new(column_width: f32, heights: Vec<f32>) -> Result<Self, TerrainError> {
        if !column_width.is_finite() || column_width <= 0.0 {
            return Err(TerrainError::InvalidColumnWidth(column_width));
        }
        if heights.is_empty() {
            return Err(TerrainError::Empty);
        }
        if let Some((column, &height)) = heights
            .iter()
            .enumerate()
            .find(|(_, h)| !h.is_finite() || **h < 0.0)
        {
            return Err(TerrainError::InvalidHeight { column, height });
        }

        Ok(Self {
            column_width,
            heights,
        })
    }

    /// Build from tile stacks: `stacks[i]` solid tiles piled up from the
    /// bottom of column `i`
    pub fn from_tile_stacks(
        tile_width: f32,
        tile_height: f32,
        stacks: &[u32],
    ) -> Result<Self, TerrainError> {
        if !tile_height.is_finite() || tile_height <= 0.0 {
            return Err(TerrainError::InvalidTileHeight(tile_height));
        }
        let heights = stacks.iter().map(|&n| n as f32 * tile_height).collect();
        Self::new(tile_width, heights)
    }

    #[inline]
    pub fn column_width(&self) -> f32 {
        self.column_width
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.heights.len()
    }

    /// Right edge of the terrain
    #[inline]
    pub fn width(&self) -> f32 {
        self.column_width * self.heights.len() as f32
    }

    /// Column containing `x` (floor division, clamped to the terrain)
    pub fn column_at(&self, x: f32) -> usize {
        let col = (x / self.column_width).floor();
        if col.is_nan() || col <= 0.0 {
            return 0;
        }
        (col as usize).min(self.heights.len() - 1)
    }

    pub fn ground_level(&self, x: f32) -> f32 {
        self.heights[self.column_at(x)]
    }

    pub fn vertical_wall_left_of(&self, x: f32) -> f32 {
        let col = self.column_at(x);
        let ground = self.heights[col];
        (0..col)
            .rev()
            .find(|&c| self.heights[c] < ground)
            .map(|c| (c + 1) as f32 * self.column_width)
            .unwrap_or(0.0)
    }

    /// Mirror of [`Self::vertical_wall_left_of`]: the left edge of the nearest
    /// column to the right whose ground is strictly higher, or the right edge
    /// of the terrain
    pub fn vertical_wall_right_of(&self, x: f32) -> f32 {
        self.wall_right_of_column(self.column_at(x)) as f32 * self.column_width
    }

    /// Index of the first column right of `col` with strictly higher ground,
    /// or the column count
    fn wall_right_of_column(&self, col: usize) -> usize {
        let ground = self.heights[col];
        (col + 1..self.heights.len())
            .find(|&c| self.heights[c] > ground)
            .unwrap_or(self.heights.len())
    }

    /// Split the terrain at its rising walls, left to right
    ///
    /// Pits (ground at `0.0`) are skipped; the remaining stretches are
    /// numbered consecutively from 1. The walk runs over column indices, so
    /// fractional column widths split exactly like whole ones.
    pub fn plateaus(&self) -> Vec<Plateau> {
        let mut plateaus: Vec<Plateau> = Vec::new();
        let mut first = 0;
        while first < self.heights.len() {
            let end = self.wall_right_of_column(first);
            let height = self.heights[(first + end) / 2];
            if height > 0.0 {
                let number = plateaus.len() as u32 + 1;
                let left = first as f32 * self.column_width;
                let right = end as f32 * self.column_width;
                log::debug!(
                    "Plateau {}: {:.1}--{:.1}, ground {:.1}",
                    number,
                    left,
                    right,
                    height
                );
                plateaus.push(Plateau {
                    number,
                    left,
                    right,
                    height,
                });
            }
            first = end;
        }
        plateaus
    }
}

impl TerrainQuery for Heightfield {
    #[inline]
    fn ground_level(&self, x: f32) -> f32 {
        Heightfield::ground_level(self, x)
    }

    #[inline]
    fn vertical_wall_left_of(&self, x: f32) -> f32 {
        Heightfield::vertical_wall_left_of(self, x)
    }
}

/// A stretch of terrain between two rising walls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plateau {
    /// 1-based, left to right
    pub number: u32,
    pub left: f32,
    pub right: f32,
    /// Ground height at the middle of the stretch
    pub height: f32,
}

impl Plateau {
    /// Uniform spawn x on the plateau, keeping `right_margin` clear at the
    /// right edge when the plateau is wide enough
    pub fn random_x<R: Rng + ?Sized>(&self, rng: &mut R, right_margin: f32) -> f32 {
        let x1 = self.left.min(self.right);
        let x2 = x1.max(self.right - right_margin);
        if x2 > x1 {
            rng.random_range(x1..=x2)
        } else {
            x1
        }
    }

    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.left && x < self.right
    }
}
