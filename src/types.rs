//! Core domain types: directions, grid cells, occupancy grids and the
//! per-action maps that flow between estimators, advisors and fusion.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One of the closed set of directional actions.
///
/// The declaration order (North, South, East, West, Stop) is the enumeration
/// order used everywhere a tie is broken by "later-enumerated wins".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Stop,
}

impl Direction {
    /// All directions in enumeration order.
    pub const ALL: [Direction; 5] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Stop,
    ];

    /// Unit displacement `(dx, dy)` for this direction; y grows northwards.
    pub fn vector(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::Stop => (0, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
            Direction::Stop => "Stop",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown direction '{s}'"))
    }
}

/// An integer grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Nearest cell to a possibly fractional position (entities can sit
    /// halfway between cells while moving).
    pub fn nearest(x: f64, y: f64) -> Self {
        Self {
            x: (x + 0.5).floor() as i32,
            y: (y + 0.5).floor() as i32,
        }
    }

    /// Cell reached by moving `steps` times along `direction`.
    ///
    /// Saturates at the `i32` range, so huge step counts land far off any
    /// grid instead of wrapping around onto it.
    pub fn offset(self, direction: Direction, steps: i32) -> Self {
        let (dx, dy) = direction.vector();
        Self {
            x: self.x.saturating_add(steps.saturating_mul(dx)),
            y: self.y.saturating_add(steps.saturating_mul(dy)),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Boolean occupancy grid (walls, food) indexed by `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create an empty grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Parse a grid from text rows, top row first; `marker` marks an
    /// occupied cell. Rows shorter than the widest row are padded empty.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], marker: char) -> Self {
        let height = rows.len();
        let width = rows
            .iter()
            .map(|row| row.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let mut grid = Self::new(width, height);
        for (row_index, row) in rows.iter().enumerate() {
            let y = (height - 1 - row_index) as i32;
            for (x, ch) in row.as_ref().chars().enumerate() {
                if ch == marker {
                    grid.set(Cell::new(x as i32, y), true);
                }
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height
    }

    /// Flat column-major index of an in-bounds cell.
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.x as usize * self.height + cell.y as usize)
    }

    /// Occupancy of `cell`; out-of-bounds cells read as unoccupied.
    pub fn get(&self, cell: Cell) -> bool {
        self.index_of(cell).is_some_and(|index| self.cells[index])
    }

    /// Set occupancy of an in-bounds cell; out-of-bounds writes are ignored.
    pub fn set(&mut self, cell: Cell, value: bool) {
        if let Some(index) = self.index_of(cell) {
            self.cells[index] = value;
        }
    }

    /// Iterate over occupied cells in index order.
    pub fn occupied(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(|(index, _)| {
                Cell::new((index / self.height) as i32, (index % self.height) as i32)
            })
    }

    /// Cells an entity at `position` can occupy after one move, treating this
    /// grid as walls: the rounded position itself plus each in-bounds,
    /// non-wall neighbour.
    pub fn legal_neighbors(&self, position: (f64, f64)) -> Vec<Cell> {
        let origin = Cell::nearest(position.0, position.1);
        Direction::ALL
            .into_iter()
            .map(|direction| origin.offset(direction, 1))
            .filter(|cell| self.contains(*cell) && !self.get(*cell))
            .collect()
    }
}

/// Mapping from action to a non-negative weight.
///
/// Not necessarily normalized: Boltzmann policies sum to one, advisor
/// multiplier distributions do not. Iteration follows [`Direction`] order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionDistribution(BTreeMap<Direction, f64>);

impl ActionDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every direction mapped to `value`.
    pub fn uniform(value: f64) -> Self {
        Direction::ALL.into_iter().map(|d| (d, value)).collect()
    }

    /// Weight of `direction`, zero when absent.
    pub fn get(&self, direction: Direction) -> f64 {
        self.0.get(&direction).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, direction: Direction, value: f64) {
        self.0.insert(direction, value);
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.0.contains_key(&direction)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, f64)> + '_ {
        self.0.iter().map(|(direction, value)| (*direction, *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Largest weight, `-inf` for an empty distribution.
    pub fn max_value(&self) -> f64 {
        self.0.values().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Elementwise product over the keys of `self`; keys missing from
    /// `other` multiply by zero.
    pub fn product(&self, other: &ActionDistribution) -> ActionDistribution {
        self.iter()
            .map(|(direction, value)| (direction, value * other.get(direction)))
            .collect()
    }

    /// Every weight multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> ActionDistribution {
        self.iter()
            .map(|(direction, value)| (direction, value * factor))
            .collect()
    }

    /// Elementwise sum; absent keys count as zero.
    pub fn accumulate(&mut self, other: &ActionDistribution) {
        for (direction, value) in other.iter() {
            *self.0.entry(direction).or_insert(0.0) += value;
        }
    }

    /// Highest-weighted direction among `allowed`, scanned in the order of
    /// `allowed` with ties going to the later entry (the same rule as
    /// greedy selection over legal actions). Missing keys weigh `0.0`.
    /// `None` when `allowed` is empty.
    pub fn argmax_within(&self, allowed: &[Direction]) -> Option<Direction> {
        let mut best = None;
        let mut best_value = f64::NEG_INFINITY;
        for &direction in allowed {
            let value = self.get(direction);
            if value >= best_value {
                best_value = value;
                best = Some(direction);
            }
        }
        best
    }
}

impl FromIterator<(Direction, f64)> for ActionDistribution {
    fn from_iter<I: IntoIterator<Item = (Direction, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Named numeric features for one `(state, action)` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(BTreeMap<String, f64>);

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    /// Value of `name`, zero when absent.
    pub fn get(&self, name: &str) -> f64 {
        self.0.get(name).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }
}
