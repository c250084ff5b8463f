//! Raw state encoding for the network estimator.

use ndarray::Array1;

use crate::{
    Error, Result,
    ports::GridView,
    types::{Cell, Direction, Grid},
};

/// Number of one-hot planes in an encoding.
pub const PLANES: usize = 5;

/// Encodes `(state, action)` as five concatenated one-hot planes of
/// `width × height` cells each:
///
/// 1. food pellets
/// 2. walls
/// 3. threat-entity positions
/// 4. the agent's current cell
/// 5. the agent's cell after moving along the action's direction
///
/// The grid size is fixed at construction; encoding a state of another size
/// fails with [`Error::EstimatorInputShapeMismatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEncoder {
    width: usize,
    height: usize,
}

impl StateEncoder {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Encoder sized to the grid of `view`.
    pub fn for_view<V: GridView + ?Sized>(view: &V) -> Self {
        let (width, height) = view.walls().dims();
        Self::new(width, height)
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn plane_size(&self) -> usize {
        self.width * self.height
    }

    /// Length of every encoded vector.
    pub fn input_width(&self) -> usize {
        PLANES * self.plane_size()
    }

    pub fn encode<V: GridView + ?Sized>(&self, view: &V, action: Direction) -> Result<Array1<f64>> {
        let walls = view.walls();
        for got in [walls.dims(), view.food().dims()] {
            if got != self.dims() {
                return Err(Error::EstimatorInputShapeMismatch {
                    expected: self.dims(),
                    got,
                });
            }
        }

        let mut encoded = Array1::zeros(self.input_width());
        self.write_grid(&mut encoded, 0, view.food());
        self.write_grid(&mut encoded, 1, walls);
        for (x, y) in view.ghost_positions() {
            self.write_cell(&mut encoded, 2, walls, Cell::nearest(x, y));
        }
        let agent = view.agent_position();
        self.write_cell(&mut encoded, 3, walls, agent);
        self.write_cell(&mut encoded, 4, walls, agent.offset(action, 1));
        Ok(encoded)
    }

    fn write_grid(&self, encoded: &mut Array1<f64>, plane: usize, grid: &Grid) {
        for cell in grid.occupied() {
            self.write_cell(encoded, plane, grid, cell);
        }
    }

    /// Cells outside the grid leave the plane untouched.
    fn write_cell(&self, encoded: &mut Array1<f64>, plane: usize, shape: &Grid, cell: Cell) {
        if let Some(index) = shape.index_of(cell) {
            encoded[plane * self.plane_size() + index] = 1.0;
        }
    }
}
