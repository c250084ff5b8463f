//! Common test utilities: a small maze world and a feature extractor for it.
//!
//! Layout characters: `%` wall, `.` food, `P` agent, `G` ghost.

#![allow(dead_code)]

use std::{fs, path::Path, sync::Arc};

use multi_advice::{
    Cell, Direction, FeatureVector, Grid,
    ports::{FeatureExtractor, GameState, GridView, StateFeatures},
};

pub const STEP_REWARD: f64 = -1.0;
pub const FOOD_REWARD: f64 = 10.0;
pub const WIN_REWARD: f64 = 500.0;
pub const LOSE_REWARD: f64 = -500.0;

/// Open room with the agent at (3, 2) and a ghost two cells east of it.
pub const THREAT_ROOM: [&str; 6] = [
    "%%%%%%%",
    "%.....%",
    "%.....%",
    "%..P.G%",
    "%.....%",
    "%%%%%%%",
];

/// Same room with the ghost far away in the top-left corner.
pub const QUIET_ROOM: [&str; 6] = [
    "%%%%%%%",
    "%G....%",
    "%.....%",
    "%..P..%",
    "%.....%",
    "%%%%%%%",
];

/// Straight corridor with three pellets east of the agent.
pub const CORRIDOR: [&str; 3] = ["%%%%%%", "%P...%", "%%%%%%"];

/// Maze state; ghosts stand still.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Maze {
    pub walls: Grid,
    pub food: Grid,
    pub agent: Cell,
    pub facing: Direction,
    pub ghosts: Vec<Cell>,
    pub finished: bool,
}

impl Maze {
    pub fn parse(rows: &[&str]) -> Self {
        let agent = Grid::from_rows(rows, 'P')
            .occupied()
            .next()
            .expect("layout has an agent");
        Self {
            walls: Grid::from_rows(rows, '%'),
            food: Grid::from_rows(rows, '.'),
            agent,
            facing: Direction::Stop,
            ghosts: Grid::from_rows(rows, 'G').occupied().collect(),
            finished: false,
        }
    }

    pub fn facing(mut self, direction: Direction) -> Self {
        self.facing = direction;
        self
    }

    /// Apply a legal `action`, returning the next state and its reward.
    pub fn step(&self, action: Direction) -> (Maze, f64) {
        let mut next = self.clone();
        next.agent = self.agent.offset(action, 1);
        if action != Direction::Stop {
            next.facing = action;
        }

        let mut reward = STEP_REWARD;
        if next.food.get(next.agent) {
            next.food.set(next.agent, false);
            reward += FOOD_REWARD;
        }
        if next.ghosts.contains(&next.agent) {
            reward += LOSE_REWARD;
            next.finished = true;
        } else if next.food.occupied().next().is_none() {
            reward += WIN_REWARD;
            next.finished = true;
        }
        (next, reward)
    }
}

impl GameState for Maze {
    fn legal_actions(&self) -> Vec<Direction> {
        if self.finished {
            return Vec::new();
        }
        Direction::ALL
            .into_iter()
            .filter(|direction| {
                let cell = self.agent.offset(*direction, 1);
                self.walls.contains(cell) && !self.walls.get(cell)
            })
            .collect()
    }
}

impl GridView for Maze {
    fn walls(&self) -> &Grid {
        &self.walls
    }

    fn food(&self) -> &Grid {
        &self.food
    }

    fn ghost_positions(&self) -> Vec<(f64, f64)> {
        self.ghosts
            .iter()
            .map(|ghost| (ghost.x as f64, ghost.y as f64))
            .collect()
    }

    fn agent_position(&self) -> Cell {
        self.agent
    }
}

/// Bias, ghost proximity and food features, scaled down by ten.
pub struct MazeFeatures;

impl FeatureExtractor<Maze> for MazeFeatures {
    fn features(&self, state: &Maze, action: Direction) -> FeatureVector {
        let next = state.agent.offset(action, 1);
        let ghosts_near = state
            .ghost_positions()
            .into_iter()
            .filter(|ghost| state.walls.legal_neighbors(*ghost).contains(&next))
            .count() as f64;

        let mut features = FeatureVector::new();
        features.insert("bias", 0.1);
        features.insert("#-of-ghosts-1-step-away", ghosts_near / 10.0);
        if ghosts_near == 0.0 && state.food.get(next) {
            features.insert("eats-food", 0.1);
        }
        features
    }

    fn state_features(&self, state: &Maze) -> StateFeatures {
        StateFeatures {
            position: state.agent,
            direction: state.facing,
            walls: state.walls.clone(),
            ghosts: state.ghost_positions(),
        }
    }
}

pub fn extractor() -> Arc<dyn FeatureExtractor<Maze>> {
    Arc::new(MazeFeatures)
}

/// Write one `user<i>.csv` per entry of `advisors` into `directory`.
pub fn write_advisors(directory: &Path, advisors: &[&str]) {
    for (index, contents) in advisors.iter().enumerate() {
        fs::write(directory.join(format!("user{index}.csv")), contents).unwrap();
    }
}
