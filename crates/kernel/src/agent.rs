use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Drowned,
    OutOfBounds,
    TimeUp,
    Armageddon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentState {
    Walking,
    Exited,
    Killed(DeathCause),
}

/// One autonomous walker.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: u32,
    pub pos: Vec2,
    /// -1 walks left, 1 walks right.
    pub facing: i8,
    pub state: AgentState,
}

impl Agent {
    /// Units moved per tick.
    pub const WALK_SPEED: f32 = 1.0;

    pub fn new(id: u32, pos: Vec2, facing: i8) -> Self {
        Self {
            id,
            pos,
            facing,
            state: AgentState::Walking,
        }
    }

    pub fn is_walking(&self) -> bool {
        self.state == AgentState::Walking
    }

    pub fn walk(&mut self) {
        self.pos.x += f32::from(self.facing) * Self::WALK_SPEED;
    }
}
