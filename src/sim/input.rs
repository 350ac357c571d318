//! Player input snapshots and the sources that produce them

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Move left; wins when both directions are held
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Something that can be polled once per tick for input
pub trait InputSource {
    fn next_input(&mut self) -> TickInput;
}

/// Nothing pressed, ever
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleInput;

impl InputSource for IdleInput {
    fn next_input(&mut self) -> TickInput {
        TickInput::default()
    }
}

/// Replays a fixed sequence, then stays idle
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: Vec<TickInput>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(script: Vec<TickInput>) -> Self {
        Self { script, cursor: 0 }
    }
}

impl InputSource for ScriptedInput {
    fn next_input(&mut self) -> TickInput {
        let input = self.script.get(self.cursor).copied().unwrap_or_default();
        self.cursor = self.cursor.saturating_add(1);
        input
    }
}

/// Autopilot pressing keys at random from its own seeded stream
#[derive(Debug, Clone)]
pub struct RandomInput {
    rng: Pcg32,
}

impl RandomInput {
    const LEFT_CHANCE: f64 = 0.3;
    const RIGHT_CHANCE: f64 = 0.4;
    const FIRE_CHANCE: f64 = 0.5;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl InputSource for RandomInput {
    fn next_input(&mut self) -> TickInput {
        TickInput {
            left: self.rng.random_bool(Self::LEFT_CHANCE),
            right: self.rng.random_bool(Self::RIGHT_CHANCE),
            fire: self.rng.random_bool(Self::FIRE_CHANCE),
        }
    }
}
