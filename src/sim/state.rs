//! Session state and core simulation types
//!
//! Everything the simulation task mutates under the simulation lock lives
//! in `GameState`.

use glam::Vec2;
use serde::Serialize;

use super::chain::{MarbleId, Train};
use super::rng::Lfsr16;
use crate::consts::*;
use crate::error::SimError;

/// Marble palette. Only the first four appear in the train or as bullets;
/// `Black` and `White` are background/cannon/text colors for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MarbleColor {
    Red,
    Blue,
    Green,
    Yellow,
    Black,
    White,
}

impl MarbleColor {
    /// Colors the generator draws from, in LFSR mapping order
    pub const PLAYABLE: [MarbleColor; 4] = [
        MarbleColor::Red,
        MarbleColor::Blue,
        MarbleColor::Green,
        MarbleColor::Yellow,
    ];

    pub fn is_playable(self) -> bool {
        Self::PLAYABLE.contains(&self)
    }
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    /// Waiting for the start button
    Title,
    /// Train advancing, cannon live
    Active,
    /// Train cleared
    Won,
    /// Train reached the finish line
    Lost,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Won | SessionPhase::Lost)
    }
}

/// Bullet flight state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flight {
    /// Sitting in the cannon
    Chambered,
    /// In flight along `angle` (radians)
    Airborne { angle: f32 },
}

/// The single marble owned by the cannon. Its slot lives in the train's
/// arena but is not linked into the chain until it lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub id: MarbleId,
    pub flight: Flight,
}

impl Bullet {
    pub fn is_airborne(&self) -> bool {
        matches!(self.flight, Flight::Airborne { .. })
    }
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: SessionPhase,
    /// Session seed as fed to the generator
    pub seed: u16,
    pub rng: Lfsr16,
    /// Marble arena and chain
    pub train: Train,
    /// Cannon marble; `None` until the session starts
    pub bullet: Option<Bullet>,
    /// Cannon rotation in whole degrees
    pub cannon_degrees: i32,
    pub chambered: MarbleColor,
    pub spare: MarbleColor,
    pub score: u32,
    /// Consecutive collapse streak
    pub multiplier: u32,
    /// Renderer should clear and redraw (phase change or resolved shot)
    pub redraw: bool,
    /// Simulated frames since the session started
    pub frames: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Create a session sitting on the title screen
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Title,
            seed: 0,
            rng: Lfsr16::new(0),
            train: Train::with_capacity(MAX_MARBLES),
            bullet: None,
            cannon_degrees: 0,
            chambered: MarbleColor::Red,
            spare: MarbleColor::Red,
            score: 0,
            multiplier: 0,
            redraw: false,
            frames: 0,
        }
    }

    /// Leave the title screen: seed the generator, load the cannon and lay
    /// out the starting train.
    pub fn start(&mut self, seed: u16) -> Result<(), SimError> {
        self.seed = seed;
        self.rng = Lfsr16::new(seed);
        self.train = Train::with_capacity(MAX_MARBLES);
        self.score = 0;
        self.multiplier = 0;
        self.frames = 0;

        self.chambered = self.rng.next_color();
        self.spare = self.rng.next_color();
        self.bullet = None;
        self.load_cannon()?;

        for i in 0..STARTING_MARBLES {
            let y = TRAIN_START_Y + i as f32 * (MARBLE_DIAMETER - 1.0);
            let color = self.rng.next_color();
            self.train.push_back(Vec2::new(TRAIN_X, y), color)?;
        }

        self.phase = SessionPhase::Active;
        self.redraw = true;
        log::info!(
            "Session started with seed {:#06x}, {} marbles",
            self.seed,
            STARTING_MARBLES
        );
        Ok(())
    }

    /// Spawn a fresh chambered bullet at the cannon in the chambered color
    pub fn load_cannon(&mut self) -> Result<MarbleId, SimError> {
        let id = self
            .train
            .alloc(Vec2::new(CANNON_X, CANNON_Y), self.chambered)?;
        self.bullet = Some(Bullet {
            id,
            flight: Flight::Chambered,
        });
        Ok(id)
    }

    pub fn bullet_airborne(&self) -> bool {
        self.bullet.is_some_and(|b| b.is_airborne())
    }

    /// Exchange chambered and spare colors. A bullet still in the cannon
    /// takes the new chambered color.
    pub fn swap_colors(&mut self) {
        std::mem::swap(&mut self.chambered, &mut self.spare);
        if let Some(bullet) = self.bullet {
            if !bullet.is_airborne() {
                self.train.get_mut(bullet.id).color = self.chambered;
            }
        }
    }

    /// Zero-padded score as shown on screen
    pub fn score_text(&self) -> String {
        format!("{:03}", self.score)
    }
}
