//! Read-only views of the session for the render and indicator layers
//!
//! Snapshots are copied out under the simulation lock, so a renderer never
//! sees a chain halfway through a splice.

use serde::Serialize;

use crate::sim::{GameState, MarbleColor, SessionPhase};

pub const TITLE_TEXT: &str = "MARBLE KOMBAT";
pub const PROMPT_TEXT: &str = "PRESS BUTTON TO BEGIN";
pub const WIN_TEXT: &str = "FATALITY!";
pub const LOSE_TEXT: &str = "YOU DIED";
pub const SCORE_LABEL: &str = "SCORE: ";

/// Number of indicator LEDs
pub const INDICATOR_LEDS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarbleView {
    pub x: f32,
    pub y: f32,
    pub color: MarbleColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BulletView {
    pub x: f32,
    pub y: f32,
    pub color: MarbleColor,
    pub airborne: bool,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub phase: SessionPhase,
    /// Train, root first
    pub chain: Vec<MarbleView>,
    pub bullet: Option<BulletView>,
    pub cannon_degrees: i32,
    pub chambered: MarbleColor,
    pub spare: MarbleColor,
    pub score_text: String,
    /// Clear the screen before drawing
    pub redraw: bool,
    /// Banner lines for the current phase
    pub banner: Vec<String>,
}

impl RenderSnapshot {
    /// Copy the drawable state out of `state`
    pub fn capture(state: &GameState) -> Self {
        let chain = state
            .train
            .iter()
            .map(|id| {
                let marble = state.train.get(id);
                MarbleView {
                    x: marble.pos.x,
                    y: marble.pos.y,
                    color: marble.color,
                }
            })
            .collect();

        let bullet = state.bullet.map(|bullet| {
            let marble = state.train.get(bullet.id);
            BulletView {
                x: marble.pos.x,
                y: marble.pos.y,
                color: marble.color,
                airborne: bullet.is_airborne(),
            }
        });

        let score_text = state.score_text();
        Self {
            phase: state.phase,
            chain,
            bullet,
            cannon_degrees: state.cannon_degrees,
            chambered: state.chambered,
            spare: state.spare,
            banner: banner(state.phase, &score_text),
            score_text,
            redraw: state.redraw,
        }
    }

    /// Capture and consume the pending redraw request
    pub fn take(state: &mut GameState) -> Self {
        let snapshot = Self::capture(state);
        state.redraw = false;
        snapshot
    }
}

/// Banner text for a phase; the active screen has none
pub fn banner(phase: SessionPhase, score_text: &str) -> Vec<String> {
    match phase {
        SessionPhase::Title => vec![TITLE_TEXT.to_string(), PROMPT_TEXT.to_string()],
        SessionPhase::Active => Vec::new(),
        SessionPhase::Won => vec![WIN_TEXT.to_string(), format!("{SCORE_LABEL}{score_text}")],
        SessionPhase::Lost => vec![LOSE_TEXT.to_string(), format!("{SCORE_LABEL}{score_text}")],
    }
}

/// LED bitmask for the multiplier: two more LEDs per step, lit from the
/// right, saturating once all eight are on.
pub fn indicator_leds(multiplier: u32) -> u8 {
    let lit = ((multiplier + 1) * 2).min(INDICATOR_LEDS);
    ((1u16 << lit) - 1) as u8
}
