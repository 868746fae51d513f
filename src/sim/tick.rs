//! Per-frame session state machine
//!
//! One call advances the session by one simulation frame: cannon and color
//! handling, bullet flight with splice and collapse, train advance, then the
//! win/lose checks.

use super::collapse::{Collapse, collapse};
use super::motion::{FlightStep, advance_bullet, advance_train, find_impact};
use super::splice::splice;
use super::state::{Bullet, Flight, GameState, SessionPhase};
use crate::consts::*;
use crate::deg_to_rad;
use crate::error::SimError;

/// Inputs sampled for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Cannon rotation in whole degrees
    pub cannon_degrees: i32,
    /// Swap chambered and spare colors (edge-triggered)
    pub swap: bool,
    /// Button press: starts the session on the title screen, fires otherwise
    pub button: bool,
    /// Seed used if this frame starts the session
    pub seed: u16,
}

/// How a shot ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// Landed and removed its run
    Collapsed { removed: usize, points: u32 },
    /// Landed without completing a run
    Landed,
    /// Flew off the playfield
    OutOfBounds,
}

/// What happened during a frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub fired: bool,
    pub shot: Option<ShotOutcome>,
    pub entered: Option<SessionPhase>,
}

/// Advance the session by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<TickReport, SimError> {
    let mut report = TickReport::default();

    match state.phase {
        SessionPhase::Title => {
            if input.button {
                state.start(input.seed)?;
                report.entered = Some(SessionPhase::Active);
            }
            return Ok(report);
        }
        SessionPhase::Won | SessionPhase::Lost => return Ok(report),
        SessionPhase::Active => {}
    }

    state.frames += 1;
    state.cannon_degrees = input.cannon_degrees;

    if input.swap {
        state.swap_colors();
    }

    if let Some(bullet) = state.bullet {
        match bullet.flight {
            // A press during flight is dropped
            Flight::Airborne { angle } => {
                if let Some(outcome) = fly(state, bullet, angle, dt) {
                    report.shot = Some(resolve_shot(state, outcome)?);
                }
            }
            Flight::Chambered if input.button => {
                fire(state, bullet);
                report.fired = true;
            }
            Flight::Chambered => {}
        }
    }

    advance_train(&mut state.train, dt);
    debug_assert_eq!(state.train.validate(), Ok(()));

    if state.train.is_empty() {
        enter(state, SessionPhase::Won);
        report.entered = Some(SessionPhase::Won);
    } else if reached_finish(state) {
        enter(state, SessionPhase::Lost);
        report.entered = Some(SessionPhase::Lost);
    }

    Ok(report)
}

/// Launch the chambered bullet along the cannon angle and rotate colors
fn fire(state: &mut GameState, bullet: Bullet) {
    let angle = deg_to_rad(state.cannon_degrees);
    state.bullet = Some(Bullet {
        id: bullet.id,
        flight: Flight::Airborne { angle },
    });
    state.chambered = state.spare;
    state.spare = state.rng.next_color();
    log::debug!("fired at {} degrees", state.cannon_degrees);
}

/// Move the airborne bullet; returns an outcome once the flight is over
fn fly(state: &mut GameState, bullet: Bullet, angle: f32, dt: f32) -> Option<ShotOutcome> {
    let mut pos = state.train.get(bullet.id).pos;
    if advance_bullet(&mut pos, angle, dt) == FlightStep::OutOfBounds {
        state.train.release(bullet.id);
        state.bullet = None;
        debug_assert_eq!(state.train.validate(), Ok(()));
        return Some(ShotOutcome::OutOfBounds);
    }
    state.train.get_mut(bullet.id).pos = pos;

    let impact = find_impact(&state.train, pos)?;
    splice(&mut state.train, bullet.id, impact);
    debug_assert_eq!(state.train.validate(), Ok(()));
    // The bullet is a chain member from here on
    state.bullet = None;

    let outcome = match collapse(&mut state.train, bullet.id) {
        Collapse::Collapsed { removed } => ShotOutcome::Collapsed { removed, points: 0 },
        Collapse::Kept => ShotOutcome::Landed,
    };
    debug_assert_eq!(state.train.validate(), Ok(()));
    Some(outcome)
}

/// Score the shot and load a fresh bullet into the cannon
fn resolve_shot(state: &mut GameState, outcome: ShotOutcome) -> Result<ShotOutcome, SimError> {
    let outcome = match outcome {
        ShotOutcome::Collapsed { removed, .. } => {
            let points = SCORE_PER_COLLAPSE * (state.multiplier + 1);
            state.score += points;
            state.multiplier += 1;
            ShotOutcome::Collapsed { removed, points }
        }
        other => {
            state.multiplier = 0;
            other
        }
    };
    log::debug!(
        "shot resolved: {outcome:?}, score {} x{}",
        state.score,
        state.multiplier
    );

    state.load_cannon()?;
    state.redraw = true;
    Ok(outcome)
}

/// Whether the furthest-advanced marble crossed the finish line
fn reached_finish(state: &GameState) -> bool {
    state
        .train
        .tail()
        .is_some_and(|tail| state.train.get(tail).pos.y >= WINDOW_Y)
}

fn enter(state: &mut GameState, phase: SessionPhase) {
    state.phase = phase;
    state.redraw = true;
    log::info!(
        "Session over: {phase:?} after {} frames, score {}",
        state.frames,
        state.score
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MarbleColor::{self, *};
    use crate::sim::Train;
    use glam::Vec2;

    /// Active session with a hand-placed train and a chambered bullet of `bullet`
    fn session(seed: u16, marbles: &[(MarbleColor, f32, f32)], bullet: MarbleColor) -> GameState {
        let mut state = GameState::new();
        state.start(seed).unwrap();
        state.train = Train::with_capacity(MAX_MARBLES);
        for &(color, x, y) in marbles {
            state.train.push_back(Vec2::new(x, y), color).unwrap();
        }
        state.chambered = bullet;
        state.load_cannon().unwrap();
        state.redraw = false;
        state
    }

    /// Put the current bullet in flight from `pos` along `angle`
    fn launch_from(state: &mut GameState, pos: Vec2, angle: f32) {
        let mut bullet = state.bullet.unwrap();
        state.train.get_mut(bullet.id).pos = pos;
        bullet.flight = Flight::Airborne { angle };
        state.bullet = Some(bullet);
    }

    fn press() -> TickInput {
        TickInput {
            button: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_title_to_active_on_button() {
        let mut state = GameState::new();
        let report = tick(&mut state, &TickInput::default(), SIM_TEST_DT).unwrap();
        assert_eq!(state.phase, SessionPhase::Title);
        assert_eq!(report.entered, None);

        let input = TickInput {
            button: true,
            seed: 42,
            ..Default::default()
        };
        let report = tick(&mut state, &input, SIM_TEST_DT).unwrap();
        assert_eq!(state.phase, SessionPhase::Active);
        assert_eq!(report.entered, Some(SessionPhase::Active));
        assert_eq!(state.seed, 42);
        // The starting press must not also fire
        assert!(!state.bullet_airborne());
    }

    const SIM_TEST_DT: f32 = 0.1;

    #[test]
    fn test_fire_rotates_colors() {
        let mut state = session(5, &[(Blue, TRAIN_X, 16.0)], Red);
        state.spare = Green;
        let mut expected_rng = state.rng;
        let input = TickInput {
            button: true,
            cannon_degrees: 30,
            ..Default::default()
        };
        let report = tick(&mut state, &input, 0.0).unwrap();
        assert!(report.fired);
        assert_eq!(state.chambered, Green);
        assert_eq!(state.spare, expected_rng.next_color());
        match state.bullet.unwrap().flight {
            Flight::Airborne { angle } => assert!((angle - deg_to_rad(30)).abs() < 1e-6),
            Flight::Chambered => panic!("bullet should be airborne"),
        }
        let bullet = state.bullet.unwrap();
        assert_eq!(state.train.get(bullet.id).color, Red);
    }

    #[test]
    fn test_press_during_flight_is_dropped() {
        let mut state = session(5, &[(Blue, TRAIN_X, 16.0)], Red);
        tick(&mut state, &press(), 0.0).unwrap();
        let (chambered, spare) = (state.chambered, state.spare);

        let report = tick(&mut state, &press(), 0.01).unwrap();
        assert!(!report.fired);
        assert_eq!((state.chambered, state.spare), (chambered, spare));
    }

    #[test]
    fn test_swap_in_flight_keeps_bullet_color() {
        let mut state = session(5, &[(Blue, TRAIN_X, 16.0)], Red);
        state.spare = Yellow;
        tick(&mut state, &press(), 0.0).unwrap();
        let bullet = state.bullet.unwrap();
        let (chambered, spare) = (state.chambered, state.spare);

        let swap = TickInput {
            swap: true,
            ..Default::default()
        };
        tick(&mut state, &swap, 0.01).unwrap();
        assert_eq!(state.chambered, spare);
        assert_eq!(state.spare, chambered);
        assert_eq!(state.train.get(bullet.id).color, Red);
    }

    #[test]
    fn test_miss_resets_multiplier_and_reloads() {
        let mut state = session(
            1,
            &[(Yellow, TRAIN_X, 16.0), (Yellow, TRAIN_X, 31.0)],
            Red,
        );
        state.multiplier = 2;
        state.score = 30;
        tick(&mut state, &press(), 0.0).unwrap();
        let first = state.bullet.unwrap().id;

        // Straight right along the cannon row, well below the train
        let mut outcome = None;
        for _ in 0..100 {
            let report = tick(&mut state, &TickInput::default(), SIM_TEST_DT).unwrap();
            if let Some(shot) = report.shot {
                outcome = Some(shot);
                break;
            }
        }
        assert_eq!(outcome, Some(ShotOutcome::OutOfBounds));
        assert_eq!(state.multiplier, 0);
        assert_eq!(state.score, 30);
        assert!(state.redraw);

        let bullet = state.bullet.unwrap();
        assert!(!bullet.is_airborne());
        assert_eq!(state.train.get(bullet.id).pos, Vec2::new(CANNON_X, CANNON_Y));
        assert_eq!(state.train.get(bullet.id).color, state.chambered);
        // Old slot was recycled for the new bullet; nothing leaked
        assert_eq!(bullet.id, first);
        assert_eq!(state.train.len(), 2);
        assert_eq!(state.train.live(), 3);
    }

    #[test]
    fn test_root_side_hit_collapses_red_run() {
        let mut state = session(
            1,
            &[
                (Red, 200.0, 16.0),
                (Red, 200.0, 31.0),
                (Red, 200.0, 46.0),
                (Blue, 200.0, 61.0),
            ],
            Red,
        );
        state.multiplier = 1;
        launch_from(&mut state, Vec2::new(186.0, 24.0), 0.0);

        let report = tick(&mut state, &TickInput::default(), 0.0).unwrap();
        assert_eq!(
            report.shot,
            Some(ShotOutcome::Collapsed {
                removed: 4,
                points: 20
            })
        );
        assert_eq!(state.score, 20);
        assert_eq!(state.multiplier, 2);

        let root = state.train.root().unwrap();
        assert_eq!(state.train.get(root).color, Blue);
        assert_eq!(state.train.len(), 1);
        assert_eq!(state.phase, SessionPhase::Active);
        assert!(state.redraw);
    }

    #[test]
    fn test_non_collapsing_landing_resets_multiplier() {
        let mut state = session(1, &[(Blue, 200.0, 16.0), (Green, 200.0, 31.0)], Red);
        state.multiplier = 3;
        launch_from(&mut state, Vec2::new(200.0, 40.0), 0.0);

        let report = tick(&mut state, &TickInput::default(), 0.0).unwrap();
        assert_eq!(report.shot, Some(ShotOutcome::Landed));
        assert_eq!(state.multiplier, 0);
        assert_eq!(state.train.len(), 3);
        assert!(!state.bullet_airborne());
    }

    #[test]
    fn test_chain_is_sound_right_after_each_flight_end() {
        // Landed: the bullet becomes a linked member
        let mut state = session(1, &[(Blue, 200.0, 16.0), (Green, 200.0, 31.0)], Red);
        let id = state.bullet.unwrap().id;
        launch_from(&mut state, Vec2::new(200.0, 40.0), 0.0);
        let bullet = state.bullet.unwrap();
        assert_eq!(fly(&mut state, bullet, 0.0, 0.0), Some(ShotOutcome::Landed));
        assert_eq!(state.train.validate(), Ok(()));
        assert!(state.train.iter().any(|m| m == id));
        assert!(state.bullet.is_none());

        // Collapsed: the whole run, bullet included, is back on the free list
        let mut state = session(
            1,
            &[(Red, 200.0, 16.0), (Red, 200.0, 31.0), (Blue, 200.0, 46.0)],
            Red,
        );
        launch_from(&mut state, Vec2::new(186.0, 24.0), 0.0);
        let bullet = state.bullet.unwrap();
        assert_eq!(
            fly(&mut state, bullet, 0.0, 0.0),
            Some(ShotOutcome::Collapsed {
                removed: 3,
                points: 0
            })
        );
        assert_eq!(state.train.validate(), Ok(()));
        assert_eq!(state.train.live(), 1);

        // Out of bounds: the slot is released without touching the chain
        let mut state = session(1, &[(Blue, 200.0, 16.0)], Red);
        let edge = Vec2::new(WINDOW_X - MARBLE_DIAMETER - 1.0, CANNON_Y);
        launch_from(&mut state, edge, 0.0);
        let bullet = state.bullet.unwrap();
        assert_eq!(
            fly(&mut state, bullet, 0.0, SIM_TEST_DT),
            Some(ShotOutcome::OutOfBounds)
        );
        assert_eq!(state.train.validate(), Ok(()));
        assert_eq!(state.train.live(), 1);
    }

    #[test]
    fn test_consecutive_collapses_scale_score() {
        let mut state = session(
            1,
            &[
                (Green, 200.0, 16.0),
                (Green, 200.0, 31.0),
                (Blue, 200.0, 46.0),
                (Blue, 200.0, 61.0),
                (Yellow, 200.0, 76.0),
            ],
            Green,
        );
        launch_from(&mut state, Vec2::new(200.0, 34.0), 0.0);
        tick(&mut state, &TickInput::default(), 0.0).unwrap();
        assert_eq!((state.score, state.multiplier), (10, 1));

        // Blue pair now leads the chain
        let bullet = state.bullet.unwrap();
        state.train.get_mut(bullet.id).color = Blue;
        let root = state.train.root().unwrap();
        let root_pos = state.train.get(root).pos;
        launch_from(&mut state, root_pos + Vec2::new(0.0, 5.0), 0.0);
        let report = tick(&mut state, &TickInput::default(), 0.0).unwrap();
        assert_eq!(
            report.shot,
            Some(ShotOutcome::Collapsed {
                removed: 3,
                points: 20
            })
        );
        assert_eq!((state.score, state.multiplier), (30, 2));
    }

    #[test]
    fn test_clearing_train_wins() {
        let mut state = session(1, &[(Green, 200.0, 16.0), (Green, 200.0, 31.0)], Green);
        launch_from(&mut state, Vec2::new(200.0, 40.0), 0.0);

        let report = tick(&mut state, &TickInput::default(), SIM_TEST_DT).unwrap();
        assert!(state.train.is_empty());
        assert_eq!(state.phase, SessionPhase::Won);
        assert_eq!(report.entered, Some(SessionPhase::Won));
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_tail_past_finish_loses() {
        let mut state = session(
            1,
            &[(Blue, 200.0, 300.0), (Red, 200.0, 315.0)],
            Red,
        );
        // Shot still on its way; loss wins regardless
        launch_from(&mut state, Vec2::new(40.0, CANNON_Y), 0.0);

        let report = tick(&mut state, &TickInput::default(), 1.0).unwrap();
        assert_eq!(state.phase, SessionPhase::Lost);
        assert_eq!(report.entered, Some(SessionPhase::Lost));
        assert!(state.redraw);

        // Terminal phases are inert
        let frames = state.frames;
        let report = tick(&mut state, &press(), 1.0).unwrap();
        assert_eq!(report, TickReport::default());
        assert_eq!(state.frames, frames);
        assert_eq!(state.phase, SessionPhase::Lost);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput {
                button: true,
                seed: 0xBEEF,
                ..Default::default()
            },
            TickInput {
                cannon_degrees: -10,
                button: true,
                ..Default::default()
            },
            TickInput {
                swap: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        let mut a = GameState::new();
        let mut b = GameState::new();
        tick(&mut a, &inputs[0], SIM_TEST_DT).unwrap();
        tick(&mut b, &inputs[0], SIM_TEST_DT).unwrap();
        for _ in 0..50 {
            for input in &inputs[1..] {
                tick(&mut a, input, SIM_TEST_DT).unwrap();
                tick(&mut b, input, SIM_TEST_DT).unwrap();
            }
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.rng, b.rng);
        let pos_a: Vec<_> = a.train.iter().map(|id| *a.train.get(id)).collect();
        let pos_b: Vec<_> = b.train.iter().map(|id| *b.train.get(id)).collect();
        assert_eq!(pos_a, pos_b);
    }
}
