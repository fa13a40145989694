//! Power-up kinds, timers and effect application
//!
//! At most one effect is active per category; activating a conflicting kind
//! replaces the previous one's scoreboard indicator and timer slot outright.
//! Deactivation restores entities from the originals they carry, so stacking
//! never compounds.

use std::f32::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::MAX_BALLS;
use crate::events::GameEvent;
use crate::sim::state::{Ball, GameState};

const BIG_BALL_FACTOR: f32 = 1.5;
const SMALL_BALL_FACTOR: f32 = 0.5;
const FAST_BALL_FACTOR: f32 = 2.0;
const SLOW_BALL_FACTOR: f32 = 0.5;
const SUPER_BALL_FACTOR: i32 = 2;
const BIG_PADDLE_FACTOR: f32 = 2.0;
const SMALL_PADDLE_FACTOR: f32 = 0.5;

/// Every power-up kind in the game
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum PowerKind {
    AddLife,
    BigBall,
    SmallBall,
    FastBall,
    SlowBall,
    MultiplyBalls,
    SuperBall,
    BigPaddle,
    SmallPaddle,
}

impl PowerKind {
    pub const ALL: [PowerKind; 9] = [
        PowerKind::AddLife,
        PowerKind::BigBall,
        PowerKind::SmallBall,
        PowerKind::FastBall,
        PowerKind::SlowBall,
        PowerKind::MultiplyBalls,
        PowerKind::SuperBall,
        PowerKind::BigPaddle,
        PowerKind::SmallPaddle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PowerKind::AddLife => "add-life",
            PowerKind::BigBall => "big-ball",
            PowerKind::SmallBall => "small-ball",
            PowerKind::FastBall => "fast-ball",
            PowerKind::SlowBall => "slow-ball",
            PowerKind::MultiplyBalls => "multiply-balls",
            PowerKind::SuperBall => "super-ball",
            PowerKind::BigPaddle => "big-paddle",
            PowerKind::SmallPaddle => "small-paddle",
        }
    }

    /// Category a timed kind occupies; `None` for instantaneous kinds
    pub fn category(self) -> Option<PowerCategory> {
        match self {
            PowerKind::BigBall | PowerKind::SmallBall => Some(PowerCategory::BallSize),
            PowerKind::FastBall | PowerKind::SlowBall => Some(PowerCategory::BallSpeed),
            PowerKind::SuperBall => Some(PowerCategory::BallStrength),
            PowerKind::BigPaddle | PowerKind::SmallPaddle => Some(PowerCategory::PaddleSize),
            PowerKind::AddLife | PowerKind::MultiplyBalls => None,
        }
    }
}

impl std::str::FromStr for PowerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PowerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownPower(s.to_string()))
    }
}

impl std::fmt::Display for PowerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effect category; one timed effect may be active per category
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum PowerCategory {
    BallSize,
    BallSpeed,
    BallStrength,
    PaddleSize,
}

impl PowerCategory {
    pub const COUNT: usize = 4;

    pub const ALL: [PowerCategory; Self::COUNT] = [
        PowerCategory::BallSize,
        PowerCategory::BallSpeed,
        PowerCategory::BallStrength,
        PowerCategory::PaddleSize,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PowerCategory::BallSize => "ball-size",
            PowerCategory::BallSpeed => "ball-speed",
            PowerCategory::BallStrength => "ball-strength",
            PowerCategory::PaddleSize => "paddle-size",
        }
    }
}

/// Countdown for one effect category
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PowerUpTimer {
    duration: f32,
    elapsed: f32,
    active: bool,
}

impl PowerUpTimer {
    /// Arm the timer for `duration` seconds
    pub fn start(&mut self, duration: f32) {
        self.duration = duration;
        self.elapsed = 0.0;
        self.active = true;
    }

    /// Advance by `dt`, discounting time the host spent paused. Expires and
    /// clears once elapsed time passes the duration. No-op while disarmed.
    pub fn update(&mut self, dt: f32, time_in_pause: f32) {
        if !self.active {
            return;
        }
        self.elapsed += dt - time_in_pause;
        if self.elapsed > self.duration {
            self.active = false;
            self.duration = 0.0;
            self.elapsed = 0.0;
        }
    }

    pub fn active(&self) -> bool {
        self.active
    }

    /// Seconds left, zero when disarmed
    pub fn remaining(&self) -> f32 {
        if self.active {
            (self.duration - self.elapsed).max(0.0)
        } else {
            0.0
        }
    }
}

/// Scoreboard countdown entry for one active effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectIndicator {
    pub kind: PowerKind,
    pub remaining: f32,
}

/// Active power-up effects: one slot and timer per category plus the
/// scoreboard indicator list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUps {
    pub slots: [Option<PowerKind>; PowerCategory::COUNT],
    pub timers: [PowerUpTimer; PowerCategory::COUNT],
    pub indicators: Vec<EffectIndicator>,
}

impl PowerUps {
    /// Kind currently active in `category`, if any
    pub fn active_in(&self, category: PowerCategory) -> Option<PowerKind> {
        self.slots[category as usize]
    }

    pub fn is_active(&self, kind: PowerKind) -> bool {
        self.slots.contains(&Some(kind))
    }
}

/// Apply a collected power-up. Instantaneous kinds take effect and finish;
/// timed kinds also claim their category slot and indicator.
pub fn activate(state: &mut GameState, kind: PowerKind) {
    log::info!("Activating {kind} power-up");
    match kind {
        PowerKind::AddLife => state.add_life(),
        PowerKind::MultiplyBalls => multiply_balls(state),
        PowerKind::BigBall => apply_ball_size(state, BIG_BALL_FACTOR),
        PowerKind::SmallBall => apply_ball_size(state, SMALL_BALL_FACTOR),
        PowerKind::FastBall => apply_ball_speed(state, FAST_BALL_FACTOR),
        PowerKind::SlowBall => apply_ball_speed(state, SLOW_BALL_FACTOR),
        PowerKind::SuperBall => apply_ball_strength(state),
        PowerKind::BigPaddle => apply_paddle_size(state, BIG_PADDLE_FACTOR),
        PowerKind::SmallPaddle => apply_paddle_size(state, SMALL_PADDLE_FACTOR),
    }

    if let (Some(category), Some(duration)) = (kind.category(), state.cfg.powers.spec(kind).duration)
    {
        state.powerups.slots[category as usize] = Some(kind);
        state.powerups.timers[category as usize].start(duration);
        replace_indicator(state, kind, duration);
    }
}

/// Advance category timers, deactivating effects whose timer just expired
pub fn update_timers(state: &mut GameState, dt: f32, time_in_pause: f32) {
    for category in PowerCategory::ALL {
        let idx = category as usize;
        if !state.powerups.timers[idx].active() {
            continue;
        }
        state.powerups.timers[idx].update(dt, time_in_pause);
        if !state.powerups.timers[idx].active() {
            deactivate(state, category);
        }
    }
}

/// Tick scoreboard indicators, dropping the ones that ran out
pub fn update_indicators(state: &mut GameState, dt: f32, time_in_pause: f32) {
    for indicator in &mut state.powerups.indicators {
        indicator.remaining -= dt - time_in_pause;
    }
    state.powerups.indicators.retain(|ind| ind.remaining > 0.0);
}

/// Undo the active effect in `category` by restoring entity originals
pub fn deactivate(state: &mut GameState, category: PowerCategory) {
    let Some(kind) = state.powerups.slots[category as usize] else {
        return;
    };
    log::info!("Deactivating {kind} power-up");
    match category {
        PowerCategory::BallSize => {
            for ball in &mut state.balls {
                ball.restore_size();
            }
        }
        PowerCategory::BallSpeed => {
            for ball in &mut state.balls {
                ball.restore_speed();
            }
        }
        PowerCategory::BallStrength => {
            for ball in &mut state.balls {
                ball.restore_strength();
                ball.tinted = false;
            }
            // Resizing from originals would undo an active size effect
            reapply_size_effect(state);
        }
        PowerCategory::PaddleSize => state.paddle.restore_size(),
    }
    state.powerups.slots[category as usize] = None;
    state.events.push(GameEvent::PowerUpExpired { kind });
}

fn apply_ball_size(state: &mut GameState, factor: f32) {
    for ball in &mut state.balls {
        let w = (ball.original_width as f32 * factor).round() as i32;
        let h = (ball.original_height as f32 * factor).round() as i32;
        ball.change_size(w, h);
    }
}

fn apply_ball_speed(state: &mut GameState, factor: f32) {
    for ball in &mut state.balls {
        ball.change_speed(ball.original_speed * factor);
    }
}

fn apply_ball_strength(state: &mut GameState) {
    for ball in &mut state.balls {
        ball.change_strength(ball.original_strength * SUPER_BALL_FACTOR);
        ball.tinted = true;
    }
}

fn apply_paddle_size(state: &mut GameState, factor: f32) {
    let paddle = &mut state.paddle;
    let w = (paddle.original_width as f32 * factor).round() as i32;
    paddle.change_size(w, paddle.original_height);
}

/// Spawn two clones of every ball at its launch position, aimed up-left
/// and up-right. Capped so runaway multiplication cannot flood the field.
fn multiply_balls(state: &mut GameState) {
    if state.balls.len() > MAX_BALLS {
        return;
    }
    let parents: Vec<Ball> = state.balls.clone();
    for parent in parents {
        for angle in [-3.0 * FRAC_PI_4, -FRAC_PI_4] {
            let mut ball = parent.clone();
            ball.rect.set_midbottom(parent.launch_pos);
            ball.sync_position_from_rect();
            ball.direction = glam::Vec2::new(angle.cos(), angle.sin());
            ball.active = true;
            ball.serve_delay = 0.0;
            state.balls.push(ball);
        }
    }
    // Clones carry parent rects; reassert the size effect so a mid-effect
    // multiply leaves every ball consistent
    reapply_size_effect(state);
}

fn reapply_size_effect(state: &mut GameState) {
    match state.powerups.active_in(PowerCategory::BallSize) {
        Some(PowerKind::BigBall) => apply_ball_size(state, BIG_BALL_FACTOR),
        Some(PowerKind::SmallBall) => apply_ball_size(state, SMALL_BALL_FACTOR),
        _ => {}
    }
}

/// Add an indicator for `kind`, first removing any stale entry for the same
/// kind or for the kind it conflicts with
fn replace_indicator(state: &mut GameState, kind: PowerKind, duration: f32) {
    let mut kept = Vec::with_capacity(state.powerups.indicators.len() + 1);
    for indicator in std::mem::take(&mut state.powerups.indicators) {
        let stale = indicator.kind == kind
            || state.cfg.powers.spec(indicator.kind).conflicts_with == Some(kind);
        if !stale {
            kept.push(indicator);
        }
    }
    kept.push(EffectIndicator {
        kind,
        remaining: duration,
    });
    state.powerups.indicators = kept;
}
