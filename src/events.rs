//! Discrete game events
//!
//! The simulation appends events as they happen; the host shell drains them
//! once per frame with [`crate::GameState::take_events`] and maps them to
//! audio cues, UI flashes or nothing at all.

use serde::{Deserialize, Serialize};

use crate::sim::powerup::PowerKind;

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A block took damage but survived
    BlockHit { block: u32 },
    /// A block's health reached zero and it was removed
    BlockDestroyed { block: u32 },
    /// A destroyed block dropped a pickup
    PowerUpDropped { kind: PowerKind },
    /// The paddle caught a falling pickup
    PowerUpCollected { kind: PowerKind },
    /// A timed power-up effect ran out
    PowerUpExpired { kind: PowerKind },
    /// A ball bounced off the paddle
    PaddleHit,
    /// A ball crossed the bottom edge
    BallLost,
    LifeLost,
    LifeGained,
    /// All blocks cleared; the shell should call `init_level(next_level)`
    LevelCleared { next_level: u32 },
    GameOver,
}
