//! Brickwave - a Breakout simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, power-ups, tick)
//! - `config`: Resolution-derived dimensions, speeds and the power-up catalog
//! - `events`: Discrete game events for the host shell (audio/UI mapping)
//! - `render`: Draw feed of sprite handles + destination rects
//!
//! The crate owns no window, clock or display surface. A host game-loop
//! shell samples input, supplies a per-frame delta and renders whatever
//! [`render::draw_list`] exposes.

pub mod config;
pub mod events;
pub mod render;
pub mod sim;

pub use config::{GameConfig, PowerCatalog};
pub use events::GameEvent;
pub use sim::powerup::{PowerCategory, PowerKind, PowerUpTimer};
pub use sim::state::{Ball, Block, GamePhase, GameState, Paddle};
pub use sim::tick::{TickInput, tick};

/// Fixed game constants (resolution-dependent tunables live in [`GameConfig`])
pub mod consts {
    /// Cooldown before a lost ball may be relaunched, seconds
    pub const RESERVE_DELAY: f32 = 0.5;
    /// Hard cap on concurrent balls (multiply-balls stops above this)
    pub const MAX_BALLS: usize = 20;
    /// Score penalty when the paddle loses a health point
    pub const LIFE_LOST_PENALTY: i64 = 200;
    /// Base score for destroying a block (scaled by difficulty + 1)
    pub const BLOCK_DESTROY_SCORE: i64 = 30;
    /// Base score for a non-lethal block hit (scaled by difficulty + 1)
    pub const BLOCK_HIT_SCORE: i64 = 10;
    /// Base score for collecting a power-up (scaled by difficulty + 1)
    pub const POWERUP_PICKUP_SCORE: i64 = 100;
    /// Highest block appearance tier (health above this reuses the top tier)
    pub const BLOCK_TIER_MAX: i32 = 7;
}
