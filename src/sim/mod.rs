//! Deterministic simulation module
//!
//! One logical tick per rendered frame, driven by the host shell's clock.
//! No internal threading; all per-frame work completes synchronously.

pub mod collision;
pub mod powerup;
pub mod rect;
pub mod state;
pub mod tick;

pub use rect::Rect;
pub use state::GameState;
pub use tick::{TickInput, tick};
