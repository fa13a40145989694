//! Game configuration
//!
//! All tunables live on [`GameConfig`]: window geometry, entity speeds, the
//! level block map and the power-up catalog. Everything else (paddle and
//! block sizes, the play-field split) is derived from it, so a shell only
//! picks a resolution and optionally overrides fields via serde.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::powerup::PowerKind;

/// Reference resolution the base speeds were tuned at
const BASE_WIDTH: f32 = 1366.0;
const BASE_HEIGHT: f32 = 768.0;

const BASE_PADDLE_SPEED: f32 = 800.0;
const BASE_BALL_SPEED: f32 = 400.0;
const BASE_POWERUP_SPEED: f32 = 600.0;

/// Configuration loading and validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown power-up kind `{0}`")]
    UnknownPower(String),
    #[error("invalid level map character `{0}` (expected a digit or space)")]
    InvalidBlockChar(char),
    #[error("level map is empty")]
    EmptyLevelMap,
    #[error("level map rows have unequal widths")]
    RaggedLevelMap,
}

/// Drop odds, effect duration and conflicting kind for one power-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerSpec {
    /// Drop probability in [0, 1]; compared against one shared roll per drop
    pub probability: f32,
    /// Effect duration in seconds; `None` for instantaneous kinds
    #[serde(default)]
    pub duration: Option<f32>,
    /// Kind whose indicator this one replaces on activation
    #[serde(default)]
    pub conflicts_with: Option<PowerKind>,
}

impl PowerSpec {
    /// Never drops, no timed effect; used for kinds absent from the catalog
    pub const NONE: PowerSpec = PowerSpec {
        probability: 0.0,
        duration: None,
        conflicts_with: None,
    };
}

/// Per-kind power-up specs, keyed by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PowerCatalog {
    specs: BTreeMap<PowerKind, PowerSpec>,
}

impl PowerCatalog {
    /// Spec for `kind`; kinds missing from the catalog never drop
    pub fn spec(&self, kind: PowerKind) -> PowerSpec {
        self.specs.get(&kind).copied().unwrap_or(PowerSpec::NONE)
    }

    pub fn set(&mut self, kind: PowerKind, spec: PowerSpec) {
        self.specs.insert(kind, spec);
    }
}

impl Default for PowerCatalog {
    fn default() -> Self {
        let entry = |probability: f32, duration: Option<f32>, conflicts_with: Option<PowerKind>| {
            PowerSpec {
                probability,
                duration,
                conflicts_with,
            }
        };
        let mut specs = BTreeMap::new();
        specs.insert(PowerKind::AddLife, entry(0.1, None, None));
        specs.insert(PowerKind::BigBall, entry(1.0, Some(15.0), Some(PowerKind::SmallBall)));
        specs.insert(PowerKind::SmallBall, entry(1.0, Some(15.0), Some(PowerKind::BigBall)));
        specs.insert(PowerKind::FastBall, entry(0.1, Some(10.0), Some(PowerKind::SlowBall)));
        specs.insert(PowerKind::SlowBall, entry(0.1, Some(10.0), Some(PowerKind::FastBall)));
        specs.insert(PowerKind::MultiplyBalls, entry(0.1, None, None));
        specs.insert(PowerKind::SuperBall, entry(0.1, Some(20.0), None));
        specs.insert(PowerKind::BigPaddle, entry(0.1, Some(15.0), Some(PowerKind::SmallPaddle)));
        specs.insert(PowerKind::SmallPaddle, entry(0.1, Some(15.0), Some(PowerKind::BigPaddle)));
        Self { specs }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window_width: i32,
    pub window_height: i32,
    /// Reference frame rate; used only to convert per-frame tunables
    pub fps: f32,
    pub paddle_speed: f32,
    pub ball_speed: f32,
    pub powerup_speed: f32,
    pub max_player_health: u8,
    /// Levels run 0..=max_level; clearing the last one ends the game
    pub max_level: u32,
    /// Pixel gap between blocks in the grid
    pub gap_size: i32,
    /// Level layout: digits are block health weights, spaces are holes
    pub block_map: Vec<String>,
    /// Paddle frames of drift applied when the paddle carries the ball
    pub carry_nudge_frames: f32,
    pub powers: PowerCatalog,
}

impl GameConfig {
    /// Config for a window size, with speeds scaled from the base resolution
    pub fn for_resolution(width: i32, height: i32) -> Self {
        let coeff = (width as f32 / BASE_WIDTH + height as f32 / BASE_HEIGHT) / 2.0;
        Self {
            window_width: width,
            window_height: height,
            fps: 60.0,
            paddle_speed: BASE_PADDLE_SPEED * coeff,
            ball_speed: BASE_BALL_SPEED * coeff,
            powerup_speed: BASE_POWERUP_SPEED * coeff,
            max_player_health: 3,
            max_level: 6,
            gap_size: 10,
            block_map: default_block_map(),
            carry_nudge_frames: 3.0,
            powers: PowerCatalog::default(),
        }
    }

    /// Width of the scoreboard panel on the right edge of the window
    pub fn scoreboard_width(&self) -> i32 {
        self.window_width / 4
    }

    /// Playable width; balls and the paddle never enter the scoreboard
    pub fn game_width(&self) -> i32 {
        self.window_width - self.scoreboard_width()
    }

    pub fn game_height(&self) -> i32 {
        self.window_height
    }

    pub fn paddle_width(&self) -> i32 {
        (self.game_width() as f32 / 2.5) as i32
    }

    pub fn paddle_height(&self) -> i32 {
        self.window_height / 40
    }

    /// Balls are square
    pub fn ball_size(&self) -> i32 {
        self.window_width / 40
    }

    pub fn powerup_size(&self) -> i32 {
        self.window_width / 40
    }

    pub fn heart_width(&self) -> i32 {
        self.window_width / 30
    }

    pub fn heart_height(&self) -> i32 {
        self.window_height / 20
    }

    pub fn block_rows(&self) -> i32 {
        self.block_map.len() as i32
    }

    pub fn block_cols(&self) -> i32 {
        self.block_map.first().map_or(0, |row| row.chars().count() as i32)
    }

    pub fn block_width(&self) -> i32 {
        self.game_width() / self.block_cols().max(1) - self.gap_size
    }

    pub fn block_height(&self) -> i32 {
        self.game_height() / self.block_rows().max(1) - self.gap_size
    }

    /// Check the block map: non-empty, rectangular, digits and spaces only
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(first) = self.block_map.first() else {
            return Err(ConfigError::EmptyLevelMap);
        };
        if first.is_empty() {
            return Err(ConfigError::EmptyLevelMap);
        }
        let width = first.chars().count();
        for row in &self.block_map {
            if row.chars().count() != width {
                return Err(ConfigError::RaggedLevelMap);
            }
            for ch in row.chars() {
                if ch != ' ' && !ch.is_ascii_digit() {
                    return Err(ConfigError::InvalidBlockChar(ch));
                }
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_resolution(1600, 900)
    }
}

fn default_block_map() -> Vec<String> {
    [
        "          ",
        "          ",
        "4444444444",
        "3333333333",
        "2222222222",
        "1111111111",
        "          ",
        "          ",
        "          ",
        "          ",
        "          ",
        "          ",
    ]
    .iter()
    .map(|row| row.to_string())
    .collect()
}
