//! Render feed
//!
//! The simulation never touches a display surface. Each frame the shell
//! asks for a draw list: sprite handles paired with destination rects, in
//! paint order. Texture lookup, tinting and text layout stay shell-side;
//! scoreboard countdown text comes from `state.powerups.indicators`.

use serde::{Deserialize, Serialize};

use crate::sim::powerup::PowerKind;
use crate::sim::rect::Rect;
use crate::sim::state::GameState;

/// Handle naming which sprite to draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpriteImage {
    Paddle,
    /// `tinted` marks a super ball
    Ball { tinted: bool },
    /// Appearance tier derived from remaining health
    Block { tier: i32 },
    /// One per remaining paddle health point
    Heart,
    PowerUp(PowerKind),
    /// Background panel for score, hearts and effect indicators
    Scoreboard,
}

/// One draw command: which sprite, where
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteInstance {
    pub image: SpriteImage,
    pub rect: Rect,
}

/// Build the frame's draw list in paint order
pub fn draw_list(state: &GameState) -> Vec<SpriteInstance> {
    let cfg = &state.cfg;
    let mut sprites = Vec::with_capacity(
        2 + state.blocks.len() + state.balls.len() + state.pickups.len()
            + state.paddle.health as usize,
    );

    sprites.push(SpriteInstance {
        image: SpriteImage::Scoreboard,
        rect: Rect::new(cfg.game_width(), 0, cfg.scoreboard_width(), cfg.window_height),
    });

    for block in &state.blocks {
        sprites.push(SpriteInstance {
            image: SpriteImage::Block { tier: block.tier() },
            rect: block.rect,
        });
    }

    sprites.push(SpriteInstance {
        image: SpriteImage::Paddle,
        rect: state.paddle.rect,
    });

    for ball in &state.balls {
        sprites.push(SpriteInstance {
            image: SpriteImage::Ball { tinted: ball.tinted },
            rect: ball.rect,
        });
    }

    for pickup in &state.pickups {
        sprites.push(SpriteInstance {
            image: SpriteImage::PowerUp(pickup.kind),
            rect: pickup.rect,
        });
    }

    sprites.extend(hearts(state));
    sprites
}

/// Health as a row of hearts spread across the scoreboard panel
fn hearts(state: &GameState) -> Vec<SpriteInstance> {
    let cfg = &state.cfg;
    let gap = cfg.scoreboard_width() / (cfg.max_player_health as i32 + 1);
    let y = cfg.game_height() / 7;
    (0..state.paddle.health as i32)
        .map(|i| {
            let cx = cfg.game_width() + (i + 1) * gap;
            let mut rect = Rect::new(0, y, cfg.heart_width(), cfg.heart_height());
            rect.x = cx - rect.w / 2;
            SpriteInstance {
                image: SpriteImage::Heart,
                rect,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn test_state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 0, 7);
        state.init_level(0);
        state
    }

    #[test]
    fn test_draw_list_covers_all_entities() {
        let state = test_state();
        let sprites = draw_list(&state);

        let blocks = sprites.iter().filter(|s| matches!(s.image, SpriteImage::Block { .. })).count();
        assert_eq!(blocks, state.blocks.len());
        let hearts = sprites.iter().filter(|s| s.image == SpriteImage::Heart).count();
        assert_eq!(hearts, state.paddle.health as usize);
        assert!(sprites.iter().any(|s| s.image == SpriteImage::Paddle));
        assert_eq!(sprites[0].image, SpriteImage::Scoreboard);
    }

    #[test]
    fn test_hearts_track_health() {
        let mut state = test_state();
        state.paddle.health = 1;
        let sprites = draw_list(&state);
        let hearts: Vec<_> = sprites.iter().filter(|s| s.image == SpriteImage::Heart).collect();
        assert_eq!(hearts.len(), 1);
        // Hearts live on the scoreboard panel, not the play field
        assert!(hearts[0].rect.x >= state.cfg.game_width());
    }

    #[test]
    fn test_block_tier_follows_health() {
        let mut state = test_state();
        state.blocks[0].health = 99;
        let sprites = draw_list(&state);
        let tier = sprites
            .iter()
            .find_map(|s| match s.image {
                SpriteImage::Block { tier } => Some(tier),
                _ => None,
            })
            .unwrap();
        assert_eq!(tier, crate::consts::BLOCK_TIER_MAX);
    }
}
