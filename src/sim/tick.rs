//! Frame orchestration
//!
//! One `tick` advances the whole simulation by `dt` seconds in a fixed
//! order: phase checks, power-up timers, paddle, balls (integration, wall
//! and sprite collisions, damage), ball losses, falling pickups, scoreboard
//! indicators. Determinism holds for a given config, seed and input stream.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::consts::*;
use crate::events::GameEvent;
use crate::sim::collision;
use crate::sim::powerup::{self, PowerKind};
use crate::sim::rect::Rect;
use crate::sim::state::{Block, FallingPower, GamePhase, GameState};

/// Input snapshot for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Launch any balls riding the paddle
    pub launch: bool,
}

/// Advance the simulation by `dt` seconds. `time_in_pause` is how much of
/// that span the host spent paused; timed effects do not burn down during it.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, time_in_pause: f32) {
    if state.phase != GamePhase::Running {
        return;
    }
    if check_level_finish(state) {
        return;
    }
    if check_end_game(state) {
        return;
    }

    powerup::update_timers(state, dt, time_in_pause);

    state.paddle.handle_input(input.left, input.right);
    state.paddle.movement(dt);
    state.paddle.check_screen_constraint(state.cfg.game_width());

    let (damage, lost) = update_balls(state, input, dt);

    for (block_id, strength) in damage {
        damage_block(state, block_id, strength);
    }
    resolve_losses(state, &lost);

    update_pickups(state, dt);
    powerup::update_indicators(state, dt, time_in_pause);
}

/// Move every ball and resolve its collisions. Returns block damage to
/// apply (block id, strength) and the indices of balls that fell out.
fn update_balls(state: &mut GameState, input: &TickInput, dt: f32) -> (Vec<(u32, i32)>, Vec<usize>) {
    let game_width = state.cfg.game_width();
    let game_height = state.cfg.game_height();
    let fps = state.cfg.fps;
    let carry_nudge_frames = state.cfg.carry_nudge_frames;

    let mut damage = Vec::new();
    let mut lost = Vec::new();
    let mut paddle_hits = 0u32;

    let GameState {
        balls,
        blocks,
        paddle,
        ..
    } = state;

    for (i, ball) in balls.iter_mut().enumerate() {
        if !ball.active {
            if ball.serve_delay > 0.0 {
                ball.serve_delay -= dt;
                continue;
            }
            ball.ride_paddle(paddle);
            if input.launch {
                ball.launch();
            }
            continue;
        }

        ball.direction = ball.direction.normalize_or_zero();
        ball.movement(dt);
        if ball.frame_collision(game_width, game_height) {
            lost.push(i);
            continue;
        }

        let colliding: Vec<usize> = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| ball.rect.colliderect(&block.rect))
            .map(|(idx, _)| idx)
            .collect();
        let paddle_hit = ball.rect.colliderect(&paddle.rect);
        if colliding.is_empty() && !paddle_hit {
            continue;
        }

        let mut rects: Vec<Rect> = colliding.iter().map(|&idx| blocks[idx].rect).collect();
        if paddle_hit {
            rects.push(paddle.rect);
        }
        let overlap = collision::union_overlap(&ball.rect, &rects);

        if paddle_hit {
            collision::paddle_bounce(ball, &overlap, paddle, fps, carry_nudge_frames);
            paddle_hits += 1;
        } else {
            collision::bounce(ball, &overlap);
            for &idx in &colliding {
                damage.push((blocks[idx].id, ball.strength));
            }
        }
        ball.sync_position_from_rect();
    }

    for _ in 0..paddle_hits {
        state.events.push(GameEvent::PaddleHit);
    }
    (damage, lost)
}

/// Apply `strength` units of damage to a block, one hit at a time, stopping
/// once the block dies. A block already removed this frame absorbs nothing.
fn damage_block(state: &mut GameState, block_id: u32, strength: i32) {
    let Some(idx) = state.blocks.iter().position(|b| b.id == block_id) else {
        return;
    };
    let multiplier = (state.difficulty + 1) as i64;
    for _ in 0..strength {
        state.blocks[idx].health -= 1;
        if state.blocks[idx].health <= 0 {
            state.add_score(BLOCK_DESTROY_SCORE * multiplier);
            state.events.push(GameEvent::BlockDestroyed { block: block_id });
            let block = state.blocks.remove(idx);
            drop_power(state, &block);
            break;
        }
        state.add_score(BLOCK_HIT_SCORE * multiplier);
        state.events.push(GameEvent::BlockHit { block: block_id });
    }
}

/// Roll once for a destroyed block and maybe spawn a falling pickup. Every
/// kind whose probability clears the shared roll is an equally likely pick.
fn drop_power(state: &mut GameState, block: &Block) {
    let roll: f32 = state.rng.random();
    let candidates: Vec<PowerKind> = PowerKind::ALL
        .into_iter()
        .filter(|&kind| state.cfg.powers.spec(kind).probability >= roll)
        .collect();
    let Some(&kind) = candidates.choose(&mut state.rng) else {
        return;
    };
    let pickup = FallingPower::new(
        block.rect.center(),
        state.cfg.powerup_size(),
        state.cfg.powerup_speed,
        kind,
    );
    state.pickups.push(pickup);
    state.events.push(GameEvent::PowerUpDropped { kind });
}

/// Handle balls that fell out this frame. The sole remaining ball costs a
/// life and re-arms on the paddle; extra balls are simply removed.
fn resolve_losses(state: &mut GameState, lost: &[usize]) {
    let mut removed = 0;
    for &i in lost {
        let idx = i - removed;
        state.events.push(GameEvent::BallLost);
        if state.balls.len() == 1 {
            state.lose_life();
            let ball = &mut state.balls[idx];
            ball.active = false;
            ball.serve_delay = RESERVE_DELAY;
        } else {
            state.balls.remove(idx);
            removed += 1;
        }
    }
}

/// Advance falling pickups, collecting the ones the paddle catches and
/// discarding the ones that leave the field
fn update_pickups(state: &mut GameState, dt: f32) {
    let paddle_rect = state.paddle.rect;
    let game_height = state.cfg.game_height();
    let mut collected = Vec::new();
    state.pickups.retain_mut(|pickup| {
        pickup.movement(dt);
        if pickup.rect.top() > game_height {
            return false;
        }
        if pickup.rect.colliderect(&paddle_rect) {
            collected.push(pickup.kind);
            return false;
        }
        true
    });

    let multiplier = (state.difficulty + 1) as i64;
    for kind in collected {
        state.add_score(POWERUP_PICKUP_SCORE * multiplier);
        state.events.push(GameEvent::PowerUpCollected { kind });
        powerup::activate(state, kind);
    }
}

/// When the last block is gone, clear the field and hand the next level to
/// the shell. Returns true if the phase changed.
fn check_level_finish(state: &mut GameState) -> bool {
    if !state.blocks.is_empty() {
        return false;
    }
    state.balls.clear();
    state.pickups.clear();
    state.level += 1;
    state.phase = GamePhase::LevelCleared;
    state.events.push(GameEvent::LevelCleared {
        next_level: state.level,
    });
    log::info!("Level cleared, next level {}", state.level);
    true
}

/// Out of health or past the last level ends the game. Returns true if the
/// phase changed.
fn check_end_game(state: &mut GameState) -> bool {
    if state.paddle.health == 0 || state.level > state.cfg.max_level {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!("Game over at level {} with score {}", state.level, state.score);
        return true;
    }
    false
}
