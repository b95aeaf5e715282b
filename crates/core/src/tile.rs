//! Tile module - a single numbered tile and its animation state
//!
//! Logical state (value, cell, flags) only changes through the engine. The
//! animation fields are cosmetic and are advanced by [`Tile::update`] with an
//! externally supplied delta time; the engine only reads `is_moving()` to know
//! when a move has settled.

use std::f32::consts::TAU;

use crate::types::{
    Pos, TileId, GLOW_RATE_PER_SEC, MERGE_PULSE_DECAY_PER_SEC, SLIDE_RATE_PER_SEC, SNAP_EPSILON,
};

/// Interpolated presentation state, in cell units (one cell = 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileAnim {
    /// Drawn column position.
    pub x: f32,
    /// Drawn row position.
    pub y: f32,
    pub moving: bool,
    /// 1.0 right after a merge, decays to 0.0.
    pub merge_pulse: f32,
    /// Phase of the pulsing glow (radians, wraps at 2π).
    pub glow_phase: f32,
}

impl TileAnim {
    fn at(pos: Pos) -> Self {
        Self {
            x: pos.col() as f32,
            y: pos.row() as f32,
            moving: false,
            merge_pulse: 0.0,
            glow_phase: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    id: TileId,
    value: u32,
    pos: Pos,
    special: bool,
    target: bool,
    anim: TileAnim,
}

impl Tile {
    pub fn new(id: TileId, value: u32, pos: Pos, special: bool) -> Self {
        Self {
            id,
            value,
            pos,
            special,
            target: false,
            anim: TileAnim::at(pos),
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn is_special(&self) -> bool {
        self.special
    }

    pub fn is_target(&self) -> bool {
        self.target
    }

    pub fn anim(&self) -> &TileAnim {
        &self.anim
    }

    pub fn is_moving(&self) -> bool {
        self.anim.moving
    }

    /// Logical relocation; the drawn position follows via [`Tile::update`].
    pub(crate) fn slide_to(&mut self, pos: Pos) {
        self.pos = pos;
        self.anim.moving = true;
    }

    /// Absorb an equal tile: double the value, lose special status.
    pub(crate) fn absorb(&mut self) -> u32 {
        self.value *= 2;
        self.special = false;
        self.anim.merge_pulse = 1.0;
        self.value
    }

    pub(crate) fn set_special(&mut self, special: bool) {
        self.special = special;
    }

    pub(crate) fn set_target(&mut self, target: bool) {
        self.target = target;
    }

    /// Advance animations by `dt` seconds. Returns true while still sliding.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.anim.merge_pulse > 0.0 {
            self.anim.merge_pulse = (self.anim.merge_pulse - dt * MERGE_PULSE_DECAY_PER_SEC).max(0.0);
        }

        if self.special || self.target {
            self.anim.glow_phase = (self.anim.glow_phase + dt * GLOW_RATE_PER_SEC) % TAU;
        }

        if self.anim.moving {
            let tx = self.pos.col() as f32;
            let ty = self.pos.row() as f32;
            let dx = tx - self.anim.x;
            let dy = ty - self.anim.y;

            if (dx * dx + dy * dy).sqrt() < SNAP_EPSILON {
                self.anim.x = tx;
                self.anim.y = ty;
                self.anim.moving = false;
            } else {
                // Large frames must not overshoot.
                let k = (dt * SLIDE_RATE_PER_SEC).min(1.0);
                self.anim.x += dx * k;
                self.anim.y += dy * k;
            }
        }

        self.anim.moving
    }
}
