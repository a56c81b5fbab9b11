//! Pecking: pull back away from the target and return, with a decaying
//! amplitude, anchored to the position held when the oscillation started.

use crate::anim::Step;
use crate::config::EatConfig;
use crate::easing::{peck_offset, peck_phase, peck_tilt};
use crate::ticker::Tick;
use crate::transform::{Facing, Transform2D, Vec2};

#[derive(Clone, Debug)]
pub struct EatOscillator {
    cfg: EatConfig,
    anchor: Vec2,
    facing: Facing,
    elapsed_ms: f32,
    done: bool,
}

impl EatOscillator {
    pub fn new(cfg: EatConfig, anchor: Vec2, facing: Facing) -> Self {
        Self {
            cfg,
            anchor,
            facing,
            elapsed_ms: 0.0,
            done: false,
        }
    }

    #[inline]
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn step(&mut self, tick: Tick, sprite: &mut Transform2D) -> Step {
        if self.done {
            return Step::Finished;
        }
        self.elapsed_ms += tick.delta_ms;
        let c = &self.cfg;

        if self.elapsed_ms >= c.duration_ms {
            sprite.position = self.anchor;
            sprite.rotation = 0.0;
            self.done = true;
            return Step::Completed;
        }

        let phase = peck_phase(self.elapsed_ms, c.peck_period_ms);
        let pull = peck_offset(phase, self.elapsed_ms, c.duration_ms, c.amplitude, c.decay);
        // Pull back opposite to the facing direction.
        sprite.position = Vec2::new(self.anchor.x - pull * self.facing.sign(), self.anchor.y);
        sprite.rotation = peck_tilt(phase, c.tilt);
        Step::Running
    }
}
