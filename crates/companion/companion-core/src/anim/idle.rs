//! Idle motion: floating, breathing and an occasional head-turn flicker,
//! anchored to a home position read fresh on every tick.

use rand::Rng;

use crate::config::IdleConfig;
use crate::easing::{breath_scale, float_offset};
use crate::ticker::Tick;
use crate::transform::{Transform2D, Vec2};

#[derive(Clone, Debug)]
pub struct IdleOscillator {
    cfg: IdleConfig,
    /// Accumulated frame-units since the oscillator was (re)started.
    elapsed: f32,
}

impl IdleOscillator {
    pub fn new(cfg: IdleConfig) -> Self {
        Self { cfg, elapsed: 0.0 }
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Reset the phase, clear rotation/scale and snap the sprite onto `home`.
    pub fn start(&mut self, home: Vec2, sprite: &mut Transform2D, body: &mut Transform2D) {
        self.elapsed = 0.0;
        sprite.reset_pose();
        sprite.position = home;
        body.rotation = 0.0;
    }

    pub fn step<R: Rng + ?Sized>(
        &mut self,
        tick: Tick,
        home: Vec2,
        sprite: &mut Transform2D,
        body: &mut Transform2D,
        rng: &mut R,
    ) {
        self.elapsed += tick.delta_time;
        let c = &self.cfg;

        sprite.position = Vec2::new(
            home.x,
            home.y + float_offset(self.elapsed, c.float_amplitude, c.float_speed),
        );
        let (sx, sy) = breath_scale(self.elapsed, c.breath_amplitude, c.breath_speed);
        sprite.scale = Vec2::new(sx, sy);

        if self.elapsed % c.head_turn_period < c.head_turn_window && c.head_turn_max > 0.0 {
            body.rotation = rng.gen_range(-c.head_turn_max..=c.head_turn_max);
        }
    }
}
