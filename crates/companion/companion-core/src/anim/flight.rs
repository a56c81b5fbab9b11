//! Eased flight from the current position to a target, with wing-flap tilt.

use crate::anim::Step;
use crate::config::FlightConfig;
use crate::easing::{ease_in_out_quad, wing_flap};
use crate::ticker::Tick;
use crate::transform::{Facing, Transform2D, Vec2};

#[derive(Clone, Debug)]
pub struct FlightInterpolator {
    from: Vec2,
    to: Vec2,
    facing: Facing,
    duration_ms: f32,
    flap_amplitude: f32,
    flap_speed: f32,
    elapsed_ms: f32,
    done: bool,
}

impl FlightInterpolator {
    pub fn new(cfg: &FlightConfig, from: Vec2, to: Vec2, facing: Facing) -> Self {
        Self {
            from,
            to,
            facing,
            duration_ms: cfg.duration_ms,
            flap_amplitude: cfg.flap_amplitude,
            flap_speed: cfg.flap_speed,
            elapsed_ms: 0.0,
            done: false,
        }
    }

    #[inline]
    pub fn target(&self) -> Vec2 {
        self.to
    }

    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).min(1.0)
    }

    pub fn step(&mut self, tick: Tick, sprite: &mut Transform2D) -> Step {
        if self.done {
            return Step::Finished;
        }
        self.elapsed_ms += tick.delta_ms;
        let progress = self.progress();

        if progress >= 1.0 {
            sprite.position = self.to;
            sprite.face(self.facing);
            self.done = true;
            return Step::Completed;
        }

        sprite.position = self.from.lerp(self.to, ease_in_out_quad(progress));
        sprite.rotation = wing_flap(self.elapsed_ms, self.flap_amplitude, self.flap_speed);
        Step::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TickerConfig;

    fn tick(ms: f32) -> Tick {
        Tick::from_ms(ms, &TickerConfig::default())
    }

    #[test]
    fn completes_exactly_once_on_target() {
        let cfg = FlightConfig::default();
        let to = Vec2::new(148.1, 160.3);
        let mut f = FlightInterpolator::new(&cfg, Vec2::new(100.0, 130.0), to, Facing::Right);
        let mut sprite = Transform2D::at(Vec2::new(100.0, 130.0));
        let mut completions = 0;
        for _ in 0..100 {
            match f.step(tick(16.7), &mut sprite) {
                Step::Completed => completions += 1,
                Step::Finished => break,
                Step::Running => {}
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(sprite.position, to);
        assert_eq!(sprite.rotation, 0.0);
        assert_eq!(sprite.scale, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn finished_flight_does_not_write() {
        let cfg = FlightConfig::default();
        let mut f = FlightInterpolator::new(&cfg, Vec2::ZERO, Vec2::new(10.0, 0.0), Facing::Left);
        let mut sprite = Transform2D::IDENTITY;
        assert_eq!(f.step(tick(100.0), &mut sprite), Step::Running);
        for _ in 0..8 {
            f.step(tick(100.0), &mut sprite);
        }
        assert_eq!(sprite.scale, Vec2::new(-1.0, 1.0));
        sprite.position = Vec2::new(-5.0, -5.0);
        assert_eq!(f.step(tick(100.0), &mut sprite), Step::Finished);
        assert_eq!(sprite.position, Vec2::new(-5.0, -5.0));
    }

    #[test]
    fn midway_tilts_with_wing_flap() {
        let cfg = FlightConfig::default();
        let mut f = FlightInterpolator::new(&cfg, Vec2::ZERO, Vec2::new(100.0, 0.0), Facing::Right);
        let mut sprite = Transform2D::IDENTITY;
        f.step(tick(50.0), &mut sprite);
        assert!(sprite.rotation.abs() <= cfg.flap_amplitude);
        assert!(sprite.rotation != 0.0);
        assert!(sprite.position.x > 0.0 && sprite.position.x < 100.0);
    }
}
