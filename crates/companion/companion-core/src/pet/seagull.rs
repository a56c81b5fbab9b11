//! Seagull: the default pet.
//!
//! State machine:
//!   idle --on_trigger--> triggered (bait spawned, flight running)
//!   triggered --flight completes--> eating (eat oscillation running)
//!   eating --eat completes--> idle (bait removed, home moved, completion sent)
//!
//! Settling does not restart the idle oscillation; the caller does that once
//! it has finished any window recentering.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::oneshot;

use crate::anim::{EatOscillator, FlightInterpolator, IdleOscillator, Step};
use crate::art::{self, Art, HitRegion};
use crate::config::CompanionConfig;
use crate::error::PetError;
use crate::pet::{Completion, Pet, PetPlugin, PetState, TriggerContext};
use crate::surface::{NodeId, Surface};
use crate::ticker::{ListenerId, Ticker};
use crate::transform::{Facing, Transform2D, Vec2};

pub struct SeagullPlugin;

impl PetPlugin for SeagullPlugin {
    fn id(&self) -> &'static str {
        "seagull"
    }

    fn display_name(&self) -> &'static str {
        "Seagull"
    }

    fn load(&self, surface: &mut dyn Surface, cfg: &CompanionConfig) -> Box<dyn Pet> {
        Box::new(SeagullPet::new(surface, cfg.clone()))
    }
}

/// Ticker listener tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Channel {
    Idle,
    Flight,
    Eat,
}

/// The finite phase currently owning the sprite during a trigger sequence.
#[derive(Debug)]
enum Motion {
    Flight(FlightInterpolator),
    Eat(EatOscillator),
}

#[derive(Debug)]
struct Sequence {
    ctx: TriggerContext,
    facing: Facing,
    bait: NodeId,
    motion: Motion,
    /// Ticker owned by the current motion; replaced at every phase edge.
    ticker: Ticker<Channel>,
    done: oneshot::Sender<()>,
}

#[derive(Debug)]
pub struct SeagullPet {
    cfg: CompanionConfig,
    state: PetState,
    container: NodeId,
    body: NodeId,
    hit_region: Option<HitRegion>,
    sprite: Transform2D,
    body_pose: Transform2D,
    home: Vec2,
    idle: IdleOscillator,
    idle_ticker: Ticker<Channel>,
    idle_listener: Option<ListenerId>,
    sequence: Option<Sequence>,
    rng: StdRng,
    destroyed: bool,
}

impl SeagullPet {
    pub fn new(surface: &mut dyn Surface, cfg: CompanionConfig) -> Self {
        let body_art = art::seagull();
        let container = surface.create_node(&Art::group("seagull-root"));
        let body = surface.create_node(&body_art);
        surface.add_child(Some(container), body);
        surface.add_child(None, container);

        let mut pet = Self {
            state: PetState::Idle,
            container,
            body,
            hit_region: body_art.hit_region,
            sprite: Transform2D::at(cfg.home),
            body_pose: Transform2D::IDENTITY,
            home: cfg.home,
            idle: IdleOscillator::new(cfg.idle),
            idle_ticker: Ticker::new(cfg.ticker),
            idle_listener: None,
            sequence: None,
            rng: StdRng::seed_from_u64(cfg.rng_seed),
            destroyed: false,
            cfg,
        };
        pet.commit(surface);
        pet
    }

    /// Listeners currently registered on the idle ticker.
    pub fn idle_listener_count(&self) -> usize {
        self.idle_ticker.listener_count()
    }

    pub fn is_idling(&self) -> bool {
        self.idle_ticker.is_started()
    }

    /// Bait node of the running sequence, if any.
    pub fn bait(&self) -> Option<NodeId> {
        self.sequence.as_ref().map(|s| s.bait)
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn sprite(&self) -> &Transform2D {
        &self.sprite
    }

    fn commit(&self, surface: &mut dyn Surface) {
        surface.set_transform(self.container, &self.sprite);
        surface.set_transform(self.body, &self.body_pose);
    }

    /// Tear down a running sequence without completing it.
    fn abandon_sequence(&mut self, surface: &mut dyn Surface) {
        if let Some(mut seq) = self.sequence.take() {
            seq.ticker.destroy();
            surface.remove_child(None, seq.bait);
            surface.destroy(seq.bait);
            log::debug!("seagull: abandoned trigger sequence at ({}, {})", seq.ctx.x, seq.ctx.y);
        }
    }

    fn advance_sequence(&mut self, delta_ms: f32, surface: &mut dyn Surface) {
        let Some(seq) = self.sequence.as_mut() else {
            return;
        };
        for (channel, tick) in seq.ticker.frame(delta_ms) {
            let step = match (channel, &mut seq.motion) {
                (Channel::Flight, Motion::Flight(f)) => f.step(tick, &mut self.sprite),
                (Channel::Eat, Motion::Eat(e)) => e.step(tick, &mut self.sprite),
                _ => continue,
            };
            if step != Step::Completed {
                continue;
            }
            match seq.motion {
                Motion::Flight(_) => {
                    seq.ticker.destroy();
                    let mut ticker = Ticker::new(self.cfg.ticker);
                    ticker.register(Channel::Eat);
                    ticker.start();
                    seq.ticker = ticker;
                    seq.motion =
                        Motion::Eat(EatOscillator::new(self.cfg.eat, self.sprite.position, seq.facing));
                    self.state = PetState::Eating;
                    log::debug!("seagull: triggered -> eating");
                }
                Motion::Eat(_) => {
                    self.commit(surface);
                    self.settle(surface);
                    return;
                }
            }
            // The old ticker's remaining listeners belong to a finished phase.
            break;
        }
        self.commit(surface);
    }

    fn settle(&mut self, surface: &mut dyn Surface) {
        let Some(mut seq) = self.sequence.take() else {
            return;
        };
        seq.ticker.destroy();
        surface.remove_child(None, seq.bait);
        surface.destroy(seq.bait);

        self.home = seq.ctx.point();
        self.sprite.position = self.home;
        self.sprite.face(seq.facing);
        self.state = PetState::Idle;
        self.commit(surface);
        log::debug!("seagull: eating -> idle, home now ({}, {})", self.home.x, self.home.y);

        // The caller may have dropped its completion; that is fine.
        let _ = seq.done.send(());
    }
}

impl Pet for SeagullPet {
    fn kind(&self) -> &'static str {
        "seagull"
    }

    fn state(&self) -> PetState {
        self.state
    }

    fn play_idle(&mut self, surface: &mut dyn Surface) {
        if self.destroyed {
            return;
        }
        self.abandon_sequence(surface);
        self.state = PetState::Idle;
        self.idle_ticker.stop();
        if let Some(id) = self.idle_listener.take() {
            self.idle_ticker.unregister(id);
        }
        self.idle.start(self.home, &mut self.sprite, &mut self.body_pose);
        self.commit(surface);
        self.idle_listener = self.idle_ticker.register(Channel::Idle);
        self.idle_ticker.start();
    }

    fn on_trigger(
        &mut self,
        ctx: TriggerContext,
        surface: &mut dyn Surface,
    ) -> Result<Completion, PetError> {
        if self.destroyed {
            return Err(PetError::Destroyed);
        }
        if self.state.is_busy() {
            log::warn!(
                "seagull: trigger at ({}, {}) rejected while {}",
                ctx.x,
                ctx.y,
                self.state
            );
            return Err(PetError::Busy { state: self.state });
        }

        self.state = PetState::Triggered;
        self.idle_ticker.stop();
        self.sprite.reset_pose();
        self.body_pose.rotation = 0.0;

        let bait = surface.create_node(&art::fries());
        surface.set_transform(bait, &Transform2D::at(ctx.point()));
        surface.add_child(None, bait);

        // Offset the target so the beak, not the body center, lands on the bait.
        let facing = Facing::toward(self.sprite.position.x, ctx.x);
        let reach = self.cfg.flight.reach;
        let target = Vec2::new(ctx.x - reach.x * facing.sign(), ctx.y + reach.y);
        self.sprite.face(facing);
        let flight = FlightInterpolator::new(&self.cfg.flight, self.sprite.position, target, facing);

        let mut ticker = Ticker::new(self.cfg.ticker);
        ticker.register(Channel::Flight);
        ticker.start();

        let (done, completion) = oneshot::channel();
        self.sequence = Some(Sequence {
            ctx,
            facing,
            bait,
            motion: Motion::Flight(flight),
            ticker,
            done,
        });
        self.commit(surface);
        log::debug!("seagull: idle -> triggered, bait at ({}, {})", ctx.x, ctx.y);
        Ok(completion)
    }

    fn on_friend_arrived(&mut self, friend: &dyn Pet) {
        log::debug!("seagull: friend {} arrived, no interaction yet", friend.kind());
    }

    fn advance(&mut self, delta_ms: f32, surface: &mut dyn Surface) {
        if self.destroyed {
            return;
        }
        let idle_ticks = self.idle_ticker.frame(delta_ms);
        if !idle_ticks.is_empty() {
            for (_, tick) in idle_ticks {
                self.idle
                    .step(tick, self.home, &mut self.sprite, &mut self.body_pose, &mut self.rng);
            }
            self.commit(surface);
        }
        self.advance_sequence(delta_ms, surface);
    }

    fn destroy(&mut self, surface: &mut dyn Surface) {
        if self.destroyed {
            return;
        }
        self.idle_ticker.destroy();
        self.idle_listener = None;
        if let Some(mut seq) = self.sequence.take() {
            seq.ticker.destroy();
            surface.destroy(seq.bait);
        }
        surface.remove_child(None, self.container);
        surface.destroy(self.container);
        self.destroyed = true;
        log::debug!("seagull: destroyed");
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn position(&self) -> Vec2 {
        self.sprite.position
    }

    fn set_position(&mut self, x: f32, y: f32, surface: &mut dyn Surface) {
        if self.destroyed {
            return;
        }
        self.sprite.position = Vec2::new(x, y);
        self.commit(surface);
    }

    fn home_position(&self) -> Vec2 {
        self.home
    }

    fn set_home_position(&mut self, x: f32, y: f32) {
        self.home = Vec2::new(x, y);
    }

    fn hit_region(&self) -> Option<HitRegion> {
        self.hit_region
    }
}
