use glam::Vec2;
use plumbfield_common::{Color, Rect, Size};
use plumbfield_content::{Direction, LevelHeader, SimulationKind, SimulationObject, StarSize};
use plumbfield_render::DrawingContext;
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentState, DeathCause};
use crate::simulation::{Simulation, Tally, WorldStepFailure};

/// Lifecycle events of a level. Plain ticks are not recorded, so an idle
/// level keeps an empty log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    Released { agent: u32, tick: u64 },
    Saved { agent: u32, tick: u64 },
    Killed { agent: u32, tick: u64, cause: DeathCause },
    TimeUp { tick: u64 },
    ArmageddonStarted { tick: u64 },
    FinishRequested { tick: u64 },
}

/// The running level.
///
/// Objects keep document order, which is also draw order. Agents are kept in
/// release order, so their ids are ascending.
#[derive(Debug, Clone)]
pub struct World {
    level_id: String,
    size: Size,
    objects: Vec<SimulationObject>,
    agents: Vec<Agent>,
    total: u32,
    required: u32,
    time_limit: Option<u32>,
    released: u32,
    saved: u32,
    killed: u32,
    tick: u64,
    /// Advanced each step for reproducible pseudo-randomness.
    seed: u64,
    time_up: bool,
    armageddon: bool,
    finish_requested: bool,
    /// Append-only log of lifecycle events.
    event_log: Vec<WorldEvent>,
}

impl World {
    pub fn new(header: &LevelHeader, objects: Vec<SimulationObject>, seed: u64) -> Self {
        Self {
            level_id: header.id.clone(),
            size: header.world,
            objects,
            agents: Vec::new(),
            total: header.agents,
            required: header.required,
            time_limit: header.time_limit,
            released: 0,
            saved: 0,
            killed: 0,
            tick: 0,
            seed,
            time_up: false,
            armageddon: false,
            finish_requested: false,
            event_log: Vec::new(),
        }
    }

    /// Ticks stepped since the level started.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Current pseudo-random state, advanced once per tick.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// World dimensions in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Placed objects in draw order.
    pub fn objects(&self) -> &[SimulationObject] {
        &self.objects
    }

    /// Every agent released so far, in release order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Number of agents that have left an entrance.
    pub fn released(&self) -> u32 {
        self.released
    }

    /// Number of agents still on the field.
    pub fn walking(&self) -> usize {
        self.agents.iter().filter(|a| a.is_walking()).count()
    }

    /// Events recorded since the last drain.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    fn has_entrance(&self) -> bool {
        self.objects
            .iter()
            .any(|o| matches!(o.kind(), SimulationKind::Entrance { .. }))
    }

    /// Whether no further agents will ever be released.
    fn release_exhausted(&self) -> bool {
        self.released >= self.total || self.time_up || self.armageddon || !self.has_entrance()
    }

    fn kill(&mut self, index: usize, cause: DeathCause) {
        let agent = &mut self.agents[index];
        agent.state = AgentState::Killed(cause);
        self.killed += 1;
        self.event_log.push(WorldEvent::Killed {
            agent: agent.id,
            tick: self.tick,
            cause,
        });
    }

    fn check_time_limit(&mut self) {
        let Some(limit) = self.time_limit else {
            return;
        };
        if self.time_up || self.tick < u64::from(limit) {
            return;
        }
        self.time_up = true;
        self.event_log.push(WorldEvent::TimeUp { tick: self.tick });
        for i in 0..self.agents.len() {
            if self.agents[i].is_walking() {
                self.kill(i, DeathCause::TimeUp);
            }
        }
    }

    fn advance_objects(&mut self) {
        let seed = self.seed;
        for object in &mut self.objects {
            match object.kind_mut() {
                SimulationKind::Thunderstorm {
                    period,
                    flash_ticks,
                    countdown,
                    lit,
                } => {
                    *lit = lit.saturating_sub(1);
                    *countdown = countdown.saturating_sub(1);
                    if *countdown == 0 {
                        *lit = *flash_ticks;
                        let half = (*period / 2).max(1);
                        *countdown = half + (seed % u64::from(half + 1)) as u32;
                    }
                }
                SimulationKind::Animated {
                    speed,
                    frame,
                    elapsed,
                    ..
                }
                | SimulationKind::Liquid {
                    speed,
                    frame,
                    elapsed,
                    ..
                } => {
                    if *speed > 0 {
                        *elapsed += 1;
                        if *elapsed >= *speed {
                            *elapsed = 0;
                            *frame = frame.wrapping_add(1);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn move_agents(&mut self) {
        let width = self.size.width as f32;
        for i in 0..self.agents.len() {
            if !self.agents[i].is_walking() {
                continue;
            }
            self.agents[i].walk();
            let pos = self.agents[i].pos;

            let reached_exit = self.objects.iter().any(|o| {
                matches!(o.kind(), SimulationKind::Exit { zone, .. } if zone.contains(pos))
            });
            if reached_exit {
                self.agents[i].state = AgentState::Exited;
                self.saved += 1;
                self.event_log.push(WorldEvent::Saved {
                    agent: self.agents[i].id,
                    tick: self.tick,
                });
                continue;
            }

            let in_liquid = self.objects.iter().any(|o| {
                matches!(o.kind(), SimulationKind::Liquid { zone, .. } if zone.contains(pos))
            });
            if in_liquid {
                self.kill(i, DeathCause::Drowned);
            } else if pos.x < 0.0 || pos.x >= width {
                self.kill(i, DeathCause::OutOfBounds);
            }
        }
    }

    fn release_agents(&mut self) {
        if self.release_exhausted() {
            return;
        }
        let tick = self.tick;
        let spawns: Vec<(Vec2, Direction)> = self
            .objects
            .iter()
            .filter_map(|o| match o.kind() {
                SimulationKind::Entrance {
                    direction,
                    release_rate,
                    ..
                } if (tick - 1) % u64::from((*release_rate).max(1)) == 0 => {
                    Some((o.pos(), *direction))
                }
                _ => None,
            })
            .collect();

        for (pos, direction) in spawns {
            if self.released >= self.total {
                break;
            }
            let id = self.released;
            let facing = match direction {
                Direction::Left => -1,
                Direction::Right => 1,
                Direction::Misc if id % 2 == 0 => -1,
                Direction::Misc => 1,
            };
            self.agents.push(Agent::new(id, pos, facing));
            self.released += 1;
            self.event_log.push(WorldEvent::Released { agent: id, tick });
        }
    }

    fn check_invariants(&self) -> Result<(), WorldStepFailure> {
        if self.saved + self.killed > self.released || self.released > self.total {
            return Err(WorldStepFailure::InvariantViolated {
                tick: self.tick,
                detail: format!(
                    "saved {} + killed {} with {} released of {}",
                    self.saved, self.killed, self.released, self.total
                ),
            });
        }
        Ok(())
    }

    /// Draw objects in document order, then walking agents.
    pub fn draw(&self, gc: &mut dyn DrawingContext) {
        let world_rect = Rect::new(0.0, 0.0, self.size.width as f32, self.size.height as f32);
        for object in &self.objects {
            match object.kind() {
                SimulationKind::Fill { rect, color } => gc.fill_rect(*rect, *color),
                SimulationKind::Thunderstorm { lit, .. } if *lit > 0 => {
                    gc.fill_rect(world_rect, Color::rgba(1.0, 1.0, 1.0, 0.5));
                }
                SimulationKind::Starfield { stars } => {
                    for star in stars {
                        let sprite = match star.size {
                            StarSize::Small => "stars/small",
                            StarSize::Middle => "stars/middle",
                            StarSize::Large => "stars/large",
                        };
                        gc.draw_sprite(sprite, star.pos, 0);
                    }
                }
                SimulationKind::Animated { sprite, frame, .. }
                | SimulationKind::Liquid { sprite, frame, .. } => {
                    gc.draw_sprite(sprite, object.pos(), *frame);
                }
                SimulationKind::Entrance { .. } => {
                    gc.draw_sprite("entrances/generic", object.pos(), 0);
                }
                SimulationKind::Exit { .. } => gc.draw_sprite("exits/generic", object.pos(), 0),
                _ => {}
            }
        }
        for agent in self.agents.iter().filter(|a| a.is_walking()) {
            gc.draw_agent(agent.pos, agent.facing);
        }
    }

    /// Deterministic hash of the simulation state for replay comparison.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.seed.to_le_bytes());
        mix(&mut h, &self.released.to_le_bytes());
        mix(&mut h, &self.saved.to_le_bytes());
        mix(&mut h, &self.killed.to_le_bytes());
        mix(
            &mut h,
            &[
                self.time_up as u8,
                self.armageddon as u8,
                self.finish_requested as u8,
            ],
        );
        for agent in &self.agents {
            mix(&mut h, &agent.id.to_le_bytes());
            mix(&mut h, &agent.pos.x.to_bits().to_le_bytes());
            mix(&mut h, &agent.pos.y.to_bits().to_le_bytes());
            mix(&mut h, &agent.facing.to_le_bytes());
            let state = match agent.state {
                AgentState::Walking => 0u8,
                AgentState::Exited => 1,
                AgentState::Killed(cause) => 2 + cause as u8,
            };
            mix(&mut h, &[state]);
        }
        for object in &self.objects {
            match object.kind() {
                SimulationKind::Thunderstorm { countdown, lit, .. } => {
                    mix(&mut h, &countdown.to_le_bytes());
                    mix(&mut h, &lit.to_le_bytes());
                }
                SimulationKind::Animated { frame, elapsed, .. }
                | SimulationKind::Liquid { frame, elapsed, .. } => {
                    mix(&mut h, &frame.to_le_bytes());
                    mix(&mut h, &elapsed.to_le_bytes());
                }
                _ => {}
            }
        }
        h
    }
}

impl Simulation for World {
    fn step(&mut self) -> Result<(), WorldStepFailure> {
        self.tick += 1;
        self.seed = splitmix64(self.seed);

        self.check_time_limit();
        self.advance_objects();
        self.move_agents();
        if self.armageddon {
            if let Some(i) = self.agents.iter().position(Agent::is_walking) {
                self.kill(i, DeathCause::Armageddon);
            }
        }
        self.release_agents();
        self.check_invariants()
    }

    fn is_complete(&self) -> bool {
        self.finish_requested || (self.release_exhausted() && self.walking() == 0)
    }

    fn tally(&self) -> Tally {
        Tally {
            saved: self.saved,
            killed: self.killed,
            total: self.total,
            required: self.required,
            time_limit: self.time_limit,
            ticks: self.tick,
        }
    }

    fn level_id(&self) -> &str {
        &self.level_id
    }

    fn request_finish(&mut self) {
        if !self.finish_requested {
            self.finish_requested = true;
            self.event_log
                .push(WorldEvent::FinishRequested { tick: self.tick });
        }
    }

    fn armageddon(&mut self) {
        if !self.armageddon {
            self.armageddon = true;
            tracing::info!(tick = self.tick, "armageddon started");
            self.event_log
                .push(WorldEvent::ArmageddonStarted { tick: self.tick });
        }
    }
}

/// Splitmix64: a fast, high-quality deterministic PRNG step function.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
