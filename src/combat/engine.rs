//! Simulation driver: fixed-timestep stepping over N independent trials
//! plus the shared target set, with throttled aggregate reporting.
//!
//! All run-wide state lives in an explicit context passed through every
//! update call; nothing global. Trials share no mutable state with each
//! other, so stepping them in lockstep inside one loop keeps results
//! independent while staying trivially testable.

use serde::Serialize;

use crate::combat::enemy::Enemy;
use crate::combat::log::CombatLog;
use crate::combat::player::Player;
use crate::combat::rng::Rng;
use crate::data::build::{BuildConfig, BuildError};

/// Fixed simulation timestep.
pub const STEP_MS: i64 = 100;

/// Ticks advanced between observer callbacks in chunked runs. At a 100 ms
/// step this reports roughly every five simulated seconds.
pub const DEFAULT_CHUNK_TICKS: u32 = 50;

/// Run-wide parameters, fixed at start.
#[derive(Debug, Clone, Copy)]
pub struct SimulationParams {
    pub simulators: u32,
    pub targets: u32,
    pub mitigation: f64,
    pub duration_ms: i64,
    pub auto_attack: bool,
    pub debug: bool,
}

impl SimulationParams {
    pub fn from_build(build: &BuildConfig) -> Self {
        Self {
            simulators: build.simulators,
            targets: build.targets,
            mitigation: build.mitigation,
            duration_ms: build.simulation_time_ms,
            auto_attack: build.auto_attack,
            debug: build.debug,
        }
    }
}

/// Mutable run context threaded through every update call: parameters, the
/// shared random source, and the combat log.
#[derive(Debug)]
pub struct SimCtx {
    pub params: SimulationParams,
    pub rng: Rng,
    pub log: CombatLog,
}

impl SimCtx {
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            params: SimulationParams {
                simulators: 1,
                targets: 1,
                mitigation: 0.0,
                duration_ms: 60_000,
                auto_attack: false,
                debug: false,
            },
            rng: Rng::new(1234),
            log: CombatLog::new(false),
        }
    }
}

/// Highest/lowest/average over the trial set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DamageAggregate {
    pub highest: f64,
    pub lowest: f64,
    pub average: f64,
}

/// One active aura of the representative (first) trial, for display.
#[derive(Debug, Clone, Serialize)]
pub struct AuraSnapshot {
    pub id: u32,
    pub name: &'static str,
    pub remaining_s: i64,
    pub stacks: u32,
}

/// Aggregate result over all trials, refreshed on a throttled cadence
/// during the run and finalized at completion.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub trials: u32,
    pub elapsed_ms: i64,
    pub damage: DamageAggregate,
    pub dps: DamageAggregate,
    pub active_auras: Vec<AuraSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverState {
    Idle,
    Running,
}

/// The stepping driver. Created per run; actors are discarded when the run
/// completes.
#[derive(Debug)]
pub struct Simulation {
    players: Vec<Player>,
    enemies: Vec<Enemy>,
    ctx: SimCtx,
    elapsed_ms: i64,
    state: DriverState,
}

impl Simulation {
    /// Build all trial actors and the target set. Configuration errors are
    /// fatal here, before any simulated time elapses.
    pub fn new(build: &BuildConfig, seed: Option<u64>) -> Result<Self, BuildError> {
        let params = SimulationParams::from_build(build);
        if params.simulators == 0 || params.simulators > 10_000 {
            return Err(BuildError::Invalid(format!(
                "simulators must be within 1..=10000, got {}",
                params.simulators
            )));
        }
        if params.targets == 0 || params.targets > 20 {
            return Err(BuildError::Invalid(format!(
                "targets must be within 1..=20, got {}",
                params.targets
            )));
        }
        if params.duration_ms <= 0 {
            return Err(BuildError::Invalid(format!(
                "simulation time must be positive, got {} ms",
                params.duration_ms
            )));
        }

        let mut players = Vec::with_capacity(params.simulators as usize);
        for id in 0..params.simulators as usize {
            players.push(Player::new(id, build).map_err(BuildError::Invalid)?);
        }
        let enemies = (0..params.targets as usize)
            .map(|id| Enemy::new(id, params.mitigation))
            .collect();

        let rng = match seed {
            Some(seed) => Rng::new(seed),
            None => Rng::from_entropy(),
        };

        Ok(Self {
            players,
            enemies,
            ctx: SimCtx {
                params,
                rng,
                log: CombatLog::new(params.debug),
            },
            elapsed_ms: 0,
            state: DriverState::Idle,
        })
    }

    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed_ms
    }

    pub fn log(&self) -> &CombatLog {
        &self.ctx.log
    }

    /// Run the full configured duration synchronously.
    pub fn run(&mut self) -> SimulationSummary {
        self.run_chunked(DEFAULT_CHUNK_TICKS, |_| {})
    }

    /// Run in chunks of `chunk_ticks` steps, invoking the observer between
    /// chunks — the cooperative yield point. A second start while a run is
    /// active is a no-op returning the current aggregates.
    pub fn run_chunked(
        &mut self,
        chunk_ticks: u32,
        mut observer: impl FnMut(&SimulationSummary),
    ) -> SimulationSummary {
        if self.state == DriverState::Running {
            return self.summary();
        }
        self.state = DriverState::Running;
        self.ctx.log.note("simulation starts", self.elapsed_ms);

        let chunk_ticks = chunk_ticks.max(1);
        let duration_ms = self.ctx.params.duration_ms;
        'run: loop {
            for _ in 0..chunk_ticks {
                if self.elapsed_ms >= duration_ms {
                    break 'run;
                }
                self.step();
            }
            observer(&self.summary());
        }

        self.ctx.log.note("simulation ends", self.elapsed_ms);
        let summary = self.summary();
        observer(&summary);
        self.state = DriverState::Idle;
        summary
    }

    /// One fixed timestep: every player, then every enemy.
    fn step(&mut self) {
        for i in 0..self.players.len() {
            self.players[i].update(STEP_MS, self.elapsed_ms, &mut self.enemies, &mut self.ctx);
        }
        for i in 0..self.enemies.len() {
            self.enemies[i].update(STEP_MS, self.elapsed_ms, &mut self.players, &mut self.ctx);
        }
        self.elapsed_ms += STEP_MS;
    }

    /// Aggregate damage and DPS over all trials, plus the first trial's
    /// active auras. DPS divisions are guarded for zero elapsed time.
    pub fn summary(&self) -> SimulationSummary {
        let mut damage = DamageAggregate::default();
        let mut dps = DamageAggregate::default();
        let mut total = 0.0;

        let elapsed_s = self.elapsed_ms as f64 / 1000.0;
        for (index, player) in self.players.iter().enumerate() {
            let done = player.damage_done;
            total += done;
            damage.highest = damage.highest.max(done);
            damage.lowest = if index == 0 {
                done
            } else {
                damage.lowest.min(done)
            };

            let player_dps = if elapsed_s > 0.0 {
                (done / elapsed_s).floor()
            } else {
                0.0
            };
            dps.highest = dps.highest.max(player_dps);
            dps.lowest = if index == 0 {
                player_dps
            } else {
                dps.lowest.min(player_dps)
            };
        }

        let trials = self.players.len().max(1) as f64;
        damage.average = (total / trials).floor();
        dps.average = if elapsed_s > 0.0 {
            (damage.average / elapsed_s).floor()
        } else {
            0.0
        };

        let active_auras = self
            .players
            .first()
            .map(|player| {
                player
                    .auras()
                    .iter()
                    .map(|aura| AuraSnapshot {
                        id: aura.id.into(),
                        name: aura.name,
                        remaining_s: if aura.passive {
                            -1
                        } else {
                            aura.duration_ms / 1000
                        },
                        stacks: aura.stacks(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        SimulationSummary {
            trials: self.players.len() as u32,
            elapsed_ms: self.elapsed_ms,
            damage,
            dps,
            active_auras,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::build::sample_build;

    #[test]
    fn rejects_zero_simulators() {
        let mut build = sample_build();
        build.simulators = 0;
        assert!(Simulation::new(&build, Some(1)).is_err());
    }

    #[test]
    fn rejects_out_of_range_targets() {
        let mut build = sample_build();
        build.targets = 21;
        assert!(Simulation::new(&build, Some(1)).is_err());
    }

    #[test]
    fn summary_on_fresh_run_has_zero_dps_without_division() {
        let build = sample_build();
        let sim = Simulation::new(&build, Some(1)).unwrap();
        let summary = sim.summary();
        assert_eq!(summary.elapsed_ms, 0);
        assert_eq!(summary.dps.average, 0.0);
    }

    #[test]
    fn chunked_run_reports_progress_and_finishes() {
        let mut build = sample_build();
        build.simulation_time_ms = 10_000;
        let mut sim = Simulation::new(&build, Some(7)).unwrap();
        let mut reports = 0;
        let summary = sim.run_chunked(10, |_| reports += 1);
        assert_eq!(summary.elapsed_ms, 10_000);
        assert!(reports >= 10, "expected throttled progress reports");
    }

    #[test]
    fn aggregates_keep_ordering_invariant() {
        let mut build = sample_build();
        build.simulators = 4;
        build.simulation_time_ms = 30_000;
        let mut sim = Simulation::new(&build, Some(99)).unwrap();
        let summary = sim.run();
        assert!(summary.damage.highest >= summary.damage.average);
        assert!(summary.damage.average >= summary.damage.lowest);
        assert!(summary.dps.highest >= summary.dps.lowest);
    }

    #[test]
    fn seeded_runs_replay_exactly() {
        let build = sample_build();
        let first = Simulation::new(&build, Some(42)).unwrap().run();
        let second = Simulation::new(&build, Some(42)).unwrap().run();
        assert_eq!(first.damage.average, second.damage.average);
        assert_eq!(first.damage.highest, second.damage.highest);
        assert_eq!(first.damage.lowest, second.damage.lowest);
    }
}
