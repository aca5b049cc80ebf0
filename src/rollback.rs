//! `RollbackManager` (spec.md §4.6, §4.7): fixed-timestep driver, a ring of
//! saved frames, an input ring, and deterministic rollback/replay.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::checksum::weak_checksum;
use crate::component::WorldMeta;
use crate::error::RollbackError;
use crate::frame::Frame;
use crate::pool::FramePool;

/// Init-time rollback configuration (spec.md §4.6). `Serialize`/`Deserialize`
/// let a host load these from a config file instead of hardcoding literals —
/// the ambient "configuration" concern, not a form of frame persistence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RollbackConfig {
    pub max_rollback_frames: u32,
    pub snapshot_interval: u32,
    pub tick_rate: u32,
    pub max_prediction_frames: u32,
}

impl Default for RollbackConfig {
    fn default() -> Self {
        Self {
            max_rollback_frames: 600,
            snapshot_interval: 60,
            tick_rate: 60,
            max_prediction_frames: 10,
        }
    }
}

impl RollbackConfig {
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// One ring entry: a saved `Frame`, its checksum, and the snapshot/confirmed
/// flags from spec.md §3.
#[derive(Clone, Debug)]
pub struct StoredFrame<W, I> {
    pub frame: Frame<W, I>,
    pub checksum: u64,
    pub is_snapshot: bool,
    pub confirmed: bool,
}

struct NamedSystem<W, I> {
    name: &'static str,
    callback: Box<dyn FnMut(&mut Frame<W, I>) -> Result<(), String>>,
}

/// Drives deterministic fixed-timestep simulation and serves rollback and
/// replay over a bounded ring of retained frames.
pub struct RollbackManager<W, I> {
    history: Vec<Option<StoredFrame<W, I>>>,
    input_buffer: VecDeque<(u64, I)>,
    systems: Vec<NamedSystem<W, I>>,
    pool: FramePool<Frame<W, I>>,
    config: RollbackConfig,

    current_frame: u64,
    oldest_frame: u64,
    last_confirmed_frame: u64,
    time_accumulator: f32,
    total_time: f64,
    current: Frame<W, I>,
}

impl<W, I> RollbackManager<W, I>
where
    W: WorldMeta + Clone,
    I: Clone + Default,
{
    pub fn new(world: W, input: I, config: RollbackConfig) -> Self {
        let frame0 = Frame {
            world,
            input,
            dt: 0.0,
            time: 0.0,
            frame_number: 0,
        };
        let checksum = weak_checksum(0, frame0.world.entity_count(), 0.0);
        let capacity = config.max_rollback_frames.max(1) as usize;
        let mut history = Vec::with_capacity(capacity);
        history.resize_with(capacity, || None);
        // Frame 0 is always a snapshot (spec.md §4.6).
        history[0] = Some(StoredFrame {
            frame: frame0.clone(),
            checksum,
            is_snapshot: true,
            confirmed: false,
        });

        Self {
            history,
            input_buffer: VecDeque::new(),
            systems: Vec::new(),
            pool: FramePool::with_capacity(capacity),
            config,
            current_frame: 0,
            oldest_frame: 0,
            last_confirmed_frame: 0,
            time_accumulator: 0.0,
            total_time: 0.0,
            current: frame0,
        }
    }

    pub fn add_system(
        &mut self,
        name: &'static str,
        callback: impl FnMut(&mut Frame<W, I>) -> Result<(), String> + 'static,
    ) {
        self.systems.push(NamedSystem {
            name,
            callback: Box::new(callback),
        });
    }

    pub fn clear_systems(&mut self) {
        self.systems.clear();
    }

    pub fn current_frame_number(&self) -> u64 {
        self.current_frame
    }

    pub fn oldest_frame(&self) -> u64 {
        self.oldest_frame
    }

    pub fn last_confirmed_frame(&self) -> u64 {
        self.last_confirmed_frame
    }

    pub fn world(&self) -> &W {
        &self.current.world
    }

    pub fn frame(&self) -> &Frame<W, I> {
        &self.current
    }

    pub fn can_rollback_to(&self, target: u64) -> bool {
        target >= self.oldest_frame && target <= self.current_frame
    }

    /// `time_accumulator / fixed_dt`, clamped to `[0, 1]`, for render
    /// interpolation only. Has no side effects (spec.md §4.7).
    pub fn interpolation_alpha(&self) -> f32 {
        (self.time_accumulator / self.config.fixed_dt()).clamp(0.0, 1.0)
    }

    fn slot(&self, frame_number: u64) -> usize {
        (frame_number % self.history.len() as u64) as usize
    }

    /// Variable-timestep pump (spec.md §4.7): accumulates `real_dt`, runs as
    /// many fixed `simulate_frame` ticks as have accrued, then trims the
    /// input ring.
    pub fn update(&mut self, real_dt: f32, input: I) -> Result<(), RollbackError> {
        self.time_accumulator += real_dt;
        let fixed_dt = self.config.fixed_dt();

        while self.time_accumulator >= fixed_dt {
            let produced_frame = self.current_frame + 1;
            self.input_buffer.push_back((produced_frame, input.clone()));
            self.simulate_frame(input.clone())?;
            self.time_accumulator -= fixed_dt;
        }

        let oldest = self.oldest_frame;
        while matches!(self.input_buffer.front(), Some((f, _)) if *f < oldest) {
            self.input_buffer.pop_front();
        }

        Ok(())
    }

    /// Advances exactly one fixed-timestep tick: applies `input`, runs every
    /// registered system in order, and saves the result into the ring
    /// (spec.md §4.7).
    pub fn simulate_frame(&mut self, input: I) -> Result<(), RollbackError> {
        let fixed_dt = self.config.fixed_dt();
        let next_frame = self.current_frame + 1;
        let next_time = next_frame as f64 * fixed_dt as f64;

        let mut candidate = self.current.clone();
        candidate.input = input;
        candidate.dt = fixed_dt;
        candidate.time = next_time;
        candidate.frame_number = next_frame;

        for system in &mut self.systems {
            if let Err(reason) = (system.callback)(&mut candidate) {
                warn!(system = system.name, frame = next_frame, %reason, "system failed, tick aborted");
                return Err(RollbackError::SystemFailed {
                    system: system.name,
                    frame: next_frame,
                    reason,
                });
            }
        }

        self.current_frame = next_frame;
        self.total_time = next_time;
        self.current.clone_from(&candidate);

        let checksum = weak_checksum(next_frame, candidate.world.entity_count(), next_time);
        let is_snapshot =
            next_frame == 0 || next_frame % self.config.snapshot_interval.max(1) as u64 == 0;

        let stored = self.pool.acquire_cloned(&candidate);

        let slot = self.slot(next_frame);
        if let Some(evicted) = self.history[slot].take() {
            self.pool.release(evicted.frame);
        }
        self.history[slot] = Some(StoredFrame {
            frame: stored,
            checksum,
            is_snapshot,
            confirmed: false,
        });

        // `oldest_frame` only ever advances. Replaying forward from a
        // snapshot during `rollback_to_frame` re-drives this same step for
        // frames below the previous `current_frame`; without the `max` a
        // replay target short of the ring's prior depth would walk
        // `oldest_frame` backward and falsely resurrect long-overwritten
        // slots as "retained" (spec.md §4.7 ring state machine).
        if self.current_frame >= self.history.len() as u64 {
            let floor = self.current_frame - self.history.len() as u64 + 1;
            self.oldest_frame = self.oldest_frame.max(floor);
        }

        trace!(frame = next_frame, is_snapshot, "tick simulated");
        Ok(())
    }

    fn input_for(&self, frame_number: u64) -> I {
        self.input_buffer
            .iter()
            .find(|(f, _)| *f == frame_number)
            .map(|(_, input)| input.clone())
            .unwrap_or_default()
    }

    /// Restores the ECS to the nearest snapshot at or below `target`, then
    /// replays recorded inputs forward to `target` (spec.md §4.7).
    pub fn rollback_to_frame(&mut self, target: u64) -> Result<(), RollbackError> {
        if target < self.oldest_frame || target > self.current_frame {
            return Err(RollbackError::FrameOutOfRange {
                target,
                oldest: self.oldest_frame,
                current: self.current_frame,
            });
        }

        let mut snapshot_frame = None;
        let mut f = target;
        loop {
            let slot = self.slot(f);
            if let Some(stored) = &self.history[slot] {
                if stored.frame.frame_number == f && stored.is_snapshot {
                    snapshot_frame = Some(f);
                    break;
                }
            }
            if f == self.oldest_frame {
                break;
            }
            f -= 1;
        }

        let snapshot_frame =
            snapshot_frame.ok_or(RollbackError::SnapshotNotFound { target })?;

        let slot = self.slot(snapshot_frame);
        let stored_frame = self.history[slot].as_ref().unwrap().frame.clone();
        self.current.clone_from(&stored_frame);
        self.current_frame = snapshot_frame;
        self.total_time = snapshot_frame as f64 * self.config.fixed_dt() as f64;

        trace!(target, snapshot_frame, "rolling back");

        for f in (snapshot_frame + 1)..=target {
            let input = self.input_for(f);
            self.simulate_frame(input)?;
        }

        Ok(())
    }

    /// Marks a retained frame confirmed by an external (e.g. network)
    /// authority. Does not itself trigger a rollback (spec.md §3, §4.7).
    pub fn confirm_frame(&mut self, frame_number: u64) {
        if frame_number < self.oldest_frame || frame_number > self.current_frame {
            return;
        }
        let slot = self.slot(frame_number);
        if let Some(stored) = self.history[slot].as_mut() {
            if stored.frame.frame_number == frame_number {
                stored.confirmed = true;
                self.last_confirmed_frame = self.last_confirmed_frame.max(frame_number);
            }
        }
    }

    /// Borrows a retained ring entry for inspection (tests, checksum
    /// comparisons, confirmation bookkeeping by the host).
    pub fn stored_frame(&self, frame_number: u64) -> Option<&StoredFrame<W, I>> {
        if frame_number < self.oldest_frame || frame_number > self.current_frame {
            return None;
        }
        self.history[self.slot(frame_number)]
            .as_ref()
            .filter(|s| s.frame.frame_number == frame_number)
    }
}
