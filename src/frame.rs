//! `Frame` (world + tick metadata) and the `Ecs` container that owns the
//! current frame and exposes `update`/`save_frame`/`restore_frame`
//! (spec.md §4.5).

/// One simulation tick: a world plus the metadata describing how it got
/// there. `I` is the host's plain Input value type (spec.md §6); it is
/// copied into every produced frame and is never inspected by the core.
#[derive(Debug, Default)]
pub struct Frame<W, I> {
    pub world: W,
    pub input: I,
    pub dt: f32,
    pub time: f64,
    pub frame_number: u64,
}

impl<W: Clone, I: Clone> Clone for Frame<W, I> {
    fn clone(&self) -> Self {
        Self {
            world: self.world.clone(),
            input: self.input.clone(),
            dt: self.dt,
            time: self.time,
            frame_number: self.frame_number,
        }
    }

    /// Recurses into `W::clone_from` so a world's pooled `Vec` buffers are
    /// reused rather than reallocated (see [`crate::pool::FramePool`]).
    fn clone_from(&mut self, source: &Self) {
        self.world.clone_from(&source.world);
        self.input.clone_from(&source.input);
        self.dt = source.dt;
        self.time = source.time;
        self.frame_number = source.frame_number;
    }
}

impl<W, I> Frame<W, I> {
    pub fn new(world: W, input: I) -> Self
    where
        I: Default,
    {
        Self {
            world,
            input,
            dt: 0.0,
            time: 0.0,
            frame_number: 0,
        }
    }
}

/// Owns the current `Frame` and performs no simulation of its own — system
/// callbacks belong to the `RollbackManager` or to the host (spec.md §4.5).
#[derive(Clone, Debug, Default)]
pub struct Ecs<W, I> {
    frame: Frame<W, I>,
}

impl<W, I> Ecs<W, I> {
    pub fn new(world: W, input: I) -> Self
    where
        I: Default,
    {
        Self {
            frame: Frame::new(world, input),
        }
    }

    pub fn frame(&self) -> &Frame<W, I> {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut Frame<W, I> {
        &mut self.frame
    }

    pub fn world(&self) -> &W {
        &self.frame.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.frame.world
    }

    /// Sets the frame's input/dt/time and increments `frame_number`. Runs no
    /// systems; those are invoked by the caller (spec.md §4.5).
    pub fn update(&mut self, input: I, dt: f32, time: f64) {
        self.frame.input = input;
        self.frame.dt = dt;
        self.frame.time = time;
        self.frame.frame_number += 1;
    }

    /// Deep-copies the current frame. The returned value owns independent
    /// memory and must eventually be disposed via [`free_saved_frame`] (in
    /// Rust this is just ordinary `Drop`, but the function is kept to mirror
    /// the explicit disposal step in spec.md §4.5/§5 and because
    /// `RollbackManager` overrides it to recycle buffers through a
    /// [`crate::pool::FramePool`] instead of freeing them outright).
    pub fn save_frame(&self) -> Frame<W, I>
    where
        W: Clone,
        I: Clone,
    {
        self.frame.clone()
    }

    /// Overwrites the current frame from `src`. Afterward the public API is
    /// indistinguishable from `src`'s state at the point it was saved
    /// (spec.md §4.5 post-condition, tested as Scenario C in spec.md §8).
    pub fn restore_frame(&mut self, src: &Frame<W, I>)
    where
        W: Clone,
        I: Clone,
    {
        self.frame.clone_from(src);
    }
}

/// Disposes a saved frame. A plain `drop` in Rust; kept as a named function
/// so call sites read the same as the source contract (spec.md §4.5).
pub fn free_saved_frame<F>(frame: F) {
    drop(frame);
}
