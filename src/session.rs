use crate::color::ChromaKey;
use crate::error::KeyraResult;
use crate::frame::{PixelBuffer, SurfaceSize};
use crate::host::{DisplaySurface, FrameSource, TickScheduler, TickToken};
use crate::key_cpu::key_alpha_in_place;

/// Options controlling a [`KeySession`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KeySessionOpts {
    /// Key target applied to every sampled frame.
    pub chroma: ChromaKey,
}

/// Lifecycle state of a keying session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No surface initialized. Entered at construction and after shutdown.
    #[default]
    Idle,
    /// Ticking with the display refresh.
    Running,
    /// Playback stopped; no further ticks until [`KeySession::begin`] runs
    /// again on the host's next play event.
    Stopped,
}

/// What a single display-refresh tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was sampled, keyed and presented; the next tick is scheduled.
    Keyed,
    /// Nothing new was rendered this tick; the next tick is still scheduled.
    Skipped,
    /// The loop is not running and did not reschedule itself.
    Stopped,
}

/// Per-session counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyStats {
    /// Ticks that entered the running loop (including the halting one).
    pub ticks: u64,
    /// Frames sampled, keyed and presented.
    pub frames_keyed: u64,
    /// Ticks that rendered nothing new (no frame, or a surface failure).
    pub frames_skipped: u64,
    /// Total pixels whose alpha was zeroed across all keyed frames.
    pub pixels_keyed: u64,
}

/// Continuously transforms live video frames into keyed output.
///
/// The session is an explicit state machine driven by the host: the host
/// forwards its play event to [`begin`](Self::begin) and its display-refresh
/// callback to [`tick`](Self::tick). Each tick samples the current frame,
/// zeroes the alpha of key-colored pixels, presents the result, and
/// registers the next wake-up. When playback is paused or ended the loop
/// performs no work and declines to reschedule; the host's next play event
/// re-enters the running state without re-initialization unless the surface
/// dimensions changed.
///
/// A tick that cannot sample or present renders nothing new and the loop
/// keeps going; per-tick host failures never propagate. Only
/// [`begin`](Self::begin) surfaces errors, since it is not on the
/// per-refresh path.
pub struct KeySession {
    opts: KeySessionOpts,
    state: SessionState,
    surface_size: Option<SurfaceSize>,
    buffer: PixelBuffer,
    pending: Option<TickToken>,
    stats: KeyStats,
}

impl KeySession {
    /// Create an idle session.
    pub fn new(opts: KeySessionOpts) -> Self {
        Self {
            opts,
            state: SessionState::Idle,
            surface_size: None,
            buffer: PixelBuffer::default(),
            pending: None,
            stats: KeyStats::default(),
        }
    }

    /// Handle the playback-start notification.
    ///
    /// Sizes the surface's backing store from the video's rendered bounding
    /// box scaled by the effective pixel ratio, transitions to
    /// [`SessionState::Running`], and registers the first tick. If the
    /// bounding box is not available yet this is a logged no-op and the
    /// session stays idle.
    #[tracing::instrument(skip_all)]
    pub fn begin(
        &mut self,
        source: &dyn FrameSource,
        surface: &mut dyn DisplaySurface,
        scheduler: &mut dyn TickScheduler,
    ) -> KeyraResult<()> {
        let Some((width, height)) = source.bounding_size() else {
            tracing::debug!("playback started before layout; staying idle");
            return Ok(());
        };

        let size = SurfaceSize::from_logical(width, height, surface.effective_pixel_ratio());
        if self.surface_size != Some(size) {
            surface.set_pixel_size(size)?;
            self.buffer.resize(size);
            self.surface_size = Some(size);
            tracing::debug!(width = size.width, height = size.height, "surface sized");
        }

        self.state = SessionState::Running;
        if self.pending.is_none() {
            self.pending = Some(scheduler.request_tick());
        }
        Ok(())
    }

    /// Run one display-refresh callback.
    ///
    /// Checks playback state first: when playback is inactive the tick does
    /// no work and does not reschedule, leaving the last presented frame in
    /// place. Otherwise the current frame is sampled, keyed, presented, and
    /// the next wake-up registered — a sampling or presenting failure skips
    /// the frame but still reschedules.
    #[tracing::instrument(skip_all)]
    pub fn tick(
        &mut self,
        source: &dyn FrameSource,
        surface: &mut dyn DisplaySurface,
        scheduler: &mut dyn TickScheduler,
    ) -> TickOutcome {
        // The wake-up that fired is consumed regardless of what happens next.
        self.pending = None;

        if self.state != SessionState::Running {
            return TickOutcome::Stopped;
        }
        self.stats.ticks += 1;

        if !source.is_playing() {
            tracing::debug!("playback inactive; halting tick loop");
            self.state = SessionState::Stopped;
            return TickOutcome::Stopped;
        }

        let outcome = match self.sample_and_key(surface) {
            Ok(Some(pixels)) => {
                self.stats.frames_keyed += 1;
                self.stats.pixels_keyed += pixels;
                TickOutcome::Keyed
            }
            Ok(None) => {
                tracing::debug!("no frame available this tick");
                self.stats.frames_skipped += 1;
                TickOutcome::Skipped
            }
            Err(err) => {
                tracing::warn!(%err, "tick skipped after surface failure");
                self.stats.frames_skipped += 1;
                TickOutcome::Skipped
            }
        };

        self.pending = Some(scheduler.request_tick());
        outcome
    }

    /// Tear the session down, canceling any registered wake-up.
    ///
    /// The next [`begin`](Self::begin) re-initializes sizing from scratch.
    pub fn shutdown(&mut self, scheduler: &mut dyn TickScheduler) {
        if let Some(token) = self.pending.take() {
            scheduler.cancel_tick(token);
        }
        self.state = SessionState::Idle;
        self.surface_size = None;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Counters accumulated since construction.
    pub fn stats(&self) -> KeyStats {
        self.stats
    }

    /// Backing-store dimensions from the last initialization, if any.
    pub fn surface_size(&self) -> Option<SurfaceSize> {
        self.surface_size
    }

    fn sample_and_key(&mut self, surface: &mut dyn DisplaySurface) -> KeyraResult<Option<u64>> {
        if !surface.sample_into(&mut self.buffer)? {
            return Ok(None);
        }
        let pixels = key_alpha_in_place(&mut self.buffer.data, &self.opts.chroma)?;
        surface.present(&self.buffer)?;
        Ok(Some(pixels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{InMemorySurface, ManualScheduler, ScriptedPlayback};

    #[test]
    fn begin_without_layout_stays_idle() {
        let mut session = KeySession::new(KeySessionOpts::default());
        let mut source = ScriptedPlayback::default();
        source.set_playing(true);
        let mut surface = InMemorySurface::new();
        let mut sched = ManualScheduler::new();

        session.begin(&source, &mut surface, &mut sched).unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(sched.pending_count(), 0);
        assert_eq!(surface.pixel_size(), None);
    }

    #[test]
    fn tick_before_begin_declines() {
        let mut session = KeySession::new(KeySessionOpts::default());
        let source = ScriptedPlayback::new(2.0, 2.0);
        let mut surface = InMemorySurface::new();
        let mut sched = ManualScheduler::new();

        let outcome = session.tick(&source, &mut surface, &mut sched);
        assert_eq!(outcome, TickOutcome::Stopped);
        assert_eq!(sched.pending_count(), 0);
        assert_eq!(session.stats(), KeyStats::default());
    }

    #[test]
    fn begin_twice_registers_a_single_wakeup() {
        let mut session = KeySession::new(KeySessionOpts::default());
        let mut source = ScriptedPlayback::new(2.0, 2.0);
        source.set_playing(true);
        let mut surface = InMemorySurface::new();
        let mut sched = ManualScheduler::new();

        session.begin(&source, &mut surface, &mut sched).unwrap();
        session.begin(&source, &mut surface, &mut sched).unwrap();
        assert_eq!(sched.pending_count(), 1);
    }

    #[test]
    fn surface_failure_skips_but_reschedules() {
        let mut session = KeySession::new(KeySessionOpts::default());
        let mut source = ScriptedPlayback::new(2.0, 1.0);
        source.set_playing(true);
        let mut surface = InMemorySurface::new();
        let mut sched = ManualScheduler::new();
        session.begin(&source, &mut surface, &mut sched).unwrap();
        sched.take_pending().unwrap();

        // Wrong-sized frame makes sampling fail.
        surface.push_frame(vec![0; 4]);
        let outcome = session.tick(&source, &mut surface, &mut sched);
        assert_eq!(outcome, TickOutcome::Skipped);
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(sched.pending_count(), 1);
        assert_eq!(session.stats().frames_skipped, 1);
        assert!(surface.presented().is_empty());
    }
}
