use std::collections::VecDeque;

use crate::error::{KeyraError, KeyraResult};
use crate::frame::{PixelBuffer, SurfaceSize};

/// Read-only view of the external video playback collaborator.
///
/// The keyer never controls playback (start/stop/loop); it only observes
/// state and layout owned entirely by the host.
pub trait FrameSource {
    /// Whether playback is currently active (neither paused nor ended).
    fn is_playing(&self) -> bool;

    /// The rendered bounding box of the video in logical pixels, or `None`
    /// while the element has not been laid out yet.
    fn bounding_size(&self) -> Option<(f64, f64)>;
}

/// The display surface keyed frames are rendered to.
pub trait DisplaySurface {
    /// Resize the backing pixel store. The visible size is unaffected.
    fn set_pixel_size(&mut self, size: SurfaceSize) -> KeyraResult<()>;

    /// Copy the playback collaborator's current rendered frame into `dst`,
    /// scaled to the surface's pixel dimensions.
    ///
    /// Returns `Ok(false)` when no frame is available yet; `dst` is left
    /// untouched in that case.
    fn sample_into(&mut self, dst: &mut PixelBuffer) -> KeyraResult<bool>;

    /// Write a pixel buffer back to the visible surface.
    fn present(&mut self, frame: &PixelBuffer) -> KeyraResult<()>;

    /// Device pixel ratio divided by the backing-store scale factor.
    ///
    /// Hosts without a meaningful ratio keep the default of `1.0`.
    fn effective_pixel_ratio(&self) -> f64 {
        1.0
    }
}

/// Handle for one registered display-refresh wake-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickToken(pub u64);

/// Display-refresh scheduling capability provided by the host.
///
/// The host fires at most one wake-up per registration, at its next repaint.
/// Registration itself cannot fail; a host that is tearing down simply never
/// fires the wake-up.
pub trait TickScheduler {
    /// Register exactly one wake-up at the next display refresh.
    fn request_tick(&mut self) -> TickToken;

    /// Cancel a previously registered wake-up.
    fn cancel_tick(&mut self, token: TickToken);
}

/// Scriptable playback state for tests and debugging.
#[derive(Debug, Default)]
pub struct ScriptedPlayback {
    playing: bool,
    bounding: Option<(f64, f64)>,
}

impl ScriptedPlayback {
    /// Create a paused source with a known bounding box.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            playing: false,
            bounding: Some((width, height)),
        }
    }

    /// Flip the playing state.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Override the rendered bounding box (or unset it).
    pub fn set_bounding_size(&mut self, bounding: Option<(f64, f64)>) {
        self.bounding = bounding;
    }
}

impl FrameSource for ScriptedPlayback {
    fn is_playing(&self) -> bool {
        self.playing
    }

    fn bounding_size(&self) -> Option<(f64, f64)> {
        self.bounding
    }
}

/// In-memory display surface for tests and debugging.
///
/// Source frames are queued as raw RGBA8 bytes and served one per
/// [`DisplaySurface::sample_into`] call; presented buffers are captured in
/// order for inspection.
#[derive(Debug)]
pub struct InMemorySurface {
    pixel_ratio: f64,
    pixel_size: Option<SurfaceSize>,
    frames: VecDeque<Vec<u8>>,
    presented: Vec<PixelBuffer>,
}

impl InMemorySurface {
    /// Create a surface with pixel ratio `1.0`.
    pub fn new() -> Self {
        Self::with_pixel_ratio(1.0)
    }

    /// Create a surface reporting the given effective pixel ratio.
    pub fn with_pixel_ratio(pixel_ratio: f64) -> Self {
        Self {
            pixel_ratio,
            pixel_size: None,
            frames: VecDeque::new(),
            presented: Vec::new(),
        }
    }

    /// Queue raw RGBA8 bytes to be served by the next sample call.
    pub fn push_frame(&mut self, data: Vec<u8>) {
        self.frames.push_back(data);
    }

    /// The backing-store dimensions set by the keyer, if any.
    pub fn pixel_size(&self) -> Option<SurfaceSize> {
        self.pixel_size
    }

    /// Buffers presented so far, in order.
    pub fn presented(&self) -> &[PixelBuffer] {
        &self.presented
    }
}

impl Default for InMemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for InMemorySurface {
    fn set_pixel_size(&mut self, size: SurfaceSize) -> KeyraResult<()> {
        self.pixel_size = Some(size);
        Ok(())
    }

    fn sample_into(&mut self, dst: &mut PixelBuffer) -> KeyraResult<bool> {
        let Some(frame) = self.frames.pop_front() else {
            return Ok(false);
        };
        if frame.len() != dst.data.len() {
            return Err(KeyraError::surface(format!(
                "queued frame has {} bytes, surface buffer expects {}",
                frame.len(),
                dst.data.len()
            )));
        }
        dst.data.copy_from_slice(&frame);
        Ok(true)
    }

    fn present(&mut self, frame: &PixelBuffer) -> KeyraResult<()> {
        self.presented.push(frame.clone());
        Ok(())
    }

    fn effective_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }
}

/// Manually driven scheduler for tests and debugging.
///
/// Registered wake-ups accumulate until the test driver takes them and
/// invokes the session tick itself.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: VecDeque<TickToken>,
    canceled: Vec<TickToken>,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest registered wake-up, if any.
    pub fn take_pending(&mut self) -> Option<TickToken> {
        self.pending.pop_front()
    }

    /// Number of wake-ups currently registered.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Tokens canceled so far, in order.
    pub fn canceled(&self) -> &[TickToken] {
        &self.canceled
    }
}

impl TickScheduler for ManualScheduler {
    fn request_tick(&mut self) -> TickToken {
        let token = TickToken(self.next_id);
        self.next_id += 1;
        self.pending.push_back(token);
        token
    }

    fn cancel_tick(&mut self, token: TickToken) {
        if let Some(pos) = self.pending.iter().position(|t| *t == token) {
            self.pending.remove(pos);
            self.canceled.push(token);
        }
    }
}
