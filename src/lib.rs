//! Keyra removes a chroma-key ("green screen") background from live video
//! frames in real time.
//!
//! The core is deliberately host-agnostic. It knows nothing about any UI
//! toolkit or refresh-timing mechanism; the host injects three capabilities
//! and forwards two events:
//!
//! - Implement [`FrameSource`], [`DisplaySurface`] and [`TickScheduler`]
//!   for the platform's video element, render surface and repaint callback.
//! - Forward the play event to [`KeySession::begin`] and every
//!   display-refresh callback to [`KeySession::tick`].
//!
//! Each tick samples the current video frame into a [`PixelBuffer`], zeroes
//! the alpha channel of every pixel matching the configured [`ChromaKey`],
//! writes the buffer back, and registers the next wake-up. The loop halts
//! by itself when playback stops.
#![forbid(unsafe_code)]

pub mod color;
pub mod error;
pub mod frame;
pub mod host;
pub mod key_cpu;
pub mod session;

pub use color::{ChromaKey, ColorSpace, Hsl, Rgb, rgb_to_hsl, similar_hsl, similar_rgb};
pub use error::{KeyraError, KeyraResult};
pub use frame::{PixelBuffer, SurfaceSize};
pub use host::{
    DisplaySurface, FrameSource, InMemorySurface, ManualScheduler, ScriptedPlayback,
    TickScheduler, TickToken,
};
pub use key_cpu::key_alpha_in_place;
pub use session::{KeySession, KeySessionOpts, KeyStats, SessionState, TickOutcome};
