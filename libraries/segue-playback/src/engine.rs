//! Platform-agnostic playback-engine trait
//!
//! Abstracts one playback engine (an HTML media element behind a gain node,
//! a rodio sink, ...) as consumed by the player pool. The pool owns a ring
//! of these and only ever issues the commands below; everything else about
//! the platform (context setup, CORS, volume curves) stays on the other
//! side of the trait.

use crate::error::Result;

/// One playback engine slot's command surface
///
/// All calls are synchronous. `schedule_gain_ramp` is fire-and-forget from
/// the pool's perspective: the platform runs the ramp on its own clock and
/// reports completion back through
/// [`PlayerPool::complete_fade`](crate::PlayerPool::complete_fade) with the
/// ticket captured at schedule time.
pub trait PlaybackEngine {
    /// Bind or clear the engine's source URI
    ///
    /// Rebinding implies a reset to the start of the new source.
    fn set_source(&mut self, src: Option<&str>);

    /// Begin playback
    ///
    /// May be rejected by the platform (autoplay policy, device loss); the
    /// pool logs and absorbs the rejection.
    fn play(&mut self) -> Result<()>;

    /// Halt playback, keeping position
    fn pause(&mut self) -> Result<()>;

    /// Rewind to the start of the bound source
    fn seek_to_start(&mut self);

    /// Set gain immediately
    fn set_gain(&mut self, gain: f32);

    /// Schedule a gain ramp toward `target` over `duration_ms`
    fn schedule_gain_ramp(&mut self, target: f32, duration_ms: u32);
}
