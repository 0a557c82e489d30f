//! Core types for queue and player-pool management

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A queued track
///
/// Immutable once created; leaves the queue only through explicit removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique key, assigned at insertion, strictly increasing, never reused
    pub key: u64,

    /// Source URI handed to playback engines
    pub src: String,

    /// Opaque caller-supplied metadata (any JSON value, objects expected)
    pub data: Value,
}

/// Track data prior to key assignment
///
/// What callers hand to [`push`](crate::PlaybackQueue::push) and friends;
/// the queue turns it into a [`Track`] by assigning the next key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrack {
    /// Source URI
    pub src: String,

    /// Opaque metadata
    pub data: Value,
}

impl NewTrack {
    /// Create track data with no metadata
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            data: Value::Null,
        }
    }

    /// Create track data with metadata
    pub fn with_data(src: impl Into<String>, data: Value) -> Self {
        Self {
            src: src.into(),
            data,
        }
    }
}

/// Paired look-ahead / look-behind view of the queue
///
/// `ahead` is the look-ahead window front-to-back (nearest upcoming track
/// first); `behind` is the most recent slice of history in oldest-first
/// order (so the track `prev()` would return to sits at the back).
#[derive(Debug, Clone, PartialEq)]
pub struct SeekView<'a> {
    /// Upcoming tracks, at most `seek_length` of them
    pub ahead: Vec<&'a Track>,

    /// Recently played tracks, at most `seek_length` of them
    pub behind: Vec<&'a Track>,
}

/// Configuration for the player pool
///
/// All values are clamped to their documented ranges by
/// [`sanitized`](PlayerConfig::sanitized); out-of-range input never panics
/// and never propagates past construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Base playback gain (0.0-1.0, or up to 2.0 with `allow_gain_boost`;
    /// default 1.0)
    pub gain: f32,

    /// Step applied by `gain_up`/`gain_down` (0.0-1.0, default 0.1)
    pub gain_delta: f32,

    /// Permit gain above unity (default false)
    pub allow_gain_boost: bool,

    /// Crossfade when the current track switches (default true)
    pub crossfade: bool,

    /// Crossfade duration in milliseconds (default 1000, max 60000)
    pub crossfade_ms: u32,

    /// Ride plain gain changes on a short ramp instead of stepping
    /// (default true)
    pub smooth_gain: bool,

    /// Smooth-gain ramp duration in milliseconds (default 100, max 60000)
    pub smooth_gain_ms: u32,

    /// Assign sources to the look-ahead/behind slots (default true)
    pub prefetch: bool,

    /// Tracks prefetched each way; mirrors the queue's default seek length
    /// (default 3)
    pub prefetch_size: usize,
}

impl PlayerConfig {
    /// Default crossfade duration in milliseconds
    pub const DEFAULT_CROSSFADE_MS: u32 = 1000;

    /// Default smooth-gain ramp duration in milliseconds
    pub const DEFAULT_SMOOTH_GAIN_MS: u32 = 100;

    /// Default gain step
    pub const DEFAULT_GAIN_DELTA: f32 = 0.1;

    /// Default prefetch width
    pub const DEFAULT_PREFETCH_SIZE: usize = 3;

    /// Upper bound for fade durations
    const MAX_FADE_MS: u32 = 60_000;

    /// Maximum gain permitted under the current boost setting
    pub fn max_gain(&self) -> f32 {
        if self.allow_gain_boost {
            2.0
        } else {
            1.0
        }
    }

    /// Return a copy with every field clamped to its documented range
    pub fn sanitized(mut self) -> Self {
        if !self.gain.is_finite() {
            self.gain = 1.0;
        }
        self.gain = self.gain.clamp(0.0, self.max_gain());

        if !self.gain_delta.is_finite() {
            self.gain_delta = Self::DEFAULT_GAIN_DELTA;
        }
        self.gain_delta = self.gain_delta.clamp(0.0, 1.0);

        self.crossfade_ms = self.crossfade_ms.min(Self::MAX_FADE_MS);
        self.smooth_gain_ms = self.smooth_gain_ms.min(Self::MAX_FADE_MS);
        self
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            gain: 1.0,
            gain_delta: Self::DEFAULT_GAIN_DELTA,
            allow_gain_boost: false,
            crossfade: true,
            crossfade_ms: Self::DEFAULT_CROSSFADE_MS,
            smooth_gain: true,
            smooth_gain_ms: Self::DEFAULT_SMOOTH_GAIN_MS,
            prefetch: true,
            prefetch_size: Self::DEFAULT_PREFETCH_SIZE,
        }
    }
}
