//! Segue - Gapless Playback Management
//!
//! Platform-agnostic queue and player-pool management for gapless audio
//! playback.
//!
//! This crate provides:
//! - Playlist queue with history, bounded look-ahead and a draw pool
//! - Sequential or shuffled draw (uniform, without replacement)
//! - Partial-match bulk removal over track metadata
//! - A ring of playback-engine slots (`2 * seek + 1`) cycled in lockstep
//!   with the queue, so upcoming tracks are already primed when they
//!   become audible
//! - Crossfaded slot switching with stale-completion detection
//! - Mutation notification: one tag per externally visible queue change
//!
//! # Architecture
//!
//! `segue-playback` is completely platform-agnostic: audio hardware,
//! media-element setup and gain-curve scheduling live behind the
//! [`PlaybackEngine`] trait, provided per slot by the embedding
//! application. Everything here is single-threaded and synchronous; the
//! only deferred element is the engine-side gain ramp, whose completion is
//! fed back through [`PlayerPool::complete_fade`] and checked against a
//! per-slot generation so a superseded fade can never pause a slot that
//! has since been reused.
//!
//! # Example
//!
//! ```rust
//! use segue_playback::{NewTrack, PlaybackEngine, Player, PlayerConfig, Result};
//!
//! // Implement PlaybackEngine for your platform
//! struct SilentEngine;
//!
//! impl PlaybackEngine for SilentEngine {
//!     fn set_source(&mut self, _src: Option<&str>) {}
//!     fn play(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!     fn pause(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!     fn seek_to_start(&mut self) {}
//!     fn set_gain(&mut self, _gain: f32) {}
//!     fn schedule_gain_ramp(&mut self, _target: f32, _duration_ms: u32) {}
//! }
//!
//! // One engine per ring slot
//! let mut player = Player::new(PlayerConfig::default(), Box::new(|| Box::new(SilentEngine)));
//!
//! player.push(NewTrack::new("https://cdn.example/one.mp3"));
//! player.push(NewTrack::new("https://cdn.example/two.mp3"));
//!
//! assert_eq!(player.current().unwrap().src, "https://cdn.example/one.mp3");
//! assert!(player.is_playing());
//!
//! player.next();
//! assert_eq!(player.current().unwrap().src, "https://cdn.example/two.mp3");
//! ```
//!
//! # Example: shuffle and look-ahead
//!
//! ```rust
//! use segue_playback::{NewTrack, PlaybackQueue};
//!
//! let mut queue = PlaybackQueue::new();
//! queue.push_many((1..=20).map(|n| NewTrack::new(format!("/m/{n}.flac"))).collect());
//!
//! queue.set_shuffle(true);
//! queue.set_seek_length(5);
//! assert!(queue.seek().ahead.len() <= 5);
//! ```

mod engine;
mod error;
mod events;
mod filter;
mod player;
mod pool;
mod queue;
mod shuffle;
pub mod types;

// Public exports
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::QueueMutation;
pub use filter::TrackFilter;
pub use player::Player;
pub use pool::{EngineFactory, FadeDirection, FadeTicket, PlayerPool};
pub use queue::{MutationCallback, PlaybackQueue, DEFAULT_SEEK_LENGTH};
pub use types::{NewTrack, PlayerConfig, SeekView, Track};
