//! Gapless playback queue
//!
//! Four containers model the playlist around the playhead:
//!
//! ```text
//! history (oldest first)      current       look-ahead        pool
//! [ t1, t2, t3, ... tK ]      [ tX ]    [ n1, n2, ... nS ]   { reservoir }
//!        <- prev()                          next() ->
//! ```
//!
//! The look-ahead window is bounded by the seek length and is what the
//! player pool prefetches from; the pool map is the unordered reservoir
//! future tracks are drawn from, sequentially or shuffled. After every
//! public mutation the queue *settles*: the look-ahead is refilled (or
//! shrunk) and an empty `current` is repopulated whenever material exists.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use crate::events::QueueMutation;
use crate::filter::TrackFilter;
use crate::shuffle;
use crate::types::{NewTrack, SeekView, Track};

/// Default look-ahead length
pub const DEFAULT_SEEK_LENGTH: usize = 3;

/// Single-consumer mutation hook
///
/// Receives the tag plus a read view of the already-settled queue, so the
/// consumer can inspect the new state directly. Rebinding replaces the
/// previous consumer; there is no subscription list.
pub type MutationCallback = Box<dyn FnMut(QueueMutation, &PlaybackQueue)>;

/// Playlist queue with history, bounded look-ahead and a draw pool
pub struct PlaybackQueue {
    /// Played tracks, oldest first
    history: Vec<Track>,

    /// The track under the playhead
    current: Option<Track>,

    /// Bound on the look-ahead window length
    seek_size: usize,

    /// Upcoming tracks, front = next to play, never longer than `seek_size`
    lookahead: VecDeque<Track>,

    /// Reservoir of tracks not yet placed anywhere else. Keys are strictly
    /// increasing, so iteration order equals insertion order.
    pool: BTreeMap<u64, Track>,

    /// Draw randomly from the pool instead of in insertion order
    shuffle: bool,

    /// Last key handed out; keys start at 1 and are never reused
    key_counter: u64,

    on_mutation: Option<MutationCallback>,
}

impl PlaybackQueue {
    /// Create an empty queue with the default seek length
    pub fn new() -> Self {
        Self::with_seek_length(DEFAULT_SEEK_LENGTH)
    }

    /// Create an empty queue with a specific seek length
    pub fn with_seek_length(seek_size: usize) -> Self {
        Self {
            history: Vec::new(),
            current: None,
            seek_size,
            lookahead: VecDeque::new(),
            pool: BTreeMap::new(),
            shuffle: false,
            key_counter: 0,
            on_mutation: None,
        }
    }

    // ===== Mutation notification =====

    /// Bind the mutation consumer, replacing any previous one
    pub fn set_mutation_callback(&mut self, callback: MutationCallback) {
        self.on_mutation = Some(callback);
    }

    /// Drop the mutation consumer
    pub fn clear_mutation_callback(&mut self) {
        self.on_mutation = None;
    }

    /// Fire the hook once. The callback is taken out for the duration of
    /// the call so it can be handed `&self` without aliasing.
    fn notify(&mut self, tag: QueueMutation) {
        if let Some(mut callback) = self.on_mutation.take() {
            callback(tag, self);
            self.on_mutation = Some(callback);
        }
    }

    fn settle_and_notify(&mut self, tag: QueueMutation) {
        self.refresh();
        self.notify(tag);
    }

    // ===== Insertion =====

    fn next_key(&mut self) -> u64 {
        self.key_counter += 1;
        self.key_counter
    }

    /// Append a track to the pool, returning its assigned key
    pub fn push(&mut self, track: NewTrack) -> u64 {
        let key = self.next_key();
        self.pool.insert(
            key,
            Track {
                key,
                src: track.src,
                data: track.data,
            },
        );
        self.settle_and_notify(QueueMutation::Push);
        key
    }

    /// Append several tracks to the pool, returning them with keys assigned
    ///
    /// Keys are sequential in input order. An empty input is a no-op.
    pub fn push_many(&mut self, tracks: Vec<NewTrack>) -> Vec<Track> {
        if tracks.is_empty() {
            return Vec::new();
        }
        let mut assigned = Vec::with_capacity(tracks.len());
        for track in tracks {
            let key = self.next_key();
            let track = Track {
                key,
                src: track.src,
                data: track.data,
            };
            assigned.push(track.clone());
            self.pool.insert(key, track);
        }
        self.settle_and_notify(QueueMutation::PushMany);
        assigned
    }

    /// Insert a track at the front of the look-ahead window
    ///
    /// Bypasses the pool and the shuffle draw: the track plays next no
    /// matter what. With a seek length of 0 the look-ahead is empty by
    /// definition, so the settle step moves the track into the pool
    /// instead.
    pub fn add_next(&mut self, track: NewTrack) -> u64 {
        let key = self.next_key();
        self.lookahead.push_front(Track {
            key,
            src: track.src,
            data: track.data,
        });
        self.settle_and_notify(QueueMutation::AddNext);
        key
    }

    // ===== Removal =====

    /// Remove the most recently queued material
    ///
    /// Preference order: the pool entry last in iteration order, else the
    /// look-ahead tail, else `current` itself. Returns the removed key, or
    /// -1 when the queue is fully empty (a silent no-op).
    pub fn pop(&mut self) -> i64 {
        let removed = if let Some((key, _)) = self.pool.pop_last() {
            key
        } else if let Some(track) = self.lookahead.pop_back() {
            track.key
        } else if let Some(track) = self.current.take() {
            track.key
        } else {
            return -1;
        };
        self.settle_and_notify(QueueMutation::Pop);
        removed as i64
    }

    /// Remove every track matching the filter
    ///
    /// Sweeps history (oldest first), then `current`, then the look-ahead
    /// (front to back), then the pool (iteration order); the returned keys
    /// follow that removal order. Zero matches is a silent no-op. A removed
    /// `current` is replaced by the settle step when material remains.
    pub fn remove(&mut self, filter: &TrackFilter) -> Vec<u64> {
        let mut removed = Vec::new();

        self.history.retain(|track| {
            if filter.matches(track) {
                removed.push(track.key);
                false
            } else {
                true
            }
        });
        if self.current.as_ref().is_some_and(|t| filter.matches(t)) {
            if let Some(track) = self.current.take() {
                removed.push(track.key);
            }
        }
        self.lookahead.retain(|track| {
            if filter.matches(track) {
                removed.push(track.key);
                false
            } else {
                true
            }
        });
        self.pool.retain(|_, track| {
            if filter.matches(track) {
                removed.push(track.key);
                false
            } else {
                true
            }
        });

        if !removed.is_empty() {
            self.settle_and_notify(QueueMutation::Remove);
        }
        removed
    }

    /// Empty all containers and reset the key counter
    pub fn clear(&mut self) {
        if self.is_empty() && self.key_counter == 0 {
            return;
        }
        self.history.clear();
        self.current = None;
        self.lookahead.clear();
        self.pool.clear();
        self.key_counter = 0;
        self.settle_and_notify(QueueMutation::Clear);
    }

    // ===== Navigation =====

    /// Advance to the next track
    ///
    /// The current track moves to the history tail, the look-ahead front
    /// (or, with a seek length of 0, a direct pool draw) becomes current,
    /// and the look-ahead is backfilled. Returns the new current track, or
    /// `None` when there is nothing to advance to (silent no-op).
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Track> {
        if self.lookahead.is_empty() && self.pool.is_empty() {
            return None;
        }
        if let Some(track) = self.current.take() {
            self.history.push(track);
        }
        if self.seek_size == 0 {
            self.current = self.draw_from_pool();
        } else {
            self.current = self.lookahead.pop_front();
        }
        self.settle_and_notify(QueueMutation::Next);
        self.current.clone()
    }

    /// Retreat to the previous track
    ///
    /// The current track returns to the look-ahead front and the history
    /// tail becomes current; a look-ahead overflow is evicted back into the
    /// pool by the settle step. Returns the new current track, or `None`
    /// when history is empty (silent no-op).
    pub fn prev(&mut self) -> Option<Track> {
        let track = self.history.pop()?;
        if let Some(current) = self.current.take() {
            self.lookahead.push_front(current);
        }
        self.current = Some(track);
        self.settle_and_notify(QueueMutation::Prev);
        self.current.clone()
    }

    /// Return every track to the pool, keeping keys
    ///
    /// The settle step immediately re-draws a fresh current and look-ahead.
    pub fn reset(&mut self) {
        if self.history.is_empty() && self.current.is_none() && self.lookahead.is_empty() {
            return;
        }
        for track in self.history.drain(..) {
            self.pool.insert(track.key, track);
        }
        if let Some(track) = self.current.take() {
            self.pool.insert(track.key, track);
        }
        for track in self.lookahead.drain(..) {
            self.pool.insert(track.key, track);
        }
        self.settle_and_notify(QueueMutation::Reset);
    }

    // ===== Seek length & shuffle =====

    /// Look-ahead length
    pub fn seek_length(&self) -> usize {
        self.seek_size
    }

    /// Change the look-ahead length; the settle step grows or shrinks the
    /// window to match. Setting the current value is a silent no-op.
    pub fn set_seek_length(&mut self, length: usize) {
        if length == self.seek_size {
            return;
        }
        self.seek_size = length;
        self.settle_and_notify(QueueMutation::SeekLength);
    }

    /// Reset the look-ahead length to [`DEFAULT_SEEK_LENGTH`]
    pub fn set_default_seek_length(&mut self) {
        if self.seek_size == DEFAULT_SEEK_LENGTH {
            return;
        }
        self.seek_size = DEFAULT_SEEK_LENGTH;
        self.settle_and_notify(QueueMutation::SetDefaultSeekLength);
    }

    /// Whether the pool draw is randomized
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Toggle shuffle
    ///
    /// On change the look-ahead is flushed back into the pool before
    /// re-settling: the pre-drawn window reflects the old draw policy.
    pub fn set_shuffle(&mut self, enabled: bool) {
        if self.shuffle == enabled {
            return;
        }
        self.shuffle = enabled;
        for track in self.lookahead.drain(..) {
            self.pool.insert(track.key, track);
        }
        self.settle_and_notify(QueueMutation::Shuffle);
    }

    // ===== Reads =====

    /// The current track, settling lazily when empty
    ///
    /// A read can therefore never observe a stale gap between mutations.
    pub fn current(&mut self) -> Option<&Track> {
        if self.current.is_none() {
            self.refresh();
        }
        self.current.as_ref()
    }

    /// The current track without settling
    ///
    /// Accurate whenever the queue is settled, i.e. after any public
    /// mutation has returned.
    pub fn peek_current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Paired look-ahead / look-behind view
    ///
    /// `ahead` is the look-ahead front-to-back; `behind` is the last
    /// `seek_length` history entries in oldest-first order.
    pub fn seek(&self) -> SeekView<'_> {
        let behind_start = self.history.len().saturating_sub(self.seek_size);
        SeekView {
            ahead: self.lookahead.iter().collect(),
            behind: self.history[behind_start..].iter().collect(),
        }
    }

    /// Played tracks, oldest first
    pub fn history(&self) -> &[Track] {
        &self.history
    }

    /// Number of tracks waiting in the pool
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Number of tracks in the look-ahead window
    pub fn lookahead_len(&self) -> usize {
        self.lookahead.len()
    }

    /// Total number of tracks across all containers
    pub fn len(&self) -> usize {
        self.history.len()
            + usize::from(self.current.is_some())
            + self.lookahead.len()
            + self.pool.len()
    }

    /// Whether the queue holds no tracks at all
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
            && self.current.is_none()
            && self.lookahead.is_empty()
            && self.pool.is_empty()
    }

    // ===== Settling =====

    /// Restore the settle invariant
    ///
    /// 1. Look-ahead overflow returns to the pool (trailing entries first).
    /// 2. A look-ahead deficit is filled from the pool: in iteration order,
    ///    or by uniform draw without replacement when shuffle is on.
    /// 3. With a positive seek length and a still-empty look-ahead there is
    ///    nothing left to settle.
    /// 4. An empty `current` is repopulated: straight from the pool when the
    ///    seek length is 0, otherwise from the look-ahead front, after which
    ///    the window is backfilled again.
    fn refresh(&mut self) {
        while self.lookahead.len() > self.seek_size {
            if let Some(track) = self.lookahead.pop_back() {
                self.pool.insert(track.key, track);
            }
        }
        self.fill_lookahead();

        if self.current.is_none() {
            if self.seek_size == 0 {
                self.current = self.draw_from_pool();
            } else if let Some(track) = self.lookahead.pop_front() {
                self.current = Some(track);
                self.fill_lookahead();
            }
        }
    }

    /// Top the look-ahead up to the seek length from the pool
    fn fill_lookahead(&mut self) {
        let deficit = self.seek_size.saturating_sub(self.lookahead.len());
        if deficit == 0 || self.pool.is_empty() {
            return;
        }
        if self.shuffle {
            let keys: Vec<u64> = self.pool.keys().copied().collect();
            for key in shuffle::draw_keys(keys, deficit) {
                if let Some(track) = self.pool.remove(&key) {
                    self.lookahead.push_back(track);
                }
            }
        } else {
            for _ in 0..deficit {
                match self.pool.pop_first() {
                    Some((_, track)) => self.lookahead.push_back(track),
                    None => break,
                }
            }
        }
    }

    /// Take one track from the pool: random under shuffle, first otherwise
    fn draw_from_pool(&mut self) -> Option<Track> {
        let key = if self.shuffle {
            let keys: Vec<u64> = self.pool.keys().copied().collect();
            shuffle::pick_key(&keys)?
        } else {
            self.pool.keys().next().copied()?
        };
        self.pool.remove(&key)
    }
}

impl Default for PlaybackQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlaybackQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackQueue")
            .field("history", &self.history)
            .field("current", &self.current)
            .field("lookahead", &self.lookahead)
            .field("pool", &self.pool)
            .field("seek_size", &self.seek_size)
            .field("shuffle", &self.shuffle)
            .field("key_counter", &self.key_counter)
            .finish_non_exhaustive()
    }
}
