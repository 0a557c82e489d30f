//! Player facade wiring the queue to the player pool
//!
//! The composition root constructs exactly one [`Player`] and passes it
//! around by reference; there is no process-wide singleton. Internally the
//! queue's mutation hook drives [`PlayerPool::handle_mutation`], so every
//! queue operation called through (or around) the facade keeps the engine
//! ring synchronized automatically.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::engine::PlaybackEngine;
use crate::filter::TrackFilter;
use crate::pool::{EngineFactory, FadeTicket, PlayerPool};
use crate::queue::PlaybackQueue;
use crate::types::{NewTrack, PlayerConfig, SeekView, Track};

/// Queue plus engine ring behind one handle
pub struct Player {
    queue: PlaybackQueue,
    pool: Rc<RefCell<PlayerPool>>,
}

impl Player {
    /// Create a player; `factory` builds one engine per ring slot
    pub fn new(config: PlayerConfig, factory: EngineFactory) -> Self {
        let config = config.sanitized();
        let mut queue = PlaybackQueue::with_seek_length(config.prefetch_size);
        let pool = Rc::new(RefCell::new(PlayerPool::new(config, factory)));

        let hook = Rc::clone(&pool);
        queue.set_mutation_callback(Box::new(move |tag, queue| {
            hook.borrow_mut().handle_mutation(tag, queue);
        }));

        Self { queue, pool }
    }

    /// Create a player with default configuration
    pub fn with_engines(factory: EngineFactory) -> Self {
        Self::new(PlayerConfig::default(), factory)
    }

    // ===== Queue surface =====

    /// Append a track; see [`PlaybackQueue::push`]
    pub fn push(&mut self, track: NewTrack) -> u64 {
        self.queue.push(track)
    }

    /// Append several tracks; see [`PlaybackQueue::push_many`]
    pub fn push_many(&mut self, tracks: Vec<NewTrack>) -> Vec<Track> {
        self.queue.push_many(tracks)
    }

    /// Queue a track to play next; see [`PlaybackQueue::add_next`]
    pub fn add_next(&mut self, track: NewTrack) -> u64 {
        self.queue.add_next(track)
    }

    /// Remove the most recently queued track; see [`PlaybackQueue::pop`]
    pub fn pop(&mut self) -> i64 {
        self.queue.pop()
    }

    /// Remove matching tracks; see [`PlaybackQueue::remove`]
    pub fn remove(&mut self, filter: &TrackFilter) -> Vec<u64> {
        self.queue.remove(filter)
    }

    /// Drop everything; see [`PlaybackQueue::clear`]
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Advance; see [`PlaybackQueue::next`]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Track> {
        self.queue.next()
    }

    /// Retreat; see [`PlaybackQueue::prev`]
    pub fn prev(&mut self) -> Option<Track> {
        self.queue.prev()
    }

    /// Return every track to the pool; see [`PlaybackQueue::reset`]
    pub fn reset(&mut self) {
        self.queue.reset();
    }

    /// Current track, settling lazily
    pub fn current(&mut self) -> Option<&Track> {
        self.queue.current()
    }

    /// Look-ahead length
    pub fn seek_length(&self) -> usize {
        self.queue.seek_length()
    }

    /// Change the look-ahead length (resizes the engine ring)
    pub fn set_seek_length(&mut self, length: usize) {
        self.queue.set_seek_length(length);
    }

    /// Reset the look-ahead length to its default
    pub fn set_default_seek_length(&mut self) {
        self.queue.set_default_seek_length();
    }

    /// Whether shuffle is on
    pub fn shuffle(&self) -> bool {
        self.queue.shuffle()
    }

    /// Toggle shuffle
    pub fn set_shuffle(&mut self, enabled: bool) {
        self.queue.set_shuffle(enabled);
    }

    /// Paired look-ahead / look-behind view
    pub fn seek(&self) -> SeekView<'_> {
        self.queue.seek()
    }

    /// Read access to the queue
    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    // ===== Pool surface =====

    /// Set the base gain
    pub fn set_gain(&mut self, gain: f32) {
        self.pool.borrow_mut().set_gain(gain);
    }

    /// Raise the gain by one delta step
    pub fn gain_up(&mut self) {
        self.pool.borrow_mut().gain_up();
    }

    /// Lower the gain by one delta step
    pub fn gain_down(&mut self) {
        self.pool.borrow_mut().gain_down();
    }

    /// Pause the audible slot
    pub fn pause(&mut self) {
        self.pool.borrow_mut().pause_current();
    }

    /// Resume the audible slot
    pub fn resume(&mut self) {
        self.pool.borrow_mut().resume_current();
    }

    /// Whether the audible slot is playing
    pub fn is_playing(&self) -> bool {
        self.pool.borrow().is_playing()
    }

    /// Tickets for fades scheduled since the last call
    pub fn take_pending_fades(&mut self) -> Vec<FadeTicket> {
        self.pool.borrow_mut().take_pending_fades()
    }

    /// Feed a ramp completion back; see [`PlayerPool::complete_fade`]
    pub fn complete_fade(&mut self, ticket: FadeTicket) -> bool {
        self.pool.borrow_mut().complete_fade(ticket)
    }

    /// Snapshot of the pool configuration
    pub fn config(&self) -> PlayerConfig {
        self.pool.borrow().config().clone()
    }

    /// Read access to the pool (panics if taken while a mutation is mid-flight,
    /// which single-threaded callers cannot arrange)
    pub fn pool(&self) -> Ref<'_, PlayerPool> {
        self.pool.borrow()
    }
}
