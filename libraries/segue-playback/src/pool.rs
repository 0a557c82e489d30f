//! Player-slot ring synchronized with the queue's look-ahead window
//!
//! The pool owns `2 * seek + 1` engine slots arranged in a ring: one for
//! the current track, `seek` ahead, `seek` behind. Advancing or retreating
//! the queue cycles the ring pointer instead of reloading engines, so the
//! next track's engine is already primed with its source when it becomes
//! audible. Every queue mutation lands in [`PlayerPool::handle_mutation`],
//! which re-synchronizes slot sources with the queue's seek view.

use tracing::{debug, warn};

use crate::engine::PlaybackEngine;
use crate::events::QueueMutation;
use crate::queue::PlaybackQueue;
use crate::types::PlayerConfig;

/// Factory for fresh playback engines, used when the ring grows
pub type EngineFactory = Box<dyn FnMut() -> Box<dyn PlaybackEngine>>;

/// Direction of a scheduled fade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    /// Gain ramps up toward the configured level
    In,
    /// Gain ramps down to silence; the slot pauses on completion
    Out,
}

/// Completion ticket for a scheduled fade
///
/// Captures the slot's generation at schedule time. A completion whose
/// generation no longer matches the slot's was superseded by a newer
/// command and is discarded instead of applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeTicket {
    slot: usize,
    generation: u64,
    direction: FadeDirection,
}

impl FadeTicket {
    /// Slot index the fade was scheduled on
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Fade direction
    pub fn direction(&self) -> FadeDirection {
        self.direction
    }
}

/// One slot of the ring
struct PlayerSlot {
    engine: Box<dyn PlaybackEngine>,
    source: Option<String>,
    playing: bool,
    /// Bumped on every state-changing command; stale fade completions are
    /// recognized by a generation mismatch.
    generation: u64,
}

impl PlayerSlot {
    fn new(engine: Box<dyn PlaybackEngine>) -> Self {
        Self {
            engine,
            source: None,
            playing: false,
            generation: 0,
        }
    }

    fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

enum Cycle {
    Forward,
    Backward,
    /// The current track changed without the playhead moving (removal,
    /// first push onto an empty queue, reset); the slot is rebound in
    /// place.
    InPlace,
}

/// Fixed-size ring of playback engines tracking the queue's seek window
pub struct PlayerPool {
    slots: Vec<PlayerSlot>,
    current_slot: usize,
    seek_size: usize,
    config: PlayerConfig,
    factory: EngineFactory,
    pending_fades: Vec<FadeTicket>,
}

impl PlayerPool {
    /// Create a pool with `2 * prefetch_size + 1` factory-built slots
    pub fn new(config: PlayerConfig, mut factory: EngineFactory) -> Self {
        let config = config.sanitized();
        let seek_size = config.prefetch_size;
        let slots = (0..ring_len(seek_size))
            .map(|_| PlayerSlot::new(factory()))
            .collect();
        Self {
            slots,
            current_slot: 0,
            seek_size,
            config,
            factory,
            pending_fades: Vec::new(),
        }
    }

    // ===== Ring geometry =====

    /// Number of slots in the ring (`2 * seek + 1`)
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Index of the now-playing slot
    pub fn current_slot(&self) -> usize {
        self.current_slot
    }

    /// Seek width the ring is sized for
    pub fn seek_size(&self) -> usize {
        self.seek_size
    }

    /// Slot indices ahead of the current slot, nearest first
    ///
    /// Paired positionally with the queue's look-ahead, front to back.
    pub fn forward_slots(&self) -> Vec<usize> {
        (1..=self.seek_size)
            .map(|step| (self.current_slot + step) % self.slots.len())
            .collect()
    }

    /// Slot indices behind the current slot, in ring order
    ///
    /// Runs from `current - seek` up to `current - 1`, so it pairs
    /// positionally with the history window in oldest-first order and the
    /// most recent history entry always sits right behind the playhead.
    pub fn backward_slots(&self) -> Vec<usize> {
        let len = self.slots.len();
        (0..self.seek_size)
            .map(|step| (self.current_slot + len - self.seek_size + step) % len)
            .collect()
    }

    /// Advance the ring pointer one slot
    pub fn cycle_forward(&mut self) {
        self.current_slot = (self.current_slot + 1) % self.slots.len();
    }

    /// Retreat the ring pointer one slot
    pub fn cycle_backward(&mut self) {
        self.current_slot = (self.current_slot + self.slots.len() - 1) % self.slots.len();
    }

    // ===== Queue synchronization =====

    /// React to a queue mutation; called exactly once per tag
    pub fn handle_mutation(&mut self, tag: QueueMutation, queue: &PlaybackQueue) {
        match tag {
            QueueMutation::Next => self.switch_current(queue, Cycle::Forward),
            QueueMutation::Prev => self.switch_current(queue, Cycle::Backward),
            QueueMutation::SeekLength | QueueMutation::SetDefaultSeekLength => {
                self.resize(queue.seek_length());
                self.synchronize_prefetch(queue);
            }
            QueueMutation::Clear => {
                self.halt_all();
                self.synchronize_prefetch(queue);
            }
            QueueMutation::Push
            | QueueMutation::PushMany
            | QueueMutation::AddNext
            | QueueMutation::Pop
            | QueueMutation::Remove
            | QueueMutation::Reset
            | QueueMutation::Shuffle => {
                if self.current_source_stale(queue) {
                    self.switch_current(queue, Cycle::InPlace);
                } else {
                    self.synchronize_prefetch(queue);
                }
            }
        }
    }

    fn current_source_stale(&self, queue: &PlaybackQueue) -> bool {
        let wanted = queue.peek_current().map(|t| t.src.as_str());
        self.slots[self.current_slot].source.as_deref() != wanted
    }

    /// Move the audible track to a new slot (or rebind it in place)
    fn switch_current(&mut self, queue: &PlaybackQueue, cycle: Cycle) {
        let old = self.current_slot;
        match cycle {
            Cycle::Forward => self.cycle_forward(),
            Cycle::Backward => self.cycle_backward(),
            Cycle::InPlace => {}
        }
        let new = self.current_slot;

        if new != old {
            self.fade_out_slot(old);
        }

        match queue.peek_current().map(|t| t.src.clone()) {
            Some(src) => {
                self.assign_source(new, Some(src));
                self.fade_in_slot(new);
            }
            None => {
                // Queue ran dry; silence the slot before unbinding it
                self.pause_slot(new);
                self.assign_source(new, None);
            }
        }

        self.synchronize_prefetch(queue);
    }

    /// Re-point every look-ahead/behind slot at its paired track source
    ///
    /// Slots already holding the right source are left alone so prefetched
    /// engines are never reset needlessly. Unpaired slots are blanked. With
    /// prefetch disabled only the current slot keeps a source.
    pub fn synchronize_prefetch(&mut self, queue: &PlaybackQueue) {
        let view = queue.seek();

        let forward = self.forward_slots();
        for (pos, slot) in forward.into_iter().enumerate() {
            let src = if self.config.prefetch {
                view.ahead.get(pos).map(|t| t.src.clone())
            } else {
                None
            };
            self.assign_source(slot, src);
        }

        let backward = self.backward_slots();
        for (pos, slot) in backward.into_iter().enumerate() {
            // backward_slots runs from the far edge toward the playhead;
            // align the pairing on the most-recent end of the window.
            let distance = self.seek_size - pos;
            let src = if self.config.prefetch {
                view.behind
                    .len()
                    .checked_sub(distance)
                    .map(|idx| view.behind[idx].src.clone())
            } else {
                None
            };
            self.assign_source(slot, src);
        }
    }

    /// Resize the ring to `2 * new_seek + 1` slots
    ///
    /// Growth appends factory-fresh engines and re-initializes the idle
    /// slots. Shrinking keeps the slots at ring offsets `-new_seek ..=
    /// +new_seek` around the playhead — trailing edge dropped first, then
    /// leading — so the audible slot and its nearest neighbors always
    /// survive.
    pub fn resize(&mut self, new_seek: usize) {
        if new_seek == self.seek_size {
            return;
        }
        let new_len = ring_len(new_seek);
        if new_seek > self.seek_size {
            debug!(from = self.seek_size, to = new_seek, "growing player ring");
            while self.slots.len() < new_len {
                self.slots.push(PlayerSlot::new((self.factory)()));
            }
            self.reinitialize_idle_slots();
        } else {
            debug!(from = self.seek_size, to = new_seek, "shrinking player ring");
            let len = self.slots.len();
            let current = self.current_slot;
            let mut old: Vec<Option<PlayerSlot>> = self.slots.drain(..).map(Some).collect();

            let mut kept = Vec::with_capacity(new_len);
            for offset in 0..new_len {
                let index = (current + len - new_seek + offset) % len;
                if let Some(slot) = old[index].take() {
                    kept.push(slot);
                }
            }
            // Quiesce the engines being dropped
            for mut slot in old.into_iter().flatten() {
                if slot.playing {
                    if let Err(error) = slot.engine.pause() {
                        warn!(%error, "engine rejected pause while shrinking ring");
                    }
                }
            }
            self.slots = kept;
            self.current_slot = new_seek;
        }
        self.seek_size = new_seek;
    }

    /// Pause every slot and blank the audible one (the `clear` reaction)
    fn halt_all(&mut self) {
        for index in 0..self.slots.len() {
            self.pause_slot(index);
        }
        self.assign_source(self.current_slot, None);
    }

    /// Pause + reset every slot except the audible one
    fn reinitialize_idle_slots(&mut self) {
        let gain = self.config.gain;
        let current = self.current_slot;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if index == current {
                continue;
            }
            slot.bump();
            if slot.playing {
                if let Err(error) = slot.engine.pause() {
                    warn!(%error, slot = index, "engine rejected pause during re-init");
                }
                slot.playing = false;
            }
            slot.engine.seek_to_start();
            slot.engine.set_gain(gain);
        }
    }

    // ===== Slot commands =====

    fn assign_source(&mut self, index: usize, src: Option<String>) {
        let slot = &mut self.slots[index];
        if slot.source == src {
            return;
        }
        slot.bump();
        slot.engine.set_source(src.as_deref());
        slot.source = src;
        slot.playing = false;
    }

    fn fade_in_slot(&mut self, index: usize) {
        let crossfade = self.config.crossfade && self.config.crossfade_ms > 0;
        let gain = self.config.gain;
        let duration = self.config.crossfade_ms;

        let slot = &mut self.slots[index];
        let generation = slot.bump();
        if crossfade {
            slot.engine.set_gain(0.0);
            match slot.engine.play() {
                Ok(()) => {
                    slot.playing = true;
                    slot.engine.schedule_gain_ramp(gain, duration);
                    self.pending_fades.push(FadeTicket {
                        slot: index,
                        generation,
                        direction: FadeDirection::In,
                    });
                }
                Err(error) => {
                    warn!(%error, slot = index, "engine rejected play; slot left paused");
                }
            }
        } else {
            slot.engine.set_gain(gain);
            match slot.engine.play() {
                Ok(()) => slot.playing = true,
                Err(error) => {
                    warn!(%error, slot = index, "engine rejected play; slot left paused");
                }
            }
        }
    }

    fn fade_out_slot(&mut self, index: usize) {
        let crossfade = self.config.crossfade && self.config.crossfade_ms > 0;
        let duration = self.config.crossfade_ms;

        if !self.slots[index].playing {
            return;
        }
        if crossfade {
            let slot = &mut self.slots[index];
            let generation = slot.bump();
            slot.engine.schedule_gain_ramp(0.0, duration);
            // The pause lands in complete_fade once the ramp finishes
            self.pending_fades.push(FadeTicket {
                slot: index,
                generation,
                direction: FadeDirection::Out,
            });
        } else {
            self.pause_slot(index);
        }
    }

    fn pause_slot(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.bump();
        if !slot.playing {
            return;
        }
        match slot.engine.pause() {
            Ok(()) => slot.playing = false,
            Err(error) => {
                warn!(%error, slot = index, "engine rejected pause; slot state unchanged");
            }
        }
    }

    // ===== Fade completion =====

    /// Tickets for fades scheduled since the last call
    ///
    /// The composition root attaches each ticket to the platform's ramp
    /// completion signal and feeds it back through [`complete_fade`].
    ///
    /// [`complete_fade`]: PlayerPool::complete_fade
    pub fn take_pending_fades(&mut self) -> Vec<FadeTicket> {
        std::mem::take(&mut self.pending_fades)
    }

    /// Apply a fade's terminal effect, unless the ticket went stale
    ///
    /// Returns whether the completion was applied. A mismatched generation
    /// means a newer command superseded the fade; the completion is
    /// discarded and the slot is left as that newer command put it.
    pub fn complete_fade(&mut self, ticket: FadeTicket) -> bool {
        let Some(slot) = self.slots.get_mut(ticket.slot) else {
            // The ring shrank past this slot
            return false;
        };
        if slot.generation != ticket.generation {
            debug!(slot = ticket.slot, "discarding stale fade completion");
            return false;
        }
        slot.bump();
        match ticket.direction {
            FadeDirection::Out => match slot.engine.pause() {
                Ok(()) => slot.playing = false,
                Err(error) => {
                    warn!(%error, slot = ticket.slot, "engine rejected pause at fade end");
                }
            },
            FadeDirection::In => {
                // Settle on the exact configured level
                slot.engine.set_gain(self.config.gain);
            }
        }
        true
    }

    // ===== Gain & transport =====

    /// Pool configuration
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Replace the configuration (clamped) without touching slot state
    pub fn set_config(&mut self, config: PlayerConfig) {
        self.config = config.sanitized();
    }

    /// Set the base gain, clamped to the configured range
    pub fn set_gain(&mut self, gain: f32) {
        let clamped = if gain.is_finite() {
            gain.clamp(0.0, self.config.max_gain())
        } else {
            self.config.gain
        };
        self.config.gain = clamped;
        self.apply_gain();
    }

    /// Raise the base gain by one delta step
    pub fn gain_up(&mut self) {
        self.set_gain(self.config.gain + self.config.gain_delta);
    }

    /// Lower the base gain by one delta step
    pub fn gain_down(&mut self) {
        self.set_gain(self.config.gain - self.config.gain_delta);
    }

    /// Push the configured gain to the audible slot, smoothly if enabled
    fn apply_gain(&mut self) {
        let smooth = self.config.smooth_gain && self.config.smooth_gain_ms > 0;
        let gain = self.config.gain;
        let duration = self.config.smooth_gain_ms;
        let slot = &mut self.slots[self.current_slot];
        if smooth {
            slot.engine.schedule_gain_ramp(gain, duration);
        } else {
            slot.engine.set_gain(gain);
        }
    }

    /// Pause the audible slot
    pub fn pause_current(&mut self) {
        self.pause_slot(self.current_slot);
    }

    /// Resume the audible slot, if it holds a source
    pub fn resume_current(&mut self) {
        let gain = self.config.gain;
        let slot = &mut self.slots[self.current_slot];
        if slot.source.is_none() || slot.playing {
            return;
        }
        slot.bump();
        slot.engine.set_gain(gain);
        match slot.engine.play() {
            Ok(()) => slot.playing = true,
            Err(error) => {
                warn!(%error, "engine rejected resume; slot left paused");
            }
        }
    }

    /// Whether the audible slot is playing
    pub fn is_playing(&self) -> bool {
        self.slots[self.current_slot].playing
    }

    /// Source bound to the audible slot
    pub fn current_source(&self) -> Option<&str> {
        self.slots[self.current_slot].source.as_deref()
    }

    /// Source bound to an arbitrary slot (`None` for a blank slot)
    pub fn slot_source(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(|s| s.source.as_deref())
    }
}

fn ring_len(seek_size: usize) -> usize {
    2 * seek_size + 1
}
