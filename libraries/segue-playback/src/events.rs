//! Queue mutation notification
//!
//! The queue reports each externally visible mutation to a single consumer
//! through a discriminant tag. Richer payloads are deliberately not passed:
//! the consumer re-reads queue state directly, so the tag only says *what
//! kind* of thing happened.

use serde::{Deserialize, Serialize};

/// Discriminant tag describing a queue mutation
///
/// Exactly one tag fires per mutating call that actually changed state;
/// no-ops (popping an empty queue, re-setting the same seek length) are
/// silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueueMutation {
    /// A track was appended to the pool
    Push,

    /// Several tracks were appended to the pool
    PushMany,

    /// A track was inserted at the front of the look-ahead window
    AddNext,

    /// The most recently queued track was removed
    Pop,

    /// One or more tracks matching a filter were removed
    Remove,

    /// Everything was removed and the key counter reset
    Clear,

    /// The queue advanced to the next track
    Next,

    /// The queue retreated to the previous track
    Prev,

    /// All tracks were returned to the pool
    Reset,

    /// The look-ahead length changed
    SeekLength,

    /// The look-ahead length was reset to its default
    SetDefaultSeekLength,

    /// Shuffle was toggled
    Shuffle,
}
