//! Bounded conversation store.
//!
//! Owns the ordered turn sequence for one conversation and enforces the
//! bounded-window invariant: the system preamble is pinned at index 0 and
//! never evicted, and at most 20 rolling turns follow it. The store is a
//! pure value object -- no locking, no background lifecycle. Callers that
//! can receive concurrent requests for the same conversation must
//! serialize access themselves.

use reflecto_types::error::ConversationError;
use reflecto_types::turn::{Turn, TurnRole};

/// Maximum turns held at once: 1 pinned system turn + 20 rolling.
///
/// Bounds the token cost and latency of every completion call to a
/// predictable worst case, independent of conversation age. Oldest turns
/// go first, preserving recency.
pub const MAX_TURNS: usize = 21;

/// Ordered turn sequence for a single conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    /// Create a fresh conversation holding only the system preamble.
    pub fn new(preamble: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::new(TurnRole::System, preamble)],
        }
    }

    /// Append a turn, then trim the window.
    ///
    /// Always succeeds; content is opaque text. Trimming happens after
    /// insertion, discarding the oldest non-system turns until the bound
    /// holds. The system turn at index 0 is never discarded.
    pub fn append(&mut self, role: TurnRole, content: impl Into<String>) {
        self.turns.push(Turn::new(role, content));
        while self.turns.len() > MAX_TURNS {
            self.turns.remove(1);
        }
    }

    /// Reset to exactly the original system turn.
    pub fn clear(&mut self) {
        self.turns.truncate(1);
    }

    /// The current turn sequence, system turn included.
    ///
    /// Hiding the system turn for display is a transport-layer concern,
    /// not the store's.
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns currently held.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// A store always holds at least the system turn.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Encode the full turn sequence as a JSON byte blob.
    pub fn serialize(&self) -> Result<Vec<u8>, ConversationError> {
        serde_json::to_vec(&self.turns)
            .map_err(|e| ConversationError::Serialization(e.to_string()))
    }

    /// Rebuild a store from a serialized blob.
    ///
    /// Replaces the entire sequence unconditionally, system turn included;
    /// a restored preamble differing from the default is expected when
    /// resuming a saved conversation. Rejects blobs that decode but would
    /// violate the store invariant (empty, or first turn not system).
    pub fn restore(bytes: &[u8]) -> Result<Self, ConversationError> {
        let turns: Vec<Turn> = serde_json::from_slice(bytes)
            .map_err(|e| ConversationError::Deserialization(e.to_string()))?;

        match turns.first() {
            Some(first) if first.role == TurnRole::System => Ok(Self { turns }),
            Some(_) => Err(ConversationError::Deserialization(
                "first turn is not a system turn".to_string(),
            )),
            None => Err(ConversationError::Deserialization(
                "empty turn sequence".to_string(),
            )),
        }
    }
}
