//! The ordered dialogue script of an enhanced composition.
//!
//! Turns are bound to speaker slots (positions, not voices) and keep a
//! dense 0-based `order`. Every structural change - add, move, remove,
//! shrink - renumbers the whole list so the order set is always exactly
//! `{0, 1, ..., n-1}`. Turns are never implicitly reassigned between slots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::composer::speakers::SpeakerSlot;
use crate::core::emotion::EmotionValues;
use crate::errors::{ComposerError, ComposerResult};

// =============================================================================
// DialogueTurn
// =============================================================================

/// One authored line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTurn {
    /// Stable identifier for edits and removal.
    pub id: Uuid,

    /// The slot this turn belongs to. A stable reference to a *position* in
    /// the cast, never rewritten by slot reorders.
    pub speaker_slot: SpeakerSlot,

    /// Free text to synthesize.
    pub text: String,

    /// Dense 0-based position in the script.
    pub order: u32,

    /// Per-turn emotion intensities produced by AI-assisted drafting.
    /// Stored verbatim; consumed only when the expression mode is not
    /// `Custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotions: Option<EmotionValues>,
}

// =============================================================================
// DialogueList
// =============================================================================

/// The ordered sequence of dialogue turns.
#[derive(Debug, Clone, Default)]
pub struct DialogueList {
    turns: Vec<DialogueTurn>,
}

impl DialogueList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new empty turn for a slot and returns its id.
    pub fn add(&mut self, slot: SpeakerSlot) -> Uuid {
        let id = Uuid::new_v4();
        self.turns.push(DialogueTurn {
            id,
            speaker_slot: slot,
            text: String::new(),
            order: self.turns.len() as u32,
            emotions: None,
        });
        id
    }

    /// Replaces a turn's text.
    pub fn update_text(&mut self, id: Uuid, text: impl Into<String>) -> ComposerResult<()> {
        let turn = self.turn_mut(id)?;
        turn.text = text.into();
        Ok(())
    }

    /// Attaches drafted per-turn emotion data.
    pub fn set_emotions(&mut self, id: Uuid, emotions: EmotionValues) -> ComposerResult<()> {
        let turn = self.turn_mut(id)?;
        turn.emotions = if emotions.is_empty() {
            None
        } else {
            Some(emotions)
        };
        Ok(())
    }

    /// Swaps a turn with its predecessor. No-op at the top of the list.
    pub fn move_up(&mut self, id: Uuid) -> ComposerResult<()> {
        let index = self.index_of(id)?;
        if index > 0 {
            self.turns.swap(index, index - 1);
            self.renumber();
        }
        Ok(())
    }

    /// Swaps a turn with its successor. No-op at the bottom of the list.
    pub fn move_down(&mut self, id: Uuid) -> ComposerResult<()> {
        let index = self.index_of(id)?;
        if index + 1 < self.turns.len() {
            self.turns.swap(index, index + 1);
            self.renumber();
        }
        Ok(())
    }

    /// Deletes a turn and closes the order gap.
    pub fn remove(&mut self, id: Uuid) -> ComposerResult<()> {
        let index = self.index_of(id)?;
        self.turns.remove(index);
        self.renumber();
        Ok(())
    }

    /// Deletes every turn whose slot exceeds `speaker_count` (speaker-count
    /// shrink support) and returns the removed ids so the caller can flag
    /// the deletion to the operator.
    pub fn drop_turns_above(&mut self, speaker_count: u8) -> Vec<Uuid> {
        let removed: Vec<Uuid> = self
            .turns
            .iter()
            .filter(|t| t.speaker_slot.number() > speaker_count)
            .map(|t| t.id)
            .collect();
        if !removed.is_empty() {
            self.turns.retain(|t| t.speaker_slot.number() <= speaker_count);
            self.renumber();
        }
        removed
    }

    /// All turns in script order.
    pub fn turns(&self) -> &[DialogueTurn] {
        &self.turns
    }

    /// Looks a turn up by id.
    pub fn get(&self, id: Uuid) -> Option<&DialogueTurn> {
        self.turns.iter().find(|t| t.id == id)
    }

    /// Turns belonging to one slot, in script order.
    pub fn turns_for_slot(&self, slot: SpeakerSlot) -> Vec<&DialogueTurn> {
        self.turns
            .iter()
            .filter(|t| t.speaker_slot == slot)
            .collect()
    }

    /// Total character count across all turns (characters, not bytes).
    pub fn total_chars(&self) -> u64 {
        self.turns.iter().map(|t| t.text.chars().count() as u64).sum()
    }

    /// True when the script has at least one turn and none is blank.
    pub fn all_turns_nonempty(&self) -> bool {
        !self.turns.is_empty() && self.turns.iter().all(|t| !t.text.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Clears the script.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    fn index_of(&self, id: Uuid) -> ComposerResult<usize> {
        self.turns
            .iter()
            .position(|t| t.id == id)
            .ok_or(ComposerError::UnknownTurn(id))
    }

    fn turn_mut(&mut self, id: Uuid) -> ComposerResult<&mut DialogueTurn> {
        let index = self.index_of(id)?;
        Ok(&mut self.turns[index])
    }

    // Orders are dense 0-based and rewritten after every structural change;
    // ties cannot occur.
    fn renumber(&mut self) {
        for (index, turn) in self.turns.iter_mut().enumerate() {
            turn.order = index as u32;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
