//! Speaker slots, voice assignments, and the two-phase slot reorder.
//!
//! A *slot* is a positional identifier - "the Nth speaker" - independent of
//! which voice model currently fills it. The roster maps each slot in
//! `[1, speaker_count]` to a voice model id. Dialogue turns reference slots,
//! never voices; reordering the cast therefore remaps the roster wholesale
//! and leaves every turn untouched. That decoupling is the central
//! correctness property of this module: reordering changes *who speaker 2
//! is*, not *which turns belong to speaker 2*.
//!
//! Dragging a speaker card produces a *pending* permutation. While one is
//! pending, the session refuses new dialogue authoring until the operator
//! applies or cancels it - a deliberate gate against ambiguous intermediate
//! display states, not a concurrency guard.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ComposerError, ComposerResult};

// =============================================================================
// Constants
// =============================================================================

/// Hard cap on the enhanced-mode cast size.
pub const MAX_SPEAKERS: u8 = 4;

// =============================================================================
// SpeakerSlot
// =============================================================================

/// Positional speaker identifier, 1-based.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SpeakerSlot(u8);

impl SpeakerSlot {
    /// Wraps a 1-based slot number. Range validation against the current
    /// speaker count happens in the roster, not here.
    #[inline]
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// The 1-based slot number.
    #[inline]
    pub const fn number(&self) -> u8 {
        self.0
    }

    /// The wire-format key for this slot (`Speaker_<n>`). Used by the
    /// payload assembler only.
    pub fn wire_label(&self) -> String {
        format!("Speaker_{}", self.0)
    }
}

impl fmt::Display for SpeakerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "speaker {}", self.0)
    }
}

// =============================================================================
// SpeakerRoster
// =============================================================================

/// The speaker count plus the slot-to-voice assignment registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerRoster {
    speaker_count: u8,
    assignments: BTreeMap<SpeakerSlot, String>,
}

impl Default for SpeakerRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeakerRoster {
    /// A fresh roster with a single unassigned slot (the basic-mode shape).
    pub fn new() -> Self {
        Self {
            speaker_count: 1,
            assignments: BTreeMap::new(),
        }
    }

    /// Current number of slots.
    #[inline]
    pub fn speaker_count(&self) -> u8 {
        self.speaker_count
    }

    /// All current slots in display order.
    pub fn slots(&self) -> impl Iterator<Item = SpeakerSlot> + use<> {
        (1..=self.speaker_count).map(SpeakerSlot::new)
    }

    fn check_slot(&self, slot: SpeakerSlot) -> ComposerResult<()> {
        if slot.number() == 0 || slot.number() > self.speaker_count {
            return Err(ComposerError::SlotOutOfRange {
                slot: slot.number(),
                speaker_count: self.speaker_count,
            });
        }
        Ok(())
    }

    /// Assigns (or replaces) the voice for a slot. Total upsert within the
    /// slot range; no validation of the voice id here.
    pub fn assign(&mut self, slot: SpeakerSlot, voice_model_id: impl Into<String>) -> ComposerResult<()> {
        self.check_slot(slot)?;
        self.assignments.insert(slot, voice_model_id.into());
        Ok(())
    }

    /// The voice currently bound to a slot, if any.
    pub fn voice_for(&self, slot: SpeakerSlot) -> Option<&str> {
        self.assignments.get(&slot).map(String::as_str)
    }

    /// Slots in `[1, speaker_count]` with no assignment, in display order.
    /// The step-2 completion predicate consumes this.
    pub fn unassigned_slots(&self) -> Vec<SpeakerSlot> {
        self.slots()
            .filter(|slot| !self.assignments.contains_key(slot))
            .collect()
    }

    /// Adds a trailing slot, capped at [`MAX_SPEAKERS`]. Existing
    /// assignments are never touched.
    pub fn add_speaker(&mut self) -> ComposerResult<SpeakerSlot> {
        if self.speaker_count >= MAX_SPEAKERS {
            return Err(ComposerError::SpeakerLimitReached(MAX_SPEAKERS));
        }
        self.speaker_count += 1;
        Ok(SpeakerSlot::new(self.speaker_count))
    }

    /// Removes the trailing slot and drops its assignment. Returns the
    /// removed slot, or `None` at the single-speaker floor. The session is
    /// responsible for deleting turns authored on the removed slot.
    pub fn remove_trailing_speaker(&mut self) -> Option<SpeakerSlot> {
        if self.speaker_count <= 1 {
            return None;
        }
        let removed = SpeakerSlot::new(self.speaker_count);
        self.assignments.remove(&removed);
        self.speaker_count -= 1;
        Some(removed)
    }

    /// Wholesale replacement of the assignment registry; reorder commit
    /// path only.
    fn replace_assignments(&mut self, assignments: BTreeMap<SpeakerSlot, String>) {
        self.assignments = assignments;
    }
}

// =============================================================================
// PendingReorder
// =============================================================================

/// A proposed slot permutation awaiting explicit confirmation.
///
/// `permutation[i]` (0-indexed storage) is the slot originally at display
/// position `i + 1`, now intended to occupy that position once applied -
/// the full `display position -> original slot` relation.
#[derive(Debug, Clone, Default)]
pub struct PendingReorder {
    permutation: Option<Vec<SpeakerSlot>>,
}

impl PendingReorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a proposal is pending. While true, dialogue authoring is
    /// gated off at the session surface.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.permutation.is_some()
    }

    /// The pending proposal, if any.
    pub fn permutation(&self) -> Option<&[SpeakerSlot]> {
        self.permutation.as_deref()
    }

    /// Records a proposed permutation of the roster's slots.
    ///
    /// The proposal must be a bijection over `[1, speaker_count]`: exactly
    /// one entry per slot, every entry in range. Anything else is a
    /// programming error in the drag layer and is rejected loudly - never
    /// truncated, since truncation would corrupt the slot/turn decoupling.
    pub fn begin(&mut self, permutation: Vec<SpeakerSlot>, roster: &SpeakerRoster) -> ComposerResult<()> {
        let count = roster.speaker_count();
        if permutation.len() != usize::from(count) {
            return Err(ComposerError::InvalidPermutation(format!(
                "expected {} entries, got {}",
                count,
                permutation.len()
            )));
        }

        let mut seen = [false; MAX_SPEAKERS as usize + 1];
        for slot in &permutation {
            let n = slot.number();
            if n == 0 || n > count {
                return Err(ComposerError::InvalidPermutation(format!(
                    "slot {n} outside [1, {count}]"
                )));
            }
            if seen[usize::from(n)] {
                return Err(ComposerError::InvalidPermutation(format!(
                    "slot {n} appears twice"
                )));
            }
            seen[usize::from(n)] = true;
        }

        debug!(?permutation, "reorder proposal recorded");
        self.permutation = Some(permutation);
        Ok(())
    }

    /// Commits the pending permutation into the roster.
    ///
    /// For each display position `i`, the voice of the slot that moved into
    /// position `i` becomes the assignment of slot `i`:
    /// `new_assignment[i] = roster.voice_for(P[i])`. The registry is
    /// replaced wholesale and the proposal cleared. Dialogue turns are
    /// *never* mutated here - a turn keeps playing with whichever voice its
    /// slot currently holds.
    ///
    /// A no-op when nothing is pending.
    pub fn apply(&mut self, roster: &mut SpeakerRoster) {
        let Some(permutation) = self.permutation.take() else {
            return;
        };

        let mut remapped = BTreeMap::new();
        for (position, original) in permutation.iter().enumerate() {
            let target = SpeakerSlot::new(position as u8 + 1);
            if let Some(voice) = roster.voice_for(*original) {
                remapped.insert(target, voice.to_string());
            }
        }

        debug!(
            moved = permutation.len(),
            "applying speaker reorder to assignment registry"
        );
        roster.replace_assignments(remapped);
    }

    /// Discards the pending proposal.
    pub fn cancel(&mut self) {
        self.permutation = None;
    }
}

// =============================================================================
// Tests
// =============================================================================
