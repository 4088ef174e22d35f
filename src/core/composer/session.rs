//! The composition session: one operator's in-progress request.
//!
//! `ComposerSession` owns every component of the composition - title, model
//! selection, speaker roster, pending reorder, dialogue script, expression
//! settings, basic-mode text - plus the step gate, and exposes the surface
//! the surrounding application drives: `current_step`, `is_step_complete`,
//! `advance`, `retreat`, `submit`, and the component mutators.
//!
//! All state is ephemeral per editing session and owned exclusively by one
//! UI session; mutations are synchronous and immediately observable. The
//! only async operations are the one-shot catalog loads and the final
//! submission.

use tracing::{debug, info, warn};

use crate::config::pricing::{ModelBranch, RateBasis, estimate_tokens};
use crate::config::ServiceConfig;
use crate::core::catalog::{
    ModelCatalog, ModelDirectory, VoiceDirectory, VoiceModelCatalog,
};
use crate::core::composer::dialogue::{DialogueList, DialogueTurn};
use crate::core::composer::speakers::{PendingReorder, SpeakerRoster, SpeakerSlot};
use crate::core::composer::steps::{Step, StepGate};
use crate::core::composer::CompositionMode;
use crate::core::emotion::{Emotion, EmotionSettings, EmotionValues, ExpressionMode};
use crate::core::generation::progress::ProgressHandle;
use crate::core::generation::{
    assemble, AssemblyInput, GenerationBackend, GenerationRequest, SubmissionAck,
    DEFAULT_PRIORITY,
};
use crate::errors::{ComposerError, ComposerResult};

use uuid::Uuid;

// =============================================================================
// Supporting Types
// =============================================================================

/// The operator's explicit model choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub model_id: String,
    pub branch_id: String,
}

/// Result of removing the trailing speaker: the freed slot and the turns
/// that were deleted with it, so a UI can flag the deletion to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedSpeaker {
    pub slot: SpeakerSlot,
    pub deleted_turns: Vec<Uuid>,
}

/// Rough speaking rate used to convert text length into a duration estimate
/// for seconds-billed branches.
const ESTIMATED_CHARS_PER_SECOND: u64 = 15;

// =============================================================================
// ComposerSession
// =============================================================================

/// The full composition state machine.
pub struct ComposerSession {
    config: ServiceConfig,
    mode: CompositionMode,
    gate: StepGate,

    title: String,
    selection: Option<ModelSelection>,
    priority: u32,

    voice_catalog: VoiceModelCatalog,
    model_catalog: ModelCatalog,

    roster: SpeakerRoster,
    reorder: PendingReorder,
    dialogue: DialogueList,
    emotions: EmotionSettings,

    /// Basic-mode text; unused in enhanced mode.
    text: String,
}

impl ComposerSession {
    /// Creates a pristine session in the given mode with empty catalogs.
    /// Call [`load_catalogs`](Self::load_catalogs) before driving the steps.
    pub fn new(config: ServiceConfig, mode: CompositionMode) -> Self {
        Self {
            config,
            mode,
            gate: StepGate::new(),
            title: String::new(),
            selection: None,
            priority: DEFAULT_PRIORITY,
            voice_catalog: VoiceModelCatalog::empty(),
            model_catalog: ModelCatalog::empty(),
            roster: SpeakerRoster::new(),
            reorder: PendingReorder::new(),
            dialogue: DialogueList::new(),
            emotions: EmotionSettings::new(),
            text: String::new(),
        }
    }

    // =========================================================================
    // Catalog Loading
    // =========================================================================

    /// Populates the read-only catalogs from the injected directories.
    ///
    /// Soft-fails: a directory error leaves the corresponding catalog empty
    /// and is logged, never propagated - step predicates that depend on
    /// catalog data degrade gracefully. When exactly one branch exists
    /// across the model catalog it is auto-selected.
    pub async fn load_catalogs(
        &mut self,
        voices: &dyn VoiceDirectory,
        models: &dyn ModelDirectory,
    ) {
        match voices.fetch_voices().await {
            Ok(inventory) => {
                self.voice_catalog = VoiceModelCatalog::from_inventory(inventory);
            }
            Err(e) => {
                warn!(error = %e, "voice directory unavailable, continuing with empty catalog");
                self.voice_catalog = VoiceModelCatalog::empty();
            }
        }

        match models.fetch_models().await {
            Ok(list) => match ModelCatalog::from_models(list) {
                Ok(catalog) => self.model_catalog = catalog,
                Err(e) => {
                    warn!(error = %e, "model directory rejected, continuing with empty catalog");
                    self.model_catalog = ModelCatalog::empty();
                }
            },
            Err(e) => {
                warn!(error = %e, "model directory unavailable, continuing with empty catalog");
                self.model_catalog = ModelCatalog::empty();
            }
        }

        self.auto_select_single_branch();
    }

    fn auto_select_single_branch(&mut self) {
        if self.selection.is_none() {
            if let Some((model_id, branch)) = self.model_catalog.single_branch() {
                debug!(model_id, branch_id = %branch.id, "auto-selecting the only branch");
                self.selection = Some(ModelSelection {
                    model_id: model_id.to_string(),
                    branch_id: branch.id.clone(),
                });
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn mode(&self) -> CompositionMode {
        self.mode
    }

    #[inline]
    pub fn current_step(&self) -> Step {
        self.gate.current()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Option<&ModelSelection> {
        self.selection.as_ref()
    }

    pub fn voice_catalog(&self) -> &VoiceModelCatalog {
        &self.voice_catalog
    }

    pub fn model_catalog(&self) -> &ModelCatalog {
        &self.model_catalog
    }

    pub fn speaker_count(&self) -> u8 {
        self.roster.speaker_count()
    }

    pub fn voice_for(&self, slot: SpeakerSlot) -> Option<&str> {
        self.roster.voice_for(slot)
    }

    pub fn unassigned_slots(&self) -> Vec<SpeakerSlot> {
        self.roster.unassigned_slots()
    }

    pub fn turns(&self) -> &[DialogueTurn] {
        self.dialogue.turns()
    }

    pub fn emotion_settings(&self) -> &EmotionSettings {
        &self.emotions
    }

    pub fn is_reorder_pending(&self) -> bool {
        self.reorder.is_pending()
    }

    /// The branch cost estimates and limits run against: the explicit
    /// selection when one is made, otherwise nothing.
    pub fn active_branch(&self) -> Option<&ModelBranch> {
        let selection = self.selection.as_ref()?;
        self.model_catalog
            .find_branch(&selection.model_id, &selection.branch_id)
    }

    /// The character limit the active branch imposes, if any.
    pub fn max_chars(&self) -> Option<u32> {
        self.active_branch().and_then(|b| b.max_chars)
    }

    // =========================================================================
    // Basic Info (step 1)
    // =========================================================================

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_priority(&mut self, priority: u32) {
        self.priority = priority;
    }

    /// Explicitly selects a model branch. The branch must exist in the
    /// loaded catalog.
    pub fn select_model(&mut self, model_id: &str, branch_id: &str) -> ComposerResult<()> {
        if self.model_catalog.find_branch(model_id, branch_id).is_none() {
            return Err(ComposerError::UnknownModelBranch {
                model_id: model_id.to_string(),
                branch_id: branch_id.to_string(),
            });
        }
        self.selection = Some(ModelSelection {
            model_id: model_id.to_string(),
            branch_id: branch_id.to_string(),
        });
        Ok(())
    }

    // =========================================================================
    // Voices & Speakers (step 2)
    // =========================================================================

    /// Binds a voice model to a slot. Upsert; no validation beyond the slot
    /// range.
    pub fn assign_voice(
        &mut self,
        slot: SpeakerSlot,
        voice_model_id: impl Into<String>,
    ) -> ComposerResult<()> {
        self.roster.assign(slot, voice_model_id)
    }

    /// Adds a speaker slot (enhanced mode, capped at four). The basic flow
    /// is single-speaker by definition.
    pub fn add_speaker(&mut self) -> ComposerResult<SpeakerSlot> {
        if self.mode == CompositionMode::Basic {
            return Err(ComposerError::SpeakerLimitReached(1));
        }
        self.roster.add_speaker()
    }

    /// Removes the trailing speaker slot, dropping its assignment and
    /// explicitly deleting any turns authored on it. Returns what was
    /// removed so the UI can flag it, or `None` at the single-speaker
    /// floor.
    pub fn remove_trailing_speaker(&mut self) -> Option<RemovedSpeaker> {
        let slot = self.roster.remove_trailing_speaker()?;
        let deleted_turns = self.dialogue.drop_turns_above(self.roster.speaker_count());
        if !deleted_turns.is_empty() {
            info!(
                %slot,
                deleted = deleted_turns.len(),
                "deleted turns orphaned by speaker removal"
            );
        }
        Some(RemovedSpeaker {
            slot,
            deleted_turns,
        })
    }

    // =========================================================================
    // Speaker Reorder
    // =========================================================================

    /// Records a drag-reorder proposal: `permutation[i]` is the slot now
    /// shown at display position `i + 1`. Until applied or cancelled, new
    /// dialogue authoring is refused.
    pub fn begin_reorder(&mut self, permutation: Vec<SpeakerSlot>) -> ComposerResult<()> {
        self.reorder.begin(permutation, &self.roster)
    }

    /// Commits the pending reorder into the assignment registry. Dialogue
    /// turns are never touched; see [`PendingReorder::apply`].
    pub fn apply_reorder(&mut self) {
        self.reorder.apply(&mut self.roster);
    }

    /// Discards the pending reorder proposal.
    pub fn cancel_reorder(&mut self) {
        self.reorder.cancel();
    }

    // =========================================================================
    // Emotion (step 3)
    // =========================================================================

    pub fn set_emotion_mode(&mut self, mode: ExpressionMode) {
        self.emotions.set_mode(mode);
    }

    pub fn set_emotion_value(&mut self, emotion: Emotion, intensity: u8) {
        self.emotions.set_value(emotion, intensity);
    }

    // =========================================================================
    // Text & Dialogue (step 4)
    // =========================================================================

    /// Sets the basic-mode text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Appends an empty turn for a slot. Refused while a reorder is pending
    /// (the cast order must settle before new lines are authored).
    pub fn add_turn(&mut self, slot: SpeakerSlot) -> ComposerResult<Uuid> {
        if self.reorder.is_pending() {
            return Err(ComposerError::ReorderPending);
        }
        if slot.number() == 0 || slot.number() > self.roster.speaker_count() {
            return Err(ComposerError::SlotOutOfRange {
                slot: slot.number(),
                speaker_count: self.roster.speaker_count(),
            });
        }
        Ok(self.dialogue.add(slot))
    }

    pub fn update_turn_text(&mut self, id: Uuid, text: impl Into<String>) -> ComposerResult<()> {
        self.dialogue.update_text(id, text)
    }

    /// Attaches AI-drafted per-turn emotion data (consumed only outside
    /// custom mode).
    pub fn set_turn_emotions(&mut self, id: Uuid, emotions: EmotionValues) -> ComposerResult<()> {
        self.dialogue.set_emotions(id, emotions)
    }

    pub fn move_turn_up(&mut self, id: Uuid) -> ComposerResult<()> {
        self.dialogue.move_up(id)
    }

    pub fn move_turn_down(&mut self, id: Uuid) -> ComposerResult<()> {
        self.dialogue.move_down(id)
    }

    pub fn remove_turn(&mut self, id: Uuid) -> ComposerResult<()> {
        self.dialogue.remove(id)
    }

    // =========================================================================
    // Step Gating
    // =========================================================================

    /// Whether a step's completion predicate currently holds.
    pub fn is_step_complete(&self, step: Step) -> bool {
        match step {
            Step::BasicInfo => {
                !self.title.trim().is_empty()
                    && (!self.model_catalog.requires_selection() || self.selection.is_some())
            }
            Step::Voices => match self.mode {
                CompositionMode::Basic => self.roster.voice_for(SpeakerSlot::new(1)).is_some(),
                CompositionMode::Enhanced => self.roster.unassigned_slots().is_empty(),
            },
            Step::Emotion => match self.emotions.mode {
                ExpressionMode::Auto | ExpressionMode::Normal => true,
                ExpressionMode::Custom => self.emotions.is_expressive(),
            },
            Step::Script => self.is_script_complete(),
            // Terminal action step, never a gate target.
            Step::Review => false,
        }
    }

    fn is_script_complete(&self) -> bool {
        match self.mode {
            CompositionMode::Basic => {
                let chars = self.text.chars().count() as u64;
                !self.text.trim().is_empty() && self.within_char_limit(chars)
            }
            CompositionMode::Enhanced => {
                // An unresolved reorder proposal leaves the display
                // ambiguous; the script is not ready to advance from.
                !self.reorder.is_pending()
                    && self.dialogue.all_turns_nonempty()
                    && self.within_char_limit(self.dialogue.total_chars())
            }
        }
    }

    fn within_char_limit(&self, chars: u64) -> bool {
        match self.max_chars() {
            Some(limit) => chars <= u64::from(limit),
            None => true,
        }
    }

    /// Moves forward when the current step is complete; silent no-op
    /// otherwise. Returns whether the step changed.
    pub fn advance(&mut self) -> bool {
        let complete = self.is_step_complete(self.gate.current());
        self.gate.advance_if(complete)
    }

    /// Moves back one step; always allowed above step 1.
    pub fn retreat(&mut self) -> bool {
        self.gate.retreat()
    }

    // =========================================================================
    // Cost Estimate
    // =========================================================================

    /// Estimated token cost of the current composition against the active
    /// branch. `None` when no branch is selected.
    pub fn estimated_cost(&self) -> Option<u64> {
        let branch = self.active_branch()?;
        let chars = match self.mode {
            CompositionMode::Basic => self.text.chars().count() as u64,
            CompositionMode::Enhanced => self.dialogue.total_chars(),
        };
        let quantity = match branch.rate_basis {
            RateBasis::Chars => chars,
            // Duration-billed branches: approximate from speaking rate.
            RateBasis::Seconds => chars.div_ceil(ESTIMATED_CHARS_PER_SECOND),
        };
        Some(estimate_tokens(quantity, branch))
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Assembles the composition into a request body without submitting.
    pub fn assemble_request(&self) -> ComposerResult<GenerationRequest> {
        assemble(AssemblyInput {
            mode: self.mode,
            title: &self.title,
            selection: self
                .selection
                .as_ref()
                .map(|s| (s.model_id.as_str(), s.branch_id.as_str())),
            roster: &self.roster,
            dialogue: &self.dialogue,
            emotions: &self.emotions,
            text: &self.text,
            priority: self.priority,
        })
    }

    /// Submits the composition from the review step.
    ///
    /// On success the acknowledgement is returned and, after the configured
    /// reset delay, the composition state resets to initial values (the
    /// catalogs survive). On failure the state is preserved untouched so
    /// the operator can retry without re-authoring.
    pub async fn submit(
        &mut self,
        backend: &dyn GenerationBackend,
    ) -> ComposerResult<SubmissionAck> {
        if self.gate.current() != Step::Review {
            return Err(ComposerError::SubmitNotReady(self.gate.current()));
        }
        // Everything the gate walked past must still hold.
        for step in [Step::BasicInfo, Step::Voices, Step::Emotion, Step::Script] {
            if !self.is_step_complete(step) {
                return Err(ComposerError::SubmitNotReady(step));
            }
        }

        let request = self.assemble_request()?;
        match backend.submit(&request).await {
            Ok(ack) => {
                info!(request_id = %ack.request_id, "submission succeeded, scheduling reset");
                tokio::time::sleep(self.config.reset_delay).await;
                self.reset();
                Ok(ack)
            }
            Err(e) => {
                warn!(error = %e, "submission failed, composition state preserved");
                Err(e)
            }
        }
    }

    /// [`submit`](Self::submit) plus terminal handling of a progress
    /// handle: the simulated indicator is snapped to 100 on either outcome.
    pub async fn submit_tracked(
        &mut self,
        backend: &dyn GenerationBackend,
        progress: &ProgressHandle,
    ) -> ComposerResult<SubmissionAck> {
        let outcome = self.submit(backend).await;
        progress.finish();
        outcome
    }

    /// Returns the composition to its initial values. Catalogs, mode and
    /// configuration survive; the single auto-selected branch is re-applied.
    pub fn reset(&mut self) {
        self.gate.reset();
        self.title.clear();
        self.selection = None;
        self.priority = DEFAULT_PRIORITY;
        self.roster = SpeakerRoster::new();
        self.reorder = PendingReorder::new();
        self.dialogue.clear();
        self.emotions = EmotionSettings::new();
        self.text.clear();
        self.auto_select_single_branch();
    }
}

// =============================================================================
// Tests
// =============================================================================
