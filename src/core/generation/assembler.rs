//! Assembles the composition state into a submission body.
//!
//! Pure transformation - no side effects, no network access. The one
//! boundary translation in the whole crate happens here: internal dialogue
//! orders are 0-based, the wire contract wants 1-based line orders, and the
//! `+ 1` is applied at this seam and nowhere else.

use std::collections::BTreeMap;

use crate::core::composer::dialogue::DialogueList;
use crate::core::composer::speakers::{SpeakerRoster, SpeakerSlot};
use crate::core::composer::CompositionMode;
use crate::core::emotion::EmotionSettings;
use crate::errors::{ComposerError, ComposerResult};

use super::messages::{
    BasicGenerationRequest, EnhancedGenerationRequest, GenerationRequest, ScriptLine,
    SpeakerScript,
};

/// Borrowed view of everything the assembler reads.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub mode: CompositionMode,
    pub title: &'a str,
    /// Selected `(model_id, branch_id)`.
    pub selection: Option<(&'a str, &'a str)>,
    pub roster: &'a SpeakerRoster,
    pub dialogue: &'a DialogueList,
    pub emotions: &'a EmotionSettings,
    /// Basic-mode text; ignored in enhanced mode.
    pub text: &'a str,
    pub priority: u32,
}

/// Builds the mode-dependent request body from the composition state.
///
/// The step gate prevents incomplete compositions from reaching this point
/// in normal operation; the checks here guard against inconsistent state
/// reached through the API directly.
pub fn assemble(input: AssemblyInput<'_>) -> ComposerResult<GenerationRequest> {
    let (model_id, branch_id) = input.selection.ok_or_else(|| {
        ComposerError::AssemblyIncomplete("no generation model selected".to_string())
    })?;

    match input.mode {
        CompositionMode::Basic => assemble_basic(input, model_id, branch_id),
        CompositionMode::Enhanced => assemble_enhanced(input, model_id, branch_id),
    }
}

fn assemble_basic(
    input: AssemblyInput<'_>,
    model_id: &str,
    branch_id: &str,
) -> ComposerResult<GenerationRequest> {
    let voice_model_id = input
        .roster
        .voice_for(SpeakerSlot::new(1))
        .ok_or_else(|| {
            ComposerError::AssemblyIncomplete("no voice model selected".to_string())
        })?
        .to_string();

    Ok(GenerationRequest::Basic(BasicGenerationRequest {
        title: input.title.to_string(),
        voice_model_id,
        text: input.text.to_string(),
        model_id: model_id.to_string(),
        model_branch_id: branch_id.to_string(),
        // Empty in auto/normal mode, the uniform map in custom mode.
        emotions: input.emotions.resolve_line_emotions(None),
        priority: input.priority,
    }))
}

fn assemble_enhanced(
    input: AssemblyInput<'_>,
    model_id: &str,
    branch_id: &str,
) -> ComposerResult<GenerationRequest> {
    let mut dialogue_script = BTreeMap::new();

    for slot in input.roster.slots() {
        let turns = input.dialogue.turns_for_slot(slot);
        if turns.is_empty() {
            // Slots without authored lines are omitted from the script.
            continue;
        }

        let voice_model_id = input.roster.voice_for(slot).ok_or_else(|| {
            ComposerError::AssemblyIncomplete(format!("{slot} has lines but no voice assigned"))
        })?;

        let lines = turns
            .iter()
            .map(|turn| ScriptLine {
                text: turn.text.clone(),
                // 1-based on the wire.
                order: turn.order + 1,
                emotions: input
                    .emotions
                    .resolve_line_emotions(turn.emotions.as_ref()),
            })
            .collect();

        dialogue_script.insert(
            slot.wire_label(),
            SpeakerScript {
                voice_model_id: voice_model_id.to_string(),
                lines,
            },
        );
    }

    Ok(GenerationRequest::Enhanced(EnhancedGenerationRequest {
        title: input.title.to_string(),
        model_id: model_id.to_string(),
        model_branch_id: branch_id.to_string(),
        priority: input.priority,
        dialogue_script,
    }))
}

// =============================================================================
// Tests
// =============================================================================
