//! Wire types for the generation submission endpoint.
//!
//! The endpoint accepts one of two request shapes, selected by composition
//! mode:
//!
//! Basic (single speaker):
//! ```json
//! {
//!   "title": "Demo",
//!   "voiceModelId": "v-ava",
//!   "text": "Hello world",
//!   "modelId": "chorus-v2",
//!   "modelBranchId": "standard",
//!   "emotions": { "happy": 50 },
//!   "priority": 0
//! }
//! ```
//!
//! Enhanced (multi-speaker dialogue):
//! ```json
//! {
//!   "title": "Demo",
//!   "modelId": "chorus-v2",
//!   "modelBranchId": "standard",
//!   "priority": 0,
//!   "dialogueScript": {
//!     "Speaker_1": {
//!       "voiceModelId": "v-ava",
//!       "lines": [{ "text": "hi", "order": 1, "emotions": {} }]
//!     }
//!   }
//! }
//! ```
//!
//! Line `order` values are **1-based** on the wire; the internal model is
//! 0-based and the assembler performs the translation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::emotion::EmotionValues;

/// Queue priority attached to every request when the caller does not
/// override it.
pub const DEFAULT_PRIORITY: u32 = 0;

// =============================================================================
// Script Types
// =============================================================================

/// One line of a speaker's script block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    /// Text to synthesize, verbatim.
    pub text: String,

    /// 1-based position in the overall script.
    pub order: u32,

    /// Emotion intensities for this line. Always present on the wire, empty
    /// when no expression applies.
    pub emotions: EmotionValues,
}

/// One speaker's block inside the dialogue script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerScript {
    /// The voice model bound to this speaker.
    pub voice_model_id: String,

    /// The speaker's lines, sorted by `order`.
    pub lines: Vec<ScriptLine>,
}

// =============================================================================
// Request Types
// =============================================================================

/// Basic-mode request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicGenerationRequest {
    pub title: String,
    pub voice_model_id: String,
    pub text: String,
    pub model_id: String,
    pub model_branch_id: String,
    /// The emotion map exactly as the expression model computed it (empty
    /// object in normal mode).
    pub emotions: EmotionValues,
    pub priority: u32,
}

/// Enhanced-mode request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedGenerationRequest {
    pub title: String,
    pub model_id: String,
    pub model_branch_id: String,
    pub priority: u32,
    /// Speaker blocks keyed `Speaker_<slot>`.
    pub dialogue_script: BTreeMap<String, SpeakerScript>,
}

/// A complete submission body, mode-dependent shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationRequest {
    Enhanced(EnhancedGenerationRequest),
    Basic(BasicGenerationRequest),
}

impl GenerationRequest {
    /// The request title, either shape.
    pub fn title(&self) -> &str {
        match self {
            GenerationRequest::Basic(r) => &r.title,
            GenerationRequest::Enhanced(r) => &r.title,
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Opaque acknowledgement from the submission endpoint. The composer never
/// polls for completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionAck {
    /// Server-side identifier of the queued generation.
    pub request_id: String,

    /// Queue status string, when the service reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Error envelope the service attaches to non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    /// Human-readable failure description.
    pub message: String,

    /// Machine-readable error code, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::emotion::Emotion;

    #[test]
    fn test_basic_request_serialization_uses_camel_case() {
        let request = GenerationRequest::Basic(BasicGenerationRequest {
            title: "Demo".into(),
            voice_model_id: "v-ava".into(),
            text: "Hello".into(),
            model_id: "chorus-v2".into(),
            model_branch_id: "standard".into(),
            emotions: EmotionValues::new(),
            priority: DEFAULT_PRIORITY,
        });

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["voiceModelId"], "v-ava");
        assert_eq!(json["modelBranchId"], "standard");
        assert_eq!(json["priority"], 0);
        // Empty emotions serialize as an empty object, not null.
        assert!(json["emotions"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_basic_request_emotions_map_keys() {
        let mut emotions = EmotionValues::new();
        emotions.insert(Emotion::Happy, 50);
        let request = BasicGenerationRequest {
            title: "t".into(),
            voice_model_id: "v".into(),
            text: "x".into(),
            model_id: "m".into(),
            model_branch_id: "b".into(),
            emotions,
            priority: 0,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["emotions"]["happy"], 50);
    }

    #[test]
    fn test_enhanced_request_serialization_shape() {
        let mut script = BTreeMap::new();
        script.insert(
            "Speaker_1".to_string(),
            SpeakerScript {
                voice_model_id: "vA".into(),
                lines: vec![ScriptLine {
                    text: "hi".into(),
                    order: 1,
                    emotions: EmotionValues::new(),
                }],
            },
        );

        let request = GenerationRequest::Enhanced(EnhancedGenerationRequest {
            title: "Demo".into(),
            model_id: "m".into(),
            model_branch_id: "b".into(),
            priority: 0,
            dialogue_script: script,
        });

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["dialogueScript"]["Speaker_1"]["voiceModelId"], "vA");
        assert_eq!(json["dialogueScript"]["Speaker_1"]["lines"][0]["order"], 1);
        assert!(json.get("voiceModelId").is_none());
        assert!(json.get("text").is_none());
    }

    #[test]
    fn test_untagged_round_trip_picks_correct_variant() {
        let basic = GenerationRequest::Basic(BasicGenerationRequest {
            title: "t".into(),
            voice_model_id: "v".into(),
            text: "x".into(),
            model_id: "m".into(),
            model_branch_id: "b".into(),
            emotions: EmotionValues::new(),
            priority: 0,
        });
        let json = serde_json::to_string(&basic).unwrap();
        let parsed: GenerationRequest = serde_json::from_str(&json).unwrap();
        assert!(matches!(parsed, GenerationRequest::Basic(_)));

        let enhanced = GenerationRequest::Enhanced(EnhancedGenerationRequest {
            title: "t".into(),
            model_id: "m".into(),
            model_branch_id: "b".into(),
            priority: 0,
            dialogue_script: BTreeMap::new(),
        });
        let json = serde_json::to_string(&enhanced).unwrap();
        let parsed: GenerationRequest = serde_json::from_str(&json).unwrap();
        assert!(matches!(parsed, GenerationRequest::Enhanced(_)));
    }

    #[test]
    fn test_submission_ack_deserialization() {
        let ack: SubmissionAck =
            serde_json::from_str(r#"{"requestId": "gen-123", "status": "queued"}"#).unwrap();
        assert_eq!(ack.request_id, "gen-123");
        assert_eq!(ack.status.as_deref(), Some("queued"));

        let minimal: SubmissionAck = serde_json::from_str(r#"{"requestId": "gen-1"}"#).unwrap();
        assert!(minimal.status.is_none());
    }

    #[test]
    fn test_service_error_body_deserialization() {
        let body: ServiceErrorBody =
            serde_json::from_str(r#"{"message": "quota exceeded", "code": "quota"}"#).unwrap();
        assert_eq!(body.message, "quota exceeded");
        assert_eq!(body.code.as_deref(), Some("quota"));
    }
}
