//! The five-step progression gate.
//!
//! A linear state machine over the composition steps. Forward movement is
//! gated on the current step's completion predicate (evaluated by the
//! session, which can see every component); backward movement is always
//! allowed above step 1. Entirely synchronous - the gate itself holds no
//! timers and no async state.

use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// Step
// =============================================================================

/// The ordered composition steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Title and (when several are on offer) model choice.
    BasicInfo,
    /// Voice assignment per speaker slot.
    Voices,
    /// Expression mode and custom intensities.
    Emotion,
    /// Text (basic) or dialogue script (enhanced).
    Script,
    /// Review and submit. Terminal; never reports complete.
    Review,
}

impl Step {
    /// All steps in order.
    pub const fn all() -> &'static [Step] {
        &[
            Step::BasicInfo,
            Step::Voices,
            Step::Emotion,
            Step::Script,
            Step::Review,
        ]
    }

    /// 1-based step number as shown to the operator.
    #[inline]
    pub const fn number(&self) -> u8 {
        match self {
            Step::BasicInfo => 1,
            Step::Voices => 2,
            Step::Emotion => 3,
            Step::Script => 4,
            Step::Review => 5,
        }
    }

    /// The step for a 1-based number.
    pub const fn from_number(number: u8) -> Option<Step> {
        match number {
            1 => Some(Step::BasicInfo),
            2 => Some(Step::Voices),
            3 => Some(Step::Emotion),
            4 => Some(Step::Script),
            5 => Some(Step::Review),
            _ => None,
        }
    }

    /// The following step, if any.
    pub const fn next(&self) -> Option<Step> {
        match self {
            Step::BasicInfo => Some(Step::Voices),
            Step::Voices => Some(Step::Emotion),
            Step::Emotion => Some(Step::Script),
            Step::Script => Some(Step::Review),
            Step::Review => None,
        }
    }

    /// The preceding step, if any.
    pub const fn previous(&self) -> Option<Step> {
        match self {
            Step::BasicInfo => None,
            Step::Voices => Some(Step::BasicInfo),
            Step::Emotion => Some(Step::Voices),
            Step::Script => Some(Step::Emotion),
            Step::Review => Some(Step::Script),
        }
    }
}

// =============================================================================
// StepGate
// =============================================================================

/// Holds the current step and enforces gated progression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepGate {
    current: Step,
}

impl Default for StepGate {
    fn default() -> Self {
        Self::new()
    }
}

impl StepGate {
    /// A gate positioned on step 1.
    pub fn new() -> Self {
        Self {
            current: Step::BasicInfo,
        }
    }

    /// The step the composition currently sits on.
    #[inline]
    pub fn current(&self) -> Step {
        self.current
    }

    /// Moves forward when the caller reports the current step complete.
    /// A silent no-op otherwise (incomplete steps surface inline, never as
    /// errors). Returns whether the gate moved.
    pub fn advance_if(&mut self, current_complete: bool) -> bool {
        if !current_complete {
            return false;
        }
        match self.current.next() {
            Some(next) => {
                debug!(from = ?self.current, to = ?next, "advancing composition step");
                self.current = next;
                true
            }
            None => false,
        }
    }

    /// Moves back one step. Always allowed above step 1. Returns whether
    /// the gate moved.
    pub fn retreat(&mut self) -> bool {
        match self.current.previous() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    /// Back to step 1 (post-submission reset).
    pub fn reset(&mut self) {
        self.current = Step::BasicInfo;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbering_round_trips() {
        for step in Step::all() {
            assert_eq!(Step::from_number(step.number()), Some(*step));
        }
        assert_eq!(Step::from_number(0), None);
        assert_eq!(Step::from_number(6), None);
    }

    #[test]
    fn test_step_ordering_is_linear() {
        let steps = Step::all();
        for pair in steps.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
            assert_eq!(pair[1].previous(), Some(pair[0]));
        }
        assert_eq!(Step::Review.next(), None);
        assert_eq!(Step::BasicInfo.previous(), None);
    }

    #[test]
    fn test_advance_gated_on_completion() {
        let mut gate = StepGate::new();
        assert!(!gate.advance_if(false));
        assert_eq!(gate.current(), Step::BasicInfo);

        assert!(gate.advance_if(true));
        assert_eq!(gate.current(), Step::Voices);
    }

    #[test]
    fn test_advance_stops_at_review() {
        let mut gate = StepGate::new();
        for _ in 0..4 {
            assert!(gate.advance_if(true));
        }
        assert_eq!(gate.current(), Step::Review);
        assert!(!gate.advance_if(true));
        assert_eq!(gate.current(), Step::Review);
    }

    #[test]
    fn test_retreat_always_allowed_above_step_one() {
        let mut gate = StepGate::new();
        gate.advance_if(true);
        gate.advance_if(true);
        assert!(gate.retreat());
        assert_eq!(gate.current(), Step::Voices);
        assert!(gate.retreat());
        assert_eq!(gate.current(), Step::BasicInfo);
        assert!(!gate.retreat());
    }

    #[test]
    fn test_reset_returns_to_step_one() {
        let mut gate = StepGate::new();
        gate.advance_if(true);
        gate.advance_if(true);
        gate.reset();
        assert_eq!(gate.current(), Step::BasicInfo);
    }
}
