//! Simulation State Machine
//!
//! The conversation lifecycle as an explicit state enum with a pure
//! transition function, testable independently of the async driver loop.

use serde::{Deserialize, Serialize};

/// Lifecycle state of one simulated interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationState {
    /// Greeting not yet delivered
    Opening,
    /// Main question loop
    Interviewing,
    /// Interviewer said goodbye; one participant farewell remains
    WrappingUp,
    /// Terminal
    Concluded,
}

/// Things that can happen to a simulated interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEvent {
    /// The opening greeting was appended
    GreetingDelivered,
    /// The completion check passed (naturally or forced) and a closing turn
    /// was appended
    CompletionReached,
    /// The latest interviewer turn classified as a natural closing
    ClosingDetected,
    /// The participant replied to the goodbye
    FarewellExchanged,
    /// The participant disengaged
    ParticipantDropped,
    /// Turn or time budget ran out
    BudgetExhausted,
}

impl SimulationState {
    /// Pure transition function.
    ///
    /// Events that make no sense in the current state leave it unchanged;
    /// the driver loop only ever feeds events the state allows.
    pub fn transition(self, event: SimulationEvent) -> SimulationState {
        use SimulationEvent::*;
        use SimulationState::*;

        match (self, event) {
            (_, ParticipantDropped) | (_, BudgetExhausted) => Concluded,
            (Opening, GreetingDelivered) => Interviewing,
            (Interviewing, CompletionReached) => Concluded,
            (Interviewing, ClosingDetected) => WrappingUp,
            (WrappingUp, FarewellExchanged) => Concluded,
            (state, _) => state,
        }
    }

    /// True when the interview can still take turns.
    pub fn is_active(self) -> bool {
        self != SimulationState::Concluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SimulationEvent::*;
    use SimulationState::*;

    #[test]
    fn test_happy_path() {
        let s = Opening.transition(GreetingDelivered);
        assert_eq!(s, Interviewing);
        let s = s.transition(CompletionReached);
        assert_eq!(s, Concluded);
        assert!(!s.is_active());
    }

    #[test]
    fn test_wrap_up_handshake() {
        let s = Interviewing.transition(ClosingDetected);
        assert_eq!(s, WrappingUp);
        assert_eq!(s.transition(FarewellExchanged), Concluded);
    }

    #[test]
    fn test_drop_off_concludes_from_any_state() {
        assert_eq!(Opening.transition(ParticipantDropped), Concluded);
        assert_eq!(Interviewing.transition(ParticipantDropped), Concluded);
        assert_eq!(WrappingUp.transition(ParticipantDropped), Concluded);
    }

    #[test]
    fn test_budget_exhaustion_concludes() {
        assert_eq!(Interviewing.transition(BudgetExhausted), Concluded);
    }

    #[test]
    fn test_irrelevant_events_do_not_move_state() {
        assert_eq!(Opening.transition(FarewellExchanged), Opening);
        assert_eq!(Interviewing.transition(GreetingDelivered), Interviewing);
        assert_eq!(Concluded.transition(GreetingDelivered), Concluded);
    }
}
