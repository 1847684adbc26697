use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Initiated,
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid booking status transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: BookingStatus,
    pub to: BookingStatus,
}

/// Outcome of a legal transition. Re-entering `completed` from `completed` is
/// an idempotent no-op rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Changed,
    NoOp,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Initiated => "initiated",
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "initiated" => Some(BookingStatus::Initiated),
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "in_progress" => Some(BookingStatus::InProgress),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "no_show" => Some(BookingStatus::NoShow),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }

    /// Only completed bookings ever become payout-eligible.
    pub fn is_payout_eligible(&self) -> bool {
        matches!(self, BookingStatus::Completed)
    }

    fn next_in_flow(&self) -> Option<BookingStatus> {
        match self {
            BookingStatus::Initiated => Some(BookingStatus::Pending),
            BookingStatus::Pending => Some(BookingStatus::Confirmed),
            BookingStatus::Confirmed => Some(BookingStatus::InProgress),
            BookingStatus::InProgress => Some(BookingStatus::Completed),
            _ => None,
        }
    }

    /// Applies the state machine rules for a transition from `self` to `to`.
    ///
    /// The happy path advances one step at a time; `cancelled` and `no_show`
    /// are reachable from any non-terminal state; leaving a terminal state is
    /// always an `InvalidTransition`.
    pub fn transition_to(self, to: BookingStatus) -> Result<TransitionOutcome, InvalidTransition> {
        if self == BookingStatus::Completed && to == BookingStatus::Completed {
            return Ok(TransitionOutcome::NoOp);
        }
        if self.is_terminal() {
            return Err(InvalidTransition { from: self, to });
        }

        match to {
            BookingStatus::Cancelled | BookingStatus::NoShow => Ok(TransitionOutcome::Changed),
            _ if self.next_in_flow() == Some(to) => Ok(TransitionOutcome::Changed),
            _ => Err(InvalidTransition { from: self, to }),
        }
    }
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_advances_one_step_at_a_time() {
        let flow = [
            BookingStatus::Initiated,
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::InProgress,
            BookingStatus::Completed,
        ];
        for pair in flow.windows(2) {
            assert_eq!(
                pair[0].transition_to(pair[1]),
                Ok(TransitionOutcome::Changed)
            );
        }
    }

    #[test]
    fn skipping_ahead_is_rejected() {
        assert!(
            BookingStatus::Initiated
                .transition_to(BookingStatus::Completed)
                .is_err()
        );
        assert!(
            BookingStatus::Pending
                .transition_to(BookingStatus::InProgress)
                .is_err()
        );
    }

    #[test]
    fn cancellation_reachable_from_any_non_terminal_state() {
        for from in [
            BookingStatus::Initiated,
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::InProgress,
        ] {
            assert_eq!(
                from.transition_to(BookingStatus::Cancelled),
                Ok(TransitionOutcome::Changed)
            );
            assert_eq!(
                from.transition_to(BookingStatus::NoShow),
                Ok(TransitionOutcome::Changed)
            );
        }
    }

    #[test]
    fn cancelled_to_completed_always_fails() {
        assert_eq!(
            BookingStatus::Cancelled.transition_to(BookingStatus::Completed),
            Err(InvalidTransition {
                from: BookingStatus::Cancelled,
                to: BookingStatus::Completed,
            })
        );
    }

    #[test]
    fn terminal_states_reject_every_exit() {
        for from in [
            BookingStatus::Cancelled,
            BookingStatus::NoShow,
            BookingStatus::Completed,
        ] {
            for to in [
                BookingStatus::Initiated,
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                BookingStatus::InProgress,
                BookingStatus::Cancelled,
            ] {
                assert!(from.transition_to(to).is_err(), "{from} -> {to} must fail");
            }
        }
    }

    #[test]
    fn completed_to_completed_is_a_noop() {
        assert_eq!(
            BookingStatus::Completed.transition_to(BookingStatus::Completed),
            Ok(TransitionOutcome::NoOp)
        );
    }

    #[test]
    fn only_completed_is_payout_eligible() {
        assert!(BookingStatus::Completed.is_payout_eligible());
        assert!(!BookingStatus::Cancelled.is_payout_eligible());
        assert!(!BookingStatus::InProgress.is_payout_eligible());
    }
}
