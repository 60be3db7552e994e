//! Per-pair review states.
//!
//! Every directory pair the driver considers moves through a small, finite
//! state machine:
//!
//! ```text
//! Pending ─┬─> Skipped
//!          └─> Previewed ─┬─> Declined
//!                         └─> AwaitingTarget ─┬─> Aborted
//!                                             └─> Dispatched
//! ```
//!
//! Invalid operator input is a transition to `Aborted`, never a re-prompt.

use std::fmt;

use super::ReviewError;

/// State of one directory pair under review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReviewState {
    /// Not yet looked at
    #[default]
    Pending,
    /// The mirrored pair was already reviewed
    Skipped,
    /// Shared files were shown to the operator
    Previewed,
    /// The operator declined deletion
    Declined,
    /// The operator accepted deletion and must pick a side
    AwaitingTarget,
    /// The side selection was invalid; nothing deleted
    Aborted,
    /// A deletion job was handed to a worker
    Dispatched,
}

impl ReviewState {
    /// Check whether `next` is a legal successor of this state.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Skipped | Self::Previewed)
                | (Self::Previewed, Self::Declined | Self::AwaitingTarget)
                | (Self::AwaitingTarget, Self::Aborted | Self::Dispatched)
        )
    }

    /// Check whether no further transition is possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Skipped | Self::Declined | Self::Aborted | Self::Dispatched
        )
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Skipped => "skipped",
            Self::Previewed => "previewed",
            Self::Declined => "declined",
            Self::AwaitingTarget => "awaiting target",
            Self::Aborted => "aborted",
            Self::Dispatched => "dispatched",
        };
        f.write_str(name)
    }
}

/// Which directory of a pair to delete from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The outer (higher ranked) directory, selector `1`
    First,
    /// The partner directory, selector `2`
    Second,
}

impl Side {
    /// Parse an operator selector. Only `1` and `2` are valid.
    #[must_use]
    pub fn from_selector(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::First),
            "2" => Some(Self::Second),
            _ => None,
        }
    }
}

/// Record of one pair the driver considered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairReview {
    /// Outer directory
    pub first: String,
    /// Partner directory
    pub second: String,
    /// Number of shared files
    pub shared: usize,
    /// Side chosen for deletion, once selected
    pub target: Option<Side>,
    state: ReviewState,
}

impl PairReview {
    /// Start reviewing a pair.
    #[must_use]
    pub fn new(first: &str, second: &str, shared: usize) -> Self {
        Self {
            first: first.to_string(),
            second: second.to_string(),
            shared,
            target: None,
            state: ReviewState::Pending,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ReviewState {
        self.state
    }

    /// Directory for the chosen side.
    #[must_use]
    pub fn directory(&self, side: Side) -> &str {
        match side {
            Side::First => &self.first,
            Side::Second => &self.second,
        }
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::InvalidTransition` if `next` is not a legal successor.
    pub fn advance(&mut self, next: ReviewState) -> Result<(), ReviewError> {
        if !self.state.can_transition_to(next) {
            return Err(ReviewError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        log::trace!(
            "Pair {} <-> {}: {} -> {}",
            self.first,
            self.second,
            self.state,
            next
        );
        self.state = next;
        Ok(())
    }
}
