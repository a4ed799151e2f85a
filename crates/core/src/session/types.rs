//! Session states, events and errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fetcher::{FetchError, FetchOutcome};
use crate::restaurant::{Coordinates, Restaurant};

/// Message shown when a fetch succeeds with nothing to pick from.
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Where a session is in the find-then-pick flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Waiting for the user to start.
    Idle,
    /// Waiting for the client to report its position.
    Locating,
    /// Fetching restaurants near the reported position.
    Scanning,
    /// Restaurants are listed, ready to spin.
    Results,
    /// A spin is running.
    Picking,
    /// The spin landed on a restaurant.
    Winner,
    /// Something failed; only a reset leaves this state.
    Error,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Locating => "locating",
            SessionState::Scanning => "scanning",
            SessionState::Results => "results",
            SessionState::Picking => "picking",
            SessionState::Winner => "winner",
            SessionState::Error => "error",
        }
    }

    /// Returns true while the session waits on a collaborator or a spin.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SessionState::Locating | SessionState::Scanning | SessionState::Picking
        )
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the client could not report a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum LocationError {
    #[error("Your location is currently unavailable.")]
    Unavailable,
    #[error("Please enable location access to find food nearby.")]
    Denied,
    #[error("Finding your location took too long. Please try again.")]
    Timeout,
}

/// Inputs that drive a [`Session`](super::Session).
#[derive(Debug)]
pub enum SessionEvent {
    Locate,
    LocationAcquired(Coordinates),
    LocationFailed(LocationError),
    FetchSucceeded(FetchOutcome),
    FetchFailed(FetchError),
    Spin,
    Tick(Restaurant),
    Done(Restaurant),
    Reset,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Locate => "locate",
            SessionEvent::LocationAcquired(_) => "location_acquired",
            SessionEvent::LocationFailed(_) => "location_failed",
            SessionEvent::FetchSucceeded(_) => "fetch_succeeded",
            SessionEvent::FetchFailed(_) => "fetch_failed",
            SessionEvent::Spin => "spin",
            SessionEvent::Tick(_) => "tick",
            SessionEvent::Done(_) => "done",
            SessionEvent::Reset => "reset",
        }
    }
}

/// Errors from driving a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The event has no transition from the current state.
    #[error("cannot handle {event} while {state}")]
    InvalidTransition {
        state: SessionState,
        event: &'static str,
    },
}
