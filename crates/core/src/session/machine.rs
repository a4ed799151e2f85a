//! The session state machine.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::fetcher::FetchSource;
use crate::picker::{Picker, SpinHandle};
use crate::restaurant::{Coordinates, Restaurant};

use super::types::{SessionError, SessionEvent, SessionState, NO_RESULTS_MESSAGE};

/// A running spin and the channel its ticks arrive on.
#[derive(Debug)]
struct ActiveSpin {
    handle: SpinHandle,
    events: mpsc::UnboundedReceiver<SessionEvent>,
}

/// One user's find-then-pick flow.
///
/// Events are applied with [`apply`](Self::apply). Entering
/// [`SessionState::Picking`] starts a spin that the session owns; its ticks
/// are delivered by [`next_spin_event`](Self::next_spin_event) and must be
/// applied like any other event. Leaving `Picking` by anything other than
/// the spin's own completion cancels the spin and discards pending ticks.
#[derive(Debug)]
pub struct Session {
    id: String,
    picker: Picker,
    state: SessionState,
    location: Option<Coordinates>,
    restaurants: Vec<Restaurant>,
    source: Option<FetchSource>,
    highlighted: Option<Restaurant>,
    winner: Option<Restaurant>,
    error: Option<String>,
    spin: Option<ActiveSpin>,
}

impl Session {
    pub fn new(picker: Picker) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            picker,
            state: SessionState::Idle,
            location: None,
            restaurants: Vec::new(),
            source: None,
            highlighted: None,
            winner: None,
            error: None,
            spin: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn location(&self) -> Option<Coordinates> {
        self.location
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn source(&self) -> Option<FetchSource> {
        self.source
    }

    /// The restaurant shown by the latest tick.
    pub fn highlighted(&self) -> Option<&Restaurant> {
        self.highlighted.as_ref()
    }

    pub fn winner(&self) -> Option<&Restaurant> {
        self.winner.as_ref()
    }

    /// User-facing message while in [`SessionState::Error`].
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    /// Apply an event and return the new state.
    ///
    /// An event with no transition from the current state is rejected and
    /// leaves the session untouched. `Reset` is accepted from every state.
    pub fn apply(&mut self, event: SessionEvent) -> Result<SessionState, SessionError> {
        let next = match (self.state, event) {
            (_, SessionEvent::Reset) => {
                self.reset();
                SessionState::Idle
            }
            (SessionState::Idle, SessionEvent::Locate) => SessionState::Locating,
            (SessionState::Locating, SessionEvent::LocationAcquired(coords)) => {
                self.location = Some(coords);
                SessionState::Scanning
            }
            (SessionState::Locating, SessionEvent::LocationFailed(e)) => self.fail(e.to_string()),
            (SessionState::Scanning, SessionEvent::FetchSucceeded(outcome)) => {
                if outcome.restaurants.is_empty() {
                    self.fail(NO_RESULTS_MESSAGE.to_string())
                } else {
                    self.restaurants = outcome.restaurants;
                    self.source = Some(outcome.source);
                    SessionState::Results
                }
            }
            (SessionState::Scanning, SessionEvent::FetchFailed(e)) => self.fail(e.to_string()),
            (SessionState::Results, SessionEvent::Spin) => {
                self.start_spin();
                SessionState::Picking
            }
            (SessionState::Picking, SessionEvent::Tick(restaurant)) => {
                self.highlighted = Some(restaurant);
                SessionState::Picking
            }
            (SessionState::Picking, SessionEvent::Done(restaurant)) => {
                self.spin = None;
                self.highlighted = Some(restaurant.clone());
                self.winner = Some(restaurant);
                SessionState::Winner
            }
            (state, event) => {
                debug!(
                    "Session {} rejected {} while {}",
                    self.id,
                    event.name(),
                    state
                );
                return Err(SessionError::InvalidTransition {
                    state,
                    event: event.name(),
                });
            }
        };

        if next != self.state {
            debug!("Session {}: {} -> {}", self.id, self.state, next);
        }
        self.state = next;
        Ok(next)
    }

    /// Wait for the next tick or completion of the running spin.
    ///
    /// Never resolves while no spin is running, so it can sit in a
    /// `tokio::select!` next to other inputs.
    pub async fn next_spin_event(&mut self) -> SessionEvent {
        if let Some(spin) = self.spin.as_mut() {
            if let Some(event) = spin.events.recv().await {
                return event;
            }
        }
        std::future::pending().await
    }

    fn start_spin(&mut self) {
        let (tx, events) = mpsc::unbounded_channel();
        let done_tx = tx.clone();

        let handle = self.picker.spin(
            self.restaurants.clone(),
            move |restaurant| {
                let _ = tx.send(SessionEvent::Tick(restaurant.clone()));
            },
            move |restaurant| {
                let _ = done_tx.send(SessionEvent::Done(restaurant));
            },
        );

        info!(
            "Session {} spinning over {} restaurants",
            self.id,
            self.restaurants.len()
        );
        self.highlighted = None;
        self.winner = None;
        self.spin = Some(ActiveSpin { handle, events });
    }

    fn fail(&mut self, message: String) -> SessionState {
        warn!("Session {} failed: {}", self.id, message);
        self.error = Some(message);
        SessionState::Error
    }

    fn reset(&mut self) {
        if let Some(mut spin) = self.spin.take() {
            debug!("Session {} cancelling spin", self.id);
            spin.handle.cancel();
        }
        self.location = None;
        self.restaurants.clear();
        self.source = None;
        self.highlighted = None;
        self.winner = None;
        self.error = None;
    }
}
