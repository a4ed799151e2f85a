//! WebSocket session socket.
//!
//! Each connection owns one [`Session`]. Client commands and the session's
//! own spin ticks are applied to it in order, and every outcome is pushed
//! back to the client as a [`ServerMessage`].

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::future::BoxFuture;
use futures::{FutureExt, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use foodradar_core::{
    Coordinates, FetchError, FetchOutcome, FetchSource, LocationError, Restaurant, Session,
    SessionEvent, SessionState,
};

use crate::metrics::{
    SESSION_REJECTED_TOTAL, WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_MESSAGES_SENT,
};
use crate::state::AppState;

/// Commands a client can send.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start looking for restaurants.
    Locate,
    /// The client's position.
    Location { latitude: f64, longitude: f64 },
    /// The client could not determine its position.
    LocationError { kind: LocationError },
    /// Spin over the listed restaurants.
    Spin,
    /// Clear everything and go back to idle.
    Reset,
}

/// Updates pushed to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The session moved (or was confirmed) in a state.
    State { state: SessionState },
    /// Restaurants found near the client.
    Results {
        restaurants: Vec<Restaurant>,
        source: FetchSource,
    },
    /// The spin is currently on this restaurant.
    Tick { restaurant: Restaurant },
    /// The spin landed.
    Winner { restaurant: Restaurant },
    /// Something went wrong, or a command was not allowed.
    Error { message: String },
}

impl ServerMessage {
    fn kind(&self) -> &'static str {
        match self {
            ServerMessage::State { .. } => "state",
            ServerMessage::Results { .. } => "results",
            ServerMessage::Tick { .. } => "tick",
            ServerMessage::Winner { .. } => "winner",
            ServerMessage::Error { .. } => "error",
        }
    }
}

type PendingFetch = BoxFuture<'static, Result<FetchOutcome, FetchError>>;

/// WebSocket upgrade handler.
pub async fn session_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle a single session connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerMessage>();

    WS_CONNECTIONS_TOTAL.inc();
    WS_CONNECTIONS_ACTIVE.inc();

    let send_task = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            WS_MESSAGES_SENT.with_label_values(&[msg.kind()]).inc();

            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, client disconnected");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize ServerMessage: {}", e);
                }
            }
        }
    });

    let mut driver = SessionDriver::new(state, out_tx);
    info!("Session {} connected", driver.session.id());
    driver.send(ServerMessage::State {
        state: driver.session.state(),
    });

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => driver.handle_text(text.as_str()),
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client closed the session");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Pings are answered by axum; binary frames are ignored
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket receive error: {}", e);
                        break;
                    }
                }
            }
            event = driver.session.next_spin_event() => {
                driver.dispatch(event);
            }
            result = next_fetch_result(&mut driver.fetch) => {
                driver.fetch = None;
                let event = match result {
                    Ok(outcome) => SessionEvent::FetchSucceeded(outcome),
                    Err(e) => SessionEvent::FetchFailed(e),
                };
                driver.dispatch(event);
            }
        }
    }

    if driver.session.state().is_busy() {
        debug!(
            "Session {} disconnected while {}",
            driver.session.id(),
            driver.session.state()
        );
    }
    info!("Session {} disconnected", driver.session.id());
    drop(driver);
    send_task.abort();
    WS_CONNECTIONS_ACTIVE.dec();
}

async fn next_fetch_result(fetch: &mut Option<PendingFetch>) -> Result<FetchOutcome, FetchError> {
    match fetch.as_mut() {
        Some(pending) => pending.await,
        None => std::future::pending().await,
    }
}

/// Applies client commands and background results to one session.
struct SessionDriver {
    state: Arc<AppState>,
    session: Session,
    fetch: Option<PendingFetch>,
    out: mpsc::UnboundedSender<ServerMessage>,
}

impl SessionDriver {
    fn new(state: Arc<AppState>, out: mpsc::UnboundedSender<ServerMessage>) -> Self {
        let session = state.new_session();
        Self {
            state,
            session,
            fetch: None,
            out,
        }
    }

    fn send(&self, msg: ServerMessage) {
        let _ = self.out.send(msg);
    }

    fn handle_text(&mut self, text: &str) {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(msg) => self.handle_command(msg),
            Err(e) => {
                debug!("Unreadable client message {:?}: {}", text, e);
                self.send(ServerMessage::Error {
                    message: format!("invalid message: {}", e),
                });
            }
        }
    }

    fn handle_command(&mut self, msg: ClientMessage) {
        match msg {
            ClientMessage::Locate => {
                self.dispatch(SessionEvent::Locate);
            }
            ClientMessage::Location {
                latitude,
                longitude,
            } => {
                let coords = Coordinates::new(latitude, longitude);
                if let Err(e) = coords.validate() {
                    self.send(ServerMessage::Error { message: e });
                    return;
                }
                if self.dispatch(SessionEvent::LocationAcquired(coords))
                    == Some(SessionState::Scanning)
                {
                    self.start_fetch(coords);
                }
            }
            ClientMessage::LocationError { kind } => {
                self.dispatch(SessionEvent::LocationFailed(kind));
            }
            ClientMessage::Spin => {
                self.dispatch(SessionEvent::Spin);
            }
            ClientMessage::Reset => {
                if self.fetch.take().is_some() {
                    debug!("Session {} dropped an in-flight fetch", self.session.id());
                }
                self.dispatch(SessionEvent::Reset);
            }
        }
    }

    fn start_fetch(&mut self, coords: Coordinates) {
        let fetcher = Arc::clone(self.state.fetcher());
        self.fetch = Some(async move { fetcher.fetch(coords).await }.boxed());
    }

    /// Apply an event and report the outcome to the client.
    ///
    /// Returns the new state, or `None` if the event was rejected.
    fn dispatch(&mut self, event: SessionEvent) -> Option<SessionState> {
        let tick = match &event {
            SessionEvent::Tick(restaurant) => Some(restaurant.clone()),
            _ => None,
        };
        let previous = self.session.state();

        let next = match self.session.apply(event) {
            Ok(next) => next,
            Err(e) => {
                if let foodradar_core::SessionError::InvalidTransition { event, .. } = &e {
                    SESSION_REJECTED_TOTAL.with_label_values(&[*event]).inc();
                }
                self.send(ServerMessage::Error {
                    message: e.to_string(),
                });
                return None;
            }
        };

        if let Some(restaurant) = tick {
            self.send(ServerMessage::Tick { restaurant });
            return Some(next);
        }

        self.send(ServerMessage::State { state: next });
        match next {
            SessionState::Results if previous == SessionState::Scanning => {
                if let Some(source) = self.session.source() {
                    self.send(ServerMessage::Results {
                        restaurants: self.session.restaurants().to_vec(),
                        source,
                    });
                }
            }
            SessionState::Winner => {
                if let Some(restaurant) = self.session.winner() {
                    self.send(ServerMessage::Winner {
                        restaurant: restaurant.clone(),
                    });
                }
            }
            SessionState::Error => {
                if let Some(message) = self.session.error() {
                    self.send(ServerMessage::Error {
                        message: message.to_string(),
                    });
                }
            }
            _ => {}
        }

        Some(next)
    }
}
