//! Game-over and victory flavor text
//!
//! The text itself comes from an external generator that may be slow or may
//! fail. The game never waits on it: the session ends immediately, a request
//! is issued, and whatever comes back is shown if it still belongs to the
//! session that asked for it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format_clock;
use crate::sim::{GamePhase, GameState};

/// Input for the game-over message generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverMessageInput {
    pub score: u32,
    /// Seconds survived
    pub survival_time: u32,
}

/// Input for the victory message generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VictoryMessageInput {
    pub player_name: String,
    pub score: u32,
    /// Elapsed time as "M:SS"
    pub time: String,
}

/// Generator output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorMessage {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum FlavorError {
    #[error("flavor text request failed: {0}")]
    Transport(String),
    #[error("malformed flavor text response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("flavor text response was empty")]
    EmptyMessage,
}

/// A request for one of the two generators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlavorRequest {
    GameOver(GameOverMessageInput),
    Victory(VictoryMessageInput),
}

impl FlavorRequest {
    /// Request matching a finished session; `None` while still playing
    pub fn for_outcome(state: &GameState, player_name: &str) -> Option<Self> {
        let outcome = state.outcome()?;
        let request = match outcome.phase {
            GamePhase::Playing => return None,
            GamePhase::GameOver => FlavorRequest::GameOver(GameOverMessageInput {
                score: outcome.score,
                survival_time: outcome.survival_secs,
            }),
            GamePhase::Victory => FlavorRequest::Victory(VictoryMessageInput {
                player_name: player_name.to_string(),
                score: outcome.score,
                time: format_clock(outcome.survival_secs),
            }),
        };
        Some(request)
    }

    pub fn phase(&self) -> GamePhase {
        match self {
            FlavorRequest::GameOver(_) => GamePhase::GameOver,
            FlavorRequest::Victory(_) => GamePhase::Victory,
        }
    }

    /// Name of the remote flow serving this request
    pub fn flow_name(&self) -> &'static str {
        match self {
            FlavorRequest::GameOver(_) => "generateGameOverMessage",
            FlavorRequest::Victory(_) => "generateVictoryMessage",
        }
    }

    /// JSON body sent to the generator
    pub fn payload_json(&self) -> Result<String, FlavorError> {
        let json = match self {
            FlavorRequest::GameOver(input) => serde_json::to_string(input)?,
            FlavorRequest::Victory(input) => serde_json::to_string(input)?,
        };
        Ok(json)
    }
}

/// Parse a generator response body
pub fn decode_message(json: &str) -> Result<FlavorMessage, FlavorError> {
    let reply: FlavorMessage = serde_json::from_str(json)?;
    let message = reply.message.trim();
    if message.is_empty() {
        return Err(FlavorError::EmptyMessage);
    }
    Ok(FlavorMessage {
        message: message.to_string(),
    })
}

/// Synchronous seam for flavor text generators
pub trait FlavorSource {
    fn generate(&mut self, request: &FlavorRequest) -> Result<FlavorMessage, FlavorError>;
}

/// Offline generator with canned 80s trailer lines
#[derive(Debug, Clone, Default)]
pub struct CannedFlavor;

impl FlavorSource for CannedFlavor {
    fn generate(&mut self, request: &FlavorRequest) -> Result<FlavorMessage, FlavorError> {
        let message = match request {
            FlavorRequest::GameOver(input) if input.score == 0 => format!(
                "IN A GALAXY WITH NO MERCY... one pilot lasted {} seconds. \
                 The asteroids didn't even notice.",
                input.survival_time
            ),
            FlavorRequest::GameOver(input) => format!(
                "THIS SUMMER... {} points. {} seconds of pure neon fury. \
                 The rocks won this round. Nobody beats the belt forever.",
                input.score, input.survival_time
            ),
            FlavorRequest::Victory(input) => format!(
                "{}! SECTOR CLEARED IN {}! {} POINTS OF GLOWING GLORY! \
                 THE BELT IS SILENT. THE LEGEND IS BORN.",
                input.player_name.to_uppercase(),
                input.time,
                input.score
            ),
        };
        Ok(FlavorMessage { message })
    }
}

/// Identifies the session and phase a request was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlavorTicket {
    pub generation: u64,
    pub phase: GamePhase,
}

/// Flavor text slot guarded by session generation
#[derive(Debug, Clone, Default)]
pub struct FlavorBoard {
    generation: u64,
    pending: Option<FlavorTicket>,
    message: Option<String>,
}

impl FlavorBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything from earlier sessions
    pub fn begin_session(&mut self, generation: u64) {
        self.generation = generation;
        self.pending = None;
        self.message = None;
    }

    /// Record that a request for the session's terminal phase is in flight
    pub fn issue(&mut self, state: &GameState) -> FlavorTicket {
        if state.generation != self.generation {
            self.begin_session(state.generation);
        }
        let ticket = FlavorTicket {
            generation: state.generation,
            phase: state.phase,
        };
        self.pending = Some(ticket);
        self.message = None;
        ticket
    }

    /// Apply a finished request
    ///
    /// Replies for another session, or for a request that is no longer the
    /// pending one, are dropped. Failures leave the slot blank. Returns true
    /// if a message was stored.
    pub fn resolve(
        &mut self,
        ticket: FlavorTicket,
        result: Result<FlavorMessage, FlavorError>,
    ) -> bool {
        if self.pending != Some(ticket) || ticket.generation != self.generation {
            log::debug!(
                "Discarding stale flavor text (generation {}, current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.pending = None;
        match result {
            Ok(reply) => {
                self.message = Some(reply.message);
                true
            }
            Err(e) => {
                log::warn!("No flavor text for {:?}: {}", ticket.phase, e);
                false
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Text to display; blank until a reply lands
    pub fn display_text(&self) -> &str {
        self.message().unwrap_or("")
    }
}

/// Issue and immediately fulfil a request with a synchronous source
pub fn request_now<S: FlavorSource>(
    board: &mut FlavorBoard,
    source: &mut S,
    state: &GameState,
    player_name: &str,
) -> bool {
    let Some(request) = FlavorRequest::for_outcome(state, player_name) else {
        return false;
    };
    let ticket = board.issue(state);
    let result = source.generate(&request);
    board.resolve(ticket, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn finished(phase: GamePhase, remaining: u32, score: u32) -> GameState {
        let mut state = GameState::new(5);
        state.phase = phase;
        state.time_remaining = remaining;
        state.score = score;
        state
    }

    #[test]
    fn test_no_request_while_playing() {
        let state = GameState::new(5);
        assert_eq!(FlavorRequest::for_outcome(&state, "Ace"), None);
    }

    #[test]
    fn test_game_over_request() {
        let state = finished(GamePhase::GameOver, 75, 300);
        let request = FlavorRequest::for_outcome(&state, "Ace").expect("terminal");
        assert_eq!(
            request,
            FlavorRequest::GameOver(GameOverMessageInput { score: 300, survival_time: 45 })
        );
        assert_eq!(request.flow_name(), "generateGameOverMessage");
        assert_eq!(
            request.payload_json().expect("serializes"),
            r#"{"score":300,"survivalTime":45}"#
        );
    }

    #[test]
    fn test_victory_request_formats_time() {
        let state = finished(GamePhase::Victory, INITIAL_TIME_SECS - 65, 1200);
        let request = FlavorRequest::for_outcome(&state, "Nova").expect("terminal");
        assert_eq!(request.phase(), GamePhase::Victory);
        assert_eq!(
            request.payload_json().expect("serializes"),
            r#"{"playerName":"Nova","score":1200,"time":"1:05"}"#
        );
    }

    #[test]
    fn test_decode_message() {
        let reply = decode_message(r#"{"message":"  GAME OVER, MAN.  "}"#).expect("valid");
        assert_eq!(reply.message, "GAME OVER, MAN.");
        assert!(matches!(decode_message(r#"{"message":"   "}"#), Err(FlavorError::EmptyMessage)));
        assert!(matches!(decode_message("<html>"), Err(FlavorError::Decode(_))));
    }

    #[test]
    fn test_board_accepts_current_reply() {
        let state = finished(GamePhase::GameOver, 10, 0);
        let mut board = FlavorBoard::new();
        let ticket = board.issue(&state);
        assert!(board.is_pending());
        assert_eq!(board.display_text(), "");

        let stored = board.resolve(ticket, Ok(FlavorMessage { message: "BOOM".into() }));
        assert!(stored);
        assert_eq!(board.message(), Some("BOOM"));
        assert!(!board.is_pending());
    }

    #[test]
    fn test_board_failure_leaves_blank() {
        let state = finished(GamePhase::Victory, 10, 500);
        let mut board = FlavorBoard::new();
        let ticket = board.issue(&state);
        let stored = board.resolve(ticket, Err(FlavorError::Transport("timeout".into())));
        assert!(!stored);
        assert_eq!(board.display_text(), "");
        assert!(!board.is_pending());
    }

    #[test]
    fn test_board_discards_stale_generation() {
        let mut state = finished(GamePhase::GameOver, 10, 0);
        let mut board = FlavorBoard::new();
        let old_ticket = board.issue(&state);

        // Player resets before the reply lands
        state.reset();
        board.begin_session(state.generation);

        let stored = board.resolve(old_ticket, Ok(FlavorMessage { message: "late".into() }));
        assert!(!stored);
        assert_eq!(board.message(), None);

        // Same session ends again; only the fresh ticket is honoured
        state.phase = GamePhase::GameOver;
        let ticket = board.issue(&state);
        assert!(!board.resolve(old_ticket, Ok(FlavorMessage { message: "late".into() })));
        assert!(board.resolve(ticket, Ok(FlavorMessage { message: "fresh".into() })));
        assert_eq!(board.message(), Some("fresh"));
    }

    #[test]
    fn test_request_now_with_canned_source() {
        let state = finished(GamePhase::Victory, 100, 900);
        let mut board = FlavorBoard::new();
        assert!(request_now(&mut board, &mut CannedFlavor, &state, "Ace"));
        let text = board.display_text();
        assert!(text.contains("ACE"));
        assert!(text.contains("0:20"));
        assert!(text.contains("900"));
    }

    #[test]
    fn test_request_now_skips_live_session() {
        let state = GameState::new(1);
        let mut board = FlavorBoard::new();
        assert!(!request_now(&mut board, &mut CannedFlavor, &state, "Ace"));
        assert!(!board.is_pending());
    }
}
