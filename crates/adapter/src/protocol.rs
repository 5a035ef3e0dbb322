//! Protocol module - JSON message types for rendering clients
//!
//! Line-delimited JSON. All messages have: type, seq (sequence number), ts (timestamp in ms).

use serde::{Deserialize, Serialize};

use crate::core::{GridSnapshot, SwapOutcome};
use crate::types::{Position, Value};

pub const PROTOCOL_VERSION: &str = "1.0.0";
pub const GAME_ID: &str = "match-three";

/// Grid on the wire: rows of cells, top row first, `null` for empty cells.
pub type WireGrid = Vec<Vec<Option<Value>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WirePosition {
    pub row: usize,
    pub column: usize,
}

impl From<Position> for WirePosition {
    fn from(value: Position) -> Self {
        Self {
            row: value.row,
            column: value.column,
        }
    }
}

impl From<WirePosition> for Position {
    fn from(value: WirePosition) -> Self {
        Position::new(value.row, value.column)
    }
}

pub fn wire_grid(snapshot: &GridSnapshot) -> WireGrid {
    snapshot.to_rows()
}

// ============== Client -> Server Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HelloType {
    #[serde(rename = "hello")]
    Hello,
}

impl Default for HelloType {
    fn default() -> Self {
        Self::Hello
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "command")]
    Command,
}

impl Default for CommandType {
    fn default() -> Self {
        Self::Command
    }
}

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    #[serde(default)]
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    /// Receive an observation after every state change.
    #[serde(default)]
    pub stream_observations: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandMode {
    Swap,
    Hint,
    Restart,
    Snapshot,
}

impl CommandMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandMode::Swap => "swap",
            CommandMode::Hint => "hint",
            CommandMode::Restart => "restart",
            CommandMode::Snapshot => "snapshot",
        }
    }

    /// Modes that change the game and are reserved for the controller
    pub fn mutates(self) -> bool {
        matches!(self, CommandMode::Swap | CommandMode::Restart)
    }
}

impl<'de> Deserialize<'de> for CommandMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("swap") {
            Ok(Self::Swap)
        } else if s.eq_ignore_ascii_case("hint") {
            Ok(Self::Hint)
        } else if s.eq_ignore_ascii_case("restart") {
            Ok(Self::Restart)
        } else if s.eq_ignore_ascii_case("snapshot") {
            Ok(Self::Snapshot)
        } else {
            Err(serde::de::Error::custom("invalid command mode"))
        }
    }
}

impl Serialize for CommandMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Command message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub ts: u64,
    pub mode: CommandMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<WirePosition>, // For swap mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<WirePosition>, // For swap mode
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeType {
    #[serde(rename = "outcome")]
    Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HintType {
    #[serde(rename = "hint")]
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "handshake_required")]
    HandshakeRequired,
    #[serde(rename = "protocol_mismatch")]
    ProtocolMismatch,
    #[serde(rename = "not_controller")]
    NotController,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "out_of_bounds")]
    OutOfBounds,
    #[serde(rename = "not_adjacent")]
    NotAdjacent,
    #[serde(rename = "init_exhausted")]
    InitExhausted,
    #[serde(rename = "backpressure")]
    Backpressure,
}

impl ErrorCode {
    /// Map an engine error code onto the wire vocabulary
    pub fn from_engine_code(code: &str) -> Self {
        match code {
            "out_of_bounds" => ErrorCode::OutOfBounds,
            "not_adjacent" => ErrorCode::NotAdjacent,
            "init_exhausted" => ErrorCode::InitExhausted,
            _ => ErrorCode::InvalidCommand,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignedRole {
    #[serde(rename = "controller")]
    Controller,
    #[serde(rename = "observer")]
    Observer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardInfo {
    pub rows: usize,
    pub columns: usize,
    pub elements: Value,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub role: AssignedRole,
    pub game_id: String,
    #[serde(flatten)]
    pub board: BoardInfo,
}

/// Acknowledgment for commands without a richer reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeStatus {
    #[serde(rename = "rejected")]
    Rejected,
    #[serde(rename = "resolved")]
    Resolved,
}

/// Result of a swap, replayed by the client as animation keyframes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: OutcomeType,
    pub seq: u64,
    pub ts: u64,
    pub status: OutcomeStatus,
    pub from: WirePosition,
    pub to: WirePosition,
    /// Alternating post-removal / post-refill grids; empty when rejected.
    pub snapshots: Vec<WireGrid>,
    /// Cells cleared per cascade pass.
    pub removed: Vec<u32>,
    pub points: u64,
    pub score: u64,
}

/// Full game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub rows: usize,
    pub columns: usize,
    pub grid: WireGrid,
    pub score: u64,
    pub moves_available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapPair {
    pub from: WirePosition,
    pub to: WirePosition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintMessage {
    #[serde(rename = "type")]
    pub msg_type: HintType,
    pub seq: u64,
    pub ts: u64,
    /// `null` when the board has no valid swap.
    pub swap: Option<SwapPair>,
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct TypeOnly<'a> {
                #[serde(rename = "type")]
                msg_type: Option<&'a str>,
            }
            let msg_type = serde_json::from_str::<TypeOnly>(json)?
                .msg_type
                .unwrap_or("unknown");
            if msg_type != "hello" && msg_type != "command" {
                #[derive(Debug, Deserialize)]
                struct SeqOnly {
                    seq: Option<u64>,
                }
                let seq = serde_json::from_str::<SeqOnly>(json)?.seq.unwrap_or(0);
                return Ok(ParsedMessage::Unknown(UnknownMessage { seq }));
            }
            Err(e)
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, stream_observations: bool) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: PROTOCOL_VERSION.to_string(),
        requested: RequestedCapabilities {
            stream_observations,
        },
    }
}

/// Create a swap command
pub fn create_swap(seq: u64, from: Position, to: Position) -> CommandMessage {
    CommandMessage {
        msg_type: CommandType::Command,
        seq,
        ts: current_timestamp_ms(),
        mode: CommandMode::Swap,
        from: Some(from.into()),
        to: Some(to.into()),
    }
}

/// Create a welcome message
pub fn create_welcome(
    seq: u64,
    protocol_version: &str,
    client_id: u64,
    role: AssignedRole,
    board: BoardInfo,
) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        client_id,
        role,
        game_id: GAME_ID.to_string(),
        board,
    }
}

/// Create an acknowledgment
pub fn create_ack(seq: u64) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status: AckStatus::Ok,
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Build the reply to a swap command
pub fn build_outcome(
    seq: u64,
    from: Position,
    to: Position,
    outcome: &SwapOutcome,
    score: u64,
) -> OutcomeMessage {
    let (status, snapshots, removed, points) = match outcome {
        SwapOutcome::Rejected => (OutcomeStatus::Rejected, Vec::new(), Vec::new(), 0),
        SwapOutcome::Resolved(resolution) => (
            OutcomeStatus::Resolved,
            resolution.snapshots().map(wire_grid).collect(),
            resolution.passes.iter().map(|p| p.removed).collect(),
            resolution.points,
        ),
    };

    OutcomeMessage {
        msg_type: OutcomeType::Outcome,
        seq,
        ts: current_timestamp_ms(),
        status,
        from: from.into(),
        to: to.into(),
        snapshots,
        removed,
        points,
        score,
    }
}

/// Build an observation from a grid snapshot
pub fn build_observation(
    seq: u64,
    snapshot: &GridSnapshot,
    score: u64,
    moves_available: bool,
) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        rows: snapshot.rows(),
        columns: snapshot.columns(),
        grid: wire_grid(snapshot),
        score,
        moves_available,
    }
}

pub fn build_hint(seq: u64, swap: Option<(Position, Position)>) -> HintMessage {
    HintMessage {
        msg_type: HintType::Hint,
        seq,
        ts: current_timestamp_ms(),
        swap: swap.map(|(from, to)| SwapPair {
            from: from.into(),
            to: to.into(),
        }),
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
