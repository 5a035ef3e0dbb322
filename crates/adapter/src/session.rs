//! Engine-side command handling
//!
//! The session owns the [`MatchEngine`] and turns each [`InboundCommand`]
//! into the reply lines the server should deliver. It runs on whichever
//! thread drives the game; the server never touches engine state.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::{MatchEngine, SimpleRng, SwapOutcome, ValueSource};
use crate::protocol::*;
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};

/// Serialize a message into one protocol line (without the trailing newline).
pub fn encode<T: Serialize>(msg: &T) -> Option<String> {
    match serde_json::to_string(msg) {
        Ok(line) => Some(line),
        Err(e) => {
            warn!(error = %e, "failed to encode outbound message");
            None
        }
    }
}

pub struct Session<R = SimpleRng> {
    engine: MatchEngine<R>,
    swaps: u64,
}

impl<R: ValueSource> Session<R> {
    pub fn new(engine: MatchEngine<R>) -> Self {
        Self { engine, swaps: 0 }
    }

    pub fn engine(&self) -> &MatchEngine<R> {
        &self.engine
    }

    /// Committed swaps since the last restart
    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    pub fn board_info(&self) -> BoardInfo {
        let config = self.engine.config();
        BoardInfo {
            rows: config.rows,
            columns: config.columns,
            elements: config.elements,
        }
    }

    /// Current state as an observation message
    pub fn observation(&mut self, seq: u64) -> ObservationMessage {
        let moves_available = self.engine.has_valid_swap();
        build_observation(seq, &self.engine.snapshot(), self.engine.score(), moves_available)
    }

    /// Apply one command and collect the messages it produces.
    pub fn handle(&mut self, inbound: InboundCommand) -> Vec<OutboundMessage> {
        let InboundCommand {
            client_id,
            seq,
            payload,
        } = inbound;
        let mut out = Vec::new();
        let reply = |line: Option<String>, out: &mut Vec<OutboundMessage>| {
            if let Some(line) = line {
                out.push(OutboundMessage::ToClient { client_id, line });
            }
        };

        let command = match payload {
            InboundPayload::SnapshotRequest => ClientCommand::Snapshot,
            InboundPayload::Command(command) => command,
        };

        match command {
            ClientCommand::Snapshot => {
                let obs = self.observation(seq);
                reply(encode(&obs), &mut out);
            }
            ClientCommand::Hint => {
                let hint = build_hint(seq, self.engine.find_valid_swap());
                reply(encode(&hint), &mut out);
            }
            ClientCommand::Swap { from, to } => match self.engine.try_swap(from, to) {
                Ok(outcome) => {
                    let msg = build_outcome(seq, from, to, &outcome, self.engine.score());
                    reply(encode(&msg), &mut out);
                    if let SwapOutcome::Resolved(resolution) = &outcome {
                        self.swaps += 1;
                        debug!(
                            client_id,
                            %from,
                            %to,
                            passes = resolution.pass_count(),
                            points = resolution.points,
                            "swap resolved"
                        );
                        self.broadcast_observation(seq, &mut out);
                    }
                }
                Err(e) => {
                    let err = create_error(seq, ErrorCode::from_engine_code(e.code()), &e.to_string());
                    reply(encode(&err), &mut out);
                }
            },
            ClientCommand::Restart => match self.engine.init() {
                Ok(()) => {
                    info!(client_id, previous_swaps = self.swaps, "game restarted");
                    self.swaps = 0;
                    reply(encode(&create_ack(seq)), &mut out);
                    self.broadcast_observation(seq, &mut out);
                }
                Err(e) => {
                    warn!(error = %e, "restart failed");
                    let err = create_error(seq, ErrorCode::from_engine_code(e.code()), &e.to_string());
                    reply(encode(&err), &mut out);
                }
            },
        }

        out
    }

    fn broadcast_observation(&mut self, seq: u64, out: &mut Vec<OutboundMessage>) {
        let obs = self.observation(seq);
        if let Some(line) = encode(&obs) {
            out.push(OutboundMessage::Broadcast { line });
        }
    }
}
