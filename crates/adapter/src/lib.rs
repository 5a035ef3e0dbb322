//! Adapter - drive a match-three game over a TCP socket with a JSON protocol
//!
//! Rendering front-ends and bots connect over TCP, send swaps, and receive
//! the ordered snapshots of each cascade so they can animate it.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Commanding**: The controller swaps and restarts; anyone may ask for a
//!    hint or a snapshot
//! 5. **Observation Streaming**: Clients that asked for it receive the board
//!    after every state change
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and requested capabilities
//! - **command**: `swap` (with `from`/`to`), `hint`, `restart`, or `snapshot`
//!
//! ## Server → Client
//!
//! - **welcome**: Assigned role and board dimensions
//! - **outcome**: Reply to a swap, with the cascade snapshots in replay order
//! - **observation**: Full board, score, and whether any move remains
//! - **hint**: A swap that would be accepted, or `null` on a dead board
//! - **ack**: Restart acknowledgment
//! - **error**: Error response with code and message
//!
//! # Environment Variables
//!
//! - `MATCH3_HOST`: Bind address (default: "127.0.0.1")
//! - `MATCH3_PORT`: Port number (default: 7878)
//! - `MATCH3_MAX_PENDING`: Command queue capacity (default: 16)
//! - `MATCH3_ROWS`, `MATCH3_COLUMNS`, `MATCH3_ELEMENTS`: Board shape (default: 8, 8, 5)
//! - `MATCH3_SEED`: RNG seed (default: clock)
//! - `MATCH3_ADJACENCY`: `enforced` or `caller`
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1700000000000,"client":{"name":"viewer","version":"1.0.0"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1700000000001,"protocol_version":"1.0.0","client_id":1,"role":"controller","game_id":"match-three","rows":8,"columns":8,"elements":5}
//! Client -> Server: {"type":"command","seq":2,"ts":1700000000002,"mode":"swap","from":{"row":3,"column":4},"to":{"row":3,"column":5}}
//! Server -> Client: {"type":"outcome","seq":2,"ts":1700000000003,"status":"resolved","from":{...},"to":{...},"snapshots":[[[1,null,...],...],...],"removed":[3],"points":3,"score":3}
//! ```
//!
//! # Implementation
//!
//! - [`server`] runs on tokio and never touches engine state
//! - [`session`] owns the engine and runs on the caller's thread
//! - [`runtime::Adapter`] connects the two with bounded channels
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"ts":0,"client":{"name":"nc","version":"1.0.0"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! ```

pub mod config;
pub mod protocol;
pub mod runtime;
pub mod server;
pub mod session;

pub use match_three_core as core;
pub use match_three_types as types;

// Re-export protocol types for convenience
pub use config::{GameSettings, ServerConfig};
pub use protocol::*;
pub use runtime::{Adapter, ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
pub use server::run_server;
pub use session::Session;
