use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use match_three::adapter::protocol::{create_hello, create_swap, PROTOCOL_VERSION};
use match_three::adapter::{run_server, InboundCommand, OutboundMessage, ServerConfig, Session};
use match_three::core::{EngineConfig, MatchEngine, ScriptedSource};
use match_three::types::Position;

const TIMEOUT: Duration = Duration::from_secs(2);

struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    write_half: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        let (read_half, write_half) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            write_half,
        }
    }

    async fn send_line(&mut self, line: &str) {
        self.write_half.write_all(line.as_bytes()).await.unwrap();
        self.write_half.write_all(b"\n").await.unwrap();
        self.write_half.flush().await.unwrap();
    }

    async fn send<T: serde::Serialize>(&mut self, msg: &T) {
        let line = serde_json::to_string(msg).unwrap();
        self.send_line(&line).await;
    }

    async fn recv(&mut self) -> serde_json::Value {
        let line = tokio::time::timeout(TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .unwrap()
            .expect("connection closed");
        serde_json::from_str(&line).unwrap()
    }

    async fn hello(&mut self, seq: u64, stream: bool) -> serde_json::Value {
        self.send(&create_hello(seq, "e2e-test", stream)).await;
        let welcome = self.recv().await;
        assert_eq!(welcome["type"], "welcome");
        welcome
    }
}

fn test_config(max_pending_commands: usize) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        protocol_version: PROTOCOL_VERSION.to_string(),
        max_pending_commands,
    }
}

fn scripted_session() -> Session<ScriptedSource> {
    let layout = vec![
        vec![1, 2, 1, 1],
        vec![3, 4, 2, 3],
        vec![4, 3, 4, 2],
        vec![3, 4, 3, 4],
    ];
    let engine = MatchEngine::from_layout(
        EngineConfig::new(4, 4, 4),
        &layout,
        ScriptedSource::new(vec![3, 4, 1]),
    )
    .unwrap();
    Session::new(engine)
}

/// Server plus an engine loop task applying commands to `session`.
async fn start_game(session: Session<ScriptedSource>) -> (SocketAddr, JoinHandle<()>, JoinHandle<()>) {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<InboundCommand>(8);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();
    let board = session.board_info();

    let server = tokio::spawn(async move {
        let _ = run_server(test_config(8), board, cmd_tx, out_rx, Some(ready_tx)).await;
    });

    let engine = tokio::spawn(async move {
        let mut session = session;
        while let Some(cmd) = cmd_rx.recv().await {
            for msg in session.handle(cmd) {
                let _ = out_tx.send(msg);
            }
        }
    });

    let addr = tokio::time::timeout(TIMEOUT, ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");
    (addr, server, engine)
}

#[tokio::test]
async fn adapter_hello_swap_outcome_and_observation() {
    let (addr, server, engine) = start_game(scripted_session()).await;
    let mut client = TestClient::connect(addr).await;

    let welcome = client.hello(1, true).await;
    assert_eq!(welcome["seq"], 1);
    assert_eq!(welcome["role"], "controller");
    assert_eq!(welcome["game_id"], "match-three");
    assert_eq!(welcome["rows"], 4);
    assert_eq!(welcome["columns"], 4);
    assert_eq!(welcome["elements"], 4);

    // Streaming clients get the current board right after the handshake.
    let obs = client.recv().await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["grid"][0], serde_json::json!([1, 2, 1, 1]));
    assert_eq!(obs["score"], 0);

    client
        .send_line(r#"{"type":"command","seq":2,"ts":0,"mode":"hint"}"#)
        .await;
    let hint = client.recv().await;
    assert_eq!(hint["type"], "hint");
    assert_eq!(hint["seq"], 2);
    assert_eq!(hint["swap"]["to"], serde_json::json!({"row": 0, "column": 1}));

    client
        .send(&create_swap(3, Position::new(0, 0), Position::new(0, 1)))
        .await;
    let outcome = client.recv().await;
    assert_eq!(outcome["type"], "outcome");
    assert_eq!(outcome["seq"], 3);
    assert_eq!(outcome["status"], "resolved");
    assert_eq!(outcome["snapshots"].as_array().unwrap().len(), 2);
    assert_eq!(outcome["snapshots"][0][0], serde_json::json!([2, null, null, null]));
    assert_eq!(outcome["removed"], serde_json::json!([3]));
    assert_eq!(outcome["points"], 3);
    assert_eq!(outcome["score"], 3);

    let obs = client.recv().await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["grid"][0], serde_json::json!([2, 3, 4, 1]));
    assert_eq!(obs["score"], 3);

    // Rejected swaps reply but change nothing, so nothing is broadcast.
    client
        .send(&create_swap(4, Position::new(1, 0), Position::new(1, 1)))
        .await;
    let outcome = client.recv().await;
    assert_eq!(outcome["status"], "rejected");
    assert_eq!(outcome["snapshots"], serde_json::json!([]));
    assert_eq!(outcome["score"], 3);

    client
        .send(&create_swap(5, Position::new(0, 0), Position::new(2, 0)))
        .await;
    let err = client.recv().await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "not_adjacent");
    assert_eq!(err["seq"], 5);

    client
        .send_line(r#"{"type":"command","seq":6,"ts":0,"mode":"swap","from":{"row":0,"column":0}}"#)
        .await;
    assert_eq!(client.recv().await["code"], "invalid_command");

    server.abort();
    engine.abort();
}

#[tokio::test]
async fn adapter_protocol_errors() {
    let (addr, server, engine) = start_game(scripted_session()).await;
    let mut client = TestClient::connect(addr).await;

    client
        .send_line(r#"{"type":"command","seq":1,"ts":0,"mode":"snapshot"}"#)
        .await;
    let err = client.recv().await;
    assert_eq!(err["code"], "handshake_required");

    client.send_line(r#"{"type":"command","seq":7,"#).await;
    let err = client.recv().await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["seq"], 7);

    client.hello(10, false).await;

    client
        .send_line(r#"{"type":"command","seq":10,"ts":0,"mode":"snapshot"}"#)
        .await;
    let err = client.recv().await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["message"], "seq must be strictly increasing");

    client.send_line(r#"{"type":"dance","seq":11}"#).await;
    let err = client.recv().await;
    assert_eq!(err["message"], "Unknown message type");

    client
        .send_line(r#"{"type":"command","seq":12,"ts":0,"mode":"snapshot"}"#)
        .await;
    let obs = client.recv().await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["moves_available"], true);

    let mut old = TestClient::connect(addr).await;
    old.send_line(
        r#"{"type":"hello","seq":1,"ts":0,"client":{"name":"old","version":"0.1"},"protocol_version":"2.0.0"}"#,
    )
    .await;
    let err = old.recv().await;
    assert_eq!(err["code"], "protocol_mismatch");

    server.abort();
    engine.abort();
}

#[tokio::test]
async fn adapter_observer_roles_and_promotion() {
    let (addr, server, engine) = start_game(scripted_session()).await;

    let mut controller = TestClient::connect(addr).await;
    assert_eq!(controller.hello(1, false).await["role"], "controller");

    let mut observer = TestClient::connect(addr).await;
    assert_eq!(observer.hello(1, false).await["role"], "observer");

    observer
        .send(&create_swap(2, Position::new(0, 0), Position::new(0, 1)))
        .await;
    assert_eq!(observer.recv().await["code"], "not_controller");

    observer
        .send_line(r#"{"type":"command","seq":3,"ts":0,"mode":"restart"}"#)
        .await;
    assert_eq!(observer.recv().await["code"], "not_controller");

    // Read-only commands are open to observers.
    observer
        .send_line(r#"{"type":"command","seq":4,"ts":0,"mode":"hint"}"#)
        .await;
    assert_eq!(observer.recv().await["type"], "hint");

    drop(controller);

    // Promotion happens once the server notices the disconnect.
    let mut seq = 5;
    let outcome = loop {
        observer
            .send(&create_swap(seq, Position::new(0, 0), Position::new(0, 1)))
            .await;
        let reply = observer.recv().await;
        if reply["code"] != "not_controller" {
            break reply;
        }
        assert!(seq < 50, "observer was never promoted");
        seq += 1;
        tokio::time::sleep(Duration::from_millis(20)).await;
    };
    assert_eq!(outcome["type"], "outcome");
    assert_eq!(outcome["status"], "resolved");

    server.abort();
    engine.abort();
}

#[tokio::test]
async fn adapter_restart_acks_and_broadcasts() {
    let session = Session::new(
        MatchEngine::new(EngineConfig::new(5, 5, 4), ScriptedSource::new(vec![1, 2, 3, 4, 2])).unwrap(),
    );
    let (addr, server, engine) = start_game(session).await;

    let mut controller = TestClient::connect(addr).await;
    controller.hello(1, false).await;
    let mut viewer = TestClient::connect(addr).await;
    viewer.hello(1, true).await;
    assert_eq!(viewer.recv().await["type"], "observation");

    controller
        .send_line(r#"{"type":"command","seq":2,"ts":0,"mode":"restart"}"#)
        .await;
    let ack = controller.recv().await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["status"], "ok");

    let obs = viewer.recv().await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["score"], 0);
    assert_eq!(obs["rows"], 5);

    server.abort();
    engine.abort();
}

#[tokio::test]
async fn adapter_backpressure_returns_error() {
    let (cmd_tx, _cmd_rx) = mpsc::channel::<InboundCommand>(1);
    let (_out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();
    let board = scripted_session().board_info();

    let server = tokio::spawn(async move {
        let _ = run_server(test_config(1), board, cmd_tx, out_rx, Some(ready_tx)).await;
    });
    let addr = tokio::time::timeout(TIMEOUT, ready_rx).await.unwrap().unwrap();

    let mut client = TestClient::connect(addr).await;
    client.hello(1, false).await;

    // Nobody drains the queue: the first command fills it, the second bounces.
    client
        .send_line(r#"{"type":"command","seq":2,"ts":0,"mode":"hint"}"#)
        .await;
    client
        .send_line(r#"{"type":"command","seq":3,"ts":0,"mode":"hint"}"#)
        .await;
    let err = client.recv().await;
    assert_eq!(err["code"], "backpressure");
    assert_eq!(err["seq"], 3);

    server.abort();
}

#[tokio::test]
async fn adapter_streaming_hello_reports_full_queue() {
    let (cmd_tx, _cmd_rx) = mpsc::channel::<InboundCommand>(1);
    let (_out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();
    let board = scripted_session().board_info();

    let server = tokio::spawn(async move {
        let _ = run_server(test_config(1), board, cmd_tx, out_rx, Some(ready_tx)).await;
    });
    let addr = tokio::time::timeout(TIMEOUT, ready_rx).await.unwrap().unwrap();

    // The first viewer's board request fills the undrained queue.
    let mut first = TestClient::connect(addr).await;
    first.hello(1, true).await;

    let mut second = TestClient::connect(addr).await;
    second.hello(1, true).await;
    let err = second.recv().await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "backpressure");
    assert_eq!(err["seq"], 1);

    server.abort();
}
