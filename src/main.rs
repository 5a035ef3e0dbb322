//! Match-three adapter server (default binary).
//!
//! Hosts one game and serves it over the line-delimited JSON protocol.
//! The engine runs on the main thread; the TCP server runs on a tokio runtime
//! owned by [`Adapter`].

use anyhow::{Context, Result};
use tracing::info;

use match_three::adapter::{Adapter, GameSettings, ServerConfig, Session};
use match_three::core::{MatchEngine, SimpleRng};

fn main() -> Result<()> {
    match_three::init_logging();

    let settings = GameSettings::from_env();
    let rng = match settings.seed {
        Some(seed) => SimpleRng::new(seed),
        None => SimpleRng::from_clock(),
    };
    let seed = rng.seed();
    let engine = MatchEngine::new(settings.engine.clone(), rng)
        .with_context(|| format!("failed to start game with {:?}", settings.engine))?;
    let mut session = Session::new(engine);

    let mut adapter = Adapter::start(ServerConfig::from_env(), session.board_info())?;
    info!(
        addr = %adapter.local_addr(),
        seed,
        rows = settings.engine.rows,
        columns = settings.engine.columns,
        elements = settings.engine.elements,
        adjacency = settings.engine.adjacency.as_str(),
        "game ready"
    );

    while let Some(inbound) = adapter.recv_blocking() {
        for msg in session.handle(inbound) {
            adapter.send(msg);
        }
    }

    info!(score = session.engine().score(), "adapter closed");
    Ok(())
}
