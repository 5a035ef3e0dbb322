//! Headless self-play.
//!
//! Repeatedly applies the first valid swap until the move budget runs out or
//! the board is dead, then reports what the cascades produced. Useful for
//! eyeballing cascade lengths and checking invariants on long runs.

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use match_three::adapter::GameSettings;
use match_three::core::{MatchEngine, SimpleRng, SwapOutcome};

fn main() -> Result<()> {
    match_three::init_logging();

    let settings = GameSettings::from_env();
    let rng = match settings.seed {
        Some(seed) => SimpleRng::new(seed),
        None => SimpleRng::from_clock(),
    };
    let seed = rng.seed();
    let mut engine = MatchEngine::new(settings.engine.clone(), rng)
        .with_context(|| format!("failed to start game with {:?}", settings.engine))?;

    let mut moves = 0u32;
    let mut total_passes = 0usize;
    let mut longest_cascade = 0usize;

    while moves < settings.autoplay_moves {
        let Some((a, b)) = engine.find_valid_swap() else {
            info!(moves, "no valid swap left");
            break;
        };

        let resolution = match engine.try_swap(a, b)? {
            SwapOutcome::Resolved(resolution) => resolution,
            SwapOutcome::Rejected => bail!("suggested swap {} <-> {} was rejected", a, b),
        };
        if !engine.grid().is_settled() {
            bail!("grid not settled after swap {} <-> {}", a, b);
        }

        moves += 1;
        total_passes += resolution.pass_count();
        longest_cascade = longest_cascade.max(resolution.pass_count());
        debug!(move_no = moves, %a, %b, passes = resolution.pass_count(), points = resolution.points, "move");
    }

    info!(
        seed,
        moves,
        score = engine.score(),
        total_passes,
        longest_cascade,
        "autoplay finished"
    );
    Ok(())
}
