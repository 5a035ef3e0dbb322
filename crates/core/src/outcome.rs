use crate::snapshot::GridSnapshot;

/// One remove → drop → refill iteration of a cascade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePass {
    /// Cells cleared by this pass (also the points it scored).
    pub removed: u32,
    /// Grid after the sweep, with vacated cells empty.
    pub after_removal: GridSnapshot,
    /// Grid after gravity and refill; never contains empty cells.
    pub after_refill: GridSnapshot,
}

/// Everything a committed swap produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub passes: Vec<CascadePass>,
    /// Points gained by this swap (sum of `removed` over all passes).
    pub points: u64,
    /// Cumulative score after the swap.
    pub score: u64,
}

impl Resolution {
    /// Snapshots in replay order: `after_removal`, `after_refill` for each pass.
    ///
    /// Always even length.
    pub fn snapshots(&self) -> impl Iterator<Item = &GridSnapshot> {
        self.passes
            .iter()
            .flat_map(|pass| [&pass.after_removal, &pass.after_refill])
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }
}

/// Result of `MatchEngine::try_swap`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// No run formed; the swap was undone.
    Rejected,
    Resolved(Resolution),
}

impl SwapOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, SwapOutcome::Rejected)
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            SwapOutcome::Rejected => None,
            SwapOutcome::Resolved(r) => Some(r),
        }
    }
}
