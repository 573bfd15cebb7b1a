/// Lifecycle phases of a crawl session
///
/// A session moves `Idle → Running`, then stops in either `BudgetExhausted`
/// or `FrontierEmpty`, and finally becomes `Done` once its report is built.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Created, nothing fetched yet
    Idle,

    /// Fetching pages
    Running,

    /// Stopped because the page budget reached zero
    BudgetExhausted,

    /// Stopped because no frontier entries were left
    FrontierEmpty,

    /// Report handed back to the caller
    Done,
}

impl SessionPhase {
    /// Returns true if this phase is a stop condition
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::BudgetExhausted | Self::FrontierEmpty)
    }

    /// Checks whether moving to `next` is allowed
    pub fn can_transition_to(&self, next: SessionPhase) -> bool {
        use SessionPhase::*;
        matches!(
            (self, next),
            (Idle, Running)
                | (Idle, FrontierEmpty)
                | (Running, BudgetExhausted)
                | (Running, FrontierEmpty)
                | (BudgetExhausted, Done)
                | (FrontierEmpty, Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::BudgetExhausted => "budget_exhausted",
            Self::FrontierEmpty => "frontier_empty",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
