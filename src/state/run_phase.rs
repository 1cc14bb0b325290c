/// Phase definitions for a single scraping run
///
/// A run moves forward through the phases in declaration order and may
/// drop into `Blocked` or `Failed` from any of them.
use std::fmt;

/// Represents the current phase of a scraping run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    // ===== Active Phases =====
    /// Looking the artist up in the first-letter index
    Resolving,

    /// Fetching the artist page and extracting song links
    Listing,

    /// Narrowing the song list to the caller's selection
    Selecting,

    /// Fetching songs one by one
    Iterating,

    /// Writing aggregate outputs and clearing the checkpoint
    Finalizing,

    // ===== Terminal Phases =====
    /// Run completed (possibly with zero songs processed)
    Done,

    /// An anti-scraping block stopped the run; checkpoint retained
    Blocked,

    /// The run stopped on a fatal error
    Failed,
}

impl RunPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Blocked | Self::Failed)
    }

    /// Returns true if the run ended early
    pub fn is_early_exit(&self) -> bool {
        matches!(self, Self::Blocked | Self::Failed)
    }

    /// Checks whether moving from `self` to `next` is allowed
    ///
    /// Forward moves follow the fixed order. `Selecting` may jump straight
    /// to `Done` on an empty selection, and a resumed run enters
    /// `Iterating` directly from `Resolving`.
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        if self.is_terminal() {
            return false;
        }

        if next.is_early_exit() {
            return true;
        }

        matches!(
            (self, next),
            (Self::Resolving, Self::Listing)
                | (Self::Resolving, Self::Iterating)
                | (Self::Listing, Self::Selecting)
                | (Self::Selecting, Self::Iterating)
                | (Self::Selecting, Self::Done)
                | (Self::Iterating, Self::Finalizing)
                | (Self::Finalizing, Self::Done)
        )
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resolving => "RESOLVING",
            Self::Listing => "LISTING",
            Self::Selecting => "SELECTING",
            Self::Iterating => "ITERATING",
            Self::Finalizing => "FINALIZING",
            Self::Done => "DONE",
            Self::Blocked => "BLOCKED",
            Self::Failed => "FAILED",
        };
        write!(f, "{}", name)
    }
}
