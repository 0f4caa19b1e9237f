use tracing::warn;

use super::Outcome;

/// Single-use outcome slot: `Open → Resolved → Consumed`. First `resolve` wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Resolution {
    #[default]
    Open,
    Resolved(Outcome),
    Consumed,
}

impl Resolution {
    pub fn is_open(&self) -> bool {
        matches!(self, Resolution::Open)
    }

    /// Record the outcome. A second signal is dropped and logged as a defect.
    pub fn resolve(&mut self, outcome: Outcome) -> bool {
        if self.is_open() {
            *self = Resolution::Resolved(outcome);
            true
        } else {
            warn!(?outcome, state = ?self, "double resolution ignored");
            false
        }
    }

    /// The outcome, if resolved and not yet taken.
    pub fn peek(&self) -> Option<Outcome> {
        match self {
            Resolution::Resolved(o) => Some(*o),
            _ => None,
        }
    }

    /// Hand out the outcome exactly once.
    pub fn take(&mut self) -> Option<Outcome> {
        let out = self.peek()?;
        *self = Resolution::Consumed;
        Some(out)
    }
}
