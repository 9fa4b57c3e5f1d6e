//! Question lifecycle engine
//!
//! Atomic single-line state transitions, crash recovery, and answer
//! ledger queries over a vault.

mod ledger;
mod transition;

pub use ledger::{answers_on, QaPair};
pub use transition::{resulting_status, Target, TransitionEngine, TransitionResult};
