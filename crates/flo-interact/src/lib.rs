//! Interactive editing of an existing optimisation result: explicit
//! move/insert/remove instructions, and suggesting where a crop could still
//! be slotted in.

pub mod adjust;
pub mod suggest;

pub use adjust::{apply_adjustments, AdjustContext, AdjustOutcome, MoveAction, MoveInstruction, RejectedMove};
pub use suggest::{suggest_candidates, Suggestion, SuggestionContext};
