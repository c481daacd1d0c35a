// Draft preparation: positional depth, scarcity-adjusted board, tiers,
// suggested rounds, and draft-status tracking.

pub mod board;
pub mod depth;
pub mod ledger;
pub mod round;
pub mod tiers;

pub use board::{build_draft_board, DraftBoard, DraftBoardEntry};
pub use ledger::{DraftLedger, DraftStatus};
