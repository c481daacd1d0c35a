// Library root: the player valuation and draft-ranking engine.
//
// Stages run in a fixed order: merge -> score -> depth analysis -> adjust ->
// tier -> round. Every stage is a pure function of its input plus `Config`.

pub mod config;
pub mod draft;
pub mod identity;
pub mod merge;
pub mod positions;
pub mod records;
pub mod upgrades;
pub mod valuation;
