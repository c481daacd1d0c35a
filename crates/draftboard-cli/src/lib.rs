// Draftboard CLI library: CSV boundary and report assembly for the
// `draftboard` binary.

pub mod report;
pub mod tables;
