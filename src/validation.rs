/// Class-conditioned plausibility heuristics
pub mod context;

/// Movement coherence filtering over per-identifier position history
pub mod coherence;
