use thiserror::Error;

/// Fatal generation failures. Every variant aborts the current run; no
/// partial map is ever published.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A weighted pick ran over zero eligible items or an all-zero weight row.
    #[error("weighted pick attempted over an empty or zero-weight candidate set")]
    EmptyCandidateSet,
    /// Restriction filtering eliminated every candidate type for a floor.
    #[error("no eligible node type remains for floor {floor}")]
    NoEligibleNodeType { floor: u32 },
    /// Structural config violation, detected before generation starts.
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),
}
