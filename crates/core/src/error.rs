//! Top-level failure modes the search can surface. These are distinct from a
//! history simply being invalid - that is a normal, successfully-computed
//! result (see [`crate::report::AnalysisReport::Invalid`]).

/// A failure that prevented the search from reaching a verdict at all.
#[derive(Debug, Clone, derive_more::Display)]
pub enum SearchError {
    /// An explorer worker panicked. The message is the panic payload,
    /// downcast to a string where possible.
    #[display("explorer worker panicked: {_0}")]
    WorkerPanicked(String),
}

impl std::error::Error for SearchError {}
