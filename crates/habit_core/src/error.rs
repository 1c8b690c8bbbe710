use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum HabitError {
    /// Malformed request: unknown habit id, weekday edits on a non-weekly
    /// policy, completions that would land before the ledger tail.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The record itself violates an invariant (corrupted baseline or
    /// ledger). Surfaced to the caller instead of silently patched.
    #[error("invalid habit state: {0}")]
    InvalidState(String),

    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}
