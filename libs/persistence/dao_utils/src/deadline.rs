use std::{future::Future, time::Duration};

use thiserror::Error;

/// Client-side deadline for every source-of-truth round-trip.
pub const QUERY_DEADLINE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("query exceeded its {0:?} deadline")]
pub struct DeadlineExceeded(pub Duration);

/// Runs `operation` under `deadline`. On expiry the future is dropped, which
/// cancels the outbound call, and `DeadlineExceeded` is converted into the
/// caller's error type.
pub async fn with_deadline<F, T, E>(
    deadline: Duration, operation: F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<DeadlineExceeded>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result,
        Err(_) => Err(DeadlineExceeded(deadline).into()),
    }
}
