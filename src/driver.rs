//! Bounded worker pool for concurrent posts.
//!
//! Every input becomes one task that performs a single `POST /messages`.
//! A semaphore caps the number of tasks in flight; the caller waits until all
//! of them have been joined. Samples come back in completion order.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::client::MessageClient;
use crate::error::{Error, Result};
use crate::metrics::TimingSample;

/// Post every text with at most `workers` requests in flight.
///
/// Returns one [`TimingSample`] per text, in the order the posts finished.
/// The first failure fails the whole batch; posts still running at that
/// point are aborted.
///
/// # Errors
///
/// [`Error::Config`] if `workers` is zero, [`Error::Worker`] if a task
/// panicked, or the error of the first post that failed.
pub async fn post_concurrently(
    client: &MessageClient,
    texts: &[String],
    workers: usize,
) -> Result<Vec<TimingSample>> {
    if workers == 0 {
        return Err(Error::Config("worker pool size must be at least 1".into()));
    }

    let semaphore = Arc::new(Semaphore::new(workers));
    let mut set = JoinSet::new();

    for (index, text) in texts.iter().enumerate() {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| Error::Worker(e.to_string()))?;
        let client = client.clone();
        let text = text.clone();

        set.spawn(async move {
            let result = client.post_message(&text).await;
            drop(permit);
            result.map(|timed| {
                debug!(index, elapsed = ?timed.elapsed, "concurrent post finished");
                timed.sample()
            })
        });
    }

    let mut samples = Vec::with_capacity(texts.len());
    while let Some(joined) = set.join_next().await {
        samples.push(joined??);
    }
    Ok(samples)
}
