//! Bulk seeding and one-off reads outside the scenario suite.

use tracing::info;

use crate::client::MessageClient;
use crate::error::Result;
use crate::message::Message;
use crate::metrics::Latencies;

/// Default number of messages posted by [`seed`].
pub const DEFAULT_SEED_COUNT: usize = 100;

/// Text of the `n`-th seeded message (1-based).
#[must_use]
pub fn seed_text(n: usize) -> String {
    format!("Hello, this is a message number {n}")
}

/// Post `count` numbered messages one after another.
///
/// Each response is logged; the first failure stops seeding.
///
/// # Errors
///
/// The error of the first post that failed.
pub async fn seed(client: &MessageClient, count: usize) -> Result<Latencies> {
    let mut latencies = Latencies::new();
    for n in 1..=count {
        let timed = client.post_message(&seed_text(n)).await?;
        info!(
            n,
            status = timed.status,
            elapsed = ?timed.elapsed,
            response = %timed.value,
            "seeded message"
        );
        latencies.record(timed.sample());
    }
    Ok(latencies)
}

/// Read the messages stored after `offset`.
///
/// # Errors
///
/// Any request error, including non-2xx statuses.
pub async fn list(client: &MessageClient, offset: u64) -> Result<Vec<Message>> {
    let timed = client.get_messages(offset).await?;
    info!(
        offset,
        status = timed.status,
        messages = timed.value.len(),
        elapsed = ?timed.elapsed,
        "listed messages"
    );
    Ok(timed.value)
}
