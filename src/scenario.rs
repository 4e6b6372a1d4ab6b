//! Benchmark scenarios and the runner that executes them.
//!
//! ## Scenario template
//!
//! 1. Read the initial count
//! 2. Post the scenario's texts, in order or through the worker pool
//! 3. Read all messages from offset 0
//! 4. Read the final count
//! 5. Check the count grew by the number of posts
//! 6. Check every posted text is present in the read
//! 7. Average every round trip from steps 1-4
//!
//! Any failure aborts the scenario and, through [`ScenarioRunner::run_suite`],
//! the whole run.

use tracing::{debug, info};

use crate::client::MessageClient;
use crate::driver;
use crate::error::Result;
use crate::invariant;
use crate::metrics::Latencies;

/// How a scenario issues its posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// One user posting one message after another.
    Sequential,
    /// Many users posting at once through the worker pool.
    Concurrent,
}

/// A named batch of posts followed by consistency checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Name shown in logs and in the report.
    pub name: String,
    /// Texts to post, one message each.
    pub texts: Vec<String>,
    /// How the posts are issued.
    pub dispatch: Dispatch,
}

fn numbered(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("Test message {i}")).collect()
}

impl Scenario {
    /// Create a scenario.
    #[must_use]
    pub fn new(name: impl Into<String>, texts: Vec<String>, dispatch: Dispatch) -> Self {
        Self {
            name: name.into(),
            texts,
            dispatch,
        }
    }

    /// One message from one user.
    #[must_use]
    pub fn single_message_one_user() -> Self {
        Self::new(
            "Test #1: Single Message One User",
            numbered(1),
            Dispatch::Sequential,
        )
    }

    /// Five numbered messages posted in order by one user.
    #[must_use]
    pub fn multiple_messages_one_user() -> Self {
        Self::new(
            "Test #2: Multiple Messages One User",
            numbered(5),
            Dispatch::Sequential,
        )
    }

    /// The same message posted by five users at once.
    #[must_use]
    pub fn single_message_multiple_users() -> Self {
        Self::new(
            "Test #3: Single Message Multiple Users",
            vec!["Test message".to_string(); 5],
            Dispatch::Concurrent,
        )
    }

    /// Twenty-five numbered messages posted concurrently.
    #[must_use]
    pub fn multiple_messages_multiple_users() -> Self {
        Self::new(
            "Test #4: Multiple Messages Multiple Users",
            numbered(25),
            Dispatch::Concurrent,
        )
    }

    /// The four scenarios of a standard run, in execution order.
    #[must_use]
    pub fn standard_suite() -> Vec<Self> {
        vec![
            Self::single_message_one_user(),
            Self::multiple_messages_one_user(),
            Self::single_message_multiple_users(),
            Self::multiple_messages_multiple_users(),
        ]
    }

    /// Number of messages this scenario posts.
    #[must_use]
    pub fn posts(&self) -> usize {
        self.texts.len()
    }
}

/// Outcome of one scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario name.
    pub name: String,
    /// Mean round-trip time over every call the scenario made, in seconds.
    pub average_secs: f64,
    /// Messages posted.
    pub posted: usize,
    /// Every round trip the scenario made.
    pub latencies: Latencies,
}

/// Executes scenarios against one store.
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    client: MessageClient,
    workers: usize,
}

impl ScenarioRunner {
    /// Create a runner using `workers` concurrent posts for
    /// [`Dispatch::Concurrent`] scenarios.
    #[must_use]
    pub fn new(client: MessageClient, workers: usize) -> Self {
        Self { client, workers }
    }

    /// The client this runner uses.
    #[must_use]
    pub fn client(&self) -> &MessageClient {
        &self.client
    }

    /// Run one scenario.
    ///
    /// # Errors
    ///
    /// Any request error, or [`Error::Invariant`](crate::Error::Invariant) if
    /// a check fails.
    pub async fn run(&self, scenario: &Scenario) -> Result<ScenarioResult> {
        info!(scenario = %scenario.name, posts = scenario.posts(), "running scenario");
        let mut latencies = Latencies::new();

        let (sample, initial) = self.client.get_count().await?.into_parts();
        latencies.record(sample);

        match scenario.dispatch {
            Dispatch::Sequential => {
                for text in &scenario.texts {
                    latencies.record(self.client.post_message(text).await?.sample());
                }
            }
            Dispatch::Concurrent => {
                let samples =
                    driver::post_concurrently(&self.client, &scenario.texts, self.workers).await?;
                latencies.extend(samples);
            }
        }

        let (sample, messages) = self.client.get_messages(0).await?.into_parts();
        latencies.record(sample);

        let (sample, final_count) = self.client.get_count().await?.into_parts();
        latencies.record(sample);

        invariant::check_count_delta(initial.count, final_count.count, scenario.posts())?;
        invariant::check_texts_present(&scenario.texts, &messages)?;

        // At least three round trips were recorded above.
        let average_secs = latencies.mean_secs().unwrap_or_default();

        debug!(
            scenario = %scenario.name,
            p50 = ?latencies.p50(),
            p95 = ?latencies.p95(),
            p99 = ?latencies.p99(),
            "latency distribution"
        );
        info!(
            scenario = %scenario.name,
            initial = initial.count,
            final_count = final_count.count,
            "Average Roundtrip Time: {average_secs:.4} seconds"
        );

        Ok(ScenarioResult {
            name: scenario.name.clone(),
            average_secs,
            posted: scenario.posts(),
            latencies,
        })
    }

    /// Run scenarios strictly one after another, stopping at the first error.
    ///
    /// # Errors
    ///
    /// The first scenario error; later scenarios are not started.
    pub async fn run_suite(&self, scenarios: &[Scenario]) -> Result<Vec<ScenarioResult>> {
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            results.push(self.run(scenario).await?);
        }
        Ok(results)
    }
}
