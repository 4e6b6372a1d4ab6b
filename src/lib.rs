//! # msgbench - Round-trip Benchmark for HTTP Message Stores
//!
//! `msgbench` drives an append-only message store over HTTP
//! (`POST /messages`, `GET /messages`, `GET /messages/count`), times every
//! round trip and checks that counts and contents stay consistent under
//! sequential and concurrent writes.
//!
//! ## Features
//!
//! - **Timed client** measuring request start to full response body
//! - **Bounded worker pool** for concurrent posts
//! - **Consistency checks** on counts and posted texts after every scenario
//! - **Markdown report** of average round-trip times
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use msgbench::{Config, MessageClient, Report, Scenario, ScenarioRunner};
//!
//! let config = Config::new().with_base_url("http://localhost:8080");
//! let runner = ScenarioRunner::new(MessageClient::new(&config)?, config.workers);
//! let results = runner.run_suite(&Scenario::standard_suite()).await?;
//! Report::from_results(&results).write_to(&config.report_path)?;
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod invariant;
pub mod message;
pub mod metrics;
pub mod report;
pub mod scenario;
pub mod seed;

pub use client::{MessageClient, Timed};
pub use config::Config;
pub use error::{Error, InvariantViolation, Result};
pub use message::{Message, MessageCount, PostMessage};
pub use metrics::{Latencies, OperationKind, TimingSample};
pub use report::{Report, ReportRow};
pub use scenario::{Dispatch, Scenario, ScenarioResult, ScenarioRunner};
