//! Test harness shared by the integration tests.
//!
//! Provides an in-process message store and helpers that build clients and
//! runners pointed at it.

#![allow(dead_code)]

mod client;
mod server;

pub use client::{client_for, closed_addr, config_for, runner_for};
pub use server::{StoreState, TestServer};
