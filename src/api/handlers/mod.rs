//! API handlers.
//!
//! Route handlers grouped by concern: `auth` for the account and session
//! endpoints, `health` for the liveness probe.

pub mod auth;
pub mod health;
