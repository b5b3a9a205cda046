//! Authentication core.
//!
//! Components, leaves first: [`store::StateStore`] (injected TTL store),
//! [`lockout::LockoutTracker`] (per-identity failure counter and time-boxed
//! lock), [`credentials::CredentialValidator`] (bcrypt comparison),
//! [`otp::OtpManager`] (single-use 6-digit codes), [`tokens::TokenIssuer`]
//! (dual-secret JWT pairs with rotation), and [`service::AuthService`]
//! orchestrating them. No HTTP types in here; handlers live under
//! `crate::api`.
//!
//! Every failure mode is a variant of [`AuthError`] returned from the
//! operation, never an exception-style escape hatch, so the lockout/OTP/token
//! state machines stay auditable as functions of (state, input) -> (state,
//! result).

pub mod config;
pub mod credentials;
mod error;
pub mod lockout;
pub mod otp;
pub mod service;
pub mod store;
pub mod tokens;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::AuthService;
