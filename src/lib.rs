//! # Sesame
//!
//! `sesame` is an authentication and account-security service. It validates
//! email/password credentials, tracks brute-force lockouts, supports OTP
//! (one-time password) passwordless login, and issues rotating JWT
//! access/refresh token pairs.
//!
//! ## Lockout Model
//!
//! Failed password and OTP attempts share a single per-identity counter.
//! Five consecutive failures lock the identity for 15 minutes; a successful
//! authentication clears the counter. Lockout and OTP state live in injected
//! in-process stores and reset on restart; a multi-instance deployment must
//! back them with a shared TTL-capable store.
//!
//! ## Session Model
//!
//! Access and refresh tokens are signed with two independently configured
//! secrets. Each account holds at most one valid refresh token: every
//! successful login or refresh overwrites it, invalidating the previous one.
//! Logout clears it.
//!
//! ## Enumeration Resistance
//!
//! Unknown accounts, wrong passwords, and inactive accounts all surface the
//! same `Invalid credentials` error, and OTP requests always return the same
//! generic message whether or not the email exists.

pub mod accounts;
pub mod api;
pub mod auth;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
