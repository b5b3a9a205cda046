//! Auth route handlers.
//!
//! Endpoints delegate to [`crate::auth::AuthService`]; handlers only parse
//! and validate the wire format and map the error taxonomy to HTTP statuses.
//! Format failures return 400 without touching the lockout counter, so only
//! real secret mismatches count toward a lock.

mod error;
pub(crate) mod login;
pub(crate) mod otp;
pub(crate) mod principal;
pub(crate) mod profile;
pub(crate) mod register;
mod state;
pub(crate) mod token;
pub(crate) mod types;

pub use principal::{Principal, require_auth};
pub use state::AuthState;
