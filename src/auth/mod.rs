//! Authentication for the platform API
//!
//! The CLI holds a session token issued by the dashboard; it is passed to the
//! API client explicitly.

pub mod credentials;

pub use credentials::{get_access_token, get_auth_status, AuthStatus};
