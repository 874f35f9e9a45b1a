//! Platform integration
//!
//! This module provides:
//! - Session state tracking the selected platform
//! - API client for the platform API

pub mod api;
pub mod session;

pub use session::PlatformSession;
