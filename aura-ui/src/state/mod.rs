//! State Management
//!
//! Session and notification signals shared through context.

pub mod session;

pub use session::{provide_app_state, use_app_state, AppState};
