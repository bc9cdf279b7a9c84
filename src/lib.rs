//! # AURA
//!
//! Client for the AURA genomic risk assessment service. The analysis itself
//! (risk inference, prevention planning) happens behind an HTTP API; this
//! crate holds everything the client decides on its own.
//!
//! ## Modules
//!
//! - [`session`]: Authenticated identity and its lifecycle
//! - [`routing`]: Route table, route guard and navigation bar model
//! - [`validation`]: Login/registration form checks and password strength
//! - [`upload`]: Upload pipeline state machine
//! - [`analysis`]: Analysis results, severity tiers and prevention plans
//! - [`health`]: Dashboard and health-metric fixtures
//! - [`visual`]: Geometry for the decorative DNA, chromosome and heartbeat graphics
//!
//! With the `native` feature (on by default):
//!
//! - [`client`]: reqwest client for the analysis and auth APIs
//! - [`persist`]: File-backed result slot and credential store
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: tracing-subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aura::client::HttpClient;
//! use aura::config::Config;
//! use aura::persist::{FileStore, ResultStore};
//! use aura::session::SessionManager;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let client = Arc::new(HttpClient::new(&config.api)?);
//!     let store = Arc::new(FileStore::new(config.storage.data_path())?);
//!
//!     let mut session = SessionManager::new(client.clone(), store.clone());
//!     session.restore().await;
//!
//!     if let Some(stored) = store.load_result()? {
//!         println!("Last analysis: {} bytes", stored.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod health;
pub mod routing;
pub mod session;
pub mod upload;
pub mod validation;
pub mod visual;

#[cfg(feature = "native")]
pub mod client;
#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod logging;
#[cfg(feature = "native")]
pub mod persist;

// Re-export top-level types for convenience
pub use analysis::{
    open_results, AnalysisResult, DecodeError, PlanSelector, PlanState, PreventionPlan, Risk,
    RiskView, ResultsEntry, Severity,
};

pub use routing::{guard, navigate, Access, AuthStatus, GuardDecision, Navigation, Route};

pub use session::{ProfileFields, Session, SessionError, SessionState};

pub use upload::{PipelineError, UploadFile, UploadPhase, UploadPipeline, UploadTiming};

pub use validation::{password_strength, LoginForm, PasswordStrength, RegistrationForm, ValidationError};

#[cfg(feature = "native")]
pub use client::{AnalysisApi, AuthApi, ClientError, HttpClient};

#[cfg(feature = "native")]
pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, StorageConfig, UploadConfig};

#[cfg(feature = "native")]
pub use persist::{CredentialStore, FileStore, MemoryStore, ResultStore, StorageError};

#[cfg(feature = "native")]
pub use session::SessionManager;

#[cfg(feature = "native")]
pub use upload::{run_upload, Navigator, UploadError};

#[cfg(feature = "native")]
pub use analysis::PlanController;
