//! Pages
//!
//! Top-level page components for each route.

pub mod dashboard;
pub mod health_metrics;
pub mod landing;
pub mod login;
pub mod profile;
pub mod register;
pub mod results;
pub mod upload;

pub use dashboard::Dashboard;
pub use health_metrics::HealthMetrics;
pub use landing::Landing;
pub use login::Login;
pub use profile::Profile;
pub use register::Register;
pub use results::Results;
pub use upload::Upload;
