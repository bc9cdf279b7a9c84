//! API Clients
//!
//! Traits for the two external services the client talks to, and the
//! reqwest implementation of both.
//!
//! - [`AnalysisApi`]: risk prediction from an uploaded file, prevention plans
//! - [`AuthApi`]: login, registration, current user, profile updates

mod http;

pub use http::HttpClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::analysis::{AnalysisResult, DecodeError, PreventionPlan, PreventionRequest};
use crate::session::{
    rejects_credential, AuthResponse, LoginRequest, ProfileFields, RegisterRequest, Session,
};
use crate::upload::UploadFile;

/// The analysis service
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// `POST /predict_risk` with the file as multipart field `file`
    async fn predict_risk(&self, file: &UploadFile) -> Result<AnalysisResult, ClientError>;

    /// `POST /personalized_prevention`
    async fn prevention_plan(&self, request: &PreventionRequest) -> Result<PreventionPlan, ClientError>;
}

/// The authentication service
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError>;

    /// Resolve a stored credential to its user
    async fn current_user(&self, token: &str) -> Result<Session, ClientError>;

    async fn update_profile(&self, token: &str, fields: &ProfileFields) -> Result<Session, ClientError>;
}

/// Errors that can occur when talking to either service
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Service unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {}", message.as_deref().unwrap_or("no details"))]
    Api { status: u16, message: Option<String> },

    #[error("Request timeout")]
    Timeout,

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ClientError {
    /// Message supplied by the server in its error body, if any
    pub fn server_message(&self) -> Option<String> {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The service answered and refused the credential
    pub fn is_auth_rejection(&self) -> bool {
        self.status().map(rejects_credential).unwrap_or(false)
    }
}
