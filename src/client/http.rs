//! reqwest implementation of the service traits.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::Instrument;
use uuid::Uuid;

use super::{AnalysisApi, AuthApi, ClientError};
use crate::analysis::{
    AnalysisResult, DecodeError, ErrorBody, PreventionPlan, PreventionRequest, PreventionResponse,
};
use crate::config::ApiConfig;
use crate::session::{
    AuthErrorBody, AuthResponse, LoginRequest, ProfileFields, RegisterRequest, Session,
};
use crate::upload::UploadFile;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// HTTP client for the analysis and auth services
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    analysis_url: String,
    auth_url: String,
}

/// How to pull a message out of an error body
type MessageExtractor = fn(&str) -> Option<String>;

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            analysis_url: config.analysis_url.trim_end_matches('/').to_string(),
            auth_url: config.auth_url.trim_end_matches('/').to_string(),
        })
    }

    fn analysis(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.analysis_url, path))
    }

    fn auth(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.auth_url, path))
    }

    /// Send a request and return the body of a successful response.
    async fn send(
        &self,
        request: RequestBuilder,
        endpoint: &'static str,
        extract: MessageExtractor,
    ) -> Result<String, ClientError> {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("request", %request_id, endpoint);

        async move {
            let response = request
                .header(REQUEST_ID_HEADER, &request_id)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        ClientError::Timeout
                    } else if e.is_connect() {
                        ClientError::Unavailable
                    } else {
                        ClientError::Request(e)
                    }
                })?;

            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            if status.is_success() {
                tracing::debug!(status = status.as_u16(), bytes = text.len(), "Request succeeded");
                Ok(text)
            } else {
                tracing::warn!(status = status.as_u16(), "Request failed");
                Err(ClientError::Api {
                    status: status.as_u16(),
                    message: extract(&text),
                })
            }
        }
        .instrument(span)
        .await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &'static str,
        extract: MessageExtractor,
    ) -> Result<T, ClientError> {
        let text = self.send(request, endpoint, extract).await?;
        let value = serde_json::from_str(&text).map_err(DecodeError::from)?;
        Ok(value)
    }
}

#[async_trait]
impl AnalysisApi for HttpClient {
    async fn predict_risk(&self, file: &UploadFile) -> Result<AnalysisResult, ClientError> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::info!(file = %file.name, size = file.size(), "Uploading genomic data");
        let text = self
            .send(
                self.analysis(Method::POST, "/predict_risk").multipart(form),
                "predict_risk",
                ErrorBody::message_from,
            )
            .await?;

        Ok(AnalysisResult::from_json(&text)?)
    }

    async fn prevention_plan(&self, request: &PreventionRequest) -> Result<PreventionPlan, ClientError> {
        let response: PreventionResponse = self
            .send_json(
                self.analysis(Method::POST, "/personalized_prevention").json(request),
                "personalized_prevention",
                ErrorBody::message_from,
            )
            .await?;

        Ok(response.personalized_plan)
    }
}

#[async_trait]
impl AuthApi for HttpClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        self.send_json(
            self.auth(Method::POST, "/auth/login").json(request),
            "auth_login",
            AuthErrorBody::message_from,
        )
        .await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        self.send_json(
            self.auth(Method::POST, "/auth/register").json(request),
            "auth_register",
            AuthErrorBody::message_from,
        )
        .await
    }

    async fn current_user(&self, token: &str) -> Result<Session, ClientError> {
        self.send_json(
            self.auth(Method::GET, "/auth/me").bearer_auth(token),
            "auth_me",
            AuthErrorBody::message_from,
        )
        .await
    }

    async fn update_profile(&self, token: &str, fields: &ProfileFields) -> Result<Session, ClientError> {
        self.send_json(
            self.auth(Method::PUT, "/auth/profile").bearer_auth(token).json(fields),
            "auth_profile",
            AuthErrorBody::message_from,
        )
        .await
    }
}
