//! HTTP API Client
//!
//! Functions for the analysis API and the auth API, plus the
//! `localStorage` slots the client keeps between page loads.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use aura::analysis::{
    AnalysisResult, ErrorBody, PreventionPlan, PreventionRequest, PreventionResponse,
    RESULT_SLOT_KEY,
};
use aura::session::{
    AuthErrorBody, AuthResponse, LoginRequest, ProfileFields, RegisterRequest, Session, TOKEN_KEY,
};

/// Default analysis API base URL
pub const DEFAULT_ANALYSIS_BASE: &str = "http://localhost:8000";

/// Default auth API base URL
pub const DEFAULT_AUTH_BASE: &str = "http://localhost:5000/api";

const ANALYSIS_URL_KEY: &str = "aura_analysis_url";
const AUTH_URL_KEY: &str = "aura_auth_url";

// ============ Local storage ============

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn read_item(key: &str) -> Option<String> {
    storage()?.get_item(key).ok()?
}

fn write_item(key: &str, value: &str) -> Result<(), String> {
    let storage = storage().ok_or_else(|| "localStorage is unavailable".to_string())?;
    storage.set_item(key, value).map_err(|_| {
        web_sys::console::warn_1(&format!("Could not write {} to localStorage", key).into());
        format!("Could not write {}", key)
    })
}

fn remove_item(key: &str) {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(key);
    }
}

/// Analysis API base URL from local storage, or the default
pub fn get_analysis_base() -> String {
    read_item(ANALYSIS_URL_KEY)
        .unwrap_or_else(|| DEFAULT_ANALYSIS_BASE.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Auth API base URL from local storage, or the default
pub fn get_auth_base() -> String {
    read_item(AUTH_URL_KEY)
        .unwrap_or_else(|| DEFAULT_AUTH_BASE.to_string())
        .trim_end_matches('/')
        .to_string()
}

pub fn set_analysis_base(url: &str) {
    let _ = write_item(ANALYSIS_URL_KEY, url.trim());
}

pub fn set_auth_base(url: &str) {
    let _ = write_item(AUTH_URL_KEY, url.trim());
}

pub fn load_token() -> Option<String> {
    read_item(TOKEN_KEY).filter(|t| !t.is_empty())
}

pub fn save_token(token: &str) {
    let _ = write_item(TOKEN_KEY, token);
}

pub fn clear_token() {
    remove_item(TOKEN_KEY);
}

/// Raw JSON of the latest analysis
pub fn load_result() -> Option<String> {
    read_item(RESULT_SLOT_KEY)
}

/// Overwrite the result slot
pub fn save_result(result: &AnalysisResult) -> Result<(), String> {
    let json = result.to_json().map_err(|e| e.to_string())?;
    write_item(RESULT_SLOT_KEY, &json)
}

// ============ Request plumbing ============

/// Send a request and decode a JSON success body.
///
/// Failures become the server's message when `extract` finds one in the
/// body, else `fallback`. Details go to the console.
async fn send_json<T: DeserializeOwned>(
    request: Request,
    extract: fn(&str) -> Option<String>,
    fallback: &str,
) -> Result<T, String> {
    let response = request.send().await.map_err(|e| {
        web_sys::console::error_1(&format!("Network error: {}", e).into());
        fallback.to_string()
    })?;

    if !response.ok() {
        return Err(failure_message(response, extract, fallback).await);
    }

    response.json().await.map_err(|e| {
        web_sys::console::error_1(&format!("Parse error: {}", e).into());
        fallback.to_string()
    })
}

async fn failure_message(
    response: Response,
    extract: fn(&str) -> Option<String>,
    fallback: &str,
) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    web_sys::console::warn_1(&format!("Request failed with status {}", status).into());
    extract(&body).unwrap_or_else(|| fallback.to_string())
}

fn build(builder: Result<Request, gloo_net::Error>, fallback: &str) -> Result<Request, String> {
    builder.map_err(|e| {
        web_sys::console::error_1(&format!("Request build error: {}", e).into());
        fallback.to_string()
    })
}

fn with_token(builder: RequestBuilder, token: &str) -> RequestBuilder {
    builder.header("Authorization", &format!("Bearer {}", token))
}

// ============ Analysis API ============

/// Upload a genomic file as multipart field `file`
pub async fn predict_risk(file: &web_sys::File, fallback: &str) -> Result<AnalysisResult, String> {
    let form = web_sys::FormData::new().map_err(|_| fallback.to_string())?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|_| fallback.to_string())?;

    let request = build(
        Request::post(&format!("{}/predict_risk", get_analysis_base())).body(form),
        fallback,
    )?;
    send_json(request, ErrorBody::message_from, fallback).await
}

/// Fetch the prevention plan for one risk
pub async fn prevention_plan(body: &PreventionRequest) -> Result<PreventionPlan, String> {
    const FALLBACK: &str = "Unable to load prevention plan";

    let request = build(
        Request::post(&format!("{}/personalized_prevention", get_analysis_base())).json(body),
        FALLBACK,
    )?;
    let response: PreventionResponse = send_json(request, ErrorBody::message_from, FALLBACK).await?;
    Ok(response.personalized_plan)
}

// ============ Auth API ============

pub async fn login(body: &LoginRequest, fallback: &str) -> Result<AuthResponse, String> {
    let request = build(
        Request::post(&format!("{}/auth/login", get_auth_base())).json(body),
        fallback,
    )?;
    send_json(request, AuthErrorBody::message_from, fallback).await
}

pub async fn register(body: &RegisterRequest, fallback: &str) -> Result<AuthResponse, String> {
    let request = build(
        Request::post(&format!("{}/auth/register", get_auth_base())).json(body),
        fallback,
    )?;
    send_json(request, AuthErrorBody::message_from, fallback).await
}

/// Why the saved token could not be resolved
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUserError {
    /// HTTP status when the auth API answered
    pub status: Option<u16>,
    pub message: String,
}

/// Resolve the user behind a saved token
pub async fn current_user(token: &str) -> Result<Session, CurrentUserError> {
    const FALLBACK: &str = "Session expired";
    let unanswered = |message: String| CurrentUserError { status: None, message };

    let request = build(
        with_token(Request::get(&format!("{}/auth/me", get_auth_base())), token).build(),
        FALLBACK,
    )
    .map_err(unanswered)?;

    let response = request.send().await.map_err(|e| unanswered(e.to_string()))?;
    if !response.ok() {
        let status = response.status();
        return Err(CurrentUserError {
            status: Some(status),
            message: failure_message(response, AuthErrorBody::message_from, FALLBACK).await,
        });
    }

    response.json().await.map_err(|e| unanswered(e.to_string()))
}

pub async fn update_profile(
    token: &str,
    fields: &ProfileFields,
    fallback: &str,
) -> Result<Session, String> {
    let request = build(
        with_token(Request::put(&format!("{}/auth/profile", get_auth_base())), token).json(fields),
        fallback,
    )?;
    send_json(request, AuthErrorBody::message_from, fallback).await
}
