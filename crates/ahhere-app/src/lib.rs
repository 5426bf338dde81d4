#![warn(missing_docs)]
//! # ahhere-app
//!
//! ## Purpose
//! Orchestrates workflow, map resolution, mail payload, and screen state
//! for `ahhere`.
//!
//! ## Responsibilities
//! - Wire the capture workflow to the map resolver and screen state.
//! - Source map configuration from the environment.
//! - Project runtime state into flat status snapshots for the shell.
//!
//! ## Data flow
//! Platform services -> capture workflow -> report -> map resolution +
//! mail payload -> screen status projection.
//!
//! ## Error model
//! Subsystem failures are wrapped in [`AppError`] and categorized for
//! runtime observability.

use ahhere_core::Report;
use ahhere_mail::{MailError, MailMessage, compose_report_mail};
use ahhere_maps::{MapConfig, MapError, MapResolver};
use ahhere_report::WorkflowError;
use ahhere_ui::{ReportScreenState, ScreenPhase};
use thiserror::Error;
use url::Url;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("AHHERE_VERSION");

/// Environment variable carrying the primary map provider key.
pub const MAPS_API_KEY_ENV: &str = "AHHERE_MAPS_API_KEY";

/// Consolidated runtime status snapshot for simple shell projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeStatus {
    /// Whether the camera action is currently offered.
    pub camera_allowed: bool,
    /// Whether the send action is currently offered.
    pub send_allowed: bool,
    /// Screen phase as human-readable string.
    pub phase: String,
    /// Current status line.
    pub status: String,
    /// Map preview note.
    pub map_note: String,
}

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Builds map configuration from the process environment.
///
/// An unset or blank key leaves the primary provider unconfigured, which
/// routes all rendering to the fallback provider.
pub fn map_config_from_env() -> MapConfig {
    let api_key = std::env::var(MAPS_API_KEY_ENV)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());

    MapConfig::new(api_key)
}

/// Creates the per-screen map resolver from environment configuration.
pub fn screen_map_resolver() -> MapResolver {
    MapResolver::new(map_config_from_env())
}

/// Composes the outbound mail payload for a completed report.
///
/// # Errors
/// Returns [`AppError::Mail`] when the payload cannot be rendered.
pub fn report_to_mail(report: &Report) -> Result<MailMessage, AppError> {
    Ok(compose_report_mail(report)?)
}

/// Returns `true` when the given link is a `mailto:` URL.
pub fn is_mailto_url(link: &str) -> bool {
    Url::parse(link)
        .map(|url| url.scheme() == "mailto")
        .unwrap_or(false)
}

/// Projects screen state into a flat status snapshot.
pub fn project_runtime_status(state: &ReportScreenState) -> RuntimeStatus {
    let phase = match state.phase {
        ScreenPhase::Ready => "Ready",
        ScreenPhase::Camera => "Camera",
        ScreenPhase::Preview => "Preview",
    };

    RuntimeStatus {
        camera_allowed: state.can_open_camera(),
        send_allowed: state.can_send(),
        phase: phase.to_string(),
        status: state.status.clone(),
        map_note: state.map_note.clone(),
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Capture workflow error.
    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),
    /// Map resolution error.
    #[error("map error: {0}")]
    Map(#[from] MapError),
    /// Mail payload error.
    #[error("mail error: {0}")]
    Mail(#[from] MailError),
}
