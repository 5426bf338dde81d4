#![warn(missing_docs)]
//! # ahhere-ui
//!
//! ## Purpose
//! Defines the UI-facing state model for the report screen.
//!
//! ## Responsibilities
//! - Represent permission, screen phase, and status-line state.
//! - Project workflow outcomes and errors into display-safe text.
//! - Expose guard checks for opening the camera and sending the report.
//!
//! ## Data flow
//! Workflow events mutate [`ReportScreenState`], which drives the rendered
//! status in the shell. No layout or styling lives here.
//!
//! ## Ownership and lifetimes
//! The state owns all of its strings to keep event reducers simple.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors. Invalid
//! combinations are prevented by guard methods.

use ahhere_core::PermissionState;
use ahhere_maps::MapResolutionState;
use ahhere_report::{CaptureOutcome, WorkflowError, WorkflowState};

/// Report screen phase projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPhase {
    /// No photo yet; the capture prompt is shown.
    Ready,
    /// Camera is open; the screen is suspended behind it.
    Camera,
    /// A captured report is previewed with its map and send actions.
    Preview,
}

/// Aggregate report screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportScreenState {
    /// App version string sourced from the root `VERSION` file.
    pub version: String,
    /// Location grant projection.
    pub location_permission: PermissionState,
    /// Camera grant projection.
    pub camera_permission: PermissionState,
    /// Current screen phase.
    pub phase: ScreenPhase,
    /// Human-readable status line.
    pub status: String,
    /// Whether the status should carry an OS-settings deep-link hint.
    pub settings_hint: bool,
    /// Map preview note (primary vs fallback provider).
    pub map_note: String,
}

impl ReportScreenState {
    /// Creates the initial screen state.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            location_permission: PermissionState::Unknown,
            camera_permission: PermissionState::Unknown,
            phase: ScreenPhase::Ready,
            status: "Ready to report. Tap the camera button to photograph the violation."
                .to_string(),
            settings_hint: false,
            map_note: String::new(),
        }
    }

    /// Returns `true` when the camera action is offered.
    pub fn can_open_camera(&self) -> bool {
        self.phase != ScreenPhase::Camera
    }

    /// Returns `true` when the send action is offered.
    pub fn can_send(&self) -> bool {
        self.phase == ScreenPhase::Preview
    }

    /// Projects the workflow state into the screen phase.
    pub fn apply_workflow_state(&mut self, state: WorkflowState) {
        self.phase = match state {
            WorkflowState::Idle | WorkflowState::AwaitingLocationPermission => ScreenPhase::Ready,
            WorkflowState::AwaitingCameraLaunch | WorkflowState::AwaitingCameraResult => {
                ScreenPhase::Camera
            }
            WorkflowState::ReportReady => ScreenPhase::Preview,
        };
    }

    /// Projects a capture outcome into the status line.
    ///
    /// A degraded report (no fix) always yields a visible notice; the
    /// degradation is never silent.
    pub fn apply_outcome(&mut self, outcome: CaptureOutcome) {
        self.settings_hint = false;
        self.status = match outcome {
            CaptureOutcome::ReportCreated {
                location_attached: true,
            } => "Photo captured with location details.".to_string(),
            CaptureOutcome::ReportCreated {
                location_attached: false,
            } => "Photo captured, but your location could not be determined.".to_string(),
            CaptureOutcome::Cancelled => "Capture cancelled.".to_string(),
        };
    }

    /// Projects a workflow error into the status line.
    pub fn apply_error(&mut self, error: &WorkflowError) {
        self.settings_hint = matches!(error, WorkflowError::PermissionDenied(_));
        self.status = error.to_string();
    }

    /// Projects map resolution state into the preview note.
    pub fn apply_map_state(&mut self, state: MapResolutionState) {
        self.map_note = if state.using_fallback {
            "Showing fallback map for this location.".to_string()
        } else if state.primary_attempted {
            "Tap the map to show the exact coordinates.".to_string()
        } else {
            String::new()
        };
    }
}
