//! Integration tests for camera permission gating.

mod common;

use std::sync::Arc;

use ahhere_core::{Capability, PermissionState};
use ahhere_platform::{
    RecordingMailComposer, ScriptedCameraService, ScriptedLocationService,
    ScriptedPermissionService,
};
use ahhere_report::{CaptureWorkflow, WorkflowError, WorkflowState};
use ahhere_ui::ReportScreenState;

#[test]
fn permission_gate_tests_denied_camera_never_creates_a_report() {
    let permissions = Arc::new(ScriptedPermissionService::new(
        PermissionState::Granted,
        PermissionState::Denied,
    ));
    let camera = Arc::new(ScriptedCameraService::new(Vec::new()));
    let mut workflow = CaptureWorkflow::new(
        permissions.clone(),
        Arc::new(ScriptedLocationService::new(vec![Ok(common::dublin())])),
        camera.clone(),
        Arc::new(RecordingMailComposer::new(true)),
    );

    workflow.mount();
    let error = workflow.open_camera(1_000).expect_err("must be denied");
    assert!(matches!(
        error,
        WorkflowError::PermissionDenied(Capability::Camera)
    ));
    assert_eq!(workflow.state(), WorkflowState::Idle);
    assert!(workflow.report().is_none());
    assert_eq!(camera.launch_count(), 0);

    // The denial is surfaced with a retryable settings hint.
    let mut screen = ReportScreenState::new("0.1.0");
    screen.apply_error(&error);
    assert!(screen.settings_hint);
}
