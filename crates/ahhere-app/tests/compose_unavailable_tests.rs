//! Integration tests for missing mail capability handling.

mod common;

use std::sync::Arc;

use ahhere_core::ImageHandle;
use ahhere_platform::{
    CameraOutcome, RecordingMailComposer, ScriptedCameraService, ScriptedLocationService,
    ScriptedPermissionService,
};
use ahhere_report::{CaptureWorkflow, WorkflowError, WorkflowState};

#[test]
fn compose_unavailable_tests_send_fails_without_losing_the_report() {
    let image = ImageHandle::new("file:///tmp/violation.jpg").expect("valid handle");
    let composer = Arc::new(RecordingMailComposer::new(false));
    let mut workflow = CaptureWorkflow::new(
        Arc::new(ScriptedPermissionService::grant_all()),
        Arc::new(ScriptedLocationService::new(vec![Ok(common::dublin())])),
        Arc::new(ScriptedCameraService::new(vec![Ok(
            CameraOutcome::Captured(image),
        )])),
        composer.clone(),
    );

    workflow.open_camera(1_000).expect("capture");

    // Terminal, user-visible error with no fallback composer.
    assert!(matches!(
        workflow.send(),
        Err(WorkflowError::ComposeUnavailable)
    ));
    assert!(composer.sent().is_empty());

    // The report survives; state remains ReportReady.
    assert_eq!(workflow.state(), WorkflowState::ReportReady);
    assert!(workflow.report().is_some());
}
