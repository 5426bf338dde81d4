//! Integration tests for runtime status projection.

use ahhere_app::{app_version, project_runtime_status};
use ahhere_maps::MapResolutionState;
use ahhere_report::{CaptureOutcome, WorkflowState};
use ahhere_ui::ReportScreenState;

#[test]
fn screen_status_projection_tests_preview_phase_enables_send() {
    let mut screen = ReportScreenState::new(app_version());
    screen.apply_workflow_state(WorkflowState::ReportReady);
    screen.apply_outcome(CaptureOutcome::ReportCreated {
        location_attached: true,
    });
    screen.apply_map_state(MapResolutionState {
        primary_attempted: false,
        using_fallback: true,
    });

    let status = project_runtime_status(&screen);
    assert_eq!(status.phase, "Preview");
    assert!(status.send_allowed);
    assert!(status.camera_allowed);
    assert_eq!(status.status, "Photo captured with location details.");
    assert!(status.map_note.contains("fallback map"));
}

#[test]
fn screen_status_projection_tests_camera_phase_blocks_both_actions() {
    let mut screen = ReportScreenState::new(app_version());
    screen.apply_workflow_state(WorkflowState::AwaitingCameraResult);

    let status = project_runtime_status(&screen);
    assert_eq!(status.phase, "Camera");
    assert!(!status.camera_allowed);
    assert!(!status.send_allowed);
}
