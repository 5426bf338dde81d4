//! Shared fixtures for app integration tests.

use std::sync::Arc;

use ahhere_core::GeoFix;
use ahhere_platform::{
    CameraError, CameraOutcome, LocationError, RecordingMailComposer, ScriptedCameraService,
    ScriptedLocationService, ScriptedPermissionService,
};
use ahhere_report::CaptureWorkflow;

/// City-centre fixture coordinates used across scenarios.
#[allow(dead_code)]
pub fn dublin() -> GeoFix {
    GeoFix::new(53.3498, -6.2603).expect("fixture fix should be valid")
}

/// Creates an all-granted workflow over scripted location and camera
/// responses, returning the shared composer for send assertions.
#[allow(dead_code)]
pub fn granted_workflow(
    location_responses: Vec<Result<GeoFix, LocationError>>,
    camera_outcomes: Vec<Result<CameraOutcome, CameraError>>,
) -> (CaptureWorkflow, Arc<RecordingMailComposer>) {
    let composer = Arc::new(RecordingMailComposer::new(true));
    let workflow = CaptureWorkflow::new(
        Arc::new(ScriptedPermissionService::grant_all()),
        Arc::new(ScriptedLocationService::new(location_responses)),
        Arc::new(ScriptedCameraService::new(camera_outcomes)),
        composer.clone(),
    );
    (workflow, composer)
}
