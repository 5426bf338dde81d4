#![warn(missing_docs)]
//! # ahhere-report
//!
//! ## Purpose
//! Implements the capture workflow: the state machine that sequences
//! permission acquisition, camera invocation, fresh-fix fetch, report
//! construction, retake, and the mail handoff.
//!
//! ## Responsibilities
//! - Model the legal state transitions of the report screen's session.
//! - Enforce one in-flight platform request at a time (by construction:
//!   each suspending call completes before the next begins).
//! - Degrade rather than block: a location failure never prevents a
//!   report, a permission denial never loses data.
//!
//! ## Data flow
//! Screen mount -> location permission + cached initial fix -> user opens
//! camera -> camera permission -> capture -> fresh fix -> [`ahhere_core::Report`]
//! -> send serializes the report into a mail payload for the composer.
//!
//! ## Ownership and lifetimes
//! The workflow owns its services behind `Arc<dyn Trait>` and owns the
//! session's report; the report is immutable once built and replaced
//! wholesale on retake.
//!
//! ## Error model
//! [`WorkflowError`] carries the user-visible failure taxonomy. Camera
//! cancellation is a [`CaptureOutcome`] value, not an error, and returns
//! the machine to `Idle` with no data loss.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//!
//! use ahhere_platform::{
//!     RecordingMailComposer, ScriptedCameraService, ScriptedLocationService,
//!     ScriptedPermissionService,
//! };
//! use ahhere_report::{CaptureOutcome, CaptureWorkflow, WorkflowState};
//!
//! let mut workflow = CaptureWorkflow::new(
//!     Arc::new(ScriptedPermissionService::grant_all()),
//!     Arc::new(ScriptedLocationService::new(Vec::new())),
//!     Arc::new(ScriptedCameraService::capturing("file:///tmp/photo.jpg")),
//!     Arc::new(RecordingMailComposer::new(true)),
//! );
//! workflow.mount();
//! let outcome = workflow.open_camera(1_700_000_000_000).unwrap();
//! assert!(matches!(outcome, CaptureOutcome::ReportCreated { .. }));
//! assert_eq!(workflow.state(), WorkflowState::ReportReady);
//! ```

use std::sync::Arc;

use ahhere_core::{Capability, GeoFix, PermissionState, Report};
use ahhere_mail::{MailError, MailMessage, compose_report_mail};
use ahhere_platform::{
    CameraError, CameraOutcome, CameraService, CaptureOptions, ComposeError, LocationError,
    LocationService, MailComposer, PermissionService,
};
use thiserror::Error;

/// Workflow states of the report screen's session.
///
/// The camera-cancel terminal is represented by
/// [`CaptureOutcome::Cancelled`]; the machine itself rests at `Idle`
/// afterwards, which is what callers observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// No capture attempt is in progress.
    Idle,
    /// Location permission prompt is outstanding (screen mount).
    AwaitingLocationPermission,
    /// Camera permission established; launch is imminent.
    AwaitingCameraLaunch,
    /// Camera is open; waiting for capture, cancel, or error.
    AwaitingCameraResult,
    /// A report exists and can be sent or retaken.
    ReportReady,
}

/// Result of one camera attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A report was created.
    ReportCreated {
        /// `false` when the fresh fix fetch failed and the report was
        /// degraded to an absent location; the caller must surface this.
        location_attached: bool,
    },
    /// User dismissed the camera; no report was created.
    Cancelled,
}

/// Capture workflow state machine over injected platform services.
pub struct CaptureWorkflow {
    permissions: Arc<dyn PermissionService>,
    location: Arc<dyn LocationService>,
    camera: Arc<dyn CameraService>,
    composer: Arc<dyn MailComposer>,
    state: WorkflowState,
    location_permission: PermissionState,
    camera_permission: PermissionState,
    initial_fix: Option<GeoFix>,
    last_location_error: Option<LocationError>,
    report: Option<Report>,
}

impl CaptureWorkflow {
    /// Creates a workflow in `Idle` with both permissions unknown.
    pub fn new(
        permissions: Arc<dyn PermissionService>,
        location: Arc<dyn LocationService>,
        camera: Arc<dyn CameraService>,
        composer: Arc<dyn MailComposer>,
    ) -> Self {
        Self {
            permissions,
            location,
            camera,
            composer,
            state: WorkflowState::Idle,
            location_permission: PermissionState::Unknown,
            camera_permission: PermissionState::Unknown,
            initial_fix: None,
            last_location_error: None,
            report: None,
        }
    }

    /// Returns the current state snapshot.
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Returns the session's report, when one exists.
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// Returns the recorded grant state of one capability.
    pub fn permission(&self, capability: Capability) -> PermissionState {
        match capability {
            Capability::Location => self.location_permission,
            Capability::Camera => self.camera_permission,
        }
    }

    /// Returns the fix cached at mount time.
    ///
    /// Display-only: this fix is never attached to the final report and is
    /// never substituted when the fresh fetch at capture time fails.
    pub fn initial_fix(&self) -> Option<GeoFix> {
        self.initial_fix
    }

    /// Returns the location failure behind the most recent degraded
    /// report, for user-visible messaging.
    pub fn last_location_error(&self) -> Option<&LocationError> {
        self.last_location_error.as_ref()
    }

    /// Screen-mount entry: requests location permission and, on grant,
    /// caches an initial fix.
    ///
    /// Non-blocking from the user's perspective: the screen allows a
    /// camera launch regardless of the returned grant state, and an
    /// initial-fix failure is non-fatal.
    pub fn mount(&mut self) -> PermissionState {
        if self.state == WorkflowState::Idle {
            self.state = WorkflowState::AwaitingLocationPermission;
            let granted = self.permissions.request(Capability::Location);
            self.location_permission = self.location_permission.advance_to(granted);

            if self.location_permission.is_granted() {
                self.initial_fix = self.location.current_fix().ok();
            }
            self.state = WorkflowState::Idle;
        }

        self.location_permission
    }

    /// Opens the camera and drives the attempt to its terminal.
    ///
    /// Requests camera permission when it has not been established this
    /// session. On capture success a *fresh* fix is fetched (never the
    /// cached mount fix); if that fetch fails the report is created with
    /// an absent location and the outcome flags the degradation.
    ///
    /// # Errors
    /// - [`WorkflowError::PermissionDenied`]: retryable via OS settings;
    ///   no report is created and the machine returns to `Idle`.
    /// - [`WorkflowError::CaptureFailed`]: terminal for this attempt; the
    ///   machine returns to `Idle`.
    /// - [`WorkflowError::InvalidTransition`] when a report is already
    ///   pending (use [`CaptureWorkflow::retake`] first).
    pub fn open_camera(&mut self, now_ms: u64) -> Result<CaptureOutcome, WorkflowError> {
        if !matches!(
            self.state,
            WorkflowState::Idle | WorkflowState::AwaitingCameraLaunch
        ) {
            return Err(WorkflowError::InvalidTransition {
                from: self.state,
                operation: "open_camera",
            });
        }

        if !self.camera_permission.is_granted() {
            let granted = self.permissions.request(Capability::Camera);
            self.camera_permission = self.camera_permission.advance_to(granted);
            if !self.camera_permission.is_granted() {
                self.state = WorkflowState::Idle;
                return Err(WorkflowError::PermissionDenied(Capability::Camera));
            }
        }

        self.state = WorkflowState::AwaitingCameraLaunch;
        self.launch_camera(now_ms)
    }

    fn launch_camera(&mut self, now_ms: u64) -> Result<CaptureOutcome, WorkflowError> {
        self.state = WorkflowState::AwaitingCameraResult;

        match self.camera.launch(CaptureOptions::default()) {
            Ok(CameraOutcome::Captured(image)) => {
                // Fresh fix, not the mount-time cache; failure degrades the
                // report instead of blocking it.
                let (location, location_error) = match self.location.current_fix() {
                    Ok(fix) => (Some(fix), None),
                    Err(error) => (None, Some(error)),
                };

                let location_attached = location.is_some();
                self.last_location_error = location_error;
                self.report = Some(Report::new(image, location, now_ms));
                self.state = WorkflowState::ReportReady;

                Ok(CaptureOutcome::ReportCreated { location_attached })
            }
            Ok(CameraOutcome::Cancelled) => {
                self.state = WorkflowState::Idle;
                Ok(CaptureOutcome::Cancelled)
            }
            Err(error) => {
                self.state = WorkflowState::Idle;
                Err(WorkflowError::CaptureFailed(error))
            }
        }
    }

    /// Discards the current report and relaunches the camera directly,
    /// skipping the permission re-check established this session.
    ///
    /// # Errors
    /// Returns [`WorkflowError::InvalidTransition`] unless a report is
    /// pending; otherwise the same terminals as
    /// [`CaptureWorkflow::open_camera`].
    pub fn retake(&mut self, now_ms: u64) -> Result<CaptureOutcome, WorkflowError> {
        if self.state != WorkflowState::ReportReady {
            return Err(WorkflowError::InvalidTransition {
                from: self.state,
                operation: "retake",
            });
        }

        self.report = None;
        self.last_location_error = None;
        self.state = WorkflowState::AwaitingCameraLaunch;
        self.launch_camera(now_ms)
    }

    /// Serializes the pending report into the mail payload and hands it to
    /// the device composer.
    ///
    /// # Errors
    /// - [`WorkflowError::InvalidTransition`] without a pending report.
    /// - [`WorkflowError::ComposeUnavailable`] when no mail application is
    ///   registered; terminal, with no fallback composer.
    /// - [`WorkflowError::ComposeFailed`] when the handoff itself fails.
    pub fn send(&self) -> Result<MailMessage, WorkflowError> {
        let report = match (&self.report, self.state) {
            (Some(report), WorkflowState::ReportReady) => report,
            _ => {
                return Err(WorkflowError::InvalidTransition {
                    from: self.state,
                    operation: "send",
                });
            }
        };

        if !self.composer.can_compose() {
            return Err(WorkflowError::ComposeUnavailable);
        }

        let message = compose_report_mail(report)?;
        self.composer
            .compose(&message.recipient, &message.subject, &message.body)?;

        Ok(message)
    }
}

/// User-visible workflow failure taxonomy.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Permission denied; recoverable by granting access in OS settings.
    #[error("{} permission denied; grant access in system settings and retry", .0.label())]
    PermissionDenied(Capability),
    /// Camera launch or capture failed; terminal for this attempt.
    #[error("capture failed: {0}")]
    CaptureFailed(#[from] CameraError),
    /// No mail application is registered; terminal, no fallback composer.
    #[error("no mail application is available on this device")]
    ComposeUnavailable,
    /// Handoff to the mail application failed.
    #[error("mail handoff failed: {0}")]
    ComposeFailed(#[from] ComposeError),
    /// Mail payload could not be rendered.
    #[error("mail payload failure: {0}")]
    Payload(#[from] MailError),
    /// Operation is not legal from the current state.
    #[error("operation {operation} is not legal from state {from:?}")]
    InvalidTransition {
        /// State the machine was in.
        from: WorkflowState,
        /// Rejected operation name.
        operation: &'static str,
    },
}

#[cfg(test)]
mod tests {
    //! Unit tests for workflow transitions and degradation semantics.

    use ahhere_platform::{
        RecordingMailComposer, ScriptedCameraService, ScriptedLocationService,
        ScriptedPermissionService,
    };

    use super::*;

    fn fix(latitude: f64, longitude: f64) -> GeoFix {
        GeoFix::new(latitude, longitude).expect("valid fix")
    }

    fn workflow_with(
        permissions: ScriptedPermissionService,
        location: ScriptedLocationService,
        camera: ScriptedCameraService,
        composer: RecordingMailComposer,
    ) -> (
        CaptureWorkflow,
        Arc<ScriptedPermissionService>,
        Arc<ScriptedCameraService>,
        Arc<RecordingMailComposer>,
    ) {
        let permissions = Arc::new(permissions);
        let camera = Arc::new(camera);
        let composer = Arc::new(composer);
        let workflow = CaptureWorkflow::new(
            permissions.clone(),
            Arc::new(location),
            camera.clone(),
            composer.clone(),
        );
        (workflow, permissions, camera, composer)
    }

    #[test]
    fn mount_caches_initial_fix_that_is_not_attached_to_report() {
        let (mut workflow, _, _, _) = workflow_with(
            ScriptedPermissionService::grant_all(),
            ScriptedLocationService::new(vec![Ok(fix(10.0, 20.0)), Ok(fix(53.3498, -6.2603))]),
            ScriptedCameraService::capturing("file:///tmp/a.jpg"),
            RecordingMailComposer::new(true),
        );

        assert!(workflow.mount().is_granted());
        assert_eq!(workflow.initial_fix(), Some(fix(10.0, 20.0)));

        let outcome = workflow.open_camera(5_000).expect("capture succeeds");
        assert_eq!(
            outcome,
            CaptureOutcome::ReportCreated {
                location_attached: true
            }
        );

        let report = workflow.report().expect("report exists");
        assert_eq!(report.location, Some(fix(53.3498, -6.2603)));
        assert_eq!(report.captured_at_ms, 5_000);
    }

    #[test]
    fn denied_camera_permission_creates_no_report_and_returns_to_idle() {
        let (mut workflow, _, camera, _) = workflow_with(
            ScriptedPermissionService::new(PermissionState::Granted, PermissionState::Denied),
            ScriptedLocationService::new(vec![Ok(fix(1.0, 2.0))]),
            ScriptedCameraService::capturing("file:///tmp/a.jpg"),
            RecordingMailComposer::new(true),
        );

        let error = workflow.open_camera(1_000).expect_err("denied");
        assert!(matches!(
            error,
            WorkflowError::PermissionDenied(Capability::Camera)
        ));
        assert_eq!(workflow.state(), WorkflowState::Idle);
        assert!(workflow.report().is_none());
        assert_eq!(camera.launch_count(), 0);
    }

    #[test]
    fn fresh_fix_failure_degrades_report_instead_of_blocking() {
        let (mut workflow, _, _, _) = workflow_with(
            ScriptedPermissionService::grant_all(),
            ScriptedLocationService::always_failing(LocationError::Timeout),
            ScriptedCameraService::capturing("file:///tmp/a.jpg"),
            RecordingMailComposer::new(true),
        );

        let outcome = workflow.open_camera(2_000).expect("capture still succeeds");
        assert_eq!(
            outcome,
            CaptureOutcome::ReportCreated {
                location_attached: false
            }
        );
        assert_eq!(workflow.state(), WorkflowState::ReportReady);

        let report = workflow.report().expect("degraded report exists");
        assert!(report.location.is_none());
        assert!(matches!(
            workflow.last_location_error(),
            Some(LocationError::Timeout)
        ));
    }

    #[test]
    fn cancel_returns_to_idle_with_no_report() {
        let (mut workflow, _, _, _) = workflow_with(
            ScriptedPermissionService::grant_all(),
            ScriptedLocationService::new(vec![Ok(fix(1.0, 2.0))]),
            ScriptedCameraService::new(vec![Ok(CameraOutcome::Cancelled)]),
            RecordingMailComposer::new(true),
        );

        let outcome = workflow.open_camera(1_000).expect("cancel is not an error");
        assert_eq!(outcome, CaptureOutcome::Cancelled);
        assert_eq!(workflow.state(), WorkflowState::Idle);
        assert!(workflow.report().is_none());
    }

    #[test]
    fn camera_failure_is_terminal_for_the_attempt() {
        let (mut workflow, _, _, _) = workflow_with(
            ScriptedPermissionService::grant_all(),
            ScriptedLocationService::new(vec![Ok(fix(1.0, 2.0))]),
            ScriptedCameraService::new(vec![Err(CameraError::Launch("hardware busy".into()))]),
            RecordingMailComposer::new(true),
        );

        let error = workflow.open_camera(1_000).expect_err("launch failed");
        assert!(matches!(error, WorkflowError::CaptureFailed(_)));
        assert_eq!(workflow.state(), WorkflowState::Idle);
        assert!(workflow.report().is_none());
    }

    #[test]
    fn retake_discards_report_and_skips_permission_recheck() {
        let (mut workflow, permissions, camera, _) = workflow_with(
            ScriptedPermissionService::grant_all(),
            ScriptedLocationService::new(vec![Ok(fix(1.0, 2.0)), Ok(fix(3.0, 4.0))]),
            ScriptedCameraService::new(vec![
                Ok(CameraOutcome::Captured(
                    ahhere_core::ImageHandle::new("file:///tmp/first.jpg").unwrap(),
                )),
                Ok(CameraOutcome::Captured(
                    ahhere_core::ImageHandle::new("file:///tmp/second.jpg").unwrap(),
                )),
            ]),
            RecordingMailComposer::new(true),
        );

        workflow.open_camera(1_000).expect("first capture");
        let first = workflow.report().cloned().expect("first report");

        workflow.retake(2_000).expect("retake capture");
        let second = workflow.report().cloned().expect("second report");

        assert_ne!(first.image, second.image);
        assert_eq!(second.location, Some(fix(3.0, 4.0)));
        assert_eq!(second.captured_at_ms, 2_000);
        assert_eq!(camera.launch_count(), 2);
        // Permission established once for the whole session.
        assert_eq!(permissions.request_count(Capability::Camera), 1);
    }

    #[test]
    fn send_requires_report_and_available_composer() {
        let (workflow, _, _, _) = workflow_with(
            ScriptedPermissionService::grant_all(),
            ScriptedLocationService::new(Vec::new()),
            ScriptedCameraService::new(Vec::new()),
            RecordingMailComposer::new(true),
        );
        assert!(matches!(
            workflow.send(),
            Err(WorkflowError::InvalidTransition { .. })
        ));

        let (mut workflow, _, _, composer) = workflow_with(
            ScriptedPermissionService::grant_all(),
            ScriptedLocationService::new(vec![Ok(fix(53.3498, -6.2603))]),
            ScriptedCameraService::capturing("file:///tmp/a.jpg"),
            RecordingMailComposer::new(false),
        );
        workflow.open_camera(1_000).expect("capture");
        assert!(matches!(
            workflow.send(),
            Err(WorkflowError::ComposeUnavailable)
        ));
        assert!(composer.sent().is_empty());
    }

    #[test]
    fn send_hands_payload_to_composer() {
        let (mut workflow, _, _, composer) = workflow_with(
            ScriptedPermissionService::grant_all(),
            ScriptedLocationService::new(vec![Ok(fix(53.3498, -6.2603))]),
            ScriptedCameraService::capturing("file:///tmp/a.jpg"),
            RecordingMailComposer::new(true),
        );

        workflow.open_camera(0).expect("capture");
        let message = workflow.send().expect("send succeeds");

        let sent = composer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, message.recipient);
        assert!(sent[0].body.contains("53.349800, -6.260300"));
        assert_eq!(workflow.state(), WorkflowState::ReportReady);
    }
}
