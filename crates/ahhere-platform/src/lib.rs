#![warn(missing_docs)]
//! # ahhere-platform
//!
//! ## Purpose
//! Provides backend-agnostic abstractions for the platform services the
//! report workflow depends on: permission prompts, geolocation, the camera,
//! and the device mail composer.
//!
//! ## Responsibilities
//! - Define one trait per external collaborator.
//! - Expose deterministic scripted implementations for tests and demos.
//! - Carry the fixed capture options (4:3 aspect, 0.8 quality).
//!
//! ## Data flow
//! The workflow requests a permission -> launches the camera through
//! [`CameraService`] -> fetches a fresh fix through [`LocationService`] ->
//! hands the composed message to [`MailComposer`].
//!
//! ## Ownership and lifetimes
//! Service results are owned values ([`ahhere_core::ImageHandle`],
//! [`ahhere_core::GeoFix`]); no borrowed platform memory escapes a service
//! boundary.
//!
//! ## Error model
//! Each service reports failures through its own error enum
//! ([`LocationError`], [`CameraError`], [`ComposeError`]); cancellation is
//! a [`CameraOutcome`] value, not an error.

use std::sync::Mutex;

use ahhere_core::{Capability, GeoFix, ImageHandle, PermissionState};
use thiserror::Error;

/// Camera launch options.
///
/// Aspect and quality are product constraints carried from the shipped app
/// (4:3, lossy quality factor 0.8), not correctness requirements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// Fixed capture aspect ratio as (width, height) parts.
    pub aspect: (u8, u8),
    /// Lossy compression quality factor in (0, 1].
    pub quality: f32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            aspect: (4, 3),
            quality: 0.8,
        }
    }
}

/// Result of a camera launch that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraOutcome {
    /// User completed capture; the handle references the image data.
    Captured(ImageHandle),
    /// User dismissed the camera without capturing.
    Cancelled,
}

/// OS permission prompt abstraction.
pub trait PermissionService: Send + Sync {
    /// Requests one capability and returns the resulting grant state.
    ///
    /// The platform prompt resolves to granted or denied; `Unknown` is
    /// never returned from a completed request.
    fn request(&self, capability: Capability) -> PermissionState;
}

/// Single-fix geolocation abstraction.
pub trait LocationService: Send + Sync {
    /// Fetches one current fix.
    ///
    /// # Errors
    /// Returns [`LocationError`] when the provider fails, times out, or the
    /// permission was revoked mid-session.
    fn current_fix(&self) -> Result<GeoFix, LocationError>;
}

/// Platform camera abstraction.
///
/// A launch suspends the caller until the user completes capture or
/// cancels; the design allows one in-flight launch at a time, enforced by
/// the caller.
pub trait CameraService: Send + Sync {
    /// Launches the camera with fixed capture options.
    ///
    /// # Errors
    /// Returns [`CameraError`] when the camera fails to launch or capture.
    fn launch(&self, options: CaptureOptions) -> Result<CameraOutcome, CameraError>;
}

/// Device mail-compose abstraction.
///
/// Attachment of the captured image is this collaborator's responsibility,
/// not part of the payload contract.
pub trait MailComposer: Send + Sync {
    /// Returns `true` when a mail application is registered on the device.
    fn can_compose(&self) -> bool;

    /// Opens the composer pre-filled with the given message.
    ///
    /// # Errors
    /// Returns [`ComposeError`] when handing off to the mail application
    /// fails.
    fn compose(&self, recipient: &str, subject: &str, body: &str) -> Result<(), ComposeError>;
}

/// Geolocation service error type.
#[derive(Debug, Clone, Error)]
pub enum LocationError {
    /// Provider could not produce a fix.
    #[error("location fix unavailable: {0}")]
    Unavailable(String),
    /// Fix request exceeded the provider deadline.
    #[error("location fix timed out")]
    Timeout,
    /// Permission was revoked after the session started.
    #[error("location permission revoked mid-session")]
    PermissionRevoked,
}

/// Camera service error type.
#[derive(Debug, Clone, Error)]
pub enum CameraError {
    /// Camera failed to launch or to deliver a result.
    #[error("camera launch failure: {0}")]
    Launch(String),
}

/// Mail composer error type.
#[derive(Debug, Clone, Error)]
pub enum ComposeError {
    /// Handoff to the registered mail application failed.
    #[error("mail compose handoff failed: {0}")]
    Handoff(String),
}

/// Scripted permission service with fixed per-capability answers.
///
/// Records request counts so tests can assert that an established grant is
/// not re-requested within a session.
#[derive(Debug)]
pub struct ScriptedPermissionService {
    location: PermissionState,
    camera: PermissionState,
    requests: Mutex<Vec<Capability>>,
}

impl ScriptedPermissionService {
    /// Creates a service answering with the given states.
    pub fn new(location: PermissionState, camera: PermissionState) -> Self {
        Self {
            location,
            camera,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates a service granting both capabilities.
    pub fn grant_all() -> Self {
        Self::new(PermissionState::Granted, PermissionState::Granted)
    }

    /// Returns how many times one capability was requested.
    pub fn request_count(&self, capability: Capability) -> usize {
        self.requests
            .lock()
            .map(|requests| {
                requests
                    .iter()
                    .filter(|requested| **requested == capability)
                    .count()
            })
            .unwrap_or(0)
    }
}

impl PermissionService for ScriptedPermissionService {
    fn request(&self, capability: Capability) -> PermissionState {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(capability);
        }

        match capability {
            Capability::Location => self.location,
            Capability::Camera => self.camera,
        }
    }
}

/// Scripted location service replaying queued responses in order.
#[derive(Debug)]
pub struct ScriptedLocationService {
    responses: Mutex<Vec<Result<GeoFix, LocationError>>>,
    fetches: Mutex<u64>,
}

impl ScriptedLocationService {
    /// Creates a service that replays `responses` front to back.
    ///
    /// Once the script is exhausted, further fetches report
    /// [`LocationError::Unavailable`].
    pub fn new(responses: Vec<Result<GeoFix, LocationError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            fetches: Mutex::new(0),
        }
    }

    /// Creates a service that always fails with the given error.
    pub fn always_failing(error: LocationError) -> Self {
        Self::new(vec![Err(error.clone()), Err(error)])
    }

    /// Returns the number of fix requests observed.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.lock().map(|count| *count).unwrap_or(0)
    }
}

impl LocationService for ScriptedLocationService {
    fn current_fix(&self) -> Result<GeoFix, LocationError> {
        if let Ok(mut fetches) = self.fetches.lock() {
            *fetches += 1;
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| LocationError::Unavailable("scripted response lock poisoned".to_string()))?;

        if responses.is_empty() {
            return Err(LocationError::Unavailable(
                "scripted responses exhausted".to_string(),
            ));
        }

        responses.remove(0)
    }
}

/// Scripted camera service replaying queued outcomes and recording the
/// options each launch received.
#[derive(Debug)]
pub struct ScriptedCameraService {
    outcomes: Mutex<Vec<Result<CameraOutcome, CameraError>>>,
    launches: Mutex<Vec<CaptureOptions>>,
}

impl ScriptedCameraService {
    /// Creates a service that replays `outcomes` front to back.
    pub fn new(outcomes: Vec<Result<CameraOutcome, CameraError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            launches: Mutex::new(Vec::new()),
        }
    }

    /// Creates a service that captures the given image once.
    pub fn capturing(uri: &str) -> Self {
        let handle = ImageHandle::new(uri).expect("scripted image uri must be non-blank");
        Self::new(vec![Ok(CameraOutcome::Captured(handle))])
    }

    /// Returns the number of launches observed.
    pub fn launch_count(&self) -> usize {
        self.launches.lock().map(|launches| launches.len()).unwrap_or(0)
    }

    /// Returns the options passed to the most recent launch.
    pub fn last_options(&self) -> Option<CaptureOptions> {
        self.launches
            .lock()
            .ok()
            .and_then(|launches| launches.last().copied())
    }
}

impl CameraService for ScriptedCameraService {
    fn launch(&self, options: CaptureOptions) -> Result<CameraOutcome, CameraError> {
        if let Ok(mut launches) = self.launches.lock() {
            launches.push(options);
        }

        let mut outcomes = self
            .outcomes
            .lock()
            .map_err(|_| CameraError::Launch("scripted outcome lock poisoned".to_string()))?;

        if outcomes.is_empty() {
            return Err(CameraError::Launch(
                "scripted outcomes exhausted".to_string(),
            ));
        }

        outcomes.remove(0)
    }
}

/// One message handed to the recording composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    /// Destination mailbox.
    pub recipient: String,
    /// Message subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Mail composer that records every handoff instead of sending.
#[derive(Debug)]
pub struct RecordingMailComposer {
    available: bool,
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailComposer {
    /// Creates a composer reporting the given availability.
    pub fn new(available: bool) -> Self {
        Self {
            available,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Returns the messages handed off so far.
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl MailComposer for RecordingMailComposer {
    fn can_compose(&self) -> bool {
        self.available
    }

    fn compose(&self, recipient: &str, subject: &str, body: &str) -> Result<(), ComposeError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| ComposeError::Handoff("recording lock poisoned".to_string()))?;

        sent.push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });

        Ok(())
    }
}
