#![warn(missing_docs)]
//! # ahhere-core
//!
//! ## Purpose
//! Defines the pure data model used across the `ahhere` workspace.
//!
//! ## Responsibilities
//! - Represent geolocation fixes, captured-image handles, and reports.
//! - Model per-capability permission state with forward-only transitions.
//! - Render coordinates to the canonical 6-decimal form and timestamps to
//!   display text.
//!
//! ## Data flow
//! The capture workflow produces an [`ImageHandle`] and an optional
//! [`GeoFix`], then assembles them into a [`Report`]. Map resolution and
//! mail composition both consume the report's coordinates through the
//! 6-decimal formatting helpers.
//!
//! ## Ownership and lifetimes
//! Reports own their image handle and fix values; nothing in this crate
//! borrows from the platform layer, so a report outlives the screen events
//! that produced it until it is replaced wholesale on retake.
//!
//! ## Error model
//! Validation failures (out-of-range coordinates, blank image handles,
//! unrepresentable timestamps) return [`CoreError`] variants.
//!
//! ## Example
//! ```rust
//! use ahhere_core::{GeoFix, ImageHandle, Report};
//!
//! let fix = GeoFix::new(53.3498, -6.2603).unwrap();
//! let image = ImageHandle::new("file:///tmp/violation.jpg").unwrap();
//! let report = Report::new(image, Some(fix), 1_700_000_000_000);
//! assert_eq!(report.location.unwrap().format_6dp(), "53.349800, -6.260300");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

/// One geolocation reading (not a stream).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    /// Latitude in decimal degrees, within [-90, 90].
    pub latitude: f64,
    /// Longitude in decimal degrees, within [-180, 180].
    pub longitude: f64,
}

impl GeoFix {
    /// Constructs a validated fix.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidCoordinate`] when either component is
    /// outside its valid range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite()
            || !longitude.is_finite()
            || !(-90.0..=90.0).contains(&latitude)
            || !(-180.0..=180.0).contains(&longitude)
        {
            return Err(CoreError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Renders latitude to the canonical 6-decimal form.
    pub fn latitude_6dp(&self) -> String {
        format!("{:.6}", self.latitude)
    }

    /// Renders longitude to the canonical 6-decimal form.
    pub fn longitude_6dp(&self) -> String {
        format!("{:.6}", self.longitude)
    }

    /// Renders the pair as `"{lat}, {lon}"` with 6 decimal places.
    pub fn format_6dp(&self) -> String {
        format!("{}, {}", self.latitude_6dp(), self.longitude_6dp())
    }
}

/// Opaque reference to captured image data owned by the camera subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHandle(String);

impl ImageHandle {
    /// Wraps a non-blank image reference.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyImageHandle`] for blank input.
    pub fn new(uri: impl Into<String>) -> Result<Self, CoreError> {
        let uri = uri.into();
        if uri.trim().is_empty() {
            return Err(CoreError::EmptyImageHandle);
        }
        Ok(Self(uri))
    }

    /// Returns the underlying reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// In-memory record pairing a captured image, an optional fix, and a
/// timestamp, destined for a single outbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Read-only reference to the captured image.
    pub image: ImageHandle,
    /// Fix attached at report time; `None` when permission was denied or
    /// the fresh fetch failed. A stale fix is never substituted here.
    pub location: Option<GeoFix>,
    /// Epoch milliseconds at the moment the location was attached (not at
    /// camera shutter time).
    pub captured_at_ms: u64,
}

impl Report {
    /// Assembles a report from a successful capture.
    pub fn new(image: ImageHandle, location: Option<GeoFix>, captured_at_ms: u64) -> Self {
        Self {
            image,
            location,
            captured_at_ms,
        }
    }

    /// Returns `true` when the report carries a usable fix.
    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }
}

/// Device capability gated behind an OS permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// Geolocation access.
    Location,
    /// Camera access.
    Camera,
}

impl Capability {
    /// Human-readable capability name for status text.
    pub fn label(&self) -> &'static str {
        match self {
            Capability::Location => "location",
            Capability::Camera => "camera",
        }
    }
}

/// Tri-state permission status for one capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionState {
    /// Permission has not been requested this session.
    Unknown,
    /// Permission was granted.
    Granted,
    /// Permission was denied; re-request happens only via OS settings.
    Denied,
}

impl PermissionState {
    /// Applies a forward-only transition.
    ///
    /// A move back to [`PermissionState::Unknown`] is not modeled and
    /// leaves the current state untouched.
    pub fn advance_to(self, next: PermissionState) -> PermissionState {
        match next {
            PermissionState::Unknown => self,
            PermissionState::Granted | PermissionState::Denied => next,
        }
    }

    /// Returns `true` for the granted state.
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

/// Renders epoch milliseconds as `YYYY-MM-DD HH:MM:SS UTC` display text.
///
/// # Errors
/// Returns [`CoreError::InvalidTimestamp`] when the value is outside the
/// representable datetime range.
pub fn format_timestamp_utc(epoch_ms: u64) -> Result<String, CoreError> {
    let datetime = OffsetDateTime::from_unix_timestamp((epoch_ms / 1_000) as i64)
        .map_err(|_| CoreError::InvalidTimestamp(epoch_ms))?;

    Ok(format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
        datetime.year(),
        datetime.month() as u8,
        datetime.day(),
        datetime.hour(),
        datetime.minute(),
        datetime.second()
    ))
}

/// Error type for core domain validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Coordinate components were out of range or not finite.
    #[error("invalid coordinate: latitude={latitude}, longitude={longitude}")]
    InvalidCoordinate {
        /// Offending latitude value.
        latitude: f64,
        /// Offending longitude value.
        longitude: f64,
    },
    /// Image handle cannot be blank.
    #[error("image handle is empty")]
    EmptyImageHandle,
    /// Timestamp is outside the representable range.
    #[error("timestamp {0} ms is not representable")]
    InvalidTimestamp(u64),
}
