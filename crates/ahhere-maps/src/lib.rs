#![warn(missing_docs)]
//! # ahhere-maps
//!
//! ## Purpose
//! Resolves a static-map image URL for a report's coordinates, with a
//! one-way fallback from the keyed primary provider to a keyless provider.
//!
//! ## Responsibilities
//! - Carry explicit map configuration (provider key, zoom, size, scale,
//!   style) instead of a hidden global key lookup.
//! - Build primary and fallback URLs as pure templating functions.
//! - Track the monotonic fallback bit for one preview surface instance.
//!
//! ## Data flow
//! Screen renders -> [`MapResolver::resolve`] picks the provider URL ->
//! the image surface reports a load error -> [`MapResolver::on_load_error`]
//! flips to the fallback once -> subsequent renders stay on the fallback.
//!
//! ## Error model
//! A primary URL request without a configured key is a
//! [`MapError::MissingApiKey`]; resolver callers never hit it because the
//! resolver routes keyless configurations to the fallback.
//!
//! ## Example
//! ```rust
//! use ahhere_core::GeoFix;
//! use ahhere_maps::{MapConfig, MapResolver};
//!
//! let fix = GeoFix::new(53.3498, -6.2603).unwrap();
//! let mut resolver = MapResolver::new(MapConfig::new(None));
//! let url = resolver.resolve(&fix).unwrap();
//! assert!(url.as_str().contains("53.349800"));
//! ```

use ahhere_core::GeoFix;
use thiserror::Error;
use url::Url;

/// Primary static-map endpoint.
pub const PRIMARY_STATIC_MAPS_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Keyless fallback image endpoint.
pub const FALLBACK_IMAGE_ENDPOINT: &str = "https://via.placeholder.com";

/// Placeholder value shipped in config templates; treated as no key.
const UNCONFIGURED_KEY_SENTINEL: &str = "YOUR_API_KEY_HERE";

/// Rendered map style for the primary provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapStyle {
    /// Satellite imagery.
    Satellite,
    /// Standard road map.
    Roadmap,
}

impl MapStyle {
    fn as_param(self) -> &'static str {
        match self {
            MapStyle::Satellite => "satellite",
            MapStyle::Roadmap => "roadmap",
        }
    }
}

/// Explicit map configuration passed to the resolver at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapConfig {
    /// Primary provider API key; `None` or a placeholder value routes all
    /// rendering to the fallback provider.
    pub api_key: Option<String>,
    /// Zoom level (street level by default).
    pub zoom: u8,
    /// Image size in pixels as (width, height).
    pub size: (u32, u32),
    /// Device scale factor for high-DPI rendering.
    pub scale: u8,
    /// Primary provider map style.
    pub style: MapStyle,
}

impl MapConfig {
    /// Creates configuration with product defaults: zoom 18, 400x300,
    /// scale 2, satellite style.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            zoom: 18,
            size: (400, 300),
            scale: 2,
            style: MapStyle::Satellite,
        }
    }

    /// Returns `true` when a usable primary provider key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty() && key != UNCONFIGURED_KEY_SENTINEL)
    }
}

/// Fallback-resolution state for one preview surface instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapResolutionState {
    /// Whether the primary provider URL has been handed out.
    pub primary_attempted: bool,
    /// Monotonic: once true, the primary provider is never retried for
    /// this instance.
    pub using_fallback: bool,
}

/// Builds the primary provider URL for the given coordinates.
///
/// Pure templating over the configured endpoint; no side effects.
///
/// # Errors
/// Returns [`MapError::MissingApiKey`] when no usable key is configured.
pub fn primary_map_url(config: &MapConfig, fix: &GeoFix) -> Result<Url, MapError> {
    if !config.has_api_key() {
        return Err(MapError::MissingApiKey);
    }
    let key = config.api_key.as_deref().unwrap_or_default();

    let mut url = Url::parse(PRIMARY_STATIC_MAPS_ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair(
            "center",
            &format!("{},{}", fix.latitude_6dp(), fix.longitude_6dp()),
        )
        .append_pair("zoom", &config.zoom.to_string())
        .append_pair("size", &format!("{}x{}", config.size.0, config.size.1))
        .append_pair("maptype", config.style.as_param())
        .append_pair("scale", &config.scale.to_string())
        .append_pair("key", key);

    Ok(url)
}

/// Builds the keyless fallback URL for the given coordinates.
///
/// The rendered image carries the coordinates as 6-decimal text, so the
/// user still sees the fix when the primary provider is unavailable.
///
/// # Errors
/// Returns [`MapError::Endpoint`] when the fallback endpoint template is
/// malformed.
pub fn fallback_map_url(config: &MapConfig, fix: &GeoFix) -> Result<Url, MapError> {
    let mut url = Url::parse(&format!(
        "{}/{}x{}/4CAF50/FFFFFF",
        FALLBACK_IMAGE_ENDPOINT, config.size.0, config.size.1
    ))?;

    let text = format!(
        "Map view\nLatitude: {}\nLongitude: {}\nStreet level zoom {}",
        fix.latitude_6dp(),
        fix.longitude_6dp(),
        config.zoom
    );
    url.query_pairs_mut().append_pair("text", &text);

    Ok(url)
}

/// Per-instance resolver choosing between primary and fallback providers.
#[derive(Debug, Clone)]
pub struct MapResolver {
    config: MapConfig,
    state: MapResolutionState,
}

impl MapResolver {
    /// Creates a resolver for one preview surface instance.
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            state: MapResolutionState {
                primary_attempted: false,
                using_fallback: false,
            },
        }
    }

    /// Returns the current resolution state snapshot.
    pub fn state(&self) -> MapResolutionState {
        self.state
    }

    /// Resolves the display URL for the given coordinates.
    ///
    /// Recomputed on every render; idempotent for a fixed
    /// (coordinates, key presence, fallback bit) tuple.
    ///
    /// # Errors
    /// Returns [`MapError::Endpoint`] when a provider template is
    /// malformed.
    pub fn resolve(&mut self, fix: &GeoFix) -> Result<Url, MapError> {
        if !self.config.has_api_key() || self.state.using_fallback {
            return fallback_map_url(&self.config, fix);
        }

        self.state.primary_attempted = true;
        primary_map_url(&self.config, fix)
    }

    /// Handles an image-load error from the preview surface.
    ///
    /// Returns `true` when this error switched the instance to the
    /// fallback provider. The switch is one-way: later errors while on the
    /// fallback never re-attempt the primary provider.
    pub fn on_load_error(&mut self) -> bool {
        if self.config.has_api_key() && !self.state.using_fallback {
            self.state.using_fallback = true;
            return true;
        }

        false
    }

    /// Text alert shown when the user taps the rendered map.
    ///
    /// Intentionally surfaces the raw coordinates instead of deep-linking
    /// into a map application.
    pub fn tap_text(&self, fix: &GeoFix) -> String {
        format!("Coordinates: {}", fix.format_6dp())
    }
}

/// Map resolution error type.
#[derive(Debug, Error)]
pub enum MapError {
    /// Primary provider URL requested without a configured key.
    #[error("primary map provider requires an API key")]
    MissingApiKey,
    /// Provider endpoint template failed to parse.
    #[error("map endpoint template is invalid: {0}")]
    Endpoint(#[from] url::ParseError),
}
