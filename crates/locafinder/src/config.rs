//! Workspace configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! [webhooks]
//! predict = "http://localhost:5678/webhook/predict"
//!
//! [directions]
//! profile = "walking"
//!
//! [map]
//! center = [105.8208, 21.0239]
//! retention = "keep"
//! sync = "reconcile"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use locafinder_core::logging::targets;
use locafinder_net::{
    DirectionsClient, DirectionsEndpoint, HttpClient, LngLat, WebhookClient, WebhookEndpoints,
};

use crate::error::{Error, Result};
use crate::map::{CameraPolicy, FlyProfile, SelectionRetention, SyncStrategy};

/// Environment variable overriding the directions access token.
pub const MAPBOX_TOKEN_ENV: &str = "LOCAFINDER_MAPBOX_TOKEN";

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocafinderConfig {
    pub webhooks: WebhookEndpoints,
    pub directions: DirectionsEndpoint,
    pub http: HttpConfig,
    pub map: MapConfig,
}

/// HTTP client settings shared by every remote collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

/// Camera defaults and map behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial camera center.
    pub center: LngLat,
    /// Zoom of the initial jump.
    pub initial_zoom: f64,
    /// Fly-in performed right after mounting.
    pub load_fly: FlyProfile,
    /// Reaction to a new filtered set.
    pub camera: CameraPolicy,
    /// Fly-to when a marker is activated.
    pub marker_select: FlyProfile,
    /// Fly-to for zoom-to-location.
    pub zoom_to_location: FlyProfile,
    /// Fly-to on every position update.
    pub user_location: FlyProfile,
    /// Padding when fitting the camera to a route.
    pub route_padding: f64,
    pub retention: SelectionRetention,
    pub sync: SyncStrategy,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: LngLat::new(105.8208, 21.0239),
            initial_zoom: 12.5,
            load_fly: FlyProfile::new(13.5, 0.8),
            camera: CameraPolicy::default(),
            marker_select: FlyProfile::new(15.0, 1.1),
            zoom_to_location: FlyProfile::new(15.5, 0.9),
            user_location: FlyProfile::new(14.0, 0.5),
            route_padding: 50.0,
            retention: SelectionRetention::default(),
            sync: SyncStrategy::default(),
        }
    }
}

impl LocafinderConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        config.apply_env();
        tracing::info!(target: targets::CONFIG, path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(MAPBOX_TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
            tracing::debug!(target: targets::CONFIG, "directions token taken from environment");
            self.directions.access_token = Some(token);
        }
    }

    /// Build the shared HTTP client.
    pub fn http_client(&self) -> Result<HttpClient> {
        let mut builder =
            HttpClient::builder().timeout(Duration::from_secs(self.http.timeout_secs));
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        Ok(builder.build()?)
    }

    pub fn webhook_client(&self, http: HttpClient) -> WebhookClient {
        WebhookClient::new(http, self.webhooks.clone())
    }

    pub fn directions_client(&self, http: HttpClient) -> DirectionsClient {
        DirectionsClient::new(http, self.directions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = LocafinderConfig::from_toml_str("").unwrap();
        assert_eq!(config, LocafinderConfig::default());
        assert_eq!(config.map.initial_zoom, 12.5);
        assert_eq!(config.map.camera.fit_padding, 80.0);
    }

    #[test]
    fn test_partial_document() {
        let config = LocafinderConfig::from_toml_str(
            r#"
            [directions]
            profile = "walking"

            [map]
            center = [106.7, 10.77]
            retention = "keep"
            sync = "reconcile"

            [map.camera]
            fit_padding = 40.0
            "#,
        )
        .unwrap();

        assert_eq!(config.directions.profile, "walking");
        assert_eq!(config.map.center, LngLat::new(106.7, 10.77));
        assert_eq!(config.map.retention, SelectionRetention::Keep);
        assert_eq!(config.map.sync, SyncStrategy::Reconcile);
        assert_eq!(config.map.camera.fit_padding, 40.0);
        assert_eq!(config.map.camera.single, FlyProfile::new(15.0, 1.2));
        assert_eq!(config.map.route_padding, 50.0);
    }

    #[test]
    fn test_invalid_document() {
        let err = LocafinderConfig::from_toml_str("[map]\nretention = \"forever\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_token_override() {
        let mut config = LocafinderConfig::default();
        config.apply_overrides(|key| (key == MAPBOX_TOKEN_ENV).then(|| "pk.test".to_string()));
        assert_eq!(config.directions.access_token.as_deref(), Some("pk.test"));

        let mut config = LocafinderConfig::default();
        config.apply_overrides(|_| Some("  ".to_string()));
        assert_eq!(config.directions.access_token, None);
    }

    #[test]
    fn test_toml_round_trip_keeps_map_settings() {
        let mut config = LocafinderConfig::default();
        config.map.sync = SyncStrategy::Reconcile;
        let text = config.to_toml_string().unwrap();
        assert_eq!(LocafinderConfig::from_toml_str(&text).unwrap(), config);
    }
}
