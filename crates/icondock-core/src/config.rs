// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Overlay configuration
//!
//! Built from defaults, an optional JSON document supplied by the embedding
//! page, and the page URL (`projectId`, `debug`).

use crate::link::PROJECT_ID_PARAM;
use crate::ConfigError;
use icondock_model::{SnapshotOptions, ASSEMBLY_KEYS, IFC_GUID_KEYS};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Default wait for a single host call
pub const DEFAULT_HOST_TIMEOUT_MS: u64 = 5_000;

/// Overlay configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DockConfig {
    /// Endpoint that receives annotated snapshots; unset keeps them local
    pub webhook_url: Option<String>,
    /// Sent along with every submission when set
    pub shared_secret: Option<String>,
    /// Project id used when the page URL has none
    pub default_project_id: Option<String>,
    /// Wait for a single host call, in milliseconds
    pub host_timeout_ms: u64,
    pub snapshot: SnapshotOptions,
    /// Assembly mark candidates, in priority order
    pub assembly_keys: Vec<String>,
    /// Attribute names holding an IFC GUID, in priority order
    pub guid_keys: Vec<String>,
    /// Verbose console logging
    pub debug: bool,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            shared_secret: None,
            default_project_id: None,
            host_timeout_ms: DEFAULT_HOST_TIMEOUT_MS,
            snapshot: SnapshotOptions::default(),
            assembly_keys: ASSEMBLY_KEYS.iter().map(|k| k.to_string()).collect(),
            guid_keys: IFC_GUID_KEYS.iter().map(|k| k.to_string()).collect(),
            debug: false,
        }
    }
}

impl DockConfig {
    /// Load configuration from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DockConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Apply page URL overrides (`?debug=1`)
    pub fn with_page_url(mut self, page: &Url) -> Self {
        if page
            .query_pairs()
            .any(|(key, value)| key == "debug" && (value == "1" || value == "true"))
        {
            self.debug = true;
        }
        self
    }

    /// Project id from the page URL, else the configured default
    pub fn project_id_for(&self, page: &Url) -> Option<String> {
        page.query_pairs()
            .find(|(key, _)| key == PROJECT_ID_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
            .or_else(|| self.default_project_id.clone())
    }

    pub fn host_timeout(&self) -> Duration {
        Duration::from_millis(self.host_timeout_ms)
    }

    /// Webhook endpoint, if one is configured
    pub fn webhook(&self) -> Option<&str> {
        self.webhook_url.as_deref()
    }

    // Blank strings in hand-edited config mean "not set"
    fn normalized(mut self) -> Self {
        for field in [
            &mut self.webhook_url,
            &mut self.shared_secret,
            &mut self.default_project_id,
        ] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
        if self.host_timeout_ms == 0 {
            self.host_timeout_ms = DEFAULT_HOST_TIMEOUT_MS;
        }
        self
    }
}
