// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types shared between the overlay and the host viewer
//!
//! Identifiers come in two flavours: [`RuntimeHandle`]s are only valid for the
//! current viewer session, while [`ExternalId`]s (IFC GUIDs) are stable and are
//! the only identifiers safe to put into a shareable link.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable identifier of one loaded model
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ModelId(pub String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        ModelId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelId {
    fn from(id: &str) -> Self {
        ModelId(id.to_string())
    }
}

impl From<String> for ModelId {
    fn from(id: String) -> Self {
        ModelId(id)
    }
}

/// Session-local object handle inside one model
///
/// Not persisted and not comparable across sessions or models.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct RuntimeHandle(pub u32);

impl fmt::Display for RuntimeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<u32> for RuntimeHandle {
    fn from(id: u32) -> Self {
        RuntimeHandle(id)
    }
}

/// Persistent external identifier (IFC GUID)
///
/// Only meaningful together with the [`ModelId`] it was resolved against.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ExternalId(pub String);

impl ExternalId {
    pub fn new(id: impl Into<String>) -> Self {
        ExternalId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExternalId {
    fn from(id: &str) -> Self {
        ExternalId(id.to_string())
    }
}

impl From<String> for ExternalId {
    fn from(id: String) -> Self {
        ExternalId(id)
    }
}

/// One model as reported by the host at a point in time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: ModelId,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub loaded: bool,
}

impl ModelInfo {
    pub fn new(id: impl Into<ModelId>) -> Self {
        Self {
            id: id.into(),
            visible: false,
            loaded: false,
        }
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn loaded(mut self, loaded: bool) -> Self {
        self.loaded = loaded;
        self
    }
}

/// State filter for model listing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFilter {
    Loaded,
    Unloaded,
}

impl ModelFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFilter::Loaded => "loaded",
            ModelFilter::Unloaded => "unloaded",
        }
    }
}

/// Handles highlighted in one model
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelObjects {
    pub model_id: ModelId,
    #[serde(default, rename = "objectRuntimeIds")]
    pub handles: Vec<RuntimeHandle>,
}

impl ModelObjects {
    pub fn new(model_id: impl Into<ModelId>, handles: Vec<RuntimeHandle>) -> Self {
        Self {
            model_id: model_id.into(),
            handles,
        }
    }

    /// First handle of this entry, if any
    pub fn first_handle(&self) -> Option<RuntimeHandle> {
        self.handles.first().copied()
    }
}

/// Current selection: model id to highlighted handles
pub type Selection = Vec<ModelObjects>;

/// Requested snapshot geometry
///
/// Hosts that can only take a screenshot of the viewport use these values;
/// hosts with a native snapshot call may ignore them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotOptions {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "includeUI")]
    pub include_ui: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
            include_ui: false,
        }
    }
}

/// Captured viewer image, usually a `data:image/png;base64,...` URL
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(pub String);

impl Snapshot {
    pub fn new(data_url: impl Into<String>) -> Self {
        Snapshot(data_url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
