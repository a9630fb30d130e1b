// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host capability traits
//!
//! The host viewer is an external, asynchronous collaborator. Every capability
//! may be missing, so each method has a default body that reports
//! [`HostError::Unsupported`]; an adapter only overrides what the host offers.
//!
//! All futures are `?Send`: the overlay runs on the single browser thread.

use crate::{
    Capability, ExternalId, HostError, HostResult, ModelFilter, ModelId, ModelInfo,
    ModelObjects, PropertyBag, RuntimeHandle, Selection, Snapshot, SnapshotOptions,
};
use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use std::time::Duration;

/// Capability surface of the hosted Workspace viewer
///
/// # Example
///
/// ```ignore
/// use icondock_model::{HostViewer, ModelFilter};
///
/// async fn loaded_models(viewer: &dyn HostViewer) -> usize {
///     viewer
///         .list_models(Some(ModelFilter::Loaded))
///         .await
///         .map(|models| models.len())
///         .unwrap_or(0)
/// }
/// ```
#[async_trait(?Send)]
pub trait HostViewer {
    /// List models, optionally filtered by state
    async fn list_models(&self, _filter: Option<ModelFilter>) -> HostResult<Vec<ModelInfo>> {
        Err(HostError::Unsupported(Capability::ListModels))
    }

    /// Current selection, one entry per model
    async fn get_selection(&self) -> HostResult<Selection> {
        Err(HostError::Unsupported(Capability::GetSelection))
    }

    /// Convert runtime handles to external identifiers (IFC GUIDs)
    ///
    /// Output order follows the host; the overlay does not re-sort.
    async fn handles_to_external_ids(
        &self,
        _model: &ModelId,
        _handles: &[RuntimeHandle],
    ) -> HostResult<Vec<ExternalId>> {
        Err(HostError::Unsupported(Capability::HandlesToExternalIds))
    }

    /// Convert external identifiers back to runtime handles
    ///
    /// Identifiers unknown to the model come back as `None`.
    async fn external_ids_to_handles(
        &self,
        _model: &ModelId,
        _external_ids: &[ExternalId],
    ) -> HostResult<Vec<Option<RuntimeHandle>>> {
        Err(HostError::Unsupported(Capability::ExternalIdsToHandles))
    }

    /// Property bags for the given handles, one per handle
    async fn get_properties(
        &self,
        _model: &ModelId,
        _handles: &[RuntimeHandle],
    ) -> HostResult<Vec<PropertyBag>> {
        Err(HostError::Unsupported(Capability::GetProperties))
    }

    /// Capture an image of the current view
    async fn capture_snapshot(&self, _options: SnapshotOptions) -> HostResult<Snapshot> {
        Err(HostError::Unsupported(Capability::CaptureSnapshot))
    }

    /// Replace the viewer selection
    async fn set_selection(&self, _selection: &[ModelObjects]) -> HostResult<()> {
        Err(HostError::Unsupported(Capability::SetSelection))
    }
}

/// Best-effort text clipboard
#[async_trait(?Send)]
pub trait Clipboard {
    async fn write_text(&self, _text: &str) -> HostResult<()> {
        Err(HostError::Unsupported(Capability::Clipboard))
    }
}

/// Free-text input from the user
#[async_trait(?Send)]
pub trait Prompt {
    /// Ask the user for text; `None` when the prompt was cancelled
    async fn prompt(&self, message: &str, default: &str) -> Option<String>;
}

/// Source of sleeps for host call timeouts
///
/// Browser builds sleep with `setTimeout`; tests supply ready or pending futures.
pub trait Timer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}
