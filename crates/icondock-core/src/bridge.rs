// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runtime handle <-> IFC GUID translation
//!
//! Both directions are scoped to one model and best-effort: the plain methods
//! degrade to an empty vector on any host failure. The `try_` variants keep
//! the error so callers can tell "host unresponsive" from "nothing found".

use crate::Host;
use icondock_model::{ExternalId, HostResult, ModelId, RuntimeHandle};
use log::warn;

/// Identifier translation against one host
pub struct IdentifierBridge<'h, 'a> {
    host: &'h Host<'a>,
}

impl<'h, 'a> IdentifierBridge<'h, 'a> {
    pub fn new(host: &'h Host<'a>) -> Self {
        Self { host }
    }

    /// Handles to external ids, keeping the host's order
    pub async fn try_to_external(
        &self,
        model: &ModelId,
        handles: &[RuntimeHandle],
    ) -> HostResult<Vec<ExternalId>> {
        if handles.is_empty() {
            return Ok(Vec::new());
        }
        self.host.handles_to_external_ids(model, handles).await
    }

    /// Handles to external ids; empty on any failure
    pub async fn to_external(&self, model: &ModelId, handles: &[RuntimeHandle]) -> Vec<ExternalId> {
        self.try_to_external(model, handles)
            .await
            .unwrap_or_else(|err| {
                warn!("handle to GUID conversion failed for model {model}: {err}");
                Vec::new()
            })
    }

    /// External ids to handles, dropping ids the model does not know
    pub async fn try_to_handles(
        &self,
        model: &ModelId,
        external_ids: &[ExternalId],
    ) -> HostResult<Vec<RuntimeHandle>> {
        if external_ids.is_empty() {
            return Ok(Vec::new());
        }
        let handles = self
            .host
            .external_ids_to_handles(model, external_ids)
            .await?;
        Ok(handles.into_iter().flatten().collect())
    }

    /// External ids to handles; empty on any failure
    pub async fn to_handles(&self, model: &ModelId, external_ids: &[ExternalId]) -> Vec<RuntimeHandle> {
        self.try_to_handles(model, external_ids)
            .await
            .unwrap_or_else(|err| {
                warn!("GUID to handle conversion failed for model {model}: {err}");
                Vec::new()
            })
    }
}
