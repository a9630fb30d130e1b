// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Active model resolution
//!
//! The host rarely says which model the user is working in. This is a
//! best-effort guess: loaded models first, then any model; among the
//! candidates a visible one wins, otherwise list order decides.

use crate::Host;
use icondock_model::{HostError, HostResult, ModelFilter, ModelId, ModelInfo};
use log::{debug, warn};

/// Guess the model the workflows should operate on
///
/// Never fails; host errors are logged and read as "no model".
pub async fn resolve_active_model(host: &Host<'_>) -> Option<ModelId> {
    try_resolve_active_model(host).await.unwrap_or_else(|err| {
        warn!("model list unavailable: {err}");
        None
    })
}

/// Like [`resolve_active_model`], but a host that stops answering is an error
///
/// Refused or unsupported queries still read as "no model".
pub async fn try_resolve_active_model(host: &Host<'_>) -> HostResult<Option<ModelId>> {
    let loaded = match host.list_models(Some(ModelFilter::Loaded)).await {
        Ok(models) => models,
        Err(err @ HostError::Timeout(_)) => return Err(err),
        Err(err) => {
            debug!("loaded model query failed, falling back to all models: {err}");
            Vec::new()
        }
    };

    let candidates = if loaded.is_empty() {
        match host.list_models(None).await {
            Ok(models) => models,
            Err(err @ HostError::Timeout(_)) => return Err(err),
            Err(err) => {
                warn!("model list unavailable: {err}");
                return Ok(None);
            }
        }
    } else {
        loaded
    };

    let picked = pick_model(&candidates);
    debug!("active model resolved to {picked:?} from {} candidates", candidates.len());
    Ok(picked)
}

/// Prefer the first visible model, else the first in list order
pub fn pick_model(candidates: &[ModelInfo]) -> Option<ModelId> {
    candidates
        .iter()
        .find(|m| m.visible && !m.id.is_empty())
        .or_else(|| candidates.first())
        .map(|m| m.id.clone())
        .filter(|id| !id.is_empty())
}
