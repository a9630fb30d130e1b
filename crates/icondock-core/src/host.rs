// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host viewer access with bounded waits
//!
//! The host answers asynchronously and may never answer at all. Every call
//! made through [`Host`] races the host against a [`Timer`] and turns an
//! expired wait into [`HostError::Timeout`].

use futures::future::{self, Either};
use icondock_model::{
    ExternalId, HostError, HostResult, HostViewer, ModelFilter, ModelId, ModelInfo, ModelObjects,
    PropertyBag, RuntimeHandle, Selection, Snapshot, SnapshotOptions, Timer,
};
use std::future::Future;
use std::pin::pin;
use std::time::Duration;

/// Run `call`, giving up after `limit`
pub async fn with_timeout<T>(
    timer: &dyn Timer,
    limit: Duration,
    call: impl Future<Output = HostResult<T>>,
) -> HostResult<T> {
    let call = pin!(call);
    match future::select(call, timer.sleep(limit)).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(HostError::Timeout(limit)),
    }
}

/// Host viewer paired with a timeout policy
pub struct Host<'a> {
    viewer: &'a dyn HostViewer,
    timer: &'a dyn Timer,
    timeout: Duration,
}

impl<'a> Host<'a> {
    pub fn new(viewer: &'a dyn HostViewer, timer: &'a dyn Timer, timeout: Duration) -> Self {
        Self {
            viewer,
            timer,
            timeout,
        }
    }

    pub fn timer(&self) -> &'a dyn Timer {
        self.timer
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn list_models(&self, filter: Option<ModelFilter>) -> HostResult<Vec<ModelInfo>> {
        with_timeout(self.timer, self.timeout, self.viewer.list_models(filter)).await
    }

    pub async fn get_selection(&self) -> HostResult<Selection> {
        with_timeout(self.timer, self.timeout, self.viewer.get_selection()).await
    }

    pub async fn handles_to_external_ids(
        &self,
        model: &ModelId,
        handles: &[RuntimeHandle],
    ) -> HostResult<Vec<ExternalId>> {
        with_timeout(
            self.timer,
            self.timeout,
            self.viewer.handles_to_external_ids(model, handles),
        )
        .await
    }

    pub async fn external_ids_to_handles(
        &self,
        model: &ModelId,
        external_ids: &[ExternalId],
    ) -> HostResult<Vec<Option<RuntimeHandle>>> {
        with_timeout(
            self.timer,
            self.timeout,
            self.viewer.external_ids_to_handles(model, external_ids),
        )
        .await
    }

    pub async fn get_properties(
        &self,
        model: &ModelId,
        handles: &[RuntimeHandle],
    ) -> HostResult<Vec<PropertyBag>> {
        with_timeout(
            self.timer,
            self.timeout,
            self.viewer.get_properties(model, handles),
        )
        .await
    }

    pub async fn capture_snapshot(&self, options: SnapshotOptions) -> HostResult<Snapshot> {
        with_timeout(self.timer, self.timeout, self.viewer.capture_snapshot(options)).await
    }

    pub async fn set_selection(&self, selection: &[ModelObjects]) -> HostResult<()> {
        with_timeout(self.timer, self.timeout, self.viewer.set_selection(selection)).await
    }
}
