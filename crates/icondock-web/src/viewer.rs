//! Workspace viewer adapter
//!
//! Wraps the viewer object the Workspace host injects into the page and maps
//! its method names onto [`HostViewer`].

use crate::js;
use async_trait::async_trait;
use icondock_model::{
    Capability, ExternalId, HostError, HostResult, HostViewer, ModelFilter, ModelId, ModelInfo,
    ModelObjects, PropertyBag, RuntimeHandle, Selection, Snapshot, SnapshotOptions,
};
use log::debug;
use wasm_bindgen::JsValue;

pub struct WorkspaceViewer {
    api: JsValue,
}

impl WorkspaceViewer {
    pub fn new(api: JsValue) -> Self {
        Self { api }
    }

    /// `window.TCWorkspace.viewer`, else `window.TCViewer`
    pub fn discover() -> Option<Self> {
        let global = js_sys::global();
        js::object(&global, "TCWorkspace")
            .and_then(|workspace| js::object(&workspace, "viewer"))
            .or_else(|| js::object(&global, "TCViewer"))
            .map(Self::new)
    }

    async fn call(&self, capability: Capability, name: &str, args: &[JsValue]) -> HostResult<JsValue> {
        debug!("viewer.{name}()");
        js::call(&self.api, capability, name, args).await
    }
}

#[async_trait(?Send)]
impl HostViewer for WorkspaceViewer {
    async fn list_models(&self, filter: Option<ModelFilter>) -> HostResult<Vec<ModelInfo>> {
        let args: Vec<JsValue> = filter
            .map(|filter| JsValue::from_str(filter.as_str()))
            .into_iter()
            .collect();
        let value = self.call(Capability::ListModels, "getModels", &args).await?;
        js::decode(&value, Capability::ListModels)
    }

    async fn get_selection(&self) -> HostResult<Selection> {
        let value = self.call(Capability::GetSelection, "getSelection", &[]).await?;
        js::decode(&value, Capability::GetSelection)
    }

    async fn handles_to_external_ids(
        &self,
        model: &ModelId,
        handles: &[RuntimeHandle],
    ) -> HostResult<Vec<ExternalId>> {
        let capability = Capability::HandlesToExternalIds;
        let args = [JsValue::from_str(model.as_str()), js::encode(handles, capability)?];
        let value = self.call(capability, "convertToObjectIds", &args).await?;
        js::decode(&value, capability)
    }

    async fn external_ids_to_handles(
        &self,
        model: &ModelId,
        external_ids: &[ExternalId],
    ) -> HostResult<Vec<Option<RuntimeHandle>>> {
        let capability = Capability::ExternalIdsToHandles;
        let args = [JsValue::from_str(model.as_str()), js::encode(external_ids, capability)?];
        let value = self.call(capability, "convertToObjectRuntimeIds", &args).await?;
        js::decode(&value, capability)
    }

    async fn get_properties(
        &self,
        model: &ModelId,
        handles: &[RuntimeHandle],
    ) -> HostResult<Vec<PropertyBag>> {
        let capability = Capability::GetProperties;
        let args = [JsValue::from_str(model.as_str()), js::encode(handles, capability)?];
        let value = self.call(capability, "getObjectProperties", &args).await?;
        js::decode(&value, capability)
    }

    /// Native snapshot when the host has one, else a sized screenshot
    async fn capture_snapshot(&self, options: SnapshotOptions) -> HostResult<Snapshot> {
        let capability = Capability::CaptureSnapshot;
        let value = if js::method(&self.api, "getSnapshot").is_some() {
            self.call(capability, "getSnapshot", &[]).await?
        } else {
            let args = [js::encode(&options, capability)?];
            self.call(capability, "getScreenshot", &args).await?
        };
        value
            .as_string()
            .map(Snapshot::new)
            .ok_or_else(|| HostError::malformed(capability, "image is not a data URL string"))
    }

    async fn set_selection(&self, selection: &[ModelObjects]) -> HostResult<()> {
        let capability = Capability::SetSelection;
        let args = [js::encode(selection, capability)?, JsValue::from_str("set")];
        self.call(capability, "setSelection", &args).await?;
        Ok(())
    }
}
