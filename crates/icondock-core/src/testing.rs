// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory collaborators for tests

use crate::{
    ChromeControl, ChromeState, Collaborators, Dock, DockConfig, DockContext, Status, StatusSink,
    Submission, SubmissionSink,
};
use async_trait::async_trait;
use futures::future::{self, FutureExt, LocalBoxFuture};
use icondock_model::{
    Capability, Clipboard, ExternalId, HostError, HostResult, HostViewer, ModelFilter, ModelId,
    ModelInfo, ModelObjects, PropertyBag, Prompt, RuntimeHandle, Selection, Snapshot,
    SnapshotOptions, Timer,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

/// Timer whose sleeps never finish
pub struct NeverTimer;

impl Timer for NeverTimer {
    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        future::pending().boxed_local()
    }
}

/// Timer whose sleeps finish immediately
pub struct InstantTimer;

impl Timer for InstantTimer {
    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        future::ready(()).boxed_local()
    }
}

/// Returns `Pending` once, so concurrent tasks get a chance to interleave
struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

fn capability_of(call: &str) -> Capability {
    let name = call.split('(').next().unwrap_or(call);
    match name {
        "listModels" => Capability::ListModels,
        "getSelection" => Capability::GetSelection,
        "handlesToExternalIds" => Capability::HandlesToExternalIds,
        "externalIdsToHandles" => Capability::ExternalIdsToHandles,
        "getProperties" => Capability::GetProperties,
        "captureSnapshot" => Capability::CaptureSnapshot,
        _ => Capability::SetSelection,
    }
}

/// Scriptable host viewer that records every call
#[derive(Default)]
pub struct FakeViewer {
    models: Option<Vec<ModelInfo>>,
    reject_loaded_filter: bool,
    selection: Option<Selection>,
    guids: HashMap<(ModelId, RuntimeHandle), ExternalId>,
    properties: Option<HashMap<RuntimeHandle, PropertyBag>>,
    snapshot: Option<HostResult<Snapshot>>,
    can_set_selection: bool,
    hang: bool,
    hang_on: Option<String>,
    refuse_on: Option<String>,
    yield_once: bool,
    calls: RefCell<Vec<String>>,
    applied: RefCell<Vec<Vec<ModelObjects>>>,
}

impl FakeViewer {
    /// Viewer with no capabilities except identifier conversion and set_selection
    pub fn new() -> Self {
        Self {
            can_set_selection: true,
            ..Self::default()
        }
    }

    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.models = Some(models);
        self
    }

    pub fn rejecting_loaded_filter(mut self) -> Self {
        self.reject_loaded_filter = true;
        self
    }

    pub fn with_selection(mut self, model: &str, handles: &[u32]) -> Self {
        let entry = ModelObjects::new(model, handles.iter().copied().map(RuntimeHandle).collect());
        self.selection.get_or_insert_with(Vec::new).push(entry);
        self
    }

    pub fn with_empty_selection(mut self) -> Self {
        self.selection = Some(Vec::new());
        self
    }

    pub fn with_guid(mut self, model: &str, handle: u32, guid: &str) -> Self {
        self.guids
            .insert((ModelId::from(model), RuntimeHandle(handle)), ExternalId::from(guid));
        self
    }

    pub fn with_properties(mut self, handle: u32, bag: serde_json::Value) -> Self {
        self.properties
            .get_or_insert_with(HashMap::new)
            .insert(RuntimeHandle(handle), PropertyBag::new(bag));
        self
    }

    pub fn with_snapshot(mut self, data_url: &str) -> Self {
        self.snapshot = Some(Ok(Snapshot::new(data_url)));
        self
    }

    pub fn failing_snapshot(mut self) -> Self {
        self.snapshot = Some(Err(HostError::rejected(
            Capability::CaptureSnapshot,
            "canvas tainted",
        )));
        self
    }

    pub fn without_set_selection(mut self) -> Self {
        self.can_set_selection = false;
        self
    }

    /// Every call stays pending forever
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Calls whose name starts with `call` stay pending forever
    pub fn hanging_on(mut self, call: &str) -> Self {
        self.hang_on = Some(call.to_string());
        self
    }

    /// Calls whose name starts with `call` are refused
    pub fn refusing(mut self, call: &str) -> Self {
        self.refuse_on = Some(call.to_string());
        self
    }

    /// Every call yields once before answering
    pub fn yielding(mut self) -> Self {
        self.yield_once = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Selections applied through `set_selection`
    pub fn applied_selections(&self) -> Vec<Vec<ModelObjects>> {
        self.applied.borrow().clone()
    }

    async fn enter(&self, call: String) -> HostResult<()> {
        let matches = |prefix: &Option<String>| {
            prefix.as_deref().is_some_and(|prefix| call.starts_with(prefix))
        };
        let hang = self.hang || matches(&self.hang_on);
        let refuse = matches(&self.refuse_on);
        let name = call.clone();
        self.calls.borrow_mut().push(call);
        if hang {
            future::pending::<()>().await;
        }
        if self.yield_once {
            YieldNow(false).await;
        }
        if refuse {
            return Err(HostError::rejected(capability_of(&name), "refused by test"));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl HostViewer for FakeViewer {
    async fn list_models(&self, filter: Option<ModelFilter>) -> HostResult<Vec<ModelInfo>> {
        let name = match filter {
            Some(filter) => format!("listModels({})", filter.as_str()),
            None => "listModels".to_string(),
        };
        self.enter(name).await?;
        let models = self
            .models
            .clone()
            .ok_or(HostError::Unsupported(Capability::ListModels))?;
        match filter {
            Some(ModelFilter::Loaded) if self.reject_loaded_filter => Err(HostError::rejected(
                Capability::ListModels,
                "unknown state filter",
            )),
            Some(ModelFilter::Loaded) => Ok(models.into_iter().filter(|m| m.loaded).collect()),
            Some(ModelFilter::Unloaded) => Ok(models.into_iter().filter(|m| !m.loaded).collect()),
            None => Ok(models),
        }
    }

    async fn get_selection(&self) -> HostResult<Selection> {
        self.enter("getSelection".to_string()).await?;
        self.selection
            .clone()
            .ok_or(HostError::Unsupported(Capability::GetSelection))
    }

    async fn handles_to_external_ids(
        &self,
        model: &ModelId,
        handles: &[RuntimeHandle],
    ) -> HostResult<Vec<ExternalId>> {
        self.enter(format!("handlesToExternalIds({model})")).await?;
        Ok(handles
            .iter()
            .filter_map(|h| self.guids.get(&(model.clone(), *h)).cloned())
            .collect())
    }

    async fn external_ids_to_handles(
        &self,
        model: &ModelId,
        external_ids: &[ExternalId],
    ) -> HostResult<Vec<Option<RuntimeHandle>>> {
        self.enter(format!("externalIdsToHandles({model})")).await?;
        Ok(external_ids
            .iter()
            .map(|id| {
                self.guids
                    .iter()
                    .find(|((m, _), guid)| m == model && *guid == id)
                    .map(|((_, handle), _)| *handle)
            })
            .collect())
    }

    async fn get_properties(
        &self,
        model: &ModelId,
        handles: &[RuntimeHandle],
    ) -> HostResult<Vec<PropertyBag>> {
        self.enter(format!("getProperties({model})")).await?;
        let properties = self
            .properties
            .as_ref()
            .ok_or(HostError::Unsupported(Capability::GetProperties))?;
        Ok(handles
            .iter()
            .filter_map(|h| properties.get(h).cloned())
            .collect())
    }

    async fn capture_snapshot(&self, _options: SnapshotOptions) -> HostResult<Snapshot> {
        self.enter("captureSnapshot".to_string()).await?;
        self.snapshot
            .clone()
            .unwrap_or(Err(HostError::Unsupported(Capability::CaptureSnapshot)))
    }

    async fn set_selection(&self, selection: &[ModelObjects]) -> HostResult<()> {
        self.enter("setSelection".to_string()).await?;
        if !self.can_set_selection {
            return Err(HostError::Unsupported(Capability::SetSelection));
        }
        self.applied.borrow_mut().push(selection.to_vec());
        Ok(())
    }
}

/// Clipboard that records writes, refuses them, or never answers
#[derive(Default)]
pub struct FakeClipboard {
    pub refuse: bool,
    pub hang: bool,
    pub written: RefCell<Vec<String>>,
}

#[async_trait(?Send)]
impl Clipboard for FakeClipboard {
    async fn write_text(&self, text: &str) -> HostResult<()> {
        if self.hang {
            future::pending::<()>().await;
        }
        if self.refuse {
            return Err(HostError::rejected(Capability::Clipboard, "permission denied"));
        }
        self.written.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// Prompt answering from a script; `None` once the script runs out
#[derive(Default)]
pub struct ScriptedPrompt {
    pub answers: RefCell<VecDeque<Option<String>>>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[Option<&str>]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|a| a.map(str::to_string)).collect()),
            asked: RefCell::new(Vec::new()),
        }
    }
}

#[async_trait(?Send)]
impl Prompt for ScriptedPrompt {
    async fn prompt(&self, message: &str, _default: &str) -> Option<String> {
        self.asked.borrow_mut().push(message.to_string());
        self.answers.borrow_mut().pop_front().flatten()
    }
}

#[derive(Default)]
pub struct RecordingStatus {
    pub shown: RefCell<Vec<Status>>,
}

impl RecordingStatus {
    pub fn last(&self) -> Option<Status> {
        self.shown.borrow().last().cloned()
    }
}

impl StatusSink for RecordingStatus {
    fn show(&self, status: &Status) {
        self.shown.borrow_mut().push(status.clone());
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub refuse: Cell<bool>,
    pub delivered: RefCell<Vec<Submission>>,
}

#[async_trait(?Send)]
impl SubmissionSink for RecordingSink {
    async fn deliver(&self, submission: &Submission) -> HostResult<()> {
        if self.refuse.get() {
            return Err(HostError::rejected(Capability::Submission, "HTTP 500"));
        }
        self.delivered.borrow_mut().push(submission.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingChrome {
    pub applied: RefCell<Vec<ChromeState>>,
}

impl ChromeControl for RecordingChrome {
    fn apply(&self, state: &ChromeState) {
        self.applied.borrow_mut().push(*state);
    }
}

/// A dock wired to fakes, with handles to inspect them afterwards
pub struct Rig {
    pub viewer: Rc<FakeViewer>,
    pub clipboard: Rc<FakeClipboard>,
    pub prompt: Rc<ScriptedPrompt>,
    pub status: Rc<RecordingStatus>,
    pub sink: Rc<RecordingSink>,
    pub chrome: Rc<RecordingChrome>,
    pub dock: Dock,
}

impl Rig {
    pub fn new(viewer: FakeViewer) -> Self {
        Self::build(viewer, FakeClipboard::default(), ScriptedPrompt::default(), DockContext::default())
    }

    pub fn build(
        viewer: FakeViewer,
        clipboard: FakeClipboard,
        prompt: ScriptedPrompt,
        context: DockContext,
    ) -> Self {
        Self::with_timer(viewer, clipboard, prompt, context, Rc::new(NeverTimer))
    }

    pub fn with_timer(
        viewer: FakeViewer,
        clipboard: FakeClipboard,
        prompt: ScriptedPrompt,
        context: DockContext,
        timer: Rc<dyn Timer>,
    ) -> Self {
        let viewer = Rc::new(viewer);
        let clipboard = Rc::new(clipboard);
        let prompt = Rc::new(prompt);
        let status = Rc::new(RecordingStatus::default());
        let sink = Rc::new(RecordingSink::default());
        let chrome = Rc::new(RecordingChrome::default());

        let collaborators = Collaborators {
            viewer: viewer.clone(),
            clipboard: clipboard.clone(),
            prompt: prompt.clone(),
            status: status.clone(),
            submissions: sink.clone(),
            chrome: chrome.clone(),
            timer,
        };
        let config = DockConfig {
            shared_secret: Some("s3cret".into()),
            ..DockConfig::default()
        };

        Self {
            viewer,
            clipboard,
            prompt,
            status,
            sink,
            chrome,
            dock: Dock::new(collaborators, config, context),
        }
    }
}
