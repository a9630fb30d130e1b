// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User-facing workflows
//!
//! Each public async method on [`Dock`] is one button of the overlay. The
//! [`DockContext`] sits behind an async mutex that a workflow holds for its
//! whole run, so two quick clicks queue up instead of interleaving their host
//! calls.
//!
//! Only a failed snapshot capture is fatal. Everything else that goes missing
//! degrades to an empty value or a status line.

use crate::host::with_timeout;
use crate::link::{self, LinkTarget};
use crate::resolver::{resolve_active_model, try_resolve_active_model};
use crate::{
    ChromeControl, ChromeState, DockConfig, Host, IdentifierBridge, Reason, Status, StatusSink,
    Submission, SubmissionSink, WorkflowError, WorkflowResult,
};
use futures::lock::Mutex;
use icondock_model::{
    flatten, select_first, Capability, Clipboard, ExternalId, FlatBag, HostError, HostViewer,
    ModelId, ModelObjects, PropertyBag, Prompt, RuntimeHandle, Timer,
};
use log::{debug, info, warn};
use std::rc::Rc;
use url::Url;

const COMMENT_PROMPT: &str = "Add a comment:";
const GUID_PROMPT: &str = "Enter IFC GUID:";

/// State threaded through every workflow
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DockContext {
    /// Written only from the model resolver's result
    pub active_model: Option<ModelId>,
    pub project_id: Option<String>,
    pub chrome: ChromeState,
}

impl DockContext {
    pub fn new(project_id: Option<String>) -> Self {
        Self {
            project_id,
            ..Self::default()
        }
    }
}

/// Everything the overlay talks to
pub struct Collaborators {
    pub viewer: Rc<dyn HostViewer>,
    pub clipboard: Rc<dyn Clipboard>,
    pub prompt: Rc<dyn Prompt>,
    pub status: Rc<dyn StatusSink>,
    pub submissions: Rc<dyn SubmissionSink>,
    pub chrome: Rc<dyn ChromeControl>,
    pub timer: Rc<dyn Timer>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkOutcome {
    pub url: Url,
    /// `false` when the clipboard refused and the URL was shown instead
    pub copied: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub submission: Submission,
    /// Set when the delivery channel refused the payload
    pub delivery_error: Option<HostError>,
}

impl SubmissionOutcome {
    pub fn delivered(&self) -> bool {
        self.delivery_error.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Viewer selection set to these handles
    Focused {
        model: ModelId,
        handles: Vec<RuntimeHandle>,
    },
    /// Identifier matched nothing; selection left as it was
    NoMatch,
    /// Blank identifier or cancelled prompt
    Skipped,
}

/// The overlay core: collaborators, configuration and serialized state
pub struct Dock {
    viewer: Rc<dyn HostViewer>,
    clipboard: Rc<dyn Clipboard>,
    prompt: Rc<dyn Prompt>,
    status: Rc<dyn StatusSink>,
    submissions: Rc<dyn SubmissionSink>,
    chrome: Rc<dyn ChromeControl>,
    timer: Rc<dyn Timer>,
    config: DockConfig,
    context: Mutex<DockContext>,
}

impl Dock {
    pub fn new(collaborators: Collaborators, config: DockConfig, context: DockContext) -> Self {
        Self {
            viewer: collaborators.viewer,
            clipboard: collaborators.clipboard,
            prompt: collaborators.prompt,
            status: collaborators.status,
            submissions: collaborators.submissions,
            chrome: collaborators.chrome,
            timer: collaborators.timer,
            config,
            context: Mutex::new(context),
        }
    }

    pub fn config(&self) -> &DockConfig {
        &self.config
    }

    /// Copy of the current context, taken once any running workflow is done
    pub async fn context(&self) -> DockContext {
        self.context.lock().await.clone()
    }

    fn host(&self) -> Host<'_> {
        Host::new(
            self.viewer.as_ref(),
            self.timer.as_ref(),
            self.config.host_timeout(),
        )
    }

    /// Resolve the active model once at start-up
    pub async fn initialize(&self) -> Option<ModelId> {
        let mut ctx = self.context.lock().await;
        ctx.active_model = resolve_active_model(&self.host()).await;
        info!("active model: {:?}", ctx.active_model);
        ctx.active_model.clone()
    }

    /// Build a deep link to the first selected object and copy it
    pub async fn generate_link(&self, page_url: &Url) -> WorkflowResult<LinkOutcome> {
        let ctx = self.context.lock().await;
        let result = self.run_generate_link(&ctx, page_url).await;
        self.report(result, |outcome| {
            if outcome.copied {
                Status::LinkCopied(outcome.url.clone())
            } else {
                Status::LinkCopyManually(outcome.url.clone())
            }
        })
    }

    async fn run_generate_link(
        &self,
        ctx: &DockContext,
        page_url: &Url,
    ) -> WorkflowResult<LinkOutcome> {
        let host = self.host();
        let (model, handle) = first_selected(&host).await?;

        let guid = IdentifierBridge::new(&host)
            .try_to_external(&model, &[handle])
            .await
            .map_err(|err| {
                host_failure(err, Capability::HandlesToExternalIds, |_| {
                    Reason::IdentifierUnavailable
                })
            })?
            .into_iter()
            .next()
            .filter(|guid| !guid.is_empty())
            .ok_or(Reason::IdentifierUnavailable)?;

        let target = LinkTarget {
            project_id: ctx.project_id.clone(),
            model_id: model,
            external_id: guid,
        };
        let url = link::encode(page_url, &target);

        let write = self.clipboard.write_text(url.as_str());
        let copied = match with_timeout(host.timer(), host.timeout(), write).await {
            Ok(()) => true,
            Err(err) => {
                warn!("clipboard write failed, showing link instead: {err}");
                false
            }
        };

        Ok(LinkOutcome { url, copied })
    }

    /// Capture the view, collect GUID, assembly mark and a comment, and hand
    /// the payload to the submission channel
    pub async fn snapshot_and_annotate(&self) -> WorkflowResult<SubmissionOutcome> {
        let mut ctx = self.context.lock().await;
        let result = self.run_snapshot(&mut ctx).await;
        self.report(result, |outcome| match &outcome.delivery_error {
            None => Status::Submitted,
            Some(err) => Status::SubmissionNotDelivered(err.clone()),
        })
    }

    async fn run_snapshot(&self, ctx: &mut DockContext) -> WorkflowResult<SubmissionOutcome> {
        let host = self.host();
        if ctx.active_model.is_none() {
            ctx.active_model = resolve_active_model(&host).await;
        }

        let (model, handle) = first_selected(&host).await?;
        let guid = IdentifierBridge::new(&host)
            .to_external(&model, &[handle])
            .await
            .into_iter()
            .next()
            .unwrap_or_default();

        let flat = self.flat_properties(&host, &model, handle).await;
        let assembly = select_first(&flat, &self.config.assembly_keys).unwrap_or_default();
        let guid = if guid.is_empty() {
            select_first(&flat, &self.config.guid_keys)
                .map(ExternalId::from)
                .unwrap_or_default()
        } else {
            guid
        };

        let image = match host.capture_snapshot(self.config.snapshot).await {
            Ok(image) if !image.as_str().is_empty() => image,
            Ok(_) => {
                let err = HostError::malformed(Capability::CaptureSnapshot, "empty image");
                return Err(Reason::CaptureFailed(err).into());
            }
            Err(err) => return Err(Reason::CaptureFailed(err).into()),
        };

        self.status.show(&Status::ReadyToSubmit {
            guid: guid.clone(),
            assembly: assembly.clone(),
        });
        let comment = self
            .prompt
            .prompt(COMMENT_PROMPT, "")
            .await
            .unwrap_or_default();

        let submission = Submission {
            project_id: ctx.project_id.clone(),
            model_id: model,
            external_id: guid,
            assembly_mark: assembly,
            comment,
            image,
            secret: self.config.shared_secret.clone(),
        };

        let delivery_error = self.submissions.deliver(&submission).await.err();
        if let Some(err) = &delivery_error {
            warn!("submission not delivered: {err}");
        }

        Ok(SubmissionOutcome {
            submission,
            delivery_error,
        })
    }

    async fn flat_properties(
        &self,
        host: &Host<'_>,
        model: &ModelId,
        handle: RuntimeHandle,
    ) -> FlatBag {
        let bag = match host.get_properties(model, &[handle]).await {
            Ok(bags) => bags.into_iter().next().unwrap_or_else(PropertyBag::empty),
            Err(err) => {
                debug!("no properties for {model}/{handle}: {err}");
                PropertyBag::empty()
            }
        };
        flatten(&bag.normalize_property_sets()).unwrap_or_else(|err| {
            warn!("ignoring properties of {model}/{handle}: {err}");
            FlatBag::new()
        })
    }

    /// Select the object with this IFC GUID in the active model
    pub async fn focus_by_identifier(&self, identifier: &str) -> WorkflowResult<FocusOutcome> {
        let mut ctx = self.context.lock().await;
        let result = self.run_focus(&mut ctx, identifier).await;
        self.report_focus(result)
    }

    /// Ask for a GUID, then focus on it
    pub async fn focus_prompt(&self) -> WorkflowResult<FocusOutcome> {
        let mut ctx = self.context.lock().await;
        let Some(identifier) = self.prompt.prompt(GUID_PROMPT, "").await else {
            return Ok(FocusOutcome::Skipped);
        };
        let result = self.run_focus(&mut ctx, &identifier).await;
        self.report_focus(result)
    }

    /// Focus on the object the page URL links to
    ///
    /// `Ok(None)` when the URL lacks `modelId` or `guid`.
    pub async fn focus_from_link(&self, page_url: &Url) -> WorkflowResult<Option<FocusOutcome>> {
        let Some(target) = link::decode(page_url).target() else {
            return Ok(None);
        };
        let _ctx = self.context.lock().await;
        info!(
            "deep link to {} in model {}",
            target.external_id, target.model_id
        );
        let result = self
            .focus_on(&self.host(), target.model_id, target.external_id)
            .await;
        self.report_focus(result).map(Some)
    }

    async fn run_focus(
        &self,
        ctx: &mut DockContext,
        identifier: &str,
    ) -> WorkflowResult<FocusOutcome> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Ok(FocusOutcome::Skipped);
        }

        let host = self.host();
        if ctx.active_model.is_none() {
            ctx.active_model = try_resolve_active_model(&host).await.map_err(|err| {
                host_failure(err, Capability::ListModels, |_| Reason::ModelNotFound)
            })?;
        }
        let model = ctx.active_model.clone().ok_or(Reason::ModelNotFound)?;
        self.focus_on(&host, model, ExternalId::from(identifier))
            .await
    }

    async fn focus_on(
        &self,
        host: &Host<'_>,
        model: ModelId,
        guid: ExternalId,
    ) -> WorkflowResult<FocusOutcome> {
        let handles = match IdentifierBridge::new(host)
            .try_to_handles(&model, std::slice::from_ref(&guid))
            .await
        {
            Ok(handles) => handles,
            Err(err @ HostError::Timeout(_)) => {
                return Err(host_failure(
                    err,
                    Capability::ExternalIdsToHandles,
                    Reason::FocusUnavailable,
                ))
            }
            Err(err) => {
                debug!("GUID lookup failed in model {model}: {err}");
                Vec::new()
            }
        };
        if handles.is_empty() {
            debug!("GUID {guid} matches nothing in model {model}");
            return Ok(FocusOutcome::NoMatch);
        }

        let selection = [ModelObjects::new(model.clone(), handles.clone())];
        host.set_selection(&selection).await.map_err(|err| {
            host_failure(err, Capability::SetSelection, Reason::FocusUnavailable)
        })?;
        self.status.show(&Status::Focused(guid));
        Ok(FocusOutcome::Focused { model, handles })
    }

    pub async fn toggle_fullscreen(&self) -> ChromeState {
        let mut ctx = self.context.lock().await;
        ctx.chrome.toggle_fullscreen();
        self.chrome.apply(&ctx.chrome);
        ctx.chrome
    }

    pub async fn toggle_panel(&self) -> ChromeState {
        let mut ctx = self.context.lock().await;
        ctx.chrome.toggle_panel();
        self.chrome.apply(&ctx.chrome);
        ctx.chrome
    }

    fn report<T>(
        &self,
        result: WorkflowResult<T>,
        success: impl FnOnce(&T) -> Status,
    ) -> WorkflowResult<T> {
        match &result {
            Ok(value) => self.status.show(&success(value)),
            Err(err) => self.report_error(err),
        }
        result
    }

    // Focus reports its own success; no-match stays silent
    fn report_focus(&self, result: WorkflowResult<FocusOutcome>) -> WorkflowResult<FocusOutcome> {
        if let Err(err) = &result {
            self.report_error(err);
        }
        result
    }

    fn report_error(&self, err: &WorkflowError) {
        info!("workflow stopped ({:?}): {}", err.kind, err.reason);
        self.status.show(&Status::Failed(err.reason.clone()));
    }
}

/// First model of the selection and its first handle
async fn first_selected(host: &Host<'_>) -> WorkflowResult<(ModelId, RuntimeHandle)> {
    let selection = host.get_selection().await.map_err(|err| {
        host_failure(err, Capability::GetSelection, |_| Reason::SelectionRequired)
    })?;
    let first = selection
        .into_iter()
        .next()
        .filter(|entry| !entry.model_id.is_empty())
        .and_then(|entry| Some((entry.first_handle()?, entry.model_id)));
    match first {
        Some((handle, model)) => Ok((model, handle)),
        None => Err(Reason::SelectionRequired.into()),
    }
}

/// Timeouts become "host unresponsive"; anything else goes through `reason`
fn host_failure(
    err: HostError,
    capability: Capability,
    reason: impl FnOnce(HostError) -> Reason,
) -> WorkflowError {
    match err {
        HostError::Timeout(_) => Reason::HostUnresponsive(capability).into(),
        err => {
            debug!("{capability} failed: {err}");
            reason(err).into()
        }
    }
}
