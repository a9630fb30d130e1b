//! Browser collaborators: clipboard, prompt, timer, status line, page chrome
//! and webhook delivery

use crate::js;
use async_trait::async_trait;
use futures::future::{FutureExt, LocalBoxFuture};
use icondock_core::{ChromeControl, ChromeState, Status, StatusSink, Submission, SubmissionSink};
use icondock_model::{Capability, Clipboard, HostError, HostResult, Prompt, Timer};
use log::{debug, info, warn};
use std::time::Duration;
use url::Url;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Element whose text shows the latest status line
pub const STATUS_ELEMENT_ID: &str = "icondock-status";

/// Body classes the page stylesheet keys on
pub const FULLSCREEN_CLASS: &str = "icondock-fullscreen";
pub const PANEL_HIDDEN_CLASS: &str = "icondock-panel-hidden";

/// Global the embedding page may set to a configuration object
pub const CONFIG_GLOBAL: &str = "IconDockConfig";

/// Current page address
pub fn page_url() -> Option<Url> {
    let href = web_sys::window()?.location().href().ok()?;
    Url::parse(&href).ok()
}

/// `window.IconDockConfig` as JSON text, if the page set it
pub fn config_json() -> Option<String> {
    let config = js::object(&js_sys::global(), CONFIG_GLOBAL)?;
    js_sys::JSON::stringify(&config).ok().map(String::from)
}

/// `navigator.clipboard.writeText`
pub struct BrowserClipboard;

#[async_trait(?Send)]
impl Clipboard for BrowserClipboard {
    async fn write_text(&self, text: &str) -> HostResult<()> {
        let window = web_sys::window().ok_or(HostError::Unsupported(Capability::Clipboard))?;
        let clipboard = js::object(&window.navigator(), "clipboard")
            .ok_or(HostError::Unsupported(Capability::Clipboard))?;
        js::call(&clipboard, Capability::Clipboard, "writeText", &[JsValue::from_str(text)]).await?;
        Ok(())
    }
}

/// `window.prompt`
pub struct WindowPrompt;

#[async_trait(?Send)]
impl Prompt for WindowPrompt {
    async fn prompt(&self, message: &str, default: &str) -> Option<String> {
        web_sys::window()?
            .prompt_with_message_and_default(message, default)
            .ok()
            .flatten()
    }
}

/// Browser timer backed by `setTimeout`
pub struct GlooTimer;

impl Timer for GlooTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        gloo_timers::future::sleep(duration).boxed_local()
    }
}

/// Writes status lines into the status element and the console
pub struct StatusLine {
    element_id: &'static str,
}

impl StatusLine {
    pub fn new(element_id: &'static str) -> Self {
        Self { element_id }
    }
}

impl StatusSink for StatusLine {
    fn show(&self, status: &Status) {
        let text = status.to_string();
        info!("{text}");
        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(self.element_id));
        match element {
            Some(element) => element.set_text_content(Some(&text)),
            None => debug!("no #{} element for status", self.element_id),
        }
    }
}

/// Toggles body classes and the Fullscreen API
pub struct PageChrome;

impl ChromeControl for PageChrome {
    fn apply(&self, state: &ChromeState) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(body) = document.body() {
            let classes = body.class_list();
            for (class, on) in [
                (FULLSCREEN_CLASS, state.fullscreen),
                (PANEL_HIDDEN_CLASS, state.panel_hidden),
            ] {
                if let Err(err) = classes.toggle_with_force(class, on) {
                    warn!("could not toggle .{class}: {}", js::describe(&err));
                }
            }
        }

        let in_fullscreen = document.fullscreen_element().is_some();
        let result = match (state.fullscreen, in_fullscreen) {
            (true, false) => document
                .document_element()
                .map_or(Ok(()), |root| root.request_fullscreen()),
            (false, true) => {
                document.exit_fullscreen();
                Ok(())
            }
            _ => Ok(()),
        };
        // Body class still applies when the browser refuses real full screen
        if let Err(err) = result {
            debug!("fullscreen request refused: {}", js::describe(&err));
        }
    }
}

/// POSTs submissions as JSON to the configured webhook
pub struct WebhookSink {
    url: Option<String>,
}

impl WebhookSink {
    pub fn new(url: Option<String>) -> Self {
        Self { url }
    }
}

#[async_trait(?Send)]
impl SubmissionSink for WebhookSink {
    async fn deliver(&self, submission: &Submission) -> HostResult<()> {
        let capability = Capability::Submission;
        let Some(url) = self.url.as_deref() else {
            info!("no webhook configured; submission kept local");
            return Err(HostError::Unsupported(capability));
        };
        let body = submission
            .to_json()
            .map_err(|err| HostError::malformed(capability, err.to_string()))?;
        let rejected = |err: JsValue| HostError::rejected(capability, js::describe(&err));

        let headers = web_sys::Headers::new().map_err(rejected)?;
        // Plain text keeps this a simple request (no CORS preflight)
        headers
            .set("Content-Type", "text/plain;charset=utf-8")
            .map_err(rejected)?;
        let init = web_sys::RequestInit::new();
        init.set_method("POST");
        init.set_mode(web_sys::RequestMode::Cors);
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(&body));

        let request = web_sys::Request::new_with_str_and_init(url, &init).map_err(rejected)?;
        let window = web_sys::window().ok_or(HostError::Unsupported(capability))?;
        let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(rejected)?
            .dyn_into()
            .map_err(|_| HostError::malformed(capability, "fetch did not return a Response"))?;

        if !response.ok() {
            return Err(HostError::rejected(
                capability,
                format!("HTTP {} {}", response.status(), response.status_text()),
            ));
        }
        debug!("webhook accepted submission for {}", submission.external_id);
        Ok(())
    }
}
