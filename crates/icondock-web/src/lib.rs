//! IconDock overlay (browser build)
//!
//! Starts with the page, wires the Workspace viewer and browser collaborators
//! into an [`icondock_core::Dock`] and exposes one function per dock button.
//! On start-up it resolves the active model and follows a deep link in the
//! page URL, if there is one.
//!
//! ```js
//! import init, { generateLink, snapshotAndSend, focusPrompt } from "./icondock_web.js";
//! window.IconDockConfig = { webhookUrl: "https://script.google.com/macros/s/ID/exec" };
//! await init();
//! linkButton.onclick = () => generateLink();
//! ```

pub mod browser;
pub mod console;
pub mod js;
pub mod viewer;

use browser::{
    BrowserClipboard, GlooTimer, PageChrome, StatusLine, WebhookSink, WindowPrompt,
    STATUS_ELEMENT_ID,
};
use icondock_core::{Collaborators, Dock, DockConfig, DockContext, FocusOutcome, WorkflowError};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use viewer::WorkspaceViewer;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

thread_local! {
    static DOCK: RefCell<Option<Rc<Dock>>> = const { RefCell::new(None) };
}

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let page = browser::page_url();
    let config = load_config();
    let config = match &page {
        Some(page) => config.with_page_url(page),
        None => config,
    };
    console::init(config.debug);

    let Some(viewer) = WorkspaceViewer::discover() else {
        log::warn!("no Workspace viewer on this page; overlay disabled");
        return;
    };
    let project_id = match &page {
        Some(page) => config.project_id_for(page),
        None => config.default_project_id.clone(),
    };

    let collaborators = Collaborators {
        viewer: Rc::new(viewer),
        clipboard: Rc::new(BrowserClipboard),
        prompt: Rc::new(WindowPrompt),
        status: Rc::new(StatusLine::new(STATUS_ELEMENT_ID)),
        submissions: Rc::new(WebhookSink::new(config.webhook_url.clone())),
        chrome: Rc::new(PageChrome),
        timer: Rc::new(GlooTimer),
    };
    let dock = Rc::new(Dock::new(collaborators, config, DockContext::new(project_id)));
    DOCK.with(|slot| *slot.borrow_mut() = Some(dock.clone()));
    log::info!("overlay started");

    spawn_local(async move {
        dock.initialize().await;
        if let Some(page) = page {
            if let Err(err) = dock.focus_from_link(&page).await {
                log::debug!("deep link not followed: {err}");
            }
        }
    });
}

fn load_config() -> DockConfig {
    let Some(json) = browser::config_json() else {
        return DockConfig::default();
    };
    DockConfig::from_json(&json).unwrap_or_else(|err| {
        // Logger is not installed yet
        web_sys::console::warn_1(&format!("[IconDock] {err}; using defaults").into());
        DockConfig::default()
    })
}

fn dock() -> Result<Rc<Dock>, JsValue> {
    DOCK.with(|slot| slot.borrow().clone())
        .ok_or_else(|| JsValue::from_str("IconDock is not running"))
}

fn to_js(err: WorkflowError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Copy a deep link to the selected object; resolves to the link
#[wasm_bindgen(js_name = generateLink)]
pub async fn generate_link() -> Result<String, JsValue> {
    let dock = dock()?;
    let page = browser::page_url().ok_or_else(|| JsValue::from_str("page URL unavailable"))?;
    let outcome = dock.generate_link(&page).await.map_err(to_js)?;
    Ok(outcome.url.into())
}

/// Snapshot + comment for the selected object; resolves to the payload
#[wasm_bindgen(js_name = snapshotAndSend)]
pub async fn snapshot_and_send() -> Result<JsValue, JsValue> {
    let dock = dock()?;
    let outcome = dock.snapshot_and_annotate().await.map_err(to_js)?;
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    outcome
        .submission
        .serialize(&serializer)
        .map_err(JsValue::from)
}

/// Select the object with this IFC GUID; resolves to whether anything matched
#[wasm_bindgen(js_name = focusGuid)]
pub async fn focus_guid(guid: String) -> Result<bool, JsValue> {
    let outcome = dock()?.focus_by_identifier(&guid).await.map_err(to_js)?;
    Ok(matches!(outcome, FocusOutcome::Focused { .. }))
}

/// Ask for an IFC GUID, then focus on it
#[wasm_bindgen(js_name = focusPrompt)]
pub async fn focus_prompt() -> Result<bool, JsValue> {
    let outcome = dock()?.focus_prompt().await.map_err(to_js)?;
    Ok(matches!(outcome, FocusOutcome::Focused { .. }))
}

#[wasm_bindgen(js_name = toggleFullscreen)]
pub async fn toggle_fullscreen() -> Result<bool, JsValue> {
    Ok(dock()?.toggle_fullscreen().await.fullscreen)
}

#[wasm_bindgen(js_name = togglePanel)]
pub async fn toggle_panel() -> Result<bool, JsValue> {
    Ok(dock()?.toggle_panel().await.panel_hidden)
}
