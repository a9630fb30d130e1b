// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IconDock Core - identifier bridging, deep links and workflows
//!
//! Everything here runs against the traits from `icondock-model`, so the
//! same workflows drive the browser adapter and the in-memory fakes used in
//! tests.
//!
//! # Workflows
//!
//! - Generate Link: selection -> IFC GUID -> deep link -> clipboard
//! - Snapshot + Annotate: selection -> GUID, assembly mark, image, comment -> submission
//! - Focus: GUID (typed or from the page URL) -> handles -> viewer selection
//! - Chrome toggles: full screen and side panel
//!
//! # Example
//!
//! ```ignore
//! let dock = Dock::new(collaborators, DockConfig::default(), DockContext::new(project_id));
//! dock.initialize().await;
//! dock.focus_from_link(&page_url).await?;
//! ```

pub mod actions;
pub mod bridge;
pub mod chrome;
pub mod config;
pub mod error;
pub mod host;
pub mod link;
pub mod resolver;
pub mod status;
pub mod submission;

#[cfg(test)]
mod testing;

pub use actions::{
    Collaborators, Dock, DockContext, FocusOutcome, LinkOutcome, SubmissionOutcome,
};
pub use bridge::IdentifierBridge;
pub use chrome::{ChromeControl, ChromeState};
pub use config::{DockConfig, DEFAULT_HOST_TIMEOUT_MS};
pub use error::{ConfigError, ErrorKind, LinkError, Reason, WorkflowError, WorkflowResult};
pub use host::Host;
pub use link::{DeepLink, LinkTarget};
pub use resolver::{pick_model, resolve_active_model, try_resolve_active_model};
pub use status::{Status, StatusSink};
pub use submission::{Submission, SubmissionSink};

// Re-export model types for convenience
pub use icondock_model;
