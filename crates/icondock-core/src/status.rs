// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Short user-facing status lines

use crate::Reason;
use icondock_model::{ExternalId, HostError};
use std::fmt;
use url::Url;

/// Outcome of a workflow, worded for the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// Link created and copied to the clipboard
    LinkCopied(Url),
    /// Link created but the clipboard refused it; show the URL instead
    LinkCopyManually(Url),
    /// Snapshot payload assembled
    ReadyToSubmit { guid: ExternalId, assembly: String },
    /// Payload handed to the delivery channel
    Submitted,
    /// Delivery channel refused the payload
    SubmissionNotDelivered(HostError),
    /// Viewer selection moved to the object
    Focused(ExternalId),
    /// A workflow stopped early
    Failed(Reason),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::LinkCopied(url) => write!(f, "Link created (copied): {url}"),
            Status::LinkCopyManually(url) => write!(f, "Link created (copy manually): {url}"),
            Status::ReadyToSubmit { guid, assembly } => {
                write!(f, "Ready to send: IFC_GUID={guid}; ASM='{assembly}'")
            }
            Status::Submitted => f.write_str("Snapshot sent."),
            Status::SubmissionNotDelivered(err) => write!(f, "Snapshot not sent: {err}"),
            Status::Focused(guid) => write!(f, "Focus GUID: {guid}"),
            Status::Failed(reason) => write!(f, "{}", capitalize(&reason.to_string())),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Where status lines are shown (toast, banner, console)
pub trait StatusSink {
    fn show(&self, status: &Status);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wording() {
        let url = Url::parse("https://x/?guid=G").unwrap();
        assert_eq!(
            Status::LinkCopyManually(url).to_string(),
            "Link created (copy manually): https://x/?guid=G"
        );
        assert_eq!(
            Status::Failed(Reason::SelectionRequired).to_string(),
            "Select an object in the model first"
        );
        assert_eq!(
            Status::ReadyToSubmit {
                guid: ExternalId::from("G"),
                assembly: "B-1".into()
            }
            .to_string(),
            "Ready to send: IFC_GUID=G; ASM='B-1'"
        );
    }
}
