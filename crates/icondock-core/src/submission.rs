// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Annotated snapshot payload and its delivery channel

use async_trait::async_trait;
use icondock_model::{ExternalId, HostResult, ModelId, Snapshot};
use serde::{Deserialize, Serialize};

/// Everything collected by the snapshot workflow
///
/// Serialized with the field names the webhook expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub model_id: ModelId,
    /// Empty when no GUID could be found
    #[serde(rename = "guid")]
    pub external_id: ExternalId,
    /// Empty when no assembly attribute could be found
    #[serde(rename = "assembly")]
    pub assembly_mark: String,
    pub comment: String,
    #[serde(rename = "screenshot")]
    pub image: Snapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl Submission {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// External delivery of submissions (webhook or similar)
#[async_trait(?Send)]
pub trait SubmissionSink {
    async fn deliver(&self, submission: &Submission) -> HostResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_webhook_field_names() {
        let submission = Submission {
            project_id: None,
            model_id: ModelId::from("M"),
            external_id: ExternalId::from("G"),
            assembly_mark: "B-1".into(),
            comment: "crack near bolt".into(),
            image: Snapshot::new("data:image/png;base64,AAAA"),
            secret: Some("s3".into()),
        };

        let value: serde_json::Value = serde_json::from_str(&submission.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "modelId": "M",
                "guid": "G",
                "assembly": "B-1",
                "comment": "crack near bolt",
                "screenshot": "data:image/png;base64,AAAA",
                "secret": "s3"
            })
        );
    }
}
