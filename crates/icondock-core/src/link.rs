// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shareable deep links
//!
//! A deep link is the current page URL with three extra query parameters:
//! `projectId` (optional), `modelId` and `guid`. Every other part of the URL
//! is left alone so links keep working inside the host's own routing.

use crate::LinkError;
use icondock_model::{ExternalId, ModelId};
use url::Url;

pub const PROJECT_ID_PARAM: &str = "projectId";
pub const MODEL_ID_PARAM: &str = "modelId";
pub const GUID_PARAM: &str = "guid";

/// Object a link points at
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkTarget {
    pub project_id: Option<String>,
    pub model_id: ModelId,
    pub external_id: ExternalId,
}

impl LinkTarget {
    pub fn new(model_id: impl Into<ModelId>, external_id: impl Into<ExternalId>) -> Self {
        Self {
            project_id: None,
            model_id: model_id.into(),
            external_id: external_id.into(),
        }
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }
}

/// Managed parameters read back from a URL; each may be missing
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeepLink {
    pub project_id: Option<String>,
    pub model_id: Option<ModelId>,
    pub external_id: Option<ExternalId>,
}

impl DeepLink {
    /// The focus target, when both model and GUID are present
    pub fn target(&self) -> Option<LinkTarget> {
        Some(LinkTarget {
            project_id: self.project_id.clone(),
            model_id: self.model_id.clone()?,
            external_id: self.external_id.clone()?,
        })
    }
}

impl From<LinkTarget> for DeepLink {
    fn from(target: LinkTarget) -> Self {
        DeepLink {
            project_id: target.project_id.filter(|p| !p.is_empty()),
            model_id: Some(target.model_id),
            external_id: Some(target.external_id),
        }
    }
}

/// Write `target` into a copy of `base`
///
/// `modelId` and `guid` are always set, `projectId` only when the target has a
/// non-empty one. Setting a parameter replaces all of its earlier occurrences.
///
/// An empty `modelId` or `guid` is written as is, but [`decode`] reads it back
/// as missing, so only targets with non-empty ids round-trip.
pub fn encode(base: &Url, target: &LinkTarget) -> Url {
    let project_id = target.project_id.as_deref().filter(|p| !p.is_empty());

    let mut managed = vec![
        (MODEL_ID_PARAM, target.model_id.as_str()),
        (GUID_PARAM, target.external_id.as_str()),
    ];
    if let Some(project_id) = project_id {
        managed.insert(0, (PROJECT_ID_PARAM, project_id));
    }

    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| !managed.iter().any(|(name, _)| key == *name))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .extend_pairs(managed);
    url
}

/// Read the managed parameters from `url`
///
/// The first occurrence of a parameter wins; empty values count as missing.
pub fn decode(url: &Url) -> DeepLink {
    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    };

    DeepLink {
        project_id: param(PROJECT_ID_PARAM),
        model_id: param(MODEL_ID_PARAM).map(ModelId::from),
        external_id: param(GUID_PARAM).map(ExternalId::from),
    }
}

/// Parse a raw address and read its managed parameters
pub fn decode_str(address: &str) -> Result<DeepLink, LinkError> {
    Ok(decode(&Url::parse(address)?))
}
