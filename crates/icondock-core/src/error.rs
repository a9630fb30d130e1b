// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for links, configuration and workflows

use icondock_model::{Capability, HostError};
use thiserror::Error;

/// Result type alias for workflow runs
pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;

/// Errors while reading a deep link from a raw address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors while loading overlay configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How a failed workflow should be treated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Data or capability missing; the user may simply try again
    Unavailable,
    /// The workflow cannot produce its primary result
    Fatal,
}

/// Why a workflow stopped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    #[error("select an object in the model first")]
    SelectionRequired,

    #[error("the selected object has no IFC GUID")]
    IdentifierUnavailable,

    #[error("no model found")]
    ModelNotFound,

    #[error("the viewer could not select the object: {0}")]
    FocusUnavailable(HostError),

    #[error("the viewer did not respond ({0})")]
    HostUnresponsive(Capability),

    #[error("snapshot failed: {0}")]
    CaptureFailed(HostError),
}

impl Reason {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Reason::CaptureFailed(_) => ErrorKind::Fatal,
            _ => ErrorKind::Unavailable,
        }
    }
}

/// A workflow that stopped before producing its result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct WorkflowError {
    pub kind: ErrorKind,
    pub reason: Reason,
}

impl WorkflowError {
    pub fn is_fatal(&self) -> bool {
        self.kind == ErrorKind::Fatal
    }
}

impl From<Reason> for WorkflowError {
    fn from(reason: Reason) -> Self {
        WorkflowError {
            kind: reason.kind(),
            reason,
        }
    }
}
