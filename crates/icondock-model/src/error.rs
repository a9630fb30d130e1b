// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for host viewer calls and property handling

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for host viewer calls
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Host viewer capabilities the overlay may ask for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    ListModels,
    GetSelection,
    HandlesToExternalIds,
    ExternalIdsToHandles,
    GetProperties,
    CaptureSnapshot,
    SetSelection,
    Clipboard,
    Prompt,
    Submission,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::ListModels => "listModels",
            Capability::GetSelection => "getSelection",
            Capability::HandlesToExternalIds => "handlesToExternalIds",
            Capability::ExternalIdsToHandles => "externalIdsToHandles",
            Capability::GetProperties => "getProperties",
            Capability::CaptureSnapshot => "captureSnapshot",
            Capability::SetSelection => "setSelection",
            Capability::Clipboard => "clipboard",
            Capability::Prompt => "prompt",
            Capability::Submission => "submission",
        };
        f.write_str(name)
    }
}

/// Errors returned by the host viewer or a browser collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The host does not provide this capability
    #[error("capability not supported: {0}")]
    Unsupported(Capability),

    /// The host rejected the call
    #[error("host rejected {capability}: {message}")]
    Rejected {
        capability: Capability,
        message: String,
    },

    /// The host did not answer in time
    #[error("host did not respond within {0:?}")]
    Timeout(Duration),

    /// The host answered with data of an unexpected shape
    #[error("malformed host response from {capability}: {message}")]
    Malformed {
        capability: Capability,
        message: String,
    },
}

impl HostError {
    /// Create a rejection error
    pub fn rejected(capability: Capability, msg: impl Into<String>) -> Self {
        HostError::Rejected {
            capability,
            message: msg.into(),
        }
    }

    /// Create a malformed-response error
    pub fn malformed(capability: Capability, msg: impl Into<String>) -> Self {
        HostError::Malformed {
            capability,
            message: msg.into(),
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, HostError::Unsupported(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, HostError::Timeout(_))
    }
}

/// Errors that can occur while flattening property bags
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// Nesting too deep to be a real property bag (runaway or self-referencing input)
    #[error("property bag nesting exceeds {limit} levels at '{path}'")]
    DepthExceeded { limit: usize, path: String },
}
