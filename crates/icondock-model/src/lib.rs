// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IconDock Model - shared types and host capability traits
//!
//! This crate describes what the overlay needs from the hosted Workspace
//! viewer and the browser, without depending on either. Adapters implement
//! the traits; the orchestration crate consumes them.
//!
//! # Architecture
//!
//! - [`HostViewer`] - models, selection, identifier conversion, properties, snapshots
//! - [`Clipboard`], [`Prompt`], [`Timer`] - browser collaborators
//! - [`flatten`] / [`select_first`] - property bag lookups
//!
//! # Example
//!
//! ```ignore
//! use icondock_model::{flatten, select_first, PropertyBag, ASSEMBLY_KEYS};
//!
//! let bag = PropertyBag::new(serde_json::json!({"Assembly": "B-12"}));
//! let flat = flatten(&bag)?;
//! assert_eq!(select_first(&flat, ASSEMBLY_KEYS).as_deref(), Some("B-12"));
//! ```

pub mod error;
pub mod properties;
pub mod traits;
pub mod types;

pub use error::*;
pub use properties::*;
pub use traits::*;
pub use types::*;
