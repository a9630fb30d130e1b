// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer chrome toggles (full screen, side panel)

use serde::{Deserialize, Serialize};

/// Presentation state of the host page
///
/// Nothing in the identifier or link workflows reads this.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChromeState {
    pub fullscreen: bool,
    pub panel_hidden: bool,
}

impl ChromeState {
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    pub fn toggle_panel(&mut self) {
        self.panel_hidden = !self.panel_hidden;
    }
}

/// Applies chrome state to the page
pub trait ChromeControl {
    fn apply(&self, state: &ChromeState);
}
