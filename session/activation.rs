/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Which visitable the web surface is embedded into.

use std::rc::Rc;

use super::Session;
use crate::visitable::{VisitableRef, same_visitable};

impl Session {
    /// Embed the web surface into `visitable`, swapping the previously
    /// activated one out behind a screenshot. Native-only visitables never
    /// receive the surface; activating one only releases the previous owner.
    pub fn activate_visitable(&mut self, visitable: &VisitableRef) {
        if self
            .activated_visitable
            .as_ref()
            .is_some_and(|activated| same_visitable(&**activated, &**visitable))
        {
            return;
        }
        if let Some(previous) = self.activated_visitable.clone() {
            self.deactivate_visitable(&previous, true);
        }
        if visitable.is_web_backed() {
            visitable.activate_visitable_web_view();
            self.activated_visitable = Some(Rc::clone(visitable));
        }
    }

    /// Detach the surface from `visitable` if it holds it. With
    /// `show_screenshot` a fresh snapshot covers the gap first.
    pub fn deactivate_visitable(&mut self, visitable: &VisitableRef, show_screenshot: bool) {
        let is_activated = self
            .activated_visitable
            .as_ref()
            .is_some_and(|activated| same_visitable(&**activated, &**visitable));
        if !is_activated {
            return;
        }
        if show_screenshot {
            visitable.update_visitable_screenshot();
            visitable.show_visitable_screenshot();
        }
        visitable.deactivate_visitable_web_view();
        self.activated_visitable = None;
    }
}
