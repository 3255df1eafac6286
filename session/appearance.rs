/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Native view appearance callbacks, reconciled with the visit in flight.

use log::debug;

use super::Session;
use crate::visit::{VisitAction, VisitState};
use crate::visitable::{ViewAppearance, ViewControllerId, VisitableRef, same_visitable};

impl Session {
    /// The host is about to show `visitable`'s view controller.
    pub fn visitable_view_will_appear(
        &mut self,
        visitable: &VisitableRef,
        appearance: ViewAppearance,
    ) {
        if appearance.interactive_transition {
            return;
        }
        let (Some(topmost), Some(current)) = (self.topmost_visit(), self.current_visit()) else {
            return;
        };
        let is_topmost = same_visitable(&**topmost.visitable(), &**visitable);
        let topmost_completed = topmost.state() == VisitState::Completed;
        let is_current = same_visitable(&**current.visitable(), &**visitable);
        let current_started = current.state() == VisitState::Started;
        let current_id = current.id();

        if is_topmost && appearance.moving_to_parent {
            if topmost_completed {
                // Back gesture aborted: stay on the topmost screen as is.
                debug!("back navigation to {} aborted", visitable.view_controller_id());
                self.cancel_visit(current_id);
            } else {
                self.visit_visitable(visitable, VisitAction::Advance);
            }
        } else if is_current && current_started {
            self.complete_navigation_for_current_visit();
        } else if !is_topmost {
            self.visit_visitable(visitable, VisitAction::Restore);
        }
    }

    /// `visitable`'s view controller is fully on screen.
    pub fn visitable_view_did_appear(
        &mut self,
        visitable: &VisitableRef,
        appearance: ViewAppearance,
    ) {
        if appearance.interactive_transition {
            return;
        }
        let is_current = self
            .current_visit()
            .is_some_and(|visit| same_visitable(&**visit.visitable(), &**visitable));
        if is_current {
            self.complete_navigation_for_current_visit();
            let failed = self
                .current_visit()
                .is_some_and(|visit| visit.state() == VisitState::Failed);
            if !failed {
                self.activate_visitable(visitable);
            }
            return;
        }

        let reappearing = self.topmost_visit().is_some_and(|visit| {
            same_visitable(&**visit.visitable(), &**visitable)
                && visit.state() == VisitState::Completed
        });
        if reappearing {
            visitable.hide_visitable_screenshot();
            visitable.hide_visitable_activity_indicator();
            self.activate_visitable(visitable);
        }
    }

    /// Honoured only for the topmost visitable.
    pub fn visitable_did_request_reload(&mut self, visitable: &VisitableRef) {
        if self.is_topmost(visitable) {
            self.reload();
        }
    }

    /// Like a reload, but `visitable` hears about the start and the
    /// successful end.
    pub fn visitable_did_request_refresh(&mut self, visitable: &VisitableRef) {
        if !self.is_topmost(visitable) {
            return;
        }
        let Some(reloadable) = self.topmost_visitable().cloned() else {
            return;
        };
        if reloadable.visitable_url().is_none() {
            debug!("refresh of {} skipped, no URL", visitable.view_controller_id());
            return;
        }
        visitable.visitable_will_refresh();
        self.refreshing = self.reload_topmost();
    }

    /// The host released a view controller for good.
    pub fn visitable_did_dispose(&mut self, id: ViewControllerId) {
        self.restoration_tokens.forget(id);
        if self
            .activated_visitable
            .as_ref()
            .is_some_and(|activated| activated.view_controller_id() == id)
        {
            self.activated_visitable = None;
        }
    }

    fn is_topmost(&self, visitable: &VisitableRef) -> bool {
        self.topmost_visitable()
            .is_some_and(|topmost| same_visitable(&**topmost, &**visitable))
    }
}
