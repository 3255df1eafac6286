/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Maps visit lifecycle effects onto screenshot, indicator and delegate calls.

use std::rc::Rc;

use log::trace;

use super::Session;
use crate::diagnostics::{CHANNEL_VISIT_COMPLETED, CHANNEL_VISIT_FAILED, CHANNEL_VISIT_PREPROCESSED};
use crate::visit::{VisitEffect, VisitId};

impl Session {
    pub(super) fn apply_effects(&mut self, id: VisitId, effects: Vec<VisitEffect>) {
        for effect in effects {
            self.apply_effect(id, effect);
        }
    }

    fn apply_effect(&mut self, id: VisitId, effect: VisitEffect) {
        let Some(visit) = self.visits.get(&id) else {
            return;
        };
        let visitable = Rc::clone(visit.visitable());
        let has_cached_snapshot = visit.has_cached_snapshot();
        let restoration_token = visit.restoration_token().cloned();
        trace!("{id} applying {effect:?}");

        match effect {
            VisitEffect::WillStart => {
                visitable.show_visitable_screenshot();
                self.activate_visitable(&visitable);
            },
            VisitEffect::DidStart => {
                if !has_cached_snapshot {
                    visitable.show_visitable_activity_indicator();
                }
            },
            VisitEffect::RequestStarted => self.delegate.session_did_start_request(),
            VisitEffect::RequestFinished => self.delegate.session_did_finish_request(),
            VisitEffect::WillLoadResponse => {
                visitable.update_visitable_screenshot();
                visitable.show_visitable_screenshot();
            },
            VisitEffect::DidRender => {
                visitable.hide_visitable_screenshot();
                visitable.hide_visitable_activity_indicator();
                visitable.visitable_did_render();
            },
            VisitEffect::EngineInitialized => {
                self.initialized = true;
                if !self.engine_initialized_notified {
                    self.engine_initialized_notified = true;
                    self.delegate.session_did_load_web_view();
                }
            },
            VisitEffect::Completed => {
                if let Some(token) = restoration_token {
                    self.restoration_tokens.store(&visitable, token);
                }
                self.set_topmost(id);
                if self.refreshing == Some(id) {
                    self.refreshing = None;
                    visitable.visitable_did_refresh();
                }
                self.diagnostics.visit(CHANNEL_VISIT_COMPLETED, id);
            },
            VisitEffect::Failed(error) => {
                self.end_refresh(id);
                self.delegate.session_did_fail_request(&visitable, &error);
                visitable.clear_visitable_screenshot();
                visitable.show_visitable_screenshot();
                self.diagnostics.visit(CHANNEL_VISIT_FAILED, id);
            },
            VisitEffect::FinishedWithPreprocessing => {
                self.end_refresh(id);
                visitable.hide_visitable_screenshot();
                visitable.hide_visitable_activity_indicator();
                self.diagnostics.visit(CHANNEL_VISIT_PREPROCESSED, id);
            },
            VisitEffect::Redirected(url) => self.delegate.session_did_redirect(&visitable, &url),
            VisitEffect::Engine(command) => self.web.perform(command),
        }
    }

    fn end_refresh(&mut self, id: VisitId) {
        if self.refreshing == Some(id) {
            self.refreshing = None;
        }
    }
}
