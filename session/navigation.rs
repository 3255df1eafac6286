/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Engine-facing entry points: navigation and response policy, and inbound
//! engine events.

use std::rc::Rc;

use log::{debug, warn};

use super::Session;
use crate::diagnostics::{CHANNEL_ENGINE_EVENT_STALE, DiagnosticEvent};
use crate::visit::{Visit, VisitAction, VisitEffect, VisitKind, VisitState};
use crate::web::policy::{NavigationFollowUp, classify_cold_boot_navigation, classify_navigation};
use crate::web::{
    EngineEvent, NavigationAction, NavigationPolicy, NavigationResponse, ResponsePolicy,
};

impl Session {
    /// Decide a navigation the engine wants to perform itself. `decision` is
    /// called exactly once, before any follow-up runs.
    pub fn decide_policy_for_navigation(
        &mut self,
        action: NavigationAction,
        decision: impl FnOnce(NavigationPolicy),
    ) {
        self.web.record_navigation(action.navigation_type);
        let outcome = if self.cold_boot_in_flight() {
            classify_cold_boot_navigation(&action)
        } else {
            let delegate = Rc::clone(&self.delegate);
            classify_navigation(
                &action,
                |url| delegate.session_is_local_url(url),
                |url| delegate.session_preprocess_url(url),
            )
        };
        decision(outcome.policy);
        self.diagnostics
            .emit(DiagnosticEvent::navigation(outcome.policy));

        match outcome.follow_up {
            None => {},
            Some(NavigationFollowUp::FinishWithPreprocessing) => {
                if let Some(id) = self.current_visit {
                    self.drive_visit(id, Visit::finish_with_preprocessing);
                }
            },
            Some(NavigationFollowUp::ProposeVisit(url)) => {
                self.delegate
                    .session_did_propose_visit(&url, VisitAction::Advance);
            },
            Some(NavigationFollowUp::OpenExternal(url)) => {
                self.delegate.session_open_external_url(&url);
            },
            Some(NavigationFollowUp::Reload) => self.reload(),
        }
    }

    /// Decide a main-frame response for a cold-boot load. Responses for a
    /// visit that is no longer live are cancelled silently.
    pub fn decide_policy_for_response(
        &mut self,
        response: NavigationResponse,
        decision: impl FnOnce(ResponsePolicy),
    ) {
        let id = response.visit;
        let Some(visit) = self.live_visit_mut(id) else {
            debug!("cancelling response for stale {id}");
            self.diagnostics.visit(CHANNEL_ENGINE_EVENT_STALE, id);
            decision(ResponsePolicy::Cancel);
            return;
        };
        let visitable = Rc::clone(visit.visitable());

        if self.delegate.session_postprocess_response(&visitable, &response) {
            decision(ResponsePolicy::Cancel);
            self.drive_visit(id, Visit::finish_with_preprocessing);
            return;
        }

        let success = self.config.success_status;
        let (policy, effects): (ResponsePolicy, Vec<VisitEffect>) =
            match self.live_visit_mut(id) {
                Some(visit) => visit.decide_response(response.status, success),
                None => (ResponsePolicy::Cancel, Vec::new()),
            };
        decision(policy);
        self.apply_effects(id, effects);
    }

    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Visit { visit, event } => {
                self.drive_visit(visit, |live| live.handle_event(event));
            },
            EngineEvent::ProposedVisit { url, action } => {
                self.delegate.session_did_propose_visit(&url, action);
            },
            EngineEvent::PageInvalidated => self.reload(),
            EngineEvent::ScriptEvaluationFailed { message } => {
                warn!("adapter script evaluation failed: {message}");
                self.restart_current_visit();
            },
            EngineEvent::ContentProcessTerminated => {
                warn!("web content process terminated, reloading");
                self.cold_boot_on_next_request = true;
                self.reload();
            },
        }
    }

    /// The current visit is a cold boot whose page load the engine is still
    /// performing.
    fn cold_boot_in_flight(&self) -> bool {
        self.current_visit().is_some_and(|visit| {
            visit.kind() == VisitKind::ColdBoot && visit.state() == VisitState::Started
        })
    }

    /// In-page state is unknown: drop the initialized flag and visit the
    /// current visitable again as a cold boot.
    fn restart_current_visit(&mut self) {
        if !self.initialized {
            return;
        }
        let Some(visitable) = self.current_visit().map(|visit| Rc::clone(visit.visitable())) else {
            return;
        };
        self.initialized = false;
        self.visit(&visitable);
    }
}
