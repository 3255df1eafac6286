/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The session: owns the web surface and at most one in-flight visit.
//!
//! Requests come in from three directions (the host calling
//! [`Session::visit`], the engine through [`Session::handle_engine_event`] and
//! the policy deciders, and view appearance callbacks) and all of them either
//! start a new visit, cancelling the current one, or correct the existing
//! visit/visitable pair.

mod activation;
mod appearance;
mod lifecycle;
mod navigation;

use std::collections::HashMap;
use std::rc::Rc;

use crossbeam_channel::Sender;
use log::{debug, trace};

use crate::config::SessionConfig;
use crate::delegate::SessionDelegate;
use crate::diagnostics::{
    CHANNEL_ENGINE_EVENT_STALE, CHANNEL_SESSION_RELOAD, CHANNEL_VISIT_CANCELED,
    CHANNEL_VISIT_STARTED, DiagnosticEvent, DiagnosticsSink,
};
use crate::restoration::RestorationTokens;
use crate::visit::strategy::select_strategy;
use crate::visit::{StrategyInputs, Visit, VisitAction, VisitEffect, VisitId, VisitKind, VisitState};
use crate::visitable::VisitableRef;
use crate::web::{WebEngine, WebSurface};

pub struct Session {
    config: SessionConfig,
    web: WebSurface,
    delegate: Rc<dyn SessionDelegate>,
    diagnostics: DiagnosticsSink,
    /// Holds the current and topmost visits only; anything else is pruned.
    visits: HashMap<VisitId, Visit>,
    next_visit_id: VisitId,
    current_visit: Option<VisitId>,
    topmost_visit: Option<VisitId>,
    activated_visitable: Option<VisitableRef>,
    restoration_tokens: RestorationTokens,
    /// The engine holds a document the adapter script has booted in.
    /// Cleared by reloads and script failures.
    initialized: bool,
    engine_initialized_notified: bool,
    /// The reload visit started by a refresh request, until it ends.
    refreshing: Option<VisitId>,
    cold_boot_on_next_request: bool,
}

impl Session {
    pub fn new(engine: Box<dyn WebEngine>, delegate: Rc<dyn SessionDelegate>) -> Self {
        Self::with_config(engine, delegate, SessionConfig::default())
    }

    pub fn with_config(
        engine: Box<dyn WebEngine>,
        delegate: Rc<dyn SessionDelegate>,
        config: SessionConfig,
    ) -> Self {
        Self {
            config,
            web: WebSurface::new(engine),
            delegate,
            diagnostics: DiagnosticsSink::default(),
            visits: HashMap::new(),
            next_visit_id: VisitId::first(),
            current_visit: None,
            topmost_visit: None,
            activated_visitable: None,
            restoration_tokens: RestorationTokens::default(),
            initialized: false,
            engine_initialized_notified: false,
            refreshing: None,
            cold_boot_on_next_request: false,
        }
    }

    pub fn with_diagnostics(mut self, tx: Sender<DiagnosticEvent>) -> Self {
        self.diagnostics = DiagnosticsSink::new(tx);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn current_visit(&self) -> Option<&Visit> {
        self.current_visit.and_then(|id| self.visits.get(&id))
    }

    pub fn topmost_visit(&self) -> Option<&Visit> {
        self.topmost_visit.and_then(|id| self.visits.get(&id))
    }

    pub fn topmost_visitable(&self) -> Option<&VisitableRef> {
        self.topmost_visit().map(Visit::visitable)
    }

    pub fn activated_visitable(&self) -> Option<&VisitableRef> {
        self.activated_visitable.as_ref()
    }

    pub fn is_engine_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.is_some()
    }

    pub fn cold_boot_on_next_request(&self) -> bool {
        self.cold_boot_on_next_request
    }

    /// Force the next visit to be a full page load.
    pub fn request_cold_boot_on_next_visit(&mut self) {
        self.cold_boot_on_next_request = true;
    }

    /// Navigate to `visitable` with a push. A visitable without a URL is
    /// ignored.
    pub fn visit(&mut self, visitable: &VisitableRef) {
        self.visit_visitable(visitable, VisitAction::Advance);
    }

    /// Cold-boot the topmost visitable again.
    pub fn reload(&mut self) {
        self.reload_topmost();
    }

    /// Reload and return the visit it started, if any.
    pub(crate) fn reload_topmost(&mut self) -> Option<VisitId> {
        let Some(visitable) = self.topmost_visitable().cloned() else {
            debug!("reload requested without a topmost visitable");
            return None;
        };
        self.diagnostics.emit(DiagnosticEvent::Session {
            channel_id: CHANNEL_SESSION_RELOAD,
        });
        // With another visit in flight the surface shows that visit, not the
        // topmost one.
        if self.current_visit == self.topmost_visit {
            self.reconcile_visit_url(self.topmost_visit);
        }
        self.initialized = false;
        let id = self.start_visit(&visitable, VisitAction::Advance)?;
        self.set_topmost(id);
        Some(id)
    }

    pub(crate) fn visit_visitable(
        &mut self,
        visitable: &VisitableRef,
        action: VisitAction,
    ) -> Option<VisitId> {
        if action == VisitAction::Advance && visitable.visitable_url().is_some() {
            self.reconcile_visit_url(self.current_visit);
        }
        self.start_visit(visitable, action)
    }

    fn start_visit(&mut self, visitable: &VisitableRef, action: VisitAction) -> Option<VisitId> {
        let Some(location) = visitable.visitable_url() else {
            debug!(
                "ignoring visit to {} without a URL",
                visitable.view_controller_id()
            );
            return None;
        };

        let origin = self.topmost_visit();
        let origin_native_only = origin.is_some_and(|visit| !visit.visitable().is_web_backed());
        let origin_location = origin.map(|visit| visit.location().clone());

        let kind = select_strategy(StrategyInputs {
            web_backed: visitable.is_web_backed(),
            engine_initialized: self.initialized,
            requires_cold_boot: visitable.requires_cold_boot(),
            cold_boot_on_next_request: self.cold_boot_on_next_request,
            origin_native_only,
        });

        let id = self.next_visit_id;
        self.next_visit_id = id.next();
        let mut visit = Visit::new(id, kind, Rc::clone(visitable), action, location);
        match kind {
            VisitKind::ColdBoot => {
                self.cold_boot_on_next_request = false;
                visit = visit.with_referer(origin_location.filter(|_| origin_native_only));
            },
            VisitKind::ScriptDriven => {
                let token = self.restoration_tokens.get(&**visitable).cloned();
                visit = visit.with_restoration_token(token);
            },
            VisitKind::NativeOnly => {},
        }

        if let Some(previous) = self.current_visit {
            self.cancel_visit(previous);
        }

        trace!("starting {visit:?}");
        self.visits.insert(id, visit);
        self.current_visit = Some(id);
        self.prune_visits();
        self.diagnostics.visit(CHANNEL_VISIT_STARTED, id);

        let effects = match self.visits.get_mut(&id) {
            Some(visit) => visit.start(),
            None => Vec::new(),
        };
        self.apply_effects(id, effects);
        Some(id)
    }

    pub(crate) fn cancel_visit(&mut self, id: VisitId) {
        let Some(visit) = self.visits.get_mut(&id) else {
            return;
        };
        let was_live = !visit.state().is_terminal();
        let effects = visit.cancel();
        if was_live {
            self.diagnostics.visit(CHANNEL_VISIT_CANCELED, id);
        }
        if self.refreshing == Some(id) {
            debug!("refresh {id} superseded");
            self.refreshing = None;
        }
        self.apply_effects(id, effects);
    }

    /// Same-document navigations (hash changes, `pushState`) move the
    /// surface without a visit; catch visit `id` up before leaving it.
    fn reconcile_visit_url(&mut self, id: Option<VisitId>) {
        if !self.config.reconcile_same_document_urls
            || self.web.last_navigation_was_form_submission()
        {
            return;
        }
        let Some(surface_url) = self.web.url() else {
            return;
        };
        let Some(visit) = id.and_then(|id| self.visits.get_mut(&id)) else {
            return;
        };
        if !visit.visitable().is_web_backed() || visit.location() == &surface_url {
            return;
        }

        debug!("{} location corrected to {surface_url}", visit.id());
        visit.set_location(surface_url.clone());
        let visitable = Rc::clone(visit.visitable());
        visitable.visitable_url_did_change(&surface_url);
        self.delegate.session_did_update_url(&visitable, &surface_url);
    }

    /// The one liveness guard: only the current visit, and only until it is
    /// cancelled, may change anything.
    fn live_visit_mut(&mut self, id: VisitId) -> Option<&mut Visit> {
        if self.current_visit != Some(id) {
            return None;
        }
        self.visits
            .get_mut(&id)
            .filter(|visit| visit.state() != VisitState::Canceled)
    }

    fn is_live(&self, id: VisitId) -> bool {
        self.current_visit == Some(id)
            && self
                .visits
                .get(&id)
                .is_some_and(|visit| visit.state() != VisitState::Canceled)
    }

    /// Run `step` against visit `id` if it is still live and apply what it
    /// produced. Returns `false` when the visit was stale.
    pub(crate) fn drive_visit(
        &mut self,
        id: VisitId,
        step: impl FnOnce(&mut Visit) -> Vec<VisitEffect>,
    ) -> bool {
        let Some(visit) = self.live_visit_mut(id) else {
            debug!("dropping work for stale {id}");
            self.diagnostics.visit(CHANNEL_ENGINE_EVENT_STALE, id);
            return false;
        };
        let effects = step(visit);
        self.apply_effects(id, effects);
        true
    }

    pub(crate) fn complete_navigation_for_current_visit(&mut self) {
        let Some(id) = self.current_visit else {
            return;
        };
        if self.is_live(id) {
            self.set_topmost(id);
            self.drive_visit(id, Visit::complete_navigation);
        }
    }

    fn set_topmost(&mut self, id: VisitId) {
        self.topmost_visit = Some(id);
        self.prune_visits();
    }

    fn prune_visits(&mut self) {
        let (current, topmost) = (self.current_visit, self.topmost_visit);
        self.visits
            .retain(|id, _| Some(*id) == current || Some(*id) == topmost);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("current_visit", &self.current_visit())
            .field("topmost_visit", &self.topmost_visit())
            .field("initialized", &self.initialized)
            .field("refreshing", &self.refreshing)
            .field("cold_boot_on_next_request", &self.cold_boot_on_next_request)
            .field("restoration_tokens", &self.restoration_tokens)
            .finish_non_exhaustive()
    }
}
