/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Recording doubles for the host screens, the engine and the delegate, plus
//! a [`TestHarness`] wiring them to a [`Session`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crossbeam_channel::Sender;
use url::Url;

use crate::config::SessionConfig;
use crate::delegate::SessionDelegate;
use crate::diagnostics::DiagnosticEvent;
use crate::error::VisitError;
use crate::session::Session;
use crate::visit::{VisitAction, VisitId};
use crate::visitable::{ViewAppearance, ViewControllerId, Visitable, VisitableRef};
use crate::web::{LoadRequest, NavigationResponse, ScriptCall, VisitEvent, WebEngine};

fn parse(url: &str) -> Url {
    Url::parse(url).expect("test URL should parse")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitableCall {
    UpdateScreenshot,
    ShowScreenshot,
    HideScreenshot,
    ClearScreenshot,
    ShowActivityIndicator,
    HideActivityIndicator,
    ActivateWebView,
    DeactivateWebView,
    DidRender,
    WillRefresh,
    DidRefresh,
    UrlDidChange(Url),
}

/// A host screen that records every call the session makes on it.
#[derive(Debug)]
pub struct TestVisitable {
    id: ViewControllerId,
    url: RefCell<Option<Url>>,
    web_backed: bool,
    requires_cold_boot: Cell<bool>,
    calls: RefCell<Vec<VisitableCall>>,
}

impl TestVisitable {
    fn build(id: ViewControllerId, url: Option<Url>, web_backed: bool) -> Rc<Self> {
        Rc::new(Self {
            id,
            url: RefCell::new(url),
            web_backed,
            requires_cold_boot: Cell::new(false),
            calls: RefCell::new(Vec::new()),
        })
    }

    pub fn web(url: &str) -> Rc<Self> {
        Self::build(ViewControllerId::new(), Some(parse(url)), true)
    }

    pub fn web_with_id(url: &str, id: ViewControllerId) -> Rc<Self> {
        Self::build(id, Some(parse(url)), true)
    }

    pub fn native(url: &str) -> Rc<Self> {
        Self::build(ViewControllerId::new(), Some(parse(url)), false)
    }

    pub fn without_url() -> Rc<Self> {
        Self::build(ViewControllerId::new(), None, true)
    }

    pub fn requiring_cold_boot(url: &str) -> Rc<Self> {
        let visitable = Self::web(url);
        visitable.requires_cold_boot.set(true);
        visitable
    }

    pub fn handle(self: &Rc<Self>) -> VisitableRef {
        Rc::clone(self) as VisitableRef
    }

    pub fn id(&self) -> ViewControllerId {
        self.id
    }

    pub fn url(&self) -> Url {
        self.url
            .borrow()
            .clone()
            .expect("test visitable should have a URL")
    }

    /// Make the screen non-navigable, as a host does once its content is gone.
    pub fn clear_url(&self) {
        *self.url.borrow_mut() = None;
    }

    pub fn set_requires_cold_boot(&self, requires: bool) {
        self.requires_cold_boot.set(requires);
    }

    pub fn calls(&self) -> Vec<VisitableCall> {
        self.calls.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<VisitableCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    fn record(&self, call: VisitableCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Visitable for TestVisitable {
    fn view_controller_id(&self) -> ViewControllerId {
        self.id
    }

    fn visitable_url(&self) -> Option<Url> {
        self.url.borrow().clone()
    }

    fn is_web_backed(&self) -> bool {
        self.web_backed
    }

    fn requires_cold_boot(&self) -> bool {
        self.requires_cold_boot.get()
    }

    fn update_visitable_screenshot(&self) {
        self.record(VisitableCall::UpdateScreenshot);
    }

    fn show_visitable_screenshot(&self) {
        self.record(VisitableCall::ShowScreenshot);
    }

    fn hide_visitable_screenshot(&self) {
        self.record(VisitableCall::HideScreenshot);
    }

    fn clear_visitable_screenshot(&self) {
        self.record(VisitableCall::ClearScreenshot);
    }

    fn show_visitable_activity_indicator(&self) {
        self.record(VisitableCall::ShowActivityIndicator);
    }

    fn hide_visitable_activity_indicator(&self) {
        self.record(VisitableCall::HideActivityIndicator);
    }

    fn activate_visitable_web_view(&self) {
        self.record(VisitableCall::ActivateWebView);
    }

    fn deactivate_visitable_web_view(&self) {
        self.record(VisitableCall::DeactivateWebView);
    }

    fn visitable_did_render(&self) {
        self.record(VisitableCall::DidRender);
    }

    fn visitable_will_refresh(&self) {
        self.record(VisitableCall::WillRefresh);
    }

    fn visitable_did_refresh(&self) {
        self.record(VisitableCall::DidRefresh);
    }

    fn visitable_url_did_change(&self, url: &Url) {
        *self.url.borrow_mut() = Some(url.clone());
        self.record(VisitableCall::UrlDidChange(url.clone()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Load(LoadRequest),
    StopLoading,
    Script(ScriptCall),
}

#[derive(Debug, Default)]
struct TestEngineState {
    url: Option<Url>,
    calls: Vec<EngineCall>,
}

/// Engine double. Clones share one call log, so a test can keep a handle
/// after boxing one into the session.
#[derive(Debug, Clone, Default)]
pub struct TestEngine {
    state: Rc<RefCell<TestEngineState>>,
}

impl TestEngine {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.borrow().calls.clone()
    }

    pub fn take_calls(&self) -> Vec<EngineCall> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    /// Move the displayed document without a visit, as a hash change would.
    pub fn set_url(&self, url: Option<Url>) {
        self.state.borrow_mut().url = url;
    }

    pub fn script_calls(&self) -> Vec<ScriptCall> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::Script(script) => Some(script),
                _ => None,
            })
            .collect()
    }
}

impl WebEngine for TestEngine {
    fn url(&self) -> Option<Url> {
        self.state.borrow().url.clone()
    }

    fn load(&mut self, request: LoadRequest) {
        let mut state = self.state.borrow_mut();
        state.url = Some(request.url.clone());
        state.calls.push(EngineCall::Load(request));
    }

    fn stop_loading(&mut self) {
        self.state.borrow_mut().calls.push(EngineCall::StopLoading);
    }

    fn evaluate_script(&mut self, call: ScriptCall) {
        let mut state = self.state.borrow_mut();
        // The adapter pushes the new location as soon as it accepts a visit.
        if call.function.starts_with("webView.visitLocation")
            && let Some(location) = call.arguments.get(1).and_then(|value| value.as_str())
            && let Ok(url) = Url::parse(location)
        {
            state.url = Some(url);
        }
        state.calls.push(EngineCall::Script(call));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegateCall {
    ProposeVisit {
        url: Url,
        action: VisitAction,
    },
    FailRequest {
        visitable: ViewControllerId,
        error: VisitError,
    },
    OpenExternal(Url),
    UpdateUrl {
        visitable: ViewControllerId,
        url: Url,
    },
    Redirect {
        visitable: ViewControllerId,
        url: Url,
    },
    LoadWebView,
    StartRequest,
    FinishRequest,
}

/// Host delegate that records notifications and answers the hooks from
/// configurable tables.
#[derive(Debug, Default)]
pub struct RecordingDelegate {
    calls: RefCell<Vec<DelegateCall>>,
    local_prefixes: RefCell<Vec<String>>,
    intercepted: RefCell<Vec<Url>>,
    postprocess_responses: Cell<bool>,
}

impl RecordingDelegate {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn add_local_prefix(&self, prefix: &str) {
        self.local_prefixes.borrow_mut().push(prefix.to_string());
    }

    pub fn intercept_url(&self, url: Url) {
        self.intercepted.borrow_mut().push(url);
    }

    pub fn set_postprocess_responses(&self, consume: bool) {
        self.postprocess_responses.set(consume);
    }

    pub fn calls(&self) -> Vec<DelegateCall> {
        self.calls.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<DelegateCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    fn record(&self, call: DelegateCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl SessionDelegate for RecordingDelegate {
    fn session_did_propose_visit(&self, url: &Url, action: VisitAction) {
        self.record(DelegateCall::ProposeVisit {
            url: url.clone(),
            action,
        });
    }

    fn session_did_fail_request(&self, visitable: &VisitableRef, error: &VisitError) {
        self.record(DelegateCall::FailRequest {
            visitable: visitable.view_controller_id(),
            error: error.clone(),
        });
    }

    fn session_open_external_url(&self, url: &Url) {
        self.record(DelegateCall::OpenExternal(url.clone()));
    }

    fn session_is_local_url(&self, url: &Url) -> bool {
        self.local_prefixes
            .borrow()
            .iter()
            .any(|prefix| url.as_str().starts_with(prefix.as_str()))
    }

    fn session_preprocess_url(&self, url: &Url) -> bool {
        self.intercepted.borrow().contains(url)
    }

    fn session_postprocess_response(
        &self,
        _visitable: &VisitableRef,
        _response: &NavigationResponse,
    ) -> bool {
        self.postprocess_responses.get()
    }

    fn session_did_update_url(&self, visitable: &VisitableRef, url: &Url) {
        self.record(DelegateCall::UpdateUrl {
            visitable: visitable.view_controller_id(),
            url: url.clone(),
        });
    }

    fn session_did_redirect(&self, visitable: &VisitableRef, url: &Url) {
        self.record(DelegateCall::Redirect {
            visitable: visitable.view_controller_id(),
            url: url.clone(),
        });
    }

    fn session_did_load_web_view(&self) {
        self.record(DelegateCall::LoadWebView);
    }

    fn session_did_start_request(&self) {
        self.record(DelegateCall::StartRequest);
    }

    fn session_did_finish_request(&self) {
        self.record(DelegateCall::FinishRequest);
    }
}

/// A session wired to a [`TestEngine`] and a [`RecordingDelegate`].
pub struct TestHarness {
    pub session: Session,
    pub engine: TestEngine,
    pub delegate: Rc<RecordingDelegate>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let engine = TestEngine::default();
        let delegate = RecordingDelegate::new();
        let session = Session::with_config(
            Box::new(engine.clone()),
            Rc::clone(&delegate) as Rc<dyn SessionDelegate>,
            config,
        );
        Self {
            session,
            engine,
            delegate,
        }
    }

    pub fn with_diagnostics(self, tx: Sender<DiagnosticEvent>) -> Self {
        Self {
            session: self.session.with_diagnostics(tx),
            engine: self.engine,
            delegate: self.delegate,
        }
    }

    pub fn current_id(&self) -> VisitId {
        self.session
            .current_visit()
            .map(|visit| visit.id())
            .expect("harness should have a current visit")
    }

    /// Deliver a visit-scoped engine event tagged with `visit`.
    pub fn send(&mut self, visit: VisitId, event: VisitEvent) {
        self.session
            .handle_engine_event(crate::web::EngineEvent::Visit { visit, event });
    }

    pub fn send_current(&mut self, event: VisitEvent) {
        let visit = self.current_id();
        self.send(visit, event);
    }

    /// Drive the current cold-boot visit through a 200 response to a loaded
    /// page.
    pub fn finish_cold_boot(&mut self, restoration_token: Option<&str>) {
        let visit = self.current_id();
        let url = self
            .session
            .current_visit()
            .map(|current| current.location().clone())
            .expect("harness should have a current visit");
        self.session.decide_policy_for_response(
            NavigationResponse {
                visit,
                url,
                status: Some(200),
            },
            |_| {},
        );
        self.send(visit, VisitEvent::NavigationFinished);
        self.send(
            visit,
            VisitEvent::PageLoaded {
                restoration_token: restoration_token.map(Into::into),
            },
        );
    }

    /// Visit `visitable`, finish its cold boot and let its view appear.
    pub fn boot(&mut self, visitable: &Rc<TestVisitable>) -> VisitId {
        let handle = visitable.handle();
        self.session.visit(&handle);
        let visit = self.current_id();
        self.finish_cold_boot(None);
        self.session
            .visitable_view_did_appear(&handle, ViewAppearance::revealed());
        visit
    }

    /// Visit a native-only screen and let its view appear, which renders it.
    pub fn boot_native(&mut self, visitable: &Rc<TestVisitable>) -> VisitId {
        let handle = visitable.handle();
        self.session.visit(&handle);
        let visit = self.current_id();
        self.session
            .visitable_view_did_appear(&handle, ViewAppearance::revealed());
        visit
    }

    /// Drive the current script-driven visit to completion, letting the view
    /// appear halfway through as a push would.
    pub fn finish_script_visit(&mut self, visitable: &Rc<TestVisitable>, restoration_token: Option<&str>) {
        let visit = self.current_id();
        self.send(visit, VisitEvent::Started { has_cached_snapshot: false });
        self.send(visit, VisitEvent::RequestStarted);
        self.session
            .visitable_view_did_appear(&visitable.handle(), ViewAppearance::revealed());
        self.send(visit, VisitEvent::RequestCompleted);
        self.send(visit, VisitEvent::Rendered);
        self.send(visit, VisitEvent::RequestFinished);
        self.send(
            visit,
            VisitEvent::Completed {
                restoration_token: restoration_token.map(Into::into),
            },
        );
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
