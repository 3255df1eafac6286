/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! One attempt to move the displayed screen to a target visitable.
//!
//! A [`Visit`] never touches the engine or the host directly. Every transition
//! returns the [`VisitEffect`]s it produced, in order, and the session applies
//! them. That keeps the state machine testable on its own and leaves exactly
//! one place (the session) that decides whether a visit is still live.

mod cold_boot;
mod native;
mod script;
pub(crate) mod strategy;

use serde::{Deserialize, Serialize};
use url::Url;

pub use strategy::{StrategyInputs, VisitKind};

use crate::config::StatusRange;
use crate::error::VisitError;
use crate::restoration::RestorationToken;
use crate::visitable::VisitableRef;
use crate::web::{EngineCommand, ResponsePolicy, VisitEvent};

/// Generation number of a visit. Issued by the session, strictly increasing,
/// and echoed back by the engine on every visit-scoped event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisitId(u64);

impl VisitId {
    pub fn first() -> Self {
        Self(1)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for VisitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "visit#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitAction {
    /// Push.
    Advance,
    /// Pop or back gesture.
    Restore,
}

impl VisitAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Restore => "restore",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    Initialized,
    Started,
    Canceled,
    Failed,
    Completed,
}

impl VisitState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Canceled | Self::Failed | Self::Completed)
    }
}

/// Lifecycle output of a visit, applied in order by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum VisitEffect {
    WillStart,
    DidStart,
    RequestStarted,
    RequestFinished,
    WillLoadResponse,
    DidRender,
    /// The first cold boot produced a usable document.
    EngineInitialized,
    Completed,
    Failed(VisitError),
    FinishedWithPreprocessing,
    Redirected(Url),
    Engine(EngineCommand),
}

/// Work that has to wait until the native transition to the visitable has
/// finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DeferredStep {
    ChangeHistory,
    LoadCachedSnapshot,
    LoadResponse,
    Render,
    FinishRequest,
    Fail(VisitError),
    RenderNative,
}

pub struct Visit {
    id: VisitId,
    kind: VisitKind,
    visitable: VisitableRef,
    action: VisitAction,
    state: VisitState,
    location: Url,
    referer: Option<Url>,
    restoration_token: Option<RestorationToken>,
    has_cached_snapshot: bool,
    request_started: bool,
    request_finished: bool,
    navigation_completed: bool,
    deferred: Vec<DeferredStep>,
}

impl Visit {
    pub(crate) fn new(
        id: VisitId,
        kind: VisitKind,
        visitable: VisitableRef,
        action: VisitAction,
        location: Url,
    ) -> Self {
        Self {
            id,
            kind,
            visitable,
            action,
            state: VisitState::Initialized,
            location,
            referer: None,
            restoration_token: None,
            has_cached_snapshot: false,
            request_started: false,
            request_finished: false,
            navigation_completed: false,
            deferred: Vec::new(),
        }
    }

    pub(crate) fn with_referer(mut self, referer: Option<Url>) -> Self {
        self.referer = referer;
        self
    }

    pub(crate) fn with_restoration_token(mut self, token: Option<RestorationToken>) -> Self {
        self.restoration_token = token;
        self
    }

    pub fn id(&self) -> VisitId {
        self.id
    }

    pub fn kind(&self) -> VisitKind {
        self.kind
    }

    pub fn visitable(&self) -> &VisitableRef {
        &self.visitable
    }

    pub fn action(&self) -> VisitAction {
        self.action
    }

    pub fn state(&self) -> VisitState {
        self.state
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn referer(&self) -> Option<&Url> {
        self.referer.as_ref()
    }

    pub fn restoration_token(&self) -> Option<&RestorationToken> {
        self.restoration_token.as_ref()
    }

    pub fn has_cached_snapshot(&self) -> bool {
        self.has_cached_snapshot
    }

    pub fn navigation_completed(&self) -> bool {
        self.navigation_completed
    }

    pub(crate) fn set_location(&mut self, location: Url) {
        self.location = location;
    }

    pub(crate) fn start(&mut self) -> Vec<VisitEffect> {
        if self.state != VisitState::Initialized {
            return Vec::new();
        }
        self.state = VisitState::Started;
        let mut effects = vec![VisitEffect::WillStart];
        effects.extend(match self.kind {
            VisitKind::ColdBoot => cold_boot::start(self),
            VisitKind::ScriptDriven => script::start(self),
            VisitKind::NativeOnly => native::start(self),
        });
        effects
    }

    /// Stop the visit. Anything the engine still delivers for it afterwards is
    /// dropped by the session.
    pub(crate) fn cancel(&mut self) -> Vec<VisitEffect> {
        match self.state {
            VisitState::Initialized => {
                self.state = VisitState::Canceled;
                Vec::new()
            },
            VisitState::Started => {
                self.state = VisitState::Canceled;
                self.deferred.clear();
                let mut effects = match self.kind {
                    VisitKind::ColdBoot => cold_boot::cancel(self),
                    VisitKind::ScriptDriven => script::cancel(self),
                    VisitKind::NativeOnly => Vec::new(),
                };
                effects.extend(self.finish_request());
                effects
            },
            VisitState::Canceled | VisitState::Failed | VisitState::Completed => Vec::new(),
        }
    }

    /// The native transition to the visitable finished; flush deferred steps.
    pub(crate) fn complete_navigation(&mut self) -> Vec<VisitEffect> {
        if self.state != VisitState::Started || self.navigation_completed {
            return Vec::new();
        }
        self.navigation_completed = true;
        let mut effects = Vec::new();
        for step in std::mem::take(&mut self.deferred) {
            if self.state != VisitState::Started {
                break;
            }
            effects.extend(self.run_step(step));
        }
        effects
    }

    pub(crate) fn handle_event(&mut self, event: VisitEvent) -> Vec<VisitEffect> {
        if self.state != VisitState::Started {
            log::debug!("{} ignoring {event:?} in state {:?}", self.id, self.state);
            return Vec::new();
        }
        match self.kind {
            VisitKind::ColdBoot => cold_boot::handle_event(self, event),
            VisitKind::ScriptDriven => script::handle_event(self, event),
            VisitKind::NativeOnly => {
                log::debug!("{} native-only visit ignores {event:?}", self.id);
                Vec::new()
            },
        }
    }

    /// Classify a main-frame response for a cold-boot load.
    pub(crate) fn decide_response(
        &mut self,
        status: Option<u16>,
        success: StatusRange,
    ) -> (ResponsePolicy, Vec<VisitEffect>) {
        if self.state != VisitState::Started || self.kind != VisitKind::ColdBoot {
            return (ResponsePolicy::Allow, Vec::new());
        }
        cold_boot::decide_response(self, status, success)
    }

    /// Finish without a request: a host hook took over the navigation.
    pub(crate) fn finish_with_preprocessing(&mut self) -> Vec<VisitEffect> {
        if self.state != VisitState::Started {
            return Vec::new();
        }
        self.state = VisitState::Completed;
        self.deferred.clear();
        let mut effects = self.finish_request();
        effects.push(VisitEffect::FinishedWithPreprocessing);
        effects
    }

    fn complete(&mut self) -> Vec<VisitEffect> {
        if self.state != VisitState::Started {
            return Vec::new();
        }
        self.state = VisitState::Completed;
        let mut effects = Vec::new();
        if self.kind == VisitKind::ColdBoot {
            effects.push(VisitEffect::EngineInitialized);
        }
        effects.push(VisitEffect::Completed);
        effects
    }

    fn fail(&mut self, error: VisitError) -> Vec<VisitEffect> {
        if self.state != VisitState::Started {
            return Vec::new();
        }
        self.state = VisitState::Failed;
        self.deferred.clear();
        let mut effects = vec![VisitEffect::Failed(error)];
        effects.extend(self.finish_request());
        effects
    }

    fn start_request(&mut self) -> Vec<VisitEffect> {
        if self.request_started {
            return Vec::new();
        }
        self.request_started = true;
        vec![VisitEffect::RequestStarted]
    }

    fn finish_request(&mut self) -> Vec<VisitEffect> {
        if !self.request_started || self.request_finished {
            return Vec::new();
        }
        self.request_finished = true;
        vec![VisitEffect::RequestFinished]
    }

    fn after_navigation_completion(&mut self, step: DeferredStep) -> Vec<VisitEffect> {
        if self.navigation_completed {
            self.run_step(step)
        } else {
            self.deferred.push(step);
            Vec::new()
        }
    }

    fn run_step(&mut self, step: DeferredStep) -> Vec<VisitEffect> {
        let id = self.id;
        match step {
            DeferredStep::ChangeHistory => script::change_history(id),
            DeferredStep::LoadCachedSnapshot => script::load_cached_snapshot(id),
            DeferredStep::LoadResponse => script::load_response(id),
            DeferredStep::Render => vec![VisitEffect::DidRender],
            DeferredStep::FinishRequest => self.finish_request(),
            DeferredStep::Fail(error) => self.fail(error),
            DeferredStep::RenderNative => {
                let mut effects = vec![VisitEffect::DidRender];
                effects.extend(self.complete());
                effects
            },
        }
    }
}

impl std::fmt::Debug for Visit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visit")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("visitable", &self.visitable.view_controller_id())
            .field("action", &self.action)
            .field("state", &self.state)
            .field("location", &self.location.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) fn effect_label(effect: &VisitEffect) -> &'static str {
    match effect {
        VisitEffect::WillStart => "will-start",
        VisitEffect::DidStart => "did-start",
        VisitEffect::RequestStarted => "request-start",
        VisitEffect::RequestFinished => "request-finish",
        VisitEffect::WillLoadResponse => "will-load-response",
        VisitEffect::DidRender => "render",
        VisitEffect::EngineInitialized => "engine-initialized",
        VisitEffect::Completed => "complete",
        VisitEffect::Failed(_) => "fail",
        VisitEffect::FinishedWithPreprocessing => "finish-with-preprocessing",
        VisitEffect::Redirected(_) => "redirect",
        VisitEffect::Engine(EngineCommand::Load(_)) => "engine:load",
        VisitEffect::Engine(EngineCommand::StopLoading) => "engine:stop",
        VisitEffect::Engine(EngineCommand::Script(call)) => call.function,
    }
}

#[cfg(test)]
pub(crate) fn lifecycle_labels(effects: &[VisitEffect]) -> Vec<&'static str> {
    effects
        .iter()
        .filter(|effect| !matches!(effect, VisitEffect::Engine(_)))
        .map(effect_label)
        .collect()
}

#[cfg(test)]
pub(crate) fn test_visit(kind: VisitKind) -> Visit {
    let url = Url::parse("https://example.com/a").expect("valid url");
    let visitable: VisitableRef = crate::test_utils::TestVisitable::web(url.as_str());
    Visit::new(VisitId::first(), kind, visitable, VisitAction::Advance, url)
}
