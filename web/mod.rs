/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The web surface: the engine contract, the session-owned wrapper around it,
//! and the events and decisions that cross the boundary.

mod bridge;
pub(crate) mod policy;

use url::Url;

pub use bridge::ScriptCall;

use crate::restoration::RestorationToken;
use crate::visit::{VisitAction, VisitId};

/// The embedded web-rendering engine.
///
/// Commands are fire-and-forget; progress comes back later through
/// [`Session::handle_engine_event`](crate::Session::handle_engine_event),
/// tagged with the [`VisitId`] the command carried.
pub trait WebEngine {
    /// URL of the currently displayed document, if any.
    fn url(&self) -> Option<Url>;

    /// Full page load.
    fn load(&mut self, request: LoadRequest);

    fn stop_loading(&mut self);

    /// Call a function exposed by the in-page adapter script.
    fn evaluate_script(&mut self, call: ScriptCall);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub visit: VisitId,
    pub url: Url,
    /// Set when arriving from a native-only screen, which has no live
    /// document to act as referrer.
    pub referer: Option<Url>,
}

/// Engine-to-session traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Progress for one visit. Dropped unless `visit` is still current.
    Visit { visit: VisitId, event: VisitEvent },
    /// The page asked for a navigation to `url`.
    ProposedVisit { url: Url, action: VisitAction },
    /// The loaded document can no longer be trusted (e.g. asset change).
    PageInvalidated,
    /// An adapter script call failed; in-page state is unknown.
    ScriptEvaluationFailed { message: String },
    /// The engine's content process died and took the document with it.
    ContentProcessTerminated,
}

/// Visit-scoped engine progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitEvent {
    /// Cold boot: the server redirected the main-frame load.
    ServerRedirect { url: Url },
    /// Cold boot: the main-frame load finished.
    NavigationFinished,
    /// Cold boot: the main-frame load failed before a response.
    NavigationFailed { message: String },
    /// Cold boot: the adapter script booted in the freshly loaded page.
    PageLoaded {
        restoration_token: Option<RestorationToken>,
    },
    /// Script-driven: the adapter accepted the visit.
    Started { has_cached_snapshot: bool },
    RequestStarted,
    RequestCompleted,
    /// Script-driven: the adapter reports `0` when the request never reached
    /// the server.
    RequestFailed { status: u16 },
    RequestFinished,
    Rendered,
    Completed {
        restoration_token: Option<RestorationToken>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationType {
    LinkActivated,
    FormSubmitted,
    FormResubmitted,
    BackForward,
    Reload,
    Other,
}

impl NavigationType {
    pub fn is_form_submission(self) -> bool {
        matches!(self, Self::FormSubmitted | Self::FormResubmitted)
    }
}

/// A navigation the engine proposes to perform on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationAction {
    pub url: Option<Url>,
    pub navigation_type: NavigationType,
    /// `false` for sub-frames and for navigations without a target frame.
    pub target_is_main_frame: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPolicy {
    Allow,
    Cancel,
}

/// A main-frame response arriving for a cold-boot load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationResponse {
    pub visit: VisitId,
    pub url: Url,
    /// `None` when the response is not HTTP.
    pub status: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePolicy {
    Allow,
    Cancel,
}

/// Engine commands a visit issues; applied in order by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EngineCommand {
    Load(LoadRequest),
    StopLoading,
    Script(ScriptCall),
}

/// Session-owned wrapper around the engine.
pub(crate) struct WebSurface {
    engine: Box<dyn WebEngine>,
    last_navigation_was_form_submission: bool,
}

impl WebSurface {
    pub(crate) fn new(engine: Box<dyn WebEngine>) -> Self {
        Self {
            engine,
            last_navigation_was_form_submission: false,
        }
    }

    pub(crate) fn url(&self) -> Option<Url> {
        self.engine.url()
    }

    pub(crate) fn last_navigation_was_form_submission(&self) -> bool {
        self.last_navigation_was_form_submission
    }

    pub(crate) fn record_navigation(&mut self, navigation_type: NavigationType) {
        self.last_navigation_was_form_submission = navigation_type.is_form_submission();
    }

    pub(crate) fn perform(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Load(request) => self.engine.load(request),
            EngineCommand::StopLoading => self.engine.stop_loading(),
            EngineCommand::Script(call) => self.engine.evaluate_script(call),
        }
    }
}
