/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The host application's side of the session.

use url::Url;

use crate::error::VisitError;
use crate::visit::VisitAction;
use crate::visitable::VisitableRef;
use crate::web::NavigationResponse;

/// Callbacks from a [`Session`](crate::Session) to the host.
///
/// Three methods are required. Everything else has a default that leaves the
/// session's own behaviour unchanged: URLs are never local, the preprocess and
/// postprocess hooks decline, and notifications are ignored.
///
/// Implementations must not call back into the session synchronously; queue
/// the work and deliver it once the callback returns.
pub trait SessionDelegate {
    /// The page (or a local link) asked for a navigation the host should
    /// route, usually by pushing a new screen and calling
    /// [`Session::visit`](crate::Session::visit).
    fn session_did_propose_visit(&self, url: &Url, action: VisitAction);

    fn session_did_fail_request(&self, visitable: &VisitableRef, error: &VisitError);

    fn session_open_external_url(&self, url: &Url);

    /// Local URLs are handed back to the host as visit proposals instead of
    /// being opened externally.
    fn session_is_local_url(&self, _url: &Url) -> bool {
        false
    }

    /// Return `true` to take over the navigation to `url`. The engine's own
    /// navigation is cancelled and the current visit finishes without a
    /// request.
    fn session_preprocess_url(&self, _url: &Url) -> bool {
        false
    }

    /// Return `true` to consume a cold-boot response. The engine's load is
    /// cancelled and the visit finishes without rendering.
    fn session_postprocess_response(
        &self,
        _visitable: &VisitableRef,
        _response: &NavigationResponse,
    ) -> bool {
        false
    }

    fn session_did_update_url(&self, _visitable: &VisitableRef, _url: &Url) {}

    fn session_did_redirect(&self, _visitable: &VisitableRef, _url: &Url) {}

    /// The engine produced its first usable document. Fires once per session.
    fn session_did_load_web_view(&self) {}

    fn session_did_start_request(&self) {}

    fn session_did_finish_request(&self) {}
}
