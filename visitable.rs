/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The host-side screen contract.

use std::rc::Rc;

use url::Url;
use uuid::Uuid;

/// Stable identity of the native view controller that hosts a [`Visitable`].
///
/// Two visitables are the same screen exactly when their ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewControllerId(Uuid);

impl ViewControllerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ViewControllerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ViewControllerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One navigable unit of native UI.
///
/// Implemented by host screens and consumed, never owned, by the session.
/// Methods take `&self`; screens that need mutation use interior mutability,
/// matching the single-threaded UI loop they live on. None of these methods
/// may call back into the [`Session`](crate::Session) synchronously.
pub trait Visitable {
    fn view_controller_id(&self) -> ViewControllerId;

    /// `None` marks the screen as not navigable; visit requests for it are
    /// dropped.
    fn visitable_url(&self) -> Option<Url>;

    /// Native-only screens return `false` and never receive the web surface.
    fn is_web_backed(&self) -> bool {
        true
    }

    /// Ask for a full page load the next time this screen is visited.
    fn requires_cold_boot(&self) -> bool {
        false
    }

    fn update_visitable_screenshot(&self);
    fn show_visitable_screenshot(&self);
    fn hide_visitable_screenshot(&self);
    fn clear_visitable_screenshot(&self);

    fn show_visitable_activity_indicator(&self);
    fn hide_visitable_activity_indicator(&self);

    /// Embed the session's web surface into this screen.
    fn activate_visitable_web_view(&self);
    fn deactivate_visitable_web_view(&self);

    fn visitable_did_render(&self);

    fn visitable_will_refresh(&self) {}
    fn visitable_did_refresh(&self) {}

    /// The page changed its URL without a new visit (hash change, pushState).
    fn visitable_url_did_change(&self, _url: &Url) {}
}

pub type VisitableRef = Rc<dyn Visitable>;

pub(crate) fn same_visitable(a: &dyn Visitable, b: &dyn Visitable) -> bool {
    a.view_controller_id() == b.view_controller_id()
}

/// Transition context delivered with view appearance callbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewAppearance {
    /// The view controller is being inserted into its container, either by a
    /// push or by re-insertion after an aborted back gesture.
    pub moving_to_parent: bool,
    /// An interactive gesture still drives the transition. The session ignores
    /// such callbacks; the host re-delivers once the interaction resolves.
    pub interactive_transition: bool,
}

impl ViewAppearance {
    pub fn inserted() -> Self {
        Self {
            moving_to_parent: true,
            interactive_transition: false,
        }
    }

    pub fn revealed() -> Self {
        Self::default()
    }

    pub fn interactive() -> Self {
        Self {
            moving_to_parent: false,
            interactive_transition: true,
        }
    }
}
