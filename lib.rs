/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Visit orchestration between a native navigation shell and an embedded
//! web surface.
//!
//! A [`Session`] owns the web surface and turns navigation requests (native
//! pushes, links proposed by the page, back gestures) into exactly one
//! in-flight [`visit::Visit`]. The visit picks a strategy (full cold boot,
//! in-page script-driven transition, or native-only), and the session maps its
//! lifecycle onto screenshot, activity-indicator and activation calls on the
//! host's [`Visitable`] screens.
//!
//! Everything here is single-threaded. Progress from the web engine arrives as
//! [`EngineEvent`]s tagged with the [`VisitId`] that produced them; events for
//! a visit that is no longer current are dropped.

pub mod config;
pub mod delegate;
pub mod diagnostics;
pub mod error;
pub mod restoration;
pub mod session;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod visit;
pub mod visitable;
pub mod web;

pub use config::{SessionConfig, StatusRange};
pub use delegate::SessionDelegate;
pub use diagnostics::{DiagnosticEvent, DiagnosticTally};
pub use error::{ConfigError, VisitError};
pub use restoration::RestorationToken;
pub use session::Session;
pub use visit::{Visit, VisitAction, VisitId, VisitKind, VisitState};
pub use visitable::{ViewAppearance, ViewControllerId, Visitable, VisitableRef};
pub use web::{
    EngineEvent, LoadRequest, NavigationAction, NavigationPolicy, NavigationResponse,
    NavigationType, ResponsePolicy, ScriptCall, VisitEvent, WebEngine,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
