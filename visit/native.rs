/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Visits to screens that have no web content.
//!
//! Nothing to load, so the visit reports itself started with a snapshot
//! (keeping the activity indicator hidden) and renders as soon as the native
//! transition has finished.

use super::{DeferredStep, Visit, VisitEffect};

pub(super) fn start(visit: &mut Visit) -> Vec<VisitEffect> {
    visit.has_cached_snapshot = true;
    let mut effects = vec![VisitEffect::DidStart];
    effects.extend(visit.after_navigation_completion(DeferredStep::RenderNative));
    effects
}
