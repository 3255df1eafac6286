/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Decision function for navigations the engine proposes on its own.
//!
//! Precedence is fixed: form submission, preprocess intercept, local URL,
//! externally openable URL, main-frame reload, then the default. Moving a rule
//! changes which one wins for link activations that match several.

use url::Url;

use super::{NavigationAction, NavigationPolicy, NavigationType};

/// What the session does after the decision has been delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NavigationFollowUp {
    /// Finish the current visit without a request.
    FinishWithPreprocessing,
    /// Hand the URL back to the host as an `Advance` visit.
    ProposeVisit(Url),
    OpenExternal(Url),
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NavigationOutcome {
    pub(crate) policy: NavigationPolicy,
    pub(crate) follow_up: Option<NavigationFollowUp>,
}

impl NavigationOutcome {
    fn allow() -> Self {
        Self {
            policy: NavigationPolicy::Allow,
            follow_up: None,
        }
    }

    fn cancel(follow_up: Option<NavigationFollowUp>) -> Self {
        Self {
            policy: NavigationPolicy::Cancel,
            follow_up,
        }
    }
}

/// Classify one proposed navigation. `is_local` and `preprocess` are the
/// host's hooks and are consulted only when their rule is reached.
pub(crate) fn classify_navigation(
    action: &NavigationAction,
    is_local: impl FnOnce(&Url) -> bool,
    preprocess: impl FnOnce(&Url) -> bool,
) -> NavigationOutcome {
    let navigation_type = action.navigation_type;
    if navigation_type.is_form_submission() {
        return NavigationOutcome::allow();
    }

    let link_activated = navigation_type == NavigationType::LinkActivated;
    let main_frame = action.target_is_main_frame;
    let intercepted_kind = link_activated || main_frame;

    if let Some(url) = &action.url {
        if intercepted_kind && preprocess(url) {
            return NavigationOutcome::cancel(Some(NavigationFollowUp::FinishWithPreprocessing));
        }
        if intercepted_kind && is_local(url) {
            return NavigationOutcome::cancel(Some(NavigationFollowUp::ProposeVisit(url.clone())));
        }
        if link_activated || (main_frame && navigation_type == NavigationType::Other) {
            return NavigationOutcome::cancel(Some(NavigationFollowUp::OpenExternal(url.clone())));
        }
    }

    if main_frame && navigation_type == NavigationType::Reload {
        return NavigationOutcome::cancel(Some(NavigationFollowUp::Reload));
    }
    if intercepted_kind {
        return NavigationOutcome::cancel(None);
    }
    NavigationOutcome::allow()
}

/// While a cold boot's own load is in flight the engine asks about that
/// load too. Only link activations leave the page; everything else belongs to
/// the load.
pub(crate) fn classify_cold_boot_navigation(action: &NavigationAction) -> NavigationOutcome {
    match (&action.url, action.navigation_type) {
        (Some(url), NavigationType::LinkActivated) => {
            NavigationOutcome::cancel(Some(NavigationFollowUp::OpenExternal(url.clone())))
        },
        (None, NavigationType::LinkActivated) => NavigationOutcome::cancel(None),
        _ => NavigationOutcome::allow(),
    }
}
