/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! In-page transition driven through the adapter script.

use super::{DeferredStep, Visit, VisitEffect, VisitId};
use crate::error::VisitError;
use crate::web::{EngineCommand, ScriptCall, VisitEvent};

fn script(call: ScriptCall) -> VisitEffect {
    VisitEffect::Engine(EngineCommand::Script(call))
}

pub(super) fn start(visit: &mut Visit) -> Vec<VisitEffect> {
    vec![script(ScriptCall::visit_location(
        visit.id,
        &visit.location,
        visit.action,
        visit.restoration_token.as_ref(),
    ))]
}

pub(super) fn cancel(visit: &mut Visit) -> Vec<VisitEffect> {
    vec![script(ScriptCall::cancel_visit(visit.id))]
}

pub(super) fn change_history(id: VisitId) -> Vec<VisitEffect> {
    vec![script(ScriptCall::change_history(id))]
}

pub(super) fn load_cached_snapshot(id: VisitId) -> Vec<VisitEffect> {
    vec![script(ScriptCall::load_cached_snapshot(id))]
}

pub(super) fn load_response(id: VisitId) -> Vec<VisitEffect> {
    vec![
        VisitEffect::WillLoadResponse,
        script(ScriptCall::load_response(id)),
    ]
}

pub(super) fn handle_event(visit: &mut Visit, event: VisitEvent) -> Vec<VisitEffect> {
    match event {
        VisitEvent::Started {
            has_cached_snapshot,
        } => {
            visit.has_cached_snapshot = has_cached_snapshot;
            let mut effects = vec![
                VisitEffect::DidStart,
                script(ScriptCall::issue_request(visit.id)),
            ];
            effects.extend(visit.after_navigation_completion(DeferredStep::ChangeHistory));
            effects.extend(visit.after_navigation_completion(DeferredStep::LoadCachedSnapshot));
            effects
        },
        VisitEvent::RequestStarted => visit.start_request(),
        VisitEvent::RequestCompleted => visit.after_navigation_completion(DeferredStep::LoadResponse),
        VisitEvent::RequestFailed { status } => visit.after_navigation_completion(
            DeferredStep::Fail(VisitError::from_adapter_status(status)),
        ),
        VisitEvent::Rendered => visit.after_navigation_completion(DeferredStep::Render),
        VisitEvent::RequestFinished => visit.after_navigation_completion(DeferredStep::FinishRequest),
        VisitEvent::Completed { restoration_token } => {
            visit.restoration_token = restoration_token;
            visit.complete()
        },
        other => {
            log::debug!("{} script-driven visit ignores {other:?}", visit.id);
            Vec::new()
        },
    }
}
