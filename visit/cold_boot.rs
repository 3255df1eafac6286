/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Full page load through the engine.

use super::{Visit, VisitEffect};
use crate::config::StatusRange;
use crate::error::VisitError;
use crate::web::{EngineCommand, LoadRequest, ResponsePolicy, VisitEvent};

pub(super) fn start(visit: &mut Visit) -> Vec<VisitEffect> {
    let request = LoadRequest {
        visit: visit.id,
        url: visit.location.clone(),
        referer: visit.referer.clone(),
    };
    let mut effects = vec![
        VisitEffect::Engine(EngineCommand::Load(request)),
        VisitEffect::DidStart,
    ];
    effects.extend(visit.start_request());
    effects
}

pub(super) fn cancel(_visit: &mut Visit) -> Vec<VisitEffect> {
    vec![VisitEffect::Engine(EngineCommand::StopLoading)]
}

pub(super) fn decide_response(
    visit: &mut Visit,
    status: Option<u16>,
    success: StatusRange,
) -> (ResponsePolicy, Vec<VisitEffect>) {
    match status {
        Some(status) if success.contains(status) => {
            (ResponsePolicy::Allow, vec![VisitEffect::WillLoadResponse])
        },
        Some(status) => (
            ResponsePolicy::Cancel,
            visit.fail(VisitError::HttpFailure { status }),
        ),
        None => (
            ResponsePolicy::Cancel,
            visit.fail(VisitError::NetworkFailure {
                message: "response carried no HTTP status".to_string(),
            }),
        ),
    }
}

pub(super) fn handle_event(visit: &mut Visit, event: VisitEvent) -> Vec<VisitEffect> {
    match event {
        VisitEvent::ServerRedirect { url } => {
            visit.location = url.clone();
            vec![VisitEffect::Redirected(url)]
        },
        VisitEvent::NavigationFinished => visit.finish_request(),
        VisitEvent::NavigationFailed { message } => {
            visit.fail(VisitError::NetworkFailure { message })
        },
        VisitEvent::PageLoaded { restoration_token } => {
            visit.restoration_token = restoration_token;
            let mut effects = vec![VisitEffect::DidRender];
            effects.extend(visit.complete());
            effects
        },
        other => {
            log::debug!("{} cold boot ignores {other:?}", visit.id);
            Vec::new()
        },
    }
}
