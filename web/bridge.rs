/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Calls into the in-page adapter script.

use serde_json::{Value, json};
use url::Url;

use crate::restoration::RestorationToken;
use crate::visit::{VisitAction, VisitId};

const VISIT_LOCATION: &str = "webView.visitLocationWithActionAndRestorationIdentifier";
const ISSUE_REQUEST: &str = "webView.issueRequestForVisitWithIdentifier";
const CHANGE_HISTORY: &str = "webView.changeHistoryForVisitWithIdentifier";
const LOAD_CACHED_SNAPSHOT: &str = "webView.loadCachedSnapshotForVisitWithIdentifier";
const LOAD_RESPONSE: &str = "webView.loadResponseForVisitWithIdentifier";
const CANCEL_VISIT: &str = "webView.cancelVisitWithIdentifier";

/// One adapter function call with JSON arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCall {
    pub function: &'static str,
    pub arguments: Vec<Value>,
}

impl ScriptCall {
    pub(crate) fn visit_location(
        visit: VisitId,
        url: &Url,
        action: VisitAction,
        restoration_token: Option<&RestorationToken>,
    ) -> Self {
        Self {
            function: VISIT_LOCATION,
            arguments: vec![
                json!(visit.get()),
                json!(url.as_str()),
                json!(action.as_str()),
                restoration_token.map_or(Value::Null, |token| json!(token.as_str())),
            ],
        }
    }

    pub(crate) fn issue_request(visit: VisitId) -> Self {
        Self::for_visit(ISSUE_REQUEST, visit)
    }

    pub(crate) fn change_history(visit: VisitId) -> Self {
        Self::for_visit(CHANGE_HISTORY, visit)
    }

    pub(crate) fn load_cached_snapshot(visit: VisitId) -> Self {
        Self::for_visit(LOAD_CACHED_SNAPSHOT, visit)
    }

    pub(crate) fn load_response(visit: VisitId) -> Self {
        Self::for_visit(LOAD_RESPONSE, visit)
    }

    pub(crate) fn cancel_visit(visit: VisitId) -> Self {
        Self::for_visit(CANCEL_VISIT, visit)
    }

    fn for_visit(function: &'static str, visit: VisitId) -> Self {
        Self {
            function,
            arguments: vec![json!(visit.get())],
        }
    }

    /// The call as script source, arguments JSON-encoded.
    pub fn to_script(&self) -> String {
        let arguments: Vec<String> = self.arguments.iter().map(Value::to_string).collect();
        format!("{}({})", self.function, arguments.join(", "))
    }

    /// The visit this call addresses; every adapter call leads with it.
    pub fn visit_id(&self) -> Option<u64> {
        self.arguments.first().and_then(Value::as_u64)
    }
}
