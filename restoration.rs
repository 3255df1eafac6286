/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Restoration tokens keyed by native view controller.
//!
//! The in-page engine hands back an opaque token when a visit completes; the
//! next script-driven visit to the same view controller passes it back so the
//! page can restore scroll position and cached state. Entries hold the screen
//! weakly: once the host drops its last `VisitableRef`, lookups miss, and the
//! host may also evict explicitly through
//! [`Session::visitable_did_dispose`](crate::Session::visitable_did_dispose).

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::visitable::{ViewControllerId, Visitable, VisitableRef};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RestorationToken(String);

impl RestorationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RestorationToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for RestorationToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl std::fmt::Display for RestorationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

struct RestorationEntry {
    owner: Weak<dyn Visitable>,
    token: RestorationToken,
}

#[derive(Default)]
pub(crate) struct RestorationTokens {
    entries: HashMap<ViewControllerId, RestorationEntry>,
}

impl RestorationTokens {
    pub(crate) fn store(&mut self, visitable: &VisitableRef, token: RestorationToken) {
        self.prune();
        self.entries.insert(
            visitable.view_controller_id(),
            RestorationEntry {
                owner: Rc::downgrade(visitable),
                token,
            },
        );
    }

    /// A deallocated owner reads as "not found", never as a stale token.
    pub(crate) fn get(&self, visitable: &dyn Visitable) -> Option<&RestorationToken> {
        self.entries
            .get(&visitable.view_controller_id())
            .filter(|entry| entry.owner.strong_count() > 0)
            .map(|entry| &entry.token)
    }

    pub(crate) fn forget(&mut self, id: ViewControllerId) -> Option<RestorationToken> {
        self.entries.remove(&id).map(|entry| entry.token)
    }

    /// Drop entries whose view controller is gone. Returns how many went.
    pub(crate) fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.owner.strong_count() > 0);
        before - self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for RestorationTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(id, entry)| (id, entry.token.as_str())),
            )
            .finish()
    }
}
