/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Diagnostic channels.
//!
//! The host installs a sender with [`Session::with_diagnostics`](crate::Session::with_diagnostics)
//! and drains the receiver at its leisure. Emission is compiled out without
//! the `diagnostics` feature.

use std::collections::BTreeMap;

use crossbeam_channel::{Receiver, Sender};

use crate::visit::VisitId;
use crate::web::NavigationPolicy;

pub const CHANNEL_VISIT_STARTED: &str = "session.visit.started";
pub const CHANNEL_VISIT_CANCELED: &str = "session.visit.canceled";
pub const CHANNEL_VISIT_COMPLETED: &str = "session.visit.completed";
pub const CHANNEL_VISIT_FAILED: &str = "session.visit.failed";
pub const CHANNEL_VISIT_PREPROCESSED: &str = "session.visit.preprocessed";
pub const CHANNEL_ENGINE_EVENT_STALE: &str = "session.engine.event_stale";
pub const CHANNEL_NAVIGATION_ALLOWED: &str = "session.navigation.allowed";
pub const CHANNEL_NAVIGATION_DENIED: &str = "session.navigation.denied";
pub const CHANNEL_SESSION_RELOAD: &str = "session.reload";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    Visit {
        channel_id: &'static str,
        visit: VisitId,
    },
    NavigationDecided {
        channel_id: &'static str,
        policy: NavigationPolicy,
    },
    Session {
        channel_id: &'static str,
    },
}

impl DiagnosticEvent {
    pub fn channel_id(&self) -> &'static str {
        match self {
            Self::Visit { channel_id, .. }
            | Self::NavigationDecided { channel_id, .. }
            | Self::Session { channel_id } => *channel_id,
        }
    }

    pub(crate) fn navigation(policy: NavigationPolicy) -> Self {
        let channel_id = match policy {
            NavigationPolicy::Allow => CHANNEL_NAVIGATION_ALLOWED,
            NavigationPolicy::Cancel => CHANNEL_NAVIGATION_DENIED,
        };
        Self::NavigationDecided { channel_id, policy }
    }
}

#[derive(Debug, Default)]
pub(crate) struct DiagnosticsSink {
    tx: Option<Sender<DiagnosticEvent>>,
}

impl DiagnosticsSink {
    pub(crate) fn new(tx: Sender<DiagnosticEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    #[cfg(feature = "diagnostics")]
    pub(crate) fn emit(&self, event: DiagnosticEvent) {
        if let Some(tx) = &self.tx {
            // A dropped receiver only means nobody is listening any more.
            let _ = tx.send(event);
        }
    }

    #[cfg(not(feature = "diagnostics"))]
    pub(crate) fn emit(&self, _event: DiagnosticEvent) {}

    pub(crate) fn visit(&self, channel_id: &'static str, visit: VisitId) {
        self.emit(DiagnosticEvent::Visit { channel_id, visit });
    }
}

/// Per-channel event counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticTally {
    counts: BTreeMap<&'static str, usize>,
}

impl DiagnosticTally {
    /// Drain whatever is queued on `rx` without blocking.
    pub fn drain(&mut self, rx: &Receiver<DiagnosticEvent>) -> usize {
        let mut drained = 0;
        for event in rx.try_iter() {
            self.record(&event);
            drained += 1;
        }
        drained
    }

    pub fn record(&mut self, event: &DiagnosticEvent) {
        *self.counts.entry(event.channel_id()).or_insert(0) += 1;
    }

    pub fn channel_count(&self, channel_id: &str) -> usize {
        self.counts.get(channel_id).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}
