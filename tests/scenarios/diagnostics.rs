/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use navshell::diagnostics::{
    CHANNEL_ENGINE_EVENT_STALE, CHANNEL_NAVIGATION_ALLOWED, CHANNEL_SESSION_RELOAD,
    CHANNEL_VISIT_CANCELED, CHANNEL_VISIT_COMPLETED, CHANNEL_VISIT_STARTED,
};
use navshell::test_utils::{TestHarness, TestVisitable};
use navshell::{DiagnosticTally, NavigationAction, NavigationType, VisitEvent};
use url::Url;

#[test]
fn visit_lifecycle_is_tallied_per_channel() {
    if !cfg!(feature = "diagnostics") {
        return;
    }
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut harness = TestHarness::new().with_diagnostics(tx);
    let a = TestVisitable::web("https://example.com/a");
    let b = TestVisitable::web("https://example.com/b");
    let c = TestVisitable::web("https://example.com/c");

    harness.boot(&a);
    harness.session.visit(&b.handle());
    let superseded = harness.current_id();
    harness.session.visit(&c.handle());
    harness.finish_script_visit(&c, None);
    harness.send(superseded, VisitEvent::RequestCompleted);

    let mut tally = DiagnosticTally::default();
    let drained = tally.drain(&rx);
    assert_eq!(drained, tally.total());
    assert_eq!(tally.channel_count(CHANNEL_VISIT_STARTED), 3);
    assert_eq!(tally.channel_count(CHANNEL_VISIT_CANCELED), 1);
    assert_eq!(tally.channel_count(CHANNEL_VISIT_COMPLETED), 2);
    assert_eq!(tally.channel_count(CHANNEL_ENGINE_EVENT_STALE), 1);
}

#[test]
fn navigation_decisions_and_reloads_are_reported() {
    if !cfg!(feature = "diagnostics") {
        return;
    }
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut harness = TestHarness::new().with_diagnostics(tx);
    let a = TestVisitable::web("https://example.com/a");
    harness.boot(&a);
    let mut tally = DiagnosticTally::default();
    tally.drain(&rx);

    harness.session.decide_policy_for_navigation(
        NavigationAction {
            url: Some(Url::parse("https://ads.example.net/frame").expect("valid url")),
            navigation_type: NavigationType::Other,
            target_is_main_frame: false,
        },
        |_| {},
    );
    harness.session.reload();

    let mut after = DiagnosticTally::default();
    after.drain(&rx);
    assert_eq!(after.channel_count(CHANNEL_NAVIGATION_ALLOWED), 1);
    assert_eq!(after.channel_count(CHANNEL_SESSION_RELOAD), 1);
    assert_eq!(after.channel_count(CHANNEL_VISIT_STARTED), 1);
}
