/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use navshell::test_utils::{TestHarness, TestVisitable, VisitableCall};
use navshell::{ViewAppearance, VisitAction, VisitState};

#[test]
fn reinserted_topmost_cancels_back_navigation() {
    let mut harness = TestHarness::new();
    let a = TestVisitable::web("https://example.com/a");
    let b = TestVisitable::web("https://example.com/b");
    harness.boot(&a);
    harness.session.visit(&b.handle());
    harness.finish_script_visit(&b, None);

    // Swipe back from `b` towards `a`: a restore visit starts...
    harness
        .session
        .visitable_view_will_appear(&a.handle(), ViewAppearance::revealed());
    assert_eq!(
        harness.session.current_visit().map(|visit| visit.action()),
        Some(VisitAction::Restore)
    );
    let restore = harness.current_id();

    // ...and the gesture is abandoned, so `b` is inserted again.
    harness
        .session
        .visitable_view_will_appear(&b.handle(), ViewAppearance::inserted());
    assert_eq!(harness.current_id(), restore);
    assert_eq!(
        harness.session.current_visit().map(|visit| visit.state()),
        Some(VisitState::Canceled)
    );
    assert_eq!(
        harness
            .session
            .topmost_visitable()
            .map(|visitable| visitable.view_controller_id()),
        Some(b.id())
    );

    b.take_calls();
    harness
        .session
        .visitable_view_did_appear(&b.handle(), ViewAppearance::revealed());
    assert_eq!(
        b.take_calls(),
        vec![
            VisitableCall::HideScreenshot,
            VisitableCall::HideActivityIndicator,
            VisitableCall::ActivateWebView,
        ]
    );
}

#[test]
fn completed_back_navigation_promotes_restore_visit() {
    let mut harness = TestHarness::new();
    let a = TestVisitable::web("https://example.com/a");
    let b = TestVisitable::web("https://example.com/b");
    harness.boot(&a);
    harness.session.visit(&b.handle());
    harness.finish_script_visit(&b, None);

    harness
        .session
        .visitable_view_will_appear(&a.handle(), ViewAppearance::revealed());
    harness.finish_script_visit(&a, None);

    let topmost = harness.session.topmost_visit().expect("topmost visit");
    assert_eq!(topmost.visitable().view_controller_id(), a.id());
    assert_eq!(topmost.action(), VisitAction::Restore);
    assert_eq!(topmost.state(), VisitState::Completed);
    assert_eq!(
        harness
            .session
            .activated_visitable()
            .map(|visitable| visitable.view_controller_id()),
        Some(a.id())
    );
}

#[test]
fn refresh_from_non_topmost_is_ignored() {
    let mut harness = TestHarness::new();
    let a = TestVisitable::web("https://example.com/a");
    let b = TestVisitable::web("https://example.com/b");
    harness.boot(&a);

    harness.session.visitable_did_request_refresh(&b.handle());
    assert!(!harness.session.is_refreshing());
    assert!(b.calls().is_empty());
}
