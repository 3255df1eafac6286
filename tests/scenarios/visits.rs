/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use navshell::test_utils::{DelegateCall, EngineCall, TestHarness, TestVisitable, VisitableCall};
use navshell::{RestorationToken, VisitAction, VisitEvent, VisitKind, VisitState};
use url::Url;

#[test]
fn first_visit_cold_boots_then_becomes_topmost() {
    let mut harness = TestHarness::new();
    let a = TestVisitable::web("https://example.com/a");

    harness.session.visit(&a.handle());
    let visit = harness.session.current_visit().expect("current visit");
    assert_eq!(visit.kind(), VisitKind::ColdBoot);
    assert_eq!(visit.state(), VisitState::Started);
    let id = visit.id();
    assert!(harness.session.topmost_visit().is_none());

    harness.finish_cold_boot(None);
    let topmost = harness.session.topmost_visit().expect("topmost visit");
    assert_eq!(topmost.id(), id);
    assert_eq!(topmost.state(), VisitState::Completed);
}

#[test]
fn second_visit_is_script_driven() {
    let mut harness = TestHarness::new();
    let a = TestVisitable::web("https://example.com/a");
    let b = TestVisitable::web("https://example.com/b");
    harness.boot(&a);
    harness.engine.take_calls();

    harness.session.visit(&b.handle());
    assert_eq!(
        harness.session.current_visit().map(|visit| visit.kind()),
        Some(VisitKind::ScriptDriven)
    );
    let calls = harness.engine.take_calls();
    assert!(
        !calls.iter().any(|call| matches!(call, EngineCall::Load(_))),
        "script-driven visit must not reload: {calls:?}"
    );
    assert!(matches!(calls.as_slice(), [EngineCall::Script(_)]));
}

#[test]
fn visitable_requiring_cold_boot_gets_one() {
    let mut harness = TestHarness::new();
    let a = TestVisitable::web("https://example.com/a");
    harness.boot(&a);

    let fresh = TestVisitable::requiring_cold_boot("https://example.com/settings");
    harness.session.visit(&fresh.handle());
    assert_eq!(
        harness.session.current_visit().map(|visit| visit.kind()),
        Some(VisitKind::ColdBoot)
    );

    fresh.set_requires_cold_boot(false);
    harness.finish_cold_boot(None);
    harness.session.visit(&a.handle());
    assert_eq!(
        harness.session.current_visit().map(|visit| visit.kind()),
        Some(VisitKind::ScriptDriven)
    );
}

#[test]
fn script_visit_runs_full_lifecycle_and_stores_token() {
    let mut harness = TestHarness::new();
    let a = TestVisitable::web("https://example.com/a");
    let b = TestVisitable::web("https://example.com/b");
    harness.boot(&a);
    harness.delegate.take_calls();

    harness.session.visit(&b.handle());
    harness.finish_script_visit(&b, Some("r-b"));

    assert_eq!(
        harness.session.topmost_visit().map(|visit| visit.state()),
        Some(VisitState::Completed)
    );
    assert_eq!(
        harness.delegate.take_calls(),
        vec![DelegateCall::StartRequest, DelegateCall::FinishRequest]
    );
    let calls = b.take_calls();
    let render = calls
        .iter()
        .position(|call| *call == VisitableCall::DidRender)
        .expect("b rendered");
    let indicator = calls
        .iter()
        .position(|call| *call == VisitableCall::ShowActivityIndicator)
        .expect("indicator shown while loading");
    assert!(indicator < render);

    // Going back to `b` later hands its token to the adapter.
    harness.session.visit(&a.handle());
    harness.session.visit(&b.handle());
    assert_eq!(
        harness
            .session
            .current_visit()
            .and_then(|visit| visit.restoration_token()),
        Some(&RestorationToken::from("r-b"))
    );
}

#[test]
fn superseded_visit_is_cancelled_before_next_starts() {
    let mut harness = TestHarness::new();
    let a = TestVisitable::web("https://example.com/a");
    let b = TestVisitable::web("https://example.com/b");
    let c = TestVisitable::web("https://example.com/c");
    harness.boot(&a);

    harness.session.visit(&b.handle());
    let b_visit = harness.current_id();
    harness.send_current(VisitEvent::Started {
        has_cached_snapshot: false,
    });
    harness.send_current(VisitEvent::RequestStarted);
    harness.engine.take_calls();
    harness.delegate.take_calls();

    harness.session.visit(&c.handle());
    let calls = harness.engine.take_calls();
    assert_eq!(calls.len(), 2);
    let [EngineCall::Script(cancel), EngineCall::Script(visit)] = calls.as_slice() else {
        panic!("expected cancel then visit, got {calls:?}");
    };
    assert_eq!(cancel.visit_id(), Some(b_visit.get()));
    assert_eq!(visit.visit_id(), Some(harness.current_id().get()));
    assert_eq!(
        harness.delegate.take_calls(),
        vec![DelegateCall::FinishRequest]
    );

    // The engine still answers for `b`; nobody hears about it.
    b.take_calls();
    harness.send(b_visit, VisitEvent::RequestCompleted);
    harness.send(b_visit, VisitEvent::Rendered);
    harness.send(
        b_visit,
        VisitEvent::Completed {
            restoration_token: None,
        },
    );
    assert!(b.calls().is_empty());
    assert!(harness.delegate.calls().is_empty());
}

#[test]
fn reload_cold_boots_topmost() {
    let mut harness = TestHarness::new();
    let a = TestVisitable::web("https://example.com/a");
    harness.boot(&a);
    assert!(harness.session.is_engine_initialized());

    harness.session.reload();
    assert!(!harness.session.is_engine_initialized());
    let current = harness.session.current_visit().expect("current visit");
    assert_eq!(current.kind(), VisitKind::ColdBoot);
    assert_eq!(current.action(), VisitAction::Advance);
    assert_eq!(
        harness.session.topmost_visit().map(|visit| visit.id()),
        Some(current.id())
    );
}

#[test]
fn native_screen_then_web_screen_carries_referer() {
    let mut harness = TestHarness::new();
    let a = TestVisitable::web("https://example.com/a");
    let menu = TestVisitable::native("app://menu");
    let b = TestVisitable::web("https://example.com/b");
    harness.boot(&a);
    harness.boot_native(&menu);
    harness.engine.take_calls();

    harness.session.visit(&b.handle());
    let calls = harness.engine.take_calls();
    let Some(EngineCall::Load(request)) = calls.last() else {
        panic!("expected a cold boot load, got {calls:?}");
    };
    assert_eq!(request.url, b.url());
    assert_eq!(
        request.referer,
        Some(Url::parse("app://menu").expect("valid url"))
    );
    assert!(!menu.calls().contains(&VisitableCall::ActivateWebView));
}

#[test]
fn redirect_updates_location_and_notifies_host() {
    let mut harness = TestHarness::new();
    let a = TestVisitable::web("https://example.com/a");
    harness.session.visit(&a.handle());
    let login = Url::parse("https://example.com/login").expect("valid url");

    harness.send_current(VisitEvent::ServerRedirect { url: login.clone() });
    assert_eq!(
        harness.session.current_visit().map(|visit| visit.location().clone()),
        Some(login.clone())
    );
    assert!(harness.delegate.calls().contains(&DelegateCall::Redirect {
        visitable: a.id(),
        url: login,
    }));
}
