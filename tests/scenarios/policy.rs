/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use navshell::test_utils::{DelegateCall, TestHarness, TestVisitable};
use navshell::{NavigationAction, NavigationPolicy, NavigationType, VisitAction};
use url::Url;

fn decide(harness: &mut TestHarness, action: NavigationAction) -> Vec<NavigationPolicy> {
    let mut decisions = Vec::new();
    harness
        .session
        .decide_policy_for_navigation(action, |policy| decisions.push(policy));
    decisions
}

#[test]
fn form_submission_is_allowed_and_recorded() {
    let mut harness = TestHarness::new();
    let a = TestVisitable::web("https://example.com/a");
    harness.boot(&a);
    harness.delegate.take_calls();
    harness.delegate.add_local_prefix("https://example.com/");

    let decisions = decide(
        &mut harness,
        NavigationAction {
            url: Some(Url::parse("https://example.com/comments").expect("valid url")),
            navigation_type: NavigationType::FormSubmitted,
            target_is_main_frame: true,
        },
    );
    assert_eq!(decisions, vec![NavigationPolicy::Allow]);
    assert!(harness.delegate.calls().is_empty());

    // The surface now shows the submission result; the next push must not
    // rewrite `a`'s location with it.
    harness
        .engine
        .set_url(Some(Url::parse("https://example.com/comments").expect("valid url")));
    let b = TestVisitable::web("https://example.com/b");
    harness.session.visit(&b.handle());
    assert_eq!(a.url().as_str(), "https://example.com/a");
}

#[test]
fn local_link_is_cancelled_and_reproposed() {
    let mut harness = TestHarness::new();
    let a = TestVisitable::web("https://example.com/a");
    harness.boot(&a);
    harness.delegate.take_calls();
    harness.delegate.add_local_prefix("https://example.com/");
    let target = Url::parse("https://example.com/people/7").expect("valid url");

    let decisions = decide(
        &mut harness,
        NavigationAction {
            url: Some(target.clone()),
            navigation_type: NavigationType::LinkActivated,
            target_is_main_frame: true,
        },
    );
    assert_eq!(decisions, vec![NavigationPolicy::Cancel]);
    assert_eq!(
        harness.delegate.take_calls(),
        vec![DelegateCall::ProposeVisit {
            url: target,
            action: VisitAction::Advance,
        }]
    );
}

#[test]
fn sub_frame_navigation_is_left_to_engine() {
    let mut harness = TestHarness::new();
    let decisions = decide(
        &mut harness,
        NavigationAction {
            url: Some(Url::parse("https://ads.example.net/frame").expect("valid url")),
            navigation_type: NavigationType::Other,
            target_is_main_frame: false,
        },
    );
    assert_eq!(decisions, vec![NavigationPolicy::Allow]);
    assert!(harness.delegate.calls().is_empty());
}
