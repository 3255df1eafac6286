/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::collections::HashSet;
use std::rc::Rc;

use navshell::diagnostics::{
    CHANNEL_VISIT_CANCELED, CHANNEL_VISIT_COMPLETED, CHANNEL_VISIT_FAILED,
    CHANNEL_VISIT_PREPROCESSED, CHANNEL_VISIT_STARTED,
};
use navshell::test_utils::{TestHarness, TestVisitable};
use navshell::{DiagnosticEvent, NavigationResponse, ViewAppearance, VisitEvent, VisitId};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Visit(usize),
    WillAppear { screen: usize, inserted: bool },
    DidAppear(usize),
    Respond { back: usize, status: u16 },
    PageLoaded { back: usize },
    ScriptProgress { back: usize, step: u8 },
    Reload,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0_usize..4).prop_map(Op::Visit),
        (0_usize..4, any::<bool>())
            .prop_map(|(screen, inserted)| Op::WillAppear { screen, inserted }),
        (0_usize..4).prop_map(Op::DidAppear),
        (0_usize..3, prop_oneof![Just(200_u16), Just(404_u16)])
            .prop_map(|(back, status)| Op::Respond { back, status }),
        (0_usize..3).prop_map(|back| Op::PageLoaded { back }),
        (0_usize..3, 0_u8..6).prop_map(|(back, step)| Op::ScriptProgress { back, step }),
        Just(Op::Reload),
    ]
}

fn script_event(step: u8) -> VisitEvent {
    match step {
        0 => VisitEvent::Started {
            has_cached_snapshot: false,
        },
        1 => VisitEvent::RequestStarted,
        2 => VisitEvent::RequestCompleted,
        3 => VisitEvent::Rendered,
        4 => VisitEvent::RequestFinished,
        _ => VisitEvent::Completed {
            restoration_token: Some("r".into()),
        },
    }
}

fn total_calls(screens: &[Rc<TestVisitable>]) -> usize {
    screens.iter().map(|screen| screen.calls().len()).sum()
}

proptest! {
    #[test]
    fn proptest_at_most_one_visit_is_live(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut harness = TestHarness::new().with_diagnostics(tx);
        let screens = vec![
            TestVisitable::web("https://example.com/a"),
            TestVisitable::web("https://example.com/b"),
            TestVisitable::web("https://example.com/c"),
            TestVisitable::native("app://menu"),
        ];
        let mut issued: Vec<VisitId> = Vec::new();

        for op in ops {
            match op {
                Op::Visit(screen) => harness.session.visit(&screens[screen].handle()),
                Op::WillAppear { screen, inserted } => {
                    let appearance = if inserted {
                        ViewAppearance::inserted()
                    } else {
                        ViewAppearance::revealed()
                    };
                    harness
                        .session
                        .visitable_view_will_appear(&screens[screen].handle(), appearance);
                },
                Op::DidAppear(screen) => harness
                    .session
                    .visitable_view_did_appear(&screens[screen].handle(), ViewAppearance::revealed()),
                Op::Respond { back, status } => {
                    if let Some(&visit) = issued.iter().rev().nth(back) {
                        harness.session.decide_policy_for_response(
                            NavigationResponse {
                                visit,
                                url: screens[0].url(),
                                status: Some(status),
                            },
                            |_| {},
                        );
                    }
                },
                Op::PageLoaded { back } => {
                    if let Some(&visit) = issued.iter().rev().nth(back) {
                        harness.send(visit, VisitEvent::PageLoaded { restoration_token: None });
                    }
                },
                Op::ScriptProgress { back, step } => {
                    if let Some(&visit) = issued.iter().rev().nth(back) {
                        let before = total_calls(&screens);
                        let stale = harness.session.current_visit().map(|v| v.id()) != Some(visit);
                        harness.send(visit, script_event(step));
                        if stale {
                            prop_assert_eq!(total_calls(&screens), before);
                        }
                    }
                },
                Op::Reload => harness.session.reload(),
            }

            if let Some(current) = harness.session.current_visit() {
                if issued.last() != Some(&current.id()) {
                    issued.push(current.id());
                }
                if let Some(topmost) = harness.session.topmost_visit()
                    && topmost.id() != current.id()
                {
                    prop_assert!(
                        topmost.state().is_terminal(),
                        "topmost {:?} is live next to current {:?}",
                        topmost,
                        current
                    );
                }
            }
        }

        if cfg!(feature = "diagnostics") {
            let mut live: HashSet<VisitId> = HashSet::new();
            for event in rx.try_iter() {
                let DiagnosticEvent::Visit { channel_id, visit } = event else {
                    continue;
                };
                match channel_id {
                    CHANNEL_VISIT_STARTED => {
                        prop_assert!(live.is_empty(), "{:?} started while {:?} live", visit, live);
                        live.insert(visit);
                    },
                    CHANNEL_VISIT_CANCELED
                    | CHANNEL_VISIT_COMPLETED
                    | CHANNEL_VISIT_FAILED
                    | CHANNEL_VISIT_PREPROCESSED => {
                        live.remove(&visit);
                    },
                    _ => {},
                }
            }
        }
    }
}
