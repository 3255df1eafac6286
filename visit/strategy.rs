/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

/// How a visit reaches its visitable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitKind {
    /// Full page load through the engine.
    ColdBoot,
    /// In-page transition on the already loaded document.
    ScriptDriven,
    /// No engine involvement.
    NativeOnly,
}

/// Everything strategy selection depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrategyInputs {
    pub web_backed: bool,
    pub engine_initialized: bool,
    pub requires_cold_boot: bool,
    pub cold_boot_on_next_request: bool,
    /// The topmost screen is native-only, so there is no live document to
    /// continue from.
    pub origin_native_only: bool,
}

pub(crate) fn select_strategy(inputs: StrategyInputs) -> VisitKind {
    match inputs {
        StrategyInputs {
            web_backed: false, ..
        } => VisitKind::NativeOnly,
        StrategyInputs {
            engine_initialized: true,
            requires_cold_boot: false,
            cold_boot_on_next_request: false,
            origin_native_only: false,
            ..
        } => VisitKind::ScriptDriven,
        _ => VisitKind::ColdBoot,
    }
}
