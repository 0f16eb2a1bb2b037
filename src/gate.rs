//! Navigation gate.
//!
//! A pure function of (identity presence, eligibility, path) deciding
//! whether the current path is allowed. It runs before any route renders so
//! unauthorized content never flashes; its redirects replace the current
//! history entry rather than adding one.
//!
//! | identity | eligibility | path                  | action               |
//! |----------|-------------|-----------------------|----------------------|
//! | absent   | any         | not `/`               | redirect `/`         |
//! | present  | unknown     | any                   | suspend (loading)    |
//! | present  | ineligible  | not `/age-gate`       | redirect `/age-gate` |
//! | present  | eligible    | `/` or `/age-gate`    | redirect `/feed`     |
//! | otherwise|             |                       | proceed              |
//!
//! Applying the gate to the path it redirected to always yields `Proceed`.

use crate::cache::QueryState;
use crate::routes::{self, AGE_GATE, FEED, LANDING};

/// Eligibility as the gate sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Not resolved yet; the gate must not guess.
    Unknown,
    Eligible,
    Ineligible,
}

impl From<&QueryState<bool>> for Eligibility {
    /// A failed lookup counts as ineligible so the gate fails closed toward
    /// the age gate.
    fn from(state: &QueryState<bool>) -> Self {
        match state {
            QueryState::Ready(true) => Self::Eligible,
            QueryState::Ready(false) | QueryState::Failed(_) => Self::Ineligible,
            QueryState::Idle | QueryState::Loading => Self::Unknown,
        }
    }
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    /// The path is consistent; render it.
    Proceed,
    /// Eligibility is still loading; render a loading indicator only.
    Suspend,
    /// Replace the current path with this one.
    Redirect(&'static str),
}

/// Evaluate the gate.
pub fn evaluate(identity_present: bool, eligibility: Eligibility, path: &str) -> GateAction {
    let path = routes::normalize(path);

    if !identity_present {
        return if path == LANDING {
            GateAction::Proceed
        } else {
            GateAction::Redirect(LANDING)
        };
    }

    match eligibility {
        Eligibility::Unknown => GateAction::Suspend,
        Eligibility::Ineligible if path != AGE_GATE => GateAction::Redirect(AGE_GATE),
        Eligibility::Eligible if path == LANDING || path == AGE_GATE => GateAction::Redirect(FEED),
        _ => GateAction::Proceed,
    }
}
