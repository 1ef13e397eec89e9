//! Control hazard resolution.
//!
//! Turns a resolved branch outcome into a change of fetch direction:
//! 1. **Predict-not-taken:** A taken transfer squashes the fall-through
//!    instructions fetched behind it and redirects fetch immediately.
//! 2. **Delayed branch:** A taken transfer lets a fixed number of fall-through
//!    instructions complete and redirects fetch after the last of them.

use crate::core::pipeline::shape::{BranchStrategy, PipelineShape};
use crate::core::units::bru::BranchOutcome;

/// Redirect that waits for the delay slots to be fetched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRedirect {
    /// Destination of the branch.
    pub target: u64,
    /// Delay-slot instructions still to be fetched before the redirect.
    pub remaining: u8,
}

impl PendingRedirect {
    /// Accounts for one fetch cycle.
    ///
    /// # Arguments
    ///
    /// * `fetched` - Instructions fetched this cycle.
    ///
    /// # Returns
    ///
    /// `true` once every delay slot has been fetched and fetch must move to
    /// `target` on the following cycle.
    pub fn consume(&mut self, fetched: u8) -> bool {
        self.remaining = self.remaining.saturating_sub(fetched);
        self.remaining == 0
    }
}

/// Effect of this cycle's branch outcome on fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlDecision {
    /// Keep fetching sequentially.
    Continue,
    /// Squash the branch shadow and fetch from `target` next cycle.
    Flush {
        /// Redirect address.
        target: u64,
    },
    /// Every delay slot is already fetched; fetch from `target` next cycle.
    Redirect {
        /// Redirect address.
        target: u64,
    },
    /// Redirect once the remaining delay slots have been fetched.
    Delayed(PendingRedirect),
}

/// Decides what a resolved outcome does to the front end.
///
/// # Arguments
///
/// * `shape`         - Pipeline shape (strategy and slot count).
/// * `outcome`       - Outcome resolved this cycle, if any.
/// * `shadow_fetched` - Instructions already fetched behind the branch.
pub fn decide(
    shape: &PipelineShape,
    outcome: Option<BranchOutcome>,
    shadow_fetched: u8,
) -> ControlDecision {
    let Some(outcome) = outcome.filter(|o| o.taken) else {
        return ControlDecision::Continue;
    };
    match shape.branch_strategy {
        BranchStrategy::DelayedBranch => {
            let remaining = shape.branch_delay_slots.saturating_sub(shadow_fetched);
            if remaining == 0 {
                ControlDecision::Redirect {
                    target: outcome.target,
                }
            } else {
                ControlDecision::Delayed(PendingRedirect {
                    target: outcome.target,
                    remaining,
                })
            }
        }
        BranchStrategy::PredictNotTaken | BranchStrategy::NotApplicable => {
            ControlDecision::Flush {
                target: outcome.target,
            }
        }
    }
}
