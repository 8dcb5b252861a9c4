use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::run::WorkflowRun;

/// Classification of a workflow run. Recomputed on every query, never stored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    /// The run still has interactive tasks; the current step completed but the run goes on
    Complete,
    Pass,
    Reject,
}

impl Outcome {
    /// `true` for `Pass` and `Reject`, the outcomes that end the run.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Complete)
    }
}

/// Reduce a run to an [`Outcome`].
///
/// Remaining interactive tasks are checked before `outcome`: a run that still needs the user is
/// `Complete` even if the service already recorded a result. Only a run with no remaining tasks
/// is `Pass` (recorded outcome `true`) or `Reject` (`false` or absent).
pub fn classify(run: &WorkflowRun) -> Outcome {
    if run.has_remaining_interactive_tasks {
        Outcome::Complete
    } else if run.outcome == Some(true) {
        Outcome::Pass
    } else {
        Outcome::Reject
    }
}
