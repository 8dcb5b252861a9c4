use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::outcome::{Outcome, classify};

/// Server-owned state of one verification attempt.
///
/// Only `has_remaining_interactive_tasks` and `outcome` drive the engine and have a fixed shape.
/// The other fields the service usually sends are kept as raw JSON and read through accessors,
/// so a differently typed value never makes a run unreadable. Anything else lands in `extra`
/// and is written back unchanged on serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub has_remaining_interactive_tasks: bool,
    #[serde(default)]
    pub outcome: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_def_id: Option<Value>,
    /// Step configuration the service attached to the current task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Non-empty string content of a loosely typed field
fn non_empty_str(field: Option<&Value>) -> Option<&str> {
    field.and_then(Value::as_str).filter(|s| !s.is_empty())
}

impl WorkflowRun {
    /// Classify this run; see [`classify`].
    pub fn outcome_step(&self) -> Outcome {
        classify(self)
    }

    /// Identifier of the task instance to submit completions for.
    pub fn current_task_id(&self) -> Option<&str> {
        non_empty_str(self.task_id.as_ref())
    }

    /// Identifier of the task the service is waiting on.
    ///
    /// The task definition id names the kind of work (`upload_document`, ...); older service
    /// responses only carry `task_type`, which is used as a fallback.
    pub fn pending_task(&self) -> Option<&str> {
        non_empty_str(self.task_def_id.as_ref())
            .or_else(|| non_empty_str(self.task_type.as_ref()))
    }

    /// Step configuration as an object; `None` when absent or not an object.
    pub fn step_config(&self) -> Option<&Map<String, Value>> {
        self.config.as_ref().and_then(Value::as_object)
    }
}
