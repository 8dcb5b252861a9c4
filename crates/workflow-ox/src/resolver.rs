use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    outcome::{Outcome, classify},
    run::WorkflowRun,
    step::{StepDescriptor, StepOptions, StepType},
    task::TaskId,
};

/// Result of resolving a raw task identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepResolution {
    Step(StepDescriptor),
    /// No step exists for this task; nothing should be rendered
    Unresolved { task_id: Option<String> },
}

impl StepResolution {
    pub fn step(&self) -> Option<&StepDescriptor> {
        match self {
            StepResolution::Step(step) => Some(step),
            StepResolution::Unresolved { .. } => None,
        }
    }

    pub fn into_step(self) -> Option<StepDescriptor> {
        match self {
            StepResolution::Step(step) => Some(step),
            StepResolution::Unresolved { .. } => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, StepResolution::Unresolved { .. })
    }
}

/// Map a raw task identifier to the step that fulfils it.
///
/// Unknown or missing identifiers resolve to [`StepResolution::Unresolved`].
pub fn resolve_step(task_id: Option<&str>, base: &StepOptions) -> StepResolution {
    log::debug!("requested step for task {task_id:?}");

    match task_id.and_then(TaskId::parse) {
        Some(task) => StepResolution::Step(resolve_task(task, base)),
        None => {
            log::warn!("no step is defined for task {task_id:?}");
            StepResolution::Unresolved {
                task_id: task_id.map(ToString::to_string),
            }
        }
    }
}

/// Build the step descriptor for a known task.
///
/// `base` is never modified; every call returns fresh options. Task defaults are merged after
/// the caller's options, so they replace same-named keys.
pub fn resolve_task(task: TaskId, base: &StepOptions) -> StepDescriptor {
    match task {
        TaskId::UploadDocument | TaskId::UploadDocumentPhoto => {
            StepDescriptor::new(StepType::Document, base.clone())
        }
        TaskId::UploadFacePhoto => StepDescriptor::new(
            StepType::Face,
            base.merged([
                ("requestedVariant", json!("standard")),
                ("uploadFallback", Value::Bool(false)),
            ]),
        ),
        TaskId::UploadFaceVideo => StepDescriptor::new(
            StepType::Face,
            base.merged([
                ("requestedVariant", json!("video")),
                ("uploadFallback", Value::Bool(false)),
                ("photoCaptureFallback", Value::Bool(false)),
            ]),
        ),
        TaskId::ProofOfAddressCapture => StepDescriptor::new(StepType::Poa, base.clone()),
        // Placeholders are applied last and replace any caller value for the same key.
        TaskId::ProfileData => StepDescriptor::new(
            StepType::Data,
            base.merged([
                ("first_name", json!("")),
                ("last_name", json!("")),
                ("dob", json!("")),
                (
                    "address",
                    json!({ "postcode": "", "country": "", "state": "" }),
                ),
            ]),
        ),
    }
}

/// What the caller should do next with a fetched run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunProgress {
    /// Render this step, then submit its result
    Step(StepDescriptor),
    /// The run waits on a task this client cannot render
    Unresolved { task_id: Option<String> },
    /// No interactive tasks remain
    Finished { outcome: Outcome },
}

/// One turn of the fetch → render → submit loop.
///
/// A run with remaining interactive tasks resolves its pending task against `base`; a run without
/// them is finished with its classified outcome.
pub fn next_step(run: &WorkflowRun, base: &StepOptions) -> RunProgress {
    if !run.has_remaining_interactive_tasks {
        return RunProgress::Finished {
            outcome: classify(run),
        };
    }

    match resolve_step(run.pending_task(), base) {
        StepResolution::Step(step) => RunProgress::Step(step),
        StepResolution::Unresolved { task_id } => RunProgress::Unresolved { task_id },
    }
}
