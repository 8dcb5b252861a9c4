use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result data submitted when completing a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskPayload {
    /// Document or face capture results
    Capture(Vec<Value>),
    /// Personal-data form record
    Form(Map<String, Value>),
}

impl TaskPayload {
    /// Pick the payload from optional capture results and form data.
    ///
    /// A non-empty capture collection wins over the form record; with neither, the payload is
    /// an empty form.
    pub fn from_parts(capture: Option<Vec<Value>>, form: Option<Map<String, Value>>) -> Self {
        match capture {
            Some(capture) if !capture.is_empty() => TaskPayload::Capture(capture),
            _ => TaskPayload::Form(form.unwrap_or_default()),
        }
    }

    pub fn empty() -> Self {
        TaskPayload::Form(Map::new())
    }

    pub fn into_value(self) -> Value {
        match self {
            TaskPayload::Capture(items) => Value::Array(items),
            TaskPayload::Form(map) => Value::Object(map),
        }
    }
}

impl Default for TaskPayload {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Map<String, Value>> for TaskPayload {
    fn from(map: Map<String, Value>) -> Self {
        TaskPayload::Form(map)
    }
}

impl From<Vec<Value>> for TaskPayload {
    fn from(items: Vec<Value>) -> Self {
        TaskPayload::Capture(items)
    }
}

/// Body of `POST /workflow_runs/{id}/complete`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteTaskRequest<'a> {
    pub task_id: &'a str,
    pub data: &'a TaskPayload,
}
