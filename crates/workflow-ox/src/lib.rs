#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Workflow orchestration engine for remote identity-verification runs.
//!
//! The service owns a *workflow run* and tells the client which task it still needs. This crate
//! fetches the run, maps its pending task to a [`StepDescriptor`] the UI can render, submits the
//! captured result, and classifies the run into an [`Outcome`].
//!
//! # Example
//!
//! ```rust,no_run
//! use workflow_ox::{EngineCredentials, RunProgress, StepOptions, TaskPayload, WorkflowEngine};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = WorkflowEngine::new(
//!     EngineCredentials::builder()
//!         .workflow_service_url("https://workflow.example.com/v4")
//!         .workflow_run_id("run-123")
//!         .token("sdk-token")
//!         .build(),
//! );
//!
//! let run = engine.fetch_run().await?;
//! if let RunProgress::Step(step) = workflow_ox::next_step(&run, &StepOptions::new()) {
//!     println!("render {}", step.step_type);
//!     let task = run.current_task_id().unwrap_or_default();
//!     engine.submit_task_completion(task, &TaskPayload::empty()).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
mod internal;
pub mod outcome;
pub mod payload;
pub mod resolver;
pub mod run;
pub mod step;
pub mod task;

// Re-export main types
pub use error::WorkflowRequestError;
pub use outcome::{Outcome, classify};
pub use payload::TaskPayload;
pub use resolver::{RunProgress, StepResolution, next_step, resolve_step, resolve_task};
pub use run::WorkflowRun;
pub use step::{StepConfig, StepDescriptor, StepOptions, StepType};
pub use task::TaskId;

use bon::Builder;
use core::fmt;
#[cfg(feature = "leaky-bucket")]
use leaky_bucket::RateLimiter;
use serde_json::{Map, Value};
#[cfg(feature = "leaky-bucket")]
use std::sync::Arc;

use crate::internal::WorkflowRequestHelper;

/// Where the run lives and how to authenticate. Fixed for the engine's lifetime.
#[derive(Clone, Builder)]
pub struct EngineCredentials {
    /// Bearer token; requests are sent unauthenticated without one
    #[builder(into)]
    pub token: Option<String>,
    #[builder(into)]
    pub workflow_run_id: String,
    #[builder(into)]
    pub workflow_service_url: String,
}

impl fmt::Debug for EngineCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineCredentials")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("workflow_run_id", &self.workflow_run_id)
            .field("workflow_service_url", &self.workflow_service_url)
            .finish()
    }
}

/// Client for one workflow run.
///
/// Each call is a single request; failures are returned as-is and never retried. Calls are not
/// sequenced against each other, so await a submission before issuing the next one.
#[derive(Clone, Builder)]
pub struct WorkflowEngine {
    pub(crate) credentials: EngineCredentials,
    #[builder(default)]
    pub(crate) client: reqwest::Client,
    #[cfg(feature = "leaky-bucket")]
    pub(crate) leaky_bucket: Option<Arc<RateLimiter>>,
}

impl WorkflowEngine {
    pub fn new(credentials: EngineCredentials) -> Self {
        Self {
            credentials,
            client: reqwest::Client::new(),
            #[cfg(feature = "leaky-bucket")]
            leaky_bucket: None,
        }
    }

    pub fn credentials(&self) -> &EngineCredentials {
        &self.credentials
    }

    /// Create request helper for internal use
    fn request_helper(&self) -> WorkflowRequestHelper {
        WorkflowRequestHelper::new(self.client.clone(), &self.credentials)
    }

    #[cfg(feature = "leaky-bucket")]
    async fn throttle(&self) {
        if let Some(ref limiter) = self.leaky_bucket {
            limiter.acquire_one().await;
        }
    }

    #[cfg(not(feature = "leaky-bucket"))]
    #[allow(clippy::unused_async)]
    async fn throttle(&self) {}
}

impl WorkflowEngine {
    /// Fetch the current state of the run.
    ///
    /// # Errors
    /// [`WorkflowRequestError::Transport`] when the service is unreachable,
    /// [`WorkflowRequestError::Api`] for a non-success status and
    /// [`WorkflowRequestError::MalformedResponse`] when the body is not a run.
    pub async fn fetch_run(&self) -> Result<WorkflowRun, WorkflowRequestError> {
        self.throttle().await;
        log::debug!("fetching workflow run {}", self.credentials.workflow_run_id);

        self.request_helper().get_run().await
    }

    /// Complete `task_id` with `payload` and return the advanced run.
    ///
    /// `task_id` is sent as given. No idempotency key is attached, so resubmitting after a
    /// client-side timeout may apply the result twice.
    ///
    /// # Errors
    /// Same as [`WorkflowEngine::fetch_run`].
    pub async fn submit_task_completion(
        &self,
        task_id: &str,
        payload: &TaskPayload,
    ) -> Result<WorkflowRun, WorkflowRequestError> {
        self.throttle().await;
        log::debug!(
            "completing task {task_id:?} on workflow run {}",
            self.credentials.workflow_run_id
        );

        self.request_helper().complete_task(task_id, payload).await
    }

    /// Complete a task from separate capture and form results; see [`TaskPayload::from_parts`].
    ///
    /// # Errors
    /// Same as [`WorkflowEngine::fetch_run`].
    pub async fn complete_task(
        &self,
        task_id: &str,
        form: Option<Map<String, Value>>,
        capture: Option<Vec<Value>>,
    ) -> Result<WorkflowRun, WorkflowRequestError> {
        let payload = TaskPayload::from_parts(capture, form);
        self.submit_task_completion(task_id, &payload).await
    }

    pub fn outcome_step(&self, run: &WorkflowRun) -> Outcome {
        classify(run)
    }

    pub fn workflow_step(&self, task_id: Option<&str>, base: &StepOptions) -> StepResolution {
        resolve_step(task_id, base)
    }
}

impl fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("credentials", &self.credentials)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
