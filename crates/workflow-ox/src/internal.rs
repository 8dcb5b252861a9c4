use workflow_ox_common::request_builder::{
    AuthMethod, Endpoint, HttpMethod, RequestBuilder, RequestConfig,
};

use crate::{
    EngineCredentials, WorkflowRequestError, WorkflowRun,
    payload::{CompleteTaskRequest, TaskPayload},
};

/// Workflow service calls on top of the common `RequestBuilder`
pub struct WorkflowRequestHelper {
    request_builder: RequestBuilder,
    workflow_run_id: String,
}

impl WorkflowRequestHelper {
    pub fn new(client: reqwest::Client, credentials: &EngineCredentials) -> Self {
        let config = RequestConfig::new(credentials.workflow_service_url.as_str())
            .with_optional_auth(credentials.token.clone().map(AuthMethod::Bearer))
            .with_header("content-type", "application/json");

        Self {
            request_builder: RequestBuilder::new(client, config),
            workflow_run_id: credentials.workflow_run_id.clone(),
        }
    }

    fn run_path(&self) -> String {
        format!("workflow_runs/{}", self.workflow_run_id)
    }

    /// `GET /workflow_runs/{id}`
    pub async fn get_run(&self) -> Result<WorkflowRun, WorkflowRequestError> {
        let endpoint = Endpoint::new(self.run_path(), HttpMethod::Get);

        Ok(self.request_builder.request(&endpoint).await?)
    }

    /// `POST /workflow_runs/{id}/complete`
    pub async fn complete_task(
        &self,
        task_id: &str,
        payload: &TaskPayload,
    ) -> Result<WorkflowRun, WorkflowRequestError> {
        let endpoint = Endpoint::new(format!("{}/complete", self.run_path()), HttpMethod::Post);
        let body = CompleteTaskRequest {
            task_id,
            data: payload,
        };

        Ok(self
            .request_builder
            .request_json(&endpoint, Some(&body))
            .await?)
    }
}
