use async_trait::async_trait;
use reqwest::Method;
use taskdeck_shared::{CreateTaskRequest, Filter, Task, TaskId, UpdateTaskRequest, UserId};
use tracing::instrument;

use crate::error::Result;
use crate::http::ApiClient;

/// Remote task service. Every call is scoped to a user.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn get_tasks(&self, user_id: UserId, filter: Filter) -> Result<Vec<Task>>;

    async fn create_task(&self, user_id: UserId, request: &CreateTaskRequest) -> Result<Task>;

    async fn update_task(
        &self,
        user_id: UserId,
        task_id: TaskId,
        request: &UpdateTaskRequest,
    ) -> Result<Task>;

    async fn toggle_complete(&self, user_id: UserId, task_id: TaskId) -> Result<Task>;

    async fn delete_task(&self, user_id: UserId, task_id: TaskId) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: ApiClient,
}

impl HttpTaskApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

fn tasks_path(user_id: UserId) -> String {
    format!("{user_id}/tasks")
}

fn task_path(user_id: UserId, task_id: TaskId) -> String {
    format!("{user_id}/tasks/{task_id}")
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    #[instrument(skip(self))]
    async fn get_tasks(&self, user_id: UserId, filter: Filter) -> Result<Vec<Task>> {
        let request = self.client.request::<()>(
            Method::GET,
            &tasks_path(user_id),
            &[("status", filter.as_str())],
            None,
        )?;
        self.client.send_json(request).await
    }

    #[instrument(skip(self, request), fields(title_len = request.title.len()))]
    async fn create_task(&self, user_id: UserId, request: &CreateTaskRequest) -> Result<Task> {
        let request = self
            .client
            .request(Method::POST, &tasks_path(user_id), &[], Some(request))?;
        self.client.send_json(request).await
    }

    #[instrument(skip(self, request))]
    async fn update_task(
        &self,
        user_id: UserId,
        task_id: TaskId,
        request: &UpdateTaskRequest,
    ) -> Result<Task> {
        let request = self.client.request(
            Method::PUT,
            &task_path(user_id, task_id),
            &[],
            Some(request),
        )?;
        self.client.send_json(request).await
    }

    #[instrument(skip(self))]
    async fn toggle_complete(&self, user_id: UserId, task_id: TaskId) -> Result<Task> {
        let path = format!("{}/complete", task_path(user_id, task_id));
        let request = self.client.request::<()>(Method::PATCH, &path, &[], None)?;
        self.client.send_json(request).await
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, user_id: UserId, task_id: TaskId) -> Result<()> {
        let request =
            self.client
                .request::<()>(Method::DELETE, &task_path(user_id, task_id), &[], None)?;
        self.client.send_empty(request).await
    }
}
