//! Dashboard view controller.
//!
//! Owns the view state (current user, task collection, active filter, load
//! status, edit selection) and reconciles it with the task service after
//! every user action. Handlers take `&mut self`, so the terminal loop runs
//! them one at a time and requests never overlap; the last completed
//! response is what the collection reflects.

use async_trait::async_trait;
use taskdeck_shared::{
    displayed_tasks, CreateTaskRequest, Filter, Task, TaskId, TaskPatch, User, UserId,
    ValidationError,
};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::api::TaskApi;
use crate::error::ApiError;
use crate::navigation::{Navigator, Route};
use crate::session::SessionProvider;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Not initialized yet.
    Idle,
    /// No valid session; the view has been sent to sign-in.
    Unauthenticated,
    Loading,
    Ready,
    /// Most recent failure. Loaded data stays visible.
    Error(String),
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Task not found for update")]
    NotFound(TaskId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Blocking yes/no prompt shown before destructive actions.
#[async_trait(?Send)]
pub trait Confirm {
    async fn confirm(&mut self, prompt: &str) -> bool;
}

pub struct Dashboard<A, S, N> {
    api: A,
    session: S,
    navigator: N,
    user: Option<User>,
    tasks: Vec<Task>,
    filter: Filter,
    status: Status,
    flash: Option<String>,
    editing: Option<Task>,
}

impl<A, S, N> Dashboard<A, S, N>
where
    A: TaskApi,
    S: SessionProvider,
    N: Navigator,
{
    pub fn new(api: A, session: S, navigator: N) -> Self {
        Self {
            api,
            session,
            navigator,
            user: None,
            tasks: Vec::new(),
            filter: Filter::All,
            status: Status::Idle,
            flash: None,
            editing: None,
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            Status::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn flash(&self) -> Option<&str> {
        self.flash.as_deref()
    }

    pub fn editing(&self) -> Option<&Task> {
        self.editing.as_ref()
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn displayed_tasks(&self) -> Vec<&Task> {
        displayed_tasks(&self.tasks, self.filter)
    }

    /// Verifies the session, resolves the user and loads their tasks under
    /// the active filter.
    #[instrument(skip(self), fields(filter = %self.filter))]
    pub async fn initialize(&mut self) {
        let Some(token) = self.session.auth_token() else {
            info!("no session token, redirecting to sign-in");
            self.status = Status::Unauthenticated;
            self.navigator.push(Route::SignIn);
            return;
        };

        self.status = Status::Loading;

        let user = match self.session.user_from_server(&token).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.end_session();
                return;
            }
            Err(err) => {
                self.report_error(format!("Failed to load data: {err}"));
                return;
            }
        };
        let user_id = user.id;
        self.user = Some(user);

        match self.api.get_tasks(user_id, self.filter).await {
            Ok(tasks) => {
                info!(user_id, count = tasks.len(), "tasks loaded");
                self.tasks = tasks;
                self.status = Status::Ready;
            }
            Err(err) => self.report_error(format!("Failed to load data: {err}")),
        }
    }

    pub async fn change_filter(&mut self, filter: Filter) {
        if filter == self.filter && self.status == Status::Ready {
            debug!(%filter, "filter unchanged");
            return;
        }
        self.filter = filter;
        self.initialize().await;
    }

    pub async fn refresh(&mut self) {
        self.initialize().await;
    }

    /// Records a task the add form already created on the server.
    pub fn task_added(&mut self, task: Task) {
        debug!(task_id = task.id, "task added");
        self.tasks.insert(0, task);
        self.report_success("Task added successfully!");
    }

    #[instrument(skip(self, title, description))]
    pub async fn create_task(&mut self, title: &str, description: &str) -> bool {
        let Some(user_id) = self.user_id() else {
            return false;
        };
        match self.submit_new_task(user_id, title, description).await {
            Ok(task) => {
                self.task_added(task);
                true
            }
            Err(err) => {
                self.report_error(format!("Failed to add task: {err}"));
                false
            }
        }
    }

    async fn submit_new_task(
        &self,
        user_id: UserId,
        title: &str,
        description: &str,
    ) -> Result<Task, DashboardError> {
        let request = CreateTaskRequest::new(title, description)?;
        Ok(self.api.create_task(user_id, &request).await?)
    }

    /// Sends the patched title/description of a loaded task and replaces it
    /// with the server's copy. Unknown ids fail without contacting the server.
    #[instrument(skip(self, patch))]
    pub async fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> bool {
        let Some(user_id) = self.user_id() else {
            return false;
        };
        match self.apply_update(user_id, id, patch).await {
            Ok(()) => {
                self.report_success("Task updated successfully!");
                true
            }
            Err(err) => {
                self.report_error(format!("Failed to update task: {err}"));
                false
            }
        }
    }

    async fn apply_update(
        &mut self,
        user_id: UserId,
        id: TaskId,
        patch: &TaskPatch,
    ) -> Result<(), DashboardError> {
        let existing = self
            .tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or(DashboardError::NotFound(id))?;
        let request = patch.to_request(existing)?;

        let updated = self.api.update_task(user_id, id, &request).await?;
        self.replace_task(updated);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn toggle_complete(&mut self, id: TaskId) -> bool {
        let Some(user_id) = self.user_id() else {
            return false;
        };
        match self.api.toggle_complete(user_id, id).await {
            Ok(updated) => {
                self.replace_task(updated);
                self.report_success("Task completion status updated!");
                true
            }
            Err(err) => {
                self.report_error(format!("Failed to toggle task completion: {err}"));
                false
            }
        }
    }

    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        self.editing = self.tasks.iter().find(|task| task.id == id).cloned();
        self.editing.is_some()
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Saves the edit dialog. The dialog closes once the update is applied;
    /// on failure it stays open with the pending edit next to the error.
    pub async fn save_edit(&mut self, id: TaskId, patch: &TaskPatch) -> bool {
        let saved = self.update_task(id, patch).await;
        if saved {
            self.editing = None;
        } else {
            warn!(task_id = id, "edit not saved, keeping dialog open");
        }
        saved
    }

    #[instrument(skip(self, confirm))]
    pub async fn delete_task<C>(&mut self, id: TaskId, confirm: &mut C) -> bool
    where
        C: Confirm + ?Sized,
    {
        let Some(user_id) = self.user_id() else {
            return false;
        };
        if !confirm.confirm(DELETE_PROMPT).await {
            debug!(task_id = id, "delete declined");
            return false;
        }
        match self.api.delete_task(user_id, id).await {
            Ok(()) => {
                self.tasks.retain(|task| task.id != id);
                if self.editing.as_ref().is_some_and(|task| task.id == id) {
                    self.editing = None;
                }
                self.report_success("Task deleted successfully!");
                true
            }
            Err(err) => {
                self.report_error(format!("Failed to delete task: {err}"));
                false
            }
        }
    }

    pub fn logout(&mut self) {
        info!("logging out");
        self.end_session();
    }

    pub fn dismiss_error(&mut self) {
        if let Status::Error(_) = self.status {
            self.status = Status::Ready;
        }
    }

    fn user_id(&self) -> Option<UserId> {
        let id = self.user.as_ref().map(|user| user.id);
        if id.is_none() {
            warn!("action ignored, no user loaded");
        }
        id
    }

    fn replace_task(&mut self, updated: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == updated.id) {
            *slot = updated;
        }
    }

    fn end_session(&mut self) {
        self.session.logout();
        self.user = None;
        self.tasks.clear();
        self.editing = None;
        self.flash = None;
        self.status = Status::Unauthenticated;
        self.navigator.push(Route::SignIn);
    }

    fn report_error(&mut self, message: String) {
        error!(error = %message, "dashboard error");
        self.flash = None;
        self.status = Status::Error(message);
    }

    fn report_success(&mut self, message: &str) {
        info!(notice = message, "dashboard notice");
        self.flash = Some(message.to_string());
        if let Status::Error(_) = self.status {
            self.status = Status::Ready;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use taskdeck_shared::UpdateTaskRequest;

    use super::*;
    use crate::error::Result as ApiResult;
    use crate::navigation::Router;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        GetTasks(UserId, Filter),
        Create(UserId, CreateTaskRequest),
        Update(UserId, TaskId, UpdateTaskRequest),
        Toggle(UserId, TaskId),
        Delete(UserId, TaskId),
    }

    #[derive(Default)]
    struct FakeApi {
        server: Mutex<Vec<Task>>,
        calls: Mutex<Vec<Call>>,
        fail_with: Mutex<Option<String>>,
    }

    impl FakeApi {
        fn with_tasks(tasks: Vec<Task>) -> Self {
            let api = Self::default();
            *api.server.lock().unwrap() = tasks;
            api
        }

        fn record(&self, call: Call) -> ApiResult<()> {
            self.calls.lock().unwrap().push(call);
            match self.fail_with.lock().unwrap().clone() {
                Some(message) => Err(ApiError::Status {
                    status: 500,
                    message,
                }),
                None => Ok(()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn fail(&self, message: &str) {
            *self.fail_with.lock().unwrap() = Some(message.to_string());
        }
    }

    #[async_trait]
    impl TaskApi for FakeApi {
        async fn get_tasks(&self, user_id: UserId, filter: Filter) -> ApiResult<Vec<Task>> {
            self.record(Call::GetTasks(user_id, filter))?;
            let server = self.server.lock().unwrap();
            Ok(displayed_tasks(&server, filter).into_iter().cloned().collect())
        }

        async fn create_task(
            &self,
            user_id: UserId,
            request: &CreateTaskRequest,
        ) -> ApiResult<Task> {
            self.record(Call::Create(user_id, request.clone()))?;
            let mut server = self.server.lock().unwrap();
            let id = server.iter().map(|t| t.id).max().unwrap_or(0) + 1;
            let created = Task {
                id,
                title: request.title.clone(),
                description: request.description.clone(),
                completed: false,
                created_at: "now".to_string(),
                updated_at: "now".to_string(),
            };
            server.push(created.clone());
            Ok(created)
        }

        async fn update_task(
            &self,
            user_id: UserId,
            task_id: TaskId,
            request: &UpdateTaskRequest,
        ) -> ApiResult<Task> {
            self.record(Call::Update(user_id, task_id, request.clone()))?;
            let mut server = self.server.lock().unwrap();
            let task = server.iter_mut().find(|t| t.id == task_id).ok_or(
                ApiError::Status {
                    status: 404,
                    message: "Task not found".to_string(),
                },
            )?;
            task.title = request.title.clone();
            task.description = request.description.clone();
            task.updated_at = "later".to_string();
            Ok(task.clone())
        }

        async fn toggle_complete(&self, user_id: UserId, task_id: TaskId) -> ApiResult<Task> {
            self.record(Call::Toggle(user_id, task_id))?;
            let mut server = self.server.lock().unwrap();
            let task = server.iter_mut().find(|t| t.id == task_id).ok_or(
                ApiError::Status {
                    status: 404,
                    message: "Task not found".to_string(),
                },
            )?;
            task.completed = !task.completed;
            Ok(task.clone())
        }

        async fn delete_task(&self, user_id: UserId, task_id: TaskId) -> ApiResult<()> {
            self.record(Call::Delete(user_id, task_id))?;
            self.server.lock().unwrap().retain(|t| t.id != task_id);
            Ok(())
        }
    }

    struct FakeSession {
        token: Option<String>,
        user: Option<User>,
        logged_out: AtomicBool,
    }

    impl FakeSession {
        fn signed_in() -> Self {
            Self {
                token: Some("token".to_string()),
                user: Some(user()),
                logged_out: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl SessionProvider for FakeSession {
        fn auth_token(&self) -> Option<String> {
            self.token.clone()
        }

        async fn user_from_server(&self, _token: &str) -> ApiResult<Option<User>> {
            Ok(self.user.clone())
        }

        fn logout(&self) {
            self.logged_out.store(true, Ordering::SeqCst);
        }
    }

    struct Answer(bool);

    #[async_trait(?Send)]
    impl Confirm for Answer {
        async fn confirm(&mut self, prompt: &str) -> bool {
            assert_eq!(prompt, DELETE_PROMPT);
            self.0
        }
    }

    fn user() -> User {
        User {
            id: 7,
            email: "ada@example.com".to_string(),
            full_name: Some("Ada".to_string()),
        }
    }

    fn task(id: TaskId, title: &str, completed: bool) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: format!("about {title}"),
            completed,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    async fn ready(tasks: Vec<Task>) -> Dashboard<FakeApi, FakeSession, Router> {
        let mut dashboard =
            Dashboard::new(FakeApi::with_tasks(tasks), FakeSession::signed_in(), Router::new());
        dashboard.initialize().await;
        assert_eq!(dashboard.status(), &Status::Ready);
        dashboard
    }

    #[tokio::test]
    async fn initialize_loads_user_and_tasks() {
        let dashboard = ready(vec![task(1, "A", false), task(2, "B", true)]).await;

        assert_eq!(dashboard.user(), Some(&user()));
        assert_eq!(dashboard.tasks().len(), 2);
        assert_eq!(dashboard.api.calls(), vec![Call::GetTasks(7, Filter::All)]);
        assert_eq!(dashboard.navigator().current(), Route::Dashboard);
    }

    #[tokio::test]
    async fn missing_token_redirects_without_fetching() {
        let session = FakeSession {
            token: None,
            ..FakeSession::signed_in()
        };
        let mut dashboard = Dashboard::new(FakeApi::default(), session, Router::new());
        dashboard.initialize().await;

        assert_eq!(dashboard.status(), &Status::Unauthenticated);
        assert_eq!(dashboard.navigator().current().path(), "/auth/signin");
        assert!(dashboard.api.calls().is_empty());
        assert!(dashboard.user().is_none());
    }

    #[tokio::test]
    async fn rejected_session_clears_it_and_redirects() {
        let session = FakeSession {
            user: None,
            ..FakeSession::signed_in()
        };
        let mut dashboard = Dashboard::new(FakeApi::default(), session, Router::new());
        dashboard.initialize().await;

        assert!(dashboard.session.logged_out.load(Ordering::SeqCst));
        assert_eq!(dashboard.navigator().current(), Route::SignIn);
        assert!(dashboard.api.calls().is_empty());
    }

    #[tokio::test]
    async fn task_fetch_failure_surfaces_reason_and_keeps_collection() {
        let api = FakeApi::default();
        api.fail("database unavailable");
        let mut dashboard = Dashboard::new(api, FakeSession::signed_in(), Router::new());
        dashboard.initialize().await;

        assert!(!dashboard.is_loading());
        let message = dashboard.error().expect("error banner");
        assert!(message.starts_with("Failed to load data:"));
        assert!(message.contains("database unavailable"));
        assert!(dashboard.tasks().is_empty());
        assert!(dashboard.user().is_some());
    }

    #[tokio::test]
    async fn change_filter_refetches_from_server() {
        let mut dashboard = ready(vec![task(1, "A", false), task(2, "B", true)]).await;

        dashboard.change_filter(Filter::Completed).await;

        assert_eq!(dashboard.filter(), Filter::Completed);
        assert_eq!(
            dashboard.api.calls(),
            vec![
                Call::GetTasks(7, Filter::All),
                Call::GetTasks(7, Filter::Completed)
            ]
        );
        let ids: Vec<_> = dashboard.displayed_tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn failed_refetch_keeps_stale_tasks_then_recovers() {
        let mut dashboard = ready(vec![task(1, "A", false)]).await;
        dashboard.api.fail("timeout");
        dashboard.change_filter(Filter::Pending).await;
        assert!(dashboard.error().is_some());
        assert_eq!(dashboard.tasks().len(), 1);

        *dashboard.api.fail_with.lock().unwrap() = None;
        dashboard.change_filter(Filter::All).await;
        assert_eq!(dashboard.status(), &Status::Ready);
    }

    #[tokio::test]
    async fn added_task_goes_first() {
        let mut dashboard = ready(vec![task(1, "A", false), task(2, "B", false)]).await;

        dashboard.task_added(task(9, "New", false));

        assert_eq!(dashboard.tasks()[0].id, 9);
        assert_eq!(dashboard.flash(), Some("Task added successfully!"));
    }

    #[tokio::test]
    async fn create_task_validates_before_calling_server() {
        let mut dashboard = ready(vec![task(1, "A", false)]).await;

        assert!(!dashboard.create_task("   ", "").await);
        assert_eq!(
            dashboard.error(),
            Some("Failed to add task: Title cannot be empty")
        );
        assert_eq!(dashboard.api.calls().len(), 1);

        assert!(dashboard.create_task(" Write tests ", "").await);
        assert_eq!(dashboard.tasks()[0].title, "Write tests");
        assert_eq!(dashboard.error(), None);
    }

    #[tokio::test]
    async fn update_with_only_title_keeps_description() {
        let mut dashboard = ready(vec![task(1, "A", false)]).await;

        assert!(dashboard.update_task(1, &TaskPatch::title("A2")).await);

        let expected = UpdateTaskRequest {
            title: "A2".to_string(),
            description: "about A".to_string(),
        };
        assert_eq!(dashboard.api.calls()[1], Call::Update(7, 1, expected));
        assert_eq!(dashboard.tasks()[0].title, "A2");
        assert_eq!(dashboard.tasks()[0].updated_at, "later");
    }

    #[tokio::test]
    async fn update_with_only_description_or_nothing_keeps_rest() {
        let mut dashboard = ready(vec![task(1, "A", false)]).await;

        dashboard.update_task(1, &TaskPatch::description("new")).await;
        dashboard.update_task(1, &TaskPatch::default()).await;

        let calls = dashboard.api.calls();
        assert_eq!(
            calls[1],
            Call::Update(
                7,
                1,
                UpdateTaskRequest {
                    title: "A".to_string(),
                    description: "new".to_string()
                }
            )
        );
        assert_eq!(
            calls[2],
            Call::Update(
                7,
                1,
                UpdateTaskRequest {
                    title: "A".to_string(),
                    description: "new".to_string()
                }
            )
        );
    }

    #[tokio::test]
    async fn update_sends_omitted_fields_as_stored() {
        let mut padded = task(1, "A", false);
        padded.description = "  indented notes".to_string();
        let mut long = task(2, "B", false);
        long.title = "t".repeat(250);
        let mut dashboard = ready(vec![padded, long.clone()]).await;

        assert!(dashboard.update_task(1, &TaskPatch::title("A2")).await);
        assert!(dashboard.update_task(2, &TaskPatch::description("short")).await);

        let calls = dashboard.api.calls();
        assert_eq!(
            calls[1],
            Call::Update(
                7,
                1,
                UpdateTaskRequest {
                    title: "A2".to_string(),
                    description: "  indented notes".to_string()
                }
            )
        );
        assert_eq!(
            calls[2],
            Call::Update(
                7,
                2,
                UpdateTaskRequest {
                    title: long.title.clone(),
                    description: "short".to_string()
                }
            )
        );
        assert_eq!(dashboard.error(), None);
        assert_eq!(dashboard.tasks()[0].description, "  indented notes");
    }

    #[tokio::test]
    async fn update_of_unknown_task_never_reaches_server() {
        let mut dashboard = ready(vec![task(1, "A", false)]).await;

        assert!(!dashboard.update_task(42, &TaskPatch::title("x")).await);

        assert_eq!(dashboard.api.calls().len(), 1);
        assert_eq!(
            dashboard.error(),
            Some("Failed to update task: Task not found for update")
        );
    }

    #[tokio::test]
    async fn failed_update_leaves_state_unchanged() {
        let mut dashboard = ready(vec![task(1, "A", false)]).await;
        dashboard.api.fail("boom");

        assert!(!dashboard.update_task(1, &TaskPatch::title("B")).await);

        assert_eq!(dashboard.tasks()[0].title, "A");
        assert_eq!(dashboard.error(), Some("Failed to update task: boom"));
    }

    #[tokio::test]
    async fn toggle_uses_server_record() {
        let mut dashboard = ready(vec![task(1, "A", false)]).await;

        assert!(dashboard.toggle_complete(1).await);

        assert_eq!(
            dashboard.tasks(),
            &[Task {
                completed: true,
                ..task(1, "A", false)
            }]
        );
        assert_eq!(dashboard.flash(), Some("Task completion status updated!"));
    }

    #[tokio::test]
    async fn toggle_failure_reports_error() {
        let mut dashboard = ready(vec![task(1, "A", false)]).await;
        dashboard.api.fail("offline");

        assert!(!dashboard.toggle_complete(1).await);
        assert!(!dashboard.tasks()[0].completed);
        assert_eq!(
            dashboard.error(),
            Some("Failed to toggle task completion: offline")
        );
    }

    #[tokio::test]
    async fn save_edit_closes_dialog_only_on_success() {
        let mut dashboard = ready(vec![task(1, "A", false)]).await;
        assert!(dashboard.begin_edit(1));

        dashboard.api.fail("conflict");
        dashboard.save_edit(1, &TaskPatch::title("B")).await;
        assert!(dashboard.editing().is_some());
        assert!(dashboard.error().is_some());

        *dashboard.api.fail_with.lock().unwrap() = None;
        dashboard.save_edit(1, &TaskPatch::title("B")).await;
        assert!(dashboard.editing().is_none());
        assert_eq!(dashboard.tasks()[0].title, "B");
        assert_eq!(dashboard.error(), None);
    }

    #[tokio::test]
    async fn declined_delete_does_nothing() {
        let mut dashboard = ready(vec![task(1, "A", false)]).await;

        assert!(!dashboard.delete_task(1, &mut Answer(false)).await);

        assert_eq!(dashboard.tasks().len(), 1);
        assert_eq!(dashboard.api.calls().len(), 1);
        assert_eq!(dashboard.api.server.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn confirmed_delete_removes_task() {
        let mut dashboard = ready(vec![task(1, "A", false), task(2, "B", false)]).await;
        dashboard.begin_edit(1);

        assert!(dashboard.delete_task(1, &mut Answer(true)).await);

        let ids: Vec<_> = dashboard.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2]);
        assert!(dashboard.editing().is_none());
        assert_eq!(dashboard.flash(), Some("Task deleted successfully!"));
    }

    #[tokio::test]
    async fn failed_delete_keeps_task_and_reports_error() {
        let mut dashboard = ready(vec![task(1, "A", false), task(2, "B", false)]).await;
        dashboard.api.fail("locked");

        assert!(!dashboard.delete_task(1, &mut Answer(true)).await);

        let ids: Vec<_> = dashboard.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(dashboard.error(), Some("Failed to delete task: locked"));
        assert_eq!(dashboard.flash(), None);
        assert_eq!(dashboard.api.calls()[1], Call::Delete(7, 1));
    }

    #[tokio::test]
    async fn success_clears_previous_error() {
        let mut dashboard = ready(vec![task(1, "A", false)]).await;
        dashboard.update_task(5, &TaskPatch::default()).await;
        assert!(dashboard.error().is_some());

        dashboard.toggle_complete(1).await;
        assert_eq!(dashboard.status(), &Status::Ready);

        dashboard.update_task(5, &TaskPatch::default()).await;
        dashboard.dismiss_error();
        assert_eq!(dashboard.error(), None);
    }

    #[tokio::test]
    async fn logout_clears_state_without_task_calls() {
        let mut dashboard = ready(vec![task(1, "A", false)]).await;

        dashboard.logout();

        assert!(dashboard.session.logged_out.load(Ordering::SeqCst));
        assert!(dashboard.user().is_none());
        assert!(dashboard.tasks().is_empty());
        assert_eq!(dashboard.status(), &Status::Unauthenticated);
        assert_eq!(dashboard.navigator().current(), Route::SignIn);
        assert_eq!(dashboard.api.calls().len(), 1);
    }

    #[tokio::test]
    async fn actions_without_user_are_ignored() {
        let mut dashboard =
            Dashboard::new(FakeApi::default(), FakeSession::signed_in(), Router::new());

        assert!(!dashboard.toggle_complete(1).await);
        assert!(!dashboard.delete_task(1, &mut Answer(true)).await);
        assert!(dashboard.api.calls().is_empty());
    }
}
