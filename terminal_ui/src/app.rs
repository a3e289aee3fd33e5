use anyhow::Context;
use async_trait::async_trait;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use taskdeck_shared::Filter;
use tracing::{debug, info, warn};
use tui::{backend::Backend, Terminal};

use crate::api::TaskApi;
use crate::dashboard::{Confirm, Dashboard};
use crate::form::{FormAction, TaskForm};
use crate::navigation::{Route, Router};
use crate::session::SessionProvider;
use crate::ui::{self, DashboardView, Overlay};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SelectNext,
    SelectPrev,
    SetFilter(Filter),
    NextFilter,
    PrevFilter,
    Toggle,
    StartAdd,
    StartEdit,
    Delete,
    DismissError,
    Refresh,
    Logout,
}

pub fn browse_action(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Action::Quit);
    }
    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Down | KeyCode::Char('j') => Action::SelectNext,
        KeyCode::Up | KeyCode::Char('k') => Action::SelectPrev,
        KeyCode::Char('1') => Action::SetFilter(Filter::All),
        KeyCode::Char('2') => Action::SetFilter(Filter::Pending),
        KeyCode::Char('3') => Action::SetFilter(Filter::Completed),
        KeyCode::Tab => Action::NextFilter,
        KeyCode::BackTab => Action::PrevFilter,
        KeyCode::Char(' ') => Action::Toggle,
        KeyCode::Char('a') => Action::StartAdd,
        KeyCode::Char('e') | KeyCode::Enter => Action::StartEdit,
        KeyCode::Char('d') | KeyCode::Delete => Action::Delete,
        KeyCode::Char('x') => Action::DismissError,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('L') => Action::Logout,
        _ => return None,
    };
    Some(action)
}

enum Mode {
    Browse,
    Adding(TaskForm),
    Editing(TaskForm),
}

pub struct App<A, S> {
    dashboard: Dashboard<A, S, Router>,
    mode: Mode,
    selected: usize,
    quit: bool,
}

impl<A, S> App<A, S>
where
    A: TaskApi,
    S: SessionProvider,
{
    pub fn new(dashboard: Dashboard<A, S, Router>) -> Self {
        Self {
            dashboard,
            mode: Mode::Browse,
            selected: 0,
            quit: false,
        }
    }

    pub fn dashboard(&self) -> &Dashboard<A, S, Router> {
        &self.dashboard
    }

    fn route(&self) -> Route {
        self.dashboard.navigator().current()
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let view = DashboardView::capture(&self.dashboard, self.selected);
        terminal
            .draw(|f| {
                let overlay = match &self.mode {
                    Mode::Browse => Overlay::None,
                    Mode::Adding(form) => Overlay::AddForm(form),
                    Mode::Editing(form) => Overlay::EditForm(form),
                };
                ui::draw(f, &view, overlay)
            })
            .context("failed to draw dashboard")?;
        Ok(())
    }

    fn draw_loading<B: Backend>(
        &self,
        terminal: &mut Terminal<B>,
        filter: Filter,
    ) -> anyhow::Result<()> {
        let mut view = DashboardView::capture(&self.dashboard, self.selected);
        view.filter = filter;
        view.loading = true;
        terminal
            .draw(|f| ui::draw(f, &view, Overlay::None))
            .context("failed to draw dashboard")?;
        Ok(())
    }

    fn selected_task_id(&self) -> Option<u64> {
        self.dashboard
            .displayed_tasks()
            .get(self.selected)
            .map(|task| task.id)
    }

    fn clamp_selection(&mut self) {
        let len = self.dashboard.displayed_tasks().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    async fn change_filter<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        filter: Filter,
    ) -> anyhow::Result<()> {
        self.draw_loading(terminal, filter)?;
        self.dashboard.change_filter(filter).await;
        self.selected = 0;
        Ok(())
    }

    async fn handle_browse<B: Backend>(
        &mut self,
        action: Action,
        terminal: &mut Terminal<B>,
        events: &mut EventStream,
    ) -> anyhow::Result<()> {
        debug!(?action, "browse action");
        match action {
            Action::Quit => self.quit = true,
            Action::SelectNext => self.selected = self.selected.saturating_add(1),
            Action::SelectPrev => self.selected = self.selected.saturating_sub(1),
            Action::SetFilter(filter) => self.change_filter(terminal, filter).await?,
            Action::NextFilter => {
                let filter = self.dashboard.filter().next();
                self.change_filter(terminal, filter).await?
            }
            Action::PrevFilter => {
                let filter = self.dashboard.filter().prev();
                self.change_filter(terminal, filter).await?
            }
            Action::Toggle => {
                if let Some(id) = self.selected_task_id() {
                    self.dashboard.toggle_complete(id).await;
                }
            }
            Action::StartAdd => self.mode = Mode::Adding(TaskForm::empty()),
            Action::StartEdit => {
                if let Some(id) = self.selected_task_id() {
                    if self.dashboard.begin_edit(id) {
                        if let Some(task) = self.dashboard.editing() {
                            self.mode = Mode::Editing(TaskForm::editing(task));
                        }
                    }
                }
            }
            Action::Delete => {
                if let Some(id) = self.selected_task_id() {
                    let backdrop = DashboardView::capture(&self.dashboard, self.selected);
                    let mut prompt = TerminalConfirm {
                        terminal,
                        events,
                        backdrop,
                    };
                    self.dashboard.delete_task(id, &mut prompt).await;
                }
            }
            Action::DismissError => self.dashboard.dismiss_error(),
            Action::Refresh => {
                let filter = self.dashboard.filter();
                self.draw_loading(terminal, filter)?;
                self.dashboard.refresh().await;
            }
            Action::Logout => self.dashboard.logout(),
        }
        self.clamp_selection();
        Ok(())
    }

    async fn handle_key<B: Backend>(
        &mut self,
        key: KeyEvent,
        terminal: &mut Terminal<B>,
        events: &mut EventStream,
    ) -> anyhow::Result<()> {
        if let Mode::Browse = self.mode {
            if let Some(action) = browse_action(key) {
                self.handle_browse(action, terminal, events).await?;
            }
        } else {
            self.handle_form_key(key).await;
        }
        Ok(())
    }

    /// Feeds `key` to the open add or edit form. A submitted form closes
    /// only once the dashboard accepts it.
    async fn handle_form_key(&mut self, key: KeyEvent) {
        match &mut self.mode {
            Mode::Browse => {}
            Mode::Adding(form) => match form.handle_key(key) {
                FormAction::Continue => {}
                FormAction::Cancel => self.mode = Mode::Browse,
                FormAction::Submit => {
                    let (title, description) = (form.title.clone(), form.description.clone());
                    if self.dashboard.create_task(&title, &description).await {
                        self.mode = Mode::Browse;
                        self.selected = 0;
                    }
                }
            },
            Mode::Editing(form) => match form.handle_key(key) {
                FormAction::Continue => {}
                FormAction::Cancel => {
                    self.dashboard.cancel_edit();
                    self.mode = Mode::Browse;
                }
                FormAction::Submit => {
                    let Some(id) = form.task_id() else {
                        self.mode = Mode::Browse;
                        return;
                    };
                    let patch = form.patch();
                    self.dashboard.save_edit(id, &patch).await;
                    if self.dashboard.editing().is_none() {
                        self.mode = Mode::Browse;
                    }
                }
            },
        }
    }
}

/// Confirmation prompt drawn over a snapshot of the dashboard. Blocks the
/// loop until the user answers.
struct TerminalConfirm<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    events: &'a mut EventStream,
    backdrop: DashboardView,
}

#[async_trait(?Send)]
impl<'a, B: Backend> Confirm for TerminalConfirm<'a, B> {
    async fn confirm(&mut self, prompt: &str) -> bool {
        let backdrop = &self.backdrop;
        if let Err(err) = self
            .terminal
            .draw(|f| ui::draw(f, backdrop, Overlay::Confirm(prompt)))
        {
            warn!(error = %err, "failed to draw confirmation prompt");
            return false;
        }

        while let Some(event) = self.events.next().await {
            let key = match event {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
                Ok(_) => continue,
                Err(err) => {
                    warn!(error = %err, "terminal event error during prompt");
                    return false;
                }
            };
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => return true,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return false,
                _ => {}
            }
        }
        false
    }
}

/// Drives the dashboard until the user quits or the view is sent away from
/// it (logout, missing session). Returns the final route.
pub async fn run<A, S, B>(
    terminal: &mut Terminal<B>,
    dashboard: Dashboard<A, S, Router>,
) -> anyhow::Result<Route>
where
    A: TaskApi,
    S: SessionProvider,
    B: Backend,
{
    let mut app = App::new(dashboard);
    let mut events = EventStream::new();

    app.draw(terminal)?;
    app.dashboard.initialize().await;

    while !app.quit && app.route() == Route::Dashboard {
        app.draw(terminal)?;

        let Some(event) = events.next().await else {
            break;
        };
        match event.context("failed to read terminal event")? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                app.handle_key(key, terminal, &mut events).await?;
            }
            _ => {}
        }
    }

    let route = app.route();
    info!(%route, quit = app.quit, "dashboard closed");
    Ok(route)
}
