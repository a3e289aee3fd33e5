use taskdeck_shared::{Filter, Task, User};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

use crate::api::TaskApi;
use crate::dashboard::Dashboard;
use crate::form::{Field, TaskForm};
use crate::navigation::Navigator;
use crate::session::SessionProvider;

pub const EMPTY_LIST_TEXT: &str = "No tasks yet. Add your first task to get started!";

/// Owned snapshot of what the dashboard shows. Prompts redraw it as their
/// backdrop while the controller is busy.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub user: Option<User>,
    pub filter: Filter,
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
    pub flash: Option<String>,
    pub selected: usize,
}

impl DashboardView {
    pub fn capture<A, S, N>(dashboard: &Dashboard<A, S, N>, selected: usize) -> Self
    where
        A: TaskApi,
        S: SessionProvider,
        N: Navigator,
    {
        Self {
            user: dashboard.user().cloned(),
            filter: dashboard.filter(),
            tasks: dashboard.displayed_tasks().into_iter().cloned().collect(),
            loading: dashboard.is_loading(),
            error: dashboard.error().map(str::to_string),
            flash: dashboard.flash().map(str::to_string),
            selected,
        }
    }
}

pub enum Overlay<'a> {
    None,
    AddForm(&'a TaskForm),
    EditForm(&'a TaskForm),
    Confirm(&'a str),
}

pub fn draw<B: Backend>(f: &mut Frame<B>, view: &DashboardView, overlay: Overlay<'_>) {
    let size = f.size();

    let Some(user) = view.user.as_ref() else {
        let text = match view.error.as_deref() {
            Some(error) => vec![
                Spans::from(Span::styled(error, Style::default().fg(Color::Red))),
                Spans::from("Press r to retry or q to quit."),
            ],
            None => vec![Spans::from("Loading user data...")],
        };
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("taskdeck"));
        f.render_widget(paragraph, size);
        return;
    };

    let banner_height = if view.error.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(banner_height),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(size);

    draw_header(f, chunks[0], user);
    if let Some(error) = view.error.as_deref() {
        draw_error_banner(f, chunks[1], error);
    }
    if let Some(flash) = view.flash.as_deref() {
        let line = Paragraph::new(Span::styled(flash, Style::default().fg(Color::Green)));
        f.render_widget(line, chunks[2]);
    }
    draw_filter_tabs(f, chunks[3], view.filter);
    draw_task_table(f, chunks[4], view);

    let hints = Paragraph::new(Span::styled(
        "a add  e edit  space toggle  d delete  1-3/tab filter  r refresh  x dismiss  L logout  q quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(hints, chunks[5]);

    match overlay {
        Overlay::None => {}
        Overlay::AddForm(form) => draw_form(f, size, "Add Task", form),
        Overlay::EditForm(form) => draw_form(f, size, "Edit Task", form),
        Overlay::Confirm(prompt) => draw_confirm(f, size, prompt),
    }
}

fn draw_header<B: Backend>(f: &mut Frame<B>, area: Rect, user: &User) {
    let mut spans = vec![
        Span::raw("Signed in as "),
        Span::styled(
            user.display_name().to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if user.full_name.is_some() {
        spans.push(Span::styled(
            format!(" <{}>", user.email),
            Style::default().fg(Color::LightBlue),
        ));
    }
    let header = Paragraph::new(Spans::from(spans))
        .block(Block::default().borders(Borders::ALL).title("taskdeck"));
    f.render_widget(header, area);
}

fn draw_error_banner<B: Backend>(f: &mut Frame<B>, area: Rect, error: &str) {
    let banner = Paragraph::new(Spans::from(vec![
        Span::styled("Error! ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(error.to_string()),
        Span::styled("  (x to dismiss)", Style::default().fg(Color::DarkGray)),
    ]))
    .style(Style::default().fg(Color::Red))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(banner, area);
}

fn draw_filter_tabs<B: Backend>(f: &mut Frame<B>, area: Rect, active: Filter) {
    let titles = Filter::ALL
        .iter()
        .enumerate()
        .map(|(i, filter)| Spans::from(format!("{} {}", i + 1, filter.label())))
        .collect();
    let selected = Filter::ALL
        .iter()
        .position(|filter| *filter == active)
        .unwrap_or_default();
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title("Filter"))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn draw_task_table<B: Backend>(f: &mut Frame<B>, area: Rect, view: &DashboardView) {
    let title = format!("Tasks - Total tasks: {}", view.tasks.len());
    let block = Block::default().borders(Borders::ALL).title(title);

    if view.loading || view.tasks.is_empty() {
        let text = if view.loading {
            "Loading tasks..."
        } else {
            EMPTY_LIST_TEXT
        };
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec!["ID", "Status", "Title", "Description"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = view.tasks.iter().map(|task| {
        let (status, color) = if task.completed {
            ("[x] Done", Color::Green)
        } else {
            ("[ ] Pending", Color::Yellow)
        };
        Row::new(vec![
            Cell::from(task.id.to_string()),
            Cell::from(Span::styled(status, Style::default().fg(color))),
            Cell::from(task.title.clone()),
            Cell::from(Span::styled(
                task.description.clone(),
                Style::default().fg(Color::LightBlue),
            )),
        ])
    });

    let widths = [
        Constraint::Length(5),
        Constraint::Length(12),
        Constraint::Percentage(35),
        Constraint::Min(10),
    ];
    let table = Table::new(rows)
        .header(header)
        .block(block)
        .widths(&widths)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(Some(view.selected.min(view.tasks.len() - 1)));
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_form<B: Backend>(f: &mut Frame<B>, area: Rect, title: &str, form: &TaskForm) {
    let field = |label: &str, value: &str, focused: bool| {
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let cursor = if focused { "_" } else { "" };
        Spans::from(vec![
            Span::styled(format!("{label}: "), style.add_modifier(Modifier::BOLD)),
            Span::styled(format!("{value}{cursor}"), style),
        ])
    };

    let text = vec![
        field("Title", &form.title, form.focus == Field::Title),
        Spans::from(""),
        field(
            "Description",
            &form.description,
            form.focus == Field::Description,
        ),
        Spans::from(""),
        Spans::from(Span::styled(
            "Tab switch field  Enter save  Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let popup = centered_rect(70, 40, area);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(title.to_string())),
        popup,
    );
}

fn draw_confirm<B: Backend>(f: &mut Frame<B>, area: Rect, prompt: &str) {
    let popup = centered_rect(50, 25, area);
    f.render_widget(Clear, popup);
    let text = vec![
        Spans::from(prompt.to_string()),
        Spans::from(""),
        Spans::from(Span::styled(
            "[y] yes   [n] no",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Confirm")
                    .border_style(Style::default().fg(Color::Red)),
            ),
        popup,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(vertical[1])[1]
}
