//! Screen rendering — the people list and its four states.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, Paragraph};
use throbber_widgets_tui::Throbber;

use roster_core::{Person, ViewState};

use crate::app::App;

/// Render one frame from the current app state.
pub fn render(frame: &mut Frame, app: &mut App) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, app);

    match app.view.clone() {
        ViewState::Idle => render_hint(frame, body, "Waiting for the directory…"),
        ViewState::Loading => render_loading(frame, body, app),
        ViewState::Error(message) => render_error(frame, body, app, &message),
        ViewState::Success(_) => render_list(frame, body, app),
    }

    render_footer(frame, footer, app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = Line::from(vec![
        Span::styled(" roster ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("— {} people", app.people.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_hint(frame: &mut Frame, area: Rect, text: &str) {
    let hint = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray),
    )))
    .centered();
    frame.render_widget(hint, vertical_center(area));
}

fn render_loading(frame: &mut Frame, area: Rect, app: &mut App) {
    let throbber = Throbber::default()
        .label("Loading directory…")
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
        .use_type(throbber_widgets_tui::WhichUse::Spin);
    frame.render_stateful_widget(throbber, vertical_center(area), &mut app.throbber);
}

fn render_error(frame: &mut Frame, area: Rect, app: &mut App, message: &str) {
    let [banner, rest] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);

    let lines = vec![
        Line::from(Span::styled(
            message.to_owned(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "press r to refresh",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), banner);

    // The previously loaded list stays on screen until a refresh fires.
    if !app.people.is_empty() {
        render_list(frame, rest, app);
    }
}

fn render_list(frame: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    app.list_rows = block.inner(area).height;

    let items: Vec<ListItem> = app
        .people
        .iter()
        .map(|person| ListItem::new(person_line(person)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let position = match (app.list_state.selected(), app.people.len()) {
        (Some(idx), total) if total > 0 => format!("{}/{total}", idx + 1),
        _ => String::new(),
    };
    let footer = Line::from(vec![
        Span::styled(
            " q quit · r refresh · j/k scroll ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(position, Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}

/// One list row: display name plus the identifier.
fn person_line(person: &Person) -> String {
    format!("{}  ({})", person.display_name, person.id)
}

/// A one-row strip in the vertical middle of `area`.
fn vertical_center(area: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);
    middle
}
