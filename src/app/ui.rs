//! UI rendering for the TUI

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::state::{AppState, FocusedPane, Mode};

/// quill icon
const ICON: &str = "📜";

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Main render function
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_main(frame, state, chunks[0]);
    render_status_bar(frame, state, chunks[1]);

    // Render modal dialogs
    match state.mode {
        Mode::Help => render_help_popup(frame),
        Mode::AddProject => render_input_popup(frame, " New Project ", &state.input),
        Mode::LinkProject => render_link_popup(frame, state),
        Mode::Search => render_search_popup(frame, state),
        Mode::DateRange => render_input_popup(frame, " Date Range (YYYY-MM-DD YYYY-MM-DD) ", &state.input),
        Mode::Normal => {}
    }
}

fn render_main(frame: &mut Frame, state: &AppState, area: Rect) {
    let constraints = if state.show_detail {
        vec![
            Constraint::Length(24),
            Constraint::Percentage(35),
            Constraint::Min(0),
        ]
    } else {
        vec![Constraint::Length(24), Constraint::Min(0)]
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    render_filters(frame, state, chunks[0]);
    render_articles(frame, state, chunks[1]);
    if state.show_detail {
        render_detail(frame, state, chunks[2]);
    }
}

fn render_filters(frame: &mut Frame, state: &AppState, area: Rect) {
    let items: Vec<ListItem> = state
        .core
        .filter_options()
        .iter()
        .map(|option| ListItem::new(option.clone()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" {ICON} Filters "))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style(state.focused_pane == FocusedPane::Filters)),
        )
        .highlight_style(highlight())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.core.filter_index()));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_articles(frame: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default()
        .title(" Articles ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style(state.focused_pane == FocusedPane::Articles));

    let titles = state.core.current_titles();
    if titles.is_empty() {
        let message = if state.loading {
            "Loading feed..."
        } else {
            "No articles available. Try changing filters."
        };
        let paragraph = Paragraph::new(message)
            .style(muted())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = titles
        .iter()
        .map(|title| ListItem::new(truncate(title, width)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.core.article_index()));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_detail(frame: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style(state.focused_pane == FocusedPane::Detail));

    let Some(article) = state.core.selected_article() else {
        let paragraph = Paragraph::new("No details available.")
            .style(muted())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let projects = state.core.projects_for_article(&article.link);
    let wrap_width = area.width.saturating_sub(4).max(16) as usize;

    let mut lines = vec![
        Line::from(Span::styled(
            article.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(article.authors.clone(), muted())),
        Line::from(Span::styled(
            article.date.format("%Y-%m-%d %H:%M").to_string(),
            muted(),
        )),
        Line::from(Span::styled(article.category.clone(), muted())),
        Line::from(article.link.clone()),
    ];
    if !projects.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Projects: {}", projects.join(", ")),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::from(""));
    for wrapped in textwrap::wrap(&article.summary, wrap_width) {
        lines.push(Line::from(wrapped.into_owned()));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.detail_scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let keys = &state.config.keys;
    let hint = format!(
        " {}:bookmark {}:download {}:refresh {}:quit ?:help",
        keys.bookmark, keys.download, keys.refresh, keys.quit
    );

    let text = if state.status.is_empty() {
        hint
    } else {
        format!(" {}", state.status)
    };

    let paragraph = Paragraph::new(text).style(muted());
    frame.render_widget(paragraph, area);
}

fn render_help_popup(frame: &mut Frame) {
    let area = centered_rect(52, 18, frame.area());
    frame.render_widget(Clear, area);

    let lines: Vec<Line> = [
        ("j / k", "move selection"),
        ("h / l, Tab", "switch pane"),
        ("Enter", "focus next pane"),
        ("b", "toggle bookmark"),
        ("d", "download PDF"),
        ("o", "open in browser"),
        ("a", "toggle detail pane"),
        ("r / R", "refresh feed (all / today)"),
        ("p", "create project"),
        ("x", "delete selected project"),
        ("n", "link/unlink article to project"),
        ("/", "search"),
        ("D", "date range"),
        ("q", "quit"),
    ]
    .iter()
    .map(|(key, action)| {
        Line::from(vec![
            Span::styled(format!(" {key:<12}"), Style::default().fg(Color::Cyan)),
            Span::raw(*action),
        ])
    })
    .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    frame.render_widget(paragraph, area);
}

fn render_input_popup(frame: &mut Frame, title: &str, input: &str) {
    let area = centered_rect(48, 3, frame.area());
    frame.render_widget(Clear, area);

    let paragraph = Paragraph::new(format!("{input}█")).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    frame.render_widget(paragraph, area);
}

fn render_search_popup(frame: &mut Frame, state: &AppState) {
    let area = centered_rect(48, 5, frame.area());
    frame.render_widget(Clear, area);

    let fields = state.search_fields;
    let marker = |on: bool| if on { "[x]" } else { "[ ]" };
    let lines = vec![
        Line::from(format!("{}█", state.input)),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Alt+1 {} title   Alt+2 {} authors   Alt+3 {} abstract",
                marker(fields.title),
                marker(fields.authors),
                marker(fields.summary)
            ),
            muted(),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    frame.render_widget(paragraph, area);
}

fn render_link_popup(frame: &mut Frame, state: &AppState) {
    let projects = state.core.projects();
    let height = (projects.len() as u16 + 2).min(12);
    let area = centered_rect(40, height, frame.area());
    frame.render_widget(Clear, area);

    let linked = state
        .core
        .selected_article()
        .map(|a| state.core.projects_for_article(&a.link))
        .unwrap_or_default();

    let items: Vec<ListItem> = projects
        .iter()
        .map(|project| {
            let marker = if linked.contains(project) { "✓ " } else { "  " };
            ListItem::new(format!("{marker}{project}"))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Link to Project ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .highlight_style(highlight());

    let mut list_state = ListState::default();
    list_state.select(Some(state.picker_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Truncate a string to a display width, appending an ellipsis
fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        if out.width() + 1 >= max_width {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

/// Centered rect with a fixed size, clamped to the frame
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
