//! Event handling

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::async_ops::AsyncCommand;
use super::state::{AppState, FocusedPane, Mode};
use crate::models::SearchState;

/// Handle key events, returning an optional async command
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    // Handle mode-specific input first
    match state.mode {
        Mode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                state.mode = Mode::Normal;
            }
            return None;
        }
        Mode::AddProject => {
            handle_add_project_key(state, key);
            return None;
        }
        Mode::LinkProject => {
            handle_link_project_key(state, key);
            return None;
        }
        Mode::Search => {
            handle_search_key(state, key);
            return None;
        }
        Mode::DateRange => {
            handle_date_range_key(state, key);
            return None;
        }
        Mode::Normal => {}
    }

    let keys = state.config.keys.clone();

    // Global shortcuts
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            state.should_quit = true;
            return None;
        }
        (_, KeyCode::Char(c)) if c == keys.quit => {
            state.should_quit = true;
            return None;
        }
        (_, KeyCode::Char('?')) | (_, KeyCode::F(1)) => {
            state.mode = Mode::Help;
            return None;
        }
        (_, KeyCode::Tab) => {
            state.focused_pane = state.focused_pane.next();
            return None;
        }
        (_, KeyCode::Left | KeyCode::Char('h')) => {
            state.focused_pane = state.focused_pane.prev();
            return None;
        }
        (_, KeyCode::Right | KeyCode::Char('l')) => {
            state.focused_pane = state.focused_pane.next();
            return None;
        }
        (_, KeyCode::Char('/')) => {
            state.open_prompt(Mode::Search);
            return None;
        }
        (_, KeyCode::Char('D')) => {
            state.open_prompt(Mode::DateRange);
            return None;
        }
        (_, KeyCode::Esc) => {
            state.clear_status();
            return None;
        }
        _ => {}
    }

    // Remappable single-char actions
    if let KeyCode::Char(c) = key.code {
        if c == keys.refresh {
            if state.loading {
                return None;
            }
            state.loading = true;
            return Some(AsyncCommand::RefreshFeed);
        }
        if c == 'R' {
            if state.loading {
                return None;
            }
            state.loading = true;
            return Some(AsyncCommand::RefreshToday);
        }
        if c == keys.create_project {
            state.open_prompt(Mode::AddProject);
            return None;
        }
        if c == keys.delete_project {
            delete_selected_project(state);
            return None;
        }
        if c == keys.link_project {
            if state.core.selected_article().is_none() {
                state.set_status("No article selected");
            } else if state.core.projects().is_empty() {
                state.set_status("No projects yet; create one first");
            } else {
                state.open_prompt(Mode::LinkProject);
            }
            return None;
        }
        if c == keys.bookmark {
            if let Some(article) = state.core.selected_article() {
                let link = article.link.clone();
                state.core.toggle_bookmark(&link);
            }
            return None;
        }
        if c == keys.open_link {
            if let Some(article) = state.core.selected_article() {
                let _ = open::that(&article.link);
                state.set_status("Opened in browser");
            }
            return None;
        }
        if c == keys.download {
            if let Some(article) = state.core.selected_article() {
                let paper_id = article.id();
                if paper_id.is_empty() {
                    state.set_status("Cannot derive a paper id from the link");
                    return None;
                }
                return Some(AsyncCommand::DownloadPaper { paper_id });
            }
            return None;
        }
        if c == keys.show_detail {
            state.show_detail = !state.show_detail;
            // Stored summaries can be empty when a feed item had none;
            // fill in from the abstract page on demand
            if state.show_detail
                && let Some(article) = state.core.selected_article()
                && article.summary.is_empty()
            {
                let paper_id = article.id();
                if !paper_id.is_empty() {
                    return Some(AsyncCommand::FetchAbstract {
                        link: article.link.clone(),
                        paper_id,
                    });
                }
            }
            return None;
        }
        if c == keys.next {
            move_down(state);
            return None;
        }
        if c == keys.previous {
            move_up(state);
            return None;
        }
    }

    match key.code {
        KeyCode::Down => move_down(state),
        KeyCode::Up => move_up(state),
        KeyCode::Char('g') => {
            if state.focused_pane == FocusedPane::Articles {
                state.core.set_article_index(0);
            }
        }
        KeyCode::Char('G') => {
            if state.focused_pane == FocusedPane::Articles {
                let len = state.core.current_articles().len();
                if len > 0 {
                    state.core.set_article_index(len - 1);
                }
            }
        }
        KeyCode::Enter => match state.focused_pane {
            FocusedPane::Filters => state.focused_pane = FocusedPane::Articles,
            FocusedPane::Articles => state.focused_pane = FocusedPane::Detail,
            FocusedPane::Detail => {}
        },
        _ => {}
    }

    None
}

fn move_down(state: &mut AppState) {
    match state.focused_pane {
        FocusedPane::Filters => state.select_next_filter(),
        FocusedPane::Articles => state.select_next_article(),
        FocusedPane::Detail => state.detail_scroll = state.detail_scroll.saturating_add(1),
    }
}

fn move_up(state: &mut AppState) {
    match state.focused_pane {
        FocusedPane::Filters => state.select_prev_filter(),
        FocusedPane::Articles => state.select_prev_article(),
        FocusedPane::Detail => state.detail_scroll = state.detail_scroll.saturating_sub(1),
    }
}

/// Delete the project the filter cursor is on (fixed filters cannot be
/// deleted)
fn delete_selected_project(state: &mut AppState) {
    let index = state.core.filter_index();
    if index < crate::models::FIXED_FILTERS.len() {
        state.set_status("Select a project filter to delete it");
        return;
    }
    let Some(name) = state.core.filter_options().get(index).cloned() else {
        return;
    };
    state.core.remove_project(&name);
    state.set_status(format!("Deleted project '{name}'"));
}

fn handle_add_project_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => state.close_prompt(),
        KeyCode::Enter => {
            let name = state.input.trim().to_string();
            if name.is_empty() {
                state.set_status("Project name cannot be empty");
            } else {
                state.core.add_project(&name);
                state.set_status(format!("Created project '{name}'"));
            }
            state.close_prompt();
        }
        KeyCode::Char(c) => state.input.push(c),
        KeyCode::Backspace => {
            state.input.pop();
        }
        _ => {}
    }
}

fn handle_link_project_key(state: &mut AppState, key: KeyEvent) {
    let projects: Vec<String> = state.core.projects().to_vec();
    match key.code {
        KeyCode::Esc => state.close_prompt(),
        KeyCode::Down | KeyCode::Char('j') => {
            if !projects.is_empty() {
                state.picker_index = (state.picker_index + 1).min(projects.len() - 1);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.picker_index = state.picker_index.saturating_sub(1);
        }
        KeyCode::Enter => {
            let Some(project) = projects.get(state.picker_index).cloned() else {
                state.close_prompt();
                return;
            };
            let Some(article) = state.core.selected_article() else {
                state.close_prompt();
                return;
            };
            let link = article.link.clone();

            if state.core.projects_for_article(&link).contains(&project) {
                state.core.unlink_article_from_project(&link, &project);
                state.set_status(format!("Unlinked from '{project}'"));
            } else {
                state.core.link_article_to_project(&link, &project);
                state.set_status(format!("Linked to '{project}'"));
            }
            state.close_prompt();
        }
        _ => {}
    }
}

fn handle_search_key(state: &mut AppState, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            state.core.clear_search();
            state.close_prompt();
        }
        (KeyModifiers::ALT, KeyCode::Char('1')) => {
            state.search_fields.title = !state.search_fields.title;
        }
        (KeyModifiers::ALT, KeyCode::Char('2')) => {
            state.search_fields.authors = !state.search_fields.authors;
        }
        (KeyModifiers::ALT, KeyCode::Char('3')) => {
            state.search_fields.summary = !state.search_fields.summary;
        }
        (_, KeyCode::Enter) => {
            if state.input.is_empty() {
                state.set_status("Empty search query");
                state.close_prompt();
                return;
            }
            let search = SearchState {
                query: state.input.clone(),
                fields: state.search_fields,
            };
            state.core.set_search(search);
            state.core.set_filter_index(4);
            state.set_status(format!(
                "{} articles match",
                state.core.current_articles().len()
            ));
            state.close_prompt();
        }
        (_, KeyCode::Char(c)) => state.input.push(c),
        (_, KeyCode::Backspace) => {
            state.input.pop();
        }
        _ => {}
    }
}

fn handle_date_range_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            state.core.clear_date_range();
            state.close_prompt();
        }
        KeyCode::Enter => {
            let parts: Vec<&str> = state.input.split_whitespace().collect();
            let [start, end] = parts.as_slice() else {
                state.set_status("Enter two dates: YYYY-MM-DD YYYY-MM-DD");
                return;
            };
            // Validate here so the user gets a message instead of a
            // silently empty view
            if NaiveDate::parse_from_str(start, "%Y-%m-%d").is_err()
                || NaiveDate::parse_from_str(end, "%Y-%m-%d").is_err()
            {
                state.set_status("Invalid date range (use YYYY-MM-DD)");
                return;
            }
            state.core.set_date_range(start, end);
            state.core.set_filter_index(3);
            state.close_prompt();
        }
        KeyCode::Char(c) => state.input.push(c),
        KeyCode::Backspace => {
            state.input.pop();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::AppCore;
    use crate::db::Database;
    use crate::fetch::ArticleSource;
    use crate::models::Article;
    use crossterm::event::KeyEventKind;

    struct EmptySource;

    impl ArticleSource for EmptySource {
        fn fetch(&self) -> Vec<Article> {
            Vec::new()
        }
        fn fetch_today(&self) -> Vec<Article> {
            Vec::new()
        }
        fn download_paper(&self, _paper_id: &str, _filename: &str) -> bool {
            false
        }
        fn paper_abstract(&self, _paper_id: &str) -> String {
            String::new()
        }
    }

    fn press(c: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn test_state() -> AppState {
        let db = Database::open_in_memory().unwrap();
        let core = AppCore::new(db, Box::new(EmptySource));
        AppState::new(Config::default(), core)
    }

    #[test]
    fn test_quit_key() {
        let mut state = test_state();
        handle_key(&mut state, press('q'));
        assert!(state.should_quit);
    }

    #[test]
    fn test_add_project_via_prompt() {
        let mut state = test_state();
        handle_key(&mut state, press('p'));
        assert_eq!(state.mode, Mode::AddProject);

        for c in "reading".chars() {
            handle_key(&mut state, press(c));
        }
        handle_key(
            &mut state,
            KeyEvent {
                code: KeyCode::Enter,
                modifiers: KeyModifiers::NONE,
                kind: KeyEventKind::Press,
                state: crossterm::event::KeyEventState::NONE,
            },
        );

        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.core.projects(), ["reading".to_string()]);
    }

    #[test]
    fn test_date_range_prompt_rejects_garbage() {
        let mut state = test_state();
        handle_key(&mut state, press('D'));
        for c in "yesterday today".chars() {
            handle_key(&mut state, press(c));
        }
        handle_key(
            &mut state,
            KeyEvent {
                code: KeyCode::Enter,
                modifiers: KeyModifiers::NONE,
                kind: KeyEventKind::Press,
                state: crossterm::event::KeyEventState::NONE,
            },
        );

        // Prompt stays open with a message; no range was set
        assert_eq!(state.mode, Mode::DateRange);
        assert!(state.core.date_range().is_none());
        assert!(!state.status.is_empty());
    }

    #[test]
    fn test_refresh_emits_command() {
        let mut state = test_state();
        let cmd = handle_key(&mut state, press('r'));
        assert!(matches!(cmd, Some(AsyncCommand::RefreshFeed)));
        assert!(state.loading);

        // A second refresh while loading is ignored
        let cmd = handle_key(&mut state, press('r'));
        assert!(cmd.is_none());
    }
}
