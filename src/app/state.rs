//! Application state

use std::cell::Cell;
use std::rc::Rc;

use crate::config::Config;
use crate::core::AppCore;
use crate::models::SearchFields;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPane {
    /// The filter list
    Filters,
    /// The article list
    #[default]
    Articles,
    /// The detail pane
    Detail,
}

impl FocusedPane {
    pub fn next(&self) -> Self {
        match self {
            Self::Filters => Self::Articles,
            Self::Articles => Self::Detail,
            Self::Detail => Self::Filters,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Filters => Self::Detail,
            Self::Articles => Self::Filters,
            Self::Detail => Self::Articles,
        }
    }
}

/// Current input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Regular navigation
    #[default]
    Normal,
    /// Help overlay
    Help,
    /// Project-name prompt
    AddProject,
    /// Project picker for the selected article
    LinkProject,
    /// Search prompt
    Search,
    /// Date-range prompt
    DateRange,
}

/// Application state: the orchestration core plus presentation-only state
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Orchestration core (single owner of view state)
    pub core: AppCore,
    /// Whether to quit
    pub should_quit: bool,
    /// Focused pane
    pub focused_pane: FocusedPane,
    /// Current input mode
    pub mode: Mode,
    /// Whether the detail pane is visible
    pub show_detail: bool,
    /// Scroll offset for the detail pane
    pub detail_scroll: usize,

    /// Text buffer for the modal prompts
    pub input: String,
    /// Field toggles while the search prompt is open
    pub search_fields: SearchFields,
    /// Cursor in the project picker
    pub picker_index: usize,

    /// Status message (bottom bar)
    pub status: String,
    /// Is a refresh in flight?
    pub loading: bool,

    /// Set by the core's article-changed channel
    articles_dirty: Rc<Cell<bool>>,
    /// Set by the core's project-changed channel
    projects_dirty: Rc<Cell<bool>>,
}

impl AppState {
    /// Create a new app state and subscribe to the core's channels
    pub fn new(config: Config, mut core: AppCore) -> Self {
        let articles_dirty = Rc::new(Cell::new(true));
        let projects_dirty = Rc::new(Cell::new(true));

        let flag = Rc::clone(&articles_dirty);
        core.on_articles_changed(Box::new(move || flag.set(true)));
        let flag = Rc::clone(&projects_dirty);
        core.on_projects_changed(Box::new(move || flag.set(true)));

        Self {
            config,
            core,
            should_quit: false,
            focused_pane: FocusedPane::Articles,
            mode: Mode::Normal,
            show_detail: true,
            detail_scroll: 0,
            input: String::new(),
            search_fields: SearchFields::default(),
            picker_index: 0,
            status: String::new(),
            loading: false,
            articles_dirty,
            projects_dirty,
        }
    }

    /// Consume the article-changed flag
    pub fn take_articles_dirty(&self) -> bool {
        self.articles_dirty.replace(false)
    }

    /// Consume the project-changed flag
    pub fn take_projects_dirty(&self) -> bool {
        self.projects_dirty.replace(false)
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status.clear();
    }

    /// Move the article cursor down
    pub fn select_next_article(&mut self) {
        let len = self.core.current_articles().len();
        if len > 0 {
            let next = (self.core.article_index() + 1).min(len - 1);
            self.core.set_article_index(next);
            self.detail_scroll = 0;
        }
    }

    /// Move the article cursor up
    pub fn select_prev_article(&mut self) {
        let prev = self.core.article_index().saturating_sub(1);
        self.core.set_article_index(prev);
        self.detail_scroll = 0;
    }

    /// Move the filter cursor down
    pub fn select_next_filter(&mut self) {
        let len = self.core.filter_options().len();
        if len > 0 {
            let next = (self.core.filter_index() + 1).min(len - 1);
            self.core.set_filter_index(next);
        }
    }

    /// Move the filter cursor up
    pub fn select_prev_filter(&mut self) {
        let prev = self.core.filter_index().saturating_sub(1);
        self.core.set_filter_index(prev);
    }

    /// Open a modal prompt with a fresh input buffer
    pub fn open_prompt(&mut self, mode: Mode) {
        self.mode = mode;
        self.input.clear();
        self.picker_index = 0;
    }

    /// Close any modal prompt
    pub fn close_prompt(&mut self) {
        self.mode = Mode::Normal;
        self.input.clear();
    }
}
