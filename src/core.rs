//! Orchestration core
//!
//! [`AppCore`] is the single owner of the mutable view state: the active
//! filter, the article cursor, the current result set, and its derived
//! display titles. Every mutation goes through a named transition method
//! that re-runs the routing table where needed, recomputes derived views,
//! and notifies the registered listeners. The presentation layer depends
//! on nothing but these methods and the two notification channels.

use crate::db::Database;
use crate::fetch::ArticleSource;
use crate::models::{Article, DateRange, Filter, SearchState, FIXED_FILTERS};

/// Change listener for one notification channel
pub type Listener = Box<dyn Fn()>;

/// Orchestration core; see module docs
pub struct AppCore {
    db: Database,
    source: Box<dyn ArticleSource>,

    filter_index: usize,
    article_index: usize,
    filter_options: Vec<String>,
    current_articles: Vec<Article>,
    current_titles: Vec<String>,

    date_range: Option<DateRange>,
    search: Option<SearchState>,

    article_listeners: Vec<Listener>,
    project_listeners: Vec<Listener>,
}

impl AppCore {
    /// Create the core over an open store and an article source.
    ///
    /// Loads the filter options and the initial result set from the store;
    /// does not touch the network (call [`Self::refresh_from_feed`] for
    /// that).
    pub fn new(db: Database, source: Box<dyn ArticleSource>) -> Self {
        let mut core = Self {
            db,
            source,
            filter_index: 0,
            article_index: 0,
            filter_options: Vec::new(),
            current_articles: Vec::new(),
            current_titles: Vec::new(),
            date_range: None,
            search: None,
            article_listeners: Vec::new(),
            project_listeners: Vec::new(),
        };
        core.refresh_filter_options();
        core.run_active_query();
        core
    }

    // ==================== Notification channels ====================

    /// Register a listener on the article-changed channel
    pub fn on_articles_changed(&mut self, listener: Listener) {
        self.article_listeners.push(listener);
    }

    /// Register a listener on the project-changed channel
    pub fn on_projects_changed(&mut self, listener: Listener) {
        self.project_listeners.push(listener);
    }

    fn notify_articles(&self) {
        for listener in &self.article_listeners {
            listener();
        }
    }

    fn notify_projects(&self) {
        for listener in &self.project_listeners {
            listener();
        }
    }

    // ==================== Accessors ====================

    /// The current result set
    pub fn current_articles(&self) -> &[Article] {
        &self.current_articles
    }

    /// Display titles parallel to [`Self::current_articles`]
    pub fn current_titles(&self) -> &[String] {
        &self.current_titles
    }

    /// Filter option labels: fixed prefix + sorted project names
    pub fn filter_options(&self) -> &[String] {
        &self.filter_options
    }

    /// Index of the active filter
    pub fn filter_index(&self) -> usize {
        self.filter_index
    }

    /// Cursor position within the current result set
    pub fn article_index(&self) -> usize {
        self.article_index
    }

    /// The article under the cursor, if any
    pub fn selected_article(&self) -> Option<&Article> {
        self.current_articles.get(self.article_index)
    }

    /// The active date range, if one is set
    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    /// The active search, if one is set
    pub fn search(&self) -> Option<&SearchState> {
        self.search.as_ref()
    }

    /// All project names, sorted
    pub fn projects(&self) -> &[String] {
        &self.filter_options[FIXED_FILTERS.len()..]
    }

    /// Project names the given article is linked to
    pub fn projects_for_article(&self, link: &str) -> Vec<String> {
        self.db.projects_for_article(link).unwrap_or_else(|e| {
            tracing::warn!("[core] project lookup failed: {e}");
            Vec::new()
        })
    }

    /// Whether the article with this link is bookmarked in the current set
    pub fn is_article_bookmarked(&self, link: &str) -> bool {
        self.current_articles
            .iter()
            .any(|a| a.link == link && a.bookmarked)
    }

    // ==================== Filter transitions ====================

    /// Select a filter by index; re-runs the routing table and resets the
    /// cursor if the index actually changed
    pub fn set_filter_index(&mut self, index: usize) {
        if index != self.filter_index {
            self.filter_index = index;
            self.article_index = 0;
            self.run_active_query();
            self.notify_articles();
        }
    }

    /// Move the article cursor
    pub fn set_article_index(&mut self, index: usize) {
        if index != self.article_index {
            self.article_index = index;
            self.notify_articles();
        }
    }

    /// Set the date range; re-runs the query when the range view is active
    pub fn set_date_range(&mut self, start: &str, end: &str) {
        self.date_range = Some(DateRange {
            start: start.to_string(),
            end: end.to_string(),
        });
        self.rerun_if_active(Filter::DateRange);
    }

    /// Clear the date range
    pub fn clear_date_range(&mut self) {
        self.date_range = None;
        self.rerun_if_active(Filter::DateRange);
    }

    /// Set the search state; re-runs the query when the search view is active
    pub fn set_search(&mut self, search: SearchState) {
        self.search = Some(search);
        self.rerun_if_active(Filter::Search);
    }

    /// Clear the search
    pub fn clear_search(&mut self) {
        self.search = None;
        self.rerun_if_active(Filter::Search);
    }

    fn rerun_if_active(&mut self, filter: Filter) {
        if self.active_filter() == filter {
            self.article_index = 0;
            self.run_active_query();
            self.notify_articles();
        }
    }

    // ==================== Bookmarks ====================

    /// Flip the bookmark flag of the matching article in the current set,
    /// persist it, and regenerate the display titles
    pub fn toggle_bookmark(&mut self, link: &str) {
        let Some(article) = self.current_articles.iter_mut().find(|a| a.link == link) else {
            return;
        };
        article.bookmarked = !article.bookmarked;
        let bookmarked = article.bookmarked;

        if let Err(e) = self.db.toggle_bookmark(link, bookmarked) {
            tracing::warn!("[core] bookmark persist failed: {e}");
        }
        self.refresh_titles();
        self.notify_articles();
    }

    // ==================== Projects ====================

    /// Create a project; empty names are rejected without error
    pub fn add_project(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            tracing::warn!("[core] ignoring empty project name");
            return;
        }
        if let Err(e) = self.db.add_project(name) {
            tracing::warn!("[core] project create failed: {e}");
        }
        self.refresh_filter_options();
        self.notify_projects();
        self.notify_articles();
    }

    /// Delete a project and its associations
    pub fn remove_project(&mut self, name: &str) {
        if let Err(e) = self.db.remove_project(name) {
            tracing::warn!("[core] project delete failed: {e}");
        }
        self.refresh_filter_options();
        // The active index may now point past the shortened option list
        if self.filter_index >= self.filter_options.len() {
            self.filter_index = 0;
        }
        self.article_index = 0;
        self.run_active_query();
        self.notify_projects();
        self.notify_articles();
    }

    /// Associate an article with a project
    pub fn link_article_to_project(&mut self, link: &str, project: &str) {
        if let Err(e) = self.db.link_article_to_project(link, project) {
            tracing::warn!("[core] link failed: {e}");
        }
        self.run_active_query();
        self.notify_articles();
    }

    /// Remove an article-project association
    pub fn unlink_article_from_project(&mut self, link: &str, project: &str) {
        if let Err(e) = self.db.unlink_article_from_project(link, project) {
            tracing::warn!("[core] unlink failed: {e}");
        }
        self.run_active_query();
        self.notify_articles();
    }

    // ==================== Ingestion ====================

    /// Ask the source for fresh entries and ingest them
    pub fn refresh_from_feed(&mut self) {
        let articles = self.source.fetch();
        self.ingest(&articles);
    }

    /// Same pipeline, scoped to today's entries
    pub fn refresh_today(&mut self) {
        let articles = self.source.fetch_today();
        self.ingest(&articles);
    }

    /// Fill in an article's abstract scraped on demand.
    ///
    /// Some feed items carry no description; the detail view fetches the
    /// abstract page instead and stores the result here.
    pub fn apply_fetched_abstract(&mut self, link: &str, text: &str) {
        let Some(article) = self.current_articles.iter_mut().find(|a| a.link == link) else {
            return;
        };
        article.summary = text.to_string();
        let updated = article.clone();
        if let Err(e) = self.db.add_article(&updated) {
            tracing::warn!("[core] abstract persist failed: {e}");
        }
        self.notify_articles();
    }

    /// Upsert a batch of fetched articles and re-run the active query
    pub fn ingest(&mut self, articles: &[Article]) {
        for article in articles {
            if let Err(e) = self.db.add_article(article) {
                tracing::warn!("[core] upsert of {} failed: {e}", article.link);
            }
        }
        self.run_active_query();
        self.notify_articles();
    }

    // ==================== Routing ====================

    /// The filter the current index resolves to
    pub fn active_filter(&self) -> Filter {
        Filter::from_index(self.filter_index, self.projects())
    }

    /// Map a filter onto its store query.
    ///
    /// Range and search views without their sub-state fall back to the
    /// full listing; store errors degrade to an empty result set.
    fn query_for_filter(&self, filter: &Filter) -> Vec<Article> {
        let result = match filter {
            Filter::All => self.db.get_recent(-1),
            Filter::Bookmarks => self.db.list_bookmarked(),
            Filter::Today => self.db.get_recent(1),
            Filter::DateRange => match &self.date_range {
                Some(range) => self.db.articles_for_date_range(&range.start, &range.end),
                None => self.db.get_recent(-1),
            },
            Filter::Search => match &self.search {
                Some(search) if !search.query.is_empty() => self.db.search_articles(
                    &search.query,
                    search.fields.title,
                    search.fields.authors,
                    search.fields.summary,
                ),
                _ => self.db.get_recent(-1),
            },
            Filter::Project(name) => self.db.articles_for_project(name),
        };

        result.unwrap_or_else(|e| {
            tracing::warn!("[core] query failed: {e}");
            Vec::new()
        })
    }

    fn run_active_query(&mut self) {
        let filter = self.active_filter();
        tracing::debug!("[core] running query for filter index {}", self.filter_index);
        self.current_articles = self.query_for_filter(&filter);
        tracing::debug!("[core] found {} articles", self.current_articles.len());
        self.refresh_titles();
    }

    fn refresh_titles(&mut self) {
        self.current_titles = self
            .current_articles
            .iter()
            .map(Article::display_title)
            .collect();
    }

    fn refresh_filter_options(&mut self) {
        let mut projects = self.db.get_projects().unwrap_or_else(|e| {
            tracing::warn!("[core] project list failed: {e}");
            Vec::new()
        });
        projects.sort();
        self.filter_options = Filter::options(&projects);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::cell::Cell;
    use std::rc::Rc;

    struct StubSource {
        articles: Vec<Article>,
    }

    impl ArticleSource for StubSource {
        fn fetch(&self) -> Vec<Article> {
            self.articles.clone()
        }

        fn fetch_today(&self) -> Vec<Article> {
            let today = Utc::now().date_naive();
            self.articles
                .iter()
                .filter(|a| a.date.date_naive() == today)
                .cloned()
                .collect()
        }

        fn download_paper(&self, _paper_id: &str, _filename: &str) -> bool {
            true
        }

        fn paper_abstract(&self, _paper_id: &str) -> String {
            String::new()
        }
    }

    fn article(link: &str, title: &str) -> Article {
        Article {
            title: title.to_string(),
            link: link.to_string(),
            summary: "An abstract.".to_string(),
            authors: "A. Author".to_string(),
            date: Utc.with_ymd_and_hms(2024, 3, 18, 0, 0, 0).unwrap(),
            category: "hep-ph".to_string(),
            bookmarked: false,
        }
    }

    fn core_with(articles: Vec<Article>) -> AppCore {
        let db = Database::open_in_memory().unwrap();
        let mut core = AppCore::new(db, Box::new(StubSource { articles }));
        core.refresh_from_feed();
        core
    }

    #[test]
    fn test_startup_ingests_feed() {
        let core = core_with(vec![article("https://arxiv.org/abs/2403.12345", "One")]);
        assert_eq!(core.current_articles().len(), 1);
        assert_eq!(core.current_titles(), ["One"]);
    }

    #[test]
    fn test_filter_totality() {
        let mut core = core_with(vec![article("https://arxiv.org/abs/2403.12345", "One")]);
        core.add_project("alpha");
        core.add_project("beta");

        // Every valid index yields a defined result without crashing
        for index in 0..core.filter_options().len() {
            core.set_filter_index(index);
            let _ = core.current_articles();
            assert_eq!(core.article_index(), 0);
        }
    }

    #[test]
    fn test_empty_project_filter_resets_cursor() {
        let mut core = core_with(vec![
            article("https://arxiv.org/abs/2403.12345", "One"),
            article("https://arxiv.org/abs/2403.67890", "Two"),
        ]);
        core.add_project("empty");
        core.set_article_index(1);

        let project_index = core
            .filter_options()
            .iter()
            .position(|o| o == "empty")
            .unwrap();
        core.set_filter_index(project_index);

        assert!(core.current_articles().is_empty());
        assert_eq!(core.article_index(), 0);
    }

    #[test]
    fn test_toggle_bookmark_roundtrip() {
        let mut core = core_with(vec![article("https://arxiv.org/abs/2403.12345", "One")]);
        core.toggle_bookmark("https://arxiv.org/abs/2403.12345");
        assert!(core.is_article_bookmarked("https://arxiv.org/abs/2403.12345"));
        assert_eq!(core.current_titles(), ["★ One"]);

        core.toggle_bookmark("https://arxiv.org/abs/2403.12345");
        assert!(!core.is_article_bookmarked("https://arxiv.org/abs/2403.12345"));
        assert_eq!(core.current_titles(), ["One"]);
    }

    #[test]
    fn test_bookmark_survives_reingest() {
        let mut core = core_with(vec![article("https://arxiv.org/abs/2403.12345", "One")]);
        core.toggle_bookmark("https://arxiv.org/abs/2403.12345");
        core.refresh_from_feed();
        assert!(core.is_article_bookmarked("https://arxiv.org/abs/2403.12345"));
    }

    #[test]
    fn test_bookmarks_filter() {
        let mut core = core_with(vec![
            article("https://arxiv.org/abs/2403.12345", "Sample Article Title"),
            article("https://arxiv.org/abs/2403.67890", "Other"),
        ]);
        core.toggle_bookmark("https://arxiv.org/abs/2403.12345");
        core.set_filter_index(1);

        assert_eq!(core.current_articles().len(), 1);
        assert_eq!(core.current_articles()[0].title, "Sample Article Title");
    }

    #[test]
    fn test_search_routing_with_and_without_query() {
        let mut core = core_with(vec![
            article("https://arxiv.org/abs/2403.12345", "Neutrino Masses"),
            article("https://arxiv.org/abs/2403.67890", "Lattice Results"),
        ]);
        core.set_filter_index(4);
        // No query set: falls back to the full listing
        assert_eq!(core.current_articles().len(), 2);

        core.set_search(SearchState {
            query: "Neutrino".to_string(),
            fields: crate::models::SearchFields {
                title: true,
                authors: false,
                summary: false,
            },
        });
        assert_eq!(core.current_articles().len(), 1);

        core.clear_search();
        assert_eq!(core.current_articles().len(), 2);
    }

    #[test]
    fn test_date_range_routing() {
        let mut core = core_with(vec![article("https://arxiv.org/abs/2403.12345", "One")]);
        core.set_filter_index(3);
        assert_eq!(core.current_articles().len(), 1);

        core.set_date_range("2024-03-18", "2024-03-18");
        assert_eq!(core.current_articles().len(), 1);

        core.set_date_range("2020-01-01", "2020-01-02");
        assert!(core.current_articles().is_empty());
    }

    #[test]
    fn test_project_lifecycle() {
        let mut core = core_with(vec![article("https://arxiv.org/abs/2403.12345", "One")]);
        core.add_project("lattice");
        assert_eq!(core.projects(), ["lattice".to_string()]);

        core.link_article_to_project("https://arxiv.org/abs/2403.12345", "lattice");
        assert_eq!(
            core.projects_for_article("https://arxiv.org/abs/2403.12345"),
            ["lattice".to_string()]
        );

        core.remove_project("lattice");
        assert!(core.projects().is_empty());
        // Articles survive the cascade
        core.set_filter_index(0);
        assert_eq!(core.current_articles().len(), 1);
    }

    #[test]
    fn test_empty_project_name_rejected() {
        let mut core = core_with(Vec::new());
        core.add_project("   ");
        assert!(core.projects().is_empty());
    }

    #[test]
    fn test_projects_sorted_in_options() {
        let mut core = core_with(Vec::new());
        core.add_project("zeta");
        core.add_project("alpha");
        assert_eq!(core.projects(), ["alpha".to_string(), "zeta".to_string()]);
    }

    #[test]
    fn test_removing_selected_project_falls_back() {
        let mut core = core_with(vec![article("https://arxiv.org/abs/2403.12345", "One")]);
        core.add_project("only");
        let index = core.filter_options().len() - 1;
        core.set_filter_index(index);

        core.remove_project("only");
        assert_eq!(core.filter_index(), 0);
        assert_eq!(core.current_articles().len(), 1);
    }

    #[test]
    fn test_listener_channels_are_distinct() {
        let mut core = core_with(vec![article("https://arxiv.org/abs/2403.12345", "One")]);

        let article_hits = Rc::new(Cell::new(0));
        let project_hits = Rc::new(Cell::new(0));
        let a = Rc::clone(&article_hits);
        let p = Rc::clone(&project_hits);
        core.on_articles_changed(Box::new(move || a.set(a.get() + 1)));
        core.on_projects_changed(Box::new(move || p.set(p.get() + 1)));

        core.set_article_index(0); // unchanged: no notification
        assert_eq!(article_hits.get(), 0);

        core.set_filter_index(1);
        assert_eq!(article_hits.get(), 1);
        assert_eq!(project_hits.get(), 0);

        core.add_project("lattice");
        assert_eq!(project_hits.get(), 1);
    }
}
