//! Database module for `SQLite` storage (articles, projects, associations)

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{Connection, params};
use std::path::PathBuf;

use crate::models::Article;
use crate::paths;

const ARTICLE_COLUMNS: &str = "link, title, authors, abstract, category, date, bookmarked";

/// Database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the default location
    pub fn open() -> Result<Self> {
        let path = Self::default_path()?;
        Self::open_path(&path)
    }

    /// Open or create the database at a specific path
    pub fn open_path(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }

        tracing::info!("[db] opening database at {}", path.display());
        let conn = Connection::open(path).context("Failed to open database")?;

        let db = Self { conn };
        db.init()?;

        Ok(db)
    }

    /// Open an in-memory database (tests)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Get the default database path
    pub fn default_path() -> Result<PathBuf> {
        paths::database_path()
    }

    /// Initialize the database schema
    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r"
            -- Articles table (keyed by abstract-page link)
            CREATE TABLE IF NOT EXISTS articles (
                link TEXT PRIMARY KEY,
                title TEXT NOT NULL DEFAULT '',
                authors TEXT NOT NULL DEFAULT '',
                abstract TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT '',
                date INTEGER NOT NULL,
                bookmarked INTEGER NOT NULL DEFAULT 0
            );

            -- Projects table
            CREATE TABLE IF NOT EXISTS projects (
                name TEXT PRIMARY KEY
            );

            -- Project-article association table
            CREATE TABLE IF NOT EXISTS project_articles (
                project_name TEXT NOT NULL,
                article_link TEXT NOT NULL,
                PRIMARY KEY (project_name, article_link),
                FOREIGN KEY (project_name) REFERENCES projects(name),
                FOREIGN KEY (article_link) REFERENCES articles(link)
            );

            -- Indexes
            CREATE INDEX IF NOT EXISTS idx_articles_date ON articles(date);
            CREATE INDEX IF NOT EXISTS idx_articles_bookmarked ON articles(bookmarked);
            CREATE INDEX IF NOT EXISTS idx_project_articles_link ON project_articles(article_link);
            ",
        )?;

        Ok(())
    }

    // ==================== Articles ====================

    /// Upsert an article by link.
    ///
    /// Re-observing an existing link replaces the content fields but leaves
    /// the bookmark flag untouched.
    pub fn add_article(&self, article: &Article) -> Result<()> {
        tracing::debug!("[db] adding article {}", article.link);
        self.conn.execute(
            r"INSERT INTO articles (link, title, authors, abstract, category, date, bookmarked)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
               ON CONFLICT(link) DO UPDATE SET
                   title = excluded.title,
                   authors = excluded.authors,
                   abstract = excluded.abstract,
                   category = excluded.category,
                   date = excluded.date",
            params![
                article.link,
                article.title,
                article.authors,
                article.summary,
                article.category,
                article.date.timestamp(),
                i32::from(article.bookmarked),
            ],
        )?;
        Ok(())
    }

    /// Set the bookmark flag for a link; unknown links are a silent no-op
    pub fn toggle_bookmark(&self, link: &str, bookmarked: bool) -> Result<()> {
        tracing::debug!("[db] setting bookmark for {} to {}", link, bookmarked);
        self.conn.execute(
            "UPDATE articles SET bookmarked = ?2 WHERE link = ?1",
            params![link, i32::from(bookmarked)],
        )?;
        Ok(())
    }

    /// Get recent articles, most recent first.
    ///
    /// `days < 0` returns every stored article; `days >= 0` restricts to the
    /// trailing `days * 24h` window.
    pub fn get_recent(&self, days: i64) -> Result<Vec<Article>> {
        if days < 0 {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY date DESC"
            ))?;
            let articles = stmt.query_map([], Self::row_to_article)?;
            return articles.collect::<Result<Vec<_>, _>>().map_err(Into::into);
        }

        let cutoff = Utc::now() - chrono::Duration::hours(24 * days);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE date >= ?1 ORDER BY date DESC"
        ))?;
        let articles = stmt.query_map(params![cutoff.timestamp()], Self::row_to_article)?;
        articles.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Get all bookmarked articles, most recent first
    pub fn list_bookmarked(&self) -> Result<Vec<Article>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE bookmarked = 1 ORDER BY date DESC"
        ))?;
        let articles = stmt.query_map([], Self::row_to_article)?;
        articles.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Get articles with a date inside `[start 00:00, end 24:00)` UTC.
    ///
    /// The end calendar day is included. Unparseable date strings log a
    /// diagnostic and yield an empty result rather than an error.
    pub fn articles_for_date_range(&self, start: &str, end: &str) -> Result<Vec<Article>> {
        let Ok(start_day) = NaiveDate::parse_from_str(start, "%Y-%m-%d") else {
            tracing::warn!("[db] invalid start date: {start}");
            return Ok(Vec::new());
        };
        let Ok(end_day) = NaiveDate::parse_from_str(end, "%Y-%m-%d") else {
            tracing::warn!("[db] invalid end date: {end}");
            return Ok(Vec::new());
        };

        let start_ts = start_day.and_time(NaiveTime::MIN).and_utc().timestamp();
        // One day past the end midnight, so the whole end day is included
        let end_ts = end_day.and_time(NaiveTime::MIN).and_utc().timestamp() + 24 * 60 * 60;

        tracing::debug!("[db] fetching articles between {start} and {end}");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE date >= ?1 AND date < ?2 ORDER BY date DESC"
        ))?;
        let articles = stmt.query_map(params![start_ts, end_ts], Self::row_to_article)?;
        articles.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Search for a substring in any of the selected fields (OR-combined).
    ///
    /// Containment is case sensitive. No field selected yields an empty
    /// result.
    pub fn search_articles(
        &self,
        query: &str,
        in_title: bool,
        in_authors: bool,
        in_abstract: bool,
    ) -> Result<Vec<Article>> {
        let mut conditions = Vec::new();
        if in_title {
            conditions.push("instr(title, ?1) > 0");
        }
        if in_authors {
            conditions.push("instr(authors, ?1) > 0");
        }
        if in_abstract {
            conditions.push("instr(abstract, ?1) > 0");
        }

        if conditions.is_empty() {
            tracing::warn!("[db] no search fields selected");
            return Ok(Vec::new());
        }

        tracing::debug!(
            "[db] searching for '{query}' in title: {in_title}, authors: {in_authors}, abstract: {in_abstract}"
        );
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE {} ORDER BY date DESC",
            conditions.join(" OR ")
        ))?;
        let articles = stmt.query_map(params![query], Self::row_to_article)?;
        articles.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ==================== Projects ====================

    /// Create a project (no-op if it already exists)
    pub fn add_project(&self, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO projects (name) VALUES (?1)",
            params![name],
        )?;
        Ok(())
    }

    /// Delete a project and all of its associations in one transaction
    pub fn remove_project(&mut self, name: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM project_articles WHERE project_name = ?1",
            params![name],
        )?;
        tx.execute("DELETE FROM projects WHERE name = ?1", params![name])?;
        tx.commit()?;
        Ok(())
    }

    /// Get all project names, in store order (callers needing stability sort)
    pub fn get_projects(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM projects")?;
        let projects = stmt.query_map([], |row| row.get(0))?;
        projects.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Associate an article with a project (idempotent)
    pub fn link_article_to_project(&self, link: &str, project: &str) -> Result<()> {
        tracing::debug!("[db] linking {} to project {}", link, project);
        self.conn.execute(
            "INSERT OR IGNORE INTO project_articles (project_name, article_link) VALUES (?1, ?2)",
            params![project, link],
        )?;
        Ok(())
    }

    /// Remove one article-project association (idempotent)
    pub fn unlink_article_from_project(&self, link: &str, project: &str) -> Result<()> {
        tracing::debug!("[db] unlinking {} from project {}", link, project);
        self.conn.execute(
            "DELETE FROM project_articles WHERE project_name = ?1 AND article_link = ?2",
            params![project, link],
        )?;
        Ok(())
    }

    /// Get the articles linked to a project, most recent first
    pub fn articles_for_project(&self, project: &str) -> Result<Vec<Article>> {
        let mut stmt = self.conn.prepare(
            r"SELECT a.link, a.title, a.authors, a.abstract, a.category, a.date, a.bookmarked
               FROM articles a
               JOIN project_articles pa ON a.link = pa.article_link
               WHERE pa.project_name = ?1
               ORDER BY a.date DESC",
        )?;
        let articles = stmt.query_map(params![project], Self::row_to_article)?;
        articles.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Get the names of projects an article is linked to
    pub fn projects_for_article(&self, link: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT project_name FROM project_articles WHERE article_link = ?1")?;
        let projects = stmt.query_map(params![link], |row| row.get(0))?;
        projects.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Helper to convert a row to an [`Article`]
    fn row_to_article(row: &rusqlite::Row<'_>) -> rusqlite::Result<Article> {
        Ok(Article {
            link: row.get(0)?,
            title: row.get(1)?,
            authors: row.get(2)?,
            summary: row.get(3)?,
            category: row.get(4)?,
            date: DateTime::from_timestamp(row.get::<_, i64>(5)?, 0).unwrap_or_default(),
            bookmarked: row.get::<_, i32>(6)? != 0,
        })
    }
}
