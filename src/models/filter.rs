//! Filter enumeration and auxiliary sub-state
//!
//! The filter list is an ordered enumeration: a fixed prefix of five
//! built-in views followed by the user's project names. The active index
//! selects which store query populates the current result set.

/// Labels of the fixed leading filter options, in order
pub const FIXED_FILTERS: [&str; 5] = ["All Articles", "Bookmarks", "Today", "Date Range", "Search"];

/// The selected view, resolved from a filter index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every stored article
    All,
    /// Bookmarked articles only
    Bookmarks,
    /// Articles from the trailing 24 hours
    Today,
    /// Articles within a user-set calendar range
    DateRange,
    /// Articles matching the current search
    Search,
    /// Articles linked to the named project
    Project(String),
}

impl Filter {
    /// Resolve a filter index against the project list.
    ///
    /// Total over every valid index; out-of-range indices fall back to
    /// [`Filter::All`] so a stale cursor can never select nothing.
    pub fn from_index(index: usize, projects: &[String]) -> Self {
        match index {
            0 => Self::All,
            1 => Self::Bookmarks,
            2 => Self::Today,
            3 => Self::DateRange,
            4 => Self::Search,
            i => projects
                .get(i - FIXED_FILTERS.len())
                .map_or(Self::All, |name| Self::Project(name.clone())),
        }
    }

    /// Build the full option label list: fixed prefix + project names
    pub fn options(projects: &[String]) -> Vec<String> {
        let mut options: Vec<String> = FIXED_FILTERS.iter().map(ToString::to_string).collect();
        options.extend(projects.iter().cloned());
        options
    }
}

/// Date-range sub-state (inclusive calendar days, "%Y-%m-%d" strings)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    /// First day of the range
    pub start: String,
    /// Last day of the range (inclusive)
    pub end: String,
}

/// Which article fields a search inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFields {
    /// Match against the title
    pub title: bool,
    /// Match against the author string
    pub authors: bool,
    /// Match against the abstract
    pub summary: bool,
}

impl Default for SearchFields {
    fn default() -> Self {
        Self {
            title: true,
            authors: true,
            summary: true,
        }
    }
}

/// Search sub-state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Substring to look for (case sensitive)
    pub query: String,
    /// Selected fields
    pub fields: SearchFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_prefix_resolution() {
        let projects = vec!["ml".to_string()];
        assert_eq!(Filter::from_index(0, &projects), Filter::All);
        assert_eq!(Filter::from_index(1, &projects), Filter::Bookmarks);
        assert_eq!(Filter::from_index(2, &projects), Filter::Today);
        assert_eq!(Filter::from_index(3, &projects), Filter::DateRange);
        assert_eq!(Filter::from_index(4, &projects), Filter::Search);
    }

    #[test]
    fn test_project_resolution() {
        let projects = vec!["lattice".to_string(), "ml".to_string()];
        assert_eq!(
            Filter::from_index(5, &projects),
            Filter::Project("lattice".to_string())
        );
        assert_eq!(
            Filter::from_index(6, &projects),
            Filter::Project("ml".to_string())
        );
    }

    #[test]
    fn test_out_of_range_falls_back() {
        assert_eq!(Filter::from_index(17, &[]), Filter::All);
    }

    #[test]
    fn test_options_order() {
        let projects = vec!["lattice".to_string()];
        let options = Filter::options(&projects);
        assert_eq!(options.len(), 6);
        assert_eq!(options[0], "All Articles");
        assert_eq!(options[5], "lattice");
    }
}
