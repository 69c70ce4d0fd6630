//! Data models for quill

mod article;
mod filter;

pub use article::Article;
pub use filter::{DateRange, Filter, SearchFields, SearchState, FIXED_FILTERS};
