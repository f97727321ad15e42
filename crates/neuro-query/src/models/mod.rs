//! Data models for the query backend.
//!
//! Study fields decode leniently: a record with odd or missing fields still
//! renders and sorts, with missing values treated as `0` / `""`.

pub mod collate;
mod sort;
mod study;
mod term;

pub use sort::{SortDirection, SortKey, SortOrder, sort_studies};
pub use study::{Study, StudyList};
pub use term::{Term, TermList};
