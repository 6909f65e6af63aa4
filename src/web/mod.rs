// ABOUTME: Host page pieces around the console: stylesheet, search filter, job actions

pub mod actions;
pub mod filter;
pub mod style;

pub use actions::{ActionError, JobAction, JobActionClient};
pub use filter::{filter_entries, FilterOutcome};
pub use style::{page, stylesheet};
