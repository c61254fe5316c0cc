//! # CLI Behavior
//!
//! This is **one possible UI client** for epcat, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output
//! formatting.
//!
//! ## Naked Execution (`epcat`)
//!
//! Running `epcat` with no arguments lists the current view, which is the current
//! page. The page is fetched only if it is not cached yet.
//!
//! ## Navigation
//!
//! `page N`, `next` and `prev` move the cursor and are clamped to the known page
//! range once any page has reported totals. The cursor is saved on exit, so the next
//! run resumes where this one stopped.
//!
//! ## Filters
//!
//! `list --search/--favorites/--watched` switch to the filtered view, which spans
//! every cached episode and never touches the network.
//!
//! ## Environment
//!
//! - `EPCAT_HOME`: data directory (config and catalog)
//! - `EPCAT_API_URL`: overrides the configured endpoint

mod commands;
mod print;
mod setup;

pub use commands::run;
