//! # Command Layer
//!
//! The operations a client can perform on the catalog. Each command lives in its own
//! submodule and works against a [`Reconciler`](crate::reconciler::Reconciler).
//!
//! ## Role and Responsibilities
//!
//! - Resolve user intent (a page target, a filter, a list of ids) into engine calls
//! - Turn engine outcomes into a structured [`CmdResult`]
//! - Stay UI-agnostic: no stdout, no exit codes, no prompts
//!
//! A missing flag target is not an error at this layer. It becomes a warning message
//! and the remaining ids are still processed. Fetch failures propagate as `Err`.
//!
//! ## Command Modules
//!
//! - [`page`]: Navigate to a page (absolute, next, previous, current)
//! - [`list`]: Project the current view under a filter
//! - [`show`]: Episode details from the store
//! - [`flags`]: Toggle favorite / watched
//! - [`status`]: Cache and pagination report
//! - [`config`]: Manage configuration

use crate::catalog::PaginationIndex;
use crate::config::EpcatConfig;
use crate::model::Episode;

pub mod config;
pub mod flags;
pub mod list;
pub mod page;
pub mod show;
pub mod status;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Episodes to display, in display order.
    pub listed_episodes: Vec<Episode>,
    /// Episodes whose flags were changed, with their new values.
    pub affected_episodes: Vec<Episode>,
    /// Pagination state, present when the listing is a page.
    pub pagination: Option<PaginationIndex>,
    pub status: Option<status::StatusReport>,
    pub config: Option<EpcatConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_episodes(mut self, episodes: Vec<Episode>) -> Self {
        self.listed_episodes = episodes;
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationIndex) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_config(mut self, config: EpcatConfig) -> Self {
        self.config = Some(config);
        self
    }
}
