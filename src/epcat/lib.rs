//! # Epcat Architecture
//!
//! Epcat is a **client-side episode catalog**: a local cache that sits between a UI and
//! a paginated remote episode source. It keeps every episode it has ever fetched, lets
//! the user attach flags (favorite, watched) to them, and keeps those flags intact no
//! matter how often the remote data is refetched.
//!
//! It is a library that happens to have a CLI client.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs) + Command Layer (commands/*.rs)         │
//! │  - Thin facade, per-operation logic, structured results     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine (reconciler.rs, projector.rs, catalog/)             │
//! │  - Cache-or-fetch per page, in-flight dedup, flag merge     │
//! │  - Read-only projections (current page / filtered)          │
//! └─────────────────────────────────────────────────────────────┘
//!                   │                          │
//!                   ▼                          ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Storage (store/)             │ │  Sources (source/)        │
//! │  - DataStore trait            │ │  - PageSource trait       │
//! │  - FileStore, InMemoryStore   │ │  - GraphqlSource          │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## The Flag Rule
//!
//! Remote data owns an episode's descriptive fields. The user owns `favorite` and
//! `watched`. Every merge of fetched data keeps the flags already in the store; a new
//! episode starts with both unset.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits the
//! process. Side effects go through the two collaborator traits only, so the same core
//! can back a terminal client, a TUI, or a server.
//!
//! ## Testing Strategy
//!
//! - **Engine and commands**: `InMemoryStore` + `ScriptedSource`, async tests on tokio
//! - **Storage**: `FileStore` against temp directories
//! - **CLI**: the built binary, with its data directory pointed at a temp dir

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod projector;
pub mod reconciler;
pub mod source;
pub mod store;
