use super::print::{
    print_config, print_episodes, print_full_episodes, print_messages, print_page_footer,
    print_status,
};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use epcat::api::{ConfigAction, EpcatApi, PageTarget};
use epcat::config::EpcatConfig;
use epcat::error::{EpcatError, Result};
use epcat::projector::ViewFilter;
use epcat::source::graphql::GraphqlSource;
use epcat::store::fs::FileStore;
use std::path::PathBuf;
use tracing::{debug, warn, Level};

/// Overrides the platform data directory.
const HOME_ENV: &str = "EPCAT_HOME";

struct AppContext {
    api: EpcatApi<FileStore, GraphqlSource>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = init_context()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let touches_catalog = !matches!(cli.command, Some(Commands::Config { .. }));
    let outcome = runtime.block_on(dispatch(&ctx, cli.command));

    if touches_catalog {
        if let Err(e) = ctx.api.shutdown() {
            warn!(error = %e, "failed to save catalog on exit");
        }
    }
    outcome
}

async fn dispatch(ctx: &AppContext, command: Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::Page { number }) => {
            let target = number.map_or(PageTarget::Current, PageTarget::Number);
            handle_page(ctx, target).await
        }
        Some(Commands::Next) => handle_page(ctx, PageTarget::Next).await,
        Some(Commands::Prev) => handle_page(ctx, PageTarget::Prev).await,
        Some(Commands::List {
            search,
            favorites,
            watched,
        }) => {
            let mut filter = ViewFilter::new().with_search(search.unwrap_or_default());
            filter.favorites_only = favorites;
            filter.watched_only = watched;
            handle_list(ctx, &filter).await
        }
        Some(Commands::Show { ids }) => handle_show(ctx, ids),
        Some(Commands::Favorite { ids }) => handle_favorite(ctx, ids),
        Some(Commands::Watched { ids }) => handle_watched(ctx, ids),
        Some(Commands::Status) => handle_status(ctx),
        Some(Commands::Config { key, value }) => handle_config(ctx, key, value),
        None => handle_list(ctx, &ViewFilter::new()).await,
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "epcat", "epcat")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| EpcatError::Api("Could not determine data directory".to_string()))
}

fn init_context() -> Result<AppContext> {
    let dir = data_dir()?;
    let config = match EpcatConfig::load(&dir) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "ignoring unreadable config, using defaults");
            EpcatConfig::default()
        }
    }
    .with_env_overrides();
    debug!(data_dir = %dir.display(), api_url = %config.api_url, "starting");

    let source = GraphqlSource::new(config.api_url.clone(), config.timeout());
    let store = FileStore::new(dir.clone());
    Ok(AppContext {
        api: EpcatApi::open(source, store, dir),
    })
}

async fn handle_page(ctx: &AppContext, target: PageTarget) -> Result<()> {
    let result = ctx.api.page(target).await?;
    print_episodes(&result.listed_episodes);
    if let Some(pagination) = &result.pagination {
        print_page_footer(pagination);
    }
    print_messages(&result.messages);
    Ok(())
}

async fn handle_list(ctx: &AppContext, filter: &ViewFilter) -> Result<()> {
    let result = ctx.api.list(filter).await?;
    print_episodes(&result.listed_episodes);
    if let Some(pagination) = &result.pagination {
        print_page_footer(pagination);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.show(&ids)?;
    print_full_episodes(&result.listed_episodes);
    print_messages(&result.messages);
    Ok(())
}

fn handle_favorite(ctx: &AppContext, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.favorite(&ids)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_watched(ctx: &AppContext, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.watched(&ids)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_status(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.status()?;
    if let Some(report) = &result.status {
        print_status(report);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}
