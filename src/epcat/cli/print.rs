use chrono::{DateTime, Utc};
use colored::Colorize;
use epcat::api::{CmdMessage, MessageLevel, StatusReport};
use epcat::catalog::{PageWindow, PaginationIndex};
use epcat::config::EpcatConfig;
use epcat::model::{CharacterStatus, Episode};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const CODE_WIDTH: usize = 8;
const DATE_WIDTH: usize = 20;
const PAGE_WINDOW: u32 = 5;
const FAVORITE_MARKER: &str = "★";
const WATCHED_MARKER: &str = "✓";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_episodes(episodes: &[Episode]) {
    for episode in episodes {
        println!("{}", render_episode_line(episode));
    }
}

fn render_episode_line(episode: &Episode) -> String {
    let idx_str = format!("{:>4}. ", episode.id);
    let code = format!("{:<width$}", episode.code, width = CODE_WIDTH);
    let markers = format!(
        " {}{} ",
        if episode.favorite { FAVORITE_MARKER } else { " " },
        if episode.watched { WATCHED_MARKER } else { " " },
    );
    let date = format!("{:>width$}", episode.formatted_air_date(), width = DATE_WIDTH);

    let fixed_width = idx_str.width() + code.width() + markers.width() + date.width();
    let available = LINE_WIDTH.saturating_sub(fixed_width);
    let name = truncate_to_width(&episode.name, available);
    let padding = available.saturating_sub(name.width());

    format!(
        "{}{}{}{}{}{}",
        idx_str,
        code.cyan(),
        name,
        " ".repeat(padding),
        markers.yellow(),
        date.dimmed()
    )
}

pub(super) fn print_full_episodes(episodes: &[Episode]) {
    for (i, episode) in episodes.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!("{} {}", episode.code.yellow(), episode.name.bold());
        println!("--------------------------------");
        println!("Air date:   {}", episode.formatted_air_date());
        println!("Favorite:   {}", yes_no(episode.favorite));
        println!("Watched:    {}", yes_no(episode.watched));
        if episode.characters.is_empty() {
            continue;
        }
        println!("Characters:");
        for character in &episode.characters {
            let status = character.status.to_string();
            let status = match character.status {
                CharacterStatus::Alive => status.green(),
                CharacterStatus::Dead => status.red(),
                CharacterStatus::Unknown => status.dimmed(),
            };
            println!(
                "  {} ({}, {})",
                character.name,
                character.species.dimmed(),
                status
            );
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

pub(super) fn print_page_footer(pagination: &PaginationIndex) {
    println!();
    if let Some(window) = pagination.page_window(PAGE_WINDOW) {
        println!("{}", render_page_window(&window));
    }
    println!(
        "{}",
        format!(
            "page {} of {} · {} episodes",
            pagination.current_page, pagination.total_pages, pagination.total_records
        )
        .dimmed()
    );
}

/// `‹ 1 … 4 5 [6] 7 8 … 51 ›`, with the arrows only where a neighbour exists.
fn render_page_window(window: &PageWindow) -> String {
    let mut parts: Vec<String> = Vec::new();
    if window.current > 1 {
        parts.push("‹".to_string());
    }
    if window.show_first {
        parts.push("1".to_string());
    }
    if window.leading_gap {
        parts.push("…".to_string());
    }
    for page in &window.pages {
        if *page == window.current {
            parts.push(format!("[{}]", page));
        } else {
            parts.push(page.to_string());
        }
    }
    if window.trailing_gap {
        parts.push("…".to_string());
    }
    if window.show_last {
        parts.push(window.total.to_string());
    }
    if window.current < window.total {
        parts.push("›".to_string());
    }
    parts.join(" ")
}

pub(super) fn print_status(report: &StatusReport) {
    println!(
        "Remote:     {} episodes in {} pages",
        report.total_records, report.total_pages
    );
    println!(
        "Last reply: earlier pages {}, later pages {}",
        yes_no(report.has_prev_page),
        yes_no(report.has_next_page)
    );
    println!("Current:    page {}", report.current_page);
    println!(
        "Cached:     {} episodes ({} favorite, {} watched)",
        report.cached_episodes, report.favorites, report.watched
    );
    if report.pages.is_empty() {
        return;
    }
    println!();
    let now = Utc::now();
    for page in &report.pages {
        let age = page_age(page.fetched_at, page.fetching, now);
        let marker = if page.page == report.current_page {
            "›"
        } else {
            " "
        };
        println!(
            "{} page {:>4}  {:>3} episodes  {}",
            marker.yellow(),
            page.page,
            page.episodes,
            age.dimmed()
        );
    }
}

pub(super) fn print_config(config: &EpcatConfig) {
    for key in EpcatConfig::keys() {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    // One column is reserved for the ellipsis.
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let kept: String = s
        .chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= budget
        })
        .collect();
    format!("{}…", kept)
}

/// How long ago a page was fetched, as of `now`.
fn page_age(fetched_at: Option<DateTime<Utc>>, fetching: bool, now: DateTime<Utc>) -> String {
    if fetching {
        return "refreshing".to_string();
    }
    match fetched_at {
        Some(at) => {
            let elapsed = now.signed_duration_since(at).to_std().unwrap_or_default();
            format!("fetched {}", Formatter::new().convert(elapsed))
        }
        None => "fetch time unknown".to_string(),
    }
}
