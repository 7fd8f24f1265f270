use indicatif::{ProgressBar, ProgressStyle};
use tender_core::{find_notices, ListingConfig, PpsListing};

use crate::cli::{Cli, OutputFormat};
use crate::commands::{http_client, Result};
use crate::output::render_ranked_list;

pub async fn run(cli: &Cli, query: &str, rows: Option<u32>, pages: Option<u32>) -> Result<()> {
    let client = http_client()?;
    let adapter = PpsListing::new(client, None);

    let mut config = ListingConfig::from_env();
    if let Some(rows) = rows {
        config.page_size = rows;
    }
    if let Some(pages) = pages {
        config.max_pages = pages;
    }

    let spinner = if cli.output == OutputFormat::Pretty {
        let s = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            s.set_style(style);
        }
        s.set_message(format!("Fetching notices for '{query}'..."));
        s.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(s)
    } else {
        None
    };

    let ranked = find_notices(&adapter, query, &config).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    tracing::debug!(
        items = ranked.items.len(),
        errors = ranked.errors.len(),
        "notice listing finished"
    );
    render_ranked_list(cli, &ranked)
}
