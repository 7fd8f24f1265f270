//! Terminal rendering for ranked lists and fan-out reports.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use tender_core::{CanonicalItem, RankedList, RetrievalReport, SourceError};

use crate::cli::{Cli, OutputFormat};
use crate::commands::Result;

pub fn render_ranked_list(cli: &Cli, ranked: &RankedList) -> Result<()> {
    if cli.output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(ranked)?);
        return Ok(());
    }

    print_errors(&ranked.errors, cli.no_color);
    if ranked.items.is_empty() {
        println!("{}", "No results.".dimmed());
        return Ok(());
    }

    println!("{}", items_table(&ranked.items));
    if let Some(ms) = ranked.duration_ms {
        println!(
            "{}",
            format!("{} results in {}ms", ranked.items.len(), ms).dimmed()
        );
    }
    Ok(())
}

pub fn render_report(cli: &Cli, report: &RetrievalReport) -> Result<()> {
    if cli.output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    print_errors(&report.errors, cli.no_color);

    if !report.items.is_empty() {
        println!("{}", "Web results".bold());
        println!("{}", items_table(&report.items));
    }

    if !report.quotes.is_empty() {
        println!("{}", "Quotes".bold());
        let mut table = base_table(vec!["Symbol", "Price", "Currency"]);
        for q in &report.quotes {
            match &q.error {
                Some(err) => {
                    table.add_row(vec![Cell::new(&q.symbol), Cell::new(err), Cell::new("-")]);
                }
                None => {
                    let price = q.price.map(|p| format!("{p:.2}")).unwrap_or_default();
                    table.add_row(vec![
                        Cell::new(&q.symbol),
                        Cell::new(price),
                        Cell::new(q.currency.as_deref().unwrap_or("-")),
                    ]);
                }
            }
        }
        println!("{table}");
    }

    if let Some(profile) = &report.profile {
        if !profile.summary.is_empty() {
            println!("{}", "Profile".bold());
            println!("{}", profile.summary);
            for url in &profile.sources {
                println!("  {}", url.cyan());
            }
            println!();
        }
    }

    if report.items.is_empty() && report.quotes.is_empty() && report.profile.is_none() {
        println!("{}", "No results.".dimmed());
    }
    if let Some(ms) = report.duration_ms {
        println!("{}", format!("Completed in {ms}ms").dimmed());
    }
    Ok(())
}

fn base_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

fn items_table(items: &[CanonicalItem]) -> Table {
    let mut table = base_table(vec!["#", "Score", "Close", "Title", "Agency", "Source"]);
    for (i, item) in items.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{:.4}", item.score)),
            Cell::new(if item.close_date.is_empty() {
                "-"
            } else {
                item.close_date.as_str()
            }),
            Cell::new(&item.title),
            Cell::new(if item.agency.is_empty() {
                "-"
            } else {
                item.agency.as_str()
            }),
            Cell::new(&item.source),
        ]);
    }
    table
}

fn print_errors(errors: &[SourceError], no_color: bool) {
    for e in errors {
        let tag = if e.is_timeout { "timeout" } else { "error" };
        if no_color {
            eprintln!("{} [{}] {}", tag, e.source, e.error);
        } else {
            eprintln!("{} [{}] {}", tag.red().bold(), e.source.yellow(), e.error);
        }
    }
}
