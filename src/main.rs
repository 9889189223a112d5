mod parse;

use crate::parse::{Args, Format};
use clap::Parser;
use ebird_checklist::util::print_hms;
use ebird_checklist::{ChecklistRecord, ChecklistScraper};
use log::LevelFilter;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Identifiers that produced no record
pub fn get_failed_ids(original_ids: &[String], scraped_records: &[ChecklistRecord]) -> Vec<String> {
    let scraped_ids: HashSet<&str> = scraped_records
        .iter()
        .map(|r| r.identifier.as_str())
        .collect();

    original_ids
        .iter()
        .filter(|id| !scraped_ids.contains(id.as_str()))
        .cloned()
        .collect()
}

pub fn print_summary(records: &[ChecklistRecord]) {
    if records.is_empty() {
        println!("No records to summarize");
        return;
    }

    println!("\nSummary:");
    println!("Total checklists: {}", records.len());
    println!(
        "Total entries: {}",
        records.iter().map(|r| r.entries.len()).sum::<usize>()
    );

    let unique_species: HashSet<&String> = records
        .iter()
        .flat_map(|r| r.entries.iter().map(|e| &e.species))
        .collect();
    println!("Unique species: {}", unique_species.len());

    let dates = records.iter().map(|r| r.date);
    if let (Some(min_date), Some(max_date)) = (dates.clone().min(), dates.max()) {
        println!("Date range: {} to {}", min_date, max_date);
    }

    // Top regions
    let mut region_counts: HashMap<&String, usize> = HashMap::new();
    for record in records {
        *region_counts
            .entry(&record.location.subnational1.name)
            .or_insert(0) += 1;
    }

    let mut sorted_regions: Vec<_> = region_counts.into_iter().collect();
    sorted_regions.sort_by(|a, b| b.1.cmp(&a.1));

    println!("Top regions:");
    for (region, count) in sorted_regions.iter().take(3) {
        println!("  {}: {}", region, count);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::try_parse()?;

    // Initialize logger, RUST_LOG still wins when set
    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let scraper = ChecklistScraper::new()?
        .with_delay(args.delay)
        .with_max_retries(args.retries);

    println!("\nScraping {} checklists...", args.identifiers.len());
    let start = Instant::now();
    let records = scraper
        .scrape_multiple_checklists(&args.identifiers, args.concurrent)
        .await;

    print_hms(&start);
    match args.format {
        Format::Csv => scraper.save_to_csv(&records, &args.output)?,
        Format::Json => scraper.save_to_json(&records, &args.output)?,
    }

    let failed = get_failed_ids(&args.identifiers, &records);
    if !failed.is_empty() {
        println!("Failed checklists: {}", failed.join(", "));
    }

    print_summary(&records);

    Ok(())
}
