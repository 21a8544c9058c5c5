// Entry point and interactive console flow.
//
// The statistics table is loaded once before the menu appears; every menu
// action afterwards only reads it. The current selection is the only state
// that changes between actions.
mod chart;
mod config;
mod dashboard;
mod dataset;
mod error;
mod filter;
mod loader;
mod narrative;
mod output;
mod summary;
mod types;
mod util;

use config::{load_config, AppConfig};
use dashboard::{compute, parse_metric_choice, parse_sector_selection, Selection};
use dataset::Dataset;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Read a single line of input after printing the common prompt.
/// Returns `None` on end of input.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn handle_select_metric(ds: &Dataset, selection: &mut Selection) {
    println!("Available metrics:");
    for (i, m) in ds.metrics().iter().enumerate() {
        let marker = if *m == selection.metric { "*" } else { " " };
        println!(" {}[{}] {}", marker, i + 1, m);
    }
    let Some(input) = read_line("Enter metric number: ") else {
        return;
    };
    match parse_metric_choice(&input, ds.metrics()) {
        Some(metric) => {
            info!(metric = %metric, "metric selected");
            selection.metric = metric;
        }
        None => println!("Invalid choice. Metric unchanged.\n"),
    }
}

fn handle_select_sectors(ds: &Dataset, selection: &mut Selection) {
    println!("Available sectors:");
    for (i, s) in ds.sectors().iter().enumerate() {
        let marker = if selection.sectors.contains(s) { "*" } else { " " };
        println!(" {}[{}] {}", marker, i + 1, s);
    }
    let Some(input) =
        read_line("Enter sector numbers separated by commas (empty or 'all' = all, 'none' = clear): ")
    else {
        return;
    };
    match parse_sector_selection(&input, ds.sectors()) {
        Ok(sectors) => {
            info!(count = sectors.len(), "sectors selected");
            selection.sectors = sectors;
        }
        Err(e) => println!("Invalid selection: {}. Sectors unchanged.\n", e),
    }
}

fn handle_show(ds: &Dataset, selection: &Selection, cfg: &AppConfig) {
    match compute(ds.records(), selection) {
        Ok(dash) => println!("\n{}", output::render_dashboard(&dash, cfg.preview_rows)),
        Err(e) => error!("Cannot build dashboard: {}", e),
    }
}

fn handle_export(ds: &Dataset, selection: &Selection, cfg: &AppConfig) {
    let result = compute(ds.records(), selection)
        .and_then(|dash| output::export(&dash, Path::new(&cfg.output_dir)));
    match result {
        Ok(paths) => {
            for p in paths {
                println!("Saved {}", p.display());
            }
            println!();
        }
        Err(e) => error!("Export failed: {}", e),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_target(false).init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "dashboard.json".to_string());
    let cfg = match load_config(Path::new(&config_path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let ds = match dataset::init(Path::new(&cfg.data_path)) {
        Ok(ds) => ds,
        Err(e) => {
            error!("Failed to load data: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!(
        "PDRB by sector: {} rows, {} metrics, {} sectors, {} periods\n",
        util::format_int(ds.report().total_rows),
        ds.report().metrics,
        ds.report().sectors,
        ds.report().periods
    );

    let Some(mut selection) = Selection::defaults(ds, cfg.default_metric_index) else {
        error!("Dataset has no metrics");
        return ExitCode::FAILURE;
    };
    if let Err(e) = selection.validate(ds) {
        warn!("Default selection rejected: {}", e);
        return ExitCode::FAILURE;
    }

    loop {
        println!("Metric: {} | Sectors: {}", selection.metric, selection.sectors.len());
        println!("[1] Select metric");
        println!("[2] Select sectors");
        println!("[3] Show dashboard");
        println!("[4] Export current view");
        println!("[0] Exit\n");
        let Some(choice) = read_line("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "1" => handle_select_metric(ds, &mut selection),
            "2" => handle_select_sectors(ds, &mut selection),
            "3" => handle_show(ds, &selection, &cfg),
            "4" => handle_export(ds, &selection, &cfg),
            "0" => break,
            _ => println!("Invalid choice. Please enter 0-4.\n"),
        }
    }
    println!("Exiting the program.");
    ExitCode::SUCCESS
}
