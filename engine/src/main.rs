// Stock trend analyzer entry point
use anyhow::Context;
use std::process::ExitCode;
use trend_engine::config::settings::AnalyzerSettings;
use trend_engine::report;
use trend_engine::services::TrendAnalyzer;
use tracing::{error, info};

const CONFIG_ENV: &str = "STOCK_TREND_CONFIG";
const SYMBOL_ENV: &str = "STOCK_TREND_SYMBOL";
const FILE_ENV: &str = "STOCK_TREND_FILE";

fn load_settings() -> anyhow::Result<AnalyzerSettings> {
    let mut settings = match std::env::var(CONFIG_ENV) {
        Ok(path) => AnalyzerSettings::load_from_path(&path)?,
        Err(_) => AnalyzerSettings::load_default()?,
    };
    if let Ok(symbol) = std::env::var(SYMBOL_ENV) {
        settings.symbol = symbol;
    }
    if let Ok(file_path) = std::env::var(FILE_ENV) {
        settings.file_path = file_path;
    }
    Ok(settings)
}

fn main() -> ExitCode {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    info!("Starting Stock Trend Analyzer...");

    let settings = match load_settings().context("Failed to load configuration") {
        Ok(settings) => settings,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("An unexpected error occurred: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        version = %settings.version,
        symbol = %settings.symbol,
        path = %settings.file_path,
        "Loaded configuration"
    );

    let outcome = TrendAnalyzer::new(&settings).and_then(|mut analyzer| {
        let trend = analyzer.analyze_path(&settings.file_path)?;

        println!("{} Stock Data", trend.symbol);
        println!("{}", report::render_table(&trend.series, settings.table_max_rows));

        let svg = report::render_svg(&trend.symbol, &trend.series, &settings.chart);
        report::save_svg(&settings.chart.output_path, &svg)?;
        println!(
            "{} Stock Price and Moving Averages: {}",
            trend.symbol, settings.chart.output_path
        );
        Ok(())
    });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(kind = ?e.kind(), error_detail = %e, "Analysis aborted");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
