//! RetailForge: synthetic e-commerce dataset generation and sales analysis
//!
//! This is the main entrypoint that orchestrates dataset generation, the
//! load/clean/join pipeline, and metric reporting.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use retailforge::{
    analyze_trends, business_metrics, clean_sales_tables, comprehensive_dataset, generate_dataset,
    load_sales_tables, report, summary_table, top_performers, Args, Command, GeneratorConfig,
    Granularity, GroupKey, Metric,
};
use std::path::Path;
use std::time::Instant;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    if args.verbose {
        println!("RetailForge - Synthetic Sales Data & Analysis");
        println!("=============================================\n");
    }

    match args.command {
        Command::Generate {
            ref output,
            customers,
            products,
            orders,
            seed,
            end_date,
        } => {
            let config = GeneratorConfig {
                customers,
                products,
                orders,
                seed,
                end_date: end_date.unwrap_or_else(|| Utc::now().date_naive()),
            };
            run_generate(output, &config, args.verbose)?;
        }
        Command::Analyze {
            ref data_dir,
            group_by,
            metric,
            top_n,
            granularity,
        } => {
            run_analyze(data_dir, group_by, metric, top_n, granularity, args.verbose)?;
        }
    }

    Ok(())
}

/// Generate the dataset and write it as CSV files
fn run_generate(output: &Path, config: &GeneratorConfig, verbose: bool) -> Result<()> {
    println!("=== Generating Sales Dataset ===");
    if verbose {
        println!(
            "  Counts: {} customers, {} products, {} orders",
            config.customers, config.products, config.orders
        );
        println!("  Seed: {}", config.seed);
        println!("  End date: {}", config.end_date);
    }

    let start_time = Instant::now();
    let dataset = generate_dataset(config)?;
    println!(
        "✓ Generated {} sale line items across {} orders",
        dataset.sales.len(),
        dataset.orders.len()
    );

    dataset.write_csv(output)?;
    println!("✓ Data saved to {}/", output.display());

    report::print_generation_summary(&dataset);

    if verbose {
        println!(
            "\nGeneration time: {:.2}s",
            start_time.elapsed().as_secs_f64()
        );
    }
    Ok(())
}

/// Run the full analysis pipeline over a generated dataset
fn run_analyze(
    data_dir: &Path,
    group_by: GroupKey,
    metric: Metric,
    top_n: usize,
    granularity: Granularity,
    verbose: bool,
) -> Result<()> {
    println!("=== Sales Analysis Pipeline ===\n");
    let start_time = Instant::now();

    // Step 1: Load and clean the four tables
    if verbose {
        println!("Step 1: Loading datasets from {}", data_dir.display());
    }
    let load_start = Instant::now();
    let tables = clean_sales_tables(load_sales_tables(data_dir)?)?;
    println!(
        "✓ Loaded 4 datasets: {} customers, {} products, {} orders, {} sales",
        tables.customers.height(),
        tables.products.height(),
        tables.orders.height(),
        tables.sales.height()
    );
    if verbose {
        println!("  Load time: {:.2}s", load_start.elapsed().as_secs_f64());
    }

    // Step 2: Build the comprehensive joined dataset
    if verbose {
        println!("\nStep 2: Building comprehensive dataset");
    }
    let df = comprehensive_dataset(&tables)?;
    println!(
        "✓ Comprehensive dataset: {} rows x {} columns",
        df.height(),
        df.width()
    );

    // Step 3: Aggregate metrics
    let metrics = business_metrics(&df)?;
    report::print_business_metrics(&metrics);

    let top = top_performers(&df, group_by, metric, top_n)?;
    report::print_table(&format!("Top {top_n} by {group_by} ({metric})"), &top);

    let trends = analyze_trends(&df, granularity)?;
    report::print_table(&format!("Sales trends per {granularity}"), &trends);

    let summary = summary_table(&df, group_by, &[Metric::Revenue, Metric::Profit, Metric::Quantity])?;
    report::print_table(&format!("Summary by {group_by}"), &summary);

    println!("\n=== Pipeline Complete ===");
    println!(
        "Total processing time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
