//! Command-line interface definitions and argument parsing

use crate::metrics::{Granularity, GroupKey, Metric};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Synthetic e-commerce data generation and sales analysis CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a synthetic sales dataset as four CSV files
    Generate {
        /// Output directory for the CSV files
        #[arg(short, long, default_value = "data/raw")]
        output: PathBuf,

        /// Number of customers to generate
        #[arg(long, default_value_t = 1000)]
        customers: usize,

        /// Number of products to generate
        #[arg(long, default_value_t = 500)]
        products: usize,

        /// Number of orders to generate (each with 1-5 line items)
        #[arg(long, default_value_t = 5000)]
        orders: usize,

        /// Random seed for reproducible generation
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Last order date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },

    /// Load a generated dataset and run the analysis pipeline
    Analyze {
        /// Directory containing the four CSV files
        #[arg(short, long, default_value = "data/raw")]
        data_dir: PathBuf,

        /// Grouping dimension for top performers and the summary table
        #[arg(long, value_enum, default_value = "product")]
        group_by: GroupKey,

        /// Ranking metric for top performers
        #[arg(long, value_enum, default_value = "revenue")]
        metric: Metric,

        /// Number of top performers to report
        #[arg(long, default_value_t = 10)]
        top_n: usize,

        /// Time bucket for trend analysis
        #[arg(long, value_enum, default_value = "month")]
        granularity: Granularity,
    },
}
