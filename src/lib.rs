//! RetailForge: a Rust CLI for synthetic e-commerce data and sales analysis
//!
//! This library generates a reproducible fake sales dataset (customers,
//! products, orders, sale line items) and provides a Polars-based pipeline
//! to load, join, and aggregate it into business metrics.

pub mod cli;
pub mod data;
pub mod generator;
pub mod metrics;
pub mod report;

// Re-export public items for easier access
pub use cli::{Args, Command};
pub use data::{clean_sales_tables, comprehensive_dataset, load_sales_tables, SalesTables};
pub use generator::{generate_dataset, GeneratorConfig, SalesDataset};
pub use metrics::{
    analyze_trends, business_metrics, summary_table, top_performers, BusinessMetrics, Granularity,
    GroupKey, Metric,
};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
