//! Console reporting for generated datasets and computed metrics

use crate::generator::SalesDataset;
use crate::metrics::BusinessMetrics;
use polars::prelude::DataFrame;

/// Print the post-generation dataset summary
pub fn print_generation_summary(dataset: &SalesDataset) {
    println!("\n=== Dataset Summary ===");
    println!("Customers: {} records", dataset.customers.len());
    println!("Products: {} records", dataset.products.len());
    println!("Orders: {} records", dataset.orders.len());
    println!("Sales: {} records", dataset.sales.len());
    println!("Total Revenue: ${:.2}", dataset.total_revenue());
    println!("Total Profit: ${:.2}", dataset.total_profit());
    if let Some((first, last)) = dataset.order_date_range() {
        println!("Date Range: {} to {}", first, last);
    }
}

/// Print the key business metrics
pub fn print_business_metrics(metrics: &BusinessMetrics) {
    println!("\n=== Business Metrics ===");
    println!("Total revenue:       ${:.2}", metrics.total_revenue);
    println!("Total profit:        ${:.2}", metrics.total_profit);
    println!("Orders:              {}", metrics.total_orders);
    println!("Customers:           {}", metrics.total_customers);
    println!("Units sold:          {}", metrics.total_units);
    println!("Avg order value:     ${:.2}", metrics.avg_order_value);
    println!("Avg profit margin:   {:.2}%", metrics.avg_profit_margin);
    println!(
        "Date range:          {} to {}",
        metrics.first_order_date, metrics.last_order_date
    );
}

/// Print a dataframe under a section header
pub fn print_table(title: &str, df: &DataFrame) {
    println!("\n=== {title} ===");
    println!("{df}");
}
