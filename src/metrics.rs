//! Aggregate business metrics over the comprehensive dataset
//!
//! Every function here is a pure transformation of the joined table; the
//! grouping dimensions, ranking metrics, and time granularities are closed
//! enums so an invalid combination cannot reach the aggregation step.

use chrono::{Duration, NaiveDate};
use clap::ValueEnum;
use polars::prelude::*;

/// Grouping dimensions supported by the aggregation functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupKey {
    /// Per-product, keyed by id and display name together
    Product,
    Category,
    Subcategory,
    /// Customer segment tier (Premium/Standard/Basic)
    Segment,
    AgeGroup,
    ShippingMethod,
    Country,
}

impl GroupKey {
    /// Comprehensive-table columns this key groups by. Product uses the
    /// compound id+name key so results retain the display name.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            GroupKey::Product => &["product_id", "product_name"],
            GroupKey::Category => &["category"],
            GroupKey::Subcategory => &["subcategory"],
            GroupKey::Segment => &["customer_segment"],
            GroupKey::AgeGroup => &["age_group"],
            GroupKey::ShippingMethod => &["shipping_method"],
            GroupKey::Country => &["country"],
        }
    }

    fn key_exprs(&self) -> Vec<Expr> {
        self.columns().iter().map(|c| col(c)).collect()
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GroupKey::Product => "product",
            GroupKey::Category => "category",
            GroupKey::Subcategory => "subcategory",
            GroupKey::Segment => "customer segment",
            GroupKey::AgeGroup => "age group",
            GroupKey::ShippingMethod => "shipping method",
            GroupKey::Country => "country",
        };
        write!(f, "{name}")
    }
}

/// Metrics that can be ranked or summarized
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Metric {
    /// Sale line revenue (total_amount)
    Revenue,
    Profit,
    /// Units sold
    Quantity,
}

impl Metric {
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Revenue => "total_amount",
            Metric::Profit => "profit",
            Metric::Quantity => "quantity",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Metric::Revenue => "revenue",
            Metric::Profit => "profit",
            Metric::Quantity => "quantity",
        };
        write!(f, "{name}")
    }
}

/// Time bucketing unit for trend analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Granularity {
    /// Calendar month (YYYY-MM)
    Month,
    /// (year, quarter) pair
    Quarter,
    /// Weekday name
    Weekday,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
            Granularity::Weekday => "weekday",
        };
        write!(f, "{name}")
    }
}

/// Key business metrics computed from the comprehensive dataset
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessMetrics {
    pub total_revenue: f64,
    pub total_profit: f64,
    /// Distinct order count
    pub total_orders: u32,
    /// Distinct customer count
    pub total_customers: u32,
    /// Total units sold
    pub total_units: i64,
    /// Mean of per-order revenue sums (not a flat mean over line items)
    pub avg_order_value: f64,
    /// Mean profit margin, skipping rows where the margin is undefined
    pub avg_profit_margin: f64,
    pub first_order_date: NaiveDate,
    pub last_order_date: NaiveDate,
}

/// Compute the key business metrics.
///
/// Errors on an empty comprehensive table, since no date range exists.
pub fn business_metrics(df: &DataFrame) -> crate::Result<BusinessMetrics> {
    if df.height() == 0 {
        anyhow::bail!("comprehensive dataset is empty");
    }

    let totals = df
        .clone()
        .lazy()
        .select([
            col("total_amount").sum().alias("total_revenue"),
            col("profit").sum().alias("total_profit"),
            col("order_id").n_unique().alias("total_orders"),
            col("customer_id").n_unique().alias("total_customers"),
            col("quantity").sum().alias("total_units"),
            col("profit_margin").mean().alias("avg_profit_margin"),
            col("order_date").min().alias("first_order"),
            col("order_date").max().alias("last_order"),
        ])
        .collect()?;

    // Average order value: sum per order first, then mean across orders
    let per_order = df
        .clone()
        .lazy()
        .group_by([col("order_id")])
        .agg([col("total_amount").sum().alias("order_total")])
        .collect()?;
    let avg_order_value = per_order
        .column("order_total")?
        .f64()?
        .mean()
        .unwrap_or(f64::NAN);

    let first_order_date = date_at(&totals, "first_order")?
        .ok_or_else(|| anyhow::anyhow!("no order dates present in dataset"))?;
    let last_order_date = date_at(&totals, "last_order")?
        .ok_or_else(|| anyhow::anyhow!("no order dates present in dataset"))?;

    Ok(BusinessMetrics {
        total_revenue: f64_at(&totals, "total_revenue")?,
        total_profit: f64_at(&totals, "total_profit")?,
        total_orders: u32_at(&totals, "total_orders")?,
        total_customers: u32_at(&totals, "total_customers")?,
        total_units: i64_at(&totals, "total_units")?,
        avg_order_value,
        avg_profit_margin: f64_at(&totals, "avg_profit_margin")?,
        first_order_date,
        last_order_date,
    })
}

/// Top `top_n` groups ranked by `metric`.
///
/// Sums total_amount, profit, and quantity per group and sorts descending
/// by the ranking metric. Fewer groups than `top_n` returns all of them.
pub fn top_performers(
    df: &DataFrame,
    group_by: GroupKey,
    metric: Metric,
    top_n: usize,
) -> crate::Result<DataFrame> {
    let out = df
        .clone()
        .lazy()
        .group_by_stable(group_by.key_exprs())
        .agg([
            col("total_amount").sum(),
            col("profit").sum(),
            col("quantity").sum(),
        ])
        .sort(metric.column(), sort_descending())
        .limit(top_n as IdxSize)
        .collect()?;

    Ok(out)
}

/// Revenue/profit/quantity sums and distinct order counts per time bucket.
pub fn analyze_trends(df: &DataFrame, granularity: Granularity) -> crate::Result<DataFrame> {
    let aggs = [
        col("total_amount").sum(),
        col("profit").sum(),
        col("order_id").n_unique().alias("order_count"),
        col("quantity").sum(),
    ];

    let lf = df.clone().lazy();
    let out = match granularity {
        Granularity::Month => lf
            .with_columns([col("order_date").dt().strftime("%Y-%m").alias("period")])
            .group_by_stable([col("period")])
            .agg(aggs)
            .sort("period", SortOptions::default()),
        Granularity::Quarter => lf
            .group_by_stable([col("year"), col("quarter")])
            .agg(aggs)
            .sort_by_exprs([col("year"), col("quarter")], [false, false], false, false),
        Granularity::Weekday => lf
            .group_by_stable([col("day_of_week")])
            .agg(aggs)
            .sort("total_amount", sort_descending()),
    }
    .collect()?;

    Ok(out)
}

/// Per-group sum, mean, and count for each chosen metric, flattened to
/// `{column}_sum` / `{column}_mean` / `{column}_count` columns and sorted
/// descending by the first metric's sum.
pub fn summary_table(
    df: &DataFrame,
    group_by: GroupKey,
    metrics: &[Metric],
) -> crate::Result<DataFrame> {
    if metrics.is_empty() {
        anyhow::bail!("summary table requires at least one metric");
    }

    let mut aggs = Vec::with_capacity(metrics.len() * 3);
    for metric in metrics {
        let name = metric.column();
        aggs.push(
            col(name)
                .sum()
                .cast(DataType::Float64)
                .round(2)
                .alias(&format!("{name}_sum")),
        );
        aggs.push(col(name).mean().round(2).alias(&format!("{name}_mean")));
        aggs.push(col(name).count().alias(&format!("{name}_count")));
    }
    let sort_column = format!("{}_sum", metrics[0].column());

    let out = df
        .clone()
        .lazy()
        .group_by_stable(group_by.key_exprs())
        .agg(aggs)
        .sort(&sort_column, sort_descending())
        .collect()?;

    Ok(out)
}

fn sort_descending() -> SortOptions {
    let mut options = SortOptions::default();
    options.descending = true;
    options.nulls_last = true;
    options
}

fn f64_at(df: &DataFrame, name: &str) -> crate::Result<f64> {
    Ok(df.column(name)?.f64()?.get(0).unwrap_or(f64::NAN))
}

fn u32_at(df: &DataFrame, name: &str) -> crate::Result<u32> {
    Ok(df.column(name)?.u32()?.get(0).unwrap_or(0))
}

fn i64_at(df: &DataFrame, name: &str) -> crate::Result<i64> {
    Ok(df.column(name)?.i64()?.get(0).unwrap_or(0))
}

fn date_at(df: &DataFrame, name: &str) -> crate::Result<Option<NaiveDate>> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
        .ok_or_else(|| anyhow::anyhow!("invalid epoch date"))?;
    Ok(df
        .column(name)?
        .date()?
        .get(0)
        .map(|days| epoch + Duration::days(days as i64)))
}
