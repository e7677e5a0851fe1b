//! Data loading, cleaning, and the comprehensive joined dataset using Polars

use anyhow::Context;
use polars::prelude::*;
use std::path::Path;

/// The four raw (or cleaned) sales tables
#[derive(Debug, Clone)]
pub struct SalesTables {
    pub customers: DataFrame,
    pub products: DataFrame,
    pub orders: DataFrame,
    pub sales: DataFrame,
}

/// Load the four CSV tables from `data_dir`.
///
/// A missing or malformed file is a fatal error carrying the failing path;
/// nothing is retried or silently skipped.
pub fn load_sales_tables(data_dir: &Path) -> crate::Result<SalesTables> {
    Ok(SalesTables {
        customers: read_table(&data_dir.join("customers.csv"))?,
        products: read_table(&data_dir.join("products.csv"))?,
        orders: read_table(&data_dir.join("orders.csv"))?,
        sales: read_table(&data_dir.join("sales.csv"))?,
    })
}

fn read_table(path: &Path) -> crate::Result<DataFrame> {
    let df = CsvReader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .has_header(true)
        .finish()
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(df)
}

/// Parse the date-typed columns of each table from text into `Date` values.
///
/// All other columns pass through unchanged. Dates must match `%Y-%m-%d`
/// exactly; a malformed value fails the clean step rather than turning into
/// a silent null.
pub fn clean_sales_tables(tables: SalesTables) -> crate::Result<SalesTables> {
    Ok(SalesTables {
        customers: parse_date_columns(tables.customers, &["registration_date"])?,
        products: parse_date_columns(tables.products, &["launch_date"])?,
        orders: parse_date_columns(
            tables.orders,
            &["order_date", "shipped_date", "delivered_date"],
        )?,
        sales: tables.sales,
    })
}

fn parse_date_columns(df: DataFrame, columns: &[&str]) -> crate::Result<DataFrame> {
    let mut options = StrptimeOptions::default();
    options.format = Some("%Y-%m-%d".into());
    options.strict = true;

    let exprs: Vec<Expr> = columns
        .iter()
        .map(|name| col(name).str().to_date(options.clone()))
        .collect();

    Ok(df.lazy().with_columns(exprs).collect()?)
}

/// Build the comprehensive denormalized dataset.
///
/// Left-joins sales to orders, products, and customers so that every sale
/// row is preserved; a sale whose key fails to resolve keeps its row with
/// null joined fields. Adds the derived profitability and calendar columns.
pub fn comprehensive_dataset(tables: &SalesTables) -> crate::Result<DataFrame> {
    let df = tables
        .sales
        .clone()
        .lazy()
        .join(
            tables.orders.clone().lazy(),
            [col("order_id")],
            [col("order_id")],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            tables.products.clone().lazy(),
            [col("product_id")],
            [col("product_id")],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            tables.customers.clone().lazy(),
            [col("customer_id")],
            [col("customer_id")],
            JoinArgs::new(JoinType::Left),
        )
        .with_columns([
            // A zero total would divide to +/-inf; represent it as null so
            // downstream means skip it instead of propagating non-finites
            when(col("total_amount").neq(lit(0.0)))
                .then(col("profit") / col("total_amount") * lit(100.0))
                .otherwise(lit(NULL))
                .alias("profit_margin"),
            col("order_date").dt().year().alias("year"),
            col("order_date").dt().month().alias("month"),
            col("order_date").dt().quarter().alias("quarter"),
            col("order_date").dt().strftime("%A").alias("day_of_week"),
            col("order_date").dt().strftime("%B").alias("month_name"),
            // Date columns cast to their physical day count; null-safe for
            // rows whose order join failed
            (col("delivered_date").cast(DataType::Int32)
                - col("order_date").cast(DataType::Int32))
            .alias("delivery_days"),
        ])
        .collect()?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    /// Write a small, fully consistent set of fixture tables plus one
    /// orphaned sale and one zero-amount sale
    fn create_fixture_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();

        let mut f = std::fs::File::create(dir.path().join("customers.csv")).unwrap();
        writeln!(f, "customer_id,first_name,last_name,email,phone,city,state,country,postal_code,registration_date,customer_segment,age_group").unwrap();
        writeln!(f, "CUST_00001,Ada,Lovelace,ada.lovelace1@example.com,+1-555-010-0001,Springfield,Illinois,United States,62701,2023-01-15,Premium,26-35").unwrap();
        writeln!(f, "CUST_00002,Grace,Hopper,grace.hopper2@example.com,+1-555-010-0002,Arlington,Virginia,United States,22201,2022-11-03,Standard,46-55").unwrap();

        let mut f = std::fs::File::create(dir.path().join("products.csv")).unwrap();
        writeln!(f, "product_id,product_name,category,subcategory,price,cost,supplier,launch_date,weight_kg,rating").unwrap();
        writeln!(f, "PROD_00001,Compact Steel Lamp,Electronics,Audio,100.0,50.0,Smith Ltd,2023-03-01,1.5,4.5").unwrap();
        writeln!(f, "PROD_00002,Rustic Cotton Notebook,Books,Fiction,20.0,10.0,Jones Inc,2023-05-20,0.3,4.0").unwrap();

        let mut f = std::fs::File::create(dir.path().join("orders.csv")).unwrap();
        writeln!(f, "order_id,customer_id,order_date,shipped_date,delivered_date,shipping_method,shipping_cost,order_status").unwrap();
        writeln!(f, "ORD_000001,CUST_00001,2024-01-10,2024-01-12,2024-01-15,Standard,7.5,Completed").unwrap();
        writeln!(f, "ORD_000002,CUST_00002,2024-02-05,2024-02-07,2024-02-10,Express,12.0,Completed").unwrap();

        let mut f = std::fs::File::create(dir.path().join("sales.csv")).unwrap();
        writeln!(f, "sale_id,order_id,product_id,quantity,unit_price,discount_rate,discount_amount,final_price,total_amount,cost_per_unit,total_cost,profit").unwrap();
        writeln!(f, "SALE_000001_1,ORD_000001,PROD_00001,2,100.0,0.0,0.0,100.0,200.0,50.0,100.0,100.0").unwrap();
        writeln!(f, "SALE_000001_2,ORD_000001,PROD_00002,1,20.0,0.1,2.0,18.0,18.0,10.0,10.0,8.0").unwrap();
        writeln!(f, "SALE_000002_1,ORD_000002,PROD_00001,1,100.0,0.0,0.0,100.0,100.0,50.0,50.0,50.0").unwrap();
        // Orphaned: references an order that does not exist
        writeln!(f, "SALE_000099_1,ORD_999999,PROD_00001,1,100.0,0.0,0.0,100.0,100.0,50.0,50.0,50.0").unwrap();
        // Degenerate: zero total_amount, so profit_margin is undefined
        writeln!(f, "SALE_000002_2,ORD_000002,PROD_00002,1,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0").unwrap();

        dir
    }

    #[test]
    fn test_load_and_clean() {
        let dir = create_fixture_dir();
        let tables = load_sales_tables(dir.path()).unwrap();

        assert_eq!(tables.customers.height(), 2);
        assert_eq!(tables.products.height(), 2);
        assert_eq!(tables.orders.height(), 2);
        assert_eq!(tables.sales.height(), 5);

        let tables = clean_sales_tables(tables).unwrap();
        assert_eq!(
            tables.orders.column("order_date").unwrap().dtype(),
            &DataType::Date
        );
        assert_eq!(
            tables.customers.column("registration_date").unwrap().dtype(),
            &DataType::Date
        );
    }

    #[test]
    fn test_missing_file_error_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_sales_tables(dir.path()).unwrap_err();
        assert!(err.to_string().contains("customers.csv"));
    }

    #[test]
    fn test_comprehensive_preserves_sale_rows() {
        let dir = create_fixture_dir();
        let tables = clean_sales_tables(load_sales_tables(dir.path()).unwrap()).unwrap();
        let df = comprehensive_dataset(&tables).unwrap();

        // Left joins never drop or duplicate sale rows
        assert_eq!(df.height(), tables.sales.height());

        for name in [
            "customer_segment",
            "category",
            "order_status",
            "profit_margin",
            "year",
            "quarter",
            "day_of_week",
            "month_name",
            "delivery_days",
        ] {
            assert!(df.column(name).is_ok(), "missing column {name}");
        }
    }

    #[test]
    fn test_orphaned_sale_gets_null_joined_fields() {
        let dir = create_fixture_dir();
        let tables = clean_sales_tables(load_sales_tables(dir.path()).unwrap()).unwrap();
        let df = comprehensive_dataset(&tables).unwrap();

        let idx = df
            .column("sale_id")
            .unwrap()
            .utf8()
            .unwrap()
            .into_iter()
            .position(|v| v == Some("SALE_000099_1"))
            .unwrap();

        assert!(df.column("order_date").unwrap().get(idx).unwrap() == AnyValue::Null);
        assert!(df.column("delivery_days").unwrap().get(idx).unwrap() == AnyValue::Null);
        // The sale's own fields survive the failed join
        let amount = df.column("total_amount").unwrap().f64().unwrap().get(idx);
        assert_eq!(amount, Some(100.0));
    }

    #[test]
    fn test_profit_margin_null_on_zero_total() {
        let dir = create_fixture_dir();
        let tables = clean_sales_tables(load_sales_tables(dir.path()).unwrap()).unwrap();
        let df = comprehensive_dataset(&tables).unwrap();

        let sale_ids = df.column("sale_id").unwrap().utf8().unwrap();
        let margins = df.column("profit_margin").unwrap().f64().unwrap();

        for (id, margin) in sale_ids.into_iter().zip(margins.into_iter()) {
            match id {
                Some("SALE_000002_2") => assert!(margin.is_none()),
                _ => {
                    if let Some(m) = margin {
                        assert!(m.is_finite());
                    }
                }
            }
        }
    }

    #[test]
    fn test_derived_calendar_fields() {
        let dir = create_fixture_dir();
        let tables = clean_sales_tables(load_sales_tables(dir.path()).unwrap()).unwrap();
        let df = comprehensive_dataset(&tables).unwrap();

        let idx = df
            .column("sale_id")
            .unwrap()
            .utf8()
            .unwrap()
            .into_iter()
            .position(|v| v == Some("SALE_000001_1"))
            .unwrap();

        // ORD_000001: ordered 2024-01-10 (a Wednesday), delivered 2024-01-15
        assert_eq!(df.column("year").unwrap().i32().unwrap().get(idx), Some(2024));
        assert_eq!(df.column("month").unwrap().u32().unwrap().get(idx), Some(1));
        assert_eq!(df.column("quarter").unwrap().u32().unwrap().get(idx), Some(1));
        assert_eq!(
            df.column("day_of_week").unwrap().utf8().unwrap().get(idx),
            Some("Wednesday")
        );
        assert_eq!(
            df.column("month_name").unwrap().utf8().unwrap().get(idx),
            Some("January")
        );
        assert_eq!(
            df.column("delivery_days").unwrap().i32().unwrap().get(idx),
            Some(5)
        );
    }
}
