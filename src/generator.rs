//! Synthetic sales dataset generation
//!
//! Produces four related record sets (customers, products, orders, sales)
//! by sampling from fixed categorical distributions and numeric ranges with
//! an explicitly seeded RNG, so the same configuration always yields the
//! same dataset.

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::Path;

/// Customer segment distribution
const SEGMENTS: &[(&str, f64)] = &[("Premium", 0.2), ("Standard", 0.5), ("Basic", 0.3)];

/// Age group distribution
const AGE_GROUPS: &[(&str, f64)] = &[
    ("18-25", 0.15),
    ("26-35", 0.25),
    ("36-45", 0.25),
    ("46-55", 0.2),
    ("55+", 0.15),
];

/// Product categories (sampled uniformly)
const CATEGORIES: &[&str] = &[
    "Electronics",
    "Clothing",
    "Home & Garden",
    "Books",
    "Sports & Outdoors",
    "Health & Beauty",
    "Toys & Games",
    "Automotive",
    "Food & Beverages",
    "Office Supplies",
];

/// Subcategory lists keyed by category; unmapped categories fall back to
/// the category name itself
const SUBCATEGORIES: &[(&str, &[&str])] = &[
    (
        "Electronics",
        &["Smartphones", "Laptops", "Tablets", "Audio", "Gaming"],
    ),
    (
        "Clothing",
        &["Men's Clothing", "Women's Clothing", "Shoes", "Accessories"],
    ),
    (
        "Home & Garden",
        &["Furniture", "Kitchen", "Bedroom", "Garden Tools"],
    ),
    (
        "Books",
        &["Fiction", "Non-Fiction", "Educational", "Children's Books"],
    ),
    (
        "Sports & Outdoors",
        &["Fitness", "Outdoor Gear", "Team Sports", "Water Sports"],
    ),
];

const SHIPPING_DAYS: &[(i64, f64)] = &[(1, 0.1), (2, 0.3), (3, 0.3), (5, 0.2), (7, 0.1)];

const SHIPPING_METHODS: &[(&str, f64)] = &[("Standard", 0.6), ("Express", 0.3), ("Overnight", 0.1)];

const ORDER_STATUSES: &[(&str, f64)] =
    &[("Completed", 0.85), ("Cancelled", 0.1), ("Returned", 0.05)];

const ITEMS_PER_ORDER: &[(usize, f64)] =
    &[(1, 0.4), (2, 0.3), (3, 0.15), (4, 0.1), (5, 0.05)];

const QUANTITIES: &[(i64, f64)] = &[(1, 0.7), (2, 0.2), (3, 0.07), (4, 0.03)];

/// Discount rates applied with probability 0.3 per line item
const DISCOUNT_RATES: &[(f64, f64)] = &[
    (0.05, 0.4),
    (0.10, 0.3),
    (0.15, 0.15),
    (0.20, 0.1),
    (0.25, 0.05),
];

// Name pools standing in for a faker library; plain and obviously synthetic
const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Daniel", "Nancy", "Matthew", "Lisa",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Wilson", "Anderson", "Taylor", "Thomas", "Moore", "Jackson", "Martin", "Lee",
    "Thompson", "White",
];

const CITIES: &[&str] = &[
    "Springfield", "Riverside", "Fairview", "Georgetown", "Clinton", "Salem", "Madison",
    "Arlington", "Ashland", "Dover", "Oxford", "Bristol", "Milton", "Clayton", "Franklin",
];

const STATES: &[&str] = &[
    "California", "Texas", "Florida", "New York", "Illinois", "Ohio", "Georgia", "Michigan",
    "Washington", "Arizona", "Colorado", "Oregon",
];

const COUNTRIES: &[&str] = &[
    "United States", "Canada", "United Kingdom", "Germany", "France", "Australia",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.net", "example.org"];

const PRODUCT_ADJECTIVES: &[&str] = &[
    "Ergonomic", "Rustic", "Sleek", "Durable", "Compact", "Premium", "Practical", "Lightweight",
    "Refined", "Versatile",
];

const PRODUCT_MATERIALS: &[&str] = &[
    "Steel", "Cotton", "Wooden", "Granite", "Leather", "Aluminum", "Ceramic", "Bamboo",
];

const PRODUCT_ITEMS: &[&str] = &[
    "Chair", "Lamp", "Speaker", "Backpack", "Bottle", "Keyboard", "Desk", "Jacket", "Organizer",
    "Headset", "Notebook", "Blender",
];

const SUPPLIER_SUFFIXES: &[&str] = &["Ltd", "LLC", "Inc", "Group", "Industries", "Trading Co"];

/// Configuration for the dataset generator
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of customers to generate
    pub customers: usize,
    /// Number of products to generate
    pub products: usize,
    /// Number of orders to generate (each carries 1-5 sale line items)
    pub orders: usize,
    /// Random seed; the same seed and counts reproduce the dataset exactly
    pub seed: u64,
    /// Last possible order date; registration/launch/order windows are
    /// anchored to this so that output does not depend on the wall clock
    pub end_date: NaiveDate,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            customers: 1000,
            products: 500,
            orders: 5000,
            seed: 42,
            end_date: Utc::now().date_naive(),
        }
    }
}

/// Customer record as written to customers.csv
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub registration_date: NaiveDate,
    pub customer_segment: String,
    pub age_group: String,
}

/// Product record as written to products.csv
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub subcategory: String,
    pub price: f64,
    pub cost: f64,
    pub supplier: String,
    pub launch_date: NaiveDate,
    pub weight_kg: f64,
    pub rating: f64,
}

/// Order record as written to orders.csv
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub order_date: NaiveDate,
    pub shipped_date: NaiveDate,
    pub delivered_date: NaiveDate,
    pub shipping_method: String,
    pub shipping_cost: f64,
    pub order_status: String,
}

/// Sale line item as written to sales.csv
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sale {
    pub sale_id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount_rate: f64,
    pub discount_amount: f64,
    pub final_price: f64,
    pub total_amount: f64,
    pub cost_per_unit: f64,
    pub total_cost: f64,
    pub profit: f64,
}

/// The four generated record sets
#[derive(Debug, Clone, PartialEq)]
pub struct SalesDataset {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub sales: Vec<Sale>,
}

impl SalesDataset {
    /// Write the four tables as CSV files into `dir`, creating it if needed
    pub fn write_csv(&self, dir: &Path) -> crate::Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;

        write_records(&dir.join("customers.csv"), &self.customers)?;
        write_records(&dir.join("products.csv"), &self.products)?;
        write_records(&dir.join("orders.csv"), &self.orders)?;
        write_records(&dir.join("sales.csv"), &self.sales)?;
        Ok(())
    }

    /// Sum of total_amount across all sale line items
    pub fn total_revenue(&self) -> f64 {
        self.sales.iter().map(|s| s.total_amount).sum()
    }

    /// Sum of profit across all sale line items
    pub fn total_profit(&self) -> f64 {
        self.sales.iter().map(|s| s.profit).sum()
    }

    /// Earliest and latest order date, if any orders exist
    pub fn order_date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.orders.iter().map(|o| o.order_date).min()?;
        let last = self.orders.iter().map(|o| o.order_date).max()?;
        Some((first, last))
    }
}

/// Generate a complete dataset from the configuration.
///
/// A single `StdRng` is constructed from the seed and threaded through all
/// generation steps; nothing reseeds it mid-run.
pub fn generate_dataset(config: &GeneratorConfig) -> crate::Result<SalesDataset> {
    if config.customers == 0 || config.products == 0 || config.orders == 0 {
        anyhow::bail!("customer, product, and order counts must all be nonzero");
    }

    let mut rng = StdRng::seed_from_u64(config.seed);

    let customers = generate_customers(config, &mut rng);
    let products = generate_products(config, &mut rng);
    let (orders, sales) = generate_orders_and_sales(config, &customers, &products, &mut rng);

    Ok(SalesDataset {
        customers,
        products,
        orders,
        sales,
    })
}

fn generate_customers(config: &GeneratorConfig, rng: &mut StdRng) -> Vec<Customer> {
    // Registrations fall within the 3 years before the end date
    let window_start = config.end_date - Duration::days(3 * 365);

    (1..=config.customers)
        .map(|i| {
            let first_name = pick(rng, FIRST_NAMES);
            let last_name = pick(rng, LAST_NAMES);
            let email = format!(
                "{}.{}{}@{}",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                i,
                pick(rng, EMAIL_DOMAINS)
            );

            Customer {
                customer_id: format!("CUST_{:05}", i),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email,
                phone: format!(
                    "+1-{:03}-{:03}-{:04}",
                    rng.gen_range(200..1000),
                    rng.gen_range(200..1000),
                    rng.gen_range(0..10000)
                ),
                city: pick(rng, CITIES).to_string(),
                state: pick(rng, STATES).to_string(),
                country: pick(rng, COUNTRIES).to_string(),
                postal_code: format!("{:05}", rng.gen_range(10000..100000)),
                registration_date: date_between(rng, window_start, config.end_date),
                customer_segment: pick_weighted(rng, SEGMENTS).to_string(),
                age_group: pick_weighted(rng, AGE_GROUPS).to_string(),
            }
        })
        .collect()
}

fn generate_products(config: &GeneratorConfig, rng: &mut StdRng) -> Vec<Product> {
    // Launches fall within the 2 years before the end date
    let window_start = config.end_date - Duration::days(2 * 365);

    (1..=config.products)
        .map(|i| {
            let category = pick(rng, CATEGORIES);
            let subcategory = match SUBCATEGORIES.iter().find(|(c, _)| *c == category) {
                Some((_, subs)) => pick(rng, subs),
                None => category,
            };

            // Base price range depends on the category
            let base_price = match category {
                "Electronics" => rng.gen_range(50.0..2000.0),
                "Clothing" => rng.gen_range(20.0..300.0),
                "Books" => rng.gen_range(10.0..50.0),
                _ => rng.gen_range(15.0..500.0),
            };
            let cost = base_price * rng.gen_range(0.4..0.7);

            let product_name = format!(
                "{} {} {}",
                pick(rng, PRODUCT_ADJECTIVES),
                pick(rng, PRODUCT_MATERIALS),
                pick(rng, PRODUCT_ITEMS)
            );
            let supplier = format!("{} {}", pick(rng, LAST_NAMES), pick(rng, SUPPLIER_SUFFIXES));

            Product {
                product_id: format!("PROD_{:05}", i),
                product_name,
                category: category.to_string(),
                subcategory: subcategory.to_string(),
                price: round2(base_price),
                cost: round2(cost),
                supplier,
                launch_date: date_between(rng, window_start, config.end_date),
                weight_kg: round2(rng.gen_range(0.1..10.0)),
                rating: round1(rng.gen_range(3.0..5.0)),
            }
        })
        .collect()
}

fn generate_orders_and_sales(
    config: &GeneratorConfig,
    customers: &[Customer],
    products: &[Product],
    rng: &mut StdRng,
) -> (Vec<Order>, Vec<Sale>) {
    // Orders fall within the 2 years (730 days) before the end date
    let window_start = config.end_date - Duration::days(730);

    let mut orders = Vec::with_capacity(config.orders);
    let mut sales = Vec::new();

    for i in 1..=config.orders {
        let order_id = format!("ORD_{:06}", i);
        let customer = &customers[rng.gen_range(0..customers.len())];

        let order_date = date_between(rng, window_start, config.end_date);
        let shipped_date = order_date + Duration::days(pick_weighted(rng, SHIPPING_DAYS));
        let delivered_date = shipped_date + Duration::days(rng.gen_range(1..8));

        orders.push(Order {
            order_id: order_id.clone(),
            customer_id: customer.customer_id.clone(),
            order_date,
            shipped_date,
            delivered_date,
            shipping_method: pick_weighted(rng, SHIPPING_METHODS).to_string(),
            shipping_cost: round2(rng.gen_range(5.0..25.0)),
            order_status: pick_weighted(rng, ORDER_STATUSES).to_string(),
        });

        let n_items = pick_weighted(rng, ITEMS_PER_ORDER);
        for j in 1..=n_items {
            let product = &products[rng.gen_range(0..products.len())];
            let quantity = pick_weighted(rng, QUANTITIES);

            let discount_rate = if rng.gen_bool(0.3) {
                pick_weighted(rng, DISCOUNT_RATES)
            } else {
                0.0
            };

            // Derived fields are computed from unrounded intermediates and
            // rounded once at record time
            let unit_price = product.price;
            let discount_amount = unit_price * discount_rate;
            let final_price = unit_price - discount_amount;

            sales.push(Sale {
                sale_id: format!("SALE_{:06}_{}", i, j),
                order_id: order_id.clone(),
                product_id: product.product_id.clone(),
                quantity,
                unit_price,
                discount_rate,
                discount_amount: round2(discount_amount),
                final_price: round2(final_price),
                total_amount: round2(final_price * quantity as f64),
                cost_per_unit: product.cost,
                total_cost: round2(product.cost * quantity as f64),
                profit: round2((final_price - product.cost) * quantity as f64),
            });
        }
    }

    (orders, sales)
}

/// Uniform choice from a slice
fn pick<T: Copy>(rng: &mut StdRng, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

/// Weighted choice by cumulative scan over a fixed (value, weight) table
fn pick_weighted<T: Copy>(rng: &mut StdRng, table: &[(T, f64)]) -> T {
    let total: f64 = table.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen::<f64>() * total;
    for (value, weight) in table {
        if roll < *weight {
            return *value;
        }
        roll -= weight;
    }
    // Floating point drift can leave roll marginally above the last bound
    table[table.len() - 1].0
}

/// Uniform date in the inclusive range [start, end]
fn date_between(rng: &mut StdRng, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days().max(0);
    start + Duration::days(rng.gen_range(0..=span))
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn write_records<T: Serialize>(path: &Path, records: &[T]) -> crate::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("failed to write record to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}
