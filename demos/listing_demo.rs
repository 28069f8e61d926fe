//! Lists a small in-memory catalogue with a JSON filter specification.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example listing_demo
//! ```

use crudfilter::backend::memory::{MemoryExecutor, Record};
use crudfilter::filtering::Value;
use crudfilter::{EntityMeta, FilterSpecification, ListingService, Metamodel, ValueType};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
struct Product {
    id: i64,
    name: String,
    price: Decimal,
    active: bool,
}

impl Record for Product {
    fn value(&self, attribute: &str) -> Option<Value> {
        Some(match attribute {
            "id" => self.id.into(),
            "name" => self.name.clone().into(),
            "price" => self.price.into(),
            "active" => self.active.into(),
            _ => return None,
        })
    }
}

fn catalogue() -> Vec<Product> {
    [
        (1, "Gaming Laptop", Decimal::new(1500, 2), true),
        (2, "Laptop Stand", Decimal::new(1000, 2), true),
        (3, "Desktop", Decimal::new(2000, 2), false),
        (4, "Mouse", Decimal::new(999, 2), true),
        (5, "Keyboard", Decimal::new(2001, 2), true),
    ]
    .into_iter()
    .map(|(id, name, price, active)| Product {
        id,
        name: name.to_string(),
        price,
        active,
    })
    .collect()
}

const REQUEST: &str = r#"{
    "filters": [
        {"field": "price", "operator": "BETWEEN", "value": "10", "value2": "20"},
        {"field": "active", "operator": "IS_TRUE"},
        {"field": "colour", "operator": "EQUALS", "value": "red"},
        {"field": "name", "operator": "LIKE", "value": "lap%"}
    ],
    "globalSearch": "laptop",
    "sortBy": "price",
    "sortDirection": "asc"
}"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let metamodel = Metamodel::new().with_entity(
        EntityMeta::new("product", "products")
            .scalar("id", ValueType::Long)
            .scalar("name", ValueType::String)
            .scalar("price", ValueType::Decimal)
            .scalar("active", ValueType::Boolean),
    );
    let executor: MemoryExecutor<Product> = catalogue().into_iter().collect();
    let service = ListingService::new(&metamodel, "product");

    let (spec, mut diagnostics) = FilterSpecification::from_json_with_diagnostics(Some(REQUEST));
    let (page, listing_diagnostics) = service.find_page_with_diagnostics(&spec, &executor).await?;
    diagnostics.extend(listing_diagnostics);

    println!(
        "page {} of {} ({} matching)",
        page.number + 1,
        page.total_pages.max(1),
        page.total_elements
    );
    for product in &page.content {
        println!("  #{} {} {}", product.id, product.name, product.price);
    }
    for diagnostic in &diagnostics {
        println!("ignored: {diagnostic}");
    }
    println!("{}", serde_json::to_string_pretty(&diagnostics)?);

    Ok(())
}
