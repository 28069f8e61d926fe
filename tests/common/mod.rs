#![allow(dead_code)]

use chrono::NaiveDate;
use crudfilter::backend::memory::{MemoryExecutor, Record};
use crudfilter::filtering::Value;
use crudfilter::metamodel::{AttributeDef, EntityMeta, EnumType, Metamodel, ValueType};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::prelude::*;

pub mod customer_entity;
pub mod order_entity;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn order_status() -> EnumType {
    EnumType::new("OrderStatus", ["PENDING", "CONFIRMED", "SHIPPED"])
}

/// Attribute table shared by the in-memory and the SQLite fixtures.
pub fn metamodel() -> Metamodel {
    Metamodel::new()
        .with_entity(
            EntityMeta::new("product", "products")
                .scalar("id", ValueType::Long)
                .scalar("name", ValueType::String)
                .scalar("price", ValueType::Decimal)
                .scalar("stock", ValueType::Integer)
                .scalar("active", ValueType::Boolean)
                .scalar("released", ValueType::Date)
                .scalar("description", ValueType::String)
                .attribute(AttributeDef::scalar("sku", ValueType::String).exclude_from_search())
                .attribute(AttributeDef::scalar("costPrice", ValueType::Decimal).hidden()),
        )
        .with_entity(
            EntityMeta::new("customer", "customers")
                .scalar("id", ValueType::Integer)
                .scalar_column("firstName", "first_name", ValueType::String)
                .scalar_column("lastName", "last_name", ValueType::String)
                .scalar("email", ValueType::String),
        )
        .with_entity(
            EntityMeta::new("order", "orders")
                .scalar("id", ValueType::Integer)
                .scalar("status", ValueType::Enum(order_status()))
                .scalar("total", ValueType::Double)
                .scalar_column("placedOn", "placed_on", ValueType::Date)
                .association("customer", "customer", "customer_id"),
        )
}

// ---------------------------------------------------------------------------
// In-memory fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub active: bool,
    pub released: Option<NaiveDate>,
    pub description: Option<String>,
    pub sku: String,
    pub cost_price: Decimal,
}

impl Record for Product {
    fn value(&self, attribute: &str) -> Option<Value> {
        Some(match attribute {
            "id" => self.id.into(),
            "name" => self.name.clone().into(),
            "price" => self.price.into(),
            "stock" => self.stock.into(),
            "active" => self.active.into(),
            "released" => self.released.into(),
            "description" => self.description.clone().into(),
            "sku" => self.sku.clone().into(),
            "costPrice" => self.cost_price.into(),
            _ => return None,
        })
    }
}

fn product(id: i64, name: &str, price: &str, stock: i32) -> Product {
    Product {
        id,
        name: name.to_string(),
        price: price.parse().expect("valid decimal"),
        stock,
        active: true,
        released: Some(date(2024, 1, 1)),
        description: None,
        sku: format!("SKU-{id:03}"),
        cost_price: Decimal::ONE,
    }
}

/// Twelve products; prices around the 10..20 boundary, two laptop-ish names.
pub fn products() -> Vec<Product> {
    let mut items = vec![
        product(1, "Gaming Laptop", "15.00", 42),
        product(2, "laptop stand", "10.00", 7),
        product(3, "Desktop", "20.00", 0),
        product(4, "Mouse", "9.99", 42),
        product(5, "Keyboard", "20.01", 13),
        product(6, "Monitor", "199.00", 3),
        product(7, "USB Cable", "4.50", 120),
        product(8, "Webcam", "49.90", 8),
        product(9, "Headset", "59.00", 11),
        product(10, "Speaker", "35.00", 5),
        product(11, "Microphone", "89.00", 2),
        product(12, "Docking Station", "129.00", 4),
    ];
    items[2].active = false;
    items[2].description = Some("Tower PC".to_string());
    items[3].description = Some("Wireless".to_string());
    items[5].released = None;
    items[6].sku = "DOE-CABLE".to_string();
    items
}

pub fn product_executor() -> MemoryExecutor<Product> {
    products().into_iter().collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

impl Record for Customer {
    fn value(&self, attribute: &str) -> Option<Value> {
        Some(match attribute {
            "id" => self.id.into(),
            "firstName" => self.first_name.clone().into(),
            "lastName" => self.last_name.clone().into(),
            "email" => self.email.clone().into(),
            _ => return None,
        })
    }
}

fn customer(id: i32, first: &str, last: &str, email: Option<&str>) -> Customer {
    Customer {
        id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.map(ToString::to_string),
    }
}

pub fn customers() -> Vec<Customer> {
    vec![
        customer(1, "John", "Doe", Some("john.doe@example.com")),
        customer(2, "Jane", "DOE", None),
        customer(3, "Alice", "Smith", Some("alice_s@example.com")),
        customer(4, "Carol", "Adams", Some("carolxs@example.com")),
        customer(5, "Doris", "Miller", Some("doris@example.com")),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub status: String,
    pub total: f64,
    pub placed_on: NaiveDate,
    pub customer: Option<Customer>,
}

impl Record for Order {
    fn value(&self, attribute: &str) -> Option<Value> {
        Some(match attribute {
            "id" => self.id.into(),
            "status" => Value::Enum(self.status.clone()),
            "total" => self.total.into(),
            "placedOn" => self.placed_on.into(),
            _ => return None,
        })
    }

    fn association(&self, name: &str) -> Option<&dyn Record> {
        match name {
            "customer" => self.customer.as_ref().map(|c| c as &dyn Record),
            _ => None,
        }
    }
}

/// `(id, customer id, status, total, placed on)` shared by both fixtures.
pub const ORDERS: [(i32, Option<i32>, &str, f64, (i32, u32, u32)); 5] = [
    (1, Some(1), "PENDING", 15.0, (2024, 1, 10)),
    (2, Some(2), "CONFIRMED", 10.0, (2024, 2, 1)),
    (3, Some(3), "SHIPPED", 20.0, (2024, 2, 15)),
    (4, Some(1), "PENDING", 9.99, (2024, 3, 1)),
    (5, None, "CONFIRMED", 20.01, (2024, 3, 20)),
];

pub fn orders() -> Vec<Order> {
    let customers = customers();
    ORDERS
        .iter()
        .map(|&(id, customer_id, status, total, (y, m, d))| Order {
            id,
            status: status.to_string(),
            total,
            placed_on: date(y, m, d),
            customer: customer_id.and_then(|cid| customers.iter().find(|c| c.id == cid).cloned()),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// SQLite fixtures
// ---------------------------------------------------------------------------

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub async fn setup_test_db_with_data() -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;

    for c in customers() {
        customer_entity::ActiveModel {
            id: Set(c.id),
            first_name: Set(c.first_name),
            last_name: Set(c.last_name),
            email: Set(c.email),
        }
        .insert(&db)
        .await?;
    }

    for (id, customer_id, status, total, (y, m, d)) in ORDERS {
        order_entity::ActiveModel {
            id: Set(id),
            customer_id: Set(customer_id),
            status: Set(status.to_string()),
            total: Set(total),
            placed_on: Set(date(y, m, d)),
        }
        .insert(&db)
        .await?;
    }

    Ok(db)
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateCustomerTable), Box::new(CreateOrderTable)]
    }
}

pub struct CreateCustomerTable;

impl MigrationName for CreateCustomerTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_customer_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCustomerTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        use customer_entity::{Column, Entity};

        let table = Table::create()
            .table(Entity)
            .if_not_exists()
            .col(ColumnDef::new(Column::Id).integer().not_null().primary_key())
            .col(ColumnDef::new(Column::FirstName).string().not_null())
            .col(ColumnDef::new(Column::LastName).string().not_null())
            .col(ColumnDef::new(Column::Email).string().null())
            .to_owned();

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(customer_entity::Entity).to_owned())
            .await
    }
}

pub struct CreateOrderTable;

impl MigrationName for CreateOrderTable {
    fn name(&self) -> &'static str {
        "m20240101_000002_create_order_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateOrderTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        use order_entity::{Column, Entity};

        let table = Table::create()
            .table(Entity)
            .if_not_exists()
            .col(ColumnDef::new(Column::Id).integer().not_null().primary_key())
            .col(ColumnDef::new(Column::CustomerId).integer().null())
            .col(ColumnDef::new(Column::Status).string().not_null())
            .col(ColumnDef::new(Column::Total).double().not_null())
            .col(ColumnDef::new(Column::PlacedOn).date().not_null())
            .to_owned();

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(order_entity::Entity).to_owned())
            .await
    }
}
