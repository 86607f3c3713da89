//! Shop Example
//!
//! This example walks through the generic repository on a small shop
//! domain:
//! - One repository type for every entity, no per-entity query code
//! - Filters with optional criteria, nested paths and sort directives
//! - Paging, counting and guarded bulk deletes
//!
//! Run with `RUST_LOG=debug` to see every executed query.

mod entities;
mod filters;

use anyhow::Result;
use chrono::Utc;
use dao::prelude::*;
use entities::{Category, Order, OrderItem, OrderStatus, Product, User, UserRole};
use filters::{ProductSearch, find_admin_with_user_name};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
default_limit: 10000
bulk_delete: skip
entities:
  - name: user
  - name: category
  - name: product
    default_limit: 100
  - name: order_item
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DaoConfig::from_yaml_str(CONFIG)?;
    let registry = EntityRegistry::new()
        .with::<User>()
        .with::<Category>()
        .with::<Product>()
        .with::<OrderItem>();
    let store = InMemoryStore::new(registry);

    println!("📦 Entities: {:?}", EntityStore::<User>::registry(&store).entity_types());

    let users = Repository::<User, _>::with_config(store.clone(), config.clone())?;
    let categories = Repository::<Category, _>::with_config(store.clone(), config.clone())?;
    let products = Repository::<Product, _>::with_config(store.clone(), config.clone())?;
    let order_items = Repository::<OrderItem, _>::with_config(store.clone(), config.clone())?;

    populate_test_data(&users, &categories, &products).await?;

    // Named query over the generic repository
    let admins = find_admin_with_user_name(&users, "ada@shop.test").await?;
    println!("\n👤 Admins named ada@shop.test: {}", admins.len());
    for admin in &admins {
        println!("    {} <{}>", admin.name, admin.email);
    }

    // Optional criteria: unset fields add no constraint
    let mut search = ProductSearch {
        min_price: Some(15.0),
        ..Default::default()
    };
    search.options.order_by("-price").order_by("name");
    println!("\n🔎 Products from 15.00, most expensive first:");
    for product in products.get(Some(&search)).await? {
        println!("    {:<16} {:>8.2}", product.name, product.price);
    }
    println!("    ({} in total)", products.count(Some(&search)).await?);

    // Dotted path through two relations
    let hardware = ProductSearch {
        department: Some("hardware".to_string()),
        ..Default::default()
    };
    println!("\n🧰 Hardware department:");
    for product in products.get(Some(&hardware)).await? {
        let category = product.category.as_ref().map_or("-", |c| c.name.as_str());
        println!("    {:<16} [{}]", product.name, category);
    }

    // One-off filter with paging
    let cheapest = QueryFilter::new()
        .matching(|cb, root| cb.greater_than(root, "inventory", Some(0)))
        .order_by("price")
        .with_limit(2);
    let page = products.page(Some(&cheapest)).await?;
    println!(
        "\n📄 Cheapest in stock: {} of {} (more: {})",
        page.data.len(),
        page.pagination.total,
        page.pagination.has_next
    );

    // Record an order line, then remove it by value
    if let Some(product) = products.first(Some(&cheapest)).await? {
        let mut line = OrderItem::new(product.price);
        line.product = Some(product);
        let line = order_items.persist(line).await?;
        println!("\n🧾 Order lines: {}", order_items.count(None).await?);
        order_items.delete_entity(&line).await?;
        println!("🧾 Order lines after delete: {}", order_items.count(None).await?);
    }

    // Bulk deletes: a criteria-less delete is refused
    let refused = products.delete_where(None).await?;
    let sold_out = QueryFilter::new().matching(|cb, root| cb.equals(root, "inventory", Some(0)));
    let removed = products.delete_where(Some(&sold_out)).await?;
    println!("\n🗑️  Deleted without criteria: {}, sold out removed: {}", refused, removed);
    println!("📦 Products left: {}", products.count(None).await?);

    // Orders were never registered with the store
    let draft = Order::new(Utc::now(), OrderStatus::Open);
    match Repository::<Order, _>::new(store.clone()) {
        Ok(orders) => {
            orders.persist(draft).await?;
        }
        Err(e) => println!(
            "\n🚫 {:?} order of {} not saved: {} ({})",
            draft.status,
            draft.order_date.format("%Y-%m-%d"),
            e,
            e.error_code()
        ),
    }

    Ok(())
}

/// Populate the store with test data
async fn populate_test_data<S>(
    users: &Repository<User, S>,
    categories: &Repository<Category, S>,
    products: &Repository<Product, S>,
) -> Result<()>
where
    S: EntityStore<User> + EntityStore<Category> + EntityStore<Product>,
{
    for (email, name, role) in [
        ("ada@shop.test", "Ada", UserRole::Admin),
        ("bob@shop.test", "Bob", UserRole::Customer),
        ("ada@shop.test", "Ada (customer account)", UserRole::Customer),
    ] {
        users
            .persist(User::new(
                email.to_string(),
                "$argon2id$placeholder".to_string(),
                "salt".to_string(),
                role,
                name.to_string(),
            ))
            .await?;
    }

    let hardware = categories.persist(Category::new("Hardware".to_string())).await?;
    let mut tools = Category::new("Tools".to_string());
    tools.parent = Some(Box::new(hardware.clone()));
    let tools = categories.persist(tools).await?;
    let garden = categories.persist(Category::new("Garden".to_string())).await?;

    for (name, description, price, inventory, category) in [
        ("Hammer", "Claw hammer, 500 g", 19.90, 12, &tools),
        ("Screwdriver set", "Six pieces", 24.50, 0, &tools),
        ("Nails", "Box of 200", 4.20, 80, &hardware),
        ("Watering can", "Ten litres", 15.00, 5, &garden),
        ("Seeds", "Mixed flowers", 2.99, 0, &garden),
    ] {
        let mut product = Product::new(
            name.to_string(),
            description.to_string(),
            price,
            inventory,
        );
        product.category = Some(category.clone());
        products.persist(product).await?;
    }

    Ok(())
}
