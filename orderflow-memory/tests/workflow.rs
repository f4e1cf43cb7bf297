//! End-to-end tests running the catalog and order workflow against the
//! in-memory adapters.

use orderflow::{
    CatalogService, CreateOrderRequest, CustomerEmail, CustomerName, Money, NewProduct, OrderLine,
    OrderStatus, OrderWorkflow, ProductCategory, ProductDescription, ProductId, ProductName,
    Quantity, WorkflowError,
};
use orderflow_memory::{InMemoryOrderStore, InMemoryProductStore};

struct Shop {
    catalog: CatalogService<InMemoryProductStore>,
    workflow: OrderWorkflow<InMemoryProductStore, InMemoryOrderStore>,
}

fn shop() -> Shop {
    let products = InMemoryProductStore::new();
    let orders = InMemoryOrderStore::new();
    Shop {
        catalog: CatalogService::new(products.clone()),
        workflow: OrderWorkflow::new(products, orders),
    }
}

fn record(name: &str, category: ProductCategory, stock: u32, cents: u32) -> NewProduct {
    NewProduct::new(
        ProductName::try_new(name).unwrap(),
        ProductDescription::try_new("Fresh from the counter").unwrap(),
        Money::from_cents(cents),
        stock,
        category,
    )
}

fn qty(value: u32) -> Quantity {
    Quantity::try_new(value).unwrap()
}

async fn stock_of(shop: &Shop, id: ProductId) -> u32 {
    shop.catalog.product(id).await.unwrap().unwrap().stock()
}

#[tokio::test]
async fn mixed_basket_order_end_to_end() {
    let shop = shop();
    let coffee = shop
        .catalog
        .create_product(record("Espresso", ProductCategory::Coffee, 0, 350))
        .await
        .unwrap();
    let bagel = shop
        .catalog
        .create_product(record("Plain Bagel", ProductCategory::Bagels, 10, 250))
        .await
        .unwrap();

    let request = CreateOrderRequest::new(vec![
        OrderLine::new(bagel.id(), qty(4)),
        OrderLine::new(coffee.id(), qty(2)),
    ])
    .with_customer_name(CustomerName::try_new("Ada Lovelace").unwrap())
    .with_customer_email(CustomerEmail::try_new("ada@example.com").unwrap());

    let order = shop.workflow.create_order(request).await.unwrap();

    // 4 x $2.50 + 2 x $3.50
    assert_eq!(order.total_amount(), Money::from_cents(1700));
    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(order.items().len(), 2);

    assert_eq!(stock_of(&shop, bagel.id()).await, 6);
    assert_eq!(stock_of(&shop, coffee.id()).await, 0);

    // The persisted order resolves by id and by number.
    let by_number = shop
        .workflow
        .order_by_number(order.order_number())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_number.id(), order.id());
}

#[tokio::test]
async fn selling_out_removes_a_product_from_the_available_listing() {
    let shop = shop();
    let cake = shop
        .catalog
        .create_product(record("Cheesecake", ProductCategory::Cakes, 2, 2400))
        .await
        .unwrap();

    shop.workflow
        .create_order(CreateOrderRequest::new(vec![OrderLine::new(
            cake.id(),
            qty(2),
        )]))
        .await
        .unwrap();

    // Sold out: still in the full listing, gone from the available one.
    assert_eq!(shop.catalog.all_products().await.unwrap().len(), 1);
    assert!(shop.catalog.available_products().await.unwrap().is_empty());

    // A further order is denied on stock grounds.
    let err = shop
        .workflow
        .create_order(CreateOrderRequest::new(vec![OrderLine::new(
            cake.id(),
            qty(1),
        )]))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InsufficientStock { .. }));
}

#[tokio::test]
async fn coffee_never_sells_out() {
    let shop = shop();
    let coffee = shop
        .catalog
        .create_product(record("Espresso", ProductCategory::Coffee, 0, 350))
        .await
        .unwrap();

    for _ in 0..3 {
        shop.workflow
            .create_order(CreateOrderRequest::new(vec![OrderLine::new(
                coffee.id(),
                qty(50),
            )]))
            .await
            .unwrap();
    }

    let available = shop.catalog.available_products().await.unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(stock_of(&shop, coffee.id()).await, 0);
    assert_eq!(shop.workflow.orders().await.unwrap().len(), 3);
}

#[tokio::test]
async fn cancellation_restocks_stock_tracked_lines() {
    let shop = shop();
    let bagel = shop
        .catalog
        .create_product(record("Plain Bagel", ProductCategory::Bagels, 10, 250))
        .await
        .unwrap();
    let coffee = shop
        .catalog
        .create_product(record("Espresso", ProductCategory::Coffee, 5, 350))
        .await
        .unwrap();

    let order = shop
        .workflow
        .create_order(CreateOrderRequest::new(vec![
            OrderLine::new(bagel.id(), qty(3)),
            OrderLine::new(coffee.id(), qty(1)),
        ]))
        .await
        .unwrap();
    assert_eq!(stock_of(&shop, bagel.id()).await, 7);

    let cancelled = shop.workflow.cancel_order(order.id()).await.unwrap();
    assert_eq!(cancelled.status(), OrderStatus::Cancelled);
    assert_eq!(stock_of(&shop, bagel.id()).await, 10);
    // Coffee stock is informational and never moves.
    assert_eq!(stock_of(&shop, coffee.id()).await, 5);

    let cancelled_listing = shop
        .workflow
        .orders_by_status(OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled_listing.len(), 1);
}

#[tokio::test]
async fn completed_orders_cannot_be_cancelled() {
    let shop = shop();
    let bagel = shop
        .catalog
        .create_product(record("Plain Bagel", ProductCategory::Bagels, 10, 250))
        .await
        .unwrap();

    let order = shop
        .workflow
        .create_order(CreateOrderRequest::new(vec![OrderLine::new(
            bagel.id(),
            qty(3),
        )]))
        .await
        .unwrap();

    shop.workflow
        .update_status(order.id(), OrderStatus::Completed)
        .await
        .unwrap();

    let err = shop.workflow.cancel_order(order.id()).await.unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
    // No restock happened.
    assert_eq!(stock_of(&shop, bagel.id()).await, 7);
}

#[tokio::test]
async fn deleted_products_cannot_be_ordered() {
    let shop = shop();
    let cake = shop
        .catalog
        .create_product(record("Cheesecake", ProductCategory::Cakes, 5, 2400))
        .await
        .unwrap();

    shop.catalog.delete_product(cake.id()).await.unwrap();

    let err = shop
        .workflow
        .create_order(CreateOrderRequest::new(vec![OrderLine::new(
            cake.id(),
            qty(1),
        )]))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InactiveProduct { .. }));
}

#[tokio::test]
async fn order_numbers_are_unique_across_a_burst_of_orders() {
    let shop = shop();
    let coffee = shop
        .catalog
        .create_product(record("Espresso", ProductCategory::Coffee, 0, 350))
        .await
        .unwrap();

    let mut numbers = std::collections::HashSet::new();
    for _ in 0..50 {
        let order = shop
            .workflow
            .create_order(CreateOrderRequest::new(vec![OrderLine::new(
                coffee.id(),
                qty(1),
            )]))
            .await
            .unwrap();
        assert!(numbers.insert(order.order_number().clone()));
    }
}

#[tokio::test]
async fn status_updates_and_listings_stay_consistent() {
    let shop = shop();
    let bagel = shop
        .catalog
        .create_product(record("Plain Bagel", ProductCategory::Bagels, 10, 250))
        .await
        .unwrap();

    let first = shop
        .workflow
        .create_order(CreateOrderRequest::new(vec![OrderLine::new(
            bagel.id(),
            qty(1),
        )]))
        .await
        .unwrap();
    let second = shop
        .workflow
        .create_order(CreateOrderRequest::new(vec![OrderLine::new(
            bagel.id(),
            qty(1),
        )]))
        .await
        .unwrap();

    shop.workflow
        .update_status(first.id(), OrderStatus::InProgress)
        .await
        .unwrap();

    let pending = shop
        .workflow
        .orders_by_status(OrderStatus::Pending)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id(), second.id());

    let in_progress = shop
        .workflow
        .orders_by_status(OrderStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(in_progress.len(), 1);

    let window_start = first.created_at() - chrono::Duration::minutes(1);
    let window_end = second.created_at() + chrono::Duration::minutes(1);
    let window = shop
        .workflow
        .orders_by_date_range(window_start, window_end)
        .await
        .unwrap();
    assert_eq!(window.len(), 2);
}
