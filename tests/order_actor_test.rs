use cafe_pos::clients::{IngredientClient, MenuClient};
use cafe_pos::framework::mock::MockClient;
use cafe_pos::framework::ActorClient;
use cafe_pos::model::{
    Ingredient, IngredientId, LineRequest, MenuItem, MenuItemId, OrderCreate, OrderStatus,
    RecipeLine, TableId,
};
use cafe_pos::order_actor::{OrderContext, OrderError};
use cafe_pos::stock::{StockError, StockLedger};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

fn cappuccino() -> MenuItem {
    MenuItem {
        id: MenuItemId(1),
        name: "Cappuccino".to_string(),
        category: "Coffee".to_string(),
        price: Decimal::from(45_000),
        available: true,
        recipe: vec![RecipeLine::new(IngredientId(2), Decimal::new(1, 1))],
    }
}

fn milk(quantity: Decimal) -> Ingredient {
    Ingredient {
        id: IngredientId(2),
        name: "Milk".to_string(),
        unit: "L".to_string(),
        quantity,
        minimum_threshold: Decimal::ZERO,
        expiration_date: None,
        updated_at: Utc::now(),
    }
}

fn two_cappuccinos() -> OrderCreate {
    OrderCreate {
        table_id: TableId(1),
        customer_name: Some("Minh".to_string()),
        lines: vec![LineRequest::new(MenuItemId(1), 2)],
    }
}

/// Real Order actor, mocked menu and ingredient stores.
///
/// `Order::on_create` reads the menu item once to price the line and once more when
/// the stock ledger resolves its recipe, then fetches the ingredients in one `find`.
#[tokio::test]
async fn test_order_actor_prices_lines_and_checks_stock() {
    let mut menu_mock = MockClient::<MenuItem>::new();
    let mut ingredient_mock = MockClient::<Ingredient>::new();

    menu_mock.expect_get(MenuItemId(1)).return_ok(Some(cappuccino()));
    menu_mock.expect_get(MenuItemId(1)).return_ok(Some(cappuccino()));
    ingredient_mock.expect_find().return_ok(vec![milk(Decimal::from(5))]);

    let menu = MenuClient::new(menu_mock.client());
    let stock = StockLedger::new(
        IngredientClient::new(ingredient_mock.client()),
        Arc::new(menu.clone()),
    );

    let (order_actor, order_client) = cafe_pos::order_actor::new(8);
    let actor_handle = tokio::spawn(order_actor.run(OrderContext::new(menu, stock)));

    let id = order_client.create_order(two_cappuccinos()).await.unwrap();
    let order = order_client.get(id).await.unwrap().unwrap();

    assert_eq!(order.status, OrderStatus::New);
    assert_eq!(order.lines[0].name, "Cappuccino");
    assert_eq!(order.lines[0].unit_price, Decimal::from(45_000));
    assert_eq!(order.total, Decimal::from(90_000));
    assert!(order.deducted.is_none());

    menu_mock.verify();
    ingredient_mock.verify();

    drop(order_client);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_order_actor_refuses_order_stock_cannot_cover() {
    let mut menu_mock = MockClient::<MenuItem>::new();
    let mut ingredient_mock = MockClient::<Ingredient>::new();

    menu_mock.expect_get(MenuItemId(1)).return_ok(Some(cappuccino()));
    menu_mock.expect_get(MenuItemId(1)).return_ok(Some(cappuccino()));
    ingredient_mock
        .expect_find()
        .return_ok(vec![milk(Decimal::new(15, 2))]);

    let menu = MenuClient::new(menu_mock.client());
    let stock = StockLedger::new(
        IngredientClient::new(ingredient_mock.client()),
        Arc::new(menu.clone()),
    );

    let (order_actor, order_client) = cafe_pos::order_actor::new(8);
    let actor_handle = tokio::spawn(order_actor.run(OrderContext::new(menu, stock)));

    let result = order_client.create_order(two_cappuccinos()).await;
    let Err(OrderError::Stock(StockError::InsufficientStock(shortages))) = result else {
        panic!("expected a shortage, got {result:?}");
    };
    assert_eq!(shortages[0].required, Decimal::new(2, 1));
    assert_eq!(shortages[0].available, Decimal::new(15, 2));
    assert!(order_client.pending_orders().await.unwrap().is_empty());

    menu_mock.verify();
    ingredient_mock.verify();

    drop(order_client);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_unknown_menu_item_is_not_found() {
    let mut menu_mock = MockClient::<MenuItem>::new();
    let ingredient_mock = MockClient::<Ingredient>::new();
    menu_mock.expect_get(MenuItemId(1)).return_ok(None);

    let menu = MenuClient::new(menu_mock.client());
    let stock = StockLedger::new(
        IngredientClient::new(ingredient_mock.client()),
        Arc::new(menu.clone()),
    );

    let (order_actor, order_client) = cafe_pos::order_actor::new(8);
    let actor_handle = tokio::spawn(order_actor.run(OrderContext::new(menu, stock)));

    let result = order_client.create_order(two_cappuccinos()).await;
    assert!(matches!(result, Err(OrderError::Menu(cafe_pos::menu_actor::MenuError::NotFound(_)))));
    menu_mock.verify();

    drop(order_client);
    actor_handle.await.unwrap();
}
