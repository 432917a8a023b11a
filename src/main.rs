//! Demo: one table, one Cappuccino order, paid in cash.

use cafe_pos::coordinator::PaymentRequest;
use cafe_pos::lifecycle::tracing::setup_tracing;
use cafe_pos::lifecycle::PosSystem;
use cafe_pos::model::{
    CustomerCreate, IngredientCreate, LineRequest, MenuItemCreate, OrderCreate, RecipeLine,
    TableCreate,
};
use rust_decimal::Decimal;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let system = PosSystem::from_env()?;
    info!("Starting café POS demo");

    let span = tracing::info_span!("setup");
    let (table, cappuccino, customer) = async {
        let beans = system
            .ingredients
            .create_ingredient(IngredientCreate {
                name: "Coffee beans".to_string(),
                unit: "kg".to_string(),
                quantity: Decimal::from(10),
                minimum_threshold: Decimal::from(1),
                expiration_date: None,
            })
            .await?;
        let milk = system
            .ingredients
            .create_ingredient(IngredientCreate {
                name: "Milk".to_string(),
                unit: "L".to_string(),
                quantity: Decimal::from(5),
                minimum_threshold: Decimal::from(1),
                expiration_date: None,
            })
            .await?;
        let cappuccino = system
            .menu
            .create_menu_item(MenuItemCreate {
                name: "Cappuccino".to_string(),
                category: "Coffee".to_string(),
                price: Decimal::from(45_000),
                available: true,
                recipe: vec![
                    RecipeLine::new(beans, Decimal::new(2, 2)),
                    RecipeLine::new(milk, Decimal::new(1, 1)),
                ],
            })
            .await?;
        let table = system
            .tables
            .create_table(TableCreate {
                name: "T1".to_string(),
                area: "Terrace".to_string(),
            })
            .await?;
        let customer = system
            .loyalty
            .register_customer(CustomerCreate {
                name: "Linh".to_string(),
                phone: "0901234567".to_string(),
                email: None,
            })
            .await?;
        Ok::<_, Box<dyn std::error::Error>>((table, cappuccino, customer))
    }
    .instrument(span)
    .await?;

    let order = system
        .coordinator
        .create_order(OrderCreate {
            table_id: table.clone(),
            customer_name: Some("Linh".to_string()),
            lines: vec![LineRequest::new(cappuccino, 2)],
        })
        .await?;
    info!(order = %order.id, total = %order.total, "Order placed");

    let span = tracing::info_span!("payment");
    let payment = system
        .coordinator
        .pay_cash(PaymentRequest::new(order.id.clone()).customer(customer.clone()))
        .instrument(span)
        .await;

    match payment {
        Ok(payment) => info!(
            payment = %payment.id,
            amount = %payment.amount,
            points_earned = payment.points_earned,
            "Payment completed"
        ),
        Err(e) => error!(error = %e, "Payment failed"),
    }

    for ingredient in system.stock.low_stock().await? {
        info!(ingredient = %ingredient.name, quantity = %ingredient.quantity, "Low stock");
    }
    let customer = system.loyalty.require_customer(customer).await?;
    info!(points = customer.points, tier = %customer.tier, "Customer balance");

    system.shutdown().await?;
    info!("Demo completed");
    Ok(())
}
