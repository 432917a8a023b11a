use crate::clients::{
    CustomerClient, IngredientClient, MenuClient, OrderClient, PaymentClient, TableClient,
};
use crate::config::{ConfigError, PosConfig};
use crate::coordinator::{RetryPolicy, TransactionCoordinator};
use crate::error::PosError;
use crate::loyalty::LoyaltyLedger;
use crate::order_actor::OrderContext;
use crate::stock::StockLedger;
use std::sync::Arc;
use tracing::{error, info};

/// The running point-of-sale system.
///
/// `PosSystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping every store actor
/// - **Dependency Wiring**: the order actor needs the menu and the stock ledger, the
///   customer actor needs the tier thresholds
/// - **Service Assembly**: the stock and loyalty ledgers and the transaction coordinator
///
/// # Example
///
/// ```ignore
/// let system = PosSystem::new();
///
/// let table = system.tables.create_table(table_data).await?;
/// let order = system.coordinator.create_order(order_data).await?;
/// let payment = system.coordinator.pay_cash(PaymentRequest::new(order.id)).await?;
///
/// system.shutdown().await?;
/// ```
pub struct PosSystem {
    pub ingredients: IngredientClient,
    pub menu: MenuClient,
    pub orders: OrderClient,
    pub payments: PaymentClient,
    pub customers: CustomerClient,
    pub tables: TableClient,

    pub stock: StockLedger,
    pub loyalty: LoyaltyLedger,
    /// Entry point for every operation that spans several stores.
    pub coordinator: TransactionCoordinator,

    pub config: PosConfig,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Default for PosSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl PosSystem {
    /// Starts the system with default configuration.
    pub fn new() -> Self {
        Self::with_config(PosConfig::default())
    }

    /// Starts the system configured from `POS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::with_config(PosConfig::from_env()?))
    }

    pub fn with_config(config: PosConfig) -> Self {
        let buffer = config.actor_buffer;

        // 1. Create actors (no dependencies)
        let (ingredient_actor, ingredients) = crate::ingredient_actor::new(buffer);
        let (menu_actor, menu) = crate::menu_actor::new(buffer);
        let (order_actor, orders) = crate::order_actor::new(buffer);
        let (payment_actor, payments) = crate::payment_actor::new(buffer);
        let (customer_actor, customers) = crate::customer_actor::new(buffer);
        let (table_actor, tables) = crate::table_actor::new(buffer);

        // 2. Services built on the clients
        let stock = StockLedger::new(ingredients.clone(), Arc::new(menu.clone()));
        let loyalty = LoyaltyLedger::new(customers.clone(), config.loyalty);

        // 3. Start actors with injected context
        let handles = vec![
            tokio::spawn(ingredient_actor.run(())),
            tokio::spawn(menu_actor.run(())),
            tokio::spawn(order_actor.run(OrderContext::new(menu.clone(), stock.clone()))),
            tokio::spawn(payment_actor.run(())),
            tokio::spawn(customer_actor.run(config.tiers)),
            tokio::spawn(table_actor.run(())),
        ];

        let coordinator = TransactionCoordinator::new(
            orders.clone(),
            payments.clone(),
            tables.clone(),
            stock.clone(),
            loyalty.clone(),
            RetryPolicy {
                attempts: config.commit_attempts,
                backoff: config.retry_backoff,
            },
        );

        info!(buffer, "Point-of-sale system started");
        Self {
            ingredients,
            menu,
            orders,
            payments,
            customers,
            tables,
            stock,
            loyalty,
            coordinator,
            config,
            handles,
        }
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Dropping the clients closes the actors' channels. The order actor holds menu and
    /// ingredient clients in its context, so those two actors stop only after it has.
    /// Clones of any client kept outside the system keep their actor alive.
    pub async fn shutdown(self) -> Result<(), PosError> {
        info!("Shutting down system...");

        drop(self.coordinator);
        drop(self.stock);
        drop(self.loyalty);
        drop(self.ingredients);
        drop(self.menu);
        drop(self.orders);
        drop(self.payments);
        drop(self.customers);
        drop(self.tables);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(PosError::Unavailable(format!("actor task failed: {e}")));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
