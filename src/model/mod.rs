//! # Domain Model
//!
//! Plain data structures for every store in the system, their type-safe identifiers,
//! and the create/update payloads sent to the actors. Business rules that mutate these
//! types live in the corresponding `*_actor::entity` modules.

/// Declares a `u32`-backed identifier that renders as `<prefix>_<n>`.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

pub mod customer;
pub mod ingredient;
pub mod menu;
pub mod order;
pub mod payment;
pub mod table;

pub use customer::{
    Customer, CustomerCreate, CustomerId, CustomerUpdate, MembershipTier, Redemption,
    TierThresholds,
};
pub use ingredient::{Ingredient, IngredientCreate, IngredientId, IngredientUpdate, StockMovement};
pub use menu::{MenuItem, MenuItemCreate, MenuItemId, MenuItemUpdate, RecipeLine};
pub use order::{LineRequest, Order, OrderCreate, OrderId, OrderLine, OrderStatus, OrderUpdate};
pub use payment::{Payment, PaymentCreate, PaymentId, PaymentMethod, PaymentStatus};
pub use table::{Table, TableCreate, TableId, TableStatus, TableUpdate};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_render_with_prefix() {
        assert_eq!(OrderId(7).to_string(), "order_7");
        assert_eq!(MenuItemId(2).to_string(), "menu_item_2");
        assert_eq!(IngredientId::from(3).to_string(), "ingredient_3");
    }
}
