use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Product, ProductId};

/// Fixed per-order platform fee, in whole currency units.
pub const PLATFORM_FEE: i64 = 20;

/// What the visitor last talked about. Carried into AI-fallback prompts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    ProductInfo,
    Order,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductInfo => "product-info",
            Self::Order => "order",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMemory {
    pub last_intent: Option<Intent>,
    pub last_product: Option<String>,
}

/// A reserved product waiting for checkout details. Its presence is the
/// awaiting-details state; a visitor holds at most one at a time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub product: Product,
    pub quantity: u32,
}

/// Finalized purchase record. Appended to the session order history and
/// never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub billing: String,
    pub quantity: u32,
    pub unit_price: i64,
    pub subtotal: i64,
    pub platform_fee: i64,
    pub total: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Builds the immutable order record from a completed pending order.
    /// `total = subtotal + PLATFORM_FEE` by construction.
    pub fn finalize(pending: &PendingOrder, customer_name: String, customer_email: String) -> Self {
        let subtotal = pending.product.price * i64::from(pending.quantity);
        Self {
            order_id: mint_order_id(Utc::now()),
            product_id: pending.product.id.clone(),
            product_name: pending.product.name.clone(),
            billing: pending.product.billing.clone(),
            quantity: pending.quantity,
            unit_price: pending.product.price,
            subtotal,
            platform_fee: PLATFORM_FEE,
            total: subtotal + PLATFORM_FEE,
            customer_name,
            customer_email,
            created_at: Utc::now(),
        }
    }
}

/// Date-stamped id with a random 8-character suffix, unique per process
/// with high probability.
fn mint_order_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("ORD-{}-{}", now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{mint_order_id, Order, PendingOrder, PLATFORM_FEE};
    use crate::catalog::ProductCatalog;

    fn pending_fixture(quantity: u32) -> PendingOrder {
        let product = ProductCatalog::default()
            .match_product("netflix")
            .expect("catalog fixture should contain netflix")
            .clone();
        PendingOrder { product, quantity }
    }

    #[test]
    fn finalize_computes_subtotal_fee_and_total() {
        let order = Order::finalize(
            &pending_fixture(2),
            "Juan Dela Cruz".to_string(),
            "juan@email.com".to_string(),
        );

        assert_eq!(order.unit_price, 499);
        assert_eq!(order.subtotal, 998);
        assert_eq!(order.platform_fee, PLATFORM_FEE);
        assert_eq!(order.total, 1018);
        assert_eq!(order.quantity, 2);
    }

    #[test]
    fn order_ids_carry_date_prefix_and_distinct_suffixes() {
        let now = Utc::now();
        let first = mint_order_id(now);
        let second = mint_order_id(now);

        let expected_prefix = format!("ORD-{}-", now.format("%Y%m%d"));
        assert!(first.starts_with(&expected_prefix));
        assert_eq!(first.len(), expected_prefix.len() + 8);
        assert_ne!(first, second);
    }
}
