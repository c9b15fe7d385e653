use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::{
    error::{AppError, Result},
    models::{ProductResponse, ShippingAddress},
};

pub const PAYMENT_METHOD: &str = "Demo Payment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Customers may only cancel orders that have not shipped yet.
    pub fn cancel_by_customer(self) -> Result<OrderStatus> {
        match self {
            OrderStatus::Pending | OrderStatus::Processing => Ok(OrderStatus::Cancelled),
            other => Err(AppError::BadRequest(format!(
                "Cannot cancel order with status: {}",
                other
            ))),
        }
    }

    /// Back-office transition. Delivered is terminal; anything else may move
    /// to any status, backwards included.
    pub fn transition_to(self, target: OrderStatus) -> Result<OrderStatus> {
        if self == OrderStatus::Delivered {
            return Err(AppError::BadRequest(
                "Cannot change status of delivered order".to_string(),
            ));
        }
        Ok(target)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: i32,
    /// `None` once the customer account has been deleted.
    pub user_id: Option<i32>,
    pub total_price: Decimal,
    pub shipping_address: Json<ShippingAddress>,
    pub payment_method: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub size: Option<String>,
    pub quantity: i32,
}

/// A cart row joined with the product's current price.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    pub product_id: i32,
    pub size: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
}

pub fn order_total(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum()
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub address_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub product_id: Option<i32>,
    pub size: Option<String>,
    pub quantity: i32,
    pub product: Option<ProductResponse>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i32, price: Decimal, quantity: i32) -> CartLine {
        CartLine {
            product_id,
            size: Some("9".into()),
            quantity,
            price,
        }
    }

    #[test]
    fn test_order_total_uses_price_times_quantity() {
        let lines = vec![
            line(1, Decimal::new(4999, 2), 2),
            line(2, Decimal::new(1250, 2), 1),
        ];
        assert_eq!(order_total(&lines), Decimal::new(11248, 2));
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_customer_cancellation_guard() {
        assert_eq!(
            OrderStatus::Pending.cancel_by_customer().unwrap(),
            OrderStatus::Cancelled
        );
        assert_eq!(
            OrderStatus::Processing.cancel_by_customer().unwrap(),
            OrderStatus::Cancelled
        );

        for blocked in [OrderStatus::Shipped, OrderStatus::Delivered, OrderStatus::Cancelled] {
            match blocked.cancel_by_customer() {
                Err(AppError::BadRequest(msg)) => {
                    assert_eq!(msg, format!("Cannot cancel order with status: {}", blocked))
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_delivered_is_terminal() {
        for target in OrderStatus::ALL {
            assert!(OrderStatus::Delivered.transition_to(target).is_err());
        }
    }

    #[test]
    fn test_other_transitions_are_permitted() {
        assert_eq!(
            OrderStatus::Shipped.transition_to(OrderStatus::Pending).unwrap(),
            OrderStatus::Pending
        );
        assert_eq!(
            OrderStatus::Cancelled.transition_to(OrderStatus::Processing).unwrap(),
            OrderStatus::Processing
        );
        assert_eq!(
            OrderStatus::Processing.transition_to(OrderStatus::Delivered).unwrap(),
            OrderStatus::Delivered
        );
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(OrderStatus::parse("Shipped"), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::parse("shipped"), None);
        assert_eq!(OrderStatus::parse("All"), None);
    }
}
