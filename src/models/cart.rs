use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::{ProductResponse, SizeStock},
};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub size: Option<String>,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: i32,
    pub size: Option<String>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    pub id: i32,
    pub product_id: i32,
    pub size: Option<String>,
    pub quantity: i32,
    pub product: ProductResponse,
}

impl CartItemResponse {
    pub fn new(item: CartItem, product: ProductResponse) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            size: item.size,
            quantity: item.quantity,
            product,
        }
    }
}

pub const MAX_LINE_QUANTITY: i32 = 100;

pub fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(AppError::BadRequest(format!(
            "Quantity cannot exceed {}",
            MAX_LINE_QUANTITY
        )));
    }
    Ok(())
}

/// Adding to an existing row must keep it within the per-row cap.
pub fn ensure_line_quantity(in_cart: i32, requested: i32) -> Result<()> {
    if i64::from(in_cart) + i64::from(requested) > i64::from(MAX_LINE_QUANTITY) {
        return Err(AppError::BadRequest(format!(
            "Cart cannot hold more than {} of this item",
            MAX_LINE_QUANTITY
        )));
    }
    Ok(())
}

/// Checks that `requested` more units of `size` fit into the stock left after
/// what the cart already holds for the same product and size.
pub fn ensure_size_stock(
    sizes: &[SizeStock],
    size: &str,
    in_cart: i32,
    requested: i32,
) -> Result<()> {
    let option = sizes
        .iter()
        .find(|s| s.size == size)
        .ok_or_else(|| {
            AppError::BadRequest(format!("Size {} not available for this product", size))
        })?;

    if i64::from(option.stock) < i64::from(in_cart) + i64::from(requested) {
        return Err(AppError::BadRequest(format!(
            "Only {} items available for size {}",
            option.stock, size
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes() -> Vec<SizeStock> {
        vec![
            SizeStock { size: "8".into(), stock: 2 },
            SizeStock { size: "9".into(), stock: 0 },
        ]
    }

    #[test]
    fn test_stock_is_checked_cumulatively() {
        // stock 2: asking for 3 fails, 2 fits, then one more on top fails
        assert!(ensure_size_stock(&sizes(), "8", 0, 3).is_err());
        assert!(ensure_size_stock(&sizes(), "8", 0, 2).is_ok());
        match ensure_size_stock(&sizes(), "8", 2, 1) {
            Err(AppError::BadRequest(msg)) => {
                assert_eq!(msg, "Only 2 items available for size 8")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_size_is_rejected() {
        match ensure_size_stock(&sizes(), "12", 0, 1) {
            Err(AppError::BadRequest(msg)) => {
                assert_eq!(msg, "Size 12 not available for this product")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_out_of_stock_size() {
        assert!(ensure_size_stock(&sizes(), "9", 0, 1).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-4).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
        assert!(validate_quantity(i32::MAX).is_err());
    }

    #[test]
    fn test_repeated_adds_are_capped() {
        assert!(ensure_line_quantity(0, MAX_LINE_QUANTITY).is_ok());
        assert!(ensure_line_quantity(99, 1).is_ok());
        match ensure_line_quantity(MAX_LINE_QUANTITY, 1) {
            Err(AppError::BadRequest(msg)) => {
                assert_eq!(msg, "Cart cannot hold more than 100 of this item")
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(ensure_line_quantity(i32::MAX, i32::MAX).is_err());
    }
}
