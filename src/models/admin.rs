use std::collections::HashSet;

use rust_decimal::{Decimal, dec};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::{Order, OrderItemResponse, OrderResponse, SizeStock, User},
};

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_products: i64,
    pub total_orders: i64,
    pub total_sales: Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImagesRequest {
    pub primary: Option<String>,
    pub thumbnail: Option<String>,
    pub gallery: Option<Vec<String>>,
}

/// Body of the admin product create and update endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub images: Option<ImagesRequest>,
    pub sizes: Option<Vec<SizeStock>>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub image_primary: String,
    pub image_thumbnail: String,
    pub image_gallery: Vec<String>,
    pub sizes: Vec<SizeStock>,
    pub category: String,
    pub tags: Vec<String>,
    pub featured: bool,
}

#[derive(Debug, Default, PartialEq)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_primary: Option<String>,
    pub image_thumbnail: Option<String>,
    pub image_gallery: Option<Vec<String>>,
    pub sizes: Option<Vec<SizeStock>>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured: Option<bool>,
}

fn bad_request(msg: &str) -> AppError {
    AppError::BadRequest(msg.to_string())
}

fn check_title(title: &str) -> Result<()> {
    if title.trim().chars().count() < 3 {
        return Err(bad_request("Title must be at least 3 characters"));
    }
    Ok(())
}

fn check_description(description: &str) -> Result<()> {
    if description.trim().chars().count() < 20 {
        return Err(bad_request("Description must be at least 20 characters"));
    }
    Ok(())
}

// Prices are stored as NUMERIC(12, 2).
const MAX_PRICE: Decimal = dec!(9999999999.99);

fn check_price(price: Decimal) -> Result<()> {
    if price <= Decimal::ZERO {
        return Err(bad_request("Price must be a positive number"));
    }
    if price.normalize().scale() > 2 {
        return Err(bad_request("Price can have at most two decimal places"));
    }
    if price > MAX_PRICE {
        return Err(bad_request("Price is too large"));
    }
    Ok(())
}

fn check_sizes(sizes: Vec<SizeStock>) -> Result<Vec<SizeStock>> {
    if sizes.is_empty() {
        return Err(bad_request("At least one size with stock is required"));
    }

    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(sizes.len());
    for entry in sizes {
        let size = entry.size.trim().to_string();
        if size.is_empty() || entry.stock < 0 {
            return Err(bad_request("Invalid size or stock value"));
        }
        if !seen.insert(size.clone()) {
            return Err(AppError::BadRequest(format!("Duplicate size: {}", size)));
        }
        cleaned.push(SizeStock {
            size,
            stock: entry.stock,
        });
    }
    Ok(cleaned)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_gallery(gallery: Vec<String>) -> Vec<String> {
    gallery
        .into_iter()
        .filter_map(|url| non_blank(Some(url)))
        .collect()
}

impl ProductRequest {
    pub fn into_new_product(self) -> Result<NewProduct> {
        let title = self.title.unwrap_or_default();
        check_title(&title)?;

        let description = self.description.unwrap_or_default();
        check_description(&description)?;

        let price = self
            .price
            .ok_or_else(|| bad_request("Price must be a positive number"))?;
        check_price(price)?;

        let sizes = check_sizes(self.sizes.unwrap_or_default())?;

        let images = self.images.unwrap_or_default();
        let primary =
            non_blank(images.primary).ok_or_else(|| bad_request("Primary image is required"))?;
        let thumbnail = non_blank(images.thumbnail).unwrap_or_else(|| primary.clone());

        let category =
            non_blank(self.category).ok_or_else(|| bad_request("Category is required"))?;

        Ok(NewProduct {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            price,
            image_primary: primary,
            image_thumbnail: thumbnail,
            image_gallery: clean_gallery(images.gallery.unwrap_or_default()),
            sizes,
            category,
            tags: self.tags.unwrap_or_default(),
            featured: self.featured.unwrap_or(false),
        })
    }

    /// Partial update. Provided fields are validated with the create rules;
    /// blank image fields and an all-blank gallery leave the stored value.
    pub fn into_changes(self) -> Result<ProductChanges> {
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        if let Some(description) = &self.description {
            check_description(description)?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        let sizes = self.sizes.map(check_sizes).transpose()?;

        let images = self.images.unwrap_or_default();
        let gallery = images
            .gallery
            .map(clean_gallery)
            .filter(|g| !g.is_empty());

        Ok(ProductChanges {
            title: non_blank(self.title),
            description: non_blank(self.description),
            price: self.price,
            image_primary: non_blank(images.primary),
            image_thumbnail: non_blank(images.thumbnail),
            image_gallery: gallery,
            sizes,
            category: non_blank(self.category),
            tags: self.tags,
            featured: self.featured,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<i64>,
}

pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct LowStockProduct {
    pub id: i32,
    pub title: String,
    pub category: String,
    pub total_stock: i64,
}

#[derive(Debug, Deserialize)]
pub struct AdminOrderQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderCustomer {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminOrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Option<OrderCustomer>,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub user: User,
    pub orders: Vec<OrderResponse>,
}

#[derive(Debug, Serialize)]
pub struct UserActionResponse {
    pub message: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> ProductRequest {
        ProductRequest {
            title: Some("Aero Runner".into()),
            description: Some("A lightweight everyday running shoe".into()),
            price: Some(Decimal::new(4999, 2)),
            images: Some(ImagesRequest {
                primary: Some("https://img/p.jpg".into()),
                thumbnail: None,
                gallery: Some(vec!["https://img/g.jpg".into(), "  ".into()]),
            }),
            sizes: Some(vec![
                SizeStock { size: "8".into(), stock: 4 },
                SizeStock { size: "9".into(), stock: 0 },
            ]),
            category: Some("running".into()),
            tags: None,
            featured: None,
        }
    }

    fn rejection(req: ProductRequest) -> String {
        match req.into_new_product() {
            Err(AppError::BadRequest(msg)) => msg,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_new_product_defaults_thumbnail_to_primary() {
        let product = valid_request().into_new_product().unwrap();
        assert_eq!(product.image_thumbnail, "https://img/p.jpg");
        assert_eq!(product.image_gallery, vec!["https://img/g.jpg".to_string()]);
        assert!(!product.featured);
        assert!(product.tags.is_empty());
    }

    #[test]
    fn test_new_product_rules() {
        assert_eq!(
            rejection(ProductRequest { title: Some("ab".into()), ..valid_request() }),
            "Title must be at least 3 characters"
        );
        assert_eq!(
            rejection(ProductRequest { description: Some("too short".into()), ..valid_request() }),
            "Description must be at least 20 characters"
        );
        assert_eq!(
            rejection(ProductRequest { price: Some(Decimal::ZERO), ..valid_request() }),
            "Price must be a positive number"
        );
        assert_eq!(
            rejection(ProductRequest { sizes: Some(vec![]), ..valid_request() }),
            "At least one size with stock is required"
        );
        assert_eq!(
            rejection(ProductRequest { images: None, ..valid_request() }),
            "Primary image is required"
        );
    }

    #[test]
    fn test_price_must_fit_two_decimal_column() {
        let fraction_of_cent = ProductRequest {
            price: Some(Decimal::new(1, 3)),
            ..valid_request()
        };
        assert_eq!(
            rejection(fraction_of_cent),
            "Price can have at most two decimal places"
        );

        let huge = ProductRequest {
            price: Some(Decimal::new(10_000_000_000, 0)),
            ..valid_request()
        };
        assert_eq!(rejection(huge), "Price is too large");

        // trailing zeros are not extra precision
        let padded = ProductRequest {
            price: Some(Decimal::new(49_990, 3)),
            ..valid_request()
        };
        assert!(padded.into_new_product().is_ok());
        assert!(
            ProductRequest {
                price: Some(MAX_PRICE),
                ..valid_request()
            }
            .into_new_product()
            .is_ok()
        );
    }

    #[test]
    fn test_changes_reject_sub_cent_price() {
        let req = ProductRequest {
            price: Some(Decimal::new(12_345, 3)),
            ..Default::default()
        };
        assert!(matches!(req.into_changes(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_sizes_are_checked_individually() {
        let negative = ProductRequest {
            sizes: Some(vec![SizeStock { size: "8".into(), stock: -1 }]),
            ..valid_request()
        };
        assert_eq!(rejection(negative), "Invalid size or stock value");

        let duplicate = ProductRequest {
            sizes: Some(vec![
                SizeStock { size: "8".into(), stock: 1 },
                SizeStock { size: " 8".into(), stock: 2 },
            ]),
            ..valid_request()
        };
        assert_eq!(rejection(duplicate), "Duplicate size: 8");
    }

    #[test]
    fn test_changes_ignore_blank_images() {
        let changes = ProductRequest {
            price: Some(Decimal::new(2500, 2)),
            images: Some(ImagesRequest {
                primary: Some(" ".into()),
                thumbnail: Some("https://img/t.jpg".into()),
                gallery: Some(vec!["".into()]),
            }),
            ..Default::default()
        }
        .into_changes()
        .unwrap();

        assert_eq!(changes.price, Some(Decimal::new(2500, 2)));
        assert_eq!(changes.image_primary, None);
        assert_eq!(changes.image_thumbnail.as_deref(), Some("https://img/t.jpg"));
        assert_eq!(changes.image_gallery, None);
        assert_eq!(changes.sizes, None);
    }

    #[test]
    fn test_changes_validate_provided_fields() {
        let req = ProductRequest {
            description: Some("short".into()),
            ..Default::default()
        };
        assert!(matches!(req.into_changes(), Err(AppError::BadRequest(_))));
    }
}
