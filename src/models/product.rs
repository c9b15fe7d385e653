use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::ReviewResponse;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub image_primary: String,
    pub image_thumbnail: String,
    pub image_gallery: Vec<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub average_rating: f64,
    pub num_reviews: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductSize {
    pub product_id: i32,
    pub size: String,
    pub stock: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeStock {
    pub size: String,
    pub stock: i32,
}

impl From<ProductSize> for SizeStock {
    fn from(row: ProductSize) -> Self {
        Self {
            size: row.size,
            stock: row.stock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImages {
    pub primary: String,
    pub thumbnail: String,
    pub gallery: Vec<String>,
}

/// Product as returned by the API: images grouped and sizes attached.
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub images: ProductImages,
    pub sizes: Vec<SizeStock>,
    pub category: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub average_rating: f64,
    pub num_reviews: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    pub fn new(product: Product, sizes: Vec<ProductSize>) -> Self {
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            price: product.price,
            images: ProductImages {
                primary: product.image_primary,
                thumbnail: product.image_thumbnail,
                gallery: product.image_gallery,
            },
            sizes: sizes.into_iter().map(SizeStock::from).collect(),
            category: product.category,
            tags: product.tags,
            featured: product.featured,
            average_rating: product.average_rating,
            num_reviews: product.num_reviews,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub reviews: Vec<ReviewResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    PriceAsc,
    PriceDesc,
    Rating,
    Newest,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub featured: Option<bool>,
    pub tag: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: Option<SortBy>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: 1,
            title: "Aero Runner".into(),
            description: "Lightweight running shoe".into(),
            price: Decimal::new(4999, 2),
            image_primary: "p.jpg".into(),
            image_thumbnail: "t.jpg".into(),
            image_gallery: vec!["g1.jpg".into()],
            category: "running".into(),
            tags: vec!["new".into()],
            featured: true,
            average_rating: 0.0,
            num_reviews: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_response_groups_images_and_keeps_size_order() {
        let sizes = vec![
            ProductSize { product_id: 1, size: "8".into(), stock: 3 },
            ProductSize { product_id: 1, size: "9".into(), stock: 4 },
        ];
        let response = ProductResponse::new(product(), sizes);

        assert_eq!(response.images.primary, "p.jpg");
        assert_eq!(response.images.gallery, vec!["g1.jpg".to_string()]);
        assert_eq!(
            response.sizes,
            vec![
                SizeStock { size: "8".into(), stock: 3 },
                SizeStock { size: "9".into(), stock: 4 },
            ]
        );
    }

    #[test]
    fn test_sort_by_accepts_kebab_case() {
        let sort: SortBy = serde_json::from_str("\"price-desc\"").unwrap();
        assert_eq!(sort, SortBy::PriceDesc);
        assert!(serde_json::from_str::<SortBy>("\"cheapest\"").is_err());
    }
}
