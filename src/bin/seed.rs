//! Loads demo data: `seed` imports, `seed -d` wipes every table.

use aerostep_back::{
    config::DatabaseConfig,
    database,
    error::{AppError, Result},
    models::{CreateReviewRequest, NewAddress, NewProduct, NewUser, ShippingAddress, SizeStock},
    queries::{address_queries, product_queries, review_queries, user_queries, wishlist_queries},
};
use rust_decimal::{Decimal, dec};
use sqlx::PgPool;

struct SeedUser {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    phone: &'static str,
    is_admin: bool,
    addresses: &'static [(&'static str, &'static str, &'static str, &'static str, bool)],
}

const USERS: &[SeedUser] = &[
    SeedUser {
        name: "Admin User",
        email: "admin@aerostep.com",
        password: "Admin@123",
        phone: "9876543200",
        is_admin: true,
        addresses: &[("1 Admin Street", "Mumbai", "Maharashtra", "400001", true)],
    },
    SeedUser {
        name: "Test User",
        email: "test@test.com",
        password: "Test@123",
        phone: "9876543210",
        is_admin: false,
        addresses: &[
            ("123 MG Road", "Mumbai", "Maharashtra", "400001", true),
            ("456 Park Street", "Kolkata", "West Bengal", "700016", false),
        ],
    },
    SeedUser {
        name: "Ankit",
        email: "ankit@example.com",
        password: "Ankit@123",
        phone: "9876543211",
        is_admin: false,
        addresses: &[("789 Connaught Place", "Delhi", "Delhi", "110001", true)],
    },
];

struct SeedProduct {
    title: &'static str,
    description: &'static str,
    price: Decimal,
    image: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    featured: bool,
    sizes: &'static [(&'static str, i32)],
}

fn products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            title: "AirFlow Pro Running Shoes - Cream",
            description: "Premium lightweight running shoes with air cushioning, a breathable mesh upper and a responsive midsole.",
            price: dec!(5999),
            image: "/images/products/airflow-cream.jpeg",
            category: "Running",
            tags: &["New Arrival", "Best Seller"],
            featured: true,
            sizes: &[("6", 8), ("7", 12), ("8", 15), ("9", 20), ("10", 10), ("11", 5), ("12", 3)],
        },
        SeedProduct {
            title: "UltraBoost Performance - Gray Blue",
            description: "Lightweight athletic sneakers with responsive boost technology for high-intensity training and daily runs.",
            price: dec!(7999),
            image: "/images/products/ultraboost-gray-blue.jpeg",
            category: "Running",
            tags: &["Best Seller"],
            featured: true,
            sizes: &[("6", 5), ("7", 8), ("8", 12), ("9", 15), ("10", 7), ("11", 4)],
        },
        SeedProduct {
            title: "Velocity Sport Trainer - Gray",
            description: "Versatile cross-training shoe with a stable base and a grippy outsole for gym sessions.",
            price: dec!(4999),
            image: "/images/products/velocity-gray.jpeg",
            category: "Training",
            tags: &["New Arrival"],
            featured: false,
            sizes: &[("5", 10), ("6", 15), ("7", 18), ("8", 12), ("9", 8), ("10", 5)],
        },
        SeedProduct {
            title: "MaxFlex Training Shoe",
            description: "Flexible training shoe with ankle support and a cushioned footbed for long workouts.",
            price: dec!(7499),
            image: "/images/products/maxflex.jpeg",
            category: "Training",
            tags: &["Limited Edition"],
            featured: true,
            sizes: &[("7", 3), ("8", 5), ("9", 2)],
        },
        SeedProduct {
            title: "Premium Sport Elite",
            description: "High-top court shoe with a padded collar and a durable rubber cupsole for basketball.",
            price: dec!(9999),
            image: "/images/products/sport-elite.jpeg",
            category: "Basketball",
            tags: &["Limited Edition"],
            featured: true,
            sizes: &[("7", 5), ("8", 7), ("9", 10), ("10", 8), ("11", 4)],
        },
    ]
}

// (user index, product index, rating, title, comment)
const REVIEWS: &[(usize, usize, i32, &str, &str)] = &[
    (1, 0, 5, "Amazing shoes!", "Super comfortable for my daily runs"),
    (2, 0, 4, "Good quality", "Great cushioning but a bit pricey"),
    (1, 1, 5, "Best sneakers ever", "The boost technology is incredible"),
    (2, 3, 5, "Perfect for training", "Great ankle support and excellent grip"),
];

async fn destroy(pool: &PgPool) -> Result<()> {
    sqlx::query(
        "TRUNCATE order_items, orders, cart_items, reviews, wishlist_items, product_sizes,
         products, user_addresses, users RESTART IDENTITY CASCADE",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn import(pool: &PgPool) -> Result<()> {
    destroy(pool).await?;

    let mut user_ids = Vec::with_capacity(USERS.len());
    for seed in USERS {
        let new_user = NewUser {
            name: seed.name.to_string(),
            email: seed.email.to_string(),
            password: seed.password.to_string(),
            phone: Some(seed.phone.to_string()),
        };
        let hash = bcrypt::hash(seed.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

        let user = user_queries::create_user(pool, &new_user, &hash).await?;
        if seed.is_admin {
            user_queries::toggle_admin(pool, user.id).await?;
        }

        for (street, city, state, zip_code, is_default) in seed.addresses {
            let address = NewAddress {
                address: ShippingAddress {
                    full_name: seed.name.to_string(),
                    phone: seed.phone.to_string(),
                    street: street.to_string(),
                    city: city.to_string(),
                    state: state.to_string(),
                    zip_code: zip_code.to_string(),
                },
                is_default: *is_default,
            };
            address_queries::create_address(pool, user.id, &address).await?;
        }

        user_ids.push(user.id);
    }
    tracing::info!(count = user_ids.len(), "users imported");

    let mut product_ids = Vec::new();
    for seed in products() {
        let new_product = NewProduct {
            title: seed.title.to_string(),
            description: seed.description.to_string(),
            price: seed.price,
            image_primary: seed.image.to_string(),
            image_thumbnail: seed.image.to_string(),
            image_gallery: vec![seed.image.to_string()],
            sizes: seed
                .sizes
                .iter()
                .map(|(size, stock)| SizeStock {
                    size: size.to_string(),
                    stock: *stock,
                })
                .collect(),
            category: seed.category.to_string(),
            tags: seed.tags.iter().map(|t| t.to_string()).collect(),
            featured: seed.featured,
        };
        let product = product_queries::create_product(pool, &new_product).await?;
        product_ids.push(product.id);
    }
    tracing::info!(count = product_ids.len(), "products imported");

    // create_review recomputes the product aggregates as it goes
    for (user, product, rating, title, comment) in REVIEWS {
        let request = CreateReviewRequest {
            product_id: product_ids[*product],
            rating: *rating,
            title: title.to_string(),
            comment: comment.to_string(),
        };
        review_queries::create_review(pool, user_ids[*user], &request).await?;
    }
    tracing::info!(count = REVIEWS.len(), "reviews imported");

    for product_id in product_ids.iter().take(3) {
        wishlist_queries::add_to_wishlist(pool, user_ids[1], *product_id).await?;
    }

    tracing::info!("demo data imported; admin login is admin@aerostep.com / Admin@123");
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt().with_target(false).init();

    let url = match std::env::var("DB_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::error!("DB_URL not set");
            std::process::exit(1);
        }
    };

    let config = DatabaseConfig {
        url,
        max_connections: 5,
    };

    let pool = match database::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to connect: {}", e);
            std::process::exit(1);
        }
    };

    let result = if std::env::args().nth(1).as_deref() == Some("-d") {
        destroy(&pool).await.map(|_| tracing::info!("all data destroyed"))
    } else {
        import(&pool).await
    };

    if let Err(e) = result {
        tracing::error!("Seeding failed: {}", e);
        std::process::exit(1);
    }
}
