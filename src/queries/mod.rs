pub mod address_queries;
pub mod admin_queries;
pub mod cart_queries;
pub mod order_queries;
pub mod product_queries;
pub mod review_queries;
pub mod user_queries;
pub mod wishlist_queries;
