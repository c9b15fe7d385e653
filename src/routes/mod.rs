mod admin;
mod cart;
mod health;
mod login;
mod orders;
mod products;
mod register;
mod reviews;
mod user_addresses;
mod users;

use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};

use crate::{
    AppState,
    middleware::{admin_middleware, auth_middleware},
};

pub fn create_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/users/register", post(register::register_user))
        .route("/api/users/login", post(login::login_user))
        .route("/api/users/logout", post(login::logout_user))
        .route("/api/products", get(products::list_products))
        .route("/api/products/search", get(products::search_products))
        .route("/api/products/{id}", get(products::get_product))
        .route("/api/reviews/{id}", get(reviews::get_product_reviews));

    let protected = Router::new()
        .route("/api/users", get(users::get_profile))
        .route("/api/users/profile", put(users::update_profile))
        .route("/api/users/password", put(users::change_password))
        .route("/api/users/wishlist", get(users::get_wishlist))
        .route(
            "/api/users/wishlist/{id}",
            post(users::add_to_wishlist).delete(users::remove_from_wishlist),
        )
        .route(
            "/api/users/addresses",
            get(user_addresses::get_addresses).post(user_addresses::add_address),
        )
        .route(
            "/api/users/addresses/{id}",
            put(user_addresses::update_address).delete(user_addresses::delete_address),
        )
        .route(
            "/api/users/addresses/{id}/default",
            put(user_addresses::set_default_address),
        )
        .route(
            "/api/cart",
            get(cart::get_cart)
                .post(cart::add_to_cart)
                .delete(cart::clear_cart),
        )
        .route(
            "/api/cart/{id}",
            put(cart::update_cart_item).delete(cart::remove_cart_item),
        )
        .route(
            "/api/orders",
            get(orders::get_orders).post(orders::place_order),
        )
        .route("/api/orders/{id}/cancel", patch(orders::cancel_order))
        .route("/api/reviews", post(reviews::create_review))
        .route(
            "/api/reviews/{id}",
            put(reviews::update_review).delete(reviews::delete_review),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin = Router::new()
        .route("/api/products", post(admin::create_product))
        .route("/api/admin/stats", get(admin::get_stats))
        .route("/api/admin/products", post(admin::create_product))
        .route(
            "/api/admin/products/low-stock",
            get(admin::low_stock_products),
        )
        .route(
            "/api/admin/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/api/admin/orders", get(admin::list_orders))
        .route(
            "/api/admin/orders/{id}",
            get(admin::get_order).delete(admin::delete_order),
        )
        .route(
            "/api/admin/orders/{id}/status",
            put(admin::update_order_status),
        )
        .route("/api/admin/users", get(admin::list_users))
        .route(
            "/api/admin/users/{id}",
            get(admin::get_user).delete(admin::delete_user),
        )
        .route("/api/admin/users/{id}/role", put(admin::toggle_user_role))
        .route("/api/admin/users/{id}/ban", put(admin::toggle_user_ban))
        .route_layer(middleware::from_fn_with_state(state, admin_middleware));

    public.merge(protected).merge(admin)
}
