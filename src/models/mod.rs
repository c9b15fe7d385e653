mod address;
mod admin;
mod cart;
mod order;
mod product;
mod review;
mod user;

pub use address::*;
pub use admin::*;
pub use cart::*;
pub use order::*;
pub use product::*;
pub use review::*;
pub use user::*;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
