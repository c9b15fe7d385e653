pub mod cookies;
pub mod extractors;
pub mod jwt;
pub mod validation;
