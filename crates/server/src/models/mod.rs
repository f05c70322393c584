//! Domain models for the catalog and back office.
//!
//! Row types derive `sqlx::FromRow` and serialize with the column names
//! as stored, so API responses use `snake_case` field names.

pub mod admin;
pub mod customer;
pub mod inquiry;
pub mod product;
pub mod session;

pub use admin::Admin;
pub use customer::Customer;
pub use inquiry::{Inquiry, InquiryWithCategory, NewInquiry};
pub use product::{NewProduct, Product, ProductChanges, ProductFilter};
pub use session::{CurrentAdmin, keys as session_keys};
