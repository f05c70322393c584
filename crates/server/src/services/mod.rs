//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Admin login and bootstrap (argon2 password hashes)
//! - `catalog` - Product CRUD, slug assignment, image policy
//! - `inquiries` - Inquiry intake with customer upsert, status changes

pub mod auth;
pub mod catalog;
pub mod error;
pub mod inquiries;

pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogService, ProductInput};
pub use error::ServiceError;
pub use inquiries::{InquiryInput, InquiryService, ProductRef, StatusInput};
