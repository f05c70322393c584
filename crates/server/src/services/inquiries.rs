//! Inquiry intake and customer bookkeeping.
//!
//! Submitting an inquiry runs two independent statements: the inquiry
//! insert, then the customer upsert. A failure in the second leaves the
//! inquiry in place.

use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;

use velaris_core::{InquiryId, InquiryStatus, ProductId};

use super::ServiceError;
use crate::db::{CustomerRepository, InquiryRepository, ProductRepository};
use crate::models::{Customer, Inquiry, InquiryWithCategory, NewInquiry};

const INQUIRY: &str = "Inquiry";

/// A product reference as submitted by the contact form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Id(i64),
    Text(String),
}

impl ProductRef {
    /// Interpret the reference as a product ID, if it is one.
    #[must_use]
    pub fn id(&self) -> Option<ProductId> {
        match self {
            Self::Id(id) => Some(ProductId::new(*id)),
            Self::Text(raw) => raw.trim().parse::<i64>().ok().map(ProductId::new),
        }
    }
}

/// Contact form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InquiryInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "productId", alias = "product_id")]
    pub product_id: Option<ProductRef>,
}

/// Status change request from the back office.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusInput {
    pub status: Option<String>,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Inquiry and customer service.
pub struct InquiryService<'a> {
    inquiries: InquiryRepository<'a>,
    customers: CustomerRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> InquiryService<'a> {
    /// Create a new inquiry service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            inquiries: InquiryRepository::new(pool),
            customers: CustomerRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Record an inquiry and upsert the matching customer.
    ///
    /// A product reference that resolves snapshots the product's current
    /// name; anything else files the inquiry as general.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if name, email or phone is blank.
    /// Returns `ServiceError::Repository` if either write fails.
    pub async fn submit(&self, input: &InquiryInput) -> Result<Inquiry, ServiceError> {
        let (Some(name), Some(email), Some(phone)) = (
            present(input.name.as_ref()),
            present(input.email.as_ref()),
            present(input.phone.as_ref()),
        ) else {
            return Err(ServiceError::Validation(
                "Name, email, and phone are required".to_owned(),
            ));
        };

        let (product_id, product_name) = match input.product_id.as_ref().and_then(ProductRef::id)
        {
            Some(id) => match self.products.get_name(id).await? {
                Some(product_name) => (Some(id), Some(product_name)),
                None => (None, None),
            },
            None => (None, None),
        };

        let now = Utc::now();
        let inquiry = self
            .inquiries
            .create(
                &NewInquiry {
                    name: name.to_owned(),
                    email: email.to_owned(),
                    phone: phone.to_owned(),
                    message: input
                        .message
                        .as_deref()
                        .filter(|m| !m.trim().is_empty())
                        .map(str::to_owned),
                    product_id,
                    product_name,
                },
                now,
            )
            .await?;

        match self.customers.find_by_contact(email, phone).await? {
            Some(customer_id) => {
                self.customers
                    .touch(customer_id, name, email, phone, now)
                    .await?;
                tracing::debug!(inquiry_id = %inquiry.id, customer_id = %customer_id, "Updated customer");
            }
            None => {
                let customer = self.customers.create(name, email, phone, now).await?;
                tracing::debug!(inquiry_id = %inquiry.id, customer_id = %customer.id, "Created customer");
            }
        }

        tracing::info!(
            inquiry_id = %inquiry.id,
            product_id = ?inquiry.product_id,
            "Inquiry received"
        );
        Ok(inquiry)
    }

    /// All inquiries, newest first, with product categories.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn list(&self) -> Result<Vec<InquiryWithCategory>, ServiceError> {
        Ok(self.inquiries.list_with_category().await?)
    }

    /// Change an inquiry's status.
    ///
    /// Any non-blank value is stored; values outside the known vocabulary
    /// are logged.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if the status is blank.
    /// Returns `ServiceError::NotFound` if the inquiry does not exist.
    pub async fn update_status(
        &self,
        id: InquiryId,
        input: &StatusInput,
    ) -> Result<Inquiry, ServiceError> {
        let Some(status) = present(input.status.as_ref()) else {
            return Err(ServiceError::Validation("Status is required".to_owned()));
        };

        if !InquiryStatus::is_known(status) {
            tracing::warn!(inquiry_id = %id, status, "Storing unrecognized inquiry status");
        }

        let inquiry = self
            .inquiries
            .update_status(id, status)
            .await
            .map_err(ServiceError::not_found_as(INQUIRY))?;

        tracing::info!(inquiry_id = %id, status, "Inquiry status changed");
        Ok(inquiry)
    }

    /// Customers, most recent inquiry first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, ServiceError> {
        Ok(self.customers.list().await?)
    }
}
