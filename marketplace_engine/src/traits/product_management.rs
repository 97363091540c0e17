use thiserror::Error;

use crate::{
    db_types::{NewProduct, Product, ProductStatus, ProductUpdate, UserSummary},
    helpers::FieldError,
    mkt_api::product_objects::ProductQueryFilter,
    traits::AccountApiError,
};

#[derive(Debug, Clone, Error)]
pub enum ProductApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("{0}")]
    Validation(String),
    #[error("Product not found")]
    ProductNotFound(i64),
    #[error("Uploader not found")]
    UploaderNotFound(i64),
    #[error("Please complete your profile info before uploading a product.")]
    IncompleteProfile,
    #[error("Verify your bank details first.")]
    UnverifiedBankDetails,
    #[error("You can only modify your own products")]
    NotOwner,
    #[error("Invalid status value")]
    InvalidStatus,
}

impl From<sqlx::Error> for ProductApiError {
    fn from(e: sqlx::Error) -> Self {
        ProductApiError::DatabaseError(e.to_string())
    }
}

impl From<FieldError> for ProductApiError {
    fn from(e: FieldError) -> Self {
        ProductApiError::Validation(e.0)
    }
}

impl From<AccountApiError> for ProductApiError {
    fn from(e: AccountApiError) -> Self {
        ProductApiError::DatabaseError(e.to_string())
    }
}

/// The `ProductManagement` trait defines behaviour for storing product listings and their review state.
#[allow(async_fn_in_trait)]
pub trait ProductManagement {
    /// Stores a new listing with status `pending`. In the same atomic transaction, the uploader is told their product
    /// is under review and the admins are told a new product is waiting for approval.
    async fn insert_product(&self, product: NewProduct) -> Result<Product, ProductApiError>;

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, ProductApiError>;

    /// Fetches listings matching the filter, newest first.
    async fn search_products(&self, query: ProductQueryFilter) -> Result<Vec<Product>, ProductApiError>;

    async fn fetch_user_summaries(&self, ids: &[i64]) -> Result<Vec<UserSummary>, ProductApiError>;

    /// Returns `None` if the product does not exist.
    async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, ProductApiError>;

    /// Sets the review status and notifies the uploader. Returns `None` if the product does not exist.
    async fn update_product_status(&self, id: i64, status: ProductStatus) -> Result<Option<Product>, ProductApiError>;

    /// Returns `false` if there was nothing to delete.
    async fn delete_product(&self, id: i64) -> Result<bool, ProductApiError>;
}
