use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
pub use mkt_common::Kobo;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

//--------------------------------------        Role         ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

//--------------------------------------        User         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub account_name: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_password_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}

impl User {
    /// Sellers must fill in their contact details before they can list anything.
    pub fn is_profile_complete(&self) -> bool {
        !self.full_name.trim().is_empty() &&
            !self.username.trim().is_empty() &&
            !self.email.trim().is_empty() &&
            [&self.city, &self.state, &self.country, &self.bio, &self.phone_number].into_iter().all(is_filled)
    }

    pub fn has_bank_details(&self) -> bool {
        [&self.account_name, &self.bank_name, &self.account_number].into_iter().all(is_filled)
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            profile_picture: self.profile_picture.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Profile fields that a user may overwrite. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub account_name: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub profile_picture: Option<String>,
    pub is_verified: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    pub user: User,
    pub products: Vec<Product>,
}

//--------------------------------------        Admin        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub users: i64,
    pub pending_products: i64,
    pub orders: i64,
    pub unread_notifications: i64,
}

//--------------------------------------     ProductTag      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum ProductTag {
    #[sqlx(rename = "For sale")]
    #[serde(rename = "For sale")]
    ForSale,
    #[sqlx(rename = "Donate")]
    #[serde(rename = "Donate")]
    Donate,
}

impl Display for ProductTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductTag::ForSale => write!(f, "For sale"),
            ProductTag::Donate => write!(f, "Donate"),
        }
    }
}

impl FromStr for ProductTag {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "for sale" | "forsale" | "sale" => Ok(Self::ForSale),
            "donate" | "donation" => Ok(Self::Donate),
            _ => Err(ConversionError(format!("Invalid product tag: {s}"))),
        }
    }
}

//--------------------------------------    ProductStatus    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Newly listed, waiting for an admin to review it.
    Pending,
    Approved,
    Rejected,
}

impl Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Pending => write!(f, "pending"),
            ProductStatus::Approved => write!(f, "approved"),
            ProductStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for ProductStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            s => Err(ConversionError(format!("Invalid product status: {s}"))),
        }
    }
}

//--------------------------------------       Product       ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Option<Kobo>,
    pub price_category: Option<String>,
    pub images: Json<Vec<String>>,
    pub primary_image: Option<String>,
    pub image: Option<String>,
    pub location: String,
    pub tag: ProductTag,
    pub availability: bool,
    pub status: ProductStatus,
    pub video_url: Option<String>,
    pub specification: String,
    pub condition: String,
    pub uploader_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// A product can be ordered once it has been approved, is still available, and has a price.
    pub fn is_purchasable(&self) -> bool {
        self.status == ProductStatus::Approved &&
            self.availability &&
            self.tag == ProductTag::ForSale &&
            self.price.map(|p| p.is_positive()).unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Option<Kobo>,
    pub price_category: Option<String>,
    pub images: Vec<String>,
    pub primary_image: String,
    pub location: String,
    pub tag: ProductTag,
    pub video_url: Option<String>,
    pub specification: String,
    pub condition: String,
    pub uploader_id: i64,
}

/// Columns that owners and admins may change after listing. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Kobo>,
    pub price_category: Option<String>,
    pub location: Option<String>,
    pub tag: Option<ProductTag>,
    pub image: Option<String>,
    pub availability: Option<bool>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() &&
            self.description.is_none() &&
            self.category.is_none() &&
            self.price.is_none() &&
            self.price_category.is_none() &&
            self.location.is_none() &&
            self.tag.is_none() &&
            self.image.is_none() &&
            self.availability.is_none()
    }
}

/// A product together with a public summary of the user that listed it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,
    pub uploader: Option<UserSummary>,
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order has been placed, but no payment has been verified yet.
    Pending,
    /// A successful payment has been recorded against the order.
    Paid,
    /// A shipment has been booked for the order.
    Shipped,
    Cancelled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "Pending"),
            OrderStatusType::Paid => write!(f, "Paid"),
            OrderStatusType::Shipped => write!(f, "Shipped"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Shipped" => Ok(Self::Shipped),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub product_id: Option<i64>,
    pub quantity: i64,
    pub amount: Kobo,
    pub status: OrderStatusType,
    pub transaction_reference: Option<String>,
    pub shipment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub amount: Kobo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub user: Option<UserSummary>,
    pub product: Option<Product>,
}

//--------------------------------------     Transaction     ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub transaction_id: String,
    pub reference: String,
    pub amount: Kobo,
    pub order_id: Option<i64>,
    pub currency: String,
    pub status: String,
    pub customer_email: String,
    pub payment_method: String,
    pub paid_at: DateTime<Utc>,
    pub gateway_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub transaction_id: String,
    pub reference: String,
    pub amount: Kobo,
    pub order_id: Option<i64>,
    pub currency: String,
    pub status: String,
    pub customer_email: String,
    pub payment_method: String,
    pub paid_at: DateTime<Utc>,
    pub gateway_response: Option<String>,
}

//--------------------------------------    Notifications    ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    #[serde(rename = "read")]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

pub const PRODUCT_PENDING_NOTIFICATION: &str = "product_pending";

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNotification {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub product_id: Option<i64>,
    #[serde(rename = "read")]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
