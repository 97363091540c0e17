//! Product listings: creation rules, owner edits and admin review.

use std::{collections::HashMap, fmt::Debug};

use log::*;

use crate::{
    db_types::{Kobo, NewProduct, Product, ProductListing, ProductStatus, ProductTag, ProductUpdate},
    helpers::{optional_min_length, required},
    mkt_api::product_objects::{
        AdminProductUpdate,
        NewListing,
        OwnerProductUpdate,
        ProductQueryFilter,
        MAX_PRODUCT_IMAGES,
        VIDEO_REQUIRED_CATEGORIES,
    },
    traits::{ProductApiError, ProductManagement, UserManagement},
};

pub struct ProductApi<B> {
    db: B,
}

impl<B: Debug> Debug for ProductApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProductApi ({:?})", self.db)
    }
}

impl<B> ProductApi<B>
where B: ProductManagement + UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches the listings matching `query`, newest first, each with a summary of its uploader.
    pub async fn list(&self, query: ProductQueryFilter) -> Result<Vec<ProductListing>, ProductApiError> {
        trace!("🛍️ Fetching products. {query}");
        let products = self.db.search_products(query).await?;
        self.attach_uploaders(products).await
    }

    pub async fn fetch(&self, id: i64) -> Result<ProductListing, ProductApiError> {
        let product = self.db.fetch_product(id).await?.ok_or(ProductApiError::ProductNotFound(id))?;
        let mut listings = self.attach_uploaders(vec![product]).await?;
        listings.pop().ok_or(ProductApiError::ProductNotFound(id))
    }

    /// Lists a new product on behalf of `uploader_id`.
    ///
    /// Sale items need a price and a price category; donations carry neither. Every listing needs between 1 and 10
    /// images, a primary image chosen from them, and a video when the category calls for one. The uploader must have
    /// a complete profile and verified bank details. New listings start out `pending` until an admin reviews them.
    pub async fn create(
        &self,
        uploader_id: i64,
        tag: ProductTag,
        listing: NewListing,
    ) -> Result<Product, ProductApiError> {
        let product = validate_listing(uploader_id, tag, listing)?;
        let uploader =
            self.db.fetch_user_by_id(uploader_id).await?.ok_or(ProductApiError::UploaderNotFound(uploader_id))?;
        if !uploader.is_profile_complete() {
            return Err(ProductApiError::IncompleteProfile);
        }
        if !uploader.is_verified {
            return Err(ProductApiError::UnverifiedBankDetails);
        }
        let product = self.db.insert_product(product).await?;
        info!("🛍️ User #{uploader_id} listed product #{} ({}) for review", product.id, product.tag);
        Ok(product)
    }

    /// Applies a seller's edits to their own listing. A new price must be positive, and donations cannot be priced.
    pub async fn update_own(
        &self,
        user_id: i64,
        id: i64,
        edit: OwnerProductUpdate,
    ) -> Result<Product, ProductApiError> {
        let existing = self.check_owner(user_id, id).await?;
        let price = match (existing.tag, edit.price) {
            (ProductTag::Donate, Some(_)) => {
                return Err(ProductApiError::Validation("Donated products cannot have a price".into()))
            },
            (_, price) => validate_price(price)?,
        };
        let update = ProductUpdate {
            title: optional_min_length("title", &edit.title, 3)?,
            description: optional_min_length("description", &edit.description, 3)?,
            price,
            availability: edit.availability,
            ..Default::default()
        };
        if update.is_empty() {
            return Err(ProductApiError::Validation("Nothing to update".into()));
        }
        self.db.update_product(id, update).await?.ok_or(ProductApiError::ProductNotFound(id))
    }

    pub async fn delete_own(&self, user_id: i64, id: i64) -> Result<(), ProductApiError> {
        self.check_owner(user_id, id).await?;
        self.admin_delete(id).await
    }

    /// Admin edit. The price fields are ignored when the product is (or becomes) a donation. A product for sale must
    /// end up with a positive price.
    pub async fn admin_update(&self, id: i64, edit: AdminProductUpdate) -> Result<Product, ProductApiError> {
        let existing = self.db.fetch_product(id).await?.ok_or(ProductApiError::ProductNotFound(id))?;
        let tag = edit.tag.unwrap_or(existing.tag);
        let (price, price_category) = match tag {
            ProductTag::Donate => (None, None),
            ProductTag::ForSale => {
                let price = validate_price(edit.price)?;
                if price.or(existing.price).is_none() {
                    return Err(ProductApiError::Validation("A product for sale needs a price".into()));
                }
                (price, optional_min_length("priceCategory", &edit.price_category, 3)?)
            },
        };
        let update = ProductUpdate {
            title: optional_min_length("title", &edit.title, 3)?,
            description: optional_min_length("description", &edit.description, 3)?,
            category: optional_min_length("category", &edit.category, 3)?,
            location: optional_min_length("location", &edit.location, 3)?,
            price,
            price_category,
            tag: edit.tag,
            image: edit.image,
            availability: None,
        };
        if update.is_empty() {
            return Ok(existing);
        }
        self.db.update_product(id, update).await?.ok_or(ProductApiError::ProductNotFound(id))
    }

    /// Approves or rejects a listing. Any other status is refused.
    pub async fn set_status(&self, id: i64, status: &str) -> Result<Product, ProductApiError> {
        let status = match status {
            "approved" => ProductStatus::Approved,
            "rejected" => ProductStatus::Rejected,
            _ => return Err(ProductApiError::InvalidStatus),
        };
        let product = self.db.update_product_status(id, status).await?.ok_or(ProductApiError::ProductNotFound(id))?;
        info!("🛍️ Product #{id} is now {status}");
        Ok(product)
    }

    pub async fn admin_delete(&self, id: i64) -> Result<(), ProductApiError> {
        if self.db.delete_product(id).await? {
            info!("🛍️ Product #{id} deleted");
            Ok(())
        } else {
            Err(ProductApiError::ProductNotFound(id))
        }
    }

    async fn check_owner(&self, user_id: i64, id: i64) -> Result<Product, ProductApiError> {
        let product = self.db.fetch_product(id).await?.ok_or(ProductApiError::ProductNotFound(id))?;
        if product.uploader_id != user_id {
            warn!("🛍️ User #{user_id} tried to modify product #{id}, which belongs to #{}", product.uploader_id);
            return Err(ProductApiError::NotOwner);
        }
        Ok(product)
    }

    async fn attach_uploaders(&self, products: Vec<Product>) -> Result<Vec<ProductListing>, ProductApiError> {
        let mut ids = products.iter().map(|p| p.uploader_id).collect::<Vec<_>>();
        ids.sort_unstable();
        ids.dedup();
        let summaries = if ids.is_empty() { vec![] } else { self.db.fetch_user_summaries(&ids).await? };
        let by_id = summaries.into_iter().map(|s| (s.id, s)).collect::<HashMap<_, _>>();
        let listings = products
            .into_iter()
            .map(|product| {
                let uploader = by_id.get(&product.uploader_id).cloned();
                ProductListing { product, uploader }
            })
            .collect();
        Ok(listings)
    }
}

fn validate_price(price: Option<Kobo>) -> Result<Option<Kobo>, ProductApiError> {
    match price {
        Some(p) if !p.is_positive() => Err(ProductApiError::Validation("'price' must be greater than zero".into())),
        price => Ok(price),
    }
}

fn validate_listing(uploader_id: i64, tag: ProductTag, listing: NewListing) -> Result<NewProduct, ProductApiError> {
    let missing = || ProductApiError::Validation("Please fill all required fields".into());
    let title = required("title", &listing.title).map_err(|_| missing())?.to_string();
    let description = required("description", &listing.description).map_err(|_| missing())?.to_string();
    let category = required("category", &listing.category).map_err(|_| missing())?.to_string();
    let location = required("location", &listing.location).map_err(|_| missing())?.to_string();
    let specification = required("specification", &listing.specification).map_err(|_| missing())?.to_string();
    let condition = required("condition", &listing.condition).map_err(|_| missing())?.to_string();
    let (price, price_category) = match tag {
        ProductTag::ForSale => {
            let price = listing.price.filter(|p| p.is_positive()).ok_or_else(missing)?;
            let price_category = required("priceCategory", &listing.price_category).map_err(|_| missing())?.to_string();
            (Some(price), Some(price_category))
        },
        ProductTag::Donate => (None, None),
    };
    if listing.images.is_empty() {
        return Err(ProductApiError::Validation("Please upload at least one product image".into()));
    }
    if listing.images.len() > MAX_PRODUCT_IMAGES {
        return Err(ProductApiError::Validation(format!("You can upload a maximum of {MAX_PRODUCT_IMAGES} images")));
    }
    let primary_image = listing
        .primary_image_index
        .and_then(|i| listing.images.get(i))
        .cloned()
        .ok_or_else(|| ProductApiError::Validation("Please select a primary image for display".into()))?;
    let video_url = listing.video.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    if VIDEO_REQUIRED_CATEGORIES.contains(&category.as_str()) && video_url.is_none() {
        return Err(ProductApiError::Validation("Please upload a video for this category".into()));
    }
    Ok(NewProduct {
        title,
        description,
        category,
        price,
        price_category,
        images: listing.images,
        primary_image,
        location,
        tag,
        video_url,
        specification,
        condition,
        uploader_id,
    })
}
