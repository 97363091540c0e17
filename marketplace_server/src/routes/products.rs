//! Product listings: the public catalogue, sellers' own listings and the admin review queue.
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use log::*;
use marketplace_engine::{
    db_types::{ProductStatus, ProductTag, Role},
    product_objects::{AdminProductUpdate, NewListing, OwnerProductUpdate, ProductQueryFilter, StatusUpdate},
    ProductApi,
    ProductManagement,
    UserManagement,
};
use serde_json::json;

use crate::{
    auth::JwtClaims,
    data_objects::{CategoryQuery, JsonResponse, UploaderQuery},
    errors::ServerError,
    integrations::ImageStore,
    multipart::MultipartForm,
    route,
};

pub const PRODUCT_CREATED_MESSAGE: &str = "Product created successfully and pending approval";

//----------------------------------------------   Catalogue  ----------------------------------------------------
route!(products => Get "/products" impl B: ProductManagement + UserManagement);
pub async fn products<B: ProductManagement + UserManagement>(
    query: web::Query<CategoryQuery>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let mut filter = ProductQueryFilter::default().with_status(ProductStatus::Approved);
    if let Some(category) = query.into_inner().category.filter(|c| !c.trim().is_empty()) {
        filter = filter.with_category(category);
    }
    let listings = api.list(filter).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Products retrieved successfully", listings)))
}

route!(product_by_id => Get "/products/{id}" impl B: ProductManagement + UserManagement);
pub async fn product_by_id<B: ProductManagement + UserManagement>(
    path: web::Path<i64>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let listing = api.fetch(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Product retrieved successfully", listing)))
}

async fn list_product<B: ProductManagement + UserManagement>(
    claims: &JwtClaims,
    tag: ProductTag,
    listing: NewListing,
    api: &ProductApi<B>,
) -> Result<HttpResponse, ServerError> {
    let product = api.create(claims.id, tag, listing).await?;
    debug!("💻️ User #{} listed product #{}", claims.id, product.id);
    Ok(HttpResponse::Created().json(JsonResponse::with_data(PRODUCT_CREATED_MESSAGE, product)))
}

route!(create_product => Post "/products" impl B: ProductManagement + UserManagement where requires [Role::User]);
pub async fn create_product<B: ProductManagement + UserManagement>(
    claims: JwtClaims,
    body: web::Json<NewListing>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    list_product(&claims, ProductTag::ForSale, body.into_inner(), api.as_ref()).await
}

route!(donate_product => Post "/products/donate"
    impl B: ProductManagement + UserManagement
    where requires [Role::User]);
pub async fn donate_product<B: ProductManagement + UserManagement>(
    claims: JwtClaims,
    body: web::Json<NewListing>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    list_product(&claims, ProductTag::Donate, body.into_inner(), api.as_ref()).await
}

//----------------------------------------------   My products  ----------------------------------------------------
route!(my_products => Get "/myProducts" impl B: ProductManagement + UserManagement);
pub async fn my_products<B: ProductManagement + UserManagement>(
    query: web::Query<UploaderQuery>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let uploader =
        query.into_inner().uploader.ok_or_else(|| ServerError::ValidationError("Uploader ID is required".into()))?;
    let listings = api.list(ProductQueryFilter::default().with_uploader(uploader)).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Products retrieved successfully", listings)))
}

route!(update_my_product => Put "/myProducts/{id}"
    impl B: ProductManagement + UserManagement
    where requires [Role::User]);
pub async fn update_my_product<B: ProductManagement + UserManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<OwnerProductUpdate>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product = api.update_own(claims.id, path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Product updated successfully", product)))
}

route!(delete_my_product => Delete "/myProducts/delete/{id}"
    impl B: ProductManagement + UserManagement
    where requires [Role::User]);
pub async fn delete_my_product<B: ProductManagement + UserManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    api.delete_own(claims.id, id).await?;
    info!("💻️ User #{} deleted their product #{id}", claims.id);
    Ok(HttpResponse::Ok().json(JsonResponse::success("Product deleted successfully")))
}

//----------------------------------------------   Admin review  ----------------------------------------------------
route!(admin_products => Get "/adminProduct" impl B: ProductManagement + UserManagement where requires [Role::Admin]);
pub async fn admin_products<B: ProductManagement + UserManagement>(
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let listings = api.list(ProductQueryFilter::default()).await.map_err(|e| {
        error!("💻️ Failed to fetch products for review. {e}");
        ServerError::failed(500, "Failed to fetch products")
    })?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Products retrieved successfully", listings)))
}

route!(admin_product => Get "/adminProduct/{id}"
    impl B: ProductManagement + UserManagement
    where requires [Role::Admin]);
pub async fn admin_product<B: ProductManagement + UserManagement>(
    path: web::Path<i64>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let listing = api.fetch(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Product retrieved successfully", listing)))
}

route!(admin_update_product => Put "/adminProduct/{id}"
    impl B: ProductManagement + UserManagement, I: ImageStore
    where requires [Role::Admin]);
pub async fn admin_update_product<B: ProductManagement + UserManagement, I: ImageStore>(
    path: web::Path<i64>,
    payload: Multipart,
    api: web::Data<ProductApi<B>>,
    images: web::Data<I>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let form = MultipartForm::collect(payload, &["image"]).await?;
    let mut edit = form.deserialize_fields::<AdminProductUpdate>()?;
    if let Some(file) = form.file {
        let url = images.store_image(file.bytes, &file.filename).await.map_err(|e| {
            error!("🖼️ Image upload for product #{id} failed. {e}");
            ServerError::failed_with_detail(500, "Image upload failed", Some(json!(e.to_string())))
        })?;
        edit.image = Some(url);
    }
    let product = api.admin_update(id, edit).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Product updated successfully", product)))
}

route!(admin_product_status => Put "/adminProduct/{id}/status"
    impl B: ProductManagement + UserManagement
    where requires [Role::Admin]);
pub async fn admin_product_status<B: ProductManagement + UserManagement>(
    path: web::Path<i64>,
    body: web::Json<StatusUpdate>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let StatusUpdate { status } = body.into_inner();
    let product = api.set_status(path.into_inner(), &status).await?;
    let message = format!("Product status updated to {}", product.status);
    Ok(HttpResponse::Ok().json(JsonResponse::with_data(message, product)))
}

route!(admin_delete_product => Delete "/adminProduct/{id}"
    impl B: ProductManagement + UserManagement
    where requires [Role::Admin]);
pub async fn admin_delete_product<B: ProductManagement + UserManagement>(
    path: web::Path<i64>,
    api: web::Data<ProductApi<B>>,
) -> Result<HttpResponse, ServerError> {
    api.admin_delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Product deleted successfully")))
}
