use log::trace;
use sqlx::{types::Json, QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewProduct, Product, ProductStatus, ProductUpdate},
    mkt_api::product_objects::ProductQueryFilter,
};

/// Inserts a new listing. This is not atomic on its own; callers that also queue the review notifications should run
/// it inside a transaction.
pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, sqlx::Error> {
    sqlx::query_as(
        r#"
            INSERT INTO products (
                title,
                description,
                category,
                price,
                price_category,
                images,
                primary_image,
                location,
                tag,
                video_url,
                specification,
                condition,
                uploader_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *;
        "#,
    )
    .bind(product.title)
    .bind(product.description)
    .bind(product.category)
    .bind(product.price)
    .bind(product.price_category)
    .bind(Json(product.images))
    .bind(product.primary_image)
    .bind(product.location)
    .bind(product.tag)
    .bind(product.video_url)
    .bind(product.specification)
    .bind(product.condition)
    .bind(product.uploader_id)
    .fetch_one(conn)
    .await
}

pub async fn fetch_product(id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(conn).await
}

/// Fetches listings according to the criteria in the `ProductQueryFilter`, newest first.
pub async fn search_products(
    query: ProductQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM products ");
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(category) = query.category {
        where_clause.push("category = ");
        where_clause.push_bind_unseparated(category);
    }
    if let Some(uploader_id) = query.uploader_id {
        where_clause.push("uploader_id = ");
        where_clause.push_bind_unseparated(uploader_id);
    }
    if let Some(status) = query.status {
        where_clause.push("status = ");
        where_clause.push_bind_unseparated(status);
    }
    builder.push(" ORDER BY created_at DESC, id DESC");
    trace!("🗃️ Executing query: {}", builder.sql());
    let products = builder.build_query_as::<Product>().fetch_all(conn).await?;
    trace!("🗃️ Result of search_products: {}", products.len());
    Ok(products)
}

/// Returns `None` if the product does not exist. An empty update only touches `updated_at`.
pub async fn update_product(
    id: i64,
    update: ProductUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, sqlx::Error> {
    let mut builder = QueryBuilder::new("UPDATE products SET updated_at = CURRENT_TIMESTAMP");
    let text_fields = [
        ("title", update.title),
        ("description", update.description),
        ("category", update.category),
        ("price_category", update.price_category),
        ("location", update.location),
        ("image", update.image),
    ];
    for (column, value) in text_fields {
        if let Some(value) = value {
            builder.push(format!(", {column} = "));
            builder.push_bind(value);
        }
    }
    if let Some(price) = update.price {
        builder.push(", price = ");
        builder.push_bind(price);
    }
    if let Some(tag) = update.tag {
        builder.push(", tag = ");
        builder.push_bind(tag);
    }
    if let Some(availability) = update.availability {
        builder.push(", availability = ");
        builder.push_bind(availability);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    builder.build_query_as::<Product>().fetch_optional(conn).await
}

/// Donations never carry a price.
pub async fn clear_price(id: i64, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE products SET price = NULL, price_category = NULL WHERE id = $1 AND tag = 'Donate'")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn update_status(
    id: i64,
    status: ProductStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("UPDATE products SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *")
        .bind(status)
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn delete_product(id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}
