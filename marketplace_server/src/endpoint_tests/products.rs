use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use marketplace_engine::{
    db_types::{ProductStatus, ProductTag, Role},
    ProductApi,
};
use serde_json::{json, Value};

use super::{
    helpers::{bearer, new_user, product, send, user},
    mocks::MockDatabase,
};
use crate::routes::products::{
    AdminProductStatusRoute,
    CreateProductRoute,
    DeleteMyProductRoute,
    DonateProductRoute,
    MyProductsRoute,
    ProductsRoute,
    PRODUCT_CREATED_MESSAGE,
};

fn configure(db: MockDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(ProductsRoute::<MockDatabase>::new())
            .service(CreateProductRoute::<MockDatabase>::new())
            .service(DonateProductRoute::<MockDatabase>::new())
            .service(MyProductsRoute::<MockDatabase>::new())
            .service(DeleteMyProductRoute::<MockDatabase>::new())
            .service(AdminProductStatusRoute::<MockDatabase>::new())
            .app_data(web::Data::new(ProductApi::new(db)));
    }
}

fn listing() -> Value {
    json!({
        "title": "Standing fan",
        "description": "16 inch, barely used",
        "category": "Household-Items",
        "price": 2500000,
        "priceCategory": "Negotiable",
        "location": "Yaba",
        "specification": "Binatone",
        "condition": "Used",
        "images": ["https://img.example.com/fan.jpg", "https://img.example.com/fan-2.jpg"],
        "primaryImageIndex": 1,
        "video": "https://img.example.com/fan.mp4"
    })
}

#[actix_web::test]
async fn catalogue_only_shows_approved_products() {
    let mut db = MockDatabase::new();
    db.expect_search_products()
        .withf(|q| q.status == Some(ProductStatus::Approved) && q.category.as_deref() == Some("Electronics"))
        .returning(|_| Ok(vec![product(1, 4, ProductStatus::Approved), product(2, 4, ProductStatus::Approved)]));
    db.expect_fetch_user_summaries().withf(|ids| ids.to_vec() == vec![4]).returning(|_| Ok(vec![user(4).summary()]));
    let req = TestRequest::get().uri("/products?category=Electronics");
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    let listings = body["data"].as_array().expect("Expected a list of products");
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0]["uploader"]["username"], "ada4");
}

#[actix_web::test]
async fn listing_a_product_needs_a_login() {
    let mut db = MockDatabase::new();
    db.expect_insert_product().never();
    let req = TestRequest::post().uri("/products").set_json(listing());
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, no token");

    let req = TestRequest::post()
        .uri("/products")
        .insert_header(("Authorization", "Bearer nonsense"))
        .set_json(listing());
    let (status, body) = send(req, configure(MockDatabase::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, token failed");
}

#[actix_web::test]
async fn list_a_product_for_sale() {
    let mut db = MockDatabase::new();
    db.expect_fetch_user_by_id().returning(|id| Ok(Some(user(id))));
    db.expect_insert_product()
        .withf(|p| {
            p.uploader_id == 4 &&
                p.tag == ProductTag::ForSale &&
                p.primary_image == "https://img.example.com/fan-2.jpg" &&
                p.images.len() == 2
        })
        .times(1)
        .returning(|p| {
            let mut created = product(10, p.uploader_id, ProductStatus::Pending);
            created.primary_image = Some(p.primary_image);
            Ok(created)
        });
    let req = TestRequest::post()
        .uri("/products")
        .insert_header(bearer(4, "ada4@example.com", Role::User))
        .set_json(listing());
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], PRODUCT_CREATED_MESSAGE);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["uploaderId"], 4);
}

#[actix_web::test]
async fn donations_need_no_price() {
    let mut db = MockDatabase::new();
    db.expect_fetch_user_by_id().returning(|id| Ok(Some(user(id))));
    db.expect_insert_product().withf(|p| p.tag == ProductTag::Donate && p.price.is_none()).returning(|p| {
        let mut created = product(11, p.uploader_id, ProductStatus::Pending);
        created.tag = ProductTag::Donate;
        created.price = None;
        Ok(created)
    });
    let mut donation = listing();
    donation["price"] = Value::Null;
    donation["priceCategory"] = Value::Null;
    let req = TestRequest::post()
        .uri("/products/donate")
        .insert_header(bearer(4, "ada4@example.com", Role::User))
        .set_json(donation);
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["tag"], "Donate");
}

#[actix_web::test]
async fn sellers_must_complete_their_profile() {
    let mut db = MockDatabase::new();
    db.expect_fetch_user_by_id().returning(|id| Ok(Some(new_user(id))));
    db.expect_insert_product().never();
    let req = TestRequest::post()
        .uri("/products")
        .insert_header(bearer(4, "ada4@example.com", Role::User))
        .set_json(listing());
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["ok"], false);
}

#[actix_web::test]
async fn listings_need_a_video_in_some_categories() {
    let mut db = MockDatabase::new();
    db.expect_fetch_user_by_id().never();
    let mut no_video = listing();
    no_video["video"] = Value::Null;
    let req = TestRequest::post()
        .uri("/products")
        .insert_header(bearer(4, "ada4@example.com", Role::User))
        .set_json(no_video);
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please upload a video for this category");
}

#[actix_web::test]
async fn my_products_needs_an_uploader() {
    let req = TestRequest::get().uri("/myProducts");
    let (status, body) = send(req, configure(MockDatabase::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Uploader ID is required");
}

#[actix_web::test]
async fn sellers_cannot_delete_other_listings() {
    let mut db = MockDatabase::new();
    db.expect_fetch_product().returning(|id| Ok(Some(product(id, 8, ProductStatus::Approved))));
    db.expect_delete_product().never();
    let req = TestRequest::delete()
        .uri("/myProducts/delete/3")
        .insert_header(bearer(4, "ada4@example.com", Role::User));
    let (status, _) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admin_approves_a_product() {
    let mut db = MockDatabase::new();
    db.expect_update_product_status()
        .withf(|id, status| *id == 3 && *status == ProductStatus::Approved)
        .returning(|id, status| Ok(Some(product(id, 4, status))));
    let req = TestRequest::put()
        .uri("/adminProduct/3/status")
        .insert_header(bearer(9, "root@example.com", Role::Admin))
        .set_json(json!({"status": "approved"}));
    let (status, body) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product status updated to approved");
}

#[actix_web::test]
async fn product_status_must_be_approved_or_rejected() {
    let mut db = MockDatabase::new();
    db.expect_update_product_status().never();
    let req = TestRequest::put()
        .uri("/adminProduct/3/status")
        .insert_header(bearer(9, "root@example.com", Role::Admin))
        .set_json(json!({"status": "pending"}));
    let (status, _) = send(req, configure(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = TestRequest::put()
        .uri("/adminProduct/3/status")
        .insert_header(bearer(4, "ada4@example.com", Role::User))
        .set_json(json!({"status": "approved"}));
    let (status, _) = send(req, configure(MockDatabase::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
