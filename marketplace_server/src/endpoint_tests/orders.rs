use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::Utc;
use marketplace_engine::{
    db_types::{Kobo, ProductStatus, Role},
    traits::{AssignOutcome, BookingOutcome, CheckoutMetadata, VerifiedPayment},
    CheckoutFlowApi,
    OrderApi,
    ShippingPlatform,
    TransactionApi,
};
use mockall::predicate::eq;
use serde_json::json;

use super::{
    helpers::{bearer, order, product, send, transaction},
    mocks::{MockDatabase, MockLogistics, MockPayments},
};
use crate::routes::payments::{
    CreateOrderRoute,
    MyTransactionsRoute,
    TransactionByReferenceRoute,
    UserOrdersRoute,
    VerifyTransactionRoute,
};

fn configure_orders(db: MockDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(CreateOrderRoute::<MockDatabase>::new())
            .service(UserOrdersRoute::<MockDatabase>::new())
            .app_data(web::Data::new(OrderApi::new(db)));
    }
}

fn configure_transactions(db: MockDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(TransactionByReferenceRoute::<MockDatabase>::new())
            .service(MyTransactionsRoute::<MockDatabase>::new())
            .app_data(web::Data::new(TransactionApi::new(db)));
    }
}

fn configure_checkout(
    db: MockDatabase,
    payments: MockPayments,
    logistics: MockLogistics,
) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = CheckoutFlowApi::new(db, payments, logistics, ShippingPlatform::new("goshiip-user-77"));
        cfg.service(VerifyTransactionRoute::<MockDatabase, MockPayments, MockLogistics>::new())
            .app_data(web::Data::new(api));
    }
}

fn payment(reference: &str, status: &str) -> VerifiedPayment {
    VerifiedPayment {
        transaction_id: "4099".into(),
        reference: reference.into(),
        amount: Kobo::from(2_500_000),
        currency: "NGN".into(),
        status: status.into(),
        customer_email: "ada1@example.com".into(),
        channel: "card".into(),
        paid_at: Utc::now(),
        gateway_response: Some("Approved".into()),
        metadata: CheckoutMetadata {
            order_id: Some(21),
            rate_id: Some("rate-abc".into()),
            redis_key: Some("redis-xyz".into()),
        },
    }
}

fn booked() -> BookingOutcome {
    BookingOutcome {
        accepted: true,
        message: "Shipment booked".into(),
        shipment_id: Some("8812".into()),
        reference: Some("SHP-8812".into()),
    }
}

//----------------------------------------------   Orders  ----------------------------------------------------
#[actix_web::test]
async fn create_order_for_an_approved_product() {
    let mut db = MockDatabase::new();
    db.expect_fetch_product().with(eq(3)).returning(|id| Ok(Some(product(id, 4, ProductStatus::Approved))));
    db.expect_insert_order()
        .withf(|o| o.user_id == 1 && o.product_id == 3 && o.quantity == 2 && o.amount == Kobo::from(5_000_000))
        .returning(|o| {
            let mut created = order(21, o.user_id, o.product_id);
            created.quantity = o.quantity;
            created.amount = o.amount;
            Ok(created)
        });
    let req = TestRequest::post()
        .uri("/orders")
        .insert_header(bearer(1, "ada1@example.com", Role::User))
        .set_json(json!({"productId": 3, "quantity": 2}));
    let (status, body) = send(req, configure_orders(db)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Order created successfully");
    assert_eq!(body["data"]["amount"], 5_000_000);
}

#[actix_web::test]
async fn pending_products_cannot_be_ordered() {
    let mut db = MockDatabase::new();
    db.expect_fetch_product().returning(|id| Ok(Some(product(id, 4, ProductStatus::Pending))));
    db.expect_insert_order().never();
    let req = TestRequest::post()
        .uri("/orders")
        .insert_header(bearer(1, "ada1@example.com", Role::User))
        .set_json(json!({"productId": 3, "quantity": 1}));
    let (status, _) = send(req, configure_orders(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn users_only_see_their_own_orders() {
    let mut db = MockDatabase::new();
    db.expect_fetch_orders_for_user().never();
    let req = TestRequest::get().uri("/orders/user/2").insert_header(bearer(1, "ada1@example.com", Role::User));
    let (status, body) = send(req, configure_orders(db)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You can only view your own orders");
}

//----------------------------------------------   Transactions  ----------------------------------------------------
#[actix_web::test]
async fn transaction_summary_by_reference() {
    let mut db = MockDatabase::new();
    db.expect_fetch_transaction_by_reference()
        .withf(|r| r == "ref-123")
        .returning(|r| Ok(Some(transaction(1, r, Some(21)))));
    let req = TestRequest::get().uri("/transaction/verify/ref-123");
    let (status, body) = send(req, configure_transactions(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reference"], "ref-123");
    assert_eq!(body["data"]["paymentMethod"], "card");
    assert!(body["data"].get("orderId").is_none());
}

#[actix_web::test]
async fn no_transactions_for_customer() {
    let mut db = MockDatabase::new();
    db.expect_fetch_transactions_for_email().withf(|e| e == "ada1@example.com").returning(|_| Ok(vec![]));
    let req = TestRequest::get().uri("/transactions").insert_header(bearer(1, "ada1@example.com", Role::User));
    let (status, _) = send(req, configure_transactions(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

//----------------------------------------------   Checkout  ----------------------------------------------------
#[actix_web::test]
async fn checkout_books_and_assigns_the_shipment() {
    let mut payments = MockPayments::new();
    payments.expect_verify_transaction().withf(|r| r == "ref-123").returning(|r| Ok(payment(r, "success")));
    let mut db = MockDatabase::new();
    db.expect_fetch_order().with(eq(21)).returning(|id| Ok(Some(order(id, 1, 3))));
    db.expect_record_transaction()
        .withf(|tx| tx.order_id == Some(21) && tx.reference == "ref-123")
        .times(1)
        .returning(|tx| Ok((transaction(1, &tx.reference, tx.order_id), true)));
    db.expect_claim_for_booking().with(eq(21)).times(1).returning(|_| Ok(true));
    db.expect_release_booking_claim().never();
    db.expect_set_shipment_reference()
        .withf(|id, r| *id == 21 && r == "SHP-8812")
        .times(1)
        .returning(|id, r| {
            let mut o = order(id, 1, 3);
            o.shipment_reference = Some(r.to_string());
            Ok(Some(o))
        });
    let mut logistics = MockLogistics::new();
    logistics
        .expect_book_shipment()
        .withf(|b| b.rate_id == "rate-abc" && b.redis_key == "redis-xyz" && b.user_id == "goshiip-user-77")
        .returning(|_| Ok(booked()));
    logistics
        .expect_assign_shipment()
        .withf(|id| id == "8812")
        .returning(|_| Ok(AssignOutcome { http_status: 200, message: "Assigned".into() }));
    let req = TestRequest::get().uri("/verify-transaction/ref-123");
    let (status, body) = send(req, configure_checkout(db, payments, logistics)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Payment verified, shipment booked, and assignment successful.");
    assert_eq!(body["data"]["transactionDetails"]["shipmentId"], "8812");
    assert!(body["data"].get("warnings").is_none());
}

#[actix_web::test]
async fn checkout_reports_a_failed_assignment() {
    let mut payments = MockPayments::new();
    payments.expect_verify_transaction().returning(|r| Ok(payment(r, "success")));
    let mut db = MockDatabase::new();
    db.expect_fetch_order().returning(|id| Ok(Some(order(id, 1, 3))));
    db.expect_record_transaction().returning(|tx| Ok((transaction(1, &tx.reference, tx.order_id), false)));
    db.expect_claim_for_booking().returning(|_| Ok(true));
    db.expect_set_shipment_reference().returning(|id, _| Ok(Some(order(id, 1, 3))));
    let mut logistics = MockLogistics::new();
    logistics.expect_book_shipment().returning(|_| Ok(booked()));
    logistics
        .expect_assign_shipment()
        .returning(|_| Ok(AssignOutcome { http_status: 422, message: "No rider available".into() }));
    let req = TestRequest::get().uri("/verify-transaction/ref-123");
    let (status, body) = send(req, configure_checkout(db, payments, logistics)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Shipment booked but assignment failed.");
    assert_eq!(body["ok"], false);
}

#[actix_web::test]
async fn checkout_stops_when_the_payment_failed() {
    let mut payments = MockPayments::new();
    payments.expect_verify_transaction().returning(|r| Ok(payment(r, "abandoned")));
    let mut db = MockDatabase::new();
    db.expect_fetch_order().never();
    db.expect_record_transaction().never();
    let mut logistics = MockLogistics::new();
    logistics.expect_book_shipment().never();
    let req = TestRequest::get().uri("/verify-transaction/ref-123");
    let (status, body) = send(req, configure_checkout(db, payments, logistics)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Transaction verification failed");
    assert_eq!(body["error"], "abandoned");
}

#[actix_web::test]
async fn checkout_is_not_repeated_for_shipped_orders() {
    let mut payments = MockPayments::new();
    payments.expect_verify_transaction().returning(|r| Ok(payment(r, "success")));
    let mut db = MockDatabase::new();
    db.expect_fetch_order().returning(|id| {
        let mut o = order(id, 1, 3);
        o.shipment_reference = Some("SHP-8812".into());
        Ok(Some(o))
    });
    db.expect_record_transaction().never();
    db.expect_claim_for_booking().never();
    let mut logistics = MockLogistics::new();
    logistics.expect_book_shipment().never();
    logistics.expect_assign_shipment().never();
    let req = TestRequest::get().uri("/verify-transaction/ref-123");
    let (status, body) = send(req, configure_checkout(db, payments, logistics)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Payment already verified and shipment booked.");
    assert_eq!(body["data"]["shipmentReference"], "SHP-8812");
}

#[actix_web::test]
async fn checkout_does_not_book_while_another_booking_holds_the_order() {
    let mut payments = MockPayments::new();
    payments.expect_verify_transaction().returning(|r| Ok(payment(r, "success")));
    let mut db = MockDatabase::new();
    db.expect_fetch_order().times(2).returning(|id| Ok(Some(order(id, 1, 3))));
    db.expect_record_transaction().returning(|tx| Ok((transaction(1, &tx.reference, tx.order_id), false)));
    db.expect_claim_for_booking().with(eq(21)).returning(|_| Ok(false));
    let mut logistics = MockLogistics::new();
    logistics.expect_book_shipment().never();
    logistics.expect_assign_shipment().never();
    let req = TestRequest::get().uri("/verify-transaction/ref-123");
    let (status, body) = send(req, configure_checkout(db, payments, logistics)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "A shipment for order 21 is already being booked.");
}

#[actix_web::test]
async fn declined_booking_gives_the_order_back() {
    let mut payments = MockPayments::new();
    payments.expect_verify_transaction().returning(|r| Ok(payment(r, "success")));
    let mut db = MockDatabase::new();
    db.expect_fetch_order().returning(|id| Ok(Some(order(id, 1, 3))));
    db.expect_record_transaction().returning(|tx| Ok((transaction(1, &tx.reference, tx.order_id), true)));
    db.expect_claim_for_booking().returning(|_| Ok(true));
    db.expect_release_booking_claim().with(eq(21)).times(1).returning(|_| Ok(()));
    db.expect_set_shipment_reference().never();
    let mut logistics = MockLogistics::new();
    logistics
        .expect_book_shipment()
        .returning(|_| Ok(BookingOutcome { accepted: false, message: "Rate has expired".into(), ..booked() }));
    logistics.expect_assign_shipment().never();
    let req = TestRequest::get().uri("/verify-transaction/ref-123");
    let (status, body) = send(req, configure_checkout(db, payments, logistics)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Booking failed. Rate has expired");
}
