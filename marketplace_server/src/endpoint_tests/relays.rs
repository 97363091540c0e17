//! The Paystack and GoShiip relays, run against a mock upstream.
use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use gateway_tools::{BankDirectory, GoshiipApi, GoshiipConfig, PaystackApi, PaystackConfig};
use mkt_common::Secret;
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, header, method, path, query_param},
    Mock,
    MockServer,
    ResponseTemplate,
};

use super::helpers::send;
use crate::routes::{
    logistics::{CouriersRoute, RatesRoute, TrackShipmentRoute},
    payments::{CreateSubaccountRoute, InitializeTransactionRoute},
};

fn goshiip(server: &MockServer) -> impl FnOnce(&mut ServiceConfig) {
    let config = GoshiipConfig {
        base_url: format!("{}/", server.uri()),
        api_key: Secret::new("goshiip-test-key".to_string()),
        platform_user_id: "77".into(),
    };
    let api = GoshiipApi::new(&config).expect("Could not create GoShiip client");
    move |cfg| {
        cfg.service(CouriersRoute::new())
            .service(RatesRoute::new())
            .service(TrackShipmentRoute::new())
            .app_data(web::Data::new(api));
    }
}

fn paystack(server: &MockServer) -> impl FnOnce(&mut ServiceConfig) {
    let config = PaystackConfig { base_url: server.uri(), secret_key: Secret::new("sk_test_123".to_string()) };
    let api = PaystackApi::new(config).expect("Could not create Paystack client");
    let directory = BankDirectory::new(api.clone());
    move |cfg| {
        cfg.service(CreateSubaccountRoute::new())
            .service(InitializeTransactionRoute::new())
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(directory));
    }
}

async fn mount_banks(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/bank"))
        .and(query_param("currency", "NGN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "Banks retrieved",
            "data": [
                {"id": 1, "name": "Access Bank", "slug": "access-bank", "code": "044", "active": true},
                {"id": 9, "name": "Zenith Bank", "slug": "zenith-bank", "code": "057", "active": true}
            ]
        })))
        .mount(server)
        .await;
}

fn rate_request() -> Value {
    json!({
        "carrierName": "gig",
        "type": "local",
        "toAddress": {
            "name": "Ada Obi", "email": "ada1@example.com", "phone": "08031234567", "address": "12 Allen Avenue, Ikeja"
        },
        "fromAddress": {
            "name": "Store", "email": "store@example.com", "phone": "08030000000", "address": "3 Herbert Macaulay, Yaba"
        },
        "parcels": {"weight": 1},
        "items": [{"name": "Standing fan", "quantity": 1}]
    })
}

//----------------------------------------------   GoShiip  ----------------------------------------------------
#[actix_web::test]
async fn couriers_are_relayed_as_is() {
    let server = MockServer::start().await;
    let upstream = json!({"status": true, "data": [{"name": "gig"}, {"name": "kwik"}]});
    Mock::given(method("GET"))
        .and(path("/shipments/courier-partners/"))
        .and(query_param("type", "local"))
        .and(header("Authorization", "Bearer goshiip-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream.clone()))
        .expect(1)
        .mount(&server)
        .await;
    let (status, body) = send(TestRequest::get().uri("/couriers?type=local"), goshiip(&server)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, upstream);
}

#[actix_web::test]
async fn couriers_need_a_type() {
    let server = MockServer::start().await;
    let (status, body) = send(TestRequest::get().uri("/couriers"), goshiip(&server)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Type query parameter is required.");
}

#[actix_web::test]
async fn rates_use_the_standard_parcel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tariffs/getpricesingle/gig"))
        .and(body_partial_json(
            json!({"type": "local", "parcels": {"weight": 5, "length": 10, "width": 10, "height": 5}}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true, "data": {"amount": 450000}})))
        .expect(1)
        .mount(&server)
        .await;
    let req = TestRequest::post().uri("/rates").set_json(rate_request());
    let (status, body) = send(req, goshiip(&server)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Rates fetched successfully");
    assert_eq!(body["data"]["data"]["amount"], 450000);
}

#[actix_web::test]
async fn rate_limits_are_passed_on() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tariffs/getpricesingle/gig"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"message": "Too many requests"})))
        .mount(&server)
        .await;
    let req = TestRequest::post().uri("/rates").set_json(rate_request());
    let (status, body) = send(req, goshiip(&server)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["message"], "Rate limit exceeded");
    assert_eq!(body["error"]["message"], "Too many requests");
}

#[actix_web::test]
async fn rates_check_the_buyer_phone_number() {
    let server = MockServer::start().await;
    let mut request = rate_request();
    request["toAddress"]["phone"] = json!("+234803123");
    let req = TestRequest::post().uri("/rates").set_json(request);
    let (status, body) = send(req, goshiip(&server)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid phone number. Please enter 11 digits starting with 0.");
}

#[actix_web::test]
async fn unknown_shipments_are_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shipment/track/SHP-404"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": false, "message": "Shipment not found"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shipment/track/SHP-8812"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": true, "message": "Shipment in transit", "data": {"stage": "pickup"}})),
        )
        .mount(&server)
        .await;
    let (status, body) = send(TestRequest::get().uri("/track-shipment/SHP-404"), goshiip(&server)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Shipment not found");
    let (status, body) = send(TestRequest::get().uri("/track-shipment/SHP-8812"), goshiip(&server)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Shipment in transit");
    assert_eq!(body["data"]["stage"], "pickup");
}

#[actix_web::test]
async fn tracking_without_a_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shipment/track/SHP-77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": false, "message": null})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shipment/track/SHP-78"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true, "message": null, "data": {}})))
        .mount(&server)
        .await;
    let (status, body) = send(TestRequest::get().uri("/track-shipment/SHP-77"), goshiip(&server)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Shipment SHP-77 was not found");
    let (status, body) = send(TestRequest::get().uri("/track-shipment/SHP-78"), goshiip(&server)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Shipment tracked successfully");
}

//----------------------------------------------   Paystack  ----------------------------------------------------
#[actix_web::test]
async fn subaccount_for_an_unknown_bank() {
    let server = MockServer::start().await;
    mount_banks(&server).await;
    let req = TestRequest::post().uri("/payment/subaccount").set_json(json!({
        "businessName": "Ada's Fans",
        "bankName": "Bank of Atlantis",
        "accountNumber": "0123456789"
    }));
    let (status, body) = send(req, paystack(&server)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Bank not found. Please check the bank name.");
}

#[actix_web::test]
async fn subaccount_uses_the_bank_code() {
    let server = MockServer::start().await;
    mount_banks(&server).await;
    let upstream = json!({"status": true, "message": "Subaccount created", "data": {"subaccount_code": "ACCT_abc"}});
    Mock::given(method("POST"))
        .and(path("/subaccount"))
        .and(body_partial_json(json!({"bank_code": "044", "account_number": "0123456789", "percentage_charge": 20.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream.clone()))
        .expect(1)
        .mount(&server)
        .await;
    let req = TestRequest::post().uri("/payment/subaccount").set_json(json!({
        "businessName": "Ada's Fans",
        "bankName": "access bank",
        "accountNumber": "0123456789"
    }));
    let (status, body) = send(req, paystack(&server)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, upstream);
}

#[actix_web::test]
async fn initialize_transaction_needs_all_fields() {
    let server = MockServer::start().await;
    let req = TestRequest::post()
        .uri("/payment/initialize-transaction")
        .set_json(json!({"email": "ada1@example.com", "amount": 2500000}));
    let (status, body) = send(req, paystack(&server)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Required fields are missing: email, amount, sellerSubaccount");
}

#[actix_web::test]
async fn initialize_transaction_failure_is_relayed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transaction/initialize"))
        .and(body_partial_json(json!({"subaccount": "ACCT_abc", "bearer": "subaccount", "metadata": {"order_id": 21}})))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"status": false, "message": "Invalid subaccount"})),
        )
        .mount(&server)
        .await;
    let req = TestRequest::post().uri("/payment/initialize-transaction").set_json(json!({
        "email": "ada1@example.com",
        "amount": 2500000,
        "sellerSubaccount": "ACCT_abc",
        "metadata": {"orderId": 21, "rateId": "rate-abc", "redisKey": "redis-xyz"}
    }));
    let (status, body) = send(req, paystack(&server)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to initialize transaction");
    assert_eq!(body["error"]["message"], "Invalid subaccount");
}
