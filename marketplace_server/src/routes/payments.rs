//! Orders, payments and the checkout flow.
//!
//! The Paystack routes are thin relays: they check their input, call Paystack and hand the upstream response back
//! unchanged. `/verify-transaction/{reference}` drives the full reconciliation flow in [`CheckoutFlowApi`].
use actix_web::{web, HttpResponse};
use gateway_tools::{
    paystack::{NewSubaccount, TransactionInitialization, PLATFORM_FEE_PERCENT},
    BankDirectory,
    PaystackApi,
};
use log::*;
use marketplace_engine::{
    db_types::Role,
    order_objects::NewOrderRequest,
    AccountApi,
    CheckoutDatabase,
    CheckoutFlowApi,
    CheckoutOutcome,
    LogisticsProvider,
    OrderApi,
    OrderManagement,
    PaymentProvider,
    ProductManagement,
    TransactionApi,
    TransactionManagement,
    UserManagement,
};
use serde_json::json;

use crate::{
    auth::JwtClaims,
    data_objects::{
        InitializeTransactionRequest,
        JsonResponse,
        ResolveAccountQuery,
        SubaccountRequest,
        TransactionSummary,
    },
    errors::ServerError,
    route,
    validation::is_blank,
};

//----------------------------------------------   Banks & subaccounts  --------------------------------------------
route!(banks => Get "/userProfile/banks");
pub async fn banks(directory: web::Data<BankDirectory>) -> Result<HttpResponse, ServerError> {
    let banks = directory.banks().await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Banks fetched successfully", banks)))
}

route!(resolve_account => Get "/userProfile/resolve-account");
pub async fn resolve_account(
    query: web::Query<ResolveAccountQuery>,
    paystack: web::Data<PaystackApi>,
) -> Result<HttpResponse, ServerError> {
    let ResolveAccountQuery { account_number, bank_code } = query.into_inner();
    let (account_number, bank_code) = match (account_number, bank_code) {
        (Some(n), Some(c)) if !n.trim().is_empty() && !c.trim().is_empty() => (n, c),
        _ => return Err(ServerError::ValidationError("Account number and bank name are required".into())),
    };
    let resolved = paystack.resolve_account(account_number.trim(), bank_code.trim()).await?;
    Ok(HttpResponse::Ok().json(resolved))
}

route!(seller_bank_details => Get "/payment/seller/{id}/bank-details" impl B: UserManagement);
pub async fn seller_bank_details<B: UserManagement>(
    path: web::Path<i64>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let details = api.seller_bank_details(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Bank details fetched successfully", details)))
}

route!(create_subaccount => Post "/payment/subaccount");
pub async fn create_subaccount(
    body: web::Json<SubaccountRequest>,
    directory: web::Data<BankDirectory>,
    paystack: web::Data<PaystackApi>,
) -> Result<HttpResponse, ServerError> {
    let SubaccountRequest { business_name, bank_name, account_number, percentage_charge } = body.into_inner();
    if is_blank(&business_name) || is_blank(&bank_name) || is_blank(&account_number) {
        return Err(ServerError::ValidationError("Please provide businessName, bankName and accountNumber".into()));
    }
    let bank_name = bank_name.unwrap_or_default();
    let bank = directory
        .find_by_name(&bank_name)
        .await?
        .ok_or_else(|| ServerError::failed(404, "Bank not found. Please check the bank name."))?;
    let account = NewSubaccount {
        business_name: business_name.unwrap_or_default(),
        bank_code: bank.code,
        account_number: account_number.unwrap_or_default(),
        percentage_charge: percentage_charge.unwrap_or(f64::from(PLATFORM_FEE_PERCENT)),
    };
    let created = paystack.create_subaccount(account).await.map_err(|e| {
        error!("💸️ Error creating subaccount. {e}");
        ServerError::failed_with_detail(500, "Failed to create subaccount", e.body().cloned())
    })?;
    Ok(HttpResponse::Created().json(created))
}

route!(initialize_transaction => Post "/payment/initialize-transaction");
pub async fn initialize_transaction(
    body: web::Json<InitializeTransactionRequest>,
    paystack: web::Data<PaystackApi>,
) -> Result<HttpResponse, ServerError> {
    let InitializeTransactionRequest { email, amount, seller_subaccount, metadata } = body.into_inner();
    let (email, amount, subaccount) = match (email, amount, seller_subaccount) {
        (Some(email), Some(amount), Some(subaccount))
            if !email.trim().is_empty() && amount.is_positive() && !subaccount.trim().is_empty() =>
        {
            (email, amount, subaccount)
        },
        _ => {
            return Err(ServerError::ValidationError(
                "Required fields are missing: email, amount, sellerSubaccount".into(),
            ))
        },
    };
    let tx = TransactionInitialization {
        email,
        amount,
        subaccount,
        metadata: metadata.as_ref().map(|m| m.to_gateway_metadata()),
    };
    let initialized = paystack.initialize_transaction(tx).await.map_err(|e| {
        error!("💸️ Error initializing transaction. {e}");
        let detail = e.body().cloned().unwrap_or_else(|| json!(e.to_string()));
        ServerError::failed_with_detail(500, "Failed to initialize transaction", Some(detail))
    })?;
    Ok(HttpResponse::Created().json(initialized))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders" impl B: OrderManagement + ProductManagement where requires [Role::User]);
pub async fn create_order<B: OrderManagement + ProductManagement>(
    claims: JwtClaims,
    body: web::Json<NewOrderRequest>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order = api.create(claims.id, body.into_inner()).await?;
    debug!("💻️ User #{} created order #{}", claims.id, order.id);
    Ok(HttpResponse::Created().json(JsonResponse::with_data("Order created successfully", order)))
}

route!(user_orders => Get "/orders/user/{user_id}"
    impl B: OrderManagement + ProductManagement
    where requires [Role::User]);
pub async fn user_orders<B: OrderManagement + ProductManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    if user_id != claims.id {
        warn!("💻️ User #{} tried to read the orders of user #{user_id}", claims.id);
        return Err(ServerError::InsufficientPermissions("You can only view your own orders".into()));
    }
    let orders = api.orders_for_user(user_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Orders fetched successfully", orders)))
}

//----------------------------------------------   Transactions  ----------------------------------------------------
route!(verify_transaction => Get "/verify-transaction/{reference}"
    impl B: CheckoutDatabase, P: PaymentProvider, L: LogisticsProvider);
pub async fn verify_transaction<B: CheckoutDatabase, P: PaymentProvider, L: LogisticsProvider>(
    path: web::Path<String>,
    api: web::Data<CheckoutFlowApi<B, P, L>>,
) -> Result<HttpResponse, ServerError> {
    let reference = path.into_inner();
    let outcome = api.verify_and_fulfil(&reference).await?;
    let response = match outcome {
        CheckoutOutcome::Fulfilled(report) => HttpResponse::Ok()
            .json(JsonResponse::with_data("Payment verified, shipment booked, and assignment successful.", report)),
        CheckoutOutcome::AssignmentFailed(report) => {
            warn!("🚚️ Shipment for {reference} was booked but not assigned: {}", report.assign_status);
            HttpResponse::BadRequest()
                .json(JsonResponse::failure("Shipment booked but assignment failed.", Some(json!(report))))
        },
        CheckoutOutcome::AlreadyFulfilled(order) => {
            HttpResponse::Ok().json(JsonResponse::with_data("Payment already verified and shipment booked.", order))
        },
    };
    Ok(response)
}

route!(transaction_by_reference => Get "/transaction/verify/{reference}" impl B: TransactionManagement);
pub async fn transaction_by_reference<B: TransactionManagement>(
    path: web::Path<String>,
    api: web::Data<TransactionApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let reference = path.into_inner();
    if reference.trim().is_empty() {
        return Err(ServerError::ValidationError("Reference is required".into()));
    }
    let tx = api.by_reference(reference.trim()).await?;
    let body = JsonResponse::with_data("Transaction retrieved successfully", TransactionSummary::from(tx));
    Ok(HttpResponse::Ok().json(body))
}

route!(my_transactions => Get "/transactions" impl B: TransactionManagement where requires [Role::User]);
pub async fn my_transactions<B: TransactionManagement>(
    claims: JwtClaims,
    api: web::Data<TransactionApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let txs = api.for_customer(&claims.email).await?;
    let txs = txs.into_iter().map(TransactionSummary::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(JsonResponse::with_data("Transactions retrieved successfully", txs)))
}
