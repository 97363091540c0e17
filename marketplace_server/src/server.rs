use std::{sync::Arc, time::Duration};

use actix_cors::Cors;
use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use gateway_tools::{BankDirectory, CloudinaryApi, GoshiipApi, PaystackApi};
use log::*;
use marketplace_engine::{
    AccountApi,
    CheckoutFlowApi,
    NotificationApi,
    OrderApi,
    ProductApi,
    ShippingPlatform,
    SqliteDatabase,
    TransactionApi,
};

use crate::{
    auth::{TokenIssuer, TokenVerifier},
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    integrations::{GoshiipLogistics, PaystackPayments},
    mailer::SmtpMailer,
    middleware::JwtAuthMiddlewareFactory,
    routes::{
        accounts::*,
        health,
        index,
        logistics::*,
        notifications::*,
        payments::*,
        products::*,
    },
};

type Checkout = CheckoutFlowApi<SqliteDatabase, PaystackPayments, GoshiipLogistics>;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::BackendError(e.to_string()))
}

/// Third-party clients are built once and shared by every worker.
#[derive(Clone)]
struct Gateways {
    paystack: PaystackApi,
    banks: BankDirectory,
    goshiip: GoshiipApi,
    cloudinary: CloudinaryApi,
    mailer: SmtpMailer,
}

impl Gateways {
    fn new(config: &ServerConfig) -> Result<Self, ServerError> {
        let init = |e: gateway_tools::GatewayApiError| ServerError::InitializeError(e.to_string());
        let paystack = PaystackApi::new(config.paystack.clone()).map_err(init)?;
        let banks = BankDirectory::new(paystack.clone());
        let goshiip = GoshiipApi::new(&config.goshiip).map_err(init)?;
        let cloudinary = CloudinaryApi::new(config.cloudinary.clone()).map_err(init)?;
        let mailer = SmtpMailer::new(&config.email).map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Ok(Self { paystack, banks, goshiip, cloudinary, mailer })
    }
}

fn cors(origins: &[String]) -> Cors {
    let cors = Cors::default().allow_any_method().allow_any_header().supports_credentials().max_age(3600);
    if origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }
    origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let gateways = Gateways::new(&config)?;
    let verifier = Arc::new(TokenVerifier::new(&config.auth));
    let options = ServerOptions::from_config(&config);
    let platform = ShippingPlatform::new(config.goshiip.platform_user_id.clone());
    info!("💻️ Allowing cross-origin requests from {:?}", config.cors_origins);
    let srv = HttpServer::new(move || {
        let accounts_api = AccountApi::new(db.clone());
        let products_api = ProductApi::new(db.clone());
        let orders_api = OrderApi::new(db.clone());
        let transactions_api = TransactionApi::new(db.clone());
        let notifications_api = NotificationApi::new(db.clone());
        let checkout_api: Checkout = CheckoutFlowApi::new(
            db.clone(),
            PaystackPayments::new(gateways.paystack.clone()),
            GoshiipLogistics::new(gateways.goshiip.clone()),
            platform.clone(),
        );
        let jwt_signer = TokenIssuer::new(&config.auth);
        let api_scope = web::scope("/api")
            // Accounts
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(LogoutRoute::new())
            .service(ForgotPasswordRoute::<SqliteDatabase, SmtpMailer>::new())
            .service(ResetPasswordRoute::<SqliteDatabase>::new())
            .service(MessageProfileRoute::<SqliteDatabase>::new())
            .service(AdminLoginRoute::<SqliteDatabase>::new())
            .service(AdminDashboardRoute::<SqliteDatabase>::new())
            .service(MyProfileRoute::<SqliteDatabase>::new())
            .service(UpdateMyProfileRoute::<SqliteDatabase, CloudinaryApi>::new())
            // Products
            .service(ProductsRoute::<SqliteDatabase>::new())
            .service(CreateProductRoute::<SqliteDatabase>::new())
            .service(DonateProductRoute::<SqliteDatabase>::new())
            .service(ProductByIdRoute::<SqliteDatabase>::new())
            .service(MyProductsRoute::<SqliteDatabase>::new())
            .service(UpdateMyProductRoute::<SqliteDatabase>::new())
            .service(DeleteMyProductRoute::<SqliteDatabase>::new())
            .service(AdminProductsRoute::<SqliteDatabase>::new())
            .service(AdminProductStatusRoute::<SqliteDatabase>::new())
            .service(AdminProductRoute::<SqliteDatabase>::new())
            .service(AdminUpdateProductRoute::<SqliteDatabase, CloudinaryApi>::new())
            .service(AdminDeleteProductRoute::<SqliteDatabase>::new())
            // Payments and orders
            .service(BanksRoute::new())
            .service(ResolveAccountRoute::new())
            .service(SellerBankDetailsRoute::<SqliteDatabase>::new())
            .service(CreateSubaccountRoute::new())
            .service(InitializeTransactionRoute::new())
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(UserOrdersRoute::<SqliteDatabase>::new())
            .service(VerifyTransactionRoute::<SqliteDatabase, PaystackPayments, GoshiipLogistics>::new())
            .service(TransactionByReferenceRoute::<SqliteDatabase>::new())
            .service(MyTransactionsRoute::<SqliteDatabase>::new())
            // Logistics
            .service(CouriersRoute::new())
            .service(RatesRoute::new())
            .service(TrackShipmentRoute::new())
            .service(ShipmentsRoute::new())
            .service(CancelShipmentRoute::new())
            // Notifications
            .service(MyNotificationsRoute::<SqliteDatabase>::new())
            .service(MarkMyNotificationsReadRoute::<SqliteDatabase>::new())
            .service(CreateNotificationRoute::<SqliteDatabase>::new())
            .service(MarkMyNotificationReadRoute::<SqliteDatabase>::new())
            .service(AdminNotificationsRoute::<SqliteDatabase>::new())
            .service(MarkAdminNotificationsReadRoute::<SqliteDatabase>::new())
            .service(MarkAdminNotificationReadRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(JwtAuthMiddlewareFactory::new(Arc::clone(&verifier)))
            .wrap(cors(&config.cors_origins))
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("mkt::access_log"))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(products_api))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(transactions_api))
            .app_data(web::Data::new(notifications_api))
            .app_data(web::Data::new(checkout_api))
            .app_data(web::Data::new(jwt_signer))
            .app_data(web::Data::new(options.clone()))
            .app_data(web::Data::new(gateways.paystack.clone()))
            .app_data(web::Data::new(gateways.banks.clone()))
            .app_data(web::Data::new(gateways.goshiip.clone()))
            .app_data(web::Data::new(gateways.cloudinary.clone()))
            .app_data(web::Data::new(gateways.mailer.clone()))
            .service(index)
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
