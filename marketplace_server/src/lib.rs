//! # Marketplace server
//! This crate hosts the HTTP API of the marketplace. It is responsible for:
//! * Authenticating users and admins with bearer tokens, and enforcing role-based access on protected routes.
//! * Exposing the engine's account, product, order and notification APIs as JSON routes.
//! * Relaying payment requests to Paystack and shipping requests to GoShiip.
//! * Running the checkout flow that reconciles a payment with its order and books the shipment.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! `/` and `/health` are plain-text liveness checks. Everything else lives under `/api`; see
//! [routes](routes/index.html)
//! for the handlers. Every JSON response uses the [`JsonResponse`](data_objects::JsonResponse) envelope.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod mailer;
pub mod middleware;
pub mod multipart;
pub mod routes;
pub mod server;
pub mod validation;
