use std::sync::Arc;

use log::*;
use mkt_common::Secret;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    multipart::Form,
    Client,
    Method,
    Response,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::GatewayApiError;

/// A JSON REST client bound to one provider's base URL. When a bearer token is given it is sent with every request.
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    client: Arc<Client>,
}

impl RestClient {
    pub fn new(base_url: &str, bearer: Option<&Secret<String>>) -> Result<Self, GatewayApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        if let Some(token) = bearer {
            let val = HeaderValue::from_str(&format!("Bearer {}", token.reveal()))
                .map_err(|e| GatewayApiError::Initialization(e.to_string()))?;
            headers.insert(AUTHORIZATION, val);
        }
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GatewayApiError::Initialization(e.to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self { base_url, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, GatewayApiError> {
        self.rest_query_with_status(method, path, params, body).await.map(|(_, v)| v)
    }

    /// As [`Self::rest_query`], but also returns the (successful) HTTP status code.
    pub async fn rest_query_with_status<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<(u16, T), GatewayApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| GatewayApiError::RestResponseError(e.to_string()))?;
        parse_response(response).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, GatewayApiError> {
        let url = self.url(path);
        trace!("Sending multipart upload: {url}");
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| GatewayApiError::RestResponseError(e.to_string()))?;
        parse_response(response).await.map(|(_, v)| v)
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<(u16, T), GatewayApiError> {
    let status = response.status().as_u16();
    if response.status().is_success() {
        trace!("REST query successful. {status}");
        let value = response.json::<T>().await.map_err(|e| GatewayApiError::JsonError(e.to_string()))?;
        Ok((status, value))
    } else {
        let message = response.text().await.map_err(|e| GatewayApiError::RestResponseError(e.to_string()))?;
        debug!("REST query failed. {status}: {message}");
        let body = serde_json::from_str::<Value>(&message).ok();
        Err(GatewayApiError::QueryError { status, message, body })
    }
}
