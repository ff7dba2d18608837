// src/services/pricing.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::{common::error::AppError, models::cart_item::PriceQuote};

/// Fonte de preço para itens adicionados sem preço explícito.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn quote(&self, customer_id: i64, product_id: i64, quantity: i32) -> Result<PriceQuote, AppError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PricingRequest {
    customer_id: i64,
    product_id: i64,
    quantity: i32,
}

/// Cliente do serviço de preços (POST {base}/pricing/run). Sem retry.
#[derive(Clone)]
pub struct PricingClient {
    client: Client,
    base_url: String,
}

impl PricingClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .build()
            .map_err(|e| AppError::InternalServerError(e.into()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PriceSource for PricingClient {
    async fn quote(&self, customer_id: i64, product_id: i64, quantity: i32) -> Result<PriceQuote, AppError> {
        let url = format!("{}/pricing/run", self.base_url);
        let body = PricingRequest { customer_id, product_id, quantity };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            tracing::warn!("Serviço de preços não respondeu: {}", e);
            AppError::UpstreamUnavailable(format!("pricing: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Serviço de preços retornou {}", status);
            return Err(AppError::UpstreamUnavailable(format!("pricing: status {}", status)));
        }

        response
            .json::<PriceQuote>()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("pricing: resposta inválida: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn quote_posts_request_and_parses_price() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/pricing/run")
                    .json_body(json!({ "customerId": 701546, "productId": 123456, "quantity": 10 }));
                then.status(200)
                    .json_body(json!({ "price": 150.0, "consumerPrice": 180.5, "ipi": 7.5 }));
            })
            .await;

        let client = PricingClient::new(server.base_url(), Duration::from_secs(5)).unwrap();
        let quote = client.quote(701546, 123456, 10).await.unwrap();

        mock.assert_async().await;
        assert_eq!(quote.price, Decimal::new(150, 0));
        assert_eq!(quote.consumer_price, Some(Decimal::new(1805, 1)));
        assert_eq!(quote.st, None);
    }

    #[tokio::test]
    async fn server_error_maps_to_upstream_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/pricing/run");
                then.status(500);
            })
            .await;

        let client = PricingClient::new(server.base_url(), Duration::from_secs(5)).unwrap();
        let result = client.quote(1, 1, 1).await;

        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/pricing/run");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(json!({ "price": 1.0 }));
            })
            .await;

        let client = PricingClient::new(server.base_url(), Duration::from_millis(100)).unwrap();
        let result = client.quote(1, 1, 1).await;

        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }
}
