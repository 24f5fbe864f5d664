//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    content::ContentStoreClient,
    orders::{
        errors::OrdersServiceError,
        models::{NewOrder, OrderId},
    },
};

#[derive(Debug, Clone)]
pub struct ContentStoreOrdersService {
    client: ContentStoreClient,
}

impl ContentStoreOrdersService {
    #[must_use]
    pub fn new(client: ContentStoreClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrdersService for ContentStoreOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(transaction_id = %order.transaction_id),
        err
    )]
    async fn create_order(&self, order: NewOrder) -> Result<OrderId, OrdersServiceError> {
        let document = serde_json::to_value(&order).map_err(OrdersServiceError::Encode)?;

        let id = self.client.create(document).await?;

        info!(order_id = %id, "created order");

        Ok(id)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Record a completed order, returning its id.
    async fn create_order(&self, order: NewOrder) -> Result<OrderId, OrdersServiceError>;
}
