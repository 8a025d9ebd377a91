use medmarket_core::model::{AddToCart, CartItem, Id};
use medmarket_core::pricing::{self, CartGroups, CheckoutSummary};

use crate::client::MarketClient;
use crate::error::ApiResult;

/// Client-side copy of the hospital's cart, refreshed after every change.
#[derive(Debug, Default)]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    pub async fn load(client: &MarketClient) -> ApiResult<Self> {
        let mut cart = Self::default();
        cart.refresh(client).await?;
        Ok(cart)
    }

    /// Refetch the cart. A 404 from the backend means there is no cart yet.
    pub async fn refresh(&mut self, client: &MarketClient) -> ApiResult<()> {
        self.items = match client.cart().await {
            Ok(items) => items,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load cart");
                return Err(e);
            }
        };
        Ok(())
    }

    pub async fn add(&mut self, client: &MarketClient, item: &AddToCart) -> ApiResult<()> {
        client.add_to_cart(item).await?;
        self.refresh(client).await
    }

    pub async fn remove(&mut self, client: &MarketClient, item_id: Id) -> ApiResult<()> {
        client.remove_cart_item(item_id).await?;
        self.refresh(client).await
    }

    pub async fn clear(&mut self, client: &MarketClient) -> ApiResult<()> {
        match client.clear_cart().await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        self.items.clear();
        Ok(())
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all items.
    pub fn count(&self) -> u64 {
        pricing::cart_count(&self.items)
    }

    pub fn groups(&self) -> CartGroups<'_> {
        pricing::group_cart_items(&self.items)
    }

    pub fn summary(&self, delivery_fee: Option<f64>) -> CheckoutSummary {
        pricing::checkout_summary(&self.items, delivery_fee)
    }
}
