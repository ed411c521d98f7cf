//! # Product Gateways
//!
//! The only way price and delivery data enter the pipeline.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get(["SW1", "SW2", "SW3"], context)                                    │
//! │       │                                                                 │
//! │       ├── Ok({ "SW1": ... })        SW2, SW3 unknown: simply omitted    │
//! │       │                                                                 │
//! │       └── Err(GatewayError)         backend down: whole request fails   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One call per batch. Implementations backed by a database or a remote
//! service must answer the whole batch in that one call.

use crate::context::ShopContext;
use crate::delivery::{DeliveryInformation, DeliveryInformationCollection};
use crate::error::GatewayError;
use crate::price::{PriceDefinition, PriceDefinitionCollection};

/// Looks up price definitions for a batch of product identifiers.
pub trait PriceGateway: Send + Sync {
    fn get(
        &self,
        identifiers: &[String],
        context: &ShopContext,
    ) -> Result<PriceDefinitionCollection, GatewayError>;
}

/// Looks up delivery information for a batch of product identifiers.
pub trait DeliveryGateway: Send + Sync {
    fn get(
        &self,
        identifiers: &[String],
        context: &ShopContext,
    ) -> Result<DeliveryInformationCollection, GatewayError>;
}

// =============================================================================
// In-Memory Gateways
// =============================================================================

/// Price gateway over a fixed set of price definitions.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceGateway {
    prices: PriceDefinitionCollection,
}

impl StaticPriceGateway {
    pub fn new() -> Self {
        StaticPriceGateway::default()
    }

    pub fn with_price(mut self, identifier: impl Into<String>, definition: PriceDefinition) -> Self {
        self.prices.insert(identifier.into(), definition);
        self
    }
}

impl From<PriceDefinitionCollection> for StaticPriceGateway {
    fn from(prices: PriceDefinitionCollection) -> Self {
        StaticPriceGateway { prices }
    }
}

impl PriceGateway for StaticPriceGateway {
    fn get(
        &self,
        identifiers: &[String],
        _context: &ShopContext,
    ) -> Result<PriceDefinitionCollection, GatewayError> {
        Ok(identifiers
            .iter()
            .filter_map(|id| self.prices.get(id).map(|def| (id.clone(), def.clone())))
            .collect())
    }
}

/// Delivery gateway over a fixed set of delivery information.
#[derive(Debug, Clone, Default)]
pub struct StaticDeliveryGateway {
    information: DeliveryInformationCollection,
}

impl StaticDeliveryGateway {
    pub fn new() -> Self {
        StaticDeliveryGateway::default()
    }

    pub fn with_information(
        mut self,
        identifier: impl Into<String>,
        information: DeliveryInformation,
    ) -> Self {
        self.information.insert(identifier.into(), information);
        self
    }
}

impl From<DeliveryInformationCollection> for StaticDeliveryGateway {
    fn from(information: DeliveryInformationCollection) -> Self {
        StaticDeliveryGateway { information }
    }
}

impl DeliveryGateway for StaticDeliveryGateway {
    fn get(
        &self,
        identifiers: &[String],
        _context: &ShopContext,
    ) -> Result<DeliveryInformationCollection, GatewayError> {
        Ok(identifiers
            .iter()
            .filter_map(|id| self.information.get(id).map(|info| (id.clone(), info.clone())))
            .collect())
    }
}
