//! Calculated product line item.

use serde::{Deserialize, Serialize};

use crate::delivery::DeliveryInformation;
use crate::line_item::LineItem;
use crate::price::Price;

/// A product line item with its price and delivery data resolved.
///
/// `identifier` and `quantity` always mirror the embedded `line_item`; both
/// are serialized for consumers and rebuilt from the line item on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCalculatedProduct")]
pub struct CalculatedProduct {
    identifier: String,
    quantity: i64,
    line_item: LineItem,
    price: Price,
    delivery_information: DeliveryInformation,
}

impl CalculatedProduct {
    pub fn new(line_item: LineItem, price: Price, delivery_information: DeliveryInformation) -> Self {
        CalculatedProduct {
            identifier: line_item.identifier().to_string(),
            quantity: line_item.quantity(),
            line_item,
            price,
            delivery_information,
        }
    }

    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// The line item this product was calculated from.
    #[inline]
    pub fn line_item(&self) -> &LineItem {
        &self.line_item
    }

    #[inline]
    pub fn price(&self) -> &Price {
        &self.price
    }

    #[inline]
    pub fn delivery_information(&self) -> &DeliveryInformation {
        &self.delivery_information
    }
}

#[derive(Deserialize)]
struct RawCalculatedProduct {
    line_item: LineItem,
    price: Price,
    delivery_information: DeliveryInformation,
}

impl From<RawCalculatedProduct> for CalculatedProduct {
    fn from(raw: RawCalculatedProduct) -> Self {
        CalculatedProduct::new(raw.line_item, raw.price, raw.delivery_information)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::DeliveryDate;
    use crate::money::Money;
    use crate::tax::{CalculatedTaxCollection, TaxRuleCollection};
    use chrono::{TimeZone, Utc};

    fn product() -> CalculatedProduct {
        let day = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let date = DeliveryDate::new(day, day);

        CalculatedProduct::new(
            LineItem::new("SW1", "product", 2).unwrap(),
            Price::new(
                Money::from_cents(500),
                Money::from_cents(1000),
                CalculatedTaxCollection::new(),
                TaxRuleCollection::new(),
                2,
            ),
            DeliveryInformation::new(10, 0.0, 0.0, 0.0, 1.0, date, date),
        )
    }

    #[test]
    fn test_mirrors_line_item() {
        let product = product();

        assert_eq!(product.identifier(), product.line_item().identifier());
        assert_eq!(product.quantity(), product.line_item().quantity());
    }

    #[test]
    fn test_deserialize_rebuilds_mirrored_fields() {
        let mut json = serde_json::to_value(product()).unwrap();
        assert_eq!(json["identifier"], "SW1");
        assert_eq!(json["quantity"], 2);

        json["identifier"] = "SW9".into();
        json["quantity"] = 7.into();

        let restored: CalculatedProduct = serde_json::from_value(json).unwrap();
        assert_eq!(restored.identifier(), "SW1");
        assert_eq!(restored.quantity(), 2);
        assert_eq!(restored, product());
    }
}
