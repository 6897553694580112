use rust_decimal::Decimal;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};

/// Largest page size a list request can ask for
pub const MAX_PAGE_LIMIT: u64 = 100;
pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_LIMIT: u64 = 5;

/// Product category. Spelling is exact and case-sensitive everywhere.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ProductCategory {
    #[sea_orm(string_value = "Electronics")]
    Electronics,
    #[sea_orm(string_value = "Clothing")]
    Clothing,
    #[sea_orm(string_value = "Grocery")]
    Grocery,
    #[sea_orm(string_value = "Furniture")]
    Furniture,
    #[sea_orm(string_value = "Stationery")]
    Stationery,
}

/// A stored product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub category: ProductCategory,
    pub quantity: i32,
    /// Two decimal places, serialized as a JSON number
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 9.99)]
    pub price: Decimal,
    pub sku: String,
}

/// Request body of create and update, as documented in OpenAPI.
///
/// Bodies are read as raw JSON and checked by [`crate::validation`]; create
/// requires every field, update accepts any subset.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Widget",
    "category": "Electronics",
    "quantity": 10,
    "price": 9.99,
    "sku": "WID-001"
}))]
pub struct ProductPayload {
    #[schema(min_length = 2, max_length = 100)]
    pub name: String,
    pub category: ProductCategory,
    #[schema(minimum = 0)]
    pub quantity: i32,
    #[schema(minimum = 0.01)]
    pub price: f64,
    #[schema(min_length = 4, max_length = 20)]
    pub sku: String,
}

/// Validated input for a create
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: ProductCategory,
    pub quantity: i32,
    pub price: Decimal,
    pub sku: String,
}

/// Validated partial input for an update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub category: Option<ProductCategory>,
    pub quantity: Option<i32>,
    pub price: Option<Decimal>,
    pub sku: Option<String>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
            && self.sku.is_none()
    }
}

impl Product {
    pub fn from_new(id: i32, input: NewProduct) -> Self {
        Self {
            id,
            name: input.name,
            category: input.category,
            quantity: input.quantity,
            price: input.price,
            sku: input.sku,
        }
    }

    pub fn apply_changes(&mut self, changes: ProductChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(sku) = changes.sku {
            self.sku = sku;
        }
    }
}

/// Raw `page`/`limit` query values.
///
/// Kept as strings so unparsable values fall back to the defaults instead of
/// rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-based page number (default 1)
    #[param(value_type = Option<u64>)]
    pub page: Option<String>,
    /// Page size (default 5, at most 100)
    #[param(value_type = Option<u64>)]
    pub limit: Option<String>,
}

impl ListQuery {
    /// Builds the query from decoded key/value pairs. The first value of a
    /// repeated key wins and other keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// Normalized pagination request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Clamps raw values: `page < 1` becomes 1, `limit < 1` becomes the
    /// default and `limit` never exceeds [`MAX_PAGE_LIMIT`].
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p as u64,
            _ => DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(l) if l >= 1 => (l as u64).min(MAX_PAGE_LIMIT),
            _ => DEFAULT_PAGE_LIMIT,
        };
        Self { page, limit }
    }

    /// Rows to skip before this page, or `None` when that overflows `u64`
    pub fn offset(&self) -> Option<u64> {
        (self.page - 1).checked_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl From<ListQuery> for PageRequest {
    fn from(query: ListQuery) -> Self {
        let parse = |raw: Option<String>| raw.and_then(|v| v.trim().parse::<i64>().ok());
        Self::new(parse(query.page), parse(query.limit))
    }
}

/// One page of products plus totals
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: u64,
    pub total_pages: u64,
}

impl ProductPage {
    pub fn new(items: Vec<Product>, total: u64, limit: u64) -> Self {
        Self {
            items,
            total,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// Body of `GET /products`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    /// Always `"success"`
    pub status: String,
    pub page: u64,
    pub limit: u64,
    pub total_products: u64,
    pub total_pages: u64,
    pub data: Vec<Product>,
}

impl ProductListResponse {
    pub fn new(request: PageRequest, page: ProductPage) -> Self {
        Self {
            status: "success".to_string(),
            page: request.page,
            limit: request.limit,
            total_products: page.total,
            total_pages: page.total_pages,
            data: page.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_spelling_is_exact() {
        assert_eq!(ProductCategory::Stationery.to_string(), "Stationery");
        assert_eq!(
            ProductCategory::from_str("Electronics").unwrap(),
            ProductCategory::Electronics
        );
        assert!(ProductCategory::from_str("electronics").is_err());
        assert_eq!(
            serde_json::to_value(ProductCategory::Grocery).unwrap(),
            serde_json::json!("Grocery")
        );
    }

    #[test]
    fn test_price_serializes_as_number() {
        let product = Product {
            id: 1,
            name: "Widget".into(),
            category: ProductCategory::Electronics,
            quantity: 3,
            price: Decimal::new(999, 2),
            sku: "WID-001".into(),
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["price"], serde_json::json!(9.99));
        assert_eq!(value["id"], serde_json::json!(1));
    }

    #[test]
    fn test_page_request_defaults_and_clamping() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 5 });
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 5 });
        assert_eq!(PageRequest::new(Some(-3), Some(-1)), PageRequest { page: 1, limit: 5 });
        assert_eq!(PageRequest::new(Some(2), Some(500)), PageRequest { page: 2, limit: 100 });
        assert_eq!(PageRequest::new(Some(3), Some(5)).offset(), Some(10));
        assert_eq!(PageRequest::new(Some(i64::MAX), Some(5)).offset(), None);
    }

    #[test]
    fn test_page_request_from_unparsable_query() {
        let query = ListQuery {
            page: Some("two".into()),
            limit: Some("7".into()),
        };
        assert_eq!(PageRequest::from(query), PageRequest { page: 1, limit: 7 });
    }

    #[test]
    fn test_list_query_keeps_first_value_per_key() {
        let pairs = [
            ("page", "2"),
            ("page", "3"),
            ("sort", "name"),
            ("limit", "10"),
        ]
        .map(|(k, v)| (k.to_string(), v.to_string()));

        let query = ListQuery::from_pairs(pairs);

        assert_eq!(
            query,
            ListQuery {
                page: Some("2".into()),
                limit: Some("10".into()),
            }
        );
        assert_eq!(PageRequest::from(query), PageRequest { page: 2, limit: 10 });
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(ProductPage::new(vec![], 0, 5).total_pages, 0);
        assert_eq!(ProductPage::new(vec![], 12, 5).total_pages, 3);
        assert_eq!(ProductPage::new(vec![], 10, 5).total_pages, 2);
    }

    #[test]
    fn test_apply_changes_only_touches_provided_fields() {
        let mut product = Product {
            id: 7,
            name: "Desk".into(),
            category: ProductCategory::Furniture,
            quantity: 1,
            price: Decimal::new(15000, 2),
            sku: "DESK-01".into(),
        };
        let before = product.clone();

        product.apply_changes(ProductChanges {
            quantity: Some(4),
            ..Default::default()
        });

        assert_eq!(product.quantity, 4);
        assert_eq!(product.name, before.name);
        assert_eq!(product.price, before.price);
        assert_eq!(product.sku, before.sku);
    }
}
