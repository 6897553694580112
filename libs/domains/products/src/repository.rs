use async_trait::async_trait;
use database::DatabaseError;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, PageRequest, Product, ProductChanges, ProductPage};

/// Name of the unique constraint PostgreSQL generates for `products.sku`
pub const SKU_CONSTRAINT: &str = "products_sku_key";

/// Repository trait for Product persistence
///
/// Constraint failures surface as [`ProductError::Database`] carrying an
/// already classified [`DatabaseError`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product; the id is assigned by the store
    async fn create(&self, input: NewProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    /// One page of products ordered by id ascending
    async fn list(&self, page: PageRequest) -> ProductResult<ProductPage>;

    /// Write only the provided fields
    async fn update(&self, id: i32, changes: ProductChanges) -> ProductResult<Product>;

    /// Hard delete
    async fn delete(&self, id: i32) -> ProductResult<()>;
}

#[derive(Debug, Default)]
struct Store {
    rows: BTreeMap<i32, Product>,
    last_id: i32,
}

/// In-memory store with the same constraints as the `products` table.
///
/// Writes happen under one lock and only once every check passes, so a failed
/// write leaves the store untouched.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// `NUMERIC(10, 2)` holds at most eight integer digits
fn check_price(price: Decimal) -> Result<(), DatabaseError> {
    if price.abs() >= Decimal::new(100_000_000, 0) {
        return Err(DatabaseError::DataFormat(
            "numeric field overflow".to_string(),
        ));
    }
    Ok(())
}

fn check_sku(store: &Store, sku: &str, except: Option<i32>) -> Result<(), DatabaseError> {
    let taken = store
        .rows
        .values()
        .any(|p| p.sku == sku && Some(p.id) != except);
    if taken {
        return Err(DatabaseError::UniqueViolation {
            constraint: Some(SKU_CONSTRAINT.to_string()),
            message: format!("duplicate key value violates unique constraint \"{SKU_CONSTRAINT}\""),
        });
    }
    Ok(())
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let mut store = self.store.write().await;

        check_price(input.price)?;
        check_sku(&store, &input.sku, None)?;

        store.last_id += 1;
        let product = Product::from_new(store.last_id, input);
        store.rows.insert(product.id, product.clone());

        info!(product_id = product.id, sku = %product.sku, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        Ok(self.store.read().await.rows.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> ProductResult<ProductPage> {
        let store = self.store.read().await;

        let items = store
            .rows
            .values()
            .skip(
                page.offset()
                    .and_then(|offset| usize::try_from(offset).ok())
                    .unwrap_or(usize::MAX),
            )
            .take(page.limit as usize)
            .cloned()
            .collect();

        Ok(ProductPage::new(items, store.rows.len() as u64, page.limit))
    }

    async fn update(&self, id: i32, changes: ProductChanges) -> ProductResult<Product> {
        let mut store = self.store.write().await;

        let mut product = store
            .rows
            .get(&id)
            .cloned()
            .ok_or(ProductError::NotFound(id))?;

        if let Some(price) = changes.price {
            check_price(price)?;
        }
        if let Some(sku) = changes.sku.as_deref() {
            check_sku(&store, sku, Some(id))?;
        }

        product.apply_changes(changes);
        store.rows.insert(id, product.clone());

        info!(product_id = id, "Updated product");
        Ok(product)
    }

    async fn delete(&self, id: i32) -> ProductResult<()> {
        let mut store = self.store.write().await;

        store.rows.remove(&id).ok_or(ProductError::NotFound(id))?;

        info!(product_id = id, "Deleted product");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductCategory;

    fn new_product(sku: &str) -> NewProduct {
        NewProduct {
            name: "Widget".to_string(),
            category: ProductCategory::Electronics,
            quantity: 10,
            price: Decimal::new(999, 2),
            sku: sku.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let repo = InMemoryProductRepository::new();

        let first = repo.create(new_product("SKU-1")).await.unwrap();
        let second = repo.create(new_product("SKU-2")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.get_by_id(1).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_duplicate_sku_is_unique_violation() {
        let repo = InMemoryProductRepository::new();
        repo.create(new_product("WID-001")).await.unwrap();

        let err = repo.create(new_product("WID-001")).await.unwrap_err();

        assert!(matches!(
            err,
            ProductError::Database(DatabaseError::UniqueViolation { ref constraint, .. })
                if constraint.as_deref() == Some(SKU_CONSTRAINT)
        ));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryProductRepository::new();
        repo.create(new_product("SKU-1")).await.unwrap();
        repo.delete(1).await.unwrap();

        let product = repo.create(new_product("SKU-2")).await.unwrap();
        assert_eq!(product.id, 2);
    }

    #[tokio::test]
    async fn test_list_pages_in_id_order() {
        let repo = InMemoryProductRepository::new();
        for i in 1..=12 {
            repo.create(new_product(&format!("SKU-{i:02}"))).await.unwrap();
        }

        let page = repo.list(PageRequest::new(Some(2), Some(5))).await.unwrap();

        let ids: Vec<i32> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![6, 7, 8, 9, 10]);
        assert_eq!(page.total, 12);
        assert_eq!(page.total_pages, 3);

        let beyond = repo.list(PageRequest::new(Some(9), Some(5))).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 12);

        let huge = repo.list(PageRequest::new(Some(i64::MAX), Some(5))).await.unwrap();
        assert!(huge.items.is_empty());
        assert_eq!(huge.total_pages, 3);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryProductRepository::new();

        let err = repo
            .update(99, ProductChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::NotFound(99)));
    }

    #[tokio::test]
    async fn test_update_to_own_sku_is_allowed() {
        let repo = InMemoryProductRepository::new();
        repo.create(new_product("WID-001")).await.unwrap();

        let updated = repo
            .update(
                1,
                ProductChanges {
                    sku: Some("WID-001".into()),
                    quantity: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.quantity, 3);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_row_untouched() {
        let repo = InMemoryProductRepository::new();
        repo.create(new_product("SKU-1")).await.unwrap();
        let original = repo.create(new_product("SKU-2")).await.unwrap();

        let err = repo
            .update(
                2,
                ProductChanges {
                    name: Some("Renamed".into()),
                    sku: Some("SKU-1".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProductError::Database(DatabaseError::UniqueViolation { .. })
        ));
        assert_eq!(repo.get_by_id(2).await.unwrap(), Some(original));
    }

    #[tokio::test]
    async fn test_price_overflow_is_data_format() {
        let repo = InMemoryProductRepository::new();
        let mut input = new_product("BIG-1");
        input.price = Decimal::new(100_000_000, 0);

        let err = repo.create(input).await.unwrap_err();
        assert!(matches!(
            err,
            ProductError::Database(DatabaseError::DataFormat(_))
        ));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = InMemoryProductRepository::new();
        assert!(matches!(
            repo.delete(5).await.unwrap_err(),
            ProductError::NotFound(5)
        ));
    }
}
