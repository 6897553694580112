//! Product Service - Business logic layer

use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{PageRequest, Product, ProductPage};
use crate::repository::ProductRepository;
use crate::validation::{validate_new_product, validate_product_changes};

/// Product service providing business logic operations
///
/// Raw JSON is validated here before anything reaches the repository.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate and insert a new product
    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: &Value) -> ProductResult<Product> {
        let product = validate_new_product(input)?;
        self.repository.create(product).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, page: PageRequest) -> ProductResult<ProductPage> {
        self.repository.list(page).await
    }

    /// Validate and apply a partial update
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: i32, input: &Value) -> ProductResult<Product> {
        let changes = validate_product_changes(input)?;
        self.repository.update(id, changes).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> ProductResult<()> {
        self.repository.delete(id).await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewProduct, ProductCategory, ProductChanges};
    use crate::repository::MockProductRepository;
    use database::DatabaseError;
    use mockall::predicate::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn widget(id: i32) -> Product {
        Product {
            id,
            name: "Widget".to_string(),
            category: ProductCategory::Electronics,
            quantity: 10,
            price: Decimal::new(999, 2),
            sku: "WID-001".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_product_success() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_create()
            .withf(|input: &NewProduct| input.sku == "WID-001" && input.quantity == 10)
            .times(1)
            .returning(|input| Ok(Product::from_new(1, input)));

        let service = ProductService::new(mock_repo);
        let product = service
            .create_product(&json!({
                "name": "Widget",
                "category": "Electronics",
                "quantity": 10,
                "price": 9.99,
                "sku": "WID-001"
            }))
            .await
            .unwrap();

        assert_eq!(product, widget(1));
    }

    #[tokio::test]
    async fn test_create_product_invalid_never_reaches_repository() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let err = service
            .create_product(&json!({"name": "Widget"}))
            .await
            .unwrap_err();

        match err {
            ProductError::Validation(errors) => {
                assert!(errors.has("sku"));
                assert!(!errors.has("name"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_product_passes_storage_error_through() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().returning(|_| {
            Err(ProductError::Database(DatabaseError::UniqueViolation {
                constraint: Some("products_sku_key".into()),
                message: "duplicate".into(),
            }))
        });

        let service = ProductService::new(mock_repo);
        let err = service
            .create_product(&json!({
                "name": "Widget",
                "category": "Electronics",
                "quantity": 1,
                "price": 1,
                "sku": "WID-001"
            }))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProductError::Database(DatabaseError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(4))
            .returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        assert!(matches!(
            service.get_product(4).await.unwrap_err(),
            ProductError::NotFound(4)
        ));
    }

    #[tokio::test]
    async fn test_update_product_sends_only_provided_fields() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_update()
            .withf(|id, changes: &ProductChanges| {
                *id == 1
                    && changes.quantity == Some(25)
                    && changes.name.is_none()
                    && changes.price.is_none()
            })
            .times(1)
            .returning(|id, changes| {
                let mut product = widget(id);
                product.apply_changes(changes);
                Ok(product)
            });

        let service = ProductService::new(mock_repo);
        let product = service
            .update_product(1, &json!({"quantity": 25}))
            .await
            .unwrap();

        assert_eq!(product.quantity, 25);
        assert_eq!(product.name, "Widget");
    }

    #[tokio::test]
    async fn test_list_products_forwards_page() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_list()
            .with(eq(PageRequest { page: 2, limit: 5 }))
            .returning(|page| Ok(ProductPage::new(vec![widget(6)], 12, page.limit)));

        let service = ProductService::new(mock_repo);
        let page = service
            .list_products(PageRequest::new(Some(2), Some(5)))
            .await
            .unwrap();

        assert_eq!(page.total, 12);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn test_delete_product_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_delete()
            .with(eq(9))
            .returning(|id| Err(ProductError::NotFound(id)));

        let service = ProductService::new(mock_repo);
        assert!(matches!(
            service.delete_product(9).await.unwrap_err(),
            ProductError::NotFound(9)
        ));
    }
}
