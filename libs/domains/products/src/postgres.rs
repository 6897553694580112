use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    TransactionError, TransactionTrait,
};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{NewProduct, PageRequest, Product, ProductChanges, ProductPage},
    repository::ProductRepository,
};

/// PostgreSQL repository. Every write runs in its own transaction.
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn from_transaction(err: TransactionError<ProductError>) -> ProductError {
    match err {
        TransactionError::Connection(e) => e.into(),
        TransactionError::Transaction(e) => e,
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let model = self
            .db
            .transaction::<_, entity::Model, ProductError>(|txn| {
                Box::pin(async move {
                    let active_model: entity::ActiveModel = input.into();
                    Ok(active_model.insert(txn).await?)
                })
            })
            .await
            .map_err(from_transaction)?;

        tracing::info!(product_id = model.id, sku = %model.sku, "Created product");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self, page: PageRequest) -> ProductResult<ProductPage> {
        let paginator = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .paginate(&self.db, page.limit);

        let total = paginator.num_items().await?;

        // Pages past the end are empty; skip the query so the offset never overflows.
        let items = match page.offset() {
            Some(offset) if offset < total => paginator
                .fetch_page(page.page - 1)
                .await?
                .into_iter()
                .map(Into::into)
                .collect(),
            _ => Vec::new(),
        };

        Ok(ProductPage::new(items, total, page.limit))
    }

    async fn update(&self, id: i32, changes: ProductChanges) -> ProductResult<Product> {
        let model = self
            .db
            .transaction::<_, entity::Model, ProductError>(|txn| {
                Box::pin(async move {
                    let existing = entity::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or(ProductError::NotFound(id))?;

                    if changes.is_empty() {
                        return Ok(existing);
                    }

                    entity::ActiveModel::from_changes(id, changes)
                        .update(txn)
                        .await
                        .map_err(|e| match e {
                            DbErr::RecordNotUpdated => ProductError::NotFound(id),
                            other => other.into(),
                        })
                })
            })
            .await
            .map_err(from_transaction)?;

        tracing::info!(product_id = id, "Updated product");
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> ProductResult<()> {
        let result = self
            .db
            .transaction::<_, _, ProductError>(|txn| {
                Box::pin(async move { Ok(entity::Entity::delete_by_id(id).exec(txn).await?) })
            })
            .await
            .map_err(from_transaction)?;

        if result.rows_affected == 0 {
            return Err(ProductError::NotFound(id));
        }

        tracing::info!(product_id = id, "Deleted product");
        Ok(())
    }
}
