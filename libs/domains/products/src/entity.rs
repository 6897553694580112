use crate::models::{NewProduct, Product, ProductCategory, ProductChanges};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

/// SeaORM entity for the `products` table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub category: ProductCategory,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    #[sea_orm(unique)]
    pub sku: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category: model.category,
            quantity: model.quantity,
            price: model.price,
            sku: model.sku,
        }
    }
}

impl From<NewProduct> for ActiveModel {
    fn from(input: NewProduct) -> Self {
        ActiveModel {
            id: NotSet,
            name: Set(input.name),
            category: Set(input.category),
            quantity: Set(input.quantity),
            price: Set(input.price),
            sku: Set(input.sku),
        }
    }
}

impl ActiveModel {
    /// Partial update for row `id`; only the provided columns are written.
    pub fn from_changes(id: i32, changes: ProductChanges) -> Self {
        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            model.name = Set(name);
        }
        if let Some(category) = changes.category {
            model.category = Set(category);
        }
        if let Some(quantity) = changes.quantity {
            model.quantity = Set(quantity);
        }
        if let Some(price) = changes.price {
            model.price = Set(price);
        }
        if let Some(sku) = changes.sku {
            model.sku = Set(sku);
        }
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_changes_leaves_missing_columns_unset() {
        let model = ActiveModel::from_changes(
            3,
            ProductChanges {
                quantity: Some(9),
                ..Default::default()
            },
        );

        assert_eq!(model.id, Set(3));
        assert_eq!(model.quantity, Set(9));
        assert!(model.name.is_not_set());
        assert!(model.price.is_not_set());
        assert!(model.sku.is_not_set());
    }
}
