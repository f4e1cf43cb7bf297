//! Catalog service: product listing and lifecycle management.
//!
//! [`CatalogService`] wraps a [`ProductStore`] with the catalog's business
//! rules. The two listing modes differ deliberately: `all_products` returns
//! every active product even when sold out, while `available_products`
//! additionally requires stock for stock-tracked categories.

use tracing::{info, instrument};

use crate::errors::{StoreError, WorkflowError, WorkflowResult};
use crate::product::{NewProduct, Product, ProductCategory};
use crate::store::ProductStore;
use crate::types::{Money, ProductDescription, ProductId, ProductName};

/// A full replacement of a product's mutable fields.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    /// New display name.
    pub name: ProductName,
    /// New description.
    pub description: ProductDescription,
    /// New unit price.
    pub price: Money,
    /// New catalog category.
    pub category: ProductCategory,
    /// New stored stock quantity.
    pub stock: u32,
    /// Whether the product should be active.
    pub active: bool,
}

/// Catalog operations over a product store.
#[derive(Debug)]
pub struct CatalogService<P> {
    products: P,
}

impl<P> CatalogService<P>
where
    P: ProductStore,
{
    /// Creates a catalog service over the given store.
    pub const fn new(products: P) -> Self {
        Self { products }
    }

    /// Lists every active product, sold-out ones included.
    pub async fn all_products(&self) -> WorkflowResult<Vec<Product>> {
        Ok(self.products.all().await?)
    }

    /// Lists orderable products: active, and with stock remaining unless the
    /// category is exempt from stock tracking.
    pub async fn available_products(&self) -> WorkflowResult<Vec<Product>> {
        Ok(self.products.available().await?)
    }

    /// Lists orderable products within one category.
    pub async fn available_products_by_category(
        &self,
        category: ProductCategory,
    ) -> WorkflowResult<Vec<Product>> {
        Ok(self.products.available_by_category(category).await?)
    }

    /// Fetches a product by identity.
    pub async fn product(&self, id: ProductId) -> WorkflowResult<Option<Product>> {
        Ok(self.products.get(id).await?)
    }

    /// Adds a product to the catalog and returns it with its identity.
    #[instrument(skip_all)]
    pub async fn create_product(&self, record: NewProduct) -> WorkflowResult<Product> {
        let product = self.products.create(record).await?;
        info!(product_id = %product.id(), name = %product.name(), "product created");
        Ok(product)
    }

    /// Replaces a product's mutable fields, including its active flag.
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> WorkflowResult<Product> {
        let mut product = self
            .products
            .get(id)
            .await?
            .ok_or(WorkflowError::ProductNotFound(id))?;

        product.update_details(update.name, update.description, update.price, update.category);
        product.set_stock(update.stock);
        if update.active {
            product.activate();
        } else {
            product.deactivate();
        }

        self.products.update(&product).await?;
        Ok(product)
    }

    /// Removes a product from the orderable catalog.
    ///
    /// Products referenced by historical orders must stay resolvable, so
    /// deletion is a deactivation, not a physical removal.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> WorkflowResult<()> {
        let mut product = self
            .products
            .get(id)
            .await?
            .ok_or(WorkflowError::ProductNotFound(id))?;

        product.deactivate();
        self.products.update(&product).await?;
        info!(product_id = %id, "product deactivated");
        Ok(())
    }

    /// Applies a stock delta directly, for restocks and manual corrections.
    pub async fn adjust_stock(&self, id: ProductId, delta: i64) -> WorkflowResult<()> {
        self.products
            .adjust_stock(id, delta)
            .await
            .map_err(|err| match err {
                StoreError::ProductNotFound(id) => WorkflowError::ProductNotFound(id),
                other => other.into(),
            })
    }
}
