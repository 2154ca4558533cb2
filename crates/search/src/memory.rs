//! In-memory collaborators for exercising [`SearchService`](crate::SearchService)
//! without a database or index cluster.
//!
//! Each one records the calls it receives so tests can assert on what the
//! pipeline asked for.

use std::sync::Mutex;

use async_trait::async_trait;
use storefront_core::catalog::{Catalog, Category, Product, ProductCriteria};
use storefront_core::error::{CatalogError, IndexError};
use storefront_core::index::{IndexResponse, NativeQuery, SearchIndex};
use storefront_core::store::{Language, MerchantStore, StoreResolver, DEFAULT_LANGUAGE};
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// Store and language directory over fixed lists.
#[derive(Debug, Default)]
pub struct MemoryStores {
    stores: Vec<MerchantStore>,
    languages: Vec<Language>,
    failing: bool,
}

impl MemoryStores {
    pub fn new(stores: Vec<MerchantStore>, languages: Vec<Language>) -> Self {
        Self {
            stores,
            languages,
            failing: false,
        }
    }

    /// Every lookup fails with a backend error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    fn backend_down<T>(&self) -> Result<T, CatalogError> {
        Err(CatalogError::backend("store directory unreachable"))
    }
}

#[async_trait]
impl StoreResolver for MemoryStores {
    async fn resolve_store(&self, code: &str) -> Result<Option<MerchantStore>, CatalogError> {
        if self.failing {
            return self.backend_down();
        }
        Ok(self.stores.iter().find(|s| s.code == code).cloned())
    }

    async fn resolve_language(
        &self,
        store: &MerchantStore,
        code: &str,
    ) -> Result<Language, CatalogError> {
        if self.failing {
            return self.backend_down();
        }
        [code, store.default_language.as_str(), DEFAULT_LANGUAGE]
            .into_iter()
            .find_map(|candidate| self.languages.iter().find(|l| l.code == candidate))
            .cloned()
            .ok_or_else(|| CatalogError::backend(format!("no language for '{code}'")))
    }
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
enum IndexBehaviour {
    #[default]
    Answer,
    Fail,
    Hang,
}

/// Index returning a canned response and keyword list.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    response: IndexResponse,
    keywords: Vec<String>,
    behaviour: IndexBehaviour,
    healthy: bool,
    queries: Mutex<Vec<NativeQuery>>,
}

impl MemoryIndex {
    pub fn new(response: IndexResponse) -> Self {
        Self {
            response,
            healthy: true,
            ..Self::default()
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    /// Every query fails as if the cluster were unreachable.
    pub fn failing() -> Self {
        Self {
            behaviour: IndexBehaviour::Fail,
            ..Self::default()
        }
    }

    /// Every query waits forever; only cancellation gets the caller out.
    pub fn hanging() -> Self {
        Self {
            behaviour: IndexBehaviour::Hang,
            healthy: true,
            ..Self::default()
        }
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<NativeQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    async fn answer<T: Clone>(&self, query: &NativeQuery, value: &T) -> Result<T, IndexError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        match self.behaviour {
            IndexBehaviour::Answer => Ok(value.clone()),
            IndexBehaviour::Fail => Err(IndexError::Unavailable("connection refused".to_string())),
            IndexBehaviour::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn search(&self, query: &NativeQuery) -> Result<IndexResponse, IndexError> {
        self.answer(query, &self.response).await
    }

    async fn autocomplete(&self, query: &NativeQuery) -> Result<Vec<String>, IndexError> {
        self.answer(query, &self.keywords).await
    }

    async fn ping(&self) -> bool {
        self.healthy
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Catalog over fixed product and category lists, kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: Vec<Product>,
    categories: Vec<Category>,
    fail_products: bool,
    fail_categories: bool,
    cancel_on_products: Option<CancellationToken>,
    fold_code_case: bool,
    product_calls: Mutex<Vec<ProductCriteria>>,
    category_calls: Mutex<Vec<Vec<String>>>,
}

impl MemoryCatalog {
    pub fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            products,
            categories,
            ..Self::default()
        }
    }

    /// Product lookups fail; category lookups still answer.
    pub fn failing_products(mut self) -> Self {
        self.fail_products = true;
        self
    }

    /// Category lookups fail; product lookups still answer.
    pub fn failing_categories(mut self) -> Self {
        self.fail_categories = true;
        self
    }

    /// Match category codes ignoring ASCII case, so the catalog can return a
    /// category whose code differs from the bucket key that asked for it.
    pub fn folding_code_case(mut self) -> Self {
        self.fold_code_case = true;
        self
    }

    /// Cancel `token` once a product lookup has answered.
    pub fn cancelling_after_products(mut self, token: CancellationToken) -> Self {
        self.cancel_on_products = Some(token);
        self
    }

    /// Criteria of every product lookup so far.
    pub fn product_calls(&self) -> Vec<ProductCriteria> {
        self.product_calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Codes of every category lookup so far.
    pub fn category_calls(&self) -> Vec<Vec<String>> {
        self.category_calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn list_by_identifiers(
        &self,
        _store: &MerchantStore,
        _language: &Language,
        criteria: &ProductCriteria,
    ) -> Result<Vec<Product>, CatalogError> {
        if let Ok(mut calls) = self.product_calls.lock() {
            calls.push(criteria.clone());
        }
        if self.fail_products {
            return Err(CatalogError::backend("product table locked"));
        }

        let offset = usize::try_from(criteria.start_index).unwrap_or(0);
        let limit = usize::try_from(criteria.max_count).unwrap_or(0);
        let products = self
            .products
            .iter()
            .filter(|p| criteria.product_ids.contains(&p.id))
            .filter(|p| !criteria.available_only || p.available)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        if let Some(token) = &self.cancel_on_products {
            token.cancel();
        }
        Ok(products)
    }

    async fn list_categories_by_codes(
        &self,
        _store: &MerchantStore,
        codes: &[String],
        _language: &Language,
    ) -> Result<Vec<Category>, CatalogError> {
        if let Ok(mut calls) = self.category_calls.lock() {
            calls.push(codes.to_vec());
        }
        if self.fail_categories {
            return Err(CatalogError::backend("category table locked"));
        }

        Ok(self
            .categories
            .iter()
            .filter(|c| {
                codes.iter().any(|code| {
                    code == &c.code || (self.fold_code_case && code.eq_ignore_ascii_case(&c.code))
                })
            })
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Fixture builders shared by unit and API tests.
pub mod fixtures {
    use storefront_core::catalog::{Category, Product, ProductImage, ProductPrice};
    use storefront_core::index::{FacetBucket, IndexHit};
    use storefront_core::store::{Language, MerchantStore};
    use storefront_core::types::{DbId, MinorUnits};

    /// The `demo` store: USD, national symbol, English by default.
    pub fn demo_store() -> MerchantStore {
        MerchantStore {
            id: 1,
            code: "demo".to_string(),
            name: "Demo Store".to_string(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_format_national: true,
            default_language: "en".to_string(),
        }
    }

    pub fn english() -> Language {
        Language {
            id: 1,
            code: "en".to_string(),
        }
    }

    pub fn hit(id: &str, score: f32) -> IndexHit {
        IndexHit {
            id: id.to_string(),
            score,
        }
    }

    pub fn bucket(field: &str, key: &str, count: i64) -> FacetBucket {
        FacetBucket {
            field: field.to_string(),
            key: key.to_string(),
            name: key.to_string(),
            count,
        }
    }

    /// An available product with one default image and no special price.
    pub fn product(id: DbId, name: &str, amount: MinorUnits) -> Product {
        Product {
            id,
            sku: format!("SKU-{id}"),
            available: true,
            date_available: None,
            quantity: 10,
            name: name.to_string(),
            description: None,
            friendly_url: None,
            manufacturer: None,
            price: ProductPrice::regular(amount),
            images: vec![ProductImage {
                file_name: format!("{id}.jpg"),
                default_image: true,
            }],
        }
    }

    pub fn category(id: DbId, code: &str, name: &str) -> Category {
        Category {
            id,
            code: code.to_string(),
            name: name.to_string(),
            friendly_url: Some(code.to_string()),
            image: None,
            depth: 0,
        }
    }
}
