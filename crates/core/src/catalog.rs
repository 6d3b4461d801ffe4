//! Product catalog: an owned list of products that callers pass to the engine.
//!
//! Mutating operations never touch `self`; they return the next catalog state
//! alongside the affected product.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::domain::product::{NewProduct, Product, ProductId, ProductPatch};
use crate::errors::{CatalogError, DomainError};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate ids.
    pub fn new(products: Vec<Product>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(DomainError::DuplicateProductId(product.id));
            }
        }
        Ok(Self { products })
    }

    /// The four RD Station products served by the stock product endpoint.
    pub fn builtin() -> Self {
        Self {
            products: vec![
                Product::new(1, "RD Station CRM", "Vendas")
                    .with_preferences([
                        "Integração fácil com ferramentas de e-mail",
                        "Personalização de funis de vendas",
                        "Relatórios avançados de desempenho de vendas",
                    ])
                    .with_features([
                        "Gestão de leads e oportunidades",
                        "Automação de fluxos de trabalho de vendas",
                        "Rastreamento de interações com clientes",
                    ]),
                Product::new(2, "RD Station Marketing", "Marketing")
                    .with_preferences([
                        "Automação de marketing",
                        "Testes A/B para otimização de campanhas",
                        "Segmentação avançada de leads",
                    ])
                    .with_features([
                        "Criação e gestão de campanhas de e-mail",
                        "Rastreamento de comportamento do usuário",
                        "Análise de retorno sobre investimento (ROI) de campanhas",
                    ]),
                Product::new(3, "RD Conversas", "Omnichannel")
                    .with_preferences([
                        "Integração com chatbots",
                        "Histórico unificado de interações",
                        "Respostas automáticas e personalizadas",
                    ])
                    .with_features([
                        "Gestão de conversas em diferentes canais",
                        "Chat ao vivo e mensagens automatizadas",
                        "Integração com RD Station CRM e Marketing",
                    ]),
                Product::new(4, "RD Mentor AI", "Uso de Inteligência Artificial")
                    .with_preferences([
                        "Análise preditiva de dados",
                        "Recomendações personalizadas para usuários",
                        "Integração com assistentes virtuais",
                    ])
                    .with_features([
                        "Análise de dados para insights estratégicos",
                        "Recomendação de ações com base em padrões",
                        "Integração de funcionalidades preditivas nos produtos RD Station",
                    ]),
            ],
        }
    }

    /// Parses a JSON array of products.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        Self::parse(raw, "<inline>")
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        let catalog = Self::parse(&raw, &path.display().to_string())?;

        info!(
            event_name = "catalog.load.completed",
            path = %path.display(),
            product_count = catalog.len(),
            "catalog loaded from file"
        );
        Ok(catalog)
    }

    fn parse(raw: &str, origin: &str) -> Result<Self, CatalogError> {
        let products = serde_json::from_str::<Vec<Product>>(raw)
            .map_err(|source| CatalogError::Parse { origin: origin.to_string(), source })?;
        Ok(Self::new(products)?)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|product| product.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    fn next_id(&self) -> Result<ProductId, DomainError> {
        let Some(highest) = self.products.iter().map(|product| product.id).max() else {
            return Ok(ProductId(1));
        };
        highest.0.checked_add(1).map(ProductId).ok_or(DomainError::IdSpaceExhausted(highest))
    }

    /// Appends a product under the next free id (highest id plus one).
    pub fn with_product(&self, new_product: NewProduct) -> Result<(Self, Product), DomainError> {
        let product = new_product.into_product(self.next_id()?);
        let mut products = self.products.clone();
        products.push(product.clone());

        debug!(event_name = "catalog.product.created", product_id = %product.id, "product added");
        Ok((Self { products }, product))
    }

    pub fn updated(
        &self,
        product_id: ProductId,
        patch: ProductPatch,
    ) -> Result<(Self, Product), DomainError> {
        let index = self.position(product_id)?;
        let product = patch.apply_to(&self.products[index]);
        let mut products = self.products.clone();
        products[index] = product.clone();

        debug!(event_name = "catalog.product.updated", product_id = %product_id, "product updated");
        Ok((Self { products }, product))
    }

    pub fn without(&self, product_id: ProductId) -> Result<(Self, Product), DomainError> {
        let index = self.position(product_id)?;
        let mut products = self.products.clone();
        let removed = products.remove(index);

        debug!(event_name = "catalog.product.removed", product_id = %product_id, "product removed");
        Ok((Self { products }, removed))
    }

    fn position(&self, product_id: ProductId) -> Result<usize, DomainError> {
        self.products
            .iter()
            .position(|product| product.id == product_id)
            .ok_or(DomainError::ProductNotFound(product_id))
    }
}
