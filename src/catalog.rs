//! Catalog
//!
//! Read-only product reference data. The storefront sells two kinds of
//! product — whole machinery and spare parts — with overlapping but
//! distinct fields, so [`Product`] is a tagged variant rather than one
//! struct with a pile of optionals. The cart only ever snapshots the
//! common fields exposed by the accessors here.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integer product identifier, unique across both product kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Product {
    /// Whole machinery: tractors, tillers, sprayers.
    Machinery(MachineryProduct),

    /// A spare part for machinery already in the field.
    SparePart(SparePartProduct),
}

/// Engine and capacity details shown on machinery listings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specifications {
    /// Engine description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,

    /// Fuel type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,

    /// Operating weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,

    /// What the machine is suitable for.
    pub suitable: String,
}

/// A machinery listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineryProduct {
    /// Unique product id.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Manufacturer brand.
    pub brand: String,

    /// Listing category (e.g. "Tractors").
    pub category: String,

    /// Price in whole currency units.
    pub price: u64,

    /// Pre-discount price, when the listing is on offer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u64>,

    /// Listing image reference.
    pub image: String,

    /// Long-form description.
    pub description: String,

    /// Engine power rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<String>,

    /// Selling points shown on the listing.
    #[serde(default)]
    pub features: Vec<String>,

    /// Engine and capacity details.
    pub specifications: Specifications,

    /// Whether the listing is currently purchasable.
    pub in_stock: bool,
}

/// A spare-part listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparePartProduct {
    /// Unique product id.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Listing category (e.g. "Engine Parts").
    pub category: String,

    /// Price in whole currency units.
    pub price: u64,

    /// Pre-discount price, when the part is on offer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u64>,

    /// Listing image reference.
    pub image: String,

    /// Long-form description.
    pub description: String,

    /// Selling points shown on the listing.
    #[serde(default)]
    pub features: Vec<String>,

    /// Machinery the part fits.
    #[serde(default)]
    pub compatibility: Vec<String>,

    /// Whether the part is currently purchasable.
    pub in_stock: bool,
}

impl Product {
    /// Unique product id.
    #[must_use]
    pub fn id(&self) -> ProductId {
        match self {
            Product::Machinery(machinery) => machinery.id,
            Product::SparePart(part) => part.id,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Product::Machinery(machinery) => &machinery.name,
            Product::SparePart(part) => &part.name,
        }
    }

    /// Listing category.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Product::Machinery(machinery) => &machinery.category,
            Product::SparePart(part) => &part.category,
        }
    }

    /// Price in whole currency units.
    #[must_use]
    pub fn price(&self) -> u64 {
        match self {
            Product::Machinery(machinery) => machinery.price,
            Product::SparePart(part) => part.price,
        }
    }

    /// Pre-discount price, when the listing is on offer.
    #[must_use]
    pub fn original_price(&self) -> Option<u64> {
        match self {
            Product::Machinery(machinery) => machinery.original_price,
            Product::SparePart(part) => part.original_price,
        }
    }

    /// Listing image reference.
    #[must_use]
    pub fn image(&self) -> &str {
        match self {
            Product::Machinery(machinery) => &machinery.image,
            Product::SparePart(part) => &part.image,
        }
    }

    /// Whether the listing is currently purchasable.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        match self {
            Product::Machinery(machinery) => machinery.in_stock,
            Product::SparePart(part) => part.in_stock,
        }
    }
}

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// YAML parsing error.
    #[error("failed to parse catalog: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two products share the same id.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

/// A read-only product collection with id lookup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from a product list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();

        for product in &products {
            if !seen.insert(product.id()) {
                return Err(CatalogError::DuplicateId(product.id()));
            }
        }

        Ok(Self { products })
    }

    /// Load a catalog from a YAML document with a top-level `products` list.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the document cannot be parsed or
    /// contains duplicate ids.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_norway::from_str(yaml)?;

        Self::new(file.products)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id() == id)
    }

    /// Iterate over the products in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn oil_filter() -> Product {
        Product::SparePart(SparePartProduct {
            id: ProductId(33),
            name: "Tractor Engine Oil Filter".into(),
            category: "Engine Parts".into(),
            price: 450,
            original_price: Some(520),
            image: "/images/oil-filter.jpg".into(),
            description: "High-quality oil filter for tractor engines.".into(),
            features: vec!["Superior filtration".into()],
            compatibility: vec!["Diesel engines".into(), "Tractors".into()],
            in_stock: true,
        })
    }

    #[test]
    fn accessors_dispatch_on_the_variant() {
        let product = oil_filter();

        assert_eq!(product.id(), ProductId(33));
        assert_eq!(product.name(), "Tractor Engine Oil Filter");
        assert_eq!(product.category(), "Engine Parts");
        assert_eq!(product.price(), 450);
        assert_eq!(product.original_price(), Some(520));
        assert!(product.in_stock());
    }

    #[test]
    fn serde_round_trip_keeps_the_kind_tag() -> TestResult {
        let product = oil_filter();

        let json = serde_json::to_string(&product)?;

        assert!(
            json.contains(r#""kind":"spare_part""#),
            "discriminant should be serialised: {json}"
        );

        let decoded: Product = serde_json::from_str(&json)?;

        assert_eq!(decoded, product);

        Ok(())
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let result = Catalog::new(vec![oil_filter(), oil_filter()]);

        assert!(
            matches!(result, Err(CatalogError::DuplicateId(ProductId(33)))),
            "expected DuplicateId error"
        );
    }

    #[test]
    fn catalog_lookup_by_id() -> TestResult {
        let catalog = Catalog::new(vec![oil_filter()])?;

        assert!(catalog.get(ProductId(33)).is_some());
        assert!(catalog.get(ProductId(99)).is_none());

        Ok(())
    }

    #[test]
    fn catalog_from_yaml_parses_both_kinds() -> TestResult {
        let yaml = r"
products:
  - kind: machinery
    id: 101
    name: Compact Tractor 25HP
    brand: Mahindra
    category: Tractors
    price: 545000
    image: /machinery/compact-tractor.jpg
    description: Compact utility tractor.
    hp: 25 HP
    specifications:
      engine: 3-cylinder diesel
      fuelType: Diesel
      suitable: Small farms and orchards
    inStock: true
  - kind: spare_part
    id: 33
    name: Tractor Engine Oil Filter
    category: Engine Parts
    price: 450
    originalPrice: 520
    image: /images/oil-filter.jpg
    description: High-quality oil filter.
    compatibility: [Tractors]
    inStock: true
";

        let catalog = Catalog::from_yaml(yaml)?;

        assert_eq!(catalog.len(), 2);
        assert!(matches!(
            catalog.get(ProductId(101)),
            Some(Product::Machinery(machinery)) if machinery.brand == "Mahindra"
        ));
        assert!(matches!(
            catalog.get(ProductId(33)),
            Some(Product::SparePart(part)) if part.original_price == Some(520)
        ));

        Ok(())
    }
}
