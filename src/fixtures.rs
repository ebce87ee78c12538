//! Fixtures
//!
//! Bundled sample data for tests and demos.

use crate::catalog::{Catalog, CatalogError};

/// The sample catalog bundled with the crate: a handful of machinery
/// listings and spare parts in the shapes the storefront sells.
///
/// # Errors
///
/// Returns a [`CatalogError`] if the bundled document fails to parse,
/// which would be a packaging defect rather than a runtime condition.
pub fn sample_catalog() -> Result<Catalog, CatalogError> {
    Catalog::from_yaml(include_str!("../fixtures/catalog.yml"))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::catalog::{Product, ProductId};

    use super::*;

    #[test]
    fn sample_catalog_parses() -> TestResult {
        let catalog = sample_catalog()?;

        assert_eq!(catalog.len(), 7);

        Ok(())
    }

    #[test]
    fn sample_catalog_contains_the_reference_products() -> TestResult {
        let catalog = sample_catalog()?;

        assert!(matches!(
            catalog.get(ProductId(1)),
            Some(product) if product.price() == 1850
        ));
        assert!(matches!(
            catalog.get(ProductId(33)),
            Some(product) if product.price() == 450
        ));

        Ok(())
    }

    #[test]
    fn sample_catalog_spans_both_product_kinds() -> TestResult {
        let catalog = sample_catalog()?;

        assert!(
            catalog.iter().any(|p| matches!(p, Product::Machinery(_))),
            "expected at least one machinery listing"
        );
        assert!(
            catalog.iter().any(|p| matches!(p, Product::SparePart(_))),
            "expected at least one spare part"
        );

        Ok(())
    }
}
