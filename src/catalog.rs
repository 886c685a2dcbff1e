// 📦 Product Catalog - CSV → product cards
//
// The catalog is what puts product cards on the page in the first place.
// CSV header: id,name,price,image

use crate::error::BundleError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub image: String,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self> {
        let catalog = Catalog { products };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(csv_path: &Path) -> Result<Self> {
        let file = std::fs::File::open(csv_path)
            .with_context(|| format!("Failed to open catalog {}", csv_path.display()))?;
        let catalog = Self::from_reader(file)
            .with_context(|| format!("Failed to load catalog {}", csv_path.display()))?;

        tracing::info!(
            "Loaded {} products from {}",
            catalog.len(),
            csv_path.display()
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);

        let mut products = Vec::new();
        for result in rdr.deserialize() {
            let product: Product = result.context("Failed to deserialize product")?;
            products.push(product);
        }

        Self::new(products)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for product in &self.products {
            if product.id.trim().is_empty() {
                return Err(BundleError::invalid_product(&product.name, "empty id").into());
            }
            if !seen.insert(product.id.as_str()) {
                return Err(BundleError::invalid_product(&product.id, "duplicate id").into());
            }
            if !(product.price >= 0.0) {
                return Err(BundleError::invalid_product(
                    &product.id,
                    "price must be a non-negative number",
                )
                .into());
            }
        }

        Ok(())
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "id,name,price,image\n\
                       mug,Ceramic Mug,10.00,/img/mug.png\n\
                       tee,Cotton Tee,20.00,/img/tee.png\n\
                       cap,Cap,15.00,/img/cap.png\n";

    #[test]
    fn test_from_reader() {
        let catalog = Catalog::from_reader(CSV.as_bytes()).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.products()[0].id, "mug");
        assert_eq!(catalog.products()[1].price, 20.0);
        assert_eq!(catalog.products()[2].image, "/img/cap.png");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::load(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open catalog"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let csv = "id,name,price,image\nmug,Mug,10,/a.png\nmug,Mug 2,12,/b.png\n";
        let err = Catalog::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("duplicate id"));
    }

    #[test]
    fn test_negative_price_rejected() {
        let csv = "id,name,price,image\nmug,Mug,-1,/a.png\n";
        assert!(Catalog::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_nan_price_rejected() {
        let csv = "id,name,price,image\nmug,Mug,NaN,/a.png\n";
        let err = Catalog::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("price must be a non-negative number"));
    }

    #[test]
    fn test_bad_price_rejected() {
        let csv = "id,name,price,image\nmug,Mug,free,/a.png\n";
        let err = Catalog::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Failed to deserialize product"));
    }
}
