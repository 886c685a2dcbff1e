// 🧺 Selection - The bundle's single source of truth
//
// Insertion-ordered map from product id to SelectedProduct.
// Invariants:
// - an id is present at most once (presence = "in bundle")
// - every quantity is within 1..=MAX_QUANTITY

use serde::{Deserialize, Serialize};

/// Upper bound for a single product's quantity
pub const MAX_QUANTITY: u32 = 9_999;

// ============================================================================
// SELECTED PRODUCT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedProduct {
    pub id: String,
    pub name: String,
    /// Unit price
    pub price: f64,
    pub image: String,
    pub quantity: u32,
}

impl SelectedProduct {
    pub fn new(id: String, name: String, price: f64, image: String) -> Self {
        SelectedProduct {
            id,
            name,
            price,
            image,
            quantity: 1,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// quantity := clamp(quantity + delta, 1, MAX_QUANTITY)
    pub fn adjust_quantity(&mut self, delta: i32) {
        let next = (i64::from(self.quantity) + i64::from(delta)).clamp(1, i64::from(MAX_QUANTITY));
        self.quantity = u32::try_from(next).unwrap_or(MAX_QUANTITY);
    }
}

// ============================================================================
// SELECTION
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Selection {
    products: Vec<SelectedProduct>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Insert with quantity 1. Returns false (and changes nothing) if the id
    /// is already present.
    pub fn insert(&mut self, mut product: SelectedProduct) -> bool {
        if self.contains(&product.id) {
            return false;
        }
        product.quantity = 1;
        self.products.push(product);
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<SelectedProduct> {
        self.position(id).map(|i| self.products.remove(i))
    }

    /// Returns the new quantity, or None if the id is not selected
    pub fn change_quantity(&mut self, id: &str, delta: i32) -> Option<u32> {
        let product = self.products.iter_mut().find(|p| p.id == id)?;
        product.adjust_quantity(delta);
        Some(product.quantity)
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SelectedProduct> {
        self.products.iter()
    }

    /// Σ price × quantity
    pub fn subtotal(&self) -> f64 {
        self.products.iter().map(SelectedProduct::line_total).sum()
    }

    pub fn total_quantity(&self) -> u32 {
        self.products
            .iter()
            .fold(0u32, |total, p| total.saturating_add(p.quantity))
    }

    /// Owned copy of every entry
    pub fn to_vec(&self) -> Vec<SelectedProduct> {
        self.products.clone()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }
}
