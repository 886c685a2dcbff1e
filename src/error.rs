// ⚠️ Error Types - Bundle Builder
// One failure class at the view boundary (missing element), plus the
// configuration/catalog errors raised while starting up.

use thiserror::Error;

/// Result type alias for bundle operations
pub type Result<T> = std::result::Result<T, BundleError>;

// ============================================================================
// VIEW ERRORS
// ============================================================================

/// Errors reported by a `BundleView` implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// A product card, action button or page region is not on the page
    #[error("{element} not found")]
    MissingElement { element: Element },
}

impl ViewError {
    pub fn missing(element: Element) -> Self {
        ViewError::MissingElement { element }
    }

    pub fn element(&self) -> &Element {
        match self {
            ViewError::MissingElement { element } => element,
        }
    }
}

/// Every element the controller can address on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    ProductCard(String),
    ActionButton(String),
    SummaryList,
    DiscountRow,
    TotalDisplay,
    CallToAction,
    Confirmation,
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::ProductCard(id) => write!(f, "Product card with id {}", id),
            Element::ActionButton(id) => write!(f, "Button with product-id {}", id),
            Element::SummaryList => write!(f, "Selected products container"),
            Element::DiscountRow => write!(f, "Discount row"),
            Element::TotalDisplay => write!(f, "Total display"),
            Element::CallToAction => write!(f, "Add bundle button"),
            Element::Confirmation => write!(f, "Confirmation dialog"),
        }
    }
}

// ============================================================================
// BUNDLE ERRORS
// ============================================================================

/// Main error type for configuration and catalog problems
/// (view failures never escape the controller)
#[derive(Error, Debug)]
pub enum BundleError {
    /// Environment variable holds a value that cannot be used
    #[error("Invalid value for {variable}: {reason}")]
    InvalidConfig { variable: String, reason: String },

    /// Catalog contents violate an invariant (duplicate id, negative price)
    #[error("Invalid catalog entry '{id}': {reason}")]
    InvalidProduct { id: String, reason: String },
}

impl BundleError {
    pub fn invalid_config(variable: &str, reason: impl Into<String>) -> Self {
        BundleError::InvalidConfig {
            variable: variable.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_product(id: &str, reason: impl Into<String>) -> Self {
        BundleError::InvalidProduct {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
