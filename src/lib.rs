// Bundle Builder - Core Library
// Exposes all modules for use in the terminal UI, the API server, and tests

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod logging;
pub mod pricing;
pub mod selection;
pub mod view;

// Re-export commonly used types
pub use catalog::{Catalog, Product};
pub use config::Config;
pub use controller::{BundleConfirmation, BundleController, BundleState};
pub use error::{BundleError, Element, ViewError};
pub use events::{BundleEvent, EventKind, EVENT_HISTORY_LIMIT};
pub use pricing::{
    call_to_action_label, format_currency, format_percent, PricingConfig, PricingSummary,
};
pub use selection::{SelectedProduct, Selection, MAX_QUANTITY};
pub use view::{
    BundleView, CallToAction, DiscountView, PageModel, ProductCard, RenderedPage, SummaryItem,
    SummaryView,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
