// 🖼️ View Adapter - The page as seen by the controller
//
// The controller never touches a concrete page. It reads product cards and
// writes whole rendered regions through `BundleView`. `PageModel` is the
// in-memory page shared by the terminal UI, the API server and the tests.

use crate::catalog::Product;
use crate::controller::BundleConfirmation;
use crate::error::{Element, ViewError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// PRODUCT CARD
// ============================================================================

/// What a product display element exposes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub image: String,

    /// "selected" state of the card
    #[serde(default)]
    pub selected: bool,

    /// "added" state of the card's action button
    #[serde(default)]
    pub added: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        ProductCard {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            selected: false,
            added: false,
        }
    }
}

// ============================================================================
// RENDERED REGIONS
// ============================================================================

/// Content of the selected-items container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SummaryView {
    Empty { message: String },
    Items { items: Vec<SummaryItem> },
}

impl SummaryView {
    pub fn items(&self) -> &[SummaryItem] {
        match self {
            SummaryView::Empty { .. } => &[],
            SummaryView::Items { items } => items,
        }
    }
}

/// One row of the selected-items list. The id addresses its
/// increment, decrement and remove affordances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price_text: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DiscountView {
    Hidden,
    Shown { text: String },
}

/// Primary "add bundle to cart" control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToAction {
    pub label: String,
    pub enabled: bool,
}

// ============================================================================
// VIEW ADAPTER
// ============================================================================

pub trait BundleView {
    /// Read the product display element for `id`
    fn product_card(&self, id: &str) -> Option<ProductCard>;

    /// Ids of every product display element on the page
    fn product_ids(&self) -> Vec<String>;

    fn set_card_selected(&mut self, id: &str, selected: bool) -> Result<(), ViewError>;

    fn set_action_added(&mut self, id: &str, added: bool) -> Result<(), ViewError>;

    fn replace_summary(&mut self, summary: SummaryView) -> Result<(), ViewError>;

    fn replace_discount(&mut self, discount: DiscountView) -> Result<(), ViewError>;

    fn replace_total(&mut self, total: String) -> Result<(), ViewError>;

    fn replace_call_to_action(&mut self, cta: CallToAction) -> Result<(), ViewError>;

    fn present_confirmation(&mut self, confirmation: &BundleConfirmation) -> Result<(), ViewError>;
}

// ============================================================================
// IN-MEMORY PAGE
// ============================================================================

/// Snapshot of everything currently rendered on a `PageModel`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    pub products: Vec<ProductCard>,
    pub summary: Option<SummaryView>,
    pub discount: Option<DiscountView>,
    pub total: Option<String>,
    pub call_to_action: Option<CallToAction>,
}

#[derive(Debug, Clone, Default)]
pub struct PageModel {
    cards: Vec<ProductCard>,
    buttonless: HashSet<String>,
    absent: Vec<Element>,
    summary: Option<SummaryView>,
    discount: Option<DiscountView>,
    total: Option<String>,
    call_to_action: Option<CallToAction>,
    confirmation: Option<BundleConfirmation>,
}

impl PageModel {
    pub fn new(cards: Vec<ProductCard>) -> Self {
        PageModel {
            cards,
            ..Default::default()
        }
    }

    pub fn from_products(products: &[Product]) -> Self {
        Self::new(products.iter().map(ProductCard::from).collect())
    }

    /// Model a page that lacks one of its regions
    pub fn without_region(mut self, element: Element) -> Self {
        if !self.absent.contains(&element) {
            self.absent.push(element);
        }
        self
    }

    /// Model a product card whose action button is missing
    pub fn without_action_button(mut self, id: &str) -> Self {
        self.buttonless.insert(id.to_string());
        self
    }

    pub fn cards(&self) -> &[ProductCard] {
        &self.cards
    }

    pub fn card(&self, id: &str) -> Option<&ProductCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn summary(&self) -> Option<&SummaryView> {
        self.summary.as_ref()
    }

    pub fn discount(&self) -> Option<&DiscountView> {
        self.discount.as_ref()
    }

    pub fn total(&self) -> Option<&str> {
        self.total.as_deref()
    }

    pub fn call_to_action(&self) -> Option<&CallToAction> {
        self.call_to_action.as_ref()
    }

    /// Last confirmation presented to the shopper
    pub fn confirmation(&self) -> Option<&BundleConfirmation> {
        self.confirmation.as_ref()
    }

    pub fn dismiss_confirmation(&mut self) {
        self.confirmation = None;
    }

    pub fn rendered(&self) -> RenderedPage {
        RenderedPage {
            products: self.cards.clone(),
            summary: self.summary.clone(),
            discount: self.discount.clone(),
            total: self.total.clone(),
            call_to_action: self.call_to_action.clone(),
        }
    }

    fn ensure_present(&self, element: Element) -> Result<(), ViewError> {
        if self.absent.contains(&element) {
            Err(ViewError::missing(element))
        } else {
            Ok(())
        }
    }

    fn card_mut(&mut self, id: &str) -> Option<&mut ProductCard> {
        self.cards.iter_mut().find(|c| c.id == id)
    }
}

impl BundleView for PageModel {
    fn product_card(&self, id: &str) -> Option<ProductCard> {
        self.card(id).cloned()
    }

    fn product_ids(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.id.clone()).collect()
    }

    fn set_card_selected(&mut self, id: &str, selected: bool) -> Result<(), ViewError> {
        let card = self
            .card_mut(id)
            .ok_or_else(|| ViewError::missing(Element::ProductCard(id.to_string())))?;
        card.selected = selected;
        Ok(())
    }

    fn set_action_added(&mut self, id: &str, added: bool) -> Result<(), ViewError> {
        if self.buttonless.contains(id) {
            return Err(ViewError::missing(Element::ActionButton(id.to_string())));
        }
        let card = self
            .card_mut(id)
            .ok_or_else(|| ViewError::missing(Element::ActionButton(id.to_string())))?;
        card.added = added;
        Ok(())
    }

    fn replace_summary(&mut self, summary: SummaryView) -> Result<(), ViewError> {
        self.ensure_present(Element::SummaryList)?;
        self.summary = Some(summary);
        Ok(())
    }

    fn replace_discount(&mut self, discount: DiscountView) -> Result<(), ViewError> {
        self.ensure_present(Element::DiscountRow)?;
        self.discount = Some(discount);
        Ok(())
    }

    fn replace_total(&mut self, total: String) -> Result<(), ViewError> {
        self.ensure_present(Element::TotalDisplay)?;
        self.total = Some(total);
        Ok(())
    }

    fn replace_call_to_action(&mut self, cta: CallToAction) -> Result<(), ViewError> {
        self.ensure_present(Element::CallToAction)?;
        self.call_to_action = Some(cta);
        Ok(())
    }

    fn present_confirmation(&mut self, confirmation: &BundleConfirmation) -> Result<(), ViewError> {
        self.ensure_present(Element::Confirmation)?;
        self.confirmation = Some(confirmation.clone());
        Ok(())
    }
}
