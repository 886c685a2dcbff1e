// 🎛️ Bundle Controller - Selection state machine + derived views
//
// Per product id:
//   Unselected --toggle--> Selected(q = 1)
//   Selected   --toggle / remove--> Unselected
//   Selected(q) --change_quantity(delta)--> Selected(clamp(q + delta, 1, MAX_QUANTITY))
//
// Every mutation ends with a full re-render of the summary list, the pricing
// block and the call-to-action. Missing page elements are logged and skipped;
// nothing here panics or returns an error to the caller.

use crate::error::{Element, ViewError};
use crate::events::{BundleEvent, EventKind, EventLog};
use crate::pricing::{
    call_to_action_label, empty_state_message, format_currency, format_percent, PricingConfig,
    PricingSummary,
};
use crate::selection::{SelectedProduct, Selection};
use crate::view::{BundleView, CallToAction, DiscountView, SummaryItem, SummaryView};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, warn};
use uuid::Uuid;

// ============================================================================
// READ-ONLY VIEWS OF THE BUNDLE
// ============================================================================

/// Owned snapshot of the bundle. Changing it never touches the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleState {
    pub selected_products: Vec<SelectedProduct>,
    pub count: usize,
    pub subtotal: f64,
    pub has_discount: bool,
    pub discount_amount: f64,
}

/// Result of the simulated "add bundle to cart"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleConfirmation {
    pub id: Uuid,
    pub confirmed_at: DateTime<Utc>,
    pub products: Vec<SelectedProduct>,
    pub item_count: usize,
    pub total_quantity: u32,
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
    pub discount_percent: f64,
}

impl BundleConfirmation {
    /// Message shown to the shopper
    pub fn message(&self) -> String {
        format!(
            "Bundle added to cart!\n\nItems: {}\nSubtotal: {}\nDiscount: -{}\nTotal: {}\n\nYou saved {} ({} off)!",
            self.item_count,
            format_currency(self.subtotal),
            format_currency(self.discount),
            format_currency(self.total),
            format_currency(self.discount),
            format_percent(self.discount_percent),
        )
    }
}

// ============================================================================
// CONTROLLER
// ============================================================================

pub struct BundleController<V: BundleView> {
    view: V,
    selection: Selection,
    pricing: PricingConfig,
    events: EventLog,
}

impl<V: BundleView> BundleController<V> {
    /// Build the controller and perform the initial render
    pub fn new(view: V, pricing: PricingConfig) -> Self {
        let mut controller = BundleController {
            view,
            selection: Selection::new(),
            pricing,
            events: EventLog::default(),
        };

        controller.render();
        info!(
            threshold = pricing.discount_threshold,
            rate = pricing.discount_rate,
            "Bundle Builder initialized"
        );

        controller
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Recent bundle events, oldest first
    pub fn events(&self) -> &VecDeque<BundleEvent> {
        self.events.events()
    }

    pub fn is_selected(&self, product_id: &str) -> bool {
        self.selection.contains(product_id)
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Add the product to the bundle, or take it out if it is already there
    pub fn toggle_selection(&mut self, product_id: &str) {
        let Some(card) = self.view.product_card(product_id) else {
            self.report_missing(ViewError::missing(Element::ProductCard(product_id.to_string())));
            return;
        };

        if self.selection.remove(product_id).is_some() {
            self.mark_selected(product_id, false);
            info!("Removed product {} from bundle", product_id);
            self.events.record(EventKind::ProductRemoved {
                id: product_id.to_string(),
            });
        } else {
            self.selection
                .insert(SelectedProduct::new(card.id, card.name, card.price, card.image));
            self.mark_selected(product_id, true);
            info!("Added product {} to bundle", product_id);
            self.events.record(EventKind::ProductAdded {
                id: product_id.to_string(),
            });
        }

        self.render();
    }

    /// Explicit removal (the trash affordance on a summary row)
    pub fn remove_product(&mut self, product_id: &str) {
        if self.view.product_card(product_id).is_none() {
            self.report_missing(ViewError::missing(Element::ProductCard(product_id.to_string())));
            return;
        }

        if self.selection.remove(product_id).is_none() {
            debug!("Product {} is not in the bundle, nothing to remove", product_id);
            return;
        }

        self.mark_selected(product_id, false);
        info!("Removed product {} from bundle", product_id);
        self.events.record(EventKind::ProductRemoved {
            id: product_id.to_string(),
        });

        self.render();
    }

    /// quantity := clamp(quantity + delta, 1, MAX_QUANTITY); ignored for unselected ids
    pub fn change_quantity(&mut self, product_id: &str, delta: i32) {
        let Some(quantity) = self.selection.change_quantity(product_id, delta) else {
            debug!("Product {} is not in the bundle, quantity unchanged", product_id);
            return;
        };

        debug!("Quantity of {} is now {}", product_id, quantity);
        self.events.record(EventKind::QuantityChanged {
            id: product_id.to_string(),
            quantity,
        });

        self.render();
    }

    /// Simulated checkout. Leaves the selection untouched.
    pub fn confirm_bundle(&mut self) -> Option<BundleConfirmation> {
        let selected = self.selection.len();

        if !self.pricing.qualifies(selected) {
            info!("Not enough items selected for bundle");
            self.events.record(EventKind::BundleRejected {
                selected,
                required: self.pricing.discount_threshold,
            });
            return None;
        }

        let summary = self.pricing_summary();
        let confirmation = BundleConfirmation {
            id: Uuid::new_v4(),
            confirmed_at: Utc::now(),
            products: self.selection.to_vec(),
            item_count: selected,
            total_quantity: self.selection.total_quantity(),
            subtotal: summary.subtotal,
            discount: summary.discount_amount,
            total: summary.total,
            discount_percent: summary.discount_percent,
        };

        info!(
            id = %confirmation.id,
            items = confirmation.item_count,
            subtotal = confirmation.subtotal,
            discount = confirmation.discount,
            total = confirmation.total,
            "Bundle added to cart"
        );
        self.events.record(EventKind::BundleConfirmed {
            confirmation_id: confirmation.id,
            total: confirmation.total,
        });

        if let Err(err) = self.view.present_confirmation(&confirmation) {
            self.report_missing(err);
        }

        Some(confirmation)
    }

    /// Empty the bundle and clear every card's visual state
    pub fn reset(&mut self) {
        self.selection.clear();

        for id in self.view.product_ids() {
            self.mark_selected(&id, false);
        }

        self.render();
        self.events.record(EventKind::BundleReset);
        info!("Bundle reset");
    }

    // ------------------------------------------------------------------------
    // Pricing
    // ------------------------------------------------------------------------

    pub fn compute_subtotal(&self) -> f64 {
        self.selection.subtotal()
    }

    pub fn compute_discount(&self, subtotal: f64) -> PricingSummary {
        self.pricing.summarize(subtotal, self.selection.len())
    }

    pub fn pricing_summary(&self) -> PricingSummary {
        self.compute_discount(self.compute_subtotal())
    }

    pub fn snapshot(&self) -> BundleState {
        let summary = self.pricing_summary();

        BundleState {
            selected_products: self.selection.to_vec(),
            count: self.selection.len(),
            subtotal: summary.subtotal,
            has_discount: summary.has_discount,
            discount_amount: summary.discount_amount,
        }
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    pub fn render(&mut self) {
        self.render_summary();
        self.render_call_to_action();
    }

    /// Rebuild the selected-items list, discount row and total in one pass
    pub fn render_summary(&mut self) {
        let summary = self.build_summary();
        let pricing = self.pricing_summary();

        let discount = if pricing.has_discount {
            DiscountView::Shown {
                text: format!(
                    "{} ({})",
                    format_currency(pricing.discount_amount),
                    format_percent(pricing.discount_percent)
                ),
            }
        } else {
            DiscountView::Hidden
        };
        let total = format_currency(pricing.total);

        let results = [
            self.view.replace_summary(summary),
            self.view.replace_discount(discount),
            self.view.replace_total(total),
        ];
        for err in results.into_iter().filter_map(Result::err) {
            self.report_missing(err);
        }
    }

    pub fn render_call_to_action(&mut self) {
        let selected = self.selection.len();
        let cta = CallToAction {
            label: call_to_action_label(&self.pricing, selected, self.selection.total_quantity()),
            enabled: self.pricing.qualifies(selected),
        };

        if let Err(err) = self.view.replace_call_to_action(cta) {
            self.report_missing(err);
        }
    }

    fn build_summary(&self) -> SummaryView {
        if self.selection.is_empty() {
            return SummaryView::Empty {
                message: empty_state_message(&self.pricing),
            };
        }

        SummaryView::Items {
            items: self
                .selection
                .iter()
                .map(|p| SummaryItem {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    image: p.image.clone(),
                    price_text: format_currency(p.price),
                    quantity: p.quantity,
                })
                .collect(),
        }
    }

    fn mark_selected(&mut self, product_id: &str, selected: bool) {
        if let Err(err) = self.view.set_card_selected(product_id, selected) {
            self.report_missing(err);
        }
        if let Err(err) = self.view.set_action_added(product_id, selected) {
            self.report_missing(err);
        }
    }

    fn report_missing(&mut self, err: ViewError) {
        warn!("{}", err);
        self.events.record(EventKind::ElementMissing {
            element: err.element().to_string(),
        });
    }
}
