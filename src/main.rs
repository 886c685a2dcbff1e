// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;

use bundle_builder::{
    format_currency, logging, BundleController, Catalog, Config, DiscountView, PageModel,
    SummaryView,
};

fn main() -> Result<()> {
    let config = Config::from_env()?;
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("catalog") => {
            logging::init(&config.log_level)?;
            run_catalog(&config)
        }
        Some("demo") => {
            logging::init(&config.log_level)?;
            run_demo(&config)
        }
        _ => run_ui_mode(&config),
    }
}

fn run_catalog(config: &Config) -> Result<()> {
    let catalog = Catalog::load(&config.catalog_path)?;

    println!("📦 Product Catalog ({} products)", catalog.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for product in catalog.products() {
        println!(
            "  {:<16} {:<28} {:>10}",
            product.id,
            product.name,
            format_currency(product.price)
        );
    }

    Ok(())
}

/// Headless walk through the bundle flow
fn run_demo(config: &Config) -> Result<()> {
    let catalog = Catalog::load(&config.catalog_path)?;
    let mut controller =
        BundleController::new(PageModel::from_products(catalog.products()), config.pricing);

    println!("🧺 Bundle Builder demo");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let picks: Vec<String> = catalog
        .products()
        .iter()
        .take(config.pricing.discount_threshold)
        .map(|p| p.id.clone())
        .collect();

    for id in &picks {
        controller.toggle_selection(id);
        print_page(controller.view());
    }

    if let Some(first) = picks.first() {
        controller.change_quantity(first, 1);
        print_page(controller.view());
    }

    match controller.confirm_bundle() {
        Some(confirmation) => {
            println!("\n{}", confirmation.message());
            println!("\n{}", serde_json::to_string_pretty(&confirmation)?);
        }
        None => println!("\n⚠️  Not enough products in the catalog to unlock the bundle"),
    }

    Ok(())
}

fn print_page(page: &PageModel) {
    println!();
    match page.summary() {
        Some(SummaryView::Empty { message }) => println!("  {}", message),
        Some(SummaryView::Items { items }) => {
            for item in items {
                println!("  {:<28} {:>10}  × {}", item.name, item.price_text, item.quantity);
            }
        }
        None => println!("  (no summary)"),
    }
    if let Some(DiscountView::Shown { text }) = page.discount() {
        println!("  Discount: {}", text);
    }
    if let Some(total) = page.total() {
        println!("  Total:    {}", total);
    }
    if let Some(cta) = page.call_to_action() {
        let state = if cta.enabled { "enabled" } else { "disabled" };
        println!("  [{}] ({})", cta.label, state);
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    logging::init_to_file(&config.log_level, std::path::Path::new("bundle-builder.log"))?;

    println!("🖥️  Loading Bundle Builder UI...\n");

    let catalog = Catalog::load(&config.catalog_path)?;
    println!("✓ Loaded {} products\n", catalog.len());

    let mut app = ui::App::new(PageModel::from_products(catalog.products()), config.pricing);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin bundle-server --features server");
    std::process::exit(1);
}
