pub mod command_handler;

use crate::advisor::{AdviceState, Advisor};
use crate::comparator::compare_products;
use crate::config::AppConfig;
use crate::model::ComparisonResult;
use crate::store::ProductStore;
use std::sync::Arc;

/// Interactive session state: the product form, the advice lifecycle and
/// the collaborators needed to serve commands.
pub struct Console {
    pub store: ProductStore,
    pub advice: AdviceState,
    pub advisor: Arc<dyn Advisor>,
    pub config: Arc<AppConfig>,
}

impl Console {
    pub fn new(advisor: Arc<dyn Advisor>, config: Arc<AppConfig>) -> Self {
        Self {
            store: ProductStore::new(),
            advice: AdviceState::default(),
            advisor,
            config,
        }
    }

    /// Recomputes the full result set from the current form state.
    pub fn results(&self) -> Vec<ComparisonResult> {
        compare_products(self.store.products(), self.config.eur_to_bgn)
    }

    /// Renders every product card with its computed per-kg price and the
    /// best-value badge.
    pub fn render_products(&self) {
        let results = self.results();
        println!();
        for (product, result) in self.store.products().iter().zip(results.iter()) {
            let weight = product
                .weight
                .map(|w| format!("{}{}", w, product.unit))
                .unwrap_or_else(|| "-".to_string());
            let quantity = product
                .quantity
                .map(|q| q.to_string())
                .unwrap_or_else(|| "-".to_string());
            let price = product
                .price_eur
                .map(|p| format!("{:.2} EUR ({:.2} BGN)", p, p * self.config.eur_to_bgn))
                .unwrap_or_else(|| "-".to_string());

            println!("[{}] {}", product.id, product.name);
            println!("    amount: {} | packs: {} | pack price: {}", weight, quantity, price);
            if result.price_per_kg_eur > 0.0 {
                let badge = if result.is_best_value {
                    "  🏆 TOP VALUE"
                } else {
                    ""
                };
                println!(
                    "    {:.2} EUR/kg | {:.2} BGN/kg | total {:.2} kg{}",
                    result.price_per_kg_eur,
                    result.price_per_kg_bgn,
                    result.total_weight_kg,
                    badge
                );
            } else {
                println!("    (enter a weight and a price to compare)");
            }
        }
        println!();
    }

    /// Renders the latest advice outcome, including citation sources for
    /// grounded answers.
    pub fn render_advice(&self) {
        match &self.advice {
            AdviceState::Succeeded(advice) => {
                println!();
                if advice.grounded {
                    println!("=== Expert analysis (live market data) ===");
                } else {
                    println!("=== Expert analysis ===");
                }
                println!("{}", advice.text);
                if !advice.sources.is_empty() {
                    println!();
                    println!("Verification sources:");
                    for (idx, source) in advice.sources.iter().enumerate() {
                        println!("  {}. {} ({})", idx + 1, source.title, source.uri);
                    }
                }
                println!();
            }
            AdviceState::Failed(reason) => println!("Advice unavailable: {}", reason),
            AdviceState::InFlight => println!("The advice request is still running..."),
            AdviceState::Idle => println!("No advice yet. Run 'advice' or 'advice live'."),
        }
    }

    pub fn render_help(&self) {
        println!("Commands:");
        println!("  show                      render the form and computed prices");
        println!("  set <id> <field> <value>  edit one field (name, weight, unit, quantity, price)");
        println!("                            use '-' to clear a numeric field, units: g/ml or kg/l");
        println!("  example                   load the chocolate comparison preset");
        println!("  reset                     restore the blank form");
        println!("  advice                    ask the AI which item is the best value");
        println!("  advice live               same, grounded in live market search");
        println!("  config                    show model and exchange rate");
        println!("  quit                      end the session");
        println!();
        println!("1 EUR = {} BGN", self.config.eur_to_bgn);
    }
}
