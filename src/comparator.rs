use crate::model::{ComparisonResult, ProductEntry};

/// Absolute tolerance on the per-kg EUR price used for tie detection.
/// Guards against floating-point noise from the division; prices closer
/// than this are treated as the same price.
pub const PRICE_TIE_TOLERANCE: f64 = 0.0001;

/// Computes one comparison result per entry, preserving input order, and
/// marks every result tied for the lowest positive per-kg price.
///
/// Incomplete or non-positive input is a normal state: such entries get
/// all-zero results and never win. `eur_to_bgn` is the fixed rate used for
/// the secondary display currency.
pub fn compare_products(products: &[ProductEntry], eur_to_bgn: f64) -> Vec<ComparisonResult> {
    let mut results: Vec<ComparisonResult> = products
        .iter()
        .map(|product| {
            if !product.is_comparable() {
                return ComparisonResult::not_computable(&product.id);
            }
            // is_comparable guarantees both fields are present and positive
            let (Some(weight), Some(price_eur)) = (product.weight, product.price_eur) else {
                return ComparisonResult::not_computable(&product.id);
            };

            let total_weight_kg = product.unit.to_kg(weight) * product.effective_quantity();
            let price_per_kg_eur = price_eur / total_weight_kg;

            ComparisonResult {
                id: product.id.clone(),
                price_per_kg_eur,
                price_per_kg_bgn: price_per_kg_eur * eur_to_bgn,
                is_best_value: false,
                total_weight_kg,
            }
        })
        .collect();

    let min_price = results
        .iter()
        .map(|r| r.price_per_kg_eur)
        .filter(|&p| p > 0.0)
        .fold(f64::INFINITY, f64::min);

    if min_price.is_finite() {
        for result in results.iter_mut() {
            if result.price_per_kg_eur > 0.0
                && (result.price_per_kg_eur - min_price).abs() < PRICE_TIE_TOLERANCE
            {
                result.is_best_value = true;
            }
        }
    }

    results
}
