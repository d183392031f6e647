use crate::model::{FieldUpdate, ProductEntry, WeightUnit};

/// The blank starting set: four empty entries, weights in grams.
pub fn default_products() -> Vec<ProductEntry> {
    (1..=4)
        .map(|i| ProductEntry {
            id: i.to_string(),
            name: format!("Product {}", i),
            weight: None,
            unit: WeightUnit::Grams,
            quantity: None,
            price_eur: None,
        })
        .collect()
}

/// Owns the product collection. Every edit replaces the collection
/// wholesale (copy-on-write), so readers never observe a partial update.
pub struct ProductStore {
    products: Vec<ProductEntry>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self {
            products: default_products(),
        }
    }

    pub fn products(&self) -> &[ProductEntry] {
        &self.products
    }

    /// Applies a single field edit to the entry with the given id.
    /// Returns false and changes nothing when the id is unknown.
    pub fn update(&mut self, id: &str, update: FieldUpdate) -> bool {
        if !self.products.iter().any(|p| p.id == id) {
            return false;
        }
        self.products = self
            .products
            .iter()
            .map(|p| {
                if p.id != id {
                    return p.clone();
                }
                let mut updated = p.clone();
                match update.clone() {
                    FieldUpdate::Name(name) => updated.name = name,
                    FieldUpdate::Weight(weight) => updated.weight = weight,
                    FieldUpdate::Unit(unit) => updated.unit = unit,
                    FieldUpdate::Quantity(quantity) => updated.quantity = quantity,
                    FieldUpdate::PriceEur(price_eur) => updated.price_eur = price_eur,
                }
                updated
            })
            .collect();
        true
    }

    /// Restores the blank default set.
    pub fn reset(&mut self) {
        self.products = default_products();
    }

    /// Loads the chocolate comparison preset: a small box against a bulk
    /// box, remaining entries blank.
    pub fn load_chocolate_example(&mut self) {
        let mut products = default_products();
        if let Some(first) = products.get_mut(0) {
            first.name = "Small Box".to_string();
            first.weight = Some(100.0);
            first.unit = WeightUnit::Grams;
            first.quantity = Some(1.0);
            first.price_eur = Some(2.99);
        }
        if let Some(second) = products.get_mut(1) {
            second.name = "Value Box".to_string();
            second.weight = Some(300.0);
            second.unit = WeightUnit::Grams;
            second.quantity = Some(1.0);
            second.price_eur = Some(4.99);
        }
        self.products = products;
    }
}
