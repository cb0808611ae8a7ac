//! Catalog data behind the wizard's product and packaging suggestions.

use serde::{Deserialize, Serialize};

use crate::serde_ext::amount;

/// Label dimension value that asks for a quote instead of a listed size.
pub const CUSTOM_LABEL_DIMENSIONS: &str = "custom";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogProduct {
    pub id: i64,
    pub name_es: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CatalogProduct {
    /// `Aguacate/Avocado`, or the Spanish name alone.
    pub fn label(&self) -> String {
        match self.name_en.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(en) => format!("{}/{}", self.name_es, en),
            None => self.name_es.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogUnit {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelPrice {
    pub id: String,
    pub dimensions: String,
    #[serde(with = "amount")]
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Everything the items step suggests, fetched together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardCatalog {
    pub products: Vec<String>,
    pub packaging: Vec<String>,
    pub label_prices: Vec<LabelPrice>,
}

impl WizardCatalog {
    pub fn new(
        products: &[CatalogProduct],
        units: &[CatalogUnit],
        history: &[String],
        label_prices: Vec<LabelPrice>,
    ) -> Self {
        Self {
            products: products
                .iter()
                .filter(|p| p.is_active)
                .map(CatalogProduct::label)
                .collect(),
            packaging: packaging_options(units, history),
            label_prices,
        }
    }

    /// Whether `dimensions` is a free-form size rather than a listed one.
    pub fn is_custom_dimensions(&self, dimensions: Option<&str>) -> bool {
        match dimensions.map(str::trim) {
            None | Some("") => false,
            Some(CUSTOM_LABEL_DIMENSIONS) => true,
            Some(value) => !self.label_prices.iter().any(|p| p.dimensions == value),
        }
    }
}

/// Catalog unit names followed by the user's own packaging history, without
/// repeats and in first-seen order.
pub fn packaging_options(units: &[CatalogUnit], history: &[String]) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    let names = units
        .iter()
        .filter(|u| u.is_active)
        .map(|u| u.name.as_str())
        .chain(history.iter().map(String::as_str));
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !options.iter().any(|o| o == name) {
            options.push(name.to_string());
        }
    }
    options
}

/// Options containing `query`, ignoring case. An empty query matches all.
pub fn matching<'a>(options: &'a [String], query: &str) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    options
        .iter()
        .map(String::as_str)
        .filter(|o| o.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn unit(name: &str, active: bool) -> CatalogUnit {
        CatalogUnit {
            id: 1,
            name: name.into(),
            abbreviation: None,
            is_active: active,
        }
    }

    #[rstest]
    #[case(json!({"id": 1, "name_es": "Aguacate", "name_en": "Avocado", "is_active": true}), "Aguacate/Avocado")]
    #[case(json!({"id": 2, "name_es": "Limón", "is_active": true}), "Limón")]
    #[case(json!({"id": 3, "name_es": "Nopal", "name_en": " "}), "Nopal")]
    fn product_labels(#[case] raw: serde_json::Value, #[case] expected: &str) {
        let product: CatalogProduct = serde_json::from_value(raw).unwrap();
        assert_eq!(product.label(), expected);
    }

    #[test]
    fn packaging_merges_units_and_history_once() {
        let units = vec![unit("Caja", true), unit("Tarima", true), unit("Costal", false)];
        let history = vec!["Tarima".to_string(), "Caja 10kg".to_string(), " ".to_string()];

        assert_eq!(
            packaging_options(&units, &history),
            vec!["Caja", "Tarima", "Caja 10kg"]
        );
    }

    #[rstest]
    #[case("caj", vec!["Caja", "Caja 10kg"])]
    #[case("10KG", vec!["Caja 10kg"])]
    #[case("", vec!["Caja", "Tarima", "Caja 10kg"])]
    #[case("bolsa", vec![])]
    fn suggestions_match_substrings(#[case] query: &str, #[case] expected: Vec<&str>) {
        let options = vec!["Caja".to_string(), "Tarima".to_string(), "Caja 10kg".to_string()];
        assert_eq!(matching(&options, query), expected);
    }

    #[test]
    fn label_prices_accept_decimal_strings() {
        let price: LabelPrice = serde_json::from_value(json!({
            "id": "lp1",
            "dimensions": "10x15 cm",
            "price": "2.50"
        }))
        .unwrap();
        assert_eq!(price.price, 2.5);
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some(""), false)]
    #[case(Some("10x15 cm"), false)]
    #[case(Some("custom"), true)]
    #[case(Some("20x20 cm"), true)]
    fn custom_dimensions(#[case] value: Option<&str>, #[case] custom: bool) {
        let catalog = WizardCatalog {
            label_prices: vec![LabelPrice {
                id: "lp1".into(),
                dimensions: "10x15 cm".into(),
                price: 2.5,
                description: None,
            }],
            ..WizardCatalog::default()
        };
        assert_eq!(catalog.is_custom_dimensions(value), custom);
    }

    #[test]
    fn inactive_products_are_not_suggested() {
        let products: Vec<CatalogProduct> = serde_json::from_value(json!([
            {"id": 1, "name_es": "Aguacate", "is_active": true},
            {"id": 2, "name_es": "Mango", "is_active": false}
        ]))
        .unwrap();
        let catalog = WizardCatalog::new(&products, &[], &[], vec![]);
        assert_eq!(catalog.products, vec!["Aguacate"]);
    }
}
