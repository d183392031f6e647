// advisor/gemini.rs

use crate::advisor::Advisor;
use crate::model::{AdvisorError, ProductEntry, ShoppingAdvice, SourceCitation};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

/// Returned without contacting the API when no entry is filled in yet.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some product details first!";
/// Returned when the API key or model configuration is rejected.
pub const CONFIG_ERROR_MESSAGE: &str = "API Configuration error. Please check your credentials.";
/// Returned on any other failure; the locally computed labels stay valid.
pub const FALLBACK_MESSAGE: &str =
    "I'm having trouble thinking right now. But look at the calculated labels below for the best price per kg!";

const NO_TEXT_MESSAGE: &str = "I couldn't generate advice right now.";

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks")]
    grounding_chunks: Option<Vec<GroundingChunk>>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: Option<String>,
    title: Option<String>,
}

pub struct GeminiAdvisor {
    api_key: String,
    model: String,
    temperature: f64,
    client: Client,
}

impl GeminiAdvisor {
    pub fn new(api_key: String, model: String, temperature: f64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            api_key,
            model,
            temperature,
            client,
        }
    }

    async fn request_advice(
        &self,
        prompt: &str,
        use_search: bool,
    ) -> Result<(String, Vec<SourceCitation>), AdvisorError> {
        if self.api_key.is_empty() {
            return Err(AdvisorError::MissingApiKey);
        }

        let url = format!("{}/{}:generateContent", API_BASE_URL, self.model);
        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": self.temperature },
        });
        if use_search {
            body["tools"] = json!([{ "google_search": {} }]);
        }

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown".into());
            warn!("Gemini API responded [{}]: {}", status, body);
            return Err(AdvisorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(extract_advice(parsed))
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    async fn advise(&self, products: &[ProductEntry], use_search: bool) -> ShoppingAdvice {
        let valid: Vec<&ProductEntry> = products.iter().filter(|p| p.is_comparable()).collect();
        if valid.is_empty() {
            return ShoppingAdvice {
                text: EMPTY_INPUT_MESSAGE.to_string(),
                sources: Vec::new(),
                grounded: use_search,
                fetched_at: Utc::now(),
            };
        }

        let prompt = build_prompt(&valid, use_search);
        info!(
            "Requesting shopping advice for {} items (search: {})",
            valid.len(),
            use_search
        );

        match self.request_advice(&prompt, use_search).await {
            Ok((text, sources)) => {
                info!("Advice received ({} sources)", sources.len());
                ShoppingAdvice {
                    text,
                    sources,
                    grounded: use_search,
                    fetched_at: Utc::now(),
                }
            }
            Err(e) => {
                warn!("Advice request failed: {}", e);
                ShoppingAdvice {
                    text: fallback_text(&e).to_string(),
                    sources: Vec::new(),
                    grounded: use_search,
                    fetched_at: Utc::now(),
                }
            }
        }
    }
}

/// Builds the shopping-expert prompt over the comparable entries only.
fn build_prompt(items: &[&ProductEntry], use_search: bool) -> String {
    let lines: Vec<String> = items
        .iter()
        .map(|item| {
            // the caller filtered on is_comparable, so weight and price exist
            let weight = item.weight.unwrap_or(0.0);
            let price = item.price_eur.unwrap_or(0.0);
            let quantity = item.effective_quantity();
            let total_kg = item.unit.to_kg(weight) * quantity;
            format!(
                "- {}: {} pack of {}{} (Total: {:.2}kg) for {}",
                item.name, quantity, weight, item.unit, total_kg, price
            )
        })
        .collect();

    let search_note = if use_search {
        "3. Compare these prices to typical market prices for similar items to tell me if this is a \"good deal\" or \"standard price\"."
    } else {
        "3. If search is enabled, compare these prices to typical market prices for similar items to tell me if this is a \"good deal\" or \"standard price\"."
    };

    format!(
        "As a shopping expert, analyze these grocery options and tell me which is the best value and why.\n\n\
        Current scenario:\n{}\n\n\
        1. Identify the mathematical winner (lowest price per unit).\n\
        2. Explain the savings simply.\n\
        {}\n\n\
        Keep the tone professional yet friendly. Use markdown for bolding the winner.",
        lines.join("\n"),
        search_note
    )
}

/// Maps an internal failure to the fixed user-facing text. Credential and
/// model-lookup rejections surface as a configuration problem; everything
/// else reassures the user that the local labels still hold.
fn fallback_text(error: &AdvisorError) -> &'static str {
    match error {
        AdvisorError::MissingApiKey => CONFIG_ERROR_MESSAGE,
        AdvisorError::Api { status, .. } if *status == 403 || *status == 404 => {
            CONFIG_ERROR_MESSAGE
        }
        _ => FALLBACK_MESSAGE,
    }
}

fn extract_advice(response: GenerateContentResponse) -> (String, Vec<SourceCitation>) {
    let Some(candidate) = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
    else {
        return (NO_TEXT_MESSAGE.to_string(), Vec::new());
    };

    let text: String = candidate
        .content
        .and_then(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect::<Vec<_>>()
        .join("");
    let text = if text.is_empty() {
        NO_TEXT_MESSAGE.to_string()
    } else {
        text
    };

    let sources = candidate
        .grounding_metadata
        .and_then(|m| m.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|chunk| chunk.web)
        .enumerate()
        .map(|(idx, web)| SourceCitation {
            title: web.title.unwrap_or_else(|| format!("Source {}", idx + 1)),
            uri: web.uri.unwrap_or_default(),
        })
        .collect();

    (text, sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeightUnit;

    fn item(name: &str, weight: f64, unit: WeightUnit, quantity: Option<f64>, price: f64) -> ProductEntry {
        ProductEntry {
            id: "1".to_string(),
            name: name.to_string(),
            weight: Some(weight),
            unit,
            quantity,
            price_eur: Some(price),
        }
    }

    #[test]
    fn prompt_lists_each_item_with_normalized_totals() {
        let a = item("Small Box", 100.0, WeightUnit::Grams, Some(1.0), 2.99);
        let b = item("Bulk Jar", 1.5, WeightUnit::Kilograms, Some(2.0), 11.8);
        let prompt = build_prompt(&[&a, &b], false);

        assert!(prompt.contains("- Small Box: 1 pack of 100g (Total: 0.10kg) for 2.99"));
        assert!(prompt.contains("- Bulk Jar: 2 pack of 1.5kg (Total: 3.00kg) for 11.8"));
        assert!(prompt.contains("mathematical winner"));
    }

    #[test]
    fn prompt_defaults_an_unset_quantity_to_one_pack() {
        let a = item("Bar", 80.0, WeightUnit::Grams, None, 1.19);
        let prompt = build_prompt(&[&a], false);

        assert!(prompt.contains("- Bar: 1 pack of 80g (Total: 0.08kg) for 1.19"));
    }

    #[test]
    fn search_mode_asks_for_a_market_comparison() {
        let a = item("Bar", 80.0, WeightUnit::Grams, None, 1.19);
        let grounded = build_prompt(&[&a], true);
        let local = build_prompt(&[&a], false);

        assert!(grounded.contains("3. Compare these prices"));
        assert!(local.contains("3. If search is enabled"));
    }

    #[test]
    fn configuration_failures_map_to_the_credentials_message() {
        assert_eq!(
            fallback_text(&AdvisorError::MissingApiKey),
            CONFIG_ERROR_MESSAGE
        );
        assert_eq!(
            fallback_text(&AdvisorError::Api {
                status: 404,
                body: "model not found".to_string()
            }),
            CONFIG_ERROR_MESSAGE
        );
        assert_eq!(
            fallback_text(&AdvisorError::Api {
                status: 403,
                body: "forbidden".to_string()
            }),
            CONFIG_ERROR_MESSAGE
        );
    }

    #[test]
    fn backend_failures_map_to_the_reassuring_fallback() {
        assert_eq!(
            fallback_text(&AdvisorError::Api {
                status: 500,
                body: "internal".to_string()
            }),
            FALLBACK_MESSAGE
        );
    }

    #[test]
    fn response_text_and_citations_are_extracted() {
        let raw = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "Buy the " }, { "text": "**Value Box**." }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://example.com/a", "title": "Market Watch" } },
                        { "web": { "uri": "https://example.com/b" } }
                    ]
                }
            }]
        }"#;
        let parsed: GenerateContentResponse =
            serde_json::from_str(raw).expect("response should parse");
        let (text, sources) = extract_advice(parsed);

        assert_eq!(text, "Buy the **Value Box**.");
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].title, "Market Watch");
        assert_eq!(sources[1].title, "Source 2");
        assert_eq!(sources[1].uri, "https://example.com/b");
    }

    #[test]
    fn empty_response_degrades_to_the_no_text_message() {
        let parsed: GenerateContentResponse =
            serde_json::from_str("{}").expect("empty response should parse");
        let (text, sources) = extract_advice(parsed);

        assert_eq!(text, NO_TEXT_MESSAGE);
        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn advise_short_circuits_on_an_empty_form() {
        let advisor = GeminiAdvisor::new(
            String::new(),
            "gemini-3-flash-preview".to_string(),
            0.7,
        );
        let blank = ProductEntry {
            id: "1".to_string(),
            name: "Product 1".to_string(),
            weight: None,
            unit: WeightUnit::Grams,
            quantity: None,
            price_eur: None,
        };

        let advice = advisor.advise(&[blank], false).await;
        assert_eq!(advice.text, EMPTY_INPUT_MESSAGE);
        assert!(advice.sources.is_empty());
    }

    #[tokio::test]
    async fn advise_without_a_key_reports_misconfiguration() {
        let advisor = GeminiAdvisor::new(
            String::new(),
            "gemini-3-flash-preview".to_string(),
            0.7,
        );
        let filled = item("Bar", 80.0, WeightUnit::Grams, None, 1.19);

        let advice = advisor.advise(&[filled], false).await;
        assert_eq!(advice.text, CONFIG_ERROR_MESSAGE);
    }
}
