//! Offer generation — runs one validated offer through the model.
//!
//! Flow: build prompts → one completion call → decode structured output
//!       (falling back to raw text) → enforce mandatory hashtags.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::generation::hashtags::enforce_hashtags;
use crate::generation::prompts::{build_user_content, offer_text_schema, OFFER_SYSTEM};
use crate::generation::validation::ValidOffer;
use crate::llm_client::CompletionBackend;
use crate::models::offer::OfferResponse;

/// What the model sent back, after decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedOffer {
    pub body_text: String,
    pub extra_hashtags: Vec<String>,
    /// The model's own one-sentence reading of the pickup note, if it gave one.
    pub normalized_pickup: Option<String>,
}

/// Decodes the model's message content.
///
/// Content that is not JSON at all is taken as the body itself with no extra
/// tags. Valid JSON of the wrong shape yields an empty body; non-string
/// hashtag entries are dropped.
pub fn decode_completion(content: &str) -> DecodedOffer {
    let parsed: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            warn!("Completion was not structured JSON ({e}); using raw text");
            return DecodedOffer {
                body_text: content.to_string(),
                ..Default::default()
            };
        }
    };

    let body_text = parsed
        .get("bodyText")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let extra_hashtags = parsed
        .get("extraHashtags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let normalized_pickup = parsed
        .pointer("/debug/normalizedPickup")
        .and_then(Value::as_str)
        .map(str::to_string);

    DecodedOffer {
        body_text,
        extra_hashtags,
        normalized_pickup,
    }
}

/// Generates the offer text for a validated request.
///
/// Upstream non-success surfaces as `AppError::Upstream`; every other client
/// failure as `AppError::Internal`.
pub async fn generate_offer_text(
    backend: &dyn CompletionBackend,
    offer: &ValidOffer,
    log_prompts: bool,
) -> Result<OfferResponse, AppError> {
    let user_content = build_user_content(offer);

    if log_prompts {
        info!("=== SYSTEM PROMPT ===\n{OFFER_SYSTEM}");
        info!("=== USER CONTENT ===\n{user_content}");
    }

    let schema = offer_text_schema();
    let content = backend
        .complete(OFFER_SYSTEM, &user_content, &schema)
        .await?;

    let decoded = decode_completion(&content);
    if let Some(pickup) = &decoded.normalized_pickup {
        debug!("Model normalized pickup note to: {pickup}");
    }

    let text = enforce_hashtags(&decoded.body_text, &decoded.extra_hashtags);
    info!(
        "Generated offer text for '{}' ({} chars, {} extra hashtags)",
        offer.product,
        text.chars().count(),
        decoded.extra_hashtags.len()
    );

    Ok(OfferResponse {
        text,
        body_text: decoded.body_text,
        extra_hashtags: decoded.extra_hashtags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::FakeBackend;

    fn offer() -> ValidOffer {
        ValidOffer {
            product: "Æbler".to_string(),
            price: "12,00".to_string(),
            unit: "/kg".to_string(),
            pickup_note: Some("torsdag".to_string()),
            extra_note: None,
            tones: vec!["Frugt & grønt".to_string()],
            emojis: true,
        }
    }

    #[test]
    fn test_decode_structured_output() {
        let decoded = decode_completion(
            r##"{"bodyText":"Ja tak – Æbler","extraHashtags":["#frugt"],"debug":{"normalizedPickup":"Afhent torsdag."}}"##,
        );
        assert_eq!(decoded.body_text, "Ja tak – Æbler");
        assert_eq!(decoded.extra_hashtags, vec!["#frugt"]);
        assert_eq!(decoded.normalized_pickup.as_deref(), Some("Afhent torsdag."));
    }

    #[test]
    fn test_decode_plain_text_falls_back_to_raw() {
        let decoded = decode_completion("Ja tak – Mælk 10,00 kr./l");
        assert_eq!(decoded.body_text, "Ja tak – Mælk 10,00 kr./l");
        assert!(decoded.extra_hashtags.is_empty());
        assert_eq!(decoded.normalized_pickup, None);
    }

    #[test]
    fn test_decode_empty_content_falls_back_to_empty_body() {
        assert_eq!(decode_completion(""), DecodedOffer::default());
    }

    #[test]
    fn test_decode_wrong_shapes_are_tolerated() {
        let decoded = decode_completion(r##"{"bodyText":42,"extraHashtags":"#frugt"}"##);
        assert_eq!(decoded.body_text, "");
        assert!(decoded.extra_hashtags.is_empty());

        let decoded = decode_completion(r##"{"bodyText":"Hej","extraHashtags":["#a",7,null,"#b"]}"##);
        assert_eq!(decoded.extra_hashtags, vec!["#a", "#b"]);

        let decoded = decode_completion("\"just a string\"");
        assert_eq!(decoded.body_text, "");
    }

    #[tokio::test]
    async fn test_generate_null_content_degrades_to_tag_line() {
        assert_eq!(decode_completion("null"), DecodedOffer::default());

        let backend = FakeBackend::content("null");
        let response = generate_offer_text(&backend, &offer(), false).await.unwrap();
        assert_eq!(response.body_text, "");
        assert!(response.extra_hashtags.is_empty());
        assert_eq!(response.text, "#superbrugsenjels #jatak");
    }

    #[tokio::test]
    async fn test_generate_keeps_body_that_already_has_tags() {
        let backend = FakeBackend::content(
            r##"{"bodyText":"Ja tak – Æbler 12,00 kr./kg #superbrugsenjels #jatak","extraHashtags":["#frugt"]}"##,
        );
        let response = generate_offer_text(&backend, &offer(), false).await.unwrap();

        assert_eq!(
            response.text,
            "Ja tak – Æbler 12,00 kr./kg #superbrugsenjels #jatak"
        );
        assert_eq!(response.body_text, response.text);
        assert_eq!(response.extra_hashtags, vec!["#frugt"]);
    }

    #[tokio::test]
    async fn test_generate_appends_tags_to_plain_text() {
        let backend = FakeBackend::content("Ja tak – Mælk 10,00 kr./l");
        let response = generate_offer_text(&backend, &offer(), false).await.unwrap();

        assert_eq!(response.body_text, "Ja tak – Mælk 10,00 kr./l");
        assert!(response.extra_hashtags.is_empty());
        assert_eq!(
            response.text,
            "Ja tak – Mælk 10,00 kr./l\n\n#superbrugsenjels #jatak"
        );
    }

    #[tokio::test]
    async fn test_generate_body_text_is_not_trimmed() {
        let backend = FakeBackend::content(r##"{"bodyText":"  Ja tak – Ost\n","extraHashtags":["#ost","#jatak"]}"##);
        let response = generate_offer_text(&backend, &offer(), false).await.unwrap();

        assert_eq!(response.body_text, "  Ja tak – Ost\n");
        assert_eq!(
            response.text,
            "Ja tak – Ost\n\n#superbrugsenjels #jatak #ost"
        );
        assert_eq!(response.extra_hashtags, vec!["#ost", "#jatak"]);
    }

    #[tokio::test]
    async fn test_generate_sends_fixed_system_and_built_user_prompt() {
        let backend = FakeBackend::content("Ja tak");
        generate_offer_text(&backend, &offer(), true).await.unwrap();

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, OFFER_SYSTEM);
        assert_eq!(seen[0].1, build_user_content(&offer()));
    }

    #[tokio::test]
    async fn test_generate_surfaces_upstream_error() {
        let backend = FakeBackend::status(429, "{\"error\":\"rate limited\"}");
        let err = generate_offer_text(&backend, &offer(), false)
            .await
            .unwrap_err();
        match err {
            AppError::Upstream { status, detail } => {
                assert_eq!(status, 429);
                assert_eq!(detail, "{\"error\":\"rate limited\"}");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }
}
