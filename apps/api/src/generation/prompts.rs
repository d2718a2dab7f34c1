// Prompt constants and builders for offer-text generation.

use serde_json::{json, Value};

use crate::generation::validation::ValidOffer;

/// System prompt: house style rules for Danish "ja tak" Facebook posts.
pub const OFFER_SYSTEM: &str = r##"Du skriver danske “ja tak”-tekster til Facebook for en dagligvarebutik. Følg reglerne nøje:

1) Åbning
- Start altid med: "Ja tak – <VARENAVN>" i starten af teksten.

2) Pris
- Format: "xx,xx kr./<enhed>" (komma som decimal, enhed er påkrævet: fx /kg, /stk, /pk).
- Ingen "kun", "vild pris" eller "spar".

3) Afhentning
- Brug præcis den fritekst, brugeren har skrevet, uden at opfinde nyt.
- Normalisér til én klar sætning (fx "Afhent senest torsdag kl. 17." eller "Afhent fra onsdag kl. 10 og senest torsdag.").
- Hvis teksten er tvetydig, skriv: Afhent: "<brugerens tekst>".

4) Øvrig info/billednote
- Bruges som kontekst til tone/ordvalg. Navne på medarbejdere må gerne indgå i teksten (fornavn/rolle; undgå fulde navne og følsomme oplysninger).

5) Toner & temaer (flere kan være valgt)
- Sjov: tydelig humor, interne jokes, ordspil.
- Neutral: nøgtern og faktuel.
- Alvorlig: formelt sprog, ingen humor.
- Premium/kvalitet: ord som "nøje udvalgt", "høj kvalitet" uden overdrivelse (ingen falske claims).
- Prisfokus: sæt prislinjen tydeligt i fokus (fx "Skærpet pris – 129,00 kr./kg").
- Lokal: tilføj en separat afsluttende linje i betydningen "Støt lokalt." (må varieres).
- Temaer: Jul, Påske, Sommer, Weekend, Kød, Bager, Frugt & grønt, Drikke. Brug relevante emojis og ordvalg, men sparsomme emojis.

6) Stil & længde
- Op til ca. 500 tegn (må være kortere). Ingen krav til antal linjer.
- Vare og pris skal fremgå tydeligt tidligt i teksten.
- Afhentningsinfo skal med, men må flettes ind naturligt.
- Ingen overbud, falske claims eller før/nu-priser.

7) Sprog
- Dansk, almindelig butikstone, tilpas efter valgte toner/temaer.

8) Hashtags
- Afslut altid med "#superbrugsenjels #jatak" plus relevante ekstra hashtags baseret på indholdet og de valgte toner/temaer."##;

/// Shown instead of a tone list when the caller selected none.
const NO_TONES: &str = "(ingen valgt)";

/// Builds the user message: one `Label: value` line per present field.
/// Empty pickup and extra notes are left out rather than sent blank.
pub fn build_user_content(offer: &ValidOffer) -> String {
    let mut lines = vec![
        format!("Varenavn: {}", offer.product),
        format!("Pris: {}", offer.price),
        format!("Enhed: {}", offer.unit),
    ];

    if let Some(note) = &offer.pickup_note {
        lines.push(format!("Afhentning (fri tekst): {note}"));
    }
    if let Some(note) = &offer.extra_note {
        lines.push(format!("Øvrig info/billednote: {note}"));
    }

    let tones = if offer.tones.is_empty() {
        NO_TONES.to_string()
    } else {
        offer.tones.join(", ")
    };
    lines.push(format!("Toner/Temaer: {tones}"));

    let emojis = if offer.emojis {
        "tilladt"
    } else {
        "ikke tilladt"
    };
    lines.push(format!("Emojis: {emojis}"));

    lines.join("\n")
}

/// Strict structured-output schema: `bodyText` required, `extraHashtags`
/// and a `debug.normalizedPickup` echo optional.
pub fn offer_text_schema() -> Value {
    json!({
        "name": "OfferText",
        "schema": {
            "type": "object",
            "properties": {
                "bodyText": {
                    "type": "string",
                    "description": "Samlet tekst, klar til copy/paste."
                },
                "extraHashtags": {
                    "type": "array",
                    "items": { "type": "string" }
                },
                "debug": {
                    "type": "object",
                    "properties": {
                        "normalizedPickup": { "type": "string" }
                    }
                }
            },
            "required": ["bodyText"]
        },
        "strict": true
    })
}
