//! HTML character entity decoding for trivia text.

/// Decodes HTML character entities, named (the full HTML5 set) and numeric.
/// Unknown entities are kept verbatim.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}
