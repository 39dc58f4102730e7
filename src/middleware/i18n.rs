// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

const DEFAULT_LANG: &str = "fr";

// Extrator de idioma. A plataforma é francesa; o inglês é a alternativa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl Locale {
    pub fn from_header(value: Option<&str>) -> Self {
        value
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first() // Pega o primeiro idioma (ex: "fr-FR")
                    .map(|tag| {
                        // "fr-FR" -> "fr"
                        tag.split('-').next().unwrap_or(tag).to_lowercase()
                    })
            })
            .map(Locale)
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok());

        Ok(Locale::from_header(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_primary_language_tag() {
        assert_eq!(Locale::from_header(Some("en-GB,en;q=0.9,fr;q=0.8")).0, "en");
        assert_eq!(Locale::from_header(Some("fr-FR")).0, "fr");
    }

    #[test]
    fn defaults_to_french() {
        assert_eq!(Locale::from_header(None), Locale::default());
        assert_eq!(Locale::from_header(Some("")).0, "fr");
    }
}
