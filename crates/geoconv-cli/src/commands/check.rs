use geoconv_core::error::ConvertError;
use geoconv_core::grammar::Grammar;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TokenCheck {
    pub token: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub fn check_tokens(tokens: &[String], grammar: &Grammar) -> Vec<TokenCheck> {
    tokens
        .iter()
        .map(|token| match grammar.parse(token) {
            Ok(c) => TokenCheck {
                token: token.clone(),
                valid: true,
                lat: Some(c.lat),
                lon: Some(c.lon),
                reason: None,
            },
            Err(e) => TokenCheck {
                token: token.clone(),
                valid: false,
                lat: None,
                lon: None,
                reason: Some(e.to_string()),
            },
        })
        .collect()
}

/// Returns `Ok(false)` when any token is invalid.
pub fn run(tokens: &[String], narrow: bool, json: bool) -> Result<bool, ConvertError> {
    let grammar = if narrow {
        Grammar::NARROW
    } else {
        Grammar::PERMISSIVE
    };
    let results = check_tokens(tokens, &grammar);

    if json {
        crate::output::json::print(&results)?;
    } else {
        crate::output::table::print_checks(&results);
    }

    Ok(results.iter().all(|r| r.valid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_valid_and_invalid_tokens() {
        let tokens = vec!["N64.062788 E67.503584".to_string(), "N64 E67".to_string()];
        let results = check_tokens(&tokens, &Grammar::PERMISSIVE);
        assert!(results[0].valid);
        assert_eq!(results[0].lat, Some(64.062788));
        assert_eq!(results[0].lon, Some(67.503584));
        assert!(!results[1].valid);
        assert!(results[1].reason.is_some());
    }

    #[test]
    fn narrow_grammar_rejects_comma_decimals() {
        let tokens = vec!["N64,062788 E67,503584".to_string()];
        assert!(!check_tokens(&tokens, &Grammar::NARROW)[0].valid);
    }
}
