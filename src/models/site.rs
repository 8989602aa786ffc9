// ============================================================================
// JSON Parsing Functions
// ============================================================================
//
// File-based imports and fixtures arrive as raw JSON site records. Parsing
// goes through the same validation and normalization as the HTTP write path,
// so a record that bypasses REST still cannot reach the repository invalid.

use crate::api;
use crate::models::calendar::sort_exceptions;
use crate::services::validation::validate;
use anyhow::{Context, Result};

#[derive(serde::Deserialize)]
struct SiteInput {
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub opening_weekdays: Vec<api::OpeningWeekday>,
    #[serde(default)]
    pub opening_exceptions: Vec<api::OpeningException>,
}

fn validate_input_site(site_json: &str) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(site_json).context("Invalid site JSON")?;
    let has_weekdays = value
        .as_object()
        .and_then(|obj| obj.get("opening_weekdays"))
        .is_some();
    if !has_weekdays {
        anyhow::bail!("Missing required 'opening_weekdays' field");
    }
    Ok(())
}

/// Parse a site record from a JSON string.
///
/// Deserializes with Serde (unknown weekday names fail here), runs the
/// schedule validator, and sorts the exception list into the canonical
/// ascending order before returning.
pub fn parse_site_json_str(site_json: &str) -> Result<api::Site> {
    validate_input_site(site_json)?;

    let input: SiteInput = serde_json::from_str(site_json)
        .context("Failed to deserialize site JSON using Serde")?;

    validate(&input.opening_weekdays, &input.opening_exceptions)
        .context("Site schedule failed validation")?;

    let mut opening_exceptions = input.opening_exceptions;
    sort_exceptions(&mut opening_exceptions);

    Ok(api::Site {
        id: input.id.map(api::SiteId::new),
        name: input.name,
        address: input.address,
        email: input.email,
        notes: input.notes,
        opening_weekdays: input.opening_weekdays,
        opening_exceptions,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_SITE: &str = r#"{
        "name": "Main reading room",
        "opening_weekdays": [
            {"weekday": "monday", "is_open": true},
            {"weekday": "tuesday", "is_open": true},
            {"weekday": "wednesday", "is_open": true},
            {"weekday": "thursday", "is_open": true},
            {"weekday": "friday", "is_open": true},
            {"weekday": "saturday", "is_open": false},
            {"weekday": "sunday", "is_open": false}
        ],
        "opening_exceptions": [
            {"title": "Spring maintenance", "start_date": "2000-03-10", "end_date": "2000-03-12", "is_open": false},
            {"start_date": "2000-01-02", "end_date": "2000-01-04", "is_open": true}
        ]
    }"#;

    #[test]
    fn test_parse_minimal_site() {
        let site = parse_site_json_str(MINIMAL_SITE).expect("should parse");
        assert_eq!(site.name, "Main reading room");
        assert_eq!(site.opening_weekdays.len(), 7);
        assert_eq!(site.opening_exceptions.len(), 2);
    }

    #[test]
    fn test_parse_sorts_exceptions() {
        let site = parse_site_json_str(MINIMAL_SITE).unwrap();
        assert_eq!(
            site.opening_exceptions[0].start_date,
            "2000-01-02".parse().unwrap()
        );
        assert_eq!(
            site.opening_exceptions[1].title.as_deref(),
            Some("Spring maintenance")
        );
    }

    #[test]
    fn test_missing_opening_weekdays_key() {
        let result = parse_site_json_str(r#"{"name": "x"}"#);
        assert!(result.is_err(), "Should fail without opening_weekdays key");
    }

    #[test]
    fn test_invalid_json() {
        let result = parse_site_json_str("not valid json {");
        assert!(result.is_err(), "Should fail with invalid JSON");
    }

    #[test]
    fn test_unknown_weekday_name_rejected() {
        let json = r#"{
            "name": "x",
            "opening_weekdays": [{"weekday": "foobar", "is_open": true}]
        }"#;
        let result = parse_site_json_str(json);
        assert!(result.is_err(), "Should fail on unknown weekday name");
    }

    #[test]
    fn test_invalid_schedule_rejected() {
        // Seven valid entries but every weekday closed.
        let json = r#"{
            "name": "x",
            "opening_weekdays": [
                {"weekday": "monday", "is_open": false},
                {"weekday": "tuesday", "is_open": false},
                {"weekday": "wednesday", "is_open": false},
                {"weekday": "thursday", "is_open": false},
                {"weekday": "friday", "is_open": false},
                {"weekday": "saturday", "is_open": false},
                {"weekday": "sunday", "is_open": false}
            ]
        }"#;
        let result = parse_site_json_str(json);
        assert!(result.is_err(), "Should fail schedule validation");
    }
}
