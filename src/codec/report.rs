// Report decoding: plaintext JSON -> typed `Report`.

use serde_json::{Map, Number, Value};

use crate::error::ParseError;
use crate::storage::TeamId;

/// One decoded telemetry payload. `None` means the device did not report the
/// value (absent or `null`), which is distinct from reporting zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub team_id: TeamId,
    pub temperature: Option<Number>,
    pub humidity: Option<Number>,
    pub timestamp: Option<String>,
}

pub fn parse(text: &str) -> Result<Report, ParseError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(mut fields) = value else {
        return Err(ParseError::NotAnObject);
    };

    Ok(Report {
        team_id: team_id(&mut fields)?,
        temperature: measurement(&mut fields, "temperature")?,
        humidity: measurement(&mut fields, "humidity")?,
        timestamp: timestamp(&mut fields)?,
    })
}

fn team_id(fields: &mut Map<String, Value>) -> Result<TeamId, ParseError> {
    let id = match fields.remove("team_number") {
        None | Some(Value::Null) => return Err(ParseError::MissingTeamNumber),
        Some(Value::Number(n)) => TeamId::from_number(&n).ok_or_else(|| n.to_string()),
        Some(Value::String(s)) => TeamId::from_text(&s).ok_or_else(|| format!("{s:?}")),
        Some(other) => Err(other.to_string()),
    };
    id.map_err(ParseError::InvalidTeamNumber)
}

fn measurement(
    fields: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Option<Number>, ParseError> {
    match fields.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n)),
        Some(other) => Err(ParseError::InvalidField {
            field,
            reason: format!("expected a number, got {other}"),
        }),
    }
}

// The store treats timestamps as opaque; numbers are kept as their text.
fn timestamp(fields: &mut Map<String, Value>) -> Result<Option<String>, ParseError> {
    match fields.remove("timestamp") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(ParseError::InvalidField {
            field: "timestamp",
            reason: format!("expected a string or number, got {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_report() {
        let r = parse(
            r#"{"team_number": 7, "temperature": 21.5, "humidity": 40, "timestamp": "12:00"}"#,
        )
        .unwrap();
        assert_eq!(r.team_id, TeamId::from(7));
        assert_eq!(r.temperature.unwrap().to_string(), "21.5");
        assert_eq!(r.humidity.unwrap().to_string(), "40");
        assert_eq!(r.timestamp.as_deref(), Some("12:00"));
    }

    #[test]
    fn keeps_number_representation() {
        let r = parse(r#"{"team_number": "7", "temperature": 22.0, "humidity": 41}"#).unwrap();
        assert_eq!(r.team_id, TeamId::from(7));
        assert_eq!(r.temperature.unwrap().to_string(), "22.0");
        assert_eq!(r.humidity.unwrap().to_string(), "41");
    }

    #[test]
    fn absent_is_not_zero() {
        let r = parse(r#"{"team_number": 4, "temperature": 0, "humidity": null}"#).unwrap();
        assert_eq!(r.temperature, Some(Number::from(0)));
        assert_eq!(r.humidity, None);
        assert_eq!(r.timestamp, None);
    }

    #[test]
    fn numeric_timestamp_kept_as_text() {
        let r = parse(r#"{"team_number": 1, "timestamp": 1730412000}"#).unwrap();
        assert_eq!(r.timestamp.as_deref(), Some("1730412000"));
    }

    #[test]
    fn ignores_unknown_fields() {
        let r = parse(r#"{"team_number": 2, "pressure": 1013}"#).unwrap();
        assert_eq!(r.team_id, TeamId::from(2));
    }

    #[test]
    fn float_text_team_number_matches_its_numeric_form() {
        let from_text = parse(r#"{"team_number": "7.0"}"#).unwrap();
        let from_number = parse(r#"{"team_number": 7.0}"#).unwrap();
        assert_eq!(from_text.team_id, TeamId::from(7));
        assert_eq!(from_text.team_id, from_number.team_id);
        assert_eq!(parse(r#"{"team_number": "1e2"}"#).unwrap().team_id, TeamId::from(100));
    }

    #[test]
    fn textual_team_ids_survive() {
        let r = parse(r#"{"team_number": "lab-a"}"#).unwrap();
        assert_eq!(r.team_id, TeamId::Name("lab-a".into()));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(parse("{team_number: 7"), Err(ParseError::InvalidJson(_))));
        assert!(matches!(parse(""), Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn rejects_non_objects() {
        assert!(matches!(parse("[7, 21.5, 40, \"12:00\"]"), Err(ParseError::NotAnObject)));
        assert!(matches!(parse("7"), Err(ParseError::NotAnObject)));
    }

    #[test]
    fn rejects_missing_team_number() {
        assert!(matches!(parse(r#"{"temperature": 20}"#), Err(ParseError::MissingTeamNumber)));
        assert!(matches!(parse(r#"{"team_number": null}"#), Err(ParseError::MissingTeamNumber)));
    }

    #[test]
    fn rejects_unusable_team_number() {
        for body in [
            r#"{"team_number": ""}"#,
            r#"{"team_number": 7.5}"#,
            r#"{"team_number": "7.5"}"#,
            r#"{"team_number": true}"#,
            r#"{"team_number": [7]}"#,
        ] {
            assert!(
                matches!(parse(body), Err(ParseError::InvalidTeamNumber(_))),
                "accepted {body}"
            );
        }
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        let err = parse(r#"{"team_number": 1, "temperature": "warm"}"#).unwrap_err();
        assert!(matches!(err, ParseError::InvalidField { field: "temperature", .. }));
        let err = parse(r#"{"team_number": 1, "timestamp": {"h": 12}}"#).unwrap_err();
        assert!(matches!(err, ParseError::InvalidField { field: "timestamp", .. }));
    }
}
