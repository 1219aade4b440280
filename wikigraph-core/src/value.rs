//! Typed value decoding and display rendering
//!
//! A claim payload is opaque JSON whose shape is keyed by the snak
//! datatype. [`TypedValue::decode`] turns the `(datatype, payload)` pair
//! into a tagged value with an explicit fallback arm for datatypes this
//! service does not know; [`TypedValue::display`] renders it to the
//! string form used by both the triple and table projections.

use crate::error::RenderError;
use crate::model::Snak;
use serde_json::Value as JsonValue;
use tracing::warn;

/// Datatypes whose values reference another entity (Q/P identifier).
pub const ENTITY_REF_DATATYPES: [&str; 2] = ["wikibase-item", "wikibase-property"];

/// Check whether a datatype references another entity.
pub fn is_entity_ref_datatype(datatype: &str) -> bool {
    ENTITY_REF_DATATYPES.contains(&datatype)
}

/// A decoded claim value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Reference to another entity or property (bare Q/P identifier)
    EntityRef(String),
    /// ISO-like timestamp, rendered at date precision
    Time(String),
    /// Monolingual text
    Monolingual(String),
    /// Numeric amount as the raw string (no unit resolution)
    Quantity(String),
    /// Globe coordinate
    GlobeCoordinate {
        latitude: f64,
        longitude: f64,
        altitude: Option<f64>,
        precision: Option<f64>,
        globe: String,
    },
    /// Plain string or URL
    Literal(String),
    /// Unknown datatype: raw payload passed through unmodified
    Other(JsonValue),
}

impl TypedValue {
    /// Decode a payload according to its datatype.
    ///
    /// Structural failures (a field the datatype promises is missing or
    /// of the wrong shape) are rendering faults, not silent `None`s.
    pub fn decode(datatype: &str, payload: &JsonValue) -> Result<Self, RenderError> {
        match datatype {
            "wikibase-item" | "wikibase-property" => {
                let id = str_field(payload, "id")
                    .ok_or_else(|| RenderError::new(datatype, "missing entity id", payload))?;
                Ok(TypedValue::EntityRef(id.to_string()))
            }
            "time" => {
                let time = str_field(payload, "time")
                    .ok_or_else(|| RenderError::new(datatype, "missing time field", payload))?;
                Ok(TypedValue::Time(time.to_string()))
            }
            "monolingualtext" => {
                let text = str_field(payload, "text")
                    .ok_or_else(|| RenderError::new(datatype, "missing text field", payload))?;
                Ok(TypedValue::Monolingual(text.to_string()))
            }
            "quantity" => {
                let amount = str_field(payload, "amount")
                    .ok_or_else(|| RenderError::new(datatype, "missing amount field", payload))?;
                Ok(TypedValue::Quantity(amount.to_string()))
            }
            "globe-coordinate" => {
                let latitude = num_field(payload, "latitude")
                    .ok_or_else(|| RenderError::new(datatype, "missing latitude", payload))?;
                let longitude = num_field(payload, "longitude")
                    .ok_or_else(|| RenderError::new(datatype, "missing longitude", payload))?;
                let globe = str_field(payload, "globe")
                    .ok_or_else(|| RenderError::new(datatype, "missing globe", payload))?;
                Ok(TypedValue::GlobeCoordinate {
                    latitude,
                    longitude,
                    altitude: num_field(payload, "altitude"),
                    precision: num_field(payload, "precision"),
                    globe: globe.to_string(),
                })
            }
            "string" | "url" => {
                let s = payload
                    .as_str()
                    .ok_or_else(|| RenderError::new(datatype, "payload is not a string", payload))?;
                Ok(TypedValue::Literal(s.to_string()))
            }
            other => {
                warn!(datatype = other, "unrecognized claim datatype, passing payload through");
                Ok(TypedValue::Other(payload.clone()))
            }
        }
    }

    /// Render the value to its display string.
    ///
    /// `use_prefix` controls whether entity references carry the
    /// entity-URI prefix or stay as bare identifiers.
    pub fn display(&self, use_prefix: bool, entity_prefix: &str) -> String {
        match self {
            TypedValue::EntityRef(id) => {
                if use_prefix {
                    format!("{entity_prefix}{id}")
                } else {
                    id.clone()
                }
            }
            // Date-precision truncation: first 11 chars, e.g. "+2001-01-01"
            TypedValue::Time(time) => time.chars().take(11).collect(),
            TypedValue::Monolingual(text) => text.clone(),
            TypedValue::Quantity(amount) => amount.clone(),
            // Field order and labels are an external contract; table and
            // triple consumers depend on this exact format.
            TypedValue::GlobeCoordinate {
                latitude,
                longitude,
                altitude,
                precision,
                globe,
            } => format!(
                "Latitud: {} Longitud: {} Altitud: {} Presición: {} Planeta: {}",
                format_float(*latitude),
                format_float(*longitude),
                OptNum(*altitude),
                OptNum(*precision),
                globe
            ),
            TypedValue::Literal(s) => s.clone(),
            TypedValue::Other(raw) => match raw {
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            },
        }
    }
}

/// Render a snak to its display string, or `None` when it carries no value.
pub fn render(
    snak: &Snak,
    use_prefix: bool,
    entity_prefix: &str,
) -> Result<Option<String>, RenderError> {
    match &snak.datavalue {
        Some(dv) => {
            let typed = TypedValue::decode(&snak.datatype, &dv.value)?;
            Ok(Some(typed.display(use_prefix, entity_prefix)))
        }
        None => Ok(None),
    }
}

fn str_field<'a>(payload: &'a JsonValue, field: &str) -> Option<&'a str> {
    payload.get(field).and_then(|v| v.as_str())
}

fn num_field(payload: &JsonValue, field: &str) -> Option<f64> {
    payload.get(field).and_then(|v| v.as_f64())
}

/// Display helper rendering an absent number as `None`, matching the
/// established coordinate string contract.
struct OptNum(Option<f64>);

impl std::fmt::Display for OptNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(n) => f.write_str(&format_float(n)),
            None => write!(f, "None"),
        }
    }
}

/// Decimal rendering of a coordinate number. Part of the coordinate
/// string contract: integral values keep a trailing `.0`, and magnitudes
/// below 1e-4 or at or above 1e16 use exponent notation with a signed
/// two-digit exponent (`1e-05`, `1e+16`).
fn format_float(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    // Shortest round-trip digits, normalized through scientific form.
    let sci = format!("{n:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let width = digits.len() as i32;

    let body = if exp < -4 || exp >= 16 {
        let head = if width > 1 {
            format!("{}.{}", &digits[..1], &digits[1..])
        } else {
            digits
        };
        format!("{head}e{}{:02}", if exp < 0 { '-' } else { '+' }, exp.abs())
    } else if exp >= width - 1 {
        format!("{digits}{}.0", "0".repeat((exp - (width - 1)) as usize))
    } else if exp >= 0 {
        let split = (exp + 1) as usize;
        format!("{}.{}", &digits[..split], &digits[split..])
    } else {
        format!("0.{}{digits}", "0".repeat((-exp - 1) as usize))
    };
    format!("{sign}{body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataValue;
    use serde_json::json;

    const PREFIX: &str = "http://www.wikidata.org/entity/";

    fn snak(datatype: &str, value: JsonValue) -> Snak {
        Snak {
            datatype: datatype.to_string(),
            datavalue: Some(DataValue {
                value,
                value_type: None,
            }),
        }
    }

    #[test]
    fn entity_ref_prefixed_and_bare() {
        let s = snak("wikibase-item", json!({"id": "Q2"}));
        assert_eq!(
            render(&s, true, PREFIX).unwrap().unwrap(),
            "http://www.wikidata.org/entity/Q2"
        );
        assert_eq!(render(&s, false, PREFIX).unwrap().unwrap(), "Q2");
    }

    #[test]
    fn time_truncates_to_date_precision() {
        let s = snak("time", json!({"time": "+2001-01-15T00:00:00Z"}));
        assert_eq!(render(&s, true, PREFIX).unwrap().unwrap(), "+2001-01-15");
    }

    #[test]
    fn monolingual_and_quantity() {
        let m = snak("monolingualtext", json!({"text": "hola", "language": "es"}));
        assert_eq!(render(&m, true, PREFIX).unwrap().unwrap(), "hola");

        let q = snak("quantity", json!({"amount": "+42", "unit": "1"}));
        assert_eq!(render(&q, true, PREFIX).unwrap().unwrap(), "+42");
    }

    #[test]
    fn globe_coordinate_format_is_stable() {
        let s = snak(
            "globe-coordinate",
            json!({
                "latitude": 51.5,
                "longitude": -0.1,
                "altitude": null,
                "precision": 0.01,
                "globe": "http://www.wikidata.org/entity/Q2"
            }),
        );
        assert_eq!(
            render(&s, true, PREFIX).unwrap().unwrap(),
            "Latitud: 51.5 Longitud: -0.1 Altitud: None Presición: 0.01 \
             Planeta: http://www.wikidata.org/entity/Q2"
        );
    }

    #[test]
    fn coordinate_numbers_keep_decimal_form() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-12.0), "-12.0");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(51.5), "51.5");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1500000000000000.0), "1500000000000000.0");
        assert_eq!(format_float(-2.5e-7), "-2.5e-07");
    }

    #[test]
    fn integral_coordinate_fields_render_with_trailing_zero() {
        let s = snak(
            "globe-coordinate",
            json!({
                "latitude": 1.0,
                "longitude": -12.0,
                "altitude": 2.0,
                "precision": 0.00001,
                "globe": "http://www.wikidata.org/entity/Q2"
            }),
        );
        assert_eq!(
            render(&s, true, PREFIX).unwrap().unwrap(),
            "Latitud: 1.0 Longitud: -12.0 Altitud: 2.0 Presición: 1e-05 \
             Planeta: http://www.wikidata.org/entity/Q2"
        );
    }

    #[test]
    fn unknown_datatype_passes_raw_value_through() {
        let s = snak("musical-notation", json!("\\relative c'"));
        assert_eq!(render(&s, true, PREFIX).unwrap().unwrap(), "\\relative c'");
    }

    #[test]
    fn missing_datavalue_renders_none() {
        let s = Snak {
            datatype: "wikibase-item".to_string(),
            datavalue: None,
        };
        assert_eq!(render(&s, true, PREFIX).unwrap(), None);
    }

    #[test]
    fn structural_failure_is_a_render_fault() {
        let s = snak("wikibase-item", json!({"numeric-id": 2}));
        let err = render(&s, true, PREFIX).unwrap_err();
        assert_eq!(err.datatype, "wikibase-item");
        assert!(err.to_string().contains("missing entity id"));
    }
}
