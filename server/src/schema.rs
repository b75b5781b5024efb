//! Write-time casting and required-field checks for plan payloads.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{PlanChanges, PlanFields, PlanInput, PlanPatch};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("`{field}` is required")]
    Required { field: &'static str },

    #[error("cast to {expected} failed for `{field}`")]
    Cast {
        field: &'static str,
        expected: &'static str,
    },

    #[error("request body is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("expected a JSON object, got {found}")]
    NotAnObject { found: &'static str },
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Takes the four plan fields out of a body that must be a JSON object.
fn plan_fields(value: Value) -> Result<[Option<Value>; 4], ValidationError> {
    let mut object: Map<String, Value> = match value {
        Value::Object(object) => object,
        other => {
            return Err(ValidationError::NotAnObject {
                found: json_kind(&other),
            })
        }
    };
    let mut take = |key: &str| object.remove(key).filter(|value| !value.is_null());
    Ok([take("name"), take("duration"), take("description"), take("isPremium")])
}

impl TryFrom<Value> for PlanInput {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let [name, duration, description, is_premium] = plan_fields(value)?;
        Ok(Self {
            name,
            duration,
            description,
            is_premium,
        })
    }
}

impl TryFrom<Value> for PlanChanges {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let [name, duration, description, is_premium] = plan_fields(value)?;
        Ok(Self {
            name,
            duration,
            description,
            is_premium,
        })
    }
}

impl PlanInput {
    pub fn validate(self) -> Result<PlanFields, ValidationError> {
        let name = cast_text("name", self.name)?.map(|name| name.trim().to_string());
        let duration = cast_number("duration", self.duration)?;
        let description = cast_text("description", self.description)?;
        let is_premium = cast_bool("isPremium", self.is_premium)?;

        Ok(PlanFields {
            name: required("name", name)?,
            duration: duration.ok_or(ValidationError::Required { field: "duration" })?,
            description: required("description", description)?,
            is_premium: is_premium.unwrap_or(false),
        })
    }
}

impl PlanChanges {
    pub fn validate(self) -> Result<PlanPatch, ValidationError> {
        let name = cast_text("name", self.name)?
            .map(|name| required("name", Some(name.trim().to_string())))
            .transpose()?;
        let description = cast_text("description", self.description)?
            .map(|description| required("description", Some(description)))
            .transpose()?;

        Ok(PlanPatch {
            name,
            duration: cast_number("duration", self.duration)?,
            description,
            is_premium: cast_bool("isPremium", self.is_premium)?,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ValidationError::Required { field }),
    }
}

fn cast_text(field: &'static str, value: Option<Value>) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number_text(&number))),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(_) => Err(ValidationError::Cast {
            field,
            expected: "String",
        }),
    }
}

/// Whole floats print without a fractional part: `100.0` becomes "100".
fn number_text(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() => float.to_string(),
        _ => number.to_string(),
    }
}

fn cast_number(field: &'static str, value: Option<Value>) -> Result<Option<f64>, ValidationError> {
    let failed = ValidationError::Cast {
        field,
        expected: "Number",
    };
    let number = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) if text.trim().is_empty() => return Ok(None),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        Some(Value::Bool(flag)) => Some(if flag { 1.0 } else { 0.0 }),
        Some(_) => None,
    };
    match number {
        Some(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(failed),
    }
}

fn cast_bool(field: &'static str, value: Option<Value>) -> Result<Option<bool>, ValidationError> {
    let failed = ValidationError::Cast {
        field,
        expected: "Boolean",
    };
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(flag)),
        Some(Value::String(text)) => match text.as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(failed),
        },
        Some(Value::Number(number)) => match number.as_f64() {
            Some(n) if n == 1.0 => Ok(Some(true)),
            Some(n) if n == 0.0 => Ok(Some(false)),
            _ => Err(failed),
        },
        Some(_) => Err(failed),
    }
}
