//! Structural validation of incoming task batches.
//!
//! This is the gate in front of the scoring engine. It only checks shape:
//! every item must be an object with a non-empty `title`, and optional
//! fields must have usable JSON types. Semantic recovery (unparseable
//! dates, out-of-range importance) stays with the normalizer.
//!
//! Validation is all-or-nothing: every item is checked and errors are
//! collected per index, but no records are released unless all pass.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{ItemErrors, ValidationError};
use crate::task::{DueDate, Scalar, TaskRecord};

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_STRING: &str = "Not a valid string.";
const NOT_NUMBER: &str = "A valid number is required.";

/// A parsed request: the task batch plus an optional strategy name.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeRequest {
    pub tasks: Vec<TaskRecord>,
    pub strategy: Option<String>,
}

/// Parse a request body.
///
/// Accepts either a bare array of tasks or an object with a `tasks` array
/// and an optional `strategy` string.
///
/// # Errors
///
/// [`ValidationError::NotAnArray`] when no task array is present, or
/// [`ValidationError::Items`] when any item fails its structural checks.
pub fn parse_request(body: &Value) -> Result<AnalyzeRequest, ValidationError> {
    match body {
        Value::Array(_) => Ok(AnalyzeRequest {
            tasks: validate_batch(body)?,
            strategy: None,
        }),
        Value::Object(obj) => {
            let tasks = validate_batch(obj.get("tasks").unwrap_or(&Value::Null))?;
            let strategy = obj
                .get("strategy")
                .and_then(Value::as_str)
                .map(str::to_string);
            Ok(AnalyzeRequest { tasks, strategy })
        }
        _ => Err(ValidationError::NotAnArray),
    }
}

/// Validate a JSON array of task items and convert it to records.
///
/// # Errors
///
/// See [`parse_request`].
pub fn validate_batch(tasks: &Value) -> Result<Vec<TaskRecord>, ValidationError> {
    let items = tasks.as_array().ok_or(ValidationError::NotAnArray)?;

    let mut records = Vec::with_capacity(items.len());
    let mut failures = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match validate_item(item) {
            Ok(record) => records.push(record),
            Err(errors) => failures.push(ItemErrors { index, errors }),
        }
    }

    if failures.is_empty() {
        Ok(records)
    } else {
        Err(ValidationError::Items(failures))
    }
}

type FieldErrors = BTreeMap<String, Vec<String>>;

fn validate_item(item: &Value) -> Result<TaskRecord, FieldErrors> {
    let mut errors = FieldErrors::new();

    let Some(obj) = item.as_object() else {
        errors.insert(
            "non_field_errors".into(),
            vec!["Invalid data. Expected a dictionary.".into()],
        );
        return Err(errors);
    };

    let title = match obj.get("title") {
        None => field_error(&mut errors, "title", REQUIRED),
        Some(value) => match string_field(value, false) {
            Ok(Some(title)) => Some(title),
            Ok(None) => field_error(&mut errors, "title", NOT_NULL),
            Err(message) => field_error(&mut errors, "title", message),
        },
    };

    let id = optional(obj, "id", &mut errors, |v| string_field(v, true));
    let due_date = optional(obj, "due_date", &mut errors, |v| string_field(v, true))
        .map(DueDate::Text);
    let estimated_hours = optional(obj, "estimated_hours", &mut errors, number_field);
    let importance = optional(obj, "importance", &mut errors, number_field);
    let dependencies = dependencies_field(obj, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(TaskRecord {
        id,
        title,
        due_date,
        estimated_hours: estimated_hours.map(Scalar::Number),
        importance: importance.map(Scalar::Number),
        dependencies,
    })
}

fn field_error<T>(errors: &mut FieldErrors, field: &str, message: &str) -> Option<T> {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
    None
}

/// Read an optional, nullable field with `parse`.
fn optional<T>(
    obj: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
    parse: impl Fn(&Value) -> Result<Option<T>, &'static str>,
) -> Option<T> {
    let value = obj.get(field)?;
    match parse(value) {
        Ok(parsed) => parsed,
        Err(message) => field_error(errors, field, message),
    }
}

/// Strings are trimmed, numbers are rendered as text, null maps to `None`.
fn string_field(value: &Value, allow_blank: bool) -> Result<Option<String>, &'static str> {
    let text = match value {
        Value::Null => return Ok(None),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(NOT_STRING),
    };
    if !allow_blank && text.is_empty() {
        return Err(BLANK);
    }
    Ok(Some(text))
}

/// Numbers and numeric strings pass, null maps to `None`.
fn number_field(value: &Value) -> Result<Option<f64>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or(NOT_NUMBER),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or(NOT_NUMBER),
        _ => Err(NOT_NUMBER),
    }
}

fn dependencies_field(obj: &Map<String, Value>, errors: &mut FieldErrors) -> Vec<String> {
    let Some(value) = obj.get("dependencies") else {
        return Vec::new();
    };
    let Some(items) = value.as_array() else {
        let message = if value.is_null() {
            NOT_NULL.to_string()
        } else {
            format!("Expected a list of items but got type \"{}\".", json_type(value))
        };
        errors.entry("dependencies".into()).or_default().push(message);
        return Vec::new();
    };

    let mut deps = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match string_field(item, false) {
            Ok(Some(dep)) => deps.push(dep),
            Ok(None) => {
                field_error::<()>(errors, "dependencies", &format!("Item {i}: {NOT_NULL}"));
            }
            Err(message) => {
                field_error::<()>(errors, "dependencies", &format!("Item {i}: {message}"));
            }
        }
    }
    deps
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
