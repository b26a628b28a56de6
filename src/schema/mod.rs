//! Declarative field validation for profile forms.
//!
//! A [`Schema`] is an ordered list of [`FieldSpec`]s. Validation walks the
//! fields in declaration order and stops at the first failure, so the error
//! always names the earliest offending field.

mod values;
mod zip;

use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

pub use values::{AgeRange, CAUSES, SKILLS};
pub use zip::ZipTable;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("form must be a JSON object")]
    NotAnObject,
    #[error("\"{0}\" is required")]
    Required(&'static str),
    #[error("\"{0}\" is not allowed")]
    UnknownField(String),
    #[error("\"{field}\" must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("\"{field}\" length must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("\"{0}\" fails to match the required pattern")]
    Pattern(&'static str),
    #[error("\"{field}\" does not allow \"{value}\"")]
    NotAllowed { field: &'static str, value: String },
    #[error("Invalid US zip code")]
    InvalidZip,
    #[error("invalid form: {0}")]
    Shape(String),
}

#[derive(Clone)]
pub enum Rule {
    /// String matching `pattern` with a character count in `min..=max`.
    Text {
        pattern: &'static Regex,
        min: usize,
        max: usize,
    },
    /// String equal to one member of the set.
    OneOf(&'static [&'static str]),
    /// Array of strings drawn from the set. Empty is fine.
    ManyOf(&'static [&'static str]),
    UsZip(Arc<ZipTable>),
}

impl Rule {
    /// String rules read `null` and `""` as absent. A list field is only
    /// missing when its key is.
    fn counts_as_missing(&self, value: &Value) -> bool {
        !matches!(self, Rule::ManyOf(_)) && is_blank(value)
    }

    fn default_value(&self) -> Option<Value> {
        match self {
            Rule::ManyOf(_) => Some(Value::Array(Vec::new())),
            _ => None,
        }
    }

    fn check(&self, field: &'static str, value: &Value) -> Result<(), ValidationError> {
        match self {
            Rule::Text { pattern, min, max } => {
                let text = as_str(field, value)?;
                let len = text.chars().count();
                if len < *min || len > *max {
                    return Err(ValidationError::Length {
                        field,
                        min: *min,
                        max: *max,
                    });
                }
                if !pattern.is_match(text) {
                    return Err(ValidationError::Pattern(field));
                }
                Ok(())
            }
            Rule::OneOf(set) => {
                let text = as_str(field, value)?;
                ensure_member(field, set, text)
            }
            Rule::ManyOf(set) => {
                let items = value.as_array().ok_or(ValidationError::WrongType {
                    field,
                    expected: "array",
                })?;
                for item in items {
                    let text = item.as_str().ok_or(ValidationError::WrongType {
                        field,
                        expected: "array of strings",
                    })?;
                    ensure_member(field, set, text)?;
                }
                Ok(())
            }
            Rule::UsZip(table) => {
                let text = as_str(field, value)?;
                if table.contains(text) {
                    Ok(())
                } else {
                    Err(ValidationError::InvalidZip)
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub rule: Rule,
}

impl FieldSpec {
    pub fn required(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            required: true,
            rule,
        }
    }

    pub fn optional(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            required: false,
            rule,
        }
    }
}

#[derive(Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Checks `form` against every field and returns the normalized object:
    /// declared fields only, with defaults filled in for absent optional
    /// lists.
    pub fn validate(&self, form: &Value) -> Result<Map<String, Value>, ValidationError> {
        let input = form.as_object().ok_or(ValidationError::NotAnObject)?;
        let mut out = Map::new();

        for spec in &self.fields {
            match input
                .get(spec.name)
                .filter(|v| !spec.rule.counts_as_missing(v))
            {
                Some(value) => {
                    spec.rule.check(spec.name, value)?;
                    out.insert(spec.name.to_string(), value.clone());
                }
                None if spec.required => return Err(ValidationError::Required(spec.name)),
                None => {
                    if let Some(default) = spec.rule.default_value() {
                        out.insert(spec.name.to_string(), default);
                    }
                }
            }
        }

        if let Some(unknown) = input
            .keys()
            .find(|key| !self.fields.iter().any(|f| f.name == key.as_str()))
        {
            return Err(ValidationError::UnknownField(unknown.clone()));
        }

        Ok(out)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn as_str<'a>(field: &'static str, value: &'a Value) -> Result<&'a str, ValidationError> {
    value.as_str().ok_or(ValidationError::WrongType {
        field,
        expected: "string",
    })
}

fn ensure_member(field: &'static str, set: &[&str], value: &str) -> Result<(), ValidationError> {
    if set.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::NotAllowed {
            field,
            value: value.to_string(),
        })
    }
}
