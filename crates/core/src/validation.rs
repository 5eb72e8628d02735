//! Form schema primitives.
//!
//! Every create/update payload implements [`Validate`]. Validation never
//! panics and never short-circuits: all failing fields are reported at once,
//! keyed by their camelCase wire name so a form can attach messages to inputs.

use std::collections::BTreeMap;

use serde::Serialize;

/// Field-scoped validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field` (empty when the field passed).
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Implemented by every form payload.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Accumulating checker used by the per-entity schemas.
#[derive(Debug, Default)]
pub struct FormCheck {
    errors: ValidationErrors,
}

impl FormCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blank string.
    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.add(field, "is required");
        }
        self
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.errors.add(field, format!("must be at most {max} characters"));
        }
        self
    }

    pub fn min_len(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        if value.chars().count() < min {
            self.errors.add(field, format!("must be at least {min} characters"));
        }
        self
    }

    /// Exactly `len` ASCII digits.
    pub fn digits(&mut self, field: &str, value: &str, len: usize) -> &mut Self {
        let value = value.trim();
        if value.len() != len || !value.bytes().all(|b| b.is_ascii_digit()) {
            self.errors.add(field, format!("must be exactly {len} digits"));
        }
        self
    }

    /// Optional digits: only checked when present and non-blank.
    pub fn digits_opt(&mut self, field: &str, value: Option<&str>, len: usize) -> &mut Self {
        match value {
            Some(v) if !v.trim().is_empty() => self.digits(field, v, len),
            _ => self,
        }
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !looks_like_email(value.trim()) {
            self.errors.add(field, "must be a valid email address");
        }
        self
    }

    pub fn email_opt(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if !v.trim().is_empty() => self.email(field, v),
            _ => self,
        }
    }

    pub fn positive(&mut self, field: &str, value: f64) -> &mut Self {
        if !(value.is_finite() && value > 0.0) {
            self.errors.add(field, "must be greater than zero");
        }
        self
    }

    pub fn positive_int(&mut self, field: &str, value: i64) -> &mut Self {
        if value <= 0 {
            self.errors.add(field, "must be greater than zero");
        }
        self
    }

    /// Record an arbitrary rule result.
    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.errors.add(field, message);
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        core::mem::take(&mut self.errors).into_result()
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.contains(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}
