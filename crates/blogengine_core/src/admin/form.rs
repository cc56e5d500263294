//! Form-like field maps consumed by admin handlers.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Multi-valued field map, as submitted by an admin form.
///
/// Repeated keys accumulate (`tags=1`, `tags=2`); single-valued fields read
/// the first value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminForm {
    fields: BTreeMap<String, Vec<String>>,
}

impl AdminForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one value for `field`.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(field, value);
        self
    }

    pub fn push(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(value.into());
    }

    /// Parses `key=value` strings. Values may contain further `=` signs.
    pub fn parse_pairs<I, T>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut form = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected key=value, got `{pair}`"))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(format!("missing field name in `{pair}`"));
            }
            form.push(key, value);
        }
        Ok(form)
    }

    /// First value submitted for `field`.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// First value with surrounding whitespace removed; blank counts as absent.
    pub fn non_blank(&self, field: &str) -> Option<&str> {
        self.value(field)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn values(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}

/// Error messages keyed by form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
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

#[cfg(test)]
mod tests {
    use super::{AdminForm, FieldErrors};

    #[test]
    fn parse_pairs_accumulates_repeated_fields() {
        let form = AdminForm::parse_pairs(["title=Hello", "tags=1", "tags=2", "text=a=b"]).unwrap();
        assert_eq!(form.value("title"), Some("Hello"));
        assert_eq!(form.values("tags"), ["1".to_string(), "2".to_string()]);
        assert_eq!(form.value("text"), Some("a=b"));
        assert!(form.values("missing").is_empty());
    }

    #[test]
    fn parse_pairs_rejects_missing_separator() {
        let err = AdminForm::parse_pairs(["title"]).unwrap_err();
        assert!(err.contains("key=value"));
    }

    #[test]
    fn non_blank_treats_whitespace_as_absent() {
        let form = AdminForm::new().with("slug", "   ");
        assert!(form.contains("slug"));
        assert_eq!(form.non_blank("slug"), None);
    }

    #[test]
    fn field_errors_display_joins_messages() {
        let mut errors = FieldErrors::default();
        errors.add("title", "required");
        errors.add("author", "Enter a whole number.");
        assert_eq!(
            errors.to_string(),
            "author: Enter a whole number.; title: required"
        );
    }
}
