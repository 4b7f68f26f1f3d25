// File: src/contact.rs
// Purpose: The demo contact form and `name=value` assignments for it

use anyhow::{bail, Result};
use rusty_forms::validation::{email, required, required_if_all_equal};
use rusty_forms::{FormConfig, FormControl, FormGroup};
use serde_json::{json, Value};

/// First/last name and gender are always required. Email is required once
/// `canProvideEmail` is `true`, and `genderOther` once gender is "other".
pub fn contact_form(config: FormConfig) -> Result<FormGroup> {
    let form = FormGroup::builder()
        .config(config)
        .control("firstName", FormControl::new("", [required()]))
        .control("lastName", FormControl::new("", [required()]))
        .control("canProvideEmail", FormControl::plain(""))
        .control(
            "email",
            FormControl::new(
                "",
                [email(), required_if_all_equal([("canProvideEmail", json!(true))])],
            ),
        )
        .control("gender", FormControl::new("", [required()]))
        .control(
            "genderOther",
            FormControl::new("", [required_if_all_equal([("gender", "other")])]),
        )
        .build()?;
    Ok(form)
}

/// Parse `name=value`. The value is read as JSON when it parses, otherwise
/// taken as a plain string, so `flag=true` is a boolean and `name=Aang` a string.
pub fn parse_assignment(raw: &str) -> Result<(String, Value)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("expected name=value, got `{}`", raw);
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("missing field name in `{}`", raw);
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("canProvideEmail=true").unwrap(),
            ("canProvideEmail".to_string(), json!(true))
        );
        assert_eq!(
            parse_assignment("firstName=Aang").unwrap(),
            ("firstName".to_string(), json!("Aang"))
        );
        assert_eq!(
            parse_assignment("note=a=b").unwrap(),
            ("note".to_string(), json!("a=b"))
        );
        assert_eq!(parse_assignment("age=42").unwrap().1, json!(42));

        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_contact_form_requirements_follow_siblings() {
        let mut form = contact_form(FormConfig::default()).unwrap();
        assert!(form.errors("email").is_none());

        form.set_value("canProvideEmail", true).unwrap();
        assert!(form.errors("email").is_some_and(|e| e.contains_key("requiredIfAllEqual")));

        form.set_value("gender", "other").unwrap();
        assert!(form.errors("genderOther").is_some());

        form.set_value("gender", "female").unwrap();
        assert!(form.errors("genderOther").is_none());
    }
}
