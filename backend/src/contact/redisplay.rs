//! Rebuilds form values after a rejected submission.
//!
//! Fields that validated are shown in their normalized form (dates go back to
//! `YYYY-MM-DD`), fields that failed are shown exactly as typed, so nothing
//! correct has to be entered twice.

use crate::contact::coordinator::{HiddenFields, PartialSubmission};
use crate::contact::raw::RawSubmission;
use crate::contact::validators::{FieldValue, DATE_FORMAT};
use common::model::field::Field;
use common::responses::FormValue;
use std::collections::BTreeMap;

pub fn preserve_input(
    raw: &RawSubmission,
    partial: &PartialSubmission,
    hidden: &HiddenFields,
) -> BTreeMap<String, FormValue> {
    let mut form_data = BTreeMap::new();

    for value in partial.values() {
        if let Some((key, shown)) = display_value(value) {
            form_data.insert(key.to_string(), shown);
        }
    }

    form_data.insert(
        "form_version".to_string(),
        FormValue::from(hidden.form_version.as_str()),
    );
    if let Some(timestamp) = &hidden.timestamp {
        form_data.insert("timestamp".to_string(), FormValue::from(timestamp.as_str()));
    }

    for key in raw.keys() {
        let validated = Field::from_form_key(key).is_some_and(|f| partial.contains(f));
        if validated || form_data.contains_key(key) {
            continue;
        }
        let kept = if key == Field::Topics.form_key() {
            FormValue::List(raw.all(key).into_iter().map(str::to_string).collect())
        } else {
            FormValue::from(raw.first(key).unwrap_or_default())
        };
        form_data.insert(key.to_string(), kept);
    }

    form_data
}

fn display_value(value: &FieldValue) -> Option<(&'static str, FormValue)> {
    let key = value.field().form_key();
    let shown = match value {
        FieldValue::Name(v) | FieldValue::Email(v) | FieldValue::Message(v) => {
            FormValue::Text(v.clone())
        }
        FieldValue::Phone(v) => FormValue::Text(v.clone().unwrap_or_default()),
        FieldValue::Age(n) | FieldValue::Satisfaction(n) => FormValue::Number(i64::from(*n)),
        FieldValue::Date(d) => FormValue::Text(
            d.map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        ),
        FieldValue::Priority(p) => FormValue::from(p.as_str()),
        FieldValue::Topics(topics) => {
            FormValue::List(topics.iter().map(|t| t.as_str().to_string()).collect())
        }
        // File inputs cannot be pre-filled; the accepted name is echoed instead.
        FieldValue::File(Some(file)) => {
            return Some(("filename", FormValue::Text(file.filename.clone())));
        }
        FieldValue::File(None) => return None,
    };
    Some((key, shown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::coordinator::validate_all;
    use crate::contact::RequestContext;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn failed_fields_keep_raw_text_and_extra_keys_survive() {
        let raw = RawSubmission::new()
            .with("name", "  Ada  ")
            .with("age", "eleven")
            .with("newsletter", "yes")
            .with("form_version", "2.0")
            .with_file("cv.pdf", 10);
        let ctx = RequestContext::new(100, 1000)
            .with_today(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        let validation = validate_all(&raw, &ctx);
        let hidden = HiddenFields::from_raw(&raw);
        let form_data = preserve_input(&raw, &validation.partial, &hidden);

        assert_eq!(form_data["name"], FormValue::from("Ada"));
        assert_eq!(form_data["age"], FormValue::from("eleven"));
        assert_eq!(form_data["newsletter"], FormValue::from("yes"));
        assert_eq!(form_data["form_version"], FormValue::from("2.0"));
        assert_eq!(form_data["filename"], FormValue::from("cv.pdf"));
        assert!(!form_data.contains_key("email"));
        assert!(!form_data.contains_key("attachment"));
    }
}
