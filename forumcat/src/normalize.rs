//! Per-record normalization applied to every category read.

use serde_json::Value;

use crate::{
    config::ForumConfig,
    escape::escape_html,
    types::{CategoryRecord, DEFAULT_ICON, DEFAULTED_INT_FIELDS, ESCAPE_FIELDS, INT_FIELDS},
    values::{field_requested, is_number, is_truthy, parse_int_fields, to_loose_string},
};

/// Normalizes every present record in place; `None` slots are skipped.
pub fn normalize_categories<S: AsRef<str>>(
    categories: &mut [Option<CategoryRecord>],
    fields: &[S],
    config: &ForumConfig,
) {
    for category in categories.iter_mut().flatten() {
        normalize_category(category, fields, config);
    }
}

/// Applies defaults, integer coercion, escaping and derived fields to one record.
///
/// The steps run in a fixed order: the derived totals copy the already-coerced
/// counters, and `descriptionParsed` copies the already-escaped description.
pub fn normalize_category<S: AsRef<str>>(category: &mut CategoryRecord, fields: &[S], config: &ForumConfig) {
    for (field, setting) in DEFAULTED_INT_FIELDS {
        if field_requested(fields, field) && needs_default(category.get(*field)) {
            category.insert((*field).to_string(), config.get(setting).unwrap_or(Value::Null));
        }
    }

    parse_int_fields(category, INT_FIELDS, fields);

    for field in ESCAPE_FIELDS {
        if let Some(value) = category.get_mut(*field) {
            let text = if is_truthy(value) { to_loose_string(value) } else { String::new() };
            *value = Value::String(escape_html(&text));
        }
    }

    if let Some(icon) = category.get_mut("icon")
        && !is_truthy(icon)
    {
        *icon = Value::String(DEFAULT_ICON.to_string());
    }

    if let Some(post_count) = category.get("post_count").cloned() {
        category.insert("totalPostCount".to_string(), post_count);
    }
    if let Some(topic_count) = category.get("topic_count").cloned() {
        category.insert("totalTopicCount".to_string(), topic_count);
    }

    let description = category
        .get("description")
        .filter(|value| is_truthy(value))
        .map(|value| escape_html(&to_loose_string(value)));
    if let Some(description) = description {
        let keep_parsed = category.get("descriptionParsed").is_some_and(is_truthy);
        if !keep_parsed {
            category.insert("descriptionParsed".to_string(), Value::String(description.clone()));
        }
        category.insert("description".to_string(), Value::String(description));
    }
}

fn needs_default(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) if text.is_empty() => true,
        Some(other) => !is_number(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ALL: &[&str] = &[];

    fn record(value: Value) -> CategoryRecord {
        value.as_object().cloned().expect("object literal")
    }

    fn config() -> ForumConfig {
        let mut config = ForumConfig::default();
        config.meta.minimum_tags_per_topic = 1;
        config.meta.maximum_tags_per_topic = 6;
        config.meta.post_queue = 0;
        config
    }

    #[test]
    fn missing_or_invalid_tag_limits_take_site_defaults() {
        for raw in [json!({}), json!({"minTags": ""}), json!({"minTags": null}), json!({"minTags": "lots"})] {
            let mut category = record(raw);
            normalize_category(&mut category, ALL, &config());
            assert_eq!(category["minTags"], json!(1));
            assert_eq!(category["maxTags"], json!(6));
            assert_eq!(category["postQueue"], json!(0));
        }
    }

    #[test]
    fn valid_tag_limits_are_kept() {
        let mut category = record(json!({"minTags": "3", "maxTags": 9}));
        normalize_category(&mut category, ALL, &config());
        assert_eq!(category["minTags"], json!(3));
        assert_eq!(category["maxTags"], json!(9));
    }

    #[test]
    fn field_filter_gates_defaults_and_coercion() {
        let mut category = record(json!({"name": "News", "order": "4"}));
        normalize_category(&mut category, &["name"], &config());
        assert!(!category.contains_key("minTags"));
        assert!(!category.contains_key("maxTags"));
        assert!(!category.contains_key("postQueue"));
        assert_eq!(category["order"], json!("4"));
        assert_eq!(category["name"], json!("News"));
    }

    #[test]
    fn integer_fields_are_coerced() {
        let mut category = record(json!({"cid": "12", "disabled": "0", "order": "x", "post_count": "5"}));
        normalize_category(&mut category, ALL, &config());
        assert_eq!(category["cid"], json!(12));
        assert_eq!(category["disabled"], json!(0));
        assert_eq!(category["order"], json!(0));
        assert_eq!(category["totalPostCount"], json!(5));
        assert!(!category.contains_key("totalTopicCount"));
    }

    #[test]
    fn display_fields_are_escaped_even_outside_the_filter() {
        let mut category = record(json!({"name": "A & B", "link": "", "color": "\"red\"", "class": null}));
        normalize_category(&mut category, &["cid"], &config());
        assert_eq!(category["name"], json!("A &amp; B"));
        assert_eq!(category["link"], json!(""));
        assert_eq!(category["color"], json!("&quot;red&quot;"));
        assert_eq!(category["class"], json!(""));
        assert!(!category.contains_key("bgColor"));
    }

    #[test]
    fn empty_icon_becomes_hidden() {
        let mut empty = record(json!({"icon": ""}));
        normalize_category(&mut empty, ALL, &config());
        assert_eq!(empty["icon"], json!("hidden"));

        let mut starred = record(json!({"icon": "fa-star"}));
        normalize_category(&mut starred, ALL, &config());
        assert_eq!(starred["icon"], json!("fa-star"));

        let mut absent = record(json!({}));
        normalize_category(&mut absent, ALL, &config());
        assert!(!absent.contains_key("icon"));
    }

    #[test]
    fn description_is_escaped_and_parsed_copy_added() {
        let mut category = record(json!({"description": "<b>hi</b> & co"}));
        normalize_category(&mut category, ALL, &config());
        assert_eq!(category["description"], json!("&lt;b&gt;hi&lt;/b&gt; &amp; co"));
        assert_eq!(category["descriptionParsed"], json!("&lt;b&gt;hi&lt;/b&gt; &amp; co"));
    }

    #[test]
    fn existing_parsed_description_is_kept() {
        let mut category = record(json!({"description": "<i>x</i>", "descriptionParsed": "<p>x</p>"}));
        normalize_category(&mut category, ALL, &config());
        assert_eq!(category["description"], json!("&lt;i&gt;x&lt;/i&gt;"));
        assert_eq!(category["descriptionParsed"], json!("<p>x</p>"));
    }

    #[test]
    fn empty_description_adds_nothing() {
        let mut category = record(json!({"description": ""}));
        normalize_category(&mut category, ALL, &config());
        assert_eq!(category["description"], json!(""));
        assert!(!category.contains_key("descriptionParsed"));
    }

    #[test]
    fn missing_records_are_skipped() {
        let mut categories = vec![None, Some(record(json!({"topic_count": "2"})))];
        normalize_categories(&mut categories, ALL, &config());
        assert!(categories[0].is_none());
        let second = categories[1].as_ref().expect("present");
        assert_eq!(second["totalTopicCount"], json!(2));
    }
}
