//! Study data model matching the backend's `results` entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A study record returned for a query.
///
/// Every field is optional and decoded leniently so that unexpected shapes
/// never fail a whole result set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Study {
    /// Publication year.
    #[serde(default, deserialize_with = "lenient::year")]
    pub year: Option<i64>,

    /// Journal name.
    #[serde(default, deserialize_with = "lenient::text")]
    pub journal: Option<String>,

    /// Study title.
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,

    /// Author list as a display string.
    #[serde(default, deserialize_with = "lenient::text")]
    pub authors: Option<String>,
}

impl Study {
    /// Decode one `results` element; anything that is not an object yields an empty study.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Year for ordering; missing years count as 0.
    #[must_use]
    pub fn year_or_zero(&self) -> i64 {
        self.year.unwrap_or(0)
    }

    /// Journal or "".
    #[must_use]
    pub fn journal_or_empty(&self) -> &str {
        self.journal.as_deref().unwrap_or("")
    }

    /// Title or "".
    #[must_use]
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Authors or "".
    #[must_use]
    pub fn authors_or_empty(&self) -> &str {
        self.authors.as_deref().unwrap_or("")
    }
}

/// `GET /query/{q}/studies` response body.
#[derive(Debug, Clone, Default)]
pub struct StudyList {
    /// Studies in backend order.
    pub results: Vec<Study>,
}

impl StudyList {
    /// Decode from an already-parsed body.
    ///
    /// `results` that is missing or not a list decodes as empty.
    #[must_use]
    pub fn from_value(body: Value) -> Self {
        let results = match body {
            Value::Object(mut map) => match map.remove("results") {
                Some(Value::Array(items)) => items.into_iter().map(Study::from_value).collect(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Self { results }
    }
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn year<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(year_from_value))
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(text_from_value))
    }

    fn year_from_value(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => {
                n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            }
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
            }
            _ => None,
        }
    }

    fn text_from_value(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect();
                Some(parts.join(", "))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_study_full_record() {
        let study = Study::from_value(json!({
            "year": 2020,
            "journal": "NeuroImage",
            "title": "Language networks",
            "authors": "Doe J, Roe R"
        }));
        assert_eq!(study.year, Some(2020));
        assert_eq!(study.journal_or_empty(), "NeuroImage");
        assert_eq!(study.authors_or_empty(), "Doe J, Roe R");
    }

    #[test]
    fn test_study_year_variants() {
        assert_eq!(Study::from_value(json!({"year": "2018"})).year, Some(2018));
        assert_eq!(Study::from_value(json!({"year": 2019.0})).year, Some(2019));
        assert_eq!(Study::from_value(json!({"year": "n/a"})).year, None);
        assert_eq!(Study::from_value(json!({"year": null})).year, None);
        assert_eq!(Study::from_value(json!({"year": [1]})).year_or_zero(), 0);
    }

    #[test]
    fn test_study_text_variants() {
        let study = Study::from_value(json!({"authors": ["A", "B"], "journal": 42, "title": {}}));
        assert_eq!(study.authors.as_deref(), Some("A, B"));
        assert_eq!(study.journal.as_deref(), Some("42"));
        assert_eq!(study.title, None);
    }

    #[test]
    fn test_non_object_element_is_empty_study() {
        assert_eq!(Study::from_value(json!("junk")), Study::default());
        assert_eq!(Study::from_value(json!(null)), Study::default());
    }

    #[test]
    fn test_study_list_shapes() {
        let list = StudyList::from_value(json!({"results": [{"year": 2020}, 7]}));
        assert_eq!(list.results.len(), 2);
        assert_eq!(list.results[1], Study::default());

        assert!(StudyList::from_value(json!({"results": {"year": 1}})).results.is_empty());
        assert!(StudyList::from_value(json!([])).results.is_empty());
        assert!(StudyList::from_value(json!({})).results.is_empty());
    }
}
