use std::fmt::Display;

use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trend {
    pub name: String,
}

impl Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Pulls trends out of a `guide.json` response.
pub(crate) fn parse_guide(json: &Value) -> Vec<Trend> {
    let Some(instructions) = json.pointer("/timeline/instructions").and_then(Value::as_array) else {
        return vec![];
    };

    instructions
        .iter()
        .filter_map(|instruction| instruction.pointer("/addEntries/entries"))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|entry| entry.pointer("/content/timelineModule/items"))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|item| item.pointer("/item/content/trend"))
        .filter_map(|trend| trend.get("name")?.as_str())
        .map(|name| Trend {
            name: name.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_guide_modules() {
        let json = json!({"timeline": {"instructions": [
            {"clearCache": {}},
            {"addEntries": {"entries": [
                {"entryId": "trends", "content": {"timelineModule": {"items": [
                    {"item": {"content": {"trend": {
                        "name": "#RustLang",
                        "trendMetadata": {"metaDescription": "12K posts", "domainContext": "Technology"}
                    }}}},
                    {"item": {"content": {"trend": {"name": "Ferris"}}}},
                    {"item": {"content": {"eventSummary": {}}}}
                ]}}}
            ]}}
        ]}});

        let trends = parse_guide(&json);

        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].name, "#RustLang");
        assert_eq!(trends[1].to_string(), "Ferris");
    }

    #[test]
    fn empty_guide_has_no_trends() {
        assert!(parse_guide(&json!({})).is_empty());
    }
}
