//! JSON decoding for tag-dispatched rule tree nodes.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use super::ast::{
    ClassRule, ComparisonRule, DatatypeRule, FilterRule, FlexibleTerm, FunctionRule, Rule,
    RuleGroup, RuleNode, SearchTerm, VariableRef,
};

impl<'de> Deserialize<'de> for RuleNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let is_group = value
            .as_object()
            .is_some_and(|obj| obj.contains_key("rules") || obj.contains_key("combinator"));
        if is_group {
            RuleGroup::deserialize(value)
                .map(RuleNode::Group)
                .map_err(de::Error::custom)
        } else {
            Rule::deserialize(value)
                .map(RuleNode::Rule)
                .map_err(de::Error::custom)
        }
    }
}

#[derive(Deserialize)]
struct RawRule {
    operator: String,
    #[serde(default)]
    value: Value,
}

fn payload<T>(value: Value) -> Result<T, serde_json::Error>
where
    T: for<'a> Deserialize<'a> + Default,
{
    if value.is_null() {
        Ok(T::default())
    } else {
        T::deserialize(value)
    }
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let RawRule { operator, value } = RawRule::deserialize(deserializer)?;
        let rule = match operator.as_str() {
            "filter" => payload::<FilterRule>(value).map(Rule::Filter),
            "filter_path" => payload::<FilterRule>(value).map(Rule::FilterPath),
            // bare `"integer"` or `{ "value": "integer" }`
            "datatype" => match value {
                Value::String(_) => payload(serde_json::json!({ "value": value })),
                other => payload::<DatatypeRule>(other),
            }
            .map(Rule::Datatype),
            "operator" => payload::<ComparisonRule>(value).map(Rule::Operator),
            "function" => payload::<FunctionRule>(value).map(Rule::Function),
            "subclass_of" => payload::<ClassRule>(value).map(Rule::SubclassOf),
            "instance_of" => payload::<ClassRule>(value).map(Rule::InstanceOf),
            _ => return Ok(Rule::Unknown(operator)),
        };
        rule.map_err(|e| de::Error::custom(format!("{operator} rule: {e}")))
    }
}

#[derive(Deserialize)]
struct RawTerm {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    search: Option<Vec<SearchTerm>>,
    #[serde(default)]
    manual: Option<String>,
    #[serde(default)]
    variable: Option<VariableRef>,
}

impl<'de> Deserialize<'de> for FlexibleTerm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawTerm::deserialize(deserializer)?;
        let name = raw
            .variable
            .as_ref()
            .and_then(VariableRef::name)
            .map(str::to_string);
        // the term editor starts in search mode
        let kind = raw.kind.as_deref().unwrap_or("search");
        Ok(match kind {
            "search" => FlexibleTerm::Search(raw.search.unwrap_or_default()),
            "manual" => FlexibleTerm::Manual(raw.manual.unwrap_or_default()),
            "variable" => FlexibleTerm::Variable(name),
            "statement" => FlexibleTerm::Statement(name),
            "any" => FlexibleTerm::Any,
            other => FlexibleTerm::Unknown(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::rules::ast::{DatatypeCheck, GroupCombinator, SearchTermKind};

    #[test]
    fn test_decode_nested_tree() {
        let tree: RuleGroup = serde_json::from_value(json!({
            "combinator": "or",
            "not": true,
            "variable": { "value": "main", "label": "main" },
            "rules": [
                {
                    "operator": "filter",
                    "value": {
                        "predicate": { "type": "manual", "manual": "<http://ex.org/p>" },
                        "input": { "type": "variable", "variable": { "value": "main2" } },
                        "reverse": false
                    }
                },
                { "combinator": "and", "rules": [] }
            ]
        }))
        .unwrap();

        assert_eq!(tree.combinator, GroupCombinator::Or);
        assert!(tree.not);
        assert_eq!(tree.pivot(), Some("main"));
        assert_eq!(tree.rules.len(), 2);

        let RuleNode::Rule(Rule::Filter(filter)) = &tree.rules[0] else {
            panic!("expected filter rule");
        };
        assert_eq!(filter.predicate, Some(FlexibleTerm::manual("<http://ex.org/p>")));
        assert_eq!(filter.input, Some(FlexibleTerm::variable("main2")));
        assert!(matches!(&tree.rules[1], RuleNode::Group(g) if g.rules.is_empty()));
    }

    #[test]
    fn test_unknown_tags_are_kept() {
        let rule: Rule = serde_json::from_value(json!({ "operator": "between", "value": 3 })).unwrap();
        assert_eq!(rule, Rule::Unknown("between".into()));

        let term: FlexibleTerm = serde_json::from_value(json!({ "type": "regex" })).unwrap();
        assert_eq!(term, FlexibleTerm::Unknown("regex".into()));
    }

    #[test]
    fn test_operator_tag_survives_decoding() {
        for tag in ["filter", "filter_path", "subclass_of", "instance_of", "between"] {
            let rule: Rule = serde_json::from_value(json!({
                "operator": tag,
                "value": { "input": { "type": "variable", "variable": { "value": "x" } } }
            }))
            .unwrap();
            assert_eq!(rule.operator(), tag);
        }
    }

    #[test]
    fn test_datatype_payload_forms() {
        let bare: Rule =
            serde_json::from_value(json!({ "operator": "datatype", "value": "integer" })).unwrap();
        let wrapped: Rule = serde_json::from_value(
            json!({ "operator": "datatype", "value": { "value": "integer", "label": "Integer" } }),
        )
        .unwrap();
        for rule in [bare, wrapped] {
            let Rule::Datatype(dt) = rule else {
                panic!("expected datatype rule");
            };
            assert_eq!(dt.check(), Ok(DatatypeCheck::Integer));
        }
    }

    #[test]
    fn test_missing_term_data_is_lenient() {
        let term: FlexibleTerm = serde_json::from_value(json!({ "type": "variable" })).unwrap();
        assert_eq!(term, FlexibleTerm::Variable(None));

        let term: FlexibleTerm = serde_json::from_value(json!({})).unwrap();
        assert_eq!(term, FlexibleTerm::Search(vec![]));
    }

    #[test]
    fn test_search_terms() {
        let term: FlexibleTerm = serde_json::from_value(json!({
            "type": "search",
            "search": [
                { "type": "uri", "value": "http://ex.org/a", "search_text": "a", "pos": "OBJECT" },
                { "type": "literal", "value": "Paris", "lang": "en" }
            ]
        }))
        .unwrap();
        let FlexibleTerm::Search(hits) = term else {
            panic!("expected search term");
        };
        assert_eq!(hits[0].kind, SearchTermKind::Uri);
        assert_eq!(hits[1].lang.as_deref(), Some("en"));
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let result: Result<Rule, _> =
            serde_json::from_value(json!({ "operator": "filter", "value": { "reverse": "yes" } }));
        assert!(result.is_err());
    }
}
