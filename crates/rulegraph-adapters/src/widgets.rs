//! Widget requests.
//!
//! Each widget wraps a rule tree (or a single term) with the parameters
//! that shape its final query. Requests are tagged by a `widget` field:
//!
//! ```json
//! { "widget": "select", "tree": { ... }, "select": [{ "value": "main" }], "limit": 50 }
//! ```

use rulegraph_common::utils::error::{Error, Result};
use serde::Deserialize;

use crate::rules::{Choice, FlexibleTerm, RuleGroup, VariableRef};

/// A compile request for one widget.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "widget", rename_all = "lowercase")]
pub enum Widget {
    /// Tabular listing of selected variables.
    Select(SelectRequest),
    /// Aggregated chart data.
    Plot(PlotRequest),
    /// All properties of one subject.
    Properties(PropertiesRequest),
    /// Neighbourhood graph around an entity.
    Subgraph(SubgraphRequest),
}

impl Widget {
    /// Decodes a widget request from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the text is not a valid request.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Short name of the widget kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Widget::Select(_) => "select",
            Widget::Plot(_) => "plot",
            Widget::Properties(_) => "properties",
            Widget::Subgraph(_) => "subgraph",
        }
    }

    /// The rule tree, for widgets that carry one.
    pub fn tree(&self) -> Option<&RuleGroup> {
        match self {
            Widget::Select(r) => Some(&r.tree),
            Widget::Plot(r) => Some(&r.tree),
            Widget::Properties(_) | Widget::Subgraph(_) => None,
        }
    }
}

/// Lists selected variables and their labels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectRequest {
    /// Query body.
    pub tree: RuleGroup,
    /// Projected variables.
    #[serde(default)]
    pub select: Vec<VariableRef>,
    /// Row limit.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One chart axis.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlotAxis {
    /// Variables plotted on this axis.
    #[serde(default)]
    pub vars: Vec<VariableRef>,
    /// `categorical`, `numeric` or `date`.
    #[serde(default)]
    pub dtype: Option<Choice>,
    /// Aggregate applied to Y values.
    #[serde(default)]
    pub aggregate: Option<Choice>,
}

impl PlotAxis {
    /// Parses the axis type. Axes without a type are categorical.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDatatype` for an unrecognized tag.
    pub fn kind(&self) -> Result<AxisKind> {
        self.dtype
            .as_ref()
            .map_or(Ok(AxisKind::Categorical), |c| c.as_str().parse())
    }

    /// Names of the axis variables, skipping empty picks.
    pub fn names(&self) -> Vec<&str> {
        self.vars.iter().filter_map(VariableRef::name).collect()
    }
}

tag_enum! {
    /// How an axis variable is grouped.
    AxisKind, UnknownDatatype, {
        /// Grouped by value.
        Categorical => "categorical",
        /// Binned into uniform numeric buckets.
        Numeric => "numeric",
        /// Binned by year and month.
        Date => "date",
    }
}

/// Aggregated chart data over a rule tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlotRequest {
    /// Query body.
    pub tree: RuleGroup,
    /// Grouping axis.
    #[serde(default)]
    pub x: Option<PlotAxis>,
    /// Measured axis.
    #[serde(default)]
    pub y: Option<PlotAxis>,
    /// Optional second grouping axis.
    #[serde(default)]
    pub z: Option<PlotAxis>,
    /// Ignore `z`.
    #[serde(default = "default_true")]
    pub xy_only: bool,
    /// Bucket count and group limit for X.
    #[serde(default)]
    pub max_groups_x: Option<usize>,
    /// Bucket count and group limit for Z.
    #[serde(default)]
    pub max_groups_z: Option<usize>,
}

/// Every property of a subject.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropertiesRequest {
    /// The subject term.
    #[serde(default)]
    pub subject: Option<FlexibleTerm>,
    /// Row limit.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Depth-limited neighbourhood of an entity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubgraphRequest {
    /// The centre entity.
    #[serde(default)]
    pub entity: Option<FlexibleTerm>,
    /// Allowed edge predicates when `any_predicate` is false.
    #[serde(default)]
    pub predicates: Option<FlexibleTerm>,
    /// Follow every predicate.
    #[serde(default = "default_true", rename = "anyPredicate", alias = "any_predicate")]
    pub any_predicate: bool,
    /// Number of hops.
    #[serde(default)]
    pub depth: Option<usize>,
    /// Base row limit.
    #[serde(default)]
    pub limit: Option<usize>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_select() {
        let widget = Widget::from_json(
            r#"{
                "widget": "select",
                "tree": { "combinator": "and", "variable": { "value": "main" }, "rules": [] },
                "select": [{ "value": "main", "label": "main" }]
            }"#,
        )
        .unwrap();
        assert_eq!(widget.kind(), "select");
        let Widget::Select(req) = &widget else {
            panic!("expected select");
        };
        assert_eq!(req.select[0].name(), Some("main"));
        assert_eq!(req.limit, None);
        assert_eq!(widget.tree().and_then(RuleGroup::pivot), Some("main"));
    }

    #[test]
    fn test_decode_plot_defaults() {
        let widget = Widget::from_json(
            r#"{
                "widget": "plot",
                "tree": { "variable": { "value": "main" }, "rules": [] },
                "x": { "vars": [{ "value": "year" }], "dtype": { "value": "date" } },
                "y": { "vars": [{ "value": "main" }], "aggregate": "COUNT" }
            }"#,
        )
        .unwrap();
        let Widget::Plot(req) = widget else {
            panic!("expected plot");
        };
        assert!(req.xy_only);
        let x = req.x.unwrap();
        assert_eq!(x.kind(), Ok(AxisKind::Date));
        assert_eq!(x.names(), vec!["year"]);
        assert_eq!(req.y.unwrap().kind(), Ok(AxisKind::Categorical));
    }

    #[test]
    fn test_decode_subgraph() {
        let widget = Widget::from_json(
            r#"{ "widget": "subgraph", "entity": { "type": "manual", "manual": "<http://ex.org/a>" }, "depth": 2 }"#,
        )
        .unwrap();
        let Widget::Subgraph(req) = widget else {
            panic!("expected subgraph");
        };
        assert!(req.any_predicate);
        assert_eq!(req.depth, Some(2));
    }

    #[test]
    fn test_bad_json_is_serialization_error() {
        assert!(matches!(
            Widget::from_json(r#"{ "widget": "pie" }"#),
            Err(Error::Serialization(_))
        ));
        assert!(matches!(Widget::from_json("not json"), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_unknown_axis_kind() {
        let axis = PlotAxis {
            dtype: Some(Choice::from("ordinal")),
            ..Default::default()
        };
        assert_eq!(axis.kind(), Err(Error::UnknownDatatype("ordinal".into())));
    }
}
