//! Derived query methods.
//!
//! Method names such as `findByEmailAndStatus` are parsed into a
//! [`QueryMethodModel`]: the query kind, the ordered property criteria and how
//! each declared parameter binds to them.

mod analyzer;

pub use analyzer::{split_criteria, QueryMethodAnalyzer, BASE_METHODS};

use serde::Serialize;
use std::fmt;

use crate::model::TypeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryType {
    FindBy,
    ExistsBy,
    CountBy,
    DeleteBy,
    FindAll,
}

impl QueryType {
    /// Name prefix that introduces this query kind.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::FindBy => "findBy",
            Self::ExistsBy => "existsBy",
            Self::CountBy => "countBy",
            Self::DeleteBy => "deleteBy",
            Self::FindAll => "findAll",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FindBy => "FIND_BY",
            Self::ExistsBy => "EXISTS_BY",
            Self::CountBy => "COUNT_BY",
            Self::DeleteBy => "DELETE_BY",
            Self::FindAll => "FIND_ALL",
        };
        write!(f, "{name}")
    }
}

/// Connective between two consecutive criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalOperator {
    And,
    Or,
}

/// What a declared parameter supplies to the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "property", rename_all = "snake_case")]
pub enum ParameterBinding {
    /// Value compared against a property path.
    Property(String),
    /// Pagination request, passed through.
    Pageable,
    /// Sort specification, passed through.
    Sort,
    /// No criterion left to bind to.
    Unbound,
}

impl ParameterBinding {
    pub fn is_pass_through(&self) -> bool {
        matches!(self, Self::Pageable | Self::Sort)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    pub binding: ParameterBinding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryMethodModel {
    pub method_name: String,
    pub query_type: QueryType,
    /// Property names in the order they appear in the method name.
    pub property_paths: Vec<String>,
    /// `operators[i]` joins `property_paths[i]` and `property_paths[i + 1]`.
    pub operators: Vec<LogicalOperator>,
    pub parameters: Vec<QueryParameter>,
    pub return_type: TypeRef,
    pub returns_optional: bool,
    pub returns_list: bool,
    pub returns_page: bool,
    pub has_pagination: bool,
}

impl QueryMethodModel {
    /// Parameters compared against properties, in declaration order.
    pub fn bound_parameters(&self) -> impl Iterator<Item = (&QueryParameter, &str)> {
        self.parameters.iter().filter_map(|parameter| match &parameter.binding {
            ParameterBinding::Property(path) => Some((parameter, path.as_str())),
            _ => None,
        })
    }

    pub fn has_sort(&self) -> bool {
        self.parameters
            .iter()
            .any(|parameter| parameter.binding == ParameterBinding::Sort)
    }
}
