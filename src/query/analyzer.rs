use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{LogicalOperator, ParameterBinding, QueryMethodModel, QueryParameter, QueryType};
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use crate::model::{CollectionKind, DomainType, MethodView, ParameterView, TypeShape};
use crate::naming::decapitalize;
use crate::types;

/// Methods every repository already provides; they never produce a query model.
pub const BASE_METHODS: &[&str] = &[
    "save",
    "saveAll",
    "findById",
    "findAll",
    "findAllById",
    "count",
    "existsById",
    "deleteById",
    "delete",
    "deleteAll",
    "deleteAllById",
];

static DERIVED_QUERY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(find|exists|count|delete)By([A-Z][A-Za-z0-9_]*)$").expect("derived query pattern"));

/// Parses derived query methods, optionally checking criteria against the entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryMethodAnalyzer<'a> {
    entity: Option<&'a DomainType>,
}

impl<'a> QueryMethodAnalyzer<'a> {
    pub fn new() -> Self {
        Self { entity: None }
    }

    /// Check parsed property names against `entity`'s declared properties.
    pub fn for_entity(entity: &'a DomainType) -> Self {
        Self { entity: Some(entity) }
    }

    /// Parse `method` and report criteria that do not line up with the
    /// entity or with the declared parameters.
    pub fn analyze(&self, method: &MethodView, sink: &mut dyn DiagnosticSink) -> Option<QueryMethodModel> {
        let query = Self::parse(method)?;
        let context = format!("{}.{}", self.entity.map_or("?", DomainType::simple_name), query.method_name);

        if let Some(entity) = self.entity {
            for path in query.property_paths.iter().filter(|path| !is_known_property(entity, path)) {
                sink.report(
                    Diagnostic::warning(
                        DiagnosticCode::QUERY_UNKNOWN_PROPERTY,
                        format!("'{path}' in {} is not a property of {}", query.method_name, entity.simple_name()),
                    )
                    .in_context(&context),
                );
            }
        }

        let bindable = method
            .parameters
            .iter()
            .filter(|parameter| pass_through(parameter).is_none())
            .count();
        if bindable != query.property_paths.len() {
            sink.report(
                Diagnostic::warning(
                    DiagnosticCode::QUERY_PARAMETER_MISMATCH,
                    format!(
                        "{} names {} criteria but declares {} bindable parameters",
                        query.method_name,
                        query.property_paths.len(),
                        bindable
                    ),
                )
                .in_context(&context),
            );
        }

        Some(query)
    }

    /// Parse a method name into a query model without any checks.
    ///
    /// Returns `None` for base repository methods and names outside the grammar.
    pub fn parse(method: &MethodView) -> Option<QueryMethodModel> {
        let name = method.name.as_str();
        let paginated = method.parameters.iter().any(|p| types::is_pagination_marker(p.type_ref.simple_name()));

        let (query_type, criteria) = match name {
            "findAll" if paginated => (QueryType::FindAll, String::new()),
            _ if BASE_METHODS.contains(&name) => return None,
            _ => {
                let captures = DERIVED_QUERY.captures(name)?;
                let query_type = match &captures[1] {
                    "find" => QueryType::FindBy,
                    "exists" => QueryType::ExistsBy,
                    "count" => QueryType::CountBy,
                    _ => QueryType::DeleteBy,
                };
                (query_type, captures[2].to_string())
            }
        };

        let (property_paths, operators) = split_criteria(&criteria);
        let parameters = bind_parameters(&method.parameters, &property_paths);

        let shape = method.return_type.shape();
        let query = QueryMethodModel {
            method_name: method.name.clone(),
            query_type,
            property_paths,
            operators,
            parameters,
            return_type: method.return_type.clone(),
            returns_optional: matches!(shape, TypeShape::Optional(_)),
            returns_list: matches!(
                shape,
                TypeShape::Collection {
                    kind: CollectionKind::List | CollectionKind::Set,
                    ..
                }
            ),
            returns_page: matches!(shape, TypeShape::Paged(_)),
            has_pagination: paginated,
        };
        debug!(method = name, query_type = %query.query_type, paths = ?query.property_paths, "derived query");
        Some(query)
    }
}

/// Split `EmailAndStatusOrName` into `["email", "status", "name"]` and the
/// operators between them. `And`/`Or` only separate when followed by an
/// upper-case letter, so `OrderNumber` and `Android` stay whole.
pub fn split_criteria(criteria: &str) -> (Vec<String>, Vec<LogicalOperator>) {
    let mut paths = Vec::new();
    let mut operators = Vec::new();
    let mut start = 0;
    let mut index = 0;

    while index < criteria.len() {
        let rest = &criteria[index..];
        let separator = [("And", LogicalOperator::And), ("Or", LogicalOperator::Or)]
            .into_iter()
            .find(|(word, _)| {
                index > start
                    && rest.starts_with(word)
                    && rest[word.len()..].chars().next().is_some_and(char::is_uppercase)
            });

        match separator {
            Some((word, operator)) => {
                paths.push(decapitalize(&criteria[start..index]));
                operators.push(operator);
                index += word.len();
                start = index;
            }
            None => index += rest.chars().next().map_or(1, char::len_utf8),
        }
    }

    if start < criteria.len() {
        paths.push(decapitalize(&criteria[start..]));
    }
    (paths, operators)
}

fn pass_through(parameter: &ParameterView) -> Option<ParameterBinding> {
    let type_name = parameter.type_ref.simple_name();
    if types::is_pagination_marker(type_name) {
        Some(ParameterBinding::Pageable)
    } else if types::is_sort_marker(type_name) {
        Some(ParameterBinding::Sort)
    } else {
        None
    }
}

/// Zip criteria against parameters in order; markers do not consume a criterion.
fn bind_parameters(parameters: &[ParameterView], paths: &[String]) -> Vec<QueryParameter> {
    let mut remaining = paths.iter();
    parameters
        .iter()
        .map(|parameter| {
            let binding = pass_through(parameter).unwrap_or_else(|| {
                remaining
                    .next()
                    .map_or(ParameterBinding::Unbound, |path| ParameterBinding::Property(path.clone()))
            });
            QueryParameter {
                name: parameter.name.clone(),
                type_ref: parameter.type_ref.clone(),
                binding,
            }
        })
        .collect()
}

/// A criterion may also name a cross-aggregate reference by its identifier
/// column (`customerId` for a `customer` property).
fn is_known_property(entity: &DomainType, path: &str) -> bool {
    path == "id"
        || entity.property(path).is_some()
        || path
            .strip_suffix("Id")
            .is_some_and(|reference| entity.property(reference).is_some())
}
