//! Derived query methods as they appear on planned contracts.

mod common;

use common::{order_model, order_repository, plan};
use persistplan::{
    CollectingSink, ContractView, DiagnosticCode, LogicalOperator, MethodView, ParameterBinding,
    PlannerConfig, QueryMethodAnalyzer, QueryType,
};
use pretty_assertions::assert_eq;

#[test]
fn test_contract_queries_in_declaration_order() {
    let (plan, _) = plan(&order_model(), &PlannerConfig::default(), &order_repository());

    let queries: Vec<_> = plan
        .query_methods()
        .iter()
        .map(|q| (q.method_name.as_str(), q.query_type))
        .collect();
    // save, findById and the unpaged findAll belong to the base vocabulary.
    assert_eq!(
        queries,
        vec![
            ("findByEmailAndStatus", QueryType::FindBy),
            ("existsByEmail", QueryType::ExistsBy),
            ("findAll", QueryType::FindAll),
        ]
    );
}

#[test]
fn test_find_by_email_and_status() {
    let (plan, _) = plan(&order_model(), &PlannerConfig::default(), &order_repository());
    let query = &plan.query_methods()[0];

    assert_eq!(query.property_paths, vec!["email", "status"]);
    assert_eq!(query.operators, vec![LogicalOperator::And]);
    assert!(query.returns_list);
    assert!(!query.returns_optional);
    let bound: Vec<_> = query.bound_parameters().map(|(p, path)| (p.name.as_str(), path)).collect();
    assert_eq!(bound, vec![("email", "email"), ("status", "status")]);
}

#[test]
fn test_exists_by_email() {
    let (plan, _) = plan(&order_model(), &PlannerConfig::default(), &order_repository());
    let query = &plan.query_methods()[1];

    assert_eq!(query.property_paths, vec!["email"]);
    assert!(query.operators.is_empty());
    assert!(!query.returns_list);
    assert!(!query.has_pagination);
}

#[test]
fn test_paged_find_all() {
    let (plan, _) = plan(&order_model(), &PlannerConfig::default(), &order_repository());
    let query = &plan.query_methods()[2];

    assert!(query.property_paths.is_empty());
    assert!(query.has_pagination);
    assert!(query.returns_page);
    assert_eq!(query.parameters[0].binding, ParameterBinding::Pageable);
}

#[test]
fn test_unpaged_find_all_is_skipped() {
    let method = MethodView::new("findAll", "List<Order>");
    assert_eq!(QueryMethodAnalyzer::parse(&method), None);
}

#[test]
fn test_or_criteria_with_sort() {
    let method = MethodView::new("findByEmailOrStatus", "List<Order>")
        .with_param("email", "String")
        .with_param("status", "OrderStatus")
        .with_param("sort", "Sort");
    let query = QueryMethodAnalyzer::parse(&method).unwrap();

    assert_eq!(query.operators, vec![LogicalOperator::Or]);
    assert!(query.has_sort());
    assert!(!query.has_pagination);
}

#[test]
fn test_mismatched_criteria_are_reported() {
    let model = order_model();
    let contract = ContractView::new("com.acme.order.OrderRepository")
        .with_method(MethodView::new("findById", "Optional<Order>").with_param("id", "Long"))
        .with_method(MethodView::new("countByNickname", "long"))
        .with_method(MethodView::new("deleteByStatus", "void").with_param("status", "OrderStatus"));

    let (plan, sink) = plan(&model, &PlannerConfig::default(), &contract);

    assert_eq!(plan.query_methods().len(), 2);
    assert_eq!(plan.query_methods()[1].query_type, QueryType::DeleteBy);
    let codes: Vec<_> = sink.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![DiagnosticCode::QUERY_UNKNOWN_PROPERTY, DiagnosticCode::QUERY_PARAMETER_MISMATCH]
    );
    assert_eq!(sink.diagnostics()[0].plugin_context, "Order.countByNickname");
}

#[test]
fn test_reference_criterion_by_identifier() {
    let model = order_model();
    let order = persistplan::DomainModelLookup::find_type(&model, "Order").unwrap();
    let method = MethodView::new("findByCustomerId", "List<Order>").with_param("customerId", "Long");

    let mut sink = CollectingSink::new();
    let query = QueryMethodAnalyzer::for_entity(order).analyze(&method, &mut sink).unwrap();

    assert_eq!(query.property_paths, vec!["customerId"]);
    assert!(sink.diagnostics().is_empty());
}
