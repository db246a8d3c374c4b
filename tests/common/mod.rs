// Shared fixtures for persistplan integration tests
#![allow(dead_code)]

use persistplan::{
    CollectingSink, ContractView, DomainKind, DomainType, InMemoryDomainModel, MappingPlan,
    MappingPlanBuilder, MethodView, PlannerConfig,
};

/// Ordering bounded context: an `Order` aggregate owning its lines and
/// referencing a `Customer` aggregate that lives in another namespace.
pub fn order_model() -> InMemoryDomainModel {
    InMemoryDomainModel::new([
        DomainType::new("com.acme.order.Order", DomainKind::AggregateRoot)
            .with_property("id", "OrderId")
            .with_property("orderLines", "List<OrderLine>")
            .with_property("customer", "Customer")
            .with_property("status", "OrderStatus")
            .with_property("email", "String")
            .with_property("placedAt", "LocalDateTime"),
        DomainType::new("com.acme.order.OrderId", DomainKind::Identifier).with_property("value", "Long"),
        DomainType::new("com.acme.order.OrderLine", DomainKind::Entity)
            .with_property("id", "Long")
            .with_property("quantity", "int")
            .with_aggregate("com.acme.order.Order"),
        DomainType::new("com.acme.order.OrderStatus", DomainKind::Enumeration),
        DomainType::new("com.acme.customer.Customer", DomainKind::AggregateRoot)
            .with_property("id", "Long")
            .with_property("name", "String"),
    ])
}

pub fn order_repository() -> ContractView {
    ContractView::new("com.acme.order.OrderRepository")
        .with_method(MethodView::new("save", "Order").with_param("order", "Order"))
        .with_method(MethodView::new("findById", "Optional<Order>").with_param("id", "OrderId"))
        .with_method(
            MethodView::new("findByEmailAndStatus", "List<Order>")
                .with_param("email", "String")
                .with_param("status", "OrderStatus"),
        )
        .with_method(MethodView::new("existsByEmail", "boolean").with_param("email", "String"))
        .with_method(MethodView::new("findAll", "Page<Order>").with_param("pageable", "Pageable"))
        .with_method(MethodView::new("findAll", "List<Order>"))
}

/// Plan `contract` against `model` and return the plan with its diagnostics.
pub fn plan(
    model: &InMemoryDomainModel,
    config: &PlannerConfig,
    contract: &ContractView,
) -> (MappingPlan, CollectingSink) {
    let mut sink = CollectingSink::new();
    let plan = MappingPlanBuilder::new(model, config).build(contract, &mut sink);
    (plan, sink)
}

pub const ORDER_MODEL_JSON: &str = r#"{
  "types": [
    {
      "qualified_name": "com.acme.order.Order",
      "kind": "aggregate_root",
      "properties": [
        { "name": "id", "type": "Long" },
        { "name": "orderLines", "type": "List<OrderLine>" },
        { "name": "email", "type": "String" }
      ]
    },
    {
      "qualified_name": "com.acme.order.OrderLine",
      "kind": "entity",
      "aggregate": "com.acme.order.Order",
      "properties": [
        { "name": "id", "type": "Long" },
        { "name": "quantity", "type": "int" }
      ]
    }
  ],
  "contracts": [
    {
      "name": "com.acme.order.OrderRepository",
      "methods": [
        { "name": "findById", "return_type": "Optional<Order>", "parameters": [{ "name": "id", "type": "Long" }] },
        { "name": "findByEmail", "return_type": "Optional<Order>", "parameters": [{ "name": "email", "type": "String" }] }
      ]
    }
  ]
}"#;
