use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::model::{DomainKind, TypeRef};
use crate::types;

/// Checks whether a resolved property type maps directly to a column.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeCompatibilityValidator;

impl TypeCompatibilityValidator {
    /// `kind` is the domain kind of `type_ref` when the model knows the type.
    /// `property_path` (`Order.email`) doubles as the diagnostic context.
    pub fn validate(
        type_ref: &TypeRef,
        kind: Option<DomainKind>,
        property_path: &str,
    ) -> Option<Diagnostic> {
        if Self::is_directly_mappable(type_ref, kind) {
            return None;
        }

        let type_name = type_ref.simple_name();
        if types::is_converter_candidate(type_name) {
            return Some(
                Diagnostic::warning(
                    DiagnosticCode::TYPE_NEEDS_CONVERTER,
                    format!(
                        "Property '{property_path}' has type {type_ref}; register an attribute converter for {type_name}"
                    ),
                )
                .in_context(property_path),
            );
        }

        Some(
            Diagnostic::warning(
                DiagnosticCode::TYPE_UNMAPPABLE,
                format!(
                    "Property '{property_path}' has type {type_ref}, which is not directly mappable; a converter must be supplied"
                ),
            )
            .in_context(property_path),
        )
    }

    pub fn is_directly_mappable(type_ref: &TypeRef, kind: Option<DomainKind>) -> bool {
        let type_name = type_ref.simple_name();
        let by_name = types::is_primitive(type_name)
            || types::is_wrapper(type_name)
            || types::is_text(type_name)
            || types::is_temporal(type_name)
            || types::is_large_object(type_name);
        let by_kind = matches!(
            kind,
            Some(DomainKind::Enumeration | DomainKind::ValueObject | DomainKind::Identifier)
        );
        by_name || by_kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    fn check(type_name: &str, kind: Option<DomainKind>) -> Option<Diagnostic> {
        let type_ref = TypeRef::parse(type_name).unwrap();
        TypeCompatibilityValidator::validate(&type_ref, kind, "Order.field")
    }

    #[test]
    fn test_simple_types_are_mappable() {
        for type_name in ["int", "Long", "String", "BigDecimal", "LocalDate", "byte[]", "Clob"] {
            assert_eq!(check(type_name, None), None, "{type_name}");
        }
    }

    #[test]
    fn test_domain_kinds_are_mappable() {
        assert_eq!(check("Status", Some(DomainKind::Enumeration)), None);
        assert_eq!(check("Money", Some(DomainKind::ValueObject)), None);
        assert_eq!(check("OrderId", Some(DomainKind::Identifier)), None);
    }

    #[test]
    fn test_converter_candidates_warn() {
        for type_name in ["Optional<String>", "Duration", "Period", "java.util.UUID"] {
            let diagnostic = check(type_name, None).unwrap();
            assert_eq!(diagnostic.severity, Severity::Warning);
            assert_eq!(diagnostic.code, DiagnosticCode::TYPE_NEEDS_CONVERTER, "{type_name}");
        }
    }

    #[test]
    fn test_unknown_types_warn() {
        let diagnostic = check("Object", None).unwrap();
        assert_eq!(diagnostic.code, DiagnosticCode::TYPE_UNMAPPABLE);
        let entity = check("Customer", Some(DomainKind::Entity)).unwrap();
        assert_eq!(entity.severity, Severity::Warning);
    }
}
