use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::model::TypeRef;
use crate::resolve::GenerationStrategy;
use crate::types;

/// Checks that a generation strategy can work with the identifier type.
///
/// | Strategy | Accepts | Otherwise |
/// |---|---|---|
/// | IDENTITY, SEQUENCE, AUTO | integer-like types | ERROR |
/// | UUID | text or UUID | WARNING for numeric types |
/// | ASSIGNED | anything | never reports |
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierStrategyValidator;

impl IdentifierStrategyValidator {
    pub fn validate(
        id_type: &TypeRef,
        strategy: GenerationStrategy,
        context: &str,
    ) -> Option<Diagnostic> {
        let type_name = id_type.simple_name();
        match strategy {
            GenerationStrategy::Identity | GenerationStrategy::Sequence | GenerationStrategy::Auto
                if !types::is_integral(type_name) =>
            {
                Some(
                    Diagnostic::error(
                        DiagnosticCode::ID_STRATEGY_INCOMPATIBLE,
                        format!(
                            "Generation strategy {strategy} requires a numeric identifier, but the identifier type is {type_name}"
                        ),
                    )
                    .in_context(context),
                )
            }
            GenerationStrategy::Uuid if types::is_integral(type_name) => Some(
                Diagnostic::warning(
                    DiagnosticCode::ID_STRATEGY_MISMATCH,
                    format!(
                        "Generation strategy {strategy} expects a String or UUID identifier, but the identifier type is numeric ({type_name})"
                    ),
                )
                .in_context(context),
            ),
            _ => None,
        }
    }
}
