use std::cell::RefCell;
use tracing::{debug, trace};

use super::chain::{Evidence, ResolutionChain, Resolved};
use super::unwrap::{kind_of, unwrap_value_object};
use super::{PropertyModel, PropertyProvenance};
use crate::config::{column_key, ConfigLookup, ConfigMismatch, Typed};
use crate::diagnostics::DiagnosticSink;
use crate::heuristics::{ColumnKind, HeuristicsDetector};
use crate::model::{DomainKind, DomainModelLookup, DomainProperty, DomainType, TypeRef};
use crate::naming::to_snake_case;
use crate::types;
use crate::validation::TypeCompatibilityValidator;

/// Length given to text columns when nothing more specific is known.
pub const DEFAULT_TEXT_LENGTH: u32 = 255;

/// Everything a resolution source may look at for one property.
#[derive(Debug)]
pub struct PropertyContext {
    /// Simple name of the owning domain type.
    pub owner: String,
    pub property: String,
    /// Storage type after unwrapping.
    pub type_ref: TypeRef,
    pub lob: bool,
    mismatches: RefCell<Vec<ConfigMismatch>>,
}

impl PropertyContext {
    pub fn new(owner: &str, property: &str, type_ref: TypeRef, lob: bool) -> Self {
        Self {
            owner: owner.to_string(),
            property: property.to_string(),
            type_ref,
            lob,
            mismatches: RefCell::new(Vec::new()),
        }
    }

    pub fn type_name(&self) -> &str {
        self.type_ref.simple_name()
    }

    pub fn is_text(&self) -> bool {
        types::is_text(self.type_name())
    }

    pub fn path(&self) -> String {
        format!("{}.{}", self.owner, self.property)
    }

    fn key(&self, attribute: &str) -> String {
        column_key(&self.owner, &self.property, attribute)
    }

    /// Keep a present value, remember a mismatched one for reporting.
    fn accept<T>(&self, typed: Typed<T>) -> Option<T> {
        match typed {
            Ok(value) => value,
            Err(mismatch) => {
                self.mismatches.borrow_mut().push(mismatch);
                None
            }
        }
    }

    fn take_mismatches(&self) -> Vec<ConfigMismatch> {
        self.mismatches.take()
    }
}

/// Resolves the column mapping of one non-identifier property.
pub struct PropertyResolver<'a> {
    model: &'a dyn DomainModelLookup,
    config: &'a dyn ConfigLookup,
    heuristics: &'a dyn HeuristicsDetector,
}

impl<'a> PropertyResolver<'a> {
    pub fn new(
        model: &'a dyn DomainModelLookup,
        config: &'a dyn ConfigLookup,
        heuristics: &'a dyn HeuristicsDetector,
    ) -> Self {
        Self {
            model,
            config,
            heuristics,
        }
    }

    /// Length: configuration, then heuristic, then 255 for non-LOB text.
    pub fn length_chain(&self) -> ResolutionChain<'_, PropertyContext, u32> {
        ResolutionChain::new("length")
            .then(Evidence::Configuration, |ctx: &PropertyContext| {
                ctx.accept(self.config.get_u32(&ctx.key("length")))
            })
            .then(Evidence::Heuristic, |ctx: &PropertyContext| {
                self.heuristics.max_length(&ctx.property, ctx.type_name())
            })
            .then(Evidence::Default, |ctx: &PropertyContext| {
                ctx.is_text().then_some(DEFAULT_TEXT_LENGTH)
            })
    }

    /// Nullability: configuration, then heuristic, then nullable.
    pub fn nullable_chain(&self) -> ResolutionChain<'_, PropertyContext, bool> {
        ResolutionChain::new("nullable")
            .then(Evidence::Configuration, |ctx: &PropertyContext| {
                ctx.accept(self.config.get_bool(&ctx.key("nullable")))
            })
            .then(Evidence::Heuristic, |ctx: &PropertyContext| {
                self.heuristics.nullable(&ctx.property, ctx.type_name())
            })
            .then(Evidence::Default, |_: &PropertyContext| Some(true))
    }

    /// Uniqueness: configuration, then heuristic, then not unique.
    pub fn unique_chain(&self) -> ResolutionChain<'_, PropertyContext, bool> {
        ResolutionChain::new("unique")
            .then(Evidence::Configuration, |ctx: &PropertyContext| {
                ctx.accept(self.config.get_bool(&ctx.key("unique")))
            })
            .then(Evidence::Heuristic, |ctx: &PropertyContext| {
                self.heuristics.unique(&ctx.property, ctx.type_name())
            })
            .then(Evidence::Default, |_: &PropertyContext| Some(false))
    }

    /// Resolve `property` of `owner`. The identifier property is handled by
    /// [`IdentifierResolver`](super::IdentifierResolver) and should not be passed here.
    pub fn resolve(
        &self,
        owner: &DomainType,
        property: &DomainProperty,
        sink: &mut dyn DiagnosticSink,
    ) -> PropertyModel {
        let reference = self
            .model
            .find_ref(&property.type_ref)
            .filter(|target| target.kind.is_entity_like());

        let (storage_type, embedded, default_column) = match reference {
            Some(target) => (
                self.reference_identifier_type(target),
                false,
                to_snake_case(&reference_column_stem(&property.name)),
            ),
            None => {
                let unwrapped = unwrap_value_object(&property.type_ref, self.model);
                let embedded = unwrapped.is_multi_field();
                (unwrapped.resolved, embedded, to_snake_case(&property.name))
            }
        };

        let type_name = storage_type.simple_name().to_string();
        let lob = types::is_text(&type_name)
            && self.heuristics.column_kind(&property.name, &type_name) == ColumnKind::LargeObject;
        let kind = kind_of(&storage_type, self.model);

        let ctx = PropertyContext::new(owner.simple_name(), &property.name, storage_type.clone(), lob);

        let (column_name, column_evidence) =
            match ctx.accept(self.config.get_str(&ctx.key("name"))) {
                Some(name) => (name.to_string(), Evidence::Configuration),
                None => (default_column, Evidence::Default),
            };

        let length = self.length_chain().resolve(&ctx);
        let nullable = required(self.nullable_chain().resolve(&ctx), true);
        let unique = required(self.unique_chain().resolve(&ctx), false);

        for mismatch in ctx.take_mismatches() {
            sink.report(mismatch.to_diagnostic(&ctx.path()));
        }

        if let Some(diagnostic) = TypeCompatibilityValidator::validate(&storage_type, kind, &ctx.path()) {
            sink.report(diagnostic);
        }

        trace!(
            property = %ctx.path(),
            length = ?length.map(|r| r.evidence),
            nullable = %nullable.evidence,
            unique = %unique.evidence,
            "column evidence"
        );
        debug!(property = %ctx.path(), column = %column_name, storage_type = %storage_type, "resolved property");

        PropertyModel {
            name: property.name.clone(),
            type_ref: storage_type.clone(),
            original_type: property.type_ref.clone(),
            column_name,
            length: length.map(|r| r.value),
            nullable: nullable.value,
            unique: unique.value,
            lob,
            enumerated: kind == Some(DomainKind::Enumeration),
            temporal: types::is_temporal(&type_name),
            embedded,
            reference_target: reference.map(|target| target.qualified_name.clone()),
            provenance: PropertyProvenance {
                column_name: column_evidence,
                length: length.map(|r| r.evidence),
                nullable: nullable.evidence,
                unique: unique.evidence,
            },
        }
    }

    /// Storage type of another aggregate's identifier, text when it has none.
    fn reference_identifier_type(&self, target: &DomainType) -> TypeRef {
        target
            .property("id")
            .map(|id| unwrap_value_object(&id.type_ref, self.model).resolved)
            .unwrap_or_else(|| TypeRef::named("String"))
    }
}

/// The default step always answers; this only guards a chain built without one.
fn required<T>(resolved: Option<Resolved<T>>, fallback: T) -> Resolved<T> {
    resolved.unwrap_or(Resolved {
        value: fallback,
        evidence: Evidence::Default,
    })
}

fn reference_column_stem(property: &str) -> String {
    if property.ends_with("Id") {
        property.to_string()
    } else {
        format!("{property}Id")
    }
}
