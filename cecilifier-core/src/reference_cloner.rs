//! Cloning builder-API method references with overridden properties
//!
//! A `MethodReference` in the generated program is not modified after it is
//! built, so "the same reference, but with another declaring type" means
//! constructing a fresh reference. Parameters and generic parameters belong to
//! exactly one reference, so the clone gets its own copies, re-created against
//! the new owner.

use crate::handles::Handle;
use crate::naming::{ElementKind, NamingService};
use crate::output::StatementWriter;
use cecilifier_syntax::MethodSymbol;
use std::collections::HashMap;
use tracing::debug;

/// Properties copied from the original reference, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClonableProperty {
    HasThis,
    ExplicitThis,
    DeclaringType,
    CallingConvention,
}

impl ClonableProperty {
    pub const ALL: [ClonableProperty; 4] = [
        ClonableProperty::HasThis,
        ClonableProperty::ExplicitThis,
        ClonableProperty::DeclaringType,
        ClonableProperty::CallingConvention,
    ];

    /// Property name on the builder-API `MethodReference`
    pub fn property_name(self) -> &'static str {
        match self {
            ClonableProperty::HasThis => "HasThis",
            ClonableProperty::ExplicitThis => "ExplicitThis",
            ClonableProperty::DeclaringType => "DeclaringType",
            ClonableProperty::CallingConvention => "CallingConvention",
        }
    }

    pub fn from_property_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.property_name() == name)
    }
}

/// Replacement expressions for properties of the clone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyOverrides {
    values: HashMap<ClonableProperty, String>,
}

impl PropertyOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: ClonableProperty, expression: impl Into<String>) -> Self {
        self.values.insert(property, expression.into());
        self
    }

    pub fn set(&mut self, property: ClonableProperty, expression: impl Into<String>) {
        self.values.insert(property, expression.into());
    }

    pub fn get(&self, property: ClonableProperty) -> Option<&str> {
        self.values.get(&property).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Statements building a clone, and the handle naming it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClonedReference {
    pub statements: Vec<String>,
    pub handle: Handle,
}

impl ClonedReference {
    /// True when `handle` is the construction expression itself
    pub fn is_inline(&self) -> bool {
        self.statements.is_empty()
    }

    /// Write the statements and return the handle to use afterwards
    pub fn emit_into(self, writer: &StatementWriter) -> Handle {
        writer.write_all(self.statements);
        self.handle
    }
}

/// Builds modified copies of existing method references
pub struct ReferenceCloner<'a> {
    naming: &'a NamingService,
}

impl<'a> ReferenceCloner<'a> {
    pub fn new(naming: &'a NamingService) -> Self {
        Self { naming }
    }

    /// Clone `original`, a reference to `resolved`, applying `overrides`
    ///
    /// A method without parameters or generic parameters needs no follow-up
    /// statements, so the construction expression itself is returned as the
    /// handle. Otherwise the clone is bound to a fresh variable and copy loops
    /// re-create its parameters and generic parameters.
    pub fn clone_overriding(
        &self,
        original: &Handle,
        overrides: &PropertyOverrides,
        resolved: &MethodSymbol,
    ) -> ClonedReference {
        let construction = construction_expression(original, overrides);

        if resolved.parameters.is_empty() && !resolved.is_generic() {
            debug!(%original, method = %resolved.name, "reference cloned inline");
            return ClonedReference {
                statements: Vec::new(),
                handle: Handle::new(construction),
            };
        }

        let clone: Handle = self
            .naming
            .synthesize(&resolved.safe_identifier(), ElementKind::MemberReference)
            .into();

        let mut statements = vec![format!("var {} = {};", clone, construction)];

        if !resolved.parameters.is_empty() {
            statements.push(format!(
                "foreach (var p in {})\n{{\n    {}.Add(new ParameterDefinition(p.Name, p.Attributes, p.ParameterType));\n}}",
                original.member("Parameters"),
                clone.member("Parameters"),
            ));
        }

        if resolved.is_generic() {
            statements.push(format!(
                "foreach (var gp in {})\n{{\n    {}.Add(new GenericParameter(gp.Name, {}));\n}}",
                original.member("GenericParameters"),
                clone.member("GenericParameters"),
                clone,
            ));
        }

        debug!(
            %original,
            %clone,
            method = %resolved.name,
            statements = statements.len(),
            "reference cloned"
        );
        ClonedReference { statements, handle: clone }
    }
}

fn construction_expression(original: &Handle, overrides: &PropertyOverrides) -> String {
    let initializers: Vec<String> = ClonableProperty::ALL
        .into_iter()
        .map(|property| {
            let name = property.property_name();
            let value = overrides
                .get(property)
                .map(str::to_string)
                .unwrap_or_else(|| original.member(name));
            format!("{} = {}", name, value)
        })
        .collect();

    format!(
        "new MethodReference({}, {}) {{ {} }}",
        original.member("Name"),
        original.member("ReturnType"),
        initializers.join(", "),
    )
}
