//! Resolved symbols handed over by the symbol model
//!
//! These are the answers to "what does this node refer to": the translation
//! core only reads them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved type, possibly a constructed generic instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeSymbol {
    pub name: String,
    pub namespace: Option<String>,
    pub type_arguments: Vec<TypeSymbol>,
}

impl TypeSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            type_arguments: Vec::new(),
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_type_arguments(mut self, arguments: Vec<TypeSymbol>) -> Self {
        self.type_arguments = arguments;
        self
    }

    pub fn is_generic_instance(&self) -> bool {
        !self.type_arguments.is_empty()
    }

    /// Namespace-qualified name without type arguments
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, self.name),
            _ => self.name.clone(),
        }
    }

    /// Identifier fragment usable inside a generated variable name
    ///
    /// `Dictionary<string, List<int>>` becomes `Dictionary_string_List_int`.
    pub fn safe_identifier(&self) -> String {
        let mut id = sanitize_identifier(&self.name);
        for arg in &self.type_arguments {
            id.push('_');
            id.push_str(&arg.safe_identifier());
        }
        id
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())?;
        if !self.type_arguments.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.type_arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// A resolved formal parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterSymbol {
    pub name: String,
    pub parameter_type: TypeSymbol,
}

impl ParameterSymbol {
    pub fn new(name: impl Into<String>, parameter_type: TypeSymbol) -> Self {
        Self {
            name: name.into(),
            parameter_type,
        }
    }
}

/// A resolved method, constructor or accessor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSymbol {
    pub name: String,
    pub declaring_type: TypeSymbol,
    pub return_type: TypeSymbol,
    pub parameters: Vec<ParameterSymbol>,
    pub type_parameters: Vec<String>,
}

impl MethodSymbol {
    pub fn new(name: impl Into<String>, declaring_type: TypeSymbol, return_type: TypeSymbol) -> Self {
        Self {
            name: name.into(),
            declaring_type,
            return_type,
            parameters: Vec::new(),
            type_parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterSymbol) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_type_parameter(mut self, name: impl Into<String>) -> Self {
        self.type_parameters.push(name.into());
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    /// Identifier fragment for generated variable names: `.ctor` becomes `ctor`,
    /// explicit interface names like `IFoo.Bar` become `IFoo_Bar`
    pub fn safe_identifier(&self) -> String {
        sanitize_identifier(self.name.trim_start_matches('.'))
    }
}

/// Turn a metadata name into an identifier fragment
///
/// Generic arity markers (the `` `1 `` of ``List`1``) are removed; every other
/// character that cannot appear in an identifier becomes `_`. Member names
/// after an arity marker are kept: ``IEnumerable`1.GetEnumerator`` becomes
/// `IEnumerable_GetEnumerator`.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '`' {
            while chars.peek().map_or(false, |d| d.is_ascii_digit()) {
                chars.next();
            }
            continue;
        }
        out.push(if c.is_alphanumeric() || c == '_' { c } else { '_' });
    }
    out
}
