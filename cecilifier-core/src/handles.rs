//! Typed wrappers over generated variable names
//!
//! A `Handle` names a constructed builder-API object (a `TypeDefinition`, a
//! `MethodReference`, ...). A `Token` names a raw metadata token. Both end up as
//! plain text in emitted statements, but they do not convert into each other,
//! so code asking for one cannot be handed the other.

use crate::naming::SyntheticName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a constructed builder-API object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Wrap an already valid variable name or expression
    pub fn new(text: impl Into<String>) -> Self {
        Handle(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expression reading `property` off the referenced object
    pub fn member(&self, property: &str) -> String {
        format!("{}.{}", self.0, property)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<SyntheticName> for Handle {
    fn from(name: SyntheticName) -> Self {
        Handle(name.into_string())
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to a metadata token
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        Token(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<SyntheticName> for Token {
    fn from(name: SyntheticName) -> Self {
        Token(name.into_string())
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::{ElementKind, NamingService};

    #[test]
    fn test_display_matches_text() {
        let handle = Handle::new("md_Main_3");
        assert_eq!(handle.to_string(), "md_Main_3");
        assert_eq!(handle.as_str(), "md_Main_3");

        let token = Token::new("tk_1");
        assert_eq!(format!("ldtoken {}", token), "ldtoken tk_1");
    }

    #[test]
    fn test_from_synthetic_name() {
        let naming = NamingService::default();
        let handle: Handle = naming.synthesize("Foo", ElementKind::Type).into();
        let token: Token = naming.synthesize("Foo", ElementKind::Type).into();
        assert_eq!(handle.as_str(), "__t_Foo_1");
        assert_eq!(token.as_str(), "__t_Foo_2");
    }

    #[test]
    fn test_member_access() {
        let handle = Handle::new("mr_Add_1");
        assert_eq!(handle.member("Parameters"), "mr_Add_1.Parameters");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let handle = Handle::new("t_Foo_1");
        assert_eq!(serde_json::to_string(&handle).unwrap(), "\"t_Foo_1\"");
    }
}
