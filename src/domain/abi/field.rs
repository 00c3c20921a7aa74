//! ABI field model - one parsed interface entry

use serde::{Deserialize, Serialize};

/// Kind of interface entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Missing `type` means function in the Solidity ABI format
    #[default]
    Function,
    Event,
    Constructor,
    Fallback,
    Receive,
    Error,
}

/// A declared input or output parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Parameter name (may be empty)
    #[serde(default)]
    pub name: String,
    /// Solidity type exactly as declared (e.g., "address", "uint256", "uint")
    #[serde(rename = "type")]
    pub ty: String,
    /// Whether an event parameter lives in a topic rather than the data region
    #[serde(default)]
    pub indexed: bool,
}

impl Argument {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            indexed: false,
        }
    }

    pub fn indexed(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            indexed: true,
            ..Self::new(name, ty)
        }
    }

    /// Name used for display, falling back to `arg{idx}` for unnamed parameters
    pub fn display_name(&self, idx: usize) -> String {
        if self.name.trim().is_empty() {
            format!("arg{}", idx)
        } else {
            self.name.clone()
        }
    }
}

/// One function, event, constructor or fallback entry of an ABI description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiField {
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub constant: bool,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub inputs: Vec<Argument>,
    #[serde(default)]
    pub outputs: Vec<Argument>,
}

impl AbiField {
    pub fn function(name: impl Into<String>, inputs: Vec<Argument>) -> Self {
        Self {
            kind: FieldKind::Function,
            name: name.into(),
            inputs,
            ..Self::default()
        }
    }

    pub fn event(name: impl Into<String>, inputs: Vec<Argument>) -> Self {
        Self {
            kind: FieldKind::Event,
            name: name.into(),
            inputs,
            ..Self::default()
        }
    }

    /// Constructors, fallbacks and receive functions carry no name
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn is_event(&self) -> bool {
        self.kind == FieldKind::Event
    }

    /// Anonymous events emit no topic-0 and can never be matched by topic
    pub fn is_anonymous_event(&self) -> bool {
        self.is_event() && self.anonymous
    }

    /// Input types in declared order
    pub fn input_types(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|input| input.ty.as_str())
    }

    /// Comma-separated input names, as shown next to a signature
    pub fn input_names(&self) -> String {
        self.inputs
            .iter()
            .map(|input| input.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_legacy_entry() {
        let json = r#"{
            "constant": false,
            "inputs": [
                {"name": "_to", "type": "address"},
                {"name": "_value", "type": "uint256"}
            ],
            "name": "transfer",
            "outputs": [{"name": "", "type": "bool"}],
            "payable": false,
            "type": "function"
        }"#;

        let field: AbiField = serde_json::from_str(json).unwrap();
        assert_eq!(field.kind, FieldKind::Function);
        assert_eq!(field.name, "transfer");
        assert_eq!(field.inputs.len(), 2);
        assert_eq!(field.inputs[1].ty, "uint256");
        assert_eq!(field.outputs[0].ty, "bool");
        assert_eq!(field.input_names(), "_to, _value");
    }

    #[test]
    fn test_defaults_for_missing_keys() {
        let field: AbiField = serde_json::from_str(r#"{"type": "fallback"}"#).unwrap();
        assert_eq!(field.kind, FieldKind::Fallback);
        assert!(!field.has_name());
        assert!(field.inputs.is_empty());

        let field: AbiField = serde_json::from_str(r#"{"name": "totalSupply"}"#).unwrap();
        assert_eq!(field.kind, FieldKind::Function);
    }

    #[test]
    fn test_anonymous_event() {
        let json = r#"{
            "anonymous": true,
            "inputs": [{"indexed": true, "name": "who", "type": "address"}],
            "name": "Ping",
            "type": "event"
        }"#;

        let field: AbiField = serde_json::from_str(json).unwrap();
        assert!(field.is_anonymous_event());
        assert!(field.inputs[0].indexed);
    }

    #[test]
    fn test_display_name_for_unnamed() {
        assert_eq!(Argument::new("", "uint256").display_name(3), "arg3");
        assert_eq!(Argument::new("amount", "uint256").display_name(3), "amount");
    }
}
