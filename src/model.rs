//! @ai:module:intent Define the function and example records built from a design recipe
//! @ai:module:layer domain
//! @ai:module:public_api Function, Example, OutlineEntry, SideEffect, MissingField, generated_name
//! @ai:module:depends_on value
//! @ai:module:stateless true

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Argument tag that declares a function without parameters.
pub const NO_ARGS_TAG: &str = "None";

/// @ai:intent Side-effect channel inferred from the IN/OUTS comment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SideEffect {
    Console,
    File,
}

/// @ai:intent One comment line of the body outline and how deeply it is nested
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutlineEntry {
    pub text: String,
    pub level: usize,
}

/// @ai:intent A worked example: argument values, expected return value and explanation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Example {
    pub args: Vec<Value>,
    pub expected: Value,
    pub explanation: Option<String>,
}

/// @ai:intent A part of a function record still missing at finalization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    Purpose,
    ArgumentNames,
    BodyOutline,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MissingField::Purpose => "purpose",
            MissingField::ArgumentNames => "argument names",
            MissingField::BodyOutline => "body outline",
        };
        f.write_str(name)
    }
}

/// @ai:intent Everything known about one function declared by a CONTRACT line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Function {
    pub name: String,
    pub arg_types: Vec<String>,
    pub return_type: String,
    pub purpose: Option<String>,
    /// Same length as `arg_types`; `None` until a name is resolved.
    pub arg_names: Vec<Option<String>>,
    pub return_name: Option<String>,
    /// Design-recipe lines as written, reproduced in the generated stub.
    pub recipe_lines: Vec<String>,
    pub inputs: Option<String>,
    pub outputs: Option<String>,
    pub side_effects: Vec<SideEffect>,
    pub examples: Vec<Example>,
    pub outline: Vec<OutlineEntry>,
}

impl Function {
    /// @ai:intent Create a function from a parsed contract
    /// @ai:post arg_names.len() == arg_types.len()
    /// @ai:example ("f", ["None"], "int") -> arity 0
    pub fn new(name: impl Into<String>, arg_types: Vec<String>, return_type: impl Into<String>) -> Self {
        let arg_types = if arg_types.len() == 1 && arg_types[0].eq_ignore_ascii_case(NO_ARGS_TAG) {
            Vec::new()
        } else {
            arg_types
        };
        let arg_names = vec![None; arg_types.len()];

        Self {
            name: name.into(),
            arg_types,
            return_type: return_type.into(),
            purpose: None,
            arg_names,
            return_name: None,
            recipe_lines: Vec::new(),
            inputs: None,
            outputs: None,
            side_effects: Vec::new(),
            examples: Vec::new(),
            outline: Vec::new(),
        }
    }

    pub fn arity(&self) -> usize {
        self.arg_types.len()
    }

    /// @ai:intent List the fields that keep this function from being complete
    /// @ai:post empty iff purpose is set, every argument is named and the outline is non-empty
    /// @ai:effects pure
    pub fn validate_completion(&self) -> Vec<MissingField> {
        let mut missing = Vec::new();
        if self.purpose.is_none() {
            missing.push(MissingField::Purpose);
        }
        if self.arg_names.iter().any(Option::is_none) {
            missing.push(MissingField::ArgumentNames);
        }
        if self.outline.is_empty() {
            missing.push(MissingField::BodyOutline);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.validate_completion().is_empty()
    }

    /// @ai:intent Argument names in declaration order, generating one for each unresolved slot
    /// @ai:post names are distinct whenever the resolved names are
    pub fn parameter_names(&self) -> Vec<String> {
        self.arg_names
            .iter()
            .zip(&self.arg_types)
            .enumerate()
            .map(|(i, (name, tag))| name.clone().unwrap_or_else(|| generated_name(tag, i)))
            .collect()
    }
}

/// @ai:intent Name for an argument the purpose line did not name
/// @ai:example ("float", 1) -> "float_val_2"
pub fn generated_name(tag: &str, position: usize) -> String {
    format!("{}_val_{}", tag, position + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_function_has_unresolved_names() {
        let func = Function::new("getVelocitySkater", tags(&["float", "float", "float"]), "float");
        assert_eq!(func.arity(), 3);
        assert_eq!(func.arg_names, vec![None, None, None]);
    }

    #[test]
    fn test_none_tag_means_no_arguments() {
        let func = Function::new("getFuel", tags(&["None"]), "int");
        assert_eq!(func.arity(), 0);
        assert!(func.arg_names.is_empty());
    }

    #[test]
    fn test_validate_completion_names_missing_fields() {
        let mut func = Function::new("poundsToKG", tags(&["float"]), "float");
        assert_eq!(
            func.validate_completion(),
            vec![
                MissingField::Purpose,
                MissingField::ArgumentNames,
                MissingField::BodyOutline
            ]
        );

        func.purpose = Some("Converts weight".to_string());
        func.arg_names[0] = Some("pounds".to_string());
        assert_eq!(func.validate_completion(), vec![MissingField::BodyOutline]);

        func.outline.push(OutlineEntry {
            text: "# calculate".to_string(),
            level: 0,
        });
        assert!(func.validate_completion().is_empty());
        assert!(func.is_complete());
    }

    #[test]
    fn test_unnamed_parameters_get_distinct_names() {
        let mut func = Function::new("add", tags(&["int", "int"]), "int");
        assert_eq!(func.parameter_names(), vec!["int_val_1", "int_val_2"]);

        func.arg_names[1] = Some("b".to_string());
        assert_eq!(func.parameter_names(), vec!["int_val_1", "b"]);
    }

    #[test]
    fn test_missing_field_display() {
        assert_eq!(MissingField::ArgumentNames.to_string(), "argument names");
    }
}
