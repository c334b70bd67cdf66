//! @ai:module:intent Render parsed functions into stub and test-suite source text
//! @ai:module:layer application
//! @ai:module:public_api Writer, Template, create_writer
//! @ai:module:depends_on model, error
//! @ai:module:stateless true
//!
//! A [`Writer`] only turns finished [`Function`] records into text. It never
//! touches the filesystem, so the same records can be rendered by any backend.

pub mod python;

use crate::error::{Error, Result};
use crate::model::Function;
use serde::{Deserialize, Serialize};

/// @ai:intent Code generator for one target language
pub trait Writer {
    /// Human-readable name of the target language.
    fn language(&self) -> &str;

    /// Appended to the module name to form the stub file name.
    fn stub_suffix(&self) -> &str;

    /// Appended to the module name to form the test-suite file name.
    fn tests_suffix(&self) -> &str;

    /// @ai:intent Render the function stubs, in input order
    fn render_stub(&self, functions: &[Function]) -> String;

    /// @ai:intent Render one test case per example, importing from `module`
    fn render_tests(&self, functions: &[Function], module: &str) -> String;
}

/// @ai:intent Fixed fields written at the top of every stub
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    #[serde(default = "default_placeholder")]
    pub project: String,
    #[serde(default = "default_placeholder")]
    pub student: String,
    #[serde(default = "default_placeholder")]
    pub instructor: String,
    #[serde(default = "default_section")]
    pub section: String,
    /// Import lines placed after the header.
    #[serde(default = "default_imports")]
    pub imports: Vec<String>,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            project: default_placeholder(),
            student: default_placeholder(),
            instructor: default_placeholder(),
            section: default_section(),
            imports: default_imports(),
        }
    }
}

fn default_placeholder() -> String {
    "_".to_string()
}

fn default_section() -> String {
    "__".to_string()
}

fn default_imports() -> Vec<String> {
    vec!["from math import sqrt".to_string()]
}

/// @ai:intent Create the writer registered under `backend`
/// @ai:post Err(UnknownBackend) for any name other than python / py
/// @ai:effects pure
pub fn create_writer(backend: &str, template: &Template) -> Result<Box<dyn Writer>> {
    match backend.to_ascii_lowercase().as_str() {
        "python" | "py" => Ok(Box::new(python::PythonWriter::new(template.clone()))),
        _ => Err(Error::UnknownBackend(backend.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_python_writer() {
        let writer = create_writer("Python", &Template::default()).unwrap();
        assert_eq!(writer.language(), "Python 3");
        assert_eq!(writer.stub_suffix(), ".py");
        assert_eq!(writer.tests_suffix(), "_tests.py");
    }

    #[test]
    fn test_unknown_backend() {
        let result = create_writer("cobol", &Template::default());
        assert!(matches!(result, Err(Error::UnknownBackend(name)) if name == "cobol"));
    }
}
