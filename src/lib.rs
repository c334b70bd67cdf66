//! @ai:module:intent Design-recipe outline interpreter: parse annotated outlines, render stubs and tests
//! @ai:module:layer infrastructure
//! @ai:module:public_api parser, tokenizer, coercion, value, model, writer, generate, config, output, error
//! @ai:module:stateless true
//!
//! # DRCOP
//!
//! Reads `.oln.py` outlines whose documentation blocks carry a design recipe
//! (CONTRACT, PURPOSE, IN/OUTS, EXAMPLE) followed by body-outline comments,
//! and turns them into function stubs plus a unit-test suite.
//!
//! ## Example
//!
//! ```rust,no_run
//! use drcop_parser::{create_writer, parse_source, ParserConfig, Template};
//!
//! let outline = std::fs::read_to_string("funcs.oln.py").unwrap();
//! let parsed = parse_source(&outline, &ParserConfig::default()).unwrap();
//!
//! let writer = create_writer("python", &Template::default()).unwrap();
//! println!("{}", writer.render_stub(&parsed.functions));
//! println!("{}", writer.render_tests(&parsed.functions, "funcs"));
//! ```

pub mod coercion;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod generate;
pub mod model;
pub mod output;
pub mod parser;
pub mod state;
pub mod tokenizer;
pub mod value;
pub mod writer;

pub use config::Config;
pub use diagnostic::{Diagnostic, Severity};
pub use error::{Error, Result};
pub use generate::{discover_outlines, generate_file, Artifact, Generation};
pub use model::{Example, Function, MissingField, OutlineEntry, SideEffect};
pub use output::{format_diagnostic, format_diagnostics, format_functions, OutputFormat};
pub use parser::{parse_source, ParseOutput, Parser, ParserConfig};
pub use state::{ParserState, Primary, Section};
pub use value::Value;
pub use writer::{create_writer, Template, Writer};
