//! @ai:module:intent Python 3 backend: function stubs plus a unittest suite
//! @ai:module:layer application
//! @ai:module:public_api PythonWriter, python_literal
//! @ai:module:depends_on writer, model, value
//! @ai:module:stateless true

use super::{Template, Writer};
use crate::model::{Example, Function};
use crate::value::Value;

const INDENT: &str = "    ";
const PLACEHOLDER: &str = "pass    # delete \"pass\" once you have real code for this function!";

/// @ai:intent Writer producing `<module>.py` stubs and `<module>_tests.py` unittest suites
#[derive(Debug, Clone, Default)]
pub struct PythonWriter {
    template: Template,
}

impl PythonWriter {
    pub fn new(template: Template) -> Self {
        Self { template }
    }

    fn render_header(&self) -> String {
        let t = &self.template;
        let mut out = format!(
            "\"\"\"\nProject {}\n\nName: {}\nInstructor: {}\nSection: {}\n\"\"\"\n\n",
            t.project, t.student, t.instructor, t.section
        );
        for import in &t.imports {
            out.push_str(import);
            out.push('\n');
        }
        if !t.imports.is_empty() {
            out.push('\n');
        }
        out
    }

    fn render_function(&self, func: &Function) -> String {
        let mut out = format!("def {}({}):\n", func.name, func.parameter_names().join(", "));

        out.push_str(INDENT);
        out.push_str("\"\"\"\n");
        for line in &func.recipe_lines {
            out.push_str(INDENT);
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(INDENT);
        out.push_str("\"\"\"\n");

        out.push_str(INDENT);
        out.push_str(PLACEHOLDER);
        out.push_str("\n\n");

        for entry in &func.outline {
            out.push_str(&INDENT.repeat(entry.level + 1));
            out.push_str(&entry.text);
            out.push_str("\n\n");
        }
        out.push('\n');
        out
    }

    fn render_case(&self, func: &Function, index: usize, example: &Example) -> String {
        let mut out = format!("{}def test_{}_{}(self):\n", INDENT, func.name, index);

        let indent = INDENT.repeat(2);
        if let Some(explanation) = &example.explanation {
            out.push_str(&indent);
            out.push_str(explanation);
            out.push('\n');
        }

        let args: Vec<String> = example.args.iter().map(python_literal).collect();
        let call = format!("{}({})", func.name, args.join(", "));
        let assertion = match &example.expected {
            Value::Bool(true) => format!("self.assertTrue({})", call),
            Value::Bool(false) => format!("self.assertFalse({})", call),
            expected if expected.is_float_like() => {
                format!("self.assertAlmostEqual({}, {})", call, python_literal(expected))
            }
            expected => format!("self.assertEqual({}, {})", call, python_literal(expected)),
        };

        out.push_str(&indent);
        out.push_str(&assertion);
        out.push_str("\n\n");
        out
    }
}

impl Writer for PythonWriter {
    fn language(&self) -> &str {
        "Python 3"
    }

    fn stub_suffix(&self) -> &str {
        ".py"
    }

    fn tests_suffix(&self) -> &str {
        "_tests.py"
    }

    fn render_stub(&self, functions: &[Function]) -> String {
        let mut out = self.render_header();
        for func in functions {
            out.push_str(&self.render_function(func));
        }
        out
    }

    fn render_tests(&self, functions: &[Function], module: &str) -> String {
        let mut out = format!("import unittest\nfrom {} import *\n\n", module);
        out.push_str("\nclass TestCases(unittest.TestCase):\n");

        let mut cases = 0;
        for func in functions {
            if !func.examples.is_empty() {
                out.push('\n');
            }
            for (i, example) in func.examples.iter().enumerate() {
                out.push_str(&self.render_case(func, i + 1, example));
                cases += 1;
            }
        }
        // A class body cannot be empty.
        if cases == 0 {
            out.push_str(INDENT);
            out.push_str("pass\n");
        }

        out.push_str("\nif __name__ == '__main__':\n    unittest.main()\n");
        out
    }
}

/// @ai:intent Render a value as Python literal source
/// @ai:example (Str("x")) -> "'x'"
/// @ai:example (Tuple([Int(1)])) -> "(1,)"
/// @ai:effects pure
pub fn python_literal(value: &Value) -> String {
    match value {
        Value::None => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Int(i) => i.to_string(),
        Value::BigInt(digits) => digits.clone(),
        Value::Float(x) => python_float(*x),
        Value::Complex { re, im } => format!("complex({}, {})", python_float(*re), python_float(*im)),
        Value::Str(s) => python_str(s),
        Value::List(items) => format!("[{}]", join(items)),
        Value::Tuple(items) if items.len() == 1 => format!("({},)", python_literal(&items[0])),
        Value::Tuple(items) => format!("({})", join(items)),
        Value::Dict(entries) => {
            let parts: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", python_literal(k), python_literal(v)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}

fn join(items: &[Value]) -> String {
    items.iter().map(python_literal).collect::<Vec<_>>().join(", ")
}

fn python_float(x: f64) -> String {
    if x.is_nan() {
        return "float('nan')".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "float('inf')" } else { "-float('inf')" }.to_string();
    }

    let text = format!("{:?}", x);
    // Python writes exponents signed and at least two digits wide.
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

fn python_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
