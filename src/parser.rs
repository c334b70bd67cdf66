//! @ai:module:intent Read a design-recipe outline line by line and build function records
//! @ai:module:layer application
//! @ai:module:public_api Parser, ParserConfig, ParseOutput, parse_source
//! @ai:module:depends_on state, model, tokenizer, coercion, diagnostic, error
//!
//! The parser is a push-driven state machine. Each call to
//! [`Parser::parse_line`] re-evaluates the [`ParserState`] against the
//! stripped line, then hands the raw line to the sub-parser for that state.
//! Closing a design recipe or a body outline re-evaluates the same line once
//! more, so a delimiter can both close one phase and open the next.

use crate::coercion::coerce;
use crate::diagnostic::Diagnostic;
use crate::error::{Error, Result};
use crate::model::{generated_name, Example, Function, OutlineEntry, SideEffect};
use crate::state::{ParserState, Primary, Section};
use crate::tokenizer::{tokenize, Token, Tokenized};
use crate::value::Value;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Opens and closes a documentation block.
pub const BLOCK_DELIMITER: &str = "\"\"\"";
/// Starts a body outline comment.
pub const OUTLINE_MARKER: char = '#';
pub const ARROW: &str = "->";
const HEADER_SEPARATOR: char = '|';

const CONSOLE_KEYWORDS: [&str; 3] = ["console", "command", "terminal"];
const FILE_KEYWORDS: [&str; 4] = ["file", "drive", "disk", "filesystem"];

// Backtick spans in a purpose statement name the arguments, then the return value.
static RE_NAME_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[\w\s\-'_]+`").expect("valid name span regex"));

static RE_NON_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W").expect("valid identifier regex"));

/// @ai:intent Caller-supplied settings the parser depends on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParserConfig {
    /// Primitive type tags converted directly; other tags go through literal parsing.
    #[serde(default = "default_recognized_types")]
    pub recognized_types: Vec<String>,
    /// Columns per outline nesting level.
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,
}

fn default_recognized_types() -> Vec<String> {
    ["int", "float", "complex", "str", "chr", "bool"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_indent_size() -> usize {
    4
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            recognized_types: default_recognized_types(),
            indent_size: default_indent_size(),
        }
    }
}

/// @ai:intent Finished functions and the ignorable diagnostics raised while reading them
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub functions: Vec<Function>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A sub-parser either succeeds or stops the run with a critical diagnostic.
type Step = std::result::Result<(), Diagnostic>;

/// @ai:intent Line-oriented state machine that assembles Function records
pub struct Parser {
    config: ParserConfig,
    line_num: usize,
    line: String,
    prev_line: String,
    state: ParserState,
    current: Option<Function>,
    functions: Vec<Function>,
    diagnostics: Vec<Diagnostic>,
}

/// @ai:intent Parse a whole outline held in memory
/// @ai:post Err(Aborted) when any critical diagnostic was raised
/// @ai:effects pure
pub fn parse_source(text: &str, config: &ParserConfig) -> Result<ParseOutput> {
    let mut parser = Parser::new(config.clone());
    for line in text.lines() {
        parser.parse_line(line)?;
    }
    parser.finish()
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            line_num: 0,
            line: String::new(),
            prev_line: String::new(),
            state: ParserState::INIT,
            current: None,
            functions: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Functions finalized so far; the one still being built is not included.
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// @ai:intent Consume one line of the outline
    /// @ai:pre finish has not been called and no earlier call returned Err
    /// @ai:post Err(Aborted) carries the critical diagnostic and every ignorable one so far
    /// @ai:effects pure
    pub fn parse_line(&mut self, line: &str) -> Result<()> {
        let line = line.trim_end_matches(['\r', '\n']);
        self.prev_line = std::mem::replace(&mut self.line, line.to_string());
        self.line_num += 1;

        self.re_eval_state(line);
        self.dispatch(line).map_err(|critical| self.abort(critical))
    }

    /// @ai:intent Signal end of input and hand over the finished functions
    /// @ai:post Err(Aborted) when no function was ever started
    pub fn finish(mut self) -> Result<ParseOutput> {
        if self.current.is_none() {
            let critical = self.critical(0, "Invalid syntax caused function object to not populate correctly.");
            return Err(self.abort(critical));
        }
        self.finalize_current(false);

        Ok(ParseOutput {
            functions: self.functions,
            diagnostics: self.diagnostics,
        })
    }

    fn abort(&mut self, critical: Diagnostic) -> Error {
        tracing::debug!(line = critical.line, "aborting: {}", critical.message);
        Error::Aborted {
            critical,
            diagnostics: std::mem::take(&mut self.diagnostics),
        }
    }

    // -- State evaluation -----------------------------------------------------

    fn re_eval_state(&mut self, line: &str) {
        let stripped = line.trim();
        // A closing delimiter replays the line against the new state, once.
        for _ in 0..2 {
            if !self.step_state(stripped) {
                break;
            }
        }
    }

    /// Applies one transition; returns true when the line must be evaluated again.
    fn step_state(&mut self, line: &str) -> bool {
        let is_delimiter = line.starts_with(BLOCK_DELIMITER);

        match self.state.primary {
            Primary::Init => {
                if is_delimiter {
                    self.transition(Primary::Block, Section::None);
                } else if line.starts_with(OUTLINE_MARKER) {
                    self.transition(Primary::BodyOutline, Section::None);
                }
                false
            }
            Primary::Block => {
                if is_delimiter {
                    self.transition(Primary::Init, Section::None);
                } else {
                    self.detect_section(line);
                }
                false
            }
            Primary::DesignRecipe => {
                if is_delimiter {
                    self.transition(Primary::Block, Section::None);
                    return true;
                }
                if !self.detect_section(line) {
                    self.transition(Primary::DesignRecipe, Section::None);
                }
                false
            }
            Primary::BodyOutline => {
                if is_delimiter {
                    self.transition(Primary::Init, Section::None);
                    return true;
                }
                false
            }
        }
    }

    /// Enters the first design-recipe section whose header the line carries.
    fn detect_section(&mut self, line: &str) -> bool {
        for (section, label) in Section::HEADERS {
            let by_header = starts_with_ignore_case(line, label) && self.state.allows(section);
            let by_arrow = section == Section::Example && line.contains(ARROW);
            if by_header || by_arrow {
                self.transition(Primary::DesignRecipe, section);
                return true;
            }
        }
        false
    }

    fn transition(&mut self, primary: Primary, section: Section) {
        let next = ParserState::new(primary, section);
        if next != self.state {
            tracing::trace!(line = self.line_num, from = %self.state, to = %next, "state transition");
        }
        self.state = next;
    }

    fn dispatch(&mut self, line: &str) -> Step {
        match (self.state.primary, self.state.section) {
            (Primary::DesignRecipe, Section::Contract) => {
                self.parse_contract(line)?;
                self.record(line);
            }
            (Primary::DesignRecipe, Section::Purpose) => {
                self.parse_purpose(line)?;
                self.record(&line.replace('`', ""));
            }
            (Primary::DesignRecipe, Section::InOuts) => {
                self.parse_in_outs(line)?;
                self.record(line);
            }
            (Primary::DesignRecipe, Section::Example) => {
                self.parse_example(line)?;
                self.record(line);
            }
            // Continuation text of the previous section, kept for the stub.
            (Primary::DesignRecipe, Section::None) => self.record(line),
            (Primary::BodyOutline, _) => self.parse_body_outline(line)?,
            _ => {}
        }
        Ok(())
    }

    fn record(&mut self, line: &str) {
        if let Some(func) = self.current.as_mut() {
            func.recipe_lines.push(line.to_string());
        }
    }

    // -- Sub-parsers ----------------------------------------------------------

    fn parse_contract(&mut self, line: &str) -> Step {
        let (content, offset) = self.recipe_content(line);
        // `name : type* -> ret`; the colon is decoration.
        let cleaned = content.replace(':', " ");
        let tokens = words(&cleaned);

        if tokens.len() < 3 || tokens[tokens.len() - 2].1 != ARROW {
            let at = match tokens.len() {
                0 => content.len(),
                1 => tokens[0].0,
                n => tokens[n - 2].0,
            };
            return Err(self.critical(offset + at, "Arrow (->) is expected in CONTRACT"));
        }

        let name = tokens[0].1;
        let return_type = tokens[tokens.len() - 1].1;
        let arg_types = tokens[1..tokens.len() - 2]
            .iter()
            .map(|(_, t)| t.to_string())
            .collect();

        self.finalize_current(true);
        let func = Function::new(name, arg_types, return_type);
        tracing::debug!(function = %func.name, arity = func.arity(), "contract parsed");
        self.current = Some(func);
        Ok(())
    }

    fn parse_purpose(&mut self, line: &str) -> Step {
        self.require_function()?;
        let (content, _) = self.recipe_content(line);

        let names: Vec<String> = RE_NAME_SPAN
            .find_iter(content)
            .map(|m| to_identifier(m.as_str().trim_matches('`')))
            .collect();

        if let Some(func) = self.current.as_mut() {
            func.purpose = Some(content.to_string());
            assign_names(func, names);
        }
        Ok(())
    }

    fn parse_in_outs(&mut self, line: &str) -> Step {
        self.require_function()?;
        let (content, offset) = self.recipe_content(line);

        let comment_at = content.find('#');
        let types = &content[..comment_at.unwrap_or(content.len())];

        let (mut inputs, mut outputs) = (None, None);
        match types.find('/') {
            Some(slash) => {
                let (before, after) = (&types[..slash], &types[slash + 1..]);
                inputs = self.side_channel(before.trim(), offset + leading_ws(before), "input");
                outputs = self.side_channel(
                    after.trim(),
                    offset + slash + 1 + leading_ws(after),
                    "output",
                );
            }
            None => self.ignorable(
                offset + types.trim_end().len(),
                "Slash (/) token is expected in IN/OUTS",
            ),
        }

        let mut effects = Vec::new();
        if let Some(at) = comment_at {
            let comment = content[at..].to_lowercase();
            if CONSOLE_KEYWORDS.iter().any(|k| comment.contains(k)) {
                effects.push(SideEffect::Console);
            }
            if FILE_KEYWORDS.iter().any(|k| comment.contains(k)) {
                effects.push(SideEffect::File);
            }
        }

        if let Some(func) = self.current.as_mut() {
            func.inputs = inputs;
            func.outputs = outputs;
            func.side_effects.extend(effects);
        }
        Ok(())
    }

    /// Matches one side of IN/OUTS against the recognized tags; `none` is valid and unset.
    fn side_channel(&mut self, tag: &str, offset: usize, side: &str) -> Option<String> {
        if let Some(known) = self
            .config
            .recognized_types
            .iter()
            .find(|t| t.eq_ignore_ascii_case(tag))
        {
            return Some(known.clone());
        }
        if !tag.eq_ignore_ascii_case("none") {
            self.ignorable(offset, format!("Unrecognized {} type '{}'", side, tag.to_lowercase()));
        }
        None
    }

    fn parse_example(&mut self, line: &str) -> Step {
        self.require_function()?;
        let (content, offset) = self.recipe_content(line);

        if content.eq_ignore_ascii_case("n/a") {
            return Ok(());
        }

        let (body, explanation) = match content.find('#') {
            Some(at) => (content[..at].trim_end(), Some(content[at..].trim_end().to_string())),
            None => (content, None),
        };

        let Some(arrow) = find_arrow(body) else {
            self.ignorable(offset + body.len(), "Arrow (->) is expected in EXAMPLE");
            return Ok(());
        };

        let (arg_types, return_type) = match self.current.as_ref() {
            Some(func) => (func.arg_types.clone(), func.return_type.clone()),
            None => return Ok(()),
        };

        let args_text = &body[..arrow];
        let args_start = offset + leading_ws(args_text);
        let args_end = offset + args_text.trim_end().len();
        let tokens = tokenize(args_text.trim(), arg_types.len());
        let args = arg_types
            .iter()
            .enumerate()
            .map(|(i, tag)| {
                let slot = tokens.slots.get(i).cloned().flatten();
                let label = format!("argument {}", i + 1);
                self.example_value(slot, tag, &label, args_start, args_end)
            })
            .collect::<Vec<_>>();
        self.report_token_issues(&tokens, args_start);

        let return_text = &body[arrow + ARROW.len()..];
        let return_start = offset + arrow + ARROW.len() + leading_ws(return_text);
        let return_tokens = tokenize(return_text.trim(), 1);
        let slot = return_tokens.slots.first().cloned().flatten();
        let expected = self.example_value(slot, &return_type, "return value", return_start, offset + body.len());
        self.report_token_issues(&return_tokens, return_start);

        if let Some(func) = self.current.as_mut() {
            func.examples.push(Example {
                args,
                expected,
                explanation,
            });
        }
        Ok(())
    }

    /// Coerces one slot; failures degrade to an absent value plus a diagnostic.
    fn example_value(
        &mut self,
        slot: Option<Token>,
        tag: &str,
        label: &str,
        span_start: usize,
        span_end: usize,
    ) -> Value {
        let Some(token) = slot else {
            self.ignorable(span_end, format!("Missing value for {}", label));
            return Value::None;
        };

        match coerce(&token.text, tag, &self.config.recognized_types) {
            Ok(value) => value,
            Err(err) => {
                let column = self.column_at(span_start) + token.column;
                self.ignorable_at_column(
                    column,
                    format!("Argument value '{}' was not accepted ({})", token.text, err),
                );
                Value::None
            }
        }
    }

    fn report_token_issues(&mut self, tokens: &Tokenized, span_start: usize) {
        let base = self.column_at(span_start);
        for issue in &tokens.issues {
            self.ignorable_at_column(base + issue.column, issue.message.clone());
        }
    }

    fn parse_body_outline(&mut self, line: &str) -> Step {
        let stripped = line.trim();
        if !stripped.starts_with(OUTLINE_MARKER) {
            return Ok(());
        }
        self.require_function()?;

        let marker = line.find(OUTLINE_MARKER).unwrap_or(0);
        let offset = line[..marker].chars().count();
        let indent = self.config.indent_size.max(1);
        let level = (offset as f64 / indent as f64).round_ties_even() as usize;

        if let Some(func) = self.current.as_mut() {
            func.outline.push(OutlineEntry {
                text: stripped.to_string(),
                level,
            });
        }
        Ok(())
    }

    // -- Helpers --------------------------------------------------------------

    /// Moves the function being built to the output list, reporting what it lacks.
    fn finalize_current(&mut self, closed_by_contract: bool) {
        let Some(func) = self.current.take() else {
            return;
        };

        let missing = func.validate_completion();
        if !missing.is_empty() {
            let fields: Vec<String> = missing.iter().map(ToString::to_string).collect();
            let message = format!(
                "Function '{}' is incomplete (missing {})",
                func.name,
                fields.join(", ")
            );
            let diag = if closed_by_contract {
                Diagnostic::ignorable(
                    self.line_num.saturating_sub(1).max(1),
                    0,
                    message,
                    &self.prev_line,
                )
            } else {
                Diagnostic::ignorable(self.line_num, 0, message, &self.line)
            };
            self.push_diagnostic(diag);
        }

        tracing::debug!(
            function = %func.name,
            examples = func.examples.len(),
            outline = func.outline.len(),
            "function finalized"
        );
        self.functions.push(func);
    }

    fn require_function(&self) -> Step {
        if self.current.is_some() {
            Ok(())
        } else {
            Err(self.critical(
                0,
                "Invalid syntax has caused function object to not populate (no CONTRACT before this line)",
            ))
        }
    }

    /// Payload right of the header pipe, with its byte offset in the line.
    fn recipe_content<'a>(&mut self, line: &'a str) -> (&'a str, usize) {
        if let Some(pipe) = line.find(HEADER_SEPARATOR) {
            let rest = &line[pipe + 1..];
            return (rest.trim(), pipe + 1 + leading_ws(rest));
        }

        let lead = leading_ws(line);
        self.ignorable(lead, "Pipe (|) token is expected at the design recipe header.");

        let stripped = line.trim();
        for (_, label) in Section::HEADERS {
            if starts_with_ignore_case(stripped, label) {
                let after = &stripped[label.len()..];
                let word_end = after.find(char::is_whitespace).unwrap_or(after.len());
                let rest = &after[word_end..];
                return (rest.trim(), lead + label.len() + word_end + leading_ws(rest));
            }
        }
        (stripped, lead)
    }

    fn column_at(&self, byte_offset: usize) -> usize {
        self.line
            .get(..byte_offset)
            .map_or_else(|| self.line.chars().count(), |s| s.chars().count())
    }

    fn ignorable(&mut self, byte_offset: usize, message: impl Into<String>) {
        let column = self.column_at(byte_offset);
        self.ignorable_at_column(column, message);
    }

    fn ignorable_at_column(&mut self, column: usize, message: impl Into<String>) {
        let diag = Diagnostic::ignorable(self.line_num, column, message, &self.line);
        self.push_diagnostic(diag);
    }

    fn push_diagnostic(&mut self, diag: Diagnostic) {
        tracing::debug!(line = diag.line, column = diag.column, "{}", diag.message);
        self.diagnostics.push(diag);
    }

    fn critical(&self, byte_offset: usize, message: &str) -> Diagnostic {
        Diagnostic::critical(self.line_num, self.column_at(byte_offset), message, &self.line)
    }
}

/// Fills argument names in order, then the return name, then generated names.
fn assign_names(func: &mut Function, names: Vec<String>) {
    let mut names = names.into_iter();
    for slot in func.arg_names.iter_mut() {
        match names.next() {
            Some(name) => *slot = Some(name),
            None => break,
        }
    }
    if let Some(name) = names.next() {
        func.return_name = Some(name);
    }
    for (position, (slot, tag)) in func.arg_names.iter_mut().zip(&func.arg_types).enumerate() {
        if slot.is_none() {
            *slot = Some(generated_name(tag, position));
        }
    }
}

/// @ai:intent Turn a natural-language name into an identifier
/// @ai:example ("Skater's Weight") -> "Skaters_Weight"
/// @ai:example ("1st velocity of some_object 2") -> "_1st_velocity_of_some_object_2"
/// @ai:effects pure
pub fn to_identifier(natural: &str) -> String {
    let cleaned = natural.replace('\'', "");
    let mut ident = String::with_capacity(cleaned.len() + 1);
    if !cleaned.starts_with(|c: char| c == '_' || c.is_alphabetic()) {
        ident.push('_');
    }
    ident.push_str(&RE_NON_IDENT.replace_all(&cleaned, "_"));
    ident
}

/// Byte offset of the first arrow outside a double-quoted string.
fn find_arrow(text: &str) -> Option<usize> {
    let mut in_quote = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            '-' if !in_quote && text[i..].starts_with(ARROW) => return Some(i),
            _ => {}
        }
    }
    None
}

/// Whitespace-separated words with their byte offsets.
fn words(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                out.push((s, &text[s..i]));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push((s, &text[s..]));
    }
    out
}

fn leading_ws(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
