//! @ai:module:intent Split the argument or return text of an EXAMPLE line into fixed-arity tokens
//! @ai:module:layer domain
//! @ai:module:public_api tokenize, Token, Tokenized, TokenIssue
//! @ai:module:stateless true
//!
//! Tokens are separated by whitespace at the top level. Brackets nest, and
//! whitespace inside them becomes a `,` so `[1 2 3]` reads as `[1,2,3]`.
//! A double quote that starts a token opens a string literal in which
//! whitespace is kept as-is. Unbalanced brackets and quotes are repaired and
//! reported rather than rejected.

/// @ai:intent A recoverable problem found while tokenizing, positioned within the input span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIssue {
    pub column: usize,
    pub message: String,
}

/// @ai:intent One top-level token and the column where it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub column: usize,
    pub text: String,
}

/// @ai:intent Tokens laid out in their expected slots, plus every repair made on the way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    /// Exactly `arity` entries; `None` marks a slot with no token.
    pub slots: Vec<Option<Token>>,
    pub issues: Vec<TokenIssue>,
}

/// @ai:intent Split `text` into `arity` top-level tokens
/// @ai:post result.slots.len() == arity
/// @ai:example ("1.0 [2 3]", 2) -> slots ["1.0", "[2,3]"]
/// @ai:example ("[1 2", 1) -> slots ["[1,2]"], one issue
/// @ai:effects pure
pub fn tokenize(text: &str, arity: usize) -> Tokenized {
    let mut scan = Scanner::default();
    for (column, c) in text.chars().enumerate() {
        if !scan.feed(column, c) {
            break;
        }
    }
    let end = text.chars().count();
    let (tokens, mut issues) = scan.finish(end);

    let mut slots = Vec::with_capacity(arity);
    for (index, (column, text)) in tokens.into_iter().enumerate() {
        if index < arity {
            slots.push(Some(Token { column, text }));
        } else {
            issues.push(TokenIssue {
                column,
                message: format!("Too many values - ignoring {}", text),
            });
        }
    }
    slots.resize(arity, None);

    Tokenized { slots, issues }
}

#[derive(Default)]
struct Scanner {
    /// Completed tokens with the column where each started.
    tokens: Vec<(usize, String)>,
    current: String,
    start: usize,
    brackets: Vec<(usize, char)>,
    /// Set inside a top-level `"..."` literal.
    in_string: bool,
    /// Quote character of a string nested inside brackets.
    nested_quote: Option<char>,
    pending_separator: bool,
    prev: Option<char>,
    issues: Vec<TokenIssue>,
}

impl Scanner {
    /// Consumes one character; returns false once a comment starts.
    fn feed(&mut self, column: usize, c: char) -> bool {
        let prev = self.prev.replace(c);

        if self.in_string {
            self.current.push(c);
            if c == '"' {
                self.in_string = false;
            }
            return true;
        }

        if let Some(quote) = self.nested_quote {
            self.current.push(c);
            if c == quote && prev != Some('\\') {
                self.nested_quote = None;
            }
            return true;
        }

        if c.is_whitespace() {
            if self.brackets.is_empty() {
                self.end_token();
            } else {
                self.pending_separator = true;
            }
            return true;
        }

        if c == '#' {
            return false;
        }

        if self.current.is_empty() {
            self.start = column;
        }

        if self.brackets.is_empty() {
            if c == '"' && prev.map_or(true, char::is_whitespace) {
                self.current.push(c);
                self.in_string = true;
                return true;
            }
        } else {
            self.flush_separator(c);
        }

        match c {
            '[' | '(' | '{' => {
                self.brackets.push((column, c));
                self.current.push(c);
            }
            ']' | ')' | '}' => self.close(column, c),
            '"' | '\'' if !self.brackets.is_empty() => {
                self.nested_quote = Some(c);
                self.current.push(c);
            }
            _ => self.current.push(c),
        }
        true
    }

    fn flush_separator(&mut self, next: char) {
        if !self.pending_separator {
            return;
        }
        self.pending_separator = false;
        let after_open = matches!(self.current.chars().last(), Some('[' | '(' | '{' | ',' | ':'));
        let before_close = matches!(next, ']' | ')' | '}' | ',' | ':');
        if !after_open && !before_close {
            self.current.push(',');
        }
    }

    fn close(&mut self, column: usize, c: char) {
        match self.brackets.pop() {
            Some((_, open)) if closer(open) == c => self.current.push(c),
            Some((_, open)) => {
                self.issues.push(TokenIssue {
                    column,
                    message: format!("Mismatched '{}' - expected '{}'", c, closer(open)),
                });
                self.current.push(closer(open));
            }
            None => {
                self.issues.push(TokenIssue {
                    column,
                    message: format!("Unmatched '{}' has no opening bracket", c),
                });
            }
        }
        if self.brackets.is_empty() {
            self.pending_separator = false;
        }
    }

    fn end_token(&mut self) {
        if !self.current.is_empty() {
            let token = std::mem::take(&mut self.current);
            self.tokens.push((self.start, token));
        }
    }

    fn finish(mut self, end: usize) -> (Vec<(usize, String)>, Vec<TokenIssue>) {
        if self.in_string {
            self.issues.push(TokenIssue {
                column: end,
                message: "Unterminated string - closing quote added".to_string(),
            });
            self.current.push('"');
        }
        if let Some(quote) = self.nested_quote.take() {
            self.issues.push(TokenIssue {
                column: end,
                message: "Unterminated string - closing quote added".to_string(),
            });
            self.current.push(quote);
        }
        while let Some((column, open)) = self.brackets.pop() {
            self.issues.push(TokenIssue {
                column,
                message: format!("Unclosed '{}' - '{}' added", open, closer(open)),
            });
            self.current.push(closer(open));
        }
        self.end_token();
        (self.tokens, self.issues)
    }
}

fn closer(open: char) -> char {
    match open {
        '[' => ']',
        '(' => ')',
        _ => '}',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(result: &Tokenized) -> Vec<Option<String>> {
        result
            .slots
            .iter()
            .map(|slot| slot.as_ref().map(|t| t.text.clone()))
            .collect()
    }

    fn slots(text: &str, arity: usize) -> Vec<Option<String>> {
        texts(&tokenize(text, arity))
    }

    fn some(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_whitespace_separates_top_level_tokens() {
        assert_eq!(slots("54.43104 5.3  7.37", 3), some(&["54.43104", "5.3", "7.37"]));
    }

    #[test]
    fn test_whitespace_inside_brackets_becomes_separator() {
        assert_eq!(slots("[1 2 3] x", 2), some(&["[1,2,3]", "x"]));
        assert_eq!(slots("[1, 2] {1: 2}", 2), some(&["[1,2]", "{1:2}"]));
        assert_eq!(slots("[ [1 2] (3 4) ]", 1), some(&["[[1,2],(3,4)]"]));
    }

    #[test]
    fn test_quoted_string_keeps_whitespace() {
        let result = tokenize("\"You're going to get an F!\"", 1);
        assert_eq!(texts(&result), some(&["\"You're going to get an F!\""]));
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_quoted_string_inside_brackets_keeps_whitespace() {
        assert_eq!(slots("['a b' \"c d\"]", 1), some(&["['a b',\"c d\"]"]));
    }

    #[test]
    fn test_unclosed_bracket_is_repaired() {
        let result = tokenize("[1 2", 1);
        assert_eq!(texts(&result), some(&["[1,2]"]));
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].column, 0);
    }

    #[test]
    fn test_unterminated_string_is_repaired() {
        let result = tokenize("\"abc def", 1);
        assert_eq!(texts(&result), some(&["\"abc def\""]));
        assert_eq!(result.issues.len(), 1);
    }

    #[test]
    fn test_mismatched_and_stray_closers() {
        let result = tokenize("[1 2) 3]", 2);
        assert_eq!(texts(&result), some(&["[1,2]", "3"]));
        assert_eq!(result.issues.len(), 2);
    }

    #[test]
    fn test_missing_and_excess_tokens() {
        let result = tokenize("1", 3);
        assert_eq!(texts(&result), vec![Some("1".to_string()), None, None]);
        assert_eq!(result.slots[0].as_ref().map(|t| t.column), Some(0));
        assert!(result.issues.is_empty());

        let result = tokenize("1 2 3", 1);
        assert_eq!(texts(&result), some(&["1"]));
        assert_eq!(result.issues.len(), 2);
        assert_eq!(result.issues[0].column, 2);
    }

    #[test]
    fn test_comment_ends_input() {
        assert_eq!(slots("1 # 2", 2), vec![Some("1".to_string()), None]);
    }

    #[test]
    fn test_empty_input_with_zero_arity() {
        assert_eq!(tokenize("", 0), Tokenized::default());
    }
}
