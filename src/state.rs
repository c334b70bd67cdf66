//! @ai:module:intent Parser state: a primary phase plus an ordered design-recipe section
//! @ai:module:layer domain
//! @ai:module:public_api ParserState, Primary, Section
//! @ai:module:stateless true

use std::fmt;

/// @ai:intent Where the parser is relative to documentation blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primary {
    Init,
    Block,
    DesignRecipe,
    BodyOutline,
}

/// @ai:intent Design-recipe section, ranked in the order sections must appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    None = 0,
    Contract = 1,
    Purpose = 2,
    InOuts = 3,
    Example = 4,
}

impl Section {
    /// Header labels in detection order.
    pub const HEADERS: [(Section, &'static str); 4] = [
        (Section::Contract, "CONTRACT"),
        (Section::Purpose, "PURPOSE"),
        (Section::InOuts, "IN/OUTS"),
        (Section::Example, "EXAMPLE"),
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// @ai:intent Combined parser state; the section only matters inside a design recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserState {
    pub primary: Primary,
    pub section: Section,
}

impl ParserState {
    pub const INIT: ParserState = ParserState {
        primary: Primary::Init,
        section: Section::None,
    };

    pub fn new(primary: Primary, section: Section) -> Self {
        Self { primary, section }
    }

    pub fn in_recipe(&self, section: Section) -> bool {
        self.primary == Primary::DesignRecipe && self.section == section
    }

    /// @ai:intent Check whether a header for `section` may be entered without moving backward
    pub fn allows(&self, section: Section) -> bool {
        section.rank() >= self.section.rank()
    }
}

impl Default for ParserState {
    fn default() -> Self {
        Self::INIT
    }
}

impl fmt::Display for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}.{:?}", self.primary, self.section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_are_ranked_in_declared_order() {
        assert!(Section::None < Section::Contract);
        assert!(Section::Contract < Section::Purpose);
        assert!(Section::Purpose < Section::InOuts);
        assert!(Section::InOuts < Section::Example);
    }

    #[test]
    fn test_allows_only_forward_moves() {
        let state = ParserState::new(Primary::DesignRecipe, Section::InOuts);
        assert!(state.allows(Section::InOuts));
        assert!(state.allows(Section::Example));
        assert!(!state.allows(Section::Purpose));
        assert!(!state.allows(Section::Contract));
    }

    #[test]
    fn test_display() {
        assert_eq!(ParserState::INIT.to_string(), "Init.None");
    }
}
