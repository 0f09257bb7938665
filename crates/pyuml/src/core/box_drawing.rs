//! Shared box drawing characters for the terminal rendition
//!
//! This module provides consistent box drawing characters in both ASCII and
//! Unicode modes.

use super::CharacterSet;

/// Box drawing characters for class nodes
#[derive(Debug, Clone, Copy)]
pub struct BoxChars {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
    /// T-junction pointing right (for left edge separators)
    pub t_right: char,
    /// T-junction pointing left (for right edge separators)
    pub t_left: char,
}

impl BoxChars {
    /// Rectangle characters for the given style
    pub fn rectangle(style: CharacterSet) -> Self {
        match style {
            CharacterSet::Ascii => Self::ascii(),
            CharacterSet::Unicode => Self::unicode(),
        }
    }

    /// ASCII-only box characters
    pub fn ascii() -> Self {
        Self {
            top_left: '+',
            top_right: '+',
            bottom_left: '+',
            bottom_right: '+',
            horizontal: '-',
            vertical: '|',
            t_right: '+',
            t_left: '+',
        }
    }

    /// Unicode box-drawing characters
    pub fn unicode() -> Self {
        Self {
            top_left: '┌',
            top_right: '┐',
            bottom_left: '└',
            bottom_right: '┘',
            horizontal: '─',
            vertical: '│',
            t_right: '├',
            t_left: '┤',
        }
    }
}

impl Default for BoxChars {
    fn default() -> Self {
        Self::unicode()
    }
}

/// Sides of a cell an edge passes through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Links {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Links {
    /// Combine the sides of two link sets
    pub fn union(self, other: Links) -> Links {
        Links {
            up: self.up || other.up,
            down: self.down || other.down,
            left: self.left || other.left,
            right: self.right || other.right,
        }
    }
}

/// Line drawing characters for inheritance edges
///
/// Arrowheads are hollow triangles pointing at the base class.
#[derive(Debug, Clone, Copy)]
pub struct LineChars {
    pub horizontal: char,
    pub vertical: char,
    pub corner_down_right: char,
    pub corner_down_left: char,
    pub corner_up_right: char,
    pub corner_up_left: char,
    /// Vertical line with a branch to the right
    pub tee_right: char,
    pub tee_left: char,
    /// Horizontal line with a branch downwards
    pub tee_down: char,
    pub tee_up: char,
    pub junction: char,
    pub arrow_up: char,
    pub arrow_down: char,
    pub arrow_left: char,
    pub arrow_right: char,
}

impl LineChars {
    /// Get line characters for the given style
    pub fn new(style: CharacterSet) -> Self {
        match style {
            CharacterSet::Ascii => Self::ascii(),
            CharacterSet::Unicode => Self::unicode(),
        }
    }

    /// ASCII line characters
    pub fn ascii() -> Self {
        Self {
            horizontal: '-',
            vertical: '|',
            corner_down_right: '+',
            corner_down_left: '+',
            corner_up_right: '+',
            corner_up_left: '+',
            tee_right: '+',
            tee_left: '+',
            tee_down: '+',
            tee_up: '+',
            junction: '+',
            arrow_up: '^',
            arrow_down: 'v',
            arrow_left: '<',
            arrow_right: '>',
        }
    }

    /// Unicode line characters
    pub fn unicode() -> Self {
        Self {
            horizontal: '─',
            vertical: '│',
            corner_down_right: '┌',
            corner_down_left: '┐',
            corner_up_right: '└',
            corner_up_left: '┘',
            tee_right: '├',
            tee_left: '┤',
            tee_down: '┬',
            tee_up: '┴',
            junction: '┼',
            arrow_up: '△',
            arrow_down: '▽',
            arrow_left: '◁',
            arrow_right: '▷',
        }
    }

    /// Glyph joining the given sides of a cell
    pub fn glyph(&self, links: Links) -> char {
        let Links {
            up,
            down,
            left,
            right,
        } = links;
        match (up, down, left, right) {
            (true, true, true, true) => self.junction,
            (true, true, false, true) => self.tee_right,
            (true, true, true, false) => self.tee_left,
            (false, true, true, true) => self.tee_down,
            (true, false, true, true) => self.tee_up,
            (false, true, false, true) => self.corner_down_right,
            (false, true, true, false) => self.corner_down_left,
            (true, false, false, true) => self.corner_up_right,
            (true, false, true, false) => self.corner_up_left,
            (_, _, false, false) => self.vertical,
            _ => self.horizontal,
        }
    }

    /// True for arrowhead characters of this set
    pub fn is_arrow(&self, c: char) -> bool {
        c == self.arrow_up || c == self.arrow_down || c == self.arrow_left || c == self.arrow_right
    }
}

impl Default for LineChars {
    fn default() -> Self {
        Self::unicode()
    }
}
