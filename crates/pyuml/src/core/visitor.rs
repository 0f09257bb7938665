//! Parser-neutral syntax visitor
//!
//! A syntax walker reports the three constructs the extractor cares about
//! (class definitions, function definitions and assignment targets) through
//! this interface, so extraction logic never touches a parser library's
//! node taxonomy.

/// A class definition header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    /// Positional base expressions in source form
    pub bases: Vec<String>,
    /// 1-based line of the `class` keyword
    pub line: usize,
}

/// A function definition header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    /// Parameters as written, including any receiver
    pub parameters: Vec<String>,
    /// Decorator expressions without the leading `@`
    pub decorators: Vec<String>,
    pub line: usize,
}

impl FunctionDef {
    pub fn has_decorator(&self, name: &str) -> bool {
        self.decorators.iter().any(|d| d == name)
    }
}

/// The left-hand side of an assignment, reduced to a single name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentTarget {
    /// `name = ...`
    Name(String),
    /// `object.attribute = ...` where `object` is a plain identifier
    Attribute { object: String, attribute: String },
}

/// Receiver of syntax events, in source order
///
/// Every `enter_*` call is matched by the corresponding `exit_*` call once
/// the body has been walked.
pub trait Visitor {
    fn enter_class(&mut self, class: &ClassDef);

    fn exit_class(&mut self, class: &ClassDef);

    fn enter_function(&mut self, function: &FunctionDef);

    fn exit_function(&mut self, function: &FunctionDef);

    fn visit_assignment_target(&mut self, target: &AssignmentTarget);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_decorator() {
        let function = FunctionDef {
            name: "create".to_string(),
            parameters: vec!["cls".to_string()],
            decorators: vec!["classmethod".to_string()],
            line: 3,
        };
        assert!(function.has_decorator("classmethod"));
        assert!(!function.has_decorator("staticmethod"));
    }
}
