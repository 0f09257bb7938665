//! Python code model extractor
//!
//! Builds a [`ParseResult`] from the visitor events of the syntax walker.

use tracing::{debug, info, span, trace, Level};

use super::syntax;
use crate::core::{
    AssignmentTarget, ClassDef, ClassInfo, Extractor, FunctionDef, MethodInfo, ParseError,
    ParseResult, Visitor,
};

/// Receiver names dropped from method parameter lists
const RECEIVERS: [&str; 2] = ["self", "cls"];

/// Extracts classes, attributes, methods and bases from Python source
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonExtractor;

impl PythonExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for PythonExtractor {
    fn extract(&self, source: &str) -> Result<ParseResult, ParseError> {
        let extract_span = span!(Level::INFO, "extract_classes", source_len = source.len());
        let _enter = extract_span.enter();

        let tree = syntax::parse_tree(source).map_err(|err| {
            debug!(line = err.line, column = err.column, message = %err.message, "Syntax error");
            err
        })?;

        let mut collector = ClassCollector::default();
        syntax::walk(&tree, source, &mut collector);
        let result = collector.finish();

        info!(classes = result.len(), "Extraction completed");
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "python"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

/// Lexical scope the walker is currently in
#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Class body; the index points into `ClassCollector::classes`
    Class(usize),
    Function,
}

/// Visitor that accumulates classes in source pre-order
#[derive(Debug, Default)]
struct ClassCollector {
    classes: Vec<ClassInfo>,
    frames: Vec<Frame>,
}

impl ClassCollector {
    fn finish(self) -> ParseResult {
        // Later duplicates overwrite earlier ones in place
        self.classes.into_iter().collect()
    }

    /// Class whose body directly contains the current statement
    fn class_body(&self) -> Option<usize> {
        match self.frames.last() {
            Some(Frame::Class(index)) => Some(*index),
            _ => None,
        }
    }

    /// Class owning the method the current statement is in
    ///
    /// Walks outwards through function frames; the first class frame found
    /// must sit below at least one function frame.
    fn method_owner(&self) -> Option<usize> {
        let mut inside_function = false;
        for frame in self.frames.iter().rev() {
            match frame {
                Frame::Function => inside_function = true,
                Frame::Class(index) => return inside_function.then_some(*index),
            }
        }
        None
    }
}

impl Visitor for ClassCollector {
    fn enter_class(&mut self, class: &ClassDef) {
        let mut info = ClassInfo::new(&class.name).with_line(class.line);
        for base in &class.bases {
            info.add_base(base);
        }

        self.frames.push(Frame::Class(self.classes.len()));
        self.classes.push(info);
    }

    fn exit_class(&mut self, _class: &ClassDef) {
        self.frames.pop();
    }

    fn enter_function(&mut self, function: &FunctionDef) {
        if let Some(index) = self.class_body() {
            let mut parameters = function.parameters.as_slice();
            let is_static = function.has_decorator("staticmethod");
            if let Some((first, rest)) = parameters.split_first() {
                if !is_static && RECEIVERS.contains(&first.as_str()) {
                    parameters = rest;
                }
            }

            let class = &mut self.classes[index];
            trace!(class = %class.name, method = %function.name, "method");
            class.add_method(MethodInfo::new(&function.name).with_parameters(parameters));
        }

        self.frames.push(Frame::Function);
    }

    fn exit_function(&mut self, _function: &FunctionDef) {
        self.frames.pop();
    }

    fn visit_assignment_target(&mut self, target: &AssignmentTarget) {
        let owner = match target {
            AssignmentTarget::Name(name) => self.class_body().map(|index| (index, name)),
            AssignmentTarget::Attribute { object, attribute } if object == "self" => {
                self.method_owner().map(|index| (index, attribute))
            }
            AssignmentTarget::Attribute { .. } => None,
        };

        if let Some((index, name)) = owner {
            let class = &mut self.classes[index];
            trace!(class = %class.name, attribute = %name, "attribute");
            class.add_attribute(name.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> ParseResult {
        PythonExtractor::new().extract(source).unwrap()
    }

    #[test]
    fn test_end_to_end_animal_dog() {
        let result = extract(
            "class Animal:\n    def __init__(self, name):\n        self.name = name\nclass Dog(Animal):\n    def bark(self):\n        pass\n",
        );

        assert_eq!(result.len(), 2);
        let animal = &result.classes()[0];
        assert_eq!(animal.name, "Animal");
        assert!(animal.bases.is_empty());
        assert_eq!(animal.attributes, vec!["name"]);
        assert_eq!(animal.method_names().collect::<Vec<_>>(), vec!["__init__"]);
        assert_eq!(animal.methods[0].parameters, vec!["name"]);

        let dog = &result.classes()[1];
        assert_eq!(dog.bases, vec!["Animal"]);
        assert!(dog.attributes.is_empty());
        assert_eq!(dog.method_names().collect::<Vec<_>>(), vec!["bark"]);
        assert_eq!(result.inheritance().count(), 1);
    }

    #[test]
    fn test_empty_class_is_emitted() {
        let result = extract("class Empty:\n    pass\n");
        assert_eq!(result.len(), 1);
        assert!(result.classes()[0].is_empty());
    }

    #[test]
    fn test_chained_self_assignment() {
        let result = extract("class A:\n    def __init__(self):\n        self.a = self.b = 1\n");
        assert_eq!(result.classes()[0].attributes, vec!["a", "b"]);
    }

    #[test]
    fn test_conditional_attributes_count() {
        let source = "class A:\n    if DEBUG:\n        level = 1\n    def f(self, flag):\n        if flag:\n            self.x = 1\n        else:\n            for i in range(3):\n                self.y = i\n";
        let result = extract(source);
        assert_eq!(result.classes()[0].attributes, vec!["level", "x", "y"]);
    }

    #[test]
    fn test_attributes_from_any_method_collapse() {
        let source = "class A:\n    x = 0\n    def __init__(self):\n        self.x = 1\n        self.y = 2\n    def reset(self):\n        self.y = 0\n        self.z = 0\n";
        let result = extract(source);
        assert_eq!(result.classes()[0].attributes, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_class_attribute_shapes() {
        let source = "class A:\n    a: int\n    b: str = 'x'\n    c, d = 1, 2\n    e = f = 3\n    g += 1\n";
        let result = extract(source);
        assert_eq!(result.classes()[0].attributes, vec!["a", "b", "c", "d", "e", "f", "g"]);
    }

    #[test]
    fn test_locals_and_foreign_attributes_are_ignored() {
        let source = "class A:\n    def f(self, other):\n        local = 1\n        other.name = 2\n        self.items[0] = 3\n";
        let result = extract(source);
        assert!(result.classes()[0].attributes.is_empty());
    }

    #[test]
    fn test_self_assignment_in_nested_function() {
        let source = "class A:\n    def f(self):\n        def helper():\n            self.inner = 1\n        helper()\n";
        let result = extract(source);
        assert_eq!(result.classes()[0].attributes, vec!["inner"]);
        assert_eq!(result.classes()[0].method_names().collect::<Vec<_>>(), vec!["f"]);
    }

    #[test]
    fn test_nested_class_keeps_its_own_members() {
        let source = "class Outer:\n    class Meta:\n        ordering = 'name'\n    def f(self):\n        self.value = 1\n";
        let result = extract(source);
        let names: Vec<_> = result.classes().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Outer", "Meta"]);
        assert_eq!(result.get("Outer").unwrap().attributes, vec!["value"]);
        assert_eq!(result.get("Meta").unwrap().attributes, vec!["ordering"]);
    }

    #[test]
    fn test_bases_in_written_order() {
        let result = extract("class B:\n    pass\nclass A:\n    pass\nclass C(B, A, metaclass=M):\n    pass\n");
        assert_eq!(result.get("C").unwrap().bases, vec!["B", "A"]);
    }

    #[test]
    fn test_decorated_and_async_methods() {
        let source = "class A:\n    @property\n    def size(self):\n        return 1\n    @staticmethod\n    def build(self_like, n):\n        pass\n    @classmethod\n    def create(cls, n):\n        pass\n    async def fetch(self, url):\n        pass\n";
        let result = extract(source);
        let class = &result.classes()[0];
        let signatures: Vec<_> = class.methods.iter().map(|m| m.signature()).collect();
        assert_eq!(
            signatures,
            vec!["size()", "build(self_like, n)", "create(n)", "fetch(url)"]
        );
    }

    #[test]
    fn test_duplicate_class_replaces_in_place() {
        let source = "class A:\n    x = 1\nclass B:\n    pass\nclass A:\n    y = 2\n";
        let result = extract(source);
        assert_eq!(result.len(), 2);
        assert_eq!(result.position("A"), Some(0));
        assert_eq!(result.get("A").unwrap().attributes, vec!["y"]);
        assert_eq!(result.get("A").unwrap().line, 5);
    }

    #[test]
    fn test_no_classes_is_empty_result() {
        let result = extract("def main():\n    pass\n");
        assert!(result.is_empty());
    }

    #[test]
    fn test_malformed_source_fails() {
        let err = PythonExtractor::new()
            .extract("class A(:\n    pass\n")
            .unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.column >= 1);
        assert!(!err.message.is_empty());
    }
}
