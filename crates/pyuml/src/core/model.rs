//! Extracted class model
//!
//! Stores the classes found in one source unit, in source order.

use serde::Serialize;

/// A method defined directly in a class body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodInfo {
    pub name: String,
    /// Parameters as written, without the receiver
    pub parameters: Vec<String>,
}

impl MethodInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Display form used in diagrams: `name(a, b)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.parameters.join(", "))
    }
}

/// Structural summary of one class definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassInfo {
    pub name: String,
    /// Base classes, left to right as written
    pub bases: Vec<String>,
    pub attributes: Vec<String>,
    pub methods: Vec<MethodInfo>,
    /// 1-based line of the `class` keyword
    pub line: usize,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            attributes: Vec::new(),
            methods: Vec::new(),
            line: 0,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.add_base(base);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        self.add_attribute(name);
        self
    }

    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.add_method(method);
        self
    }

    /// Add a base class; repeated names collapse
    pub fn add_base(&mut self, base: impl Into<String>) {
        let base = base.into();
        if !self.bases.contains(&base) {
            self.bases.push(base);
        }
    }

    /// Add an attribute; repeated names collapse
    pub fn add_attribute(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.attributes.contains(&name) {
            self.attributes.push(name);
        }
    }

    /// Add a method; the first definition of a name wins
    pub fn add_method(&mut self, method: MethodInfo) {
        if !self.has_method(&method.name) {
            self.methods.push(method);
        }
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.name == name)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|m| m.name.as_str())
    }

    /// True when the class has neither attributes nor methods
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.methods.is_empty()
    }
}

/// One inheritance relationship between two classes of the same result
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Inheritance {
    pub child: String,
    pub parent: String,
}

/// Ordered classes extracted from one source unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    classes: Vec<ClassInfo>,
}

impl ParseResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a class, keeping names unique
    ///
    /// A class whose name is already present replaces the earlier entry's
    /// contents in place, so the first position is kept.
    pub fn insert(&mut self, class: ClassInfo) {
        match self.classes.iter_mut().find(|c| c.name == class.name) {
            Some(existing) => *existing = class,
            None => self.classes.push(class),
        }
    }

    pub fn classes(&self) -> &[ClassInfo] {
        &self.classes
    }

    pub fn get(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.classes.iter().position(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Inheritance edges whose parent is defined in this result
    ///
    /// Dangling bases and self references are skipped.
    pub fn inheritance(&self) -> impl Iterator<Item = Inheritance> + '_ {
        self.classes.iter().flat_map(move |class| {
            class
                .bases
                .iter()
                .filter(move |base| **base != class.name && self.get(base).is_some())
                .map(move |base| Inheritance {
                    child: class.name.clone(),
                    parent: base.clone(),
                })
        })
    }

    /// Base names that do not match any class of this result
    pub fn dangling_bases(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.classes.iter().flat_map(move |class| {
            class
                .bases
                .iter()
                .filter(move |base| self.get(base).is_none())
                .map(move |base| (class.name.as_str(), base.as_str()))
        })
    }
}

impl FromIterator<ClassInfo> for ParseResult {
    fn from_iter<I: IntoIterator<Item = ClassInfo>>(iter: I) -> Self {
        let mut result = ParseResult::new();
        for class in iter {
            result.insert(class);
        }
        result
    }
}

impl<'a> IntoIterator for &'a ParseResult {
    type Item = &'a ClassInfo;
    type IntoIter = std::slice::Iter<'a, ClassInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.classes.iter()
    }
}
