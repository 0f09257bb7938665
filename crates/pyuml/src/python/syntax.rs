//! Python syntax tree access
//!
//! Parses source with the tree-sitter Python grammar, rejects trees that
//! contain errors, and replays the interesting parts of a valid tree as
//! [`Visitor`] events.

use tracing::trace;
use tree_sitter::{Node, Parser, Tree};

use crate::core::{AssignmentTarget, ClassDef, FunctionDef, ParseError, Visitor};

/// Longest snippet of offending source quoted in an error message
const SNIPPET_LIMIT: usize = 24;

/// Parse Python source into a syntax tree
///
/// Tree-sitter recovers from syntax errors by inserting `ERROR` and
/// `MISSING` nodes. Any such node makes the whole parse fail, as do
/// Python 2 `print`/`exec` statements and indentation the grammar
/// tolerates but Python rejects. The error points at the first problem in
/// document order.
pub fn parse_tree(source: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ParseError::new(format!("cannot load Python grammar: {}", e), 1, 1))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::new("parser returned no syntax tree", 1, 1))?;

    if let Some(error) = first_error(tree.root_node(), source) {
        return Err(error);
    }

    Ok(tree)
}

/// Walk a parsed tree, reporting classes, functions and assignment targets
pub fn walk<V: Visitor>(tree: &Tree, source: &str, visitor: &mut V) {
    visit_children(tree.root_node(), source, visitor);
}

fn first_error(node: Node<'_>, source: &str) -> Option<ParseError> {
    if node.is_error() || node.is_missing() {
        return Some(describe_error(node, source));
    }
    let misplaced = legacy_statement(node, source).or_else(|| misplaced_clause(node, source));
    if misplaced.is_some() {
        return misplaced;
    }

    let mut suite = Suite::of(node, source);
    if suite.as_ref().is_some_and(|suite| suite.is_empty) {
        return Some(empty_block(node, source));
    }

    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(|child| {
        suite
            .as_mut()
            .filter(|_| is_statement(child))
            .and_then(|suite| suite.check(child, source))
            .or_else(|| first_error(child, source))
    })
}

/// Python 2 statements the grammar still accepts
fn legacy_statement(node: Node<'_>, source: &str) -> Option<ParseError> {
    let keyword = match node.kind() {
        "print_statement" => "print",
        "exec_statement" => "exec",
        _ => return None,
    };
    Some(located(
        format!("Python 2 `{}` statement is not supported", keyword),
        node,
        source,
    ))
}

/// `elif`, `else`, `except` and `finally` must line up with their statement
fn misplaced_clause(node: Node<'_>, source: &str) -> Option<ParseError> {
    if !matches!(
        node.kind(),
        "elif_clause" | "else_clause" | "except_clause" | "except_group_clause" | "finally_clause"
    ) {
        return None;
    }
    let statement = node.parent()?;
    let aligned = node.start_position().column == statement.start_position().column;
    if starts_line(node, source) && !aligned {
        return Some(located(
            "unindent does not match any outer indentation level",
            node,
            source,
        ));
    }
    None
}

/// Indentation rules for the statements of a module or an indented block
struct Suite {
    /// Column every line-leading statement starts at, once known
    column: Option<usize>,
    /// Statements of a block start right of its header
    header_column: Option<usize>,
    /// The body began on the header's own line
    inline: bool,
    is_empty: bool,
}

impl Suite {
    fn of(node: Node<'_>, source: &str) -> Option<Suite> {
        match node.kind() {
            "module" => Some(Suite {
                column: Some(0),
                header_column: None,
                inline: false,
                is_empty: false,
            }),
            "block" => {
                let mut cursor = node.walk();
                let first = node.children(&mut cursor).find(|child| is_statement(*child));
                Some(Suite {
                    column: None,
                    header_column: node.parent().map(|header| header.start_position().column),
                    inline: first.is_some_and(|statement| !starts_line(statement, source)),
                    is_empty: first.is_none(),
                })
            }
            _ => None,
        }
    }

    fn check(&mut self, statement: Node<'_>, source: &str) -> Option<ParseError> {
        if !starts_line(statement, source) {
            return None;
        }
        if self.inline {
            return Some(located("unexpected indent", statement, source));
        }

        let column = statement.start_position().column;
        match self.column {
            Some(expected) if column == expected => None,
            Some(expected) if column > expected => {
                Some(located("unexpected indent", statement, source))
            }
            Some(_) => Some(located(
                "unindent does not match any outer indentation level",
                statement,
                source,
            )),
            None if self.header_column.is_some_and(|header| column <= header) => {
                Some(located("expected an indented block", statement, source))
            }
            None => {
                self.column = Some(column);
                None
            }
        }
    }
}

fn is_statement(node: Node<'_>) -> bool {
    node.is_named() && !node.is_error() && node.kind() != "comment"
}

/// Only whitespace precedes the node on its line
fn starts_line(node: Node<'_>, source: &str) -> bool {
    let start = node.start_byte().min(source.len());
    let line_start = source[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    source
        .get(line_start..start)
        .is_some_and(|prefix| prefix.chars().all(char::is_whitespace))
}

/// A header with no statements under it; points at whatever follows
fn empty_block(block: Node<'_>, source: &str) -> ParseError {
    let header = block.parent().unwrap_or(block);
    match header.next_named_sibling() {
        Some(next) => located("expected an indented block", next, source),
        None => ParseError::new(
            "expected an indented block",
            header.end_position().row + 2,
            1,
        ),
    }
}

fn located(message: impl Into<String>, node: Node<'_>, source: &str) -> ParseError {
    ParseError::new(
        message,
        node.start_position().row + 1,
        char_column(source, node.start_byte()) + 1,
    )
}

fn describe_error(node: Node<'_>, source: &str) -> ParseError {
    let position = node.start_position();
    let line = position.row + 1;
    let column = char_column(source, node.start_byte()) + 1;

    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let snippet: String = text(node, source)
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .chars()
            .take(SNIPPET_LIMIT)
            .collect();
        if snippet.is_empty() {
            "invalid syntax".to_string()
        } else {
            format!("invalid syntax near `{}`", snippet)
        }
    };

    ParseError::new(message, line, column)
}

/// Zero-based column of a byte offset, counted in characters
fn char_column(source: &str, byte: usize) -> usize {
    let byte = byte.min(source.len());
    let line_start = source[..byte].rfind('\n').map(|i| i + 1).unwrap_or(0);
    source
        .get(line_start..byte)
        .map(|prefix| prefix.chars().count())
        .unwrap_or(0)
}

fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}

fn visit_children<V: Visitor>(node: Node<'_>, source: &str, visitor: &mut V) {
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
    for child in children {
        visit(child, source, visitor);
    }
}

fn visit<V: Visitor>(node: Node<'_>, source: &str, visitor: &mut V) {
    match node.kind() {
        "class_definition" => visit_class(node, source, visitor),
        "function_definition" => visit_function(node, source, Vec::new(), visitor),
        "decorated_definition" => visit_decorated(node, source, visitor),
        "assignment" => visit_assignment(node, source, visitor),
        "augmented_assignment" => {
            if let Some(left) = node.child_by_field_name("left") {
                report_targets(left, source, visitor);
            }
        }
        _ => visit_children(node, source, visitor),
    }
}

fn visit_class<V: Visitor>(node: Node<'_>, source: &str, visitor: &mut V) {
    let Some(name) = node.child_by_field_name("name") else {
        return;
    };

    let bases = node
        .child_by_field_name("superclasses")
        .map(|args| base_expressions(args, source))
        .unwrap_or_default();

    let class = ClassDef {
        name: text(name, source).to_string(),
        bases,
        line: node.start_position().row + 1,
    };
    trace!(class = %class.name, line = class.line, "class definition");

    visitor.enter_class(&class);
    if let Some(body) = node.child_by_field_name("body") {
        visit_children(body, source, visitor);
    }
    visitor.exit_class(&class);
}

/// Positional superclass expressions; keyword arguments and splats are skipped
fn base_expressions(args: Node<'_>, source: &str) -> Vec<String> {
    let mut cursor = args.walk();
    let bases: Vec<String> = args
        .named_children(&mut cursor)
        .filter(|arg| {
            !matches!(
                arg.kind(),
                "keyword_argument" | "list_splat" | "dictionary_splat" | "comment"
            )
        })
        .map(|arg| text(arg, source).to_string())
        .collect();
    bases
}

fn visit_function<V: Visitor>(
    node: Node<'_>,
    source: &str,
    decorators: Vec<String>,
    visitor: &mut V,
) {
    let Some(name) = node.child_by_field_name("name") else {
        return;
    };

    let parameters = node
        .child_by_field_name("parameters")
        .map(|params| parameter_names(params, source))
        .unwrap_or_default();

    let function = FunctionDef {
        name: text(name, source).to_string(),
        parameters,
        decorators,
        line: node.start_position().row + 1,
    };

    visitor.enter_function(&function);
    if let Some(body) = node.child_by_field_name("body") {
        visit_children(body, source, visitor);
    }
    visitor.exit_function(&function);
}

fn parameter_names(params: Node<'_>, source: &str) -> Vec<String> {
    let mut cursor = params.walk();
    let names: Vec<String> = params
        .named_children(&mut cursor)
        .filter(|param| {
            !matches!(
                param.kind(),
                "keyword_separator" | "positional_separator" | "comment"
            )
        })
        .map(|param| match param.child_by_field_name("name") {
            Some(name) => text(name, source).to_string(),
            // `x: int`, `*args`, `**kwargs: Any`: keep what precedes the annotation
            None => text(param, source)
                .split([':', '='])
                .next()
                .unwrap_or("")
                .trim()
                .to_string(),
        })
        .filter(|name| !name.is_empty())
        .collect();
    names
}

fn visit_decorated<V: Visitor>(node: Node<'_>, source: &str, visitor: &mut V) {
    let mut cursor = node.walk();
    let decorators: Vec<String> = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "decorator")
        .map(|decorator| {
            text(decorator, source)
                .trim_start_matches('@')
                .trim()
                .to_string()
        })
        .collect();

    let Some(definition) = node.child_by_field_name("definition") else {
        return;
    };

    match definition.kind() {
        "function_definition" => visit_function(definition, source, decorators, visitor),
        _ => visit(definition, source, visitor),
    }
}

fn visit_assignment<V: Visitor>(node: Node<'_>, source: &str, visitor: &mut V) {
    if let Some(left) = node.child_by_field_name("left") {
        report_targets(left, source, visitor);
    }

    // `a = b = 1` nests the second assignment on the right-hand side
    if let Some(right) = node.child_by_field_name("right") {
        if right.kind() == "assignment" {
            visit_assignment(right, source, visitor);
        }
    }
}

fn report_targets<V: Visitor>(target: Node<'_>, source: &str, visitor: &mut V) {
    match target.kind() {
        "identifier" | "keyword_identifier" => {
            visitor.visit_assignment_target(&AssignmentTarget::Name(
                text(target, source).to_string(),
            ));
        }
        "attribute" => {
            let object = target.child_by_field_name("object");
            let attribute = target.child_by_field_name("attribute");
            if let (Some(object), Some(attribute)) = (object, attribute) {
                if object.kind() == "identifier" {
                    visitor.visit_assignment_target(&AssignmentTarget::Attribute {
                        object: text(object, source).to_string(),
                        attribute: text(attribute, source).to_string(),
                    });
                }
            }
        }
        "pattern_list" | "tuple_pattern" | "list_pattern" | "expression_list" | "tuple"
        | "list" | "parenthesized_expression" | "list_splat_pattern" | "list_splat" => {
            let mut cursor = target.walk();
            let parts: Vec<Node<'_>> = target.named_children(&mut cursor).collect();
            for part in parts {
                report_targets(part, source, visitor);
            }
        }
        _ => {}
    }
}
