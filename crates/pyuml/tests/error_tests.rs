//! Tests for core error types

use pyuml::core::{DiagramError, ParseError, RenderError};
use pyuml::extract;

#[test]
fn test_parse_error_display() {
    let error = ParseError::new("invalid syntax near `(`", 5, 10);
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Parse error"));
    assert!(error_msg.contains("invalid syntax"));
    assert!(error_msg.contains("line 5"));
    assert!(error_msg.contains("column 10"));
}

#[test]
fn test_empty_diagram_display() {
    let error = RenderError::EmptyDiagram;
    assert_eq!(error.to_string(), "No classes found");
    assert!(error.is_empty_diagram());
}

#[test]
fn test_encode_error_display() {
    let error = RenderError::encode_error("image too large");
    assert!(error.to_string().contains("Render error"));
    assert!(error.to_string().contains("image too large"));
    assert!(!error.is_empty_diagram());
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let error: RenderError = io.into();
    assert!(matches!(error, RenderError::Io { .. }));
    assert!(error.to_string().contains("read-only"));
}

#[test]
fn test_diagram_error_is_transparent() {
    let parse: DiagramError = ParseError::new("missing `)`", 2, 7).into();
    assert_eq!(
        parse.to_string(),
        "Parse error: missing `)` at line 2, column 7"
    );

    let render: DiagramError = RenderError::EmptyDiagram.into();
    assert_eq!(render.to_string(), "No classes found");
}

#[test]
fn test_unbalanced_parentheses() {
    let err = extract("class A:\n    def f(self, (x:\n        pass\n").unwrap_err();
    assert!(err.line >= 1 && err.line <= 3);
    assert!(err.column >= 1);
}

#[test]
fn test_error_reports_first_problem() {
    let source = "class Good:\n    pass\n\nclass Bad(:\n    pass\n\nclass Worse)\n";
    let err = extract(source).unwrap_err();
    // `class Worse)` on line 7 is never the one reported
    assert!(err.line <= 4, "reported line {}", err.line);
}

#[test]
fn test_no_partial_result_on_error() {
    // The first class is valid, but the run as a whole must fail
    let result = extract("class Fine:\n    pass\n\nclass Broken(\n");
    assert!(result.is_err());
}

#[test]
fn test_class_body_without_indent() {
    let err = extract("class A:\npass\n").unwrap_err();
    assert_eq!(err.line, 2);
    assert!(err.message.contains("indented block"), "{}", err.message);
}

#[test]
fn test_function_body_without_indent() {
    let err = extract("def f():\nreturn 1\n").unwrap_err();
    assert_eq!(err.line, 2);
    assert!(err.message.contains("indented block"), "{}", err.message);
}

#[test]
fn test_unexpected_indent_at_module_level() {
    let err = extract("  x = 1\n").unwrap_err();
    assert_eq!((err.line, err.column), (1, 3));
    assert!(err.message.contains("unexpected indent"));
}

#[test]
fn test_python2_print_statement() {
    let err = extract("print 'hello'\n").unwrap_err();
    assert_eq!(err.line, 1);
    assert!(err.message.contains("print"));
}

#[test]
fn test_inconsistent_dedent_loses_nothing() {
    // `y` would otherwise vanish from the class
    let err = extract("class A:\n    x = 1\n  y = 2\n").unwrap_err();
    assert_eq!(err.line, 3);
}
