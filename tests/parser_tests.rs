// Integration tests for the Jutsu front end

use jutsu::parser::lexer::{tokenize, LexError, TokenKind};
use jutsu::parser::{parse_source, Node, NodeKind, ParseError, Parser, SyntaxError};

fn parse(source: &str) -> Node {
    parse_source(source).expect("Parsing failed")
}

#[test]
fn test_literal_payloads_reproduce_source() {
    let tokens = tokenize("count = 1234 + \"two words\"").expect("Lexing failed");

    assert_eq!(tokens[0].kind, TokenKind::Name);
    assert_eq!(tokens[0].lexeme(), Some("count"));
    assert_eq!(tokens[2].kind, TokenKind::Int);
    assert_eq!(tokens[2].lexeme(), Some("1234"));
    assert_eq!(tokens[4].kind, TokenKind::Str);
    assert_eq!(tokens[4].lexeme(), Some("two words"));
}

#[test]
fn test_double_star_equals_is_one_token() {
    let tokens = tokenize("**=").expect("Lexing failed");

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::StarStarEq);
    assert_eq!(tokens[0].kind.name(), "DSTAREQ");
    assert_eq!(tokens[1].kind, TokenKind::Eof);
}

#[test]
fn test_only_outer_newline_is_significant() {
    let tokens = tokenize("(\n1\n)\n").expect("Lexing failed");

    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::LParen,
            TokenKind::Int,
            TokenKind::RParen,
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_unterminated_string_fails() {
    let err = parse_source("print \"never closed\n").unwrap_err();

    assert!(matches!(
        err,
        SyntaxError::Lex(LexError::UnterminatedString { .. })
    ));
    assert_eq!(err.line(), 1);
}

#[test]
fn test_unreadable_character_fails() {
    let err = parse_source("x = 1\nx = x @ 2\n").unwrap_err();

    match err {
        SyntaxError::Lex(LexError::UnreadableCharacter { ch, location }) => {
            assert_eq!(ch, '@');
            assert_eq!(location.line, 2);
        }
        other => panic!("Expected unreadable character, got {:?}", other),
    }
}

#[test]
fn test_left_associative_subtraction_dump() {
    let program = parse("1 - 2 - 3\n");

    let expected = "\
{Program}
  {Expr}
    {BinaryOp, -}
      {BinaryOp, -}
        {IntegerConst, 1}
        {IntegerConst, 2}
      {IntegerConst, 3}";
    assert_eq!(program.to_string(), expected);
}

#[test]
fn test_right_associative_power_dump() {
    let program = parse("2 ** 3 ** 2\n");

    let expected = "\
{Program}
  {Expr}
    {BinaryOp, **}
      {IntegerConst, 2}
      {BinaryOp, **}
        {IntegerConst, 3}
        {IntegerConst, 2}";
    assert_eq!(program.to_string(), expected);
}

#[test]
fn test_precedence() {
    let program = parse("1 + 2 * 3\n");

    assert_eq!(
        program.children[0],
        Node::expr(Node::binary(
            "+",
            Node::integer("1"),
            Node::binary("*", Node::integer("2"), Node::integer("3")),
        ))
    );
}

#[test]
fn test_augmented_assignment_dump() {
    let program = parse("x += 1\n");

    let expected = "\
{Program}
  {AssignStmt}
    {Variable, x}
    {BinaryOp, +}
      {Variable, x}
      {IntegerConst, 1}";
    assert_eq!(program.to_string(), expected);
}

#[test]
fn test_trailing_comma_in_definition() {
    let err = parse_source("jutsu f(a, b,) { }").unwrap_err();

    assert!(matches!(
        err,
        SyntaxError::Parse(ParseError::InvalidArgumentList { .. })
    ));
}

#[test]
fn test_if_print_end_to_end() {
    let program = parse("if x {\nprint x\n}\n");

    let expected = Node::program(vec![Node::new(NodeKind::IfStmt)
        .with_child(Node::expr(Node::variable("x")))
        .with_child(Node::body(vec![Node::call(
            "print",
            vec![Node::expr(Node::variable("x"))],
        )]))]);
    assert_eq!(program, expected);

    let dump = "\
{Program}
  {IfStmt}
    {Expr}
      {Variable, x}
    {Body}
      {CallStmt, print}
        {Argument}
          {Expr}
            {Variable, x}";
    assert_eq!(program.dump(), dump);
}

#[test]
fn test_full_program() {
    let source = r#"
# compute a power the slow way
jutsu power(base, exp) {
    result = 1
    if exp > 0 {
        result *= base
        result = result * power(base, exp - 1) // base
    }
    release result
}

answer = power(
    2,
    10
)
if answer == 1024 and !False {
    print "ok"
}
"#;

    let program = parse(source);

    let kinds: Vec<_> = program.children.iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![NodeKind::VarDecl, NodeKind::AssignStmt, NodeKind::IfStmt]
    );

    let decl = &program.children[0];
    assert_eq!(decl.value(), Some("power"));
    assert_eq!(decl.children.len(), 3);
    let body = &decl.children[2];
    let body_kinds: Vec<_> = body.children.iter().map(|n| n.kind).collect();
    assert_eq!(
        body_kinds,
        vec![NodeKind::AssignStmt, NodeKind::IfStmt, NodeKind::ReturnStmt]
    );

    let calls: Vec<_> = program
        .iter()
        .filter(|n| n.is(NodeKind::CallStmt))
        .filter_map(Node::value)
        .collect();
    assert_eq!(calls, vec!["power", "power", "print"]);
}

#[test]
fn test_pre_order_visits_parents_first() {
    let program = parse("x = a + b\n");

    let kinds: Vec<_> = program.iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Program,
            NodeKind::AssignStmt,
            NodeKind::Variable,
            NodeKind::Expr,
            NodeKind::BinaryOp,
            NodeKind::Variable,
            NodeKind::Variable,
        ]
    );
}

#[test]
fn test_parser_from_tokens() {
    let tokens = tokenize("release 0").expect("Lexing failed");
    let program = Parser::new(tokens).parse().expect("Parsing failed");

    assert_eq!(
        program.children,
        vec![Node::new(NodeKind::ReturnStmt).with_child(Node::expr(Node::integer("0")))]
    );
}

#[test]
fn test_parse_is_repeatable() {
    let source = "y = (1 + 2) * -3\n";

    assert_eq!(parse(source), parse(source));
}

#[test]
fn test_elif_has_no_production() {
    let err = parse_source("if a { }\nelif b { }\n").unwrap_err();

    assert!(matches!(
        err,
        SyntaxError::Parse(ParseError::NoMatchingAlternative { .. })
    ));
    assert_eq!(err.line(), 2);
}
