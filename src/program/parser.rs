//! C# parsing using native tree-sitter
//!
//! Extracts type declarations, members, occurrence data, and comment trivia
//! into an owned [`FileModel`]. The concrete syntax tree is dropped after
//! extraction; edits re-parse the rewritten text.

use std::path::Path;

use tree_sitter::{Node, Parser};

use crate::core::{Result, SmelterError, Span};
use crate::program::model::*;

/// C# parser
pub struct CSharpParser {
    parser: Parser,
}

impl CSharpParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_c_sharp::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|e| SmelterError::Parse {
                path: Path::new("<language>").to_path_buf(),
                message: format!("failed to set language: {e}"),
            })?;
        Ok(Self { parser })
    }

    /// Parse one unit into its syntactic summary
    pub fn parse(&mut self, path: &Path, text: &str) -> Result<FileModel> {
        let tree = self
            .parser
            .parse(text, None)
            .ok_or_else(|| SmelterError::Parse {
                path: path.to_path_buf(),
                message: "parser produced no tree".to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            log::debug!("syntax errors in {}, extracting best effort", path.display());
        }

        let src = text.as_bytes();
        let mut model = FileModel::default();
        collect_declarations(root, src, None, &mut model);
        collect_occurrences(root, src, &mut model);
        Ok(model)
    }
}

/// Parse a unit with a throwaway parser instance
pub fn parse_unit(path: &Path, text: &str) -> Result<FileModel> {
    CSharpParser::new()?.parse(path, text)
}

fn node_span(node: Node) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn node_text<'a>(node: Node, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

fn field<'a>(node: Node<'a>, name: &str) -> Option<Node<'a>> {
    node.child_by_field_name(name)
}

fn child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let x = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    x
}

fn modifiers_of(node: Node, src: &[u8]) -> Vec<String> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() == "modifier")
        .map(|c| node_text(c, src).to_string())
        .collect()
}

/// Walk declarations, tracking the enclosing namespace
fn collect_declarations(node: Node, src: &[u8], namespace: Option<&str>, model: &mut FileModel) {
    let mut current_ns = namespace.map(str::to_string);
    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    drop(cursor);

    for child in children {
        match child.kind() {
            "using_directive" => {
                if let Some(name) = child_of_kind(child, "qualified_name")
                    .or_else(|| child_of_kind(child, "identifier"))
                {
                    model.usings.push(UsingDirective {
                        namespace: node_text(name, src).to_string(),
                        span: node_span(child),
                    });
                }
            }
            "file_scoped_namespace_declaration" => {
                if let Some(name) = field(child, "name") {
                    current_ns = Some(node_text(name, src).to_string());
                }
                // Some grammar versions nest the following declarations here
                collect_declarations(child, src, current_ns.as_deref(), model);
            }
            "namespace_declaration" => {
                let ns = field(child, "name")
                    .map(|n| node_text(n, src).to_string())
                    .map(|n| match &current_ns {
                        Some(outer) => format!("{outer}.{n}"),
                        None => n,
                    });
                let body = field(child, "body")
                    .or_else(|| child_of_kind(child, "declaration_list"))
                    .unwrap_or(child);
                collect_declarations(body, src, ns.as_deref(), model);
            }
            "class_declaration" | "interface_declaration" | "struct_declaration" => {
                if let Some(decl) = extract_type(child, src, current_ns.as_deref()) {
                    model.types.push(decl);
                }
            }
            "enum_declaration" => {
                if let Some(decl) = extract_enum(child, src, current_ns.as_deref()) {
                    model.types.push(decl);
                }
            }
            _ => {}
        }
    }
}

fn extract_type(node: Node, src: &[u8], namespace: Option<&str>) -> Option<TypeDecl> {
    let kind = match node.kind() {
        "class_declaration" => TypeKind::Class,
        "interface_declaration" => TypeKind::Interface,
        "struct_declaration" => TypeKind::Struct,
        _ => return None,
    };
    let name_node = field(node, "name")?;

    let generic_arity = field(node, "type_parameters")
        .map(|tp| {
            let mut cursor = tp.walk();
            tp.named_children(&mut cursor)
                .filter(|c| c.kind() == "type_parameter")
                .count()
        })
        .unwrap_or(0);

    let bases = child_of_kind(node, "base_list")
        .map(|list| {
            let mut cursor = list.walk();
            list.named_children(&mut cursor)
                .filter_map(|c| parse_type_ref(c, src))
                .collect()
        })
        .unwrap_or_default();

    let body = field(node, "body").or_else(|| child_of_kind(node, "declaration_list"));

    let mut decl = TypeDecl {
        kind,
        name: node_text(name_node, src).to_string(),
        generic_arity,
        namespace: namespace.map(str::to_string),
        modifiers: modifiers_of(node, src),
        bases,
        span: node_span(node),
        name_span: node_span(name_node),
        body_span: body.map(node_span),
        methods: Vec::new(),
        fields: Vec::new(),
        properties: Vec::new(),
        constructors: Vec::new(),
        enum_members: Vec::new(),
    };

    if let Some(body) = body {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "method_declaration" => {
                    if let Some(m) = extract_method(member, src) {
                        decl.methods.push(m);
                    }
                }
                "constructor_declaration" => {
                    if let Some(c) = extract_ctor(member, src) {
                        decl.constructors.push(c);
                    }
                }
                "field_declaration" => {
                    extract_fields(member, src, &mut decl.fields);
                }
                "property_declaration" => {
                    if let Some(p) = extract_property(member, src) {
                        decl.properties.push(p);
                    }
                }
                _ => {}
            }
        }
    }

    Some(decl)
}

fn extract_enum(node: Node, src: &[u8], namespace: Option<&str>) -> Option<TypeDecl> {
    let name_node = field(node, "name")?;
    let body = field(node, "body").or_else(|| child_of_kind(node, "enum_member_declaration_list"));

    let mut members = Vec::new();
    if let Some(body) = body {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if member.kind() != "enum_member_declaration" {
                continue;
            }
            let Some(member_name) = field(member, "name")
                .or_else(|| child_of_kind(member, "identifier"))
            else {
                continue;
            };
            let value = field(member, "value")
                .or_else(|| {
                    // Fallback: `Name = 3` parsed without a value field
                    let mut c = member.walk();
                    member
                        .named_children(&mut c)
                        .filter(|n| n.kind() != "identifier" && n.kind() != "attribute_list")
                        .last()
                })
                .and_then(|v| parse_int(node_text(v, src)));
            members.push(EnumMember {
                name: node_text(member_name, src).to_string(),
                value,
                span: node_span(member),
                name_span: node_span(member_name),
            });
        }
    }

    Some(TypeDecl {
        kind: TypeKind::Enum,
        name: node_text(name_node, src).to_string(),
        generic_arity: 0,
        namespace: namespace.map(str::to_string),
        modifiers: modifiers_of(node, src),
        bases: Vec::new(),
        span: node_span(node),
        name_span: node_span(name_node),
        body_span: body.map(node_span),
        methods: Vec::new(),
        fields: Vec::new(),
        properties: Vec::new(),
        constructors: Vec::new(),
        enum_members: members,
    })
}

/// Normalize a base-list entry to its unparameterized definition
fn parse_type_ref(node: Node, src: &[u8]) -> Option<TypeRef> {
    match node.kind() {
        "identifier" => Some(TypeRef {
            name: node_text(node, src).to_string(),
            generic_arity: 0,
        }),
        "generic_name" => {
            let name = child_of_kind(node, "identifier")
                .map(|n| node_text(n, src).to_string())?;
            let arity = child_of_kind(node, "type_argument_list")
                .map(|args| args.named_child_count())
                .unwrap_or(0);
            Some(TypeRef {
                name,
                generic_arity: arity,
            })
        }
        "qualified_name" => {
            let last = field(node, "name").or_else(|| {
                let mut cursor = node.walk();
                node.named_children(&mut cursor).last()
            })?;
            parse_type_ref(last, src)
        }
        _ => None,
    }
}

fn extract_method(node: Node, src: &[u8]) -> Option<MethodDecl> {
    let name_node = field(node, "name")?;
    let (params, param_list_span) = extract_params(node, src);

    let explicit_interface = child_of_kind(node, "explicit_interface_specifier")
        .and_then(|specifier| {
            let mut cursor = specifier.walk();
            let x = specifier.named_children(&mut cursor).next();
            x
        })
        .and_then(|n| parse_type_ref(n, src))
        .map(|r| r.name);

    let return_type = field(node, "returns")
        .or_else(|| field(node, "type"))
        .map(|n| node_text(n, src).to_string());

    let body = field(node, "body")
        .or_else(|| child_of_kind(node, "arrow_expression_clause"))
        .map(|b| extract_body(b, src));

    Some(MethodDecl {
        name: node_text(name_node, src).to_string(),
        name_span: node_span(name_node),
        span: node_span(node),
        modifiers: modifiers_of(node, src),
        explicit_interface,
        params,
        param_list_span,
        return_type,
        body,
    })
}

fn extract_ctor(node: Node, src: &[u8]) -> Option<CtorDecl> {
    let name_node = field(node, "name")?;
    let (params, param_list_span) = extract_params(node, src);
    let body = field(node, "body")
        .or_else(|| child_of_kind(node, "block"))
        .map(|b| extract_body(b, src));

    Some(CtorDecl {
        name: node_text(name_node, src).to_string(),
        span: node_span(node),
        modifiers: modifiers_of(node, src),
        params,
        param_list_span,
        body,
    })
}

fn extract_params(node: Node, src: &[u8]) -> (Vec<Param>, Span) {
    let Some(list) = field(node, "parameters").or_else(|| child_of_kind(node, "parameter_list"))
    else {
        return (Vec::new(), Span::empty(node.end_byte()));
    };
    let mut params = Vec::new();
    let mut cursor = list.walk();
    for p in list.named_children(&mut cursor) {
        if p.kind() != "parameter" {
            continue;
        }
        let Some(name_node) = field(p, "name").or_else(|| {
            let mut c = p.walk();
            p.named_children(&mut c).filter(|n| n.kind() == "identifier").last()
        }) else {
            continue;
        };
        let type_name = field(p, "type")
            .map(|t| node_text(t, src).to_string())
            .unwrap_or_default();
        params.push(Param {
            name: node_text(name_node, src).to_string(),
            type_name,
            name_span: node_span(name_node),
            span: node_span(p),
        });
    }
    (params, node_span(list))
}

fn extract_fields(node: Node, src: &[u8], out: &mut Vec<FieldDecl>) {
    let modifiers = modifiers_of(node, src);
    let Some(var_decl) = child_of_kind(node, "variable_declaration") else {
        return;
    };
    let type_name = field(var_decl, "type")
        .map(|t| node_text(t, src).to_string())
        .unwrap_or_default();
    let mut cursor = var_decl.walk();
    for declarator in var_decl.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let Some(name_node) = field(declarator, "name")
            .or_else(|| child_of_kind(declarator, "identifier"))
        else {
            continue;
        };
        out.push(FieldDecl {
            name: node_text(name_node, src).to_string(),
            type_name: type_name.clone(),
            name_span: node_span(name_node),
            span: node_span(node),
            modifiers: modifiers.clone(),
        });
    }
}

fn extract_property(node: Node, src: &[u8]) -> Option<PropertyDecl> {
    let name_node = field(node, "name")?;
    let type_name = field(node, "type")
        .map(|t| node_text(t, src).to_string())
        .unwrap_or_default();
    Some(PropertyDecl {
        name: node_text(name_node, src).to_string(),
        type_name,
        name_span: node_span(name_node),
        span: node_span(node),
        modifiers: modifiers_of(node, src),
    })
}

fn extract_body(node: Node, src: &[u8]) -> BodyModel {
    let mut body = BodyModel {
        span: node_span(node),
        ..BodyModel::default()
    };

    if node.kind() == "block" {
        let mut cursor = node.walk();
        body.statement_count = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .count();
    } else {
        // Expression bodies always carry one statement
        body.statement_count = 1;
    }

    scan_body(node, src, &mut body);
    body
}

fn scan_body(node: Node, src: &[u8], body: &mut BodyModel) {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    drop(cursor);

    for child in children {
        match child.kind() {
            "comment" => body.comment_spans.push(node_span(child)),
            "local_declaration_statement" => {
                if let Some(var_decl) = child_of_kind(child, "variable_declaration") {
                    extract_locals(var_decl, src, body);
                }
            }
            "invocation_expression" => {
                extract_invocation(child, src, body);
            }
            "object_creation_expression" => {
                extract_creation(child, src, body);
            }
            "binary_expression" => {
                extract_comparison(child, src, body);
            }
            _ => {}
        }
        scan_body(child, src, body);
    }
}

fn extract_locals(var_decl: Node, src: &[u8], body: &mut BodyModel) {
    let type_name = field(var_decl, "type")
        .map(|t| node_text(t, src).to_string())
        .unwrap_or_default();
    let mut cursor = var_decl.walk();
    for declarator in var_decl.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        if let Some(name_node) = field(declarator, "name")
            .or_else(|| child_of_kind(declarator, "identifier"))
        {
            body.locals.push(LocalDecl {
                name: node_text(name_node, src).to_string(),
                type_name: type_name.clone(),
                name_span: node_span(name_node),
            });
        }
    }
}

fn extract_invocation(node: Node, src: &[u8], body: &mut BodyModel) {
    let Some(function) = field(node, "function") else {
        return;
    };

    let (callee, receiver) = match function.kind() {
        "identifier" => (node_text(function, src).to_string(), None),
        "generic_name" => (
            child_of_kind(function, "identifier")
                .map(|n| node_text(n, src).to_string())
                .unwrap_or_default(),
            None,
        ),
        "member_access_expression" => {
            let callee = field(function, "name")
                .map(|n| match n.kind() {
                    "generic_name" => child_of_kind(n, "identifier")
                        .map(|i| node_text(i, src).to_string())
                        .unwrap_or_default(),
                    _ => node_text(n, src).to_string(),
                })
                .unwrap_or_default();
            let receiver = field(function, "expression").map(|e| match e.kind() {
                "this_expression" => "this".to_string(),
                _ => node_text(e, src).to_string(),
            });
            (callee, receiver)
        }
        _ => (node_text(function, src).to_string(), None),
    };

    if callee.is_empty() {
        return;
    }

    let args = field(node, "arguments");
    let arg_count = args.map(|a| a.named_child_count()).unwrap_or(0);

    // Record literal arguments with their callee context
    if let Some(args) = args {
        let mut cursor = args.walk();
        for arg in args.named_children(&mut cursor) {
            if arg.kind() != "argument" {
                continue;
            }
            let mut inner_cursor = arg.walk();
            let Some(expr) = arg.named_children(&mut inner_cursor).next() else {
                continue;
            };
            match expr.kind() {
                "integer_literal" => {
                    if let Some(value) = parse_int(node_text(expr, src)) {
                        body.int_literals.push(IntLiteral {
                            value,
                            span: node_span(expr),
                            context: LiteralContext::Argument {
                                callee: callee.clone(),
                            },
                        });
                    }
                }
                "string_literal" => {
                    body.string_literals.push(StringLiteral {
                        value: string_content(node_text(expr, src)),
                        span: node_span(expr),
                        context: LiteralContext::Argument {
                            callee: callee.clone(),
                        },
                    });
                }
                _ => {}
            }
        }
    }

    body.invocations.push(Invocation {
        callee,
        receiver,
        span: node_span(node),
        arg_count,
    });
}

fn extract_creation(node: Node, src: &[u8], body: &mut BodyModel) {
    let Some(type_node) = field(node, "type") else {
        return;
    };
    let Some(type_ref) = parse_type_ref(type_node, src) else {
        return;
    };
    let arg_count = field(node, "arguments")
        .map(|a| a.named_child_count())
        .unwrap_or(0);
    body.creations.push(ObjectCreation {
        type_name: type_ref.name,
        generic_arity: type_ref.generic_arity,
        span: node_span(node),
        arg_count,
    });
}

/// Record integer operands of `==`/`!=` with the identifier they compare to
fn extract_comparison(node: Node, src: &[u8], body: &mut BodyModel) {
    let operator = field(node, "operator").map(|o| node_text(o, src).to_string());
    if !matches!(operator.as_deref(), Some("==") | Some("!=")) {
        return;
    }
    let (Some(left), Some(right)) = (field(node, "left"), field(node, "right")) else {
        return;
    };
    for (literal, other) in [(left, right), (right, left)] {
        if literal.kind() != "integer_literal" {
            continue;
        }
        let other_name = match other.kind() {
            "identifier" => Some(node_text(other, src).to_string()),
            "member_access_expression" => field(other, "name")
                .map(|n| node_text(n, src).to_string()),
            _ => None,
        };
        if let (Some(value), Some(other)) = (parse_int(node_text(literal, src)), other_name) {
            body.int_literals.push(IntLiteral {
                value,
                span: node_span(literal),
                context: LiteralContext::Comparison { other },
            });
        }
    }
}

/// Collect every identifier occurrence and comment span in the file
fn collect_occurrences(root: Node, src: &[u8], model: &mut FileModel) {
    fn walk(node: Node, src: &[u8], model: &mut FileModel) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        drop(cursor);

        for child in children {
            match child.kind() {
                "identifier" => {
                    let qualifier = qualifier_of(child);
                    model.identifiers.push(IdentifierUse {
                        name: node_text(child, src).to_string(),
                        span: node_span(child),
                        qualifier,
                    });
                }
                "comment" => model.comments.push(node_span(child)),
                _ => {}
            }
            walk(child, src, model);
        }
    }
    walk(root, src, model);
}

fn qualifier_of(node: Node) -> Qualifier {
    let Some(parent) = node.parent() else {
        return Qualifier::None;
    };
    if parent.kind() != "member_access_expression" {
        return Qualifier::None;
    }
    if parent.child_by_field_name("name") != Some(node) {
        return Qualifier::None;
    }
    match parent.child_by_field_name("expression").map(|e| e.kind()) {
        Some("this_expression") => Qualifier::This,
        _ => Qualifier::Member,
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let cleaned = text.replace('_', "");
    let cleaned = cleaned.trim_end_matches(['l', 'L', 'u', 'U']);
    if let Some(hex) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else {
        cleaned.parse().ok()
    }
}

fn string_content(text: &str) -> String {
    text.trim_start_matches(['@', '$'])
        .trim_matches('"')
        .to_string()
}
