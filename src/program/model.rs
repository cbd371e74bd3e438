//! Owned syntactic summary of one parsed source unit
//!
//! The parser extracts everything the rules and transformers need into these
//! plain structures, so program snapshots stay cheap to clone and safe to
//! share across threads without holding parser state.

use crate::core::Span;

/// Everything extracted from one parsed file
#[derive(Debug, Clone, Default)]
pub struct FileModel {
    pub usings: Vec<UsingDirective>,
    pub types: Vec<TypeDecl>,
    /// Every identifier occurrence in the file, declaration sites included
    pub identifiers: Vec<IdentifierUse>,
    pub comments: Vec<Span>,
}

#[derive(Debug, Clone)]
pub struct UsingDirective {
    pub namespace: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
}

/// A type declaration and its members
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: String,
    /// Number of declared type parameters; `Base<T>` has arity 1
    pub generic_arity: usize,
    pub namespace: Option<String>,
    pub modifiers: Vec<String>,
    pub bases: Vec<TypeRef>,
    pub span: Span,
    pub name_span: Span,
    /// Body span including braces, absent for bodiless declarations
    pub body_span: Option<Span>,
    pub methods: Vec<MethodDecl>,
    pub fields: Vec<FieldDecl>,
    pub properties: Vec<PropertyDecl>,
    pub constructors: Vec<CtorDecl>,
    pub enum_members: Vec<EnumMember>,
}

impl TypeDecl {
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    /// The unparameterized identity used for all cross-declaration comparison
    pub fn original_definition(&self) -> (&str, usize) {
        (self.name.as_str(), self.generic_arity)
    }
}

/// A base type reference, normalized to name plus generic arity so that
/// `Base<Concrete>` matches the declaration `Base<T>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub generic_arity: usize,
}

impl TypeRef {
    pub fn original_definition(&self) -> (&str, usize) {
        (self.name.as_str(), self.generic_arity)
    }
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub name_span: Span,
    pub span: Span,
    pub modifiers: Vec<String>,
    /// Interface name for explicit implementations like `void IPool.Drain()`
    pub explicit_interface: Option<String>,
    pub params: Vec<Param>,
    /// Span of the parameter list including parentheses
    pub param_list_span: Span,
    pub return_type: Option<String>,
    pub body: Option<BodyModel>,
}

impl MethodDecl {
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    pub fn is_overridable(&self) -> bool {
        self.has_modifier("virtual") || self.has_modifier("abstract")
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub type_name: String,
    pub name_span: Span,
    pub span: Span,
}

/// Statistics and occurrence data for one method or constructor body
#[derive(Debug, Clone, Default)]
pub struct BodyModel {
    /// Block span including braces, or the arrow expression clause
    pub span: Span,
    /// Statements directly inside the block, comments excluded
    pub statement_count: usize,
    pub comment_spans: Vec<Span>,
    pub locals: Vec<LocalDecl>,
    pub invocations: Vec<Invocation>,
    pub creations: Vec<ObjectCreation>,
    pub int_literals: Vec<IntLiteral>,
    pub string_literals: Vec<StringLiteral>,
}

#[derive(Debug, Clone)]
pub struct LocalDecl {
    pub name: String,
    pub type_name: String,
    pub name_span: Span,
}

#[derive(Debug, Clone)]
pub struct Invocation {
    pub callee: String,
    /// Textual receiver for member calls: `Time.Now()` records `Time`
    pub receiver: Option<String>,
    pub span: Span,
    pub arg_count: usize,
}

#[derive(Debug, Clone)]
pub struct ObjectCreation {
    pub type_name: String,
    pub generic_arity: usize,
    pub span: Span,
    pub arg_count: usize,
}

/// Syntactic context a literal was found in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralContext {
    /// Argument of an invocation with the given callee name
    Argument { callee: String },
    /// Operand of `==`/`!=` against the named identifier
    Comparison { other: String },
}

#[derive(Debug, Clone)]
pub struct IntLiteral {
    pub value: i64,
    pub span: Span,
    pub context: LiteralContext,
}

#[derive(Debug, Clone)]
pub struct StringLiteral {
    /// Literal content without the surrounding quotes
    pub value: String,
    pub span: Span,
    pub context: LiteralContext,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub type_name: String,
    pub name_span: Span,
    pub span: Span,
    pub modifiers: Vec<String>,
}

impl FieldDecl {
    /// Fields with no access modifier default to private in C#
    pub fn is_private(&self) -> bool {
        !self.modifiers.iter().any(|m| {
            matches!(m.as_str(), "public" | "protected" | "internal")
        })
    }
}

#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub name: String,
    pub type_name: String,
    pub name_span: Span,
    pub span: Span,
    pub modifiers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CtorDecl {
    pub name: String,
    pub span: Span,
    pub modifiers: Vec<String>,
    pub params: Vec<Param>,
    pub param_list_span: Span,
    pub body: Option<BodyModel>,
}

#[derive(Debug, Clone)]
pub struct EnumMember {
    pub name: String,
    pub value: Option<i64>,
    pub span: Span,
    pub name_span: Span,
}

/// How an identifier occurrence is qualified at its use site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    /// Bare identifier
    None,
    /// Member access through `this`
    This,
    /// Member access through some other receiver
    Member,
}

#[derive(Debug, Clone)]
pub struct IdentifierUse {
    pub name: String,
    pub span: Span,
    pub qualifier: Qualifier,
}
