//! Replace direct service construction with resolver-mediated lookup
//!
//! The cheap path rewrites the call site against an existing resolver field
//! or property, searched on the containing type and its program-declared
//! ancestors. Otherwise a dependency is synthesized: the containing type is
//! classified once into an injection style, and a single transaction adds
//! the private field, adds or extends the injection point with its
//! assignment, rewrites the call site, and ensures the resolver namespace
//! is imported. Partial application would leave invalid code, so all edits
//! share one transaction.

use crate::analyzers::direct_instantiation;
use crate::config::InjectionConfig;
use crate::core::{Finding, Span};
use crate::edit::Transaction;
use crate::fixes::{line_indent, Transformer};
use crate::program::model::TypeDecl;
use crate::program::symbols::TypeId;
use crate::program::Program;

/// How a class receives its resolver, decided once per class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionStyle {
    /// Descends from the component base: inject through the lifecycle method
    Component,
    /// Plain type: inject through the primary constructor
    Plain,
}

/// An existing injection point that can be extended
struct InjectionPoint {
    param_list_span: Span,
    body_open: usize,
    has_params: bool,
}

/// Outcome of looking for the style's injection point on a class
enum Anchor {
    /// No injection point yet; one must be rendered
    Missing,
    Found(InjectionPoint),
    /// Present but not extendable (bodiless, or already resolver-aware)
    Unusable,
}

/// Per-style lookup and rendering, dispatched through one table
struct Strategy {
    find_point: fn(&TypeDecl, &InjectionConfig) -> Anchor,
    render_point: fn(&InjectionConfig, &str, &str, &str) -> String,
}

fn strategy_for(style: InjectionStyle) -> Strategy {
    match style {
        InjectionStyle::Component => Strategy {
            find_point: find_lifecycle,
            render_point: render_lifecycle,
        },
        InjectionStyle::Plain => Strategy {
            find_point: find_ctor,
            render_point: render_ctor,
        },
    }
}

pub struct InjectDependency {
    config: InjectionConfig,
}

impl InjectDependency {
    pub fn new(config: InjectionConfig) -> Self {
        Self { config }
    }

    fn is_resolver_type(&self, type_name: &str) -> bool {
        self.config
            .resolver_types
            .iter()
            .any(|t| t == type_name.trim())
    }

    /// A resolver-typed field or property on the type or an ancestor
    fn find_resolver_member(&self, program: &Program, type_id: TypeId) -> Option<String> {
        let mut candidates = vec![type_id];
        candidates.extend(program.base_chain(type_id));
        for candidate in candidates {
            let inherited = candidate != type_id;
            let Some(decl) = program.type_decl(candidate) else {
                continue;
            };
            for field in &decl.fields {
                if self.is_resolver_type(&field.type_name) && !(inherited && field.is_private()) {
                    return Some(field.name.clone());
                }
            }
            for property in &decl.properties {
                let accessible = !inherited
                    || property
                        .modifiers
                        .iter()
                        .any(|m| m == "public" || m == "protected");
                if self.is_resolver_type(&property.type_name) && accessible {
                    return Some(property.name.clone());
                }
            }
        }
        None
    }

    fn classify(&self, program: &Program, type_id: TypeId) -> InjectionStyle {
        let component = program
            .transitive_base_refs(type_id)
            .iter()
            .any(|r| r.name == self.config.component_base);
        if component {
            InjectionStyle::Component
        } else {
            InjectionStyle::Plain
        }
    }
}

impl Transformer for InjectDependency {
    fn rule_id(&self) -> &'static str {
        direct_instantiation::META.id
    }

    fn transform(&self, finding: &Finding, program: &Program) -> Option<Transaction> {
        let unit = program.unit(finding.unit)?;
        let type_id = program.containing_type(finding.unit, finding.span)?;
        let decl = program.type_decl(type_id)?;
        let creation = decl
            .methods
            .iter()
            .filter_map(|m| m.body.as_ref())
            .chain(decl.constructors.iter().filter_map(|c| c.body.as_ref()))
            .flat_map(|b| &b.creations)
            .find(|c| c.span == finding.span)?;

        // Constructor arguments cannot be proven equivalent to a resolve call
        if creation.arg_count > 0 {
            return None;
        }
        let service = creation.type_name.clone();

        if let Some(member) = self.find_resolver_member(program, type_id) {
            return Some(
                Transaction::builder()
                    .replace(
                        finding.unit,
                        finding.span,
                        format!("{member}.Resolve<{service}>()"),
                    )
                    .build(),
            );
        }

        let body_span = decl.body_span?;
        let field = self.config.resolver_field.clone();
        let resolver_ty = self.config.resolver_types.first()?.clone();
        if program.name_bound_in_scope(finding.unit, body_span, &field) {
            return None;
        }

        let style = self.classify(program, type_id);
        let strategy = strategy_for(style);
        let indent = member_indent(&unit.text, decl);

        let mut builder = Transaction::builder();
        match (strategy.find_point)(decl, &self.config) {
            Anchor::Unusable => return None,
            Anchor::Found(point) => {
                builder = builder.insert(
                    finding.unit,
                    body_span.start + 1,
                    format!("\n{indent}private {resolver_ty} {field};\n"),
                );
                let separator = if point.has_params { ", " } else { "" };
                builder = builder.insert(
                    finding.unit,
                    point.param_list_span.end.checked_sub(1)?,
                    format!("{separator}{resolver_ty} resolver"),
                );
                builder = builder.insert(
                    finding.unit,
                    point.body_open + 1,
                    format!("\n{indent}    {field} = resolver;"),
                );
            }
            Anchor::Missing => {
                let rendered =
                    (strategy.render_point)(&self.config, &decl.name, &resolver_ty, &indent);
                builder = builder.insert(
                    finding.unit,
                    body_span.start + 1,
                    format!("\n{indent}private {resolver_ty} {field};\n\n{rendered}\n"),
                );
            }
        }

        builder = builder.replace(
            finding.unit,
            finding.span,
            format!("{field}.Resolve<{service}>()"),
        );

        let namespace = &self.config.resolver_namespace;
        if !unit.model.usings.iter().any(|u| u.namespace == *namespace) {
            builder = builder.insert(finding.unit, 0, format!("using {namespace};\n"));
        }

        Some(builder.build())
    }
}

fn find_lifecycle(decl: &TypeDecl, config: &InjectionConfig) -> Anchor {
    let Some(method) = decl.methods.iter().find(|m| m.name == config.lifecycle_method) else {
        return Anchor::Missing;
    };
    let Some(body) = &method.body else {
        return Anchor::Unusable;
    };
    if method
        .params
        .iter()
        .any(|p| config.resolver_types.iter().any(|t| t == p.type_name.trim()))
    {
        return Anchor::Unusable;
    }
    Anchor::Found(InjectionPoint {
        param_list_span: method.param_list_span,
        body_open: body.span.start,
        has_params: !method.params.is_empty(),
    })
}

fn find_ctor(decl: &TypeDecl, config: &InjectionConfig) -> Anchor {
    let Some(ctor) = decl.constructors.first() else {
        return Anchor::Missing;
    };
    let Some(body) = &ctor.body else {
        return Anchor::Unusable;
    };
    if ctor
        .params
        .iter()
        .any(|p| config.resolver_types.iter().any(|t| t == p.type_name.trim()))
    {
        return Anchor::Unusable;
    }
    Anchor::Found(InjectionPoint {
        param_list_span: ctor.param_list_span,
        body_open: body.span.start,
        has_params: !ctor.params.is_empty(),
    })
}

fn render_lifecycle(
    config: &InjectionConfig,
    _type_name: &str,
    resolver_ty: &str,
    indent: &str,
) -> String {
    format!(
        "{indent}public void {method}({resolver_ty} resolver) {{\n{indent}    {field} = resolver;\n{indent}}}",
        method = config.lifecycle_method,
        field = config.resolver_field,
    )
}

fn render_ctor(
    config: &InjectionConfig,
    type_name: &str,
    resolver_ty: &str,
    indent: &str,
) -> String {
    format!(
        "{indent}public {type_name}({resolver_ty} resolver) {{\n{indent}    {field} = resolver;\n{indent}}}",
        field = config.resolver_field,
    )
}

/// Indentation for a new member, taken from an existing one when possible
fn member_indent(text: &str, decl: &TypeDecl) -> String {
    let existing = decl
        .methods
        .iter()
        .map(|m| m.span.start)
        .chain(decl.fields.iter().map(|f| f.span.start))
        .chain(decl.constructors.iter().map(|c| c.span.start))
        .min();
    match existing {
        Some(offset) => line_indent(text, offset),
        None => format!("{}    ", line_indent(text, decl.span.start)),
    }
}
