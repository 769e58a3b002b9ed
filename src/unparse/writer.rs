//! The IDL writer.

use std::fmt::Write;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde_json::Value;
use tracing::debug;

use super::node::{render_key, render_node, render_pretty, render_trait};
use super::{IdlOptions, MetadataPolicy};
use crate::base::constants::traits::{DEFAULT, DOCUMENTATION, ENUM, ENUM_VALUE, EXAMPLES, INPUT, OUTPUT};
use crate::base::constants::{DOC_WRAP_COLUMN, INDENT, PRELUDE_NAMESPACE};
use crate::base::shape_id::{is_prelude_type, namespace_of, split_member, strip_namespace};
use crate::base::text::{format_comment, quote};
use crate::model::deps::external_refs;
use crate::model::{
    Ast, Member, Members, OperationShape, ResourceShape, ServiceShape, Shape, ShapeKind, ShapeRef,
    Traits,
};
use crate::parser::TraitRegistry;

/// Writes one namespace of an [`Ast`] as IDL text
pub struct IdlWriter<'a> {
    ast: &'a Ast,
    namespace: &'a str,
    options: &'a IdlOptions,
    registry: TraitRegistry,
    version: u8,
    /// Short name → absolute id, one `use` line each
    imports: IndexMap<String, String>,
    /// Absolute ids already written
    emitted: FxHashSet<String>,
    output: String,
    indent_level: usize,
}

impl<'a> IdlWriter<'a> {
    pub fn new(ast: &'a Ast, namespace: &'a str, options: &'a IdlOptions) -> Self {
        let registry = TraitRegistry::default();
        let imports = compute_imports(ast, namespace, &registry);
        Self {
            ast,
            namespace,
            options,
            registry,
            version: ast.version(),
            imports,
            emitted: FxHashSet::default(),
            output: String::new(),
            indent_level: 0,
        }
    }

    pub fn write(mut self) -> String {
        debug!(namespace = self.namespace, version = self.version, "writing IDL");
        self.write_header();
        let ast = self.ast;
        let ids = ast.shape_names(self.namespace);

        for id in &ids {
            if let Some(shape) = ast.get_shape(id) {
                if shape.as_service().is_some() {
                    self.write_shape(id, shape);
                }
            }
        }
        for id in &ids {
            if let Some(shape) = ast.get_shape(id) {
                if shape.as_operation().is_some() {
                    self.write_shape(id, shape);
                }
            }
        }
        for id in &ids {
            if self.emitted.contains(*id) {
                continue;
            }
            if let Some(shape) = ast.get_shape(id) {
                self.write_shape(id, shape);
            }
        }
        for id in &ids {
            let Some(shape) = ast.get_shape(id) else {
                continue;
            };
            if let (Some(_), Some(examples)) = (shape.as_operation(), shape.traits.get(EXAMPLES)) {
                self.write_blank_line();
                let line = format!(
                    "apply {} @{}({})",
                    strip_namespace(id),
                    self.trait_name(EXAMPLES),
                    render_pretty(examples, "")
                );
                self.write_line(&line);
            }
        }
        self.output
    }

    // =========================================================================
    // Output helpers
    // =========================================================================

    fn indent(&self) -> String {
        INDENT.repeat(self.indent_level)
    }

    fn write_line(&mut self, text: &str) {
        let indent = self.indent();
        let _ = writeln!(self.output, "{}{}", indent, text);
    }

    fn write_blank_line(&mut self) {
        self.output.push('\n');
    }

    fn write_docs(&mut self, doc: &str) {
        let indent = self.indent();
        self.output
            .push_str(&format_comment(&indent, "/// ", doc, DOC_WRAP_COLUMN));
    }

    /// Line terminator for members and properties.
    fn sep(&self) -> &'static str {
        if self.version < 2 { "," } else { "" }
    }

    // =========================================================================
    // Header
    // =========================================================================

    fn write_header(&mut self) {
        let version = format!("$version: \"{}\"", self.version);
        self.write_line(&version);

        let with_metadata = match self.options.metadata {
            MetadataPolicy::All => true,
            MetadataPolicy::None => false,
            MetadataPolicy::Primary => {
                self.ast.primary_namespace().as_deref() == Some(self.namespace)
            }
        };
        let ast = self.ast;
        if with_metadata && !ast.metadata.is_empty() {
            self.write_blank_line();
            for (key, value) in &ast.metadata {
                let line = format!("metadata {} = {}", render_key(key), render_pretty(value, ""));
                self.write_line(&line);
            }
        }

        self.write_blank_line();
        let namespace = format!("namespace {}", self.namespace);
        self.write_line(&namespace);

        if !self.imports.is_empty() {
            self.write_blank_line();
            let lines: Vec<String> = self.imports.values().map(|id| format!("use {id}")).collect();
            for line in lines {
                self.write_line(&line);
            }
        }
    }

    // =========================================================================
    // Shapes
    // =========================================================================

    fn write_shape(&mut self, id: &str, shape: &'a Shape) {
        if !self.emitted.insert(id.to_string()) {
            return;
        }
        let name = strip_namespace(id);
        self.write_blank_line();
        match &shape.kind {
            ShapeKind::Simple(simple) => {
                self.write_traits(&shape.traits, &[]);
                let line = format!("{} {}{}", simple.as_str(), name, self.mixins(shape));
                self.write_line(&line);
            }
            ShapeKind::List { member } | ShapeKind::Set { member } => {
                self.open_shape(name, shape);
                self.write_member("member", member);
                self.close_block();
            }
            ShapeKind::Map { key, value } => {
                self.open_shape(name, shape);
                self.write_member("key", key);
                self.write_member("value", value);
                self.close_block();
            }
            ShapeKind::Structure { members } => {
                self.open_shape(name, shape);
                self.write_members(members, true);
                self.close_block();
            }
            ShapeKind::Union { members } => {
                self.open_shape(name, shape);
                self.write_members(members, false);
                self.close_block();
            }
            ShapeKind::Enum { members } | ShapeKind::IntEnum { members } => {
                self.open_shape(name, shape);
                self.write_enum_members(members);
                self.close_block();
            }
            ShapeKind::Service(service) => self.write_service(name, shape, service),
            ShapeKind::Resource(resource) => self.write_resource(name, shape, resource),
            ShapeKind::Operation(operation) => self.write_operation(name, shape, operation),
        }
    }

    /// Traits, then `<type> <Name> [with [...]] {`.
    fn open_shape(&mut self, name: &str, shape: &Shape) {
        let skip: &[&str] = if shape.as_operation().is_some() { &[EXAMPLES] } else { &[] };
        self.write_traits(&shape.traits, skip);
        let line = format!("{} {}{} {{", shape.type_name(), name, self.mixins(shape));
        self.write_line(&line);
        self.indent_level += 1;
    }

    fn close_block(&mut self) {
        self.indent_level -= 1;
        self.write_line("}");
    }

    fn mixins(&self, shape: &Shape) -> String {
        if shape.mixins.is_empty() {
            return String::new();
        }
        format!(" with {}", self.ref_list(&shape.mixins))
    }

    fn ref_list(&self, refs: &[ShapeRef]) -> String {
        let names: Vec<String> = refs.iter().map(|r| self.shape_ref(&r.target)).collect();
        format!("[{}]", names.join(", "))
    }

    fn write_members(&mut self, members: &Members, spaced: bool) {
        for (i, (name, member)) in members.iter().enumerate() {
            if spaced && i > 0 {
                self.write_blank_line();
            }
            self.write_member(name, member);
        }
    }

    /// Docs and traits, then `name: Target [= default]`.
    fn write_member(&mut self, name: &str, member: &Member) {
        self.write_traits(&member.traits, &[DEFAULT]);
        let mut line = format!("{}: {}", name, self.shape_ref(&member.target));
        if let Some(default) = member.traits.get(DEFAULT) {
            let _ = write!(line, " = {}", render_node(default));
        }
        line.push_str(self.sep());
        self.write_line(&line);
    }

    fn write_enum_members(&mut self, members: &Members) {
        for (name, member) in members {
            self.write_traits(&member.traits, &[ENUM_VALUE]);
            let line = match member.traits.get(ENUM_VALUE) {
                Some(value) => format!("{} = {}{}", name, render_node(value), self.sep()),
                None => format!("{}{}", name, self.sep()),
            };
            self.write_line(&line);
        }
    }

    fn write_service(&mut self, name: &str, shape: &Shape, service: &ServiceShape) {
        self.open_shape(name, shape);
        let sep = self.sep();
        if !service.version.is_empty() {
            self.write_line(&format!("version: {}{}", quote(&service.version), sep));
        }
        if !service.operations.is_empty() {
            self.write_line(&format!("operations: {}{}", self.ref_list(&service.operations), sep));
        }
        if !service.resources.is_empty() {
            self.write_line(&format!("resources: {}{}", self.ref_list(&service.resources), sep));
        }
        self.close_block();
    }

    fn write_resource(&mut self, name: &str, shape: &Shape, resource: &ResourceShape) {
        self.open_shape(name, shape);
        let sep = self.sep();
        if !resource.identifiers.is_empty() {
            let ids: Vec<String> = resource
                .identifiers
                .iter()
                .map(|(k, r)| format!("{}: {}", render_key(k), self.shape_ref(&r.target)))
                .collect();
            self.write_line(&format!("identifiers: {{ {} }}{}", ids.join(", "), sep));
        }
        for (keyword, target) in resource.lifecycle() {
            if let Some(target) = target {
                self.write_line(&format!("{}: {}{}", keyword, self.shape_ref(&target.target), sep));
            }
        }
        for (label, refs) in [
            ("operations", &resource.operations),
            ("collectionOperations", &resource.collection_operations),
            ("resources", &resource.resources),
        ] {
            if !refs.is_empty() {
                self.write_line(&format!("{}: {}{}", label, self.ref_list(refs), sep));
            }
        }
        self.close_block();
    }

    fn write_operation(&mut self, name: &str, shape: &Shape, operation: &OperationShape) {
        self.open_shape(name, shape);
        let sep = self.sep();
        for (which, target) in [("input", &operation.input), ("output", &operation.output)] {
            let Some(target) = target else {
                continue;
            };
            match self.inline_io(name, which, &target.target) {
                Some(io) => {
                    self.emitted.insert(target.target.clone());
                    self.write_inline_io(which, io);
                }
                None => {
                    let line = format!("{}: {}{}", which, self.shape_ref(&target.target), sep);
                    self.write_line(&line);
                }
            }
        }
        if !operation.errors.is_empty() {
            self.write_line(&format!("errors: {}{}", self.ref_list(&operation.errors), sep));
        }
        self.close_block();

        let ast = self.ast;
        for target in [&operation.input, &operation.output].into_iter().flatten() {
            let id = target.target.as_str();
            if namespace_of(id) != self.namespace {
                continue;
            }
            if let Some(io) = ast.get_shape(id) {
                if io.as_service().is_none() && io.as_operation().is_none() {
                    self.write_shape(id, io);
                }
            }
        }
    }

    /// The input/output structure to write inline, if the model allows it.
    fn inline_io(&self, operation: &str, which: &str, target: &str) -> Option<&'a Shape> {
        if self.version < 2 || namespace_of(target) != self.namespace || self.emitted.contains(target) {
            return None;
        }
        let (marker, suffix) = if which == "input" {
            (INPUT, "Input")
        } else {
            (OUTPUT, "Output")
        };
        if strip_namespace(target) != format!("{operation}{suffix}") {
            return None;
        }
        let shape = self.ast.get_shape(target)?;
        match shape.kind {
            ShapeKind::Structure { .. } if shape.traits.has(marker) => Some(shape),
            _ => None,
        }
    }

    /// `input := @a @b with [X] { ... }`, traits in place, marker omitted.
    fn write_inline_io(&mut self, which: &str, io: &Shape) {
        let marker = if which == "input" { INPUT } else { OUTPUT };
        let mut head = format!("{which} :=");
        for (id, value) in &io.traits {
            if id == marker {
                continue;
            }
            head.push(' ');
            head.push_str(&self.render_trait_text(id, value));
        }
        head.push_str(&self.mixins(io));
        head.push_str(" {");
        self.write_line(&head);
        self.indent_level += 1;
        if let Some(members) = io.members() {
            self.write_members(members, true);
        }
        self.close_block();
    }

    // =========================================================================
    // Traits
    // =========================================================================

    /// Documentation as `///` lines, then one line per trait.
    fn write_traits(&mut self, traits: &Traits, skip: &[&str]) {
        if let Some(doc) = traits.documentation() {
            if !doc.is_empty() {
                self.write_docs(doc);
            }
        }
        for (id, value) in traits {
            if id == DOCUMENTATION || skip.contains(&id.as_str()) {
                continue;
            }
            let line = self.render_trait_text(id, value);
            self.write_line(&line);
        }
    }

    fn render_trait_text(&self, id: &str, value: &Value) -> String {
        let name = self.trait_name(id);
        match value {
            Value::Array(_) if id == ENUM => {
                format!("@{}({})", name, render_pretty(value, &self.indent()))
            }
            _ => render_trait(&name, value),
        }
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// How a trait id is written so the parser resolves it back to itself.
    fn trait_name(&self, id: &str) -> String {
        let ns = namespace_of(id);
        let name = strip_namespace(id);
        let bare = if ns == PRELUDE_NAMESPACE {
            self.registry.is_registered(name)
        } else if ns == self.namespace {
            !self.registry.is_registered(name) && !is_prelude_type(name)
        } else {
            self.imports.get(name).is_some_and(|full| full == id)
        };
        if bare { name.to_string() } else { id.to_string() }
    }

    /// How a shape id is written so the parser resolves it back to itself.
    fn shape_ref(&self, target: &str) -> String {
        let (shape, member) = split_member(target);
        let ns = namespace_of(shape);
        let name = strip_namespace(shape);
        let bare = if ns.is_empty() {
            true
        } else if ns == self.namespace {
            !is_prelude_type(name)
        } else if ns == PRELUDE_NAMESPACE {
            is_prelude_type(name)
        } else {
            self.imports.get(name).is_some_and(|full| full == shape)
        };
        let mut out = if bare { name.to_string() } else { shape.to_string() };
        if let Some(member) = member {
            out.push('$');
            out.push_str(member);
        }
        out
    }
}

/// External references that can be written by short name. A short name is
/// not imported when it would shadow a local shape, another import, a
/// prelude type, or a trait with a dedicated visitor.
fn compute_imports(ast: &Ast, namespace: &str, registry: &TraitRegistry) -> IndexMap<String, String> {
    let local: FxHashSet<&str> = ast
        .shape_names(namespace)
        .into_iter()
        .map(strip_namespace)
        .collect();
    let mut imports = IndexMap::new();
    for id in external_refs(ast, namespace) {
        let name = strip_namespace(&id);
        if local.contains(name)
            || imports.contains_key(name)
            || is_prelude_type(name)
            || registry.is_registered(name)
        {
            continue;
        }
        imports.insert(name.to_string(), id.clone());
    }
    imports
}
