//! Simplified alternate notation (SADL).
//!
//! SADL describes HTTP operations directly: an operation becomes an
//! `http METHOD "path" {...}` block built from its `@http` trait and the
//! HTTP bindings of its input and output members. Models that do not bind
//! every operation this way are rejected by [`validate`] before anything is
//! rendered.

use std::fmt::Write as _;

use rustc_hash::FxHashSet;
use serde_json::Value;
use tracing::debug;

use super::sink::file_name;
use super::{GenerateError, Generator, GeneratorConfig, OutputFile};
use crate::base::constants::traits::{
    DEPRECATED, DOCUMENTATION, ERROR, EXAMPLES, HTTP, HTTP_ERROR, HTTP_HEADER, HTTP_LABEL, HTTP_PAYLOAD,
    HTTP_QUERY, HTTP_RESPONSE_CODE, LENGTH, PATTERN, RANGE, REQUIRED, TAGS, TIMESTAMP_FORMAT,
};
use crate::base::constants::{DOC_WRAP_COLUMN, INDENT};
use crate::base::shape_id::{in_prelude, prelude_id, strip_namespace};
use crate::base::text::{format_comment, quote, uncapitalize};
use crate::model::{Ast, Member, OperationShape, Shape, ShapeKind, SimpleType, Traits, field_str};

const DEFAULT_STATUS: i64 = 200;

/// A single SADL document for the whole model.
///
/// Parameters: `namespace=ns` sets the document namespace and file name
/// (default `model.sadl`); `annotate` adds `x_` annotations for traits SADL
/// has no native form for.
#[derive(Debug, Default)]
pub struct SadlGenerator;

impl Generator for SadlGenerator {
    fn name(&self) -> &'static str {
        "sadl"
    }

    fn render(&self, ast: &Ast, config: &GeneratorConfig) -> Result<Vec<OutputFile>, GenerateError> {
        let namespace = config.param("namespace").filter(|ns| !ns.is_empty());
        validate(ast)?;
        let content = SadlWriter::new(ast, config.flag("annotate")).write(namespace)?;
        let name = file_name(namespace.unwrap_or("model"), ".sadl");
        Ok(vec![OutputFile::new(name, content)])
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Check that the model can be expressed in SADL.
pub fn validate(ast: &Ast) -> Result<(), GenerateError> {
    for (id, shape) in ast.shapes.iter() {
        match &shape.kind {
            ShapeKind::IntEnum { .. } => {
                return Err(GenerateError::Unsupported(format!("intEnum not supported by SADL: {id}")));
            }
            ShapeKind::Operation(op) => validate_operation(ast, id, shape, op)?,
            _ => {}
        }
    }
    Ok(())
}

fn validate_operation(ast: &Ast, id: &str, shape: &Shape, op: &OperationShape) -> Result<(), GenerateError> {
    let http = shape.traits.get(HTTP).ok_or_else(|| {
        GenerateError::Unsupported(format!("Operation without @http trait not valid for SADL: {id}"))
    })?;
    let method = field_str(http, "method").unwrap_or_default();

    let expect_input_payload = matches!(method, "PUT" | "POST" | "PATCH");
    let mut input_payload = false;
    for (name, member) in io_members(ast, op.input.as_ref().map(|r| r.target.as_str()))? {
        if member.traits.has(HTTP_PAYLOAD) {
            if input_payload {
                return Err(GenerateError::Unsupported(format!(
                    "More than one @httpPayload specified in the input for operation {id}"
                )));
            }
            input_payload = true;
        } else if ![HTTP_HEADER, HTTP_LABEL, HTTP_QUERY].iter().any(|t| member.traits.has(t)) {
            return Err(GenerateError::Unsupported(format!(
                "An input with no HTTP binding is present in operation {id}: {name}"
            )));
        }
    }
    if input_payload != expect_input_payload {
        let expectation = if input_payload {
            "expects no input payload, but one was specified"
        } else {
            "expects an input payload, but none is specified"
        };
        return Err(GenerateError::Unsupported(format!(
            "HTTP operation '{id}' with method {method} {expectation}"
        )));
    }

    let status = status_code(http);
    let expect_output_payload = status != 204 && status != 304;
    let mut output_payload = false;
    for (name, member) in io_members(ast, op.output.as_ref().map(|r| r.target.as_str()))? {
        if member.traits.has(HTTP_PAYLOAD) {
            if output_payload {
                return Err(GenerateError::Unsupported(format!(
                    "More than one @httpPayload specified in output for operation {id}"
                )));
            }
            output_payload = true;
        } else if !member.traits.has(HTTP_RESPONSE_CODE) && !member.traits.has(HTTP_HEADER) {
            return Err(GenerateError::Unsupported(format!(
                "An output with no HTTP binding is present in operation {id}: {name}"
            )));
        }
    }
    if output_payload != expect_output_payload {
        let expectation = if output_payload {
            "expects no output payload, but one was specified"
        } else {
            "expects an output payload, but none is specified"
        };
        return Err(GenerateError::Unsupported(format!(
            "HTTP operation '{id}' with code {status} {expectation}"
        )));
    }
    Ok(())
}

/// Members of an operation's input or output structure. A missing or
/// `Unit` target has none.
fn io_members<'a>(ast: &'a Ast, target: Option<&str>) -> Result<Vec<(&'a str, &'a Member)>, GenerateError> {
    let Some(target) = target else {
        return Ok(Vec::new());
    };
    if target == prelude_id("Unit") {
        return Ok(Vec::new());
    }
    let shape = ast
        .get_shape(target)
        .ok_or_else(|| GenerateError::UndefinedShape(target.to_string()))?;
    Ok(shape
        .members()
        .map(|members| members.iter().map(|(k, m)| (k.as_str(), m)).collect())
        .unwrap_or_default())
}

fn status_code(http: &Value) -> i64 {
    http.get("code").and_then(Value::as_i64).unwrap_or(DEFAULT_STATUS)
}

// ============================================================================
// TYPES
// ============================================================================

fn simple_type(t: SimpleType) -> &'static str {
    match t {
        SimpleType::Blob => "Bytes",
        SimpleType::Boolean => "Bool",
        SimpleType::Document => "Document",
        SimpleType::String => "String",
        SimpleType::Byte => "Int8",
        SimpleType::Short => "Int16",
        SimpleType::Integer => "Int32",
        SimpleType::Long => "Int64",
        SimpleType::Float => "Float32",
        SimpleType::Double => "Float64",
        // lossy for bigInteger
        SimpleType::BigInteger | SimpleType::BigDecimal => "Decimal",
        SimpleType::Timestamp => "Timestamp",
    }
}

/// SADL type name for a member target.
fn type_ref(target: &str) -> String {
    let name = strip_namespace(target);
    if in_prelude(target) {
        let base = name.strip_prefix("Primitive").unwrap_or(name);
        if let Some(t) = SimpleType::from_keyword(&uncapitalize(base)) {
            return simple_type(t).to_string();
        }
    }
    name.to_string()
}

fn requires_document_type(ast: &Ast) -> bool {
    let document = prelude_id("Document");
    ast.shapes.values().any(|shape| {
        matches!(shape.kind, ShapeKind::Simple(SimpleType::Document)) || shape.references().contains(&document.as_str())
    })
}

fn annotation_string(opts: &[String]) -> String {
    if opts.is_empty() {
        String::new()
    } else {
        format!(" ({})", opts.join(", "))
    }
}

// ============================================================================
// WRITER
// ============================================================================

struct SadlWriter<'a> {
    ast: &'a Ast,
    annotate: bool,
    output: String,
}

impl<'a> SadlWriter<'a> {
    fn new(ast: &'a Ast, annotate: bool) -> Self {
        Self {
            ast,
            annotate,
            output: String::new(),
        }
    }

    fn line(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn write(mut self, namespace: Option<&str>) -> Result<String, GenerateError> {
        let ast = self.ast;
        self.line("/* Generated from smithy source */");
        if let Some(ns) = namespace {
            self.line("");
            self.line(&format!("namespace {ns}"));
        }
        if requires_document_type(ast) {
            self.line("");
            self.line("type Document Struct //SADL has no built-in Document type");
        }

        // Operations first; their input and output structures are folded
        // into the http block and not written separately.
        let mut emitted: FxHashSet<&str> = FxHashSet::default();
        for (id, shape) in ast.shapes.iter() {
            if let ShapeKind::Operation(op) = &shape.kind {
                self.write_operation(id, shape, op)?;
                emitted.insert(id.as_str());
                emitted.extend(op.input.iter().chain(&op.output).map(|r| r.target.as_str()));
            }
        }
        for (id, shape) in ast.shapes.iter() {
            if !emitted.contains(id.as_str()) {
                self.write_shape(id, shape);
            }
        }
        for shape in ast.shapes.values() {
            if let (ShapeKind::Operation(op), Some(examples)) = (&shape.kind, shape.traits.get_array(EXAMPLES)) {
                for example in examples {
                    self.write_example(op, example)?;
                }
            }
        }
        debug!(bytes = self.output.len(), "rendered SADL");
        Ok(self.output)
    }

    fn write_comment(&mut self, traits: &Traits) {
        if let Some(doc) = traits.get_str(DOCUMENTATION) {
            self.output.push_str(&format_comment("", "// ", doc, DOC_WRAP_COLUMN));
        }
    }

    fn annotations(&self, traits: &Traits) -> Vec<String> {
        let mut opts = Vec::new();
        for (id, value) in traits.iter() {
            match id.as_str() {
                REQUIRED => opts.push("required".to_string()),
                DEPRECATED if self.annotate => {
                    let message = field_str(value, "message").unwrap_or_default();
                    opts.push(format!("x_deprecated={}", quote(message)));
                }
                TIMESTAMP_FORMAT if self.annotate => {
                    opts.push(format!("x_timestampFormat={}", quote(value.as_str().unwrap_or_default())));
                }
                TAGS if self.annotate => {
                    opts.push(format!("x_tags={}", quote(&traits.get_string_array(TAGS).join(","))));
                }
                ERROR if self.annotate => opts.push("x_error".to_string()),
                HTTP_ERROR if self.annotate => opts.push(format!("x_httpError=\"{value}\"")),
                _ => {}
            }
        }
        opts
    }

    fn write_shape(&mut self, id: &str, shape: &Shape) {
        let name = strip_namespace(id);
        if matches!(
            shape.kind,
            ShapeKind::Service(_) | ShapeKind::Resource(_) | ShapeKind::Operation(_)
        ) {
            return;
        }
        self.line("");
        self.write_comment(&shape.traits);
        match &shape.kind {
            ShapeKind::Simple(t) => {
                let opts = simple_options(*t, &shape.traits);
                self.line(&format!("type {name} {}{}", simple_type(*t), annotation_string(&opts)));
            }
            ShapeKind::List { member } => self.write_collection(name, &shape.traits, member, ""),
            ShapeKind::Set { member } => self.write_collection(name, &shape.traits, member, " // set"),
            ShapeKind::Map { key, value } => {
                self.line(&format!("type {name} Map<{},{}>", type_ref(&key.target), type_ref(&value.target)));
            }
            ShapeKind::Structure { members } => {
                let opts = self.annotations(&shape.traits);
                self.line(&format!("type {name} Struct{} {{", annotation_string(&opts)));
                self.write_fields(members.iter());
                self.line("}");
            }
            ShapeKind::Union { members } => {
                self.line(&format!("type {name} Union {{"));
                self.write_fields(members.iter());
                self.line("}");
            }
            ShapeKind::Enum { members } | ShapeKind::IntEnum { members } => {
                self.line(&format!("type {name} Enum {{"));
                for member_name in members.keys() {
                    self.line(&format!("{INDENT}{member_name}"));
                }
                self.line("}");
            }
            ShapeKind::Service(_) | ShapeKind::Resource(_) | ShapeKind::Operation(_) => {}
        }
    }

    fn write_collection(&mut self, name: &str, traits: &Traits, member: &Member, clarifier: &str) {
        let mut opts = Vec::new();
        if let Some(length) = traits.get_object(LENGTH) {
            if let Some(min) = length.get("min") {
                opts.push(format!("minsize={min}"));
            }
            if let Some(max) = length.get("max") {
                opts.push(format!("maxsize={max}"));
            }
        }
        self.line(&format!(
            "type {name} List<{}>{}{clarifier}",
            type_ref(&member.target),
            annotation_string(&opts)
        ));
    }

    fn write_fields<'m>(&mut self, members: impl Iterator<Item = (&'m String, &'m Member)>) {
        for (name, member) in members {
            let opts = self.annotations(&member.traits);
            self.line(&format!(
                "{INDENT}{name} {}{}",
                type_ref(&member.target),
                annotation_string(&opts)
            ));
        }
    }

    fn write_operation(&mut self, id: &str, shape: &Shape, op: &OperationShape) -> Result<(), GenerateError> {
        let Some(http) = shape.traits.get(HTTP) else {
            return Ok(());
        };
        let ast = self.ast;
        let name = strip_namespace(id);
        self.line("");
        self.write_comment(&shape.traits);

        let method = field_str(http, "method").unwrap_or_default();
        let uri = field_str(http, "uri").unwrap_or_default();
        let mut opts = self.annotations(&shape.traits);
        opts.push(format!("operation={}", uncapitalize(name)));

        let input = match &op.input {
            Some(r) => Some(io_members(ast, Some(r.target.as_str()))?),
            None => None,
        };
        let query: Vec<String> = input
            .iter()
            .flatten()
            .filter_map(|(k, m)| m.traits.get_str(HTTP_QUERY).map(|q| format!("{q}={{{k}}}")))
            .collect();
        let path = if query.is_empty() {
            uri.to_string()
        } else {
            format!("{uri}?{}", query.join("&"))
        };
        self.line(&format!("http {method} {} ({}) {{", quote(&path), opts.join(", ")));

        if let Some(members) = &input {
            for (k, member) in members {
                let mut mopts = Vec::new();
                if member.traits.has(HTTP_PAYLOAD) || member.traits.has(HTTP_LABEL) {
                    mopts.push("required".to_string());
                } else if !member.traits.has(HTTP_QUERY) {
                    if let Some(header) = member.traits.get_str(HTTP_HEADER) {
                        mopts.push(format!("header={}", quote(header)));
                    }
                }
                self.line(&format!(
                    "{INDENT}{k} {}{}",
                    type_ref(&member.target),
                    annotation_string(&mopts)
                ));
            }
            self.line("");
        }

        let status = status_code(http);
        match &op.output {
            Some(r) => {
                self.line(&format!("{INDENT}expect {status} {{"));
                for (k, member) in io_members(ast, Some(r.target.as_str()))? {
                    let mut mopts = Vec::new();
                    if let Some(header) = member.traits.get_str(HTTP_HEADER) {
                        mopts.push(format!("header={}", quote(header)));
                    }
                    self.line(&format!(
                        "{INDENT}{INDENT}{k} {}{}",
                        type_ref(&member.target),
                        annotation_string(&mopts)
                    ));
                }
                self.line(&format!("{INDENT}}}"));
            }
            None => self.line(&format!("{INDENT}expect {status}")),
        }

        for error in &op.errors {
            let error_shape = ast
                .get_shape(&error.target)
                .ok_or_else(|| GenerateError::UndefinedShape(error.target.clone()))?;
            if let Some(code) = error_shape.traits.get_i64(HTTP_ERROR) {
                self.line(&format!("{INDENT}except {code} {}", strip_namespace(&error.target)));
            }
        }
        self.line("}");
        Ok(())
    }

    fn write_example(&mut self, op: &OperationShape, example: &Value) -> Result<(), GenerateError> {
        let title = field_str(example, "title").unwrap_or_default();
        if let (Some(input), Some(r)) = (example.get("input"), &op.input) {
            self.write_example_value(strip_namespace(&r.target), title, input)?;
        }
        if let Some(error) = example.get("error") {
            let shape_id = field_str(error, "shapeId").unwrap_or_default();
            let content = error.get("content").cloned().unwrap_or(Value::Null);
            self.write_example_value(strip_namespace(shape_id), title, &content)?;
        } else if let (Some(output), Some(r)) = (example.get("output"), &op.output) {
            self.write_example_value(strip_namespace(&r.target), title, output)?;
        }
        Ok(())
    }

    fn write_example_value(&mut self, type_name: &str, title: &str, value: &Value) -> Result<(), GenerateError> {
        let pretty = serde_json::to_string_pretty(value)?;
        let _ = write!(self.output, "\nexample {type_name} (name={title}) {pretty}\n");
        Ok(())
    }
}

/// Constraint annotations for simple shapes.
fn simple_options(t: SimpleType, traits: &Traits) -> Vec<String> {
    let mut opts = Vec::new();
    if t.is_numeric() {
        if let Some(range) = traits.get_object(RANGE) {
            if let Some(min) = range.get("min") {
                opts.push(format!("min={min}"));
            }
            if let Some(max) = range.get("max") {
                opts.push(format!("max={max}"));
            }
        }
    } else if t == SimpleType::String {
        if let Some(pattern) = traits.get_str(PATTERN) {
            opts.push(format!("pattern={}", quote(pattern)));
        }
    }
    opts
}
