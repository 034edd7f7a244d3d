// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! JSON front end for the CLI: deserializes a program description and feeds
//! it through [`ProgramBuilder`].
//!
//! Classes must be declared before they are referenced as superclasses;
//! everything else may be referenced forward. Array types are written with
//! a `[]` suffix (`A[]`, `A[][]`). Methods and fields are referenced as
//! `Class.name`.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

use crate::model::builder::ProgramBuilder;
use crate::model::method::{MethodId, VarId};
use crate::model::statement::CallKind;
use crate::model::ty::{FieldId, TypeId};
use crate::model::Program;

#[derive(Deserialize)]
struct ProgramDoc {
    classes: Vec<ClassDoc>,
    #[serde(default)]
    entry: Option<String>,
    #[serde(default)]
    implicit_entries: Vec<String>,
}

#[derive(Deserialize)]
struct ClassDoc {
    name: String,
    #[serde(rename = "super", default)]
    super_class: Option<String>,
    #[serde(default)]
    fields: Vec<FieldDoc>,
    #[serde(default)]
    methods: Vec<MethodDoc>,
    #[serde(default)]
    initializer: Option<String>,
}

#[derive(Deserialize)]
struct FieldDoc {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    r#static: bool,
}

#[derive(Deserialize)]
struct MethodDoc {
    name: String,
    #[serde(default)]
    r#static: bool,
    #[serde(default)]
    params: Vec<String>,
    #[serde(default)]
    locals: Vec<String>,
    #[serde(default)]
    returns: Vec<String>,
    #[serde(default)]
    body: Vec<StmtDoc>,
}

#[derive(Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
enum StmtDoc {
    Alloc {
        var: String,
        #[serde(rename = "type")]
        ty: String,
    },
    Assign {
        from: String,
        to: String,
    },
    Cast {
        from: String,
        to: String,
        #[serde(rename = "type")]
        ty: String,
    },
    LoadField {
        to: String,
        base: String,
        field: String,
    },
    StoreField {
        base: String,
        field: String,
        from: String,
    },
    LoadArray {
        to: String,
        base: String,
    },
    StoreArray {
        base: String,
        from: String,
    },
    LoadStatic {
        to: String,
        field: String,
    },
    StoreStatic {
        field: String,
        from: String,
    },
    Call {
        kind: String,
        callee: String,
        #[serde(default)]
        recv: Option<String>,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        result: Option<String>,
    },
}

#[derive(Debug)]
pub enum LoadError {
    Parse(serde_json::Error),
    Model(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Parse(e) => write!(f, "malformed program description: {e}"),
            LoadError::Model(msg) => write!(f, "inconsistent program model: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Parse(e)
    }
}

fn model_err<T>(msg: String) -> Result<T, LoadError> {
    Err(LoadError::Model(msg))
}

struct Resolver {
    classes: HashMap<String, TypeId>,
    methods: HashMap<String, MethodId>,
    fields: HashMap<String, FieldId>,
}

impl Resolver {
    fn resolve_type(&self, builder: &mut ProgramBuilder, name: &str) -> Result<TypeId, LoadError> {
        if let Some(element) = name.strip_suffix("[]") {
            let element = self.resolve_type(builder, element)?;
            return Ok(builder.array_type(element));
        }
        match self.classes.get(name) {
            Some(&ty) => Ok(ty),
            None => model_err(format!("unknown class {name}")),
        }
    }

    fn resolve_method(&self, name: &str) -> Result<MethodId, LoadError> {
        match self.methods.get(name) {
            Some(&m) => Ok(m),
            None => model_err(format!("unknown method {name}")),
        }
    }

    fn resolve_field(&self, name: &str) -> Result<FieldId, LoadError> {
        match self.fields.get(name) {
            Some(&f) => Ok(f),
            None => model_err(format!("unknown field {name}")),
        }
    }
}

fn resolve_var(vars: &HashMap<String, VarId>, method: &str, name: &str) -> Result<VarId, LoadError> {
    match vars.get(name) {
        Some(&v) => Ok(v),
        None => model_err(format!("unknown variable {name} in {method}")),
    }
}

fn parse_call_kind(kind: &str) -> Result<CallKind, LoadError> {
    match kind {
        "static" => Ok(CallKind::Static),
        "virtual" => Ok(CallKind::Virtual),
        "interface" => Ok(CallKind::Interface),
        "special" => Ok(CallKind::Special),
        _ => model_err(format!("unknown call kind {kind}")),
    }
}

/// Parses a JSON program description into a finished [`Program`].
pub fn load_program(text: &str) -> Result<Program, LoadError> {
    let doc: ProgramDoc = serde_json::from_str(text)?;
    let mut builder = ProgramBuilder::new();
    let mut resolver = Resolver {
        classes: HashMap::new(),
        methods: HashMap::new(),
        fields: HashMap::new(),
    };

    // First pass: declare classes, fields and method signatures, so bodies
    // may reference them in any order.
    for class_doc in &doc.classes {
        let super_class = match &class_doc.super_class {
            Some(name) => match resolver.classes.get(name) {
                Some(&ty) => Some(ty),
                None => {
                    return model_err(format!(
                        "superclass {name} of {} is not declared before it",
                        class_doc.name
                    ))
                }
            },
            None => None,
        };
        let class = builder.add_class(&class_doc.name, super_class);
        resolver.classes.insert(class_doc.name.clone(), class);
    }
    for class_doc in &doc.classes {
        let class = resolver.classes[&class_doc.name];
        for field_doc in &class_doc.fields {
            let ty = resolver.resolve_type(&mut builder, &field_doc.ty)?;
            let field = if field_doc.r#static {
                builder.add_static_field(class, &field_doc.name, ty)
            } else {
                builder.add_field(class, &field_doc.name, ty)
            };
            resolver
                .fields
                .insert(format!("{}.{}", class_doc.name, field_doc.name), field);
        }
        for method_doc in &class_doc.methods {
            let method = if method_doc.r#static {
                builder.add_static_method(class, &method_doc.name)
            } else {
                builder.add_method(class, &method_doc.name)
            };
            resolver
                .methods
                .insert(format!("{}.{}", class_doc.name, method_doc.name), method);
        }
    }

    // Second pass: initializers, variables and statement bodies.
    for class_doc in &doc.classes {
        let class = resolver.classes[&class_doc.name];
        if let Some(initializer) = &class_doc.initializer {
            let clinit = resolver.resolve_method(&format!("{}.{}", class_doc.name, initializer))?;
            builder.set_class_initializer(class, clinit);
        }
        for method_doc in &class_doc.methods {
            let qualified = format!("{}.{}", class_doc.name, method_doc.name);
            let method = resolver.methods[&qualified];
            let mut vars: HashMap<String, VarId> = HashMap::new();
            if !method_doc.r#static {
                // The implicit receiver is addressable as `this`.
                let program = builder.program_ref();
                if let Some(this_var) = program.method(method).this_var {
                    vars.insert("this".to_string(), this_var);
                }
            }
            for param in &method_doc.params {
                vars.insert(param.clone(), builder.add_param(method, param));
            }
            for local in &method_doc.locals {
                vars.insert(local.clone(), builder.add_local(method, local));
            }
            for ret in &method_doc.returns {
                let var = resolve_var(&vars, &qualified, ret)?;
                builder.add_return(method, var);
            }
            for stmt in &method_doc.body {
                build_statement(&mut builder, &resolver, &vars, &qualified, method, stmt)?;
            }
        }
    }

    if let Some(entry) = &doc.entry {
        let method = resolver.resolve_method(entry)?;
        builder.set_entry(method);
    }
    for entry in &doc.implicit_entries {
        let method = resolver.resolve_method(entry)?;
        builder.add_implicit_entry(method);
    }

    Ok(builder.finish())
}

fn build_statement(
    builder: &mut ProgramBuilder,
    resolver: &Resolver,
    vars: &HashMap<String, VarId>,
    qualified: &str,
    method: MethodId,
    stmt: &StmtDoc,
) -> Result<(), LoadError> {
    match stmt {
        StmtDoc::Alloc { var, ty } => {
            let var = resolve_var(vars, qualified, var)?;
            let ty = resolver.resolve_type(builder, ty)?;
            builder.add_alloc(method, var, ty);
        }
        StmtDoc::Assign { from, to } => {
            let from = resolve_var(vars, qualified, from)?;
            let to = resolve_var(vars, qualified, to)?;
            builder.add_assign(method, from, to);
        }
        StmtDoc::Cast { from, to, ty } => {
            let from = resolve_var(vars, qualified, from)?;
            let to = resolve_var(vars, qualified, to)?;
            let ty = resolver.resolve_type(builder, ty)?;
            builder.add_cast(method, from, to, ty);
        }
        StmtDoc::LoadField { to, base, field } => {
            let to = resolve_var(vars, qualified, to)?;
            let base = resolve_var(vars, qualified, base)?;
            let field = resolver.resolve_field(field)?;
            builder.add_instance_load(method, to, base, field);
        }
        StmtDoc::StoreField { base, field, from } => {
            let base = resolve_var(vars, qualified, base)?;
            let field = resolver.resolve_field(field)?;
            let from = resolve_var(vars, qualified, from)?;
            builder.add_instance_store(method, base, field, from);
        }
        StmtDoc::LoadArray { to, base } => {
            let to = resolve_var(vars, qualified, to)?;
            let base = resolve_var(vars, qualified, base)?;
            builder.add_array_load(method, to, base);
        }
        StmtDoc::StoreArray { base, from } => {
            let base = resolve_var(vars, qualified, base)?;
            let from = resolve_var(vars, qualified, from)?;
            builder.add_array_store(method, base, from);
        }
        StmtDoc::LoadStatic { to, field } => {
            let to = resolve_var(vars, qualified, to)?;
            let field = resolver.resolve_field(field)?;
            builder.add_static_load(method, to, field);
        }
        StmtDoc::StoreStatic { field, from } => {
            let field = resolver.resolve_field(field)?;
            let from = resolve_var(vars, qualified, from)?;
            builder.add_static_store(method, field, from);
        }
        StmtDoc::Call {
            kind,
            callee,
            recv,
            args,
            result,
        } => {
            let kind = parse_call_kind(kind)?;
            let callee = resolver.resolve_method(callee)?;
            let recv = match recv {
                Some(r) => Some(resolve_var(vars, qualified, r)?),
                None => None,
            };
            let args = args
                .iter()
                .map(|a| resolve_var(vars, qualified, a))
                .collect::<Result<Vec<_>, _>>()?;
            let result = match result {
                Some(r) => Some(resolve_var(vars, qualified, r)?),
                None => None,
            };
            builder.add_call(method, kind, callee, recv, args, result);
        }
    }
    Ok(())
}
