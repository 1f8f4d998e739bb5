#![deny(missing_docs)]

//! # Resolution Pipeline
//!
//! Drives one document through the resolver in a fixed phase order:
//!
//! 1. Option validation (`library` against the hooks' supported set).
//! 2. Case-insensitive duplicate model renaming, when enabled.
//! 3. Model construction, composites included.
//! 4. Inheritance fixup (inheritance mode only).
//! 5. Enum naming and reconciliation.
//! 6. Operation construction and tag bucketing.
//! 7. Security schemes.

use crate::config::GeneratorOptions;
use crate::diagnostics::DiagnosticKind;
use crate::error::AppResult;
use crate::ir::{GeneratorIr, HttpMethod, ModelMap, Operation};
use crate::oas::ref_utils::{extract_component_name, schema_ref};
use crate::oas::{
    ApiDocument, RefOr, ShimHeader, ShimMediaType, ShimOperation, ShimParameter, ShimPathItem,
    ShimRequestBody, ShimResponse,
};
use crate::resolver::context::ResolutionContext;
use crate::resolver::enums::{name_model_enums, remove_inherited_enums};
use crate::resolver::fixup::fixup;
use crate::resolver::hooks::LanguageHooks;
use crate::resolver::model::build_model;
use crate::resolver::naming::generate_next_name;
use crate::resolver::operation::build_operation;
use crate::resolver::security::build_security;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::collections::HashSet;

/// Bucket of operations that declare no tag.
pub const DEFAULT_TAG: &str = "default";

/// Resolves documents with one set of options and hooks.
pub struct Generator<'h> {
    options: GeneratorOptions,
    hooks: &'h dyn LanguageHooks,
}

impl<'h> Generator<'h> {
    /// Creates a generator.
    pub fn new(options: GeneratorOptions, hooks: &'h dyn LanguageHooks) -> Self {
        Self { options, hooks }
    }

    /// Options in effect.
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Resolves `document` into the generator IR.
    ///
    /// Fails when the library option is not supported, an operation identifier
    /// cannot be built, or a security scheme cannot be expressed.
    pub fn resolve(&self, document: &ApiDocument) -> AppResult<GeneratorIr> {
        self.options
            .validate_library(&self.hooks.supported_libraries())?;

        let (document, renames) = if self.options.check_duplicated_model_name {
            rename_duplicate_models(document)
        } else {
            (Cow::Borrowed(document), Vec::new())
        };

        let ctx = ResolutionContext::new(&document, &self.options, self.hooks);
        for (old, new) in &renames {
            ctx.diagnose(
                DiagnosticKind::DuplicateModelName,
                old,
                format!("Model '{}' differs from another only by case; renamed to '{}'", old, new),
            );
        }

        tracing::info!(schemas = ctx.schemas().len(), "Building models");
        let mut models = build_models(&ctx);

        if self.options.supports_inheritance {
            tracing::info!("Linking model hierarchy");
            fixup(&ctx, &mut models);
        }

        for model in models.values_mut() {
            name_model_enums(self.hooks, model);
        }
        remove_inherited_enums(&mut models);

        tracing::info!(paths = document.paths.items.len(), "Building operations");
        let operations = build_operations(&ctx, &models)?;

        tracing::info!("Resolving security schemes");
        let security = build_security(&ctx)?;

        let diagnostics = ctx.take_diagnostics();
        tracing::info!(
            models = models.len(),
            operations = operations.values().map(Vec::len).sum::<usize>(),
            diagnostics = diagnostics.len(),
            "Resolution finished"
        );
        Ok(GeneratorIr {
            models,
            operations,
            security,
            diagnostics,
        })
    }
}

/// Resolves `document` with the given options and hooks.
pub fn resolve_document(
    document: &ApiDocument,
    options: &GeneratorOptions,
    hooks: &dyn LanguageHooks,
) -> AppResult<GeneratorIr> {
    Generator::new(options.clone(), hooks).resolve(document)
}

/// Builds every named model, then the synthesized composites whose names are still free.
pub(crate) fn build_models(ctx: &ResolutionContext<'_>) -> ModelMap {
    let mut models = ModelMap::new();
    let mut composites = Vec::new();
    for (name, schema) in ctx.schemas() {
        let built = build_model(ctx, name, schema);
        models.insert(name.clone(), built.model);
        composites.extend(built.composites);
    }
    for composite in composites {
        if models.contains_key(&composite.name) {
            tracing::debug!(model = %composite.name, "Composite name already taken; keeping existing model");
            continue;
        }
        models.insert(composite.name.clone(), composite);
    }
    models
}

fn build_operations(
    ctx: &ResolutionContext<'_>,
    models: &ModelMap,
) -> AppResult<IndexMap<String, Vec<Operation>>> {
    let hooks = ctx.hooks();
    let mut buckets: IndexMap<String, Vec<Operation>> = IndexMap::new();
    for (path, item) in &ctx.document().paths.items {
        for (method, declared) in path_operations(item) {
            let operation = build_operation(ctx, models, path, method, &item.parameters, declared)?;
            if operation.tags.is_empty() {
                add_to_bucket(ctx, &mut buckets, DEFAULT_TAG.to_string(), operation);
                continue;
            }
            for tag in &operation.tags {
                add_to_bucket(ctx, &mut buckets, hooks.sanitize_tag(tag), operation.clone());
            }
        }
    }
    Ok(buckets)
}

/// Appends `operation` to its bucket, suffixing an identifier already present there.
fn add_to_bucket(
    ctx: &ResolutionContext<'_>,
    buckets: &mut IndexMap<String, Vec<Operation>>,
    tag: String,
    mut operation: Operation,
) {
    let bucket = buckets.entry(tag).or_default();
    let taken = |id: &str| bucket.iter().any(|op| op.operation_id == id);
    if taken(&operation.operation_id) {
        let mut counter = 1;
        let mut candidate = format!("{}_{}", operation.operation_id, counter);
        while taken(&candidate) {
            counter += 1;
            candidate = format!("{}_{}", operation.operation_id, counter);
        }
        ctx.diagnose(
            DiagnosticKind::DuplicateOperationId,
            &format!("{} {}", operation.http_method, operation.path),
            format!(
                "Operation id '{}' already used in this tag; renamed to '{}'",
                operation.operation_id, candidate
            ),
        );
        operation.operation_id = candidate;
    }
    bucket.push(operation);
}

/// Declared operations of a path item, in method order.
fn path_operations(item: &ShimPathItem) -> impl Iterator<Item = (HttpMethod, &ShimOperation)> {
    [
        (HttpMethod::Get, &item.get),
        (HttpMethod::Put, &item.put),
        (HttpMethod::Post, &item.post),
        (HttpMethod::Delete, &item.delete),
        (HttpMethod::Options, &item.options),
        (HttpMethod::Head, &item.head),
        (HttpMethod::Patch, &item.patch),
        (HttpMethod::Trace, &item.trace),
    ]
    .into_iter()
    .filter_map(|(method, declared)| declared.as_ref().map(|op| (method, op)))
}

// --- Duplicate model names ---

/// Renames schemas whose names collide ignoring case and rewrites every `$ref` to them.
///
/// The first occurrence keeps its name; later ones take the next free name
/// (`pet` -> `pet2`). Returns the (possibly unchanged) document and the renames.
fn rename_duplicate_models(document: &ApiDocument) -> (Cow<'_, ApiDocument>, Vec<(String, String)>) {
    let schemas = &document.components.schemas;
    let mut taken: HashSet<String> = schemas.keys().map(|k| k.to_lowercase()).collect();
    let mut kept: HashSet<String> = HashSet::new();
    let mut renames: IndexMap<String, String> = IndexMap::new();

    for name in schemas.keys() {
        if kept.insert(name.to_lowercase()) {
            continue;
        }
        let mut candidate = generate_next_name(name);
        while taken.contains(&candidate.to_lowercase()) {
            candidate = generate_next_name(&candidate);
        }
        taken.insert(candidate.to_lowercase());
        kept.insert(candidate.to_lowercase());
        renames.insert(name.clone(), candidate);
    }

    if renames.is_empty() {
        return (Cow::Borrowed(document), Vec::new());
    }

    let mut renamed = document.clone();
    renamed.components.schemas = std::mem::take(&mut renamed.components.schemas)
        .into_iter()
        .map(|(name, schema)| match renames.get(&name) {
            Some(new) => (new.clone(), schema),
            None => (name, schema),
        })
        .collect();

    let self_uri = document.self_uri.clone();
    let mut rewrite = |reference: &mut String| {
        let Some(target) = extract_component_name(reference, self_uri.as_deref(), "schemas") else {
            return;
        };
        if let Some(new) = renames.get(&target) {
            *reference = schema_ref(new);
        }
    };
    rewrite_document_refs(&mut renamed, &mut rewrite);

    tracing::info!(count = renames.len(), "Renamed duplicate model names");
    (Cow::Owned(renamed), renames.into_iter().collect())
}

fn rewrite_document_refs(document: &mut ApiDocument, f: &mut dyn FnMut(&mut String)) {
    let components = &mut document.components;
    for schema in components.schemas.values_mut() {
        schema.visit_refs_mut(f);
    }
    for parameter in components.parameters.values_mut() {
        if let RefOr::Item(parameter) = parameter {
            rewrite_parameter(parameter, f);
        }
    }
    for body in components.request_bodies.values_mut() {
        if let RefOr::Item(body) = body {
            rewrite_request_body(body, f);
        }
    }
    for response in components.responses.values_mut() {
        if let RefOr::Item(response) = response {
            rewrite_response(response, f);
        }
    }
    for header in components.headers.values_mut() {
        if let RefOr::Item(header) = header {
            rewrite_header(header, f);
        }
    }

    for item in document.paths.items.values_mut() {
        for parameter in &mut item.parameters {
            if let RefOr::Item(parameter) = parameter {
                rewrite_parameter(parameter, f);
            }
        }
        let operations = [
            &mut item.get,
            &mut item.put,
            &mut item.post,
            &mut item.delete,
            &mut item.options,
            &mut item.head,
            &mut item.patch,
            &mut item.trace,
        ];
        for operation in operations.into_iter().flatten() {
            for parameter in &mut operation.parameters {
                if let RefOr::Item(parameter) = parameter {
                    rewrite_parameter(parameter, f);
                }
            }
            if let Some(RefOr::Item(body)) = &mut operation.request_body {
                rewrite_request_body(body, f);
            }
            for response in operation.responses.values_mut() {
                if let RefOr::Item(response) = response {
                    rewrite_response(response, f);
                }
            }
        }
    }
}

fn rewrite_media(media: &mut ShimMediaType, f: &mut dyn FnMut(&mut String)) {
    if let Some(schema) = &mut media.schema {
        schema.visit_refs_mut(f);
    }
}

fn rewrite_parameter(parameter: &mut ShimParameter, f: &mut dyn FnMut(&mut String)) {
    if let Some(schema) = &mut parameter.schema {
        schema.visit_refs_mut(f);
    }
    for media in parameter.content.iter_mut().flat_map(|c| c.values_mut()) {
        rewrite_media(media, f);
    }
}

fn rewrite_request_body(body: &mut ShimRequestBody, f: &mut dyn FnMut(&mut String)) {
    for media in body.content.values_mut() {
        rewrite_media(media, f);
    }
}

fn rewrite_response(response: &mut ShimResponse, f: &mut dyn FnMut(&mut String)) {
    for header in response.headers.values_mut() {
        if let RefOr::Item(header) = header {
            rewrite_header(header, f);
        }
    }
    for media in response.content.values_mut() {
        rewrite_media(media, f);
    }
}

fn rewrite_header(header: &mut ShimHeader, f: &mut dyn FnMut(&mut String)) {
    if let Some(schema) = &mut header.schema {
        schema.visit_refs_mut(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::oas::parse_document;
    use crate::resolver::hooks::DefaultHooks;
    use pretty_assertions::assert_eq;

    struct LibraryHooks;

    impl LanguageHooks for LibraryHooks {
        fn supported_libraries(&self) -> Vec<String> {
            vec!["okhttp".to_string(), "feign".to_string()]
        }
    }

    const DUPLICATES: &str = r##"
openapi: 3.0.0
paths:
  /pets:
    get:
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema: { type: array, items: { $ref: "#/components/schemas/pet" } }
components:
  schemas:
    Pet:
      type: object
      properties: { name: { type: string } }
    pet:
      type: object
      properties: { owner: { $ref: "#/components/schemas/Pet" } }
    Holder:
      type: object
      properties: { lower: { $ref: "#/components/schemas/pet" } }
"##;

    #[test]
    fn test_duplicate_model_names_renamed() {
        let doc = parse_document(DUPLICATES).unwrap();
        let options = GeneratorOptions {
            check_duplicated_model_name: true,
            ..Default::default()
        };
        let hooks = DefaultHooks::default();
        let ir = resolve_document(&doc, &options, &hooks).unwrap();

        let names: Vec<&str> = ir.models.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Pet", "pet2", "Holder"]);
        assert_eq!(ir.models["pet2"].classname, "Pet2");
        assert_eq!(ir.models["pet2"].vars[0].datatype, "Pet");
        assert_eq!(ir.models["Holder"].vars[0].datatype, "Pet2");

        let list = ir.operation("petsGet").unwrap();
        assert_eq!(list.return_base_type.as_deref(), Some("Pet2"));
        assert_eq!(
            ir.diagnostics.of_kind(DiagnosticKind::DuplicateModelName).count(),
            1
        );
        assert!(!ir.diagnostics.contains(DiagnosticKind::UnresolvedReference));
    }

    #[test]
    fn test_duplicate_check_disabled_keeps_names() {
        let doc = parse_document(DUPLICATES).unwrap();
        let hooks = DefaultHooks::default();
        let ir = resolve_document(&doc, &GeneratorOptions::default(), &hooks).unwrap();
        assert!(ir.models.contains_key("pet"));
        assert!(!ir.diagnostics.contains(DiagnosticKind::DuplicateModelName));
    }

    #[test]
    fn test_operations_bucketed_by_tag() {
        let doc = parse_document(
            r##"
openapi: 3.0.0
paths:
  /pets:
    get:
      tags: [pet store]
      operationId: list
      responses: {}
    post:
      tags: [pet store]
      operationId: list
      responses: {}
  /health:
    get:
      operationId: list
      responses: {}
    head:
      operationId: list
      responses: {}
"##,
        )
        .unwrap();
        let hooks = DefaultHooks::default();
        let ir = resolve_document(&doc, &GeneratorOptions::default(), &hooks).unwrap();

        let tags: Vec<&str> = ir.operations.keys().map(String::as_str).collect();
        assert_eq!(tags, vec!["PetStore", "default"]);

        let ids: Vec<&str> = ir.operations["PetStore"]
            .iter()
            .map(|op| op.operation_id.as_str())
            .collect();
        assert_eq!(ids, vec!["list", "list_1"]);
        let ids: Vec<&str> = ir.operations["default"]
            .iter()
            .map(|op| op.operation_id.as_str())
            .collect();
        assert_eq!(ids, vec!["list", "list_1"]);
        assert_eq!(
            ir.diagnostics.of_kind(DiagnosticKind::DuplicateOperationId).count(),
            2
        );
        assert_eq!(ir.operation_count(), 4);
    }

    #[test]
    fn test_library_validation() {
        let doc = parse_document("openapi: 3.0.0\npaths: {}\n").unwrap();
        let mut options = GeneratorOptions {
            library: Some("retrofit".to_string()),
            ..Default::default()
        };
        let result = Generator::new(options.clone(), &LibraryHooks).resolve(&doc);
        assert!(matches!(result, Err(AppError::Config(_))));

        options.library = Some("feign".to_string());
        assert!(Generator::new(options, &LibraryHooks).resolve(&doc).is_ok());
    }

    #[test]
    fn test_inheritance_enum_reconciliation() {
        let doc = parse_document(
            r##"
openapi: 3.0.0
paths: {}
components:
  schemas:
    Animal:
      type: object
      discriminator: { propertyName: kind }
      properties:
        kind: { type: string }
        size: { type: string, enum: [size-small, size-large] }
    Cat:
      allOf:
        - $ref: "#/components/schemas/Animal"
        - type: object
          properties:
            size: { type: string, enum: [size-small, size-large] }
            lives: { type: integer }
"##,
        )
        .unwrap();
        let options = GeneratorOptions {
            supports_inheritance: true,
            ..Default::default()
        };
        let hooks = DefaultHooks::default();
        let ir = Generator::new(options, &hooks).resolve(&doc).unwrap();

        let animal = &ir.models["Animal"];
        assert_eq!(animal.child_names(), vec!["Cat"]);
        let size = animal.var("size").unwrap();
        let names: Vec<&str> = size
            .allowable_values
            .as_ref()
            .unwrap()
            .enum_vars
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(names, vec!["small", "large"]);

        let cat = &ir.models["Cat"];
        assert_eq!(cat.parent.as_deref(), Some("Animal"));
        assert!(cat.var("size").is_none());
        assert!(cat.var("lives").is_some());
    }

    #[test]
    fn test_operation_discriminator_from_linked_model() {
        let doc = parse_document(
            r##"
openapi: 3.0.0
paths:
  /cats/{id}:
    get:
      operationId: getCat
      parameters:
        - { name: id, in: path, schema: { type: string } }
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema: { $ref: "#/components/schemas/Cat" }
components:
  schemas:
    Animal:
      type: object
      discriminator: { propertyName: kind }
      properties:
        kind: { type: string }
    Cat:
      allOf:
        - $ref: "#/components/schemas/Animal"
        - type: object
          properties:
            lives: { type: integer }
"##,
        )
        .unwrap();
        let options = GeneratorOptions {
            supports_inheritance: true,
            ..Default::default()
        };
        let hooks = DefaultHooks::default();
        let ir = Generator::new(options, &hooks).resolve(&doc).unwrap();

        let cat = ir.models["Cat"].discriminator.as_ref().unwrap();
        assert_eq!(cat.property_name, "kind");
        let op = ir.operation("getCat").unwrap();
        assert_eq!(op.discriminator.as_ref().unwrap().property_name, "kind");
        assert!(op.has_reference);
    }
}
