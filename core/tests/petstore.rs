use cdd_ir::diagnostics::DiagnosticKind;
use cdd_ir::ir::{CollectionFormat, ContainerKind, OAuthFlowKind, Parameter, SecurityKind};
use cdd_ir::{resolve_str, GeneratorIr, GeneratorOptions};
use pretty_assertions::assert_eq;

const PETSTORE: &str = r##"
openapi: 3.0.0
info:
  title: Petstore
  version: 1.0.0
security:
  - api_key: []
paths:
  /pets:
    parameters:
      - name: X-Trace
        in: header
        schema: { type: string }
    get:
      tags: [pets]
      operationId: listPets
      parameters:
        - name: limit
          in: query
          schema: { type: integer, default: 20 }
        - name: tags
          in: query
          style: pipeDelimited
          schema: { type: array, items: { type: string } }
        - name: filter
          in: query
          style: deepObject
          schema:
            type: object
            required: [color]
            properties:
              color: { type: string }
              size:
                type: object
                properties:
                  min: { type: integer }
      responses:
        "200":
          description: A list of pets
          content:
            application/json:
              schema: { $ref: "#/components/schemas/Pets" }
        default:
          description: Unexpected error
          content:
            application/json:
              schema: { $ref: "#/components/schemas/Error" }
    post:
      tags: [pets]
      operationId: createPet
      requestBody:
        required: true
        content:
          application/json: { schema: { $ref: "#/components/schemas/Pet" } }
          application/xml: { schema: { $ref: "#/components/schemas/Pet" } }
      responses:
        "201": { description: Created }
  /pets/{petId}:
    get:
      tags: [pets]
      parameters:
        - name: petId
          in: path
          schema: { $ref: "#/components/schemas/PetId" }
      responses:
        "200":
          description: A pet
          content:
            application/json:
              schema: { $ref: "#/components/schemas/Pet" }
  /owners:
    get:
      operationId: listOwners
      security: []
      responses:
        "200":
          description: Owners
          content:
            application/json:
              schema:
                type: array
                items: { $ref: "#/components/schemas/Owner" }
components:
  schemas:
    PetId:
      type: string
      format: uuid
    Pet:
      type: object
      required: [name]
      properties:
        id: { $ref: "#/components/schemas/PetId" }
        name: { type: string }
        status:
          type: string
          enum: [status-available, status-sold]
        tags:
          type: array
          items: { type: string }
        attributes:
          type: object
          additionalProperties: { type: integer }
    Pets:
      type: array
      items: { $ref: "#/components/schemas/Pet" }
    Error:
      type: object
      properties:
        code: { type: integer }
        message: { type: string }
  securitySchemes:
    petstore_auth:
      type: oauth2
      flows:
        authorizationCode:
          authorizationUrl: https://example.com/oauth/authorize
          tokenUrl: https://example.com/oauth/token
          scopes: { "read:pets": read your pets }
    api_key:
      type: apiKey
      name: api_key
      in: header
"##;

fn resolve() -> GeneratorIr {
    resolve_str(PETSTORE, &GeneratorOptions::default()).unwrap()
}

fn base_names(params: &[Parameter]) -> Vec<&str> {
    params.iter().map(|p| p.base_name.as_str()).collect()
}

#[test]
fn test_models() {
    let ir = resolve();
    let names: Vec<&str> = ir.models.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["PetId", "Pet", "Pets", "Error"]);

    assert!(ir.models["PetId"].is_alias);
    assert_eq!(ir.models["PetId"].data_type.as_deref(), Some("UUID"));

    let pet = &ir.models["Pet"];
    let vars: Vec<&str> = pet.vars.iter().map(|v| v.base_name.as_str()).collect();
    assert_eq!(vars, vec!["id", "name", "status", "tags", "attributes"]);
    assert_eq!(pet.var("id").unwrap().datatype, "UUID");
    assert!(pet.var("id").unwrap().flags.is_uuid);
    assert!(pet.var("name").unwrap().required);
    assert_eq!(pet.var("tags").unwrap().datatype, "array<string>");
    assert_eq!(pet.var("attributes").unwrap().datatype, "map<string, integer>");
    assert_eq!(pet.var("attributes").unwrap().container, ContainerKind::Map);
    assert_eq!(pet.required_properties().count(), 1);

    let status = pet.var("status").unwrap();
    assert_eq!(status.datatype_with_enum, "StatusEnum");
    let members: Vec<&str> = status
        .allowable_values
        .as_ref()
        .unwrap()
        .enum_vars
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(members, vec!["available", "sold"]);

    let pets = &ir.models["Pets"];
    assert!(pets.is_array_model);
    assert_eq!(pets.array_model_type.as_deref(), Some("Pet"));
    assert!(pets.imports.contains("Pet"));
}

#[test]
fn test_list_pets_parameters() {
    let ir = resolve();
    let tags: Vec<&str> = ir.operations.keys().map(String::as_str).collect();
    assert_eq!(tags, vec!["Pets", "default"]);

    let op = ir.operation("listPets").unwrap();
    assert_eq!(
        base_names(&op.query_params),
        vec!["limit", "tags", "filter[color]", "filter[size][min]"]
    );
    assert_eq!(base_names(&op.header_params), vec!["X-Trace"]);
    assert_eq!(base_names(&op.required_params), vec!["filter[color]"]);
    assert_eq!(
        base_names(&op.all_params),
        vec!["filter[color]", "limit", "tags", "filter[size][min]", "X-Trace"]
    );

    let tags = &op.query_params[1];
    assert_eq!(tags.container, ContainerKind::Array);
    assert_eq!(tags.collection_format, Some(CollectionFormat::Multi));
    assert_eq!(op.query_params[0].default_value.as_deref(), Some("20"));
    assert_eq!(op.security, vec!["api_key"]);
}

#[test]
fn test_list_pets_returns_array_model() {
    let ir = resolve();
    let op = ir.operation("listPets").unwrap();

    let codes: Vec<&str> = op.responses.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["200", "0"]);
    assert!(op.responses[0].is_default);
    assert!(op.responses[0].has_more);
    assert_eq!(op.return_type.as_deref(), Some("Pets"));
    assert_eq!(op.return_base_type.as_deref(), Some("Pets"));
    assert!(op.return_simple_type);
    assert!(!op.return_type_is_primitive);
    assert!(op.has_reference);
    assert_eq!(op.produces, vec!["application/json"]);
    assert!(op.imports.contains("Pets"));
    assert!(op.imports.contains("Error"));
}

#[test]
fn test_create_pet_shares_one_content() {
    let ir = resolve();
    let op = ir.operation("createPet").unwrap();

    assert_eq!(op.consumes, vec!["application/json", "application/xml"]);
    assert_eq!(op.contents.len(), 1);
    assert_eq!(
        op.contents[0].content_types,
        vec!["application/json", "application/xml"]
    );
    assert_eq!(base_names(&op.contents[0].parameters), vec!["body", "X-Trace"]);

    let body = op.body_param.as_ref().unwrap();
    assert!(body.is_model);
    assert!(body.required);
    assert_eq!(body.base_type.as_deref(), Some("Pet"));
    assert!(op.return_type.is_none());
    assert!(op.return_type_is_primitive);
}

#[test]
fn test_synthesized_operation_id_and_test_path() {
    let ir = resolve();
    let op = ir.operation("petsPetIdGet").unwrap();

    let pet_id = &op.path_params[0];
    assert!(pet_id.required);
    assert_eq!(pet_id.data_type, "UUID");
    assert_eq!(op.test_path, "/pets/38400000-8cf0-11bd-b23e-10b96e4ef00d");
    assert_eq!(op.return_base_type.as_deref(), Some("Pet"));
    assert!(ir
        .diagnostics
        .of_kind(DiagnosticKind::SynthesizedOperationId)
        .any(|d| d.location == "GET /pets/{petId}"));
}

#[test]
fn test_undefined_response_model_is_recoverable() {
    let ir = resolve();
    assert_eq!(ir.operations["default"].len(), 1);

    let op = ir.operation("listOwners").unwrap();
    assert_eq!(op.return_container, ContainerKind::Array);
    assert_eq!(op.return_base_type.as_deref(), Some("Owner"));
    assert!(!op.has_reference);
    assert!(op.security.is_empty());
    assert!(ir
        .diagnostics
        .of_kind(DiagnosticKind::UnresolvedReference)
        .any(|d| d.message.contains("Owner")));
}

#[test]
fn test_security_schemes() {
    let ir = resolve();
    let names: Vec<&str> = ir.security.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["api_key", "petstore_auth"]);

    let api_key = &ir.security[0];
    assert_eq!(api_key.kind, SecurityKind::ApiKey);
    assert!(api_key.is_key_in_header);
    assert!(api_key.has_more);

    let oauth = &ir.security[1];
    assert_eq!(oauth.flow, Some(OAuthFlowKind::AccessCode));
    assert_eq!(oauth.token_url.as_deref(), Some("https://example.com/oauth/token"));
    assert!(oauth.scopes.contains_key("read:pets"));
    assert!(!oauth.has_more);
}

#[test]
fn test_ir_serializes() {
    let ir = resolve();
    let json = serde_json::to_value(&ir).unwrap();
    assert!(json["models"]["Pet"]["vars"].is_array());
    assert_eq!(json["operations"]["Pets"][0]["operation_id"], "listPets");
}
