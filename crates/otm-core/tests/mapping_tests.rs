use otm_core::model::DataType;
use otm_core::{convert, processor};

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");
const MAPPING: &str = include_str!("fixtures/mapping.yaml");

#[test]
fn applies_mapping_configuration_end_to_end() {
    let options = processor::from_yaml(MAPPING).expect("should read mapping");
    assert_eq!(options.package_name, "io.petshop");

    let api = convert(PETSTORE, &options).expect("should convert petstore");
    let interface = &api.interfaces[0];

    // array response: the multi wrapper replaces the mapped collection,
    // the result wrapper wraps the response
    let list = &interface.endpoints[0];
    assert_eq!(
        list.responses["200"][0].response_type.type_name(),
        "ResponseEntity<Flux<PetResource>>"
    );

    // object response: single wrapper inside the result wrapper
    let create = &interface.endpoints[1];
    assert_eq!(
        create.responses["201"][0].response_type.type_name(),
        "ResponseEntity<Mono<PetResource>>"
    );
    // the request body is wrapped but never gets a result wrapper
    assert_eq!(
        create.request_bodies[0].data_type.type_name(),
        "Mono<PetResource>"
    );

    // the endpoint scoped `result: plain` shadows the global result wrapper
    let delete = &interface.endpoints[2];
    assert_eq!(
        delete.responses["204"][0].response_type.type_name(),
        "Mono<Void>"
    );
}

#[test]
fn mapped_collection_keeps_the_item_type() {
    let options = processor::from_yaml(
        r#"
openapi-processor-mapping: v2
options:
  package-name: io.petshop
map:
  types:
    - type: Pets => java.util.List
"#,
    )
    .expect("should read mapping");

    let api = convert(PETSTORE, &options).expect("should convert petstore");
    let list = &api.interfaces[0].endpoints[0];
    let response_type = &list.responses["200"][0].response_type;
    assert_eq!(response_type.type_name(), "List<Pet>");
    match response_type {
        DataType::MappedCollection(collection) => {
            assert_eq!(collection.pkg, "java.util");
            assert_eq!(collection.item.type_name(), "Pet");
        }
        other => panic!("unexpected type: {other:?}"),
    }

    // the item keeps its registry entry and usage count
    assert!(api.data_types.ref_count("Pet") >= 1);
}

#[test]
fn endpoint_type_mapping_overrides_global_rule() {
    let options = processor::from_yaml(
        r#"
openapi-processor-mapping: v2
map:
  types:
    - type: Error => io.pkg.GlobalError
  paths:
    /pets:
      post:
        types:
          - type: Error => io.pkg.ProblemDetail
"#,
    )
    .expect("should read mapping");

    let api = convert(PETSTORE, &options).expect("should convert petstore");
    let create = &api.interfaces[0].endpoints[1];
    assert_eq!(
        create.responses["400"][0].response_type.type_name(),
        "ProblemDetail"
    );
}

#[test]
fn ambiguous_mapping_aborts_the_conversion() {
    let options = processor::from_yaml(
        r#"
openapi-processor-mapping: v2
map:
  types:
    - type: Pet => io.pkg.A
    - type: Pet => io.pkg.B
"#,
    )
    .expect("should read mapping");

    let err = convert(PETSTORE, &options).expect_err("duplicate rules should fail");
    let message = err.to_string();
    assert!(message.contains("ambiguous"), "unexpected error: {message}");
    assert!(message.contains("Pet"));
}
