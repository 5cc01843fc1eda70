/// Tests for parsing the schema files shipped in schemas/
use personagen::loader::SchemaLoader;
use personagen::models::FieldType;

#[test]
fn test_parse_default_schema() {
    let loader = SchemaLoader::new("schemas").unwrap();
    let schema = loader.load("default_schema").unwrap();

    let expected_fields = [
        "id",
        "first_name",
        "last_name",
        "age",
        "gender",
        "job_title",
        "bio",
        "visual_description",
    ];
    assert_eq!(schema.definition.field_names(), expected_fields);

    for field in expected_fields {
        assert!(
            schema.definition.get(field).unwrap().required,
            "field {field} should be required"
        );
    }

    let bio = schema.definition.get("bio").unwrap();
    let FieldType::String { max_length, .. } = &bio.field_type else {
        panic!("bio should be a string field");
    };
    assert_eq!(*max_length, Some(500));
    assert!(bio.characteristic_refs.contains(&"personality.hobbies".to_string()));
}

#[test]
fn test_parse_team_member_schema() {
    let loader = SchemaLoader::new("schemas").unwrap();
    let schema = loader.load("team_member").unwrap();

    // nested object
    let professional = schema.definition.get("professional").unwrap();
    let FieldType::Object { fields } = &professional.field_type else {
        panic!("professional should be an object field");
    };
    let nested = fields.as_ref().unwrap();
    assert_eq!(
        nested.field_names(),
        vec!["role", "years_experience", "education"]
    );
    assert!(!nested.get("education").unwrap().required);

    // array of objects with a constrained item field
    let skills = schema.definition.get("skills").unwrap();
    let FieldType::Array { item_spec } = &skills.field_type else {
        panic!("skills should be an array field");
    };
    let item = item_spec.as_ref().unwrap();
    let FieldType::Object { fields } = &item.field_type else {
        panic!("skills items should be objects");
    };
    let level = fields.as_ref().unwrap().get("level").unwrap();
    let FieldType::String { options, .. } = &level.field_type else {
        panic!("level should be a string field");
    };
    assert_eq!(options.as_ref().unwrap().len(), 3);

    // unconstrained array
    let tags = schema.definition.get("tags").unwrap();
    assert_eq!(tags.field_type, FieldType::Array { item_spec: None });
}

#[test]
fn test_list_shipped_schemas() {
    let loader = SchemaLoader::new("schemas").unwrap();
    let schemas = loader.list_schemas().unwrap();

    assert!(schemas.contains(&"default_schema".to_string()));
    assert!(schemas.contains(&"team_member".to_string()));
    // the taxonomy is not a schema
    assert!(!schemas.contains(&"characteristics".to_string()));
}

#[test]
fn test_shipped_characteristic_refs_all_resolve() {
    let loader = SchemaLoader::new("schemas").unwrap();
    let taxonomy = loader.load_characteristics().unwrap();

    for id in loader.list_schemas().unwrap() {
        let schema = loader.load(&id).unwrap();
        loader
            .verify_characteristics(&schema, &taxonomy)
            .unwrap_or_else(|e| panic!("schema {id} has dangling characteristics: {e}"));
    }
}
