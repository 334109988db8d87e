use std::error::Error;

use crate::{
    ast::OperationKind,
    collect::CollectFieldsOptions,
    directives::values::VariableValues,
    operation::ExecutableOperation,
    plan::{build_field_plan, FieldPlanError},
    state::schema_state::SchemaState,
    tests::testkit::{field_plan, init_logger},
    utils::parsing::{parse_operation, parse_schema},
};

#[test]
fn plan_walks_abstract_types() -> Result<(), Box<dyn Error>> {
    init_logger();
    let plan = field_plan(
        r#"
        {
          hero {
            name
            ... on Droid @defer(label: "D") { primaryFunction }
          }
        }
        "#,
        &VariableValues::new(),
        CollectFieldsOptions::default(),
    )?;

    insta::assert_snapshot!(plan, @r#"
    FieldPlan(query on Query) {
      hero <- base {
        ... on Human {
          name <- base
        }
        ... on Droid {
          name <- base
          Defer([defer(D)]) {
            primaryFunction <- defer(D)
          }
          # defer(D) in base
        }
      }
    }
    "#);
    Ok(())
}

#[test]
fn plan_follows_deferred_subselections() -> Result<(), Box<dyn Error>> {
    init_logger();
    let plan = field_plan(
        r#"
        {
          me { id }
          ... @defer(label: "D") {
            me { name profile { bio } }
          }
        }
        "#,
        &VariableValues::new(),
        CollectFieldsOptions::default(),
    )?;

    insta::assert_snapshot!(plan, @r#"
    FieldPlan(query on Query) {
      me <- base defer(D) {
        id <- base
        Defer([defer(D)]) {
          name <- defer(D)
          profile <- defer(D) {
            bio <- defer(D)
          }
        }
      }
      # defer(D) in base
    }
    "#);
    Ok(())
}

#[test]
fn plan_over_lists_and_unions() -> Result<(), Box<dyn Error>> {
    init_logger();
    let plan = field_plan(
        r#"
        {
          search(term: "r2") {
            __typename
            ... on Node { id }
            ... on User { name }
          }
        }
        "#,
        &VariableValues::new(),
        CollectFieldsOptions::default(),
    )?;

    insta::assert_snapshot!(plan, @r"
    FieldPlan(query on Query) {
      search <- base {
        ... on Human {
          __typename <- base
          id <- base
        }
        ... on Droid {
          __typename <- base
          id <- base
        }
        ... on User {
          __typename <- base
          id <- base
          name <- base
        }
      }
    }
    ");
    Ok(())
}

#[test]
fn plan_serializes_to_json() -> Result<(), Box<dyn Error>> {
    let plan = field_plan(
        r#"{ a ... @defer(label: "D") { b } }"#,
        &VariableValues::new(),
        CollectFieldsOptions::default(),
    )?;

    let json = serde_json::to_value(&plan)?;
    assert_eq!(json["operation_kind"], "query");
    assert_eq!(json["root"]["fields"][0]["response_key"], "a");
    assert_eq!(json["root"]["deferred"][0]["targets"][0], "defer(D)");
    assert_eq!(json["root"]["deferred"][0]["should_initiate_defer"], true);
    assert_eq!(json["root"]["defer_usages"][0]["label"], "D");
    assert!(json["root"]["fields"][0].get("selections").is_none());
    Ok(())
}

#[test]
fn plan_errors() -> Result<(), Box<dyn Error>> {
    let schema = SchemaState::new(&parse_schema("type Query { a: String }")?);

    let document = parse_operation("mutation { like(id: 1) }")?;
    let operation = ExecutableOperation::from_document(&document, None)?;
    let error = build_field_plan(
        &schema,
        &operation,
        &VariableValues::new(),
        CollectFieldsOptions::default(),
    )
    .err();
    assert_eq!(
        error,
        Some(FieldPlanError::RootTypeNotFound {
            operation_kind: OperationKind::Mutation
        })
    );

    let document = parse_operation("{ a nope }")?;
    let operation = ExecutableOperation::from_document(&document, None)?;
    let error = build_field_plan(
        &schema,
        &operation,
        &VariableValues::new(),
        CollectFieldsOptions::default(),
    )
    .err();
    assert_eq!(
        error,
        Some(FieldPlanError::FieldNotFoundInType {
            field_name: "nope".to_string(),
            type_name: "Query".to_string(),
        })
    );
    Ok(())
}
