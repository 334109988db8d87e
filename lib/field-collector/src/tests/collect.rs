use std::error::Error;

use crate::{
    collect::CollectFieldsOptions,
    directives::values::VariableValues,
    tests::testkit::{collect_for_type, collect_root, init_logger},
};

#[test]
fn merges_fields_by_response_key() -> Result<(), Box<dyn Error>> {
    init_logger();
    let result = collect_root(
        r#"
        {
          a
          me { id }
          b
          me { name }
        }
        "#,
        &VariableValues::new(),
        CollectFieldsOptions::default(),
    )?;

    insta::assert_snapshot!(result, @r"
    fields {
      a <- base
      me <- base base
      b <- base
    }
    ");
    Ok(())
}

#[test]
fn aliases_are_separate_keys() -> Result<(), Box<dyn Error>> {
    init_logger();
    let result = collect_root(
        r#"
        {
          first: a
          second: a
          a
          first: a
        }
        "#,
        &VariableValues::new(),
        CollectFieldsOptions::default(),
    )?;

    insta::assert_snapshot!(result, @r"
    fields {
      first: a <- base base
      second: a <- base
      a <- base
    }
    ");
    Ok(())
}

#[test]
fn collection_is_deterministic() -> Result<(), Box<dyn Error>> {
    init_logger();
    let operation = r#"
      {
        c
        ... @defer(label: "D") { b a }
        a
        ... on Query { me { id } }
      }
    "#;

    let first = collect_root(
        operation,
        &VariableValues::new(),
        CollectFieldsOptions::default(),
    )?;
    let second = collect_root(
        operation,
        &VariableValues::new(),
        CollectFieldsOptions::default(),
    )?;

    assert_eq!(first, second);
    insta::assert_snapshot!(first, @r#"
    fields {
      c <- base
      a <- defer(D) base
      me <- base
    }
    deferred [defer(D)] {
      b <- defer(D)
    }
    defer usages {
      defer(D) in base
    }
    "#);
    Ok(())
}

#[test]
fn inline_fragments_on_root_type() -> Result<(), Box<dyn Error>> {
    init_logger();
    let result = collect_root(
        r#"
        {
          ... on Query { a }
          ... { b }
          ... on Mutation { like(id: 1) }
          ... on Unknown { c }
        }
        "#,
        &VariableValues::new(),
        CollectFieldsOptions::default(),
    )?;

    insta::assert_snapshot!(result, @r"
    fields {
      a <- base
      b <- base
    }
    ");
    Ok(())
}

#[test]
fn abstract_type_conditions_follow_runtime_type() -> Result<(), Box<dyn Error>> {
    init_logger();
    let operation = r#"
      {
        name
        ... on Character { friends { name } }
        ... on Droid { primaryFunction }
        ... on Node { id }
        ... on SearchResult {
          ... on Human { height }
        }
      }
    "#;

    insta::assert_snapshot!(collect_for_type(operation, "Human")?, @r"
    fields {
      name <- base
      friends <- base
      id <- base
      height <- base
    }
    ");

    insta::assert_snapshot!(collect_for_type(operation, "Droid")?, @r"
    fields {
      name <- base
      friends <- base
      primaryFunction <- base
      id <- base
    }
    ");
    Ok(())
}

#[test]
fn typename_is_collected_like_any_field() -> Result<(), Box<dyn Error>> {
    init_logger();
    let result = collect_root(
        r#"
        {
          __typename
          kind: __typename
          a
        }
        "#,
        &VariableValues::new(),
        CollectFieldsOptions::default(),
    )?;

    insta::assert_snapshot!(result, @r"
    fields {
      __typename <- base
      kind: __typename <- base
      a <- base
    }
    ");
    Ok(())
}
