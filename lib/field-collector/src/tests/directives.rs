use std::error::Error;

use crate::{
    collect::CollectFieldsOptions,
    directives::{defer_values, should_include, DeferValues},
    tests::testkit::{collect_root, init_logger, test_schema, variables},
};

#[test]
fn include_and_skip_with_variables() -> Result<(), Box<dyn Error>> {
    init_logger();
    let result = collect_root(
        r#"
        query ($yes: Boolean!, $no: Boolean!) {
          a @include(if: $yes)
          b @include(if: $no)
          c @skip(if: $no) @include(if: $yes)
          me @skip(if: $yes) @include(if: $yes) { id }
        }
        "#,
        &variables(r#"{ "yes": true, "no": false }"#),
        CollectFieldsOptions::default(),
    )?;

    insta::assert_snapshot!(result, @r"
    fields {
      a <- base
      c <- base
    }
    ");
    Ok(())
}

#[test]
fn skip_wins_over_include() -> Result<(), Box<dyn Error>> {
    init_logger();
    let result = collect_root(
        r#"
        {
          a @skip(if: true) @include(if: true)
          b @include(if: true) @skip(if: false)
          ... @skip(if: true) { c }
          ... on Query @include(if: false) { me { id } }
        }
        "#,
        &variables("{}"),
        CollectFieldsOptions::default(),
    )?;

    insta::assert_snapshot!(result, @r"
    fields {
      b <- base
    }
    ");
    Ok(())
}

#[test]
fn unresolved_condition_keeps_selection() -> Result<(), Box<dyn Error>> {
    init_logger();
    let result = collect_root(
        r#"
        query ($maybe: Boolean) {
          a @include(if: $maybe)
          b @skip(if: $maybe)
        }
        "#,
        &variables("{}"),
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
fn skipped_fragment_spread_is_not_marked_visited() -> Result<(), Box<dyn Error>> {
    init_logger();
    let result = collect_root(
        r#"
        {
          ...F @skip(if: true)
          ...F
        }

        fragment F on Query { a }
        "#,
        &variables("{}"),
        CollectFieldsOptions::default(),
    )?;

    insta::assert_snapshot!(result, @r"
    fields {
      a <- base
    }
    ");
    Ok(())
}

#[test]
fn defer_arguments() -> Result<(), Box<dyn Error>> {
    let schema = test_schema();
    let document = crate::utils::parsing::parse_operation(
        r#"
        query ($off: Boolean!) {
          ... @defer { a }
          ... @defer(label: "L") { b }
          ... @defer(if: $off, label: "M") { c }
          ... @defer(if: false) { c }
        }
        "#,
    )?;
    let operation = crate::operation::ExecutableOperation::from_document(&document, None)?;
    let variables = variables(r#"{ "off": false }"#);

    let found: Vec<Option<DeferValues>> = operation
        .selection_set
        .items
        .iter()
        .map(|selection| match selection {
            graphql_parser::query::Selection::InlineFragment(fragment) => defer_values(
                &schema,
                operation.kind,
                &variables,
                &fragment.directives,
            ),
            _ => None,
        })
        .collect();

    assert_eq!(
        found,
        vec![
            Some(DeferValues { label: None }),
            Some(DeferValues {
                label: Some("L".to_string())
            }),
            None,
            None,
        ]
    );
    assert!(should_include(&schema, &variables, &[]));
    Ok(())
}
