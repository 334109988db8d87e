use std::error::Error;
use std::sync::Once;

use lazy_static::lazy_static;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    collect::{CollectFieldsOptions, FieldCollector},
    directives::values::VariableValues,
    operation::ExecutableOperation,
    plan::{build_field_plan, FieldPlan},
    state::schema_state::SchemaState,
    utils::parsing::{parse_operation, parse_schema},
};

pub const TEST_SCHEMA: &str = r#"
  type Query {
    a: String
    b: String
    c: String
    hero: Character
    me: User
    node(id: ID!): Node
    search(term: String): [SearchResult!]!
  }

  type Mutation {
    like(id: ID!): Boolean
  }

  type Subscription {
    ticks: Int
  }

  interface Node {
    id: ID!
  }

  interface Character {
    name: String
    friends: [Character]
  }

  type Human implements Character & Node {
    id: ID!
    name: String
    friends: [Character]
    height: Float
  }

  type Droid implements Character & Node {
    id: ID!
    name: String
    friends: [Character]
    primaryFunction: String
  }

  type User implements Node {
    id: ID!
    name: String
    profile: Profile
  }

  type Profile {
    bio: String
    avatar: String
  }

  union SearchResult = Human | Droid | User
"#;

fn init_test_logger_internal() {
    let tree_layer = tracing_tree::HierarchicalLayer::new(2)
        .with_bracketed_fields(true)
        .with_deferred_spans(false)
        .with_wraparound(25)
        .with_indent_lines(true)
        .with_timer(tracing_tree::time::Uptime::default())
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_targets(false);

    tracing_subscriber::registry()
        .with(tree_layer)
        .with(EnvFilter::from_default_env())
        .init();
}

lazy_static! {
    static ref TRACING_INIT: Once = Once::new();
}

pub fn init_logger() {
    TRACING_INIT.call_once(|| {
        init_test_logger_internal();
    });
}

pub fn test_schema() -> SchemaState {
    SchemaState::new(&parse_schema(TEST_SCHEMA).expect("test schema should parse"))
}

pub fn variables(json: &str) -> VariableValues {
    sonic_rs::from_str(json).expect("variables should be a JSON object")
}

/// Collects the root selection set of `operation` and renders the result.
pub fn collect_root(
    operation: &str,
    variables: &VariableValues,
    options: CollectFieldsOptions,
) -> Result<String, Box<dyn Error>> {
    let schema = test_schema();
    let document = parse_operation(operation)?;
    let operation = ExecutableOperation::from_document(&document, None)?;
    let root_type = schema
        .root_type(operation.kind)
        .ok_or("operation kind has no root type")?;

    let result = FieldCollector::new(&schema, operation.fragments(), variables, &operation)
        .with_options(options)
        .collect_fields(root_type);

    Ok(result.to_string())
}

pub fn field_plan(
    operation: &str,
    variables: &VariableValues,
    options: CollectFieldsOptions,
) -> Result<FieldPlan, Box<dyn Error>> {
    let schema = test_schema();
    let document = parse_operation(operation)?;
    let operation = ExecutableOperation::from_document(&document, None)?;

    Ok(build_field_plan(&schema, &operation, variables, options)?)
}

/// Collects the root selection set of `operation` as if it was the
/// selection set of an object of `runtime_type`.
pub fn collect_for_type(operation: &str, runtime_type: &str) -> Result<String, Box<dyn Error>> {
    let schema = test_schema();
    let document = parse_operation(operation)?;
    let operation = ExecutableOperation::from_document(&document, None)?;

    let result = crate::collect::collect_fields(
        &schema,
        operation.fragments(),
        &VariableValues::new(),
        runtime_type,
        &operation,
    );

    Ok(result.to_string())
}
