use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
};

use graphql_parser::schema as input;
use indexmap::IndexSet;
use tracing::instrument;

use crate::{
    ast::{OperationKind, Value, TYPENAME_FIELD},
    directives::{DEFER_DIRECTIVE, INCLUDE_DIRECTIVE, SKIP_DIRECTIVE},
};

pub type SchemaDocument = input::Document<'static, String>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeNode {
    Named(String),
    List(Box<TypeNode>),
    NonNull(Box<TypeNode>),
}

impl TypeNode {
    pub fn inner_type(&self) -> &str {
        match self {
            TypeNode::Named(name) => name,
            TypeNode::List(inner) | TypeNode::NonNull(inner) => inner.inner_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeNode::NonNull(_))
    }
}

impl Display for TypeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeNode::Named(name) => write!(f, "{}", name),
            TypeNode::List(inner) => write!(f, "[{}]", inner),
            TypeNode::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

impl From<&input::Type<'static, String>> for TypeNode {
    fn from(value: &input::Type<'static, String>) -> Self {
        match value {
            input::Type::NamedType(name) => TypeNode::Named(name.clone()),
            input::Type::ListType(inner) => TypeNode::List(Box::new(inner.as_ref().into())),
            input::Type::NonNullType(inner) => TypeNode::NonNull(Box::new(inner.as_ref().into())),
        }
    }
}

#[derive(Debug)]
pub struct SchemaField {
    pub name: String,
    pub field_type: TypeNode,
}

#[derive(Debug)]
pub struct SchemaObjectType {
    pub name: String,
    pub fields: HashMap<String, SchemaField>,
    pub implements_interfaces: Vec<String>,
}

#[derive(Debug)]
pub struct SchemaInterfaceType {
    pub name: String,
    pub fields: HashMap<String, SchemaField>,
    pub implements_interfaces: Vec<String>,
}

#[derive(Debug)]
pub struct SchemaUnionType {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Debug)]
pub enum SchemaDefinition {
    Object(SchemaObjectType),
    Interface(SchemaInterfaceType),
    Union(SchemaUnionType),
    Enum(String),
    Scalar(String),
    InputObject(String),
}

impl SchemaDefinition {
    pub fn name(&self) -> &str {
        match self {
            SchemaDefinition::Object(object_type) => &object_type.name,
            SchemaDefinition::Interface(interface_type) => &interface_type.name,
            SchemaDefinition::Union(union_type) => &union_type.name,
            SchemaDefinition::Enum(name)
            | SchemaDefinition::Scalar(name)
            | SchemaDefinition::InputObject(name) => name,
        }
    }

    pub fn is_abstract(&self) -> bool {
        matches!(
            self,
            SchemaDefinition::Interface(_) | SchemaDefinition::Union(_)
        )
    }

    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            SchemaDefinition::Object(_) | SchemaDefinition::Interface(_) | SchemaDefinition::Union(_)
        )
    }

    fn fields(&self) -> Option<&HashMap<String, SchemaField>> {
        match self {
            SchemaDefinition::Object(object_type) => Some(&object_type.fields),
            SchemaDefinition::Interface(interface_type) => Some(&interface_type.fields),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectiveArgument {
    pub name: String,
    pub value_type: TypeNode,
    pub default_value: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct DirectiveDefinition {
    pub name: String,
    pub arguments: Vec<DirectiveArgument>,
}

impl From<&input::DirectiveDefinition<'static, String>> for DirectiveDefinition {
    fn from(value: &input::DirectiveDefinition<'static, String>) -> Self {
        DirectiveDefinition {
            name: value.name.clone(),
            arguments: value
                .arguments
                .iter()
                .map(|argument| DirectiveArgument {
                    name: argument.name.clone(),
                    value_type: (&argument.value_type).into(),
                    default_value: argument.default_value.clone(),
                })
                .collect(),
        }
    }
}

/// `directive @skip(if: Boolean!)`, `directive @include(if: Boolean!)` and
/// `directive @defer(if: Boolean! = true, label: String)`.
fn builtin_directives() -> [DirectiveDefinition; 3] {
    let required_if = || DirectiveArgument {
        name: "if".to_string(),
        value_type: TypeNode::NonNull(Box::new(TypeNode::Named("Boolean".to_string()))),
        default_value: None,
    };

    [
        DirectiveDefinition {
            name: SKIP_DIRECTIVE.to_string(),
            arguments: vec![required_if()],
        },
        DirectiveDefinition {
            name: INCLUDE_DIRECTIVE.to_string(),
            arguments: vec![required_if()],
        },
        DirectiveDefinition {
            name: DEFER_DIRECTIVE.to_string(),
            arguments: vec![
                DirectiveArgument {
                    default_value: Some(Value::Boolean(true)),
                    ..required_if()
                },
                DirectiveArgument {
                    name: "label".to_string(),
                    value_type: TypeNode::Named("String".to_string()),
                    default_value: None,
                },
            ],
        },
    ]
}

type DefinitionMap = HashMap<String, SchemaDefinition>;
type SubtypeMap = HashMap<String, IndexSet<String>>;

/// The type-system view used during field collection: type lookup,
/// abstract-type subtyping and directive definitions.
#[derive(Debug)]
pub struct SchemaState {
    /// A map all of definitions (def_name, def) that exists in the schema.
    pub definitions: DefinitionMap,
    /// Abstract type name to the object types it can resolve to, in schema order.
    possible_types: SubtypeMap,
    /// Abstract type name to every object or interface type that is a subtype of it.
    subtypes: SubtypeMap,
    directives: HashMap<String, DirectiveDefinition>,
    /// The root entrypoints
    pub query_type: String,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
}

impl SchemaState {
    #[instrument(level = "trace", skip(schema), name = "new_schema_state")]
    pub fn new(schema: &SchemaDocument) -> Self {
        let definitions = Self::build_map(schema);
        let (possible_types, subtypes) = Self::build_subtype_maps(schema, &definitions);

        let mut directives: HashMap<String, DirectiveDefinition> = builtin_directives()
            .into_iter()
            .map(|directive| (directive.name.clone(), directive))
            .collect();
        for def in &schema.definitions {
            if let input::Definition::DirectiveDefinition(directive) = def {
                directives.insert(directive.name.clone(), directive.into());
            }
        }

        let (query_type, mutation_type, subscription_type) =
            Self::extract_root_types(schema, &definitions);

        Self {
            definitions,
            possible_types,
            subtypes,
            directives,
            query_type,
            mutation_type,
            subscription_type,
        }
    }

    pub fn type_by_name(&self, type_name: &str) -> Option<&SchemaDefinition> {
        self.definitions.get(type_name)
    }

    pub fn is_abstract_type(&self, type_name: &str) -> bool {
        self.definitions
            .get(type_name)
            .is_some_and(|def| def.is_abstract())
    }

    pub fn is_composite_type(&self, type_name: &str) -> bool {
        self.definitions
            .get(type_name)
            .is_some_and(|def| def.is_composite())
    }

    /// Whether `maybe_subtype` is a possible type (or a sub-interface) of the
    /// abstract type `abstract_type`.
    pub fn is_subtype(&self, abstract_type: &str, maybe_subtype: &str) -> bool {
        self.subtypes
            .get(abstract_type)
            .is_some_and(|subtypes| subtypes.contains(maybe_subtype))
    }

    /// Object types an abstract type may resolve to. An object type is its own
    /// only possible type.
    pub fn possible_types(&self, type_name: &str) -> Vec<&str> {
        match self.definitions.get(type_name) {
            Some(SchemaDefinition::Object(object_type)) => vec![object_type.name.as_str()],
            Some(def) if def.is_abstract() => self
                .possible_types
                .get(type_name)
                .map(|types| types.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            _ => vec![],
        }
    }

    pub fn field_type(&self, type_name: &str, field_name: &str) -> Option<TypeNode> {
        let def = self.definitions.get(type_name)?;

        if field_name == TYPENAME_FIELD && def.is_composite() {
            return Some(TypeNode::NonNull(Box::new(TypeNode::Named(
                "String".to_string(),
            ))));
        }

        def.fields()?
            .get(field_name)
            .map(|field| field.field_type.clone())
    }

    pub fn root_type(&self, operation_kind: OperationKind) -> Option<&str> {
        match operation_kind {
            OperationKind::Query => Some(self.query_type.as_str()),
            OperationKind::Mutation => self.mutation_type.as_deref(),
            OperationKind::Subscription => self.subscription_type.as_deref(),
        }
    }

    pub fn directive_definition(&self, name: &str) -> Option<&DirectiveDefinition> {
        self.directives.get(name)
    }

    fn extract_root_types(
        schema: &SchemaDocument,
        definitions: &DefinitionMap,
    ) -> (String, Option<String>, Option<String>) {
        let schema_definition = schema.definitions.iter().find_map(|def| match def {
            input::Definition::SchemaDefinition(schema_definition) => Some(schema_definition),
            _ => None,
        });

        let default_root = |name: &str| definitions.contains_key(name).then(|| name.to_string());

        match schema_definition {
            Some(schema_definition) => (
                schema_definition
                    .query
                    .clone()
                    .unwrap_or_else(|| "Query".to_string()),
                schema_definition.mutation.clone(),
                schema_definition.subscription.clone(),
            ),
            None => (
                "Query".to_string(),
                default_root("Mutation"),
                default_root("Subscription"),
            ),
        }
    }

    fn build_fields(fields: &[input::Field<'static, String>]) -> HashMap<String, SchemaField> {
        fields
            .iter()
            .map(|field| {
                (
                    field.name.clone(),
                    SchemaField {
                        name: field.name.clone(),
                        field_type: (&field.field_type).into(),
                    },
                )
            })
            .collect()
    }

    fn build_map(schema: &SchemaDocument) -> DefinitionMap {
        let mut definitions = DefinitionMap::new();

        for def in &schema.definitions {
            if let input::Definition::TypeDefinition(type_def) = def {
                let definition = match type_def {
                    input::TypeDefinition::Object(object_type) => {
                        SchemaDefinition::Object(SchemaObjectType {
                            name: object_type.name.clone(),
                            fields: Self::build_fields(&object_type.fields),
                            implements_interfaces: object_type.implements_interfaces.clone(),
                        })
                    }
                    input::TypeDefinition::Interface(interface_type) => {
                        SchemaDefinition::Interface(SchemaInterfaceType {
                            name: interface_type.name.clone(),
                            fields: Self::build_fields(&interface_type.fields),
                            implements_interfaces: interface_type.implements_interfaces.clone(),
                        })
                    }
                    input::TypeDefinition::Union(union_type) => {
                        SchemaDefinition::Union(SchemaUnionType {
                            name: union_type.name.clone(),
                            members: union_type.types.clone(),
                        })
                    }
                    input::TypeDefinition::Enum(enum_type) => {
                        SchemaDefinition::Enum(enum_type.name.clone())
                    }
                    input::TypeDefinition::Scalar(scalar_type) => {
                        SchemaDefinition::Scalar(scalar_type.name.clone())
                    }
                    input::TypeDefinition::InputObject(input_type) => {
                        SchemaDefinition::InputObject(input_type.name.clone())
                    }
                };

                definitions.insert(definition.name().to_string(), definition);
            }
        }

        // Extensions are applied after every definition is known, so their
        // position in the document doesn't matter.
        for def in &schema.definitions {
            if let input::Definition::TypeExtension(extension) = def {
                Self::apply_extension(&mut definitions, extension);
            }
        }

        definitions
    }

    fn apply_extension(
        definitions: &mut DefinitionMap,
        extension: &input::TypeExtension<'static, String>,
    ) {
        match (extension, extension_target(definitions, extension)) {
            (
                input::TypeExtension::Object(object_ext),
                Some(SchemaDefinition::Object(object_type)),
            ) => {
                object_type
                    .fields
                    .extend(Self::build_fields(&object_ext.fields));
                object_type
                    .implements_interfaces
                    .extend(object_ext.implements_interfaces.iter().cloned());
            }
            (
                input::TypeExtension::Interface(interface_ext),
                Some(SchemaDefinition::Interface(interface_type)),
            ) => {
                interface_type
                    .fields
                    .extend(Self::build_fields(&interface_ext.fields));
                interface_type
                    .implements_interfaces
                    .extend(interface_ext.implements_interfaces.iter().cloned());
            }
            (
                input::TypeExtension::Union(union_ext),
                Some(SchemaDefinition::Union(union_type)),
            ) => {
                union_type.members.extend(union_ext.types.iter().cloned());
            }
            (_, None) => {
                tracing::debug!("ignoring extension of an unknown type");
            }
            _ => {}
        }
    }

    /// Both maps keep the order in which types appear in the schema document.
    fn build_subtype_maps(
        schema: &SchemaDocument,
        definitions: &DefinitionMap,
    ) -> (SubtypeMap, SubtypeMap) {
        let mut possible_types = SubtypeMap::new();
        let mut subtypes = SubtypeMap::new();

        let ordered_names: Vec<&str> = schema
            .definitions
            .iter()
            .filter_map(|def| match def {
                input::Definition::TypeDefinition(type_def) => Some(type_definition_name(type_def)),
                _ => None,
            })
            .collect();

        for type_name in &ordered_names {
            match definitions.get(*type_name) {
                Some(SchemaDefinition::Union(union_type)) => {
                    let members: IndexSet<String> = union_type.members.iter().cloned().collect();
                    possible_types.insert(union_type.name.clone(), members.clone());
                    subtypes.insert(union_type.name.clone(), members);
                }
                Some(SchemaDefinition::Object(object_type)) => {
                    for interface in
                        transitive_interfaces(definitions, &object_type.implements_interfaces)
                    {
                        possible_types
                            .entry(interface.clone())
                            .or_default()
                            .insert(object_type.name.clone());
                        subtypes
                            .entry(interface)
                            .or_default()
                            .insert(object_type.name.clone());
                    }
                }
                Some(SchemaDefinition::Interface(interface_type)) => {
                    for interface in
                        transitive_interfaces(definitions, &interface_type.implements_interfaces)
                    {
                        subtypes
                            .entry(interface)
                            .or_default()
                            .insert(interface_type.name.clone());
                    }
                }
                _ => {}
            }
        }

        (possible_types, subtypes)
    }
}

fn type_definition_name<'a>(type_def: &'a input::TypeDefinition<'static, String>) -> &'a str {
    match type_def {
        input::TypeDefinition::Scalar(t) => &t.name,
        input::TypeDefinition::Object(t) => &t.name,
        input::TypeDefinition::Interface(t) => &t.name,
        input::TypeDefinition::Union(t) => &t.name,
        input::TypeDefinition::Enum(t) => &t.name,
        input::TypeDefinition::InputObject(t) => &t.name,
    }
}

fn extension_target<'a>(
    definitions: &'a mut DefinitionMap,
    extension: &input::TypeExtension<'static, String>,
) -> Option<&'a mut SchemaDefinition> {
    let name = match extension {
        input::TypeExtension::Object(ext) => &ext.name,
        input::TypeExtension::Interface(ext) => &ext.name,
        input::TypeExtension::Union(ext) => &ext.name,
        input::TypeExtension::Scalar(ext) => &ext.name,
        input::TypeExtension::Enum(ext) => &ext.name,
        input::TypeExtension::InputObject(ext) => &ext.name,
    };

    definitions.get_mut(name)
}

/// Declared interfaces plus everything they implement in turn.
fn transitive_interfaces(definitions: &DefinitionMap, declared: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut ordered = Vec::new();
    let mut stack: Vec<&String> = declared.iter().rev().collect();

    while let Some(interface) = stack.pop() {
        if !seen.insert(interface.clone()) {
            continue;
        }
        ordered.push(interface.clone());

        if let Some(SchemaDefinition::Interface(interface_type)) = definitions.get(interface) {
            stack.extend(interface_type.implements_interfaces.iter().rev());
        }
    }

    ordered
}
