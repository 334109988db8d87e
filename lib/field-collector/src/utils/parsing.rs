use graphql_parser::{query, schema};

use crate::{ast::Document, state::schema_state::SchemaDocument};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to parse schema: {0}")]
    Schema(#[from] schema::ParseError),

    #[error("Failed to parse operation: {0}")]
    Operation(#[from] query::ParseError),
}

#[inline]
pub fn parse_schema(sdl: &str) -> Result<SchemaDocument, ParseError> {
    Ok(schema::parse_schema::<String>(sdl)?.into_static())
}

#[inline]
pub fn parse_operation(operation: &str) -> Result<Document, ParseError> {
    Ok(query::parse_query::<String>(operation)?.into_static())
}
