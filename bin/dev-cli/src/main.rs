mod logger;

use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::process;

use collector_config::{config_json_schema, load_config};
use field_collector::collect::{CollectFieldsOptions, FieldCollector};
use field_collector::operation::ExecutableOperation;
use field_collector::plan::build_field_plan;
use field_collector::state::schema_state::SchemaState;
use field_collector::utils::parsing::{parse_operation, parse_schema};
use tracing::debug;

use crate::logger::configure_logging;

const USAGE: &str = "Usage: fc-dev-cli <collect|plan> <schema_path> <operation_path> [--variables <json>] [--operation <name>] [--config <path>] [--json]
       fc-dev-cli config-schema";

struct Flags {
    variables: Option<String>,
    operation_name: Option<String>,
    config_path: Option<String>,
    json: bool,
}

fn parse_flags(args: &[String]) -> Result<Flags, String> {
    let mut flags = Flags {
        variables: None,
        operation_name: None,
        config_path: None,
        json: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("Missing value for {}", arg))
        };

        match arg.as_str() {
            "--variables" => flags.variables = Some(value()?),
            "--operation" => flags.operation_name = Some(value()?),
            "--config" => flags.config_path = Some(value()?),
            "--json" => flags.json = true,
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(flags)
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.get(1).map(String::as_str) == Some("config-schema") {
        match config_json_schema() {
            Ok(schema) => println!("{}", schema),
            Err(err) => {
                eprintln!("{}", err);
                process::exit(1);
            }
        }
        return;
    }

    if args.len() < 4 {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let flags = match parse_flags(&args[4..]) {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("{}\n{}", err, USAGE);
            process::exit(1);
        }
    };

    if let Err(err) = run(&args[1], &args[2], &args[3], flags) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(
    command: &str,
    schema_path: &str,
    operation_path: &str,
    flags: Flags,
) -> Result<(), Box<dyn Error>> {
    let config = load_config(flags.config_path)?;
    configure_logging(&config.log);
    debug!(defer_enabled = config.defer.enabled, "configuration loaded");

    let schema_sdl = std::fs::read_to_string(schema_path)?;
    let schema = SchemaState::new(&parse_schema(&schema_sdl)?);

    let document_text = std::fs::read_to_string(operation_path)?;
    let document = parse_operation(&document_text)?;
    let operation = ExecutableOperation::from_document(&document, flags.operation_name.as_deref())?;

    let raw_variables = flags
        .variables
        .as_deref()
        .map(|raw| sonic_rs::from_str::<HashMap<String, sonic_rs::Value>>(raw))
        .transpose()?;
    let variables = operation.coerce_variables(raw_variables)?;

    let options = CollectFieldsOptions {
        defer_enabled: config.defer.enabled,
    };

    match command {
        "collect" => {
            let root_type = schema
                .root_type(operation.kind)
                .ok_or_else(|| format!("Schema has no root type for {}", operation.kind))?;
            let result = FieldCollector::new(&schema, operation.fragments(), &variables, &operation)
                .with_options(options)
                .collect_fields(root_type);

            println!("{}", result);
        }
        "plan" => {
            let plan = build_field_plan(&schema, &operation, &variables, options)?;
            if flags.json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                println!("{}", plan);
            }
        }
        _ => {
            return Err(format!(
                "Unknown command. Available commands: collect, plan, config-schema\n{}",
                USAGE
            )
            .into());
        }
    }

    Ok(())
}
