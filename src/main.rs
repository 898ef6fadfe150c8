use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use envz::document::{insert_path, load_document, parse_assignment, parse_fragment_str};
use envz::fs::{DEFAULT_FILE_NAME, LocalFiles, resolve_env_file};
use envz::persist::persist;
use envz::resolve::{
	Ambient, OverrideDirection, ResolutionOptions, active_environment, resolve_with,
};

#[derive(Parser)]
#[command(name = "envz")]
#[command(
	author,
	version,
	about = "Resolve environment-scoped YAML configuration merged with environment variables"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Enable verbose logging (sets log level to DEBUG)
	#[arg(short, long, global = true)]
	verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the resolved configuration for the active environment
	Resolve {
		/// Env file to read (default: env.yaml)
		file: Option<PathBuf>,

		/// Environment to resolve (default: $NODE_ENV, then "development")
		#[arg(short, long)]
		environment: Option<String>,

		/// Let env file values override environment variables
		#[arg(long, conflicts_with = "env_overrides")]
		file_overrides: bool,

		/// Let environment variables override env file values (the default)
		#[arg(long)]
		env_overrides: bool,

		/// Extra option passed through to the result
		#[arg(long = "set", value_name = "KEY=VALUE")]
		set: Vec<String>,

		/// Print only the value at this dotted key path
		#[arg(long, value_name = "PATH")]
		key: Option<String>,

		/// Output format
		#[arg(long, value_enum, default_value_t = Format::Yaml)]
		format: Format,
	},

	/// Merge an update into the env file and write it back
	Save {
		/// Env file to update (default: env.yaml)
		file: Option<PathBuf>,

		/// Value to set at a dotted key path, e.g. production.PORT=8080
		#[arg(long = "set", value_name = "PATH=VALUE", required_unless_present = "data")]
		set: Vec<String>,

		/// YAML mapping to merge, e.g. "production: {PORT: 8080}"
		#[arg(long, value_name = "YAML")]
		data: Option<String>,
	},

	/// List the environments declared in the env file, in cascade order
	Environments {
		/// Env file to read (default: env.yaml)
		file: Option<PathBuf>,

		/// Environment to mark as active (default: $NODE_ENV, then "development")
		#[arg(short, long)]
		environment: Option<String>,
	},

	/// Create a template env.yaml in the current directory
	Init {
		/// Overwrite an existing env.yaml
		#[arg(long)]
		force: bool,
	},
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
	Yaml,
	Json,
	Toml,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	// RUST_LOG always applies; --verbose raises the floor to DEBUG.
	let filter = if cli.verbose {
		EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
	} else {
		EnvFilter::from_default_env().add_directive(Level::WARN.into())
	};
	let _ = tracing_subscriber::registry()
		.with(fmt::layer().with_writer(std::io::stderr))
		.with(filter)
		.try_init();

	match cli.command {
		Commands::Resolve {
			file,
			environment,
			file_overrides,
			env_overrides,
			set,
			key,
			format,
		} => {
			let direction = match (file_overrides, env_overrides) {
				(true, _) => OverrideDirection::from_flag(Some(true)),
				(false, true) => OverrideDirection::from_flag(Some(false)),
				(false, false) => OverrideDirection::from_flag(None),
			};
			handle_resolve(
				file.as_deref(),
				environment,
				direction,
				&set,
				key.as_deref(),
				format,
			)
		}
		Commands::Save { file, set, data } => handle_save(file.as_deref(), &set, data.as_deref()),
		Commands::Environments { file, environment } => {
			handle_environments(file.as_deref(), environment)
		}
		Commands::Init { force } => handle_init(force),
	}
}

fn handle_resolve(
	file: Option<&Path>,
	environment: Option<String>,
	override_direction: OverrideDirection,
	set: &[String],
	key: Option<&str>,
	format: Format,
) -> Result<ExitCode> {
	let mut options = ResolutionOptions {
		environment,
		override_direction,
		..Default::default()
	};
	for assignment in set {
		let (name, value) = parse_assignment(assignment)?;
		options.extra.insert(Value::from(name), value);
	}

	let ambient = Ambient::capture().context("Failed to read the process environment")?;
	let config = resolve_with(&LocalFiles, &ambient, file, &options)
		.context("Failed to resolve configuration")?;

	let Some(key) = key else {
		print!("{}", render(config.as_mapping(), format)?);
		return Ok(ExitCode::SUCCESS);
	};

	match config.get_path(key) {
		Some(Value::String(s)) => println!("{s}"),
		Some(Value::Number(n)) => println!("{n}"),
		Some(Value::Bool(b)) => println!("{b}"),
		Some(value) => print!("{}", render(value, format)?),
		None => {
			eprintln!("Key not found: {key}");
			return Ok(ExitCode::FAILURE);
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_save(file: Option<&Path>, set: &[String], data: Option<&str>) -> Result<ExitCode> {
	let mut update = match data {
		Some(data) => parse_fragment_str(data).context("Invalid --data")?,
		None => Mapping::new(),
	};
	for assignment in set {
		let (path, value) = parse_assignment(assignment)?;
		insert_path(&mut update, &path, value)?;
	}

	let outcome = persist(file, &update).context("Failed to save configuration")?;

	if !outcome.is_saved() {
		eprintln!("error: {}", outcome.error);
		return Ok(ExitCode::FAILURE);
	}

	println!(
		"Saved {}",
		file.unwrap_or(Path::new(DEFAULT_FILE_NAME)).display()
	);
	Ok(ExitCode::SUCCESS)
}

fn handle_environments(file: Option<&Path>, environment: Option<String>) -> Result<ExitCode> {
	let ambient = Ambient::capture().context("Failed to read the process environment")?;
	let options = ResolutionOptions {
		environment,
		..Default::default()
	};
	let active = active_environment(&options, &ambient);
	let path = resolve_env_file(ambient.cwd(), file);

	let document = load_document(&LocalFiles, &path)
		.with_context(|| format!("Failed to load {}", path.display()))?;
	let names = document.environment_names();

	if names.is_empty() {
		println!("No environments declared in {}", path.display());
		return Ok(ExitCode::SUCCESS);
	}

	println!("Environments in {} (cascade order):\n", path.display());

	let declared = names.iter().any(|name| *name == active);
	let mut past_active = false;
	for name in &names {
		if *name == active {
			println!("* {name} (active)");
			past_active = true;
		} else if past_active || !declared {
			println!("  {name} (not merged)");
		} else {
			println!("  {name}");
		}
	}

	if !declared {
		println!("\nActive environment '{active}' is not declared; only environment variables apply.");
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(DEFAULT_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{DEFAULT_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, INIT_TEMPLATE)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {DEFAULT_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn render(value: &impl Serialize, format: Format) -> Result<String> {
	match format {
		Format::Yaml => serde_yaml::to_string(value).context("Failed to render YAML"),
		Format::Json => serde_json::to_string_pretty(value)
			.map(|json| json + "\n")
			.context("Failed to render JSON"),
		Format::Toml => {
			let mut value = serde_yaml::to_value(value).context("Failed to render TOML")?;
			drop_nulls(&mut value);
			toml::to_string(&value)
				.context("Failed to render TOML (TOML has no null; nulls inside sequences cannot be written)")
		}
	}
}

/// Remove null mapping entries, which TOML cannot represent.
fn drop_nulls(value: &mut Value) {
	match value {
		Value::Mapping(mapping) => {
			mapping.retain(|_, entry| !entry.is_null());
			mapping.values_mut().for_each(drop_nulls);
		}
		Value::Sequence(items) => items.iter_mut().for_each(drop_nulls),
		_ => {}
	}
}

const INIT_TEMPLATE: &str = r#"# envz configuration
#
# Sections cascade in declaration order: every section declared before the
# active environment (NODE_ENV, default "development") is merged into it.
# Sections declared after the active one are ignored.
#
# Environment variables override these values unless --file-overrides is given.

base:
  config:
    logLevel: info

development:
  PORT: 3000
  DATABASE: dev

production:
  PORT: 80
  DATABASE: prod
  config:
    logLevel: warn
"#;
