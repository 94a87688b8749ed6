use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use cfgboot::bootstrap::{Bootstrap, LoggingOutcome};
use cfgboot::config::types::DEFAULT_APPLICATION_NAME;
use cfgboot::config::{
	ConfigSettings, LocationResolver, LogSource, Properties, read_application_configuration,
};
use cfgboot::diagnostics::Diagnostics;
use cfgboot::exec::{execute_command, resolve_command};
use cfgboot::host::{HostParams, ProcessEnvironment};
use cfgboot::logging::TracingBackend;
use cfgboot::resource::ClassPath;
use cfgboot::store::{MemoryStore, SettingsStore};

#[derive(Parser)]
#[command(name = "cfgboot")]
#[command(
	author,
	version,
	about = "Resolve an application's configuration location, propagate settings and bootstrap logging"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Preload a settings store entry
	#[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_key_value, global = true)]
	define: Vec<(String, String)>,

	/// Set a host parameter
	#[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_value, global = true)]
	param: Vec<(String, String)>,

	/// Host display name, used as the application name when none is configured
	#[arg(long, value_name = "NAME", global = true)]
	display_name: Option<String>,

	/// Directory searched for classpath: resources (repeatable, searched in order)
	#[arg(long, value_name = "DIR", default_value = ".", global = true)]
	classpath: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
	/// Run the location cascade and print the normalized location
	Resolve,
	/// Run startup, then print the loaded configuration and settings store
	Show {
		/// Re-read the configuration from the location stored under this key
		#[arg(long, value_name = "KEY")]
		key: Option<String>,
	},
	/// Run startup, execute a command with the settings store exported, then shut down
	Run {
		/// Command to run
		#[arg(
			trailing_var_arg = true,
			allow_hyphen_values = true,
			required = true,
			value_name = "COMMAND"
		)]
		command: Vec<String>,
	},
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
	let (key, value) = raw
		.split_once('=')
		.ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
	if key.trim().is_empty() {
		return Err(format!("empty key in '{}'", raw));
	}
	Ok((key.trim().to_string(), value.to_string()))
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

	let store: Arc<dyn SettingsStore> = Arc::new(MemoryStore::with_entries(cli.define.clone()));
	let host = host_params(&cli);
	let locator = ClassPath::new(cli.classpath.clone());

	match cli.command {
		Commands::Resolve => handle_resolve(store.as_ref(), &host),
		Commands::Show { key } => handle_show(store, locator, &host, key.as_deref()),
		Commands::Run { command } => handle_run(store, locator, &host, &command),
	}
}

fn host_params(cli: &Cli) -> HostParams {
	let mut host = HostParams::new();
	for (key, value) in &cli.param {
		host = host.with_param(key, value);
	}
	if let Some(ref name) = cli.display_name {
		host = host.with_display_name(name);
	}
	host
}

fn start(
	store: Arc<dyn SettingsStore>,
	locator: ClassPath,
	host: &HostParams,
) -> Bootstrap<TracingBackend> {
	let mut boot = Bootstrap::new(
		store,
		locator,
		TracingBackend::install(),
		Diagnostics::stderr(DEFAULT_APPLICATION_NAME),
	);
	boot.on_start(host);
	boot
}

fn handle_resolve(store: &dyn SettingsStore, host: &HostParams) -> Result<ExitCode> {
	let settings = ConfigSettings::from_host(host);
	let diagnostics = Diagnostics::stderr(&settings.application_name);

	let resolved =
		LocationResolver::new(&settings, &diagnostics).resolve(store, &ProcessEnvironment, host);

	println!("{}", resolved.location);
	Ok(ExitCode::SUCCESS)
}

fn handle_show(
	store: Arc<dyn SettingsStore>,
	locator: ClassPath,
	host: &HostParams,
	key: Option<&str>,
) -> Result<ExitCode> {
	let mut boot = start(store, locator, host);
	let report = boot
		.report()
		.context("Startup did not produce a report")?
		.clone();

	let config = match key {
		Some(key) => read_application_configuration(
			boot.store().as_ref(),
			Some(key),
			boot.locator(),
			boot.diagnostics(),
		),
		None => report.config.clone(),
	};

	println!(
		"Configuration location: {} ({:?})",
		report.resolved.location, report.resolved.source
	);
	println!("Logging: {}", describe_logging(&report.logging));
	println!("Propagated entries: {}", report.propagated);
	println!();

	match config {
		Some(config) => print_properties("Configuration", &config),
		None => println!("Configuration: not loaded"),
	}
	println!();

	println!("Settings:");
	for (key, value) in boot.store().entries() {
		println!("  {}={}", key, value);
	}

	boot.on_stop();
	Ok(ExitCode::SUCCESS)
}

fn handle_run(
	store: Arc<dyn SettingsStore>,
	locator: ClassPath,
	host: &HostParams,
	command: &[String],
) -> Result<ExitCode> {
	let (command_name, command_args) = command
		.split_first()
		.context("No command given to run")?;
	let binary = resolve_command(command_name)
		.ok_or_else(|| anyhow::anyhow!("Command not found: {}", command_name))?;
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let mut boot = start(store, locator, host);
	let envs = boot.store().entries();

	let result = execute_command(&binary, command_args, &cwd, &envs);
	boot.on_stop();

	let status = result.with_context(|| format!("Failed to execute: {}", binary.display()))?;
	let exit_code = status.code().unwrap_or(1);
	Ok(ExitCode::from(exit_code as u8))
}

fn describe_logging(outcome: &LoggingOutcome) -> String {
	match outcome {
		LoggingOutcome::Explicit { location, watching } => {
			let path = match &location.source {
				LogSource::Classpath(name) => format!("classpath:{}", name),
				LogSource::File(path) => path.display().to_string(),
			};
			if *watching {
				format!("configured from {} (watching for changes)", path)
			} else {
				format!("configured from {}", path)
			}
		}
		LoggingOutcome::Default => "default configuration".to_string(),
		LoggingOutcome::Skipped => "skipped, no application configuration".to_string(),
	}
}

fn print_properties(title: &str, properties: &Properties) {
	println!("{} ({} entries):", title, properties.len());
	for (key, value) in properties.iter() {
		println!("  {}={}", key, value);
	}
}
