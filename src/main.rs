//! fuzzy-paradise
//!
//! Command-line interface for Mamdani fuzzy inference.

use std::collections::HashMap;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use indexmap::IndexMap;
use serde_json::json;
use tracing::{debug, info};

use fuzzy_paradise::model::satisfaction;
use fuzzy_paradise::{
    Defuzzifier, FuzzyConfig, FuzzyError, LinguisticVariable, LogLevel, Model, ModelDefinition,
    OutputFormat,
};

#[derive(Parser)]
#[command(name = "fuzzy-paradise")]
#[command(version = env!("FUZZY_PARADISE_VERSION"))]
#[command(about = "Mamdani fuzzy inference: rate crisp inputs against a rule base", long_about = None)]
struct Cli {
    /// Model definition file (defaults to the built-in satisfaction model)
    #[arg(short, long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Configuration file (defaults to the standard search paths)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Crisp input value, repeatable
    #[arg(short, long = "input", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    inputs: Vec<(String, f64)>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Defuzzification method (centroid, bisector, mom, som, lom)
    #[arg(long, value_name = "METHOD", value_parser = parse_defuzzifier)]
    defuzz: Option<Defuzzifier>,

    /// Include memberships and rule firing strengths in the output
    #[arg(long)]
    trace: bool,

    /// Verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Accept inputs outside the variable's universe
    #[arg(long = "no-range-check")]
    no_range_check: bool,

    /// Never prompt; missing inputs are an error
    #[arg(long = "no-prompt")]
    no_prompt: bool,

    /// Print the effective configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,

    /// Print the model definition as TOML and exit
    #[arg(long = "print-model")]
    print_model: bool,

    /// List variables, terms and rules and exit
    #[arg(long = "list-variables")]
    list_variables: bool,

    /// Write the effective configuration to FILE and exit
    #[arg(long = "init-config", value_name = "FILE")]
    init_config: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human readable summary
    Text,
    /// JSON document
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn parse_assignment(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for {}: {}", name.trim(), e))?;
    Ok((name.trim().to_string(), value))
}

fn parse_defuzzifier(s: &str) -> Result<Defuzzifier, String> {
    Defuzzifier::from_str(s).ok_or_else(|| format!("unknown defuzzification method '{}'", s))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<FuzzyError>() {
                Some(fe) if cli.format == Some(Format::Json) => eprintln!("{}", fe.to_json_pretty()),
                _ => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        config.general.log_level
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level.tracing_level())
        .with_writer(io::stderr)
        .init();

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if let Some(path) = &cli.init_config {
        if path.exists() {
            bail!("refusing to overwrite {}", path.display());
        }
        config.save_to_file(path)?;
        info!(path = %path.display(), "configuration written");
        return Ok(());
    }

    let model_path = cli.model.clone().or_else(|| config.engine.model.clone());
    let mut definition = match &model_path {
        Some(path) => ModelDefinition::load(path)?,
        None => satisfaction::definition()?,
    };
    if let Some(method) = cli.defuzz.or(config.engine.defuzzification) {
        definition.defuzzification = Some(method);
    }

    if cli.print_model {
        match &model_path {
            Some(_) => print!("{}", definition.to_toml()?),
            None => print!("{}", satisfaction::SATISFACTION_TOML),
        }
        return Ok(());
    }

    let model = definition.build()?;
    info!(
        model = model.name.as_deref().unwrap_or("<unnamed>"),
        rules = model.engine.rules().len(),
        defuzzifier = model.engine.defuzzifier().as_str(),
        "model loaded"
    );

    if cli.list_variables {
        list_variables(&model);
        return Ok(());
    }

    let validate_range = config.input.validate_range && !cli.no_range_check;
    let interactive = config.input.interactive && !cli.no_prompt && io::stdin().is_terminal();
    let values = collect_inputs(&model, &cli.inputs, validate_range, interactive)?;

    let simulation = model.engine.simulate(&values)?;
    let mut outputs = IndexMap::new();
    for var in model.engine.consequents() {
        outputs.insert(var.name().to_string(), simulation.output(var.name())?);
    }

    let format = cli.format.map(OutputFormat::from).unwrap_or(config.general.format);
    match format {
        OutputFormat::Text => {
            if cli.trace {
                print_trace(&model, &simulation);
            }
            for (name, value) in &outputs {
                print_output(&model, name, *value);
            }
        }
        OutputFormat::Json => {
            let results: IndexMap<&str, serde_json::Value> = outputs
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str(),
                        json!({
                            "value": value,
                            "category": model.categorize(name, *value),
                        }),
                    )
                })
                .collect();
            let mut doc = json!({
                "model": model.name,
                "defuzzification": model.engine.defuzzifier().as_str(),
                "outputs": results,
            });
            if cli.trace {
                doc["trace"] = serde_json::to_value(&simulation)?;
            }
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<FuzzyConfig> {
    let config = match &cli.config {
        Some(path) => {
            let mut config = FuzzyConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            config.apply_env_overrides();
            config
        }
        None => FuzzyConfig::load().context("Failed to load config")?,
    };
    Ok(config)
}

/// Crisp value per antecedent, in declaration order; command-line values win
fn collect_inputs(
    model: &Model,
    given: &[(String, f64)],
    validate_range: bool,
    interactive: bool,
) -> Result<HashMap<String, f64>> {
    let mut values: HashMap<String, f64> = given.iter().cloned().collect();

    for var in model.engine.antecedents() {
        match values.get(var.name()) {
            Some(&value) => {
                if validate_range && !var.universe().contains(value) {
                    bail!(
                        "{} = {} is outside {}..{}",
                        var.name(),
                        value,
                        var.universe().min(),
                        var.universe().max()
                    );
                }
            }
            None if interactive => {
                let value = prompt(var, validate_range)?;
                values.insert(var.name().to_string(), value);
            }
            None => return Err(FuzzyError::missing_input(var.name()).into()),
        }
    }

    debug!(?values, "inputs collected");
    Ok(values)
}

/// Ask for one value until it parses and lies in range
fn prompt(var: &LinguisticVariable, validate_range: bool) -> Result<f64> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let (min, max) = (var.universe().min(), var.universe().max());

    loop {
        print!("{} ({}-{}): ", var.name(), min, max);
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(FuzzyError::missing_input(var.name()).into());
        }

        match line.trim().parse::<f64>() {
            Ok(value) if !value.is_finite() => eprintln!("Please enter a finite number."),
            Ok(value) if validate_range && !var.universe().contains(value) => {
                eprintln!("Please enter a number between {} and {}.", min, max)
            }
            Ok(value) => return Ok(value),
            Err(_) => eprintln!("Please enter a number."),
        }
    }
}

fn print_output(model: &Model, name: &str, value: f64) {
    let range = model
        .engine
        .consequent(name)
        .map(|v| format!(" (range {}-{})", v.universe().min(), v.universe().max()))
        .unwrap_or_default();
    match model.categorize(name, value) {
        Some(category) => println!("{}: {:.2}{} => {}", name, value, range, category),
        None => println!("{}: {:.2}{}", name, value, range),
    }
}

fn print_trace(model: &Model, simulation: &fuzzy_paradise::Simulation<'_>) {
    for var in model.engine.antecedents() {
        let Some(memberships) = simulation.memberships(var.name()) else {
            continue;
        };
        let degrees: Vec<String> = memberships
            .iter()
            .map(|(term, degree)| format!("{}={:.3}", term, degree.value()))
            .collect();
        println!(
            "{} = {}: {}",
            var.name(),
            simulation.input(var.name()).unwrap_or(f64::NAN),
            degrees.join(", ")
        );
    }
    for firing in simulation.firing_strengths() {
        println!("{}: {:.3}", firing.label, firing.strength.value());
    }
}

fn list_variables(model: &Model) {
    if let Some(name) = &model.name {
        println!("model: {}", name);
    }
    for var in model.engine.antecedents().chain(model.engine.consequents()) {
        let terms: Vec<&str> = var.term_names().collect();
        println!(
            "{} {} [{}, {}]: {}",
            var.role().as_str(),
            var.name(),
            var.universe().min(),
            var.universe().max(),
            terms.join(", ")
        );
    }
    for (index, rule) in model.engine.rules().iter().enumerate() {
        println!("{}: {}", rule.display_label(index), rule);
    }
}
