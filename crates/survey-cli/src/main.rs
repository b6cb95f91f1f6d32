use clap::{Parser, Subcommand};
use log::{debug, info};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use survey_spec::{
    Answers, SurveyConfig, backup_json_schema, build, export, missing_required, write_all,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const OUTPUT_DIR_VAR: &str = "SKILL_SURVEY_OUTPUT_DIR";
const CONFIG_VAR: &str = "SKILL_SURVEY_CONFIG";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Skill survey generator",
    long_about = "Builds the skill survey schema, exports it as CSV, JSON backup and summary, and creates prefilled form links"
)]
struct Cli {
    /// Log progress details to stderr (RUST_LOG overrides).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the schema and write the CSV, backup and summary artifacts.
    Generate {
        /// Directory receiving the artifacts (defaults to SKILL_SURVEY_OUTPUT_DIR or the current directory).
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// JSON file overriding the built-in rules, forms and required fields.
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
    /// Validate user data and print the prefilled link for a form.
    Link {
        /// Form identifier, e.g. `a` or `b`.
        #[arg(long, value_name = "FORM")]
        form: String,
        /// JSON object of field name to value.
        #[arg(long, value_name = "DATA")]
        data: Option<PathBuf>,
        /// Field value as `key=value`; repeatable, overrides --data.
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
    /// Check that user data carries every required field.
    Validate {
        #[arg(long, value_name = "DATA")]
        data: Option<PathBuf>,
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
    /// Print the JSON Schema of the backup document.
    BackupSchema,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Command::Generate { out, config } => run_generate(out, config),
        Command::Link {
            form,
            data,
            fields,
            config,
        } => run_link(&form, data, &fields, config),
        Command::Validate {
            data,
            fields,
            config,
        } => run_validate(data, &fields, config),
        Command::BackupSchema => run_backup_schema(),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run_generate(out_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let out_root = resolve_output_root(out_dir)?;
    fs::create_dir_all(&out_root)?;

    let schema = build(&config.rules)?;
    let bundle = export(&schema)?;
    let report = write_all(&out_root, &bundle);

    for artifact in report.written() {
        println!("Wrote {} to {}", artifact.kind, artifact.path.display());
    }
    for artifact in report.failures() {
        if let Err(err) = &artifact.result {
            eprintln!("Failed to write {}: {}", artifact.kind, err);
        }
    }
    println!("Total questions: {}", schema.len());

    if report.is_complete() {
        Ok(())
    } else {
        Err("one or more artifacts could not be written".into())
    }
}

fn run_link(
    form: &str,
    data: Option<PathBuf>,
    fields: &[String],
    config_path: Option<PathBuf>,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let answers = collect_answers(data, fields)?;
    let missing = missing_required(&answers, &config.required_fields);
    if !missing.is_empty() {
        return Err(format!("missing required fields: {}", missing.join(", ")).into());
    }
    let url = config.forms.prefill_link(form, &answers)?;
    println!("{}", url);
    Ok(())
}

fn run_validate(
    data: Option<PathBuf>,
    fields: &[String],
    config_path: Option<PathBuf>,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let answers = collect_answers(data, fields)?;
    let missing = missing_required(&answers, &config.required_fields);
    if missing.is_empty() {
        println!("Validation result: valid");
        Ok(())
    } else {
        println!("Validation result: invalid");
        println!("Missing required fields: {}", missing.join(", "));
        Err("validation failed".into())
    }
}

fn run_backup_schema() -> CliResult<()> {
    let schema = backup_json_schema()?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> CliResult<SurveyConfig> {
    let path = path.or_else(|| env::var_os(CONFIG_VAR).map(PathBuf::from));
    if let Some(path) = &path {
        info!("using config {}", path.display());
    }
    Ok(SurveyConfig::load_or_default(path.as_deref())?)
}

fn resolve_output_root(out: Option<PathBuf>) -> CliResult<PathBuf> {
    let candidate = match out {
        Some(path) => path,
        None => env::var_os(OUTPUT_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    if candidate.as_os_str().is_empty() {
        return Err("output directory cannot be empty".into());
    }
    Ok(candidate)
}

fn collect_answers(data: Option<PathBuf>, fields: &[String]) -> CliResult<Answers> {
    let mut answers = match data {
        Some(path) => read_answers(&path)?,
        None => Answers::new(),
    };
    for raw in fields {
        let (key, value) = parse_field(raw)?;
        debug!("field override {}", key);
        answers.insert(key, value);
    }
    Ok(answers)
}

fn read_answers(path: &Path) -> CliResult<Answers> {
    let contents = fs::read_to_string(path)?;
    let answers: Answers = serde_json::from_str(&contents)
        .map_err(|err| format!("{} must be a JSON object of strings: {}", path.display(), err))?;
    Ok(answers)
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("field '{}' must look like key=value", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("field '{}' has an empty key", raw));
    }
    Ok((key.to_string(), value.to_string()))
}
