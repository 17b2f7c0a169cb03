use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use eyre::{WrapErr, bail};
use psinorm_cli::config::{self, OutputFormat, PsinormConfig};
use psinorm_cli::replay::{self, SurvivorOutcome};
use psinorm_core::models::raw::RawResponseSet;
use psinorm_core::models::request::ScoringRequest;
use psinorm_core::models::subject::age_on;
use psinorm_instruments::{Catalog, CatalogError, Registry};

use crate::cli::{CatalogCommand, ConfigCommand, ScoreArgs};
use crate::render;

/// Exit status when the engine refuses to score.
const REFUSED: u8 = 2;

pub struct Context {
    /// Settings after command-line flags are laid over the config file.
    pub config: PsinormConfig,
    pub config_path: PathBuf,
}

impl Context {
    fn registry(&self) -> eyre::Result<Registry> {
        match &self.config.catalog_path {
            Some(path) => {
                let catalog = Catalog::load(path)?;
                Registry::from_catalog(catalog)
                    .wrap_err_with(|| format!("catalog {} failed verification", path.display()))
            }
            None => Ok(Registry::builtin()?),
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn run_list(ctx: &Context) -> eyre::Result<ExitCode> {
    let registry = ctx.registry()?;
    match ctx.config.output {
        OutputFormat::Json => print_json(&registry.instruments().collect::<Vec<_>>())?,
        OutputFormat::Table => println!("{}", render::instruments_table(registry.instruments())),
    }
    Ok(ExitCode::SUCCESS)
}

pub fn run_describe(ctx: &Context, code: &str) -> eyre::Result<ExitCode> {
    let registry = ctx.registry()?;
    let Some(instrument) = registry.instrument(code) else {
        bail!("unknown instrument: {code}");
    };

    match ctx.config.output {
        OutputFormat::Json => print_json(instrument)?,
        OutputFormat::Table => {
            println!(
                "{} ({}), ages {}-{}, {}",
                instrument.name,
                instrument.code,
                instrument.min_age,
                instrument.max_age,
                instrument.banding_scheme.name()
            );
            if let Some(stratifier) = &instrument.stratifier {
                println!(
                    "Normed by {}: {}",
                    stratifier.name,
                    stratifier.values.join(", ")
                );
            }
            let (fields, variables) = render::describe_tables(instrument);
            println!("{fields}");
            println!("{variables}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn build_request(args: ScoreArgs) -> eyre::Result<ScoringRequest> {
    if let Some(path) = &args.request {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read request {}", path.display()))?;
        return ScoringRequest::from_json(&contents)
            .wrap_err_with(|| format!("{} is not a scoring request", path.display()));
    }

    let Some(instrument) = args.instrument else {
        bail!("--instrument is required without --request");
    };
    let age = match (args.age, args.birth_date, args.assessed_on) {
        (Some(age), _, _) => age,
        (None, Some(birth_date), Some(assessed_on)) => age_on(birth_date, assessed_on)?,
        _ => bail!("give --age, or --birth-date together with --assessed-on"),
    };

    let raw: RawResponseSet = args.fields.into_iter().collect();
    let mut request = ScoringRequest::new(instrument, age, raw);
    request.stratifier = args.stratifier;
    request.notes = args.notes;
    Ok(request)
}

pub fn run_score(ctx: &Context, args: ScoreArgs) -> eyre::Result<ExitCode> {
    let registry = ctx.registry()?;
    let request = build_request(args)?;

    match registry.score_request(&request) {
        Ok(result) => {
            match ctx.config.output {
                OutputFormat::Json => print_json(&result)?,
                OutputFormat::Table => {
                    println!("{}", render::result_heading(&result));
                    println!("{}", render::result_table(&result));
                    if let Some(notes) = &result.notes {
                        println!("Notes: {notes}");
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            // tagged body on stdout for callers, prose on stderr for people
            print_json(&serde_json::json!({ "error": error }))?;
            eprintln!("error: {error}");
            Ok(ExitCode::from(REFUSED))
        }
    }
}

pub fn run_replay(ctx: &Context, path: &Path) -> eyre::Result<ExitCode> {
    let registry = ctx.registry()?;
    let file = File::open(path).wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let edits = replay::parse_edits(BufReader::new(file))?;
    let report = replay::replay(&registry, &edits);

    match ctx.config.output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            println!(
                "{} edits: {} applied, {} superseded",
                edits.len(),
                report.applied,
                report.stale
            );
            for survivor in &report.survivors {
                println!(
                    "\nsubject {} / {} (seq {})",
                    survivor.subject_id, survivor.instrument_code, survivor.seq
                );
                match &survivor.outcome {
                    SurvivorOutcome::Scored { result } => {
                        println!("{}", render::result_table(result));
                    }
                    SurvivorOutcome::Refused { error } => println!("refused: {error}"),
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub fn run_catalog(ctx: &Context, command: CatalogCommand) -> eyre::Result<ExitCode> {
    match command {
        CatalogCommand::Export => {
            let catalog = ctx.registry()?.to_catalog();
            println!("{}", catalog.to_json_pretty()?);
            Ok(ExitCode::SUCCESS)
        }
        CatalogCommand::Verify { path } => {
            let catalog = Catalog::load(&path)?;
            match Registry::from_catalog(catalog) {
                Ok(registry) => {
                    println!(
                        "{}: ok ({} tables, {} age bands, edition {})",
                        path.display(),
                        registry.norms().table_count(),
                        registry.norms().band_count(),
                        registry.edition().unwrap_or("unnamed")
                    );
                    Ok(ExitCode::SUCCESS)
                }
                Err(CatalogError::Integrity(error)) => {
                    eprintln!("{}: {error}", path.display());
                    Ok(ExitCode::FAILURE)
                }
                Err(error) => Err(error.into()),
            }
        }
    }
}

pub fn run_config(ctx: &Context, command: ConfigCommand) -> eyre::Result<ExitCode> {
    match command {
        ConfigCommand::Show => {
            println!("# {}", ctx.config_path.display());
            print_json(&ctx.config)?;
        }
        ConfigCommand::Init { force } => {
            if ctx.config_path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    ctx.config_path.display()
                );
            }
            config::save_config(&ctx.config_path, &PsinormConfig::default())?;
            println!("wrote {}", ctx.config_path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}
