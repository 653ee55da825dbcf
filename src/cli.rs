//! CLI: generate | list-collections | preview
use std::path::PathBuf;
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use mongo_typegen::config::{self, FileConfig};
use mongo_typegen::error::ConfigError;
use mongo_typegen::pipeline::{self, CollectionSchema};
use mongo_typegen::sample::{files::FileOptions, FileSampler, MongoSampler, Sampler};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate Python TypedDict models from the documents of a MongoDB database
#[derive(Parser, Debug)]
#[command(name = "mongo-typegen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// debug-level logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// only report errors
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate TypedDict models from collections
    Generate(GenerateCmd),
    /// list all collections of the source
    ListCollections(SourceSettings),
    /// preview the inferred schema and TypedDict of one collection
    Preview(PreviewCmd),
}

#[derive(Args, Debug, Clone)]
struct SourceSettings {
    /// MongoDB connection string [default: mongodb://localhost:27017/]
    #[arg(long, short)]
    uri: Option<String>,

    /// name of the database to analyze
    #[arg(long, short)]
    db: Option<String>,

    /// read documents from JSON/NDJSON files instead of a database; one
    /// collection per file stem. Literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., conflicts_with_all = ["uri", "db"])]
    input: Vec<String>,

    /// treat input files as newline-delimited JSON
    #[arg(long, requires = "input")]
    ndjson: bool,

    /// jq filter applied to each input file
    #[arg(long, requires = "input")]
    jq_expr: Option<String>,

    /// JSON config file supplying defaults for these options
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateCmd {
    #[command(flatten)]
    source: SourceSettings,

    /// output file for the generated models [default: generated_models.py]
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// documents to sample per collection [default: 100]
    #[arg(short, long)]
    sample_size: Option<usize>,

    /// comma-separated collections to process (default: all)
    #[arg(short, long, value_delimiter = ',')]
    collections: Vec<String>,

    /// comma-separated collections to skip
    #[arg(short, long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// print the generated code instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// overwrite the output file if it exists
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug)]
struct PreviewCmd {
    #[command(flatten)]
    source: SourceSettings,

    collection_name: String,

    /// documents to sample [default: 10]
    #[arg(short, long)]
    sample_size: Option<usize>,

    /// print the JSON schema view instead of the summary
    #[arg(long)]
    json: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SourceSettings {
    fn file_config(&self) -> Result<FileConfig> {
        match &self.config {
            Some(path) => Ok(FileConfig::load(path)?),
            None => Ok(FileConfig::default()),
        }
    }

    fn open(&self, file: &FileConfig) -> Result<Box<dyn Sampler>> {
        if !self.input.is_empty() {
            let options = FileOptions { ndjson: self.ndjson, jq_expr: self.jq_expr.clone() };
            let sampler = FileSampler::load(&self.input, &options)
                .context("failed to load input files")?;
            return Ok(Box::new(sampler));
        }
        let db = self.db.as_ref()
            .or(file.db.as_ref())
            .ok_or(ConfigError::MissingDatabase)?;
        let uri = self.uri.as_deref()
            .or(file.uri.as_deref())
            .unwrap_or(config::DEFAULT_URI);
        Ok(Box::new(MongoSampler::connect(uri, db)?))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::ERROR
        } else {
            tracing::Level::INFO
        }
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(cmd) => cmd.run(),
            Command::ListCollections(source) => list_collections(source),
            Command::Preview(cmd) => cmd.run(),
        }
    }
}

impl GenerateCmd {
    fn run(&self) -> Result<()> {
        let file = self.source.file_config()?;
        let sample_size = config::check_sample_size(
            self.sample_size.or(file.sample_size).unwrap_or(config::DEFAULT_SAMPLE_SIZE),
            config::MAX_SAMPLE_SIZE,
        )?;
        let out = self.out.clone()
            .or_else(|| file.out.clone())
            .unwrap_or_else(|| PathBuf::from(config::DEFAULT_OUT));

        if !self.dry_run && !self.force && out.exists() {
            bail!("output file '{}' already exists; pass --force to overwrite", out.display());
        }

        let sampler = self.source.open(&file)?;
        let requested = if self.collections.is_empty() {
            file.collections.clone().unwrap_or_default()
        } else {
            self.collections.clone()
        };
        let excluded = if self.exclude.is_empty() {
            file.exclude.clone().unwrap_or_default()
        } else {
            self.exclude.clone()
        };
        let targets = plan_collections(sampler.as_ref(), &requested, &excluded)?;
        tracing::info!(count = targets.len(), collections = %targets.join(", "), "processing collections");
        let schemas = infer_targets(sampler.as_ref(), &targets, sample_size)?;

        let src = pipeline::render(&schemas);
        if self.dry_run {
            println!("{}", "--- Generated Code (Dry Run) ---".bold());
            println!("{src}");
            return Ok(());
        }
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&out, &src)
            .map_err(|source| mongo_typegen::Error::Write { path: out.clone(), source })?;
        tracing::info!(path = %out.display(), "models written");
        eprintln!("{} models saved to '{}'", "✔".green(), out.display());
        Ok(())
    }
}

impl PreviewCmd {
    fn run(&self) -> Result<()> {
        let file = self.source.file_config()?;
        let sample_size = config::check_sample_size(
            self.sample_size.unwrap_or(config::PREVIEW_SAMPLE_SIZE),
            config::MAX_PREVIEW_SAMPLE_SIZE,
        )?;
        let sampler = self.source.open(&file)?;
        let name = &self.collection_name;
        if !sampler.list_collections()?.contains(name) {
            bail!("collection '{name}' not found");
        }

        let schema = pipeline::infer_collection(sampler.as_ref(), name, sample_size)?;
        if self.json {
            let view = mongo_typegen::report::emit_object(&schema.root);
            println!("{}", serde_json::to_string_pretty(&view)?);
            return Ok(());
        }

        let types = pipeline::generate(std::slice::from_ref(&schema));
        // the collection's own declaration is always registered last
        let Some(top) = types.last() else { bail!("nothing generated for '{name}'") };

        println!("{}", format!("\nSchema preview for '{name}' (sampled {} docs):", schema.documents()).bold());
        for field in &top.fields {
            let status = if field.optionality.is_optional() { "optional" } else { "required" };
            let nullable = if field.optionality.is_nullable() { ", nullable" } else { "" };
            println!("  - {}:", field.name);
            println!("    Types: {}", mongo_typegen::codegen::type_expr(&field.ty).cyan());
            println!("    Status: {status}{nullable}");
            if let Some(stats) = top.schema.fields.get(&field.name) {
                println!("    Seen: {}/{} docs, null in {}", stats.present, top.schema.observed, stats.nulls);
            }
        }
        println!("{}", "\nGenerated TypedDict:".bold());
        for ty in &types {
            println!("{}\n", mongo_typegen::codegen::declaration(ty));
        }
        Ok(())
    }
}

fn list_collections(source: &SourceSettings) -> Result<()> {
    let file = source.file_config()?;
    let sampler = source.open(&file)?;
    let collections = sampler.list_collections()?;
    if collections.is_empty() {
        println!("No collections found.");
        return Ok(());
    }
    println!("{}", "Collections:".bold());
    for (i, name) in collections.iter().enumerate() {
        println!("  {:2}. {name}", i + 1);
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Collections a `generate` run will sample. Fails when the source has no
/// collections or the selection leaves none.
fn plan_collections(sampler: &dyn Sampler, requested: &[String], excluded: &[String]) -> Result<Vec<String>> {
    let available = sampler.list_collections()?;
    if available.is_empty() {
        bail!("no collections found");
    }
    let targets = select_collections(&available, requested, excluded);
    if targets.is_empty() {
        bail!("no collections to process");
    }
    Ok(targets)
}

/// Infer every target; a collection whose sampling fails is skipped with a
/// warning. Fails only when nothing could be inferred.
fn infer_targets(sampler: &dyn Sampler, targets: &[String], sample_size: usize) -> Result<Vec<CollectionSchema>> {
    let mut schemas = Vec::<CollectionSchema>::with_capacity(targets.len());
    for result in pipeline::infer_collections(sampler, targets, sample_size) {
        match result {
            Ok(schema) => {
                tracing::info!(collection = %schema.collection, documents = schema.documents(), "inferred schema");
                schemas.push(schema);
            }
            Err(error) => {
                tracing::warn!(%error, "skipping collection");
            }
        }
    }
    if schemas.is_empty() {
        bail!("generation finished with no output");
    }
    Ok(schemas)
}

/// Requested collections (all when empty) minus exclusions, keeping request
/// order. Unknown requested names are warned about and dropped.
fn select_collections(available: &[String], requested: &[String], excluded: &[String]) -> Vec<String> {
    let requested: Vec<String> = requested.iter()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect();
    let targets = if requested.is_empty() {
        available.to_vec()
    } else {
        let missing: Vec<&str> = requested.iter()
            .filter(|c| !available.contains(c))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            tracing::warn!(missing = %missing.join(", "), "specified collections not found");
        }
        requested.into_iter().filter(|c| available.contains(c)).collect()
    };
    targets.into_iter()
        .filter(|c| !excluded.iter().any(|e| e.trim() == c.as_str()))
        .collect()
}
