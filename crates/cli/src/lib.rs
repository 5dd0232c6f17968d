//! Marginalia CLI
//!
//! Scripting front end over the annotation engine: every mutation loads the
//! document's set from storage, routes through the same command dispatch the
//! interactive surface uses, and saves the result back.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use marginalia_core::{export_json, import_json, AnnotationId, BoxKind, Command, EditorSession};
use marginalia_storage::AnnotationStorage;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "marginalia")]
#[command(about = "Annotate documents from the command line")]
pub struct Cli {
    /// Storage root (defaults to the platform data directory)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add a text label to a document's annotation set.
    AddText {
        #[arg(value_name = "DOCUMENT")]
        document: String,
        #[arg(long, default_value_t = 50.0)]
        x: f32,
        #[arg(long, default_value_t = 50.0)]
        y: f32,
    },
    /// Add a rectangle, highlight or opaque mask.
    AddBox {
        #[arg(value_name = "DOCUMENT")]
        document: String,
        #[arg(long, value_enum)]
        kind: KindArg,
    },
    /// Print the document's annotations as JSON.
    List {
        #[arg(value_name = "DOCUMENT")]
        document: String,
    },
    /// Remove annotations by id.
    Remove {
        #[arg(value_name = "DOCUMENT")]
        document: String,
        #[arg(value_name = "ID", required = true)]
        ids: Vec<AnnotationId>,
    },
    /// Export the annotation set to a portable JSON file.
    Export {
        #[arg(value_name = "DOCUMENT")]
        document: String,
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Replace the annotation set from a portable JSON file.
    Import {
        #[arg(value_name = "DOCUMENT")]
        document: String,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Rect,
    Highlight,
    Opaque,
}

impl From<KindArg> for BoxKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Rect => BoxKind::Rect,
            KindArg::Highlight => BoxKind::Highlight,
            KindArg::Opaque => BoxKind::Opaque,
        }
    }
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let storage = open_storage(cli.root)?;

    match cli.command {
        Commands::AddText { document, x, y } => {
            let mut session = open_session(&storage, &document)?;
            session.apply(Command::AddText { x, y })?;
            save_session(&storage, &session)?;
            let id = session.set().ids().last().context("set cannot be empty after add")?;
            println!("{id}");
            Ok(())
        }
        Commands::AddBox { document, kind } => {
            let mut session = open_session(&storage, &document)?;
            session.apply(Command::AddBox { kind: kind.into() })?;
            save_session(&storage, &session)?;
            let id = session.set().ids().last().context("set cannot be empty after add")?;
            println!("{id}");
            Ok(())
        }
        Commands::List { document } => {
            let session = open_session(&storage, &document)?;
            let bytes = export_json(session.set())?;
            println!("{}", String::from_utf8_lossy(&bytes));
            Ok(())
        }
        Commands::Remove { document, ids } => {
            let mut session = open_session(&storage, &document)?;
            // A repeated id must not toggle itself back out of the selection.
            let unique: HashSet<AnnotationId> = ids.into_iter().collect();
            for (i, id) in unique.into_iter().enumerate() {
                session.apply(Command::Select { id, extend: i > 0 })?;
            }
            session.apply(Command::DeleteSelected)?;
            save_session(&storage, &session)?;
            Ok(())
        }
        Commands::Export { document, output } => {
            let session = open_session(&storage, &document)?;
            let bytes = export_json(session.set())?;
            match output {
                Some(path) => {
                    fs::write(&path, bytes)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("{}", path.display());
                }
                None => println!("{}", String::from_utf8_lossy(&bytes)),
            }
            Ok(())
        }
        Commands::Import { document, file } => {
            let bytes = fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let incoming = import_json(&bytes)
                .with_context(|| format!("rejected import from {}", file.display()))?;

            let mut session = open_session(&storage, &document)?;
            session.apply(Command::Import {
                annotations: incoming.into_annotations(),
            })?;
            save_session(&storage, &session)?;
            println!("imported {} annotations", session.set().len());
            Ok(())
        }
    }
}

fn open_storage(root: Option<PathBuf>) -> Result<AnnotationStorage> {
    match root {
        Some(root) => Ok(AnnotationStorage::with_root(root)),
        None => AnnotationStorage::from_default_project()
            .context("failed to resolve annotation storage"),
    }
}

fn open_session(storage: &AnnotationStorage, document: &str) -> Result<EditorSession> {
    let set = storage
        .load(document)
        .with_context(|| format!("failed to load annotations for {document:?}"))?
        .unwrap_or_default();
    Ok(EditorSession::with_set(document, set))
}

fn save_session(storage: &AnnotationStorage, session: &EditorSession) -> Result<()> {
    storage
        .save(session.document(), session.set())
        .with_context(|| format!("failed to save annotations for {:?}", session.document()))
}
