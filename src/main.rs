//! pbxtree - idempotent editing of Xcode-style project trees.
//!
//! Usage:
//!   pbxtree init -t App                         Create an empty project snapshot
//!   pbxtree tree                                Print the group tree
//!   pbxtree resolve ID                          Resolve a node's absolute path
//!   pbxtree locate Sources/Generated [--create] Find (or create) a group
//!   pbxtree add-file PATH -g GROUP -t TARGET    Attach a file to a group and target
//!   pbxtree sources -t TARGET                   List a target's source files
//!
//! The project is read from and written to a JSON snapshot (`--project`).

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use tracing_subscriber::EnvFilter;

use pbxtree_core::{
    IdStrategy, ObjectId, PhaseKind, Project, ProjectDocument, ProjectError, SessionConfig,
};
use pbxtree_ops::{FileAttacher, locate, locate_or_create, source_file_paths};

#[derive(Parser)]
#[command(
    name = "pbxtree",
    version,
    about = "Idempotent editing of Xcode-style project trees",
    long_about = "pbxtree resolves node paths and adds groups and source files to a \
                  project tree without ever creating duplicates.\n\n\
                  The tree is stored as a JSON snapshot; set RUST_LOG=debug to see \
                  every object that gets created."
)]
struct Cli {
    /// Project snapshot file
    #[arg(short, long, global = true, default_value = "project.json")]
    project: PathBuf,

    /// Directory that relative paths resolve against
    #[arg(short = 'r', long, global = true, default_value = ".")]
    source_root: PathBuf,

    /// Identifier minting strategy (sequential, hashed)
    #[arg(long, global = true, default_value = "hashed")]
    ids: IdStrategy,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty project with the given targets
    Init {
        /// Target to create (with an empty sources phase)
        #[arg(short, long)]
        target: Vec<String>,
    },

    /// Print the group tree with resolved paths
    Tree,

    /// Resolve the absolute path of a node
    Resolve {
        /// Node identifier
        id: String,
    },

    /// Find a group by slash-delimited path
    Locate {
        /// Group path, e.g. "Sources/Generated"
        group_path: String,

        /// Create missing groups
        #[arg(short, long)]
        create: bool,

        /// Start from this group instead of the root group
        #[arg(long)]
        from: Option<String>,
    },

    /// Attach a file to a group and a target's sources phase
    AddFile {
        /// File path
        path: PathBuf,

        /// Destination group path (created if missing, root when empty)
        #[arg(short, long, default_value = "")]
        group: String,

        /// Target name
        #[arg(short, long)]
        target: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List the resolved source files of a target
    Sources {
        /// Target name
        #[arg(short, long)]
        target: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = session_config(&cli.source_root, cli.ids)?;

    match cli.command {
        Command::Init { target } => run_init(&cli.project, &config, &target),
        Command::Tree => run_tree(&load(&cli.project, &config)?),
        Command::Resolve { id } => run_resolve(&load(&cli.project, &config)?, &id),
        Command::Locate {
            group_path,
            create,
            from,
        } => run_locate(&cli.project, &config, &group_path, create, from),
        Command::AddFile {
            path,
            group,
            target,
            format,
        } => run_add_file(&cli.project, &config, &path, &group, &target, format),
        Command::Sources { target, format } => {
            run_sources(&load(&cli.project, &config)?, &target, format)
        }
    }
}

/// Build the session config from the global flags.
fn session_config(source_root: &Path, ids: IdStrategy) -> Result<SessionConfig, ProjectError> {
    SessionConfig::builder()
        .source_root(source_root)
        .id_strategy(ids)
        .build()
        .map_err(|e| ProjectError::InvalidConfig {
            message: e.to_string(),
        })
}

/// Create a fresh snapshot.
fn run_init(snapshot: &Path, config: &SessionConfig, targets: &[String]) -> Result<()> {
    let mut project = Project::new(config);
    for name in targets {
        let target = project.add_target(name.as_str())?;
        project.add_build_phase(&target, PhaseKind::Sources)?;
    }
    save(snapshot, &project)?;
    eprintln!("Created {} with {} target(s)", snapshot.display(), targets.len());
    Ok(())
}

/// Print the group tree.
fn run_tree(project: &Project) -> Result<()> {
    let root = project.root_group()?;
    print_element(project, &root, 0, project.store().len());
    Ok(())
}

/// Print a node's resolved path.
fn run_resolve(project: &Project, id: &str) -> Result<()> {
    let path = project.resolve(&ObjectId::new(id))?;
    println!("{}", path.display());
    Ok(())
}

/// Find or create a group and print its identifier.
fn run_locate(
    snapshot: &Path,
    config: &SessionConfig,
    group_path: &str,
    create: bool,
    from: Option<String>,
) -> Result<()> {
    let mut project = load(snapshot, config)?;
    let from = from.map(ObjectId::new);

    let group = if create {
        let before = project.store().len();
        let group = locate_or_create(&mut project, group_path, from.as_ref())?;
        if project.store().len() != before {
            save(snapshot, &project)?;
        }
        group
    } else {
        locate(&project, group_path, from.as_ref())?
            .ok_or_else(|| eyre!("Group not found: {group_path}"))?
    };

    println!("{group}\t{}", project.resolve(&group)?.display());
    Ok(())
}

/// Attach a file and save the snapshot.
fn run_add_file(
    snapshot: &Path,
    config: &SessionConfig,
    path: &Path,
    group_path: &str,
    target_name: &str,
    format: OutputFormat,
) -> Result<()> {
    let mut project = load(snapshot, config)?;
    let target = project.target_named(target_name)?;
    let group = locate_or_create(&mut project, group_path, None)?;

    let outcome = FileAttacher::new()
        .attach(&mut project, path, &group, &target)
        .with_context(|| format!("Failed to add {}", path.display()))?;

    // Group creation alone also changes the tree.
    save(snapshot, &project)?;

    match format {
        OutputFormat::Text => {
            let status = match (outcome.created, outcome.linked) {
                (true, _) => "added",
                (false, true) => "linked",
                (false, false) => "unchanged",
            };
            println!("{status}\t{}\t{}", outcome.file_reference, path.display());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}

/// List a target's source files.
fn run_sources(project: &Project, target_name: &str, format: OutputFormat) -> Result<()> {
    let target = project.target_named(target_name)?;
    let paths = source_file_paths(project, &target)?;

    match format {
        OutputFormat::Text => {
            for path in &paths {
                println!("{}", path.display());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&paths)?);
        }
    }

    Ok(())
}

/// Print an element and, for groups, its children.
fn print_element(project: &Project, id: &ObjectId, depth: usize, max_depth: usize) {
    let store = project.store();
    let Some(element) = store.element(id) else {
        return;
    };

    let indent = "  ".repeat(depth);
    let name = element.display_name().unwrap_or("<root>");
    let marker = if element.is_group() { "/" } else { "" };
    let resolved = project
        .resolve(id)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "-".to_string());

    println!("{indent}{name}{marker}  [{id}]  {resolved}");

    if depth < max_depth {
        for child in element.children() {
            print_element(project, child, depth + 1, max_depth);
        }
    }
}

/// Read a project snapshot.
fn load(snapshot: &Path, config: &SessionConfig) -> Result<Project> {
    let json = std::fs::read_to_string(snapshot)
        .with_context(|| format!("Failed to read {}", snapshot.display()))?;
    let document: ProjectDocument = serde_json::from_str(&json)
        .with_context(|| format!("Invalid project snapshot {}", snapshot.display()))?;
    Ok(Project::from_document(document, config)?)
}

/// Write a project snapshot.
fn save(snapshot: &Path, project: &Project) -> Result<()> {
    let json = serde_json::to_string_pretty(&project.to_document())?;
    std::fs::write(snapshot, json)
        .with_context(|| format!("Failed to write {}", snapshot.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config() -> SessionConfig {
        SessionConfig::builder()
            .source_root("/proj")
            .id_strategy(IdStrategy::Sequential)
            .build()
            .unwrap()
    }

    #[test]
    fn test_init_then_add_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let snapshot = dir.path().join("project.json");

        run_init(&snapshot, &config(), &["App".to_string()]).unwrap();
        run_add_file(
            &snapshot,
            &config(),
            Path::new("/x/a.c"),
            "Sources",
            "App",
            OutputFormat::Text,
        )
        .unwrap();
        run_add_file(
            &snapshot,
            &config(),
            Path::new("/x/a.c"),
            "Sources",
            "App",
            OutputFormat::Json,
        )
        .unwrap();

        let project = load(&snapshot, &config()).unwrap();
        let target = project.target_named("App").unwrap();
        assert_eq!(
            source_file_paths(&project, &target).unwrap(),
            vec![PathBuf::from("/x/a.c")]
        );
        assert_eq!(project.store().file_references().count(), 1);
        assert!(locate(&project, "Sources", None).unwrap().is_some());
    }

    #[test]
    fn test_add_file_unknown_target_fails() {
        let dir = TempDir::new().unwrap();
        let snapshot = dir.path().join("project.json");
        run_init(&snapshot, &config(), &[]).unwrap();

        let result = run_add_file(
            &snapshot,
            &config(),
            Path::new("/x/a.c"),
            "",
            "Missing",
            OutputFormat::Text,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_source_root_is_invalid_config() {
        let err = session_config(Path::new(""), IdStrategy::Hashed).unwrap_err();
        assert!(matches!(err, ProjectError::InvalidConfig { .. }));
        assert!(session_config(Path::new("/proj"), IdStrategy::Sequential).is_ok());
    }

    #[test]
    fn test_load_missing_snapshot_fails() {
        let dir = TempDir::new().unwrap();
        assert!(load(&dir.path().join("nope.json"), &config()).is_err());
    }
}
