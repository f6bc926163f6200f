//! qntm-setup CLI - install QNTM site components
//!
//! Usage:
//!   qntm-setup                     Interactive session (Block / Module / Clean Up / Cancel)
//!   qntm-setup list <kind>         Show components of a catalog and their state
//!   qntm-setup clean-up            Delete every catalog mirror

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qntm_setup::{
    cleanup, config, output, CatalogKind, CatalogMirror, GitMirror, OfflineMirror, Reconciliation,
    Session, SessionEnd, TermPrompter,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qntm-setup")]
#[command(about = "Install, reinstall, rename and remove QNTM site components")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Theme root (where functions.php lives)
    #[arg(short, long, global = true, env = "QNTM_ROOT", default_value = ".")]
    root: PathBuf,

    /// Extra config file, applied after the user and project configs
    #[arg(short, long, global = true, env = "QNTM_CONFIG")]
    config: Option<PathBuf>,

    /// Never run git; use the mirrors already on disk
    #[arg(long, global = true)]
    offline: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List a catalog's components and whether they are installed
    List {
        /// Catalog to list
        #[arg(value_enum)]
        kind: CatalogKind,
    },

    /// Delete the repository cache
    CleanUp,
}

fn main() {
    let cli = Cli::parse();

    // Every failure is reported here; the exit status stays 0.
    if let Err(e) = run(cli) {
        output::error(&format!("{:#}", e));
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("Theme root not found: {}", cli.root.display()))?;
    let project = config::load_project(&root, cli.config.as_deref())?;

    let mirror: &dyn CatalogMirror = if cli.offline { &OfflineMirror } else { &GitMirror };

    match cli.command {
        None => {
            let mut prompter = TermPrompter::new();
            let end = Session::new(&project, mirror, &mut prompter).run();
            // Aborted sessions were already reported; Cancel reports itself
            if matches!(end, SessionEnd::Finished { .. }) && end.completed_actions() > 0 {
                output::success("Operation completed successfully.");
            }
        }

        Some(Commands::List { kind }) => {
            let catalog = project.catalog(kind);
            mirror.sync(&project, catalog, true)?;
            let rec = Reconciliation::scan(&project.mirror_dir(catalog), &project.target_dir(catalog))?;
            let names = rec.choices();
            if names.is_empty() {
                output::info(&format!("No {} components", kind.label().to_lowercase()));
                return Ok(());
            }

            let ledgered = project.ledger(catalog).directives()?;
            output::info(&format!("{} components:", kind));
            for name in names {
                let class = rec.classify(&name)?;
                let mut status = format!("[{}]", class);
                if class.is_installed() && !ledgered.contains(&catalog.component_path(&name)) {
                    status.push_str(" [not in ledger]");
                }
                output::list_item(&name, &status, class.is_installed());
            }
        }

        Some(Commands::CleanUp) => {
            cleanup::clean_all(&project.resolve(&project.mirror_root))?;
        }
    }

    Ok(())
}
