use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use yamlview::document::{DocumentController, ExpansionPolicy};
use yamlview::file::Preferences;
use yamlview::model::{TreeDebug, TreeFormatOptions};
use yamlview::viewer::Viewer;
use yamlview::viewer::terminal::{Console, ConsoleChooser, ConsoleMessages, Terminal};
use yamlview_core::logging::{self, targets};

/// Browse and edit YAML documents as a tree
#[derive(Parser, Debug)]
#[command(name = "yamlview", version)]
#[command(about = "Browse and edit YAML documents as a lazily expanded tree", long_about = None)]
struct Args {
    /// YAML document to open on start
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Build only the top level on load; expand deeper rows on demand
    #[arg(long)]
    lazy: bool,

    /// Preferences file [default: the platform config directory]
    #[arg(long, value_name = "FILE")]
    preferences: Option<PathBuf>,

    /// Draw the tree with ASCII characters only
    #[arg(long)]
    ascii: bool,
}

fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    let preferences_path = args.preferences.clone().or_else(Preferences::default_path);
    let preferences = match &preferences_path {
        Some(path) => Preferences::load_or_default(path),
        None => {
            tracing::warn!(target: targets::PREFERENCES, "no config directory; preferences will not be kept");
            Preferences::default()
        }
    };

    let policy = if args.lazy {
        ExpansionPolicy::RootOnly
    } else {
        ExpansionPolicy::ExpandAll
    };

    let console = Console::shared(io::stdin().lock(), io::stdout());
    let mut viewer = Viewer::new(
        DocumentController::new(policy),
        preferences,
        ConsoleChooser::new(console.clone()),
        ConsoleMessages::new(console.clone()),
    );

    if let Some(file) = &args.file {
        viewer.open_path(file);
    }

    let options = if args.ascii {
        TreeFormatOptions::ascii()
    } else {
        TreeFormatOptions::default()
    };
    let result = Terminal::new(console, TreeDebug::with_options(options)).run(&mut viewer);

    if let Some(path) = preferences_path {
        if let Err(err) = viewer.into_preferences().save(&path) {
            tracing::warn!(target: targets::PREFERENCES, %err, "cannot save preferences");
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
