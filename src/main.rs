//! Fancard CLI
//!
//! Usage:
//!   fancard [OPTIONS] <COMMAND>
//!
//! Commands:
//!   render     Render a card to SVG
//!   place      Print frame placements
//!   documents  Manage saved documents
//!   configs    Manage saved configurations
//!   export     Export a card image
//!
//! Options:
//!   -c, --config <FILE>   Application config (TOML format)
//!   --storage <DIR>       Snapshot directory
//!   -v, --verbose         Debug logging
//!   -h, --help            Print help

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fancard::snapshot::Collection;
use fancard::{
    AppConfig, DurableMedium, Exporter, FileMedium, Session, Shell, SnapshotStore, SvgConfig,
    SvgPassthrough, Workspace,
};

/// Name of the config file picked up from the working directory
const LOCAL_CONFIG: &str = "fancard.toml";

#[derive(Parser)]
#[command(name = "fancard")]
#[command(about = "Fanned image card compositions")]
struct Cli {
    /// Application config file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding saved documents and configurations
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a card to SVG on stdout or into a file
    Render {
        #[command(flatten)]
        card: CardArgs,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Omit the XML declaration and indentation
        #[arg(long)]
        compact: bool,
    },

    /// Print the placement of every frame
    Place {
        #[command(flatten)]
        card: CardArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage saved documents
    Documents {
        #[command(subcommand)]
        action: SnapshotAction,
    },

    /// Manage saved configurations
    Configs {
        #[command(subcommand)]
        action: SnapshotAction,
    },

    /// Export the card image into a directory
    Export {
        #[command(flatten)]
        card: CardArgs,

        /// File name stem (defaults to the document title)
        #[arg(short, long)]
        title: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum SnapshotAction {
    /// List saved entries
    List,

    /// Print one entry as JSON
    Show { id: String },

    /// Save the card described by the flags
    Save {
        title: String,

        #[command(flatten)]
        card: CardArgs,
    },

    /// Delete an entry
    Delete {
        id: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Flags describing a card: an optional saved starting point plus edits
#[derive(Args)]
struct CardArgs {
    /// Start from a saved document
    #[arg(long, value_name = "ID")]
    document: Option<String>,

    /// Apply a saved configuration
    #[arg(long = "use-config", value_name = "ID")]
    use_config: Option<String>,

    /// Image URL; repeat for more frames
    #[arg(short, long = "image", value_name = "URL")]
    images: Vec<String>,

    #[arg(long)]
    image_width: Option<f64>,
    #[arg(long)]
    image_height: Option<f64>,
    #[arg(long)]
    background_width: Option<u32>,
    #[arg(long)]
    background_color: Option<String>,
    #[arg(long)]
    border_radius: Option<f64>,
    #[arg(long)]
    shadow: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    fan_rotation: Option<f64>,
    #[arg(long)]
    fan_spacing: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    fan_height_diff: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    translate_x: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    translate_y: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    image_rotate: Option<f64>,
}

/// Asks on stderr and reads the answer from stdin
struct TerminalShell {
    assume_yes: bool,
}

impl Shell for TerminalShell {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{} [y/N] ", message.trim_end());
        let _ = io::stderr().flush();
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

type CliWorkspace = Workspace<FileMedium, TerminalShell>;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref());
    let storage = cli.storage.clone().unwrap_or_else(|| config.storage_dir());
    let medium = match FileMedium::open(&storage) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error opening storage '{}': {}", storage.display(), e);
            std::process::exit(1);
        }
    };

    let assume_yes = matches!(
        &cli.command,
        Command::Documents {
            action: SnapshotAction::Delete { yes: true, .. }
        } | Command::Configs {
            action: SnapshotAction::Delete { yes: true, .. }
        }
    );
    let mut workspace = Workspace::new(
        config.new_session(),
        SnapshotStore::open(medium),
        TerminalShell { assume_yes },
    );

    match cli.command {
        Command::Render {
            card,
            output,
            compact,
        } => {
            apply_card(&mut workspace, &card);
            let svg_config = SvgConfig::new()
                .with_pretty_print(!compact)
                .with_standalone(!compact);
            let svg = workspace.render_svg(&svg_config);
            match output {
                Some(path) => {
                    if let Err(e) = fs::write(&path, svg) {
                        eprintln!("Error writing '{}': {}", path.display(), e);
                        std::process::exit(1);
                    }
                }
                None => println!("{}", svg),
            }
        }
        Command::Place { card, json } => {
            apply_card(&mut workspace, &card);
            print_placements(workspace.session(), json);
        }
        Command::Documents { action } => run_action(&mut workspace, Collection::Documents, action),
        Command::Configs { action } => {
            run_action(&mut workspace, Collection::Configurations, action)
        }
        Command::Export {
            card,
            title,
            output,
        } => {
            let title = title.or_else(|| {
                card.document.as_ref().and_then(|id| {
                    workspace
                        .store()
                        .load(Collection::Documents, id)
                        .ok()
                        .map(|s| s.title)
                })
            });
            apply_card(&mut workspace, &card);
            let mut exporter = Exporter::with_options(SvgPassthrough, config.export.clone());
            let exported =
                fancard::export_card(workspace.session(), &mut exporter, title.as_deref());
            let Some(out) = exported else {
                eprintln!("Error: export failed");
                std::process::exit(1);
            };
            match out.write_to(&output) {
                Ok(path) => println!("{}", path.display()),
                Err(e) => {
                    eprintln!("Error writing export: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> AppConfig {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let local = PathBuf::from(LOCAL_CONFIG);
            if !local.exists() {
                return AppConfig::default();
            }
            local
        }
    };
    match AppConfig::from_file(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

/// Load the saved starting points, then apply the edit flags
fn apply_card(workspace: &mut CliWorkspace, card: &CardArgs) {
    if let Some(id) = &card.document {
        if !workspace.load_document(id) {
            eprintln!("Error: no document with id '{}'", id);
            std::process::exit(1);
        }
    }
    if let Some(id) = &card.use_config {
        if !workspace.load_configuration(id) {
            eprintln!("Error: no configuration with id '{}'", id);
            std::process::exit(1);
        }
    }

    if !card.images.is_empty() {
        let slots = workspace.session_mut().slots_mut();
        *slots = fancard::ImageSlots::from_urls(card.images.clone());
    }

    let session = workspace.session_mut();
    if let Some(w) = card.image_width {
        session.set_image_width(w);
    }
    if let Some(h) = card.image_height {
        session.set_image_height(h);
    }
    if let Some(w) = card.background_width {
        session.set_background_width(w);
    }
    if let Some(r) = card.border_radius {
        session.set_border_radius(r);
    }
    if let Some(s) = card.shadow {
        session.set_shadow(s);
    }
    if let Some(r) = card.fan_rotation {
        session.set_fan_rotation(r);
    }
    if let Some(s) = card.fan_spacing {
        session.set_fan_spacing(s);
    }
    if let Some(d) = card.fan_height_diff {
        session.set_fan_vertical_height_diff(d);
    }
    if let Some(x) = card.translate_x {
        session.set_translate_x(x);
    }
    if let Some(y) = card.translate_y {
        session.set_translate_y(y);
    }
    if let Some(r) = card.image_rotate {
        session.set_image_rotate(r);
    }
    if let Some(color) = &card.background_color {
        if let Err(e) = session.set_background_color(color) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_placements(session: &Session, json: bool) {
    let placements = session.placements();
    if json {
        match serde_json::to_string_pretty(&placements) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!(
        "{:>5} {:>9} {:>9} {:>9} {:>9} {:>9} {:>4}",
        "index", "x", "y", "rotation", "offset_x", "offset_y", "z"
    );
    for (i, p) in placements.iter().enumerate() {
        println!(
            "{:>5} {:>9.1} {:>9.1} {:>9.1} {:>9.1} {:>9.1} {:>4}",
            i, p.x, p.y, p.rotation_degrees, p.offset_x, p.offset_y, p.z_index
        );
    }
}

fn run_action(workspace: &mut CliWorkspace, collection: Collection, action: SnapshotAction) {
    match action {
        SnapshotAction::List => {
            let items = workspace.store().list(collection);
            if items.is_empty() {
                println!("No saved {}s", collection);
            }
            for item in items {
                match &item.image_urls {
                    Some(urls) => println!("{}  {}  ({} images)", item.id, item.title, urls.len()),
                    None => println!("{}  {}", item.id, item.title),
                }
            }
        }
        SnapshotAction::Show { id } => {
            let snapshot = match workspace.store().load(collection, &id) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            match serde_json::to_string_pretty(&snapshot) {
                Ok(s) => println!("{}", s),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        SnapshotAction::Save { title, card } => {
            apply_card(workspace, &card);
            let id = match collection {
                Collection::Documents => {
                    workspace.set_document_title(title);
                    workspace.save_document()
                }
                Collection::Configurations => {
                    workspace.set_configuration_title(title);
                    workspace.save_configuration()
                }
            };
            match id {
                Some(id) => println!("{}", id),
                None => {
                    eprintln!("Error: {} was not saved", collection);
                    std::process::exit(1);
                }
            }
        }
        SnapshotAction::Delete { id, .. } => {
            if delete_entry(workspace, collection, &id) {
                println!("Deleted {} {}", collection, id);
            } else {
                println!("Nothing to delete");
            }
        }
    }
}

/// Delete after confirmation. An unknown id is not an error.
fn delete_entry<M: DurableMedium, S: Shell>(
    workspace: &mut Workspace<M, S>,
    collection: Collection,
    id: &str,
) -> bool {
    match collection {
        Collection::Documents => workspace.delete_document(id),
        Collection::Configurations => workspace.delete_configuration(id),
    }
}
