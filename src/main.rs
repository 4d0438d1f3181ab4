use clap::Parser;
use directories::ProjectDirs;
use slidedeck::{
    init_logging, Clock, CommandListener, Config, ConfigLoadError, Deck, FilePreferenceStore, HelpOverlay, LogConfig,
    PreferenceStore, Presenter, SystemClock, ThemePreference, ThemeStore, UnavailablePreferenceStore,
};
use std::{
    env,
    path::{Path, PathBuf},
    rc::Rc,
    time::Duration,
};

/// Present slide decks from your terminal.
#[derive(Parser)]
#[command(author, version, about, arg_required_else_help = true)]
struct Cli {
    /// The path to the YAML file that describes the deck.
    #[clap(required_unless_present = "list_bindings")]
    path: Option<PathBuf>,

    /// The path to the configuration file.
    #[clap(short, long)]
    config_file: Option<PathBuf>,

    /// The theme to use for this session. This does not change the stored preference.
    #[clap(short, long)]
    theme: Option<ThemePreference>,

    /// Write logs to this file.
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity. Can be used multiple times.
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// List the configured key bindings and exit.
    #[clap(long)]
    list_bindings: bool,
}

fn load_config(config_file_path: Option<PathBuf>) -> Result<Config, ConfigLoadError> {
    if let Some(path) = config_file_path {
        return Config::load(&path);
    }
    let configs_path: PathBuf = match env::var("XDG_CONFIG_HOME") {
        Ok(path) => Path::new(&path).join("slidedeck"),
        Err(_) => {
            let Some(project_dirs) = ProjectDirs::from("", "", "slidedeck") else {
                return Ok(Default::default());
            };
            project_dirs.config_dir().into()
        }
    };
    match Config::load(&configs_path.join("config.yaml")) {
        Ok(config) => Ok(config),
        Err(ConfigLoadError::NotFound) => Ok(Default::default()),
        Err(e) => Err(e),
    }
}

fn make_preference_store() -> Box<dyn PreferenceStore> {
    match FilePreferenceStore::default_path() {
        Some(path) => Box::new(FilePreferenceStore::open(path)),
        None => Box::new(UnavailablePreferenceStore),
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LogConfig::from_verbosity(cli.verbose).with_log_file(cli.log_file.clone()))?;
    let config = load_config(cli.config_file.clone())?;
    if cli.list_bindings {
        for line in HelpOverlay::new(&config.bindings).lines() {
            println!("{line}");
        }
        return Ok(());
    }
    let Some(path) = cli.path else {
        return Err("no deck path specified".into());
    };
    let deck = Deck::load(&path)?;
    tracing::info!("presenting {} with {} slides", path.display(), deck.slides.len());

    let clock: Rc<dyn Clock> = Rc::new(SystemClock);
    let notification_delay = Duration::from_millis(config.theme.notification_delay_ms);
    let mut theme = ThemeStore::new(make_preference_store(), clock.clone(), notification_delay);
    if let Some(preference) = cli.theme {
        theme.override_theme(preference);
    }
    theme.subscribe(|theme: ThemePreference| tracing::debug!("theme is now {theme}"));

    let commands = CommandListener::new(config.bindings.clone())?;
    let presenter = Presenter::open(deck, &config, theme, clock)?;
    presenter.present(commands)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
