use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use menuet::{AssetInventory, ComposeEnv, ConfigStore as _, FsConfigStore, Selection};

#[derive(Parser, Debug)]
#[command(name = "menuet", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter configuration document.
    Init(InitArgs),
    /// Load a configuration and report validation problems.
    Validate(ValidateArgs),
    /// Compose one menu and dump the scene tree as JSON.
    Compose(ComposeArgs),
    /// Print the composed scene's determinism fingerprint.
    Fingerprint(MenuArgs),
}

#[derive(Parser, Debug)]
struct InitArgs {
    /// Output config JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    #[command(flatten)]
    menu: MenuArgs,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct MenuArgs {
    /// Input config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Menu id (defaults to the first menu).
    #[arg(long)]
    menu: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Init(args) => cmd_init(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Compose(args) => cmd_compose(args),
        Command::Fingerprint(args) => cmd_fingerprint(args),
    }
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    if args.out.exists() && !args.force {
        anyhow::bail!(
            "'{}' already exists (pass --force to overwrite)",
            args.out.display()
        );
    }
    let mut store = FsConfigStore::new(&args.out);
    store
        .save(&menuet::Config::starter())
        .with_context(|| format!("write starter config '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let store = FsConfigStore::new(&args.in_path);
    let mut config = store
        .load()
        .with_context(|| format!("load config '{}'", args.in_path.display()))?;

    match config.validate() {
        Ok(()) => {
            eprintln!("ok: {} menu(s)", config.menus.len());
            Ok(())
        }
        Err(err) => {
            // Report what normalization would repair before failing.
            config.normalize();
            match config.validate() {
                Ok(()) => anyhow::bail!("{err} (repairable by normalization)"),
                Err(residual) => anyhow::bail!("{err} (not repairable: {residual})"),
            }
        }
    }
}

fn pick_menu<'a>(config: &'a menuet::Config, id: Option<&str>) -> anyhow::Result<&'a menuet::Menu> {
    match id {
        Some(id) => config
            .menu(id)
            .with_context(|| format!("no menu with id '{id}'")),
        None => config.menus.first().context("config has no menus"),
    }
}

fn compose_from(args: &MenuArgs) -> anyhow::Result<menuet::Scene> {
    let store = FsConfigStore::new(&args.in_path);
    let mut config = store
        .load()
        .with_context(|| format!("load config '{}'", args.in_path.display()))?;
    config.normalize();
    config.validate()?;

    let menu = pick_menu(&config, args.menu.as_deref())?;
    let inventory = AssetInventory::default();
    let env = ComposeEnv::new(&inventory);
    Ok(menuet::compose(menu, &env, Selection::None, None))
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let scene = compose_from(&args.menu)?;
    let json = serde_json::to_string_pretty(&scene).context("serialize scene")?;
    match args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&path, json)
                .with_context(|| format!("write scene '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_fingerprint(args: MenuArgs) -> anyhow::Result<()> {
    let scene = compose_from(&args)?;
    println!("{}", menuet::scene_fingerprint(&scene));
    Ok(())
}
