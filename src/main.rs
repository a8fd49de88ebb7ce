use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use weber::logger::{self, LogLevel, LoggerConfig};
use weber::{
    view, AspectRatio, GeminiClient, GenerationOutcome, ImageStyle, ReferenceImage, Session,
    WeberConfig,
};

#[derive(Debug, Parser)]
#[command(name = "weber", version, about = "Generate images with Gemini from your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Image model (overrides WEBER_IMAGE_MODEL)
    #[arg(long, global = true)]
    image_model: Option<String>,

    /// Text model used for random prompts (overrides WEBER_TEXT_MODEL)
    #[arg(long, global = true)]
    text_model: Option<String>,

    /// Directory downloads are written to (overrides WEBER_DOWNLOAD_DIR)
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also append JSON log lines to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive session (default)
    Shell,
    /// Generate one image and save it
    Generate(GenerateArgs),
    /// Print a random prompt suggestion
    Random,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// What to draw
    prompt: String,
    #[arg(long, default_value = "digital-art")]
    style: ImageStyle,
    #[arg(long, default_value = "1:1")]
    ratio: AspectRatio,
    #[arg(long)]
    seed: Option<String>,
    /// Reference image (PNG, JPEG or WebP)
    #[arg(long = "ref")]
    reference: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> weber::Result<()> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let logger_config = match &cli.log_file {
        Some(path) => LoggerConfig::production().with_file_output(path),
        None => LoggerConfig::new(),
    };
    logger::init_with_config(logger_config.with_level(LogLevel::from_verbosity(cli.verbose)))?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using process environment");
    }

    let mut config = match WeberConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(e);
        }
    };
    if let Some(model) = cli.image_model {
        config = config.with_image_model(model);
    }
    if let Some(model) = cli.text_model {
        config = config.with_text_model(model);
    }
    if let Some(out) = cli.out {
        config = config.with_download_dir(out);
    }
    logger::log_startup_info(&config);

    let client = Arc::new(GeminiClient::new(config)?);

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => run_shell(client).await?,
        Command::Generate(args) => run_once(client, args).await?,
        Command::Random => println!("{}", client.text().random_prompt().await),
    }

    Ok(())
}

fn load_reference(path: &Path) -> weber::Result<ReferenceImage> {
    let mime_type = ReferenceImage::mime_type_for_path(path).ok_or_else(|| {
        weber::WeberError::ValidationError(format!(
            "{} is not a PNG, JPEG or WebP file",
            path.display()
        ))
    })?;
    let bytes = std::fs::read(path)?;
    ReferenceImage::new(bytes, mime_type)
}

async fn run_once(client: Arc<GeminiClient>, args: GenerateArgs) -> weber::Result<()> {
    let download_dir = client.config().download_dir.clone();
    let mut session = Session::with_client(client);

    session.set_prompt(args.prompt);
    session.set_style(args.style);
    session.set_aspect_ratio(args.ratio);
    if let Some(seed) = &args.seed {
        session.set_seed(seed);
    }
    if let Some(path) = &args.reference {
        session.set_reference_image(load_reference(path)?);
    }

    let id = session.submit().await?;
    if let Some(image) = session.image(&id) {
        let path = Session::download(&image.src, &image.prompt, &download_dir)?;
        println!("{}", path.display());
    }
    Ok(())
}

async fn run_shell(client: Arc<GeminiClient>) -> weber::Result<()> {
    let download_dir = client.config().download_dir.clone();
    let mut session = Session::with_client(client);

    println!("{}", "WEBER".red().bold());
    println!("{}", view::render_help());
    println!();
    println!("{}", view::render_form(&session));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".red().bold());
        let _ = std::io::Write::flush(&mut std::io::stdout());

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => println!("{}", view::render_help()),
            "form" => println!("{}", view::render_form(&session)),
            "list" => println!("{}", view::render_gallery(session.gallery())),
            "styles" => println!("{}", view::render_styles(session.style())),
            "prompt" => session.set_prompt(rest),
            "style" => match rest.parse::<ImageStyle>() {
                Ok(style) => session.set_style(style),
                Err(e) => print_error(&e.to_string()),
            },
            "ratio" => match rest.parse::<AspectRatio>() {
                Ok(ratio) => session.set_aspect_ratio(ratio),
                Err(e) => {
                    print_error(&e.to_string());
                    println!("{}", view::render_ratios(session.aspect_ratio()));
                }
            },
            "seed" => session.set_seed(rest),
            "ref" => match load_reference(Path::new(rest)) {
                Ok(image) => session.set_reference_image(image),
                Err(e) => print_error(&e.to_string()),
            },
            "unref" => session.clear_reference_image(),
            "random" => {
                let prompt = session.surprise_me().await;
                println!("Prompt: {}", prompt.italic());
            }
            "generate" => {
                if let Some(reason) = session.skip_reason() {
                    print_error(reason);
                    continue;
                }
                println!("Generating...");
                let outcome = session.generate_from_form().await;
                report(&session, outcome);
            }
            "regen" => {
                let Some(image) = gallery_entry(&session, rest).cloned() else {
                    continue;
                };
                println!("Generating...");
                let outcome = session.regenerate(&image.prompt, image.style).await;
                report(&session, outcome);
            }
            "download" => {
                let Some(image) = gallery_entry(&session, rest) else {
                    continue;
                };
                match Session::download(&image.src, &image.prompt, &download_dir) {
                    Ok(path) => println!("Saved {}", path.display()),
                    Err(e) => print_error(&e.to_string()),
                }
            }
            other => print_error(&format!("Unknown command: {} (try `help`)", other)),
        }
    }

    Ok(())
}

fn gallery_entry<'a>(session: &'a Session, arg: &str) -> Option<&'a weber::GeneratedImage> {
    let entry = arg
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| session.gallery().get(i));
    if entry.is_none() {
        print_error(&format!("No gallery entry `{}`", arg));
    }
    entry
}

fn report(session: &Session, outcome: GenerationOutcome) {
    match outcome {
        GenerationOutcome::Generated(_) => {
            if let Some(image) = session.gallery().first() {
                println!("{}", view::render_card(0, image).green());
            }
        }
        GenerationOutcome::Failed(e) => print_error(&e.to_string()),
        GenerationOutcome::Skipped => {}
    }
}

fn print_error(message: &str) {
    println!("{} {}", "Error:".red().bold(), message);
}
