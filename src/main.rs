use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use indicatif::ProgressBar;
use miette::{IntoDiagnostic, Result};

use commitlens_classify::AnalysisOptions;
use commitlens_core::OutputFormat;

#[derive(Parser)]
#[command(
    name = "commitlens",
    version,
    about = "Classify commit history as major or minor changes",
    long_about = "Commitlens walks a repository's recent history and labels each commit\n\
                   major or minor, blending line-level diff statistics with syntax-tree\n\
                   structural deltas (new exports, functions, classes, branches).\n\n\
                   Examples:\n  \
                     commitlens analyze               Classify the last 100 commits of this repo\n  \
                     commitlens analyze ../app        Classify another local repository\n  \
                     commitlens analyze --limit 20 --format json\n  \
                     commitlens init                  Create a .commitlens.toml config file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .commitlens.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable tables and summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Classify the repository's recent commits
    #[command(long_about = "Classify the repository's recent commits.\n\n\
        Walks history newest-first and scores each commit from its diff\n\
        statistics and the structural delta of one primary source file.\n\
        Commits that cannot be structurally analyzed are still labeled from\n\
        line counts alone and marked accordingly.\n\n\
        Examples:\n  commitlens analyze\n  commitlens analyze ../other-repo --limit 50\n  commitlens analyze --branch develop --format markdown")]
    Analyze {
        /// Local repository path (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Maximum commits to analyze (default: 100, or config value)
        #[arg(long)]
        limit: Option<usize>,

        /// Branch to walk instead of HEAD
        #[arg(long)]
        branch: Option<String>,

        /// Analyze commits one at a time instead of across a worker pool
        #[arg(long)]
        sequential: bool,
    },
    /// Create a default .commitlens.toml configuration file
    #[command(long_about = "Create a default .commitlens.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .commitlens.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!(
            "\x1b[1m\x1b[33m◉\x1b[0m \x1b[1mcommitlens\x1b[0m v{version} — which commits actually changed the shape of your code\n"
        );

        println!("Quick start:");
        println!("  \x1b[36mcommitlens analyze\x1b[0m                Classify the last 100 commits");
        println!("  \x1b[36mcommitlens analyze --format json\x1b[0m  Machine-readable results");
        println!("  \x1b[36mcommitlens init\x1b[0m                   Create a .commitlens.toml config file\n");

        println!("All commands:");
        println!("  \x1b[32manalyze\x1b[0m   Label recent commits major or minor");
        println!("  \x1b[32minit\x1b[0m      Create default configuration\n");
    } else {
        println!("commitlens v{version} — which commits actually changed the shape of your code\n");

        println!("Quick start:");
        println!("  commitlens analyze                Classify the last 100 commits");
        println!("  commitlens analyze --format json  Machine-readable results");
        println!("  commitlens init                   Create a .commitlens.toml config file\n");

        println!("All commands:");
        println!("  analyze   Label recent commits major or minor");
        println!("  init      Create default configuration\n");
    }

    println!("Run 'commitlens <command> --help' for details.");
}

const DEFAULT_CONFIG: &str = r#"# commitlens configuration

[analysis]
# Maximum commits analyzed per run
# limit = 100

# Cap on source text fed to the structural parser, in bytes
# max_parse_bytes = 524288

# Analyze commits across a worker pool
# parallel = true

# Walk a branch other than HEAD
# branch = "main"
"#;

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    let config = match &cli.config {
        Some(path) => commitlens_core::CommitlensConfig::from_file(path).into_diagnostic()?,
        None => {
            let default_path = std::path::Path::new(".commitlens.toml");
            if default_path.exists() {
                commitlens_core::CommitlensConfig::from_file(default_path).into_diagnostic()?
            } else {
                commitlens_core::CommitlensConfig::default()
            }
        }
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    match cli.command {
        None => {
            print_welcome(use_color);
            Ok(())
        }
        Some(Command::Analyze {
            ref path,
            limit,
            ref branch,
            sequential,
        }) => {
            let mut options = AnalysisOptions::from_config(&config.analysis);
            if let Some(limit) = limit {
                options.limit = limit;
            }
            if branch.is_some() {
                options.branch = branch.clone();
            }
            if sequential {
                options.parallel = false;
            }
            log::debug!(
                "analyzing {} (limit: {}, parallel: {})",
                path.display(),
                options.limit,
                options.parallel,
            );

            let spinner = ProgressBar::new_spinner();
            spinner.set_message(format!("analyzing {}", path.display()));
            spinner.enable_steady_tick(Duration::from_millis(100));

            let result = commitlens_classify::analyze(path, &options);
            spinner.finish_and_clear();
            let report = result.into_diagnostic()?;

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&report).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => {
                    print!("{}", report.to_markdown());
                }
                OutputFormat::Text => {
                    print!("{report}");
                }
            }
            Ok(())
        }
        Some(Command::Init) => {
            let config_path = std::path::Path::new(".commitlens.toml");
            if config_path.exists() {
                miette::bail!(".commitlens.toml already exists");
            }
            std::fs::write(config_path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .commitlens.toml");
            Ok(())
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}
