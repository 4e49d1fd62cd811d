// Passsssword - scoped 1Password secrets for local processes
//
// This is the main entry point for the application.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use passsssword::config::Settings;
use passsssword::{cleaner, logging, InjectError, Injector};
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

/// Passsssword - render 1Password secrets for the duration of a command
#[derive(Parser, Debug)]
#[command(name = "passsssword")]
#[command(version)]
#[command(about = "Render 1Password secrets for the duration of a command", long_about = None)]
struct Cli {
    /// Path to a configuration file (default: passsssword.yaml, then ~/.config/passsssword.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Secrets CLI to invoke instead of the configured one
    #[arg(long, global = true)]
    tool: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check prerequisites and the template search path
    Doctor,

    /// Print the template that would be rendered
    Locate,

    /// Run a command with secrets loaded into its environment
    Run {
        /// Command and arguments to run
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
}

fn load_settings(config: Option<PathBuf>, tool: Option<String>) -> Result<Settings> {
    let mut settings = match config {
        Some(path) => Settings::from_file(&path)
            .with_context(|| format!("Failed to load config from: {}", path.display()))?,
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            Settings::discover(&cwd)?
        }
    };

    if let Some(tool) = tool {
        settings.tool = tool;
    }

    Ok(settings)
}

fn run_doctor(settings: &Settings) -> Result<()> {
    println!("🔍 Passsssword Doctor");
    println!("Checking prerequisites...\n");

    let mut all_checks_passed = true;

    // Check 1: configuration
    print!("1. Checking configuration... ");
    match settings.validate() {
        Ok(()) => println!("✓"),
        Err(e) => {
            println!("✗");
            println!("   ❌ Configuration is invalid: {}", e);
            println!("   💡 Fix passsssword.yaml or the command-line overrides");
            all_checks_passed = false;
        }
    }

    // Check 2: secrets CLI installation
    print!("2. Checking if '{}' is installed... ", settings.tool);
    match passsssword::renderer::resolve_tool(&settings.tool) {
        Ok(path) => println!("✓ ({})", path.display()),
        Err(_) => {
            println!("✗");
            println!("   ❌ '{}' is not installed or not in PATH", settings.tool);
            println!("   📦 Install from: https://developer.1password.com/docs/cli/get-started");
            all_checks_passed = false;
        }
    }

    // Check 3: template search
    print!(
        "3. Searching for '{}' ({} director{})... ",
        settings.template,
        settings.search_depth,
        if settings.search_depth == 1 { "y" } else { "ies" }
    );
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    match passsssword::locator::locate(
        &cwd,
        &settings.template,
        &settings.rendered,
        settings.search_depth,
    ) {
        Ok(found) => println!("✓ ({})", found.relative.display()),
        Err(InjectError::ConflictingRenderedFile { directory }) => {
            println!("✗");
            println!(
                "   ❌ '{}' already exists in {}",
                settings.rendered,
                directory.display()
            );
            println!("   💡 Remove it; rendered secrets must not be kept on disk");
            all_checks_passed = false;
        }
        Err(e) => {
            println!("✗");
            println!("   ❌ {}", e);
            println!("   💡 Create a '{}' file with op:// references", settings.template);
            all_checks_passed = false;
        }
    }

    println!();
    if all_checks_passed {
        println!("✅ All checks passed! Your system is ready.");
        Ok(())
    } else {
        println!("❌ Some checks failed. Please fix the issues above.");
        Err(anyhow::anyhow!("Doctor checks failed"))
    }
}

fn run_locate(injector: &Injector) -> Result<()> {
    let found = injector.locate()?;
    println!("{}", found.relative.display());
    Ok(())
}

fn run_command(injector: &Injector, command: &[String]) -> Result<i32> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| anyhow::anyhow!("No command given"))?;

    cleaner::install_signal_handler();

    let status = injector.try_run(|| {
        Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("Failed to execute: {}", program))
    })?;

    Ok(exit_code(status))
}

/// Exit code to report for the child: its own code, or `128 + signal`
/// when a signal terminated it (unix shell convention).
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings = match load_settings(cli.config, cli.tool) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("\nError: {:#}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Doctor => {
            if let Err(e) = run_doctor(&settings) {
                eprintln!("\nError: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Locate => {
            if let Err(e) = run_locate(&Injector::with_settings(settings)) {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Run { command } => match run_command(&Injector::with_settings(settings), &command) {
            Ok(code) => std::process::exit(code),
            Err(e) => {
                eprintln!("\nError: {:#}", e);
                eprintln!("💡 Run 'passsssword doctor' to check your setup.");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
