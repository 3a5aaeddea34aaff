use clap::Parser;
use colored::Colorize;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use searchdeprecated::config::Config;
use searchdeprecated::discovery::Workspace;
use searchdeprecated::frontend::{CompositeDiagnostics, JavaFrontEnd, JavacLog, SyntaxDiagnostics};
use searchdeprecated::report::Reporter;
use searchdeprecated::scan::Scanner;

/// SearchDeprecated - Find usages of deprecated APIs in Java workspaces
#[derive(Parser, Debug)]
#[command(name = "searchdeprecated")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the workspace directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source roots relative to each project (can be specified multiple times)
    #[arg(short, long)]
    target: Vec<PathBuf>,

    /// Patterns to exclude (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Only scan these projects (can be specified multiple times)
    #[arg(short, long)]
    project: Vec<String>,

    /// Only report units in these packages or their subpackages
    #[arg(long, value_name = "PACKAGE")]
    package: Vec<String>,

    /// Do not report compile errors
    #[arg(long)]
    no_errors: bool,

    /// Do not report deprecated usages
    #[arg(long)]
    no_deprecations: bool,

    /// Read compile errors from javac output
    #[arg(long, value_name = "FILE")]
    javac_log: Option<PathBuf>,

    /// Analyze units in parallel
    #[arg(long)]
    parallel: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Omit the workspace and project header lines
    #[arg(long)]
    no_header: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    info!("SearchDeprecated v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    run_scan(&config, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    // The report owns stdout
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        // Try to load from default locations
        Config::from_default_locations(&cli.path)?
    };

    // Override with CLI arguments
    if !cli.target.is_empty() {
        config.targets = cli.target.clone();
    }
    if !cli.exclude.is_empty() {
        config.exclude.extend(cli.exclude.clone());
    }
    if !cli.project.is_empty() {
        config.projects = cli.project.clone();
    }
    if !cli.package.is_empty() {
        config.packages = cli.package.clone();
    }
    if cli.no_errors {
        config.report.errors = false;
    }
    if cli.no_deprecations {
        config.report.deprecations = false;
    }
    if cli.no_header {
        config.report.header = false;
    }
    if cli.parallel {
        config.scan.parallel = true;
    }
    if let Some(log) = &cli.javac_log {
        config.scan.javac_log = Some(log.clone());
    }

    Ok(config)
}

fn build_diagnostics(config: &Config) -> Result<CompositeDiagnostics> {
    let mut diagnostics = CompositeDiagnostics::new();
    if config.scan.syntax_errors {
        diagnostics = diagnostics.with(SyntaxDiagnostics::new());
    }
    if let Some(path) = &config.scan.javac_log {
        let log = JavacLog::from_file(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to load javac log: {}", path.display()))?;
        debug!("Loaded {} javac markers", log.len());
        diagnostics = diagnostics.with(log);
    }
    Ok(diagnostics)
}

fn open_output(cli: &Cli) -> Result<Box<dyn Write>> {
    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

fn run_scan(config: &Config, cli: &Cli) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let start_time = Instant::now();

    info!("Discovering projects...");
    let workspace = Workspace::open(&cli.path, config)
        .into_diagnostic()
        .wrap_err("Failed to open workspace")?;

    if workspace.projects.is_empty() {
        eprintln!("{}", "No Java projects found.".yellow());
        return Ok(());
    }

    let mut reporter = Reporter::new(open_output(cli)?);
    if config.report.header {
        for line in workspace.header_lines() {
            reporter.write_line(&line).into_diagnostic()?;
        }
    }

    let diagnostics = build_diagnostics(config)?;
    let mut scanner = Scanner::new(config, JavaFrontEnd::index(&[]), diagnostics, reporter);
    let mut total_units = 0;

    for project in &workspace.projects {
        if config.report.header {
            scanner.write_line(&project.header()).into_diagnostic()?;
        }

        let units = project.units(config);
        info!("Project {}: {} Java files", project.name, units.len());
        if units.is_empty() {
            continue;
        }
        total_units += units.len();

        scanner.set_front_end(JavaFrontEnd::index(&units));

        let pb = if cli.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(units.len() as u64)
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .into_diagnostic()?
                .progress_chars("#>-"),
        );
        pb.set_message(project.name.clone());
        scanner.set_progress(Some(pb.clone()));

        scanner
            .scan_all(&units, config.scan.parallel)
            .into_diagnostic()
            .wrap_err("Failed to write report")?;

        scanner.set_progress(None);
        pb.finish_and_clear();
    }

    scanner.flush().into_diagnostic()?;
    let stats = scanner.stats();

    if !cli.quiet {
        let summary = format!(
            "✓ Scanned {} files in {} projects in {:.2}s: {} deprecated usages, {} compile errors",
            total_units,
            workspace.projects.len(),
            start_time.elapsed().as_secs_f64(),
            stats.findings,
            stats.errors
        );
        if stats.findings == 0 && stats.errors == 0 {
            eprintln!("{}", summary.green());
        } else {
            eprintln!("{}", summary.yellow());
        }
        if stats.duplicates > 0 {
            debug!("{} repeated usages suppressed", stats.duplicates);
        }
    }

    Ok(())
}
