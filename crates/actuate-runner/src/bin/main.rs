use actuate_runner::{ActionFactory, Config, Params, Runner, READ_TEXT_TARGET};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "actuate-runner")]
#[command(about = "Run a batch of declarative element actions")]
#[command(version)]
struct Cli {
    /// Config file to run (YAML or JSON)
    config: PathBuf,

    /// Run in headless mode (overrides config)
    #[arg(long)]
    headless: bool,

    /// Set a parameter (can be used multiple times)
    #[arg(short = 'P', long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Validate config and descriptor kinds without running
    #[arg(long)]
    check: bool,

    /// Print results as a JSON array of booleans
    #[arg(long)]
    json: bool,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Filter directives for `-q` / `-v` when `RUST_LOG` is unset.
///
/// Text read by `read_text` stays visible at every level except `-q`.
fn log_directives(quiet: bool, verbose: u8) -> String {
    if quiet {
        return "error".to_string();
    }
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    format!("{},{}=info", level, READ_TEXT_TARGET)
}

fn init_logging(cli: &Cli) {
    // RUST_LOG wins over -v/-q when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directives(cli.quiet, cli.verbose)));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Run every descriptor through the factory. Returns the number rejected.
fn check(config: &Config) -> usize {
    println!("Config valid: {}", config.name);
    if let Some(ref target) = config.target {
        println!("  Target: {}", target.url);
    }
    println!("  Actions: {}", config.actions.len());
    if !config.params.is_empty() {
        println!("  Parameters: {}", config.params.len());
        for (name, def) in &config.params {
            let req = if def.required { " (required)" } else { "" };
            let desc = def.description.as_deref().unwrap_or("");
            println!("    - {}{}: {}", name, req, desc);
        }
    }

    let mut rejected = 0;
    for (i, d) in config.actions.iter().enumerate() {
        if let Err(e) = ActionFactory::build_descriptor(d) {
            rejected += 1;
            println!("  ✗ [{}] {}: {}", i + 1, d, e);
        }
    }
    if rejected > 0 {
        println!(
            "  {} unsupported (expected one of: {})",
            rejected,
            ActionFactory::supported_kinds().join(", ")
        );
    }
    rejected
}

#[tokio::main]
async fn main() -> actuate_runner::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let params = Params::from_args(&cli.params)?;
    let mut config = Config::load_with_params(&cli.config, &params)?;

    if cli.check {
        if check(&config) > 0 {
            std::process::exit(1);
        }
        return Ok(());
    }

    if cli.headless {
        config.browser.headless = true;
    }

    let runner = Runner::new(&config.browser).await?;
    let result = runner.run(&config).await;
    runner.close().await?;
    let result = result?;

    if cli.json {
        println!("{}", serde_json::to_string(&result.results)?);
    } else {
        println!("Running: {}", config.name);
        for (i, (d, ok)) in config.actions.iter().zip(&result.results).enumerate() {
            let mark = if *ok { "✓" } else { "✗" };
            println!("  {} [{}] {}", mark, i + 1, d);
        }
        println!();
        let passed = result.results.iter().filter(|ok| **ok).count();
        println!("  Passed: {}/{}", passed, result.results.len());
        if result.rejected > 0 {
            println!("  Rejected: {}", result.rejected);
        }
        println!("  Duration: {}ms", result.duration_ms);
    }

    if !result.success {
        std::process::exit(1);
    }

    Ok(())
}
