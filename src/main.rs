use clap::{Arg, Command};
use log::LevelFilter;
use spam_checker::server::{self, AppState};
use spam_checker::validation::is_valid_email;
use spam_checker::{Config, LogSink};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let matches = Command::new("spam-checker")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Classify email addresses as spam using pattern and remote lookup strategies")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/spam-checker.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Test configuration validity")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .value_name("EMAIL")
                .help("Classify a single address and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("listen")
                .long("listen")
                .value_name("ADDR")
                .help("Override the listen address from the configuration")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("/etc/spam-checker.yaml");
    let config_found = std::path::Path::new(config_path).exists();

    let mut config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            process::exit(1);
        }
    };

    if let Some(listen) = matches.get_one::<String>("listen") {
        config.listen = listen.clone();
    }

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Err(e) = init_logging(log_level, config.log_file.as_deref()) {
        eprintln!("Error opening log file: {e}");
        process::exit(1);
    }

    if !config_found {
        log::warn!("Configuration file '{config_path}' not found, using default configuration");
    }

    let state = match AppState::from_config(&config, Arc::new(LogSink::new())) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Configuration validation failed:");
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    if matches.get_flag("test-config") {
        println!("🔍 Testing configuration...");
        println!("Failure policy: {:?}", config.failure_policy);
        let checker = state.checker();
        let names = checker.strategy_names();
        println!("Number of strategies: {}", names.len());
        for (i, name) in names.iter().enumerate() {
            println!("  Strategy {}: {name}", i + 1);
        }
        println!("✅ All strategies built successfully.");
        return;
    }

    if let Some(email) = matches.get_one::<String>("check") {
        check_single(&state, email).await;
        return;
    }

    let listener = match tokio::net::TcpListener::bind(&config.listen).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind {}: {e}", config.listen);
            process::exit(1);
        }
    };

    log::info!(
        "Starting spam checker with {} strategies ({:?} policy)",
        state.strategies.len(),
        state.policy
    );

    if let Err(e) = server::serve(listener, state, shutdown_signal()).await {
        log::error!("Server error: {e}");
        process::exit(1);
    }
}

fn init_logging(level: LevelFilter, log_file: Option<&str>) -> std::io::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file(path)
    } else {
        Ok(Config::default())
    }
}

fn generate_default_config(path: &str) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Please edit the configuration file to suit your needs.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

async fn check_single(state: &AppState, email: &str) {
    if !is_valid_email(email) {
        eprintln!("❌ Invalid email format: {email}");
        process::exit(2);
    }

    match state.checker().is_spam(email).await {
        Ok(true) => println!("🚫 {email}: spam"),
        Ok(false) => println!("✅ {email}: not spam"),
        Err(e) => {
            eprintln!("❌ Spam check failed: {e}");
            process::exit(1);
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Received shutdown signal, stopping...");
}
