use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use ussd_menu::{demo, EngineConfig, Locale, MenuCatalog, MenuEngine, Response};

const USAGE: &str = "Usage: ussd-menu [locale] [idle_timeout_secs] [catalog.json]\n\
     \n\
     Example:\n  ussd-menu az 90 ./catalog.json\n\
     \n\
     Locales: az, ru, en (default az). Without a catalog file the built-in\n\
     marketplace menu is used.\n\
     \n\
     Logging: set RUST_LOG=debug for transitions and raw responses";

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging. Control verbosity with RUST_LOG env var:
    //   RUST_LOG=info   cargo run      # session start/end, evictions
    //   RUST_LOG=debug  cargo run      # + transitions and JSON responses
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().collect();

    let locale = match args.get(1) {
        Some(code) => code
            .parse::<Locale>()
            .map_err(anyhow::Error::msg)
            .context(USAGE)?,
        None => Locale::Az,
    };

    let mut config = EngineConfig::default();
    if let Some(secs) = args.get(2).and_then(|s| s.parse().ok()) {
        config.idle_timeout = Duration::from_secs(secs);
    }

    let catalog = match args.get(3) {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog {path}"))?;
            MenuCatalog::from_json(&text, &demo::registry()).context("failed to load catalog")?
        }
        None => demo::marketplace_catalog().context("built-in catalog is invalid")?,
    };

    println!("Catalog loaded");
    println!("  Nodes        : {}", catalog.node_count());
    println!("  Menu depth   : {}", catalog.depth());
    println!("  Locale       : {locale}");
    println!("  Idle timeout : {}s", config.idle_timeout.as_secs());

    let engine = Arc::new(MenuEngine::new(Arc::new(catalog), config));
    let _reaper = engine.spawn_reaper();

    run(&engine, locale).await
}

// ---------------------------------------------------------------------------
// Terminal client
// ---------------------------------------------------------------------------

async fn prompt(input: &mut Input, label: &str) -> Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(label.as_bytes()).await?;
    stdout.flush().await?;
    Ok(input.next_line().await?.map(|line| line.trim().to_string()))
}

fn show(response: &Response) {
    println!("\n{}", response.text);
    if response.requires_input {
        println!("(free text)");
    }
}

/// One dial-to-end exchange. Returns `false` when stdin is closed.
async fn play_session(
    engine: &MenuEngine,
    input: &mut Input,
    session_id: &str,
    locale: Locale,
) -> Result<bool> {
    let Some(code) = prompt(input, "\nDial code (e.g. *100#): ").await? else {
        return Ok(false);
    };

    let mut response = engine.dial(session_id, &code, locale);
    loop {
        show(&response);
        if response.is_end {
            return Ok(true);
        }
        let Some(line) = prompt(input, "\n> ").await? else {
            engine.end(session_id);
            return Ok(false);
        };
        response = engine.submit(session_id, &line, locale).await;
    }
}

/// Read the post-session choice. Returns `true` to dial again.
async fn prompt_restart(input: &mut Input) -> Result<bool> {
    loop {
        let Some(choice) = prompt(input, "\n  [r] Restart    [q] Quit\n> ").await? else {
            return Ok(false);
        };
        match choice.to_lowercase().as_str() {
            "r" => return Ok(true),
            "q" => return Ok(false),
            _ => println!("  Press [r] to restart or [q] to quit."),
        }
    }
}

async fn run(engine: &MenuEngine, locale: Locale) -> Result<()> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    for round in 1.. {
        println!("\n========================================");
        println!("         SHORT-CODE MENU SESSION");
        println!("========================================");
        println!("Answer with an option number, 0 goes back.");

        let session_id = format!("terminal-{round}");
        if !play_session(engine, &mut input, &session_id, locale).await? {
            break;
        }
        if !prompt_restart(&mut input).await? {
            break;
        }
        info!("Caller chose to dial again");
    }

    println!("Goodbye!");
    Ok(())
}
