// Main entry point
mod application;
mod domain;
mod infrastructure;
mod interfaces;
mod presentation;
mod state;

use clap::Parser;
use colored::Colorize;
use domain::error::BoardError;
use domain::model::HoldingsSource;
use infrastructure::config::{load_config, Config};
use infrastructure::network::alchemy::AlchemyIndex;
use infrastructure::network::neynar::NeynarDirectory;
use infrastructure::network::rpc::JsonRpcEth;
use interfaces::cli::Cli;
use presentation::theme::Theme;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup graceful shutdown handler
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    // Spawn signal handler task
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
        } else {
            let _ = shutdown_tx.send(());
        }
    });

    let cli = Cli::parse();
    let config = load_config()?;

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    // Initialize AppState
    let state = AppState::new(config.clone())?;

    // Handle commands (flags)
    if cli.generate_config {
        infrastructure::config::generate_config_sample()?;
        return Ok(());
    }
    if cli.edit_config {
        if let Some(config_path) = infrastructure::config::get_config_path() {
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            let config_path_clone = config_path.clone();
            // Run editor in blocking task
            tokio::task::spawn_blocking(move || {
                std::process::Command::new(editor)
                    .arg(&config_path_clone)
                    .status()
            })
            .await??;
        } else {
            eprintln!("{}", "Config file not found".red());
        }
        return Ok(());
    }
    if cli.status {
        print_status(&state).await?;
        return Ok(());
    }

    let contract = cli
        .contract
        .clone()
        .unwrap_or_else(|| config.contract_address.clone());

    // Load theme
    let theme_name = cli.theme.as_deref().unwrap_or(config.theme.as_str());
    let theme = Theme::from_name(theme_name);

    let providers = build_providers(&config, &state.http_client)?;

    if cli.watch {
        let period = std::time::Duration::from_secs(config.refresh_secs.max(1));
        let mut interval = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if config.clear_screen && !cli.json {
                        clear_screen();
                    }
                    if let Err(e) = render_board(&state, &providers, &contract, &cli, &theme, &config).await {
                        eprintln!("{}", format!("Refresh failed: {}", e).red());
                    }
                }
                _ = &mut shutdown_rx => {
                    eprintln!("\nStopping watch...");
                    return Ok(());
                }
            }
        }
    }

    if config.clear_screen && !cli.json {
        clear_screen();
    }
    render_board(&state, &providers, &contract, &cli, &theme, &config).await?;

    Ok(())
}

/// The configured provider set behind the domain seams
struct Providers {
    index: AlchemyIndex,
    primary_rpc: JsonRpcEth,
    fallback_rpc: JsonRpcEth,
    identity: NeynarDirectory,
}

fn build_providers(config: &Config, client: &reqwest::Client) -> Result<Providers, BoardError> {
    let index = AlchemyIndex::new(client.clone(), &config.alchemy)?;
    let primary_rpc = JsonRpcEth::new(client.clone(), AlchemyIndex::rpc_url(&config.alchemy)?);
    let fallback_rpc = JsonRpcEth::new(client.clone(), config.rpc.url.clone());
    let identity = NeynarDirectory::new(client.clone(), config.neynar.api_key.clone());

    Ok(Providers {
        index,
        primary_rpc,
        fallback_rpc,
        identity,
    })
}

/// Everything one refresh renders; also the --json payload
#[derive(serde::Serialize)]
struct BoardView {
    contract: String,
    source: HoldingsSource,
    fetched_at: Option<i64>,
    backers: Vec<domain::model::BackerRow>,
    stats: Option<domain::model::CampaignStats>,
}

async fn render_board(
    state: &AppState,
    providers: &Providers,
    contract: &str,
    cli: &Cli,
    theme: &Theme,
    config: &Config,
) -> anyhow::Result<()> {
    let report = application::aggregate::wallet_mint_counts(
        &providers.index,
        &state.cache,
        contract,
        cli.nocache,
    )
    .await?;

    let rows = application::leaderboard::assemble_backers(&providers.identity, &report.holdings).await;

    let live_price = infrastructure::network::price::eth_price_usd(&state.http_client)
        .await
        .ok();

    // Stats degrade to a board without the funding header
    let stats = match application::stats::campaign_stats(
        &providers.index,
        &providers.primary_rpc,
        &providers.fallback_rpc,
        config,
        contract,
        live_price,
    )
    .await
    {
        Ok(stats) => Some(stats),
        Err(e) => {
            tracing::warn!("campaign stats unavailable: {}", e);
            None
        }
    };

    let view = BoardView {
        contract: contract.to_lowercase(),
        source: report.source,
        fetched_at: report.fetched_at,
        backers: rows,
        stats,
    };

    // Output result
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        let output = format_board(&view, theme, cli.limit, config.enable_emoji);
        print!("{}", output);
    }

    Ok(())
}

const PROGRESS_BAR_WIDTH: usize = 30;

/// Format the board as a string (single print at the end)
fn format_board(view: &BoardView, theme: &Theme, limit: usize, enable_emoji: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    // Title with source indicator
    let source_indicator = match view.source {
        HoldingsSource::Cache => {
            if enable_emoji {
                "💾 [cache]"
            } else {
                "[cache]"
            }
        }
        HoldingsSource::Indexer => {
            if enable_emoji {
                "🌐 [live]"
            } else {
                "[live]"
            }
        }
        HoldingsSource::OwnersOnly => {
            if enable_emoji {
                "⚠️  [approx]"
            } else {
                "[approx]"
            }
        }
    };
    let title = view
        .stats
        .as_ref()
        .and_then(|s| s.contract_name.as_deref())
        .map(|name| format!("{} backers", name))
        .unwrap_or_else(|| "Access Pass backers".to_string());
    writeln!(
        output,
        "{} {}",
        (theme.title)(&title),
        source_indicator.cyan()
    )
    .ok();
    writeln!(output, "  {}", (theme.address)(&view.contract)).ok();

    // Funding header
    if let Some(stats) = &view.stats {
        let pct = stats.progress_pct();
        let filled = ((pct / 100.0).clamp(0.0, 1.0) * PROGRESS_BAR_WIDTH as f64).round() as usize;
        let (filled_glyph, empty_glyph) = if enable_emoji { ("█", "░") } else { ("#", "-") };

        writeln!(output).ok();
        writeln!(
            output,
            "  {}{} {}",
            (theme.bar_filled)(&filled_glyph.repeat(filled)),
            (theme.bar_empty)(&empty_glyph.repeat(PROGRESS_BAR_WIDTH - filled)),
            (theme.heading)(&format!("{:.0}%", pct))
        )
        .ok();

        let price_label = if stats.price_is_live {
            format!("ETH ${:.0}", stats.eth_price_usd)
        } else {
            format!("ETH ${:.0} (fixed)", stats.eth_price_usd)
        };
        writeln!(
            output,
            "  {} of {} raised  ({})",
            (theme.stat)(&format!("{:.2} ETH", stats.raised_eth)),
            (theme.stat)(&format!("{:.2} ETH", stats.goal_eth)),
            (theme.stat)(&format_usd(stats.raised_usd))
        )
        .ok();
        writeln!(
            output,
            "  {} backers   {} mints   {}",
            (theme.heading)(&view.backers.len().to_string()),
            (theme.heading)(&stats.total_mints.to_string()),
            (theme.note)(&price_label)
        )
        .ok();
    } else {
        writeln!(
            output,
            "  {} backers",
            (theme.heading)(&view.backers.len().to_string())
        )
        .ok();
    }

    // Leaderboard
    writeln!(output).ok();
    let cutoff = "⸺".repeat(40);
    writeln!(output, "  {}", (theme.line)(&cutoff)).ok();

    if view.backers.is_empty() {
        writeln!(output, "  {}", (theme.note)("No backers yet.")).ok();
        return output;
    }

    let shown = if limit == 0 {
        view.backers.len()
    } else {
        limit.min(view.backers.len())
    };

    for (i, row) in view.backers.iter().take(shown).enumerate() {
        // Pad before coloring so escape codes don't break the columns
        let label = match &row.profile {
            Some(profile) => format!("@{}", profile.username),
            None => truncate_address(&row.address),
        };
        let padded = format!("{:<24}", label);
        let styled = match &row.profile {
            Some(_) => (theme.username)(&padded),
            None => (theme.address)(&padded),
        };
        let unit = if row.count == 1 { "pass" } else { "passes" };

        writeln!(
            output,
            "  {}. {} {} {}",
            (theme.idx)(&format!("{:>2}", i + 1)),
            styled,
            (theme.count)(&format!("{:>3}", row.count)),
            unit
        )
        .ok();
    }

    if shown < view.backers.len() {
        writeln!(
            output,
            "  {}",
            (theme.note)(&format!("… and {} more backers", view.backers.len() - shown))
        )
        .ok();
    }

    if view.source == HoldingsSource::OwnersOnly {
        writeln!(
            output,
            "  {}",
            (theme.note)("Counts are approximate: the indexer is degraded.")
        )
        .ok();
    }

    output
}

/// Shorten a wallet address for display: 0x2211…7da9
fn truncate_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}

/// Dollar amount with thousands separators, floored like the source UI
fn format_usd(value: f64) -> String {
    let whole = value.max(0.0).floor() as u64;
    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("${}", grouped)
}

/// Clear the terminal screen
fn clear_screen() {
    // ANSI escape sequence: clear screen and move cursor to top-left
    print!("\x1B[2J\x1B[1;1H");
    std::io::Write::flush(&mut std::io::stdout()).ok();
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &infrastructure::config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match logging.level.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt().with_env_filter(filter).init();

    Ok(())
}

async fn print_status(state: &AppState) -> anyhow::Result<()> {
    println!("{}", "mintboard Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = state.config.read().await;

    println!("Campaign: {}", config.contract_address);
    println!("Goal: {} ETH", config.goal_eth);

    // Cache status
    println!(
        "Memory Cache: {} entries (TTL {}s)",
        state.cache.len(),
        config.cache_ttl_secs
    );

    // Config status
    println!(
        "Config: {}",
        infrastructure::config::get_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );

    if config.alchemy.api_key.is_some() {
        println!("Alchemy API: Configured ({})", config.alchemy.network);
    } else {
        println!("Alchemy API: Not configured");
    }

    if config.neynar.api_key.is_some() {
        println!("Neynar API: Configured");
    } else {
        println!("Neynar API: Not configured");
    }

    println!("Fallback RPC: {}", config.rpc.url);

    Ok(())
}
