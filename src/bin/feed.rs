use anyhow::Result;
use bulletin::config::Config;
use bulletin::context::{AppContext, StandardContext};
use bulletin::controller::FeedController;
use bulletin::expiry::ExpiryPolicy;
use bulletin::projector::{Renderer, TextRenderer};
use bulletin::source::HttpEventSource;
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h" || args[1] == "help") {
        print_help();
        return Ok(());
    }

    TermLogger::init(
        LevelFilter::Info,
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    // Optional config root override: feed --config-root <dir>
    let override_root = if args.len() > 2 && args[1] == "--config-root" {
        Some(PathBuf::from(&args[2]))
    } else {
        None
    };
    let ctx = StandardContext::new(override_root);

    let config = match Config::load(&ctx) {
        Ok(c) => c,
        Err(e) if e.to_string().contains("Config file not found") => {
            Config::default().save(&ctx)?;
            eprintln!(
                "A starter config was written to {:?}; set feed_url and run again.",
                ctx.get_config_file_path()?
            );
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if config.feed_url.is_empty() {
        eprintln!("feed_url is empty; nothing to fetch.");
        return Ok(());
    }

    let source = HttpEventSource::new(&config.feed_url, config.feed_format)?;
    let controller = FeedController::new(source, ExpiryPolicy::from_config(&config));

    match controller.run_cycle().await {
        Ok(tree) => TextRenderer::stdout().render(&tree)?,
        Err(e) => {
            // Per-row problems never reach here; a failure means the whole
            // feed was unreachable or unreadable.
            log::error!("feed cycle failed: {e}");
            println!("Could not load events.");
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        "bulletin v{} - campus events & recruitment feed client",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    feed                          Fetch the configured feed and print it");
    println!("    feed --config-root <dir>      Use <dir> instead of the platform config dir");
    println!("    feed --help                   Show this help message");
}
