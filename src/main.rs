use std::io::IsTerminal;

use chrono::Utc;
use pulse_feed::config::OutputFormat;
use pulse_feed::{ AppError, Config, PulseApp, Result, Scheduler, SchedulerConfig };
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for the board
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "pulse_feed=info".into())
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code(), "pulse-feed stopped: {}", e);
        return Err(e);
    }

    Ok(())
}

async fn run() -> Result<()> {
    // Load configuration
    let config = Config::from_env().map_err(|e| AppError::Config(e.to_string()))?;

    tracing::info!(
        "Starting pulse-feed: {} per column, live={}, seed={:?}",
        config.seed_per_column,
        config.live,
        config.rng_seed
    );
    tracing::debug!("Placeholder endpoints (not dialed): {} {}", config.api_url, config.ws_url);

    let mut app = PulseApp::new(&config);
    app.display_settings_mut().color =
        config.output == OutputFormat::Text && std::io::stdout().is_terminal();

    let mut scheduler = Scheduler::new(SchedulerConfig::from(&config));
    let mut ticks = scheduler.subscribe();
    scheduler.start();

    render(&app, &config)?;

    let deadline = async {
        match config.run_for {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
            _ = &mut deadline => {
                tracing::info!("Run time elapsed, shutting down");
                break;
            }
            event = ticks.recv() => {
                match event {
                    Ok(event) => {
                        let outcome = app.handle(event, Utc::now());
                        if outcome.needs_render() {
                            render(&app, &config)?;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Dropped {} ticks while rendering", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    scheduler.stop().await;

    Ok(())
}

fn render(app: &PulseApp, config: &Config) -> Result<()> {
    let now = Utc::now();
    match config.output {
        OutputFormat::Text => println!("{}", app.render_text(now, config.render_rows)),
        OutputFormat::Json => println!("{}", app.snapshot(now).to_json()?),
    }
    Ok(())
}
