use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use ttiscraper::{config::Config, driver, surface::ChromeSurface, upload::Uploader};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let cfg = Config::from_env();
    std::fs::create_dir_all(&cfg.out_dir)
        .with_context(|| format!("creating output directory {}", cfg.out_dir.display()))?;
    info!(url = %cfg.ranking_url, steps = cfg.scroll_steps, "configured");

    // ─── 3) acquire the ranking page ─────────────────────────────────
    // Failing here is the one fatal path. The browser handle stays in this
    // scope so the chrome process is released on every exit path.
    let (browser, surface) = ChromeSurface::open(&cfg).context("acquiring ranking page")?;

    // ─── 4) harvest both views ───────────────────────────────────────
    let reports = driver::harvest_all_views(&surface, &cfg).await;
    drop(surface);
    drop(browser);

    // ─── 5) per-view summary ─────────────────────────────────────────
    for report in &reports {
        match &report.output {
            Some(path) => info!(
                view = %report.view,
                rows = report.rows_written,
                file = %path.display(),
                "view harvested"
            ),
            None => warn!(view = %report.view, "view produced no rows"),
        }
    }

    // ─── 6) upload finalized files ───────────────────────────────────
    match &cfg.bucket {
        Some(bucket) => match Uploader::new(bucket.as_str()).await {
            Ok(uploader) => {
                for report in &reports {
                    let Some(path) = &report.output else { continue };
                    if let Err(e) = uploader.upload_csv(path).await {
                        // Local file is kept either way; no retry.
                        error!(view = %report.view, error = %e, "upload failed");
                    }
                }
            }
            Err(e) => error!(error = %e, "storage client unavailable; skipping uploads"),
        },
        None => info!("no bucket configured; skipping upload"),
    }

    info!("all done");
    Ok(())
}
