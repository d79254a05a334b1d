//! Passport Sheet - printable passport photo sheets.
//!
//! This binary starts the HTTP server or runs one of the offline commands.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use passport_sheet::{
    config::{Cli, Command, PlanConfig, RenderConfig, ServeConfig},
    layout::plan_page,
    pipeline::{render_sheet, SheetPipeline},
    provider::{CloudinaryClient, RemoveBgClient},
    server::{create_router, RouterConfig},
    tile::decode_image,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Render(config) => run_render(config).await,
        Command::Plan(config) => run_plan(config),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let layout = config.layout.to_parameters();

    info!("Passport Sheet v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  remove.bg endpoint: {}", config.remove_bg_url);
    info!("  Cloudinary cloud: {}", config.cloudinary_cloud_name);
    info!("  Cloudinary API: {}", config.cloudinary_api_url);
    info!(
        "  Page: {}x{} px at {} DPI",
        layout.page_width, layout.page_height, config.dpi
    );
    info!(
        "  Tile: {}x{} px, {} px border, up to {} per page",
        layout.tile_width,
        layout.tile_height,
        layout.border_width,
        layout.capacity()
    );
    info!("  Default copies: {}", layout.requested_copies);
    info!("  Max upload: {}MB", config.max_upload_mb);

    // One connection pool for both providers
    let http = match reqwest::Client::builder()
        .user_agent(concat!("passport-sheet/", env!("CARGO_PKG_VERSION")))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let remover = RemoveBgClient::new(config.remove_bg_api_key.clone())
        .with_endpoint(config.remove_bg_url.clone())
        .with_http_client(http.clone());
    let store = CloudinaryClient::new(config.cloudinary_credentials())
        .with_http_client(http)
        .with_api_base(config.cloudinary_api_url.clone())
        .with_delivery_base(config.cloudinary_delivery_url.clone());

    let pipeline = SheetPipeline::new(remover, store)
        .with_layout(layout)
        .with_dpi(config.dpi);

    let router = create_router(pipeline, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Open the upload form:");
    info!("    open http://{}/", addr);
    info!("");
    info!("  Or post a photo directly:");
    info!(
        "    curl -F image=@photo.jpg -F copies=6 -o sheet.pdf http://{}/process",
        addr
    );
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "passport_sheet=debug,tower_http=debug"
    } else {
        "passport_sheet=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::new().with_max_upload_bytes(config.max_upload_bytes());

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}

// =============================================================================
// Render Command
// =============================================================================

async fn run_render(config: RenderConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let source = match tokio::fs::read(&config.input).await {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", config.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let params = config.layout.to_parameters();
    let dpi = config.dpi;

    let rendered = tokio::task::spawn_blocking(move || {
        let image = decode_image(&source)?;
        render_sheet(&image, &params, dpi)
    })
    .await;

    let (pdf, plan) = match rendered {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Error: render task failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = tokio::fs::write(&config.output, &pdf).await {
        eprintln!("Error: cannot write {}: {}", config.output.display(), e);
        return ExitCode::FAILURE;
    }

    println!(
        "Wrote {} ({} of {} copies placed)",
        config.output.display(),
        plan.placed(),
        plan.requested
    );
    if !plan.is_complete() {
        eprintln!(
            "Warning: {} copies did not fit on the page",
            plan.dropped()
        );
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Plan Command
// =============================================================================

fn run_plan(config: PlanConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let plan = plan_page(&config.layout.to_parameters());

    match serde_json::to_string_pretty(&plan) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
