//! Configuration management for the passport sheet service.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables (`PASSPORT_` prefix, provider credentials under
//!   their conventional names)
//! - Defaults matching an A4 sheet of 384 x 472 photos at 300 DPI
//!
//! # Commands
//!
//! - `serve` - run the HTTP service
//! - `render` - build a sheet from a local image, without providers
//! - `plan` - print the placement plan as JSON
//!
//! # Environment Variables
//!
//! - `PASSPORT_HOST` - Server bind address (default: 0.0.0.0)
//! - `PASSPORT_PORT` - Server port (default: 5000)
//! - `REMOVE_BG_API_KEY` - remove.bg API key (required for `serve`)
//! - `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET`
//!   - Cloudinary credentials (required for `serve`)
//! - `PASSPORT_MAX_UPLOAD_MB` - Largest accepted upload (default: 25)
//! - `PASSPORT_DPI` - Export resolution (default: 300)
//! - `PASSPORT_COPIES` - Default number of copies (default: 6)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::layout::{
    LayoutParameters, DEFAULT_BORDER_WIDTH, DEFAULT_COPIES, DEFAULT_HORIZONTAL_GAP,
    DEFAULT_MARGIN_X, DEFAULT_MARGIN_Y, DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH,
    DEFAULT_TILE_HEIGHT, DEFAULT_TILE_WIDTH, DEFAULT_VERTICAL_SPACING,
};
use crate::provider::{
    CloudinaryCredentials, DEFAULT_CLOUDINARY_API_URL, DEFAULT_CLOUDINARY_DELIVERY_URL,
    DEFAULT_REMOVE_BG_URL,
};
use crate::sheet::DEFAULT_DPI;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default upload limit in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 25;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Passport Sheet - printable passport photo sheets.
///
/// Removes the background of an uploaded portrait, enhances it and lays
/// out copies on an A4 PDF.
#[derive(Parser, Debug, Clone)]
#[command(name = "passport-sheet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Consume the CLI and return the selected command.
    pub fn into_command(self) -> Command {
        self.command
    }
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP service.
    Serve(ServeConfig),

    /// Build a sheet from a local image file (no background removal or
    /// enhancement).
    Render(RenderConfig),

    /// Print where each copy would be placed, as JSON.
    Plan(PlanConfig),
}

// =============================================================================
// Layout Arguments
// =============================================================================

/// Page and tile geometry, shared by all commands.
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Page width in pixels.
    #[arg(long, default_value_t = DEFAULT_PAGE_WIDTH, env = "PASSPORT_PAGE_WIDTH")]
    pub page_width: u32,

    /// Page height in pixels.
    #[arg(long, default_value_t = DEFAULT_PAGE_HEIGHT, env = "PASSPORT_PAGE_HEIGHT")]
    pub page_height: u32,

    /// Photo width in pixels, excluding the border.
    #[arg(long, default_value_t = DEFAULT_TILE_WIDTH, env = "PASSPORT_TILE_WIDTH")]
    pub tile_width: u32,

    /// Photo height in pixels, excluding the border.
    #[arg(long, default_value_t = DEFAULT_TILE_HEIGHT, env = "PASSPORT_TILE_HEIGHT")]
    pub tile_height: u32,

    /// Border width around each photo.
    #[arg(long, default_value_t = DEFAULT_BORDER_WIDTH, env = "PASSPORT_BORDER")]
    pub border: u32,

    /// Left margin.
    #[arg(long, default_value_t = DEFAULT_MARGIN_X, env = "PASSPORT_MARGIN_X")]
    pub margin_x: u32,

    /// Top margin.
    #[arg(long, default_value_t = DEFAULT_MARGIN_Y, env = "PASSPORT_MARGIN_Y")]
    pub margin_y: u32,

    /// Gap between photos in a row.
    #[arg(long, default_value_t = DEFAULT_HORIZONTAL_GAP, env = "PASSPORT_HORIZONTAL_GAP")]
    pub horizontal_gap: u32,

    /// Spacing between rows.
    #[arg(long, default_value_t = DEFAULT_VERTICAL_SPACING, env = "PASSPORT_VERTICAL_SPACING")]
    pub vertical_spacing: u32,

    /// Number of copies (the default for requests that do not specify one).
    #[arg(long, default_value_t = DEFAULT_COPIES, env = "PASSPORT_COPIES")]
    pub copies: u32,
}

impl Default for LayoutArgs {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
            tile_width: DEFAULT_TILE_WIDTH,
            tile_height: DEFAULT_TILE_HEIGHT,
            border: DEFAULT_BORDER_WIDTH,
            margin_x: DEFAULT_MARGIN_X,
            margin_y: DEFAULT_MARGIN_Y,
            horizontal_gap: DEFAULT_HORIZONTAL_GAP,
            vertical_spacing: DEFAULT_VERTICAL_SPACING,
            copies: DEFAULT_COPIES,
        }
    }
}

impl LayoutArgs {
    /// Convert to layout parameters.
    pub fn to_parameters(&self) -> LayoutParameters {
        LayoutParameters {
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            border_width: self.border,
            vertical_spacing: self.vertical_spacing,
            margin_x: self.margin_x,
            margin_y: self.margin_y,
            horizontal_gap: self.horizontal_gap,
            page_width: self.page_width,
            page_height: self.page_height,
            requested_copies: self.copies,
        }
    }
}

fn validate_dpi(dpi: f32) -> Result<(), String> {
    if !dpi.is_finite() || dpi <= 0.0 {
        return Err("dpi must be a positive number".to_string());
    }
    Ok(())
}

fn validate_url(name: &str, value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| format!("{} is not a valid URL: {}", name, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("{} must use http or https, got {}", name, other)),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

/// Configuration for the HTTP service.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "PASSPORT_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PASSPORT_PORT")]
    pub port: u16,

    /// Largest accepted upload in megabytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_MB, env = "PASSPORT_MAX_UPLOAD_MB")]
    pub max_upload_mb: usize,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "PASSPORT_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Provider Configuration
    // =========================================================================
    /// remove.bg API key.
    #[arg(long, env = "REMOVE_BG_API_KEY", hide_env_values = true)]
    pub remove_bg_api_key: String,

    /// remove.bg endpoint.
    #[arg(long, default_value = DEFAULT_REMOVE_BG_URL, env = "PASSPORT_REMOVE_BG_URL")]
    pub remove_bg_url: String,

    /// Cloudinary cloud name.
    #[arg(long, env = "CLOUDINARY_CLOUD_NAME")]
    pub cloudinary_cloud_name: String,

    /// Cloudinary API key.
    #[arg(long, env = "CLOUDINARY_API_KEY", hide_env_values = true)]
    pub cloudinary_api_key: String,

    /// Cloudinary API secret.
    #[arg(long, env = "CLOUDINARY_API_SECRET", hide_env_values = true)]
    pub cloudinary_api_secret: String,

    /// Cloudinary API base URL.
    #[arg(long, default_value = DEFAULT_CLOUDINARY_API_URL, env = "PASSPORT_CLOUDINARY_API_URL")]
    pub cloudinary_api_url: String,

    /// Cloudinary delivery base URL.
    #[arg(
        long,
        default_value = DEFAULT_CLOUDINARY_DELIVERY_URL,
        env = "PASSPORT_CLOUDINARY_DELIVERY_URL"
    )]
    pub cloudinary_delivery_url: String,

    // =========================================================================
    // Sheet Configuration
    // =========================================================================
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Export resolution in dots per inch.
    #[arg(long, default_value_t = DEFAULT_DPI, env = "PASSPORT_DPI")]
    pub dpi: f32,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.remove_bg_api_key.trim().is_empty() {
            return Err(
                "remove.bg API key is required. Set --remove-bg-api-key or REMOVE_BG_API_KEY"
                    .to_string(),
            );
        }

        if self.cloudinary_cloud_name.trim().is_empty()
            || self.cloudinary_api_key.trim().is_empty()
            || self.cloudinary_api_secret.trim().is_empty()
        {
            return Err("Cloudinary credentials are required. Set CLOUDINARY_CLOUD_NAME, \
                 CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET"
                .to_string());
        }

        validate_url("remove_bg_url", &self.remove_bg_url)?;
        validate_url("cloudinary_api_url", &self.cloudinary_api_url)?;
        validate_url("cloudinary_delivery_url", &self.cloudinary_delivery_url)?;

        if self.max_upload_mb == 0 {
            return Err("max_upload_mb must be greater than 0".to_string());
        }

        validate_dpi(self.dpi)?;
        self.layout.to_parameters().validate()
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Upload limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// Cloudinary credentials.
    pub fn cloudinary_credentials(&self) -> CloudinaryCredentials {
        CloudinaryCredentials {
            cloud_name: self.cloudinary_cloud_name.clone(),
            api_key: self.cloudinary_api_key.clone(),
            api_secret: self.cloudinary_api_secret.clone(),
        }
    }
}

// =============================================================================
// Render Command
// =============================================================================

/// Configuration for offline rendering.
#[derive(Args, Debug, Clone)]
pub struct RenderConfig {
    /// Photo to lay out.
    pub input: PathBuf,

    /// Where to write the PDF.
    #[arg(short, long, default_value = "passport-sheet.pdf")]
    pub output: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Export resolution in dots per inch.
    #[arg(long, default_value_t = DEFAULT_DPI, env = "PASSPORT_DPI")]
    pub dpi: f32,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl RenderConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_dpi(self.dpi)?;
        self.layout.to_parameters().validate()
    }
}

// =============================================================================
// Plan Command
// =============================================================================

/// Configuration for printing a placement plan.
#[derive(Args, Debug, Clone)]
pub struct PlanConfig {
    #[command(flatten)]
    pub layout: LayoutArgs,
}

impl PlanConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.layout.to_parameters().validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
