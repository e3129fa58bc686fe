//! Command-line front end of the WMS layer factory.
//!
//! Builds layer descriptors from arguments or from a GetCapabilities
//! document and prints them as JSON, together with the 3D imagery descriptor
//! and the legend of each layer.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use wms_common::WmsVersion;
use wms_layers::{
    FixedLanguage, GlobalOptions, ImageryProvidable, LayerConfigRegistry, LayerOptions,
    LayerParams, LegendProvider, RenderableLayer, WmsLayerFactory,
};
use wms_protocol::WmsCapabilities;

#[derive(Parser, Debug)]
#[command(name = "wms-layer-tool")]
#[command(about = "Build geoportal WMS layer descriptors")]
struct Cli {
    /// Global options file (YAML)
    #[arg(long, env = "GEOPORTAL_CONFIG")]
    config: Option<PathBuf>,

    /// Layers configuration file (JSON or YAML)
    #[arg(long, env = "GEOPORTAL_LAYERS_CONFIG")]
    layers_config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a single layer
    Layer {
        /// Service endpoint, may hold a {s} subdomain template
        #[arg(short, long)]
        url: String,

        /// Layer name(s), comma separated
        #[arg(short, long)]
        layers: String,

        /// WMS version (1.1.1 or 1.3.0)
        #[arg(long)]
        version: Option<WmsVersion>,

        #[arg(long)]
        style: Option<String>,

        #[arg(long)]
        format: Option<String>,

        #[arg(long)]
        label: Option<String>,

        /// Request the layer in EPSG:4326 and reproject client side
        #[arg(long)]
        reproject: bool,

        #[arg(long)]
        preview: bool,

        #[arg(long)]
        gutter: Option<u32>,
    },

    /// Build every displayable layer of a GetCapabilities document
    Capabilities {
        /// Capabilities XML file
        #[arg(short, long)]
        file: PathBuf,

        /// Service endpoint used when the document has no GetMap URL
        #[arg(short, long)]
        url: String,
    },
}

fn init_tracing(log_level: &str, json_logs: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr, stdout carries the JSON output
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    if json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn load_options(path: Option<&PathBuf>) -> Result<GlobalOptions> {
    let options = match path {
        Some(path) => GlobalOptions::from_yaml_file(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => GlobalOptions::default(),
    };
    Ok(options.apply_env()?)
}

fn load_registry(path: Option<&PathBuf>) -> Result<LayerConfigRegistry> {
    match path {
        Some(path) => LayerConfigRegistry::load_from_file(path)
            .with_context(|| format!("loading layers config from {}", path.display())),
        None => {
            warn!("No layers configuration given, registry gutters disabled");
            Ok(LayerConfigRegistry::new())
        }
    }
}

async fn describe(factory: &WmsLayerFactory, layer: &RenderableLayer) -> Result<Value> {
    let legend = factory.get_legend(layer).await;
    Ok(json!({
        "layer": serde_json::to_value(layer)?,
        "imagery": serde_json::to_value(layer.derive_imagery_provider())?,
        "legend": legend.to_html(),
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs)?;

    let options = load_options(cli.config.as_ref())?;
    let registry = load_registry(cli.layers_config.as_ref())?;
    info!(
        map_crs = %options.map_crs,
        lang = %options.default_lang,
        configured_layers = registry.len(),
        "Configuration loaded"
    );

    let lang = Arc::new(FixedLanguage::new(options.default_lang.clone()));
    let factory = WmsLayerFactory::new(options, Arc::new(registry), lang);

    let output = match cli.command {
        Commands::Layer {
            url,
            layers,
            version,
            style,
            format,
            label,
            reproject,
            preview,
            gutter,
        } => {
            let mut params = LayerParams::new(layers);
            params.version = version;
            params.styles = style;
            params.format = format;

            let mut options = LayerOptions::new(url)
                .with_reprojection(reproject)
                .with_preview(preview);
            options.label = label;
            options.gutter = gutter;

            let layer = factory.create_layer(params, options)?;
            describe(&factory, &layer).await?
        }
        Commands::Capabilities { file, url } => {
            let xml = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let capabilities = WmsCapabilities::parse(&xml)
                .with_context(|| format!("parsing {}", file.display()))?;

            let entries = capabilities.capability_layers(&url, factory.options().map_crs);
            info!(
                version = %capabilities.version,
                layers = entries.len(),
                "Building layers from capabilities"
            );

            let mut described = Vec::with_capacity(entries.len());
            for entry in &entries {
                match factory.layer_from_capabilities(entry) {
                    Ok(layer) => described.push(describe(&factory, &layer).await?),
                    Err(e) => warn!(layer = %entry.name, error = %e, "Skipping layer"),
                }
            }
            Value::Array(described)
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
