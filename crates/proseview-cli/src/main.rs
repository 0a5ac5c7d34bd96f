use anyhow::{Context, Result, bail};
use proseview_config::Config;
use proseview_engine::schemas::chat_schema;
use proseview_engine::{Renderer, RendererProps};
use relative_path::RelativePath;
use std::path::{Path, PathBuf};
use std::{env, process};

const USAGE: &str = "Usage: proseview-cli <document.json> [--no-diagnostics] [--name <label>]";

#[derive(Debug, PartialEq)]
struct Args {
    document: String,
    diagnostics: Option<bool>,
    name: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut document = None;
    let mut diagnostics = None;
    let mut name = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--no-diagnostics" => diagnostics = Some(false),
            "--diagnostics" => diagnostics = Some(true),
            "--name" => {
                name = Some(args.next().context("--name needs a value")?);
            }
            flag if flag.starts_with("--") => bail!("Unknown option: {flag}"),
            _ if document.is_some() => bail!("Only one document can be rendered at a time"),
            _ => document = Some(arg),
        }
    }

    let Some(document) = document else {
        bail!("{USAGE}");
    };
    Ok(Args {
        document,
        diagnostics,
        name,
    })
}

/// Relative document paths resolve against the configured documents directory.
fn resolve_document_path(document: &str, documents_root: Option<&Path>) -> PathBuf {
    let path = Path::new(document);
    match documents_root {
        Some(root) if path.is_relative() => RelativePath::new(document).to_path(root),
        _ => path.to_path_buf(),
    }
}

fn render_document(json: &str, renderer: &Renderer) -> Result<String> {
    let schema = chat_schema();
    let doc = schema
        .node_from_json_str(json)
        .context("Failed to read document")?;
    let html = renderer
        .render_to_html(&RendererProps::new(doc.content))
        .context("Failed to render document")?;
    Ok(html)
}

fn run() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;

    log::info!("Config path: {}", Config::config_path().display());
    let config = Config::load()?.unwrap_or_default();

    let mut options = config.render_options();
    if let Some(enabled) = args.diagnostics {
        options = options.with_diagnostics(enabled);
    }
    let name = args.name.as_deref().or(config.renderer_name.as_deref());
    let renderer = Renderer::with_options(&chat_schema(), name, options);

    let path = resolve_document_path(&args.document, config.documents_path.as_deref());
    log::info!("Rendering {} with {}", path.display(), renderer.display_name());
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    println!("{}", render_document(&json, &renderer)?);
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
