//! hitgen: generate typed Measurement Protocol hit records from the
//! parameter reference.
//!
//! Runs a single offline pass: extract the parameter rows from the HTML
//! reference, normalize them, group them into hit kinds and render one
//! source file per kind. Everything is rendered in memory first, so a
//! failing run writes nothing.

mod error;
mod kinds;
mod model;
mod parser;
mod render;
mod source;

use anyhow::{Context, Result};
use clap::Parser;
use error::GenError;
use render::Renderer;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "hitgen",
    about = "Generate typed hit records from the Measurement Protocol parameter reference"
)]
struct Cli {
    /// Parameter reference: local HTML file or http(s) URL
    #[arg(short = 'i', long, default_value = source::DEFAULT_SOURCE)]
    input: String,

    /// Output directory, created if missing
    #[arg(short = 'o', long, default_value = ".")]
    output: PathBuf,

    /// Output format: rust (default), json
    #[arg(short = 'f', long, default_value = "rust")]
    format: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Log only warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let renderer = render::create_renderer(&cli.format)?;
    let input = source::load(&cli.input)?;
    let units = generate(&input, renderer.as_ref())
        .with_context(|| format!("cannot generate from {}", cli.input))?;
    write_units(&cli.output, &units)?;

    log::info!("wrote {} files to {}", units.len(), cli.output.display());
    Ok(())
}

/// Run the whole pipeline in memory: extract, normalize, group, render.
fn generate(input: &str, renderer: &dyn Renderer) -> error::Result<Vec<(String, String)>> {
    let extraction = parser::parse_document(input)?;
    log::info!("extracted {} parameters", extraction.parameters.len());

    let (kind_list, fields) = parser::normalize_all(extraction)?;
    let model = kinds::build(&kind_list, fields)?;
    log::info!("built {} record kinds", model.len());

    render::render_all(renderer, &model)
}

/// Write each rendered unit to its own file under `dir`.
fn write_units(dir: &Path, units: &[(String, String)]) -> error::Result<()> {
    fs::create_dir_all(dir).map_err(|source| GenError::Sink {
        path: dir.to_path_buf(),
        source,
    })?;

    for (name, contents) in units {
        let path = dir.join(name);
        let sink_err = |source| GenError::Sink {
            path: path.clone(),
            source,
        };
        let mut file = File::create(&path).map_err(sink_err)?;
        file.write_all(contents.as_bytes()).map_err(sink_err)?;
        log::debug!("wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOC: &str = r##"<html><body>
<h3><a href="#v">Protocol Version</a></h3>
<div>
  <p>Required for all hit types.</p>
  <p>The Protocol version.</p>
  <table><tr><td>v</td><td>text</td><td>None</td><td>None</td><td>all</td></tr></table>
  <p>Example value: 1</p>
</div>
<h3><a href="#t">Hit type</a></h3>
<div>
  <p>Required for all hit types.</p>
  <p>The type of hit. Must be one of 'tracker', 'event'.</p>
  <table><tr><td>t</td><td>text</td><td>None</td><td>None</td><td>all</td></tr></table>
  <p>Example value: event</p>
</div>
</body></html>"##;

    #[test]
    fn generate_renders_every_kind_and_support_module() {
        let units = generate(DOC, &render::rust::RustRenderer).unwrap();
        let names: Vec<&str> = units.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["type_client.rs", "type_event.rs", "type_tracker.rs", "mod.rs"]
        );
    }

    #[test]
    fn generate_fails_on_unknown_kind() {
        let doc = DOC.replacen("<td>all</td>", "<td>nonexistent</td>", 1);
        let err = generate(&doc, &render::rust::RustRenderer).unwrap_err();
        assert!(matches!(err, GenError::UnknownKind(ref k) if k == "nonexistent"));
    }

    #[test]
    fn write_units_creates_directory() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("ga");
        write_units(&out, &[("type_client.rs".into(), "// x\n".into())]).unwrap();
        assert_eq!(fs::read_to_string(out.join("type_client.rs")).unwrap(), "// x\n");
    }
}
