use crate::config::load_config;
use crate::document;
use crate::export::write_csv;
use crate::layout::{LayoutDirection, layout_positions};
use crate::pipeline::Workspace;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "hnt",
    version,
    about = "Home-network topology planner: recompute IPs, auto-layout, export inventory"
)]
pub struct Args {
    /// Input graph document (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Config JSON file (layout tuning)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Re-run auto-layout over the topology view before writing (TB or LR)
    #[arg(short = 'l', long = "layout")]
    pub layout: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Normalized graph document with recomputed IPs
    Json,
    /// Device inventory sheet
    Csv,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let mut workspace = Workspace::new();
    workspace.load_json(&input);

    if let Some(token) = args.layout.as_deref() {
        let direction = LayoutDirection::from_token(token).ok_or_else(|| {
            anyhow::anyhow!("unknown layout direction: {token} (expected TB or LR)")
        })?;
        let positions = layout_positions(workspace.store(), direction, &config.layout);
        workspace.apply_layout(&positions);
    }

    match args.output_format {
        OutputFormat::Json => {
            let json = document::to_json(&workspace.to_document(None))?;
            write_output(&json, args.output.as_deref())?;
        }
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_csv(workspace.store(), &mut buf)?;
            write_output(&String::from_utf8(buf)?, args.output.as_deref())?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)?,
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_pipeline_recomputes_ips() {
        let input = r#"{
            "nodes": [
                {"id": "m", "type": "modemNode", "position": {"x": 0, "y": 0},
                 "data": {"label": "Modem", "subnet": "192.168.1.0", "ipSuffix": "1"}},
                {"id": "s", "type": "switchNode", "position": {"x": 0, "y": 120},
                 "data": {"label": "Switch", "ipSuffix": "10"}}
            ],
            "edges": [{"id": "e", "source": "m", "target": "s"}]
        }"#;
        let mut workspace = Workspace::new();
        workspace.load_json(input);
        let json = document::to_json(&workspace.to_document(None)).unwrap();
        assert!(json.contains("\"192.168.1.10\""));
        assert!(json.contains("192.168.1.0/24"));
    }

    #[test]
    fn csv_pipeline_emits_inventory() {
        let input = r#"{
            "nodes": [{"id": "m", "type": "modemNode", "position": {"x": 0, "y": 0},
                       "data": {"label": "Modem", "subnet": "10.0.0.0", "ipSuffix": "1"}}],
            "edges": []
        }"#;
        let mut workspace = Workspace::new();
        workspace.load_json(input);
        let mut buf = Vec::new();
        write_csv(workspace.store(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("10.0.0.1"));
    }
}
