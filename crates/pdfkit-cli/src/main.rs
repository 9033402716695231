// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PdfKit — command-line front end.
//
// Entry point. Initialises logging, loads the input files into one item, runs
// the PdfKit node over it, and writes the produced attachments to disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdfkit_core::{Attachment, Item, NodeConfig};
use pdfkit_node::{MemoryHost, PdfKitNode, node_description};
use serde_json::json;

#[derive(Parser)]
#[command(name = "pdfkit")]
#[command(version, about = "Convert images to PDF, merge PDFs, and split PDFs into page images")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Combine images into one PDF, one page per image
    ImagesToPdf {
        /// Images, in page order
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Name of the output PDF, without extension
        #[arg(long)]
        name: String,

        /// Directory the PDF is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Append the pages of SECOND to FIRST
    Merge {
        first: PathBuf,
        second: PathBuf,

        /// Name of the output PDF, without extension
        #[arg(long)]
        name: String,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Render every page of a PDF to a PNG
    Split {
        pdf: PathBuf,

        /// Prefix of the page file names
        #[arg(long, default_value = "page")]
        prefix: String,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Render resolution
        #[arg(long)]
        dpi: Option<u32>,

        /// Path to the pdftoppm binary
        #[arg(long)]
        pdftoppm: Option<PathBuf>,
    },

    /// Print the node description as JSON
    Describe,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = NodeConfig::from_env();

    let (host, item, out_dir) = match cli.command {
        Command::Describe => {
            println!("{}", serde_json::to_string_pretty(&node_description())?);
            return Ok(());
        }
        Command::ImagesToPdf {
            images,
            name,
            out_dir,
        } => {
            let mut item = Item::new(json!({}));
            for (index, path) in images.iter().enumerate() {
                item.binary
                    .insert(format!("image{}", index + 1), load(path).await?);
            }
            let host = MemoryHost::new()
                .with_parameter("operation", "imagesToPDF")
                .with_parameter("pdfName", name);
            (host, item, out_dir)
        }
        Command::Merge {
            first,
            second,
            name,
            out_dir,
        } => {
            let item = Item::new(json!({}))
                .with_binary("first", load(&first).await?)
                .with_binary("second", load(&second).await?);
            let host = MemoryHost::new()
                .with_parameter("operation", "mergePDFs")
                .with_parameter("pdfName", name)
                .with_parameter("firstPdfField", "first")
                .with_parameter("secondPdfField", "second");
            (host, item, out_dir)
        }
        Command::Split {
            pdf,
            prefix,
            out_dir,
            dpi,
            pdftoppm,
        } => {
            if let Some(dpi) = dpi {
                config.raster_dpi = dpi;
            }
            if let Some(binary) = pdftoppm {
                config.pdftoppm_path = binary;
            }
            let item = Item::new(json!({})).with_binary("pdf", load(&pdf).await?);
            let host = MemoryHost::new()
                .with_parameter("operation", "pdfToImages")
                .with_parameter("pdfField", "pdf")
                .with_parameter("outputPrefix", prefix);
            (host, item, out_dir)
        }
    };

    tracing::debug!(?config, "Node configured");
    let node = PdfKitNode::new(config);
    let output = node.execute(&host, vec![item]).await?;

    tokio::fs::create_dir_all(&out_dir)
        .await
        .with_context(|| format!("creating {}", out_dir.display()))?;
    for item in &output {
        for (key, attachment) in &item.binary {
            let file_name = attachment.file_name.as_deref().unwrap_or(key);
            let path = out_dir.join(file_name);
            tokio::fs::write(&path, &attachment.data)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = attachment.len(), "Wrote attachment");
        }
    }

    Ok(())
}

/// Read a file as an attachment, MIME type inferred from its extension.
async fn load(path: &Path) -> Result<Attachment> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let file_name = path.file_name().and_then(|name| name.to_str());
    Ok(Attachment::from_buffer(data, file_name, None))
}
