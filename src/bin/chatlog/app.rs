use std::fs;
use std::io::{self, Read, Write};
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use chatlog::config::load_config;
use chatlog::render::Document;
use chatlog::view::{Transcript, TranscriptView};
use chatlog::Renderer;

use crate::args::CliArgs;
use crate::logging::init_logging;

pub fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let loaded = load_config(args.config.clone())?;
    let _logger = init_logging(&loaded.config.logging, &loaded.paths)?;
    log::info!(
        "chatlog starting (config: {}, exists: {})",
        loaded.paths.config_file.display(),
        loaded.config_exists
    );

    let renderer = Renderer::install(&loaded.config.render)?;
    let mut transcript = read_transcript(&args)?;
    if args.waiting {
        transcript.waiting_for_response = true;
    }
    log::debug!(
        "rendering {} messages (waiting: {})",
        transcript.messages.as_ref().map_or(0, Vec::len),
        transcript.waiting_for_response
    );

    let mut view = TranscriptView::new(renderer, &loaded.config.view);
    let tree = view.update(&transcript, Instant::now());
    let mut document = Document::new();
    tree.mount_into(&mut document);
    let page = document.to_page(&args.title);

    match &args.output {
        Some(path) => fs::write(path, page)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout().lock().write_all(page.as_bytes())?,
    }
    Ok(())
}

fn read_transcript(args: &CliArgs) -> anyhow::Result<Transcript> {
    let raw = if args.reads_stdin() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.transcript)
            .with_context(|| format!("failed to read {}", args.transcript.display()))?
    };
    serde_json::from_str(&raw).context("transcript is not valid JSON")
}
