// promptmeta - CLI for inspecting AI image generation metadata

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use promptmeta::ParsedMetadata;

#[derive(Parser)]
#[command(name = "promptmeta", version, about = "Extract AI generation metadata from JPEG/PNG images")]
struct Args {
    /// Image file to inspect
    image: PathBuf,

    /// Emit the parsed metadata as JSON
    #[arg(long)]
    json: bool,

    /// Dump the raw metadata text blob instead of parsing it
    #[arg(long)]
    raw: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    if args.raw {
        let text = promptmeta::raw_text_from_path(&args.image)
            .with_context(|| format!("could not read metadata from {}", args.image.display()))?;
        println!("{}", text);
        return Ok(());
    }

    let parsed = promptmeta::from_path(&args.image)
        .with_context(|| format!("could not read metadata from {}", args.image.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    } else {
        print_fields(&parsed);
    }

    Ok(())
}

fn print_fields(parsed: &ParsedMetadata) {
    println!("Prompt:          {}", parsed.prompt);
    println!("Negative prompt: {}", parsed.negative_prompt);
    println!("Steps:           {}", parsed.steps().unwrap_or(""));
    println!("Sampler:         {}", parsed.sampler().unwrap_or(""));
    println!("CFG scale:       {}", parsed.cfg_scale().unwrap_or(""));
    println!("Seed:            {}", parsed.seed().unwrap_or(""));
    println!("Size:            {}", parsed.size().unwrap_or(""));
    println!("Clip skip:       {}", parsed.clip_skip().unwrap_or(""));
    println!("Model:           {}", parsed.model().unwrap_or(""));
    println!("Other:           {}", parsed.extra_display());
}
