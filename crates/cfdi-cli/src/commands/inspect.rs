//! Inspect command - show how one file would be classified.

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::json;

use cfdi_core::cfdi::ComprobanteExtractor;
use cfdi_core::document::SourceDocument;
use cfdi_core::layout::DestinationPlanner;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// XML file to inspect
    #[arg(required = true)]
    input: PathBuf,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::config::load(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let source = SourceDocument::load(&args.input)?;
    let document = match source.parse() {
        Ok(document) => document,
        Err(e) => {
            let planner = DestinationPlanner::from_config("", &config.layout);
            anyhow::bail!(
                "{} is not well-formed ({}); it would go to {}",
                args.input.display(),
                e,
                planner.error_bucket().display()
            );
        }
    };

    let extractor = ComprobanteExtractor::from_config(&config.extraction);
    let classification = extractor.classify(&document);
    let relative =
        DestinationPlanner::from_config("", &config.layout).relative(&classification.key);

    if args.json {
        let output = json!({
            "file": args.input,
            "key": classification.key,
            "description": classification.description,
            "code_rule": classification.code.as_ref().map(|c| c.rule),
            "destination": relative,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let key = &classification.key;
    println!("{}", style(args.input.display()).bold());
    println!("  Date:        {}", key.date_folder);
    println!("  Series:      {}", key.series);
    println!("  Code:        {}", key.code);

    match (&classification.description, &classification.code) {
        (Some(description), Some(code)) => {
            println!("  Description: {}", description);
            println!("  Rule:        {}", code.rule);
        }
        (Some(description), None) => {
            println!("  Description: {}", description);
            println!("  Rule:        {}", style("no match").yellow());
        }
        (None, _) => {
            println!("  Description: {}", style("none").yellow());
        }
    }

    println!();
    println!(
        "{} Would be placed in {}",
        style("ℹ").blue(),
        relative.display()
    );

    Ok(())
}
