use anyhow::{anyhow, Context, Result};
use clap::Parser;

use chipsinput::{ChipsConfig, ChipsField, DomainValidator, StaticSuggestions, StringBuffer};

mod cli;

use cli::{CliArgs, OutputFormat, RunConfig};

// ============================================================================
// MAIN - Entry point
// ============================================================================

fn main() -> Result<()> {
    chipsinput::tracing::init();

    let args = CliArgs::parse();
    let base = match &args.config {
        Some(path) => ChipsConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ChipsConfig::load(),
    };
    let run = args.into_config(base).map_err(|e| anyhow!(e))?;

    let field = tokenize(&run)?;
    print_result(&field, run.output)
}

/// Drive a field the way a host would: size it, focus it, feed values and
/// pasted text, then drain the deferred work.
fn tokenize(run: &RunConfig) -> Result<ChipsField<StringBuffer>> {
    let mut builder = ChipsField::builder(StringBuffer::new()).config(run.chips.clone());
    if let Some(domain) = &run.domain {
        builder = builder.validator(DomainValidator::with_domain(domain.clone()));
    }
    if !run.suggestions.is_empty() {
        builder = builder.suggestions(StaticSuggestions::new(run.suggestions.iter().cloned()));
    }
    let mut field = builder.build().context("building chip field")?;

    field.set_width(run.width);
    field.set_focus(true);

    if !run.values.is_empty() {
        field.set_chips_list(run.values.iter().cloned());
        field.run_tasks();
    }
    if let Some(text) = &run.paste {
        let created = field.paste(text);
        tracing::info!(created = created.len(), "pasted text");
        field.run_tasks();
    }
    Ok(field)
}

fn print_result(field: &ChipsField<StringBuffer>, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "chips": field.chip_values(),
                "text": field.text(),
                "no_chips": field.is_no_chips(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            for (chip, range) in field.chips() {
                let label = chip.visual.as_ref().map_or("", |visual| visual.label.as_str());
                println!("{:>3}..{:<3} {}", range.start, range.end, label);
            }
            println!("text: {:?}", field.text());
        }
    }
    Ok(())
}
