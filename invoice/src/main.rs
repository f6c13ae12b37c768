use std::path::PathBuf;

use clap::Parser;
use invoice::{DEFAULT_HOURLY_RATE, DEFAULT_ISSUED_ON, DEFAULT_ISSUER, Invoice, InvoiceError, default_entries, load_entries};

#[derive(Parser, Debug)]
#[command(name = "invoice", about = "Render a printable hours invoice as HTML")]
struct Cli {
    /// JSON array of `{ date, hours, task }` replacing the built-in entries.
    #[arg(long, env = "INVOICE_ENTRIES")]
    entries: Option<PathBuf>,

    #[arg(long, env = "INVOICE_RATE", default_value_t = DEFAULT_HOURLY_RATE)]
    rate: u32,

    #[arg(long, env = "INVOICE_ISSUER", default_value = DEFAULT_ISSUER)]
    issuer: String,

    #[arg(long, env = "INVOICE_DATE", default_value = DEFAULT_ISSUED_ON)]
    date: String,

    /// Write to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), InvoiceError> {
    let cli = Cli::parse();

    let entries = match &cli.entries {
        Some(path) => load_entries(path)?,
        None => default_entries(),
    };
    let invoice = Invoice { issuer: cli.issuer, issued_on: cli.date, hourly_rate: cli.rate, entries };
    let html = invoice.render_html();

    match cli.output {
        Some(path) => {
            std::fs::write(&path, html)?;
            eprintln!(
                "invoice written: {} ({} hours, €{})",
                path.display(),
                invoice.total_hours(),
                invoice.total_amount()
            );
        }
        None => print!("{html}"),
    }
    Ok(())
}
