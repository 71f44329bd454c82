use anyhow::{Context, Result};
use regingest::reader::{CsvReader, DEFAULT_DELIMITER};
use std::{collections::BTreeMap, env, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) read args ────────────────────────────────────────────────
    let mut args = env::args().skip(1);
    let path: PathBuf = args
        .next()
        .map(PathBuf::from)
        .context("usage: regingest <companies.csv> [delimiter]")?;
    let delimiter = match args.next() {
        Some(d) => *d
            .as_bytes()
            .first()
            .context("delimiter must be a single character")?,
        None => DEFAULT_DELIMITER,
    };

    // ─── 3) ingest ───────────────────────────────────────────────────
    let reader = CsvReader::with_delimiter(&path, delimiter);
    let (companies, key_fields) = reader.read_companies_with_key_fields().await?;
    info!(
        "read {} companies ({} key-field records) from {}",
        companies.len(),
        key_fields.len(),
        path.display()
    );

    // ─── 4) report size distribution ─────────────────────────────────
    let mut sizes: BTreeMap<&str, u64> = BTreeMap::new();
    for record in &key_fields {
        *sizes.entry(record.company_size_final.as_str()).or_default() += 1;
    }
    for (size, count) in &sizes {
        info!(size = %size, count, "company size");
    }

    // ─── 5) write processed copy ─────────────────────────────────────
    let out = reader.write_companies(&companies, None).await?;
    info!("wrote processed copy to {}", out.display());

    info!("all done");
    Ok(())
}
