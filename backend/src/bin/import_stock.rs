//! Load a stock workbook into the parts table from the command line.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use inventory_backend::domain::ports::{IngestMode, IngestRequest, InventoryIngestionCommand};
use inventory_backend::domain::{
    ColumnProfile, HeaderMatching, InventoryIngestionService, RowMapper, is_workbook_file,
};
use inventory_backend::outbound::persistence::{DbPool, DieselPartsRepository, PoolConfig};
use inventory_backend::outbound::spreadsheet::CalamineWorkbookReader;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `import-stock` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-stock",
    about = "Load the inventory sheet of an .xlsx/.xls workbook into the parts table",
    version
)]
struct CliArgs {
    /// Path to the workbook.
    #[arg(long = "file", value_name = "path")]
    file: PathBuf,
    /// `append` keeps existing rows, `replace` swaps them atomically.
    #[arg(long = "mode", value_name = "mode", default_value = "append")]
    mode: IngestMode,
    /// Zero-based index of the header row within the sheet.
    #[arg(long = "header-row-offset", value_name = "rows", default_value_t = 0)]
    header_row_offset: usize,
    /// Compare header cells ignoring case.
    #[arg(long = "case-insensitive-headers")]
    case_insensitive_headers: bool,
    /// Header alias table: `stock_ledger` or `legacy_catalogue`.
    #[arg(long = "column-profile", value_name = "profile", default_value = "stock_ledger")]
    column_profile: ColumnProfile,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

impl CliArgs {
    fn row_mapper(&self) -> RowMapper {
        let matching = if self.case_insensitive_headers {
            HeaderMatching::CaseInsensitive
        } else {
            HeaderMatching::Exact
        };
        RowMapper::new(self.column_profile.aliases(), matching)
    }
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let workbook = read_workbook_file(&args.file)?;

    let database_url = resolve_database_url(args.database_url.clone())?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let command = InventoryIngestionService::new(
        Arc::new(CalamineWorkbookReader::new()),
        Arc::new(DieselPartsRepository::new(pool)),
    )
    .with_mapper(args.row_mapper())
    .with_header_row_offset(args.header_row_offset);

    let report = command
        .ingest(IngestRequest {
            workbook,
            mode: args.mode,
        })
        .await
        .map_err(|error| io::Error::other(format!("import failed: {}", error.message())))?;

    println!("mode={}", report.mode);
    println!("accepted={}", report.accepted);
    println!("skipped={}", report.skipped);
    Ok(())
}

fn read_workbook_file(path: &Path) -> io::Result<Vec<u8>> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "input path must be a file"))?;
    if !is_workbook_file(&file_name.to_string_lossy()) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' is not an .xlsx or .xls workbook", path.display()),
        ));
    }
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open input parent directory '{}': {error}",
            parent.display()
        ))
    })?;
    let mut file = directory.open(Path::new(file_name)).map_err(|error| {
        io::Error::other(format!("open input file '{}': {error}", path.display()))
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|error| {
        io::Error::other(format!("read input file '{}': {error}", path.display()))
    })?;
    Ok(bytes)
}

fn resolve_database_url(explicit: Option<String>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    let from_env = env::var("DATABASE_URL").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL missing: set --database-url or DATABASE_URL",
        )
    })?;
    if from_env.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "DATABASE_URL must not be empty",
        ));
    }
    Ok(from_env)
}
