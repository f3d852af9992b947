use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use vp_ingest::{
    get_import_events, ingest_file, parse_file, setup_database, verify_count, Config, Disposition,
    ParsedReport, ReportType,
};

#[derive(Parser)]
#[command(name = "vp-ingest")]
#[command(about = "Parse ERP text exports into typed tables and load them into SQLite")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every known report type
    Layouts,

    /// Parse one file and print a summary
    Parse {
        file: PathBuf,

        /// Report code or number; detected from the file name when omitted
        #[arg(short, long)]
        report: Option<String>,

        /// Write the parsed table as CSV
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Parse files and load them into SQLite
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Database path (defaults to the configured one)
        #[arg(long)]
        db: Option<PathBuf>,

        #[arg(short, long)]
        report: Option<String>,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Layouts => run_layouts(),
        Command::Parse {
            file,
            report,
            out,
            config,
        } => run_parse(&file, report.as_deref(), out.as_deref(), config.as_deref()),
        Command::Import {
            files,
            db,
            report,
            config,
        } => run_import(&files, db, report.as_deref(), config.as_deref()),
    }
}

fn resolve_report(code: Option<&str>) -> Result<Option<ReportType>> {
    match code {
        Some(code) => ReportType::from_code(code)
            .map(Some)
            .with_context(|| format!("Unknown report code: {}", code)),
        None => Ok(None),
    }
}

fn run_layouts() -> Result<()> {
    println!("📚 Known report layouts");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for report in ReportType::ALL {
        let layout = report.layout();
        println!(
            "{:<28} {:<40} {} fields",
            report.code(),
            report.name(),
            layout.fields.len()
        );
    }
    Ok(())
}

fn print_summary(parsed: &ParsedReport) {
    match &parsed.disposition {
        Disposition::Accepted => println!("✅ Accepted"),
        Disposition::Rejected(reason) => println!("❌ Rejected: {}", reason),
    }
    println!("✓ Rows:       {}", parsed.table.row_count());
    println!("✓ Columns:    {}", parsed.table.column_names().join(", "));
    println!("✓ Duplicates: {}", parsed.duplicates);
    println!("✓ Skipped:    {}", parsed.skipped.len());
    for line in &parsed.skipped {
        println!("   ⚠️  {}", line);
    }
}

fn run_parse(file: &Path, report: Option<&str>, out: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let config = Config::load(config)?;
    let report = resolve_report(report)?;

    println!("📂 Parsing {}", file.display());
    let parsed = parse_file(file, report, &config)?;
    println!("📋 Report: {} ({})", parsed.report, parsed.report.name());
    print_summary(&parsed);

    if let Some(out) = out {
        let writer = File::create(out).with_context(|| format!("Failed to create {:?}", out))?;
        parsed.table.write_csv(BufWriter::new(writer))?;
        println!("\n💾 Wrote {}", out.display());
    }

    Ok(())
}

fn run_import(files: &[PathBuf], db: Option<PathBuf>, report: Option<&str>, config: Option<&Path>) -> Result<()> {
    let config = Config::load(config)?;
    let report = resolve_report(report)?;
    let db_path = db.unwrap_or_else(|| config.database.clone());

    println!("🗄️  Import - report files → SQLite + WAL");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\n🔧 Setting up database {}...", db_path.display());
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Failed to open database {:?}", db_path))?;
    setup_database(&conn)?;

    let mut failed = 0;
    for file in files {
        println!("\n📂 {}", file.display());
        let outcome = match ingest_file(file, report, &config, Some(&conn)) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(file = %file.display(), error = %format!("{:#}", e), "import failed");
                println!("❌ {:#}", e);
                failed += 1;
                continue;
            }
        };

        print_summary(&outcome.parsed);
        if let Some(loaded) = outcome.loaded {
            println!("💾 Inserted {} rows, {} already present", loaded.inserted, loaded.duplicates);
        }
        if let Some(to) = &outcome.routed_to {
            println!("📦 Moved to {}", to.display());
        }
        if outcome.parsed.disposition.is_accepted() && !outcome.parsed.table.columns().is_empty() {
            let count = verify_count(&conn, outcome.parsed.report)?;
            println!("🔍 {} now holds {} rows", outcome.parsed.report, count);
        }
    }

    let events = get_import_events(&conn)?;
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ Files: {} ({} failed)", files.len(), failed);
    println!("✓ Import events recorded: {}", events.len());
    info!(files = files.len(), failed, "import finished");

    Ok(())
}
