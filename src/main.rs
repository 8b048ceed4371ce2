use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tally::application::scanner::ReceiptScanner;
use tally::application::session::Session;
use tally::domain::bill::{Percent, SplitMode, TipBasis, TipMode};
use tally::domain::ports::TextRecognizerBox;
use tally::infrastructure::plain_text::PlainTextRecognizer;
use tally::infrastructure::tesseract::TesseractRecognizer;
use tally::interfaces::csv::dish_reader::DishReader;
use tally::interfaces::csv::totals_writer::TotalsWriter;
use tally::interfaces::json::report::Report;
use tally::interfaces::json::session_file::SessionFile;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Split a restaurant bill", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Work out what everyone owes
    Split(SplitArgs),
    /// Suggest dish names from a receipt
    Scan(ScanArgs),
}

#[derive(Args)]
struct SplitArgs {
    /// Session JSON file
    session: PathBuf,

    /// CSV of dishes (name,price,shared_by) replacing the session's dishes
    #[arg(long)]
    dishes: Option<PathBuf>,

    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    #[arg(long, value_enum)]
    basis: Option<BasisArg>,

    /// Tax percent for the active mode
    #[arg(long, allow_negative_numbers = true)]
    tax: Option<Decimal>,

    /// Tip percent for the active mode
    #[arg(long, allow_negative_numbers = true)]
    tip: Option<Decimal>,

    /// Fixed tip amount for the active mode
    #[arg(long, allow_negative_numbers = true)]
    tip_amount: Option<Decimal>,

    #[arg(long, value_enum)]
    tip_mode: Option<TipModeArg>,

    /// Bill total to split evenly
    #[arg(long, allow_negative_numbers = true)]
    total_bill: Option<Decimal>,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Decimal places shown in the output
    #[arg(long, default_value_t = 2)]
    precision: u32,
}

#[derive(Args)]
struct ScanArgs {
    /// Receipt image, or a text file with --transcript
    input: PathBuf,

    /// Treat the input as already-recognized text
    #[arg(long)]
    transcript: bool,

    /// Path to the tesseract executable
    #[arg(long, default_value = "tesseract")]
    tesseract: PathBuf,

    /// Recognition language
    #[arg(long, default_value = "eng")]
    lang: String,

    /// Session JSON file to add suggestions to
    #[arg(long)]
    session: Option<PathBuf>,

    /// Add every suggestion as a dish and print the updated session
    #[arg(long, requires = "session")]
    accept: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Dishes,
    Even,
}

impl From<ModeArg> for SplitMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Dishes => SplitMode::Dishes,
            ModeArg::Even => SplitMode::Even,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BasisArg {
    AfterTax,
    BeforeTax,
}

impl From<BasisArg> for TipBasis {
    fn from(arg: BasisArg) -> Self {
        match arg {
            BasisArg::AfterTax => TipBasis::AfterTax,
            BasisArg::BeforeTax => TipBasis::BeforeTax,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TipModeArg {
    Percent,
    Amount,
}

impl From<TipModeArg> for TipMode {
    fn from(arg: TipModeArg) -> Self {
        match arg {
            TipModeArg::Percent => TipMode::Percent,
            TipModeArg::Amount => TipMode::Amount,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

fn load_session(path: &Path) -> Result<Session> {
    let file = File::open(path).into_diagnostic()?;
    SessionFile::from_reader(file)
        .and_then(SessionFile::into_session)
        .into_diagnostic()
}

fn split(args: SplitArgs) -> Result<()> {
    let mut session = load_session(&args.session)?;

    if let Some(path) = &args.dishes {
        session.clear_dishes();

        let file = File::open(path).into_diagnostic()?;
        for dish_result in DishReader::new(file).dishes() {
            match dish_result {
                Ok(dish) => {
                    session.add_shared_dish(dish).into_diagnostic()?;
                }
                Err(e) => tracing::warn!(error = %e, "skipping malformed dish row"),
            }
        }
    }

    if let Some(mode) = args.mode {
        session.set_split_mode(mode.into());
    }
    if let Some(basis) = args.basis {
        session.set_tip_basis(basis.into());
    }
    if let Some(tax) = args.tax {
        session.set_tax_percent(Percent::new(tax)).into_diagnostic()?;
    }
    if let Some(tip) = args.tip {
        session.set_tip_percent(Percent::new(tip)).into_diagnostic()?;
    }
    if let Some(amount) = args.tip_amount {
        session.set_tip_amount(amount).into_diagnostic()?;
    }
    if let Some(mode) = args.tip_mode {
        session.set_tip_mode(mode.into());
    }
    if let Some(total) = args.total_bill {
        session.set_total_bill(total).into_diagnostic()?;
    }

    let summary = session.summary();
    tracing::info!(
        subtotal = %summary.breakdown.subtotal,
        tax = %summary.breakdown.tax_amount,
        tip = %summary.breakdown.tip_amount,
        total = %summary.breakdown.total,
        "bill computed"
    );

    let stdout = io::stdout();
    match args.format {
        Format::Csv => TotalsWriter::new(stdout.lock(), args.precision)
            .write_totals(summary.totals.totals())
            .into_diagnostic()?,
        Format::Json => {
            let mut out = stdout.lock();
            Report::new(summary, args.precision)
                .write_pretty(&mut out)
                .into_diagnostic()?;
            writeln!(out).into_diagnostic()?;
        }
    }
    Ok(())
}

async fn scan(args: ScanArgs) -> Result<()> {
    let payload = tokio::fs::read(&args.input).await.into_diagnostic()?;
    let recognizer: TextRecognizerBox = if args.transcript {
        Box::new(PlainTextRecognizer)
    } else {
        Box::new(TesseractRecognizer::new(args.tesseract, args.lang))
    };

    let outcome = ReceiptScanner::new(recognizer).scan(&payload).await;
    if outcome.failed {
        eprintln!("{}", outcome.extracted_text);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.session {
        Some(path) if args.accept => {
            let mut session = load_session(&path)?;
            session.set_suggestions(outcome.suggestions);
            session.accept_all_suggestions();
            SessionFile::from(&session)
                .write_pretty(&mut out)
                .into_diagnostic()?;
            writeln!(out).into_diagnostic()?;
        }
        _ => {
            for suggestion in &outcome.suggestions {
                writeln!(out, "{}", suggestion).into_diagnostic()?;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Split(args) => split(args),
        Command::Scan(args) => scan(args).await,
    }
}
