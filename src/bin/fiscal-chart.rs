use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fiscal_chart::format::format_amount;
use fiscal_chart::stats::{YearTotals, same_period_comparison};
use fiscal_chart::{
    ChartOptions, DatasetKind, FiscalChart, JsonConfigSink, PlottersSink, ToggleEvent,
    ToggleState, normalize,
};
use fiscal_chart::storage;
use log::LevelFilter;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fiscal-chart",
    version,
    about = "Turn monthly fiscal summaries into sales/profit chart datasets"
)]
struct Cli {
    /// Verbose logging (debug level). `RUST_LOG` takes precedence when set.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose the chart datasets (and optionally plot, export, and print totals).
    Render(RenderArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BaseKind {
    Bar,
    Line,
}

impl From<BaseKind> for DatasetKind {
    fn from(k: BaseKind) -> Self {
        match k {
            BaseKind::Bar => DatasetKind::Bar,
            BaseKind::Line => DatasetKind::Line,
        }
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Input JSON with `monthly_summaries` (newest year first), optional `budget`,
    /// `months_label`, `latest_year` and `fiscal_month`.
    #[arg(short, long)]
    input: PathBuf,
    /// Show gross profit as a line overlay.
    #[arg(long, default_value_t = false)]
    gross_profit: bool,
    /// Show operating profit as a line overlay.
    #[arg(long, default_value_t = false)]
    operating_profit: bool,
    /// Create a chart image at the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Write the Chart.js config to the given path.
    #[arg(long)]
    config_out: Option<PathBuf>,
    /// Write the dense per-year series as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Write the composed dataset list as JSON.
    #[arg(long)]
    datasets_out: Option<PathBuf>,
    /// Locale for thousands separators (ja, en, de, fr, es, it, pt, nl).
    #[arg(long, default_value = "ja")]
    locale: String,
    /// Currency unit appended to amounts.
    #[arg(long, default_value = "千円")]
    unit: String,
    /// Chart title.
    #[arg(long, default_value = "")]
    title: String,
    /// Chart type for datasets that do not override it.
    #[arg(long, value_enum, default_value_t = BaseKind::Bar)]
    base_kind: BaseKind,
    /// Width of the plot (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the plot (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// TrueType font for axis labels and legend in --plot output.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Print this year's totals against the same period last year.
    #[arg(long, default_value_t = false)]
    totals: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    builder.parse_default_env();
    let _ = builder.try_init();
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let input = storage::load_input(&args.input)?;
    let options = ChartOptions {
        locale: args.locale.clone(),
        unit: args.unit.clone(),
        title: args.title.clone(),
        base_kind: args.base_kind.into(),
        width: args.width,
        height: args.height,
        font: args.font.clone(),
    };
    let toggles = ToggleState::new(args.gross_profit, args.operating_profit);
    let mut chart = FiscalChart::new(&input, options).with_toggles(toggles);

    let mut wrote_any = false;

    if let Some(path) = args.config_out.as_ref() {
        let mut sink = JsonConfigSink::new(BufWriter::new(File::create(path)?));
        chart.mount(&mut sink)?;
        eprintln!("Wrote chart config to {}", path.display());
        wrote_any = true;
    }

    if let Some(path) = args.plot.as_ref() {
        let mut sink = PlottersSink::new(path);
        chart.mount(&mut sink)?;
        eprintln!("Wrote plot to {}", path.display());
        wrote_any = true;
    }

    if let Some(path) = args.datasets_out.as_ref() {
        let datasets = chart.recompute(chart.toggles());
        storage::save_json(&datasets, path)?;
        eprintln!("Saved {} datasets to {}", datasets.len(), path.display());
        wrote_any = true;
    }

    if let Some(path) = args.csv.as_ref() {
        storage::save_series_csv(chart.series(), path)?;
        eprintln!(
            "Saved {} year(s) of series to {}",
            chart.series().len(),
            path.display()
        );
        wrote_any = true;
    }

    if args.totals {
        let normalized = normalize(&input.monthly_summaries);
        match same_period_comparison(&normalized) {
            Some((current, prior)) => {
                print_totals(&current, &args.locale, &args.unit);
                print_totals(&prior, &args.locale, &args.unit);
            }
            None => eprintln!("Need at least two years of summaries for --totals"),
        }
        wrote_any = true;
    }

    if !wrote_any {
        let stdout = io::stdout();
        let mut sink = JsonConfigSink::new(stdout.lock());
        chart.handle(ToggleEvent::Mount, &mut sink)?;
    }
    Ok(())
}

fn fmt_margin(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{:.1}%", x),
        _ => "NA".to_string(),
    }
}

fn print_totals(t: &YearTotals, locale: &str, unit: &str) {
    println!(
        "{} (periods 1-{})  sales={}  gross_profit={} ({})  operating_profit={} ({})",
        t.year,
        t.period_count,
        format_amount(t.sales, locale, unit),
        format_amount(t.gross_profit, locale, unit),
        fmt_margin(t.gross_margin),
        format_amount(t.operating_profit, locale, unit),
        fmt_margin(t.operating_margin),
    );
}
