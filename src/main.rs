//! # Run a walk-forward study with the default universe
//! momentum-backtest run --data data/stooq --output results
//!
//! # Override the universe and parameter ranges
//! momentum-backtest run --data data/stooq --output results \
//!     --tickers SPY,QQQ,TLT --lookbacks 20,60,120 --top-k 2

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use momentum_backtest::{run_walkforward, write_artifacts, PriceLoader, WalkForwardParams};

#[derive(Parser)]
#[command(name = "momentum-backtest")]
#[command(about = "Walk-forward momentum backtesting engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a walk-forward study and write artifacts
    Run {
        /// Path to directory of per-ticker CSV price files
        #[arg(short, long, default_value = "data/stooq")]
        data: PathBuf,

        /// Output directory for artifacts
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Comma-separated universe of tickers
        #[arg(long, value_delimiter = ',')]
        tickers: Option<Vec<String>>,

        /// Run start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Run end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Training range length in trading days
        #[arg(long)]
        train_days: Option<usize>,

        /// Test range length in trading days
        #[arg(long)]
        test_days: Option<usize>,

        /// Days between rebalances (also the window roll step)
        #[arg(long)]
        rebalance_days: Option<usize>,

        /// Comma-separated candidate momentum lookbacks
        #[arg(long, value_delimiter = ',')]
        lookbacks: Option<Vec<usize>>,

        /// Number of instruments held at each rebalance
        #[arg(long)]
        top_k: Option<usize>,

        /// One-way transaction fee in basis points
        #[arg(long)]
        fee_bps: Option<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data,
            output,
            tickers,
            start,
            end,
            train_days,
            test_days,
            rebalance_days,
            lookbacks,
            top_k,
            fee_bps,
        } => {
            let mut params = WalkForwardParams::default();
            if let Some(tickers) = tickers {
                params.tickers = tickers.iter().map(|t| t.to_uppercase()).collect();
            }
            if let Some(start) = start {
                params.start = parse_date(&start)?;
            }
            if let Some(end) = end {
                params.end = parse_date(&end)?;
            }
            if let Some(train_days) = train_days {
                params.train_days = train_days;
            }
            if let Some(test_days) = test_days {
                params.test_days = test_days;
            }
            if let Some(rebalance_days) = rebalance_days {
                params.rebalance_days = rebalance_days;
            }
            if let Some(lookbacks) = lookbacks {
                params.lookbacks = lookbacks;
            }
            if let Some(top_k) = top_k {
                params.top_k = top_k;
            }
            if let Some(fee_bps) = fee_bps {
                params.fee_bps = fee_bps;
            }

            let loader = PriceLoader::new(&data);
            let prices = loader
                .load(&params.tickers)
                .with_context(|| format!("loading prices from {}", data.display()))?;

            let report = run_walkforward(&prices, &params).context("walk-forward run failed")?;

            write_artifacts(&output, &report)
                .with_context(|| format!("writing artifacts to {}", output.display()))?;

            println!("Walk-forward run complete");
            println!("  Windows:      {}", report.windows.len());
            println!("  Trades:       {}", report.trades.len());
            println!(
                "  Final equity: {:.4}",
                report.equity.last().map(|p| p.equity).unwrap_or(1.0)
            );
            println!("  CAGR:         {:.2}%", report.metrics.cagr * 100.0);
            println!("  Sharpe:       {:.2}", report.metrics.sharpe);
            println!("  Max drawdown: {:.2}%", report.metrics.max_drawdown * 100.0);
            println!("  Artifacts:    {}", output.display());
        }
    }

    Ok(())
}

fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}
