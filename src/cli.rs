//! CLI definition and dispatch.
//!
//! Stage messages go to stderr; machine-readable output (CSV series, JSON
//! summaries) goes to stdout.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_backtest, BacktestParams};
use crate::domain::candle::Candle;
use crate::domain::config_validation::validate_backtest_config;
use crate::domain::error::ChartlabError;
use crate::domain::indicator::{ema, macd, rsi, supertrend, vwap_anchored};
use crate::domain::position::recalc_position;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "chartlab", about = "Candle analytics and strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum IndicatorKind {
    Ema,
    Rsi,
    Macd,
    Vwap,
    Supertrend,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the EMA-cross/RSI backtest over a candle CSV
    Backtest {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the full summary as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Compute one indicator series and print it as CSV
    Indicator {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        kind: IndicatorKind,
        /// Period for ema/rsi/supertrend
        #[arg(long)]
        period: Option<usize>,
        #[arg(long, default_value_t = 12)]
        fast: usize,
        #[arg(long, default_value_t = 26)]
        slow: usize,
        #[arg(long, default_value_t = 9)]
        signal: usize,
        /// Anchor index for vwap
        #[arg(long, default_value_t = 0)]
        anchor: usize,
        /// Band multiplier for supertrend
        #[arg(long, default_value_t = 3.0)]
        multiplier: f64,
    },
    /// Recalculate position cost basis from a trade ledger CSV
    Position {
        #[arg(short, long)]
        trades: PathBuf,
        /// Print the snapshot as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Show bar count and timestamp range for a candle CSV
    Info {
        #[arg(short, long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest { data, config, json } => run_backtest_cmd(&data, config.as_ref(), json),
        Command::Indicator {
            data,
            kind,
            period,
            fast,
            slow,
            signal,
            anchor,
            multiplier,
        } => run_indicator_cmd(&data, kind, period, fast, slow, signal, anchor, multiplier),
        Command::Position { trades, json } => run_position_cmd(&trades, json),
        Command::Info { data } => run_info_cmd(&data),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = ChartlabError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_backtest_params(config: &dyn ConfigPort) -> BacktestParams {
    let defaults = BacktestParams::default();
    BacktestParams {
        fast: config.get_int("backtest", "fast", defaults.fast as i64) as usize,
        slow: config.get_int("backtest", "slow", defaults.slow as i64) as usize,
        rsi_period: config.get_int("backtest", "rsi_period", defaults.rsi_period as i64) as usize,
        rsi_overbought: config.get_double("backtest", "rsi_overbought", defaults.rsi_overbought),
        rsi_oversold: config.get_double("backtest", "rsi_oversold", defaults.rsi_oversold),
        commission: config.get_double("backtest", "commission", defaults.commission),
        slippage: config.get_double("backtest", "slippage", defaults.slippage),
    }
}

fn load_candles(path: &PathBuf) -> Result<Vec<Candle>, ExitCode> {
    eprintln!("Loading candles from {}", path.display());
    CsvAdapter::new(path.clone()).fetch_candles().map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn run_backtest_cmd(data: &PathBuf, config_path: Option<&PathBuf>, json: bool) -> ExitCode {
    let params = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            let adapter = match load_config(path) {
                Ok(a) => a,
                Err(code) => return code,
            };
            if let Err(e) = validate_backtest_config(&adapter) {
                eprintln!("error: {e}");
                return (&e).into();
            }
            build_backtest_params(&adapter)
        }
        None => BacktestParams::default(),
    };

    let candles = match load_candles(data) {
        Ok(c) => c,
        Err(code) => return code,
    };

    eprintln!(
        "Running backtest: {} bars, ema {}/{}, rsi {}",
        candles.len(),
        params.fast,
        params.slow,
        params.rsi_period,
    );

    let summary = match run_backtest(&candles, &params) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\n=== Backtest Results ===");
    eprintln!("Total Return:     {:.2}%", summary.total_return * 100.0);
    eprintln!("CAGR:             {:.2}%", summary.cagr * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", summary.sharpe);
    eprintln!("Max Drawdown:     -{:.1}%", summary.max_drawdown * 100.0);
    eprintln!("Total Trades:     {}", summary.trades.len());
    eprintln!("Win Rate:         {:.1}%", summary.winrate * 100.0);
    eprintln!("Profit Factor:    {:.2}", summary.profit_factor);

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("error: failed to serialize summary: {e}");
                return ExitCode::from(1);
            }
        }
    }
    ExitCode::SUCCESS
}

#[allow(clippy::too_many_arguments)]
fn run_indicator_cmd(
    data: &PathBuf,
    kind: IndicatorKind,
    period: Option<usize>,
    fast: usize,
    slow: usize,
    signal: usize,
    anchor: usize,
    multiplier: f64,
) -> ExitCode {
    let candles = match load_candles(data) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let result = match kind {
        IndicatorKind::Ema => {
            let Some(period) = period else {
                eprintln!("error: --period is required for ema");
                return ExitCode::from(2);
            };
            ema(&closes, period).map(|series| print_simple_series(&candles, &series, "ema"))
        }
        IndicatorKind::Rsi => {
            let period = period.unwrap_or(rsi::DEFAULT_PERIOD);
            rsi(&closes, period).map(|series| print_simple_series(&candles, &series, "rsi"))
        }
        IndicatorKind::Macd => macd(&closes, fast, slow, signal).map(|out| {
            println!("ts,macd,signal,hist");
            for (i, bar) in candles.iter().enumerate() {
                println!(
                    "{},{},{},{}",
                    bar.ts,
                    fmt_value(out.macd[i]),
                    fmt_value(out.signal[i]),
                    fmt_value(out.hist[i]),
                );
            }
        }),
        IndicatorKind::Vwap => vwap_anchored(&candles, anchor)
            .map(|series| print_simple_series(&candles, &series, "vwap")),
        IndicatorKind::Supertrend => {
            let period = period.unwrap_or(supertrend::DEFAULT_PERIOD);
            supertrend(&candles, period, multiplier).map(|out| {
                println!("ts,trend,direction");
                for (i, bar) in candles.iter().enumerate() {
                    println!(
                        "{},{},{}",
                        bar.ts,
                        fmt_value(out.trend[i]),
                        out.direction[i].value(),
                    );
                }
            })
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn print_simple_series(candles: &[Candle], series: &[f64], name: &str) {
    println!("ts,{name}");
    for (bar, value) in candles.iter().zip(series) {
        println!("{},{}", bar.ts, fmt_value(*value));
    }
}

/// NaN warm-up values render as an empty CSV field.
fn fmt_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{value}")
    }
}

fn run_position_cmd(trades_path: &PathBuf, json: bool) -> ExitCode {
    eprintln!("Loading trades from {}", trades_path.display());
    let trades = match CsvAdapter::new(trades_path.clone()).fetch_trades() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let snapshot = recalc_position(&trades);

    eprintln!("\n=== Position ===");
    eprintln!("Quantity:       {}", snapshot.quantity);
    eprintln!("Average Price:  {}", snapshot.average_price);
    eprintln!("Updated At:     {}", snapshot.updated_at);

    if json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("error: failed to serialize snapshot: {e}");
                return ExitCode::from(1);
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_info_cmd(data: &PathBuf) -> ExitCode {
    let candles = match load_candles(data) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match (candles.first(), candles.last()) {
        (Some(first), Some(last)) => {
            println!("{} bars, ts {} to {}", candles.len(), first.ts, last.ts);
        }
        _ => {
            println!("0 bars");
        }
    }
    ExitCode::SUCCESS
}
