use ashare_score::{
    ask_ai::{self, Language, PromptVars},
    indicators::TechnicalSnapshot,
    scoring::TechnicalScorer,
    services::BarCsvService,
    utils::{init_logger, Timer},
};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ashare-score")]
#[command(about = "Offline A-share scoring and prompt tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a rendered chat prompt
    Ask {
        /// Template ID (first-select, env-sentiment, fund-select)
        #[arg(short = 'p', long)]
        template: String,
        /// Language for the prompt (zh/en)
        #[arg(short, long, default_value = "zh")]
        language: String,
        /// Number of codes to ask for
        #[arg(short, long)]
        num: Option<usize>,
        /// Stock code for per-company prompts
        #[arg(short, long)]
        symbol: Option<String>,
    },
    /// Compute the technical score for one or more CSV files of daily bars
    Score {
        /// CSV file(s) with date,open,high,low,close,volume columns
        #[arg(short, long, num_args = 1.., required = true)]
        csv: Vec<PathBuf>,
        /// Indicator period
        #[arg(short, long, default_value_t = 14)]
        period: usize,
        /// Print the full score breakdown as JSON
        #[arg(long)]
        json: bool,
    },
}

fn score_file(service: &BarCsvService, path: &Path, period: usize, json: bool) -> anyhow::Result<String> {
    let bars = service.load_bars(path)?;
    let snapshot = TechnicalSnapshot::from_bars(&bars, period)?;
    let score = TechnicalScorer::default().score(&snapshot);

    if json {
        return Ok(serde_json::to_string_pretty(&serde_json::json!({
            "file": path.display().to_string(),
            "snapshot": snapshot,
            "score": score,
        }))?);
    }

    Ok(format!(
        "{}: total={:.2} final={:.2} trend={:.3} volume={:.3} strong_buy={:.3}",
        path.display(),
        score.total,
        score.final_score,
        score.trend_factor,
        score.volume_confirm,
        score.strong_buy
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Ask {
            template,
            language,
            num,
            symbol,
        } => {
            let language: Language = language.parse().map_err(anyhow::Error::msg)?;
            let vars = PromptVars { num, symbol };
            let prompt = ask_ai::build_prompt(&template, &language, &vars)
                .ok_or_else(|| anyhow::anyhow!("Unknown template: {}", template))?;
            println!("{}", prompt);
        }
        Commands::Score { csv, period, json } => {
            let timer = Timer::start("score");
            let service = BarCsvService::new();

            let lines: Vec<anyhow::Result<String>> = csv
                .par_iter()
                .map(|path| score_file(&service, path, period, json))
                .collect();

            let mut failures = 0;
            for (path, line) in csv.iter().zip(lines) {
                match line {
                    Ok(line) => println!("{}", line),
                    Err(e) => {
                        failures += 1;
                        eprintln!("{}: {}", path.display(), e);
                    }
                }
            }

            timer.log_elapsed("SCORE");
            if failures == csv.len() {
                anyhow::bail!("No file could be scored");
            }
        }
    }

    Ok(())
}
