use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use exemplar_core::{
    Dashboard, DashboardFrame, Dataset, ExemplarConfig, ModelParams, FREQUENCY_DELTA_TABLE,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "exemplar", author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "exemplar.toml")]
    config: PathBuf,

    /// Exemplar table (`category,value` rows); overrides the config
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recompute all views once and print the result
    Evaluate(EvaluateArgs),
    /// Print the type frequency → δ table
    Table,
    /// Serve dashboard frames over HTTP and WebSocket
    #[cfg(feature = "gateway")]
    Serve {
        /// Bind host (defaults to the config value)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (defaults to the config value)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(ClapArgs, Debug)]
struct EvaluateArgs {
    /// Token position
    #[arg(short, long, allow_negative_numbers = true)]
    token: Option<f64>,

    /// Activation window width (α)
    #[arg(long, allow_negative_numbers = true)]
    alpha: Option<f64>,

    /// Discriminability threshold (δ)
    #[arg(long, allow_negative_numbers = true)]
    delta: Option<f64>,

    /// Typicality threshold (τ)
    #[arg(long, allow_negative_numbers = true)]
    tau: Option<f64>,

    /// Type frequency (1-12); overrides δ
    #[arg(short, long)]
    frequency: Option<u32>,

    /// Print the full frame as JSON
    #[arg(long)]
    json: bool,
}

impl EvaluateArgs {
    fn apply(&self, mut params: ModelParams) -> ModelParams {
        if let Some(t) = self.token {
            params.token_position = Some(t);
        }
        if let Some(a) = self.alpha {
            params.alpha = a;
        }
        if let Some(d) = self.delta {
            params.delta = d;
        }
        if let Some(t) = self.tau {
            params.tau = t;
        }
        if let Some(f) = self.frequency {
            params.frequency = Some(f);
        }
        params
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_dataset(config: &ExemplarConfig) -> anyhow::Result<Dataset> {
    let path = &config.dataset.path;
    Dataset::from_path(path)
        .with_context(|| format!("Failed to load dataset from {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let mut config = ExemplarConfig::load_or_default(&args.config);
    if let Some(path) = args.dataset {
        config.dataset.path = path;
    }

    match args.command {
        Command::Table => print_table(),
        Command::Evaluate(eval) => {
            let dataset = load_dataset(&config)?;
            let dashboard = Dashboard::new(dataset, config.plot.clone());
            let params = eval.apply(config.model.params());
            let frame = dashboard
                .render(&params)
                .context("Failed to evaluate model")?;
            if eval.json {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            } else {
                print_frame(&frame);
            }
        }
        #[cfg(feature = "gateway")]
        Command::Serve { host, port } => {
            if let Some(h) = host {
                config.gateway.host = h;
            }
            if let Some(p) = port {
                config.gateway.port = p;
            }
            let dataset = load_dataset(&config)?;
            info!(
                "Serving {} exemplars on {}:{}",
                dataset.len(),
                config.gateway.host,
                config.gateway.port
            );
            let handle = exemplar_gateway::GatewayServer::new(dataset, &config)
                .start()
                .await
                .with_context(|| {
                    format!(
                        "Failed to bind gateway on {}:{}",
                        config.gateway.host, config.gateway.port
                    )
                })?;
            tokio::select! {
                res = handle => res?,
                _ = tokio::signal::ctrl_c() => info!("Shutting down"),
            }
        }
    }

    Ok(())
}

fn print_table() {
    println!("{:>9}  {:>6}", "frequency", "delta");
    for (freq, delta) in (1..).zip(FREQUENCY_DELTA_TABLE.iter()) {
        println!("{:>9}  {:>6.4}", freq, delta);
    }
}

fn print_frame(frame: &DashboardFrame) {
    println!(
        "token {:.3}  alpha {:.3}  delta {:.3}  tau {:.3}",
        frame.activation.token,
        frame.params.alpha,
        frame.discriminability.threshold,
        frame.params.tau
    );
    println!();
    println!("{:<12} {:>12} {:>7} {:>10}", "category", "sum", "count", "avg");
    for bar in &frame.bars.bars {
        println!(
            "{:<12} {:>12.4} {:>7} {:>10.4}",
            bar.category.as_str(),
            bar.stats.sum,
            bar.stats.count,
            bar.stats.avg
        );
    }
    println!();
    let eval = frame.bars.evaluation;
    println!("activation ratio        {:.4}", eval.ratio);
    println!("average activation      {:.4}", eval.avg_activation);
    println!(
        "P(discriminability)     {:.4}",
        frame.discriminability.probability()
    );
    println!("P(typicality)           {:.4}", frame.typicality.probability());
}
