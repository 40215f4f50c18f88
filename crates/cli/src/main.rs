use clap::{Parser, Subcommand};
use heart_core::{
    client_config_from_env_value, parse_assignment, ClinicalRecord, Field, FormController,
    HttpPredictionClient, SubmitOutcome, PREDICT_URL_ENV,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "heart")]
#[command(about = "Heart disease prediction client")]
struct Cli {
    /// Prediction endpoint (defaults to HEART_PREDICT_URL, then the hosted predictor)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the request body for the default record
    Defaults,
    /// List the label/code tables for categorical fields
    Options,
    /// Submit a record and print the prediction
    Predict {
        /// Field assignment such as age=63 or thal="Fixed defect" (repeatable)
        #[arg(long = "set", value_parser = parse_set)]
        set: Vec<(Field, String)>,
    },
    /// Ask the service to explain its prediction for a record
    Explain {
        /// Field assignment such as age=63 or thal="Fixed defect" (repeatable)
        #[arg(long = "set", value_parser = parse_set)]
        set: Vec<(Field, String)>,
    },
}

fn parse_set(input: &str) -> Result<(Field, String), String> {
    parse_assignment(input).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("heart_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Defaults) => {
            let body = ClinicalRecord::default().to_request()?;
            println!("{}", body.to_json());
        }
        Some(Commands::Options) => {
            for field in Field::ALL {
                let Some(options) = field.options() else {
                    continue;
                };
                println!("{} ({}):", field, field.caption());
                for option in options {
                    println!("  {:>2}  {}", option.code, option.label);
                }
            }
        }
        Some(Commands::Predict { set }) => {
            let controller = build_controller(cli.url, &set)?;
            match controller.submit().await {
                SubmitOutcome::Succeeded(prediction) => {
                    println!("Prediction: {}", prediction.label());
                    println!("Risk level: {}", prediction.risk_level());
                }
                SubmitOutcome::Failed(message) => {
                    anyhow::bail!("{}", message);
                }
                SubmitOutcome::AlreadyInFlight => {
                    anyhow::bail!("a prediction request is already in flight");
                }
            }
        }
        Some(Commands::Explain { set }) => {
            let controller = build_controller(cli.url, &set)?;
            let report = controller
                .explain()
                .await
                .map_err(|e| anyhow::anyhow!(e.display_message()))?;

            println!("Input: {}", serde_json::to_string(&report.input)?);
            match report.prediction() {
                Some(prediction) => println!("Prediction: {}", prediction.label()),
                None => println!("Prediction: unavailable"),
            }
            match report.positive_probability() {
                Some(p) => println!("Probability of heart disease: {:.1}%", p * 100.0),
                None => println!("Probability of heart disease: not supplied by model"),
            }
            if let Some(classes) = &report.classes {
                println!("Classes: {}", serde_json::to_string(classes)?);
            }
        }
        None => {
            println!("Use 'heart --help' for commands");
        }
    }

    Ok(())
}

/// Resolve the endpoint and apply `--set` assignments to a fresh record.
fn build_controller(
    url: Option<String>,
    assignments: &[(Field, String)],
) -> anyhow::Result<FormController<HttpPredictionClient>> {
    let url = url.or_else(|| std::env::var(PREDICT_URL_ENV).ok());
    let config = client_config_from_env_value(url)?;
    let client = HttpPredictionClient::new(config);
    tracing::debug!("predict url: {}", client.config().predict_url());

    let controller = FormController::new(client);
    for (field, value) in assignments {
        controller.update_field(*field, value);
    }
    Ok(controller)
}
