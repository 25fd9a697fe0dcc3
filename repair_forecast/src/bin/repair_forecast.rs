use repair_forecast::{
    DataLoader, ForecastError, PipelineConfig, RepairForecastPipeline, SubmissionWriter,
};
use std::env;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "usage: repair_forecast <RepairTrain.csv> <TargetMapping.csv> <submission.csv> [config.json]";

fn run(args: &[String]) -> Result<(), ForecastError> {
    let [repairs_path, targets_path, output_path, rest @ ..] = args else {
        return Err(ForecastError::InvalidParameter(USAGE.to_string()));
    };

    let config = match rest {
        [] => PipelineConfig::default(),
        [config_path] => PipelineConfig::from_json_file(config_path)?,
        _ => return Err(ForecastError::InvalidParameter(USAGE.to_string())),
    };

    info!(path = %repairs_path, "loading repair history");
    let observations = DataLoader::repairs_from_csv(repairs_path)?;
    info!(path = %targets_path, "loading target mapping");
    let targets = DataLoader::targets_from_csv(targets_path)?;

    let pipeline = RepairForecastPipeline::new(config)?;
    let output = pipeline.run(&observations, &targets)?;

    if let Some(score) = output.local_score {
        info!(local_score = score, "local validation mean absolute error");
    }

    let rows = output.submission()?;
    SubmissionWriter::to_csv(output_path, &rows)?;
    info!(path = %output_path, rows = rows.len(), "wrote submission");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
