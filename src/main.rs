use opencti_connector::api::opencti::ApiOpenCTI;
use opencti_connector::api::OperationRequest;
use opencti_connector::config::settings::{LogFormat, Logger, Settings};
use opencti_connector::engine::run_batch;
use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use std::error::Error;
use std::io::Read;
use std::process::ExitCode;
use std::str::FromStr;
use std::{env, fs, io};
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Registry, layer::SubscriberExt};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const BASE_DIRECTORY_LOG: &str = "logs";
const BASE_DIRECTORY_SIZE: usize = 5;
const PREFIX_LOG_NAME: &str = "opencti-connector.log";

// Stdout carries the results, so the console layer writes to stderr.
fn init_logger(logger_config: &Logger) -> Result<Option<WorkerGuard>, Box<dyn Error>> {
    let log_level = Level::from_str(logger_config.level.as_str())?;
    let console_layer = logger_config.console.then(|| {
        Layer::new()
            .with_writer(io::stderr.with_max_level(log_level))
            .pretty()
    });
    let (file_writer, guard) = if logger_config.directory {
        let current_exe_path = env::current_exe()?;
        let parent_path = current_exe_path
            .parent()
            .ok_or("executable has no parent directory")?;
        let log_path = parent_path.join(BASE_DIRECTORY_LOG);
        fs::create_dir_all(&log_path)?;
        let condition = RollingConditionBasic::new().daily();
        let file_appender = BasicRollingFileAppender::new(
            log_path.join(PREFIX_LOG_NAME),
            condition,
            BASE_DIRECTORY_SIZE,
        )?;
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        (Some(file_writer), Some(guard))
    } else {
        (None, None)
    };
    let json_file_layer = file_writer
        .clone()
        .filter(|_| logger_config.format == LogFormat::Json)
        .map(|writer| Layer::new().with_writer(writer.with_max_level(log_level)).json());
    let text_file_layer = file_writer
        .filter(|_| logger_config.format == LogFormat::Text)
        .map(|writer| {
            Layer::new()
                .with_writer(writer.with_max_level(log_level))
                .with_ansi(false)
        });
    Registry::default()
        .with(console_layer)
        .with(json_file_layer)
        .with(text_file_layer)
        .try_init()?;
    Ok(guard)
}

fn read_requests() -> Result<Vec<OperationRequest>, Box<dyn Error>> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(serde_json::from_str(&input)?)
}

async fn run(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let api = ApiOpenCTI::new(&settings.opencti.credentials())?;
    api.check_version().await;
    let requests = read_requests()?;
    info!(count = requests.len(), "Executing operations");
    let results = run_batch(&api, &requests, settings.opencti.continue_on_fail).await?;
    println!("{}", serde_json::to_string(&results)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    // Keep the guard alive so buffered file logs are flushed on exit.
    let _guard = match init_logger(&settings.manager.logger) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Fail to initialize logger: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let env = Settings::mode();
    info!(version = VERSION, env, name = settings.manager.name, "Starting OpenCTI connector");
    match run(&settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = e.to_string(), "OpenCTI connector failed");
            ExitCode::FAILURE
        }
    }
}
