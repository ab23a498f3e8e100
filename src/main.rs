use std::fs;
use std::process;

use clap::Parser;
use contraste::configuration::cli::{Cli, Command};
use contraste::configuration::config::Config;
use contraste::controller::controller_handler::Controller;
use contraste::error_handling::types::FlowError;
use contraste::flows::{AnalysisOutcome, ExtractionOutcome, LogProgress};
use contraste::storage::types::ImageItem;
use log::{error, info};

const PREVIEW_CHARS: usize = 60;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(cli.log_level())
        .format_target(false)
        .init();

    let config = Config::load(&cli).unwrap_or_else(|e| {
        error!("Unable to load configuration: {}", e);
        process::exit(1);
    });

    let controller = Controller::from_config(&config).unwrap_or_else(|e| {
        error!("Unable to create a controller instance: {}, exiting...", e);
        process::exit(1);
    });

    if let Err(e) = run(&controller, &cli.command).await {
        error!("{}", e);
        process::exit(1);
    }
}

async fn run(controller: &Controller, command: &Command) -> Result<(), FlowError> {
    match command {
        Command::Add { url } => {
            let item = controller.acquire(url).await?;
            println!("{}  {}", item.id, item.url);
        }
        Command::List => {
            let images = controller.images().await;
            if images.is_empty() {
                println!("No images stored");
            }
            for item in &images {
                println!("{}", describe(item));
            }
        }
        Command::Extract => {
            let outcome = controller.extract_texts(&LogProgress).await?;
            if outcome == ExtractionOutcome::NothingToDo {
                println!("No new images to process");
            }
        }
        Command::Analyze => print_analysis(controller.analyze().await?),
        Command::Contrast => {
            let report = controller.contrast(&LogProgress).await?;
            if let ExtractionOutcome::Processed(summary) = report.extraction {
                info!(
                    "Extracted text from {} of {} image(s)",
                    summary.succeeded, summary.processed
                );
            }
            print_analysis(report.analysis?);
        }
        Command::Remove { id } => {
            let item = controller.remove(id).await?;
            println!("Removed {}", item.id);
        }
        Command::Clear => {
            let count = controller.clear().await?;
            println!("Removed {} image(s)", count);
        }
        Command::ResetErrors => {
            let count = controller.reset_errors().await?;
            println!("{} image(s) will be retried", count);
        }
        Command::Export { output } => {
            let archive = controller.export_texts().await;
            match output {
                Some(path) => {
                    fs::write(path, archive).unwrap_or_else(|e| {
                        error!("Unable to write {}: {}", path.display(), e);
                        process::exit(1);
                    });
                    info!("Texts written to {}", path.display());
                }
                None => print!("{}", archive),
            }
        }
    }
    Ok(())
}

fn print_analysis(outcome: AnalysisOutcome) {
    match outcome {
        AnalysisOutcome::Completed {
            analysis,
            text_count,
        } => {
            info!("Analysis of {} text(s) received", text_count);
            println!("{}", analysis);
        }
        AnalysisOutcome::Failed { message } => {
            eprintln!("Error: {}", message);
            process::exit(1);
        }
    }
}

fn describe(item: &ImageItem) -> String {
    let detail = match (&item.extracted_text, &item.error) {
        (_, Some(error)) => format!("error: {}", error),
        (Some(text), None) => preview(text),
        (None, None) => String::new(),
    };
    format!(
        "{}  {:<10}  {}  {}",
        item.id,
        item.status().to_string(),
        item.url,
        detail
    )
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > PREVIEW_CHARS {
        format!("{}...", flat.chars().take(PREVIEW_CHARS).collect::<String>())
    } else {
        flat
    }
}
