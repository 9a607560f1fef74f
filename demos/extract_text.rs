//! Text extraction example
//!
//! This example demonstrates the full task lifecycle:
//! - Loading credentials from the service's credential file
//! - Subscribing to events
//! - Submitting a document for text extraction
//! - Polling until the task completes and downloading the result
//!
//! ```bash
//! cargo run --example extract_text -- credentials.json input_files/AboutFoxit.pdf output_files/extract/AboutFoxit.txt
//! ```

use doctask::{Config, Credentials, DocTaskClient, Event, TaskRequest, run_with_shutdown};

#[tokio::main]
async fn main() {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let credentials_path = args.next().unwrap_or_else(|| "credentials.json".to_string());
    let input = args
        .next()
        .unwrap_or_else(|| "input_files/AboutFoxit.pdf".to_string());
    let output = args
        .next()
        .unwrap_or_else(|| "output_files/extract/AboutFoxit.txt".to_string());

    if let Err(e) = run(&credentials_path, &input, &output).await {
        eprintln!("✗ {} ({})", e, e.error_code());
        std::process::exit(e.exit_code());
    }
}

async fn run(credentials_path: &str, input: &str, output: &str) -> doctask::Result<()> {
    let credentials = Credentials::from_json_file(credentials_path).await?;
    let client = DocTaskClient::new(Config::default(), credentials)?;

    // Subscribe to events
    let mut events = client.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::TaskSubmitted { endpoint, task_id } => {
                    println!("✓ Submitted to {}: task {}", endpoint, task_id);
                }
                Event::TaskProgress { percentage, .. } => {
                    println!("Task process is: {}", percentage);
                }
                Event::TaskRunning { retry_in_ms, .. } => {
                    println!("Task is running, retry in {} milliseconds", retry_in_ms);
                }
                Event::TaskComplete { doc_id, .. } => {
                    println!("✓ Task completed, document {}", doc_id);
                }
                Event::Downloaded { path, bytes, .. } => {
                    println!("⬇ Saved {} bytes to {}", bytes, path.display());
                }
                _ => {}
            }
        }
    });

    let request = TaskRequest::extract(input, "extractText");
    let outcome = run_with_shutdown(&client, &request, output).await?;
    println!("✓ Done: {}", outcome.output_path.display());

    Ok(())
}
