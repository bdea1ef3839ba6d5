use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "faceswap-cli")]
#[command(about = "Command-line client for the FaceSwap proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is up
    Health,
    /// Swap the face from SOURCE into TARGET via the provider
    Swap {
        source: PathBuf,
        target: PathBuf,
        /// Where to write the resulting image
        #[arg(short, long, default_value = "faceswap-result.jpg")]
        output: PathBuf,
    },
    /// Run the simulated swap (no provider call)
    Simulate { source: PathBuf, target: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_json(res).await?;
        }
        Commands::Swap {
            source,
            target,
            output,
        } => {
            let res = client
                .post(format!("{}/api/swap", cli.url))
                .multipart(upload_form(&source, &target).await?)
                .send()
                .await?;

            let is_image = res
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.starts_with("image/"))
                .unwrap_or(false);

            if res.status().is_success() && is_image {
                let bytes = res.bytes().await?;
                tokio::fs::write(&output, &bytes).await?;
                println!("Wrote {} bytes to {}", bytes.len(), output.display());
            } else {
                print_json(res).await?;
            }
        }
        Commands::Simulate { source, target } => {
            let res = client
                .post(format!("{}/api/simulate-swap", cli.url))
                .multipart(upload_form(&source, &target).await?)
                .send()
                .await?;
            print_json(res).await?;
        }
    }

    Ok(())
}

async fn upload_form(source: &Path, target: &Path) -> Result<Form, Box<dyn std::error::Error>> {
    Ok(Form::new()
        .part("source", file_part(source).await?)
        .part("target", file_part(target).await?))
}

async fn file_part(path: &Path) -> Result<Part, Box<dyn std::error::Error>> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.jpg".to_string());
    let mime = match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase) {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "webp" => "image/webp",
        _ => "image/jpeg",
    };
    Ok(Part::bytes(bytes).file_name(name).mime_str(mime)?)
}

async fn print_json(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
    }

    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
