use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use edit_client::data_url::{encode_file, is_image_mime, is_media_reference, is_video_mime};
use edit_client::{CancellationToken, EditClient, JobPoller, PollPolicy};

use crate::view::{Shell, View};

/// Edit images and videos through the edit proxy.
#[derive(Debug, Parser)]
#[command(name = "edit-cli", about = "Prompt-driven image and video edits", long_about = None)]
pub struct Cli {
    /// Base URL of the edit proxy.
    #[arg(long, env = "EDIT_PROXY_URL", default_value = "http://localhost:3000")]
    pub proxy_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Edit one image and print the edited image URL.
    Image {
        #[arg(long, short)]
        prompt: String,

        /// Image URL, data URL, or local file path.
        #[arg(long, short)]
        image: String,
    },

    /// Submit a video edit and wait for the result.
    Video {
        #[arg(long, short)]
        prompt: String,

        /// Video URL, data URL, or local file path.
        #[arg(long, short)]
        video: String,

        #[arg(long, default_value_t = 2000)]
        interval_ms: u64,

        #[arg(long, default_value_t = 60)]
        max_attempts: u32,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut shell = Shell::default();

        if let Err(e) = self.dispatch(&mut shell).await {
            shell.show(View::Error(e.to_string()));
            bail!("edit failed: {e:#}");
        }
        Ok(())
    }

    async fn dispatch(self, shell: &mut Shell) -> Result<()> {
        let client = EditClient::new(&self.proxy_url)?;

        match self.command {
            Command::Image { prompt, image } => edit_image(&client, shell, &prompt, &image).await,
            Command::Video {
                prompt,
                video,
                interval_ms,
                max_attempts,
            } => {
                let policy = PollPolicy {
                    interval: Duration::from_millis(interval_ms),
                    max_attempts,
                };
                edit_video(&client, shell, &prompt, &video, policy).await
            }
        }
    }
}

async fn edit_image(client: &EditClient, shell: &mut Shell, prompt: &str, image: &str) -> Result<()> {
    let image = media_reference(shell, image, is_image_mime, "Please upload an image file").await?;

    shell.show(View::Loading("editing image".to_string()));
    let result = client.submit_image_edit(prompt, &image).await?;
    shell.show(View::ImageReady { url: result.output_image_url });
    Ok(())
}

async fn edit_video(
    client: &EditClient,
    shell: &mut Shell,
    prompt: &str,
    video: &str,
    policy: PollPolicy,
) -> Result<()> {
    let video = media_reference(shell, video, is_video_mime, "Please upload a video file").await?;

    shell.show(View::Loading("submitting video edit".to_string()));
    let handle = client.submit_video_edit(prompt, &video).await?;
    tracing::info!(job_id = %handle, "video edit submitted");

    // Ctrl-C releases the pending wait instead of killing the process mid-request.
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    shell.show(View::Loading(format!("waiting for job {handle}")));
    let result = JobPoller::new(client.clone())
        .with_policy(policy)
        .run(&handle, &cancel)
        .await?;
    shell.show(View::VideoReady {
        url: result.url,
        duration: result.duration,
    });
    Ok(())
}

/// Passes URLs through and turns local files into data URLs.
async fn media_reference(
    shell: &mut Shell,
    input: &str,
    accepts: fn(&str) -> bool,
    wrong_kind: &'static str,
) -> Result<String> {
    if is_media_reference(input) {
        return Ok(input.to_string());
    }

    shell.show(View::Loading(format!("reading {input}")));
    let (url, mime) = encode_file(Path::new(input)).await?;
    if !accepts(mime) {
        bail!(wrong_kind);
    }
    Ok(url)
}
