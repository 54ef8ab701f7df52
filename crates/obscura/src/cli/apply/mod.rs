//! The `obscura apply` command: composite effects over image regions.

mod setup;
pub mod types;

pub use setup::read_json_arg;
pub use types::{ImageFormat, OutputFormat, Policy};

use clap::Args;
use obscura_core::{OutputFormat as CoreOutputFormat, OutputWriter, PipelineError, RegionCompositor};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::timeout;

use setup::{setup_apply, ApplyContext};

/// Arguments for the `apply` command.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Source image
    #[arg(required = true)]
    pub input: PathBuf,

    /// Directives: inline JSON array, a JSON file, or '-' for stdin
    #[arg(short, long)]
    pub directives: String,

    /// Detected rectangles (inline JSON or file); enables selection mode
    #[arg(long)]
    pub detections: Option<String>,

    /// Output image (defaults to <input>.obscured.<format> next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Metadata file (defaults to stdout)
    #[arg(short, long)]
    pub metadata: Option<PathBuf>,

    /// Metadata format (defaults to output.metadata_format from config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output image format (defaults to the output extension, then config)
    #[arg(long, value_enum)]
    pub image_format: Option<ImageFormat>,

    /// Directory sticker ids are resolved against
    #[arg(long)]
    pub sticker_dir: Option<PathBuf>,

    /// Handling of regions that cross the image border
    #[arg(long, value_enum)]
    pub region_policy: Option<Policy>,
}

/// Manual Default impl for constructing ApplyArgs outside of clap.
impl Default for ApplyArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            directives: "[]".to_string(),
            detections: None,
            output: None,
            metadata: None,
            format: None,
            image_format: None,
            sticker_dir: None,
            region_policy: None,
        }
    }
}

/// Execute the apply command.
pub async fn execute(args: ApplyArgs) -> anyhow::Result<()> {
    let ApplyContext {
        config,
        request,
        encoder,
        output_path,
    } = setup_apply(&args)?;

    let bytes = tokio::fs::read(&args.input).await?;
    let timeout_ms = config.limits.process_timeout_ms;
    let blocking_config = config.clone();

    let run = run_blocking(timeout_ms, move || {
        let compositor = RegionCompositor::new(&blocking_config);
        let output = compositor.process_bytes(&bytes, &request)?;
        let encoded = encoder.encode(&output.image)?;
        Ok((output, encoded))
    })
    .await;

    let (output, encoded) = match run {
        Ok(result) => result,
        Err(e)
            if matches!(
                e.downcast_ref::<PipelineError>(),
                Some(PipelineError::Timeout { .. })
            ) =>
        {
            tracing::error!("{e}");
            // A blocking task cannot be cancelled and the runtime joins it on drop.
            std::process::exit(1);
        }
        Err(e) => return Err(e),
    };

    tokio::fs::write(&output_path, &encoded).await?;
    tracing::info!(
        "Applied {} of {} directive(s), image written to {:?}",
        output.metadata.applied.len(),
        output.metadata.input_region_count,
        output_path
    );
    if !output.skipped.is_empty() {
        tracing::warn!("{} directive(s) were skipped", output.skipped.len());
    }

    let format = args
        .format
        .map(CoreOutputFormat::from)
        .or_else(|| CoreOutputFormat::parse(&config.output.metadata_format))
        .unwrap_or_default();
    let pretty = config.output.pretty;

    match args.metadata {
        Some(ref path) => {
            let file = File::create(path)?;
            let mut writer = OutputWriter::new(BufWriter::new(file), format, pretty);
            writer.write_metadata(&output.metadata, &output.skipped)?;
            writer.flush()?;
            tracing::info!("Metadata written to {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = OutputWriter::new(stdout.lock(), format, pretty);
            writer.write_metadata(&output.metadata, &output.skipped)?;
            writer.flush()?;
        }
    }

    Ok(())
}

/// Run `job` on the blocking pool, giving up after `timeout_ms`.
///
/// On timeout the job keeps running in the background; only the wait ends.
async fn run_blocking<T, F>(timeout_ms: u64, job: F) -> anyhow::Result<T>
where
    F: FnOnce() -> Result<T, PipelineError> + Send + 'static,
    T: Send + 'static,
{
    match timeout(
        Duration::from_millis(timeout_ms),
        tokio::task::spawn_blocking(job),
    )
    .await
    {
        Ok(Ok(result)) => Ok(result?),
        Ok(Err(e)) => anyhow::bail!("Processing task failed: {e}"),
        Err(_) => Err(PipelineError::Timeout {
            stage: "apply".to_string(),
            timeout_ms,
        }
        .into()),
    }
}
