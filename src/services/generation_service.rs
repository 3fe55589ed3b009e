//! Generation service for running the external image generator.
//!
//! A generation runs as a tokio task so the UI loop stays responsive. The
//! task reports back over a oneshot channel which the UI polls through
//! [`JobHandle::try_recv`], so the outcome is applied on the UI side exactly
//! once.
//!
//! The generator writes into a private scratch directory next to the current
//! image. Only when the process exits cleanly and the output exists is the
//! file renamed over the current image.

use crate::image_store::ImageStore;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::{ChildStderr, Command};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// File name the generator is asked to write inside the scratch directory.
const OUTPUT_FILE_NAME: &str = "generated.png";

/// Generator stderr kept for the log.
const STDERR_LIMIT: usize = 4096;

/// How long stderr may stay open after the generator exits.
const STDERR_GRACE: Duration = Duration::from_millis(200);

/// Returned when a prompt is empty after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Please enter a prompt!")]
pub struct EmptyPromptError;

/// A validated request for one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
}

impl GenerationRequest {
    /// Build a request from raw user input.
    ///
    /// The input is trimmed; whitespace-only input is rejected.
    pub fn new(input: &str) -> Result<Self, EmptyPromptError> {
        let prompt = input.trim();
        if prompt.is_empty() {
            return Err(EmptyPromptError);
        }
        Ok(Self {
            prompt: prompt.to_string(),
        })
    }

    /// The trimmed prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Why a generation did not produce a new image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    /// The generator ran past its wall-clock limit and was killed.
    #[error("Generation timed out")]
    Timeout,
    /// The generator exited with a non-zero status.
    #[error("Generation failed (exit code {0})")]
    ProcessError(i32),
    /// The generator exited cleanly but wrote no image.
    #[error("Generation failed: no image was produced")]
    OutputMissing,
    /// Anything else: spawn failure, signal termination, publish failure.
    #[error("{0}")]
    Other(String),
}

/// Result of one generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// A new image was published at `image_path`.
    Success { image_path: PathBuf },
    /// No new image; the current image (if any) is untouched.
    Failure(GenerationFailure),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success { .. })
    }
}

/// How to invoke the external generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Generator executable.
    pub program: PathBuf,
    /// Location of the model weights.
    pub models_path: PathBuf,
    /// Inference step count.
    pub steps: u32,
    /// Platform tuning flags, passed before the standard arguments.
    pub extra_args: Vec<String>,
    /// Hard wall-clock limit for one run.
    pub timeout: Duration,
}

impl GeneratorSettings {
    /// Arguments for one run, in invocation order.
    pub fn command_args(&self, prompt: &str, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.extra_args.iter().map(OsString::from).collect();
        args.push("--models-path".into());
        args.push(self.models_path.clone().into_os_string());
        args.push("--prompt".into());
        args.push(prompt.into());
        args.push("--steps".into());
        args.push(self.steps.to_string().into());
        args.push("--output".into());
        args.push(output.as_os_str().to_os_string());
        args
    }
}

/// One generation attempt.
///
/// Performs no retries. Dropping the future kills the generator process.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    request: GenerationRequest,
    settings: GeneratorSettings,
    store: ImageStore,
}

impl GenerationJob {
    pub fn new(request: GenerationRequest, settings: GeneratorSettings, store: ImageStore) -> Self {
        Self {
            request,
            settings,
            store,
        }
    }

    /// Run the generator to completion or timeout.
    pub async fn run(self) -> GenerationOutcome {
        info!("Generating image for prompt: {:?}", self.request.prompt());
        match self.execute().await {
            Ok(outcome) => {
                match &outcome {
                    GenerationOutcome::Success { image_path } => {
                        info!("Generation succeeded: {:?}", image_path);
                    }
                    GenerationOutcome::Failure(failure) => {
                        warn!("Generation failed: {}", failure);
                    }
                }
                outcome
            }
            Err(e) => {
                error!("Generation error: {:#}", e);
                GenerationOutcome::Failure(GenerationFailure::Other(format!("{e:#}")))
            }
        }
    }

    async fn execute(&self) -> Result<GenerationOutcome> {
        self.store.ensure_directory()?;

        // Scratch space next to the current image; removed (with any partial
        // output) when it goes out of scope.
        let scratch = tempfile::Builder::new()
            .prefix(".genframe-")
            .tempdir_in(self.store.directory())
            .with_context(|| {
                format!(
                    "Failed to create scratch directory in {:?}",
                    self.store.directory()
                )
            })?;
        let output = scratch.path().join(OUTPUT_FILE_NAME);

        let mut command = Command::new(&self.settings.program);
        command
            .args(self.settings.command_args(self.request.prompt(), &output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Starting generator {:?}", self.settings.program);
        let mut child = command
            .spawn()
            .with_context(|| format!("Failed to start generator {:?}", self.settings.program))?;

        // Helpers the generator leaves behind may keep stderr open after it
        // exits, so only the process itself is timed.
        let stderr_task = child.stderr.take().map(|stderr| tokio::spawn(drain_stderr(stderr)));

        let status = match tokio::time::timeout(self.settings.timeout, child.wait()).await {
            Ok(result) => result.context("Failed to wait for generator")?,
            Err(_) => {
                warn!(
                    "Generator exceeded {:?}, killing it and discarding output",
                    self.settings.timeout
                );
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill generator: {}", e);
                }
                if let Some(task) = stderr_task {
                    task.abort();
                }
                return Ok(GenerationOutcome::Failure(GenerationFailure::Timeout));
            }
        };

        if let Some(task) = stderr_task {
            log_stderr(task).await;
        }

        if !status.success() {
            return Ok(GenerationOutcome::Failure(match status.code() {
                Some(code) => GenerationFailure::ProcessError(code),
                None => GenerationFailure::Other("Generator was terminated by a signal".to_string()),
            }));
        }

        if !output.is_file() {
            return Ok(GenerationOutcome::Failure(GenerationFailure::OutputMissing));
        }

        self.store.publish(&output)?;
        Ok(GenerationOutcome::Success {
            image_path: self.store.path().to_path_buf(),
        })
    }
}

/// Read stderr to EOF, keeping at most `STDERR_LIMIT` bytes.
async fn drain_stderr(mut stderr: ChildStderr) -> Vec<u8> {
    let mut kept = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match stderr.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let room = STDERR_LIMIT.saturating_sub(kept.len());
                kept.extend_from_slice(&chunk[..n.min(room)]);
            }
        }
    }
    kept
}

/// Log whatever stderr arrived, giving the pipe a short grace period to close.
async fn log_stderr(mut task: JoinHandle<Vec<u8>>) {
    let captured = match tokio::time::timeout(STDERR_GRACE, &mut task).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            debug!("Generator stderr reader failed: {}", e);
            return;
        }
        Err(_) => {
            debug!("Generator stderr still open after exit, not waiting for it");
            task.abort();
            return;
        }
    };
    let stderr = String::from_utf8_lossy(&captured);
    if !stderr.trim().is_empty() {
        debug!("Generator stderr: {}", stderr.trim());
    }
}

/// Handle for polling a running generation.
pub struct JobHandle {
    receiver: oneshot::Receiver<GenerationOutcome>,
}

impl JobHandle {
    /// Try to receive the outcome without blocking.
    ///
    /// Returns `Some` once; the handle should be dropped afterwards.
    pub fn try_recv(&mut self) -> Option<GenerationOutcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(worker_lost()),
        }
    }

    /// Wait for the outcome.
    pub async fn wait(self) -> GenerationOutcome {
        self.receiver.await.unwrap_or_else(|_| worker_lost())
    }
}

fn worker_lost() -> GenerationOutcome {
    GenerationOutcome::Failure(GenerationFailure::Other(
        "Generation worker stopped unexpectedly".to_string(),
    ))
}

/// Service for dispatching generation jobs.
pub struct GenerationService;

impl GenerationService {
    /// Start a generation on the runtime.
    ///
    /// The caller is responsible for the single-flight guard; this only
    /// spawns the work and hands back the receiving end.
    pub fn start(
        runtime: &tokio::runtime::Handle,
        request: GenerationRequest,
        settings: GeneratorSettings,
        store: ImageStore,
    ) -> JobHandle {
        let (sender, receiver) = oneshot::channel();
        let job = GenerationJob::new(request, settings, store);

        runtime.spawn(async move {
            let outcome = job.run().await;
            if sender.send(outcome).is_err() {
                warn!("Generation finished but nobody is waiting for the outcome");
            }
        });

        JobHandle { receiver }
    }
}
