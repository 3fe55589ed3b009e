//! Integration tests for running the external generator.
//!
//! Covers publishing on success and every failure kind, using a shell script
//! in place of the real generator.

mod common;

use anyhow::Result;
use common::{
    TestEnv, EXIT_3, HANG, NO_OUTPUT, OLD_IMAGE, WRITE_OUTPUT, WRITE_OUTPUT_LEAVE_HELPER,
};
use genframe::services::{
    GenerationFailure, GenerationJob, GenerationOutcome, GenerationRequest, GenerationService,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn request(prompt: &str) -> GenerationRequest {
    GenerationRequest::new(prompt).unwrap()
}

// ============================================================================
// SUCCESS
// ============================================================================

#[tokio::test]
async fn success_publishes_over_existing_image() -> Result<()> {
    // Given: a frame that already shows a picture
    let env = TestEnv::with_image()?;

    // When: the generator writes its output and exits cleanly
    let job = GenerationJob::new(request("a red fox"), env.generator(WRITE_OUTPUT), env.store());
    let outcome = job.run().await;

    // Then: the new image replaced the old one and nothing is left behind
    assert_eq!(
        outcome,
        GenerationOutcome::Success {
            image_path: env.image_path.clone()
        }
    );
    assert_eq!(env.image_bytes()?, b"NEW_IMAGE");
    assert!(env.leftovers()?.is_empty(), "{:?}", env.leftovers()?);
    Ok(())
}

#[tokio::test]
async fn success_creates_first_image() -> Result<()> {
    let env = TestEnv::new()?;
    assert!(!env.store().has_image());

    let job = GenerationJob::new(request("lighthouse"), env.generator(WRITE_OUTPUT), env.store());
    assert!(job.run().await.is_success());
    assert!(env.store().has_image());
    Ok(())
}

#[tokio::test]
async fn success_creates_missing_picture_directory() -> Result<()> {
    let env = TestEnv::new()?;
    let store = genframe::ImageStore::new(env.root().join("nested").join("current_image.png"));

    let job = GenerationJob::new(request("a boat"), env.generator(WRITE_OUTPUT), store.clone());
    assert!(job.run().await.is_success());
    assert!(store.has_image());
    Ok(())
}

#[tokio::test]
async fn success_while_helper_keeps_stderr_open() -> Result<()> {
    // Given: a generator that exits cleanly but leaves a child running
    let env = TestEnv::with_image()?;
    let settings = env.generator_with_timeout(WRITE_OUTPUT_LEAVE_HELPER, Duration::from_secs(2));

    // When: it runs with a limit shorter than the helper's lifetime
    let started = Instant::now();
    let job = GenerationJob::new(request("a red fox"), settings, env.store());
    let outcome = job.run().await;

    // Then: the exit counts, not the open pipe
    assert_eq!(
        outcome,
        GenerationOutcome::Success {
            image_path: env.image_path.clone()
        }
    );
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(env.image_bytes()?, b"NEW_IMAGE");
    Ok(())
}

// ============================================================================
// FAILURES
// ============================================================================

#[tokio::test]
async fn non_zero_exit_reports_exit_code() -> Result<()> {
    let env = TestEnv::with_image()?;

    let job = GenerationJob::new(request("a red fox"), env.generator(EXIT_3), env.store());
    let outcome = job.run().await;

    assert_eq!(
        outcome,
        GenerationOutcome::Failure(GenerationFailure::ProcessError(3))
    );
    // Partial output is discarded and the old picture stays
    assert_eq!(env.image_bytes()?, OLD_IMAGE);
    assert!(env.leftovers()?.is_empty());
    Ok(())
}

#[tokio::test]
async fn clean_exit_without_output_is_output_missing() -> Result<()> {
    let env = TestEnv::new()?;

    let job = GenerationJob::new(request("a red fox"), env.generator(NO_OUTPUT), env.store());

    assert_eq!(
        job.run().await,
        GenerationOutcome::Failure(GenerationFailure::OutputMissing)
    );
    assert!(!env.store().has_image());
    Ok(())
}

#[tokio::test]
async fn timeout_kills_generator_and_keeps_old_image() -> Result<()> {
    let env = TestEnv::with_image()?;
    let settings = env.generator_with_timeout(HANG, Duration::from_millis(300));

    let started = Instant::now();
    let job = GenerationJob::new(request("a red fox"), settings, env.store());
    let outcome = job.run().await;

    assert_eq!(outcome, GenerationOutcome::Failure(GenerationFailure::Timeout));
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(env.image_bytes()?, OLD_IMAGE);
    assert!(env.leftovers()?.is_empty());
    Ok(())
}

#[tokio::test]
async fn missing_program_is_other_failure() -> Result<()> {
    let env = TestEnv::new()?;
    let mut settings = env.generator(WRITE_OUTPUT);
    settings.program = PathBuf::from("/nonexistent/sd");

    let job = GenerationJob::new(request("a red fox"), settings, env.store());
    match job.run().await {
        GenerationOutcome::Failure(GenerationFailure::Other(message)) => {
            assert!(message.contains("Failed to start generator"), "{message}");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    Ok(())
}

// ============================================================================
// SERVICE HANDLE
// ============================================================================

#[test]
fn service_delivers_outcome_through_handle() -> Result<()> {
    let env = TestEnv::new()?;
    let runtime = tokio::runtime::Runtime::new()?;

    let mut handle = GenerationService::start(
        runtime.handle(),
        request("a red fox"),
        env.generator(WRITE_OUTPUT),
        env.store(),
    );

    // Poll the way the UI loop does
    let deadline = Instant::now() + Duration::from_secs(20);
    let outcome = loop {
        if let Some(outcome) = handle.try_recv() {
            break outcome;
        }
        assert!(Instant::now() < deadline, "generation did not finish");
        std::thread::sleep(Duration::from_millis(20));
    };

    assert!(outcome.is_success());
    assert!(env.store().has_image());
    Ok(())
}

#[tokio::test]
async fn service_handle_can_be_awaited() -> Result<()> {
    let env = TestEnv::new()?;

    let handle = GenerationService::start(
        &tokio::runtime::Handle::current(),
        request("a red fox"),
        env.generator(EXIT_3),
        env.store(),
    );

    assert_eq!(
        handle.wait().await,
        GenerationOutcome::Failure(GenerationFailure::ProcessError(3))
    );
    Ok(())
}
