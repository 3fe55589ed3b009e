//! Shared test utilities for integration tests.
//!
//! Provides `TestEnv` - an isolated picture directory with a fake image
//! generator, cleaned up automatically via `TempDir`.
//!
//! The fake generator is `/bin/sh -c <script>`, so no executable files have
//! to be written. The generator arguments (`--models-path`, `--prompt`,
//! `--steps`, `--output`) arrive as the script's positional parameters.

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use genframe::image_store::ImageStore;
use genframe::services::GeneratorSettings;

/// Writes `NEW_IMAGE` to the path after `--output`.
pub const WRITE_OUTPUT: &str = r#"
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--output" ]; then out="$2"; fi
  shift
done
printf 'NEW_IMAGE' > "$out"
"#;

/// Writes `NEW_IMAGE`, then exits while a background child still holds
/// stderr open.
pub const WRITE_OUTPUT_LEAVE_HELPER: &str = r#"
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--output" ]; then out="$2"; fi
  shift
done
printf 'NEW_IMAGE' > "$out"
sleep 5 &
exit 0
"#;

/// Writes a partial file, then fails with exit code 3.
pub const EXIT_3: &str = r#"
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--output" ]; then out="$2"; fi
  shift
done
printf 'PARTIAL' > "$out"
echo "model not found" >&2
exit 3
"#;

/// Exits cleanly without producing anything.
pub const NO_OUTPUT: &str = "exit 0";

/// Never finishes on its own.
pub const HANG: &str = "exec sleep 30";

/// Content of the picture present before a test starts.
pub const OLD_IMAGE: &[u8] = b"OLD_IMAGE";

/// An isolated frame environment.
pub struct TestEnv {
    temp_dir: TempDir,
    pub pictures_dir: PathBuf,
    pub image_path: PathBuf,
}

impl TestEnv {
    /// Empty environment: the picture directory exists, the picture does not.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let pictures_dir = temp_dir.path().join("ai-pictures");
        fs::create_dir_all(&pictures_dir)?;
        let image_path = pictures_dir.join("current_image.png");
        Ok(Self {
            temp_dir,
            pictures_dir,
            image_path,
        })
    }

    /// Environment that already holds a picture.
    pub fn with_image() -> Result<Self> {
        let env = Self::new()?;
        fs::write(&env.image_path, OLD_IMAGE)?;
        Ok(env)
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn store(&self) -> ImageStore {
        ImageStore::new(&self.image_path)
    }

    pub fn image_bytes(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.image_path)?)
    }

    /// Generator settings running `script` with the default timeout.
    pub fn generator(&self, script: &str) -> GeneratorSettings {
        self.generator_with_timeout(script, Duration::from_secs(30))
    }

    pub fn generator_with_timeout(&self, script: &str, timeout: Duration) -> GeneratorSettings {
        GeneratorSettings {
            program: PathBuf::from("/bin/sh"),
            models_path: self.root().join("models"),
            steps: 1,
            extra_args: vec![
                "-c".to_string(),
                script.to_string(),
                "fake-generator".to_string(),
            ],
            timeout,
        }
    }

    /// Entries in the picture directory other than the picture itself.
    pub fn leftovers(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.pictures_dir)? {
            let path = entry?.path();
            if path != self.image_path {
                found.push(path);
            }
        }
        Ok(found)
    }
}
