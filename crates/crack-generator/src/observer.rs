//! Stage-completion hooks.

use std::path::{Path, PathBuf};

use grid_format::{checkpoint_path, write_grid, SaveError};
use tracing::info;

use crate::config::CheckpointConfig;
use crate::context::BuildContext;
use crate::error::BuildError;

/// Notified after every pipeline stage.
pub trait StageObserver {
    fn on_stage_complete(
        &mut self,
        step: usize,
        label: &str,
        ctx: &BuildContext,
    ) -> Result<(), BuildError>;

    /// Called once with the final grid, also when validation failed.
    fn on_finished(&mut self, _ctx: &BuildContext) -> Result<(), BuildError> {
        Ok(())
    }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCheckpoints;

impl StageObserver for NoCheckpoints {
    fn on_stage_complete(&mut self, _: usize, _: &str, _: &BuildContext) -> Result<(), BuildError> {
        Ok(())
    }
}

/// Writes `{stem}_step_{n}.json` after every stage and `{stem}.json` at the end.
#[derive(Debug, Clone)]
pub struct FileCheckpoints {
    directory: PathBuf,
    stem: String,
    written: Vec<PathBuf>,
}

impl FileCheckpoints {
    pub fn new(directory: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            stem: stem.into(),
            written: Vec::new(),
        }
    }

    /// `fallback_stem` names the files when the config leaves the stem unset.
    pub fn from_config(config: &CheckpointConfig, fallback_stem: &str) -> Self {
        Self::new(config.directory.clone(), config.stem_or(fallback_stem))
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn final_path(&self) -> PathBuf {
        self.directory.join(format!("{}.json", self.stem))
    }

    fn write(&mut self, path: &Path, ctx: &BuildContext) -> Result<(), BuildError> {
        std::fs::create_dir_all(&self.directory).map_err(|source| SaveError::Io {
            path: self.directory.clone(),
            source,
        })?;
        write_grid(path, &ctx.grid, &ctx.subsets, &ctx.metadata)?;
        self.written.push(path.to_path_buf());
        Ok(())
    }
}

impl StageObserver for FileCheckpoints {
    fn on_stage_complete(
        &mut self,
        step: usize,
        label: &str,
        ctx: &BuildContext,
    ) -> Result<(), BuildError> {
        let path = checkpoint_path(&self.directory, &self.stem, step);
        self.write(&path, ctx)?;
        info!(step, label, path = %path.display(), "checkpoint written");
        Ok(())
    }

    fn on_finished(&mut self, ctx: &BuildContext) -> Result<(), BuildError> {
        let path = self.final_path();
        self.write(&path, ctx)?;
        info!(path = %path.display(), "final grid written");
        Ok(())
    }
}
