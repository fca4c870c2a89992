use std::path::{Path, PathBuf};

use crate::foundation::error::{VelomapError, VelomapResult};
use crate::render::call::WriteMode;

/// Lifecycle of the page-description artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactState {
    /// No write has happened yet; only a create-mode write is legal.
    Unopened,
    /// The page is open for more content; only append-mode writes are legal.
    Open,
    /// The page description is closed; no further write is legal.
    Closed,
}

/// Append-only page-description output, with the open/append/close protocol
/// made explicit.
///
/// The underlying format is unusable unless the first write creates the
/// page, every later write appends, and exactly the last write closes it.
/// [`Artifact::record_write`] type-checks each write against the current
/// state instead of trusting call order alone.
#[derive(Clone, Debug)]
pub struct Artifact {
    path: PathBuf,
    state: ArtifactState,
}

impl Artifact {
    /// A new, unopened artifact at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: ArtifactState::Unopened,
        }
    }

    /// On-disk location of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ArtifactState {
        self.state
    }

    /// True once the closing write has been recorded.
    pub fn is_closed(&self) -> bool {
        self.state == ArtifactState::Closed
    }

    /// Check a write against the current state and advance the lifecycle.
    ///
    /// `keep_open = false` performs the closing transition; it is legal
    /// exactly once, and only on an append-mode write to an open page.
    pub fn record_write(&mut self, mode: WriteMode, keep_open: bool) -> VelomapResult<()> {
        match (self.state, mode) {
            (ArtifactState::Unopened, WriteMode::Create) => {
                if !keep_open {
                    return Err(VelomapError::protocol(
                        "the create-mode write must leave the page open",
                    ));
                }
                self.state = ArtifactState::Open;
                Ok(())
            }
            (ArtifactState::Unopened, WriteMode::Append) => Err(VelomapError::protocol(
                "append-mode write before the page was created",
            )),
            (ArtifactState::Open, WriteMode::Create) => Err(VelomapError::protocol(
                "second create-mode write would truncate the open page",
            )),
            (ArtifactState::Open, WriteMode::Append) => {
                if !keep_open {
                    self.state = ArtifactState::Closed;
                }
                Ok(())
            }
            (ArtifactState::Closed, _) => Err(VelomapError::protocol(
                "write attempted after the page was closed",
            )),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/artifact.rs"]
mod tests;
