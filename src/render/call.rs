use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::error::{VelomapError, VelomapResult};

/// Write mode of an artifact-targeted call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// First write; truncates and opens the page description.
    Create,
    /// Every subsequent write; appends to the open page.
    Append,
}

/// Where a drawing call's output bytes go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallTarget {
    /// The shared page-description artifact.
    Artifact {
        /// Create or append.
        mode: WriteMode,
        /// Whether the page stays open for more content after this call.
        /// Exactly one call per run sets this to `false`.
        keep_open: bool,
    },
    /// A transient side file (generated color tables).
    Scratch(PathBuf),
}

/// Data fed to a drawing call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallInput {
    /// The call reads no table data.
    None,
    /// A file passed as a positional argument.
    File(PathBuf),
    /// Rows piped over stdin, already in the column order the operation
    /// consumes.
    Inline(String),
}

/// One invocation of the external renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawCall {
    /// Renderer operation name (GMT module, e.g. `psvelo`).
    pub op: String,
    /// Operation arguments, protocol flags excluded; the renderer derives
    /// `-K`/`-O` from the target.
    pub args: Vec<String>,
    /// Table data for the call.
    pub input: CallInput,
    /// Output destination.
    pub target: CallTarget,
}

impl DrawCall {
    /// Build a call with string-ish arguments.
    pub fn new<I, S>(op: &str, args: I, input: CallInput, target: CallTarget) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            op: op.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            input,
            target,
        }
    }
}

/// Abstract external renderer: one synchronous drawing call at a time.
///
/// The orchestrator depends only on this contract; production uses
/// [`GmtRenderer`], tests substitute recorders.
pub trait Renderer {
    /// Execute one call against the given artifact path. A non-zero
    /// completion status must surface as [`VelomapError::DrawCall`].
    fn draw(&mut self, call: &DrawCall, artifact: &Path) -> VelomapResult<()>;
}

/// Production renderer spawning the system `gmt` binary.
///
/// Artifact-targeted calls get their stdout redirected into the artifact
/// file, opened truncate-create for [`WriteMode::Create`] and append for
/// [`WriteMode::Append`]; scratch-targeted calls write their side file the
/// same way. `-K` keeps the PostScript open, `-O` marks an overlay.
#[derive(Clone, Debug)]
pub struct GmtRenderer {
    gmt_bin: PathBuf,
}

impl GmtRenderer {
    /// Renderer using `gmt` from `PATH`.
    pub fn new() -> Self {
        Self {
            gmt_bin: PathBuf::from("gmt"),
        }
    }

    /// Renderer using an explicit gmt binary path.
    pub fn with_binary(gmt_bin: impl Into<PathBuf>) -> Self {
        Self {
            gmt_bin: gmt_bin.into(),
        }
    }
}

impl Default for GmtRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for GmtRenderer {
    fn draw(&mut self, call: &DrawCall, artifact: &Path) -> VelomapResult<()> {
        let (stdout_path, mode_args): (&Path, Vec<&str>) = match &call.target {
            CallTarget::Artifact { mode, keep_open } => {
                let mut flags = Vec::new();
                if *keep_open {
                    flags.push("-K");
                }
                if *mode == WriteMode::Append {
                    flags.push("-O");
                }
                (artifact, flags)
            }
            CallTarget::Scratch(path) => (path.as_path(), Vec::new()),
        };

        let append = matches!(
            &call.target,
            CallTarget::Artifact {
                mode: WriteMode::Append,
                ..
            }
        );
        let stdout_file = if append {
            std::fs::OpenOptions::new().append(true).open(stdout_path)
        } else {
            std::fs::File::create(stdout_path)
        }
        .map_err(|e| {
            VelomapError::draw_call(
                &call.op,
                1,
                format!("cannot open '{}' for writing: {e}", stdout_path.display()),
            )
        })?;

        let mut cmd = Command::new(&self.gmt_bin);
        cmd.arg(&call.op);
        cmd.args(&call.args);
        cmd.args(&mode_args);
        if let CallInput::File(path) = &call.input {
            cmd.arg(path);
        }
        cmd.stdout(Stdio::from(stdout_file));
        cmd.stderr(Stdio::piped());
        cmd.stdin(match call.input {
            CallInput::Inline(_) => Stdio::piped(),
            _ => Stdio::null(),
        });

        tracing::debug!(op = %call.op, args = ?call.args, "issuing draw call");

        let mut child = cmd.spawn().map_err(|e| {
            VelomapError::draw_call(
                &call.op,
                1,
                format!("failed to spawn '{}': {e}", self.gmt_bin.display()),
            )
        })?;

        let stderr_drain = child.stderr.take().map(|mut stderr| {
            std::thread::spawn(move || {
                let mut bytes = Vec::new();
                let _ = stderr.read_to_end(&mut bytes);
                bytes
            })
        });

        if let CallInput::Inline(rows) = &call.input {
            let mut stdin = child.stdin.take().ok_or_else(|| {
                VelomapError::draw_call(&call.op, 1, "failed to open renderer stdin")
            })?;
            stdin
                .write_all(rows.as_bytes())
                .map_err(|e| VelomapError::draw_call(&call.op, 1, format!("stdin write: {e}")))?;
            // Drop closes the pipe so the child sees end-of-input.
        }

        let status = child.wait().map_err(|e| {
            VelomapError::draw_call(&call.op, 1, format!("failed to wait for renderer: {e}"))
        })?;
        let stderr_bytes = stderr_drain
            .and_then(|h| h.join().ok())
            .unwrap_or_default();

        if !status.success() {
            let code = status.code().unwrap_or(1);
            let detail = String::from_utf8_lossy(&stderr_bytes);
            return Err(VelomapError::draw_call(
                &call.op,
                code,
                detail.trim().to_string(),
            ));
        }
        Ok(())
    }
}
