//! Optional bitmap export through an external SVG rasterizer
//!
//! The converter never links a rasterizer itself. When asked, it runs a
//! command-line tool (by default `rsvg-convert`) on the written SVG file.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("rasterizer '{0}' was not found")]
    ToolMissing(String),

    #[error("rasterizer '{program}' failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("failed to run rasterizer '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// External command used to turn an SVG file into a bitmap
///
/// The command is run as `<program> <args...> -o <output> <input>`.
#[derive(Debug, Clone)]
pub struct RasterConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            program: "rsvg-convert".to_string(),
            args: vec![],
        }
    }
}

impl RasterConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
        }
    }

    /// Add an argument placed before the output/input paths
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn command(&self, svg: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg("-o").arg(output).arg(svg);
        cmd
    }
}

/// Rasterize `svg` into `output`, waiting for the tool to finish
pub fn rasterize(svg: &Path, output: &Path, config: &RasterConfig) -> Result<PathBuf, RasterError> {
    log::debug!(
        "rasterizing {} -> {} with {}",
        svg.display(),
        output.display(),
        config.program
    );

    let result = config.command(svg, output).output();
    let out = match result {
        Ok(out) => out,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(RasterError::ToolMissing(config.program.clone()));
        }
        Err(e) => {
            return Err(RasterError::Io {
                program: config.program.clone(),
                source: e,
            });
        }
    };

    if !out.status.success() {
        return Err(RasterError::Failed {
            program: config.program.clone(),
            status: out.status,
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }

    Ok(output.to_path_buf())
}
