use std::{
    ffi::{OsStr, OsString},
    process::Command,
};

use log::{debug, warn};

use super::MediaDescriptor;
use crate::error::{ProbeError, Result};

/// Runs ffprobe against a file and parses its JSON output.
#[derive(Debug, Clone)]
pub struct Prober {
    program: OsString,
}

impl Default for Prober {
    fn default() -> Self {
        Self {
            program: OsString::from("ffprobe"),
        }
    }
}

impl Prober {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `program` instead of `ffprobe` from `PATH`.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    fn command(&self, input: &OsStr) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-loglevel").arg("error");
        cmd.arg("-hide_banner");
        cmd.arg("-show_format");
        cmd.arg("-show_streams");
        cmd.arg("-print_format").arg("json=c=1");
        cmd.arg(input);
        cmd
    }

    /// Runs the probe and returns its raw stdout.
    ///
    /// On a non-zero exit the error carries ffprobe's stderr unchanged.
    pub fn probe_raw(&self, input: impl AsRef<OsStr>) -> Result<Vec<u8>> {
        let mut cmd = self.command(input.as_ref());
        debug!("running {:?}", cmd);

        let output = cmd.output().map_err(ProbeError::Spawn)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!(
                "{} exited with {} for {:?}",
                self.program.to_string_lossy(),
                output.status,
                input.as_ref()
            );
            return Err(ProbeError::Invocation(stderr));
        }

        Ok(output.stdout)
    }

    pub fn probe(&self, input: impl AsRef<OsStr>) -> Result<MediaDescriptor> {
        let stdout = self.probe_raw(input)?;
        MediaDescriptor::from_json_slice(&stdout)
    }
}

/// Probes `input` with the `ffprobe` found on `PATH`.
pub fn probe(input: impl AsRef<OsStr>) -> Result<MediaDescriptor> {
    Prober::new().probe(input)
}
