//! WAV concatenation.

use super::FfmpegEngine;
use crate::{Error, Result, Staging, ToolCommand};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use wavbatch_common::paths::INTERMEDIATE_EXTENSION;

/// Build the ffmpeg arguments concatenating `inputs`, in order, into `output`.
///
/// Uses the `concat` filter so inputs with differing sample formats still
/// join cleanly.
pub fn concat_args(inputs: &[PathBuf], output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-loglevel", "error", "-y"]
        .into_iter()
        .map(OsString::from)
        .collect();

    for input in inputs {
        args.push("-i".into());
        args.push(input.as_os_str().to_owned());
    }

    let mut filter: String = (0..inputs.len()).map(|i| format!("[{i}:a]")).collect();
    filter.push_str(&format!("concat=n={}:v=0:a=1[out]", inputs.len()));

    args.push("-filter_complex".into());
    args.push(filter.into());
    args.push("-map".into());
    args.push("[out]".into());
    args.push("-f".into());
    args.push(INTERMEDIATE_EXTENSION.into());
    args.push(output.as_os_str().to_owned());
    args
}

/// Concatenate `inputs` into a single WAV at `output` through a staging file.
pub async fn concat_wav(engine: &FfmpegEngine, inputs: &[PathBuf], output: &Path) -> Result<()> {
    if inputs.is_empty() {
        return Err(Error::InvalidInput(format!(
            "no inputs to concatenate into {:?}",
            output
        )));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("Concatenating {} files -> {:?}", inputs.len(), output);

    let staging = Staging::new(output)?;

    ToolCommand::new(engine.ffmpeg().to_path_buf())
        .args(concat_args(inputs, staging.path()))
        .timeout(engine.timeout())
        .execute()
        .await?;

    staging.commit()?;
    Ok(())
}
