//! Source to WAV conversion.

use super::FfmpegEngine;
use crate::engine::EncodeOptions;
use crate::{Error, Result, Staging, ToolCommand};
use std::ffi::OsString;
use std::path::Path;
use wavbatch_common::paths::INTERMEDIATE_EXTENSION;

/// Build the ffmpeg arguments converting `input` to WAV at `output`.
///
/// The muxer is forced with `-f wav` because `output` is a staging path
/// whose extension ffmpeg cannot infer a format from.
pub fn encode_args(input: &Path, output: &Path, options: EncodeOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-loglevel", "error", "-y", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_owned());

    if options.strip_video {
        args.push("-vn".into());
    }

    args.push("-f".into());
    args.push(INTERMEDIATE_EXTENSION.into());
    args.push(output.as_os_str().to_owned());
    args
}

/// Convert `input` to WAV at `output` through a staging file.
pub async fn encode_to_wav(
    engine: &FfmpegEngine,
    input: &Path,
    output: &Path,
    options: EncodeOptions,
) -> Result<()> {
    if !input.exists() {
        return Err(Error::file_not_found(input));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Encoding {:?} -> {:?} (strip_video: {})",
        input,
        output,
        options.strip_video
    );

    let staging = Staging::new(output)?;

    ToolCommand::new(engine.ffmpeg().to_path_buf())
        .args(encode_args(input, staging.path(), options))
        .timeout(engine.timeout())
        .execute()
        .await?;

    staging.commit()?;
    Ok(())
}
