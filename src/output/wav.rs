// tonewav -- synthesize periodic waveforms into wav files
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Writing PCM data into RIFF/WAVE files.
//!
//! The size of the RIFF container is stored near the start of the file, but is only
//! known once everything after it has been written. Files are therefore written in two
//! passes: first the complete file with a placeholder, then a patch of that field.

use std::convert::TryFrom;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Cursor, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, trace};
use snafu::{ensure, ResultExt, Snafu};

use crate::wave::PcmFormat;

/// Length of the header preceding the sample data.
pub const HEADER_LEN: u64 = 44;

/// Offset of the RIFF container size field.
const RIFF_SIZE_OFFSET: u64 = 4;

/// Bytes of the file not counted by the RIFF size field ("RIFF" and the field itself).
const RIFF_PREAMBLE_LEN: u64 = 8;

/// Largest amount of sample data whose file length still fits the RIFF size field.
pub const MAX_DATA_LEN: u64 = u32::MAX as u64 - (HEADER_LEN - RIFF_PREAMBLE_LEN);

/// PCM compression code of the format chunk.
const FORMAT_PCM: u16 = 1;

#[derive(Debug, Snafu)]
pub enum WavError {
    #[snafu(display("Could not create {}: {}", path.display(), source))]
    CreateFile { path: PathBuf, source: io::Error },
    #[snafu(display("Could not write {}: {}", path.display(), source))]
    WriteFile { path: PathBuf, source: io::Error },
    #[snafu(display("Could not reopen {} for patching: {}", path.display(), source))]
    OpenForPatch { path: PathBuf, source: io::Error },
    #[snafu(display("Could not patch the header of {}: {}", path.display(), source))]
    PatchFile { path: PathBuf, source: io::Error },
    #[snafu(display("Could not write to buffer: {}", source))]
    WriteBuffer { source: io::Error },
    #[snafu(display("{} bytes of sample data do not fit into a WAV file", len))]
    TooLarge { len: usize },
}

fn check_data_len(data: &[u8]) -> Result<(), WavError> {
    ensure!(
        data.len() as u64 <= MAX_DATA_LEN,
        TooLarge { len: data.len() }
    );
    Ok(())
}

fn invalid_input(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg)
}

/// Write a complete WAV file, leaving the RIFF size field as a zero placeholder.
///
/// Use [`patch_riff_size`] afterwards to fill it in.
pub fn write_wav<W: Write>(writer: &mut W, format: &PcmFormat, data: &[u8]) -> io::Result<()> {
    let data_len =
        u32::try_from(data.len()).map_err(|_| invalid_input("sample data exceeds 4 GiB"))?;
    let block_align = format
        .block_align()
        .ok_or_else(|| invalid_input("block align exceeds 16 bits"))?;
    let byte_rate = format
        .byte_rate()
        .ok_or_else(|| invalid_input("byte rate exceeds 32 bits"))?;
    debug!(
        "wav header: {} channel(s), {} Hz, {} bit, {} bytes/s, {} data bytes",
        format.channels,
        format.sample_rate,
        format.bit_depth,
        byte_rate,
        data_len
    );

    writer.write_all(b"RIFF")?;
    writer.write_all(&[0; 4])?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&FORMAT_PCM.to_le_bytes())?;
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&byte_rate.to_le_bytes())?;
    writer.write_all(&block_align.to_le_bytes())?;
    writer.write_all(&format.bit_depth.to_le_bytes())?;

    writer.write_all(b"data")?;
    writer.write_all(&data_len.to_le_bytes())?;
    writer.write_all(data)
}

/// Overwrite the RIFF size field of a file that is `file_len` bytes long.
pub fn patch_riff_size<W: Write + Seek>(writer: &mut W, file_len: u64) -> io::Result<()> {
    let riff_size = file_len
        .checked_sub(RIFF_PREAMBLE_LEN)
        .and_then(|size| u32::try_from(size).ok())
        .ok_or_else(|| invalid_input("file length out of range for a RIFF header"))?;
    trace!("patching riff size {} at offset {}", riff_size, RIFF_SIZE_OFFSET);
    writer.seek(SeekFrom::Start(RIFF_SIZE_OFFSET))?;
    writer.write_all(&riff_size.to_le_bytes())
}

/// Write `data` as a WAV file to `path`, replacing any existing file.
///
/// The file is written and closed completely before it is reopened to patch the
/// RIFF size with its final length. A failure in either pass may leave a partial
/// file behind.
pub fn write_wav_file(path: &Path, format: &PcmFormat, data: &[u8]) -> Result<(), WavError> {
    check_data_len(data)?;

    {
        let file = File::create(path).context(CreateFile { path })?;
        let mut writer = BufWriter::new(file);
        write_wav(&mut writer, format, data).context(WriteFile { path })?;
        writer.flush().context(WriteFile { path })?;
        writer.get_ref().sync_all().context(WriteFile { path })?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .open(path)
        .context(OpenForPatch { path })?;
    let file_len = file.metadata().context(PatchFile { path })?.len();
    patch_riff_size(&mut file, file_len).context(PatchFile { path })?;
    file.sync_all().context(PatchFile { path })?;

    debug!("wrote {} bytes to {}", file_len, path.display());
    Ok(())
}

/// Produce the bytes of a complete WAV file in memory.
///
/// # Examples
///
/// ```
/// use tonewav::output::wav::*;
/// use tonewav::wave::PcmFormat;
///
/// let bytes = write_wav_to_vec(&PcmFormat::mono(44100, 16), &[0; 8]).unwrap();
/// assert_eq!(bytes.len(), 52);
/// assert_eq!(&bytes[4..8], &44u32.to_le_bytes());
/// ```
pub fn write_wav_to_vec(format: &PcmFormat, data: &[u8]) -> Result<Vec<u8>, WavError> {
    check_data_len(data)?;
    let mut cursor = Cursor::new(Vec::with_capacity(HEADER_LEN as usize + data.len()));
    write_wav(&mut cursor, format, data).context(WriteBuffer)?;
    let file_len = cursor.get_ref().len() as u64;
    patch_riff_size(&mut cursor, file_len).context(WriteBuffer)?;
    Ok(cursor.into_inner())
}
