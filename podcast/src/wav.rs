use crate::error::{Error, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// Layout of raw little-endian PCM returned by the speech provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub channels: u16,
    pub sample_rate: u32,
    /// Bytes per sample.
    pub sample_width: u16,
}

impl PcmFormat {
    pub fn frame_size(&self) -> usize {
        self.channels as usize * self.sample_width as usize
    }

    fn spec(&self) -> WavSpec {
        WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.sample_width * 8,
            sample_format: SampleFormat::Int,
        }
    }
}

/// Writes `pcm` to `path` as a WAV file, replacing any existing file.
pub fn write_pcm(path: &Path, pcm: &[u8], format: PcmFormat) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    encode(file, pcm, format)
}

/// Wraps raw PCM bytes in a RIFF/WAVE container. The payload is copied
/// unchanged and the data chunk always covers all of it, even when it ends
/// in a partial frame.
pub fn encode<W: Write + Seek>(mut writer: W, pcm: &[u8], format: PcmFormat) -> Result<()> {
    let frame_size = format.frame_size();
    if frame_size == 0 {
        return Err(Error::InvalidConfig(format!("empty audio frame in {:?}", format)));
    }
    let (frames, tail) = pcm.split_at(pcm.len() - pcm.len() % frame_size);

    let mut wav = WavWriter::new(&mut writer, format.spec())?;
    for sample in frames.chunks_exact(format.sample_width as usize) {
        match *sample {
            // 8-bit wav samples are unsigned, hound shifts signed ones back up
            [b] => wav.write_sample((b as i16 - 128) as i8)?,
            [b0, b1] => wav.write_sample(i16::from_le_bytes([b0, b1]))?,
            [b0, b1, b2] => wav.write_sample(i32::from_le_bytes([0, b0, b1, b2]) >> 8)?,
            [b0, b1, b2, b3] => wav.write_sample(i32::from_le_bytes([b0, b1, b2, b3]))?,
            _ => {
                return Err(Error::InvalidConfig(format!(
                    "unsupported sample width {}",
                    format.sample_width
                )));
            }
        }
    }
    wav.finalize()?;

    if !tail.is_empty() {
        append_tail(&mut writer, tail, pcm.len())?;
    }

    Ok(())
}

/// hound only writes whole frames. The leftover bytes go after them and the
/// RIFF and data chunk sizes are patched to include them. Relies on hound
/// writing the data chunk last, without padding.
fn append_tail<W: Write + Seek>(writer: &mut W, tail: &[u8], data_len: usize) -> Result<()> {
    let end = writer.seek(SeekFrom::End(0))?;
    writer.write_all(tail)?;

    let data_len_offset = end - (data_len - tail.len()) as u64 - 4;
    let riff_len = end + tail.len() as u64 - 8;

    writer.seek(SeekFrom::Start(4))?;
    writer.write_all(&(riff_len as u32).to_le_bytes())?;
    writer.seek(SeekFrom::Start(data_len_offset))?;
    writer.write_all(&(data_len as u32).to_le_bytes())?;
    writer.seek(SeekFrom::End(0))?;
    writer.flush()?;

    Ok(())
}
