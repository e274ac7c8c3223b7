//! Container encoding, decoding and file output.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::codec::{Decoder, Encoder};
use crate::error::{PackError, PackResult};
use crate::header::{
    ContainerHeader, GARAGE_MAGIC, GarageHeader, Layout, MAP_BANNER, MapHeader, PACK_MAGIC,
    PackHeader, RESERVED,
};

/// A header together with its compiled payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub header: ContainerHeader,
    pub payload: Vec<u8>,
}

impl Container {
    pub fn new(header: impl Into<ContainerHeader>, payload: Vec<u8>) -> Self {
        Self {
            header: header.into(),
            payload,
        }
    }

    /// Serializes header and payload into one buffer.
    pub fn encode(&self) -> PackResult<Vec<u8>> {
        encode(&self.header, &self.payload)
    }

    /// Parses a container from raw bytes, detecting its layout.
    pub fn decode(bytes: &[u8]) -> PackResult<Self> {
        let layout = detect_layout(bytes)?;
        let mut dec = Decoder::new(bytes);

        let header = match layout {
            Layout::Pack => {
                dec.take("magic", PACK_MAGIC.len())?;
                ContainerHeader::Pack(PackHeader {
                    tool_format_version: dec.i32("tool_format_version")?,
                    content_version: dec.i32("content_version")?,
                    kind: dec.i32("kind")?,
                    content_id: dec.u64("content_id")?,
                    author_steam_id: dec.u64("author_steam_id")?,
                    author_discord_id: dec.u64("author_discord_id")?,
                })
            }
            Layout::Garage => {
                dec.i32("magic")?;
                let proxy_json = dec.string("proxy_json")?;
                let tool_format_version = dec.i32("tool_format_version")?;
                let content_id = dec.u64("content_id")?;
                let content_name = dec.string("content_name")?;
                let author_name = dec.string("author_name")?;
                dec.i32("reserved")?;
                ContainerHeader::Garage(GarageHeader {
                    proxy_json,
                    tool_format_version,
                    content_id,
                    content_name,
                    author_name,
                })
            }
            Layout::Map => {
                dec.string("banner")?;
                let tool_format_version = dec.i32("tool_format_version")?;
                let content_id = dec.u64("content_id")?;
                let content_name = dec.string("content_name")?;
                let author_name = dec.string("author_name")?;
                dec.i32("reserved")?;
                let loadscreen = dec.blob("loadscreen")?;
                ContainerHeader::Map(MapHeader {
                    tool_format_version,
                    content_id,
                    content_name,
                    author_name,
                    loadscreen,
                })
            }
        };

        Ok(Self {
            header,
            payload: dec.rest(),
        })
    }

    /// Reads a whole container from a reader.
    pub fn read<R: Read>(mut reader: R) -> PackResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::decode(&bytes)
    }

    /// Reads a container file.
    pub fn open(path: &Path) -> PackResult<Self> {
        Self::read(File::open(path)?)
    }
}

/// Identifies the layout of an encoded container from its leading bytes.
pub fn detect_layout(bytes: &[u8]) -> PackResult<Layout> {
    let Some(lead) = bytes.get(..4) else {
        let mut partial = [0u8; 4];
        partial[..bytes.len()].copy_from_slice(bytes);
        return Err(PackError::InvalidMagic(partial));
    };
    let mut lead_arr = [0u8; 4];
    lead_arr.copy_from_slice(lead);

    if lead_arr == PACK_MAGIC {
        return Ok(Layout::Pack);
    }
    if i32::from_le_bytes(lead_arr) == GARAGE_MAGIC {
        return Ok(Layout::Garage);
    }
    let banner_len = MAP_BANNER.len();
    if i32::from_le_bytes(lead_arr) as usize == banner_len
        && bytes.get(4..4 + banner_len) == Some(MAP_BANNER.as_bytes())
    {
        return Ok(Layout::Map);
    }
    Err(PackError::InvalidMagic(lead_arr))
}

fn encode(header: &ContainerHeader, payload: &[u8]) -> PackResult<Vec<u8>> {
    let mut enc = Encoder::with_capacity(256 + payload.len());

    match header {
        ContainerHeader::Pack(h) => {
            enc.put_raw(&PACK_MAGIC);
            enc.put_i32(h.tool_format_version);
            enc.put_i32(h.content_version);
            enc.put_i32(h.kind);
            enc.put_u64(h.content_id);
            enc.put_u64(h.author_steam_id);
            enc.put_u64(h.author_discord_id);
        }
        ContainerHeader::Garage(h) => {
            enc.put_i32(GARAGE_MAGIC);
            enc.put_str("proxy_json", &h.proxy_json)?;
            enc.put_i32(h.tool_format_version);
            enc.put_u64(h.content_id);
            enc.put_str("content_name", &h.content_name)?;
            enc.put_str("author_name", &h.author_name)?;
            enc.put_i32(RESERVED);
        }
        ContainerHeader::Map(h) => {
            enc.put_str("banner", MAP_BANNER)?;
            enc.put_i32(h.tool_format_version);
            enc.put_u64(h.content_id);
            enc.put_str("content_name", &h.content_name)?;
            enc.put_str("author_name", &h.author_name)?;
            enc.put_i32(RESERVED);
            enc.put_len("loadscreen", h.loadscreen.len())?;
            enc.put_raw(&h.loadscreen);
        }
    }

    enc.put_raw(payload);
    Ok(enc.finish())
}

/// How the writer commits a container to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Create or truncate the destination and write in place. A crash
    /// mid-write leaves a corrupt file behind.
    #[default]
    Truncate,
    /// Write a temporary file next to the destination, then rename it
    /// over the destination.
    Atomic,
}

/// Writes containers to files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerWriter {
    mode: WriteMode,
}

impl ContainerWriter {
    pub fn new(mode: WriteMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Writes `header` followed by `payload` to `output_path`, returning
    /// the number of bytes written.
    ///
    /// The container is encoded fully in memory before the destination is
    /// touched, so encoding errors never produce a file. A failed truncating
    /// write removes the partial file; a failed atomic write leaves the
    /// destination as it was.
    pub fn write(
        &self,
        output_path: &Path,
        header: &ContainerHeader,
        payload: &[u8],
    ) -> PackResult<u64> {
        let bytes = encode(header, payload)?;

        match self.mode {
            WriteMode::Truncate => {
                let mut file = File::create(output_path)?;
                if let Err(e) = file.write_all(&bytes).and_then(|()| file.flush()) {
                    drop(file);
                    let _ = fs::remove_file(output_path);
                    return Err(e.into());
                }
            }
            WriteMode::Atomic => {
                let dir = match output_path.parent() {
                    Some(p) if !p.as_os_str().is_empty() => p,
                    _ => Path::new("."),
                };
                fs::create_dir_all(dir)?;
                let mut tmp = NamedTempFile::new_in(dir)?;
                tmp.write_all(&bytes)?;
                tmp.as_file().sync_all()?;
                tmp.persist(output_path).map_err(|e| PackError::Io(e.error))?;
            }
        }

        Ok(bytes.len() as u64)
    }
}
