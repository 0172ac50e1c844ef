//! Reader for the verbose attribute stream (`info.xml.lzma`).
//!
//! The stream is an lzma (or xz) compressed XML document holding one `info`
//! element per package:
//!
//! ```xml
//! <media_info>
//!   <info fn="boomaga-0.7.1-1-rosa2014.1.x86_64" sourcerpm="boomaga-0.7.1-1.src.rpm"
//!         url="http://boomaga.github.io" license="GPLv2+">Virtual printer</info>
//! </media_info>
//! ```

use std::{
    io::{self, Read},
    path::Path,
};

use serde::Deserialize;
use tracing::trace;
use xz2::{read::XzDecoder, stream::Stream};
use zrpm_utils::fs::open_optional;

use crate::{
    error::{ErrorContext, IndexError, Result},
    package::AttributeRecord,
};

#[derive(Debug, Default, Deserialize)]
struct MediaInfo {
    #[serde(rename = "info", default)]
    infos: Vec<InfoElement>,
}

#[derive(Debug, Deserialize)]
struct InfoElement {
    #[serde(rename = "fn")]
    file_name: String,
    #[serde(default)]
    sourcerpm: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    license: String,
    #[serde(default)]
    disttag: String,
    #[serde(default)]
    distepoch: String,
    #[serde(rename = "$value", default)]
    description: String,
}

impl From<InfoElement> for AttributeRecord {
    fn from(info: InfoElement) -> Self {
        Self {
            file_name: info.file_name,
            source_rpm: info.sourcerpm,
            url: info.url,
            license: info.license,
            description: info.description,
            disttag: info.disttag,
            distepoch: info.distepoch,
        }
    }
}

/// Parses decompressed attribute stream content.
///
/// Empty content yields no records.
pub fn parse_attributes<P: AsRef<Path>>(content: &str, path: P) -> Result<Vec<AttributeRecord>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let media: MediaInfo = serde_xml_rs::from_str(content).map_err(|err| {
        IndexError::Xml {
            path: path.as_ref().to_path_buf(),
            source: err,
        }
    })?;

    Ok(media.infos.into_iter().map(AttributeRecord::from).collect())
}

/// Reads every attribute record of the stream at `path`.
///
/// A missing or zero-byte file yields no records.
pub fn read_attribute_stream<P: AsRef<Path>>(path: P) -> Result<Vec<AttributeRecord>> {
    let path = path.as_ref();
    let Some(file) = open_optional(path)? else {
        trace!(path = %path.display(), "attribute stream not found");
        return Ok(Vec::new());
    };

    let len = file
        .metadata()
        .with_context(|| format!("reading metadata of {}", path.display()))?
        .len();
    if len == 0 {
        trace!(path = %path.display(), "attribute stream is empty");
        return Ok(Vec::new());
    }

    let stream = Stream::new_auto_decoder(u64::MAX, 0)
        .map_err(io::Error::other)
        .with_context(|| "creating lzma decoder".to_string())?;

    let mut content = String::new();
    XzDecoder::new_stream(file, stream)
        .read_to_string(&mut content)
        .with_context(|| format!("decompressing {}", path.display()))?;

    parse_attributes(&content, path)
}
