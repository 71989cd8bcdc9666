//! Icon installation
//!
//! ICNS sources are copied as-is. Square PNG sources with a standard icon size are
//! wrapped in a single-element ICNS container (ICNS elements may carry PNG data
//! directly). Anything else is rejected.

use crate::error::BundleError;
use std::fs;
use std::path::Path;
use tracing::debug;

const ICNS_MAGIC: &[u8; 4] = b"icns";
const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";
const ICNS_HEADER_LEN: usize = 8;

/// PNG-capable ICNS element types by pixel size
const PNG_ELEMENT_TYPES: &[(u32, &[u8; 4])] = &[
    (16, b"icp4"),
    (32, b"icp5"),
    (64, b"icp6"),
    (128, b"ic07"),
    (256, b"ic08"),
    (512, b"ic09"),
    (1024, b"ic10"),
];

#[derive(Debug, PartialEq, Eq)]
enum ImageFormat {
    Icns,
    Png { width: u32, height: u32 },
    Unknown,
}

fn sniff(bytes: &[u8]) -> ImageFormat {
    if bytes.len() >= ICNS_HEADER_LEN && &bytes[..4] == ICNS_MAGIC {
        return ImageFormat::Icns;
    }
    // signature, IHDR length + tag, then width and height
    if bytes.len() >= 24 && &bytes[..8] == PNG_SIGNATURE && &bytes[12..16] == b"IHDR" {
        let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
        return ImageFormat::Png { width, height };
    }
    ImageFormat::Unknown
}

/// Wrap PNG data in an ICNS container. Fails for non-square or non-standard sizes.
pub fn icns_from_png(png: &[u8]) -> Result<Vec<u8>, String> {
    let (width, height) = match sniff(png) {
        ImageFormat::Png { width, height } => (width, height),
        _ => return Err("not a PNG image".to_string()),
    };
    if width != height {
        return Err(format!("icon must be square, got {}x{}", width, height));
    }
    let element_type = PNG_ELEMENT_TYPES
        .iter()
        .find(|(size, _)| *size == width)
        .map(|(_, code)| *code)
        .ok_or_else(|| format!("unsupported icon size {}x{}", width, height))?;

    let element_len = ICNS_HEADER_LEN + png.len();
    let total_len = ICNS_HEADER_LEN + element_len;
    let total = u32::try_from(total_len).map_err(|_| "icon data too large".to_string())?;

    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(ICNS_MAGIC);
    out.extend_from_slice(&total.to_be_bytes());
    out.extend_from_slice(element_type);
    out.extend_from_slice(&(element_len as u32).to_be_bytes());
    out.extend_from_slice(png);
    Ok(out)
}

/// Convert the image at `source` to ICNS and write it to `dest`
pub fn install_icon(source: &Path, dest: &Path) -> Result<(), BundleError> {
    let bytes = fs::read(source)
        .map_err(|e| BundleError::io(format!("Failed to read icon {:?}", source), e))?;
    let conversion_error = |reason: String| BundleError::IconConversion {
        path: source.to_path_buf(),
        reason,
    };

    let icns = match sniff(&bytes) {
        ImageFormat::Icns => {
            let declared = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
            if declared > bytes.len() {
                return Err(conversion_error("truncated ICNS data".to_string()));
            }
            bytes
        }
        ImageFormat::Png { .. } => icns_from_png(&bytes).map_err(conversion_error)?,
        ImageFormat::Unknown => {
            return Err(conversion_error("unrecognized image format".to_string()))
        }
    };

    debug!(source = %source.display(), dest = %dest.display(), "Installing icon");
    fs::write(dest, icns).map_err(|e| BundleError::io(format!("Failed to write {:?}", dest), e))
}

#[cfg(test)]
pub(crate) fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes
}
