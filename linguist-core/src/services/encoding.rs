use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

use crate::error::CatalogError;

#[derive(Debug, Serialize)]
pub struct EncodingCandidate {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub candidates: Vec<EncodingCandidate>,
}

/// Decodes catalog bytes into text, honoring a BOM when one is present.
pub fn decode(bytes: &[u8]) -> Result<String, CatalogError> {
    let encoding = match Encoding::for_bom(bytes) {
        Some((enc, _)) => enc,
        None => guess(bytes),
    };

    // `decode` strips a matching BOM itself.
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(CatalogError::Encoding {
            encoding: used.name().to_lowercase(),
        });
    }

    Ok(text.into_owned())
}

pub fn detect_from_file(path: &Path) -> Result<EncodingDetectionResult, CatalogError> {
    let bytes = fs::read(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(detect(&bytes))
}

pub fn detect(bytes: &[u8]) -> EncodingDetectionResult {
    // BOM UTF-8 (EF BB BF)
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return EncodingDetectionResult {
            best: "utf-8-sig".into(),
            confidence: 0.99,
            candidates: vec![
                EncodingCandidate {
                    name: "utf-8-sig".into(),
                    confidence: 0.99,
                },
                EncodingCandidate {
                    name: "utf-8".into(),
                    confidence: 0.90,
                },
            ],
        };
    }

    if let Some((enc, _)) = Encoding::for_bom(bytes) {
        let name = enc.name().to_lowercase();
        return EncodingDetectionResult {
            best: name.clone(),
            confidence: 0.99,
            candidates: vec![EncodingCandidate {
                name,
                confidence: 0.99,
            }],
        };
    }

    let encoding = guess(bytes);
    let best = encoding.name().to_lowercase();
    let confidence = estimate_confidence(bytes, encoding);

    let mut candidates = vec![EncodingCandidate {
        name: best.clone(),
        confidence,
    }];

    // Older catalogs were often saved as Latin-1 by editors that ignored the XML declaration.
    if best == "windows-1252" {
        candidates.push(EncodingCandidate {
            name: "iso-8859-1".into(),
            confidence: (confidence - 0.05).max(0.0),
        });
    }

    if best == "utf-8" {
        candidates.push(EncodingCandidate {
            name: "utf-8-sig".into(),
            confidence: (confidence - 0.20).max(0.0),
        });
    }

    EncodingDetectionResult {
        best,
        confidence,
        candidates,
    }
}

fn guess(bytes: &[u8]) -> &'static Encoding {
    // Catalogs are UTF-8 by convention; only ask the detector when that fails.
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

    let len = text.len();
    if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    }
}
