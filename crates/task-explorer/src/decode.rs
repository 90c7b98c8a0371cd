// Copyright 2026 Boundless Foundation, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Decoders for task inputs and notices.
//!
//! Decoding never fails from the caller's point of view: a payload that cannot be decoded turns
//! into [Decoded::Undecodable], so one malformed payload does not stop the rest of a list from
//! rendering.

use alloy::{
    primitives::{Bytes, U256},
    sol_types::SolValue,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::contracts::ClassificationNotice;

/// Text shown in place of a payload that could not be decoded.
pub const UNDECODABLE: &str = "Unable to decode";

/// Result of decoding a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decoded<T> {
    Value(T),
    Undecodable,
}

impl<T> Decoded<T> {
    fn from_result<E: std::fmt::Display>(res: Result<T, E>, what: &str) -> Self {
        match res {
            Ok(value) => Decoded::Value(value),
            Err(err) => {
                tracing::debug!("Failed to decode {what}: {err}");
                Decoded::Undecodable
            }
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Decoded::Value(value) => Some(value),
            Decoded::Undecodable => None,
        }
    }

    pub fn is_undecodable(&self) -> bool {
        matches!(self, Decoded::Undecodable)
    }
}

/// Image and theme submitted as the input of a task, carried on-chain as UTF-8 JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInput {
    /// Base64 encoded image.
    pub image: String,
    pub theme: String,
}

impl TaskInput {
    /// Encode as the JSON bytes carried in the `input` of a `TaskIssued` event.
    pub fn encode(&self) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(Bytes::from)
    }

    /// Raw image bytes, or `None` when the image is empty or not valid base64.
    pub fn image_bytes(&self) -> Option<Vec<u8>> {
        BASE64.decode(self.image.trim()).ok().filter(|bytes| !bytes.is_empty())
    }
}

/// Decode the JSON payload of a task input.
pub fn decode_task_input(bytes: &[u8]) -> Decoded<TaskInput> {
    Decoded::from_result(serde_json::from_slice(bytes), "task input")
}

/// Decode a task input given as a hex string, with or without the `0x` prefix.
pub fn decode_task_input_hex(input: &str) -> Decoded<TaskInput> {
    match decode_hex(input) {
        Ok(bytes) => decode_task_input(&bytes),
        Err(err) => {
            tracing::debug!("Failed to decode task input hex: {err}");
            Decoded::Undecodable
        }
    }
}

fn decode_hex(input: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let input = input.trim();
    let digits = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")).unwrap_or(input);
    hex::decode(digits)
}

/// Image container format, sniffed from the leading magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    Unknown,
}

impl ImageFormat {
    pub fn sniff(bytes: &[u8]) -> Self {
        match bytes {
            [0x89, b'P', b'N', b'G', ..] => ImageFormat::Png,
            [0xff, 0xd8, 0xff, ..] => ImageFormat::Jpeg,
            [b'G', b'I', b'F', b'8', ..] => ImageFormat::Gif,
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => ImageFormat::Webp,
            _ => ImageFormat::Unknown,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
            ImageFormat::Unknown => "bin",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Unknown => "application/octet-stream",
        }
    }
}

/// One class of a classification result with its probability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub class: String,
    pub probability: U256,
}

/// Decoded [ClassificationNotice].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeResult {
    pub result: U256,
    pub theme: String,
    pub predictions: Vec<Prediction>,
}

/// Decode the ABI encoded `(uint256, string, string[], uint256[])` notice payload.
///
/// Classes and probabilities are paired by position; differing lengths make the payload
/// undecodable.
pub fn decode_notice(bytes: &[u8]) -> Decoded<NoticeResult> {
    let notice = match ClassificationNotice::abi_decode_params(bytes) {
        Ok(notice) => notice,
        Err(err) => {
            tracing::debug!("Failed to decode notice: {err}");
            return Decoded::Undecodable;
        }
    };

    if notice.classes.len() != notice.probabilities.len() {
        tracing::debug!(
            "Notice has {} classes but {} probabilities",
            notice.classes.len(),
            notice.probabilities.len()
        );
        return Decoded::Undecodable;
    }

    let predictions = notice
        .classes
        .into_iter()
        .zip(notice.probabilities)
        .map(|(class, probability)| Prediction { class, probability })
        .collect();

    Decoded::Value(NoticeResult { result: notice.result, theme: notice.theme, predictions })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG.
    const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    fn sample_input() -> TaskInput {
        TaskInput { image: PNG_B64.into(), theme: "forest".into() }
    }

    #[test]
    fn task_input_from_hex() {
        let input = sample_input();
        let hex_input = format!("0x{}", hex::encode(input.encode().unwrap()));

        assert_eq!(decode_task_input_hex(&hex_input), Decoded::Value(input.clone()));
        assert_eq!(decode_task_input_hex(hex_input.trim_start_matches("0x")), Decoded::Value(input));
    }

    #[test]
    fn task_input_ignores_extra_fields() {
        let decoded = decode_task_input(br#"{"image":"","theme":"sea","model":"v2"}"#);
        assert_eq!(decoded.value().map(|v| v.theme.as_str()), Some("sea"));
    }

    #[test]
    fn malformed_task_inputs() {
        assert!(decode_task_input_hex("0xzz").is_undecodable());
        assert!(decode_task_input_hex("0x123").is_undecodable());
        assert!(decode_task_input(b"not json").is_undecodable());
        assert!(decode_task_input(br#"{"image":"abc"}"#).is_undecodable());
        assert!(decode_task_input(&[0xff, 0xfe, 0x7b]).is_undecodable());
        assert!(decode_task_input(b"").is_undecodable());
    }

    #[test]
    fn image_bytes_and_format() {
        let bytes = sample_input().image_bytes().unwrap();
        assert_eq!(ImageFormat::sniff(&bytes), ImageFormat::Png);
        assert_eq!(ImageFormat::sniff(&bytes).extension(), "png");

        let broken = TaskInput { image: "%%%".into(), theme: "x".into() };
        assert_eq!(broken.image_bytes(), None);
        let empty = TaskInput { image: "".into(), theme: "x".into() };
        assert_eq!(empty.image_bytes(), None);
    }

    #[test]
    fn sniff_formats() {
        assert_eq!(ImageFormat::sniff(&[0xff, 0xd8, 0xff, 0xe0]), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::sniff(b"GIF89a"), ImageFormat::Gif);
        assert_eq!(ImageFormat::sniff(b"RIFF\0\0\0\0WEBPVP8 "), ImageFormat::Webp);
        assert_eq!(ImageFormat::sniff(b"hello"), ImageFormat::Unknown);
        assert_eq!(ImageFormat::sniff(&[]).mime(), "application/octet-stream");
    }

    #[test]
    fn notice_pairs_classes_with_probabilities() {
        let notice = ClassificationNotice {
            result: U256::from(87),
            theme: "forest".into(),
            classes: vec!["tree".into(), "lake".into()],
            probabilities: vec![U256::from(90), U256::from(10)],
        };
        let bytes = notice.abi_encode_params();

        let decoded = decode_notice(&bytes);
        assert_eq!(
            decoded,
            Decoded::Value(NoticeResult {
                result: U256::from(87),
                theme: "forest".into(),
                predictions: vec![
                    Prediction { class: "tree".into(), probability: U256::from(90) },
                    Prediction { class: "lake".into(), probability: U256::from(10) },
                ],
            })
        );
    }

    #[test]
    fn notice_length_mismatch() {
        let notice = ClassificationNotice {
            result: U256::ZERO,
            theme: "forest".into(),
            classes: vec!["tree".into()],
            probabilities: vec![],
        };
        assert!(decode_notice(&notice.abi_encode_params()).is_undecodable());
    }

    #[test]
    fn malformed_notices() {
        assert!(decode_notice(b"").is_undecodable());
        assert!(decode_notice(&[0u8; 31]).is_undecodable());
        assert!(decode_notice(br#"{"image":"","theme":"sea"}"#).is_undecodable());
    }
}
