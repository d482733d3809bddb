use serde::{Deserialize, Serialize};
use thiserror::Error;

/// State broadcast by the host once per interval.
///
/// Serialized as a single UTF-8 JSON datagram; the camelCase field names
/// are the wire format and must not change. Messages are wire-transient:
/// no sequence numbers, no acknowledgment, each one stands alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncMessage {
    /// Opaque sender identity, used only for self-echo rejection
    pub device_id: String,
    /// Authoritative ball playback time in seconds
    pub ball_time: f32,
    /// Authoritative car playback time in seconds
    pub car_time: f32,
    pub is_playing: bool,
    /// Latched once the start gesture has fired on the host
    pub swipe_triggered: bool,
}

/// Errors decoding an inbound datagram
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("datagram is not a valid sync message: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncMessage {
    /// Serialize into one datagram payload
    pub fn encode(&self) -> Vec<u8> {
        // A flat struct of primitives cannot fail to serialize.
        serde_json::to_vec(self).expect("sync message serialization")
    }

    /// Decode a received datagram payload
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        Ok(serde_json::from_slice(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let msg = SyncMessage {
            device_id: "peer-a".to_string(),
            ball_time: 12.5,
            car_time: 12.25,
            is_playing: true,
            swipe_triggered: false,
        };
        assert_eq!(SyncMessage::decode(&msg.encode()).unwrap(), msg);
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let msg = SyncMessage {
            device_id: "peer-a".to_string(),
            ball_time: 1.0,
            car_time: 2.0,
            is_playing: true,
            swipe_triggered: true,
        };
        let json = String::from_utf8(msg.encode()).unwrap();
        for field in ["deviceId", "ballTime", "carTime", "isPlaying", "swipeTriggered"] {
            assert!(json.contains(field), "missing wire field {field} in {json}");
        }
    }

    #[test]
    fn test_decode_tolerates_missing_fields() {
        let msg = SyncMessage::decode(br#"{"deviceId":"x","ballTime":3.0}"#).unwrap();
        assert_eq!(msg.device_id, "x");
        assert_eq!(msg.ball_time, 3.0);
        assert!(!msg.is_playing);
        assert!(!msg.swipe_triggered);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(SyncMessage::decode(b"\xff\xfe not json").is_err());
    }
}
