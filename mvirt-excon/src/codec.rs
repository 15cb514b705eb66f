//! Message codec injected into the dispatcher.

use crate::error::CodecError;
use crate::proto::ProtocolMessage;

/// Serializes protocol messages to and from frame payloads.
pub trait Codec {
    fn encode<M: ProtocolMessage>(&self, message: &M) -> Result<Vec<u8>, CodecError>;

    fn decode<M: ProtocolMessage>(&self, payload: &[u8]) -> Result<M, CodecError>;
}

/// Protobuf wire encoding via prost.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProstCodec;

impl Codec for ProstCodec {
    fn encode<M: ProtocolMessage>(&self, message: &M) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::with_capacity(message.encoded_len());
        message.encode(&mut buf).map_err(|e| CodecError::Encode {
            message: M::NAME,
            reason: e.to_string(),
        })?;
        Ok(buf)
    }

    fn decode<M: ProtocolMessage>(&self, payload: &[u8]) -> Result<M, CodecError> {
        <M as prost::Message>::decode(payload).map_err(|e| CodecError::Decode {
            message: M::NAME,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{CommandInfo, ExternalStatus, ExternalTask, ResourceArray, TaskId, TaskInfo};

    #[test]
    fn test_status_survives_codec() {
        let status = ExternalStatus {
            message: "launched".to_string(),
            pid: Some(4242),
        };

        let bytes = ProstCodec.encode(&status).unwrap();
        let decoded: ExternalStatus = ProstCodec.decode(&bytes).unwrap();

        assert_eq!(decoded, status);
    }

    #[test]
    fn test_status_wire_layout() {
        // field 1 (len-delimited) "ok", field 2 (varint) 7
        let status = ExternalStatus {
            message: "ok".to_string(),
            pid: Some(7),
        };

        let bytes = ProstCodec.encode(&status).unwrap();

        assert_eq!(bytes, vec![0x0a, 0x02, b'o', b'k', 0x10, 0x07]);
    }

    #[test]
    fn test_decode_error_names_message() {
        // Field 1 declares 5 bytes but only one follows.
        let err = ProstCodec
            .decode::<ExternalTask>(&[0x0a, 0x05, 0x01])
            .unwrap_err();

        match &err {
            CodecError::Decode { message, .. } => assert_eq!(*message, "ExternalTask"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("Could not deserialise ExternalTask"));
    }

    #[test]
    fn test_empty_payload_decodes_to_default() {
        let resources: ResourceArray = ProstCodec.decode(&[]).unwrap();
        assert!(resources.resource.is_empty());
    }

    #[test]
    fn test_nested_task_survives_codec() {
        let external = ExternalTask {
            task: Some(TaskInfo {
                name: "web".to_string(),
                task_id: Some(TaskId {
                    value: "task-7".to_string(),
                }),
                command: Some(CommandInfo::shell("sleep 1")),
                ..Default::default()
            }),
            mesos_executor_path: "/usr/libexec/mesos/mesos-executor".to_string(),
        };

        let bytes = ProstCodec.encode(&external).unwrap();
        let decoded: ExternalTask = ProstCodec.decode(&bytes).unwrap();
        assert_eq!(decoded, external);

        let task = decoded.task.unwrap();
        assert_eq!(task.task_id.unwrap().value, "task-7");
        assert!(task.slave_id.is_none());
        assert!(task.executor.is_none());
    }

    #[test]
    fn test_absent_task_decodes_to_none() {
        // Field 2 only: mesos_executor_path = "x".
        let external: ExternalTask = ProstCodec.decode(&[0x12, 0x01, b'x']).unwrap();
        assert!(external.task.is_none());
        assert_eq!(external.mesos_executor_path, "x");
    }
}
