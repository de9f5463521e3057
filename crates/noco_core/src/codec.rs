// codec.rs - Component <-> record conversion
//
// Record layout: `<type identifier>|<json payload>`. The type identifier may
// not contain the separator; the payload may.

use crate::component::{BoxedComponent, DynComponent};
use crate::diagnostics::{Diagnostic, DiagnosticSink, Operation};
use crate::registry::resolve_type;
use thiserror::Error;

pub const SEPARATOR: char = '|';

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("record is empty")]
    Empty,

    #[error("record has no '|' separator")]
    MissingSeparator,

    #[error("type {type_name} not found")]
    UnknownType { type_name: String },

    #[error("payload for {type_name} is invalid: {source}")]
    Payload {
        type_name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Encode a component as a record.
pub fn encode(component: &dyn DynComponent) -> Result<String, CodecError> {
    let type_name = component.type_name();
    let payload = component.to_payload().map_err(|source| CodecError::Payload {
        type_name: type_name.to_string(),
        source,
    })?;
    Ok(format!("{type_name}{SEPARATOR}{payload}"))
}

/// Split a record on its first separator into `(type identifier, payload)`.
pub fn split_record(record: &str) -> Result<(&str, &str), CodecError> {
    if record.is_empty() {
        return Err(CodecError::Empty);
    }
    record
        .split_once(SEPARATOR)
        .ok_or(CodecError::MissingSeparator)
}

/// Decode a record into a live (not yet awoken) component.
pub fn decode(record: &str) -> Result<BoxedComponent, CodecError> {
    let (type_name, payload) = split_record(record)?;
    let descriptor = resolve_type(type_name).ok_or_else(|| CodecError::UnknownType {
        type_name: type_name.to_string(),
    })?;
    descriptor
        .decode(payload)
        .map_err(|source| CodecError::Payload {
            type_name: type_name.to_string(),
            source,
        })
}

/// Fail-soft codec bound to one host: failures become diagnostics.
pub struct RecordCodec<'a> {
    host: &'a str,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> RecordCodec<'a> {
    pub fn new(host: &'a str, sink: &'a dyn DiagnosticSink) -> Self {
        Self { host, sink }
    }

    /// Serialize the component in slot `index`. An empty slot, or any
    /// encoding failure, yields an empty record.
    pub fn serialize(&self, component: Option<&dyn DynComponent>, index: usize) -> String {
        let Some(component) = component else {
            return String::new();
        };
        match encode(component) {
            Ok(record) => record,
            Err(err) => {
                self.sink.report(
                    Diagnostic::new(
                        self.host,
                        Operation::Serialize,
                        Some(index),
                        format!("failed to serialize component: {err}"),
                    )
                    .with_component(component.type_name()),
                );
                String::new()
            }
        }
    }

    /// Deserialize the record at `index`, or `None` with a diagnostic.
    pub fn deserialize(&self, record: &str, index: usize) -> Option<BoxedComponent> {
        match decode(record) {
            Ok(component) => Some(component),
            Err(err) => {
                let detail = match err {
                    CodecError::Empty => "component data is null or empty".to_string(),
                    CodecError::MissingSeparator => "component data is invalid".to_string(),
                    other => other.to_string(),
                };
                self.sink.report(Diagnostic::new(
                    self.host,
                    Operation::Parse,
                    Some(index),
                    detail,
                ));
                None
            }
        }
    }
}
