use crate::calldata::BytesWriter;
use crate::event::Event;

/// Result of a committed call: the encoded return value plus the events the
/// call emitted, in emission order.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct CallResponse {
    pub data: Vec<u8>,
    pub events: Vec<Event>,
}

impl CallResponse {
    pub fn new(data: Vec<u8>, events: Vec<Event>) -> Self {
        Self { data, events }
    }

    pub fn from_writer(writer: BytesWriter, events: Vec<Event>) -> Self {
        Self::new(writer.into_bytes(), events)
    }
}
