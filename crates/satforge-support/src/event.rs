use crate::address::{Address, ADDRESS_LENGTH};
use crate::calldata::{BytesWriter, Calldata, U256_LENGTH};
use crate::error::{Op20Error, Op20Result};
use crate::Amount;

pub const TRANSFER_EVENT: &str = "Transfer";
pub const APPROVAL_EVENT: &str = "Approval";

/// Size of a Transfer/Approval payload: two addresses and one u256.
pub const OP20_EVENT_LENGTH: usize = 2 * ADDRESS_LENGTH + U256_LENGTH;

/// An event as the hosting environment sees it: a name tag and an opaque
/// payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub data: Vec<u8>,
}

/// Typed form of the two events an OP_20 token emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op20Event {
    Transfer {
        from: Address,
        to: Address,
        amount: Amount,
    },
    Approval {
        owner: Address,
        spender: Address,
        amount: Amount,
    },
}

impl Op20Event {
    pub fn name(&self) -> &'static str {
        match self {
            Op20Event::Transfer { .. } => TRANSFER_EVENT,
            Op20Event::Approval { .. } => APPROVAL_EVENT,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let (first, second, amount) = match self {
            Op20Event::Transfer { from, to, amount } => (from, to, amount),
            Op20Event::Approval {
                owner,
                spender,
                amount,
            } => (owner, spender, amount),
        };
        let mut writer = BytesWriter::with_capacity(OP20_EVENT_LENGTH);
        writer
            .write_address(first)
            .write_address(second)
            .write_u256(*amount);
        writer.into_bytes()
    }

    pub fn decode(event: &Event) -> Op20Result<Self> {
        if event.data.len() != OP20_EVENT_LENGTH {
            return Err(Op20Error::MalformedCalldata(format!(
                "{} event payload must be {} bytes, got {}",
                event.name,
                OP20_EVENT_LENGTH,
                event.data.len()
            )));
        }
        let mut reader = Calldata::new(event.data.clone());
        let first = reader.read_address()?;
        let second = reader.read_address()?;
        let amount = reader.read_u256()?;
        match event.name.as_str() {
            TRANSFER_EVENT => Ok(Op20Event::Transfer {
                from: first,
                to: second,
                amount,
            }),
            APPROVAL_EVENT => Ok(Op20Event::Approval {
                owner: first,
                spender: second,
                amount,
            }),
            other => Err(Op20Error::MalformedCalldata(format!(
                "unknown event name {}",
                other
            ))),
        }
    }
}

impl From<Op20Event> for Event {
    fn from(event: Op20Event) -> Self {
        Event {
            name: event.name().to_string(),
            data: event.encode(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_payload_layout() {
        let to = Address::new([2; ADDRESS_LENGTH]);
        let event: Event = Op20Event::Transfer {
            from: Address::ZERO,
            to,
            amount: Amount::from(5u64),
        }
        .into();
        assert_eq!(event.name, "Transfer");
        assert_eq!(event.data.len(), 96);
        assert!(event.data[..32].iter().all(|b| *b == 0));
        assert_eq!(&event.data[32..64], to.as_bytes());
        assert_eq!(event.data[95], 5);
    }

    #[test]
    fn test_decode_recovers_approval() -> Op20Result<()> {
        let original = Op20Event::Approval {
            owner: Address::new([1; ADDRESS_LENGTH]),
            spender: Address::new([9; ADDRESS_LENGTH]),
            amount: Amount::MAX,
        };
        assert_eq!(Op20Event::decode(&original.into())?, original);
        Ok(())
    }

    #[test]
    fn test_decode_rejects_wrong_size() {
        let event = Event {
            name: TRANSFER_EVENT.to_string(),
            data: vec![0; 95],
        };
        assert!(Op20Event::decode(&event).is_err());
    }
}
