use thiserror::Error;

/// Which kind of hardware identifier a fault refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Motor controller output channel
    Motor,
    /// Position sensor input port
    Sensor,
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelKind::Motor => write!(f, "motor channel"),
            ChannelKind::Sensor => write!(f, "sensor port"),
        }
    }
}

/// Faults raised by a hardware layer.
///
/// The module controller never creates these itself; it only forwards them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HardwareError {
    #[error("{kind} {id} does not exist")]
    InvalidChannel { kind: ChannelKind, id: u32 },

    #[error("{kind} {id} is already bound")]
    ChannelInUse { kind: ChannelKind, id: u32 },

    #[error("{kind} {id} is not responding")]
    Disconnected { kind: ChannelKind, id: u32 },
}
