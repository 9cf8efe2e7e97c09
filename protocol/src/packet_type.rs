use crate::encoding::build_fixed_header;
use crate::error::ProtocolError;

macro_rules! packet_types {
    ($($name:ident = $val:expr),* $(,)?) => {
        /// MQTT 3.1.1 control packet types (values 0 and 15 are reserved).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum PacketType { $($name = $val,)* }

        impl PacketType {
            #[must_use]
            pub const fn as_u8(self) -> u8 { self as u8 }
        }

        impl TryFrom<u8> for PacketType {
            type Error = ProtocolError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($val => Ok(Self::$name),)*
                    _ => Err(ProtocolError::UnknownPacketType(value)),
                }
            }
        }
    };
}

packet_types! {
    Connect = 1,
    ConnAck = 2,
    Publish = 3,
    PubAck = 4,
    PubRec = 5,
    PubRel = 6,
    PubComp = 7,
    Subscribe = 8,
    SubAck = 9,
    Unsubscribe = 10,
    UnsubAck = 11,
    PingReq = 12,
    PingResp = 13,
    Disconnect = 14,
}

impl PacketType {
    /// Reads the type out of a complete fixed header byte.
    ///
    /// # Errors
    /// Returns [`ProtocolError::UnknownPacketType`] for the reserved nibbles.
    pub fn from_header(byte: u8) -> Result<Self, ProtocolError> {
        Self::try_from(byte >> 4)
    }

    /// Flags MQTT 3.1.1 mandates for this type.
    ///
    /// PUBREL, SUBSCRIBE and UNSUBSCRIBE carry `0b0010`; PUBLISH flags are
    /// per message (DUP, QoS, RETAIN) and default to zero here.
    #[must_use]
    pub const fn reserved_flags(self) -> u8 {
        match self {
            Self::PubRel | Self::Subscribe | Self::Unsubscribe => 0b0010,
            _ => 0,
        }
    }

    /// Fixed header byte with the reserved flags for this type.
    #[must_use]
    pub fn fixed_header(self) -> u8 {
        build_fixed_header(self.as_u8(), self.reserved_flags())
    }

    /// Fixed header byte with caller supplied flags, e.g. PUBLISH QoS bits.
    #[must_use]
    pub fn fixed_header_with(self, flags: u8) -> u8 {
        build_fixed_header(self.as_u8(), flags)
    }
}
