//! Packet queues between the ECS and whatever carries bytes between peers.
//!
//! Systems never talk to a socket. Authorities push encoded packets into
//! [`ReplicationOutbox`]; the session layer delivers them to peers, which
//! push them into their own [`ReplicationInbox`].

use bevy::prelude::Resource;

use crate::components::NetId;

/// Which stream a packet belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    /// The replicated state tuple.
    State,
    /// The authority transform.
    Transform,
}

/// One encoded payload addressed to an avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Avatar the payload describes.
    pub entity: NetId,
    /// Stream the payload belongs to.
    pub kind: PacketKind,
    /// Encoded bytes.
    pub payload: Vec<u8>,
}

impl Packet {
    /// A state tuple packet.
    #[must_use]
    pub const fn state(entity: NetId, payload: Vec<u8>) -> Self {
        Self {
            entity,
            kind: PacketKind::State,
            payload,
        }
    }

    /// A transform packet.
    #[must_use]
    pub const fn transform(entity: NetId, payload: Vec<u8>) -> Self {
        Self {
            entity,
            kind: PacketKind::Transform,
            payload,
        }
    }
}

macro_rules! packet_queue {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Resource, Debug, Default)]
        pub struct $name {
            packets: Vec<Packet>,
        }

        impl $name {
            /// Queues one packet.
            pub fn push(&mut self, packet: Packet) {
                self.packets.push(packet);
            }

            /// Queues several packets in order.
            pub fn extend<I>(&mut self, packets: I)
            where
                I: IntoIterator<Item = Packet>,
            {
                self.packets.extend(packets);
            }

            /// Removes and yields every queued packet in arrival order.
            pub fn drain(&mut self) -> std::vec::Drain<'_, Packet> {
                self.packets.drain(..)
            }

            /// Number of queued packets.
            #[must_use]
            pub const fn len(&self) -> usize {
                self.packets.len()
            }

            /// Whether no packets are queued.
            #[must_use]
            pub const fn is_empty(&self) -> bool {
                self.packets.is_empty()
            }
        }
    };
}

packet_queue!(ReplicationOutbox, "Packets produced this tick by owned avatars.");
packet_queue!(ReplicationInbox, "Packets received from peers, not yet applied.");
