mod writer;

pub use writer::PacketWriter;
