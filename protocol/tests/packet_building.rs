use mqttwriter_protocol::{
    encode_remaining_length, remaining_length_len, PacketType, PacketWriter, WriterConfig,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Splits a received frame into (header byte, remaining length, body).
fn parse_frame(frame: &[u8]) -> (u8, usize, &[u8]) {
    let mut multiplier = 1usize;
    let mut remaining = 0usize;
    let mut i = 1;
    loop {
        let byte = frame[i];
        remaining += usize::from(byte & 0x7F) * multiplier;
        multiplier *= 128;
        i += 1;
        if byte & 0x80 == 0 {
            break;
        }
    }
    (frame[0], remaining, &frame[i..])
}

/// Small packets: reserve one remaining length byte and patch it afterwards.
fn encode_subscribe(w: &mut PacketWriter, packet_id: u16, topic: &str, qos: u8) {
    w.write_u8(PacketType::Subscribe.fixed_header());
    let len_pos = w.position();
    w.write_u8(0);
    let body_start = w.position();
    w.write_u16(packet_id);
    w.write_string(topic);
    w.write_u8(qos);
    let body_len = i32::try_from(w.position() - body_start).unwrap();
    assert!(body_len < 128);
    let end = w.position();
    w.seek(len_pos);
    w.write_remaining_length(body_len);
    w.seek(end);
}

/// Any size: compute the body length up front and write straight through.
fn encode_publish(w: &mut PacketWriter, topic: &str, packet_id: u16, payload: &[u8]) {
    let body_len = 2 + topic.len() + 2 + payload.len();
    w.write_u8(PacketType::Publish.fixed_header_with(0b0010));
    w.write_remaining_length(i32::try_from(body_len).unwrap());
    w.write_string(topic);
    w.write_u16(packet_id);
    w.write_range(payload, 0, payload.len());
}

#[test]
fn connect_packet_bytes() {
    let mut w = PacketWriter::new();
    w.write_fixed_header(PacketType::Connect.as_u8(), 0);
    w.write_remaining_length(15);
    w.write_string("MQTT");
    w.write_u8(4);
    w.write_u8(0b0000_0010);
    w.write_u16(60);
    w.write_string("abc");

    assert_eq!(
        w.as_bytes(),
        &[
            0x10, 0x0F, 0x00, 0x04, b'M', b'Q', b'T', b'T', 0x04, 0x02, 0x00, 0x3C, 0x00, 0x03,
            b'a', b'b', b'c'
        ]
    );
}

#[test]
fn subscribe_with_patched_length() {
    let mut w = PacketWriter::new();
    encode_subscribe(&mut w, 10, "a/b", 1);
    assert_eq!(
        w.as_bytes(),
        &[0x82, 0x08, 0x00, 0x0A, 0x00, 0x03, b'a', b'/', b'b', 0x01]
    );
    assert_eq!(w.position(), w.len());
}

#[test]
fn large_publish_then_reuse() {
    let mut w = PacketWriter::new();
    let payload: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
    encode_publish(&mut w, "sensors/raw", 7, &payload);

    let body_len = 2 + 11 + 2 + payload.len();
    assert_eq!(w.len(), 1 + remaining_length_len(i32::try_from(body_len).unwrap()) + body_len);
    assert_eq!(w.capacity(), 32_768);

    let (header, remaining, body) = parse_frame(w.as_bytes());
    assert_eq!(PacketType::from_header(header), Ok(PacketType::Publish));
    assert_eq!(header & 0x0F, 0b0010);
    assert_eq!(remaining, body_len);
    assert_eq!(&body[..13], b"\x00\x0bsensors/raw");
    assert_eq!(&body[13..15], &[0x00, 0x07]);
    assert_eq!(&body[15..], &payload[..]);

    w.reset();
    w.shrink();
    assert_eq!(w.capacity(), 4096);

    w.write_u8(PacketType::PingReq.fixed_header());
    w.write_remaining_length(0);
    assert_eq!(w.as_bytes(), &[0xC0, 0x00]);
    assert_eq!(w.capacity(), 4096);
}

#[test]
fn remaining_length_prefix_matches_writer_output() {
    let mut w = PacketWriter::with_config(WriterConfig::new(8, 64).unwrap());
    w.write_remaining_length(2_097_152);
    assert_eq!(w.as_bytes(), &*encode_remaining_length(2_097_152));
    assert_eq!(w.capacity(), 8);
}

#[tokio::test]
async fn transport_receives_exactly_the_valid_bytes() {
    let (mut client, mut server) = tokio::io::duplex(64 * 1024);
    let mut w = PacketWriter::new();

    // Leave stale bytes past the high-water mark.
    w.write_bytes(&[0xEE; 100]);
    w.reset();

    encode_subscribe(&mut w, 1, "x", 0);
    client.write_all(w.as_bytes()).await.unwrap();
    let first = w.len();
    w.reset();

    encode_publish(&mut w, "t", 2, b"hello");
    client.write_all(w.as_bytes()).await.unwrap();
    let second = w.len();
    drop(client);

    let mut received = Vec::new();
    server.read_to_end(&mut received).await.unwrap();
    assert_eq!(received.len(), first + second);

    let (header, remaining, body) = parse_frame(&received[..first]);
    assert_eq!(header, 0x82);
    assert_eq!(remaining, body.len());
    assert_eq!(body, &[0x00, 0x01, 0x00, 0x01, b'x', 0x00]);

    let (header, remaining, body) = parse_frame(&received[first..]);
    assert_eq!(header, 0x32);
    assert_eq!(remaining, body.len());
    assert_eq!(body, b"\x00\x01t\x00\x02hello");
}
