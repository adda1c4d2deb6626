use findash::kite::packet::{
    parse_frame, parse_packet, FULL_PACKET_LEN, LTP_PACKET_LEN, QUOTE_PACKET_LEN,
};

fn packet(token: u32, price_paise: i32, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    out[0..4].copy_from_slice(&token.to_be_bytes());
    out[4..8].copy_from_slice(&price_paise.to_be_bytes());
    out
}

fn frame(packets: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(packets.len() as u16).to_be_bytes());
    for p in packets {
        out.extend_from_slice(&(p.len() as u16).to_be_bytes());
        out.extend_from_slice(p);
    }
    out
}

#[test]
fn ltp_packet_divides_equity_price_by_100() {
    let tick = parse_packet(&packet(408065, 150_025, LTP_PACKET_LEN), 42).unwrap();
    assert_eq!(tick.instrument_token, 408065);
    assert!((tick.last_price - 1500.25).abs() < 1e-9);
    // no exchange timestamp in ltp mode
    assert_eq!(tick.timestamp_ms, 42);
}

#[test]
/// Verifies full-mode packets carry the exchange timestamp in seconds at offset 60.
fn full_packet_uses_exchange_timestamp() {
    let mut p = packet(408065, 100_000, FULL_PACKET_LEN);
    p[60..64].copy_from_slice(&1_700_000_000u32.to_be_bytes());
    let tick = parse_packet(&p, 1).unwrap();
    assert_eq!(tick.timestamp_ms, 1_700_000_000_000);
    assert!((tick.last_price - 1000.0).abs() < 1e-9);
}

#[test]
fn full_packet_without_timestamp_falls_back_to_receive_time() {
    let tick = parse_packet(&packet(1, 100, FULL_PACKET_LEN), 9_999).unwrap();
    assert_eq!(tick.timestamp_ms, 9_999);
}

#[test]
fn short_packet_is_ignored() {
    assert!(parse_packet(&[0, 0, 0, 1], 0).is_none());
}

#[test]
fn frame_with_two_packets() {
    let data = frame(&[
        packet(408065, 150_000, LTP_PACKET_LEN),
        packet(738561, 280_050, QUOTE_PACKET_LEN),
    ]);
    let ticks = parse_frame(&data, 5).unwrap();
    assert_eq!(ticks.len(), 2);
    assert_eq!(ticks[0].instrument_token, 408065);
    assert_eq!(ticks[1].instrument_token, 738561);
    assert!((ticks[1].last_price - 2800.5).abs() < 1e-9);
}

#[test]
fn heartbeat_frame_is_empty() {
    assert!(parse_frame(&[0], 0).unwrap().is_empty());
    assert!(parse_frame(&[], 0).unwrap().is_empty());
}

#[test]
fn truncated_frame_is_an_error() {
    let mut data = frame(&[packet(408065, 150_000, LTP_PACKET_LEN)]);
    data.truncate(data.len() - 3);
    assert!(parse_frame(&data, 0).is_err());

    // count says two packets but only one is present
    let mut data = frame(&[packet(408065, 150_000, LTP_PACKET_LEN)]);
    data[1] = 2;
    assert!(parse_frame(&data, 0).is_err());
}
