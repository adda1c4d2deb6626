//! Decoder for the binary market-data frames pushed by the Kite ticker.
//!
//! Frame layout (big-endian): `i16` packet count, then for each packet an
//! `i16` length followed by that many payload bytes.

use crate::error::AppError;
use crate::model::tick::Tick;

pub const LTP_PACKET_LEN: usize = 8;
pub const INDEX_QUOTE_PACKET_LEN: usize = 28;
pub const INDEX_FULL_PACKET_LEN: usize = 32;
pub const QUOTE_PACKET_LEN: usize = 44;
pub const FULL_PACKET_LEN: usize = 184;

const SEGMENT_CDS: u32 = 3;
const SEGMENT_BCD: u32 = 6;

/// Subscription depth requested from the ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerMode {
    Ltp,
    Quote,
    Full,
}

impl TickerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TickerMode::Ltp => "ltp",
            TickerMode::Quote => "quote",
            TickerMode::Full => "full",
        }
    }
}

pub fn subscribe_message(tokens: &[u32]) -> String {
    serde_json::json!({ "a": "subscribe", "v": tokens }).to_string()
}

pub fn mode_message(mode: TickerMode, tokens: &[u32]) -> String {
    serde_json::json!({ "a": "mode", "v": [mode.as_str(), tokens] }).to_string()
}

/// Currency derivatives quote to 7 decimals, BSE currency to 4, everything else to 2.
fn price_divisor(instrument_token: u32) -> f64 {
    match instrument_token & 0xff {
        SEGMENT_CDS => 10_000_000.0,
        SEGMENT_BCD => 10_000.0,
        _ => 100.0,
    }
}

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    data.get(at..at + 2).map(|b| u16::from_be_bytes([b[0], b[1]]))
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    data.get(at..at + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

fn read_i32(data: &[u8], at: usize) -> Option<i32> {
    read_u32(data, at).map(|v| v as i32)
}

/// Decode one packet. Packets shorter than the LTP layout are ignored.
pub fn parse_packet(packet: &[u8], received_ms: u64) -> Option<Tick> {
    if packet.len() < LTP_PACKET_LEN {
        return None;
    }
    let token = read_u32(packet, 0)?;
    let last_price = read_i32(packet, 4)? as f64 / price_divisor(token);

    let exchange_ts = match packet.len() {
        FULL_PACKET_LEN => read_u32(packet, 60),
        INDEX_FULL_PACKET_LEN => read_u32(packet, 28),
        _ => None,
    };
    let timestamp_ms = exchange_ts
        .filter(|ts| *ts > 0)
        .map(|ts| ts as u64 * 1000)
        .unwrap_or(received_ms);

    Some(Tick::new(token, timestamp_ms, last_price))
}

/// Decode a whole binary frame. A frame shorter than two bytes is a heartbeat.
pub fn parse_frame(data: &[u8], received_ms: u64) -> Result<Vec<Tick>, AppError> {
    let Some(count) = read_u16(data, 0) else {
        return Ok(Vec::new());
    };
    let mut ticks = Vec::with_capacity(count as usize);
    let mut offset = 2;
    for index in 0..count {
        let len = read_u16(data, offset).ok_or_else(|| {
            AppError::WebSocket(format!("truncated frame: missing length of packet {}", index))
        })? as usize;
        offset += 2;
        let packet = data.get(offset..offset + len).ok_or_else(|| {
            AppError::WebSocket(format!(
                "truncated frame: packet {} wants {} bytes, {} left",
                index,
                len,
                data.len().saturating_sub(offset)
            ))
        })?;
        offset += len;
        if let Some(tick) = parse_packet(packet, received_ms) {
            ticks.push(tick);
        }
    }
    Ok(ticks)
}
