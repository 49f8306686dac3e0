//! Subnet-range literal validation used for whitelist matching
//!
//! Shape checks only: these predicates say whether a string looks like a
//! CIDR-style range, they never test address membership.

/// An IPv4 octet group: one to three digits, value at most 255.
/// Leading zeros are tolerated.
fn is_octet(group: &str) -> bool {
    (1..=3).contains(&group.len())
        && group.bytes().all(|b| b.is_ascii_digit())
        && group.parse::<u16>().map_or(false, |value| value <= 255)
}

/// An IPv4 prefix length: a single digit, or two digits in 10..=32
fn is_ipv4_prefix(prefix: &str) -> bool {
    let bytes = prefix.as_bytes();
    match bytes {
        [digit] => digit.is_ascii_digit(),
        [b'1' | b'2', digit] => digit.is_ascii_digit(),
        [b'3', digit] => (b'0'..=b'2').contains(digit),
        _ => false,
    }
}

fn is_ipv4_octets(address: &str) -> bool {
    let mut count = 0;
    for group in address.split('.') {
        if !is_octet(group) {
            return false;
        }
        count += 1;
    }
    count == 4
}

/// Tests whether a string has the shape of an IPv4 subnet range,
/// e.g. `192.168.0.0/24`.
pub fn is_valid_ipv4_range(candidate: &str) -> bool {
    match candidate.split_once('/') {
        Some((address, prefix)) => is_ipv4_octets(address) && is_ipv4_prefix(prefix),
        None => false,
    }
}

/// Tests whether a string has the shape of an IPv6 subnet range.
///
/// Deliberately loose: a run of lowercase hex digits and colons over a
/// decimal prefix length, or the IPv4-mapped form
/// `::ffff:<octets>/<prefix>`.
pub fn is_valid_ipv6_range(candidate: &str) -> bool {
    let loose = match candidate.split_once('/') {
        Some((body, prefix)) => {
            body.bytes().all(|b| matches!(b, b'a'..=b'f' | b'0'..=b'9' | b':'))
                && !prefix.is_empty()
                && prefix.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    };
    if loose {
        return true;
    }

    match candidate.strip_prefix("::ffff:") {
        Some(mapped) => match mapped.split_once('/') {
            Some((address, prefix)) => {
                is_ipv4_octets(address)
                    && !prefix.is_empty()
                    && prefix.bytes().all(|b| b.is_ascii_digit())
            }
            None => false,
        },
        None => false,
    }
}
