//! Binary-coded decimal helpers.
//!
//! Every field of the DS3231 time record is stored as packed BCD: the tens
//! digit in the high nibble and the units digit in the low nibble. Inputs are
//! trusted to already be in range; out-of-range values produce a defined but
//! meaningless byte rather than a panic.

/// Packs a decimal value (0-99) into a BCD byte.
#[must_use]
pub const fn decimal_to_bcd(value: u8) -> u8 {
    ((value / 10) << 4).wrapping_add(value % 10)
}

/// Unpacks a BCD byte into its decimal value (0-99).
#[must_use]
pub const fn bcd_to_decimal(value: u8) -> u8 {
    (value >> 4).wrapping_mul(10).wrapping_add(value & 0x0F)
}

/// Renders a BCD byte as two ASCII digits, tens first.
///
/// No leading-zero suppression is done so the output is always two bytes
/// wide. A nibble above 9 renders as the character that follows `'9'`.
#[must_use]
pub const fn bcd_to_ascii(value: u8) -> [u8; 2] {
    [b'0' + (value >> 4), b'0' + (value & 0x0F)]
}
