use starknet::core::types::Felt;

use crate::Error;

pub fn felt_to_u128(felt: Felt) -> Result<u128, Error> {
    felt.to_biguint()
        .try_into()
        .map_err(|_| Error::Internal(format!("failed to convert {} to u128", felt.to_hex_string())))
}

/// Render a raw token amount with `decimals` decimals, without rounding.
/// Trailing zeros of the fractional part are dropped: `1500000000000000000` with 18 decimals is `1.5`.
pub fn format_units(amount: Felt, decimals: u32) -> String {
    let digits = amount.to_biguint().to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{}.{}", integer, fraction)
    }
}
