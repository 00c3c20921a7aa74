//! Unit formatting: wei → ether-scaled decimals

use alloy::primitives::U256;

/// Scale a raw integer by `10^decimals`, trimming trailing zeros
pub fn format_units(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / divisor;
    let remainder = value % divisor;
    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal = format!("{:0>width$}", remainder.to_string(), width = decimals as usize)
            .trim_end_matches('0')
            .to_string();
        format!("{}.{}", whole, decimal)
    }
}

/// Wei to ether (18 decimals)
pub fn format_ether(wei: U256) -> String {
    format_units(wei, 18)
}
