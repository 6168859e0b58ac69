/// Convert an amount in base units into whole units for display.
pub fn format_amount(amount: u64, decimals: u32) -> f64 {
    amount as f64 / 10f64.powi(decimals as i32)
}

/// `amount * 10^decimals`, saturating at `u64::MAX`.
pub fn to_base_units(amount: u64, decimals: u32) -> u64 {
    10u64
        .checked_pow(decimals)
        .and_then(|scale| amount.checked_mul(scale))
        .unwrap_or(u64::MAX)
}

/// `ABCDE...VWXYZ` form used in tables.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 5..].iter().collect();
    format!("{head}...{tail}")
}

/// Resolution the owner fee ratio is fixed to before splitting.
const FEE_RATIO_SCALE: u128 = 1_000_000;

/// Split a build deposit into (manager share, owner share), both rounded down.
/// The ratio is fixed to millionths and the shares are computed in integers,
/// so their sum never exceeds `deposit`.
pub fn split_owner_fee(deposit: u64, owner_fee_pc: f64) -> (u64, u64) {
    let owner_parts = (owner_fee_pc.clamp(0.0, 1.0) * FEE_RATIO_SCALE as f64).round() as u128;
    let manager_parts = FEE_RATIO_SCALE - owner_parts;
    let share = |parts: u128| {
        let scaled = u128::from(deposit) * parts / FEE_RATIO_SCALE;
        u64::try_from(scaled).unwrap_or(deposit)
    };
    (share(manager_parts), share(owner_parts))
}
