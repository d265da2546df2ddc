//! Decomposing an amount into power-of-two denominations.
//!
//! Power-of-two denominations let the mint publish a small, fixed key
//! set; the default split is the minimum-proof decomposition of the
//! requested amount.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A caller-supplied override for how an amount should be split: emit
/// `count` outputs of `amount` each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountPreference {
    pub amount: u64,
    pub count: u64,
}

/// Splits `amount` into an ordered list of denominations.
///
/// If `preference` is supplied and its amounts (each a power of two) sum
/// to `amount`, each `preference[i].amount` is emitted `preference[i].count`
/// times, in order. Otherwise the binary decomposition of `amount` is
/// returned, ascending (`11 -> [1, 2, 8]`). `amount == 0` always yields an
/// empty list.
pub fn split_amount(
    amount: u64,
    preference: Option<&[AmountPreference]>,
) -> Result<Vec<u64>, CoreError> {
    match preference {
        Some(preference) => split_with_preference(amount, preference),
        None => Ok(default_split(amount)),
    }
}

fn split_with_preference(
    amount: u64,
    preference: &[AmountPreference],
) -> Result<Vec<u64>, CoreError> {
    let mut total: u64 = 0;
    let mut out = Vec::new();
    for pref in preference {
        if pref.amount == 0 || !pref.amount.is_power_of_two() {
            return Err(CoreError::InvalidPreference);
        }
        let subtotal = pref
            .amount
            .checked_mul(pref.count)
            .ok_or(CoreError::InvalidPreference)?;
        total = total.checked_add(subtotal).ok_or(CoreError::InvalidPreference)?;
        for _ in 0..pref.count {
            out.push(pref.amount);
        }
    }
    if total != amount {
        return Err(CoreError::InvalidPreference);
    }
    Ok(out)
}

/// The binary decomposition of `amount`, emitted ascending by bit.
fn default_split(amount: u64) -> Vec<u64> {
    (0..u64::BITS)
        .filter_map(|bit| {
            let denomination = 1u64 << bit;
            ((amount & denomination) == denomination).then_some(denomination)
        })
        .collect()
}

/// Number of blank (amount-1) outputs to reserve for NUT-08 fee change:
/// `ceil(log2(fee_reserve))`, clamped to at least 1 when `fee_reserve > 0`.
pub fn blank_output_count(fee_reserve: u64) -> u32 {
    if fee_reserve == 0 {
        return 0;
    }
    ((fee_reserve as f64).log2().ceil() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_split_ascending() {
        assert_eq!(split_amount(11, None).unwrap(), vec![1, 2, 8]);
        assert_eq!(split_amount(13, None).unwrap(), vec![1, 4, 8]);
        assert_eq!(split_amount(63, None).unwrap(), vec![1, 2, 4, 8, 16, 32]);
        assert_eq!(split_amount(64, None).unwrap(), vec![64]);
    }

    #[test]
    fn test_zero_splits_to_empty() {
        assert_eq!(split_amount(0, None).unwrap(), Vec::<u64>::new());
    }

    #[test]
    fn test_preference_exact_match_preserves_order() {
        let preference = vec![
            AmountPreference { amount: 1, count: 4 },
            AmountPreference { amount: 2, count: 1 },
        ];
        assert_eq!(
            split_amount(6, Some(&preference)).unwrap(),
            vec![1, 1, 1, 1, 2]
        );
    }

    #[test]
    fn test_preference_mismatched_total_fails() {
        let preference = vec![AmountPreference { amount: 1, count: 4 }];
        assert!(matches!(
            split_amount(5, Some(&preference)),
            Err(CoreError::InvalidPreference)
        ));
    }

    #[test]
    fn test_preference_non_power_of_two_fails() {
        let preference = vec![AmountPreference { amount: 3, count: 2 }];
        assert!(matches!(
            split_amount(6, Some(&preference)),
            Err(CoreError::InvalidPreference)
        ));
    }

    #[test]
    fn test_blank_output_count() {
        assert_eq!(blank_output_count(0), 0);
        assert_eq!(blank_output_count(1), 1);
        assert_eq!(blank_output_count(2), 1);
        assert_eq!(blank_output_count(3), 2);
        assert_eq!(blank_output_count(1000), 10);
    }
}
