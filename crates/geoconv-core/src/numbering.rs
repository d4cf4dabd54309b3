//! Point-numbering consistency checks.
//!
//! Source sheets label every segment "from point N to point M". A break in
//! that chain means a row was lost, duplicated or mistyped, so the whole
//! file is rejected rather than importing a wrong polygon.

use crate::error::{ConvertError, Location};
use crate::model::NumberingPair;

/// Check that segment labels form one closed chain.
///
/// Every row must start where the previous row ended, every row but the
/// last must advance by one, and the last row must end where the first
/// row starts. `locate` maps a row index to its position in the source.
pub fn check_cycle<F>(pairs: &[NumberingPair], locate: F) -> Result<(), ConvertError>
where
    F: Fn(usize) -> Location,
{
    let Some(first) = pairs.first() else {
        return Ok(());
    };
    let last_idx = pairs.len() - 1;

    for (i, pair) in pairs.iter().enumerate() {
        if i > 0 {
            let prev = pairs[i - 1];
            if pair.from != prev.to {
                return Err(ConvertError::NumberingContinuityBroken {
                    location: locate(i),
                    expected: prev.to,
                    found: pair.from,
                });
            }
        }
        if i < last_idx && pair.from.checked_add(1) != Some(pair.to) {
            return Err(ConvertError::NumberingContinuityBroken {
                location: locate(i),
                expected: pair.from.saturating_add(1),
                found: pair.to,
            });
        }
    }

    let last = pairs[last_idx];
    if last.to != first.from {
        return Err(ConvertError::NumberingCycleBroken {
            first: first.from,
            last: last.to,
        });
    }

    Ok(())
}

/// Check that point indices count up by one.
///
/// The final index may instead repeat the first one, marking an explicitly
/// closed ring.
pub fn check_sequence<F>(indices: &[i64], locate: F) -> Result<(), ConvertError>
where
    F: Fn(usize) -> Location,
{
    let Some(&first) = indices.first() else {
        return Ok(());
    };
    let last_idx = indices.len() - 1;

    for i in 1..indices.len() {
        let next = indices[i - 1].checked_add(1);
        let found = indices[i];
        if next == Some(found) || (i == last_idx && found == first) {
            continue;
        }
        return Err(ConvertError::NumberingContinuityBroken {
            location: locate(i),
            expected: indices[i - 1].saturating_add(1),
            found,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(i64, i64)]) -> Vec<NumberingPair> {
        raw.iter()
            .map(|&(from, to)| NumberingPair { from, to })
            .collect()
    }

    fn at_line(i: usize) -> Location {
        Location::Line(i)
    }

    #[test]
    fn closed_chain_passes() {
        assert!(check_cycle(&pairs(&[(1, 2), (2, 3), (3, 1)]), at_line).is_ok());
        assert!(check_cycle(&pairs(&[(7, 8), (8, 9), (9, 10), (10, 7)]), at_line).is_ok());
    }

    #[test]
    fn skipped_point_fails_at_its_row() {
        let err = check_cycle(&pairs(&[(1, 2), (2, 4), (4, 1)]), at_line).unwrap_err();
        match err {
            ConvertError::NumberingContinuityBroken {
                location,
                expected,
                found,
            } => {
                assert_eq!(location, Location::Line(1));
                assert_eq!(expected, 3);
                assert_eq!(found, 4);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn disconnected_rows_fail() {
        let err = check_cycle(&pairs(&[(1, 2), (3, 4), (4, 1)]), at_line).unwrap_err();
        assert_eq!(err.location(), Some(Location::Line(1)));
    }

    #[test]
    fn open_chain_fails_cycle() {
        let err = check_cycle(&pairs(&[(1, 2), (2, 3), (3, 4)]), at_line).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::NumberingCycleBroken { first: 1, last: 4 }
        ));
    }

    #[test]
    fn empty_chain_is_trivially_ok() {
        assert!(check_cycle(&[], at_line).is_ok());
        assert!(check_sequence(&[], at_line).is_ok());
    }

    #[test]
    fn sequence_counts_up() {
        assert!(check_sequence(&[1, 2, 3, 4], at_line).is_ok());
        assert!(check_sequence(&[5], at_line).is_ok());
    }

    #[test]
    fn sequence_may_close_on_first_index() {
        assert!(check_sequence(&[1, 2, 3, 1], at_line).is_ok());
    }

    #[test]
    fn sequence_rejects_other_jumps() {
        let err = check_sequence(&[1, 2, 4, 5], at_line).unwrap_err();
        assert_eq!(err.location(), Some(Location::Line(2)));

        // Repeating the first index is only allowed on the last row.
        assert!(check_sequence(&[1, 2, 1, 2], at_line).is_err());
        assert!(check_sequence(&[1, 2, 3, 2], at_line).is_err());
    }

    #[test]
    fn largest_point_numbers_fail_without_overflow() {
        let err = check_cycle(&pairs(&[(i64::MAX, 1), (1, i64::MAX)]), at_line).unwrap_err();
        assert_eq!(err.location(), Some(Location::Line(0)));
        assert!(check_cycle(&pairs(&[(1, i64::MAX), (i64::MAX, 1)]), at_line).is_err());

        let err = check_sequence(&[i64::MAX, 1], at_line).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::NumberingContinuityBroken {
                expected: i64::MAX,
                found: 1,
                ..
            }
        ));
        assert!(check_sequence(&[i64::MAX - 1, i64::MAX], at_line).is_ok());
    }
}
