//! Section descriptors such as `"1-3,5"` that list the positions an alphabet is used at.
//!
//! A section is a comma-separated list of items, each item being a single 1-based position or an inclusive range `a-b`.
//! Whitespace around separators is ignored and reversed ranges are accepted.

use std::ops::Range;

use itertools::Itertools;
use log::debug;

use crate::error::{Error, Result};

/// Parses a section into zero-based ranges, in order of appearance.
fn parse_ranges(section: &str) -> Result<Vec<Range<usize>>> {
    let malformed = |reason: String| Error::MalformedSection {
        section: section.to_string(),
        reason,
    };
    let mut ranges = Vec::new();
    for item in section.split(',').map(str::trim) {
        let bounds = item
            .split('-')
            .map(str::trim)
            .map(|b| {
                b.parse::<usize>()
                    .map_err(|e| malformed(format!("{:?} is not a position: {}", b, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        let (from, to) = match bounds[..] {
            [p] => (p, p),
            [a, b] => (a.min(b), a.max(b)),
            _ => return Err(malformed(format!("{:?} is neither a position nor a range", item))),
        };
        if from == 0 {
            return Err(malformed("positions start at 1".to_string()));
        }
        ranges.push(from - 1..to);
    }
    Ok(ranges)
}

/// Parses a section into the zero-based positions it lists, in order of appearance.
///
/// # Example
/// ```
/// use seq_alphabet::config::parse_sections;
///
/// assert_eq!(parse_sections("1-3,5").unwrap(), vec![0, 1, 2, 4]);
/// assert_eq!(parse_sections("3 - 1").unwrap(), vec![0, 1, 2]);
/// assert!(parse_sections("0").is_err());
/// assert!(parse_sections("a").is_err());
/// ```
pub fn parse_sections(section: &str) -> Result<Vec<usize>> {
    let mut positions = Vec::new();
    for range in parse_ranges(section)? {
        positions
            .try_reserve(range.len())
            .map_err(|e| Error::MalformedSection {
                section: section.to_string(),
                reason: e.to_string(),
            })?;
        positions.extend(range);
    }
    debug!("section {:?} lists {} positions", section, positions.len());
    Ok(positions)
}

/// Like [parse_sections], but fails with [Error::SectionOutOfRange] if the section lists a position outside of `0..length`.
/// No position is listed before all ranges are checked.
///
/// # Example
/// ```
/// use seq_alphabet::{config::parse_sections_within, Error};
///
/// assert_eq!(parse_sections_within("2-3", 3).unwrap(), vec![1, 2]);
/// assert_eq!(
///     parse_sections_within("2-18446744073709551615", 3).unwrap_err(),
///     Error::SectionOutOfRange(4)
/// );
/// ```
pub fn parse_sections_within(section: &str, length: usize) -> Result<Vec<usize>> {
    let ranges = parse_ranges(section)?;
    check_ranges(&ranges, length)?;
    Ok(ranges.into_iter().flatten().collect())
}

/// Fails on the first range that reaches beyond `length`, naming its first position outside, 1-based.
fn check_ranges(ranges: &[Range<usize>], length: usize) -> Result<()> {
    match ranges.iter().find(|r| r.end > length) {
        Some(r) => Err(Error::SectionOutOfRange(r.start.max(length) + 1)),
        None => Ok(()),
    }
}

/// Checks that the sections together assign every position in `0..length` exactly once.
///
/// Out of range positions are reported first, then the smallest position that is assigned twice, then the smallest unassigned position.
/// Positions in errors are 1-based.
///
/// # Example
/// ```
/// use seq_alphabet::config::check_coverage;
///
/// assert!(check_coverage(5, ["1-3", "4,5"]).is_ok());
/// assert!(check_coverage(5, ["1-3", "3-5"]).is_err());
/// assert!(check_coverage(5, ["1-3", "5"]).is_err());
/// ```
pub fn check_coverage<'a>(length: usize, sections: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut ranges = Vec::new();
    for section in sections {
        let parsed = parse_ranges(section)?;
        check_ranges(&parsed, length)?;
        ranges.extend(parsed);
    }
    // ranges are never empty, so sorted disjoint ranges have increasing ends
    ranges.sort_unstable_by_key(|r| r.start);
    for (a, b) in ranges.iter().tuple_windows() {
        if b.start < a.end {
            return Err(Error::DoublyDefinedPosition(b.start + 1));
        }
    }
    let mut next = 0;
    for r in &ranges {
        if r.start > next {
            break;
        }
        next = r.end;
    }
    if next < length {
        return Err(Error::UndefinedPosition(next + 1));
    }
    Ok(())
}

/// Renders zero-based positions as a compact section, the inverse of [parse_sections] up to order and duplicates.
///
/// # Example
/// ```
/// use seq_alphabet::config::format_sections;
///
/// assert_eq!(format_sections(&[4, 0, 1, 2]), "1-3,5");
/// ```
pub fn format_sections(positions: &[usize]) -> String {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for p in positions.iter().copied().sorted_unstable().dedup() {
        match runs.last_mut() {
            Some((_, end)) if *end + 1 == p => *end = p,
            _ => runs.push((p, p)),
        }
    }
    runs.into_iter()
        .map(|(from, to)| {
            if from == to {
                (from + 1).to_string()
            } else {
                format!("{}-{}", from + 1, to + 1)
            }
        })
        .join(",")
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn single_positions_and_ranges() {
        assert_eq!(parse_sections("1-3,5").unwrap(), vec![0, 1, 2, 4]);
        assert_eq!(parse_sections("7").unwrap(), vec![6]);
        assert_eq!(parse_sections(" 2 , 4-5 ").unwrap(), vec![1, 3, 4]);
    }

    #[test]
    fn reversed_range() {
        assert_eq!(parse_sections("3-1").unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn zero_is_not_a_position() {
        assert!(matches!(
            parse_sections("0"),
            Err(Error::MalformedSection { section, .. }) if section == "0"
        ));
        assert!(parse_sections("0-2").is_err());
    }

    #[test]
    fn unparsable_sections() {
        assert!(matches!(parse_sections("a"), Err(Error::MalformedSection { .. })));
        assert!(parse_sections("").is_err());
        assert!(parse_sections("1,,2").is_err());
        assert!(parse_sections("-3").is_err());
        assert!(parse_sections("1-2-3").is_err());
    }

    #[test]
    fn coverage_errors_name_the_position() {
        assert_eq!(
            check_coverage(4, ["1-2", "3-5"]).unwrap_err(),
            Error::SectionOutOfRange(5)
        );
        assert_eq!(
            check_coverage(4, ["1-3", "3-4"]).unwrap_err(),
            Error::DoublyDefinedPosition(3)
        );
        assert_eq!(
            check_coverage(4, ["1", "3-4"]).unwrap_err(),
            Error::UndefinedPosition(2)
        );
        assert!(check_coverage(4, ["4,1", "2-3"]).is_ok());
    }

    #[test]
    fn huge_ranges_are_out_of_range() {
        assert_eq!(
            check_coverage(3, ["1-3", "4-18446744073709551615"]).unwrap_err(),
            Error::SectionOutOfRange(4)
        );
        assert_eq!(
            parse_sections_within("18446744073709551615-1", 3).unwrap_err(),
            Error::SectionOutOfRange(4)
        );
        assert_eq!(
            check_coverage(usize::MAX, ["1-18446744073709551614"]).unwrap_err(),
            Error::UndefinedPosition(usize::MAX)
        );
    }

    #[test]
    fn smallest_double_is_reported() {
        assert_eq!(
            check_coverage(6, ["5-6,1-2", "2-5"]).unwrap_err(),
            Error::DoublyDefinedPosition(2)
        );
    }

    #[test]
    fn format() {
        assert_eq!(format_sections(&[0, 1, 2, 4]), "1-3,5");
        assert_eq!(format_sections(&[3]), "4");
        assert_eq!(format_sections(&[]), "");
        assert_eq!(format_sections(&[2, 1, 1]), "2-3");
    }

    #[quickcheck]
    fn format_then_parse(positions: Vec<u8>) -> bool {
        if positions.is_empty() {
            return true;
        }
        let positions: Vec<usize> = positions.into_iter().map(usize::from).collect();
        let parsed = parse_sections(&format_sections(&positions)).unwrap();
        parsed == positions.into_iter().sorted().dedup().collect::<Vec<_>>()
    }
}
