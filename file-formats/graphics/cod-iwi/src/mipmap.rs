use crate::error::{IwiError, Result};

/// Number of mipmap offset markers after the info block
pub const MIPMAP_MARKERS: usize = 4;

/// Byte range of one mipmap level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mipmap {
    pub offset: u64,
    pub size: u64,
}

/// Pairs the offset markers into byte ranges.
///
/// Marker 0 runs to the end of the file, the last marker's level starts at
/// `data_start` and ends at that marker, and each interior marker ends at
/// the previous one. Sizes can come out negative for unused markers.
pub fn mipmap_ranges(
    markers: &[i32; MIPMAP_MARKERS],
    data_start: u64,
    file_size: u64,
) -> [(i64, i64); MIPMAP_MARKERS] {
    let first = data_start as i64;
    let mut ranges = [(0i64, 0i64); MIPMAP_MARKERS];
    for (i, range) in ranges.iter_mut().enumerate() {
        let marker = i64::from(markers[i]);
        *range = if i == 0 {
            (marker, file_size as i64 - marker)
        } else if i == MIPMAP_MARKERS - 1 {
            (first, marker - first)
        } else {
            (marker, i64::from(markers[i - 1]) - marker)
        };
    }
    ranges
}

/// Picks the largest level; on ties the earliest marker wins.
pub fn select_largest(
    markers: &[i32; MIPMAP_MARKERS],
    data_start: u64,
    file_size: u64,
) -> Result<Mipmap> {
    let mut best: Option<(i64, i64)> = None;
    for (offset, size) in mipmap_ranges(markers, data_start, file_size) {
        if offset < 0 || size <= 0 {
            continue;
        }
        if best.is_none_or(|(_, best_size)| size > best_size) {
            best = Some((offset, size));
        }
    }

    let (offset, size) = best.ok_or(IwiError::EmptyTexture)?;
    let mipmap = Mipmap {
        offset: offset as u64,
        size: size as u64,
    };
    if mipmap.offset + mipmap.size > file_size {
        return Err(IwiError::OutOfBounds {
            offset: mipmap.offset,
            size: mipmap.size,
            file_size,
        });
    }
    Ok(mipmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case([40, 36, 32, 30], 100, Mipmap { offset: 40, size: 60 } ; "first marker")]
    #[test_case([90, 40, 35, 30], 100, Mipmap { offset: 40, size: 50 } ; "interior marker")]
    #[test_case([100, 99, 98, 90], 100, Mipmap { offset: 28, size: 62 } ; "last marker")]
    fn test_selects_largest(markers: [i32; 4], file_size: u64, expected: Mipmap) {
        assert_eq!(select_largest(&markers, 28, file_size).unwrap(), expected);
    }

    #[test]
    fn test_ranges_follow_pairing_rule() {
        let ranges = mipmap_ranges(&[52, 44, 36, 36], 28, 60);
        assert_eq!(ranges, [(52, 8), (44, 8), (36, 8), (28, 8)]);
    }

    #[test]
    fn test_tie_prefers_first_marker() {
        let mipmap = select_largest(&[52, 44, 36, 36], 28, 60).unwrap();
        assert_eq!(mipmap, Mipmap { offset: 52, size: 8 });
    }

    #[test]
    fn test_all_empty_is_an_error() {
        let err = select_largest(&[28, 28, 28, 28], 28, 28).unwrap_err();
        assert!(matches!(err, IwiError::EmptyTexture));
    }

    #[test]
    fn test_out_of_bounds_level() {
        // Marker 0 points past the end, so level 1 runs beyond the file
        let err = select_largest(&[200, 10, 5, 5], 28, 40).unwrap_err();
        assert!(matches!(
            err,
            IwiError::OutOfBounds {
                offset: 10,
                size: 190,
                file_size: 40
            }
        ));
    }
}
