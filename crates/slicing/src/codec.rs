//! Slice naming convention.
//!
//! A slice is stored as `<original_name>.part<index>of<total>`, where
//! `index` and `total` are positive base-10 integers with
//! `1 <= index <= total`.
//!
//! The suffix is anchored to the end of the stored name: everything before
//! the **last** `.part` delimiter is the original name. A name that already
//! looks like a slice therefore survives a second round of slicing, e.g.
//! `notes.part1of2.txt.part3of4` is slice 3 of 4 of `notes.part1of2.txt`.
//!
//! [`encode`] never zero-pads. [`decode`] accepts leading zeros in both
//! numbers (`movie.mkv.part007of120` is slice 7 of 120).

/// Delimiter between the original name and the slice suffix.
pub const SLICE_DELIMITER: &str = ".part";

/// Separator between the slice index and the slice total.
const TOTAL_SEPARATOR: &str = "of";

/// Slice identity decoded from a stored name, borrowing from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceName<'a> {
    /// Name of the logical file this slice belongs to.
    pub original_name: &'a str,
    /// 1-based position of the slice.
    pub index: u32,
    /// Number of slices the logical file was split into.
    pub total: u32,
}

/// Builds the stored name for slice `index` of `total`.
pub fn encode(original_name: &str, index: u32, total: u32) -> String {
    debug_assert!(index >= 1 && index <= total, "slice {index} of {total}");
    format!("{original_name}{SLICE_DELIMITER}{index}{TOTAL_SEPARATOR}{total}")
}

/// Parses a stored name against the slice convention.
///
/// Returns `None` for anything that is not a slice: no suffix, an empty
/// original name, non-digit or zero counts, counts that overflow `u32`,
/// or `index > total`. A `None` here is the normal outcome for ordinary
/// files, never an error.
pub fn decode(stored_name: &str) -> Option<SliceName<'_>> {
    let (original_name, suffix) = stored_name.rsplit_once(SLICE_DELIMITER)?;
    if original_name.is_empty() {
        return None;
    }

    let (index, total) = suffix.split_once(TOTAL_SEPARATOR)?;
    let index = parse_count(index)?;
    let total = parse_count(total)?;
    if index > total {
        return None;
    }

    Some(SliceName {
        original_name,
        index,
        total,
    })
}

/// Parses a strictly positive decimal count made of ASCII digits only.
fn parse_count(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_format() {
        assert_eq!(encode("report.pdf", 1, 3), "report.pdf.part1of3");
        assert_eq!(encode("x", 12, 12), "x.part12of12");
    }

    #[test]
    fn decode_basic() {
        let s = decode("report.pdf.part2of3").unwrap();
        assert_eq!(s.original_name, "report.pdf");
        assert_eq!(s.index, 2);
        assert_eq!(s.total, 3);
    }

    #[test]
    fn roundtrip_assorted_names() {
        let names = [
            "report.pdf",
            "x",
            "no extension",
            "archive.tar.gz",
            "weird.part",
            "a.part1of2",
            "a.partial.bin",
            "中文文件名.mp4",
            "trailing.",
        ];
        for name in names {
            for (index, total) in [(1, 1), (1, 7), (7, 7), (3, 10), (u32::MAX, u32::MAX)] {
                let stored = encode(name, index, total);
                let s = decode(&stored).unwrap_or_else(|| panic!("{stored} did not decode"));
                assert_eq!((s.original_name, s.index, s.total), (name, index, total));
            }
        }
    }

    #[test]
    fn decode_nested_suffix_uses_last_delimiter() {
        let s = decode("notes.part1of2.txt.part3of4").unwrap();
        assert_eq!(s.original_name, "notes.part1of2.txt");
        assert_eq!((s.index, s.total), (3, 4));

        let s = decode("a.part1of2.part2of2").unwrap();
        assert_eq!(s.original_name, "a.part1of2");
        assert_eq!((s.index, s.total), (2, 2));
    }

    #[test]
    fn decode_zero_padded() {
        let s = decode("movie.mkv.part007of120").unwrap();
        assert_eq!(s.original_name, "movie.mkv");
        assert_eq!((s.index, s.total), (7, 120));

        let s = decode("x.part01of02").unwrap();
        assert_eq!((s.index, s.total), (1, 2));
    }

    #[test]
    fn decode_rejects_non_slices() {
        let rejected = [
            "",
            "report.pdf",
            "report.pdf.part",
            "report.pdf.part1",
            "report.pdf.part1of",
            "report.pdf.partof3",
            "report.pdf.part1of3.bak",
            "report.pdf.part0of3",
            "report.pdf.part1of0",
            "report.pdf.part4of3",
            "report.pdf.part-1of3",
            "report.pdf.part+1of3",
            "report.pdf.part 1of3",
            "report.pdf.part1of3 ",
            "report.pdf.part1of3of4",
            "report.pdf.part１of３",
            "report.pdf.part1of99999999999",
            "report.pdf.PART1OF3",
            "report.pdf_part1of3",
            ".part1of3",
        ];
        for name in rejected {
            assert!(decode(name).is_none(), "{name:?} should not decode");
        }
    }

    #[test]
    fn decode_suffix_must_end_the_name() {
        // A slice-looking fragment in the middle is part of the name only.
        assert!(decode("a.part1of2.txt").is_none());
    }
}
