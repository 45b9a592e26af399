use std::fmt;

/// Describes how a copy number segment boundary was established
///
/// 'None' is a plain copy number transition with no supporting structural variant.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum SegmentSupport {
    Bnd,
    Del,
    Dup,
    Ins,
    Inv,
    Sgl,
    Multiple,
    Centromere,
    Telomere,
    None,
}

/// A copy number segment on one chromosome
///
/// Coordinates are 1-based and fully closed, [start,end], following the convention of the copy
/// number segment input.
///
#[derive(Clone, PartialEq)]
pub struct CopyNumberSegment {
    pub chrom_index: usize,
    pub start: i64,
    pub end: i64,

    /// Number of bases covered by the segment. This is `end - start + 1` for an input segment,
    /// and the sum of the constituent sizes for a merged segment, so any gaps between merged
    /// segments are excluded.
    pub covered_size: i64,

    /// Average tumor copy number over the segment, used as the segment ploidy
    pub copy_number: f64,

    pub baf_count: u32,
    pub observed_baf: f64,
    pub depth_window_count: u32,
    pub start_support: SegmentSupport,
    pub end_support: SegmentSupport,
}

impl CopyNumberSegment {
    pub fn size(&self) -> i64 {
        self.covered_size
    }

    /// Return true if pos falls within the segment
    ///
    pub fn contains_pos(&self, pos: i64) -> bool {
        pos >= self.start && pos <= self.end
    }

    /// True if merging `self` with the segment immediately to its right would span a centromere
    ///
    pub fn is_centromere_boundary(&self, right: &Self) -> bool {
        self.end_support == SegmentSupport::Centromere
            || right.start_support == SegmentSupport::Centromere
    }

    /// Merge this segment with the segment immediately to its right
    ///
    /// Copy number is averaged by segment length and BAF is averaged by BAF count. The merged
    /// segment takes its start support from `self` and end support from `right`.
    ///
    pub fn merge_right(&self, right: &Self) -> Self {
        assert_eq!(self.chrom_index, right.chrom_index);
        assert!(self.end < right.start);

        let left_size = self.size() as f64;
        let right_size = right.size() as f64;
        let copy_number = (self.copy_number * left_size + right.copy_number * right_size)
            / (left_size + right_size);

        let baf_count = self.baf_count + right.baf_count;
        let observed_baf = if baf_count > 0 {
            (self.observed_baf * self.baf_count as f64
                + right.observed_baf * right.baf_count as f64)
                / baf_count as f64
        } else {
            (self.observed_baf * left_size + right.observed_baf * right_size)
                / (left_size + right_size)
        };

        Self {
            chrom_index: self.chrom_index,
            start: self.start,
            end: right.end,
            covered_size: self.covered_size + right.covered_size,
            copy_number,
            baf_count,
            observed_baf,
            depth_window_count: self.depth_window_count + right.depth_window_count,
            start_support: self.start_support,
            end_support: right.end_support,
        }
    }
}

impl fmt::Debug for CopyNumberSegment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "CopyNumberSegment: {}:{}-{} cn: {:.2} support: {}/{}",
            self.chrom_index,
            self.start,
            self.end,
            self.copy_number,
            self.start_support,
            self.end_support
        )
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;

    /// Simple segment constructor for unit tests
    pub fn get_test_segment(
        chrom_index: usize,
        start: i64,
        end: i64,
        copy_number: f64,
    ) -> CopyNumberSegment {
        CopyNumberSegment {
            chrom_index,
            start,
            end,
            covered_size: end - start + 1,
            copy_number,
            baf_count: 10,
            observed_baf: 0.5,
            depth_window_count: 10,
            start_support: SegmentSupport::None,
            end_support: SegmentSupport::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::get_test_segment;
    use super::*;

    #[test]
    fn test_support_parse() {
        assert_eq!(
            "CENTROMERE".parse::<SegmentSupport>().unwrap(),
            SegmentSupport::Centromere
        );
        assert_eq!("NONE".parse::<SegmentSupport>().unwrap(), SegmentSupport::None);
        assert_eq!(SegmentSupport::Telomere.to_string(), "TELOMERE");
    }

    #[test]
    fn test_merge_right() {
        let mut left = get_test_segment(0, 1, 100, 2.0);
        left.start_support = SegmentSupport::Telomere;
        left.baf_count = 30;
        left.observed_baf = 0.5;
        let mut right = get_test_segment(0, 101, 400, 4.0);
        right.end_support = SegmentSupport::Dup;
        right.baf_count = 10;
        right.observed_baf = 0.7;

        let merged = left.merge_right(&right);
        assert_eq!(merged.start, 1);
        assert_eq!(merged.end, 400);
        assert_eq!(merged.size(), 400);
        approx::assert_ulps_eq!(merged.copy_number, 3.5, max_ulps = 4);
        approx::assert_ulps_eq!(merged.observed_baf, 0.55, max_ulps = 4);
        assert_eq!(merged.baf_count, 40);
        assert_eq!(merged.depth_window_count, 20);
        assert_eq!(merged.start_support, SegmentSupport::Telomere);
        assert_eq!(merged.end_support, SegmentSupport::Dup);
    }

    /// Merging a run of segments should give the length-weighted copy number regardless of the
    /// merge order
    #[test]
    fn test_merge_order_independence() {
        let s1 = get_test_segment(0, 1, 50, 2.0);
        let s2 = get_test_segment(0, 51, 200, 3.0);
        let s3 = get_test_segment(0, 201, 230, 1.0);

        let left_first = s1.merge_right(&s2).merge_right(&s3);
        let right_first = s1.merge_right(&s2.merge_right(&s3));

        let expected_cn = (50.0 * 2.0 + 150.0 * 3.0 + 30.0 * 1.0) / 230.0;
        assert_eq!(left_first.size(), 230);
        assert_eq!(right_first.size(), 230);
        approx::assert_abs_diff_eq!(left_first.copy_number, expected_cn, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(right_first.copy_number, expected_cn, epsilon = 1e-12);
    }

    #[test]
    fn test_merge_across_gap() {
        let s1 = get_test_segment(0, 1, 100, 2.0);
        let s2 = get_test_segment(0, 1001, 1100, 4.0);
        let s3 = get_test_segment(0, 1101, 1200, 0.0);

        let left_first = s1.merge_right(&s2).merge_right(&s3);
        let right_first = s1.merge_right(&s2.merge_right(&s3));

        for merged in [&left_first, &right_first] {
            assert_eq!((merged.start, merged.end), (1, 1200));
            assert_eq!(merged.size(), 300);
            approx::assert_abs_diff_eq!(merged.copy_number, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_centromere_boundary() {
        let mut left = get_test_segment(0, 1, 100, 2.0);
        let right = get_test_segment(0, 101, 200, 2.0);
        assert!(!left.is_centromere_boundary(&right));
        left.end_support = SegmentSupport::Centromere;
        assert!(left.is_centromere_boundary(&right));
    }
}
