use std::fmt;
use std::str::FromStr;

use simple_error::{SimpleError, bail};

/// Orientation of a breakend, or of one end of a graph adjacency
///
/// 'Forward' (+1) means the sequence to the left of the breakend is retained, so the novel
/// adjacency leaves its segment from the segment end, toward increasing coordinate. This is the
/// orientation of the left side of a simple deletion. 'Reverse' (-1) leaves from the segment
/// start.
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    pub fn sign(&self) -> i8 {
        match self {
            Orientation::Forward => 1,
            Orientation::Reverse => -1,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.sign())
    }
}

impl FromStr for Orientation {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "+1" => Ok(Orientation::Forward),
            "-1" => Ok(Orientation::Reverse),
            _ => bail!("Unexpected breakend orientation '{}', expected 1 or -1", s),
        }
    }
}

/// Structural variant classification as reported by the upstream caller
///
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum SvType {
    Bnd,
    Del,
    Dup,
    Ins,
    Inv,
    Sgl,
}

/// A single breakend, one side of a structural variant
///
/// Positions are 1-based, matching the copy number segment coordinate convention, so that a
/// 'Forward' breakend position is the last base of its segment and a 'Reverse' breakend position
/// is the first base of its segment.
///
#[derive(Clone, PartialEq)]
pub struct Breakend {
    pub chrom: String,
    pub pos: i64,
    pub orientation: Orientation,
}

impl fmt::Debug for Breakend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Breakend: {}:{} orientation: {}",
            self.chrom, self.pos, self.orientation
        )
    }
}

#[derive(Clone, PartialEq)]
pub struct StructuralVariant {
    pub id: String,
    pub sv_type: SvType,
    pub start: Breakend,

    /// None for single breakends
    pub end: Option<Breakend>,

    /// Ploidy estimate of the variant junction
    pub ploidy: f64,
}

impl StructuralVariant {
    pub fn is_single_breakend(&self) -> bool {
        self.end.is_none()
    }
}

impl fmt::Debug for StructuralVariant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "StructuralVariant: {} {}\n start: {:?}\n end: {:?}\n ploidy: {:.2}",
            self.id, self.sv_type, self.start, self.end, self.ploidy
        )
    }
}
