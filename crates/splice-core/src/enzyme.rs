//! Type IIS restriction enzymes and the digests used by modular cloning.
//!
//! A Type IIS enzyme recognises a non-palindromic site and cuts a fixed
//! distance downstream of it, leaving a short 5' overhang whose bases are
//! unrelated to the site itself. Golden Gate style assembly standards encode
//! part boundaries in those overhangs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::operations::reverse_complement;
use crate::feature::Strand;
use crate::search::find_sites;
use crate::sequence::Sequence;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnzymeError {
    #[error("Unknown assembly enzyme: {0}")]
    Unknown(String),
}

/// name, recognition site, top-strand cut offset from the site start, overhang length
const TYPE_IIS_ENZYMES: &[(&str, &str, usize, usize)] = &[
    ("BsaI", "GGTCTC", 7, 4),
    ("Eco31I", "GGTCTC", 7, 4),
    ("BsmBI", "CGTCTC", 7, 4),
    ("Esp3I", "CGTCTC", 7, 4),
    ("BbsI", "GAAGAC", 8, 4),
    ("BpiI", "GAAGAC", 8, 4),
    ("SapI", "GCTCTTC", 8, 3),
    ("BspQI", "GCTCTTC", 8, 3),
    ("PaqCI", "CACCTGC", 11, 4),
    ("AarI", "CACCTGC", 11, 4),
    ("BtgZI", "GCGATG", 16, 4),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionEnzyme {
    pub name: String,
    /// Recognition site on the top strand.
    pub site: String,
    /// Top-strand cut, counted from the first base of the site.
    pub cut: usize,
    /// Length of the 5' overhang left by the staggered cut.
    pub overhang: usize,
}

/// A staggered cut, identified by where its overhang starts on the top strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutSite {
    pub overhang_start: usize,
    /// Recognition site read on the top strand (cut lies downstream of it).
    pub forward_strand: bool,
}

/// A digestion product, including both of its single-stranded overhangs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Start of the left overhang on the parent's top strand.
    pub start: usize,
    /// Number of bases from the first base of the left overhang to the last
    /// base of the right overhang.
    pub len: usize,
    pub overhang_len: usize,
    /// Bases read 5'→3' in this fragment's orientation.
    pub sequence: String,
    /// Read from the parent's bottom strand.
    pub reversed: bool,
}

impl RestrictionEnzyme {
    /// Look up a built-in Type IIS enzyme by name (case-insensitive).
    pub fn by_name(name: &str) -> Result<Self, EnzymeError> {
        TYPE_IIS_ENZYMES
            .iter()
            .find(|(n, ..)| n.eq_ignore_ascii_case(name.trim()))
            .map(|&(n, site, cut, overhang)| RestrictionEnzyme {
                name: n.to_string(),
                site: site.to_string(),
                cut,
                overhang,
            })
            .ok_or_else(|| EnzymeError::Unknown(name.to_string()))
    }

    /// All cuts this enzyme makes in `seq`, on both strands.
    ///
    /// On linear records, cuts whose overhang would fall outside the molecule
    /// are dropped.
    pub fn cut_sites(&self, seq: &Sequence) -> Vec<CutSite> {
        let n = seq.len() as isize;
        let site_len = self.site.len() as isize;
        let cut = self.cut as isize;
        let overhang = self.overhang as isize;

        let mut cuts = Vec::new();
        for hit in find_sites(&seq.sequence, &self.site, seq.is_circular()) {
            let start = hit.start as isize;
            let overhang_start = if hit.strand == Strand::Reverse {
                start + site_len - cut - overhang
            } else {
                start + cut
            };

            let overhang_start = if seq.is_circular() {
                overhang_start.rem_euclid(n)
            } else if overhang_start < 0 || overhang_start + overhang > n {
                continue;
            } else {
                overhang_start
            };

            cuts.push(CutSite {
                overhang_start: overhang_start as usize,
                forward_strand: hit.strand == Strand::Forward,
            });
        }
        cuts
    }

    /// Whether `fragment` still contains this enzyme's site on either strand.
    /// Such a fragment is recut in a one-pot reaction and never ends up in
    /// the assembly.
    pub fn recognises(&self, fragment: &Fragment) -> bool {
        !find_sites(&fragment.sequence, &self.site, false).is_empty()
    }

    /// Digest `seq` into fragments, ordered by position on the top strand.
    ///
    /// A circular record with a single cut yields one fragment spanning the
    /// whole molecule. The ends of a linear record are not sticky, so only
    /// fragments bounded by two cuts are returned.
    pub fn digest(&self, seq: &Sequence) -> Vec<Fragment> {
        let mut starts: Vec<usize> = self
            .cut_sites(seq)
            .iter()
            .map(|c| c.overhang_start)
            .collect();
        starts.sort_unstable();
        starts.dedup();

        if starts.is_empty() {
            return Vec::new();
        }

        let n = seq.len();
        let bounds: Vec<(usize, usize)> = if seq.is_circular() {
            starts
                .iter()
                .enumerate()
                .map(|(i, &left)| {
                    let right = starts[(i + 1) % starts.len()];
                    let span = if right > left { right - left } else { right + n - left };
                    (left, span)
                })
                .collect()
        } else {
            starts.windows(2).map(|w| (w[0], w[1] - w[0])).collect()
        };

        bounds
            .into_iter()
            // overhangs of neighbouring cuts must not overlap
            .filter(|&(_, span)| span >= self.overhang)
            .map(|(start, span)| {
                let len = span + self.overhang;
                Fragment {
                    start,
                    len,
                    overhang_len: self.overhang,
                    sequence: seq.slice_wrapping(start, len),
                    reversed: false,
                }
            })
            .collect()
    }
}

impl Fragment {
    pub fn left_overhang(&self) -> &str {
        &self.sequence[..self.overhang_len]
    }

    pub fn right_overhang(&self) -> &str {
        &self.sequence[self.len - self.overhang_len..]
    }

    /// Bases between the two overhangs.
    pub fn interior(&self) -> &str {
        &self.sequence[self.overhang_len..self.len - self.overhang_len]
    }

    /// The same fragment read from the opposite strand.
    pub fn reverse_complement(&self) -> Fragment {
        Fragment {
            sequence: reverse_complement(&self.sequence),
            reversed: !self.reversed,
            ..self.clone()
        }
    }

    /// Ranges of the parent's top strand covered by this fragment.
    pub fn covered_ranges(&self, parent_len: usize) -> Vec<(usize, usize)> {
        if self.len >= parent_len {
            vec![(0, parent_len)]
        } else if self.start + self.len <= parent_len {
            vec![(self.start, self.start + self.len)]
        } else {
            vec![
                (self.start, parent_len),
                (0, self.start + self.len - parent_len),
            ]
        }
    }
}
