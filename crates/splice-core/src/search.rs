use crate::feature::Strand;
use crate::operations::reverse_complement;

/// A recognition site found in a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteHit {
    /// First base of the site as read on the top strand.
    pub start: usize,
    /// Strand the site reads 5'→3' on.
    pub strand: Strand,
}

/// Every occurrence of `site` on either strand, overlapping hits included,
/// ordered by start. Case-insensitive. On circular sequences a hit may run
/// across the origin.
pub fn find_sites(sequence: &str, site: &str, is_circular: bool) -> Vec<SiteHit> {
    let bases = sequence.to_ascii_uppercase().into_bytes();
    let forward = site.to_ascii_uppercase().into_bytes();
    let n = bases.len();
    if forward.is_empty() || n == 0 {
        return Vec::new();
    }

    let mut haystack = bases;
    if is_circular {
        let tail = forward.len().min(n) - 1;
        haystack.extend_from_within(..tail);
    }

    let reverse = reverse_complement(site).to_ascii_uppercase().into_bytes();
    let mut hits = Vec::new();
    for (start, window) in haystack.windows(forward.len()).enumerate().take(n) {
        if window == forward.as_slice() {
            hits.push(SiteHit {
                start,
                strand: Strand::Forward,
            });
        } else if window == reverse.as_slice() {
            hits.push(SiteHit {
                start,
                strand: Strand::Reverse,
            });
        }
    }
    hits
}
