//! Assigning sequenced plasmids to syntax parts.
//!
//! The record is digested with the syntax's assembly enzyme and each part is
//! compared against every released fragment, read from both strands. A
//! fragment that still carries a recognition site is the leftover vector,
//! not a part, and is never a candidate. A part
//! matches a fragment when the fragment carries the part's overhangs, its
//! inside sequences sit next to them, and any declared codon frames agree.

use splice_core::enzyme::{EnzymeError, Fragment, RestrictionEnzyme};
use splice_core::feature::Feature;
use splice_core::sequence::Sequence;
use thiserror::Error;
use tracing::debug;

use crate::schema::{Part, Syntax};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("syntax '{syntax}' uses an unsupported assembly enzyme '{enzyme}'")]
    UnknownEnzyme { syntax: String, enzyme: String },
}

/// A part found in a record.
#[derive(Debug, Clone)]
pub struct PartMatch<'a> {
    pub part: &'a Part,
    pub fragment: Fragment,
    /// Longest annotation overlapping the fragment, `source` excluded.
    pub longest_feature: Option<Feature>,
}

impl PartMatch<'_> {
    pub fn key(&self) -> String {
        self.part.key()
    }

    /// Display name of the longest overlapping feature.
    pub fn feature_name(&self) -> Option<&str> {
        self.longest_feature.as_ref().map(Feature::display_name)
    }
}

/// Outcome of matching one record against a syntax.
#[derive(Debug, Clone)]
pub enum Assignment<'a> {
    Unassigned,
    Assigned(PartMatch<'a>),
    Ambiguous(Vec<PartMatch<'a>>),
}

impl<'a> Assignment<'a> {
    pub fn from_matches(mut matches: Vec<PartMatch<'a>>) -> Self {
        match matches.len() {
            0 => Assignment::Unassigned,
            1 => Assignment::Assigned(matches.remove(0)),
            _ => Assignment::Ambiguous(matches),
        }
    }
}

/// Matches records against one syntax, reusing its enzyme lookup.
#[derive(Debug)]
pub struct PartMatcher<'a> {
    syntax: &'a Syntax,
    enzyme: RestrictionEnzyme,
}

impl<'a> PartMatcher<'a> {
    pub fn new(syntax: &'a Syntax) -> Result<Self, MatchError> {
        let enzyme = RestrictionEnzyme::by_name(&syntax.assembly_enzyme).map_err(
            |EnzymeError::Unknown(enzyme)| MatchError::UnknownEnzyme {
                syntax: syntax.syntax_name.clone(),
                enzyme,
            },
        )?;
        Ok(Self { syntax, enzyme })
    }

    pub fn enzyme(&self) -> &RestrictionEnzyme {
        &self.enzyme
    }

    /// Every part of the syntax found in `record`, in syntax order.
    pub fn match_parts(&self, record: &Sequence) -> Vec<PartMatch<'a>> {
        let fragments = self.enzyme.digest(record);
        let released = fragments.len();
        let views: Vec<Fragment> = fragments
            .into_iter()
            .filter(|f| !self.enzyme.recognises(f))
            .flat_map(|f| {
                let rc = f.reverse_complement();
                [f, rc]
            })
            .collect();
        debug!(
            record = %record.name,
            enzyme = %self.enzyme.name,
            fragments = released,
            candidates = views.len() / 2,
            "digested record"
        );

        self.syntax
            .parts
            .iter()
            .filter_map(|part| {
                let fragment = views.iter().find(|v| fragment_matches(part, v))?;
                Some(PartMatch {
                    part,
                    fragment: fragment.clone(),
                    longest_feature: longest_feature(record, fragment).cloned(),
                })
            })
            .collect()
    }

    pub fn assign(&self, record: &Sequence) -> Assignment<'a> {
        Assignment::from_matches(self.match_parts(record))
    }
}

/// Whether `fragment` (in its own orientation) realises `part`.
pub fn fragment_matches(part: &Part, fragment: &Fragment) -> bool {
    if fragment.overhang_len != part.left_overhang.as_str().len()
        || fragment.left_overhang() != part.left_overhang.as_str()
        || fragment.right_overhang() != part.right_overhang.as_str()
    {
        return false;
    }

    let interior = fragment.interior();
    if interior.len() < part.left_inside.len() + part.right_inside.len()
        || !interior.starts_with(&part.left_inside) || !interior.ends_with(&part.right_inside) {
        return false;
    }

    if part.left_codon_start > 0 && part.right_codon_start > 0 {
        let left_origin = part.left_codon_start as usize - 1;
        let right_origin = fragment.len - fragment.overhang_len + part.right_codon_start as usize - 1;
        if left_origin.abs_diff(right_origin) % 3 != 0 {
            return false;
        }
    }
    true
}

/// Longest non-`source` feature overlapping `fragment`; ties keep the
/// earlier feature.
pub fn longest_feature<'r>(record: &'r Sequence, fragment: &Fragment) -> Option<&'r Feature> {
    let covered = fragment.covered_ranges(record.len());
    record
        .features
        .iter()
        .filter(|f| !f.is_source())
        .filter(|f| covered.iter().any(|&(s, e)| f.location.overlaps(s, e)))
        .fold(None, |best: Option<&Feature>, f| match best {
            Some(b) if b.len() >= f.len() => Some(b),
            _ => Some(f),
        })
}
