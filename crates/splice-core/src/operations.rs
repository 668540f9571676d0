/// Complement a single DNA base (IUPAC aware)
pub fn complement_base(base: char) -> char {
    match base.to_ascii_uppercase() {
        'A' => 'T',
        'T' => 'A',
        'G' => 'C',
        'C' => 'G',
        'R' => 'Y',
        'Y' => 'R',
        'S' => 'S',
        'W' => 'W',
        'K' => 'M',
        'M' => 'K',
        'B' => 'V',
        'V' => 'B',
        'D' => 'H',
        'H' => 'D',
        'N' => 'N',
        other => other,
    }
}

/// Reverse complement of a DNA sequence
pub fn reverse_complement(seq: &str) -> String {
    seq.chars().rev().map(complement_base).collect()
}

/// True when every character is one of A, C, G, T (either case).
///
/// Ambiguity codes such as `N` are rejected. The empty string passes.
pub fn is_unambiguous_dna(seq: &str) -> bool {
    seq.chars()
        .all(|c| matches!(c.to_ascii_uppercase(), 'A' | 'C' | 'G' | 'T'))
}
