use splice_core::{
    feature::{Feature, Location, Qualifier, Strand},
    sequence::{Sequence, SequenceMetadata, Topology},
};

use crate::ParseError;

const QUALIFIER_INDENT: &str = "                     ";

/// Parse a GenBank record into a Sequence.
///
/// Only the first record of a multi-record file is read.
pub fn parse(input: &str) -> Result<Sequence, ParseError> {
    let lines: Vec<&str> = input.lines().collect();
    let mut seq = Sequence::new("", "", Topology::Linear);
    let mut saw_locus = false;
    let mut saw_origin = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.starts_with("LOCUS") {
            parse_locus_line(line, &mut seq);
            saw_locus = true;
        } else if line.starts_with("DEFINITION") {
            let mut def = header_value(line).to_string();
            i += 1;
            while i < lines.len() && lines[i].starts_with("            ") {
                def.push(' ');
                def.push_str(lines[i].trim());
                i += 1;
            }
            seq.description = def.trim_end_matches('.').to_string();
            continue;
        } else if line.starts_with("ACCESSION") {
            seq.metadata.accession = Some(header_value(line).to_string());
        } else if line.starts_with("SOURCE") {
            seq.metadata.source = Some(header_value(line).to_string());
            if let Some(next) = lines.get(i + 1) {
                if let Some(organism) = next.trim_start().strip_prefix("ORGANISM") {
                    seq.metadata.organism = Some(organism.trim().to_string());
                    i += 1;
                }
            }
        } else if line.starts_with("FEATURES") {
            i += 1;
            parse_features(&lines, &mut i, &mut seq.features);
            continue;
        } else if line.starts_with("ORIGIN") {
            i += 1;
            seq.sequence = parse_origin(&lines, &mut i);
            saw_origin = true;
            continue;
        } else if line.starts_with("//") && saw_locus {
            break;
        }

        i += 1;
    }

    if !saw_locus {
        return Err(ParseError::InvalidFormat("missing LOCUS line".to_string()));
    }
    if !saw_origin || seq.sequence.is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "record '{}' has no sequence",
            seq.name
        )));
    }

    Ok(seq)
}

fn header_value(line: &str) -> &str {
    line.get(12..).unwrap_or("").trim()
}

fn parse_locus_line(line: &str, seq: &mut Sequence) {
    // LOCUS       name    length bp    type    topology    division    date
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.len() >= 2 {
        seq.name = parts[1].to_string();
    }

    for part in &parts {
        match part.to_lowercase().as_str() {
            "circular" => seq.topology = Topology::Circular,
            "linear" => seq.topology = Topology::Linear,
            _ => {}
        }
    }

    seq.metadata.molecule_type = parts
        .iter()
        .skip(2)
        .find(|p| {
            let lower = p.to_lowercase();
            lower.contains("dna") || lower.contains("rna")
        })
        .map(|p| p.to_string());

    if parts.len() >= 6 {
        seq.metadata.division = parts[4..]
            .iter()
            .find(|p| p.len() == 3 && p.chars().all(|c| c.is_ascii_uppercase()))
            .map(|p| p.to_string());
    }

    if let Some(last) = parts.last() {
        if last.contains('-') && last.len() >= 9 {
            seq.metadata.date = Some(last.to_string());
        }
    }
}

fn parse_features(lines: &[&str], i: &mut usize, features: &mut Vec<Feature>) {
    while *i < lines.len() {
        let line = lines[*i];

        if line.starts_with("ORIGIN") || line.starts_with("//") || line.starts_with("CONTIG") {
            break;
        }
        // Next top-level section
        if line.starts_with(char::is_alphabetic) {
            break;
        }

        let is_key_line =
            line.len() >= 21 && line.starts_with("     ") && !line[5..].starts_with(' ');
        if !is_key_line {
            *i += 1;
            continue;
        }

        let key = line[5..21].trim();
        let mut location_str = line[21..].trim().to_string();
        *i += 1;
        while *i < lines.len() && is_continuation(lines[*i]) {
            location_str.push_str(lines[*i].trim());
            *i += 1;
        }

        let (location, strand) = parse_location(&location_str);
        features.push(Feature {
            key: key.to_string(),
            location,
            strand,
            qualifiers: parse_qualifiers(lines, i),
        });
    }
}

/// An indented line that does not open a new qualifier.
fn is_continuation(line: &str) -> bool {
    line.starts_with(QUALIFIER_INDENT) && !line[21..].trim_start().starts_with('/')
}

fn parse_qualifiers(lines: &[&str], i: &mut usize) -> Vec<Qualifier> {
    let mut qualifiers = Vec::new();
    while *i < lines.len()
        && lines[*i].starts_with(QUALIFIER_INDENT)
        && lines[*i][21..].trim_start().starts_with('/')
    {
        let content = &lines[*i][21..].trim()[1..];
        *i += 1;

        match content.split_once('=') {
            Some((key, value)) => {
                let mut value = value.to_string();
                while *i < lines.len() && is_continuation(lines[*i]) {
                    value.push(' ');
                    value.push_str(lines[*i].trim());
                    *i += 1;
                }
                qualifiers.push(Qualifier {
                    key: key.to_string(),
                    value: value.trim_matches('"').to_string(),
                });
            }
            // flag qualifier, e.g. /pseudo
            None => qualifiers.push(Qualifier {
                key: content.to_string(),
                value: String::new(),
            }),
        }
    }
    qualifiers
}

/// Reads a location string into top-strand spans. Strand comes from an outer
/// `complement(...)`; `join`/`order` keep their spans in listed order.
/// Anything unreadable collapses to an empty span at the origin.
fn parse_location(loc_str: &str) -> (Location, Strand) {
    let text = loc_str.trim();
    let (text, strand) = match unwrap_call(text, "complement") {
        Some(inner) => (inner, Strand::Reverse),
        None => (text, Strand::Forward),
    };

    let listed = unwrap_call(text, "join").or_else(|| unwrap_call(text, "order"));
    let spans: Vec<(usize, usize)> = match listed {
        Some(inner) => inner
            .split(',')
            .filter_map(|piece| parse_span(strip_complement(piece.trim())))
            .collect(),
        None => parse_span(text).into_iter().collect(),
    };

    let location = match spans.len() {
        0 => Location::span(0, 0),
        1 => Location::span(spans[0].0, spans[0].1),
        _ => Location::join(spans),
    };
    (location, strand)
}

fn unwrap_call<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?.strip_prefix('(')?.strip_suffix(')')
}

fn strip_complement(text: &str) -> &str {
    unwrap_call(text, "complement").unwrap_or(text)
}

/// `12..40`, `<12..>40` or a lone base `12`, 1-based inclusive.
fn parse_span(text: &str) -> Option<(usize, usize)> {
    let bare = text.replace(['<', '>'], "");
    let (first, last) = bare.split_once("..").unwrap_or((bare.as_str(), bare.as_str()));
    let first: usize = first.trim().parse().ok()?;
    let last: usize = last.trim().parse().ok()?;
    Some((first.saturating_sub(1), last))
}

fn parse_origin(lines: &[&str], i: &mut usize) -> String {
    let mut seq = String::new();

    while *i < lines.len() {
        let line = lines[*i];
        if line.starts_with("//") {
            break;
        }
        // "        1 atcgatcg atcgatcg ..."
        seq.extend(
            line.chars()
                .filter(|c| c.is_ascii_alphabetic())
                .map(|c| c.to_ascii_uppercase()),
        );
        *i += 1;
    }

    seq
}

/// Serialize a Sequence back to GenBank format
pub fn serialize(seq: &Sequence) -> String {
    let SequenceMetadata {
        accession,
        organism,
        molecule_type,
        division,
        date,
        source,
    } = &seq.metadata;

    let mut out = format!(
        "LOCUS       {:<16} {} bp    {}     {}       {} {}\n",
        seq.name,
        seq.len(),
        molecule_type.as_deref().unwrap_or("DNA"),
        seq.topology,
        division.as_deref().unwrap_or("SYN"),
        date.as_deref().unwrap_or("01-JAN-2026"),
    );

    if !seq.description.is_empty() {
        out.push_str(&format!("DEFINITION  {}.\n", seq.description));
    }
    if let Some(acc) = accession {
        out.push_str(&format!("ACCESSION   {}\n", acc));
    }
    if let Some(src) = source {
        out.push_str(&format!("SOURCE      {}\n", src));
        if let Some(org) = organism {
            out.push_str(&format!("  ORGANISM  {}\n", org));
        }
    }

    if !seq.features.is_empty() {
        out.push_str("FEATURES             Location/Qualifiers\n");

        for feat in &seq.features {
            out.push_str(&format!(
                "     {:<16}{}\n",
                feat.key,
                serialize_location(&feat.location, feat.strand)
            ));

            for q in &feat.qualifiers {
                if q.value.is_empty() {
                    out.push_str(&format!("{}/{}\n", QUALIFIER_INDENT, q.key));
                } else if q.value.parse::<f64>().is_ok() {
                    out.push_str(&format!("{}/{}={}\n", QUALIFIER_INDENT, q.key, q.value));
                } else {
                    out.push_str(&format!("{}/{}=\"{}\"\n", QUALIFIER_INDENT, q.key, q.value));
                }
            }
        }
    }

    out.push_str("ORIGIN\n");
    let lower = seq.sequence.to_lowercase();
    for (chunk_idx, chunk) in lower.as_bytes().chunks(60).enumerate() {
        out.push_str(&format!("{:>9}", chunk_idx * 60 + 1));
        for block in chunk.chunks(10) {
            out.push(' ');
            out.push_str(&String::from_utf8_lossy(block));
        }
        out.push('\n');
    }

    out.push_str("//\n");
    out
}

fn serialize_location(loc: &Location, strand: Strand) -> String {
    let spans: Vec<String> = loc
        .spans()
        .iter()
        .map(|&(s, e)| {
            if e == s + 1 {
                e.to_string()
            } else {
                format!("{}..{}", s + 1, e)
            }
        })
        .collect();
    let body = if loc.is_joined() {
        format!("join({})", spans.join(","))
    } else {
        spans.concat()
    };

    match strand {
        Strand::Forward => body,
        Strand::Reverse => format!("complement({body})"),
    }
}
