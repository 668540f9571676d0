//! Syntax inheritance: aliasing an existing syntax or extending it with
//! extra parts.

use crate::schema::{Syntax, SyntaxDocument, ValidationError};

/// Effective syntax of an entry that reuses `parent` unchanged.
pub fn alias(parent: &Syntax) -> Syntax {
    parent.clone()
}

/// Combine a partial definition with the syntax it extends.
///
/// Parts from `sub` come first, followed by the parent's, and every part is
/// renumbered `1..=N` in that order. Overhang names from `sub` take priority;
/// the parent only contributes names for overhangs `sub` leaves unnamed. The
/// descriptive fields come from `sub`. The result is validated before it is
/// returned.
pub fn extend(sub: SyntaxDocument, parent: &Syntax) -> Result<Syntax, ValidationError> {
    let SyntaxDocument {
        syntax_name,
        assembly_enzyme,
        domestication_enzyme,
        related_dois,
        submitters,
        mut overhang_names,
        mut parts,
    } = sub;

    for (overhang, name) in &parent.overhang_names {
        let named = overhang_names
            .keys()
            .any(|key| key.eq_ignore_ascii_case(overhang.as_str()));
        if !named {
            overhang_names.insert(overhang.to_string(), name.clone());
        }
    }

    parts.extend(SyntaxDocument::from(parent).parts);
    for (id, part) in (1..).zip(parts.iter_mut()) {
        part.id = id;
    }

    SyntaxDocument {
        syntax_name,
        assembly_enzyme,
        domestication_enzyme,
        related_dois,
        submitters,
        overhang_names,
        parts,
    }
    .validate()
}
