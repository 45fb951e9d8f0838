//! Fix applier.
//!
//! Splices a set of byte-range replacements into a buffer in one
//! left-to-right pass. The result is all-or-nothing: any overlap between two
//! fixes is a conflict and no text is produced.

use crate::types::Fix;

/// Two fixes that cannot both be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixConflict {
    /// Earlier fix (the one reaching furthest at the point of conflict).
    pub first: Fix,
    /// Later fix overlapping it.
    pub second: Fix,
}

/// Errors from [`apply_fixes`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixError {
    /// Some fixes overlap.
    #[error("{} conflicting fix(es)", .0.len())]
    Conflict(Vec<FixConflict>),

    /// A fix range is outside the buffer or splits a character.
    #[error("Fix range {start}..{end} is invalid for a buffer of {len} bytes")]
    InvalidRange {
        /// Range start.
        start: usize,
        /// Range end.
        end: usize,
        /// Buffer length.
        len: usize,
    },
}

/// Applies `fixes` to `source`.
///
/// Fixes are sorted by range; exact duplicates are applied once. Two fixes
/// conflict when their ranges intersect or when both insert at the same
/// offset.
///
/// # Errors
///
/// Returns [`FixError::InvalidRange`] for a range outside `source` or not on
/// a character boundary, and [`FixError::Conflict`] listing every conflicting
/// pair.
pub fn apply_fixes(source: &str, fixes: &[Fix]) -> Result<String, FixError> {
    let sorted = ordered(fixes);

    for fix in &sorted {
        let valid = fix.start <= fix.end
            && fix.end <= source.len()
            && source.is_char_boundary(fix.start)
            && source.is_char_boundary(fix.end);
        if !valid {
            return Err(FixError::InvalidRange {
                start: fix.start,
                end: fix.end,
                len: source.len(),
            });
        }
    }

    let mut conflicts = Vec::new();
    let mut furthest: Option<&Fix> = None;
    let mut previous: Option<&Fix> = None;
    for &fix in &sorted {
        if let Some(reach) = furthest {
            let double_insert = previous
                .is_some_and(|p| p.is_insertion() && fix.is_insertion() && p.start == fix.start);
            if fix.start < reach.end || double_insert {
                let first = if double_insert { previous.unwrap_or(reach) } else { reach };
                conflicts.push(FixConflict {
                    first: first.clone(),
                    second: fix.clone(),
                });
            }
        }
        if furthest.map_or(true, |f| fix.end > f.end) {
            furthest = Some(fix);
        }
        previous = Some(fix);
    }
    if !conflicts.is_empty() {
        return Err(FixError::Conflict(conflicts));
    }

    let extra: usize = sorted.iter().map(|f| f.content.len()).sum();
    let mut output = String::with_capacity(source.len() + extra);
    let mut cursor = 0;
    for fix in sorted {
        output.push_str(&source[cursor..fix.start]);
        output.push_str(&fix.content);
        cursor = fix.end;
    }
    output.push_str(&source[cursor..]);
    Ok(output)
}

/// Maps a byte offset of the text produced by applying `fixes` back to the
/// text they were applied to.
///
/// An offset inside replacement content maps to the start of the range it
/// replaced.
pub(crate) fn source_offset(fixes: &[Fix], offset: usize) -> usize {
    let mut source = 0;
    let mut output = 0;
    for fix in ordered(fixes) {
        let kept = fix.start - source;
        if offset < output + kept {
            break;
        }
        output += kept;
        if offset < output + fix.content.len() {
            return fix.start;
        }
        output += fix.content.len();
        source = fix.end;
    }
    source + (offset - output)
}

fn ordered(fixes: &[Fix]) -> Vec<&Fix> {
    let mut sorted: Vec<&Fix> = fixes.iter().collect();
    sorted.sort_by(|a, b| {
        (a.start, a.end, &a.content).cmp(&(b.start, b.end, &b.content))
    });
    sorted.dedup();
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applies_in_order() {
        let fixes = vec![
            Fix::replace(9, 11, "\t"),
            Fix::delete(3, 5),
            Fix::insert(0, "# "),
        ];
        let out = apply_fixes("abc  def\n  x\n", &fixes).unwrap();
        assert_eq!(out, "# abcdef\n\tx\n");
    }

    #[test]
    fn test_no_fixes_is_identity() {
        assert_eq!(apply_fixes("a\r\nb", &[]).unwrap(), "a\r\nb");
    }

    #[test]
    fn test_duplicates_collapse() {
        let fix = Fix::insert(1, "\n");
        let out = apply_fixes("ab", &[fix.clone(), fix]).unwrap();
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn test_overlap_is_conflict() {
        let fixes = vec![Fix::replace(0, 4, "x"), Fix::replace(2, 6, "y")];
        let err = apply_fixes("abcdefgh", &fixes).unwrap_err();
        let FixError::Conflict(conflicts) = err else {
            panic!("expected conflict");
        };
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].first.start, 0);
        assert_eq!(conflicts[0].second.start, 2);
    }

    #[test]
    fn test_double_insert_is_conflict() {
        let fixes = vec![Fix::insert(2, "x"), Fix::insert(2, "y")];
        assert!(matches!(
            apply_fixes("abcd", &fixes),
            Err(FixError::Conflict(_))
        ));
    }

    #[test]
    fn test_adjacent_ranges_do_not_conflict() {
        let fixes = vec![Fix::delete(2, 4), Fix::insert(4, "\n"), Fix::replace(4, 5, "E")];
        assert_eq!(apply_fixes("ab  e", &fixes).unwrap(), "ab\nE");
    }

    #[test]
    fn test_insert_inside_replacement_conflicts() {
        let fixes = vec![Fix::replace(0, 4, ""), Fix::insert(2, "x")];
        assert!(apply_fixes("abcd", &fixes).is_err());
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(matches!(
            apply_fixes("abc", &[Fix::delete(2, 9)]),
            Err(FixError::InvalidRange { len: 3, .. })
        ));
        assert!(matches!(
            apply_fixes("é", &[Fix::insert(1, "x")]),
            Err(FixError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_output_offsets_map_to_source() {
        let fixes = vec![
            Fix::replace(9, 11, "\t"),
            Fix::delete(3, 5),
            Fix::insert(0, "# "),
        ];
        // "abc  def\n  x\n" -> "# abcdef\n\tx\n"
        assert_eq!(source_offset(&fixes, 0), 0);
        assert_eq!(source_offset(&fixes, 5), 5);
        assert_eq!(source_offset(&fixes, 9), 9);
        assert_eq!(source_offset(&fixes, 10), 11);
        assert_eq!(source_offset(&[], 7), 7);
    }
}
