//! Line-based three-way text merge
//!
//! `merge3(origin, base, dest)` reconciles two descendants of a common base
//! the diff3 way: lines are matched against the base on both sides (longest
//! common subsequence), stable lines pass through, one-sided changes are
//! taken, identical changes collapse, and overlapping distinct changes
//! produce a conflict with marker-annotated output.
//!
//! This is the external textual-merge collaborator of the merge engine; the
//! engine only calls it per file and inspects the conflict flag.

/// Result of a three-way text merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merge3Outcome {
    /// Merged content; equals `annotated` when a conflict was found.
    pub bytes: Vec<u8>,
    pub conflict: bool,
    /// Content with conflict markers around unresolved chunks.
    pub annotated: Vec<u8>,
}

const MARKER_OURS: &[u8] = b"<<<<<<< ours\n";
const MARKER_SPLIT: &[u8] = b"=======\n";
const MARKER_THEIRS: &[u8] = b">>>>>>> theirs\n";

pub fn merge3(origin: &[u8], base: &[u8], dest: &[u8]) -> Merge3Outcome {
    // trivial cases need no line matching
    if origin == dest || dest == base {
        return clean(origin.to_vec());
    }
    if origin == base {
        return clean(dest.to_vec());
    }

    let origin_lines = split_lines(origin);
    let base_lines = split_lines(base);
    let dest_lines = split_lines(dest);

    let origin_match = lcs_match(&base_lines, &origin_lines);
    let dest_match = lcs_match(&base_lines, &dest_lines);

    let mut merged: Vec<u8> = Vec::new();
    let mut annotated: Vec<u8> = Vec::new();
    let mut conflict = false;

    let (mut o, mut b, mut d) = (0usize, 0usize, 0usize);

    loop {
        // pass through lines that are stable on both sides
        if b < base_lines.len()
            && origin_match.get(&b) == Some(&o)
            && dest_match.get(&b) == Some(&d)
        {
            merged.extend_from_slice(base_lines[b]);
            annotated.extend_from_slice(base_lines[b]);
            o += 1;
            b += 1;
            d += 1;
            continue;
        }

        if b >= base_lines.len() && o >= origin_lines.len() && d >= dest_lines.len() {
            break;
        }

        // collect the unstable chunk up to the next line anchored on both
        // sides (LCS matches are monotonic, so these bounds line up)
        let mut next_b = b;
        while next_b < base_lines.len()
            && !(origin_match.contains_key(&next_b) && dest_match.contains_key(&next_b))
        {
            next_b += 1;
        }
        let next_o = origin_match.get(&next_b).copied().unwrap_or(origin_lines.len());
        let next_d = dest_match.get(&next_b).copied().unwrap_or(dest_lines.len());

        let chunk_o = &origin_lines[o..next_o];
        let chunk_b = &base_lines[b..next_b];
        let chunk_d = &dest_lines[d..next_d];

        if chunk_o == chunk_b {
            emit(&mut merged, &mut annotated, chunk_d);
        } else if chunk_d == chunk_b || chunk_o == chunk_d {
            emit(&mut merged, &mut annotated, chunk_o);
        } else {
            conflict = true;
            annotated.extend_from_slice(MARKER_OURS);
            emit_terminated(&mut annotated, chunk_o);
            annotated.extend_from_slice(MARKER_SPLIT);
            emit_terminated(&mut annotated, chunk_d);
            annotated.extend_from_slice(MARKER_THEIRS);
        }

        o = next_o;
        b = next_b;
        d = next_d;
    }

    if conflict {
        Merge3Outcome {
            bytes: annotated.clone(),
            conflict: true,
            annotated,
        }
    } else {
        clean(merged)
    }
}

fn clean(bytes: Vec<u8>) -> Merge3Outcome {
    Merge3Outcome {
        annotated: bytes.clone(),
        bytes,
        conflict: false,
    }
}

fn emit(merged: &mut Vec<u8>, annotated: &mut Vec<u8>, chunk: &[&[u8]]) {
    for line in chunk {
        merged.extend_from_slice(line);
        annotated.extend_from_slice(line);
    }
}

/// Emit a chunk making sure it ends with a newline, so a following marker
/// starts on its own line.
fn emit_terminated(out: &mut Vec<u8>, chunk: &[&[u8]]) {
    for line in chunk {
        out.extend_from_slice(line);
    }
    if chunk.last().is_some_and(|line| !line.ends_with(b"\n")) {
        out.push(b'\n');
    }
}

/// Split into lines keeping the terminators, so merging never invents or
/// drops trailing newlines.
fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;

    for (i, byte) in bytes.iter().enumerate() {
        if *byte == b'\n' {
            lines.push(&bytes[start..=i]);
            start = i + 1;
        }
    }
    if start < bytes.len() {
        lines.push(&bytes[start..]);
    }

    lines
}

/// Longest common subsequence of two line sequences, as a map from index in
/// `base` to the matched index in `other`.
fn lcs_match(base: &[&[u8]], other: &[&[u8]]) -> std::collections::BTreeMap<usize, usize> {
    let n = base.len();
    let m = other.len();
    let mut table = vec![vec![0u32; m + 1]; n + 1];

    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if base[i] == other[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut matches = std::collections::BTreeMap::new();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if base[i] == other[j] {
            matches.insert(i, j);
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }

    matches
}
