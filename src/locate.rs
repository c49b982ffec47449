use similar::{Algorithm, DiffOp, TextDiff, capture_diff_slices};
use tracing::debug;

/// Minimum similarity ratio for a fuzzy window to be accepted.
pub const DEFAULT_FUZZY_THRESHOLD: f32 = 0.8;

/// A resolved placement for a unit's before-text inside the current content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchCandidate {
	/// Byte offset of the span start in the content.
	pub start: usize,
	/// Byte length of the matched span in the content.
	pub len: usize,
	/// 1.0 for exact matches; the similarity ratio for fuzzy ones.
	pub score: f32,
}

/// Why a before-text could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateError {
	NoMatch,
	/// The before-text occurs verbatim more than once. Multiplicity is never
	/// resolved by picking the first occurrence; it surfaces to the caller.
	Ambiguous { count: usize },
}

/// Finds the unique span of `before` inside `content`.
///
/// Search order:
/// 1. Empty (whitespace-only) `before` resolves to end-of-content (append).
/// 2. Exact substring search. One occurrence wins with score 1.0; more than
///    one fails `Ambiguous` immediately, even when fuzzy matching is enabled.
/// 3. If `fuzzy` is set, line-block alignment with a character-level
///    similarity ratio, accepting the best window scoring above `threshold`.
/// 4. Whitespace-normalized retry: if `before` with all whitespace runs
///    collapsed occurs in similarly collapsed `content`, the search is re-run
///    with `before` trimmed of leading/trailing whitespace to recover a
///    precise span. Otherwise the original failure propagates.
pub fn locate(
	content: &str,
	before: &str,
	fuzzy: bool,
	threshold: f32,
) -> core::result::Result<MatchCandidate, LocateError> {
	match locate_once(content, before, fuzzy, threshold) {
		Err(LocateError::NoMatch) => {
			let norm_content = normalize_ws(content);
			let norm_before = normalize_ws(before);
			if !norm_before.is_empty() && norm_content.contains(&norm_before) {
				debug!("no direct match, retrying with trimmed before-text");
				locate_once(content, before.trim(), fuzzy, threshold)
			} else {
				Err(LocateError::NoMatch)
			}
		}
		other => other,
	}
}

// region:    --- Support

fn locate_once(
	content: &str,
	before: &str,
	fuzzy: bool,
	threshold: f32,
) -> core::result::Result<MatchCandidate, LocateError> {
	// -- Append semantics for pure insertions
	if before.trim().is_empty() {
		return Ok(MatchCandidate {
			start: content.len(),
			len: 0,
			score: 1.0,
		});
	}

	// -- Exact substring search
	let starts = find_all(content, before);
	match starts.len() {
		1 => {
			return Ok(MatchCandidate {
				start: starts[0],
				len: before.len(),
				score: 1.0,
			});
		}
		n if n > 1 => return Err(LocateError::Ambiguous { count: n }),
		_ => (),
	}

	if !fuzzy {
		return Err(LocateError::NoMatch);
	}

	fuzzy_locate(content, before, threshold).ok_or(LocateError::NoMatch)
}

/// All occurrence offsets of `needle` in `content`, including overlapping ones.
fn find_all(content: &str, needle: &str) -> Vec<usize> {
	let mut starts = Vec::new();
	let step = needle.chars().next().map_or(1, char::len_utf8);

	let mut from = 0;
	while let Some(idx) = content[from..].find(needle) {
		let idx = from + idx;
		starts.push(idx);
		from = idx + step;
	}

	starts
}

/// Approximate placement via line-block alignment.
///
/// Aligns the trimmed line sequences of `before` and `content` with an
/// LCS-style diff, then scores each aligned block's window of raw content
/// lines against the raw before-text with a character-level ratio. The best
/// window strictly above `threshold` wins.
fn fuzzy_locate(content: &str, before: &str, threshold: f32) -> Option<MatchCandidate> {
	let before_lines: Vec<&str> = before.lines().collect();
	if before_lines.is_empty() || content.is_empty() {
		return None;
	}

	// Content lines with their start offsets (offsets has one extra entry
	// pointing one past the last line).
	let mut content_lines: Vec<&str> = Vec::new();
	let mut offsets: Vec<usize> = Vec::new();
	let mut pos = 0;
	for piece in content.split_inclusive('\n') {
		offsets.push(pos);
		content_lines.push(piece.strip_suffix('\n').unwrap_or(piece));
		pos += piece.len();
	}
	offsets.push(content.len());

	let before_trimmed: Vec<&str> = before_lines.iter().map(|l| l.trim()).collect();
	let content_trimmed: Vec<&str> = content_lines.iter().map(|l| l.trim()).collect();

	let ops = capture_diff_slices(Algorithm::Myers, &before_trimmed, &content_trimmed);

	let mut best: Option<MatchCandidate> = None;

	for op in ops {
		let DiffOp::Equal { old_index, new_index, len } = op else {
			continue;
		};
		if len == 0 {
			continue;
		}

		// Project the window back so it covers the whole before-text, not
		// just the aligned block.
		let win_start = new_index.saturating_sub(old_index);
		let win_len = before_lines.len().min(content_lines.len() - win_start);
		if win_len == 0 {
			continue;
		}

		let start = offsets[win_start];
		let mut end = offsets[win_start + win_len];
		if !before.ends_with('\n') && content[start..end].ends_with('\n') {
			end -= 1;
		}

		let window = &content[start..end];
		let ratio = TextDiff::from_chars(before, window).ratio();

		if ratio > threshold && best.is_none_or(|b| ratio > b.score) {
			best = Some(MatchCandidate {
				start,
				len: end - start,
				score: ratio,
			});
		}
	}

	if let Some(found) = best {
		debug!(start = found.start, score = found.score, "fuzzy match accepted");
	}

	best
}

/// Collapses runs of whitespace into a single space for normalized comparison.
fn normalize_ws(s: &str) -> String {
	s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
