use crate::{DEFAULT_FUZZY_THRESHOLD, LocateError, MatchCandidate, PatchResult, UnitOutcome, UnitStatus, locate, parse_hunks};
use tracing::{debug, warn};

/// Options for the unified-diff strategy.
#[derive(Debug, Clone, Copy)]
pub struct PatchOptions {
	/// Keep applying remaining hunks when one fails, recording the failure,
	/// instead of aborting the whole request.
	pub continue_on_error: bool,
	/// Fall back to approximate block alignment when exact search finds
	/// nothing. Ambiguous exact matches still fail regardless.
	pub fuzzy_match: bool,
	/// Minimum similarity ratio for a fuzzy window to be accepted.
	pub fuzzy_threshold: f32,
}

impl Default for PatchOptions {
	fn default() -> Self {
		Self {
			continue_on_error: false,
			fuzzy_match: true,
			fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
		}
	}
}

/// Applies a loose unified diff (untrusted range metadata, possibly imperfect
/// context) to `original_content`.
///
/// Hunks are applied strictly in document order, each located against the
/// content as mutated by its predecessors, so a later hunk may match text a
/// previous hunk introduced.
///
/// Both inputs are newline-normalized (`\r\n`/`\r` to `\n`) before
/// application, so applied content comes back LF-normalized. An aborted
/// request returns `original_content` byte-for-byte untouched.
///
/// Hunks truncated during parsing (an untagged line inside an open hunk) are
/// reported as `MalformedUnit` outcomes appended after the hunk units; they
/// never abort the request on their own.
pub fn apply_unified_diff(original_content: &str, raw_diff: &str, options: &PatchOptions) -> PatchResult {
	let original = normalize_newlines(original_content);
	let raw_diff = normalize_newlines(raw_diff);

	let (hunks, parse_issues) = parse_hunks(&raw_diff);
	debug!(hunk_count = hunks.len(), issue_count = parse_issues.len(), "parsed unified diff");

	let mut content = original;
	let mut outcomes: Vec<UnitOutcome> = Vec::with_capacity(hunks.len() + parse_issues.len());

	for (idx, hunk) in hunks.iter().enumerate() {
		let before = hunk.before();
		let after = hunk.after();

		match locate(&content, &before, options.fuzzy_match, options.fuzzy_threshold) {
			Ok(found) => {
				debug!(unit = idx, start = found.start, score = found.score, "applied hunk");
				content = splice(&content, &found, &after);
				outcomes.push(UnitOutcome {
					unit_index: idx,
					status: UnitStatus::Applied,
					note: None,
				});
			}
			Err(err) => {
				let (status, note) = match err {
					LocateError::NoMatch => (
						UnitStatus::NoMatch,
						"no exact or fuzzy match for hunk before-text".to_string(),
					),
					LocateError::Ambiguous { count } => (
						UnitStatus::AmbiguousMatch,
						format!("{count} exact matches, placement is ambiguous"),
					),
				};
				warn!(unit = idx, %status, "failed to apply hunk");
				outcomes.push(UnitOutcome {
					unit_index: idx,
					status,
					note: Some(note),
				});

				if !options.continue_on_error {
					// Nothing partially applied is exposed on abort.
					outcomes.extend(malformed_outcomes(hunks.len(), &parse_issues));
					return PatchResult {
						content: original_content.to_string(),
						outcomes,
						aborted: true,
					};
				}
			}
		}
	}

	outcomes.extend(malformed_outcomes(hunks.len(), &parse_issues));

	PatchResult {
		content,
		outcomes,
		aborted: false,
	}
}

// region:    --- Support

/// One `MalformedUnit` outcome per truncated hunk, indexed after the hunks
/// that did parse.
fn malformed_outcomes(first_index: usize, issues: &[String]) -> Vec<UnitOutcome> {
	issues
		.iter()
		.enumerate()
		.map(|(i, note)| UnitOutcome {
			unit_index: first_index + i,
			status: UnitStatus::MalformedUnit,
			note: Some(note.clone()),
		})
		.collect()
}

fn splice(content: &str, at: &MatchCandidate, after: &str) -> String {
	let mut out = String::with_capacity(content.len() + after.len());
	out.push_str(&content[..at.start]);
	out.push_str(after);
	out.push_str(&content[at.start + at.len..]);
	out
}

pub(crate) fn normalize_newlines(text: &str) -> String {
	text.replace("\r\n", "\n").replace('\r', "\n")
}

// endregion: --- Support

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

	use super::*;

	#[test]
	fn test_udiff_apply_single_hunk() -> Result<()> {
		// -- Setup & Fixtures
		let original = "line 1\nline 2\nline 3\n";
		let diff = "@@\n line 1\n-line 2\n+line two\n line 3\n";

		// -- Exec
		let res = apply_unified_diff(original, diff, &PatchOptions::default());

		// -- Check
		assert!(res.all_applied());
		assert_eq!(res.content, "line 1\nline two\nline 3\n");

		Ok(())
	}

	#[test]
	fn test_udiff_abort_rolls_back() -> Result<()> {
		// -- Setup & Fixtures
		let original = "alpha\nbeta\n";
		// First hunk applies, second one cannot match.
		let diff = "@@\n alpha\n+inserted\n@@\n-nonexistent\n+whatever\n";
		let options = PatchOptions {
			continue_on_error: false,
			fuzzy_match: false,
			..Default::default()
		};

		// -- Exec
		let res = apply_unified_diff(original, diff, &options);

		// -- Check
		assert!(res.aborted);
		assert_eq!(res.content, original, "aborted request must expose the original content");
		assert_eq!(res.outcomes.len(), 2);
		assert_eq!(res.outcomes[1].status, UnitStatus::NoMatch);

		Ok(())
	}

	#[test]
	fn test_udiff_continue_on_error() -> Result<()> {
		// -- Setup & Fixtures
		let original = "alpha\nbeta\n";
		let diff = "@@\n-nonexistent\n+whatever\n@@\n beta\n+after beta\n";
		let options = PatchOptions {
			continue_on_error: true,
			fuzzy_match: false,
			..Default::default()
		};

		// -- Exec
		let res = apply_unified_diff(original, diff, &options);

		// -- Check
		assert!(!res.aborted);
		assert_eq!(res.applied_count(), 1);
		assert_eq!(res.failed_count(), 1);
		assert_eq!(res.content, "alpha\nbeta\nafter beta\n");

		Ok(())
	}

	#[test]
	fn test_udiff_sequential_mutation() -> Result<()> {
		// -- Setup & Fixtures
		// The second hunk's before-text only exists once the first is applied.
		let original = "alpha\nbeta\n";
		let diff = "@@\n alpha\n+inserted\n@@\n inserted\n+more\n";

		// -- Exec
		let res = apply_unified_diff(original, diff, &PatchOptions::default());

		// -- Check
		assert!(res.all_applied());
		assert_eq!(res.content, "alpha\ninserted\nmore\nbeta\n");

		Ok(())
	}

	#[test]
	fn test_udiff_ambiguous_never_auto_resolved() -> Result<()> {
		// -- Setup & Fixtures
		let original = "dup\nmiddle\ndup\n";
		let diff = "@@\n-dup\n+changed\n";

		// -- Exec
		let res = apply_unified_diff(original, diff, &PatchOptions::default());

		// -- Check
		assert!(res.aborted);
		assert_eq!(res.outcomes[0].status, UnitStatus::AmbiguousMatch);
		assert_eq!(res.content, original);

		Ok(())
	}

	#[test]
	fn test_udiff_crlf_normalized() -> Result<()> {
		// -- Setup & Fixtures
		let original = "line 1\r\nline 2\r\n";
		let diff = "@@\n line 1\n-line 2\n+line deux\n";

		// -- Exec
		let res = apply_unified_diff(original, diff, &PatchOptions::default());

		// -- Check
		assert!(res.all_applied());
		assert_eq!(res.content, "line 1\nline deux\n");

		Ok(())
	}

	#[test]
	fn test_udiff_truncated_hunk_surfaces_malformed_outcome() -> Result<()> {
		// -- Setup & Fixtures
		// The untagged line truncates the hunk; the edit after it is dropped
		// and must show up as a malformed unit, not vanish silently.
		let original = "alpha\nbeta\ngamma\n";
		let diff = "@@\n alpha\n+added\nMALFORMED LINE\n beta\n+lost edit\n";
		let options = PatchOptions {
			continue_on_error: true,
			..Default::default()
		};

		// -- Exec
		let res = apply_unified_diff(original, diff, &options);

		// -- Check
		assert_eq!(res.content, "alpha\nadded\nbeta\ngamma\n");
		assert!(!res.content.contains("lost edit"));
		assert_eq!(res.outcomes.len(), 2);
		assert_eq!(res.outcomes[0].status, UnitStatus::Applied);
		assert_eq!(res.outcomes[1].status, UnitStatus::MalformedUnit);
		assert_eq!(res.outcomes[1].unit_index, 1);
		assert!(res.outcomes[1].note.as_deref().is_some_and(|n| n.contains("MALFORMED LINE")));
		assert!(!res.all_applied());

		Ok(())
	}

	#[test]
	fn test_udiff_abort_preserves_input_bytes() -> Result<()> {
		// -- Setup & Fixtures
		// CRLF input must come back byte-identical on abort, not LF-normalized.
		let original = "line 1\r\nline 2\r\n";
		let diff = "@@\n-nonexistent\n+whatever\n";
		let options = PatchOptions {
			continue_on_error: false,
			fuzzy_match: false,
			..Default::default()
		};

		// -- Exec
		let res = apply_unified_diff(original, diff, &options);

		// -- Check
		assert!(res.aborted);
		assert_eq!(res.content, original);

		Ok(())
	}

	#[test]
	fn test_udiff_pure_insertion_appends() -> Result<()> {
		// -- Setup & Fixtures
		let original = "line 1\nline 2\n";
		let diff = "@@\n+line 3\n";

		// -- Exec
		let res = apply_unified_diff(original, diff, &PatchOptions::default());

		// -- Check
		assert!(res.all_applied());
		assert_eq!(res.content, "line 1\nline 2\nline 3\n");

		Ok(())
	}
}

// endregion: --- Tests
