use crate::{Error, PatchOptions, PatchResult, Result, UnitOutcome, UnitStatus};
use crate::{apply_search_replace, apply_unified_diff, apply_whole_file};
use std::str::FromStr;

/// The three edit representations the engine can reconcile.
///
/// A strategy is selected once per request (typically from configuration),
/// never per hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStrategy {
	WholeFile,
	UnifiedDiff,
	SearchReplace,
}

impl ApplyStrategy {
	/// Applies the raw model response to `original_content` with this
	/// strategy, returning the new content plus per-unit outcomes.
	pub fn apply(&self, original_content: &str, raw_response: &str, options: &PatchOptions) -> PatchResult {
		match self {
			ApplyStrategy::WholeFile => PatchResult {
				content: apply_whole_file(raw_response),
				outcomes: vec![UnitOutcome {
					unit_index: 0,
					status: UnitStatus::Applied,
					note: None,
				}],
				aborted: false,
			},
			ApplyStrategy::UnifiedDiff => apply_unified_diff(original_content, raw_response, options),
			ApplyStrategy::SearchReplace => apply_search_replace(original_content, raw_response),
		}
	}
}

impl FromStr for ApplyStrategy {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"wholefile" | "whole-file" | "whole_file" => Ok(Self::WholeFile),
			"udiff" | "unified-diff" | "unified_diff" => Ok(Self::UnifiedDiff),
			"searchreplace" | "search-replace" | "search_replace" => Ok(Self::SearchReplace),
			other => Err(Error::UnknownStrategy(other.to_string())),
		}
	}
}

// region:    --- Tests


// endregion: --- Tests
