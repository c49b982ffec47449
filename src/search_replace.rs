use crate::{PatchResult, UnitOutcome, UnitStatus};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static RE_SEARCH_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<{7} SEARCH\s*$").unwrap());
static RE_DIVIDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^={7}\s*$").unwrap());
static RE_REPLACE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^>{7} REPLACE\s*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
	None,
	Search,
	Replace,
}

/// Applies conflict-marker search/replace blocks to `original_content`.
///
/// Scans the response line by line: `<<<<<<< SEARCH`, `=======`, and
/// `>>>>>>> REPLACE` delimit each (search, replace) pair; any text outside an
/// open pair is ignored. Each block substitutes the first literal occurrence
/// of its search text in the content left by the previous block.
///
/// Unlike the diff strategy this one is best-effort per block and never
/// aborts: a search text that cannot be found records a `NoMatch` outcome
/// and scanning continues, and a structurally broken block records
/// `MalformedUnit`.
pub fn apply_search_replace(original_content: &str, raw_response: &str) -> PatchResult {
	let mut content = original_content.to_string();
	let mut outcomes: Vec<UnitOutcome> = Vec::new();
	let mut unit_index = 0;

	let mut state = BlockState::None;
	let mut search_buf: Vec<&str> = Vec::new();
	let mut replace_buf: Vec<&str> = Vec::new();

	for line in raw_response.lines() {
		if RE_SEARCH_OPEN.is_match(line) {
			if state != BlockState::None {
				warn!(unit = unit_index, "search/replace block restarted before close marker");
				outcomes.push(malformed(unit_index, "block restarted before close marker"));
				unit_index += 1;
			}
			state = BlockState::Search;
			search_buf.clear();
			replace_buf.clear();
			continue;
		}

		match state {
			// Text outside an open pair is ignored.
			BlockState::None => (),

			BlockState::Search => {
				if RE_DIVIDER.is_match(line) {
					state = BlockState::Replace;
				} else if RE_REPLACE_CLOSE.is_match(line) {
					warn!(unit = unit_index, "close marker before divider");
					outcomes.push(malformed(unit_index, "close marker before divider"));
					unit_index += 1;
					state = BlockState::None;
				} else {
					search_buf.push(line);
				}
			}

			BlockState::Replace => {
				if RE_REPLACE_CLOSE.is_match(line) {
					let search = search_buf.join("\n");
					let replace = replace_buf.join("\n");
					outcomes.push(apply_block(&mut content, unit_index, &search, &replace));
					unit_index += 1;
					state = BlockState::None;
					search_buf.clear();
					replace_buf.clear();
				} else {
					replace_buf.push(line);
				}
			}
		}
	}

	if state != BlockState::None {
		warn!(unit = unit_index, "unterminated search/replace block at end of response");
		outcomes.push(malformed(unit_index, "unterminated block at end of response"));
	}

	PatchResult {
		content,
		outcomes,
		aborted: false,
	}
}

// region:    --- Support

fn apply_block(content: &mut String, unit_index: usize, search: &str, replace: &str) -> UnitOutcome {
	if search.is_empty() {
		return malformed(unit_index, "empty search text");
	}

	if content.contains(search) {
		*content = content.replacen(search, replace, 1);
		debug!(unit = unit_index, "applied search/replace block");
		UnitOutcome {
			unit_index,
			status: UnitStatus::Applied,
			note: None,
		}
	} else {
		warn!(unit = unit_index, "search text not found, leaving content unchanged");
		UnitOutcome {
			unit_index,
			status: UnitStatus::NoMatch,
			note: Some(format!("search text not found: {}", snippet(search))),
		}
	}
}

fn malformed(unit_index: usize, note: &str) -> UnitOutcome {
	UnitOutcome {
		unit_index,
		status: UnitStatus::MalformedUnit,
		note: Some(note.to_string()),
	}
}

fn snippet(text: &str) -> String {
	const MAX_CHARS: usize = 50;
	let short: String = text.chars().take(MAX_CHARS).collect();
	if short.len() < text.len() {
		format!("{short}...")
	} else {
		short
	}
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
