use tracing::warn;

/// Classification tag for one line of a diff-like edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
	Context,
	Addition,
	Removal,
}

/// One classified line of a proposed edit.
///
/// `text` excludes the leading tag character and keeps the original line
/// terminator. Immutable once classified.
#[derive(Debug, Clone)]
pub struct EditLine {
	pub kind: LineKind,
	pub text: String,
}

/// One contiguous block of context/removal/addition lines.
#[derive(Debug, Clone, Default)]
pub struct Hunk {
	lines: Vec<EditLine>,
}

impl Hunk {
	pub fn lines(&self) -> &[EditLine] {
		&self.lines
	}

	/// Reconstructed original-side text: context + removal lines, in document
	/// order, each retaining its original line terminator.
	pub fn before(&self) -> String {
		self.lines
			.iter()
			.filter(|l| matches!(l.kind, LineKind::Context | LineKind::Removal))
			.map(|l| l.text.as_str())
			.collect()
	}

	/// Reconstructed new-side text: context + addition lines, in document order.
	pub fn after(&self) -> String {
		self.lines
			.iter()
			.filter(|l| matches!(l.kind, LineKind::Context | LineKind::Addition))
			.map(|l| l.text.as_str())
			.collect()
	}

	/// A hunk with no context/removal lines. Appended at the end of the
	/// content rather than searched for.
	pub fn is_pure_insertion(&self) -> bool {
		!self.lines.iter().any(|l| matches!(l.kind, LineKind::Context | LineKind::Removal))
	}
}

/// Parses a diff-like text into ordered hunks, plus one diagnostic per
/// truncated hunk so droppage stays visible to callers.
///
/// - File header lines (`---` / `+++`) are dropped unconditionally; paths and
///   range metadata coming from a model are never trusted.
/// - An `@@` line closes the current hunk, if any, and opens a new one. Any
///   numbers it carries are ignored.
/// - Within an open hunk, lines are tagged by their first character: space for
///   context, `-` for removal, `+` for addition. Any other line ends that
///   hunk's collection; the remainder is skipped until the next `@@` line and
///   the truncation is recorded as a diagnostic.
/// - Tagged lines before the first `@@` line are discarded.
/// - Hunks that collected no lines are discarded.
pub fn parse_hunks(raw: &str) -> (Vec<Hunk>, Vec<String>) {
	let mut hunks: Vec<Hunk> = Vec::new();
	let mut issues: Vec<String> = Vec::new();
	let mut current: Option<Hunk> = None;

	for line in raw.split_inclusive('\n') {
		let stripped = line.strip_suffix('\n').unwrap_or(line);
		let stripped = stripped.strip_suffix('\r').unwrap_or(stripped);

		if stripped.starts_with("---") || stripped.starts_with("+++") {
			continue;
		}

		if stripped.starts_with("@@") {
			push_hunk(&mut hunks, current.take());
			current = Some(Hunk::default());
			continue;
		}

		let kind = match line.as_bytes().first() {
			Some(b' ') => Some(LineKind::Context),
			Some(b'-') => Some(LineKind::Removal),
			Some(b'+') => Some(LineKind::Addition),
			_ => None,
		};

		match kind {
			Some(kind) => {
				// Tagged lines outside an open hunk are discarded.
				if let Some(hunk) = current.as_mut() {
					hunk.lines.push(EditLine {
						kind,
						text: line[1..].to_string(),
					});
				}
			}
			None => {
				if current.is_some() {
					warn!(line = stripped, "malformed line inside hunk, ending hunk collection");
					issues.push(format!(
						"hunk truncated at untagged line '{stripped}'; remaining lines dropped until next '@@'"
					));
					push_hunk(&mut hunks, current.take());
				}
			}
		}
	}

	push_hunk(&mut hunks, current.take());

	(hunks, issues)
}

// region:    --- Support

fn push_hunk(hunks: &mut Vec<Hunk>, hunk: Option<Hunk>) {
	if let Some(hunk) = hunk
		&& !hunk.lines.is_empty()
	{
		hunks.push(hunk);
	}
}

// endregion: --- Support

// region:    --- Tests


// endregion: --- Tests
