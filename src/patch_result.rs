use derive_more::Display;

/// Outcome of one edit unit (a diff hunk or a search/replace block).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UnitStatus {
	#[display("applied")]
	Applied,
	#[display("no match")]
	NoMatch,
	#[display("ambiguous match")]
	AmbiguousMatch,
	#[display("malformed unit")]
	MalformedUnit,
}

#[derive(Debug, Clone)]
pub struct UnitOutcome {
	pub unit_index: usize,
	pub status: UnitStatus,
	pub note: Option<String>,
}

impl UnitOutcome {
	pub fn applied(&self) -> bool {
		self.status == UnitStatus::Applied
	}
}

/// Result of one full apply request: the final content plus the ordered
/// per-unit outcomes.
///
/// Lets the caller distinguish "fully applied," "partially applied under
/// continue-on-error," and "aborted." The engine makes no policy decision
/// about whether a partial result is acceptable.
#[derive(Debug, Clone)]
pub struct PatchResult {
	pub content: String,
	pub outcomes: Vec<UnitOutcome>,
	/// True when the request stopped at the first failure; `content` is then
	/// the untouched original.
	pub aborted: bool,
}

impl PatchResult {
	pub fn all_applied(&self) -> bool {
		!self.aborted && self.outcomes.iter().all(UnitOutcome::applied)
	}

	pub fn applied_count(&self) -> usize {
		self.outcomes.iter().filter(|o| o.applied()).count()
	}

	pub fn failed_count(&self) -> usize {
		self.outcomes.iter().filter(|o| !o.applied()).count()
	}
}
