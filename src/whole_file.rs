/// Returns the proposed text verbatim as the new file content, stripping one
/// optional wrapping code fence (a leading fence line and a trailing fence
/// line) if present.
///
/// The current content is never consulted; this strategy has no failure modes
/// beyond "nothing to strip".
pub fn apply_whole_file(raw_response: &str) -> String {
	let trimmed_start = raw_response.trim_start();

	if trimmed_start.starts_with("```")
		&& let Some(f_idx) = trimmed_start.find('\n')
	{
		let remaining = &trimmed_start[f_idx + 1..];
		let trimmed_end = remaining.trim_end();

		if trimmed_end.ends_with("```")
			&& let Some(l_idx) = trimmed_end.rfind('\n')
		{
			let last_line = &trimmed_end[l_idx + 1..];
			if last_line.trim_start().starts_with("```") {
				return remaining[..l_idx].to_string();
			}
		}
	}

	raw_response.to_string()
}

// region:    --- Tests


// endregion: --- Tests
