//! Fenced code block detection.
//!
//! Lines inside a fenced code block are never scanned for tags or rewritten.
//! The [`CodeBlockSwitch`] tracks whether the current line is inside a fence.
//! It flips at most once per line: after a flip it is disarmed until
//! [`CodeBlockSwitch::arm`] is called for the next line.

/// The two states of the line classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FenceState {
	#[default]
	OutsideCode,
	InsideCode,
}

/// A debounced on/off switch driven by two line predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeBlockSwitch {
	state: FenceState,
	armed: bool,
}

impl CodeBlockSwitch {
	pub const fn new() -> Self {
		Self {
			state: FenceState::OutsideCode,
			armed: true,
		}
	}

	pub fn state(self) -> FenceState {
		self.state
	}

	pub fn is_armed(self) -> bool {
		self.armed
	}

	pub fn is_inside_code(self) -> bool {
		self.state == FenceState::InsideCode
	}

	/// Evaluate `line` and return the switch after at most one transition.
	#[must_use]
	pub fn observe(self, line: &str) -> Self {
		if !self.armed {
			return self;
		}

		let flips = match self.state {
			FenceState::OutsideCode => is_fence_open(line),
			FenceState::InsideCode => is_fence_close(line),
		};

		if !flips {
			return self;
		}

		let state = match self.state {
			FenceState::OutsideCode => FenceState::InsideCode,
			FenceState::InsideCode => FenceState::OutsideCode,
		};

		Self {
			state,
			armed: false,
		}
	}

	/// Re-arm the switch so the next line may flip it again.
	#[must_use]
	pub fn arm(self) -> Self {
		Self {
			armed: true,
			..self
		}
	}
}

impl Default for CodeBlockSwitch {
	fn default() -> Self {
		Self::new()
	}
}

/// A fence opens on any line starting with three backticks; an info string
/// may follow.
pub fn is_fence_open(line: &str) -> bool {
	line.starts_with("```")
}

/// A fence closes on three backticks followed only by whitespace.
pub fn is_fence_close(line: &str) -> bool {
	line.strip_prefix("```")
		.is_some_and(|rest| rest.trim().is_empty())
}
