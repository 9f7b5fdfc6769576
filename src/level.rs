use {
	crate::{
		archive::Archive,
		error::{Error, FormatError},
	},
	core::{fmt, str::FromStr},
};

/// The dungeon layouts. Each one has its own TIL, MIN and frame set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
	L1,
	L2,
	L3,
	L4,
	Town,
}

impl Level {
	pub const ALL: [Level; 5] = [Level::L1, Level::L2, Level::L3, Level::L4, Level::Town];

	/// Short name used as the file name prefix, e.g. `l1` for `l1.til` and `l1.min`.
	pub fn name(self) -> &'static str {
		match self {
			Level::L1 => "l1",
			Level::L2 => "l2",
			Level::L3 => "l3",
			Level::L4 => "l4",
			Level::Town => "town",
		}
	}

	pub fn blocksPerPillar(self) -> usize {
		match self {
			Level::L1 | Level::L2 | Level::L3 => 10,
			Level::L4 | Level::Town => 16,
		}
	}

	/// Maps the directory of a level file, trailing slash included, to its level.
	pub fn fromDirectory(dir: &str) -> Result<Self, FormatError> {
		Ok(match dir {
			"levels/l1data/" => Level::L1,
			"levels/l2data/" => Level::L2,
			"levels/l3data/" => Level::L3,
			"levels/l4data/" => Level::L4,
			"levels/towndata/" => Level::Town,
			_ => return Err(FormatError::UnknownLevelDirectory(dir.to_owned())),
		})
	}

	/// Resolves the level of a file from its path relative to the archive root.
	pub fn fromRelativePath(relPath: &str) -> Result<Self, FormatError> {
		let dir = match relPath.rfind('/') {
			Some(index) => &relPath[..=index],
			None => "",
		};
		Self::fromDirectory(dir)
	}

	/// Resolves the level a DUN file belongs to by looking up where the archive keeps it.
	pub fn ofDun(archive: &impl Archive, dunName: &str) -> Result<Self, Error> {
		Ok(Self::fromRelativePath(&archive.relativePath(dunName)?)?)
	}
}

impl FromStr for Level {
	type Err = FormatError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Level::ALL
			.into_iter()
			.find(|level| level.name() == s)
			.ok_or_else(|| FormatError::UnknownLevel(s.to_owned()))
	}
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}
