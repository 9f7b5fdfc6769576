use {
	crate::{error::Error, level::Level},
	serde::Deserialize,
	std::{collections::BTreeMap, fs, path::Path, path::PathBuf},
};

/// A dump job, read from a TOML file.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Root directory of the extracted archive.
	pub archive: PathBuf,

	/// Archive paths of bare file names.
	#[serde(default)]
	pub paths: BTreeMap<String, String>,

	#[serde(default, rename = "dun")]
	pub duns: BTreeMap<String, DunConf>,

	#[serde(default)]
	pub levels: BTreeMap<String, LevelConf>,
}

/// Where a DUN file is placed within the dungeon grid.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DunConf {
	#[serde(default)]
	pub colStart: usize,
	#[serde(default)]
	pub rowStart: usize,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LevelConf {
	/// Frame sheet of the level's blocks.
	pub frames: String,

	/// One image is dumped per palette; none means the frame sheet's own colours.
	#[serde(default)]
	pub palettes: Vec<String>,

	pub arches: Option<ArchConf>,
}

/// Arch overlay frames. Their ids refer to l1 pillar numbers, so only `[levels.l1]` may carry them.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArchConf {
	pub sheet: String,
	pub palette: Option<String>,
	pub frameHeight: usize,
}

impl Config {
	pub fn load(path: &Path) -> Result<Self, Error> {
		let toml = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
		Self::fromStr(&toml).map_err(|source| Error::Config { path: path.to_owned(), source })
	}

	pub fn fromStr(toml: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(toml)
	}

	pub fn origin(&self, dunName: &str) -> [usize; 2] {
		let DunConf { colStart, rowStart } = self.duns.get(dunName).copied().unwrap_or_default();
		[colStart, rowStart]
	}

	pub fn level(&self, level: Level) -> Option<&LevelConf> {
		self.levels.get(level.name())
	}

	/// Names of every DUN file in the path table.
	pub fn dunNames(&self) -> impl Iterator<Item = &str> {
		self.paths.keys().map(String::as_str).filter(|name| name.to_ascii_lowercase().ends_with(".dun"))
	}
}
