use {
	crate::error::Error,
	std::{
		collections::BTreeMap,
		fs,
		path::{Path, PathBuf},
	},
};

/// Read access to the files of an extracted game archive.
pub trait Archive {
	/// Path of `name` relative to the archive root, e.g. `levels/l1data/l1.til` for `l1.til`.
	fn relativePath(&self, name: &str) -> Result<String, Error>;

	fn path(&self, name: &str) -> Result<PathBuf, Error>;

	fn load(&self, name: &str) -> Result<Vec<u8>, Error>;
}

/// An archive extracted into a directory, with a table mapping bare file names to their relative paths.
pub struct DumpDir {
	root: PathBuf,
	relativePaths: BTreeMap<String, String>,
}

impl DumpDir {
	pub fn new(root: impl Into<PathBuf>, relativePaths: BTreeMap<String, String>) -> Self {
		Self { root: root.into(), relativePaths }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Names known to the path table, in sorted order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.relativePaths.keys().map(String::as_str)
	}
}

impl Archive for DumpDir {
	fn relativePath(&self, name: &str) -> Result<String, Error> {
		match self.relativePaths.get(name) {
			Some(relPath) => Ok(relPath.clone()),
			None if name.contains('/') => Ok(name.to_owned()),
			None => Err(Error::NotInArchive(name.to_owned())),
		}
	}

	fn path(&self, name: &str) -> Result<PathBuf, Error> {
		Ok(self.root.join(self.relativePath(name)?))
	}

	fn load(&self, name: &str) -> Result<Vec<u8>, Error> {
		let path = self.path(name)?;
		fs::read(&path).map_err(|source| Error::Io { path, source })
	}
}
