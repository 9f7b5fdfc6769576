//! Dump jobs: DUN files in, one PNG per palette out.

use {
	crate::{
		archive::{Archive, DumpDir},
		config::{Config, LevelConf},
		dun::{self, Dungeon},
		error::{Error, ResourceError},
		image::{Image, Palette},
		isometric::{self, ArchOverlays},
		level::Level,
		min::{self, PILLAR_WIDTH},
		til,
	},
	log::{debug, info},
	std::{
		collections::HashMap,
		fs::{self, File},
		io::{BufWriter, Write},
		path::{Path, PathBuf},
	},
};

/// Root of everything the dump tools write.
pub const DUMP_PREFIX: &str = "_dump_/";

/// Renders dungeons of an extracted archive into PNG files below an output directory.
pub struct Dumper {
	config: Config,
	archive: DumpDir,
	arches: HashMap<Level, ArchOverlays>,
	outputDir: PathBuf,
}

impl Dumper {
	/// Opens the archive of `config` and decodes the arch overlays of every configured level up front.
	/// Arch overlays only exist for l1.
	pub fn new(config: Config, outputDir: impl Into<PathBuf>) -> Result<Self, Error> {
		let archive = DumpDir::new(config.archive.clone(), config.paths.clone());
		let mut arches = HashMap::new();
		for level in Level::ALL {
			if let Some(arch) = config.level(level).and_then(|levelConf| levelConf.arches.as_ref()) {
				if level != Level::L1 {
					return Err(ResourceError::ArchesUnsupported(level.name().to_owned()).into());
				}
				debug!("decoding {level} arches from {:?}", arch.sheet);
				let palette = arch.palette.as_deref().map(|name| loadPalette(&archive, name)).transpose()?;
				let frames = loadFrames(&archive, &arch.sheet, palette.as_ref(), [PILLAR_WIDTH, arch.frameHeight])?;
				arches.insert(level, ArchOverlays::new(frames)?);
			}
		}
		Ok(Self { config, archive, arches, outputDir: outputDir.into() })
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Dumps a DUN file of the archive; its level follows from where the archive keeps it.
	pub fn dumpDun(&self, dunName: &str) -> Result<Vec<PathBuf>, Error> {
		let level = Level::ofDun(&self.archive, dunName)?;
		let squares = til::resolve(&self.archive, level)?;
		let dun = self.archive.load(dunName)?;
		let origin = self.config.origin(dunName);
		let dungeon = Dungeon::parse(&dun, &squares, origin)?;
		let [dunWidth, dunHeight] = dun::dimensions(&dun)?;
		self.writeImages(dunName, level, &dungeon, origin[0] + dunWidth, origin[1] + dunHeight)
	}

	/// Dumps a headerless `colCount` x `rowCount` plane of one-byte square ids.
	pub fn dumpSquareIds(
		&self,
		name: &str,
		squareIdsPlus1: &[u8],
		[colCount, rowCount]: [usize; 2],
		level: Level,
	) -> Result<Vec<PathBuf>, Error> {
		let squares = til::resolve(&self.archive, level)?;
		let dungeon = Dungeon::parseSquareIds(squareIdsPlus1, colCount, rowCount, &squares)?;
		self.writeImages(name, level, &dungeon, 2 * colCount, 2 * rowCount)
	}

	/// Composites `dungeon` once per palette of its level and writes each result.
	fn writeImages(
		&self,
		name: &str,
		level: Level,
		dungeon: &Dungeon,
		colCount: usize,
		rowCount: usize,
	) -> Result<Vec<PathBuf>, Error> {
		let LevelConf { frames, palettes, .. } =
			self.config.level(level).ok_or_else(|| ResourceError::UnconfiguredLevel(level.name().to_owned()))?;
		let pillars = min::resolve(&self.archive, level)?;
		let arches = self.arches.get(&level);
		let variants: Vec<Option<&str>> =
			if palettes.is_empty() { vec![None] } else { palettes.iter().map(|pal| Some(pal.as_str())).collect() };
		let mut written = Vec::with_capacity(variants.len());
		for palName in variants {
			let palette = palName.map(|palName| loadPalette(&self.archive, palName)).transpose()?;
			if let Some(palName) = palName {
				debug!("using palette {palName:?}");
			}
			let levelFrames =
				loadFrames(&self.archive, frames, palette.as_ref(), [min::BLOCK_WIDTH, min::BLOCK_HEIGHT])?;
			let image = isometric::composite(dungeon, colCount, rowCount, &pillars, &levelFrames, arches)?;
			let path = dumpPath(&self.outputDir, name, palName.filter(|_| palettes.len() > 1));
			writePNG(&path, &image)?;
			written.push(path);
		}
		Ok(written)
	}
}

/// Output path of a dungeon image. Only the file stems of `name` and `palName` are used, so the path never
/// leaves `outputDir`.
///
/// ```text
/// {outputDir}/{stem}.png
/// {outputDir}/{stem}/{stem}_{palStem}.png
/// ```
pub fn dumpPath(outputDir: &Path, name: &str, palName: Option<&str>) -> PathBuf {
	let stem = fileStem(name);
	match palName {
		None => outputDir.join(format!("{stem}.png")),
		Some(palName) => outputDir.join(stem).join(format!("{stem}_{}.png", fileStem(palName))),
	}
}

fn fileStem(name: &str) -> &str {
	let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
	let stem = match base.rfind('.') {
		Some(index) if index > 0 => &base[..index],
		_ => base,
	};
	match stem {
		"" | "." | ".." => "_",
		stem => stem,
	}
}

fn loadPalette(archive: &impl Archive, name: &str) -> Result<Palette, Error> {
	Ok(Palette::new(&archive.load(name)?)?)
}

fn loadFrames(
	archive: &impl Archive,
	sheet: &str,
	palette: Option<&Palette>,
	[frameWidth, frameHeight]: [usize; 2],
) -> Result<Vec<Image>, Error> {
	let png = archive.load(sheet)?;
	Ok(Image::fromPNG(sheet, png.as_slice(), palette)?.frames(sheet, frameWidth, frameHeight)?)
}

fn writePNG(path: &Path, image: &Image) -> Result<(), Error> {
	let ioError = |source| Error::Io { path: path.to_owned(), source };
	if let Some(dir) = path.parent() {
		fs::create_dir_all(dir).map_err(ioError)?;
	}
	let writer = &mut BufWriter::new(File::create(path).map_err(ioError)?);
	info!("creating image {:?}", path.file_name().unwrap_or(path.as_os_str()));
	image.writePNG(&mut *writer).map_err(|source| Error::Encode { path: path.to_owned(), source })?;
	writer.flush().map_err(ioError)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dumpPathsStayInsideTheOutputDir() {
		let out = Path::new("_dump_/_dun_");
		assert_eq!(dumpPath(out, "skngdo.dun", None), Path::new("_dump_/_dun_/skngdo.png"));
		assert_eq!(dumpPath(out, "levels/l1data/../../x.dun", None), Path::new("_dump_/_dun_/x.png"));
		assert_eq!(
			dumpPath(out, "sector1s.dun", Some("levels/towndata/town2.pal")),
			Path::new("_dump_/_dun_/sector1s/sector1s_town2.png")
		);
	}

	#[test]
	fn fileStemsDropDirectoriesAndExtensions() {
		assert_eq!(fileStem("a/b.c/d.dun"), "d");
		assert_eq!(fileStem("dungeon"), "dungeon");
		assert_eq!(fileStem(".hidden"), ".hidden");
		assert_eq!(fileStem("a/..."), "_");
	}
}
