use {
	crate::dun::Plane,
	png::ColorType,
	std::{io, path::PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{path:?}: {source}")]
	Io { path: PathBuf, source: io::Error },

	#[error("{0:?}: no relative path in the archive")]
	NotInArchive(String),

	#[error("{path:?}: {source}")]
	Config { path: PathBuf, source: toml::de::Error },

	#[error("{path:?}: {source}")]
	Encode { path: PathBuf, source: png::EncodingError },

	#[error(transparent)]
	Format(#[from] FormatError),

	#[error(transparent)]
	Resource(#[from] ResourceError),
}

/// Malformed or truncated input data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
	#[error("DUN header truncated")]
	TruncatedHeader,

	#[error("square plane truncated at ({col}, {row})")]
	TruncatedSquares { col: usize, row: usize },

	#[error("square id {squareIdPlus1} out of range (square table holds {squareCount})")]
	SquareOutOfRange { squareIdPlus1: usize, squareCount: usize },

	#[error("{plane} plane truncated at ({col}, {row})")]
	TruncatedPlane { plane: Plane, col: usize, row: usize },

	#[error("{width}x{height} cells at ({colStart}, {rowStart}) exceed the dungeon bounds")]
	OutOfBounds { colStart: usize, rowStart: usize, width: usize, height: usize },

	#[error("square plane holds {len} bytes, {expected} expected")]
	SquarePlaneSize { len: usize, expected: usize },

	#[error("pillar plane holds {len} bytes, {expected} expected")]
	PillarPlaneSize { len: usize, expected: usize },

	#[error("pillar id {pillarIdPlus1} at ({col}, {row}) does not fit a pillar number")]
	PillarOutOfRange { col: usize, row: usize, pillarIdPlus1: u32 },

	#[error("TIL size {0} is not a multiple of a square's size")]
	SquareTableSize(usize),

	#[error("MIN size {len} is not a multiple of {blocksPerPillar} blocks per pillar")]
	PillarTableSize { len: usize, blocksPerPillar: usize },

	#[error("palette size {0} != {len}", len = crate::PAL_LEN)]
	PaletteSize(usize),

	#[error("invalid level directory {0:?}")]
	UnknownLevelDirectory(String),

	#[error("unknown level {0:?}")]
	UnknownLevel(String),
}

/// Raster data that could not be decoded or does not fit the tables referencing it.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
	#[error("{name:?}: {source}")]
	Png { name: String, source: png::DecodingError },

	#[error("{name:?}: unsupported PNG layout ({colorType:?}, {bitDepth}-bit)")]
	UnsupportedPng { name: String, colorType: ColorType, bitDepth: u8 },

	#[error("{name:?}: {width}x{height} is not a grid of {frameWidth}x{frameHeight} frames")]
	SheetSize { name: String, width: usize, height: usize, frameWidth: usize, frameHeight: usize },

	#[error("{0:?}: indexed sheet without a palette")]
	MissingPalette(String),

	#[error("frame {frameNum} missing from a frame set of {count}")]
	MissingFrame { frameNum: usize, count: usize },

	#[error("pillar {pillarNum} missing from a pillar table of {count}")]
	MissingPillar { pillarNum: usize, count: usize },

	#[error("empty pillar table")]
	EmptyPillarTable,

	#[error("arch {archId} missing from an overlay set of {count}")]
	MissingArch { archId: usize, count: usize },

	#[error("level {0:?} has no arch overlays, only l1 does")]
	ArchesUnsupported(String),

	#[error("level {0:?} has no frame sheet configured")]
	UnconfiguredLevel(String),
}
