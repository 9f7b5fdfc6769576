//! Isometric rendering of a parsed dungeon.

use {
	crate::{
		dun::{Dungeon, COL_MAX, ROW_MAX},
		error::ResourceError,
		image::Image,
		min::{Pillar, BLOCK_HEIGHT, BLOCK_WIDTH, PILLAR_WIDTH},
	},
	core::cmp::{max, min},
	glam::IVec2,
};

/// Screen rectangle of a pillar; `max` is exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
	pub min: IVec2,
	pub max: IVec2,
}

/// Returns the screen rectangle of the pillar at (col, row). Each col moves a pillar one block right and half
/// a block down, each row one block left and half a block down, so (0, 0) is the top corner of the map.
///
/// ref: [`Dungeon`] (illustration of the map coordinate system)
pub fn pillarRect(col: usize, row: usize, mapWidth: usize, pillarHeight: usize) -> Rect {
	let [col, row] = [col as i32, row as i32];
	let [blockWidth, blockHeight] = [BLOCK_WIDTH as i32, BLOCK_HEIGHT as i32];
	let min = IVec2::new(
		mapWidth as i32 / 2 - blockWidth - row * blockWidth + col * blockWidth,
		row * (blockHeight / 2) + col * (blockHeight / 2),
	);
	Rect { min, max: min + IVec2::new(PILLAR_WIDTH as _, pillarHeight as _) }
}

/// Returns the canvas size for a dungeon of `colCount` x `rowCount` cells.
///
/// The size is computed for a square map of the larger of both counts, so non-square dungeons get a canvas
/// that is too large and not centred on them.
pub fn mapDimensions(colCount: usize, rowCount: usize, pillarHeight: usize) -> [usize; 2] {
	let maxCount = max(colCount, rowCount);
	let mapWidth = 2 * maxCount * BLOCK_WIDTH;
	let mapHeight = (2 * maxCount * (BLOCK_HEIGHT / 2) + pillarHeight).saturating_sub(BLOCK_HEIGHT);
	[mapWidth, mapHeight]
}

// Arch ids for layout 1, indices into the arch overlay frames.
pub const ARCH_SW: usize = 0;
pub const ARCH_SE: usize = 1;
pub const ARCH_SE_BROKEN: usize = 2;
pub const ARCH_SW_BROKEN2: usize = 3;
pub const ARCH_SW2: usize = 4;
pub const ARCH_SW_BROKEN: usize = 5;
pub const ARCH_SW_DOOR: usize = 6;
pub const ARCH_SE_DOOR: usize = 7;

// Pillar numbers of the floor shadows below arches, layout 1.
const PILLARS_FLOOR_SHADOW_ARCH_SW: [u16; 6] = [11, 70, 210, 320, 340, 417];
const PILLARS_FLOOR_SHADOW_ARCH_SE: [u16; 6] = [10, 248, 324, 330, 343, 420];
const PILLAR_FLOOR_SHADOW_ARCH_SW_BROKEN2: u16 = 254;
const PILLAR_FLOOR_SHADOW_ARCH_SW2: u16 = 258;

/// Arch ids `archId` can return.
const USED_ARCH_IDS: [usize; 4] = [ARCH_SW, ARCH_SE, ARCH_SW_BROKEN2, ARCH_SW2];

/// Returns the arch drawn on top of the given pillar, if any.
pub fn archId(pillarNum: u16) -> Option<usize> {
	match pillarNum {
		_ if PILLARS_FLOOR_SHADOW_ARCH_SW.contains(&pillarNum) => Some(ARCH_SW),
		_ if PILLARS_FLOOR_SHADOW_ARCH_SE.contains(&pillarNum) => Some(ARCH_SE),
		PILLAR_FLOOR_SHADOW_ARCH_SW_BROKEN2 => Some(ARCH_SW_BROKEN2),
		PILLAR_FLOOR_SHADOW_ARCH_SW2 => Some(ARCH_SW2),
		_ => None,
	}
}

/// Decoded arch frames, shared by every dungeon of a level.
#[derive(Debug)]
pub struct ArchOverlays {
	frames: Vec<Image>,
}

impl ArchOverlays {
	/// Fails unless every arch `archId` can return has a frame.
	pub fn new(frames: Vec<Image>) -> Result<Self, ResourceError> {
		match USED_ARCH_IDS.into_iter().find(|&archId| archId >= frames.len()) {
			Some(archId) => Err(ResourceError::MissingArch { archId, count: frames.len() }),
			None => Ok(Self { frames }),
		}
	}

	pub fn get(&self, archId: usize) -> Option<&Image> {
		self.frames.get(archId)
	}
}

/// Draws the pillars of the first `colCount` x `rowCount` cells of `dungeon`.
///
/// Pillars are drawn row by row, and within a row col by col, each over what was drawn before. Pillars further
/// down the screen thereby cover the ones behind them. Arch overlays, when given, are drawn over the floor
/// shadow pillars they belong to right after them.
pub fn composite(
	dungeon: &Dungeon,
	colCount: usize,
	rowCount: usize,
	pillars: &[Pillar],
	frames: &[Image],
	arches: Option<&ArchOverlays>,
) -> Result<Image, ResourceError> {
	let pillarHeight = pillars.first().ok_or(ResourceError::EmptyPillarTable)?.height();
	let [mapWidth, mapHeight] = mapDimensions(colCount, rowCount, pillarHeight);
	let mut dst = Image::fromWidthHeight(mapWidth, mapHeight);
	let rasters = &mut vec![None; pillars.len()];
	for row in 0..min(rowCount, ROW_MAX) {
		for col in 0..min(colCount, COL_MAX) {
			let Some(pillarNum) = dungeon.pillarNum(col, row) else {
				continue;
			};
			let rect = pillarRect(col, row, mapWidth, pillarHeight);
			let raster: &Image = match rasters.get_mut(pillarNum as usize) {
				Some(Some(raster)) => raster,
				Some(slot) => slot.insert(pillars[pillarNum as usize].rasterize(frames)?),
				None => {
					return Err(ResourceError::MissingPillar { pillarNum: pillarNum.into(), count: pillars.len() })
				}
			};
			dst.drawOver(rect.min, raster);
			if let Some(arch) = arches.zip(archId(pillarNum)).and_then(|(arches, archId)| arches.get(archId)) {
				dst.drawOver(rect.min, arch);
			}
		}
	}
	Ok(dst)
}
