//! MIN files hold the pillar table of a level.
//!
//! MIN format:
//!    pillars [N]struct {
//!        blocks [blocksPerPillar]u16 // two per row, top to bottom
//!    }
//!
//! The low 12 bits of a block are its frame number plus 1 (0 for a transparent block), the high 4 bits
//! its block type.

use {
	crate::{
		archive::Archive,
		error::{Error, FormatError, ResourceError},
		image::Image,
		level::Level,
	},
	byteorder::{ByteOrder, LE},
	core::mem::size_of,
	glam::IVec2,
};

pub const BLOCK_WIDTH: usize = 32;
pub const BLOCK_HEIGHT: usize = 32;
pub const PILLAR_WIDTH: usize = 2 * BLOCK_WIDTH;

const FRAME_NUM_MASK: u16 = 0x0FFF;
const BLOCK_TYPE_OFFSET: u16 = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block(pub u16);

impl Block {
	#[inline]
	pub fn frameNum(self) -> Option<usize> {
		(self.0 & FRAME_NUM_MASK).checked_sub(1).map(usize::from)
	}

	#[inline]
	pub fn blockType(self) -> u8 {
		(self.0 >> BLOCK_TYPE_OFFSET) as _
	}
}

/// A column of blocks, two blocks wide, forming the graphics of one dungeon cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pillar {
	pub blocks: Vec<Block>,
}

impl Pillar {
	pub fn height(&self) -> usize {
		self.blocks.len().div_ceil(2) * BLOCK_HEIGHT
	}

	/// Draws the pillar's blocks from the level frame set.
	pub fn rasterize(&self, frames: &[Image]) -> Result<Image, ResourceError> {
		let mut image = Image::fromWidthHeight(PILLAR_WIDTH, self.height());
		for (i, block) in self.blocks.iter().enumerate() {
			if let Some(frameNum) = block.frameNum() {
				let frame = frames
					.get(frameNum)
					.ok_or(ResourceError::MissingFrame { frameNum, count: frames.len() })?;
				let at = [(i % 2) * BLOCK_WIDTH, (i / 2) * BLOCK_HEIGHT];
				image.drawOver(IVec2::new(at[0] as _, at[1] as _), frame);
			}
		}
		Ok(image)
	}
}

pub fn parse(min: &[u8], blocksPerPillar: usize) -> Result<Vec<Pillar>, FormatError> {
	let pillarSize = blocksPerPillar * size_of::<u16>();
	if pillarSize == 0 || min.len() % pillarSize != 0 {
		return Err(FormatError::PillarTableSize { len: min.len(), blocksPerPillar });
	}
	Ok(min
		.chunks_exact(pillarSize)
		.map(|pillar| Pillar {
			blocks: pillar.chunks_exact(size_of::<u16>()).map(|block| Block(LE::read_u16(block))).collect(),
		})
		.collect())
}

/// Loads the pillar table of `level` from the archive.
pub fn resolve(archive: &impl Archive, level: Level) -> Result<Vec<Pillar>, Error> {
	Ok(parse(&archive.load(&format!("{level}.min"))?, level.blocksPerPillar())?)
}
