//! TIL files hold the square table of a level.
//!
//! TIL format:
//!    squares [N]struct {
//!        top, right, left, bottom u16 // pillar numbers
//!    }

use {
	crate::{
		archive::Archive,
		error::{Error, FormatError},
		level::Level,
	},
	byteorder::{ReadBytesExt, LE},
	core::mem::size_of,
	std::io,
};

/// Four pillars forming a 2x2 block of dungeon cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Square {
	pub top: u16,
	pub right: u16,
	pub left: u16,
	pub bottom: u16,
}

const SQUARE_SIZE: usize = 4 * size_of::<u16>();

pub fn parse(til: &[u8]) -> Result<Vec<Square>, FormatError> {
	if til.len() % SQUARE_SIZE != 0 {
		return Err(FormatError::SquareTableSize(til.len()));
	}
	let mut cursor = io::Cursor::new(til);
	let count = til.len() / SQUARE_SIZE;
	let mut squares = Vec::with_capacity(count);
	for _ in 0..count {
		let mut next = || cursor.read_u16::<LE>().map_err(|_| FormatError::SquareTableSize(til.len()));
		squares.push(Square { top: next()?, right: next()?, left: next()?, bottom: next()? });
	}
	Ok(squares)
}

/// Loads the square table of `level` from the archive.
pub fn resolve(archive: &impl Archive, level: Level) -> Result<Vec<Square>, Error> {
	Ok(parse(&archive.load(&format!("{level}.til"))?)?)
}
