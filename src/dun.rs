//! DUN files arrange the squares of a level's TIL file into a dungeon.
//!
//! DUN format:
//!    quadWidth      u16
//!    quadHeight     u16
//!    squareIdsPlus1 [quadHeight][quadWidth]u16 // 0 for no square
//!    // dunWidth  = 2*quadWidth
//!    // dunHeight = 2*quadHeight
//!    unknown        [dunHeight][dunWidth]u16 // the trailing planes are optional
//!    monsterIds     [dunHeight][dunWidth]u16
//!    objectIds      [dunHeight][dunWidth]u16
//!    transparencies [dunHeight][dunWidth]u16

use {
	crate::{error::FormatError, til::Square, CursorExt},
	byteorder::{ByteOrder, ReadBytesExt, LE},
	core::{fmt, mem::size_of},
	log::debug,
	std::io,
};

/// The maximum number of cols and rows in a dungeon.
pub const COL_MAX: usize = 112;
pub const ROW_MAX: usize = 112;

/// Everything a DUN file places on one dungeon cell. `None` means nothing was placed, which is not the
/// same as a stored zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
	pub pillarNum: Option<u16>,
	pub unknown: Option<u16>,
	pub monsterId: Option<u16>,
	pub objectId: Option<u16>,
	pub transparency: Option<u16>,
}

/// The dense per-cell planes following the squares of a DUN file, in file order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plane {
	Unknown,
	MonsterIds,
	ObjectIds,
	Transparencies,
}

impl Plane {
	pub const ALL: [Plane; 4] = [Plane::Unknown, Plane::MonsterIds, Plane::ObjectIds, Plane::Transparencies];

	fn field(self, cell: &mut Cell) -> &mut Option<u16> {
		match self {
			Plane::Unknown => &mut cell.unknown,
			Plane::MonsterIds => &mut cell.monsterId,
			Plane::ObjectIds => &mut cell.objectId,
			Plane::Transparencies => &mut cell.transparency,
		}
	}
}

impl fmt::Display for Plane {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Plane::Unknown => "unknown",
			Plane::MonsterIds => "monsterIds",
			Plane::ObjectIds => "objectIds",
			Plane::Transparencies => "transparencies",
		})
	}
}

/// A `COL_MAX` x `ROW_MAX` map of cells. Every parse builds a fresh one.
///
/// Map coordinate system:
///
/// ```text
///                 (0, 0)
///
///                   /\
///                r /\/\ c
///               o /\/\/\ o
///              w /\/\/\/\ l
///               /\/\/\/\/\
///    (0, 111)   \/\/\/\/\/   (111, 0)
///                \/\/\/\/
///                 \/\/\/
///                  \/\/
///                   \/
///
///               (111, 111)
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Dungeon {
	cells: Vec<Cell>,
}

impl Default for Dungeon {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Dungeon {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let placed = self.cells.iter().filter(|cell| **cell != Cell::default()).count();
		f.debug_struct("Dungeon").field("placedCells", &placed).finish()
	}
}

impl Dungeon {
	pub fn new() -> Self {
		Self { cells: vec![Cell::default(); COL_MAX * ROW_MAX] }
	}

	#[inline]
	pub fn cell(&self, col: usize, row: usize) -> &Cell {
		&self.cells[col * ROW_MAX + row]
	}

	#[inline]
	fn cellMut(&mut self, col: usize, row: usize) -> &mut Cell {
		&mut self.cells[col * ROW_MAX + row]
	}

	#[inline]
	pub fn pillarNum(&self, col: usize, row: usize) -> Option<u16> {
		self.cell(col, row).pillarNum
	}

	/// Writes the four pillars of `square` into the 2x2 block whose top corner is (col, row).
	fn placeSquare(&mut self, col: usize, row: usize, square: Square) {
		self.cellMut(col, row).pillarNum = Some(square.top);
		self.cellMut(col + 1, row).pillarNum = Some(square.right);
		self.cellMut(col, row + 1).pillarNum = Some(square.left);
		self.cellMut(col + 1, row + 1).pillarNum = Some(square.bottom);
	}

	fn placeSquareId(&mut self, col: usize, row: usize, squareIdPlus1: usize, squares: &[Square]) -> Result<(), FormatError> {
		if squareIdPlus1 == 0 {
			return Ok(());
		}
		let square = squares
			.get(squareIdPlus1 - 1)
			.ok_or(FormatError::SquareOutOfRange { squareIdPlus1, squareCount: squares.len() })?;
		self.placeSquare(col, row, *square);
		Ok(())
	}

	/// Parses a DUN file, placing its squares from `[colStart, rowStart]` on.
	///
	/// Squares are placed two cols apart, `quadWidth` per row, and rows of squares two rows apart. The
	/// trailing planes are stored cell by cell, row-major. Some DUN files carry only the squares, so the
	/// input may end right where any of the trailing planes would begin.
	pub fn parse(dun: &[u8], squares: &[Square], [colStart, rowStart]: [usize; 2]) -> Result<Self, FormatError> {
		let [dunWidth, dunHeight] = dimensions(dun)?;
		let (quadWidth, quadHeight) = (dunWidth / 2, dunHeight / 2);
		checkBounds([colStart, rowStart], [dunWidth, dunHeight])?;
		let mut dungeon = Self::new();
		let cursor = &mut io::Cursor::new(dun);
		cursor.set_position(HEADER_SIZE as _);

		for i in 0..quadHeight {
			for j in 0..quadWidth {
				let (col, row) = (colStart + 2 * j, rowStart + 2 * i);
				let squareIdPlus1 =
					cursor.read_u16::<LE>().map_err(|_| FormatError::TruncatedSquares { col, row })?;
				dungeon.placeSquareId(col, row, squareIdPlus1.into(), squares)?;
			}
		}

		for plane in Plane::ALL {
			if cursor.remaining() == 0 {
				debug!("DUN data ends before the {plane} plane");
				break;
			}
			for i in 0..dunHeight {
				for j in 0..dunWidth {
					let (col, row) = (colStart + j, rowStart + i);
					let value = cursor.read_u16::<LE>().map_err(|_| FormatError::TruncatedPlane { plane, col, row })?;
					*plane.field(dungeon.cellMut(col, row)) = Some(value);
				}
			}
		}
		Ok(dungeon)
	}

	/// Parses a headerless plane of `colCount` x `rowCount` one-byte square ids plus 1, placed from the
	/// origin like the squares of a DUN file.
	pub fn parseSquareIds(
		squareIdsPlus1: &[u8],
		colCount: usize,
		rowCount: usize,
		squares: &[Square],
	) -> Result<Self, FormatError> {
		let expected = colCount * rowCount;
		if squareIdsPlus1.len() < expected {
			return Err(FormatError::SquarePlaneSize { len: squareIdsPlus1.len(), expected });
		}
		checkBounds([0, 0], [2 * colCount, 2 * rowCount])?;
		let mut dungeon = Self::new();
		for (k, &squareIdPlus1) in squareIdsPlus1[..expected].iter().enumerate() {
			let (i, j) = (k / colCount, k % colCount);
			dungeon.placeSquareId(2 * j, 2 * i, squareIdPlus1.into(), squares)?;
		}
		Ok(dungeon)
	}

	/// Parses a full `COL_MAX` x `ROW_MAX` plane of u32 pillar ids plus 1, stored col by col.
	pub fn parsePillarIds(pillarIdsPlus1: &[u8]) -> Result<Self, FormatError> {
		let expected = COL_MAX * ROW_MAX * size_of::<u32>();
		if pillarIdsPlus1.len() != expected {
			return Err(FormatError::PillarPlaneSize { len: pillarIdsPlus1.len(), expected });
		}
		let mut dungeon = Self::new();
		let entries = pillarIdsPlus1.chunks_exact(size_of::<u32>());
		for (k, (cell, entry)) in dungeon.cells.iter_mut().zip(entries).enumerate() {
			// Pillar numbers come from u16 TIL entries.
			cell.pillarNum = match LE::read_u32(entry) {
				0 => None,
				pillarIdPlus1 => Some(u16::try_from(pillarIdPlus1 - 1).map_err(|_| {
					FormatError::PillarOutOfRange { col: k / ROW_MAX, row: k % ROW_MAX, pillarIdPlus1 }
				})?),
			};
		}
		Ok(dungeon)
	}
}

const HEADER_SIZE: usize = 2 * size_of::<u16>();

/// Returns the size in cells, `[dunWidth, dunHeight]`, of the dungeon a DUN file describes.
pub fn dimensions(dun: &[u8]) -> Result<[usize; 2], FormatError> {
	match dun.get(..HEADER_SIZE) {
		Some(header) => Ok([2 * usize::from(LE::read_u16(header)), 2 * usize::from(LE::read_u16(&header[2..]))]),
		None => Err(FormatError::TruncatedHeader),
	}
}

fn checkBounds([colStart, rowStart]: [usize; 2], [width, height]: [usize; 2]) -> Result<(), FormatError> {
	if colStart + width > COL_MAX || rowStart + height > ROW_MAX {
		return Err(FormatError::OutOfBounds { colStart, rowStart, width, height });
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	const SQUARES: [Square; 3] = [
		Square { top: 10, right: 11, left: 12, bottom: 13 },
		Square { top: 20, right: 21, left: 22, bottom: 23 },
		Square { top: 0, right: 0, left: 0, bottom: 0 },
	];

	struct DunBuilder(Vec<u8>);
	impl DunBuilder {
		fn new(quadWidth: u16, quadHeight: u16) -> Self {
			Self([quadWidth.to_le_bytes(), quadHeight.to_le_bytes()].concat())
		}
		fn words(mut self, words: impl IntoIterator<Item = u16>) -> Self {
			for word in words {
				self.0.extend_from_slice(&word.to_le_bytes());
			}
			self
		}
	}

	fn placedPillars(dungeon: &Dungeon) -> Vec<(usize, usize, u16)> {
		let mut placed = Vec::new();
		for row in 0..ROW_MAX {
			for col in 0..COL_MAX {
				if let Some(pillarNum) = dungeon.pillarNum(col, row) {
					placed.push((col, row, pillarNum));
				}
			}
		}
		placed
	}

	#[test]
	fn emptySquarePlanePlacesNothing() {
		let dun = DunBuilder::new(3, 2).words([0; 6]).0;
		let dungeon = Dungeon::parse(&dun, &SQUARES, [0, 0]).unwrap();
		assert!(placedPillars(&dungeon).is_empty());
		assert_eq!(dungeon, Dungeon::new());
	}

	#[test]
	fn squaresExpandIntoQuadrants() {
		let dun = DunBuilder::new(2, 2).words([0, 0, 0, 2]).0;
		let dungeon = Dungeon::parse(&dun, &SQUARES, [0, 0]).unwrap();
		assert_eq!(placedPillars(&dungeon), [(2, 2, 20), (3, 2, 21), (2, 3, 22), (3, 3, 23)]);
	}

	#[test]
	fn zeroPillarsAreStillPlaced() {
		let dun = DunBuilder::new(1, 1).words([3]).0;
		let dungeon = Dungeon::parse(&dun, &SQUARES, [0, 0]).unwrap();
		assert_eq!(dungeon.pillarNum(1, 1), Some(0));
		assert_eq!(dungeon.pillarNum(2, 2), None);
	}

	#[test]
	fn originOffsetsTheSquares() {
		let dun = DunBuilder::new(2, 1).words([1, 0]).0;
		let dungeon = Dungeon::parse(&dun, &SQUARES, [16, 20]).unwrap();
		assert_eq!(placedPillars(&dungeon), [(16, 20, 10), (17, 20, 11), (16, 21, 12), (17, 21, 13)]);
	}

	#[test]
	fn squareIdsOutOfRangeFail() {
		let dun = DunBuilder::new(1, 1).words([4]).0;
		assert_eq!(
			Dungeon::parse(&dun, &SQUARES, [0, 0]),
			Err(FormatError::SquareOutOfRange { squareIdPlus1: 4, squareCount: 3 })
		);
	}

	#[test]
	fn truncatedHeadersAndSquaresFail() {
		assert_eq!(Dungeon::parse(&[1, 0, 1], &SQUARES, [0, 0]), Err(FormatError::TruncatedHeader));
		let dun = DunBuilder::new(2, 1).words([1]).0;
		assert_eq!(
			Dungeon::parse(&dun, &SQUARES, [0, 0]),
			Err(FormatError::TruncatedSquares { col: 2, row: 0 })
		);
	}

	#[test]
	fn dimensionsComeFromTheHeader() {
		assert_eq!(dimensions(&DunBuilder::new(3, 5).0), Ok([6, 10]));
		assert_eq!(dimensions(&[1, 0]), Err(FormatError::TruncatedHeader));
	}

	#[test]
	fn oversizedDungeonsFail() {
		let dun = DunBuilder::new(56, 1).words([0; 56]).0;
		assert!(Dungeon::parse(&dun, &SQUARES, [0, 0]).is_ok());
		assert_eq!(
			Dungeon::parse(&dun, &SQUARES, [2, 0]),
			Err(FormatError::OutOfBounds { colStart: 2, rowStart: 0, width: 112, height: 2 })
		);
	}

	#[test]
	fn trailingPlanesFillCellAttributes() {
		let dun = DunBuilder::new(1, 1)
			.words([1])
			.words([1, 2, 3, 4])
			.words([0, 5, 0, 0])
			.words([0, 0, 6, 0])
			.words([7, 7, 7, 7])
			.0;
		let dungeon = Dungeon::parse(&dun, &SQUARES, [4, 4]).unwrap();
		assert_eq!(
			*dungeon.cell(5, 4),
			Cell {
				pillarNum: Some(11),
				unknown: Some(2),
				monsterId: Some(5),
				objectId: Some(0),
				transparency: Some(7)
			}
		);
		assert_eq!(dungeon.cell(4, 5).unknown, Some(3));
		assert_eq!(dungeon.cell(4, 5).objectId, Some(6));
		assert_eq!(*dungeon.cell(6, 4), Cell::default());
	}

	#[test]
	fn endOfInputAtAPlaneBoundaryIsNotAnError() {
		let squaresOnly = DunBuilder::new(1, 1).words([2]);
		let expected = Dungeon::parse(&squaresOnly.0, &SQUARES, [0, 0]).unwrap();
		assert_eq!(expected.cell(0, 0).unknown, None);

		let withTwoPlanes = squaresOnly.words([1, 2, 3, 4]).words([5, 6, 7, 8]).0;
		let dungeon = Dungeon::parse(&withTwoPlanes, &SQUARES, [0, 0]).unwrap();
		assert_eq!(dungeon.cell(1, 1).monsterId, Some(8));
		assert_eq!(dungeon.cell(1, 1).objectId, None);
		assert_eq!(dungeon.cell(1, 1).transparency, None);
		assert_eq!(dungeon.pillarNum(1, 1), expected.pillarNum(1, 1));
	}

	#[test]
	fn endOfInputInsideAPlaneFails() {
		let dun = DunBuilder::new(1, 1).words([2]).words([1, 2, 3, 4]).words([5]).0;
		assert_eq!(
			Dungeon::parse(&dun, &SQUARES, [0, 0]),
			Err(FormatError::TruncatedPlane { plane: Plane::MonsterIds, col: 1, row: 0 })
		);

		let mut oddByte = DunBuilder::new(1, 1).words([2]).0;
		oddByte.push(0);
		assert_eq!(
			Dungeon::parse(&oddByte, &SQUARES, [0, 0]),
			Err(FormatError::TruncatedPlane { plane: Plane::Unknown, col: 0, row: 0 })
		);
	}

	#[test]
	fn fixedSizeSquareIdsArePlacedRowByRow() {
		let dungeon = Dungeon::parseSquareIds(&[0, 1, 2, 0, 0, 0, 9], 3, 2, &SQUARES).unwrap();
		assert_eq!(
			placedPillars(&dungeon),
			[(2, 0, 10), (3, 0, 11), (4, 0, 20), (5, 0, 21), (2, 1, 12), (3, 1, 13), (4, 1, 22), (5, 1, 23)]
		);
		assert_eq!(
			Dungeon::parseSquareIds(&[0; 5], 3, 2, &SQUARES),
			Err(FormatError::SquarePlaneSize { len: 5, expected: 6 })
		);
		assert!(matches!(
			Dungeon::parseSquareIds(&[0; 57], 57, 1, &SQUARES),
			Err(FormatError::OutOfBounds { .. })
		));
	}

	#[test]
	fn pillarIdsAreStoredColByCol() {
		let mut plane = vec![0; COL_MAX * ROW_MAX * 4];
		plane[4..8].copy_from_slice(&8_u32.to_le_bytes());
		plane[ROW_MAX * 4..][..4].copy_from_slice(&1_u32.to_le_bytes());
		let dungeon = Dungeon::parsePillarIds(&plane).unwrap();
		assert_eq!(placedPillars(&dungeon), [(1, 0, 0), (0, 1, 7)]);
		assert!(matches!(Dungeon::parsePillarIds(&plane[4..]), Err(FormatError::PillarPlaneSize { .. })));
	}

	#[test]
	fn pillarIdsWiderThanAPillarNumberFail() {
		let mut plane = vec![0; COL_MAX * ROW_MAX * 4];
		plane[(2 * ROW_MAX + 5) * 4..][..4].copy_from_slice(&0x2_0000_u32.to_le_bytes());
		assert_eq!(
			Dungeon::parsePillarIds(&plane),
			Err(FormatError::PillarOutOfRange { col: 2, row: 5, pillarIdPlus1: 0x2_0000 })
		);

		plane[(2 * ROW_MAX + 5) * 4..][..4].copy_from_slice(&0x1_0000_u32.to_le_bytes());
		assert_eq!(Dungeon::parsePillarIds(&plane).unwrap().pillarNum(2, 5), Some(u16::MAX));
	}
}
