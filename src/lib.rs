#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

//! Renders Diablo DUN dungeon layouts into isometric PNG images.
//!
//! A DUN file places squares (TIL) on a grid; every square expands into four pillars (MIN), which are
//! drawn back to front at their isometric screen positions.

pub mod archive;
pub mod config;
pub mod dump;
pub mod dun;
pub mod error;
pub mod image;
pub mod isometric;
pub mod level;
pub mod min;
pub mod til;

pub use error::{Error, FormatError, ResourceError};

use std::io;

/// Size of a raw RGB palette file.
pub const PAL_LEN: usize = 256 * 3;

pub trait CursorExt {
	fn remaining(&self) -> usize;
}
impl<T: AsRef<[u8]>> CursorExt for io::Cursor<T> {
	#[inline]
	fn remaining(&self) -> usize {
		(self.get_ref().as_ref().len() as u64).saturating_sub(self.position()) as _
	}
}
