use {
	crate::{
		error::{FormatError, ResourceError},
		PAL_LEN,
	},
	glam::IVec2,
	png::{BitDepth, ColorType, Transformations},
	std::io::{Read, Write},
};

pub type Rgba = [u8; 4];

pub const FULLY_TRANSPARENT: Rgba = [0; 4];

/// Palette index drawn as a hole in indexed frame sheets.
pub const TRANSPARENT_INDEX: u8 = 0;

/// A raw palette of 256 RGB triplets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette(Box<[u8; PAL_LEN]>);

impl Palette {
	pub fn new(pal: &[u8]) -> Result<Self, FormatError> {
		<[u8; PAL_LEN]>::try_from(pal).map(|colors| Self(Box::new(colors))).map_err(|_| FormatError::PaletteSize(pal.len()))
	}

	#[inline]
	pub fn color(&self, index: u8) -> Rgba {
		if index == TRANSPARENT_INDEX {
			return FULLY_TRANSPARENT;
		}
		let i = index as usize * 3;
		[self.0[i + 0], self.0[i + 1], self.0[i + 2], u8::MAX]
	}
}

/// An RGBA raster, used both for the tiles being drawn and for the canvas they are drawn into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
	pub width: usize,
	pub height: usize,
	pub data: Vec<u8>,
}

impl Image {
	/// A fully transparent image.
	pub fn fromWidthHeight(width: usize, height: usize) -> Self {
		Self { width, height, data: vec![0; width * height * 4] }
	}

	pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
		Self { width, height, data: color.repeat(width * height) }
	}

	#[inline]
	pub fn pixel(&self, [x, y]: [usize; 2]) -> Rgba {
		let i = (y * self.width + x) * 4;
		[self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
	}

	#[inline]
	pub fn putpixel(&mut self, [x, y]: [usize; 2], color: Rgba) {
		let i = (y * self.width + x) * 4;
		self.data[i..i + 4].copy_from_slice(&color);
	}

	pub fn isBlank(&self) -> bool {
		self.data.chunks_exact(4).all(|pixel| pixel[3] == 0)
	}

	/// Draws `src` with its top left corner at `at`, clipped to this image.
	///
	/// Opaque source pixels replace the destination, fully transparent ones leave it untouched and anything
	/// in between is alpha-blended over it.
	pub fn drawOver(&mut self, at: IVec2, src: &Image) {
		let (x0, y0) = (at.x.max(0), at.y.max(0));
		let x1 = (at.x + src.width as i32).min(self.width as i32);
		let y1 = (at.y + src.height as i32).min(self.height as i32);
		for y in y0..y1 {
			for x in x0..x1 {
				let source = src.pixel([(x - at.x) as _, (y - at.y) as _]);
				match source[3] {
					0 => {}
					u8::MAX => self.putpixel([x as _, y as _], source),
					_ => {
						let blended = over(source, self.pixel([x as _, y as _]));
						self.putpixel([x as _, y as _], blended);
					}
				}
			}
		}
	}

	/// Decodes an 8-bit PNG. Indexed images are colourised by `palette`, or by their own palette when none is
	/// given, with index 0 transparent.
	pub fn fromPNG(name: &str, png: impl Read, palette: Option<&Palette>) -> Result<Self, ResourceError> {
		let pngError = |source| ResourceError::Png { name: name.to_owned(), source };
		let mut decoder = png::Decoder::new(png);
		decoder.set_transformations(Transformations::IDENTITY);
		let mut reader = decoder.read_info().map_err(pngError)?;
		let embeddedPalette = match reader.info().palette.as_deref() {
			Some(colors) if palette.is_none() => {
				let mut pal = colors.to_vec();
				pal.resize(PAL_LEN, 0);
				Some(Palette::new(&pal).map_err(|_| ResourceError::MissingPalette(name.to_owned()))?)
			}
			_ => None,
		};
		let buffer = &mut vec![0; reader.output_buffer_size()];
		let info = reader.next_frame(buffer).map_err(pngError)?;
		if info.bit_depth != BitDepth::Eight {
			return Err(ResourceError::UnsupportedPng {
				name: name.to_owned(),
				colorType: info.color_type,
				bitDepth: info.bit_depth as _,
			});
		}
		let (width, height) = (info.width as usize, info.height as usize);
		let mut image = Self::fromWidthHeight(width, height);
		for (y, line) in buffer.chunks(info.line_size).take(height).enumerate() {
			for x in 0..width {
				let color = match info.color_type {
					ColorType::Indexed => match palette.or(embeddedPalette.as_ref()) {
						Some(palette) => palette.color(line[x]),
						None => return Err(ResourceError::MissingPalette(name.to_owned())),
					},
					ColorType::Rgba => [line[x * 4], line[x * 4 + 1], line[x * 4 + 2], line[x * 4 + 3]],
					ColorType::Rgb => [line[x * 3], line[x * 3 + 1], line[x * 3 + 2], u8::MAX],
					ColorType::GrayscaleAlpha => {
						let [gray, alpha] = [line[x * 2], line[x * 2 + 1]];
						[gray, gray, gray, alpha]
					}
					ColorType::Grayscale => [line[x], line[x], line[x], u8::MAX],
				};
				image.putpixel([x, y], color);
			}
		}
		Ok(image)
	}

	pub fn writePNG(&self, writer: impl Write) -> Result<(), png::EncodingError> {
		let mut png = png::Encoder::new(writer, self.width as _, self.height as _);
		png.set_color(ColorType::Rgba);
		png.set_depth(BitDepth::Eight);
		png.write_header()?.write_image_data(&self.data)
	}

	/// Cuts a frame sheet into `frameWidth` x `frameHeight` frames, row by row.
	pub fn frames(&self, name: &str, frameWidth: usize, frameHeight: usize) -> Result<Vec<Image>, ResourceError> {
		if frameWidth == 0
			|| frameHeight == 0
			|| self.width % frameWidth != 0
			|| self.height % frameHeight != 0
		{
			return Err(ResourceError::SheetSize {
				name: name.to_owned(),
				width: self.width,
				height: self.height,
				frameWidth,
				frameHeight,
			});
		}
		let (columns, rows) = (self.width / frameWidth, self.height / frameHeight);
		let mut frames = Vec::with_capacity(columns * rows);
		for row in 0..rows {
			for column in 0..columns {
				let mut frame = Self::fromWidthHeight(frameWidth, frameHeight);
				for y in 0..frameHeight {
					let start = ((row * frameHeight + y) * self.width + column * frameWidth) * 4;
					frame.data[y * frameWidth * 4..][..frameWidth * 4]
						.copy_from_slice(&self.data[start..start + frameWidth * 4]);
				}
				frames.push(frame);
			}
		}
		Ok(frames)
	}
}

/// Porter-Duff "over" of two non-premultiplied colours.
fn over(src: Rgba, dst: Rgba) -> Rgba {
	let (srcAlpha, dstAlpha) = (u32::from(src[3]), u32::from(dst[3]));
	let dstWeight = dstAlpha * (255 - srcAlpha) / 255;
	let outAlpha = srcAlpha + dstWeight;
	if outAlpha == 0 {
		return FULLY_TRANSPARENT;
	}
	let mut out = [0, 0, 0, outAlpha as u8];
	for i in 0..3 {
		out[i] = ((u32::from(src[i]) * srcAlpha + u32::from(dst[i]) * dstWeight) / outAlpha) as u8;
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	const RED: Rgba = [255, 0, 0, 255];
	const BLUE: Rgba = [0, 0, 255, 255];

	fn indexedPNG(width: u32, height: u32, indices: &[u8]) -> Vec<u8> {
		let mut png = Vec::new();
		{
			let mut encoder = png::Encoder::new(&mut png, width, height);
			encoder.set_color(ColorType::Indexed);
			encoder.set_palette(&[0, 0, 0, 255, 0, 0, 0, 0, 255][..]);
			encoder.write_header().unwrap().write_image_data(indices).unwrap();
		}
		png
	}

	#[test]
	fn paletteSizeIsChecked() {
		assert!(Palette::new(&[0; PAL_LEN]).is_ok());
		assert_eq!(Palette::new(&[0; 10]), Err(FormatError::PaletteSize(10)));
	}

	#[test]
	fn drawOverSkipsTransparentPixelsAndClips() {
		let mut canvas = Image::filled(4, 4, BLUE);
		let mut src = Image::filled(2, 2, RED);
		src.putpixel([1, 1], FULLY_TRANSPARENT);
		canvas.drawOver(IVec2::new(3, -1), &src);
		assert_eq!(canvas.pixel([3, 0]), RED);
		assert_eq!(canvas.pixel([2, 0]), BLUE);
		canvas.drawOver(IVec2::new(0, 0), &src);
		assert_eq!(canvas.pixel([0, 0]), RED);
		assert_eq!(canvas.pixel([1, 1]), BLUE);
	}

	#[test]
	fn drawOverBlendsTranslucentPixels() {
		let mut canvas = Image::filled(1, 1, BLUE);
		canvas.drawOver(IVec2::ZERO, &Image::filled(1, 1, [255, 0, 0, 128]));
		let [r, g, b, a] = canvas.pixel([0, 0]);
		assert_eq!((g, a), (0, 255));
		assert!(r > 100 && b > 100);
	}

	#[test]
	fn decodesIndexedSheetsWithAnExternalPalette() {
		let png = indexedPNG(2, 1, &[0, 2]);
		let embedded = Image::fromPNG("sheet.png", png.as_slice(), None).unwrap();
		assert_eq!(embedded.pixel([0, 0]), FULLY_TRANSPARENT);
		assert_eq!(embedded.pixel([1, 0]), BLUE);

		let mut pal = [0; PAL_LEN];
		pal[6..9].copy_from_slice(&[0, 255, 0]);
		let palette = Palette::new(&pal).unwrap();
		let recoloured = Image::fromPNG("sheet.png", png.as_slice(), Some(&palette)).unwrap();
		assert_eq!(recoloured.pixel([0, 0]), FULLY_TRANSPARENT);
		assert_eq!(recoloured.pixel([1, 0]), [0, 255, 0, 255]);
	}

	#[test]
	fn writtenPNGsDecodeBack() {
		let mut image = Image::fromWidthHeight(3, 2);
		image.putpixel([2, 1], RED);
		let mut png = Vec::new();
		image.writePNG(&mut png).unwrap();
		assert_eq!(Image::fromPNG("out.png", png.as_slice(), None).unwrap(), image);
	}

	#[test]
	fn splitsSheetsRowByRow() {
		let mut sheet = Image::fromWidthHeight(4, 4);
		sheet.putpixel([2, 0], RED);
		sheet.putpixel([0, 2], BLUE);
		let frames = sheet.frames("sheet.png", 2, 2).unwrap();
		assert_eq!(frames.len(), 4);
		assert_eq!(frames[1].pixel([0, 0]), RED);
		assert_eq!(frames[2].pixel([0, 0]), BLUE);
		assert!(frames[0].isBlank() && frames[3].isBlank());
		assert!(matches!(sheet.frames("sheet.png", 3, 2), Err(ResourceError::SheetSize { .. })));
	}
}
