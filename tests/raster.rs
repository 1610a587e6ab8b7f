use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lsbsteg::{bits, decode, decode_with, encode, raster, CodecOptions, Error, PixelSource};
use std::{fs, io::Cursor, process::Command};

fn gradient(width: u32, height: u32) -> PixelSource {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7) as u8, (y * 13) as u8, (x + y) as u8])
    });
    PixelSource::from_decoded_image(&DynamicImage::ImageRgb8(image)).unwrap()
}

fn flat(width: u32, height: u32) -> PixelSource {
    let image = RgbImage::from_pixel(width, height, Rgb([100, 150, 200]));
    PixelSource::from_decoded_image(&DynamicImage::ImageRgb8(image)).unwrap()
}

#[test]
fn png_file_round_trip() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("stego.png");

    let cover = gradient(32, 24);
    let message = b"a very very secret message";
    raster::save(&encode(&cover, message)?, &path)?;

    let stego = raster::open(&path)?;
    assert_eq!(decode(&stego), message);
    Ok(())
}

#[test]
fn bmp_file_round_trip() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("stego.bmp");

    let cover = gradient(17, 9);
    let message = "ünïcödé 🦀".as_bytes();
    raster::save(&encode(&cover, message)?, &path)?;

    let extraction = decode_with(&raster::open(&path)?, &CodecOptions::default())?;
    assert!(extraction.terminated);
    assert_eq!(extraction.message, message);
    Ok(())
}

#[test]
fn jpeg_input_png_output() -> Result<(), Error> {
    let mut jpeg = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 20, Rgb([90, 160, 30])))
        .write_to(&mut jpeg, ImageFormat::Jpeg)?;

    let cover = raster::decode_raster_image(jpeg.get_ref())?;
    assert_eq!((cover.width(), cover.height()), (20, 20));

    let stego = encode(&cover, b"from a jpeg")?;
    let png = raster::encode_raster_image(&stego, raster::OutputFormat::Png)?;
    assert_eq!(decode(&raster::decode_raster_image(&png)?), b"from a jpeg");
    Ok(())
}

#[test]
fn jpeg_output_is_refused() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("stego.jpg");
    let stego = encode(&gradient(8, 8), b"lost")?;

    assert!(matches!(
        raster::save(&stego, &path),
        Err(Error::UnsupportedOutputFormat(_))
    ));
    assert!(!path.exists());
    Ok(())
}

#[test]
fn failed_encode_leaves_cover_untouched() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cover.png");
    let cover = gradient(2, 2);
    raster::save(&cover, &path)?;
    let before = fs::read(&path)?;

    let pixels = raster::open(&path)?;
    assert!(matches!(
        encode(&pixels, b"A"),
        Err(Error::CapacityExceeded {
            required: 16,
            available: 12
        })
    ));
    assert_eq!(pixels, cover);
    assert_eq!(fs::read(&path)?, before);
    Ok(())
}

#[test]
fn cli_encode_then_decode() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("cover.png");
    let output = dir.path().join("stego.png");
    raster::save(&gradient(16, 16), &input)?;

    let status = Command::new(env!("CARGO_BIN_EXE_lsbsteg"))
        .arg("encode")
        .arg(&input)
        .arg("hello from the shell")
        .arg(&output)
        .status()?;
    assert!(status.success());

    let decoded = Command::new(env!("CARGO_BIN_EXE_lsbsteg"))
        .arg("decode")
        .arg(&output)
        .output()?;
    assert!(decoded.status.success());
    assert_eq!(String::from_utf8_lossy(&decoded.stdout).trim_end(), "hello from the shell");

    let capacity = Command::new(env!("CARGO_BIN_EXE_lsbsteg"))
        .arg("capacity")
        .arg(&input)
        .output()?;
    let expected = format!(
        "16x16: {} bits, up to {} message bytes",
        bits::capacity_bits(16, 16),
        bits::max_message_len(16, 16)
    );
    assert_eq!(String::from_utf8_lossy(&capacity.stdout).trim_end(), expected);
    Ok(())
}

#[test]
fn cli_rejects_oversized_message() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("cover.png");
    let output = dir.path().join("stego.png");
    raster::save(&gradient(2, 2), &input)?;

    let encoded = Command::new(env!("CARGO_BIN_EXE_lsbsteg"))
        .arg("encode")
        .arg(&input)
        .arg("A")
        .arg(&output)
        .output()?;
    assert!(!encoded.status.success());
    assert!(String::from_utf8_lossy(&encoded.stderr).contains("Capacity exceeded"));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn cli_strict_decode_fails_without_message() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("plain.png");
    // even samples everywhere: no low bit is set, so no delimiter can appear
    raster::save(&flat(8, 8), &input)?;

    let strict = Command::new(env!("CARGO_BIN_EXE_lsbsteg"))
        .args(["decode", "--strict"])
        .arg(&input)
        .output()?;
    assert!(!strict.status.success());
    assert!(String::from_utf8_lossy(&strict.stderr).contains("Terminator not found"));

    let lenient = Command::new(env!("CARGO_BIN_EXE_lsbsteg"))
        .arg("decode")
        .arg(&input)
        .output()?;
    assert!(lenient.status.success());
    Ok(())
}

#[test]
fn cli_bit_granular_decode_truncates() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("stego.png");
    raster::save(&encode(&flat(4, 4), b"A")?, &input)?;

    let aligned = Command::new(env!("CARGO_BIN_EXE_lsbsteg"))
        .arg("decode")
        .arg(&input)
        .output()?;
    assert_eq!(String::from_utf8_lossy(&aligned.stdout).trim_end(), "A");

    // the last bit of 'A' runs into the delimiter's ones
    let granular = Command::new(env!("CARGO_BIN_EXE_lsbsteg"))
        .args(["decode", "--bit-granular"])
        .arg(&input)
        .output()?;
    assert!(granular.status.success());
    assert_eq!(String::from_utf8_lossy(&granular.stdout).trim_end(), "");
    Ok(())
}

#[test]
fn cli_custom_delimiter_round_trip() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("cover.png");
    let output = dir.path().join("stego.png");
    raster::save(&flat(16, 16), &input)?;

    let status = Command::new(env!("CARGO_BIN_EXE_lsbsteg"))
        .args(["encode", "--delimiter", "00101010"])
        .arg(&input)
        .arg("star-terminated")
        .arg(&output)
        .status()?;
    assert!(status.success());

    let stego = raster::open(&output)?;
    let options = CodecOptions::default().with_delimiter(b'*');
    assert_eq!(decode_with(&stego, &options)?.message, b"star-terminated");

    let decoded = Command::new(env!("CARGO_BIN_EXE_lsbsteg"))
        .args(["decode", "--strict", "--delimiter", "00101010"])
        .arg(&output)
        .output()?;
    assert!(decoded.status.success());
    assert_eq!(String::from_utf8_lossy(&decoded.stdout).trim_end(), "star-terminated");

    // the default delimiter never appears on an even cover
    let mismatched = Command::new(env!("CARGO_BIN_EXE_lsbsteg"))
        .args(["decode", "--strict"])
        .arg(&output)
        .output()?;
    assert!(!mismatched.status.success());

    let invalid = Command::new(env!("CARGO_BIN_EXE_lsbsteg"))
        .args(["decode", "--delimiter", "1111"])
        .arg(&output)
        .output()?;
    assert!(!invalid.status.success());
    Ok(())
}
