//! Image output: PNG, EXR and TEV streaming.
//!
//! The core hands over a flat column-major accumulation buffer; this
//! module converts it into a row-major image and ships it to disk or to a
//! running TEV instance for live progressive viewing.

use exr::prelude::*;
use glam::Vec3A;
use image::{ImageBuffer, Rgb};
use log::{debug, info, warn};
use std::net::TcpStream;
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};

/// Convert the flat `x * height + y` accumulation buffer into a row-major
/// HDR image. Row 0 of the buffer is the bottom of the picture (the camera
/// up axis grows with y), so rows are flipped here.
pub fn buffer_to_image(
    values: &[Vec3A],
    width: u32,
    height: u32,
) -> ImageBuffer<Rgb<f32>, Vec<f32>> {
    ImageBuffer::from_fn(width, height, |x, y| {
        let flat = (x * height + (height - 1 - y)) as usize;
        let v = values[flat];
        Rgb([v.x, v.y, v.z])
    })
}

/// Save as 8-bit PNG with the sRGB transfer function applied.
pub fn save_image_as_png(image: &ImageBuffer<Rgb<f32>, Vec<f32>>, output_path: &str) {
    // sRGB transfer: linear segment for dark values, power curve above.
    let linear_to_gamma = |linear: f32| -> f32 {
        if linear <= 0.0 {
            0.0
        } else if linear <= 0.0031308 {
            12.92 * linear
        } else {
            1.055 * linear.powf(1.0 / 2.4) - 0.055
        }
    };

    let u8_image: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
            let pixel = image.get_pixel(x, y);
            Rgb([
                (linear_to_gamma(pixel[0].clamp(0.0, 1.0)) * 255.0) as u8,
                (linear_to_gamma(pixel[1].clamp(0.0, 1.0)) * 255.0) as u8,
                (linear_to_gamma(pixel[2].clamp(0.0, 1.0)) * 255.0) as u8,
            ])
        });

    match u8_image.save(output_path) {
        Ok(_) => info!("Image saved as {}", output_path),
        Err(e) => warn!("Failed to save image: {}", e),
    }
}

/// Save as EXR, preserving the linear HDR values.
pub fn save_image_as_exr(image: &ImageBuffer<Rgb<f32>, Vec<f32>>, output_path: &str) {
    let width = image.width() as usize;
    let pixels = image
        .pixels()
        .map(|rgb| (rgb[0], rgb[1], rgb[2]))
        .collect::<Vec<(f32, f32, f32)>>();

    let result = write_rgb_file(
        output_path,
        width,
        image.height() as usize,
        |x, y| pixels[y * width + x],
    );

    match result {
        Ok(_) => info!("HDR image saved as EXR: {}", output_path),
        Err(e) => warn!("Failed to save EXR image: {}", e),
    }
}

/// Stream the image to a TEV viewer.
///
/// Called once per refinement pass under the same image name, so TEV shows
/// the picture converging in place. Connection or protocol failures are
/// logged and otherwise ignored; the render carries on without a viewer.
pub fn send_image_to_tev(image: &ImageBuffer<Rgb<f32>, Vec<f32>>, tev_address: &str) {
    let tev_address = if tev_address.contains(':') {
        tev_address.to_string()
    } else {
        format!("{}:14158", tev_address)
    };

    let stream = match TcpStream::connect(&tev_address) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to connect to TEV on {}: {}", tev_address, e);
            return;
        }
    };
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Failed to set TCP_NODELAY: {}", e);
    }
    let mut client = TevClient::wrap(stream);

    let width = image.width();
    let height = image.height();
    let create_packet = PacketCreateImage {
        image_name: "emberpath",
        width,
        height,
        channel_names: &["R", "G", "B"],
        grab_focus: false,
    };
    if let Err(e) = client.send(create_packet) {
        warn!("Failed to create image in TEV: {}", e);
        return;
    }

    // TEV wants planar channel data (RRR...GGG...BBB...).
    let pixel_count = (width * height) as usize;
    let mut rgb_data = Vec::with_capacity(pixel_count * 3);
    for channel in 0..3 {
        for pixel in image.pixels() {
            rgb_data.push(pixel[channel]);
        }
    }

    let update_packet = PacketUpdateImage {
        image_name: "emberpath",
        grab_focus: false,
        channel_names: &["R", "G", "B"],
        x: 0,
        y: 0,
        width,
        height,
        channel_offsets: &[0, pixel_count as u64, 2 * pixel_count as u64],
        channel_strides: &[1, 1, 1],
        data: &rgb_data,
    };
    match client.send(update_packet) {
        Ok(_) => debug!("Pass image sent to TEV at {}", tev_address),
        Err(e) => warn!("Failed to send image data to TEV: {}", e),
    }
}
