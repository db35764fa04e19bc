//! Frame capture and GIF generation for fill visualization

use crate::io::error::{AlgorithmError, Result};
use crate::io::image::raster_to_rgba;
use crate::spatial::{Mask, PatchPair, Raster, Region};
use image::{Frame, RgbaImage};

/// Upper bound on fill events reserved up front
const MAX_RESERVED_EVENTS: usize = 1024;

/// Represents a single patch copy
#[derive(Debug, Clone, Copy)]
pub struct FillEvent {
    /// Region the pixels were copied from
    pub source: Region,
    /// Region whose hole pixels were filled
    pub target: Region,
    /// Algorithm iteration of the copy
    pub iteration: usize,
}

/// Captures patch copies for visualization
///
/// Records fill events during the run and replays them on top of the
/// original image when the animation is exported.
pub struct VisualizationCapture {
    pub(crate) events: Vec<FillEvent>,
    initial: Raster,
    initial_mask: Mask,
    hole_color: [u8; 4],
}

impl VisualizationCapture {
    /// The average of all known pixel colours is used for hole pixels
    pub fn new(initial: &Raster, mask: &Mask, max_iterations: usize) -> Self {
        let mut sums = [0.0f64; 3];
        let mut count = 0usize;
        for pixel in mask.full_region().indices() {
            if mask.is_valid(pixel) {
                for (sum, value) in sums.iter_mut().zip(initial.color3(pixel)) {
                    *sum += value;
                }
                count += 1;
            }
        }
        let hole_color = if count == 0 {
            [128, 128, 128, 255]
        } else {
            let mean = sums.map(|sum| (sum / count as f64).round().clamp(0.0, 255.0) as u8);
            [mean[0], mean[1], mean[2], 255]
        };

        Self {
            events: Vec::with_capacity(max_iterations.min(MAX_RESERVED_EVENTS)),
            initial: initial.clone(),
            initial_mask: mask.clone(),
            hole_color,
        }
    }

    /// Records the copy performed for a pair
    pub fn record_fill(&mut self, pair: &PatchPair, iteration: usize) {
        self.events.push(FillEvent {
            source: pair.source.region,
            target: pair.target.region,
            iteration,
        });
    }

    /// Returns all recorded fill events
    pub fn get_events(&self) -> &[FillEvent] {
        &self.events
    }

    /// Export the captured frames as a GIF with automatic frame skipping
    ///
    /// Automatically skips frames if the requested frame rate exceeds viewer
    /// capabilities, keeping the apparent animation speed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No fills were captured
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, output_path: &str, frame_delay_ms: u32) -> Result<()> {
        use crate::io::configuration::VIEWER_MIN_FRAME_DELAY_MS;

        if self.events.is_empty() {
            return Err(AlgorithmError::InvalidParameter {
                parameter: "visualization",
                value: "0 fills".to_string(),
                reason: "No fills captured for visualization".to_string(),
            });
        }

        let frame_delay_ms = frame_delay_ms.max(1);
        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms)
        } else {
            1
        };

        let frames = self.generate_frames(effective_delay_ms, skip_factor as usize);

        if let Some(parent) = std::path::Path::new(output_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| AlgorithmError::FileSystem {
            path: output_path.into(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| AlgorithmError::ImageExport {
                path: output_path.into(),
                source: e,
            })?;

        Ok(())
    }

    fn generate_frames(&self, delay_ms: u32, skip_factor: usize) -> Vec<Frame> {
        let mut raster = self.initial.clone();
        let mut mask = self.initial_mask.clone();
        let mut frames = vec![self.render_frame(&raster, &mask, delay_ms)];

        for (count, event) in self.events.iter().enumerate() {
            raster.copy_into_holes(&event.source, &event.target, &mask);
            mask.fill_region(&event.target);

            if (count + 1) % skip_factor.max(1) == 0 {
                frames.push(self.render_frame(&raster, &mask, delay_ms));
            }
        }

        if self.events.len() % skip_factor.max(1) != 0 {
            frames.push(self.render_frame(&raster, &mask, delay_ms));
        }

        // Final frame displays longer for better visibility
        let final_frame_delay = delay_ms * 25;
        if let Some(last_frame_img) = frames.last().map(|f| f.buffer().clone()) {
            frames.push(Frame::from_parts(
                last_frame_img,
                0,
                0,
                image::Delay::from_numer_denom_ms(final_frame_delay, 1),
            ));
        }

        frames
    }

    fn render_frame(&self, raster: &Raster, mask: &Mask, delay_ms: u32) -> Frame {
        let mut img: RgbaImage = raster_to_rgba(raster);
        for [row, col] in mask.full_region().indices() {
            if mask.is_hole([row, col]) {
                img.put_pixel(col as u32, row as u32, image::Rgba(self.hole_color));
            }
        }
        Frame::from_parts(img, 0, 0, image::Delay::from_numer_denom_ms(delay_ms, 1))
    }

    /// Returns the total number of fill events
    pub const fn event_count(&self) -> usize {
        self.events.len()
    }
}
