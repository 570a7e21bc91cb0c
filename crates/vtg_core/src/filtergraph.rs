//! Filter-graph assembly for the two conversion passes.
//!
//! The stage order is fixed: crop (when present), then scale, then frame
//! rate. The palette has to be generated from the same spatial/temporal
//! transform that renders the final frames, or quantization drifts from
//! the rendered content, so both passes reuse one chain string.

use crate::models::ConversionRequest;

/// Builds the filter expressions for a validated request.
pub struct FilterGraphBuilder<'a> {
    request: &'a ConversionRequest,
}

impl<'a> FilterGraphBuilder<'a> {
    /// Create a builder borrowing the request.
    pub fn new(request: &'a ConversionRequest) -> Self {
        Self { request }
    }

    /// The shared crop/scale/fps chain.
    ///
    /// Scale always uses lanczos resampling.
    pub fn video_chain(&self) -> String {
        let mut stages = Vec::new();
        if let Some(crop) = &self.request.crop {
            stages.push(format!(
                "crop={}:{}:{}:{}",
                crop.width, crop.height, crop.x, crop.y
            ));
        }
        stages.push(format!(
            "scale={}:{}:flags=lanczos",
            self.request.dimensions.width, self.request.dimensions.height
        ));
        stages.push(format!("fps={}", self.request.frame_rate));
        stages.join(",")
    }

    /// Pass 1 graph: the shared chain feeding palette generation.
    pub fn palette_graph(&self) -> String {
        format!("{},palettegen", self.video_chain())
    }

    /// Pass 2 graph: the shared chain, labelled and composited against
    /// the palette (second input) for paletted color mapping.
    pub fn render_graph(&self) -> String {
        format!("{}[x];[x][1:v]paletteuse", self.video_chain())
    }
}
