use kurbo::Affine;
use rand::Rng;

/// Zoom direction: the scale factor grows over the clip (`In`) or the
/// growth is run backward (`Out`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDir {
    /// Scale grows from 1 toward the maximum.
    In,
    /// The in-progression played backward.
    Out,
}

/// Horizontal pan direction across the overscanned still.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanDir {
    /// Crop window moves so the image appears to drift leftward.
    Left,
    /// Mirror of `Left`.
    Right,
}

/// Anchor point a zoom scales around: four corners, four edges, center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomAnchor {
    /// Scale around the frame center.
    #[default]
    Center,
    /// Left edge midpoint.
    Left,
    /// Right edge midpoint.
    Right,
    /// Top edge midpoint.
    Top,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom edge midpoint.
    Bottom,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

/// Per-page motion applied to the still over its display duration.
///
/// Both variants are per-frame affine warps that preserve the canvas size;
/// the out-of-bounds region samples transparent black.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Linear scale growth (or its reverse) around an anchor point.
    Zoom {
        /// Growth direction.
        dir: ZoomDir,
        /// Anchor the scale is centered on.
        anchor: ZoomAnchor,
        /// Speed multiplier; the scale reaches `1 + 0.1 * speed` at the end.
        speed: f64,
    },
    /// Camera-drift pan within an overscanned copy of the image.
    Pan {
        /// Drift direction.
        dir: PanDir,
        /// Overscan ratio in (0, 1); the image is upscaled by its inverse.
        ratio: f64,
    },
}

impl Motion {
    /// Draw this page's motion: zoom or pan with even odds, each direction
    /// a uniform coin flip.
    pub fn draw(
        rng: &mut impl Rng,
        zoom_speed: f64,
        move_ratio: f64,
        anchor: ZoomAnchor,
    ) -> Motion {
        if rng.random_bool(0.5) {
            let dir = if rng.random_bool(0.5) {
                ZoomDir::In
            } else {
                ZoomDir::Out
            };
            Motion::Zoom {
                dir,
                anchor,
                speed: zoom_speed,
            }
        } else {
            let dir = if rng.random_bool(0.5) {
                PanDir::Left
            } else {
                PanDir::Right
            };
            Motion::Pan {
                dir,
                ratio: move_ratio,
            }
        }
    }

    /// Affine mapping output-canvas pixels back to source-image pixels at
    /// `frame` of `total_frames`, for a `width` x `height` canvas.
    pub fn dest_to_src(&self, frame: u64, total_frames: u64, width: u32, height: u32) -> Affine {
        let total = total_frames.max(1) as f64;
        let w = f64::from(width);
        let h = f64::from(height);

        match *self {
            Motion::Zoom { dir, anchor, speed } => {
                let progressed = match dir {
                    ZoomDir::In => frame as f64,
                    ZoomDir::Out => total - frame as f64,
                };
                let zoom = 1.0 + progressed * (0.1 * speed) / total;
                let (tx, ty) = anchor_offset(anchor, w, h, zoom);
                Affine::scale(1.0 / zoom) * Affine::translate((-tx, -ty))
            }
            Motion::Pan { dir, ratio } => {
                // Upscale by 1/ratio for overscan margin, then drift the
                // crop window from one edge of the margin to the other.
                let over_w = (w / ratio).floor();
                let over_h = (h / ratio).floor();
                let (start_x, end_x) = match dir {
                    PanDir::Left => (0.0, w - over_w),
                    PanDir::Right => (w - over_w, 0.0),
                };
                let progress = frame as f64 / total;
                let px = start_x + (end_x - start_x) * progress;
                Affine::scale_non_uniform(w / over_w, h / over_h)
                    * Affine::translate((-px, 0.0))
            }
        }
    }
}

fn anchor_offset(anchor: ZoomAnchor, w: f64, h: f64, zoom: f64) -> (f64, f64) {
    let dx = w - w * zoom;
    let dy = h - h * zoom;
    match anchor {
        ZoomAnchor::Center => (dx / 2.0, dy / 2.0),
        ZoomAnchor::Left => (0.0, dy / 2.0),
        ZoomAnchor::Right => (dx, dy / 2.0),
        ZoomAnchor::Top => (dx / 2.0, 0.0),
        ZoomAnchor::TopLeft => (0.0, 0.0),
        ZoomAnchor::TopRight => (dx, 0.0),
        ZoomAnchor::Bottom => (dx / 2.0, dy),
        ZoomAnchor::BottomLeft => (0.0, dy),
        ZoomAnchor::BottomRight => (dx, dy),
    }
}

/// Visual cross-fade opacity at `t_sec` into a clip of `duration_sec`,
/// fading from and to black over `fade_sec` at each end.
pub fn crossfade_opacity(t_sec: f64, duration_sec: f64, fade_sec: f64) -> f32 {
    if fade_sec <= 0.0 {
        return 1.0;
    }
    let head = t_sec / fade_sec;
    let tail = (duration_sec - t_sec) / fade_sec;
    head.min(tail).clamp(0.0, 1.0) as f32
}
