use engine::{Color, Corner, DrawSurface, MetricsHandle, TextAlign, UiElement, Vector};

/// Live loop-rate readout fed from the shared metrics handle.
pub(crate) struct FpsCounter {
    metrics: MetricsHandle,
}

impl FpsCounter {
    pub(crate) fn new(metrics: MetricsHandle) -> Self {
        Self { metrics }
    }
}

impl UiElement for FpsCounter {
    fn draw(&mut self, surface: &mut DrawSurface, anchor: Vector, corner: Corner) {
        let metrics = self.metrics.latest();
        let align = match corner {
            Corner::TopLeft | Corner::BottomLeft => TextAlign::Left,
            Corner::TopRight | Corner::BottomRight => TextAlign::Right,
        };
        surface.text(
            format!(
                "{:.0} fps / {:.0} sps",
                metrics.draws_per_sec, metrics.steps_per_sec
            ),
            anchor,
            16.0,
            Color::WHITE,
            align,
        );
    }
}

/// Build version stamp, normally pinned to the bottom-right corner.
pub(crate) struct VersionDisplay {
    text: String,
}

impl VersionDisplay {
    pub(crate) fn new() -> Self {
        Self {
            text: format!("v{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl UiElement for VersionDisplay {
    fn draw(&mut self, surface: &mut DrawSurface, anchor: Vector, corner: Corner) {
        let align = match corner {
            Corner::TopLeft | Corner::BottomLeft => TextAlign::Left,
            Corner::TopRight | Corner::BottomRight => TextAlign::Right,
        };
        surface.text(self.text.clone(), anchor, 14.0, Color::GRAY, align);
    }
}

#[cfg(test)]
mod tests {
    use engine::DrawOp;

    use super::*;

    #[test]
    fn version_display_renders_crate_version() {
        let mut element = VersionDisplay::new();
        let mut surface = DrawSurface::new();
        element.draw(&mut surface, Corner::BottomRight.anchor(), Corner::BottomRight);

        match &surface.ops()[0] {
            DrawOp::Text { text, align, .. } => {
                assert_eq!(text, &format!("v{}", env!("CARGO_PKG_VERSION")));
                assert_eq!(*align, TextAlign::Right);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn fps_counter_draws_without_published_metrics() {
        let mut element = FpsCounter::new(MetricsHandle::default());
        let mut surface = DrawSurface::new();
        element.draw(&mut surface, Corner::TopRight.anchor(), Corner::TopRight);

        match &surface.ops()[0] {
            DrawOp::Text { text, .. } => assert_eq!(text, "0 fps / 0 sps"),
            other => panic!("unexpected op {other:?}"),
        }
    }
}
