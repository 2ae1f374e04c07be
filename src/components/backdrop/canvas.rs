use std::f64::consts::PI;

use glam::DVec2;
use web_sys::CanvasRenderingContext2d;

use crate::network::{Rgb, Surface, Viewport};

/// Points at least this large in pixels get a radial glow halo.
const GLOW_RADIUS: f64 = 2.5;

/// [`Surface`] over a 2D canvas context.
pub struct CanvasSurface<'a> {
	ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasSurface<'a> {
	pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}
}

impl Surface for CanvasSurface<'_> {
	fn clear(&mut self, viewport: Viewport, background: Rgb) {
		self.ctx.set_global_alpha(1.0);
		self.ctx.set_fill_style_str(&background.to_css(1.0));
		self.ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);
	}

	fn line(&mut self, from: DVec2, to: DVec2, color: Rgb, opacity: f64, width: f64) {
		let ctx = self.ctx;
		ctx.set_stroke_style_str(&color.to_css(opacity));
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(from.x, from.y);
		ctx.line_to(to.x, to.y);
		ctx.stroke();
	}

	fn point(&mut self, at: DVec2, radius: f64, color: Rgb, opacity: f64) {
		let ctx = self.ctx;
		if radius >= GLOW_RADIUS {
			let glow_radius = radius * 3.0;
			if let Ok(gradient) =
				ctx.create_radial_gradient(at.x, at.y, radius * 0.3, at.x, at.y, glow_radius)
			{
				let _ = gradient.add_color_stop(0.0, &color.to_css(opacity * 0.35));
				let _ = gradient.add_color_stop(1.0, &color.to_css(0.0));
				ctx.begin_path();
				let _ = ctx.arc(at.x, at.y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(at.x, at.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&color.to_css(opacity));
		ctx.fill();
	}
}
