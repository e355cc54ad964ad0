//! Built-in 2D canvas line chart, for pages that do not load Chart.js

use std::f64::consts::PI;

use answer_chart_core::chart::{AXIS_TITLE_FONT_SIZE, AXIS_TITLE_FONT_WEIGHT};
use answer_chart_core::layout::{
    control_points, format_tick, label_stride, project, segments, x_for, PlotArea, ValueScale,
};
use answer_chart_core::{Error, LineChartSpec, Result};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::dom::{context_2d, describe_js_error};

const TICK_FONT: &str = "12px sans-serif";
const LINE_WIDTH: f64 = 2.0;
/// Used until the canvas has been laid out
const FALLBACK_WIDTH: f64 = 300.0;

/// A chart drawn by this module; destroying it clears the canvas.
pub struct CanvasChart {
    canvas: HtmlCanvasElement,
}

impl CanvasChart {
    pub fn clear(&self) -> Result<()> {
        let ctx = context_2d(&self.canvas)?;
        ctx.reset_transform().ok();
        ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
        Ok(())
    }
}

pub fn render(canvas: &HtmlCanvasElement, spec: &LineChartSpec) -> Result<CanvasChart> {
    let ctx = context_2d(canvas)?;

    let width = match canvas.client_width() {
        w if w > 0 => w as f64,
        _ => FALLBACK_WIDTH,
    };
    let height = spec.fill.height;
    let ratio = web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0);

    canvas.set_width((width * ratio).round() as u32);
    canvas.set_height((height * ratio).round() as u32);
    ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)
        .map_err(|e| Error::Render(describe_js_error(&e)))?;
    ctx.clear_rect(0.0, 0.0, width, height);

    let area = PlotArea::for_canvas(width, height);
    let scale = ValueScale::fit(&spec.values);

    draw_grid(&ctx, spec, &area, &scale);
    draw_x_labels(&ctx, spec, &area);
    draw_series(&ctx, spec, &area, &scale)?;
    draw_titles(&ctx, spec, &area, height);

    Ok(CanvasChart {
        canvas: canvas.clone(),
    })
}

fn draw_grid(ctx: &CanvasRenderingContext2d, spec: &LineChartSpec, area: &PlotArea, scale: &ValueScale) {
    ctx.set_line_width(1.0);
    ctx.set_font(TICK_FONT);
    ctx.set_text_align("right");
    ctx.set_fill_style_str(spec.y_axis.color);
    ctx.set_stroke_style_str(spec.y_axis.grid_color);

    for tick in scale.ticks() {
        let y = scale.y_for(tick, area);
        ctx.begin_path();
        ctx.move_to(area.left, y);
        ctx.line_to(area.right, y);
        ctx.stroke();
        ctx.fill_text(&format_tick(tick), area.left - 6.0, y + 4.0).ok();
    }
}

fn draw_x_labels(ctx: &CanvasRenderingContext2d, spec: &LineChartSpec, area: &PlotArea) {
    let count = spec.values.len().max(spec.labels.len());
    let stride = label_stride(count, area);

    ctx.set_font(TICK_FONT);
    ctx.set_text_align("center");
    ctx.set_fill_style_str(spec.x_axis.color);

    for (i, label) in spec.labels.iter().enumerate().step_by(stride) {
        ctx.fill_text(label, x_for(i, count, area), area.bottom + 16.0).ok();
    }
}

fn draw_series(
    ctx: &CanvasRenderingContext2d,
    spec: &LineChartSpec,
    area: &PlotArea,
    scale: &ValueScale,
) -> Result<()> {
    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, spec.fill.height);
    for (offset, color) in &spec.fill.stops {
        gradient
            .add_color_stop(*offset as f32, color)
            .map_err(|e| Error::Render(describe_js_error(&e)))?;
    }

    let points = project(&spec.values, scale, area);
    for run in segments(&points) {
        let controls = control_points(&run, spec.tension);

        // area under the curve
        ctx.begin_path();
        ctx.move_to(run[0].0, area.bottom);
        ctx.line_to(run[0].0, run[0].1);
        trace_curve(ctx, &run, &controls);
        ctx.line_to(run[run.len() - 1].0, area.bottom);
        ctx.close_path();
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill();

        ctx.begin_path();
        ctx.move_to(run[0].0, run[0].1);
        trace_curve(ctx, &run, &controls);
        ctx.set_line_width(LINE_WIDTH);
        ctx.set_stroke_style_str(spec.line_color);
        ctx.stroke();
    }

    ctx.set_fill_style_str(spec.line_color);
    for (x, y) in points.into_iter().flatten() {
        ctx.begin_path();
        ctx.arc(x, y, spec.point_radius, 0.0, 2.0 * PI).ok();
        ctx.fill();
    }

    Ok(())
}

fn trace_curve(
    ctx: &CanvasRenderingContext2d,
    run: &[(f64, f64)],
    controls: &[((f64, f64), (f64, f64))],
) {
    for i in 1..run.len() {
        let (_, out) = controls[i - 1];
        let (inc, _) = controls[i];
        ctx.bezier_curve_to(out.0, out.1, inc.0, inc.1, run[i].0, run[i].1);
    }
}

fn draw_titles(
    ctx: &CanvasRenderingContext2d,
    spec: &LineChartSpec,
    area: &PlotArea,
    height: f64,
) {
    ctx.set_font(&format!(
        "{} {}px sans-serif",
        AXIS_TITLE_FONT_WEIGHT, AXIS_TITLE_FONT_SIZE
    ));
    ctx.set_text_align("center");

    ctx.set_fill_style_str(spec.x_axis.color);
    ctx.fill_text(
        &spec.x_axis.title,
        area.left + area.width() / 2.0,
        height - spec.x_axis.title_padding,
    )
    .ok();

    ctx.save();
    ctx.translate(spec.y_axis.title_padding + 6.0, area.top + area.height() / 2.0)
        .ok();
    ctx.rotate(-PI / 2.0).ok();
    ctx.set_fill_style_str(spec.y_axis.color);
    ctx.fill_text(&spec.y_axis.title, 0.0, 0.0).ok();
    ctx.restore();
}
