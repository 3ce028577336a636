//! Static figure export: PNG with tight cropping, or SVG
//!
//! Drawing is backend-generic; [`PngExporter`] renders into an RGB buffer so the
//! result can be cropped to its content before encoding. PNG files carry the
//! resolution in a `pHYs` chunk.

use crate::data::FigureData;
use crate::elements::{ParameterColumn, StripColumn};
use crate::errors::{Result, VisualizationError};
use crate::layouts::{FigureLayout, LegendMetrics, PixelRect};
use crate::styles::{rgb_color, FigureStyle};
use image::{imageops, DynamicImage, ImageFormat, Rgb as Pixel, RgbImage, Rgba, RgbaImage};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use plotters_backend::text_anchor::{HPos, Pos, VPos};
use serde::Serialize;
use std::io::Cursor;
use std::ops::Range;
use std::path::Path;
use striplog::{Legend, LegendKind, Rgb, StriplogConfig};
use tracing::{debug, info};

/// Depth ticks on the first column
const DEPTH_TICKS: usize = 10;
/// Value ticks on each parameter column
const VALUE_TICKS: usize = 4;
/// Signature plus the IHDR chunk, which the encoder always writes first
const PNG_HEADER_LEN: usize = 8 + 4 + 4 + 13 + 4;

/// Geometry and style shared by every backend
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub layout: FigureLayout,
    pub style: FigureStyle,
    /// Padding kept around the tight bounding box, in inches
    pub pad_inches: f64,
    /// Crop raster output to the drawn content
    pub tight: bool,
    /// Figure background outside the axes and legend is left transparent
    pub transparent: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            layout: FigureLayout::default(),
            style: FigureStyle::default(),
            pad_inches: 0.1,
            tight: true,
            transparent: true,
        }
    }
}

impl ExportConfig {
    pub fn from_config(config: &StriplogConfig) -> Result<Self> {
        Ok(Self {
            layout: FigureLayout::from_config(config),
            style: FigureStyle::from_config(config)?,
            pad_inches: config.output.pad_inches,
            tight: config.output.tight,
            transparent: config.output.transparent,
        })
    }

    /// Resolve every pixel position of `figure` without drawing
    pub fn plan(&self, figure: &FigureData) -> Result<RenderPlan> {
        let columns = self.layout.column_rects(figure.column_count())?;
        let legend = self.layout.legend_rect(&figure.legend, &self.style);
        let (width, height) = self.layout.canvas_px(&legend);

        Ok(RenderPlan {
            canvas: (width, height),
            title_position: self.layout.title_position(),
            columns,
            legend,
            y_label_area: self.layout.y_label_area_px(&self.style),
            x_label_area: self.layout.x_label_area_px(&self.style),
        })
    }

    fn pad_px(&self) -> u32 {
        (self.pad_inches * self.style.dpi as f64).round().max(0.0) as u32
    }
}

/// Pixel placement of a figure's parts on the canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub canvas: (u32, u32),
    pub title_position: (i32, i32),
    /// Plotting rectangle of each column, label areas excluded
    pub columns: Vec<PixelRect>,
    pub legend: PixelRect,
    pub y_label_area: u32,
    pub x_label_area: u32,
}

/// Writes a prepared figure to a file
pub trait ChartExporter {
    fn export(&self, figure: &FigureData, path: &Path) -> Result<()>;
}

/// Raster export through an in-memory RGB buffer
#[derive(Debug, Clone, Default)]
pub struct PngExporter {
    pub config: ExportConfig,
}

impl PngExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Render `figure` into an image, cropped when `tight` is set
    ///
    /// With `transparent` set, figure background outside the columns and the legend
    /// gets alpha 0.
    pub fn render(&self, figure: &FigureData) -> Result<RgbaImage> {
        let plan = self.config.plan(figure)?;
        let (width, height) = plan.canvas;
        let mut buffer = vec![0u8; width as usize * height as usize * 3];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            draw_figure(&root, figure, &plan, &self.config.style, true)?;
            root.present()?;
        }

        let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            VisualizationError::ImageError {
                message: format!("buffer does not match a {}x{} canvas", width, height),
            }
        })?;

        let background = self.config.style.figure_background;
        let (image, origin) = if self.config.tight {
            crop_to_content(&image, background, self.config.pad_px())
        } else {
            (image, (0, 0))
        };

        if !self.config.transparent {
            return Ok(DynamicImage::ImageRgb8(image).into_rgba8());
        }
        let mut opaque = plan.columns.clone();
        opaque.push(plan.legend);
        Ok(clear_background(&image, background, &opaque, origin))
    }
}

impl ChartExporter for PngExporter {
    fn export(&self, figure: &FigureData, path: &Path) -> Result<()> {
        let image = self.render(figure)?;
        let bytes = encode_png(&image, self.config.style.dpi)?;
        ensure_parent(path)?;
        std::fs::write(path, bytes)?;
        debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "png written"
        );
        Ok(())
    }
}

/// Vector export; the full canvas is kept
#[derive(Debug, Clone, Default)]
pub struct SvgExporter {
    pub config: ExportConfig,
}

impl SvgExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }
}

impl ChartExporter for SvgExporter {
    fn export(&self, figure: &FigureData, path: &Path) -> Result<()> {
        let plan = self.config.plan(figure)?;
        ensure_parent(path)?;

        let root = SVGBackend::new(path, plan.canvas).into_drawing_area();
        let fill = !self.config.transparent;
        draw_figure(&root, figure, &plan, &self.config.style, fill)?;
        root.present()?;
        debug!(path = %path.display(), "svg written");
        Ok(())
    }
}

/// Export `figure` to `path`, choosing SVG for a `.svg` extension and PNG otherwise
pub fn export_figure(figure: &FigureData, config: ExportConfig, path: &Path) -> Result<()> {
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    if is_svg {
        SvgExporter::new(config).export(figure, path)?;
    } else {
        PngExporter::new(config).export(figure, path)?;
    }

    info!(hole_id = %figure.hole_id, path = %path.display(), "figure saved");
    Ok(())
}

/// Draw title, columns and legend onto `root`
///
/// `fill_background` paints the whole canvas with the figure background first.
pub fn draw_figure<DB>(
    root: &DrawingArea<DB, Shift>,
    figure: &FigureData,
    plan: &RenderPlan,
    style: &FigureStyle,
    fill_background: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if fill_background {
        root.fill(&rgb_color(style.figure_background))?;
    }

    let depth = depth_axis(figure);
    let mut rects = plan.columns.iter();

    for (i, strip) in figure.strips.iter().enumerate() {
        let rect = next_rect(&mut rects)?;
        let area = column_area(root, rect, plan, i == 0);
        draw_strip(&area, strip, depth.clone(), plan, style, i == 0)?;
    }

    for (i, parameter) in figure.parameters.iter().enumerate() {
        let rect = next_rect(&mut rects)?;
        let first = figure.strips.is_empty() && i == 0;
        let area = column_area(root, rect, plan, first);
        draw_parameter(&area, parameter, depth.clone(), plan, style, first)?;
    }

    let (x, y) = plan.title_position;
    let title_font = font(style, style.title_px(), FontStyle::Bold, style.text);
    root.draw(&Text::new(
        figure.title.clone(),
        (x, y),
        title_font.pos(Pos::new(HPos::Left, VPos::Bottom)),
    ))?;

    draw_legend(root, &figure.legend, &plan.legend, style)?;
    Ok(())
}

fn next_rect<'a>(rects: &mut impl Iterator<Item = &'a PixelRect>) -> Result<&'a PixelRect> {
    rects.next().ok_or_else(|| VisualizationError::LayoutError {
        message: "fewer column rectangles than columns".to_string(),
    })
}

/// Sub-area holding one column plus its label areas
fn column_area<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    rect: &PixelRect,
    plan: &RenderPlan,
    with_depth_labels: bool,
) -> DrawingArea<DB, Shift> {
    let left_area = if with_depth_labels { plan.y_label_area as i32 } else { 0 };
    root.clone().shrink(
        (rect.left - left_area, rect.top),
        (
            rect.width() + left_area,
            rect.height() + plan.x_label_area as i32,
        ),
    )
}

/// Depth coordinates are negated so depth grows downward
fn depth_axis(figure: &FigureData) -> Range<f64> {
    let (bottom, top) = figure.y_limits();
    if bottom > top {
        -bottom..-top
    } else {
        -(top + 0.5)..-(top - 0.5)
    }
}

/// Depth tick label for a negated axis coordinate, precise enough for the axis span
fn depth_label(value: f64, span: f64) -> String {
    tick_label(-value + 0.0, span)
}

/// Tick label with precision suited to the axis span
pub fn tick_label(value: f64, span: f64) -> String {
    let decimals = if span >= 10.0 {
        0
    } else if span >= 1.0 {
        1
    } else if span >= 0.1 {
        2
    } else {
        3
    };
    format!("{:.*}", decimals, value)
}

fn font<'a>(style: &'a FigureStyle, size_px: f64, weight: FontStyle, color: Rgb) -> TextStyle<'a> {
    FontDesc::new(FontFamily::from(style.font_family.as_str()), size_px, weight)
        .color(&rgb_color(color))
}

/// Axis descriptions are set in bold at label size
fn axis_desc_font(style: &FigureStyle) -> TextStyle<'_> {
    font(style, style.label_px(), FontStyle::Bold, style.text)
}

fn draw_strip<DB>(
    area: &DrawingArea<DB, Shift>,
    strip: &StripColumn,
    depth: Range<f64>,
    plan: &RenderPlan,
    style: &FigureStyle,
    with_depth_labels: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut chart = build_column(area, 0.0..1.0, depth.clone(), plan, with_depth_labels)?;
    chart
        .plotting_area()
        .fill(&rgb_color(style.panel_background))?;

    let axes = AxisText {
        x_desc: strip.label(),
        x_ticks: 0,
        x_span: 1.0,
        depth_span: depth.end - depth.start,
        with_depth_labels,
    };
    draw_axes(&mut chart, &axes, style)?;

    chart.draw_series(strip.rects.iter().map(|r| {
        Rectangle::new([(0.0, -r.top), (1.0, -r.bottom)], rgb_color(r.color).filled())
    }))?;

    draw_frame(&mut chart, 0.0..1.0, depth, style)
}

fn draw_parameter<DB>(
    area: &DrawingArea<DB, Shift>,
    parameter: &ParameterColumn,
    depth: Range<f64>,
    plan: &RenderPlan,
    style: &FigureStyle,
    with_depth_labels: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x0, x1) = parameter.x_range();
    let mut chart = build_column(area, x0..x1, depth.clone(), plan, with_depth_labels)?;
    chart
        .plotting_area()
        .fill(&rgb_color(style.panel_background))?;

    let axes = AxisText {
        x_desc: &parameter.label,
        x_ticks: VALUE_TICKS,
        x_span: x1 - x0,
        depth_span: depth.end - depth.start,
        with_depth_labels,
    };
    draw_axes(&mut chart, &axes, style)?;

    let color = rgb_color(parameter.color);
    let width = style.line_width_px();
    for segment in &parameter.segments {
        if let [(value, mid)] = segment.as_slice() {
            // an isolated value has no neighbour to join
            chart.draw_series(std::iter::once(Circle::new(
                (*value, -*mid),
                width,
                color.filled(),
            )))?;
        } else {
            chart.draw_series(LineSeries::new(
                segment.iter().map(|&(value, mid)| (value, -mid)),
                color.stroke_width(width),
            ))?;
        }
    }

    draw_frame(&mut chart, x0..x1, depth, style)
}

fn build_column<'a, DB>(
    area: &'a DrawingArea<DB, Shift>,
    x: Range<f64>,
    depth: Range<f64>,
    plan: &RenderPlan,
    with_depth_labels: bool,
) -> Result<ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let left_area = if with_depth_labels { plan.y_label_area } else { 0 };
    Ok(ChartBuilder::on(area)
        .set_label_area_size(LabelAreaPosition::Left, left_area)
        .set_label_area_size(LabelAreaPosition::Bottom, plan.x_label_area)
        .build_cartesian_2d(x, depth)?)
}

/// Text around one column
struct AxisText<'a> {
    x_desc: &'a str,
    x_ticks: usize,
    x_span: f64,
    depth_span: f64,
    /// Only the leftmost column carries depth ticks and the depth description
    with_depth_labels: bool,
}

fn draw_axes<DB>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    axes: &AxisText<'_>,
    style: &FigureStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let x_formatter = |v: &f64| tick_label(*v, axes.x_span);
    let y_formatter = |v: &f64| depth_label(*v, axes.depth_span);
    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .x_labels(axes.x_ticks)
        .x_label_formatter(&x_formatter)
        .y_labels(if axes.with_depth_labels { DEPTH_TICKS } else { 0 })
        .y_label_formatter(&y_formatter)
        .x_desc(axes.x_desc)
        .label_style(font(style, style.tick_px(), FontStyle::Normal, style.text))
        .axis_desc_style(axis_desc_font(style))
        .axis_style(rgb_color(style.frame).stroke_width(style.frame_width_px()));
    if axes.with_depth_labels {
        mesh.y_desc("Depth (m)");
    }
    mesh.draw()?;
    Ok(())
}

fn draw_frame<DB>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x: Range<f64>,
    depth: Range<f64>,
    style: &FigureStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    chart.draw_series(std::iter::once(Rectangle::new(
        [(x.start, depth.start), (x.end, depth.end)],
        rgb_color(style.frame).stroke_width(style.frame_width_px()),
    )))?;
    Ok(())
}

/// Legend box with section titles, swatches for strip codes and lines for parameters
fn draw_legend<DB>(
    root: &DrawingArea<DB, Shift>,
    legend: &Legend,
    rect: &PixelRect,
    style: &FigureStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let metrics = LegendMetrics::new(style);
    let corners = [(rect.left, rect.top), (rect.right, rect.bottom)];
    root.draw(&Rectangle::new(corners, rgb_color(Rgb::WHITE).filled()))?;
    root.draw(&Rectangle::new(
        corners,
        rgb_color(style.frame).stroke_width(style.frame_width_px()),
    ))?;

    let left = rect.left as f64 + metrics.padding;
    let text_x = (left + metrics.handle_width + metrics.handle_gap).round() as i32;
    let half_patch = metrics.font_px * 0.35;
    let anchor = Pos::new(HPos::Left, VPos::Center);
    let mut row = 0usize;

    let row_center = |row: usize| {
        (rect.top as f64 + metrics.padding + (row as f64 + 0.5) * metrics.row_height).round()
            as i32
    };

    for (i, section) in legend.sections.iter().enumerate() {
        if i > 0 {
            row += 1;
        }
        root.draw(&Text::new(
            section.title.clone(),
            (left.round() as i32, row_center(row)),
            font(style, metrics.font_px, FontStyle::Bold, style.text).pos(anchor),
        ))?;
        row += 1;

        for entry in &section.entries {
            let y = row_center(row);
            let x0 = left.round() as i32;
            let x1 = (left + metrics.handle_width).round() as i32;
            let color = rgb_color(entry.color);

            match entry.kind {
                LegendKind::Swatch => {
                    let patch = [
                        (x0, y - half_patch.round() as i32),
                        (x1, y + half_patch.round() as i32),
                    ];
                    root.draw(&Rectangle::new(patch, color.filled()))?;
                    root.draw(&Rectangle::new(patch, rgb_color(style.frame).stroke_width(1)))?;
                }
                LegendKind::Line => {
                    root.draw(&PathElement::new(
                        vec![(x0, y), (x1, y)],
                        color.stroke_width(style.line_width_px()),
                    ))?;
                }
            }

            root.draw(&Text::new(
                entry.label.clone(),
                (text_x, y),
                font(style, metrics.font_px, FontStyle::Normal, style.text).pos(anchor),
            ))?;
            row += 1;
        }
    }

    Ok(())
}

/// Crop to the bounding box of pixels differing from `background`, keeping `pad` pixels around it
///
/// Returns the cropped image and the position of its top-left pixel in `image`.
/// An image with no content is returned unchanged.
pub fn crop_to_content(image: &RgbImage, background: Rgb, pad: u32) -> (RgbImage, (u32, u32)) {
    let background = Pixel([background.0, background.1, background.2]);
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in image.enumerate_pixels() {
        if *pixel == background {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    let Some((x0, y0, x1, y1)) = bounds else {
        return (image.clone(), (0, 0));
    };

    let left = x0.saturating_sub(pad);
    let top = y0.saturating_sub(pad);
    let right = (x1 + 1 + pad).min(image.width());
    let bottom = (y1 + 1 + pad).min(image.height());
    let cropped = imageops::crop_imm(image, left, top, right - left, bottom - top).to_image();
    (cropped, (left, top))
}

/// Alpha 0 for `background` pixels outside every `opaque` rectangle, 255 elsewhere
///
/// `origin` is the canvas position of the image's top-left pixel.
pub fn clear_background(
    image: &RgbImage,
    background: Rgb,
    opaque: &[PixelRect],
    origin: (u32, u32),
) -> RgbaImage {
    let background = Pixel([background.0, background.1, background.2]);
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y);
        let (cx, cy) = ((x + origin.0) as i32, (y + origin.1) as i32);
        let clear = *pixel == background && !opaque.iter().any(|r| r.contains(cx, cy));
        let [r, g, b] = pixel.0;
        Rgba([r, g, b, if clear { 0 } else { 255 }])
    })
}

/// Encode `image` as PNG with a `pHYs` chunk recording `dpi`
pub fn encode_png(image: &RgbaImage, dpi: u32) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    if png.len() < PNG_HEADER_LEN || &png[12..16] != b"IHDR" {
        return Err(VisualizationError::ImageError {
            message: "encoded PNG does not start with IHDR".to_string(),
        });
    }

    let pixels_per_metre = (dpi as f64 / 0.0254).round() as u32;
    let mut body = Vec::with_capacity(17);
    body.extend_from_slice(b"pHYs");
    body.extend_from_slice(&pixels_per_metre.to_be_bytes());
    body.extend_from_slice(&pixels_per_metre.to_be_bytes());
    // unit: metre
    body.push(1);

    let mut chunk = Vec::with_capacity(21);
    chunk.extend_from_slice(&9u32.to_be_bytes());
    chunk.extend_from_slice(&body);
    chunk.extend_from_slice(&crc32fast::hash(&body).to_be_bytes());

    let mut out = Vec::with_capacity(png.len() + chunk.len());
    out.extend_from_slice(&png[..PNG_HEADER_LEN]);
    out.extend_from_slice(&chunk);
    out.extend_from_slice(&png[PNG_HEADER_LEN..]);
    Ok(out)
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}
