use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::coord::Shift;
use plotters::prelude::*;
use crate::error::{BlinkError, Result};
use crate::recording::Recording;
use crate::session::ChannelDetection;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub panel_height: u32,
    pub background: RGBColor,
    pub raw_color: RGBColor,
    pub filtered_color: RGBColor,
    pub threshold_color: RGBColor,
    pub marker_color: RGBColor,
    /// Captions, axis labels and legends. Needs a system font when enabled.
    pub annotate: bool,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            panel_height: 400,
            background: RGBColor(10, 10, 10),
            raw_color: RGBColor(70, 130, 230),
            filtered_color: RGBColor(255, 150, 40),
            threshold_color: GREEN,
            marker_color: RED,
            annotate: true,
        }
    }
}
struct Trace<'a> {
    label: String,
    samples: &'a [f64],
    color: RGBAColor,
}
/// Raw (or baseline-corrected) trace under its low-pass output, one panel per channel.
pub fn render_denoise_png(raw: &Recording, filtered: &Recording, style: &PlotStyle) -> Result<Vec<u8>> {
    if filtered.is_empty() || filtered.channels.is_empty() {
        return Err(BlinkError::Plot("recording has no samples".into()));
    }
    let raw_style = style.raw_color.mix(0.5);
    let filtered_style = style.filtered_color.mix(1.0);
    render_panels(style, filtered.channels.len(), |idx, area| {
        let channel = &filtered.channels[idx];
        let original = raw.channel(&channel.label)?;
        let traces = [
            Trace {
                label: format!("Original {}", channel.label),
                samples: &original.samples,
                color: raw_style,
            },
            Trace {
                label: format!("Filtered {}", channel.label),
                samples: &channel.samples,
                color: filtered_style,
            },
        ];
        let title = format!("{} before and after low-pass", channel.label);
        draw_panel(area, style, &title, &filtered.time_s, &traces, None)
    })
}
/// Filtered trace with its threshold band and a marker on every flagged sample.
pub fn render_blinks_png(
    filtered: &Recording,
    detections: &[ChannelDetection],
    style: &PlotStyle,
) -> Result<Vec<u8>> {
    if filtered.is_empty() || detections.is_empty() {
        return Err(BlinkError::Plot("nothing to plot".into()));
    }
    let filtered_style = style.filtered_color.mix(1.0);
    render_panels(style, detections.len(), |idx, area| {
        let detection = &detections[idx];
        let channel = filtered.channel(&detection.label)?;
        let traces = [Trace {
            label: format!("Filtered {}", detection.label),
            samples: &channel.samples,
            color: filtered_style,
        }];
        let title = format!(
            "{}: {} samples outside the threshold band",
            detection.label,
            detection.count()
        );
        draw_panel(area, style, &title, &filtered.time_s, &traces, Some(detection))
    })
}
fn render_panels<F>(style: &PlotStyle, panels: usize, mut draw: F) -> Result<Vec<u8>>
where
    F: FnMut(usize, &DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
{
    let height = style.panel_height * panels as u32;
    let mut buffer = vec![0u8; (style.width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, height)).into_drawing_area();
        root.fill(&style.background)?;
        for (idx, area) in root.split_evenly((panels, 1)).iter().enumerate() {
            draw(idx, area)?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, height)
}
fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    style: &PlotStyle,
    title: &str,
    time_s: &[f64],
    traces: &[Trace<'_>],
    detection: Option<&ChannelDetection>,
) -> Result<()> {
    let t0 = time_s.first().copied().unwrap_or(0.0);
    let t1 = time_s.last().copied().unwrap_or(0.0);
    let x_range = if t1 > t0 { t0..t1 } else { t0..t0 + 1.0 };
    let extra = detection
        .map(|d| vec![d.bounds.lower, d.bounds.upper])
        .unwrap_or_default();
    let (y_min, y_max) = traces
        .iter()
        .flat_map(|t| t.samples.iter().copied())
        .chain(extra)
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let y_range = if !(y_max > y_min) {
        let mid = if y_min.is_finite() { y_min } else { 0.0 };
        (mid - 50.0)..(mid + 50.0)
    } else {
        let pad = 0.05 * (y_max - y_min);
        (y_min - pad)..(y_max + pad)
    };
    let mut builder = ChartBuilder::on(area);
    builder.margin(10);
    if style.annotate {
        builder
            .caption(title, ("sans-serif", 20).into_font().color(&WHITE))
            .set_label_area_size(LabelAreaPosition::Left, 70)
            .set_label_area_size(LabelAreaPosition::Bottom, 40);
    }
    let mut chart = builder.build_cartesian_2d(x_range.clone(), y_range)?;
    if style.annotate {
        chart
            .configure_mesh()
            .light_line_style(&WHITE.mix(0.1))
            .axis_style(&WHITE.mix(0.4))
            .label_style(("sans-serif", 14).into_font().color(&WHITE))
            .x_desc("Time (s)")
            .y_desc("Amplitude (uV)")
            .draw()?;
    }
    for trace in traces {
        let color = trace.color;
        chart
            .draw_series(LineSeries::new(
                time_s.iter().copied().zip(trace.samples.iter().copied()),
                &color,
            ))?
            .label(trace.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    if let Some(detection) = detection {
        let line = style.threshold_color;
        for (name, level) in [("Upper", detection.bounds.upper), ("Lower", detection.bounds.lower)] {
            chart
                .draw_series(LineSeries::new(
                    vec![(x_range.start, level), (x_range.end, level)],
                    &line,
                ))?
                .label(format!("{name} Threshold ({level:.0} uV)"))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &line));
        }
        let marker = style.marker_color;
        chart
            .draw_series(
                detection
                    .points
                    .iter()
                    .map(|p| Circle::new((p.time, p.amplitude), 3, marker.filled())),
            )?
            .label("Detected Blinks")
            .legend(move |(x, y)| Circle::new((x + 10, y), 3, marker.filled()));
    }
    if style.annotate {
        chart
            .configure_series_labels()
            .border_style(&WHITE.mix(0.2))
            .background_style(&style.background)
            .label_font(("sans-serif", 14).into_font().color(&WHITE))
            .draw()?;
    }
    Ok(())
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| BlinkError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::recording::Channel;
    use crate::session::AnalysisSession;
    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    fn quiet() -> PlotStyle {
        PlotStyle {
            width: 320,
            panel_height: 120,
            annotate: false,
            ..PlotStyle::default()
        }
    }
    fn session() -> AnalysisSession {
        let fp1: Vec<f64> = (0..256)
            .map(|i| {
                let t = (i as f64 - 128.0) / 8.0;
                8500.0 + 500.0 * (-t * t / 2.0).exp()
            })
            .collect();
        let rec = Recording::with_uniform_time(
            256.0,
            vec![Channel::new("FP1", fp1), Channel::new("FP2", vec![-8400.0; 256])],
        )
        .unwrap();
        AnalysisSession::new(rec, &AnalysisConfig::default()).unwrap()
    }
    #[test]
    fn denoise_chart_is_png() {
        let session = session();
        let png = render_denoise_png(session.raw(), session.filtered(), &quiet()).unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);
    }
    #[test]
    fn blinks_chart_is_png() {
        let session = session();
        let detections = session.detect_all().unwrap();
        let png = render_blinks_png(session.filtered(), &detections, &quiet()).unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);
    }
    #[test]
    fn empty_input_is_an_error() {
        let session = session();
        assert!(matches!(
            render_blinks_png(session.filtered(), &[], &quiet()),
            Err(BlinkError::Plot(_))
        ));
    }
}
