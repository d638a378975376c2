use egui::{Color32, Stroke, TextureHandle, Ui};
use egui_plot::{
    Legend, MarkerShape, Plot, PlotBounds, PlotImage, PlotPoint, PlotPoints, Points, Polygon,
};

use crate::data::colormap::RecordImage;
use crate::data::phase::PhaseGroup;
use crate::data::picks::{PickTable, SharedPickTable};
use crate::data::time_axis::TimeFormatter;
use crate::gesture::GestureDispatcher;
use crate::select::SharedSelection;

/// Cached points of one phase, rebuilt on table changes.
#[derive(Debug, Clone)]
struct PhaseSeries {
    label: String,
    color: Color32,
    points: Vec<[f64; 2]>,
}

/// Distance/time plot showing the record image and the picks; forwards
/// drags to the gesture tools.
pub struct PlotPanel {
    time_fmt: TimeFormatter,
    series: Vec<PhaseSeries>,
    fit_requested: bool,
    image: Option<RecordImage>,
    texture: Option<TextureHandle>,
    texture_dirty: bool,
}

impl Default for PlotPanel {
    fn default() -> Self {
        Self {
            time_fmt: TimeFormatter::default(),
            series: Vec::new(),
            fit_requested: true,
            image: None,
            texture: None,
            texture_dirty: false,
        }
    }
}

impl PlotPanel {
    /// Reset the view on the next frame, see [`home_bounds`](Self::home_bounds).
    pub fn request_fit(&mut self) {
        self.fit_requested = true;
    }

    /// Replace the record image; the texture is uploaded on the next render.
    pub fn set_image(&mut self, image: Option<RecordImage>) {
        self.image = image;
        self.texture_dirty = true;
    }

    pub fn image(&self) -> Option<&RecordImage> {
        self.image.as_ref()
    }

    /// Bounds the home view shows: the record image extent when an image is
    /// loaded, else the picks with 5% padding (at least one unit).
    pub fn home_bounds(&self, picks: &PickTable) -> Option<([f64; 2], [f64; 2])> {
        if let Some(img) = &self.image {
            return Some(img.extent);
        }
        let (min, max) = picks.bounds()?;
        let dx = ((max[0] - min[0]) * 0.05).max(1.0);
        let dy = ((max[1] - min[1]) * 0.05).max(1.0);
        Some(([min[0] - dx, min[1] - dy], [max[0] + dx, max[1] + dy]))
    }

    fn upload_texture(&mut self, ctx: &egui::Context) {
        if !std::mem::take(&mut self.texture_dirty) {
            return;
        }
        self.texture = self.image.as_ref().map(|img| {
            ctx.load_texture("xpick_record", img.image.clone(), egui::TextureOptions::NEAREST)
        });
    }

    /// Rebuild the per-phase series. Phases outside the group are appended
    /// in order of first appearance.
    pub fn refresh(&mut self, picks: &PickTable, phases: &PhaseGroup) {
        let mut series: Vec<PhaseSeries> = phases
            .labels()
            .iter()
            .enumerate()
            .map(|(i, label)| PhaseSeries {
                label: label.clone(),
                color: phases.color_at(i),
                points: Vec::new(),
            })
            .collect();
        for r in picks.rows() {
            let p = [r.distance, r.time];
            match series.iter_mut().find(|s| s.label == r.phase) {
                Some(s) => s.points.push(p),
                None => series.push(PhaseSeries {
                    label: r.phase.to_string(),
                    color: phases.color_for(r.phase),
                    points: vec![p],
                }),
            }
        }
        self.series = series;
    }

    pub fn render(
        &mut self,
        ui: &mut Ui,
        dispatcher: &mut GestureDispatcher,
        picks: &SharedPickTable,
        selection: &SharedSelection,
        marker_size: f32,
    ) {
        let time_fmt = self.time_fmt.clone();
        let plot = Plot::new("xpick_plot")
            .allow_drag(false)
            .allow_boxed_zoom(false)
            .x_axis_label("Distance")
            .y_axis_label("Time")
            .y_axis_formatter(move |y, range| {
                time_fmt.format(y.value, (*range.start(), *range.end()))
            })
            .legend(Legend::default());

        self.upload_texture(ui.ctx());
        let fit = std::mem::take(&mut self.fit_requested);
        let fit_bounds = if fit {
            self.home_bounds(&picks.borrow())
        } else {
            None
        };
        let backdrop = match (&self.image, &self.texture) {
            (Some(img), Some(tex)) => {
                let [cx, cy] = img.center();
                let [w, h] = img.size();
                Some(PlotImage::new(
                    "record",
                    tex.id(),
                    PlotPoint::new(cx, cy),
                    egui::vec2(w as f32, h as f32),
                ))
            }
            _ => None,
        };

        let (rect, selected_pts) = {
            let sel = selection.borrow();
            let table = picks.borrow();
            let pts: Vec<[f64; 2]> = sel
                .selected()
                .iter()
                .filter_map(|&i| table.row(i))
                .map(|r| [r.distance, r.time])
                .collect();
            (sel.rect(), pts)
        };

        let series = &self.series;
        let plot_resp = plot.show(ui, |plot_ui| {
            if fit {
                match fit_bounds {
                    Some((min, max)) => {
                        plot_ui.set_plot_bounds(PlotBounds::from_min_max(min, max))
                    }
                    None => plot_ui.set_auto_bounds(egui::Vec2b::new(true, true)),
                }
            }

            if let Some(img) = backdrop {
                plot_ui.image(img);
            }

            for s in series.iter().filter(|s| !s.points.is_empty()) {
                plot_ui.points(
                    Points::new(s.label.clone(), s.points.clone())
                        .radius(marker_size)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .color(s.color),
                );
            }

            if !selected_pts.is_empty() {
                plot_ui.points(
                    Points::new("selected", selected_pts)
                        .radius(marker_size + 2.0)
                        .shape(MarkerShape::Circle)
                        .filled(false)
                        .color(Color32::WHITE),
                );
            }

            if let Some((min, max)) = rect {
                let corners = vec![
                    [min[0], min[1]],
                    [max[0], min[1]],
                    [max[0], max[1]],
                    [min[0], max[1]],
                ];
                plot_ui.polygon(
                    Polygon::new("selection", PlotPoints::from(corners))
                        .fill_color(Color32::from_rgba_unmultiplied(120, 170, 255, 40))
                        .stroke(Stroke::new(1.0, Color32::LIGHT_BLUE)),
                );
            }
        });

        dispatcher.dispatch_egui(&plot_resp.response, &plot_resp.transform);
    }
}
