use egui::Color32;
use ndarray::Array2;
use xpick::*;

// 2021-11-13 01:41:00 UTC
const T0: f64 = 1_636_767_660_000.0;

/// 5 time samples (T0 + 0..4 s) by 4 distance samples (0, 10, 20, 30 m);
/// the value encodes its indices as `10 * t + d`.
fn record() -> Record {
    let time: Vec<f64> = (0..5).map(|i| T0 + i as f64 * 1_000.0).collect();
    let distance: Vec<f64> = (0..4).map(|i| i as f64 * 10.0).collect();
    let values = Array2::from_shape_fn((5, 4), |(t, d)| (10 * t + d) as f64);
    Record::new(time, distance, values).unwrap()
}

fn window(t0: f64, t1: f64, d0: f64, d1: f64) -> RecordWindow {
    RecordWindow {
        start_time: t0,
        end_time: t1,
        start_distance: d0,
        end_distance: d1,
    }
}

#[test]
fn shape_mismatch_is_rejected() {
    let err = Record::new(vec![0.0, 1.0], vec![0.0], Array2::zeros((1, 1)));
    assert!(matches!(
        err,
        Err(PickError::RecordShape {
            rows: 1,
            time: 2,
            ..
        })
    ));
}

#[test]
fn window_bounds_are_inclusive() {
    let w = record()
        .window(&window(T0 + 1_000.0, T0 + 3_000.0, 10.0, 20.0))
        .unwrap();
    assert_eq!(w.dim(), (3, 2));
    assert_eq!(w.time(), &[T0 + 1_000.0, T0 + 2_000.0, T0 + 3_000.0]);
    assert_eq!(w.distance(), &[10.0, 20.0]);
    assert_eq!(w.values()[[0, 0]], 11.0);
    assert_eq!(w.values()[[2, 1]], 32.0);
}

#[test]
fn window_outside_the_record_is_an_error() {
    let err = record().window(&window(T0 + 10_000.0, T0 + 20_000.0, 0.0, 30.0));
    assert!(matches!(err, Err(PickError::EmptyWindow { .. })));
    let err = record().window(&window(T0, T0 + 4_000.0, 12.0, 18.0));
    assert!(matches!(err, Err(PickError::EmptyWindow { .. })));
}

#[test]
fn extent_pads_half_a_sample() {
    let (min, max) = record().extent();
    assert_eq!(min, [-5.0, T0 - 500.0]);
    assert_eq!(max, [35.0, T0 + 4_500.0]);
}

#[test]
fn window_fields_parse_like_the_side_panel() {
    let w = RecordWindow::parse(
        "2021-11-13 01:41:00",
        "2021-11-13T01:41:10",
        "20_000.0",
        " 120_000.0",
    )
    .unwrap();
    assert_eq!(w, RecordWindow::default());
    assert!(matches!(
        RecordWindow::parse("2021-11-13 01:41:00", "later", "0", "1"),
        Err(PickError::TimeParse { .. })
    ));
}

#[test]
fn image_puts_the_latest_time_on_top() {
    let settings = ColormapSettings {
        palette: Palette::Seismic,
        linthresh: 1.0,
        vlim: 40.0,
        gain: 1.0,
    };
    let r = record();
    let img = render_record(&r, &settings).unwrap();
    assert_eq!(img.image.size, [4, 5]);
    assert_eq!(img.extent, r.extent());

    let norm = SymLogNorm::new(1.0, 40.0).unwrap();
    let at = |x: usize, y: usize| img.image.pixels[y * 4 + x];
    // top-left: latest time, nearest distance (value 40)
    assert_eq!(at(0, 0), Palette::Seismic.color(norm.normalize(40.0)));
    // bottom-right: earliest time, farthest distance (value 3)
    assert_eq!(at(3, 4), Palette::Seismic.color(norm.normalize(3.0)));
    assert_eq!(img.center(), [15.0, T0 + 2_000.0]);
    assert_eq!(img.size(), [40.0, 5_000.0]);
}

#[test]
fn gain_scales_samples_before_colouring() {
    let r = Record::new(vec![0.0], vec![0.0], Array2::from_elem((1, 1), 100.0)).unwrap();
    let settings = ColormapSettings {
        gain: 1e-7,
        ..ColormapSettings::default()
    };
    let img = render_record(&r, &settings).unwrap();
    let norm = SymLogNorm::new(settings.linthresh, settings.vlim).unwrap();
    assert_eq!(
        img.image.pixels[0],
        Palette::Viridis.color(norm.normalize(1e-5))
    );
}

#[test]
fn missing_samples_are_transparent() {
    let r = Record::new(vec![0.0], vec![0.0, 1.0], Array2::from_elem((1, 2), f64::NAN)).unwrap();
    let img = render_record(&r, &ColormapSettings::default()).unwrap();
    assert!(img.image.pixels.iter().all(|c| *c == Color32::TRANSPARENT));
}

#[test]
fn long_axes_are_thinned() {
    let n = colormap_side() + 10;
    let time: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let r = Record::new(time, vec![0.0], Array2::zeros((n, 1))).unwrap();
    let img = render_record(&r, &ColormapSettings::default()).unwrap();
    assert_eq!(img.image.size[0], 1);
    assert!(img.image.size[1] <= colormap_side());
    assert_eq!(img.extent, r.extent());
}

fn colormap_side() -> usize {
    xpick::data::colormap::MAX_IMAGE_SIDE
}

#[test]
fn memory_source_loads_windows() {
    let src = MemorySource::new("test", record());
    assert_eq!(src.describe(), "test (5x4)");
    let w = src.load(&window(T0, T0 + 1_000.0, 0.0, 30.0)).unwrap();
    assert_eq!(w.dim(), (2, 4));
}

fn app() -> PickerApp {
    let picks = PickTable::new().into_shared();
    let phases = PhaseGroup::new(vec!["P".into()], &[]).unwrap().into_shared();
    PickerApp::with_handles(picks, phases)
}

#[test]
fn apply_loads_the_selected_window() {
    let mut app = app();
    app.set_source(Box::new(MemorySource::new("test", record())));
    assert!(app.record().is_none());

    let fields = app.record_controls_mut();
    fields.start_time = "2021-11-13 01:41:01".into();
    fields.end_time = "2021-11-13 01:41:02".into();
    fields.start_distance = "0".into();
    fields.end_distance = "1_000".into();
    app.apply_selection().unwrap();

    let r = app.record().unwrap();
    assert_eq!(r.dim(), (2, 4));
    assert_eq!(r.time()[0], T0 + 1_000.0);
}

#[test]
fn failed_apply_keeps_the_previous_window() {
    let mut app = app();
    app.set_source(Box::new(MemorySource::new("test", record())));
    let fields = app.record_controls_mut();
    fields.start_time = "2021-11-13 01:41:00".into();
    fields.end_time = "2021-11-13 01:41:04".into();
    fields.start_distance = "0".into();
    fields.end_distance = "30".into();
    app.apply_selection().unwrap();

    app.record_controls_mut().linthresh = "-1".into();
    assert!(matches!(
        app.apply_selection(),
        Err(PickError::InvalidNorm { .. })
    ));
    assert_eq!(app.record().map(Record::dim), Some((5, 4)));
    assert!(matches!(app.recolor(), Err(PickError::InvalidNorm { .. })));
}

#[test]
fn apply_without_a_record_source_fails() {
    let mut app = app();
    assert!(matches!(app.apply_selection(), Err(PickError::NoRecord)));
    assert!(matches!(app.recolor(), Err(PickError::NoRecord)));
}

#[cfg(not(feature = "netcdf"))]
#[test]
fn record_files_need_netcdf_support() {
    let err = open_record_source(std::path::Path::new("das.nc"), "data");
    assert!(matches!(err, Err(PickError::NetcdfDisabled)));
}
