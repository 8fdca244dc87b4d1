//! End-to-end behaviour of the equalizer pipeline.

use approx::assert_abs_diff_eq;
use coloreq::{ColorEqualizer, GradeParams, HueNode, MaskKind, NodeChannel, PipelineOptions, RenderMode};
use coloreq_color::{ucs, GamutCache, WorkingProfile};
use coloreq_core::RgbaImage;

fn equalizer(params: &GradeParams) -> ColorEqualizer {
    ColorEqualizer::new(params.compile().unwrap(), PipelineOptions::default()).unwrap()
}

/// Deterministic image of moderate, non-negative colors.
fn test_image(width: u32, height: u32) -> RgbaImage {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for i in 0..width * height {
        let f = |k: u32| 0.2 + 0.6 * (((i * k + 7 * k) % 97) as f32 / 96.0);
        data.extend_from_slice(&[f(13), f(29), f(53), 0.25 + 0.5 * ((i % 3) as f32 / 2.0)]);
    }
    RgbaImage::from_data(width, height, data).unwrap()
}

fn hue_and_m(profile: &WorkingProfile, rgb: [f32; 3]) -> (f32, f32) {
    let uv = ucs::xyz_to_uv(profile.rgb_to_xyz(rgb));
    (uv[1].atan2(uv[0]), uv[0].hypot(uv[1]))
}

fn rgb(px: [f32; 4]) -> [f32; 3] {
    [px[0], px[1], px[2]]
}

#[test]
fn identity_parameters_reproduce_input() {
    let eq = equalizer(&GradeParams::identity());
    let image = test_image(23, 17);
    for name in ["srgb", "rec2020"] {
        let profile = WorkingProfile::by_name(name).unwrap();
        let out = eq.process(&image, Some(&profile), &GamutCache::new()).unwrap();
        for (a, b) in image.data().iter().zip(out.data()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-5);
        }
    }
}

#[test]
fn identity_keeps_saturated_colors() {
    let corners: [[f32; 3]; 11] = [
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 1.0],
        [1.0, 0.0, 1.0],
        [0.6, 0.0, 0.6],
        [0.8, 0.7, 0.0],
        [0.9, 0.02, 0.01],
        [0.01, 0.03, 0.95],
        [1.0, 1.0, 1.0],
    ];
    let data: Vec<f32> = corners.iter().flat_map(|c| [c[0], c[1], c[2], 1.0]).collect();
    let image = RgbaImage::from_data(corners.len() as u32, 1, data).unwrap();
    let profile = WorkingProfile::srgb().unwrap();
    let out = equalizer(&GradeParams::identity())
        .process(&image, Some(&profile), &GamutCache::new())
        .unwrap();
    for (x, c) in corners.iter().enumerate() {
        let px = out.pixel(x as u32, 0);
        for k in 0..3 {
            assert!((px[k] - c[k]).abs() < 1e-5, "{c:?} -> {px:?}");
        }
    }
}

#[test]
fn identity_ignores_node_placement() {
    let params = GradeParams {
        hue_shift: 17.0,
        white_level: 4.0,
        ..GradeParams::identity()
    };
    let image = test_image(9, 9);
    let profile = WorkingProfile::srgb().unwrap();
    let out = equalizer(&params).process(&image, Some(&profile), &GamutCache::new()).unwrap();
    for (a, b) in image.data().iter().zip(out.data()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-5);
    }
}

#[test]
fn flat_image_with_filters_is_unchanged() {
    let params = GradeParams::default();
    assert!(params.use_filter);
    let profile = WorkingProfile::srgb().unwrap();
    let image = RgbaImage::filled(32, 24, [0.45, 0.3, 0.2, 1.0]).unwrap();
    let out = equalizer(&params).process(&image, Some(&profile), &GamutCache::new()).unwrap();
    for (a, b) in image.data().iter().zip(out.data()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-4);
    }
}

#[test]
fn filters_leave_flat_corrections_alone() {
    let profile = WorkingProfile::srgb().unwrap();
    let mut params = GradeParams::default();
    for node in HueNode::ALL {
        params.set_node(NodeChannel::Saturation, node, 1.5);
    }
    params.set_node(NodeChannel::Brightness, HueNode::Orange, 1.3);
    let image = RgbaImage::filled(16, 16, [0.45, 0.3, 0.2, 1.0]).unwrap();

    let filtered = equalizer(&params).process(&image, Some(&profile), &GamutCache::new()).unwrap();
    params.use_filter = false;
    let plain = equalizer(&params).process(&image, Some(&profile), &GamutCache::new()).unwrap();

    assert!((plain.pixel(0, 0)[0] - 0.45).abs() > 0.01);
    for (a, b) in filtered.data().iter().zip(plain.data()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-5);
    }
}

#[test]
fn hue_offset_at_node_angle() {
    let profile = WorkingProfile::srgb().unwrap();
    let red = 20f32.to_radians();
    let m = 0.008;
    let xyz = ucs::uv_to_xyz([m * red.cos(), m * red.sin()], 0.2).unwrap();
    let input = profile.xyz_to_rgb(xyz);
    assert!(input.iter().all(|&c| c > 0.0));

    let mut params = GradeParams::identity();
    params.set_node(NodeChannel::Hue, HueNode::Red, 10.0);
    let image = RgbaImage::filled(1, 1, [input[0], input[1], input[2], 1.0]).unwrap();
    let out = equalizer(&params).process(&image, Some(&profile), &GamutCache::new()).unwrap();

    let (h, m_out) = hue_and_m(&profile, rgb(out.pixel(0, 0)));
    assert_abs_diff_eq!(h, 30f32.to_radians(), epsilon = 1e-3);
    assert_abs_diff_eq!(m_out, m, epsilon = 1e-4);
}

#[test]
fn saturation_gain_adds_colorfulness() {
    let profile = WorkingProfile::srgb().unwrap();
    let mut params = GradeParams::default();
    for node in HueNode::ALL {
        params.set_node(NodeChannel::Saturation, node, 1.3);
    }
    let color = [0.5, 0.2, 0.15];
    let image = RgbaImage::filled(16, 16, [color[0], color[1], color[2], 1.0]).unwrap();
    let out = equalizer(&params).process(&image, Some(&profile), &GamutCache::new()).unwrap();

    let (h_in, m_in) = hue_and_m(&profile, color);
    let (h_out, m_out) = hue_and_m(&profile, rgb(out.pixel(8, 8)));
    assert!(m_out > m_in * 1.05, "{m_in} -> {m_out}");
    assert_abs_diff_eq!(h_out, h_in, epsilon = 1e-3);
}

#[test]
fn greys_are_left_alone() {
    let profile = WorkingProfile::srgb().unwrap();
    let mut params = GradeParams::identity();
    for node in HueNode::ALL {
        params.set_node(NodeChannel::Saturation, node, 2.0);
        params.set_node(NodeChannel::Hue, node, 40.0);
    }
    let image = RgbaImage::filled(4, 4, [0.3, 0.3, 0.3, 1.0]).unwrap();
    let out = equalizer(&params).process(&image, Some(&profile), &GamutCache::new()).unwrap();
    for (a, b) in image.data().iter().zip(out.data()) {
        assert_abs_diff_eq!(a, b, epsilon = 5e-4);
    }
}

#[test]
fn alpha_is_preserved() {
    let profile = WorkingProfile::srgb().unwrap();
    let image = test_image(11, 7);
    let out = equalizer(&GradeParams::default())
        .process(&image, Some(&profile), &GamutCache::new())
        .unwrap();
    for (a, b) in image.data().chunks_exact(4).zip(out.data().chunks_exact(4)) {
        assert_eq!(a[3], b[3]);
    }
}

#[test]
fn missing_profile_passes_through() {
    let mut params = GradeParams::default();
    params.set_node(NodeChannel::Brightness, HueNode::Blue, 2.0);
    let image = test_image(8, 8);
    let cache = GamutCache::new();
    let out = equalizer(&params).process(&image, None, &cache).unwrap();
    assert_eq!(out.data(), image.data());
    assert!(cache.cached_profile().is_none());
}

#[test]
fn gamut_table_is_cached_per_profile() {
    let eq = equalizer(&GradeParams::default());
    let cache = GamutCache::new();
    let srgb = WorkingProfile::srgb().unwrap();
    let rec2020 = WorkingProfile::by_name("rec2020").unwrap();
    let image = test_image(6, 6);

    eq.process(&image, Some(&srgb), &cache).unwrap();
    assert_eq!(cache.cached_profile().as_deref(), Some(srgb.name()));
    eq.process(&image, Some(&rec2020), &cache).unwrap();
    assert_eq!(cache.cached_profile().as_deref(), Some(rec2020.name()));
}

#[test]
fn saturation_mask_of_neutral_image_is_grey() {
    let profile = WorkingProfile::srgb().unwrap();
    let options = PipelineOptions {
        mode: RenderMode::Mask(MaskKind::Saturation),
        ..PipelineOptions::default()
    };
    let eq = ColorEqualizer::new(GradeParams::default().compile().unwrap(), options).unwrap();
    let image = RgbaImage::filled(8, 8, [0.3, 0.3, 0.3, 0.75]).unwrap();
    let out = eq.process(&image, Some(&profile), &GamutCache::new()).unwrap();
    let px = out.pixel(4, 4);
    assert_abs_diff_eq!(px[0], 1.5, epsilon = 1e-4);
    assert_abs_diff_eq!(px[1], 1.5, epsilon = 1e-4);
    assert_abs_diff_eq!(px[2], 1.5, epsilon = 1e-4);
    assert_eq!(px[3], 0.75);
}

#[test]
fn weight_mask_tints_neutrals_blue() {
    let profile = WorkingProfile::srgb().unwrap();
    let options = PipelineOptions {
        mode: RenderMode::Mask(MaskKind::Weight),
        ..PipelineOptions::default()
    };
    let eq = ColorEqualizer::new(GradeParams::identity().compile().unwrap(), options).unwrap();
    let image = RgbaImage::filled(8, 8, [0.3, 0.3, 0.3, 1.0]).unwrap();
    let out = eq.process(&image, Some(&profile), &GamutCache::new()).unwrap();
    let px = out.pixel(2, 5);
    assert!(px[2] > px[0] + 0.2, "{px:?}");
    assert_abs_diff_eq!(px[0], px[1], epsilon = 1e-6);
}

#[test]
fn in_place_matches_copy() {
    let profile = WorkingProfile::srgb().unwrap();
    let mut params = GradeParams::default();
    params.set_node(NodeChannel::Brightness, HueNode::Orange, 1.4);
    params.set_node(NodeChannel::Hue, HueNode::Cyan, -20.0);
    let eq = equalizer(&params);
    let cache = GamutCache::new();
    let image = test_image(19, 13);

    let copy = eq.process(&image, Some(&profile), &cache).unwrap();
    let mut in_place = image.clone();
    eq.process_in_place(&mut in_place, Some(&profile), &cache).unwrap();
    assert_eq!(copy.data(), in_place.data());
    assert!(copy.data().iter().all(|v| v.is_finite()));
}
