use umbra_core::math::{Aabb, LinearRgba, Mat4, Vec3, Vec4};
use umbra_core::renderer::api::{Command, RenderTextureFormat, Viewport};
use umbra_core::renderer::light::{LightShadows, VisibleLight};
use umbra_core::renderer::Camera;
use umbra_core::telemetry::MetricId;
use umbra_core::{AtlasSize, PipelineSettings};
use umbra_infra::{RecordedEvent, RecordingContext, Scene, ShadowCaster};
use umbra_lanes::lighting::{DIRECTIONAL_LIGHT_COUNT, DIRECTIONAL_LIGHT_SHADOW_DATA};
use umbra_lanes::shadow::{DIRECTIONAL_SHADOW_ATLAS, DIRECTIONAL_SHADOW_MATRICES};
use umbra_lanes::{FrameOutcome, FrameRenderer};
use umbra_telemetry::MetricsRegistry;

fn sun(forward: Vec3, strength: f32) -> VisibleLight {
    VisibleLight::directional_towards(forward, LinearRgba::WHITE, 1.0)
        .with_shadows(LightShadows::Soft, strength)
}

fn suns(count: usize) -> Vec<VisibleLight> {
    (0..count)
        .map(|i| sun(Vec3::new(0.2 * i as f32, -1.0, 0.3), 1.0))
        .collect()
}

fn scene(lights: Vec<VisibleLight>) -> Scene {
    lights
        .into_iter()
        .fold(Scene::new(), Scene::with_light)
        .with_caster(ShadowCaster::new(Aabb::from_center_half_extents(
            Vec3::ZERO,
            Vec3::ONE,
        )))
}

fn camera() -> Camera {
    Camera::perspective(
        "Main",
        Vec3::new(0.0, 5.0, -10.0),
        Vec3::ZERO,
        std::f32::consts::FRAC_PI_3,
        16.0 / 9.0,
        0.1,
        1000.0,
    )
    .expect("valid camera")
}

fn settings(atlas_size: AtlasSize) -> PipelineSettings {
    let mut settings = PipelineSettings::default();
    settings.shadows.directional.atlas_size = atlas_size;
    settings
}

fn render(ctx: &mut RecordingContext, renderer: &mut FrameRenderer, atlas_size: AtlasSize) {
    let outcome = renderer.render(ctx, &camera(), &settings(atlas_size));
    assert_eq!(outcome, FrameOutcome::Rendered);
}

fn shadow_tiles(ctx: &RecordingContext) -> Vec<f32> {
    ctx.global_vectors(DIRECTIONAL_LIGHT_SHADOW_DATA)
        .expect("shadow data published")
        .iter()
        .map(|v| v.y)
        .collect()
}

#[test]
fn test_no_lights_allocates_no_atlas() {
    let mut ctx = RecordingContext::new(scene(Vec::new()));
    let mut renderer = FrameRenderer::new();
    render(&mut ctx, &mut renderer, AtlasSize::Size1024);

    assert_eq!(ctx.allocation_count(), 0);
    assert_eq!(ctx.release_count(), 0);
    assert!(ctx.viewports().is_empty());
    assert!(ctx.shadow_draws().is_empty());
    assert_eq!(ctx.global_int(DIRECTIONAL_LIGHT_COUNT), Some(0));
    assert!(ctx.global_matrices(DIRECTIONAL_SHADOW_MATRICES).is_none());
}

#[test]
fn test_single_light_uses_whole_atlas() {
    let mut ctx = RecordingContext::new(scene(suns(1)));
    let mut renderer = FrameRenderer::new();
    render(&mut ctx, &mut renderer, AtlasSize::Size1024);

    assert_eq!(ctx.viewports(), vec![Viewport::new(0.0, 0.0, 1024.0, 1024.0)]);
    assert_eq!(ctx.shadow_draws().len(), 1);
    assert_eq!(ctx.shadow_draws()[0].visible_light_index, 0);

    let descriptor = ctx
        .executed_commands()
        .find_map(|command| match command {
            Command::GetTemporaryRenderTexture { id, descriptor }
                if *id == DIRECTIONAL_SHADOW_ATLAS =>
            {
                Some(*descriptor)
            }
            _ => None,
        })
        .expect("atlas allocated");
    assert_eq!((descriptor.width, descriptor.height), (1024, 1024));
    assert_eq!(descriptor.depth_bits, 32);
    assert_eq!(descriptor.format, RenderTextureFormat::Shadowmap);
}

#[test]
fn test_three_lights_share_a_two_by_two_grid() {
    let mut ctx = RecordingContext::new(scene(suns(3)));
    let mut renderer = FrameRenderer::new();
    render(&mut ctx, &mut renderer, AtlasSize::Size1024);

    assert_eq!(
        ctx.viewports(),
        vec![
            Viewport::new(0.0, 0.0, 512.0, 512.0),
            Viewport::new(512.0, 0.0, 512.0, 512.0),
            Viewport::new(0.0, 512.0, 512.0, 512.0),
        ]
    );
    assert_eq!(shadow_tiles(&ctx), vec![0.0, 1.0, 2.0, 0.0]);

    let matrices = ctx
        .global_matrices(DIRECTIONAL_SHADOW_MATRICES)
        .expect("matrices published");
    assert_eq!(matrices.len(), 4);
    assert_eq!(matrices[3], Mat4::IDENTITY);
}

#[test]
fn test_five_lights_publish_four() {
    let registry = MetricsRegistry::new();
    let mut ctx = RecordingContext::new(scene(suns(5)));
    let mut renderer = FrameRenderer::new();
    renderer.register_metrics(&registry).expect("metrics registered");
    render(&mut ctx, &mut renderer, AtlasSize::Size2048);

    assert_eq!(ctx.global_int(DIRECTIONAL_LIGHT_COUNT), Some(4));
    assert_eq!(shadow_tiles(&ctx), vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(ctx.viewports().len(), 4);

    let dropped = registry
        .get_metric(&MetricId::new("lighting", "directional_lights_dropped"))
        .expect("registered");
    assert_eq!(dropped.value.as_counter(), Some(1));
    let shadowed = registry
        .get_metric(&MetricId::new("shadows", "shadowed_lights"))
        .expect("registered");
    assert_eq!(shadowed.value.as_gauge(), Some(4.0));
}

#[test]
fn test_atlas_capacity_truncates_shadowed_lights() {
    let registry = MetricsRegistry::new();
    let mut ctx = RecordingContext::new(scene(suns(3)));
    let mut renderer = FrameRenderer::with_shadow_capacity(2);
    renderer.register_metrics(&registry).expect("metrics registered");
    render(&mut ctx, &mut renderer, AtlasSize::Size1024);

    assert_eq!(ctx.global_int(DIRECTIONAL_LIGHT_COUNT), Some(3));
    let shadow_data = ctx.global_vectors(DIRECTIONAL_LIGHT_SHADOW_DATA).unwrap();
    assert_eq!(shadow_data[0], Vec4::new(1.0, 0.0, 0.0, 0.0));
    assert_eq!(shadow_data[1], Vec4::new(1.0, 1.0, 0.0, 0.0));
    assert_eq!(shadow_data[2], Vec4::ZERO);

    let truncated = registry
        .get_metric(&MetricId::new("shadows", "lights_truncated"))
        .unwrap();
    assert_eq!(truncated.value.as_counter(), Some(1));
}

#[test]
fn test_zero_strength_light_is_unshadowed() {
    let mut ctx = RecordingContext::new(scene(vec![sun(Vec3::new(0.0, -1.0, 0.5), 0.0)]));
    let mut renderer = FrameRenderer::new();
    render(&mut ctx, &mut renderer, AtlasSize::Size1024);

    assert_eq!(ctx.global_int(DIRECTIONAL_LIGHT_COUNT), Some(1));
    assert_eq!(
        ctx.global_vectors(DIRECTIONAL_LIGHT_SHADOW_DATA).unwrap()[0],
        Vec4::ZERO
    );
    assert_eq!(ctx.allocation_count(), 0);
}

#[test]
fn test_light_without_casters_is_unshadowed() {
    let scene = Scene::new().with_light(sun(Vec3::new(0.0, -1.0, 0.5), 1.0));
    let mut ctx = RecordingContext::new(scene);
    let mut renderer = FrameRenderer::new();
    render(&mut ctx, &mut renderer, AtlasSize::Size1024);

    assert_eq!(ctx.allocation_count(), 0);
    assert_eq!(shadow_tiles(&ctx), vec![0.0; 4]);
}

#[test]
fn test_atlas_is_released_every_frame() {
    let mut ctx = RecordingContext::new(scene(suns(2)));
    let mut renderer = FrameRenderer::new();
    for _ in 0..3 {
        render(&mut ctx, &mut renderer, AtlasSize::Size1024);
        assert_eq!(ctx.live_texture_count(), 0);
    }
    assert_eq!(ctx.allocation_count(), 3);
    assert_eq!(ctx.release_count(), 3);
}

#[test]
fn test_repeated_frames_publish_identical_state() {
    let mut ctx = RecordingContext::new(scene(suns(3)));
    let mut renderer = FrameRenderer::new();

    render(&mut ctx, &mut renderer, AtlasSize::Size1024);
    let first_matrices = ctx.global_matrices(DIRECTIONAL_SHADOW_MATRICES).unwrap().to_vec();
    let first_data = ctx.global_vectors(DIRECTIONAL_LIGHT_SHADOW_DATA).unwrap().to_vec();
    ctx.clear_events();

    render(&mut ctx, &mut renderer, AtlasSize::Size1024);
    assert_eq!(ctx.global_matrices(DIRECTIONAL_SHADOW_MATRICES).unwrap(), &first_matrices[..]);
    assert_eq!(ctx.global_vectors(DIRECTIONAL_LIGHT_SHADOW_DATA).unwrap(), &first_data[..]);
    assert_eq!(ctx.viewports().len(), 3);
}

#[test]
fn test_matrices_project_into_their_own_tile() {
    let mut ctx = RecordingContext::new(scene(suns(4)));
    let mut renderer = FrameRenderer::new();
    render(&mut ctx, &mut renderer, AtlasSize::Size1024);

    let matrices = ctx.global_matrices(DIRECTIONAL_SHADOW_MATRICES).unwrap();
    let viewports = ctx.viewports();
    for (matrix, viewport) in matrices.iter().zip(&viewports) {
        let p = matrix.transform_point3(Vec3::ZERO);
        let (u, v) = (p.x * 1024.0, p.y * 1024.0);
        assert!(u >= viewport.x && u <= viewport.x + viewport.width, "u {u} outside {viewport:?}");
        assert!(v >= viewport.y && v <= viewport.y + viewport.height, "v {v} outside {viewport:?}");
        assert!((0.0..=1.0).contains(&p.z), "depth {} outside [0, 1]", p.z);
    }
}

#[test]
fn test_reversed_z_flips_atlas_depth() {
    let render_with = |reversed_z| {
        let mut ctx = RecordingContext::new(scene(suns(1))).with_reversed_z(reversed_z);
        let mut renderer = FrameRenderer::new();
        render(&mut ctx, &mut renderer, AtlasSize::Size1024);
        let matrix = ctx.global_matrices(DIRECTIONAL_SHADOW_MATRICES).unwrap()[0];
        matrix
    };
    let conventional = render_with(false).transform_point3(Vec3::ZERO);
    let reversed = render_with(true).transform_point3(Vec3::ZERO);

    approx::assert_abs_diff_eq!(reversed.x, conventional.x, epsilon = 1e-5);
    approx::assert_abs_diff_eq!(reversed.y, conventional.y, epsilon = 1e-5);
    approx::assert_abs_diff_eq!(reversed.z, 1.0 - conventional.z, epsilon = 1e-5);
}

#[test]
fn test_shadow_commands_execute_before_light_globals() {
    let mut ctx = RecordingContext::new(scene(suns(1)));
    let mut renderer = FrameRenderer::new();
    render(&mut ctx, &mut renderer, AtlasSize::Size1024);

    let lists: Vec<&str> = ctx
        .events()
        .iter()
        .filter_map(|event| match event {
            RecordedEvent::Execute { list, .. } => Some(list.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        lists,
        vec!["Main", "Shadows", "Shadows", "Shadows", "Lighting", "Main", "Shadows", "Main"]
    );
    assert!(matches!(ctx.events().last(), Some(RecordedEvent::Submit)));
}
