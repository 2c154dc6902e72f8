use umbra_core::math::{Aabb, LinearRgba, Vec3};
use umbra_core::renderer::light::{LightShadows, VisibleLight};
use umbra_core::renderer::{Camera, GraphicsSettings};
use umbra_core::telemetry::MetricId;
use umbra_core::{PipelineSettings, SettingsError};
use umbra_infra::{RecordedEvent, RecordingContext, Scene, ShadowCaster};
use umbra_lanes::{PipelineError, RenderPipeline};
use umbra_telemetry::MetricsRegistry;

fn camera(name: &str, near: f32) -> Camera {
    Camera::perspective(
        name,
        Vec3::new(4.0, 3.0, 4.0),
        Vec3::ZERO,
        1.0,
        1.0,
        near,
        200.0,
    )
    .expect("valid camera")
}

fn scene() -> Scene {
    Scene::new()
        .with_light(
            VisibleLight::directional_towards(Vec3::new(-0.3, -1.0, 0.2), LinearRgba::WHITE, 1.5)
                .with_shadows(LightShadows::Hard, 0.9),
        )
        .with_caster(ShadowCaster::new(Aabb::from_center_half_extents(
            Vec3::ZERO,
            Vec3::splat(2.0),
        )))
}

#[test]
fn test_invalid_settings_are_rejected() {
    let mut settings = PipelineSettings::default();
    settings.shadows.max_distance = -1.0;
    let err = RenderPipeline::new(settings).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::InvalidSettings(SettingsError::InvalidMaxDistance(_))
    ));
    assert!(err.to_string().starts_with("Invalid pipeline settings"));
}

#[test]
fn test_render_draws_every_camera_in_order() {
    let settings = PipelineSettings {
        use_srp_batcher: true,
        ..PipelineSettings::default()
    };
    let mut pipeline = RenderPipeline::new(settings).unwrap();
    let mut ctx = RecordingContext::new(scene());
    let rendered = pipeline.render(&mut ctx, &[camera("First", 0.1), camera("Second", 0.1)]);
    assert_eq!(rendered, 2);

    assert_eq!(
        ctx.events().first(),
        Some(&RecordedEvent::GraphicsSettings(GraphicsSettings {
            use_srp_batching: true,
            lights_use_linear_intensity: true,
        }))
    );
    let cameras: Vec<&str> = ctx
        .events()
        .iter()
        .filter_map(|event| match event {
            RecordedEvent::SetupCamera { camera, .. } => Some(camera.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(cameras, vec!["First", "Second"]);
    let submits = ctx
        .events()
        .iter()
        .filter(|event| matches!(event, RecordedEvent::Submit))
        .count();
    assert_eq!(submits, 2);
    assert_eq!(ctx.allocation_count(), 2);
    assert_eq!(ctx.release_count(), 2);
}

#[test]
fn test_culled_camera_is_skipped() {
    let mut pipeline = RenderPipeline::new(PipelineSettings::default()).unwrap();
    let mut ctx = RecordingContext::new(scene());
    let rendered = pipeline.render(&mut ctx, &[camera("Broken", -1.0), camera("Main", 0.1)]);
    assert_eq!(rendered, 1);
}

#[test]
fn test_metrics_accumulate_across_frames() {
    let registry = MetricsRegistry::new();
    let mut pipeline = RenderPipeline::new(PipelineSettings::default())
        .unwrap()
        .with_metrics(&registry)
        .unwrap();
    let mut ctx = RecordingContext::new(scene());
    for _ in 0..3 {
        pipeline.render(&mut ctx, &[camera("Main", 0.1)]);
    }

    let allocations = registry
        .get_metric(&MetricId::new("shadows", "atlas_allocations"))
        .unwrap();
    assert_eq!(allocations.value.as_counter(), Some(3));
}

#[test]
fn test_settings_from_ron() {
    let settings = PipelineSettings::from_ron_str(
        "(use_srp_batcher: true, shadows: (max_distance: 40.0, directional: (atlas_size: 2048)))",
    )
    .unwrap();
    let pipeline = RenderPipeline::new(settings).unwrap();
    assert!(pipeline.settings().use_srp_batcher);
    assert_eq!(pipeline.settings().shadows.directional.atlas_size.pixels(), 2048);

    let err = PipelineSettings::from_ron_str("(shadows: (directional: (atlas_size: 1000)))")
        .unwrap_err();
    assert!(matches!(err, SettingsError::Parse(_)));
}
