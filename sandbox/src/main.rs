// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Umbra Sandbox
// Renders a demo scene through the headless backend and logs what happened.

use std::path::Path;

use anyhow::{Context, Result};
use umbra_core::math::{Aabb, LinearRgba, Vec3, FRAC_PI_4};
use umbra_core::renderer::light::{LightShadows, LightType, VisibleLight};
use umbra_core::renderer::{Camera, CameraClearFlags};
use umbra_core::PipelineSettings;
use umbra_infra::{RecordedEvent, RecordingContext, Scene, ShadowCaster};
use umbra_lanes::RenderPipeline;
use umbra_telemetry::MetricsRegistry;

const SETTINGS_PATH: &str = "sandbox/pipeline.ron";

fn load_settings() -> Result<PipelineSettings> {
    if !Path::new(SETTINGS_PATH).exists() {
        log::info!("No {SETTINGS_PATH}, using default pipeline settings");
        return Ok(PipelineSettings::default());
    }
    PipelineSettings::load(SETTINGS_PATH)
        .with_context(|| format!("failed to load pipeline settings from {SETTINGS_PATH}"))
}

fn build_scene() -> Scene {
    let suns = [
        (Vec3::new(-0.3, -1.0, 0.4), LinearRgba::rgb(1.0, 0.95, 0.85), 2.0, 1.0),
        (Vec3::new(0.6, -0.8, -0.2), LinearRgba::rgb(0.4, 0.5, 0.9), 0.6, 0.5),
        (Vec3::new(0.0, -1.0, 0.0), LinearRgba::rgb(1.0, 0.6, 0.3), 0.8, 0.0),
        (Vec3::new(-0.7, -0.5, -0.5), LinearRgba::WHITE, 0.3, 0.8),
        (Vec3::new(0.2, -0.9, 0.7), LinearRgba::WHITE, 0.2, 1.0),
    ];

    let scene = suns
        .into_iter()
        .fold(Scene::new(), |scene, (forward, color, intensity, strength)| {
            scene.with_light(
                VisibleLight::directional_towards(forward, color, intensity)
                    .with_shadows(LightShadows::Soft, strength),
            )
        })
        .with_light(VisibleLight::local(
            LightType::Point,
            LinearRgba::rgb(1.0, 0.2, 0.2),
            4.0,
            Vec3::new(2.0, 1.0, 0.0),
        ));

    [
        Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(20.0, 0.1, 20.0)),
        Aabb::from_center_half_extents(Vec3::new(0.0, 1.0, 0.0), Vec3::ONE),
        Aabb::from_center_half_extents(Vec3::new(4.0, 2.0, -3.0), Vec3::new(0.5, 2.0, 0.5)),
    ]
    .into_iter()
    .fold(scene, |scene, bounds| scene.with_caster(ShadowCaster::new(bounds)))
}

fn build_cameras() -> Result<Vec<Camera>> {
    let main = Camera::perspective(
        "Main Camera",
        Vec3::new(0.0, 6.0, -12.0),
        Vec3::ZERO,
        FRAC_PI_4,
        16.0 / 9.0,
        0.3,
        500.0,
    )
    .context("main camera look-at is degenerate")?;
    let minimap = Camera::perspective(
        "Minimap",
        Vec3::new(0.0, 40.0, -1.0),
        Vec3::ZERO,
        FRAC_PI_4,
        1.0,
        1.0,
        60.0,
    )
    .context("minimap camera look-at is degenerate")?
    .with_clear_flags(CameraClearFlags::Color, LinearRgba::rgb(0.05, 0.05, 0.08));
    Ok(vec![main, minimap])
}

fn main() -> Result<()> {
    umbra_telemetry::logging::init("info");

    let settings = load_settings()?;
    let registry = MetricsRegistry::new();
    let mut pipeline = RenderPipeline::new(settings)?.with_metrics(&registry)?;

    let mut ctx = RecordingContext::new(build_scene());
    let cameras = build_cameras()?;
    let rendered = pipeline.render(&mut ctx, &cameras);
    log::info!("Rendered {rendered}/{} camera(s)", cameras.len());

    for event in ctx.events() {
        match event {
            RecordedEvent::Execute { list, commands } => {
                log::debug!("execute '{list}' ({} commands)", commands.len());
                for command in commands {
                    log::trace!("    {command:?}");
                }
            }
            other => log::debug!("{other:?}"),
        }
    }
    log::info!(
        "Atlas allocations: {}, releases: {}, shadow tiles drawn: {}",
        ctx.allocation_count(),
        ctx.release_count(),
        ctx.viewports().len()
    );

    let uniforms = pipeline.frame_renderer().lighting().uniforms();
    log::info!(
        "Last camera published {} directional light(s), uniform block {} bytes",
        uniforms.count,
        uniforms.as_bytes().len()
    );

    for metric in registry.snapshot() {
        log::info!("{} = {:?}", metric.id, metric.value);
    }
    Ok(())
}
