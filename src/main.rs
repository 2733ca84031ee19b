//! Demo binary: load a model from the config file and spin it.
//!
//! This is the composition root — the one place that owns every component,
//! wires the render context, and decides that a startup failure aborts the
//! process. The per-frame loop clears, renders, presents, then composes the
//! next rotation onto the model matrix.

use std::error::Error;
use std::f32::consts::FRAC_PI_3;

use log::{debug, info};

use softrast::config::Config;
use softrast::prelude::*;
use softrast::{loader, transform};

/// Radians per second of model spin.
const ROTATION_SPEED: f32 = FRAC_PI_3;

/// Fraction of the visible extent the model is scaled to occupy.
const FIT_FRACTION: f32 = 0.75;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/renderer.ron".to_string());
    let config = Config::load(&config_path)?;

    let mut mesh = loader::load_obj(&config.model_path)?;
    mesh.add_texture(&config.texture_path, TextureKind::Diffuse)?;

    let projection = Projection::from_degrees(
        config.fov_y_degrees,
        config.aspect_ratio(),
        config.z_near,
        config.z_far,
    );
    let camera = Camera::new(config.eye(), projection);

    let mut shader = Shader::new();
    shader.set_view_matrix(camera.view_matrix());
    shader.set_projection_matrix(camera.projection_matrix());
    shader.set_view_pos(camera.eye());
    shader.set_model_matrix(fit_to_view(&mesh, &camera));

    let mut rasterizer = Rasterizer::new(config.window_width, config.window_height);
    let mut window = Window::new("softrast", config.window_width, config.window_height)?;
    let mut limiter = FrameLimiter::new(&window);

    let mut ctx = RenderContext::new(&camera, &mesh, &mut shader, &mut rasterizer);
    info!("rendering at {}x{}", config.window_width, config.window_height);

    loop {
        if window.poll_events() == WindowEvent::Quit {
            break;
        }

        ctx.clear(Vec3::ONE);
        ctx.render();
        window.present(ctx.framebuffer_data())?;

        // Animation step: one rotation increment composed per frame.
        let delta_ms = limiter.wait_and_get_delta(&window);
        let angle = ROTATION_SPEED * delta_ms as f32 / 1000.0;
        let shader = ctx.shader_mut();
        shader.set_model_matrix(transform::rotate(shader.model_matrix(), angle, Vec3::UP));

        if delta_ms > 0 {
            debug!("{:.1} fps", 1000.0 / delta_ms as f64);
        }
    }

    Ok(())
}

/// Centers the mesh and scales it to cover `FIT_FRACTION` of the window.
///
/// The visible world extent at the model's depth follows from the field of
/// view, so this is the classic `0.75 * min(w / size.x, h / size.y)` fit
/// computed in world units.
fn fit_to_view(mesh: &MeshData, camera: &Camera) -> Mat4 {
    let bbox = mesh.bounding_box();
    let center = bbox.center();
    let size = bbox.size();

    let distance = camera.eye().magnitude();
    let visible_h = 2.0 * distance * (camera.projection().fov_y() / 2.0).tan();
    let visible_w = visible_h * camera.projection().aspect_ratio();
    let scale = FIT_FRACTION * (visible_w / size.x).min(visible_h / size.y);

    let mut model = Mat4::identity();
    model = transform::scale(model, Vec3::splat(scale));
    model = transform::translate(model, Vec3::new(-center.x, -center.y, 0.0));
    model
}
