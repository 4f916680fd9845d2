//! Input handling: camera, picking and gesture state
//!
//! Nothing here touches the DOM. The platform layer feeds pointer positions,
//! clicks and key presses in; the session receives `(id, position)` and
//! `(id, name)` updates out.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use std::f32::consts::FRAC_PI_2;

use crate::consts::{HITBOX_OFFSET_Y, HITBOX_SIZE};
use crate::field::Fielder;

/// Orbit camera limits
pub const MIN_DISTANCE: f32 = 20.0;
pub const MAX_DISTANCE: f32 = 200.0;
/// Never look from below the ground
pub const MAX_POLAR_ANGLE: f32 = FRAC_PI_2;
const MIN_POLAR_ANGLE: f32 = 0.01;

const FOV_Y_DEGREES: f32 = 60.0;
const Z_NEAR: f32 = 0.5;
const Z_FAR: f32 = 1000.0;

/// A ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Intersection with the horizontal plane `y = height`, if in front of the ray
    pub fn intersect_horizontal_plane(&self, height: f32) -> Option<Vec3> {
        if self.dir.y.abs() < 1e-6 {
            return None;
        }
        let t = (height - self.origin.y) / self.dir.y;
        if t < 0.0 {
            return None;
        }
        Some(self.at(t))
    }

    /// Slab test against an axis-aligned box, returning the entry distance
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<f32> {
        let inv = self.dir.recip();
        let t1 = (min - self.origin) * inv;
        let t2 = (max - self.origin) * inv;
        let t_near = t1.min(t2).max_element();
        let t_far = t1.max(t2).min_element();

        if t_near > t_far || t_far < 0.0 {
            return None;
        }
        Some(t_near.max(0.0))
    }
}

/// Pickable box around a fielder: wider than the model, for touch screens
pub fn fielder_hitbox(position: Vec3) -> (Vec3, Vec3) {
    let half = Vec3::from_array(HITBOX_SIZE) / 2.0;
    let center = position + Vec3::new(0.0, HITBOX_OFFSET_Y, 0.0);
    (center - half, center + half)
}

/// Nearest fielder whose hitbox the ray passes through
pub fn pick_fielder<'a>(ray: &Ray, players: &'a [Fielder]) -> Option<&'a Fielder> {
    players
        .iter()
        .filter_map(|p| {
            let (min, max) = fielder_hitbox(p.position);
            ray.intersect_aabb(min, max).map(|t| (t, p))
        })
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, p)| p)
}

/// Orbit camera around a ground-level target
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Azimuth around +y, 0 = looking from +z
    pub yaw: f32,
    /// Angle from straight overhead
    pub polar: f32,
    pub distance: f32,
    /// Cleared while a fielder is being dragged
    pub enabled: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // Eye at (0, 100, 70) looking at the field center
        Self::looking_from(Vec3::new(0.0, 100.0, 70.0), Vec3::ZERO)
    }
}

impl OrbitCamera {
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let polar = (offset.y / offset.length().max(1e-6))
            .clamp(-1.0, 1.0)
            .acos()
            .clamp(MIN_POLAR_ANGLE, MAX_POLAR_ANGLE);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            polar,
            distance,
            enabled: true,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_y, cos_y) = self.yaw.sin_cos();
        self.target + self.distance * Vec3::new(sin_p * sin_y, cos_p, sin_p * cos_y)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect.max(1e-3), Z_NEAR, Z_FAR);
        proj * view
    }

    /// Rotate by a pointer delta already scaled to radians
    pub fn orbit(&mut self, d_yaw: f32, d_polar: f32) {
        if !self.enabled {
            return;
        }
        self.yaw -= d_yaw;
        self.polar = (self.polar - d_polar).clamp(MIN_POLAR_ANGLE, MAX_POLAR_ANGLE);
    }

    /// Dolly in (negative) or out (positive) by a relative factor
    pub fn zoom(&mut self, factor: f32) {
        if !self.enabled {
            return;
        }
        self.distance = (self.distance * (1.0 + factor)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Slide the target across the ground, in screen-aligned directions
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }
        let (sin_y, cos_y) = self.yaw.sin_cos();
        let right = Vec3::new(cos_y, 0.0, -sin_y);
        let forward = Vec3::new(-sin_y, 0.0, -cos_y);
        let scale = self.distance * 0.002;
        self.target += (right * -dx + forward * dy) * scale;
    }

    /// World-space ray through a point given in normalized device coordinates
    pub fn screen_ray(&self, ndc: Vec2, aspect: f32) -> Ray {
        let inv = self.view_proj(aspect).inverse();
        let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(near, far - near)
    }

    /// Project a world point to pixel coordinates (origin top-left)
    pub fn project(&self, world: Vec3, viewport: Vec2) -> Option<Vec2> {
        let clip = self.view_proj(viewport.x / viewport.y) * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.x,
            (1.0 - ndc.y) * 0.5 * viewport.y,
        ))
    }
}

/// Convert pixel coordinates (origin top-left) to normalized device coordinates
pub fn pixel_to_ndc(pixel: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        pixel.x / viewport.x * 2.0 - 1.0,
        1.0 - pixel.y / viewport.y * 2.0,
    )
}

/// Mutually exclusive pointer interaction modes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Interaction {
    /// Pointer drags move the camera
    #[default]
    Orbit,
    /// One fielder follows the captured pointer
    Dragging { fielder_id: String, pointer_id: i32 },
}

impl Interaction {
    /// Start dragging a fielder. Fails if a drag is already in progress.
    pub fn begin_drag(&mut self, fielder_id: &str, pointer_id: i32) -> bool {
        if matches!(self, Interaction::Dragging { .. }) {
            return false;
        }
        *self = Interaction::Dragging {
            fielder_id: fielder_id.to_string(),
            pointer_id,
        };
        true
    }

    /// Fielder being dragged by this pointer, if any
    pub fn drag_target(&self, pointer_id: i32) -> Option<&str> {
        match self {
            Interaction::Dragging {
                fielder_id,
                pointer_id: captured,
            } if *captured == pointer_id => Some(fielder_id.as_str()),
            _ => None,
        }
    }

    /// Release the pointer; returns the fielder that was being dragged
    pub fn end_drag(&mut self, pointer_id: i32) -> Option<String> {
        match std::mem::take(self) {
            Interaction::Dragging {
                fielder_id,
                pointer_id: captured,
            } if captured == pointer_id => Some(fielder_id),
            other => {
                *self = other;
                None
            }
        }
    }

    pub fn camera_enabled(&self) -> bool {
        matches!(self, Interaction::Orbit)
    }

    /// Keep the camera's enabled flag in sync with the current mode
    pub fn sync_camera(&self, camera: &mut OrbitCamera) {
        camera.enabled = self.camera_enabled();
    }
}

/// Where a dragged fielder should go: the pointer ray against the plane at the
/// fielder's own height
pub fn drag_ground_point(ray: &Ray, fielder: &Fielder) -> Option<Vec3> {
    ray.intersect_horizontal_plane(fielder.position.y)
}

/// Name label editing: click once to arm, click again quickly to edit
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NameEdit {
    #[default]
    Idle,
    Armed { fielder_id: String, at_ms: f64 },
    Editing {
        fielder_id: String,
        original: String,
        draft: String,
    },
}

impl NameEdit {
    /// Feed a click on a fielder's label. Returns true when editing starts.
    pub fn click(&mut self, fielder_id: &str, current_name: &str, now_ms: f64, threshold_ms: f64) -> bool {
        if matches!(self, NameEdit::Editing { .. }) {
            return false;
        }

        let second_click = matches!(
            &*self,
            NameEdit::Armed { fielder_id: armed, at_ms }
                if armed == fielder_id && now_ms - *at_ms <= threshold_ms
        );

        *self = if second_click {
            NameEdit::Editing {
                fielder_id: fielder_id.to_string(),
                original: current_name.to_string(),
                draft: current_name.to_string(),
            }
        } else {
            NameEdit::Armed {
                fielder_id: fielder_id.to_string(),
                at_ms: now_ms,
            }
        };
        second_click
    }

    pub fn editing_id(&self) -> Option<&str> {
        match self {
            NameEdit::Editing { fielder_id, .. } => Some(fielder_id),
            _ => None,
        }
    }

    pub fn set_draft(&mut self, text: &str) {
        if let NameEdit::Editing { draft, .. } = self {
            *draft = text.to_string();
        }
    }

    /// Enter or blur: hand back `(id, name)` for the session
    pub fn commit(&mut self) -> Option<(String, String)> {
        match std::mem::take(self) {
            NameEdit::Editing {
                fielder_id, draft, ..
            } => Some((fielder_id, draft)),
            _ => None,
        }
    }

    /// Escape: drop the draft, returning the name to show again
    pub fn cancel(&mut self) -> Option<String> {
        match std::mem::take(self) {
            NameEdit::Editing { original, .. } => Some(original),
            _ => None,
        }
    }
}
