use glam::{Mat4, Vec3};
use pivot_core::{NodeHandle, PivotError, Result};

/// Below this the view basis is considered degenerate.
const DEGENERATE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        fov_y_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        /// Half of the visible height in world units.
        half_height: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    #[must_use]
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::Perspective {
            fov_y_degrees,
            aspect,
            near,
            far,
        }
    }

    #[must_use]
    pub fn orthographic(half_height: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::Orthographic {
            half_height,
            aspect,
            near,
            far,
        }
    }

    #[inline]
    #[must_use]
    pub fn near(&self) -> f32 {
        match *self {
            Self::Perspective { near, .. } | Self::Orthographic { near, .. } => near,
        }
    }

    #[inline]
    #[must_use]
    pub fn far(&self) -> f32 {
        match *self {
            Self::Perspective { far, .. } | Self::Orthographic { far, .. } => far,
        }
    }

    #[inline]
    #[must_use]
    pub fn aspect(&self) -> f32 {
        match *self {
            Self::Perspective { aspect, .. } | Self::Orthographic { aspect, .. } => aspect,
        }
    }

    /// Returns a copy with a different aspect ratio.
    #[must_use]
    pub fn with_aspect(mut self, new_aspect: f32) -> Self {
        match &mut self {
            Self::Perspective { aspect, .. } | Self::Orthographic { aspect, .. } => {
                *aspect = new_aspect;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let (near, far, aspect) = (self.near(), self.far(), self.aspect());
        if !(near > 0.0 && far > near) {
            return Err(PivotError::InvalidProjection(format!(
                "clip range must satisfy 0 < near < far, got near={near} far={far}"
            )));
        }
        if !(aspect > 0.0 && aspect.is_finite()) {
            return Err(PivotError::InvalidProjection(format!(
                "aspect must be positive, got {aspect}"
            )));
        }
        match *self {
            Self::Perspective { fov_y_degrees, .. }
                if !(fov_y_degrees > 0.0 && fov_y_degrees < 180.0) =>
            {
                Err(PivotError::InvalidProjection(format!(
                    "vertical fov must lie in (0, 180), got {fov_y_degrees}"
                )))
            }
            Self::Orthographic { half_height, .. } if half_height <= 0.0 => {
                Err(PivotError::InvalidProjection(format!(
                    "orthographic half height must be positive, got {half_height}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Right-handed projection with a `[0, 1]` depth range.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Self::Perspective {
                fov_y_degrees,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, near, far),
            Self::Orthographic {
                half_height,
                aspect,
                near,
                far,
            } => {
                let w = half_height * aspect;
                Mat4::orthographic_rh(-w, w, -half_height, half_height, near, far)
            }
        }
    }
}

/// Builds a right-handed view matrix, or `None` when `eye`, `target` and
/// `up` do not span a basis.
#[must_use]
pub fn look_at_view(eye: Vec3, target: Vec3, up: Vec3) -> Option<Mat4> {
    let forward = target - eye;
    if forward.length_squared() < DEGENERATE_EPSILON
        || forward.normalize().cross(up).length_squared() < DEGENERATE_EPSILON
    {
        return None;
    }
    Some(Mat4::look_at_rh(eye, target, up))
}

/// Camera-specific state carried by a camera node.
///
/// The owning node's world matrix is always the inverse of
/// [`view_matrix`](Self::view_matrix).
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub(crate) target: Vec3,
    pub(crate) up: Vec3,
    pub(crate) projection: Projection,
    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
}

impl CameraState {
    pub(crate) fn new(eye: Vec3, target: Vec3, up: Vec3, projection: Projection) -> Result<Self> {
        projection.validate()?;
        let up = up.try_normalize().ok_or(PivotError::DegenerateCamera)?;
        let view_matrix = look_at_view(eye, target, up).ok_or(PivotError::DegenerateCamera)?;

        Ok(Self {
            target,
            up,
            projection,
            view_matrix,
            projection_matrix: projection.matrix(),
        })
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    #[inline]
    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    #[inline]
    #[must_use]
    pub fn near_clip(&self) -> f32 {
        self.projection.near()
    }

    #[inline]
    #[must_use]
    pub fn far_clip(&self) -> f32 {
        self.projection.far()
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    pub(crate) fn set_projection(&mut self, projection: Projection) -> Result<()> {
        projection.validate()?;
        self.projection = projection;
        self.projection_matrix = projection.matrix();
        Ok(())
    }
}

/// Notifications for the render side, drained from the scene once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraEvent {
    ViewMatrixChanged { camera: NodeHandle, view: Mat4 },
    ProjectionMatrixChanged { camera: NodeHandle, projection: Mat4 },
}
