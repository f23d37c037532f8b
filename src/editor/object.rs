//! # Scene Object Data
//!
//! This module defines the per-instance record for every object placed in the
//! scene: transform, material coefficients, colour, and catalog references.
//! Objects are plain data; all invariant-preserving mutation happens in the
//! store and the tool engine.

use cgmath::{Deg, Matrix4, Vector3, Vector4};

/// One placed mesh instance and everything needed to draw it.
///
/// Positions are homogeneous (w = 1). Rotation angles are in degrees and are
/// applied X, then Y, then Z. Colour channels and material coefficients are
/// nominally in unit range but unclamped; the only enforced
/// floor is brightness >= 0, checked in the tool engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    /// World position, homogeneous coordinates [x, y, z, 1].
    pub position: Vector4<f32>,
    /// Uniform scale factor. Conceptually positive; not enforced.
    pub scale: f32,
    /// Rotations around the X, Y and Z axes, in degrees.
    pub angles: [f32; 3],
    /// Diffuse reflection coefficient.
    pub diffuse: f32,
    /// Specular reflection coefficient.
    pub specular: f32,
    /// Ambient reflection coefficient.
    pub ambient: f32,
    /// Specular exponent.
    pub shine: f32,
    /// Base colour, RGB.
    pub rgb: Vector3<f32>,
    /// Multiplies all colour channels when lit.
    pub brightness: f32,
    /// Index into the mesh catalog.
    pub mesh_id: usize,
    /// Index into the texture catalog.
    pub tex_id: usize,
    /// Texture-coordinate scale factor (texture repeats per unit).
    pub tex_scale: f32,
}

impl SceneObject {
    /// Model matrix: translation, then uniform scale, then X/Y/Z rotation.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let rotate = Matrix4::from_angle_x(Deg(self.angles[0]))
            * Matrix4::from_angle_y(Deg(self.angles[1]))
            * Matrix4::from_angle_z(Deg(self.angles[2]));
        Matrix4::from_translation(self.position.truncate()) * Matrix4::from_scale(self.scale)
            * rotate
    }

    /// Lit colour shared by all lighting products: `rgb * brightness * 2`.
    pub fn lit_rgb(&self) -> Vector3<f32> {
        self.rgb * self.brightness * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lit_rgb_scales_with_brightness() {
        let obj = SceneObject {
            position: Vector4::new(0.0, 0.0, 0.0, 1.0),
            scale: 1.0,
            angles: [0.0; 3],
            diffuse: 1.0,
            specular: 0.5,
            ambient: 0.7,
            shine: 10.0,
            rgb: Vector3::new(0.5, 0.25, 1.0),
            brightness: 0.5,
            mesh_id: 0,
            tex_id: 0,
            tex_scale: 1.0,
        };
        assert_eq!(obj.lit_rgb(), Vector3::new(0.5, 0.25, 1.0));
    }
}
