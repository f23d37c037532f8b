//! # Tool Binding Engine
//!
//! Translates 2D pointer-delta samples into semantic attribute edits without
//! knowing what is being edited. A tool binding is pure data: two axis
//! records, each naming a mutation target, an attribute pair and a 2x2
//! transform that rescales a raw window-fraction pointer delta into that
//! pair's units. Per motion sample both axes fire, primary first.
//!
//! At most one binding exists at a time; installing a new one silently
//! replaces the old. The binding survives button release (the next press
//! re-engages it) but deltas only apply while a drag is engaged. The engine
//! is the one place attribute floors are enforced - today that is only the
//! brightness floor.

use cgmath::{Matrix2, Vector2};

use super::{camera::OrbitCamera, object::SceneObject, store::SceneStore};

/// What a bound axis mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolTarget {
    /// The orbit camera.
    Camera,
    /// The object that was selected when the tool was installed.
    Object(usize),
    /// A specific light slot (1..=3), independent of the selection.
    Light(usize),
}

/// Fixed enumeration of attribute pairs a drag axis can address.
///
/// The first semantic component maps to the transformed delta's x, the
/// second to its y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributePair {
    /// Position X and Z (ground-plane move).
    PositionXz,
    /// Uniform scale and position Y.
    ScaleHeight,
    /// Red and green colour channels.
    RedGreen,
    /// Blue colour channel and brightness.
    BlueBrightness,
    /// Ambient and diffuse coefficients.
    AmbientDiffuse,
    /// Specular coefficient and shininess.
    SpecularShine,
    /// Brightness and position Y, gated by the brightness floor: if the
    /// brightness half would go negative, both halves are skipped.
    BrightnessHeight,
    /// Y then X rotation angles.
    SpinYx,
    /// Z rotation angle and texture-coordinate scale.
    SpinZTexScale,
    /// Camera sideways angle and camera distance.
    CameraSpinZoom,
    /// Camera sideways and up-and-over angles.
    CameraSpinTilt,
}

/// One axis of a tool: a target, an attribute pair, and the linear transform
/// from raw pointer deltas into the pair's units.
#[derive(Debug, Clone, Copy)]
pub struct AxisBinding {
    pub target: ToolTarget,
    pub pair: AttributePair,
    pub transform: Matrix2<f32>,
}

impl AxisBinding {
    pub fn new(target: ToolTarget, pair: AttributePair, transform: Matrix2<f32>) -> Self {
        Self {
            target,
            pair,
            transform,
        }
    }
}

/// The at-most-one-active pair of axis bindings.
#[derive(Debug, Clone, Copy)]
pub struct ToolBinding {
    pub primary: AxisBinding,
    pub secondary: AxisBinding,
}

/// Holds the installed binding and routes pointer deltas through it.
#[derive(Debug, Default)]
pub struct ToolEngine {
    binding: Option<ToolBinding>,
    engaged: bool,
}

impl ToolEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a binding, silently replacing any previous one. The new
    /// binding starts disengaged; the next press picks it up.
    pub fn install(&mut self, binding: ToolBinding) {
        self.binding = Some(binding);
    }

    /// Clears the binding entirely. Subsequent deltas are dropped until a
    /// new binding is installed.
    pub fn deactivate(&mut self) {
        self.binding = None;
        self.engaged = false;
    }

    /// Button down: start routing deltas through the installed binding.
    pub fn begin_drag(&mut self) {
        self.engaged = self.binding.is_some();
    }

    /// Button up: stop routing deltas, keep the binding for the next press.
    pub fn end_drag(&mut self) {
        self.engaged = false;
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Feeds one raw pointer-delta sample (window-fraction units) through
    /// both axes of the engaged binding. Returns true if anything applied.
    pub fn pointer_delta(
        &mut self,
        raw: Vector2<f32>,
        store: &mut SceneStore,
        camera: &mut OrbitCamera,
    ) -> bool {
        if !self.engaged {
            return false;
        }
        let Some(binding) = self.binding else {
            return false;
        };
        apply_axis(&binding.primary, raw, store, camera);
        apply_axis(&binding.secondary, raw, store, camera);
        true
    }
}

fn apply_axis(
    axis: &AxisBinding,
    raw: Vector2<f32>,
    store: &mut SceneStore,
    camera: &mut OrbitCamera,
) {
    let delta = axis.transform * raw;
    match axis.target {
        ToolTarget::Camera => apply_to_camera(axis.pair, delta, camera),
        ToolTarget::Object(index) | ToolTarget::Light(index) => {
            if let Some(object) = store.object_mut(index) {
                apply_to_object(axis.pair, delta, object);
            }
        }
    }
}

fn apply_to_camera(pair: AttributePair, delta: Vector2<f32>, camera: &mut OrbitCamera) {
    match pair {
        AttributePair::CameraSpinZoom => {
            camera.sideways_deg += delta.x;
            camera.distance += delta.y;
        }
        AttributePair::CameraSpinTilt => {
            camera.sideways_deg += delta.x;
            camera.up_and_over_deg += delta.y;
        }
        // Object pairs bound to the camera have nothing to mutate.
        _ => {}
    }
}

fn apply_to_object(pair: AttributePair, delta: Vector2<f32>, object: &mut SceneObject) {
    match pair {
        AttributePair::PositionXz => {
            object.position.x += delta.x;
            object.position.z += delta.y;
        }
        AttributePair::ScaleHeight => {
            object.scale += delta.x;
            object.position.y += delta.y;
        }
        AttributePair::RedGreen => {
            object.rgb.x += delta.x;
            object.rgb.y += delta.y;
        }
        AttributePair::BlueBrightness => {
            object.rgb.z += delta.x;
            object.brightness += delta.y;
        }
        AttributePair::AmbientDiffuse => {
            object.ambient += delta.x;
            object.diffuse += delta.y;
        }
        AttributePair::SpecularShine => {
            object.specular += delta.x;
            object.shine += delta.y;
        }
        AttributePair::BrightnessHeight => {
            // Both halves land together or not at all.
            if object.brightness + delta.x >= 0.0 {
                object.brightness += delta.x;
                object.position.y += delta.y;
            }
        }
        AttributePair::SpinYx => {
            object.angles[1] += delta.x;
            object.angles[0] += delta.y;
        }
        AttributePair::SpinZTexScale => {
            object.angles[2] += delta.x;
            object.tex_scale += delta.y;
        }
        AttributePair::CameraSpinZoom | AttributePair::CameraSpinTilt => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::CatalogInfo;

    fn store_with_one_object() -> SceneStore {
        let mut store = SceneStore::new(CatalogInfo {
            num_meshes: 4,
            num_textures: 2,
            ground_mesh: 0,
            light_mesh: 1,
        });
        store.add_object(2, Vector2::new(0.0, 0.0)).unwrap();
        store
    }

    fn identity_axis(target: ToolTarget, pair: AttributePair) -> AxisBinding {
        AxisBinding::new(target, pair, Matrix2::new(1.0, 0.0, 0.0, 1.0))
    }

    fn engaged_engine(binding: ToolBinding) -> ToolEngine {
        let mut engine = ToolEngine::new();
        engine.install(binding);
        engine.begin_drag();
        engine
    }

    #[test]
    fn deltas_are_dropped_without_a_binding() {
        let mut engine = ToolEngine::new();
        let mut store = store_with_one_object();
        let mut camera = OrbitCamera::new(100, 100);
        engine.begin_drag();
        assert!(!engine.pointer_delta(Vector2::new(1.0, 1.0), &mut store, &mut camera));
    }

    #[test]
    fn deltas_are_dropped_after_release() {
        let mut store = store_with_one_object();
        let mut camera = OrbitCamera::new(100, 100);
        let axis = identity_axis(ToolTarget::Object(0), AttributePair::PositionXz);
        let mut engine = engaged_engine(ToolBinding {
            primary: axis,
            secondary: axis,
        });
        engine.end_drag();
        assert!(!engine.pointer_delta(Vector2::new(1.0, 0.0), &mut store, &mut camera));
        assert_eq!(store.object(0).unwrap().position.x, 0.0);
    }

    #[test]
    fn transform_rescales_before_application() {
        let mut store = store_with_one_object();
        let mut camera = OrbitCamera::new(100, 100);
        let mut engine = engaged_engine(ToolBinding {
            primary: AxisBinding::new(
                ToolTarget::Object(0),
                AttributePair::ScaleHeight,
                Matrix2::new(0.05, 0.0, 0.0, 10.0),
            ),
            secondary: identity_axis(ToolTarget::Camera, AttributePair::CameraSpinTilt),
        });

        engine.pointer_delta(Vector2::new(1.0, 0.5), &mut store, &mut camera);

        let obj = store.object(0).unwrap();
        assert!((obj.scale - (0.005 + 0.05)).abs() < 1e-6);
        assert!((obj.position.y - 5.0).abs() < 1e-6);
        // The secondary axis fired at the camera too.
        assert!((camera.sideways_deg - 1.0).abs() < 1e-6);
        assert!((camera.up_and_over_deg - 20.5).abs() < 1e-6);
    }

    #[test]
    fn brightness_floor_skips_both_halves() {
        let mut store = store_with_one_object();
        let mut camera = OrbitCamera::new(100, 100);
        let axis = identity_axis(ToolTarget::Object(0), AttributePair::BrightnessHeight);
        let mut engine = engaged_engine(ToolBinding {
            primary: axis,
            secondary: identity_axis(ToolTarget::Camera, AttributePair::CameraSpinZoom),
        });

        // Would drive brightness (1.0) to -0.5: both halves skipped.
        engine.pointer_delta(Vector2::new(-1.5, 2.0), &mut store, &mut camera);
        let obj = store.object(0).unwrap();
        assert_eq!(obj.brightness, 1.0);
        assert_eq!(obj.position.y, 0.0);

        // Keeps brightness at exactly the floor: both halves apply.
        engine.pointer_delta(Vector2::new(-1.0, 2.0), &mut store, &mut camera);
        let obj = store.object(0).unwrap();
        assert_eq!(obj.brightness, 0.0);
        assert_eq!(obj.position.y, 2.0);
    }

    #[test]
    fn installing_a_new_binding_discards_the_old_one() {
        let mut store = store_with_one_object();
        let mut camera = OrbitCamera::new(100, 100);
        let mut engine = engaged_engine(ToolBinding {
            primary: identity_axis(ToolTarget::Object(0), AttributePair::PositionXz),
            secondary: identity_axis(ToolTarget::Object(0), AttributePair::ScaleHeight),
        });

        engine.install(ToolBinding {
            primary: identity_axis(ToolTarget::Camera, AttributePair::CameraSpinZoom),
            secondary: identity_axis(ToolTarget::Camera, AttributePair::CameraSpinTilt),
        });
        engine.begin_drag();
        engine.pointer_delta(Vector2::new(2.0, 0.0), &mut store, &mut camera);

        // Only the newly bound camera moved; the object did not.
        let obj = store.object(0).unwrap();
        assert_eq!(obj.position.x, 0.0);
        assert_eq!(obj.scale, 0.005);
        assert!((camera.sideways_deg - 4.0).abs() < 1e-6);
    }

    #[test]
    fn deactivate_clears_the_binding() {
        let mut store = store_with_one_object();
        let mut camera = OrbitCamera::new(100, 100);
        let axis = identity_axis(ToolTarget::Object(0), AttributePair::PositionXz);
        let mut engine = engaged_engine(ToolBinding {
            primary: axis,
            secondary: axis,
        });

        engine.deactivate();
        engine.begin_drag();
        assert!(!engine.pointer_delta(Vector2::new(1.0, 0.0), &mut store, &mut camera));
        assert_eq!(store.object(0).unwrap().position.x, 0.0);
    }

    #[test]
    fn stale_object_target_is_ignored() {
        let mut store = store_with_one_object();
        let mut camera = OrbitCamera::new(100, 100);
        let axis = identity_axis(ToolTarget::Object(7), AttributePair::PositionXz);
        let mut engine = engaged_engine(ToolBinding {
            primary: axis,
            secondary: axis,
        });
        // Applies nothing but does not panic or corrupt state.
        assert!(engine.pointer_delta(Vector2::new(1.0, 1.0), &mut store, &mut camera));
        assert_eq!(store.count(), 1);
    }
}
