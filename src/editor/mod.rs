//! # Editor Core
//!
//! Everything with real invariants lives here, away from the GPU:
//!
//! - **Scene Object Store** ([`store`]) - fixed-capacity object collection
//!   with stable structural mutation and selection tracking
//! - **Camera Model** ([`camera`]) - orbit angles, distance, and the matrix
//!   derivation plus ground-plane unprojection
//! - **Tool Binding Engine** ([`tool`]) - generic pointer-delta to
//!   attribute-pair mapping
//! - **Command Dispatch** ([`command`]) - menu/key command decoding and the
//!   tool-selection state machine
//!
//! The [`EditorContext`] value ties them together and is owned by the event
//! loop; dispatch and the tool engine borrow it. Single-threaded by
//! construction - no operation blocks or suspends.

pub mod camera;
pub mod command;
pub mod error;
pub mod object;
pub mod store;
pub mod tool;

use cgmath::{Vector2, Vector4};
use log::info;
use rand::Rng;

use crate::assets::CatalogInfo;

pub use camera::OrbitCamera;
pub use command::{Command, DispatchOutcome, Menu};
pub use error::EditorError;
pub use object::SceneObject;
pub use store::{SceneStore, MAX_OBJECTS, RESERVED_SLOTS};
pub use tool::{AttributePair, AxisBinding, ToolBinding, ToolEngine, ToolTarget};

/// All mutable editor state, owned by the event loop and passed by reference
/// into dispatch and the tool engine.
pub struct EditorContext {
    pub store: SceneStore,
    pub camera: OrbitCamera,
    pub tools: ToolEngine,
    /// Ground-plane point under the pointer, refreshed on every pointer
    /// move; `add_object` places new objects here.
    pub pointer_ground: Vector2<f32>,
}

impl EditorContext {
    /// Creates the context and seeds the startup scene: the ground plane,
    /// three light proxies, one random test mesh, and the camera-rotate tool
    /// installed.
    pub fn new(catalog: CatalogInfo, width: u32, height: u32) -> Result<Self, EditorError> {
        let mut ctx = Self {
            store: SceneStore::new(catalog),
            camera: OrbitCamera::new(width, height),
            tools: ToolEngine::new(),
            pointer_ground: Vector2::new(0.0, 0.0),
        };
        ctx.seed_scene()?;
        command::dispatch(&mut ctx, Command::RotateCamera)?;
        Ok(ctx)
    }

    fn seed_scene(&mut self) -> Result<(), EditorError> {
        let catalog = *self.store.catalog();
        let origin = Vector2::new(0.0, 0.0);

        // Slot 0: the ground plane, laid flat and texture-repeated.
        self.store.add_object(catalog.ground_mesh, origin)?;
        {
            let ground = self.store.object_mut(0).unwrap();
            ground.position = Vector4::new(0.0, 0.0, 0.0, 1.0);
            ground.scale = 10.0;
            ground.angles[0] = 90.0;
            ground.tex_scale = 5.0;
        }

        // Slots 1-3: light proxies. Dim spheres with the plain texture; the
        // renderer multiplies their brightness up when lighting.
        let lights = [
            (Vector4::new(2.0, 1.0, 1.0, 1.0), 0.1, 0.0),
            (Vector4::new(2.0, 2.0, 2.0, 1.0), 0.2, 90.0),
            (Vector4::new(3.0, 3.0, 3.0, 1.0), 0.1, 90.0),
        ];
        for (slot, (position, scale, yaw)) in lights.into_iter().enumerate() {
            self.store.add_object(catalog.light_mesh, origin)?;
            let light = self.store.object_mut(slot + 1).unwrap();
            light.position = position;
            light.scale = scale;
            light.tex_id = 0;
            light.brightness = 0.2;
            light.angles[1] = yaw;
        }

        // One test mesh so the scene never starts empty.
        let mesh = rand::rng().random_range(0..catalog.num_meshes);
        self.store.add_object(mesh, origin)?;

        info!(
            "seeded scene: ground + 3 lights + test mesh {mesh} ({} objects)",
            self.store.count()
        );
        Ok(())
    }
}
