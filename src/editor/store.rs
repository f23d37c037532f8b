//! # Scene Object Store
//!
//! Fixed-capacity, ordered collection of [`SceneObject`]s plus the selection
//! state the rest of the editor works against. The store owns the structural
//! invariants:
//!
//! - `count <= capacity`, and `current`/`tool_target`, when set, are `< count`
//! - the first four slots (ground plane + three light proxies) are reserved
//!   and survive every structural mutation
//! - removal is stable: the relative order of surviving objects never changes
//!
//! Everything here is plain in-memory data mutated from the single event
//! loop thread; there is no locking and no GPU state.

use cgmath::{Vector2, Vector3, Vector4};
use log::debug;
use rand::Rng;

use crate::assets::CatalogInfo;

use super::{error::EditorError, object::SceneObject};

/// Maximum number of objects a scene can hold.
pub const MAX_OBJECTS: usize = 1024;

/// Ground plane plus three light proxies; never deleted or duplicated away.
pub const RESERVED_SLOTS: usize = 4;

/// Ordered scene-object storage with selection and tool-target tracking.
pub struct SceneStore {
    objects: Vec<SceneObject>,
    current: Option<usize>,
    tool_target: Option<usize>,
    catalog: CatalogInfo,
    rng: rand::rngs::ThreadRng,
}

impl SceneStore {
    /// Creates an empty store bound to the given catalogs.
    pub fn new(catalog: CatalogInfo) -> Self {
        Self {
            objects: Vec::with_capacity(MAX_OBJECTS.min(64)),
            current: None,
            tool_target: None,
            catalog,
            rng: rand::rng(),
        }
    }

    /// Number of live objects.
    pub fn count(&self) -> usize {
        self.objects.len()
    }

    /// The live objects, in store order, for the renderer to iterate.
    pub fn live(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, index: usize) -> Option<&SceneObject> {
        self.objects.get(index)
    }

    pub fn object_mut(&mut self, index: usize) -> Option<&mut SceneObject> {
        self.objects.get_mut(index)
    }

    /// The current selection, if any.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// The object an active tool mutates. Diverges from `current` while a
    /// light-editing tool is installed.
    pub fn tool_target(&self) -> Option<usize> {
        self.tool_target
    }

    /// Redirects the tool target without touching the selection.
    pub fn set_tool_target(&mut self, index: usize) {
        if index < self.objects.len() {
            self.tool_target = Some(index);
        }
    }

    pub fn catalog(&self) -> &CatalogInfo {
        &self.catalog
    }

    /// Appends a new object with editing defaults and selects it.
    ///
    /// The object lands at `count` with its position taken from the
    /// ground-plane point currently under the pointer, a small default scale
    /// (full scale for the ground and light-proxy meshes), neutral gray
    /// colour, default material coefficients, a 180 degree yaw, and a
    /// uniformly random texture. Both the selection and the tool target move
    /// to the new object.
    pub fn add_object(
        &mut self,
        mesh_id: usize,
        ground_point: Vector2<f32>,
    ) -> Result<usize, EditorError> {
        if mesh_id >= self.catalog.num_meshes {
            return Err(EditorError::InvalidMeshId {
                id: mesh_id,
                count: self.catalog.num_meshes,
            });
        }
        if self.objects.len() == MAX_OBJECTS {
            return Err(EditorError::SceneFull {
                capacity: MAX_OBJECTS,
            });
        }

        let full_size = mesh_id == self.catalog.ground_mesh || mesh_id == self.catalog.light_mesh;
        let tex_id = self.rng.random_range(0..self.catalog.num_textures);

        self.objects.push(SceneObject {
            position: Vector4::new(ground_point.x, 0.0, ground_point.y, 1.0),
            scale: if full_size { 1.0 } else { 0.005 },
            angles: [0.0, 180.0, 0.0],
            diffuse: 1.0,
            specular: 0.5,
            ambient: 0.7,
            shine: 10.0,
            rgb: Vector3::new(0.7, 0.7, 0.7),
            brightness: 1.0,
            mesh_id,
            tex_id,
            tex_scale: 1.0,
        });

        let index = self.objects.len() - 1;
        self.current = Some(index);
        self.tool_target = Some(index);
        debug!("added object {index} (mesh {mesh_id}, tex {tex_id})");
        Ok(index)
    }

    /// Copies object `source` into a fresh slot and selects the copy.
    ///
    /// Silently a no-op while only reserved objects exist. The copy is an
    /// exact attribute duplicate of the source at call time; none of
    /// `add_object`'s randomised or pointer-derived defaults survive.
    pub fn duplicate_object(
        &mut self,
        source: usize,
        ground_point: Vector2<f32>,
    ) -> Result<Option<usize>, EditorError> {
        if self.objects.len() <= RESERVED_SLOTS {
            return Ok(None);
        }
        let Some(&src) = self.objects.get(source) else {
            return Ok(None);
        };

        let index = self.add_object(src.mesh_id, ground_point)?;
        self.objects[index] = src;
        debug!("duplicated object {source} into slot {index}");
        Ok(Some(index))
    }

    /// Stably removes object `index`, keeping every other object in order.
    ///
    /// Silently a no-op while only reserved objects exist, and for any index
    /// into the reserved range. Deleting the last live object moves the
    /// selection back one slot; deleting from the middle shifts everything
    /// above it down and leaves the selection index pointing at the
    /// successor.
    pub fn delete_object(&mut self, index: usize) {
        if self.objects.len() <= RESERVED_SLOTS {
            return;
        }
        if index < RESERVED_SLOTS || index >= self.objects.len() {
            return;
        }

        if index == self.objects.len() - 1 {
            self.objects.pop();
            self.current = Some(index - 1);
        } else {
            self.objects.remove(index);
        }
        if let Some(current) = self.current {
            let current = current.min(self.objects.len() - 1);
            self.current = Some(current);
            self.tool_target = Some(current);
        }
        debug!("deleted object {index}, {} remain", self.objects.len());
    }

    /// Moves the selection to the previous object, never into the reserved
    /// slots.
    pub fn select_previous(&mut self) {
        if let Some(current) = self.current {
            if current > RESERVED_SLOTS {
                self.current = Some(current - 1);
            }
        }
    }

    /// Moves the selection to the next object, never past the last one.
    pub fn select_next(&mut self) {
        if let Some(current) = self.current {
            if current + 1 < self.objects.len() {
                self.current = Some(current + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CatalogInfo {
        CatalogInfo {
            num_meshes: 8,
            num_textures: 6,
            ground_mesh: 0,
            light_mesh: 1,
        }
    }

    fn seeded_store() -> SceneStore {
        // Ground, three lights, one test mesh - the startup shape.
        let mut store = SceneStore::new(catalog());
        store.add_object(0, Vector2::new(0.0, 0.0)).unwrap();
        for _ in 0..3 {
            store.add_object(1, Vector2::new(0.0, 0.0)).unwrap();
        }
        store.add_object(3, Vector2::new(1.0, 2.0)).unwrap();
        store
    }

    #[test]
    fn add_increments_count_and_stays_in_catalog_bounds() {
        let mut store = SceneStore::new(catalog());
        for i in 0..10 {
            assert_eq!(store.count(), i);
            let index = store.add_object(3, Vector2::new(0.5, -0.5)).unwrap();
            assert_eq!(index, i);
            assert_eq!(store.count(), i + 1);
            let obj = store.object(index).unwrap();
            assert!(obj.mesh_id < store.catalog().num_meshes);
            assert!(obj.tex_id < store.catalog().num_textures);
            assert_eq!(store.current(), Some(index));
            assert_eq!(store.tool_target(), Some(index));
        }
    }

    #[test]
    fn add_defaults_follow_mesh_kind() {
        let mut store = SceneStore::new(catalog());
        let ground = store.add_object(0, Vector2::new(0.0, 0.0)).unwrap();
        assert_eq!(store.object(ground).unwrap().scale, 1.0);
        let light = store.add_object(1, Vector2::new(0.0, 0.0)).unwrap();
        assert_eq!(store.object(light).unwrap().scale, 1.0);

        let prop = store.add_object(4, Vector2::new(3.0, -2.0)).unwrap();
        let obj = store.object(prop).unwrap();
        assert_eq!(obj.scale, 0.005);
        assert_eq!(obj.position, Vector4::new(3.0, 0.0, -2.0, 1.0));
        assert_eq!(obj.angles, [0.0, 180.0, 0.0]);
        assert_eq!(obj.rgb, Vector3::new(0.7, 0.7, 0.7));
        assert_eq!(obj.brightness, 1.0);
        assert_eq!(
            (obj.diffuse, obj.specular, obj.ambient, obj.shine),
            (1.0, 0.5, 0.7, 10.0)
        );
    }

    #[test]
    fn add_rejects_invalid_mesh() {
        let mut store = SceneStore::new(catalog());
        let err = store.add_object(99, Vector2::new(0.0, 0.0)).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn add_refuses_at_capacity_without_corruption() {
        let mut store = SceneStore::new(CatalogInfo {
            num_meshes: 2,
            num_textures: 1,
            ground_mesh: 0,
            light_mesh: 1,
        });
        for _ in 0..MAX_OBJECTS {
            store.add_object(1, Vector2::new(0.0, 0.0)).unwrap();
        }
        let err = store.add_object(1, Vector2::new(0.0, 0.0)).unwrap_err();
        assert_eq!(
            err,
            EditorError::SceneFull {
                capacity: MAX_OBJECTS
            }
        );
        assert_eq!(store.count(), MAX_OBJECTS);
        assert_eq!(store.current(), Some(MAX_OBJECTS - 1));
    }

    #[test]
    fn delete_last_object_steps_selection_back() {
        // Scenario from the spec of the delete operation: 4 reserved + 1.
        let mut store = seeded_store();
        assert_eq!(store.count(), 5);
        let reserved: Vec<_> = store.live()[..4].to_vec();

        store.delete_object(4);

        assert_eq!(store.count(), 4);
        assert_eq!(store.current(), Some(3));
        assert_eq!(&store.live()[..4], &reserved[..]);
    }

    #[test]
    fn delete_preserves_relative_order() {
        let mut store = seeded_store();
        for mesh in [2, 3, 4, 5] {
            store.add_object(mesh, Vector2::new(0.0, 0.0)).unwrap();
        }
        let before: Vec<usize> = store.live().iter().map(|o| o.mesh_id).collect();

        store.delete_object(5);

        let after: Vec<usize> = store.live().iter().map(|o| o.mesh_id).collect();
        let mut expected = before.clone();
        expected.remove(5);
        assert_eq!(after, expected);
        assert_eq!(store.count(), before.len() - 1);
    }

    #[test]
    fn delete_and_duplicate_are_noops_on_reserved_scene() {
        let mut store = SceneStore::new(catalog());
        store.add_object(0, Vector2::new(0.0, 0.0)).unwrap();
        for _ in 0..3 {
            store.add_object(1, Vector2::new(0.0, 0.0)).unwrap();
        }
        let before: Vec<_> = store.live().to_vec();
        let current = store.current();

        store.delete_object(3);
        assert_eq!(store.live(), &before[..]);
        assert_eq!(store.current(), current);

        let copied = store.duplicate_object(3, Vector2::new(0.0, 0.0)).unwrap();
        assert_eq!(copied, None);
        assert_eq!(store.live(), &before[..]);
    }

    #[test]
    fn delete_never_removes_reserved_slots() {
        let mut store = seeded_store();
        let reserved: Vec<_> = store.live()[..4].to_vec();
        store.delete_object(0);
        store.delete_object(3);
        assert_eq!(store.count(), 5);
        assert_eq!(&store.live()[..4], &reserved[..]);
    }

    #[test]
    fn duplicate_copies_every_attribute() {
        let mut store = seeded_store();
        {
            let obj = store.object_mut(4).unwrap();
            obj.scale = 0.005;
            obj.rgb = Vector3::new(0.7, 0.7, 0.7);
            obj.brightness = 1.0;
            obj.angles = [15.0, 200.0, -30.0];
            obj.ambient = 0.25;
            obj.shine = 42.0;
            obj.tex_scale = 3.0;
        }
        let src = *store.object(4).unwrap();

        let index = store
            .duplicate_object(4, Vector2::new(9.0, 9.0))
            .unwrap()
            .unwrap();

        assert_eq!(index, 5);
        assert_eq!(store.count(), 6);
        assert_eq!(*store.object(5).unwrap(), src);
        assert_eq!(store.current(), Some(5));
    }

    #[test]
    fn selection_navigation_respects_bounds() {
        let mut store = seeded_store();
        store.add_object(2, Vector2::new(0.0, 0.0)).unwrap();
        assert_eq!(store.current(), Some(5));

        store.select_next();
        assert_eq!(store.current(), Some(5));

        store.select_previous();
        assert_eq!(store.current(), Some(4));
        store.select_previous();
        assert_eq!(store.current(), Some(4));

        store.select_next();
        assert_eq!(store.current(), Some(5));
    }
}
