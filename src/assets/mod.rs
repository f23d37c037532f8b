//! # Asset Catalogs
//!
//! Fixed mesh and texture catalogs resolved once at startup and referenced
//! by integer id everywhere else. An optional asset directory supplies OBJ
//! meshes (via `tobj`) and image textures (via `image`); without one the
//! catalogs are procedurally generated so the editor always starts.
//!
//! Catalog layout is fixed: mesh 0 is the ground square, mesh 1 the
//! light-proxy sphere, texture 0 is plain white. Everything after that is
//! whatever the directory (or the generators) provided, in sorted order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::gfx::geometry::{
    self, generate_cone, generate_cube, generate_cylinder, generate_sphere, generate_square,
    GeometryData,
};
use crate::gfx::vertex::Vertex3D;

/// Catalog sizes and the well-known mesh ids the editor core needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogInfo {
    pub num_meshes: usize,
    pub num_textures: usize,
    /// Mesh id of the ground square.
    pub ground_mesh: usize,
    /// Mesh id of the light-proxy sphere.
    pub light_mesh: usize,
}

/// One catalog mesh: a display name and CPU-side geometry.
#[derive(Debug, Clone)]
pub struct MeshAsset {
    pub name: String,
    pub geometry: GeometryData,
}

/// One catalog texture: RGBA8 pixels plus dimensions.
#[derive(Debug, Clone)]
pub struct TextureAsset {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// The resolved catalogs. Immutable after startup.
pub struct AssetLibrary {
    meshes: Vec<MeshAsset>,
    textures: Vec<TextureAsset>,
}

impl AssetLibrary {
    /// Builds the catalogs, pulling extra meshes and textures from `dir`
    /// when one is supplied. Unreadable files are skipped with a warning; an
    /// empty or missing directory falls back to the procedural sets.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let mut meshes = vec![
            MeshAsset {
                name: "Ground".into(),
                geometry: generate_square(),
            },
            MeshAsset {
                name: "Sphere".into(),
                geometry: generate_sphere(32, 24),
            },
        ];
        let mut textures = vec![plain_texture()];

        if let Some(dir) = dir {
            meshes.extend(load_obj_meshes(dir)?);
            textures.extend(load_image_textures(dir)?);
        }

        // Guarantee a usable spread even with a sparse directory.
        if meshes.len() == 2 {
            meshes.extend(procedural_meshes());
        }
        if textures.len() == 1 {
            textures.extend(procedural_textures());
        }

        info!(
            "asset catalogs ready: {} meshes, {} textures",
            meshes.len(),
            textures.len()
        );
        Ok(Self { meshes, textures })
    }

    pub fn catalog_info(&self) -> CatalogInfo {
        CatalogInfo {
            num_meshes: self.meshes.len(),
            num_textures: self.textures.len(),
            ground_mesh: 0,
            light_mesh: 1,
        }
    }

    pub fn mesh(&self, id: usize) -> Option<&MeshAsset> {
        self.meshes.get(id)
    }

    pub fn texture(&self, id: usize) -> Option<&TextureAsset> {
        self.textures.get(id)
    }

    pub fn mesh_names(&self) -> impl Iterator<Item = &str> {
        self.meshes.iter().map(|m| m.name.as_str())
    }

    pub fn texture_names(&self) -> impl Iterator<Item = &str> {
        self.textures.iter().map(|t| t.name.as_str())
    }
}

/// Picks the asset directory: the explicit argument wins, then the first
/// existing default candidate, then none (procedural catalogs).
pub fn resolve_asset_dir(arg: Option<String>) -> Option<PathBuf> {
    if let Some(arg) = arg {
        return Some(PathBuf::from(arg));
    }
    ["assets", "res/models-textures", "/tmp/models-textures"]
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.is_dir())
}

fn load_obj_meshes(dir: &Path) -> Result<Vec<MeshAsset>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading asset directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "obj"))
        .collect();
    paths.sort();

    let mut meshes = Vec::new();
    for path in paths {
        match load_obj(&path) {
            Ok(geometry) => {
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "mesh".into());
                meshes.push(MeshAsset { name, geometry });
            }
            Err(err) => warn!("skipping {}: {err:#}", path.display()),
        }
    }
    Ok(meshes)
}

fn load_obj(path: &Path) -> Result<GeometryData> {
    let (models, _) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("loading OBJ {}", path.display()))?;

    let mut data = GeometryData::default();
    for model in &models {
        let mesh = &model.mesh;
        let base = data.vertices.len() as u32;
        let count = mesh.positions.len() / 3;

        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals.clone()
        } else {
            averaged_normals(&mesh.positions, &mesh.indices)
        };

        for i in 0..count {
            let tex_coord = if mesh.texcoords.len() >= (i + 1) * 2 {
                [mesh.texcoords[i * 2], mesh.texcoords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };
            data.vertices.push(Vertex3D {
                position: [
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ],
                normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
                tex_coord,
            });
        }
        data.indices.extend(mesh.indices.iter().map(|i| i + base));
    }
    Ok(data)
}

/// Area-weighted vertex normals for OBJ files that ship without them.
fn averaged_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let mut normals = vec![0.0f32; positions.len()];

    for triangle in indices.chunks(3) {
        let [i0, i1, i2] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        let p = |i: usize| [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]];
        let (v0, v1, v2) = (p(i0), p(i1), p(i2));
        let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
        let face = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];
        for &i in &[i0, i1, i2] {
            normals[i * 3] += face[0];
            normals[i * 3 + 1] += face[1];
            normals[i * 3 + 2] += face[2];
        }
    }

    for normal in normals.chunks_mut(3) {
        let len = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
        if len > 0.0 {
            normal[0] /= len;
            normal[1] /= len;
            normal[2] /= len;
        }
    }
    normals
}

fn load_image_textures(dir: &Path) -> Result<Vec<TextureAsset>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading asset directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| matches!(ext, "png" | "jpg" | "jpeg" | "bmp" | "tga"))
        })
        .collect();
    paths.sort();

    let mut textures = Vec::new();
    for path in paths {
        match image::open(&path) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                let (width, height) = rgba.dimensions();
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "texture".into());
                textures.push(TextureAsset {
                    name,
                    width,
                    height,
                    rgba: rgba.into_raw(),
                });
            }
            Err(err) => warn!("skipping {}: {err}", path.display()),
        }
    }
    Ok(textures)
}

fn procedural_meshes() -> Vec<MeshAsset> {
    vec![
        MeshAsset {
            name: "Cube".into(),
            geometry: generate_cube(),
        },
        MeshAsset {
            name: "Cylinder".into(),
            geometry: generate_cylinder(32),
        },
        MeshAsset {
            name: "Cone".into(),
            geometry: generate_cone(32),
        },
        MeshAsset {
            name: "Ball".into(),
            geometry: geometry::generate_sphere(16, 12),
        },
    ]
}

const TEX_SIZE: u32 = 64;

fn plain_texture() -> TextureAsset {
    generated_texture("Plain", |_, _| [255, 255, 255])
}

fn procedural_textures() -> Vec<TextureAsset> {
    vec![
        generated_texture("Checker", |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                [230, 230, 230]
            } else {
                [60, 60, 60]
            }
        }),
        generated_texture("Stripes", |x, _| {
            if x / 8 % 2 == 0 {
                [200, 80, 80]
            } else {
                [240, 220, 200]
            }
        }),
        generated_texture("Dots", |x, y| {
            let (dx, dy) = (x as i32 % 16 - 8, y as i32 % 16 - 8);
            if dx * dx + dy * dy < 16 {
                [40, 90, 180]
            } else {
                [225, 225, 210]
            }
        }),
        generated_texture("Gradient", |x, y| {
            [(x * 4) as u8, (y * 4) as u8, 160]
        }),
        generated_texture("Grid", |x, y| {
            if x % 16 == 0 || y % 16 == 0 {
                [30, 30, 30]
            } else {
                [190, 210, 190]
            }
        }),
    ]
}

fn generated_texture(name: &str, pixel: impl Fn(u32, u32) -> [u8; 3]) -> TextureAsset {
    let mut rgba = Vec::with_capacity((TEX_SIZE * TEX_SIZE * 4) as usize);
    for y in 0..TEX_SIZE {
        for x in 0..TEX_SIZE {
            let [r, g, b] = pixel(x, y);
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }
    TextureAsset {
        name: name.into(),
        width: TEX_SIZE,
        height: TEX_SIZE,
        rgba,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_library_has_fixed_layout() {
        let library = AssetLibrary::load(None).unwrap();
        let info = library.catalog_info();
        assert_eq!(info.ground_mesh, 0);
        assert_eq!(info.light_mesh, 1);
        assert!(info.num_meshes >= 4);
        assert!(info.num_textures >= 2);
        assert_eq!(library.mesh(0).unwrap().name, "Ground");
        assert_eq!(library.mesh(1).unwrap().name, "Sphere");
        assert_eq!(library.texture(0).unwrap().name, "Plain");
    }

    #[test]
    fn generated_textures_are_rgba8() {
        let library = AssetLibrary::load(None).unwrap();
        for id in 0..library.catalog_info().num_textures {
            let tex = library.texture(id).unwrap();
            assert_eq!(tex.rgba.len() as u32, tex.width * tex.height * 4);
        }
    }

    #[test]
    fn out_of_range_lookups_return_none() {
        let library = AssetLibrary::load(None).unwrap();
        let info = library.catalog_info();
        assert!(library.mesh(info.num_meshes).is_none());
        assert!(library.texture(info.num_textures).is_none());
    }
}
