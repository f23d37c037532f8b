//! # Command Dispatch
//!
//! Menus and keys produce `(menu, integer id)` pairs; this module decodes
//! them into [`Command`]s and applies them against the [`EditorContext`].
//! The id space is fixed: an id the decoder does not know is a broken
//! dispatch table, reported as a fatal [`EditorError::UnknownCommand`].
//!
//! Every dispatch first deactivates the active tool binding, so at most one
//! binding is ever live, then either installs a named binding, mutates the
//! store structurally, or exits.

use cgmath::Matrix2;
use log::{info, warn};

use super::{
    error::EditorError,
    tool::{AttributePair, AxisBinding, ToolBinding, ToolTarget},
    EditorContext,
};

/// Which menu an integer command id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    Main,
    Object,
    Material,
    Texture,
    GroundTexture,
    Light,
}

// Main menu id space.
pub const MAIN_MOVE_SCALE: u32 = 41;
pub const MAIN_ROTATE_CAMERA: u32 = 50;
pub const MAIN_SPIN_TEX_SCALE: u32 = 55;
pub const MAIN_DELETE: u32 = 87;
pub const MAIN_DUPLICATE: u32 = 88;
pub const MAIN_EXIT: u32 = 99;

// Material menu id space.
pub const MATERIAL_TINT: u32 = 10;
pub const MATERIAL_SHADE: u32 = 20;

// Light menu id space: move ids end in 0, tint ids in 1, per light slot.
pub const LIGHT_MOVE_BASE: u32 = 60;
pub const LIGHT_TINT_BASE: u32 = 61;

/// A decoded editor command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Bind the pointer to camera rotation and zoom.
    RotateCamera,
    /// Bind the pointer to the current object's position and scale.
    MoveScale,
    /// Bind the pointer to the current object's rotation and texture scale.
    SpinTexScale,
    /// Bind the pointer to the current object's colour and brightness.
    TintObject,
    /// Bind the pointer to the current object's lighting coefficients.
    ShadeObject,
    /// Append a new object using the given mesh.
    AddObject(usize),
    /// Assign a texture to the current object.
    SetTexture(usize),
    /// Assign a texture to the ground plane.
    SetGroundTexture(usize),
    /// Bind the pointer to a light slot's position and brightness.
    MoveLight(usize),
    /// Bind the pointer to a light slot's colour and brightness.
    TintLight(usize),
    /// Delete the current object.
    DeleteObject,
    /// Duplicate the current object.
    DuplicateObject,
    /// Terminate the editor.
    Exit,
}

impl Command {
    /// Decodes a menu selection. The object and texture menus carry catalog
    /// indices directly; the rest use the fixed id tables above.
    pub fn from_menu(menu: Menu, id: u32) -> Result<Command, EditorError> {
        match menu {
            Menu::Main => match id {
                MAIN_MOVE_SCALE => Ok(Command::MoveScale),
                MAIN_ROTATE_CAMERA => Ok(Command::RotateCamera),
                MAIN_SPIN_TEX_SCALE => Ok(Command::SpinTexScale),
                MAIN_DELETE => Ok(Command::DeleteObject),
                MAIN_DUPLICATE => Ok(Command::DuplicateObject),
                MAIN_EXIT => Ok(Command::Exit),
                _ => Err(EditorError::UnknownCommand { menu, id }),
            },
            Menu::Material => match id {
                MATERIAL_TINT => Ok(Command::TintObject),
                MATERIAL_SHADE => Ok(Command::ShadeObject),
                _ => Err(EditorError::UnknownCommand { menu, id }),
            },
            Menu::Light => match id {
                70 => Ok(Command::MoveLight(1)),
                71..=74 => Ok(Command::TintLight(1)),
                80 => Ok(Command::MoveLight(2)),
                81..=84 => Ok(Command::TintLight(2)),
                90 => Ok(Command::MoveLight(3)),
                91..=94 => Ok(Command::TintLight(3)),
                _ => Err(EditorError::UnknownCommand { menu, id }),
            },
            Menu::Object => Ok(Command::AddObject(id as usize)),
            Menu::Texture => Ok(Command::SetTexture(id as usize)),
            Menu::GroundTexture => Ok(Command::SetGroundTexture(id as usize)),
        }
    }
}

/// What the event loop should do after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Keep running; the scene may have changed, redraw.
    Continue,
    /// Tear the process down cleanly.
    Exit,
}

/// Applies one command against the editor state.
///
/// Capacity exhaustion is refused with a warning and the editor carries on;
/// every other error is a contract violation the caller must treat as fatal.
pub fn dispatch(ctx: &mut EditorContext, command: Command) -> Result<DispatchOutcome, EditorError> {
    // A new intent always tears the previous binding down first.
    ctx.tools.deactivate();

    match command {
        Command::RotateCamera => {
            ctx.tools.install(camera_rotate_binding());
        }
        Command::MoveScale => {
            if let Some(current) = ctx.store.current() {
                ctx.store.set_tool_target(current);
                ctx.tools.install(move_scale_binding(ctx, current));
            }
        }
        Command::SpinTexScale => {
            if let Some(current) = ctx.store.current() {
                ctx.store.set_tool_target(current);
                ctx.tools.install(spin_binding(current));
            }
        }
        Command::TintObject => {
            if let Some(current) = ctx.store.current() {
                ctx.store.set_tool_target(current);
                ctx.tools.install(tint_binding(ToolTarget::Object(current)));
            }
        }
        Command::ShadeObject => {
            if let Some(current) = ctx.store.current() {
                ctx.store.set_tool_target(current);
                ctx.tools
                    .install(shade_binding(ToolTarget::Object(current)));
            }
        }
        Command::AddObject(mesh_id) => match ctx.store.add_object(mesh_id, ctx.pointer_ground) {
            Ok(index) => ctx.tools.install(move_scale_binding(ctx, index)),
            Err(err @ EditorError::SceneFull { .. }) => warn!("add refused: {err}"),
            Err(err) => return Err(err),
        },
        Command::SetTexture(tex_id) => {
            validate_texture(ctx, tex_id)?;
            if let Some(current) = ctx.store.current() {
                if let Some(object) = ctx.store.object_mut(current) {
                    object.tex_id = tex_id;
                }
            }
        }
        Command::SetGroundTexture(tex_id) => {
            validate_texture(ctx, tex_id)?;
            if let Some(ground) = ctx.store.object_mut(0) {
                ground.tex_id = tex_id;
            }
        }
        Command::MoveLight(slot) => {
            ctx.store.set_tool_target(slot);
            ctx.tools.install(light_move_binding(ctx, slot));
        }
        Command::TintLight(slot) => {
            ctx.store.set_tool_target(slot);
            ctx.tools.install(tint_binding(ToolTarget::Light(slot)));
        }
        Command::DeleteObject => {
            if let Some(current) = ctx.store.current() {
                ctx.store.delete_object(current);
            }
        }
        Command::DuplicateObject => {
            if let Some(current) = ctx.store.current() {
                match ctx.store.duplicate_object(current, ctx.pointer_ground) {
                    Ok(Some(index)) => ctx.tools.install(move_scale_binding(ctx, index)),
                    Ok(None) => {}
                    Err(err @ EditorError::SceneFull { .. }) => warn!("duplicate refused: {err}"),
                    Err(err) => return Err(err),
                }
            }
        }
        Command::Exit => {
            info!("exit requested");
            return Ok(DispatchOutcome::Exit);
        }
    }

    Ok(DispatchOutcome::Continue)
}

fn validate_texture(ctx: &EditorContext, tex_id: usize) -> Result<(), EditorError> {
    let count = ctx.store.catalog().num_textures;
    if tex_id >= count {
        return Err(EditorError::InvalidTextureId { id: tex_id, count });
    }
    Ok(())
}

fn identity() -> Matrix2<f32> {
    Matrix2::new(1.0, 0.0, 0.0, 1.0)
}

/// Sideways + zoom on one axis pair, sideways + tilt on the other. The
/// transforms turn window-fraction drags into degrees (and distance units).
fn camera_rotate_binding() -> ToolBinding {
    ToolBinding {
        primary: AxisBinding::new(
            ToolTarget::Camera,
            AttributePair::CameraSpinZoom,
            Matrix2::new(400.0, 0.0, 0.0, -2.0),
        ),
        secondary: AxisBinding::new(
            ToolTarget::Camera,
            AttributePair::CameraSpinTilt,
            Matrix2::new(400.0, 0.0, 0.0, -90.0),
        ),
    }
}

/// Ground-plane move (screen-aligned via the camera's drag frame) plus
/// scale/height.
fn move_scale_binding(ctx: &EditorContext, index: usize) -> ToolBinding {
    ToolBinding {
        primary: AxisBinding::new(
            ToolTarget::Object(index),
            AttributePair::PositionXz,
            ctx.camera.drag_frame(),
        ),
        secondary: AxisBinding::new(
            ToolTarget::Object(index),
            AttributePair::ScaleHeight,
            Matrix2::new(0.05, 0.0, 0.0, 10.0),
        ),
    }
}

fn spin_binding(index: usize) -> ToolBinding {
    ToolBinding {
        primary: AxisBinding::new(
            ToolTarget::Object(index),
            AttributePair::SpinYx,
            Matrix2::new(400.0, 0.0, 0.0, -400.0),
        ),
        secondary: AxisBinding::new(
            ToolTarget::Object(index),
            AttributePair::SpinZTexScale,
            Matrix2::new(400.0, 0.0, 0.0, 15.0),
        ),
    }
}

fn tint_binding(target: ToolTarget) -> ToolBinding {
    ToolBinding {
        primary: AxisBinding::new(target, AttributePair::RedGreen, identity()),
        secondary: AxisBinding::new(target, AttributePair::BlueBrightness, identity()),
    }
}

fn shade_binding(target: ToolTarget) -> ToolBinding {
    ToolBinding {
        primary: AxisBinding::new(target, AttributePair::AmbientDiffuse, identity()),
        secondary: AxisBinding::new(target, AttributePair::SpecularShine, identity()),
    }
}

/// Ground-plane move plus brightness/height, with the brightness floor
/// enforced by the engine.
fn light_move_binding(ctx: &EditorContext, slot: usize) -> ToolBinding {
    ToolBinding {
        primary: AxisBinding::new(
            ToolTarget::Light(slot),
            AttributePair::PositionXz,
            ctx.camera.drag_frame(),
        ),
        secondary: AxisBinding::new(
            ToolTarget::Light(slot),
            AttributePair::BrightnessHeight,
            Matrix2::new(1.0, 0.0, 0.0, 10.0),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::CatalogInfo;
    use cgmath::Vector2;

    fn context() -> EditorContext {
        EditorContext::new(
            CatalogInfo {
                num_meshes: 6,
                num_textures: 4,
                ground_mesh: 0,
                light_mesh: 1,
            },
            960,
            640,
        )
        .unwrap()
    }

    #[test]
    fn menu_decoding_covers_the_id_tables() {
        assert_eq!(
            Command::from_menu(Menu::Main, 50).unwrap(),
            Command::RotateCamera
        );
        assert_eq!(
            Command::from_menu(Menu::Main, 87).unwrap(),
            Command::DeleteObject
        );
        assert_eq!(
            Command::from_menu(Menu::Material, 20).unwrap(),
            Command::ShadeObject
        );
        assert_eq!(
            Command::from_menu(Menu::Light, 80).unwrap(),
            Command::MoveLight(2)
        );
        assert_eq!(
            Command::from_menu(Menu::Light, 93).unwrap(),
            Command::TintLight(3)
        );
        assert_eq!(
            Command::from_menu(Menu::Object, 3).unwrap(),
            Command::AddObject(3)
        );
    }

    #[test]
    fn unknown_menu_ids_are_fatal() {
        let err = Command::from_menu(Menu::Main, 12).unwrap_err();
        assert!(err.is_fatal());
        assert!(Command::from_menu(Menu::Light, 75).is_err());
        assert!(Command::from_menu(Menu::Material, 30).is_err());
    }

    #[test]
    fn startup_context_holds_reserved_scene_and_camera_tool() {
        let ctx = context();
        assert_eq!(ctx.store.count(), 5);
        assert_eq!(ctx.store.object(0).unwrap().scale, 10.0);
        for slot in 1..=3 {
            let light = ctx.store.object(slot).unwrap();
            assert_eq!(light.brightness, 0.2);
            assert_eq!(light.tex_id, 0);
        }
    }

    #[test]
    fn add_selects_and_binds_the_new_object() {
        let mut ctx = context();
        ctx.pointer_ground = Vector2::new(1.0, -1.0);
        dispatch(&mut ctx, Command::AddObject(2)).unwrap();
        assert_eq!(ctx.store.count(), 6);
        assert_eq!(ctx.store.current(), Some(5));
        assert_eq!(ctx.store.tool_target(), Some(5));
        let obj = ctx.store.object(5).unwrap();
        assert_eq!(obj.position.x, 1.0);
        assert_eq!(obj.position.z, -1.0);
    }

    #[test]
    fn delete_scenario_from_five_objects() {
        let mut ctx = context();
        assert_eq!(ctx.store.current(), Some(4));
        let reserved: Vec<_> = ctx.store.live()[..4].to_vec();

        dispatch(&mut ctx, Command::DeleteObject).unwrap();

        assert_eq!(ctx.store.count(), 4);
        assert_eq!(ctx.store.current(), Some(3));
        assert_eq!(&ctx.store.live()[..4], &reserved[..]);
    }

    #[test]
    fn duplicate_scenario_copies_attributes() {
        let mut ctx = context();
        {
            let obj = ctx.store.object_mut(4).unwrap();
            obj.scale = 0.005;
            obj.rgb = cgmath::Vector3::new(0.7, 0.7, 0.7);
            obj.brightness = 1.0;
        }
        dispatch(&mut ctx, Command::DuplicateObject).unwrap();
        assert_eq!(ctx.store.count(), 6);
        let copy = ctx.store.object(5).unwrap();
        assert_eq!(copy.scale, 0.005);
        assert_eq!(copy.rgb, cgmath::Vector3::new(0.7, 0.7, 0.7));
        assert_eq!(copy.brightness, 1.0);
    }

    #[test]
    fn light_tools_redirect_the_tool_target_only() {
        let mut ctx = context();
        let selected = ctx.store.current();
        dispatch(&mut ctx, Command::MoveLight(2)).unwrap();
        assert_eq!(ctx.store.tool_target(), Some(2));
        assert_eq!(ctx.store.current(), selected);
    }

    #[test]
    fn texture_commands_validate_the_catalog() {
        let mut ctx = context();
        dispatch(&mut ctx, Command::SetGroundTexture(3)).unwrap();
        assert_eq!(ctx.store.object(0).unwrap().tex_id, 3);

        let err = dispatch(&mut ctx, Command::SetTexture(9)).unwrap_err();
        assert_eq!(err, EditorError::InvalidTextureId { id: 9, count: 4 });

        let err = dispatch(&mut ctx, Command::AddObject(42)).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn exit_command_reports_exit() {
        let mut ctx = context();
        assert_eq!(dispatch(&mut ctx, Command::Exit).unwrap(), DispatchOutcome::Exit);
    }

    #[test]
    fn dispatch_replaces_the_active_binding() {
        let mut ctx = context();
        dispatch(&mut ctx, Command::MoveScale).unwrap();
        ctx.tools.begin_drag();
        assert!(ctx.tools.is_engaged());

        // Selecting a new tool tears the old binding down before installing.
        dispatch(&mut ctx, Command::RotateCamera).unwrap();
        assert!(!ctx.tools.is_engaged());

        ctx.tools.begin_drag();
        let before = *ctx.store.object(4).unwrap();
        let EditorContext {
            store,
            camera,
            tools,
            ..
        } = &mut ctx;
        tools.pointer_delta(Vector2::new(0.1, 0.0), store, camera);
        // The camera moved, the previously bound object did not.
        assert_eq!(*ctx.store.object(4).unwrap(), before);
        assert!((ctx.camera.sideways_deg - 80.0).abs() < 1e-3);
    }
}
