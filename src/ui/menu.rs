// src/ui/menu.rs
//! Main menu bar for the editor
//!
//! Mirrors the classic right-click scene menu as an ImGui menu bar. Every
//! item maps to a `(Menu, id)` pair pushed into the selection queue; the
//! event loop drains the queue and feeds it through command decoding, so
//! this module never touches editor state directly.

use crate::editor::{command, Menu};

/// Builds the menu bar and appends any clicked items to `selections`.
///
/// # Arguments
/// * `ui` - ImGui frame
/// * `mesh_names` - Catalog mesh names; index 0 is the ground square and is
///   not offered in the add-object menu
/// * `texture_names` - Catalog texture names, offered by index
/// * `selections` - Output queue of `(menu, id)` pairs
pub fn build_menu_bar(
    ui: &imgui::Ui,
    mesh_names: &[String],
    texture_names: &[String],
    selections: &mut Vec<(Menu, u32)>,
) {
    ui.main_menu_bar(|| {
        ui.menu("Scene", || {
            if ui.menu_item("Rotate/Move Camera") {
                selections.push((Menu::Main, command::MAIN_ROTATE_CAMERA));
            }
            ui.menu("Add object", || {
                for (id, name) in mesh_names.iter().enumerate().skip(1) {
                    if ui.menu_item(name) {
                        selections.push((Menu::Object, id as u32));
                    }
                }
            });
            if ui.menu_item("Duplicate current object") {
                selections.push((Menu::Main, command::MAIN_DUPLICATE));
            }
            if ui.menu_item("Delete current object") {
                selections.push((Menu::Main, command::MAIN_DELETE));
            }
            ui.separator();
            if ui.menu_item("Exit") {
                selections.push((Menu::Main, command::MAIN_EXIT));
            }
        });

        ui.menu("Adjust", || {
            if ui.menu_item("Position/Scale") {
                selections.push((Menu::Main, command::MAIN_MOVE_SCALE));
            }
            if ui.menu_item("Rotation/Texture Scale") {
                selections.push((Menu::Main, command::MAIN_SPIN_TEX_SCALE));
            }
            ui.menu("Material", || {
                if ui.menu_item("Colour/Brightness") {
                    selections.push((Menu::Material, command::MATERIAL_TINT));
                }
                if ui.menu_item("Ambient/Diffuse/Specular/Shine") {
                    selections.push((Menu::Material, command::MATERIAL_SHADE));
                }
            });
        });

        ui.menu("Texture", || {
            ui.menu("Object texture", || {
                for (id, name) in texture_names.iter().enumerate() {
                    if ui.menu_item(name) {
                        selections.push((Menu::Texture, id as u32));
                    }
                }
            });
            ui.menu("Ground texture", || {
                for (id, name) in texture_names.iter().enumerate() {
                    if ui.menu_item(name) {
                        selections.push((Menu::GroundTexture, id as u32));
                    }
                }
            });
        });

        ui.menu("Lights", || {
            for slot in 1u32..=3 {
                if ui.menu_item(format!("Move Light {slot}")) {
                    selections.push((Menu::Light, command::LIGHT_MOVE_BASE + slot * 10));
                }
                if ui.menu_item(format!("R/G/B/Brightness Light {slot}")) {
                    selections.push((Menu::Light, command::LIGHT_TINT_BASE + slot * 10));
                }
            }
        });
    });
}
