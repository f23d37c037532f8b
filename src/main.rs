// src/main.rs
//! Editor entry point. Takes one optional argument: the directory holding
//! OBJ meshes and image textures to append to the built-in catalogs.

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let dir_arg = std::env::args().nth(1);
    brae::with_assets(dir_arg)?.run()
}
