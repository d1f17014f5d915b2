pub mod asset {
    pub use ember_asset::*;
}

pub mod bake {
    pub use ember_bake::*;
}

pub mod render {
    pub use ember_render::*;
}
